use anyhow::{Context, Result};
use clap::Args;
use colored::Colorize;
use dance_match::{AlignmentMethod, ComparisonResult, MotionSequence, SequenceAligner};
use std::fs;
use std::path::{Path, PathBuf};
use std::process::ExitCode;

use super::EXIT_NO_SCORE;
use crate::config::{Config, OutputFormat};

#[derive(Args)]
pub struct CompareCommand {
    /// Reference motion sequence (JSON)
    #[arg(short, long)]
    reference: PathBuf,

    /// User motion sequence (JSON)
    #[arg(short, long)]
    user: PathBuf,

    /// Minimum keypoint confidence (0-1)
    #[arg(short, long)]
    threshold: Option<f32>,

    /// Number of aligned samples
    #[arg(short, long)]
    samples: Option<usize>,

    /// Score points lost per unit of average normalized distance
    #[arg(long)]
    scale: Option<f64>,

    /// Alignment method (nearest or linear)
    #[arg(long)]
    alignment: Option<AlignmentMethod>,

    /// Output format
    #[arg(short, long, value_enum)]
    format: Option<OutputFormat>,

    /// Omit the per-frame breakdown
    #[arg(long)]
    no_breakdown: bool,
}

impl CompareCommand {
    pub fn execute(self, config: &Config) -> Result<ExitCode> {
        let mut scoring = config.scoring.clone();
        if let Some(threshold) = self.threshold {
            scoring.confidence_threshold = threshold;
        }
        if let Some(samples) = self.samples {
            scoring.sample_count = samples;
        }
        if let Some(scale) = self.scale {
            scoring.score_scale = scale;
        }
        if let Some(alignment) = self.alignment {
            scoring.alignment = alignment;
        }
        if self.no_breakdown {
            scoring.per_frame_breakdown = false;
        }

        let format = self.format.unwrap_or(config.output.format);
        if !config.output.color {
            colored::control::set_override(false);
        }

        let aligner = SequenceAligner::new(scoring).context("Invalid scoring options")?;
        let reference = load_sequence(&self.reference)?;
        let user = load_sequence(&self.user)?;

        tracing::info!(
            reference = %self.reference.display(),
            user = %self.user.display(),
            "Comparing motion sequences"
        );

        match aligner.compare(&reference, &user) {
            Ok(result) => {
                match format {
                    OutputFormat::Json => println!("{}", serde_json::to_string_pretty(&result)?),
                    OutputFormat::Text => print_result(&result),
                }
                Ok(ExitCode::SUCCESS)
            }
            Err(e) if e.is_no_score() => {
                match format {
                    OutputFormat::Json => println!(
                        "{}",
                        serde_json::to_string_pretty(&serde_json::json!({
                            "score": null,
                            "reason": e.to_string(),
                        }))?
                    ),
                    OutputFormat::Text => {
                        println!("{} {}", "No score available:".yellow().bold(), e);
                    }
                }
                Ok(ExitCode::from(EXIT_NO_SCORE))
            }
            Err(e) => Err(e).context("Comparison failed"),
        }
    }
}

/// Read a motion sequence from a JSON file
pub fn load_sequence(path: &Path) -> Result<MotionSequence> {
    let contents = fs::read_to_string(path)
        .with_context(|| format!("Failed to read motion sequence {}", path.display()))?;
    let sequence = serde_json::from_str(&contents)
        .with_context(|| format!("Failed to parse motion sequence {}", path.display()))?;
    Ok(sequence)
}

fn print_result(result: &ComparisonResult) {
    let score = format!("{:.1}%", result.score);
    let score = if result.score >= 80.0 {
        score.green()
    } else if result.score >= 50.0 {
        score.yellow()
    } else {
        score.red()
    };

    println!("Similarity: {}", score.bold());
    println!("────────────────────────────────");
    println!(
        "  Frames compared: {}/{}",
        result.compared_frames, result.sample_count
    );
    if result.low_confidence_frames > 0 {
        println!(
            "  Skipped (low confidence): {}",
            result.low_confidence_frames
        );
    }
    println!("  Consistency (std dev): {:.1}", result.consistency);

    if let Some(frames) = &result.per_frame {
        println!();
        println!("  Frame  Score   Joints");
        for frame in frames {
            if frame.is_excluded() {
                println!("  {:>5}  {:>6}  {:>6}", frame.index, "-".dimmed(), 0);
            } else {
                println!(
                    "  {:>5}  {:>6.1}  {:>6}",
                    frame.index, frame.score, frame.compared_keypoints
                );
            }
        }
    }
}
