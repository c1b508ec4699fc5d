// Library exports for the dance-match CLI
// This allows testing of internal modules

pub mod commands;
pub mod config;
