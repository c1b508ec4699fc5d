use dance_match::CocoKeypoint;

pub fn print_schema() {
    println!("Joint order (COCO, {} keypoints)", CocoKeypoint::all().len());
    println!("────────────────────────────────");
    for joint in CocoKeypoint::all() {
        println!("{:>3}  {}", joint.index(), joint.name());
    }
}
