use std::path::Path;

use caplink::LinkOptions;

use crate::shared::{bbox_json, print_json, run_link};

pub fn run(file: &Path, pretty: bool, options: &LinkOptions) -> Result<(), i32> {
    let layout = run_link(file, options)?;

    for warning in &layout.warnings {
        eprintln!("warning: {warning}");
    }

    let mut figures: Vec<serde_json::Value> = Vec::new();
    for (page, matches) in &layout.matches {
        for (label, m) in matches {
            figures.push(serde_json::json!({
                "page": page,
                "label": label,
                "bbox": bbox_json(&m.bbox),
                "distance": m.distance,
                "region_point": { "x": m.region_point.x, "y": m.region_point.y },
                "caption_point": { "x": m.caption_point.x, "y": m.caption_point.y },
            }));
        }
    }

    print_json(&serde_json::Value::Array(figures), pretty)
}
