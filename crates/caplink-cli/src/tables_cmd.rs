use std::path::Path;

use caplink::LinkOptions;

use crate::shared::{bbox_json, print_json, run_link};

pub fn run(file: &Path, pretty: bool, options: &LinkOptions) -> Result<(), i32> {
    let layout = run_link(file, options)?;

    for warning in &layout.warnings {
        eprintln!("warning: {warning}");
    }

    let tables: Vec<serde_json::Value> = layout
        .table_regions
        .iter()
        .map(|t| {
            serde_json::json!({
                "page": t.page,
                "label": t.label,
                "bbox": bbox_json(&t.bbox),
            })
        })
        .collect();

    print_json(&serde_json::Value::Array(tables), pretty)
}
