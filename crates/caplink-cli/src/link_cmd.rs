use std::path::Path;

use caplink::LinkOptions;

use crate::shared::{print_json, run_link};

pub fn run(file: &Path, pretty: bool, options: &LinkOptions) -> Result<(), i32> {
    let layout = run_link(file, options)?;

    let value = serde_json::to_value(&layout).map_err(|e| {
        eprintln!("Error: failed to serialize layout: {e}");
        1
    })?;
    print_json(&value, pretty)
}
