use std::path::Path;

use caplink::{DocumentLayout, LinkOptions, MemoryPage, link_document};

/// Tunables every subcommand may override. `None` keeps the default.
pub struct OptionOverrides {
    pub caption_align_tolerance: Option<f64>,
    pub cluster_proximity: Option<f64>,
    pub fallback_table_height: Option<f64>,
    pub augment_first_page: bool,
}

impl OptionOverrides {
    pub fn apply(&self) -> LinkOptions {
        let mut options = LinkOptions::default();
        if let Some(v) = self.caption_align_tolerance {
            options.caption_align_tolerance = v;
        }
        if let Some(v) = self.cluster_proximity {
            options.cluster_proximity = v;
        }
        if let Some(v) = self.fallback_table_height {
            options.fallback_table_height = v;
        }
        if self.augment_first_page {
            options.skip_first_page_augmentation = false;
        }
        options
    }
}

/// Load the page geometry JSON file with user-friendly error messages.
///
/// Returns `Err(1)` with a message printed to stderr if the file is not found,
/// cannot be read, or does not parse as a page array.
pub fn load_pages(file: &Path) -> Result<Vec<MemoryPage>, i32> {
    if !file.exists() {
        eprintln!("Error: file not found: {}", file.display());
        return Err(1);
    }

    let data = std::fs::read_to_string(file).map_err(|e| {
        eprintln!("Error: failed to read {}: {e}", file.display());
        1
    })?;

    serde_json::from_str(&data).map_err(|e| {
        eprintln!("Error: invalid page geometry JSON: {e}");
        1
    })
}

/// Load the input file and link it.
pub fn run_link(file: &Path, options: &LinkOptions) -> Result<DocumentLayout, i32> {
    let pages = load_pages(file)?;
    link_document(&pages, options).map_err(|e| {
        eprintln!("Error: {e}");
        1
    })
}

/// Print a JSON value to stdout, optionally pretty-printed.
pub fn print_json(value: &serde_json::Value, pretty: bool) -> Result<(), i32> {
    let out = if pretty {
        serde_json::to_string_pretty(value)
    } else {
        serde_json::to_string(value)
    }
    .map_err(|e| {
        eprintln!("Error: failed to serialize output: {e}");
        1
    })?;
    println!("{out}");
    Ok(())
}

/// JSON object for a bounding box, in the coordinate field order used
/// throughout the output.
pub fn bbox_json(bbox: &caplink::BBox) -> serde_json::Value {
    serde_json::json!({
        "x0": bbox.x0,
        "top": bbox.top,
        "x1": bbox.x1,
        "bottom": bbox.bottom,
    })
}
