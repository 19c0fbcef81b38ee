use std::path::PathBuf;

use clap::{Parser, Subcommand};

/// Link table and figure captions on document pages to their regions.
#[derive(Debug, Parser)]
#[command(name = "caplink", about, version)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,
}

/// Available subcommands.
#[derive(Debug, Subcommand)]
pub enum Commands {
    /// Produce the full layout: table regions, figure matches, captions, warnings
    Link {
        /// Path to the page geometry JSON file
        #[arg(value_name = "FILE")]
        file: PathBuf,

        /// Pretty-print the JSON output
        #[arg(long)]
        pretty: bool,

        /// Center-x alignment tolerance between captions and rules
        #[arg(long)]
        caption_align_tolerance: Option<f64>,

        /// Proximity threshold for clustering graphic elements
        #[arg(long)]
        cluster_proximity: Option<f64>,

        /// Height of regions synthesized for captions without rule evidence
        #[arg(long)]
        fallback_table_height: Option<f64>,

        /// Run text augmentation on the first page as well
        #[arg(long)]
        augment_first_page: bool,
    },

    /// Print resolved table regions only
    Tables {
        /// Path to the page geometry JSON file
        #[arg(value_name = "FILE")]
        file: PathBuf,

        /// Pretty-print the JSON output
        #[arg(long)]
        pretty: bool,

        /// Center-x alignment tolerance between captions and rules
        #[arg(long)]
        caption_align_tolerance: Option<f64>,

        /// Height of regions synthesized for captions without rule evidence
        #[arg(long)]
        fallback_table_height: Option<f64>,
    },

    /// Print figure caption matches only
    Figures {
        /// Path to the page geometry JSON file
        #[arg(value_name = "FILE")]
        file: PathBuf,

        /// Pretty-print the JSON output
        #[arg(long)]
        pretty: bool,

        /// Proximity threshold for clustering graphic elements
        #[arg(long)]
        cluster_proximity: Option<f64>,

        /// Run text augmentation on the first page as well
        #[arg(long)]
        augment_first_page: bool,
    },
}
