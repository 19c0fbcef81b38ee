mod cli;
mod figures_cmd;
mod link_cmd;
mod shared;
mod tables_cmd;

use clap::Parser;
use cli::Cli;
use shared::OptionOverrides;

fn main() {
    let cli = Cli::parse();

    let result = match cli.command {
        cli::Commands::Link {
            ref file,
            pretty,
            caption_align_tolerance,
            cluster_proximity,
            fallback_table_height,
            augment_first_page,
        } => {
            let overrides = OptionOverrides {
                caption_align_tolerance,
                cluster_proximity,
                fallback_table_height,
                augment_first_page,
            };
            link_cmd::run(file, pretty, &overrides.apply())
        }
        cli::Commands::Tables {
            ref file,
            pretty,
            caption_align_tolerance,
            fallback_table_height,
        } => {
            let overrides = OptionOverrides {
                caption_align_tolerance,
                cluster_proximity: None,
                fallback_table_height,
                augment_first_page: false,
            };
            tables_cmd::run(file, pretty, &overrides.apply())
        }
        cli::Commands::Figures {
            ref file,
            pretty,
            cluster_proximity,
            augment_first_page,
        } => {
            let overrides = OptionOverrides {
                caption_align_tolerance: None,
                cluster_proximity,
                fallback_table_height: None,
                augment_first_page,
            };
            figures_cmd::run(file, pretty, &overrides.apply())
        }
    };

    if let Err(code) = result {
        std::process::exit(code);
    }
}
