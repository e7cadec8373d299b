//! CLI argument definitions using clap derive macros.

use std::path::PathBuf;

use clap::Parser;

use canvas_export_core::api::DEFAULT_PER_PAGE;

/// Export every file of your active Canvas courses to a local directory.
///
/// The bearer token is read from `CANVAS_TOKEN`, or from the `canvas_api_key`
/// key of a JSON config file. Files already present locally are skipped, so an
/// interrupted export can simply be run again.
#[derive(Parser, Debug)]
#[command(name = "canvas-export")]
#[command(author, version, about)]
pub struct Args {
    /// Increase output verbosity (-v for debug, -vv for trace)
    #[arg(short, long, action = clap::ArgAction::Count)]
    pub verbose: u8,

    /// Suppress non-error output
    #[arg(short, long)]
    pub quiet: bool,

    /// Disable colored log output
    #[arg(long)]
    pub no_color: bool,

    /// Directory to export into (prompted for when omitted)
    #[arg(short, long, value_name = "DIR")]
    pub output_dir: Option<PathBuf>,

    /// Canvas API base URL, e.g. https://school.instructure.com/api/v1
    #[arg(long, value_name = "URL")]
    pub base_url: Option<String>,

    /// JSON config file holding `canvas_api_key` (and optionally `canvas_base_url`)
    #[arg(long, value_name = "FILE")]
    pub config: Option<PathBuf>,

    /// Items requested per page from list endpoints (1-100)
    #[arg(long, default_value_t = DEFAULT_PER_PAGE, value_parser = clap::value_parser!(u32).range(1..=100))]
    pub per_page: u32,
}
