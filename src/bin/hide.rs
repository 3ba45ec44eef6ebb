//! # Hide Binary Entry Point
//!
//! Embeds a black/white message image in the red-channel low bits of a carrier.
//!
//! ## Usage
//!
//! ```bash
//! cargo run --bin hide -- --carrier photo.png --message secret.png --output out.png
//! ```
//!
//! With a configuration file and a JSON stats report:
//! ```bash
//! cargo run --bin hide -- --carrier photo.jpg --message secret.png --output out.png \
//!   --config config/default.toml --stats-output hide_stats.json
//! ```

use clap::Parser;
use log::info;

use lsb_stego::common::config::StegoConfig;
use lsb_stego::common::logging::{init_logger, level_for};
use lsb_stego::processing::{Encoder, ResampleFilter};

/// Command-line arguments for the hide binary
#[derive(Parser, Debug)]
#[command(author, version, about, long_about = None)]
struct Args {
    /// Carrier image the message is hidden in
    #[arg(short, long)]
    carrier: String,

    /// Message image; stretched to the carrier's size and reduced to black/white
    #[arg(short, long)]
    message: String,

    /// Where to write the encoded image (always PNG data)
    #[arg(short, long)]
    output: String,

    /// Path to a TOML configuration file (optional)
    #[arg(long)]
    config: Option<String>,

    /// Override the configured resample filter (nearest, triangle, catmullrom, gaussian, lanczos3)
    #[arg(long)]
    filter: Option<String>,

    /// Path to write stats JSON output (optional)
    #[arg(long)]
    stats_output: Option<String>,

    /// Log at debug level
    #[arg(short, long)]
    verbose: bool,
}

fn main() -> anyhow::Result<()> {
    let args = Args::parse();
    init_logger(level_for(args.verbose));

    let mut config = StegoConfig::load(args.config.as_deref())?;
    if let Some(filter) = &args.filter {
        config.encoder.resample_filter = filter.parse::<ResampleFilter>()?;
    }

    let encoder = Encoder::from_config(&config);
    let stats = encoder.hide(&args.carrier, &args.message, &args.output)?;
    info!(
        "{}x{} carrier, {:.2}% of pixels changed",
        stats.width,
        stats.height,
        stats.change_rate()
    );

    if let Some(output_path) = args.stats_output {
        stats.export_to_json(&output_path)?;
        println!("Stats exported to: {}", output_path);
    }

    println!("Secret image saved to {}", args.output);
    Ok(())
}
