//! # Reveal Binary Entry Point
//!
//! Extracts the red-channel low bits of an image as a black/white PNG.
//!
//! ## Usage
//!
//! ```bash
//! cargo run --bin reveal -- --input out.png --output message.png
//! ```

use clap::Parser;
use log::info;

use lsb_stego::common::config::StegoConfig;
use lsb_stego::common::logging::{init_logger, level_for};
use lsb_stego::processing::Decoder;

/// Command-line arguments for the reveal binary
#[derive(Parser, Debug)]
#[command(author, version, about, long_about = None)]
struct Args {
    /// Image to read the hidden message from
    #[arg(short, long)]
    input: String,

    /// Where to write the extracted message (always PNG data)
    #[arg(short, long)]
    output: String,

    /// Path to a TOML configuration file (optional)
    #[arg(long)]
    config: Option<String>,

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

    let config = StegoConfig::load(args.config.as_deref())?;
    let stats = Decoder::from_config(&config).reveal(&args.input, &args.output)?;
    info!(
        "{}x{} message, {} white pixels",
        stats.width, stats.height, stats.white_pixels
    );

    if let Some(output_path) = args.stats_output {
        stats.export_to_json(&output_path)?;
        println!("Stats exported to: {}", output_path);
    }

    println!("Message extracted to {}", args.output);
    Ok(())
}
