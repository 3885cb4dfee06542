// TI LCD Frontend - Main Entry Point
//
// Runs the reference demo device in a window, or headless for a fixed amount
// of emulated time when `--headless` is given.

use clap::Parser;
use std::path::PathBuf;
use ti_lcd_frontend::display::{run_window, BitDepth};
use ti_lcd_frontend::emulator::{run_headless, FrontendConfig, DEFAULT_CONFIG_FILE};
use ti_lcd_frontend::DemoDevice;
use tracing_subscriber::EnvFilter;

/// Command line arguments
#[derive(Parser, Debug)]
#[command(name = "ti-lcd")]
#[command(version, about = "Monochrome calculator LCD and keypad frontend")]
struct Cli {
    /// Configuration file
    #[arg(short, long, default_value = DEFAULT_CONFIG_FILE)]
    config: PathBuf,

    /// Magnification (1-8)
    #[arg(long)]
    scale: Option<u32>,

    /// Surface bit depth (8, 16, 24 or 32)
    #[arg(long, value_parser = parse_bit_depth)]
    bit_depth: Option<BitDepth>,

    /// Window title
    #[arg(long)]
    title: Option<String>,

    /// Run as fast as possible instead of pacing to the wall clock
    #[arg(long)]
    no_throttle: bool,

    /// Run without a window for this many emulated seconds, then save a screenshot
    #[arg(long, value_name = "SECONDS")]
    headless: Option<u64>,

    /// Let the demo device scroll its picture through the Z register
    #[arg(long)]
    scroll: bool,

    /// Increase log verbosity (-v debug, -vv trace)
    #[arg(short, long, action = clap::ArgAction::Count)]
    verbose: u8,
}

fn parse_bit_depth(value: &str) -> Result<BitDepth, String> {
    let bits: u8 = value
        .parse()
        .map_err(|_| format!("'{}' is not a number", value))?;
    BitDepth::try_from(bits)
}

fn init_logging(verbose: u8) {
    let default_level = match verbose {
        0 => "info",
        1 => "debug",
        _ => "trace",
    };
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level));
    tracing_subscriber::fmt().with_env_filter(filter).init();
}

fn main() -> Result<(), Box<dyn std::error::Error>> {
    let cli = Cli::parse();
    init_logging(cli.verbose);

    tracing::info!(version = env!("CARGO_PKG_VERSION"), "ti-lcd starting");

    let mut config = FrontendConfig::load_or_default(&cli.config);
    if let Some(scale) = cli.scale {
        config.video.scale = scale;
    }
    if let Some(bit_depth) = cli.bit_depth {
        config.video.bit_depth = bit_depth;
    }
    if let Some(title) = cli.title {
        config.video.title = title;
    }
    if cli.no_throttle {
        config.timing.throttle = false;
    }

    let device = DemoDevice::new(cli.scroll);

    let result = match cli.headless {
        Some(seconds) => {
            let output_dir = config.screenshot.directory.clone();
            run_headless(device, &config, seconds, &output_dir).map(|path| {
                tracing::info!(path = %path.display(), "final frame written");
            })
        }
        None => run_window(config, device),
    };

    if let Err(e) = result {
        tracing::error!(error = %e, "frontend terminated");
        return Err(e.into());
    }

    tracing::info!("ti-lcd exited");
    Ok(())
}
