// Development automation for ti-lcd-frontend
//
// `cargo x ci` runs the checks a change has to pass, `cargo x test` can narrow
// the unit tests to one library module, and `cargo x headless` renders the
// demo device without a window for a quick visual check.

use anyhow::{bail, Context, Result};
use clap::{Parser, Subcommand};
use colored::*;
use std::process::Command;
use std::time::Instant;

/// Library modules with their own unit tests
const MODULES: [&str; 4] = ["device", "display", "emulator", "input"];

#[derive(Parser)]
#[command(name = "x")]
#[command(about = "Development automation for ti-lcd-frontend")]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Format check, clippy with warnings denied, then the full test suite
    Ci,
    /// Run tests, optionally only the unit tests of some library modules
    Test {
        /// Library module to test (device, display, emulator, input)
        #[arg(long = "module", value_name = "MODULE")]
        modules: Vec<String>,
    },
    /// Run the criterion render benchmarks
    Bench {
        /// Only run benchmarks whose name contains this filter
        filter: Option<String>,
    },
    /// Render the demo device headless and save the final frame
    Headless {
        /// Emulated seconds to run
        #[arg(short, long, default_value = "2")]
        seconds: u64,
        /// Scroll the demo picture through the Z register
        #[arg(long)]
        scroll: bool,
    },
}

fn main() -> Result<()> {
    let cli = Cli::parse();
    let start = Instant::now();

    match cli.command {
        Commands::Ci => ci()?,
        Commands::Test { modules } => test(&modules)?,
        Commands::Bench { filter } => bench(filter.as_deref())?,
        Commands::Headless { seconds, scroll } => headless(seconds, scroll)?,
    }

    println!(
        "{} finished in {:.2}s",
        "✓".green().bold(),
        start.elapsed().as_secs_f64()
    );
    Ok(())
}

fn ci() -> Result<()> {
    step("fmt", cargo(&["fmt", "--all", "--", "--check"]))?;
    step(
        "clippy",
        cargo(&["clippy", "--workspace", "--all-targets", "--", "-D", "warnings"]),
    )?;
    step("test", cargo(&["test", "--workspace"]))
}

fn test(modules: &[String]) -> Result<()> {
    if modules.is_empty() {
        return step("test", cargo(&["test"]));
    }

    if let Some(unknown) = modules.iter().find(|m| !MODULES.contains(&m.as_str())) {
        bail!(
            "unknown module '{}', expected one of: {}",
            unknown,
            MODULES.join(", ")
        );
    }

    // Unit test paths start with the module name, so it doubles as a filter
    let mut failed = Vec::new();
    for module in modules {
        let label = format!("test {}", module);
        if step(&label, cargo(&["test", "--lib", module])).is_err() {
            failed.push(module.as_str());
        }
    }

    if !failed.is_empty() {
        bail!("tests failed in: {}", failed.join(", "));
    }
    Ok(())
}

fn bench(filter: Option<&str>) -> Result<()> {
    let mut cmd = cargo(&["bench", "--bench", "render_bench"]);
    if let Some(filter) = filter {
        cmd.arg("--").arg(filter);
    }
    step("bench", cmd)
}

fn headless(seconds: u64, scroll: bool) -> Result<()> {
    let seconds = seconds.to_string();
    let mut cmd = cargo(&[
        "run",
        "--release",
        "--bin",
        "ti-lcd",
        "--",
        "--headless",
        &seconds,
        "--no-throttle",
    ]);
    if scroll {
        cmd.arg("--scroll");
    }
    step("headless", cmd)
}

fn cargo(args: &[&str]) -> Command {
    let mut cmd = Command::new(std::env::var("CARGO").unwrap_or_else(|_| "cargo".to_string()));
    cmd.args(args);
    cmd
}

/// Run `cmd` with inherited output, reporting the outcome under `label`
fn step(label: &str, mut cmd: Command) -> Result<()> {
    println!("{} {}", "→".blue(), label.bold());

    let status = cmd
        .status()
        .with_context(|| format!("failed to launch {:?}", cmd.get_program()))?;

    if status.success() {
        println!("{} {}\n", "✓".green(), label);
        Ok(())
    } else {
        println!("{} {}\n", "✗".red(), label);
        bail!("{} failed ({})", label, status)
    }
}
