//! X2040 Control Tool
//!
//! CLI for driving a Pertelian X2040 character LCD over USB.

mod config;

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use std::path::PathBuf;
use tracing::{debug, warn};
use tracing_subscriber::EnvFilter;
use x2040_hw::{Glyph, OutEndpoint, UsbTarget, X2040};

use config::Config;

#[derive(Clone, Copy, Debug, clap::ValueEnum)]
enum Switch {
    On,
    Off,
}

#[derive(Parser)]
#[command(name = "x2040ctl")]
#[command(about = "Control tool for the Pertelian X2040 LCD")]
#[command(version)]
struct Cli {
    /// Enable verbose logging
    #[arg(short, long)]
    verbose: bool,

    /// Configuration file (TOML)
    #[arg(short, long)]
    config: Option<PathBuf>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Turn the display on, clear it and light it
    On,
    /// Turn the light and the display off
    Off,
    /// Clear the display
    Clear,
    /// Switch the backlight
    Light {
        #[arg(value_enum)]
        state: Switch,
    },
    /// Write text at the current cursor
    Print { text: String },
    /// Write text at a line (0-3) and column (0-19)
    PrintAt {
        line: u8,
        column: u8,
        text: String,
    },
    /// Write text centered on a line
    Center { line: u8, text: String },
    /// Blank a line
    Blank { line: u8 },
    /// Store a custom glyph in slot 0-6
    Glyph {
        slot: u8,
        /// Exactly 8 rows of 5 characters; spaces are blank dots
        #[arg(num_args = 8, required = true)]
        rows: Vec<String>,
    },
    /// Print references to stored glyphs
    Refs {
        #[arg(required = true)]
        slots: Vec<u8>,

        #[arg(long, default_value = "0")]
        line: u8,

        #[arg(long, default_value = "0")]
        column: u8,
    },
    /// Draw the splash screen
    Splash,
    /// Send raw hex bytes in one unpaced transfer (often garbles the display)
    #[command(hide = true)]
    Raw {
        #[arg(required = true)]
        bytes: Vec<String>,
    },
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    // Setup logging
    let filter = if cli.verbose {
        EnvFilter::new("debug")
    } else {
        EnvFilter::new("warn")
    };
    tracing_subscriber::fmt().with_env_filter(filter).init();

    let config = match &cli.config {
        Some(path) => Config::load(path)
            .with_context(|| format!("Failed to load configuration from {}", path.display()))?,
        None => Config::default(),
    };
    debug!("Using device configuration: {:?}", config.device);

    // Validate before touching the device
    let glyph = match &cli.command {
        Commands::Glyph { rows, .. } => Some(Glyph::from_rows(rows.as_slice())?),
        _ => None,
    };
    let raw = match &cli.command {
        Commands::Raw { bytes } => Some(parse_hex(bytes)?),
        _ => None,
    };

    let target = UsbTarget::from(&config.device);
    let mut lcd = X2040::open_with(&target).context("Failed to open X2040 display")?;

    let result = run(&mut lcd, cli.command, glyph, raw);
    finish(lcd, result)
}

/// Closes the display, keeping the command's error if both fail.
fn finish<E: OutEndpoint>(lcd: X2040<E>, result: Result<()>) -> Result<()> {
    let closed = lcd.close().context("Failed to close X2040 display");
    if let (Err(_), Err(e)) = (&result, &closed) {
        warn!("{:#}", e);
    }
    result.and(closed)
}

fn run<E: OutEndpoint>(
    lcd: &mut X2040<E>,
    command: Commands,
    glyph: Option<Glyph>,
    raw: Option<Vec<u8>>,
) -> Result<()> {
    match command {
        Commands::On => {
            lcd.power_on()?;
            println!("Display on");
        }
        Commands::Off => {
            lcd.power_off()?;
            println!("Display off");
        }
        Commands::Clear => {
            lcd.clear()?;
            println!("Display cleared");
        }
        Commands::Light { state } => {
            lcd.set_backlight(matches!(state, Switch::On))?;
            println!("Backlight {}", lcd.backlight_state());
        }
        Commands::Print { text } => lcd.print(&text)?,
        Commands::PrintAt { line, column, text } => lcd.print_at(line, column, &text)?,
        Commands::Center { line, text } => lcd.print_centered(line, &text)?,
        Commands::Blank { line } => lcd.blank_line(line)?,
        Commands::Glyph { slot, .. } => {
            let glyph = glyph.context("Glyph was not encoded")?;
            lcd.set_character(slot, &glyph)?;
            println!("Stored glyph in slot {}:", slot);
            for row in glyph.to_pattern() {
                println!("  |{}|", row);
            }
        }
        Commands::Refs {
            slots,
            line,
            column,
        } => {
            let refs = lcd.glyph_refs(&slots);
            lcd.print_at(line, column, refs)?;
        }
        Commands::Splash => lcd.draw_splash()?,
        Commands::Raw { .. } => {
            let bytes = raw.context("Raw bytes were not parsed")?;
            let written = lcd.write_unpaced(&bytes)?;
            println!("Wrote {} of {} bytes unpaced", written, bytes.len());
        }
    }

    Ok(())
}

/// Parses bytes written as hex, with or without a `0x` prefix.
fn parse_hex(values: &[String]) -> Result<Vec<u8>> {
    values
        .iter()
        .map(|value| {
            let digits = value
                .strip_prefix("0x")
                .or_else(|| value.strip_prefix("0X"))
                .unwrap_or(value);
            u8::from_str_radix(digits, 16).with_context(|| format!("Invalid hex byte: {}", value))
        })
        .collect()
}
