mod layout;
mod listen;
mod simulate;

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use keypad_core::Timing;
use std::fs;

#[derive(Parser)]
#[command(name = "keypad-cli")]
#[command(about = "Host companion for the 4x4 serial keypad")]
struct Cli {
    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Type keystrokes from the keypad's serial port on this machine
    Listen {
        /// Serial device of the keypad
        #[arg(long, default_value = "/dev/ttyUSB0")]
        port: String,
        /// Baud rate of the keypad
        #[arg(long, default_value_t = 9600)]
        baud: u32,
        /// Log every keystroke and echo it to stdout
        #[arg(long)]
        verbose: bool,
    },
    /// Run the firmware pipeline against a scripted scan sequence
    Simulate {
        /// Path to the scan script, one scan per line
        script: String,
        /// Debounce wait before each column, in milliseconds
        #[arg(long, default_value_t = Timing::DEFAULT.debounce_ms)]
        debounce_ms: u32,
        /// Settle wait after each scan/emit cycle, in milliseconds
        #[arg(long, default_value_t = Timing::DEFAULT.settle_ms)]
        settle_ms: u32,
        /// Wait before the first repeat of a held key, in milliseconds
        #[arg(long, default_value_t = Timing::DEFAULT.hold_confirm_ms)]
        hold_ms: u32,
    },
    /// Print the key mapping table
    Layout,
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    let default_filter = match &cli.command {
        Command::Listen { verbose: true, .. } => "info",
        _ => "warn",
    };
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or(default_filter))
        .init();

    match cli.command {
        Command::Listen {
            port,
            baud,
            verbose,
        } => listen::run(&port, baud, verbose)?,
        Command::Simulate {
            script,
            debounce_ms,
            settle_ms,
            hold_ms,
        } => {
            let contents =
                fs::read_to_string(&script).with_context(|| format!("reading {}", script))?;
            let scans = simulate::parse_script(&contents).context("parsing scan script")?;

            let timing = Timing {
                debounce_ms,
                settle_ms,
                hold_confirm_ms: hold_ms,
                ..Timing::DEFAULT
            };

            println!("Simulating {} scans", scans.len());
            for sent in simulate::run(&scans, timing) {
                println!("{:>8} ms  {}", sent.at_ms, sent.label());
            }
        }
        Command::Layout => print!("{}", layout::render()),
    }

    Ok(())
}
