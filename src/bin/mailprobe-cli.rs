use anyhow::{Context, Result};
use clap::Parser;

use std::io::{self, BufRead};

use mailprobe::{check_email_with_options, CheckError, CheckReport, ProbeOptions};

#[path = "mailprobe-cli/args.rs"]
mod args;
#[path = "mailprobe-cli/output.rs"]
mod output;

use args::{Cli, Commands};

fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .with_writer(io::stderr)
        .init();

    let cli = Cli::parse();
    let options = cli.probe_options();

    if let Some(Commands::Check { email }) = cli.cmd {
        let deliverable = run_check(&email, &options, &cli.format)?;
        // exit codes: 0 deliverable, 2 not deliverable, 1 fatal
        if !deliverable {
            std::process::exit(2);
        }
        return Ok(());
    }

    run_loop(&options, &cli.format)
}

fn run_loop(options: &ProbeOptions, format: &str) -> Result<()> {
    println!("Starting the email checker...");
    println!("Enter an email address to check it, or 'q' to quit");

    let stdin = io::stdin();
    for line in stdin.lock().lines() {
        let line = line.context("read stdin")?;
        let input = line.trim();
        if input == "q" {
            break;
        }
        if !input.is_empty() {
            // a failed check never ends the session
            if let Err(err) = run_check(input, options, format) {
                eprintln!("check failed: {err:#}");
            }
        }
        println!("Enter an email address to check it, or 'q' to quit");
    }
    Ok(())
}

fn run_check(input: &str, options: &ProbeOptions, format: &str) -> Result<bool> {
    let report = match check_email_with_options(input, options) {
        Ok(report) => report,
        Err(CheckError::Address(err)) => {
            println!("{input} is not a valid email address: {err}");
            return Ok(false);
        }
        Err(err) => return Err(err.into()),
    };
    render(&report, format)?;
    Ok(report.is_deliverable())
}

fn render(report: &CheckReport, format: &str) -> Result<()> {
    match format {
        "human" => output::print_human(report),
        "json" => {
            #[cfg(feature = "with-serde")]
            {
                println!("{}", serde_json::to_string_pretty(report)?);
            }
            #[cfg(not(feature = "with-serde"))]
            {
                eprintln!("format=json requires the 'with-serde' feature");
                std::process::exit(1);
            }
        }
        other => {
            eprintln!("unknown --format '{other}', use: human|json");
            std::process::exit(1);
        }
    }
    Ok(())
}
