use std::time::Duration;

use clap::{Parser, Subcommand};
use mailprobe::ProbeOptions;

#[derive(Parser)]
#[command(
    name = "mailprobe-cli",
    about = "Check email deliverability via DNS policy records and an SMTP probe"
)]
pub struct Cli {
    #[command(subcommand)]
    pub cmd: Option<Commands>,

    /// SMTP port to probe
    #[arg(long, default_value_t = 25)]
    pub port: u16,

    /// hostname announced in EHLO (defaults to the target domain)
    #[arg(long)]
    pub helo_name: Option<String>,

    /// envelope sender for MAIL FROM (defaults to postmaster@<domain>)
    #[arg(long)]
    pub envelope_sender: Option<String>,

    /// connection timeout in seconds
    #[arg(long, default_value_t = 5)]
    pub connect_timeout: u64,

    /// per-command timeout in seconds
    #[arg(long, default_value_t = 5)]
    pub command_timeout: u64,

    /// format: human|json
    #[arg(long, default_value = "human")]
    pub format: String,
}

#[derive(Subcommand)]
pub enum Commands {
    /// check a single address and exit (code 2 when not deliverable)
    Check { email: String },
}

impl Cli {
    pub fn probe_options(&self) -> ProbeOptions {
        ProbeOptions {
            port: self.port,
            helo_name: self.helo_name.clone(),
            envelope_sender: self.envelope_sender.clone(),
            connect_timeout: Duration::from_secs(self.connect_timeout),
            command_timeout: Duration::from_secs(self.command_timeout),
        }
    }
}
