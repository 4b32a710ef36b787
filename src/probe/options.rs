use std::borrow::Cow;
use std::time::Duration;

/// Controls how [`probe_address`](super::probe_address) talks to the
/// exchanger.
#[derive(Debug, Clone)]
pub struct ProbeOptions {
    pub port: u16,
    /// Hostname announced in `EHLO`; defaults to the target domain.
    pub helo_name: Option<String>,
    /// Envelope sender for `MAIL FROM`; defaults to `postmaster@<domain>`.
    pub envelope_sender: Option<String>,
    pub connect_timeout: Duration,
    pub command_timeout: Duration,
}

impl Default for ProbeOptions {
    fn default() -> Self {
        Self {
            port: 25,
            helo_name: None,
            envelope_sender: None,
            connect_timeout: Duration::from_secs(5),
            command_timeout: Duration::from_secs(5),
        }
    }
}

impl ProbeOptions {
    pub fn helo_name<'a>(&'a self, ascii_domain: &'a str) -> Cow<'a, str> {
        self.helo_name
            .as_deref()
            .filter(|value| !value.is_empty())
            .map(Cow::Borrowed)
            .unwrap_or_else(|| Cow::Borrowed(ascii_domain))
    }

    pub fn envelope_sender(&self, ascii_domain: &str) -> String {
        self.envelope_sender
            .as_ref()
            .filter(|value| !value.is_empty())
            .cloned()
            .unwrap_or_else(|| format!("postmaster@{ascii_domain}"))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn helo_defaults_to_target_domain() {
        let options = ProbeOptions::default();
        assert_eq!(options.helo_name("example.com"), "example.com");
    }

    #[test]
    fn explicit_helo_wins() {
        let options = ProbeOptions {
            helo_name: Some("probe.invalid".to_string()),
            ..ProbeOptions::default()
        };
        assert_eq!(options.helo_name("example.com"), "probe.invalid");
    }

    #[test]
    fn envelope_sender_defaults_to_postmaster() {
        let options = ProbeOptions::default();
        assert_eq!(
            options.envelope_sender("example.com"),
            "postmaster@example.com"
        );
    }
}
