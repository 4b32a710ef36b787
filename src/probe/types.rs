use std::fmt;

/// Steps of the probe dialogue, in protocol order.
#[cfg_attr(feature = "with-serde", derive(serde::Serialize, serde::Deserialize))]
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ProbeStage {
    Connect,
    Greeting,
    Ehlo,
    MailFrom,
    RcptTo,
}

impl fmt::Display for ProbeStage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Connect => f.write_str("connect"),
            Self::Greeting => f.write_str("greeting"),
            Self::Ehlo => f.write_str("EHLO"),
            Self::MailFrom => f.write_str("MAIL FROM"),
            Self::RcptTo => f.write_str("RCPT TO"),
        }
    }
}

/// A complete SMTP reply: one status code plus the joined text of all its
/// lines (multi-line replies are folded with `\n`).
#[cfg_attr(feature = "with-serde", derive(serde::Serialize, serde::Deserialize))]
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SmtpReply {
    pub code: u16,
    pub message: String,
}

impl SmtpReply {
    pub fn is_positive_completion(&self) -> bool {
        (200..300).contains(&self.code)
    }

    pub fn is_transient_failure(&self) -> bool {
        (400..500).contains(&self.code)
    }

    pub fn is_permanent_failure(&self) -> bool {
        (500..600).contains(&self.code)
    }

    /// The acceptance test for `RCPT TO`: code 250, nothing looser.
    pub fn accepts_recipient(&self) -> bool {
        self.code == 250
    }
}

impl fmt::Display for SmtpReply {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} {}", self.code, self.message)
    }
}

/// One entry in the probe transcript.
#[cfg_attr(feature = "with-serde", derive(serde::Serialize, serde::Deserialize))]
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SmtpEvent {
    Sent { stage: ProbeStage, command: String },
    Received { stage: ProbeStage, reply: SmtpReply },
    Error { stage: ProbeStage, message: String },
}

/// How the probe ended. Only `Accepted` means deliverable.
#[cfg_attr(feature = "with-serde", derive(serde::Serialize, serde::Deserialize))]
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ProbeOutcome {
    /// The server answered `RCPT TO` with 250.
    Accepted { reply: SmtpReply },
    /// The server answered `RCPT TO` with any other status code.
    Rejected { reply: SmtpReply },
    /// MX resolution yielded no usable host; no connection was attempted.
    NoMailServer,
    /// The exchanger could not be dialed.
    Unreachable { message: String },
    /// The peer stopped answering within the configured timeout.
    TimedOut { stage: ProbeStage },
    /// The dialogue broke down mid-session (read/write failure, garbage reply).
    ProtocolError { stage: ProbeStage, message: String },
}

impl ProbeOutcome {
    pub fn is_deliverable(&self) -> bool {
        matches!(self, Self::Accepted { .. })
    }
}

impl fmt::Display for ProbeOutcome {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Accepted { reply } => write!(f, "recipient accepted ({reply})"),
            Self::Rejected { reply } => write!(f, "recipient rejected ({reply})"),
            Self::NoMailServer => f.write_str("no mail server found for domain"),
            Self::Unreachable { message } => write!(f, "mail server unreachable: {message}"),
            Self::TimedOut { stage } => write!(f, "timed out waiting for {stage}"),
            Self::ProtocolError { stage, message } => {
                write!(f, "SMTP dialogue failed at {stage}: {message}")
            }
        }
    }
}

/// Result of probing a single address against its preferred exchanger.
#[cfg_attr(feature = "with-serde", derive(serde::Serialize, serde::Deserialize))]
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ProbeReport {
    pub email: String,
    /// The exchanger that was (or would have been) contacted.
    pub exchange: Option<String>,
    pub outcome: ProbeOutcome,
    pub events: Vec<SmtpEvent>,
}

impl ProbeReport {
    pub fn is_deliverable(&self) -> bool {
        self.outcome.is_deliverable()
    }
}
