#![forbid(unsafe_code)]
//! mailprobe — email deliverability checks.
//!
//! Two independent inspections are offered for an address's domain: a DNS
//! policy report (MX, SPF and DMARC records) and an active SMTP probe that
//! walks a partial transaction up to `RCPT TO` without sending mail. The
//! probe alone decides deliverability; the policy report is diagnostic.

pub mod address;
pub mod check;
pub mod mx;
pub mod policy;
pub mod probe;

pub use address::{Address, AddressError};
pub use check::{check_email, check_email_with_options, CheckError, CheckReport};
pub use mx::{check_mx, Error as MxError, MxRecord, MxStatus};
pub use policy::{
    check_domain_policy, DmarcPolicy, DmarcRecord, DomainPolicyReport, PolicyError, RecordFinding,
    SpfQualifier, SpfRecord,
};
pub use probe::{
    probe_address, ProbeError, ProbeOptions, ProbeOutcome, ProbeReport, ProbeStage, SmtpEvent,
    SmtpReply,
};
