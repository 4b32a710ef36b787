//! Validation orchestrator.
//!
//! One call runs the whole check for a raw input string: structural parse,
//! DNS policy report, SMTP probe. The two inspections are independent; the
//! report is informational and the probe alone carries the verdict. A parse
//! failure stops everything before any network traffic.

use thiserror::Error;

use crate::address::{Address, AddressError};
use crate::policy::{self, DomainPolicyReport, PolicyError};
use crate::probe::{self, ProbeError, ProbeOptions, ProbeReport};

#[cfg_attr(feature = "with-serde", derive(serde::Serialize, serde::Deserialize))]
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CheckReport {
    pub address: Address,
    pub policy: DomainPolicyReport,
    pub probe: ProbeReport,
}

impl CheckReport {
    /// The authoritative verdict; the policy report never influences it.
    pub fn is_deliverable(&self) -> bool {
        self.probe.is_deliverable()
    }
}

#[derive(Debug, Error)]
pub enum CheckError {
    #[error(transparent)]
    Address(#[from] AddressError),
    #[error(transparent)]
    Policy(#[from] PolicyError),
    #[error(transparent)]
    Probe(#[from] ProbeError),
}

pub fn check_email(input: &str) -> Result<CheckReport, CheckError> {
    check_email_with_options(input, &ProbeOptions::default())
}

pub fn check_email_with_options(
    input: &str,
    options: &ProbeOptions,
) -> Result<CheckReport, CheckError> {
    let address = Address::parse(input)?;

    // Diagnostic pass first, always: the report is printed even when the
    // probe later fails. Each builds its own resolver and re-resolves from
    // scratch.
    let policy = policy::check_domain_policy(&address.ascii_domain)?;
    let probe = probe::probe_address(&address, options)?;

    Ok(CheckReport {
        address,
        policy,
        probe,
    })
}

#[cfg(test)]
pub(crate) fn check_with_resolver<R>(
    input: &str,
    options: &ProbeOptions,
    resolver: &R,
) -> Result<CheckReport, CheckError>
where
    R: crate::mx::LookupMx + crate::policy::LookupTxt,
{
    let address = Address::parse(input)?;
    let policy = policy::report_with_resolver(resolver, &address.ascii_domain)?;
    let probe = probe::probe_with_resolver(resolver, &address, options)?;
    Ok(CheckReport {
        address,
        policy,
        probe,
    })
}
