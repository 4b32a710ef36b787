//! Per-domain DNS policy report (MX presence, SPF and DMARC records).
//!
//! [`check_domain_policy`] aggregates three independent lookups into a
//! [`DomainPolicyReport`]. The report is diagnostic only: it never feeds the
//! SMTP probe's verdict, is rebuilt from scratch on every call, and caches
//! nothing. Each lookup lands in a [`RecordFinding`] so that a failed query
//! is reported as a failure instead of crashing the check or passing as
//! "record absent".

mod dmarc;
mod error;
mod report;
mod resolver;
mod spf;

pub use dmarc::{DmarcPolicy, DmarcRecord};
pub use error::PolicyError;
pub use report::{DomainPolicyReport, RecordFinding};
pub use spf::{SpfQualifier, SpfRecord};

use tracing::warn;
use trust_dns_resolver::Resolver;

use crate::mx::{self, LookupMx, MxRecord, MxStatus};
use resolver::{fqdn, normalize_domain};
pub(crate) use resolver::LookupTxt;

pub fn check_domain_policy(domain: &str) -> Result<DomainPolicyReport, PolicyError> {
    let ascii = normalize_domain(domain)?;
    let resolver = Resolver::from_system_conf().map_err(PolicyError::resolver_init)?;
    report_with_resolver(&resolver, &ascii)
}

pub(crate) fn report_with_resolver<R>(
    resolver: &R,
    ascii_domain: &str,
) -> Result<DomainPolicyReport, PolicyError>
where
    R: LookupMx + LookupTxt,
{
    let mx = mx_finding(resolver, ascii_domain);
    let spf = txt_finding(resolver, ascii_domain, "SPF", spf::extract);
    let dmarc_name = fqdn("_dmarc", ascii_domain);
    let dmarc = txt_finding(resolver, &dmarc_name, "DMARC", dmarc::extract);

    Ok(DomainPolicyReport {
        domain: ascii_domain.to_string(),
        mx,
        spf,
        dmarc,
    })
}

fn mx_finding<R: LookupMx>(resolver: &R, ascii_domain: &str) -> RecordFinding<Vec<MxRecord>> {
    match mx::resolve_with(resolver, ascii_domain) {
        Ok(MxStatus::Records(records)) => RecordFinding::Found(records),
        Ok(MxStatus::NoRecords) => RecordFinding::Absent,
        Err(err) => {
            warn!(domain = ascii_domain, error = %err, "MX lookup failed, reporting as unresolved");
            RecordFinding::Failed {
                message: err.to_string(),
            }
        }
    }
}

fn txt_finding<R, T>(
    resolver: &R,
    name: &str,
    kind: &'static str,
    extract: impl FnOnce(&[String]) -> Option<T>,
) -> RecordFinding<T>
where
    R: LookupTxt,
{
    match resolver.lookup_txt(name) {
        Ok(records) => match extract(&records) {
            Some(found) => RecordFinding::Found(found),
            None => RecordFinding::Absent,
        },
        Err(err) => {
            warn!(name, kind, error = %err, "TXT lookup failed, reporting as unresolved");
            RecordFinding::Failed {
                message: err.to_string(),
            }
        }
    }
}

#[cfg(test)]
pub(crate) mod tests;
