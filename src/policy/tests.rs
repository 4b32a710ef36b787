use trust_dns_resolver::error::ResolveError;

use super::resolver::LookupTxt;
use super::{report_with_resolver, DmarcPolicy, PolicyError, RecordFinding, SpfQualifier};
use crate::mx::{LookupMx, MxRecord};

type MxFn = dyn Fn(&str) -> Result<Vec<MxRecord>, ResolveError>;
type TxtFn = dyn Fn(&str) -> Result<Vec<String>, PolicyError>;

pub(crate) struct StubDns {
    pub on_mx: Box<MxFn>,
    pub on_txt: Box<TxtFn>,
}

impl StubDns {
    pub(crate) fn new<M, T>(on_mx: M, on_txt: T) -> Self
    where
        M: Fn(&str) -> Result<Vec<MxRecord>, ResolveError> + 'static,
        T: Fn(&str) -> Result<Vec<String>, PolicyError> + 'static,
    {
        Self {
            on_mx: Box::new(on_mx),
            on_txt: Box::new(on_txt),
        }
    }

    /// A stub whose every lookup panics; used to prove a code path issues no
    /// DNS queries at all.
    pub(crate) fn unreachable() -> Self {
        Self::new(
            |_| panic!("unexpected MX lookup"),
            |_| panic!("unexpected TXT lookup"),
        )
    }
}

impl LookupMx for StubDns {
    fn lookup_mx(&self, domain: &str) -> Result<Vec<MxRecord>, ResolveError> {
        (self.on_mx)(domain)
    }
}

impl LookupTxt for StubDns {
    fn lookup_txt(&self, name: &str) -> Result<Vec<String>, PolicyError> {
        (self.on_txt)(name)
    }
}

fn lookup_error() -> ResolveError {
    ResolveError::from("stubbed lookup failure")
}

#[test]
fn spf_takes_first_matching_record_and_echoes_it() {
    let stub = StubDns::new(
        |_| Ok(vec![MxRecord::new(10, "mx.example.com")]),
        |name| {
            if name == "example.com" {
                Ok(vec![
                    "google-site-verification=abc123".to_string(),
                    "v=spf1 include:_spf.example.com ~all".to_string(),
                    "v=spf1 -all".to_string(),
                ])
            } else {
                Ok(Vec::new())
            }
        },
    );

    let report = report_with_resolver(&stub, "example.com").expect("report");
    assert!(report.has_spf());
    assert_eq!(
        report.spf_record(),
        Some("v=spf1 include:_spf.example.com ~all")
    );
    let spf = report.spf.found().expect("spf finding");
    assert_eq!(spf.qualifier, Some(SpfQualifier::SoftFail));
}

#[test]
fn dmarc_is_queried_at_the_dmarc_subdomain() {
    let stub = StubDns::new(
        |_| Ok(Vec::new()),
        |name| match name {
            "_dmarc.example.com" => Ok(vec![
                "not-a-dmarc-record".to_string(),
                "v=DMARC1; p=reject; rua=mailto:dmarc@example.com".to_string(),
            ]),
            "example.com" => Ok(Vec::new()),
            other => panic!("unexpected TXT lookup for {other}"),
        },
    );

    let report = report_with_resolver(&stub, "example.com").expect("report");
    assert!(report.has_dmarc());
    assert_eq!(
        report.dmarc_record(),
        Some("v=DMARC1; p=reject; rua=mailto:dmarc@example.com")
    );
    let dmarc = report.dmarc.found().expect("dmarc finding");
    assert_eq!(dmarc.policy, Some(DmarcPolicy::Reject));
}

#[test]
fn absent_records_are_reported_as_absent_not_errors() {
    let stub = StubDns::new(|_| Ok(Vec::new()), |_| Ok(Vec::new()));

    let report = report_with_resolver(&stub, "example.com").expect("report");
    assert!(!report.has_mx());
    assert!(!report.has_spf());
    assert!(!report.has_dmarc());
    assert!(matches!(report.mx, RecordFinding::Absent));
    assert_eq!(report.spf_record(), None);
    assert_eq!(report.dmarc_record(), None);
}

#[test]
fn lookup_failures_become_failed_findings() {
    let stub = StubDns::new(
        |_| Err(lookup_error()),
        |name| Err(PolicyError::txt_lookup(name, lookup_error())),
    );

    let report = report_with_resolver(&stub, "example.com").expect("report");
    assert!(!report.has_mx());
    assert!(!report.has_spf());
    assert!(!report.has_dmarc());
    assert!(report.mx.failure().is_some());
    assert!(report.spf.failure().is_some());
    // DMARC failures are findings like the others, never fatal.
    assert!(report.dmarc.failure().is_some());
    assert!(report.mx_hosts().is_empty());
}

#[test]
fn mx_hosts_keep_preference_order() {
    let stub = StubDns::new(
        |_| {
            Ok(vec![
                MxRecord::new(20, "backup.example.com"),
                MxRecord::new(10, "primary.example.com"),
            ])
        },
        |_| Ok(Vec::new()),
    );

    let report = report_with_resolver(&stub, "example.com").expect("report");
    assert!(report.has_mx());
    let hosts = report.mx_hosts();
    assert_eq!(hosts[0].exchange, "primary.example.com");
    assert_eq!(hosts[1].exchange, "backup.example.com");
}

#[test]
fn non_matching_txt_records_are_ignored() {
    let stub = StubDns::new(
        |_| Ok(Vec::new()),
        |name| {
            if name.starts_with("_dmarc.") {
                Ok(vec!["v=spf1 -all".to_string()])
            } else {
                Ok(vec!["v=DMARC1; p=none".to_string()])
            }
        },
    );

    // SPF records at the DMARC name (and vice versa) must not match.
    let report = report_with_resolver(&stub, "example.com").expect("report");
    assert!(!report.has_spf());
    assert!(!report.has_dmarc());
}
