use std::fmt;

/// The first SPF TXT record published at a domain.
#[cfg_attr(feature = "with-serde", derive(serde::Serialize, serde::Deserialize))]
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SpfRecord {
    /// The record text exactly as published.
    pub record: String,
    /// Qualifier of the `all` mechanism, when one is present.
    pub qualifier: Option<SpfQualifier>,
}

#[cfg_attr(feature = "with-serde", derive(serde::Serialize, serde::Deserialize))]
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SpfQualifier {
    Fail,
    SoftFail,
    Neutral,
    Pass,
}

impl fmt::Display for SpfQualifier {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Fail => f.write_str("-all (fail)"),
            Self::SoftFail => f.write_str("~all (softfail)"),
            Self::Neutral => f.write_str("?all (neutral)"),
            Self::Pass => f.write_str("+all (pass)"),
        }
    }
}

/// Scans TXT records in answer order and keeps the first one starting with
/// the `v=spf1` version tag; later matches are ignored.
pub(crate) fn extract(records: &[String]) -> Option<SpfRecord> {
    let record = records
        .iter()
        .map(|record| record.trim())
        .find(|trimmed| starts_with_ignore_ascii_case(trimmed, "v=spf1"))?;

    let qualifier = record
        .split_whitespace()
        .skip(1)
        .find_map(|token| qualifier_from_token(&token.to_ascii_lowercase()));

    Some(SpfRecord {
        record: record.to_string(),
        qualifier,
    })
}

fn starts_with_ignore_ascii_case(input: &str, prefix: &str) -> bool {
    input
        .get(..prefix.len())
        .map(|head| head.eq_ignore_ascii_case(prefix))
        .unwrap_or(false)
}

fn qualifier_from_token(token: &str) -> Option<SpfQualifier> {
    match token {
        "-all" => Some(SpfQualifier::Fail),
        "~all" => Some(SpfQualifier::SoftFail),
        "?all" => Some(SpfQualifier::Neutral),
        "all" | "+all" => Some(SpfQualifier::Pass),
        _ => None,
    }
}
