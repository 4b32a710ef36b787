use std::fmt;

/// The first DMARC TXT record published at `_dmarc.<domain>`.
#[cfg_attr(feature = "with-serde", derive(serde::Serialize, serde::Deserialize))]
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DmarcRecord {
    /// The record text exactly as published.
    pub record: String,
    /// The `p=` tag, when present and recognised.
    pub policy: Option<DmarcPolicy>,
}

#[cfg_attr(feature = "with-serde", derive(serde::Serialize, serde::Deserialize))]
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DmarcPolicy {
    None,
    Quarantine,
    Reject,
}

impl fmt::Display for DmarcPolicy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::None => f.write_str("none"),
            Self::Quarantine => f.write_str("quarantine"),
            Self::Reject => f.write_str("reject"),
        }
    }
}

/// Scans TXT records in answer order and keeps the first one starting with
/// the `v=DMARC1` version tag; later matches are ignored.
pub(crate) fn extract(records: &[String]) -> Option<DmarcRecord> {
    let record = records
        .iter()
        .map(|record| record.trim())
        .find(|trimmed| starts_with_ignore_ascii_case(trimmed, "v=dmarc1"))?;

    let policy = policy_tag(record).and_then(|value| match value.to_ascii_lowercase().as_str() {
        "none" => Some(DmarcPolicy::None),
        "quarantine" => Some(DmarcPolicy::Quarantine),
        "reject" => Some(DmarcPolicy::Reject),
        _ => None,
    });

    Some(DmarcRecord {
        record: record.to_string(),
        policy,
    })
}

fn policy_tag(record: &str) -> Option<&str> {
    record.split(';').find_map(|part| {
        let mut kv = part.trim().splitn(2, '=');
        let key = kv.next()?.trim();
        if key.eq_ignore_ascii_case("p") {
            kv.next().map(str::trim)
        } else {
            None
        }
    })
}

fn starts_with_ignore_ascii_case(input: &str, prefix: &str) -> bool {
    input
        .get(..prefix.len())
        .map(|head| head.eq_ignore_ascii_case(prefix))
        .unwrap_or(false)
}
