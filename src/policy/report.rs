use crate::mx::MxRecord;

use super::{DmarcRecord, SpfRecord};

/// Outcome of one DNS lookup within a policy report.
///
/// All three lookups (MX, SPF, DMARC) share this shape so that callers apply
/// one failure policy to all of them instead of a per-field mix of fatal and
/// logged errors. A `Failed` finding is never collapsed into `Absent`.
#[cfg_attr(feature = "with-serde", derive(serde::Serialize, serde::Deserialize))]
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RecordFinding<T> {
    Found(T),
    Absent,
    Failed { message: String },
}

impl<T> RecordFinding<T> {
    pub fn is_found(&self) -> bool {
        matches!(self, Self::Found(_))
    }

    pub fn found(&self) -> Option<&T> {
        match self {
            Self::Found(value) => Some(value),
            _ => None,
        }
    }

    pub fn failure(&self) -> Option<&str> {
        match self {
            Self::Failed { message } => Some(message),
            _ => None,
        }
    }
}

/// Snapshot of a domain's mail-related DNS posture.
///
/// Built fresh per check, immutable afterwards, and discarded once printed.
#[cfg_attr(feature = "with-serde", derive(serde::Serialize, serde::Deserialize))]
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DomainPolicyReport {
    pub domain: String,
    pub mx: RecordFinding<Vec<MxRecord>>,
    pub spf: RecordFinding<SpfRecord>,
    pub dmarc: RecordFinding<DmarcRecord>,
}

impl DomainPolicyReport {
    pub fn has_mx(&self) -> bool {
        self.mx.is_found()
    }

    /// Exchangers in ascending preference order; empty when absent or the
    /// lookup failed.
    pub fn mx_hosts(&self) -> &[MxRecord] {
        self.mx.found().map(Vec::as_slice).unwrap_or(&[])
    }

    pub fn has_spf(&self) -> bool {
        self.spf.is_found()
    }

    pub fn spf_record(&self) -> Option<&str> {
        self.spf.found().map(|spf| spf.record.as_str())
    }

    pub fn has_dmarc(&self) -> bool {
        self.dmarc.is_found()
    }

    pub fn dmarc_record(&self) -> Option<&str> {
        self.dmarc.found().map(|dmarc| dmarc.record.as_str())
    }
}
