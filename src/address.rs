//! Structural parsing of a candidate email address.
//!
//! The contract is deliberately narrow: exactly one `@`, a non-empty local
//! part and a non-empty domain. Anything else is rejected before any DNS or
//! SMTP activity happens. Syntax validation beyond that (RFC 5322 local-part
//! rules and so on) is out of scope.

use thiserror::Error;

/// A structurally valid address, split into its two parts.
///
/// `ascii_domain` is the IDNA (punycode) form of the domain and is what every
/// DNS query and SMTP command uses; `domain` keeps the user's spelling for
/// display.
#[cfg_attr(feature = "with-serde", derive(serde::Serialize, serde::Deserialize))]
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Address {
    pub original: String,
    pub local: String,
    pub domain: String,
    pub ascii_domain: String,
}

#[derive(Debug, Error)]
pub enum AddressError {
    #[error("address must contain exactly one '@' (found {count})")]
    InvalidSeparatorCount { count: usize },
    #[error("local part is empty")]
    EmptyLocalPart,
    #[error("domain is empty")]
    EmptyDomain,
    #[error("domain IDNA conversion failed")]
    IdnaConversion {
        #[source]
        source: idna::Errors,
    },
}

impl Address {
    /// Splits `input` on `'@'` and normalises the domain to ASCII.
    ///
    /// A failure here short-circuits the whole check; callers must not issue
    /// any network traffic for an address that did not parse.
    pub fn parse(input: &str) -> Result<Self, AddressError> {
        let trimmed = input.trim();

        let parts: Vec<&str> = trimmed.split('@').collect();
        if parts.len() != 2 {
            return Err(AddressError::InvalidSeparatorCount {
                count: parts.len().saturating_sub(1),
            });
        }
        let (local, domain) = (parts[0], parts[1]);

        if local.is_empty() {
            return Err(AddressError::EmptyLocalPart);
        }
        if domain.is_empty() {
            return Err(AddressError::EmptyDomain);
        }

        let ascii_domain = idna::domain_to_ascii(domain)
            .map_err(|source| AddressError::IdnaConversion { source })?;

        Ok(Self {
            original: trimmed.to_string(),
            local: local.to_string(),
            domain: domain.to_ascii_lowercase(),
            ascii_domain,
        })
    }
}

impl std::fmt::Display for Address {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}@{}", self.local, self.ascii_domain)
    }
}
