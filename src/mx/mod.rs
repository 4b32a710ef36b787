//! DNS MX resolution.
//!
//! [`check_mx`] performs a synchronous lookup against the system resolver and
//! returns the domain's mail exchangers sorted by ascending preference. An
//! empty list means the domain publishes no MX records; both the policy
//! report and the SMTP probe treat that as "no candidate host".

mod error;
mod resolver;
mod types;

pub use error::MxError as Error;
pub use resolver::check_mx;
pub(crate) use resolver::{resolve_with, LookupMx};
pub use types::{MxRecord, MxStatus};
