use thiserror::Error;

/// Environmental failures while setting up a probe.
///
/// Everything that happens once probing starts (resolution misses, dial
/// failures, timeouts, protocol breakdowns) degrades to a negative
/// [`ProbeOutcome`](super::ProbeOutcome) instead of an error.
#[derive(Debug, Error)]
pub enum ProbeError {
    #[error("resolver initialization failed: {source}")]
    ResolverInit {
        #[source]
        source: std::io::Error,
    },
}

impl ProbeError {
    pub(crate) fn resolver_init(source: std::io::Error) -> Self {
        Self::ResolverInit { source }
    }
}
