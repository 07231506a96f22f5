use thiserror::Error;

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum DomainError {
    #[error("Invalid destination: {0}")]
    InvalidDestination(String),

    #[error("Domain strategy 'use_ip' requires a name lookup, but none is available")]
    MissingNameLookup,

    #[error("Name lookup failed for {domain}: {reason}")]
    LookupFailed { domain: String, reason: String },

    #[error("Failed to dial {destination}: {reason}")]
    DialFailed { destination: String, reason: String },

    #[error("Timeout dialing {destination}")]
    DialTimeout { destination: String },

    #[error("I/O error: {0}")]
    Io(String),

    #[error("Stream closed")]
    StreamClosed,
}

impl From<std::io::Error> for DomainError {
    fn from(e: std::io::Error) -> Self {
        DomainError::Io(e.to_string())
    }
}
