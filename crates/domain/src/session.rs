use std::fmt;

/// Lifecycle of one dispatched session. Transitions are linear; a session
/// never moves back to an earlier phase.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum SessionPhase {
    Created,
    Resolving,
    Dialing,
    Transporting,
    Closed,
}

impl SessionPhase {
    pub fn as_str(&self) -> &'static str {
        match self {
            SessionPhase::Created => "created",
            SessionPhase::Resolving => "resolving",
            SessionPhase::Dialing => "dialing",
            SessionPhase::Transporting => "transporting",
            SessionPhase::Closed => "closed",
        }
    }
}

impl fmt::Display for SessionPhase {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}
