use std::fmt;

/// Machine-readable error codes for agent-friendly decision making.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ErrorCode {
    NotConfigured,
    ConfigParseError,
    FetchFailed,
    WriteFailed,
    SessionCorrupt,
    InternalUnexpected,
}

impl ErrorCode {
    /// Stable code identifier (`E####`) for machine parsing.
    #[must_use]
    pub const fn code(self) -> &'static str {
        match self {
            Self::NotConfigured => "E1001",
            Self::ConfigParseError => "E1002",
            Self::FetchFailed => "E2001",
            Self::WriteFailed => "E2002",
            Self::SessionCorrupt => "E3001",
            Self::InternalUnexpected => "E9001",
        }
    }

    /// Short human-facing summary for logs and terminal output.
    #[must_use]
    pub const fn message(self) -> &'static str {
        match self {
            Self::NotConfigured => "Provider credentials not configured",
            Self::ConfigParseError => "Config file parse error",
            Self::FetchFailed => "Candidate page fetch failed",
            Self::WriteFailed => "Remote field write failed",
            Self::SessionCorrupt => "Session file unreadable",
            Self::InternalUnexpected => "Internal unexpected error",
        }
    }

    /// Optional remediation hint that can be surfaced to operators.
    #[must_use]
    pub const fn hint(self) -> Option<&'static str> {
        match self {
            Self::NotConfigured => {
                Some("Set AIRTABLE, AIRTABLE_BASE_ID, and AIRTABLE_TABLE_NAME. `sift health` shows what is missing.")
            }
            Self::ConfigParseError => Some("Fix syntax in .sift/config.toml and retry."),
            Self::FetchFailed => Some("Check network and token scopes, then retry the load."),
            Self::WriteFailed => {
                Some("Local state is authoritative; the next stage change will re-sync.")
            }
            Self::SessionCorrupt => {
                Some("Delete .sift/session.json to start a fresh session (local triage state is lost).")
            }
            Self::InternalUnexpected => Some("Retry once. If persistent, report a bug with logs."),
        }
    }
}

impl fmt::Display for ErrorCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.code())
    }
}
