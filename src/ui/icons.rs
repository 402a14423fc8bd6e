//! Status vocabulary shared by live output and the report.

use super::theme::SvcheckTheme;
use crate::checks::ProbeStatus;

/// Canonical status kinds used across svcheck output.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum StatusKind {
    /// Check passed or backend reachable.
    Success,
    /// Check failed or backend unreachable.
    Failed,
    /// Inconclusive.
    Warning,
}

impl StatusKind {
    /// Unicode icon for TTY output.
    pub fn icon(self) -> &'static str {
        match self {
            Self::Success => "✓",
            Self::Failed => "✗",
            Self::Warning => "⚠",
        }
    }

    /// Bracketed text for non-TTY output.
    pub fn bracketed(self) -> &'static str {
        match self {
            Self::Success => "[ok]",
            Self::Failed => "[FAIL]",
            Self::Warning => "[warn]",
        }
    }

    /// Styled icon string using the given theme.
    pub fn styled(self, theme: &SvcheckTheme) -> String {
        let icon = self.icon();
        match self {
            Self::Success => theme.success.apply_to(icon).to_string(),
            Self::Failed => theme.error.apply_to(icon).to_string(),
            Self::Warning => theme.warning.apply_to(icon).to_string(),
        }
    }

    /// Format a status line: styled icon + message.
    pub fn format(self, theme: &SvcheckTheme, msg: &str) -> String {
        format!("{} {}", self.styled(theme), msg)
    }

    /// Format a status line for non-TTY: bracketed + message.
    pub fn format_plain(self, msg: &str) -> String {
        format!("{} {}", self.bracketed(), msg)
    }
}

impl From<bool> for StatusKind {
    fn from(passed: bool) -> Self {
        if passed {
            Self::Success
        } else {
            Self::Failed
        }
    }
}

impl From<ProbeStatus> for StatusKind {
    fn from(status: ProbeStatus) -> Self {
        match status {
            ProbeStatus::Available => Self::Success,
            ProbeStatus::Unavailable => Self::Failed,
            ProbeStatus::Ambiguous => Self::Warning,
        }
    }
}
