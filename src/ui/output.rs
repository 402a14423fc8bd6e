//! Output verbosity.

/// Output verbosity mode.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum OutputMode {
    /// Show everything, including strategy commands and diagnostics.
    Verbose,
    /// Show progress and the summary.
    #[default]
    Normal,
    /// Show the summary only.
    Quiet,
    /// Show nothing except errors.
    Silent,
}

impl OutputMode {
    /// Check if this mode shows per-attempt detail.
    pub fn shows_details(&self) -> bool {
        matches!(self, Self::Verbose)
    }

    /// Check if this mode shows progress lines as checks run.
    pub fn shows_progress(&self) -> bool {
        matches!(self, Self::Verbose | Self::Normal)
    }

    /// Check if this mode shows status messages.
    pub fn shows_status(&self) -> bool {
        !matches!(self, Self::Silent)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn output_mode_shows_details() {
        assert!(OutputMode::Verbose.shows_details());
        assert!(!OutputMode::Normal.shows_details());
        assert!(!OutputMode::Quiet.shows_details());
    }

    #[test]
    fn output_mode_shows_progress() {
        assert!(OutputMode::Verbose.shows_progress());
        assert!(OutputMode::Normal.shows_progress());
        assert!(!OutputMode::Quiet.shows_progress());
        assert!(!OutputMode::Silent.shows_progress());
    }

    #[test]
    fn output_mode_shows_status() {
        assert!(OutputMode::Quiet.shows_status());
        assert!(!OutputMode::Silent.shows_status());
    }

    #[test]
    fn output_mode_default() {
        assert_eq!(OutputMode::default(), OutputMode::Normal);
    }
}
