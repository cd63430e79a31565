//! Success-code classification for package-manager invocations.

use std::collections::HashSet;

/// Winget exit codes that indicate a benign, already-satisfied state
/// (already installed, already absent, update not applicable). These
/// classify as success alongside zero.
pub const WINGET_KNOWN_SUCCESS: [i32; 4] =
    [-1_978_335_148, -1_978_335_189, -1_978_334_963, -1_978_334_962];

/// A classification table of exit codes that count as success beyond zero.
///
/// Checked before raising a command failure; externally configurable per
/// package-manager integration.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SuccessCodes {
    codes: HashSet<i32>,
}

impl Default for SuccessCodes {
    fn default() -> Self {
        Self::winget()
    }
}

impl SuccessCodes {
    /// Builds a table from explicit non-zero success codes.
    #[must_use]
    pub fn new(codes: impl IntoIterator<Item = i32>) -> Self {
        Self {
            codes: codes.into_iter().collect(),
        }
    }

    /// The winget classification table.
    #[must_use]
    pub fn winget() -> Self {
        Self::new(WINGET_KNOWN_SUCCESS)
    }

    /// A table where only exit code zero is success.
    #[must_use]
    pub fn zero_only() -> Self {
        Self::new([])
    }

    /// Adds one more known-success code.
    #[must_use]
    pub fn with_code(mut self, code: i32) -> Self {
        self.codes.insert(code);
        self
    }

    /// Classifies an exit code.
    #[must_use]
    pub fn is_success(&self, exit_code: i32) -> bool {
        exit_code == 0 || self.codes.contains(&exit_code)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_zero_is_always_success() {
        assert!(SuccessCodes::zero_only().is_success(0));
        assert!(SuccessCodes::winget().is_success(0));
    }

    #[test]
    fn test_winget_already_satisfied_codes() {
        let codes = SuccessCodes::winget();
        // 0x8A150054 / 0x8A15002B / 0x8A15010D / 0x8A15010E as i32.
        assert!(codes.is_success(-1_978_335_148));
        assert!(codes.is_success(-1_978_335_189));
        assert!(codes.is_success(-1_978_334_963));
        assert!(codes.is_success(-1_978_334_962));
        assert!(!codes.is_success(1));
    }

    #[test]
    fn test_custom_code() {
        let codes = SuccessCodes::zero_only().with_code(3010);
        assert!(codes.is_success(3010));
        assert!(!codes.is_success(1641));
    }
}
