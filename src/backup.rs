//! Editor backup detection.

/// True when `file_name` is an editor backup under `suffix`.
///
/// The name must be strictly longer than the suffix, so a file called exactly
/// `~` is not a backup. An empty suffix disables the check altogether.
pub fn is_backup(file_name: &str, suffix: &str) -> bool {
    if suffix.is_empty() {
        return false;
    }
    file_name.len() > suffix.len() && file_name.ends_with(suffix)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_tilde_backups() {
        assert!(is_backup("a.tex~", "~"));
        assert!(is_backup("notes~", "~"));
        assert!(!is_backup("a.tex", "~"));
    }

    #[test]
    fn test_name_must_be_longer_than_suffix() {
        assert!(!is_backup("~", "~"));
        assert!(!is_backup(".bak", ".bak"));
        assert!(is_backup("x.bak", ".bak"));
    }

    #[test]
    fn test_empty_suffix_disables_filter() {
        assert!(!is_backup("a.tex~", ""));
        assert!(!is_backup("anything", ""));
        assert!(!is_backup("", ""));
    }

    #[test]
    fn test_independent_of_extension() {
        // No recognized extension, or no extension at all
        assert!(is_backup("README~", "~"));
        assert!(is_backup("data.xyz.orig", ".orig"));
    }

    #[test]
    fn test_suffix_match_is_exact() {
        assert!(!is_backup("a.tex.BAK", ".bak"));
        assert!(!is_backup("a.tex~x", "~"));
    }
}
