//! Spreadsheet identifier extraction.

use regex::Regex;

/// Minimum length of a bare identifier (no `/`) accepted as-is.
pub const MIN_BARE_ID_LEN: usize = 20;

fn sheet_url_regex() -> &'static Regex {
    static RE: std::sync::OnceLock<Regex> = std::sync::OnceLock::new();
    RE.get_or_init(|| Regex::new(r"/spreadsheets/d/([A-Za-z0-9_-]+)").expect("valid regex"))
}

/// Extract a spreadsheet identifier from a raw ID or a full sheet URL.
///
/// Returns `None` when nothing usable is found.
///
/// ```
/// use gridjson_core::resolve_spreadsheet_id;
///
/// let url = "https://docs.google.com/spreadsheets/d/ABC123xyz/edit#gid=0";
/// assert_eq!(resolve_spreadsheet_id(url).as_deref(), Some("ABC123xyz"));
/// assert_eq!(resolve_spreadsheet_id("short"), None);
/// ```
#[must_use]
pub fn resolve_spreadsheet_id(input: &str) -> Option<String> {
    let trimmed = input.trim();
    if trimmed.is_empty() {
        return None;
    }

    if !trimmed.contains('/') && trimmed.chars().count() >= MIN_BARE_ID_LEN {
        return Some(trimmed.to_string());
    }

    sheet_url_regex()
        .captures(trimmed)
        .and_then(|caps| caps.get(1))
        .map(|m| m.as_str().to_string())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_full_url() {
        assert_eq!(
            resolve_spreadsheet_id("https://docs.google.com/spreadsheets/d/ABC123xyz/edit#gid=0"),
            Some("ABC123xyz".to_string())
        );
    }

    #[test]
    fn test_url_with_dashes_and_underscores() {
        assert_eq!(
            resolve_spreadsheet_id("  docs.google.com/spreadsheets/d/1a-B_c/view  "),
            Some("1a-B_c".to_string())
        );
    }

    #[test]
    fn test_bare_id() {
        let id = "1BxiMVs0XRA5nFMdKvBdBZjgmUUqptlbs";
        assert_eq!(resolve_spreadsheet_id(id), Some(id.to_string()));

        let twenty_five = "abcdefghijklmnopqrstuvwxy";
        assert_eq!(resolve_spreadsheet_id(twenty_five), Some(twenty_five.to_string()));
    }

    #[test]
    fn test_boundary_length() {
        assert_eq!(
            resolve_spreadsheet_id(&"a".repeat(MIN_BARE_ID_LEN)),
            Some("a".repeat(MIN_BARE_ID_LEN))
        );
        assert_eq!(resolve_spreadsheet_id(&"a".repeat(MIN_BARE_ID_LEN - 1)), None);
    }

    #[test]
    fn test_rejects() {
        assert_eq!(resolve_spreadsheet_id(""), None);
        assert_eq!(resolve_spreadsheet_id("   "), None);
        assert_eq!(resolve_spreadsheet_id("short"), None);
        assert_eq!(resolve_spreadsheet_id("https://example.com/some/other/path"), None);
    }

    #[test]
    fn test_long_id_with_slash_must_match_url_shape() {
        assert_eq!(resolve_spreadsheet_id("abcdefghijklmnopqrstuvwxyz/123"), None);
    }
}
