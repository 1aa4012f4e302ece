pub fn abbreviate(text: &str, max_chars: usize) -> String {
    let mut chars = text.chars();
    let head = chars.by_ref().take(max_chars).collect::<String>();
    if chars.next().is_some() {
        format!("{}…", head.trim_end())
    } else {
        head
    }
}

// ASCII lowercasing keeps byte offsets stable, so the returned offset is
// valid in the original string.
pub fn find_ascii_ci(haystack: &str, needle: &str) -> Option<usize> {
    if needle.is_empty() {
        return None;
    }

    haystack
        .to_ascii_lowercase()
        .find(&needle.to_ascii_lowercase())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn abbreviate_keeps_short_text_unchanged() {
        assert_eq!(abbreviate("climate", 18), "climate");
    }

    #[test]
    fn abbreviate_truncates_on_char_boundaries() {
        assert_eq!(abbreviate("Ørsted wind farms", 6), "Ørsted…");
        assert_eq!(abbreviate("abcdef", 3), "abc…");
    }

    #[test]
    fn find_ascii_ci_matches_case_insensitively() {
        assert_eq!(find_ascii_ci("NASA Climate Portal", "nasa"), Some(0));
        assert_eq!(find_ascii_ci("NASA Climate Portal", "climate"), Some(5));
        assert_eq!(find_ascii_ci("NASA", "esa"), None);
    }

    #[test]
    fn find_ascii_ci_rejects_empty_needle() {
        assert_eq!(find_ascii_ci("anything", ""), None);
    }
}
