//! Plain substring search used by the selector migrations.

/// Byte offsets of every occurrence of `needle` in `haystack`, overlapping
/// matches included. An empty needle matches nowhere.
pub fn find_all_substring_indices(haystack: &str, needle: &str) -> Vec<usize> {
    if needle.is_empty() {
        return Vec::new();
    }
    let mut result = Vec::new();
    let mut from = 0;
    while let Some(idx) = haystack[from..].find(needle) {
        let found = from + idx;
        result.push(found);
        // Step one char so overlapping matches are reported.
        from = found + haystack[found..].chars().next().map_or(1, char::len_utf8);
    }
    result
}

/// Like [`find_all_substring_indices`], but a match never starts inside the
/// previous one, so every offset can be replaced independently.
pub fn find_disjoint_substring_indices(haystack: &str, needle: &str) -> Vec<usize> {
    if needle.is_empty() {
        return Vec::new();
    }
    haystack.match_indices(needle).map(|(idx, _)| idx).collect()
}

/// Whether `c` can continue a CSS identifier.
pub fn is_css_ident_char(c: char) -> bool {
    c.is_alphanumeric() || c == '-' || c == '_'
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_find_all() {
        assert_eq!(find_all_substring_indices("a md-card md-card", "md-card"), vec![2, 10]);
        assert_eq!(find_all_substring_indices("aaa", "aa"), vec![0, 1]);
        assert!(find_all_substring_indices("abc", "").is_empty());
        assert!(find_all_substring_indices("", "a").is_empty());
    }

    #[test]
    fn test_find_disjoint() {
        assert_eq!(find_disjoint_substring_indices("aaaa", "aa"), vec![0, 2]);
        assert_eq!(find_disjoint_substring_indices("aaa", "aa"), vec![0]);
        assert!(find_disjoint_substring_indices("abc", "").is_empty());
    }

    #[test]
    fn test_find_all_multibyte() {
        assert_eq!(find_all_substring_indices("é<x>é<x>", "<x>"), vec![2, 7]);
    }
}
