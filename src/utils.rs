/// Truncate a string to at most `max_chars` characters, respecting
/// char boundaries. Node names and review text are frequently accented
/// Portuguese, so byte-indexed slicing is not safe here.
#[inline]
pub fn safe_truncate(s: &str, max_chars: usize) -> String {
    s.chars().take(max_chars).collect()
}

/// Like [`safe_truncate`] but appends `...` when the input was cut.
#[inline]
pub fn safe_truncate_ellipsis(s: &str, max_chars: usize) -> String {
    if s.chars().count() > max_chars {
        format!("{}...", s.chars().take(max_chars).collect::<String>())
    } else {
        s.to_string()
    }
}
