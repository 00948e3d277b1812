/// Canonicalize a transcript before matching: lowercase, drop everything
/// that is neither a word character nor whitespace, collapse whitespace runs
/// to single spaces, trim the ends. Total function; never fails.
pub fn normalize(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    let mut pending_space = false;
    for ch in text.chars() {
        if ch.is_alphanumeric() || ch == '_' {
            if pending_space && !out.is_empty() {
                out.push(' ');
            }
            pending_space = false;
            for lc in ch.to_lowercase() {
                out.push(lc);
            }
        } else if ch.is_whitespace() {
            pending_space = true;
        }
        // Punctuation is removed without leaving a space, so "don't"
        // becomes "dont", not "don t".
    }
    out
}
