//! Token estimation and budget truncation.
//!
//! Rough approximation: 1 token ≈ 4 characters of English text. Good enough
//! to keep a context blob inside a model budget; swap in tiktoken if exact
//! counts ever matter.

/// Estimates the token count for a text string (len / 4, rounded up, min 1).
pub fn estimate_tokens(text: &str) -> usize {
    ((text.len() as f64) / 4.0).ceil().max(1.0) as usize
}

/// Truncates `text` so that its estimated token count fits `max_tokens`.
///
/// A budget of 0 yields an empty string. Truncation respects UTF-8 char
/// boundaries, so the result may be slightly under the byte budget.
pub fn truncate_to_tokens(text: &str, max_tokens: usize) -> String {
    if max_tokens == 0 {
        return String::new();
    }
    if estimate_tokens(text) <= max_tokens {
        return text.to_string();
    }
    let mut end = max_tokens * 4;
    while end > 0 && !text.is_char_boundary(end) {
        end -= 1;
    }
    text[..end].to_string()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn estimate_tokens_rounds_up_with_minimum_one() {
        assert_eq!(estimate_tokens(""), 1);
        assert_eq!(estimate_tokens("abc"), 1);
        assert_eq!(estimate_tokens("abcd"), 1);
        assert_eq!(estimate_tokens("abcde"), 2);
        assert_eq!(estimate_tokens(&"x".repeat(400)), 100);
    }

    #[test]
    fn truncate_zero_budget_is_empty() {
        assert_eq!(truncate_to_tokens("some stored context", 0), "");
    }

    #[test]
    fn truncate_keeps_short_text_intact() {
        assert_eq!(truncate_to_tokens("short", 750), "short");
    }

    #[test]
    fn truncate_keeps_text_exactly_at_budget() {
        // 40 bytes estimates to exactly 10 tokens; nothing should be cut.
        let text = "x".repeat(40);
        assert_eq!(truncate_to_tokens(&text, 10), text);
    }

    #[test]
    fn truncate_cuts_to_budget() {
        let long = "x".repeat(100);
        let cut = truncate_to_tokens(&long, 10);
        assert_eq!(cut.len(), 40);
        assert!(estimate_tokens(&cut) <= 10);
    }

    #[test]
    fn truncate_respects_utf8_boundaries() {
        // Each '好' is 3 bytes; a 1-token budget (4 bytes) lands mid-char.
        let text = "好好好好";
        let cut = truncate_to_tokens(text, 1);
        assert_eq!(cut, "好");
    }
}
