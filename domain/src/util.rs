//! Shared utility functions.

/// Shorten `s` to at most `max_chars` characters for log lines, appending
/// `…` when anything was cut.
pub fn preview(s: &str, max_chars: usize) -> String {
    let mut chars = s.chars();
    let head: String = chars.by_ref().take(max_chars).collect();
    if chars.next().is_some() {
        format!("{}…", head)
    } else {
        head
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn preview_no_op_when_short() {
        assert_eq!(preview("hi", 10), "hi");
    }

    #[test]
    fn preview_counts_characters_not_bytes() {
        assert_eq!(preview("塔罗秘境", 2), "塔罗…");
        assert_eq!(preview("塔罗", 2), "塔罗");
    }
}
