//! Logging helpers for generated text, which is multi-line and unbounded.
//! Control characters are escaped and long strings are cut so each log record stays on one line.

/// Default number of characters kept by [`escape_log`].
pub const MAX_PREVIEW: usize = 300;

/// Escape `s` for single-line logging, keeping at most [`MAX_PREVIEW`] characters.
pub fn escape_log(s: &str) -> String {
    escape_log_with_limit(s, MAX_PREVIEW)
}

/// Escape `s` for single-line logging:
/// - `\n`, `\r`, `\t` and backslash become their two-character escapes
/// - other control characters become `\xNN`
/// - anything past `max_chars` is replaced by a single ellipsis
pub fn escape_log_with_limit(s: &str, max_chars: usize) -> String {
    use std::fmt::Write;
    let mut out = String::with_capacity(s.len().min(max_chars) + 8);
    for (count, ch) in s.chars().enumerate() {
        if count >= max_chars {
            out.push('…');
            break;
        }
        match ch {
            '\\' => out.push_str("\\\\"),
            '\n' => out.push_str("\\n"),
            '\r' => out.push_str("\\r"),
            '\t' => out.push_str("\\t"),
            c if c.is_control() => {
                let _ = write!(&mut out, "\\x{:02X}", c as u32);
            }
            c => out.push(c),
        }
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn escapes_completion_newlines() {
        let s = "ánh sáng → sáng tạo\nsáng tạo → tạo hình\r\tEnd";
        assert_eq!(
            escape_log(s),
            "ánh sáng → sáng tạo\\nsáng tạo → tạo hình\\r\\tEnd"
        );
    }

    #[test]
    fn truncates_by_characters_not_bytes() {
        let s = "ồồồồồ";
        assert_eq!(escape_log_with_limit(s, 3), "ồồồ…");
        assert_eq!(escape_log_with_limit(s, 5), "ồồồồồ");
    }
}
