//! Display-width helpers. Emoji occupy two terminal columns.

use unicode_width::{UnicodeWidthChar, UnicodeWidthStr};

pub fn width(s: &str) -> usize {
    UnicodeWidthStr::width(s)
}

/// Longest prefix of `s` that fits in `max` columns.
pub fn truncate(s: &str, max: usize) -> String {
    let mut out = String::new();
    let mut used = 0;
    for ch in s.chars() {
        let w = ch.width().unwrap_or(0);
        if used + w > max {
            break;
        }
        used += w;
        out.push(ch);
    }
    out
}

/// Word-wrap `text` to `max_width` columns. Newlines are kept as breaks and
/// words longer than a line are split.
pub fn wrap(text: &str, max_width: usize) -> Vec<String> {
    if max_width == 0 {
        return vec![];
    }
    let mut result = Vec::new();
    for line in text.lines() {
        if width(line) <= max_width {
            result.push(line.to_string());
            continue;
        }
        let mut current = String::new();
        for word in line.split_whitespace() {
            let mut word = word.to_string();
            while width(&word) > max_width {
                if !current.is_empty() {
                    result.push(std::mem::take(&mut current));
                }
                let head = truncate(&word, max_width);
                word = word[head.len()..].to_string();
                result.push(head);
            }
            if current.is_empty() {
                current = word;
            } else if width(&current) + 1 + width(&word) <= max_width {
                current.push(' ');
                current.push_str(&word);
            } else {
                result.push(std::mem::replace(&mut current, word));
            }
        }
        if !current.is_empty() {
            result.push(current);
        }
    }
    result
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_emoji_width() {
        assert_eq!(width("👍 1"), 4);
        assert_eq!(truncate("ab👍cd", 3), "ab");
        assert_eq!(truncate("ab👍cd", 4), "ab👍");
    }

    #[test]
    fn test_wrap_words() {
        let lines = wrap("the quick brown fox jumps", 10);
        assert_eq!(lines, vec!["the quick", "brown fox", "jumps"]);
    }

    #[test]
    fn test_wrap_long_word() {
        let lines = wrap("abcdefghijkl", 5);
        assert_eq!(lines, vec!["abcde", "fghij", "kl"]);
    }

    #[test]
    fn test_wrap_keeps_newlines() {
        assert_eq!(wrap("a\nb", 10), vec!["a", "b"]);
        assert!(wrap("anything", 0).is_empty());
    }
}
