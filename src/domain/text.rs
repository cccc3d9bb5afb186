use unicode_width::{UnicodeWidthChar, UnicodeWidthStr};

/// Number of whitespace-separated words
pub fn count_words(s: &str) -> usize {
    s.split_whitespace().count()
}

/// Split a comma-separated tag list, trimming each tag and dropping empty ones
pub fn parse_tags(s: &str) -> Vec<String> {
    s.split(',')
        .map(str::trim)
        .filter(|tag| !tag.is_empty())
        .map(String::from)
        .collect()
}

/// Collapse whitespace and cut the text to at most `max_chars` characters, appending `...`
pub fn preview(s: &str, max_chars: usize) -> String {
    let collapsed = s.split_whitespace().collect::<Vec<_>>().join(" ");
    if collapsed.chars().count() <= max_chars {
        return collapsed;
    }
    let head: String = collapsed.chars().take(max_chars).collect();
    format!("{}...", head.trim_end())
}

/// Cut a single line so that it fits into `width` terminal columns
pub fn truncate_width(s: &str, width: usize) -> String {
    if s.width() <= width {
        return s.to_string();
    }
    if width == 0 {
        return String::new();
    }

    let mut result = String::new();
    let mut used = 0;
    for c in s.chars() {
        let w = c.width().unwrap_or(0);
        if used + w > width - 1 {
            break;
        }
        used += w;
        result.push(c);
    }
    result.push('…');
    result
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;
    use rstest::*;

    use super::*;

    #[rstest]
    #[case("", 0)]
    #[case("   ", 0)]
    #[case("one", 1)]
    #[case("one two\nthree\tfour", 4)]
    fn test_count_words(#[case] input: &str, #[case] expected: usize) {
        assert_eq!(count_words(input), expected);
    }

    #[rstest]
    #[case("", vec![])]
    #[case(" , ,", vec![])]
    #[case("tech, nature,happiness ", vec!["tech", "nature", "happiness"])]
    fn test_parse_tags(#[case] input: &str, #[case] expected: Vec<&str>) {
        assert_eq!(parse_tags(input), expected);
    }

    #[test]
    fn test_preview_short() {
        assert_eq!(preview("hello\n  world", 100), "hello world");
    }

    #[test]
    fn test_preview_long() {
        assert_eq!(preview("abc def ghi", 5), "abc d...");
    }

    #[test]
    fn test_truncate_width_fits() {
        assert_eq!(truncate_width("hello", 5), "hello");
    }

    #[test]
    fn test_truncate_width_alnum() {
        assert_eq!(truncate_width("hello, world!", 6), "hello…");
    }

    #[test]
    fn test_truncate_width_double_width() {
        assert_eq!(truncate_width("こんにちは", 5), "こん…");
    }

    #[test]
    fn test_truncate_width_zero() {
        assert_eq!(truncate_width("hello", 0), "");
    }
}
