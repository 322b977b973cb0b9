//! String utilities for the domain layer.

/// Truncate a string to at most `max_chars` characters, appending an ellipsis
/// when anything was cut.
pub fn truncate_chars(s: &str, max_chars: usize) -> String {
    match s.char_indices().nth(max_chars) {
        None => s.to_string(),
        Some((end, _)) => format!("{}…", &s[..end]),
    }
}

/// Substitute `{topic}` in a scripted line.
pub fn fill_topic(template: &str, topic: &str) -> String {
    template.replace("{topic}", topic)
}

/// Render a list as `- item` lines.
pub fn bullet_list<S: AsRef<str>>(items: &[S]) -> String {
    items
        .iter()
        .map(|item| format!("- {}", item.as_ref()))
        .collect::<Vec<_>>()
        .join("\n")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_truncate_ascii() {
        assert_eq!(truncate_chars("hello", 10), "hello");
        assert_eq!(truncate_chars("hello world", 5), "hello…");
    }

    #[test]
    fn test_truncate_multibyte() {
        assert_eq!(truncate_chars("эфир в прямом", 4), "эфир…");
        assert_eq!(truncate_chars("🎙️🎧", 10), "🎙️🎧");
    }

    #[test]
    fn test_fill_topic() {
        assert_eq!(
            fill_topic("Let's talk about {topic}.", "night shows"),
            "Let's talk about night shows."
        );
    }

    #[test]
    fn test_bullet_list() {
        assert_eq!(bullet_list(&["a", "b"]), "- a\n- b");
    }
}
