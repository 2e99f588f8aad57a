use crate::sentiment::Mood;

/// Cuts `text` to at most `max_chars` characters, never splitting a character.
pub fn truncate_chars(text: &str, max_chars: usize) -> &str {
    match text.char_indices().nth(max_chars) {
        Some((byte_index, _)) => &text[..byte_index],
        None => text,
    }
}

/// Prompt for the image backends. Caller text is capped at `max_chars`.
pub fn build_prompt(text: &str, mood: Option<Mood>, max_chars: usize) -> String {
    let text = truncate_chars(text, max_chars);
    match mood {
        Some(mood) => format!(
            "Generate a {} image based on the following text: {}",
            mood, text
        ),
        None => format!("Generate an image based on the following text: {}", text),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn short_text_is_embedded_unmodified() {
        let text = "I love sunny days";
        assert_eq!(truncate_chars(text, 400), text);
        assert_eq!(truncate_chars(text, text.len()), text);
        assert_eq!(
            build_prompt(text, Some(Mood::Happy), 400),
            "Generate a happy image based on the following text: I love sunny days"
        );
    }

    #[test]
    fn long_text_is_capped() {
        let text = "a".repeat(1000);
        assert_eq!(truncate_chars(&text, 400).chars().count(), 400);

        let prompt = build_prompt(&text, Some(Mood::Sad), 400);
        let embedded = prompt
            .strip_prefix("Generate a sad image based on the following text: ")
            .unwrap();
        assert_eq!(embedded.chars().count(), 400);
    }

    #[test]
    fn truncation_respects_char_boundaries() {
        let text = "é".repeat(10);
        let cut = truncate_chars(&text, 3);
        assert_eq!(cut, "ééé");
        assert_eq!(cut.len(), 6);
    }

    #[test]
    fn prompt_without_mood() {
        assert_eq!(
            build_prompt("a cat", None, 400),
            "Generate an image based on the following text: a cat"
        );
    }
}
