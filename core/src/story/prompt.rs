use crate::agents::ChatMessage;

const STORY_PROMPT: &str = "You are a creative writer of choose-your-own-adventure stories. \
Write an engaging story with a title and a branching tree of situations. \
The opening situation offers 2 or 3 choices; every path ends after 3 to 4 levels. \
Include several endings and make at least one of them a winning ending.";

/// Messages for a single story request: system rules plus the theme.
pub fn build_messages(theme: &str, format_instructions: &str) -> Vec<ChatMessage> {
    vec![
        ChatMessage::system(format!("{STORY_PROMPT}\n\n{format_instructions}")),
        ChatMessage::user(format!("Create the story with this theme: {}", theme.trim())),
    ]
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn embeds_theme_and_instructions() {
        let messages = build_messages("  fantasy ", "RETURN JSON");
        assert_eq!(messages.len(), 2);
        assert_eq!(messages[0].role, "system");
        assert!(messages[0].content.ends_with("RETURN JSON"));
        assert_eq!(messages[1].content, "Create the story with this theme: fantasy");
    }
}
