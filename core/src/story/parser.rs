use super::tree::StoryLlmResponse;
use crate::errors::{Result, StoryForgeError};

/// Turns raw model text into a typed story tree.
pub trait ResponseParser: Send + Sync {
    /// Schema description embedded in the prompt.
    fn format_instructions(&self) -> String;

    fn parse(&self, raw: &str) -> Result<StoryLlmResponse>;
}

const FORMAT_INSTRUCTIONS: &str = r#"Return only a JSON object with this exact shape, no commentary:
{
  "title": "story title",
  "rootNode": {
    "content": "text of the opening situation",
    "isEnding": false,
    "isWinningEnding": false,
    "options": [
      { "text": "choice shown to the reader", "nextNode": { ...same node shape... } }
    ]
  }
}
Rules: every node has "content", "isEnding", "isWinningEnding" and "options".
Ending nodes have "isEnding": true and an empty "options" array.
"isWinningEnding" may only be true when "isEnding" is true."#;

/// Parses the JSON object the prompt asks for, tolerating Markdown fences and
/// prose around it.
#[derive(Debug, Clone, Copy, Default)]
pub struct JsonStoryParser;

impl ResponseParser for JsonStoryParser {
    fn format_instructions(&self) -> String {
        FORMAT_INSTRUCTIONS.to_string()
    }

    fn parse(&self, raw: &str) -> Result<StoryLlmResponse> {
        let json = extract_json_object(raw)
            .ok_or_else(|| StoryForgeError::Parse("no JSON object in model output".into()))?;
        let response: StoryLlmResponse =
            serde_json::from_str(json).map_err(|err| StoryForgeError::Parse(err.to_string()))?;
        if response.title.trim().is_empty() {
            return Err(StoryForgeError::Parse("story title is empty".into()));
        }
        Ok(response)
    }
}

fn extract_json_object(raw: &str) -> Option<&str> {
    let start = raw.find('{')?;
    let end = raw.rfind('}')?;
    (start < end).then(|| &raw[start..=end])
}

#[cfg(test)]
mod tests {
    use super::*;

    const STORY: &str = r#"{"title":"Forest Adventure","rootNode":{"content":"Start","isEnding":false,"isWinningEnding":false,"options":[{"text":"Continue","nextNode":{"content":"The End","isEnding":true,"isWinningEnding":true,"options":[]}}]}}"#;

    #[test]
    fn parses_bare_json() {
        let response = JsonStoryParser.parse(STORY).unwrap();
        assert_eq!(response.title, "Forest Adventure");
        assert_eq!(response.node_count(), 2);
    }

    #[test]
    fn parses_fenced_json_with_prose() {
        let raw = format!("Here is your story:\n```json\n{STORY}\n```\nEnjoy!");
        let response = JsonStoryParser.parse(&raw).unwrap();
        assert_eq!(response.root_node.content, "Start");
    }

    #[test]
    fn rejects_output_without_json() {
        let err = JsonStoryParser.parse("I cannot write that story.").unwrap_err();
        assert_eq!(err.code(), "AI-1101");
    }

    #[test]
    fn rejects_schema_mismatch() {
        let err = JsonStoryParser
            .parse(r#"{"title":"x","root":{"content":"y"}}"#)
            .unwrap_err();
        assert!(matches!(err, StoryForgeError::Parse(_)));
    }

    #[test]
    fn rejects_blank_title() {
        let raw = STORY.replace("Forest Adventure", "  ");
        assert!(JsonStoryParser.parse(&raw).is_err());
    }

    #[test]
    fn instructions_name_the_fields() {
        let text = JsonStoryParser.format_instructions();
        for field in ["rootNode", "isEnding", "isWinningEnding", "nextNode"] {
            assert!(text.contains(field), "missing {field}");
        }
    }
}
