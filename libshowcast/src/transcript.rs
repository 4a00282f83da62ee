//! Transcript line parsing.

/// One parsed unit of dialogue, with an optional image reference.
///
/// A raw line of the form `img <N> <text>` (N a positive integer) carries
/// image number N; anything else is plain text. Parsing never fails:
/// malformed directives degrade to plain text.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TranscriptLine {
    pub image_index: Option<u32>,
    pub text: String,
}

impl TranscriptLine {
    pub fn parse(raw: &str) -> Self {
        let trimmed = raw.trim();

        if let Some(rest) = trimmed.strip_prefix("img") {
            // The token must stand alone: "img3" is dialogue, not a directive.
            if rest.starts_with(char::is_whitespace) {
                let rest = rest.trim_start();
                let (number, tail) = match rest.find(char::is_whitespace) {
                    Some(split) => (&rest[..split], &rest[split..]),
                    None => (rest, ""),
                };
                if let Ok(index) = number.parse::<u32>() {
                    if index >= 1 {
                        return Self {
                            image_index: Some(index),
                            text: tail.trim_start().to_string(),
                        };
                    }
                }
            }
        }

        Self {
            image_index: None,
            text: trimmed.to_string(),
        }
    }

    /// True when there is nothing to publish for this line.
    pub fn is_blank(&self) -> bool {
        self.image_index.is_none() && self.text.is_empty()
    }
}
