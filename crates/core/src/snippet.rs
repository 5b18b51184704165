//! Insertable snippet templates with ordered placeholders.
//!
//! Rendered to the TextMate/LSP snippet syntax: `${1:default}` for a
//! placeholder, `${2|a,b|}` for a closed choice and `${3:...}` wrapping a
//! nested snippet.

use serde::{Serialize, Serializer};

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SnippetPart {
    Text(String),
    Placeholder { index: u32, default: String },
    Choice { index: u32, values: Vec<String> },
    /// A placeholder whose default is itself a snippet.
    Group { index: u32, body: Snippet },
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Snippet {
    parts: Vec<SnippetPart>,
}

impl Snippet {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn text(mut self, text: impl Into<String>) -> Self {
        self.parts.push(SnippetPart::Text(text.into()));
        self
    }

    pub fn placeholder(mut self, index: u32, default: impl Into<String>) -> Self {
        self.parts.push(SnippetPart::Placeholder {
            index,
            default: default.into(),
        });
        self
    }

    /// An empty placeholder, i.e. a bare tab stop.
    pub fn tabstop(self, index: u32) -> Self {
        self.placeholder(index, "")
    }

    pub fn choice(mut self, index: u32, values: &[&str]) -> Self {
        self.parts.push(SnippetPart::Choice {
            index,
            values: values.iter().map(|v| v.to_string()).collect(),
        });
        self
    }

    pub fn group(mut self, index: u32, body: Snippet) -> Self {
        self.parts.push(SnippetPart::Group { index, body });
        self
    }

    /// Splice the parts of `other` onto the end.
    pub fn append(mut self, other: Snippet) -> Self {
        self.parts.extend(other.parts);
        self
    }

    /// Whether the snippet is literal text with no slots.
    pub fn is_plain(&self) -> bool {
        self.parts.iter().all(|p| matches!(p, SnippetPart::Text(_)))
    }

    /// Slot indices in the order they appear, nested slots included.
    pub fn placeholders(&self) -> Vec<u32> {
        let mut out = Vec::new();
        for part in &self.parts {
            match part {
                SnippetPart::Text(_) => {}
                SnippetPart::Placeholder { index, .. } | SnippetPart::Choice { index, .. } => {
                    out.push(*index)
                }
                SnippetPart::Group { index, body } => {
                    out.push(*index);
                    out.extend(body.placeholders());
                }
            }
        }
        out
    }

    /// The closed value set offered at slot `index`, if that slot is a choice.
    pub fn choices(&self, index: u32) -> Option<&[String]> {
        self.parts.iter().find_map(|part| match part {
            SnippetPart::Choice { index: i, values } if *i == index => Some(values.as_slice()),
            SnippetPart::Group { body, .. } => body.choices(index),
            _ => None,
        })
    }

    pub fn render(&self) -> String {
        let mut out = String::new();
        for part in &self.parts {
            match part {
                SnippetPart::Text(text) => out.push_str(&escape(text, &['\\', '$'])),
                SnippetPart::Placeholder { index, default } if default.is_empty() => {
                    out.push_str(&format!("${{{index}}}"));
                }
                SnippetPart::Placeholder { index, default } => {
                    let default = escape(default, &['\\', '$', '}']);
                    out.push_str(&format!("${{{index}:{default}}}"));
                }
                SnippetPart::Choice { index, values } => {
                    let values: Vec<String> = values
                        .iter()
                        .map(|v| escape(v, &['\\', ',', '|']))
                        .collect();
                    out.push_str(&format!("${{{index}|{}|}}", values.join(",")));
                }
                SnippetPart::Group { index, body } => {
                    out.push_str(&format!("${{{index}:{}}}", body.render()));
                }
            }
        }
        out
    }

    /// The text inserted when every slot keeps its default (first choice for
    /// choice slots).
    pub fn plain_text(&self) -> String {
        let mut out = String::new();
        for part in &self.parts {
            match part {
                SnippetPart::Text(text) | SnippetPart::Placeholder { default: text, .. } => {
                    out.push_str(text)
                }
                SnippetPart::Choice { values, .. } => {
                    out.push_str(values.first().map(String::as_str).unwrap_or_default())
                }
                SnippetPart::Group { body, .. } => out.push_str(&body.plain_text()),
            }
        }
        out
    }
}

impl Serialize for Snippet {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(&self.render())
    }
}

fn escape(text: &str, special: &[char]) -> String {
    let mut out = String::with_capacity(text.len());
    for c in text.chars() {
        if special.contains(&c) {
            out.push('\\');
        }
        out.push(c);
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn renders_placeholders_and_choices() {
        let snippet = Snippet::new()
            .text("MaxNumberOfOperation(")
            .placeholder(1, "0")
            .text(" per ")
            .choice(2, &["Second", "Hour"])
            .text(")");
        assert_eq!(snippet.render(), "MaxNumberOfOperation(${1:0} per ${2|Second,Hour|})");
        assert_eq!(snippet.placeholders(), vec![1, 2]);
        assert_eq!(snippet.choices(2).map(|c| c.len()), Some(2));
        assert!(snippet.choices(1).is_none());
        assert_eq!(snippet.plain_text(), "MaxNumberOfOperation(0 per Second)");
    }

    #[test]
    fn nested_groups_render_inside_their_slot() {
        let snippet = Snippet::new()
            .text("onBreach(")
            .group(1, Snippet::new().text("log(\"").tabstop(2).text("\")"))
            .text(")");
        assert_eq!(snippet.render(), "onBreach(${1:log(\"${2}\")})");
        assert_eq!(snippet.placeholders(), vec![1, 2]);
    }

    #[test]
    fn special_characters_are_escaped() {
        let snippet = Snippet::new()
            .text("cost $5 ")
            .placeholder(1, "a}b")
            .choice(2, &["x,y", "z|w"]);
        assert_eq!(snippet.render(), "cost \\$5 ${1:a\\}b}${2|x\\,y,z\\|w|}");
    }

    #[test]
    fn plain_snippets_have_no_slots() {
        let snippet = Snippet::new().text("variables {\n}");
        assert!(snippet.is_plain());
        assert!(snippet.placeholders().is_empty());
    }
}
