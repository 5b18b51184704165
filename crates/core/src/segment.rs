//! Line segmentation into code, string literals and comments.
//!
//! There is no tokenizer for the DSL; the scanner and the formatter only
//! need to know whether a stretch of a line is code. Markers are ASCII, so
//! all scanning is done on bytes and slices stay on char boundaries.

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SegmentKind {
    Code,
    /// A `"..."` literal, quotes included. Unterminated literals run to end of line.
    Str,
    /// `//` through end of line.
    LineComment,
    /// `/* ... */`, or the part of a multi-line block comment on this line.
    BlockComment,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Segment<'a> {
    pub kind: SegmentKind,
    pub text: &'a str,
}

/// Splits lines into segments, remembering an open block comment
/// from one line to the next.
#[derive(Debug, Default)]
pub struct Segmenter {
    in_block: bool,
}

impl Segmenter {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn in_block_comment(&self) -> bool {
        self.in_block
    }

    pub fn split<'a>(&mut self, line: &'a str) -> Vec<Segment<'a>> {
        let bytes = line.as_bytes();
        let mut segments = Vec::new();
        let mut start = 0;
        let mut i = 0;

        if self.in_block {
            match find(bytes, 0, b"*/") {
                Some(p) => {
                    push(&mut segments, SegmentKind::BlockComment, &line[..p + 2]);
                    self.in_block = false;
                    start = p + 2;
                    i = start;
                }
                None => {
                    push(&mut segments, SegmentKind::BlockComment, line);
                    return segments;
                }
            }
        }

        while i < bytes.len() {
            if bytes[i] == b'"' {
                push(&mut segments, SegmentKind::Code, &line[start..i]);
                let end = bytes[i + 1..]
                    .iter()
                    .position(|&b| b == b'"')
                    .map_or(bytes.len(), |p| i + 1 + p + 1);
                push(&mut segments, SegmentKind::Str, &line[i..end]);
                start = end;
                i = end;
                continue;
            }
            if bytes[i..].starts_with(b"//") {
                push(&mut segments, SegmentKind::Code, &line[start..i]);
                push(&mut segments, SegmentKind::LineComment, &line[i..]);
                return segments;
            }
            if bytes[i..].starts_with(b"/*") {
                push(&mut segments, SegmentKind::Code, &line[start..i]);
                match find(bytes, i + 2, b"*/") {
                    Some(p) => {
                        push(&mut segments, SegmentKind::BlockComment, &line[i..p + 2]);
                        start = p + 2;
                        i = start;
                        continue;
                    }
                    None => {
                        push(&mut segments, SegmentKind::BlockComment, &line[i..]);
                        self.in_block = true;
                        return segments;
                    }
                }
            }
            i += 1;
        }
        push(&mut segments, SegmentKind::Code, &line[start..]);
        segments
    }
}

fn push<'a>(segments: &mut Vec<Segment<'a>>, kind: SegmentKind, text: &'a str) {
    if !text.is_empty() {
        segments.push(Segment { kind, text });
    }
}

fn find(haystack: &[u8], from: usize, needle: &[u8]) -> Option<usize> {
    haystack
        .get(from..)?
        .windows(needle.len())
        .position(|w| w == needle)
        .map(|p| p + from)
}

/// Whether the end of `prefix` lies in code: no open string literal, no
/// line comment and no unterminated block comment on the line so far.
///
/// A stray `*/` is taken to close a comment opened on an earlier line,
/// so whatever follows it counts as code.
pub fn is_code_prefix(prefix: &str) -> bool {
    let bytes = prefix.as_bytes();
    let mut in_str = false;
    let mut in_block = false;
    let mut i = 0;
    while i < bytes.len() {
        let rest = &bytes[i..];
        if in_str {
            in_str = rest[0] != b'"';
        } else if in_block {
            if rest.starts_with(b"*/") {
                in_block = false;
                i += 2;
                continue;
            }
        } else if rest[0] == b'"' {
            in_str = true;
        } else if rest.starts_with(b"//") {
            return false;
        } else if rest.starts_with(b"/*") {
            in_block = true;
            i += 2;
            continue;
        }
        i += 1;
    }
    !in_str && !in_block
}

/// Concatenated text of the code segments of `line`, strings and comments removed.
pub fn code_only(segmenter: &mut Segmenter, line: &str) -> String {
    segmenter
        .split(line)
        .into_iter()
        .filter(|s| s.kind == SegmentKind::Code)
        .map(|s| s.text)
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn kinds(line: &str) -> Vec<(SegmentKind, &str)> {
        Segmenter::new()
            .split(line)
            .into_iter()
            .map(|s| (s.kind, s.text))
            .collect()
    }

    #[test]
    fn splits_strings_and_line_comments() {
        assert_eq!(
            kinds(r#"a = "x { y" // note"#),
            vec![
                (SegmentKind::Code, "a = "),
                (SegmentKind::Str, "\"x { y\""),
                (SegmentKind::Code, " "),
                (SegmentKind::LineComment, "// note"),
            ]
        );
    }

    #[test]
    fn comment_markers_inside_strings_are_not_comments() {
        assert_eq!(
            kinds(r#"url = "http://host""#),
            vec![
                (SegmentKind::Code, "url = "),
                (SegmentKind::Str, "\"http://host\""),
            ]
        );
    }

    #[test]
    fn block_comment_state_carries_across_lines() {
        let mut seg = Segmenter::new();
        let first = seg.split("x /* start");
        assert_eq!(first.last().map(|s| s.kind), Some(SegmentKind::BlockComment));
        assert!(seg.in_block_comment());
        let middle = seg.split("still { comment");
        assert_eq!(middle.len(), 1);
        assert_eq!(middle[0].kind, SegmentKind::BlockComment);
        let last = seg.split("end */ y {");
        assert_eq!(last[0].text, "end */");
        assert_eq!(last[1], Segment { kind: SegmentKind::Code, text: " y {" });
        assert!(!seg.in_block_comment());
    }

    #[test]
    fn unterminated_string_runs_to_end_of_line() {
        assert_eq!(
            kinds(r#"a = "open"#),
            vec![(SegmentKind::Code, "a = "), (SegmentKind::Str, "\"open")]
        );
    }

    #[test]
    fn code_prefix_detection() {
        assert!(is_code_prefix("  "));
        assert!(is_code_prefix(r#"x = "a" "#));
        assert!(!is_code_prefix(r#"x = ""#));
        assert!(!is_code_prefix("// "));
        assert!(!is_code_prefix("/* "));
        assert!(is_code_prefix("/* done */ "));
        assert!(is_code_prefix("*/ "));
    }
}
