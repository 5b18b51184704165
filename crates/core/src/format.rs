//! Canonical formatting.
//!
//! Formatting runs in two phases. First an ordered list of named
//! normalization rules rewrites the lines; the order is part of the contract
//! (`brace_spacing` assumes `collapse_tabs` already ran, `break_after_operation`
//! expects the ` = ` that `tighten_equals` produces). Then every line is
//! reindented from its brace depth, two spaces per level.
//!
//! Line-local rules rewrite only code segments, or only comment segments for
//! `comment_spacing`; string literals are never touched.

use std::ops::Range;
use std::sync::LazyLock;

use regex::Regex;
use serde::Serialize;
use tracing::trace;

use crate::segment::{code_only, Segment, SegmentKind, Segmenter};
use crate::snapshot::{Position, Snapshot};

static TABS: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"\t+").unwrap());
static EQUALS: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"[ \t]*(==|[!<>]=|=)[ \t]*").unwrap());
static PAREN_OPEN: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"\([ \t]+").unwrap());
static PAREN_CLOSE: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"[ \t]+\)").unwrap());
static CALL_GAP: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"(\w)[ \t]+\(").unwrap());
static LINE_COMMENT: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^//[ \t]*([^\s/])").unwrap());
static BLOCK_OPEN: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^/\*[ \t]*([^\s*])").unwrap());
static BLOCK_CLOSE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"([^\s*/])[ \t]*\*/$").unwrap());
static BEFORE_OPEN_BRACE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"([^\s{])[ \t]*\{").unwrap());
static AFTER_OPEN_BRACE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\{[ \t]*([^\s}])").unwrap());
static BEFORE_CLOSE_BRACE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"([^\s{])[ \t]*\}").unwrap());
static OPERATION_VALUE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\boperation = \w+([ \t]+)\S").unwrap());
static TERMS: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"\bterms\b").unwrap());

/// A named normalization step over the whole document.
pub struct Rule {
    pub name: &'static str,
    apply: fn(Vec<String>) -> Vec<String>,
}

impl Rule {
    pub fn apply(&self, lines: Vec<String>) -> Vec<String> {
        (self.apply)(lines)
    }
}

/// Normalization rules in application order.
pub const RULES: &[Rule] = &[
    Rule {
        name: "collapse_tabs",
        apply: collapse_tabs,
    },
    Rule {
        name: "tighten_equals",
        apply: tighten_equals,
    },
    Rule {
        name: "tighten_parens",
        apply: tighten_parens,
    },
    Rule {
        name: "comment_spacing",
        apply: comment_spacing,
    },
    Rule {
        name: "brace_spacing",
        apply: brace_spacing,
    },
    Rule {
        name: "break_after_operation",
        apply: break_after_operation,
    },
    Rule {
        name: "collapse_terms_blank_lines",
        apply: collapse_terms_blank_lines,
    },
    Rule {
        name: "separate_sibling_blocks",
        apply: separate_sibling_blocks,
    },
];

/// A replacement of the text between `start` and `end`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct FormatEdit {
    pub start: Position,
    pub end: Position,
    pub new_text: String,
}

/// Format a whole document.
///
/// Blank input formats to the empty string; anything else ends with exactly
/// one newline and has no leading or trailing blank lines.
pub fn format_document(text: &str) -> String {
    if text.trim().is_empty() {
        return String::new();
    }

    let mut lines: Vec<String> = text
        .split('\n')
        .map(|l| l.strip_suffix('\r').unwrap_or(l).to_string())
        .collect();
    for rule in RULES {
        lines = rule.apply(lines);
        trace!(rule = rule.name, lines = lines.len(), "applied format rule");
    }

    let lines = collapse_blank_runs(reindent(lines));
    let first = lines.iter().position(|l| !l.is_empty()).unwrap_or(0);
    let last = lines.iter().rposition(|l| !l.is_empty()).map_or(0, |i| i + 1);

    let mut out = lines[first..last].join("\n");
    out.push('\n');
    out
}

/// Edits turning `text` into its formatted form: none when it is already
/// canonical, otherwise one replacement of the whole document.
pub fn format_edits(text: &str) -> Vec<FormatEdit> {
    let formatted = format_document(text);
    if formatted == text {
        return Vec::new();
    }
    vec![FormatEdit {
        start: Position::default(),
        end: Snapshot::new(text).end_position(),
        new_text: formatted,
    }]
}

/// Rewrite the segments of `wanted` kinds on every line.
fn rewrite_segments(
    lines: Vec<String>,
    wanted: &[SegmentKind],
    rewrite: impl Fn(&str) -> String,
) -> Vec<String> {
    let mut segmenter = Segmenter::new();
    lines
        .into_iter()
        .map(|line| {
            let rewritten: String = segmenter
                .split(&line)
                .into_iter()
                .map(|seg| {
                    if wanted.contains(&seg.kind) {
                        rewrite(seg.text)
                    } else {
                        seg.text.to_string()
                    }
                })
                .collect();
            rewritten
        })
        .collect()
}

fn collapse_tabs(lines: Vec<String>) -> Vec<String> {
    rewrite_segments(lines, &[SegmentKind::Code], |code| {
        TABS.replace_all(code, " ").into_owned()
    })
}

fn tighten_equals(lines: Vec<String>) -> Vec<String> {
    rewrite_segments(lines, &[SegmentKind::Code], |code| {
        EQUALS.replace_all(code, " $1 ").into_owned()
    })
}

fn tighten_parens(lines: Vec<String>) -> Vec<String> {
    rewrite_segments(lines, &[SegmentKind::Code], |code| {
        let code = PAREN_OPEN.replace_all(code, "(");
        let code = PAREN_CLOSE.replace_all(&code, ")");
        CALL_GAP.replace_all(&code, "${1}(").into_owned()
    })
}

fn comment_spacing(lines: Vec<String>) -> Vec<String> {
    rewrite_segments(
        lines,
        &[SegmentKind::LineComment, SegmentKind::BlockComment],
        |comment| {
            if comment.starts_with("//") {
                return LINE_COMMENT.replace(comment, "// ${1}").into_owned();
            }
            let comment = BLOCK_OPEN.replace(comment, "/* ${1}");
            BLOCK_CLOSE.replace(&comment, "${1} */").into_owned()
        },
    )
}

fn brace_spacing(lines: Vec<String>) -> Vec<String> {
    rewrite_segments(lines, &[SegmentKind::Code], |code| {
        let code = BEFORE_OPEN_BRACE.replace_all(code, "${1} {");
        let code = AFTER_OPEN_BRACE.replace_all(&code, "{ ${1}");
        BEFORE_CLOSE_BRACE.replace_all(&code, "${1} }").into_owned()
    })
}

/// The whitespace after `operation = value` when more code follows on the line.
fn operation_gap(segments: &[Segment<'_>]) -> Option<Range<usize>> {
    let mut offset = 0;
    for seg in segments {
        if seg.kind == SegmentKind::Code {
            if let Some(gap) = OPERATION_VALUE.captures(seg.text).and_then(|c| c.get(1)) {
                return Some(offset + gap.start()..offset + gap.end());
            }
        }
        offset += seg.text.len();
    }
    None
}

fn break_after_operation(lines: Vec<String>) -> Vec<String> {
    let mut out = Vec::with_capacity(lines.len());
    let mut segmenter = Segmenter::new();
    for line in lines {
        // Split pieces start in code, so they get a fresh segmenter.
        let mut gap = operation_gap(&segmenter.split(&line));
        let mut current = line;
        while let Some(range) = gap {
            let rest = current[range.end..].to_string();
            current.truncate(range.start);
            out.push(current);
            gap = operation_gap(&Segmenter::new().split(&rest));
            current = rest;
        }
        out.push(current);
    }
    out
}

fn net_braces(code: &str) -> i64 {
    code.chars().fold(0, |net, c| match c {
        '{' => net + 1,
        '}' => net - 1,
        _ => net,
    })
}

fn collapse_terms_blank_lines(lines: Vec<String>) -> Vec<String> {
    let mut out = Vec::with_capacity(lines.len());
    let mut segmenter = Segmenter::new();
    // Brace depth relative to the enclosing `terms` line.
    let mut depth: Option<i64> = None;
    let mut previous_blank = false;
    for line in lines {
        if line.trim().is_empty() {
            if !(depth.is_some() && previous_blank) {
                out.push(line);
            }
            previous_blank = true;
            continue;
        }
        previous_blank = false;
        let code = code_only(&mut segmenter, &line);
        let net = net_braces(&code);
        depth = match depth {
            Some(d) => Some(d + net).filter(|d| *d > 0),
            None if TERMS.is_match(&code) && code.contains('{') => Some(net).filter(|d| *d > 0),
            None => None,
        };
        out.push(line);
    }
    out
}

fn separate_sibling_blocks(lines: Vec<String>) -> Vec<String> {
    let mut out = Vec::with_capacity(lines.len());
    let mut segmenter = Segmenter::new();
    let mut after_close = false;
    for line in lines {
        if line.trim().is_empty() {
            after_close = false;
            out.push(line);
            continue;
        }
        let in_comment = segmenter.in_block_comment();
        let code = code_only(&mut segmenter, &line);
        let code = code.trim();
        if after_close && !in_comment && !code.is_empty() && !code.starts_with('}') {
            out.push(String::new());
        }
        after_close = code.ends_with('}');
        out.push(line);
    }
    out
}

/// `}` before the first `{`, and the net brace count of the line.
fn brace_counts(code: &str) -> (usize, i64) {
    let leading = code
        .chars()
        .take_while(|&c| c != '{')
        .filter(|&c| c == '}')
        .count();
    (leading, net_braces(code))
}

fn reindent(lines: Vec<String>) -> Vec<String> {
    let mut segmenter = Segmenter::new();
    let mut depth: usize = 0;
    lines
        .into_iter()
        .map(|line| {
            let in_comment = segmenter.in_block_comment();
            let code = code_only(&mut segmenter, &line);
            let (dedent, net) = brace_counts(&code);
            let own = depth.saturating_sub(dedent);
            depth = (depth as i64 + net).max(0) as usize;

            let trimmed = line.trim();
            if trimmed.is_empty() {
                String::new()
            } else if in_comment {
                // Block comment continuation keeps its own alignment.
                line.trim_end().to_string()
            } else {
                format!("{}{}", "  ".repeat(own), trimmed)
            }
        })
        .collect()
}

/// Runs of three or more blank lines become a single blank line.
fn collapse_blank_runs(lines: Vec<String>) -> Vec<String> {
    let mut out: Vec<String> = Vec::with_capacity(lines.len());
    let mut run = 0;
    for line in lines {
        if line.is_empty() {
            run += 1;
            continue;
        }
        let keep = if run >= 3 { 1 } else { run };
        out.extend(std::iter::repeat_n(String::new(), keep));
        run = 0;
        out.push(line);
    }
    out.extend(std::iter::repeat_n(String::new(), run.min(1)));
    out
}

#[cfg(test)]
mod tests {
    use super::*;

    fn rule(name: &str, text: &str) -> String {
        let rule = RULES.iter().find(|r| r.name == name).unwrap();
        let lines = text.split('\n').map(String::from).collect();
        rule.apply(lines).join("\n")
    }

    const MESSY: &str = "contract Sale{\n\tvariables {\n\t\tprice=\"10\"\n\t}\n\tdates {\n\
        \tbeginDate=2024-01-01 10:00:00\n\t}\n\tparties {\n\t\tapplication = \"App\"\n\
        \t\tprocess   =   \"Proc\"\n\t}\n\tclauses {\n\t\tright Pay {\n\
        \t\t\trolePlayer=application\n\t\t\toperation=request terms {\n\n\n\
        \t\t\t\tTimeout( 180 )\n\t\t\t}\n\t\t}\n\t}\n}\n\n";

    const CANONICAL: &str = "\
contract Sale {
  variables {
    price = \"10\"
  }

  dates {
    beginDate = 2024-01-01 10:00:00
  }

  parties {
    application = \"App\"
    process = \"Proc\"
  }

  clauses {
    right Pay {
      rolePlayer = application
      operation = request
      terms {

        Timeout(180)
      }
    }
  }
}
";

    #[test]
    fn formats_to_canonical_layout() {
        assert_eq!(format_document(MESSY), CANONICAL);
    }

    #[test]
    fn formatting_is_idempotent() {
        assert_eq!(format_document(CANONICAL), CANONICAL);
        let once = format_document(MESSY);
        assert_eq!(format_document(&once), once);
    }

    #[test]
    fn leading_stray_brace_never_goes_negative() {
        let formatted = format_document("}\ncontract C {\nx = 1\n}");
        assert_eq!(formatted, "}\n\ncontract C {\n  x = 1\n}\n");
    }

    #[test]
    fn one_line_blocks_keep_their_depth() {
        let formatted = format_document("right A {\nterms {Timeout(1)}\nrolePlayer = process\n}");
        assert_eq!(
            formatted,
            "right A {\n  terms { Timeout(1) }\n\n  rolePlayer = process\n}\n"
        );
    }

    #[test]
    fn string_literals_are_not_rewritten() {
        let formatted = format_document("terms {\nMessageContent( \"a=b ( x ){\" )\n}");
        assert_eq!(formatted, "terms {\n  MessageContent(\"a=b ( x ){\")\n}\n");
    }

    #[test]
    fn comment_markers_get_one_space() {
        assert_eq!(rule("comment_spacing", "x //note"), "x // note");
        assert_eq!(rule("comment_spacing", "/*note*/ x = 1"), "/* note */ x = 1");
        assert_eq!(rule("comment_spacing", "//   spaced"), "// spaced");
    }

    #[test]
    fn block_comment_continuations_keep_alignment() {
        let formatted = format_document("dates {\n/* first\n      second */\n}");
        assert_eq!(formatted, "dates {\n  /* first\n      second */\n}\n");
    }

    #[test]
    fn equals_are_spaced_and_parens_tightened() {
        assert_eq!(rule("tighten_equals", "a=b\tc  ==  d"), "a = b\tc == d");
        assert_eq!(rule("tighten_parens", "Timeout (  180 )"), "Timeout(180)");
    }

    #[test]
    fn brace_spacing_inserts_a_single_space() {
        assert_eq!(rule("brace_spacing", "dates{"), "dates {");
        assert_eq!(rule("brace_spacing", "dates    {"), "dates {");
        assert_eq!(rule("brace_spacing", "parties {}"), "parties {}");
    }

    #[test]
    fn operation_value_ends_its_line() {
        assert_eq!(
            rule("break_after_operation", "  operation = push terms {"),
            "  operation = push\nterms {"
        );
        assert_eq!(
            rule("break_after_operation", "operation = read // last"),
            "operation = read // last"
        );
    }

    #[test]
    fn blank_lines_collapse_only_inside_terms() {
        let text = "a {\n\n\nterms {\n\n\nTimeout(1)\n}\n\n\nb";
        assert_eq!(
            rule("collapse_terms_blank_lines", text),
            "a {\n\n\nterms {\n\nTimeout(1)\n}\n\n\nb"
        );
    }

    #[test]
    fn long_blank_runs_collapse_to_one() {
        let formatted = format_document("a\n\n\n\n\nb\n\n\nc");
        assert_eq!(formatted, "a\n\nb\n\n\nc\n");
    }

    #[test]
    fn empty_input_formats_to_empty_output() {
        assert_eq!(format_document(""), "");
        assert_eq!(format_document(" \n\t\n"), "");
        assert!(format_edits("").is_empty());
    }

    #[test]
    fn canonical_text_needs_no_edit() {
        assert!(format_edits(CANONICAL).is_empty());
        let edits = format_edits("a{\n}");
        assert_eq!(edits.len(), 1);
        assert_eq!(edits[0].end, Position::new(1, 1));
        assert_eq!(edits[0].new_text, "a {\n}\n");
    }
}
