//! Line-oriented parser for the OKR document grammar.
//!
//! The parser is strict about key results (an item that looks like one must parse
//! completely) and lenient about everything that is not OKR data: the preamble before
//! the first heading, HTML comments and fenced code blocks are skipped.

use std::borrow::Cow;
use std::sync::LazyLock;

use regex::Regex;

use super::source_map::{KeyResultSpan, ObjectiveSpan, ParsedDocument, SourceMap};
use crate::error::{ParseError, ParseErrorKind};
use crate::models::{KeyResult, Objective};

/// Name reported for errors that occur before the first heading.
const NO_OBJECTIVE: &str = "(none)";

/// List items indented at least this far belong to the previous key result.
const NESTED_INDENT: usize = 2;

static HEADING_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^ {0,3}#{1,6}(?:[ \t]+(.*))?$").expect("valid heading regex"));
static LIST_ITEM_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^([ \t]*)[-*+][ \t]+(.*)$").expect("valid list item regex"));
static KEY_RESULT_ID_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^\[([^\]]*)\][ \t]*(.*)$").expect("valid key result id regex"));
static PROGRESS_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(
        r"^(.*?)(?:[ \t]*[—–:][ \t]*|[ \t]+-[ \t]+)([^\s/]+)(?:[ \t]*/[ \t]*|[ \t]+of[ \t]+)(\S+)[ \t]*$",
    )
    .expect("valid progress regex")
});
static SECTION_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?i)^(contributors|comments)[ \t]*(?::[ \t]*(.*))?$").expect("valid section regex")
});

/// Parse a whole document into objectives plus the positions needed for in-place edits.
///
/// A document without headings is valid and yields no objectives.
pub fn parse_document(source: &str) -> Result<ParsedDocument, ParseError> {
    let mut parser = Parser::default();
    // A leading byte order mark is kept in the text but is not part of the first line.
    let (body, mut offset) = match source.strip_prefix('\u{feff}') {
        Some(rest) => (rest, source.len() - rest.len()),
        None => (source, 0),
    };

    for (index, raw) in body.split_inclusive('\n').enumerate() {
        let content = raw.trim_end_matches('\n').trim_end_matches('\r');
        parser.line(index + 1, offset, content)?;
        offset += raw.len();
    }

    parser.finish()
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Section {
    Contributors,
    Comments,
}

#[derive(Debug, Default)]
enum Block {
    #[default]
    None,
    HtmlComment {
        line: usize,
    },
    Fence {
        marker: &'static str,
        line: usize,
    },
}

/// An objective still being assembled.
struct Draft {
    objective: Objective,
    span: ObjectiveSpan,
    paragraphs: Vec<String>,
    paragraph: Vec<String>,
    /// Open contributors/comments section and the indent of its header item.
    section: Option<(Section, usize)>,
    /// Whether an indented text line may continue the last comment.
    comment_open: bool,
}

impl Draft {
    fn new(name: String, line: usize) -> Self {
        Self {
            objective: Objective::new(name.clone()),
            span: ObjectiveSpan {
                name,
                first_line: line,
                last_line: line,
                key_results: Vec::new(),
            },
            paragraphs: Vec::new(),
            paragraph: Vec::new(),
            section: None,
            comment_open: false,
        }
    }

    fn flush_paragraph(&mut self) {
        if !self.paragraph.is_empty() {
            self.paragraphs.push(self.paragraph.join(" "));
            self.paragraph.clear();
        }
    }

    fn into_parts(mut self) -> (Objective, ObjectiveSpan) {
        self.flush_paragraph();
        self.objective.description = self.paragraphs.join("\n\n");
        (self.objective, self.span)
    }
}

#[derive(Default)]
struct Parser {
    objectives: Vec<Objective>,
    spans: Vec<ObjectiveSpan>,
    draft: Option<Draft>,
    block: Block,
}

impl Parser {
    fn error(&self, line: usize, kind: ParseErrorKind) -> ParseError {
        let objective = self
            .draft
            .as_ref()
            .map(|d| d.objective.name.clone())
            .unwrap_or_else(|| NO_OBJECTIVE.to_string());
        ParseError {
            objective,
            line,
            kind,
        }
    }

    fn line(&mut self, line: usize, offset: usize, raw: &str) -> Result<(), ParseError> {
        match self.block {
            Block::HtmlComment { .. } => {
                self.touch(line, raw);
                if raw.contains("-->") {
                    self.block = Block::None;
                }
                return Ok(());
            }
            Block::Fence { marker, .. } => {
                self.touch(line, raw);
                if raw.trim().starts_with(marker) {
                    self.block = Block::None;
                }
                return Ok(());
            }
            Block::None => {}
        }

        let (content, opens_comment) = blank_inline_comments(raw);
        if content.trim().is_empty() && !raw.trim().is_empty() {
            // Nothing but comments on this line.
            self.touch(line, raw);
            if opens_comment {
                self.block = Block::HtmlComment { line };
            }
            return Ok(());
        }

        self.content_line(line, offset, &content)?;
        if opens_comment {
            self.block = Block::HtmlComment { line };
        }
        Ok(())
    }

    /// Extend the open objective's span to `line` if it has any text.
    fn touch(&mut self, line: usize, raw: &str) {
        if raw.trim().is_empty() {
            return;
        }
        if let Some(draft) = self.draft.as_mut() {
            draft.span.last_line = line;
        }
    }

    /// Handle a line with inline comments already blanked out. `content` has the same
    /// byte length as the source line, so offsets into it are offsets into the document.
    fn content_line(&mut self, line: usize, offset: usize, content: &str) -> Result<(), ParseError> {
        let trimmed = content.trim();
        let heading = HEADING_RE.captures(content);
        if heading.is_none() {
            self.touch(line, content);
        }

        for marker in ["```", "~~~"] {
            if trimmed.starts_with(marker) {
                self.block = Block::Fence { marker, line };
                return Ok(());
            }
        }

        if let Some(caps) = heading {
            let text = heading_text(caps.get(1).map_or("", |m| m.as_str()));
            return self.heading(line, text);
        }

        let Some(draft) = self.draft.as_mut() else {
            // Preamble before the first objective.
            return Ok(());
        };

        if trimmed.is_empty() {
            draft.flush_paragraph();
            return Ok(());
        }

        if is_thematic_break(trimmed) {
            return Ok(());
        }

        if let Some(caps) = LIST_ITEM_RE.captures(content) {
            let indent = indent_width(&caps[1]);
            let item = caps.get(2).expect("list item text group");
            if indent < NESTED_INDENT {
                return self.key_result(line, offset + item.start(), item.as_str());
            }
            return self.nested_item(line, indent, item.as_str().trim());
        }

        if draft.objective.key_results.is_empty() {
            draft.paragraph.push(trimmed.to_string());
            return Ok(());
        }

        if draft.comment_open && indent_width(content) >= NESTED_INDENT {
            if let Some(last) = draft
                .objective
                .key_results
                .last_mut()
                .and_then(|kr| kr.comments.last_mut())
            {
                last.push(' ');
                last.push_str(trimmed);
                return Ok(());
            }
        }

        Err(self.error(line, ParseErrorKind::UnexpectedText(trimmed.to_string())))
    }

    fn heading(&mut self, line: usize, text: &str) -> Result<(), ParseError> {
        if text.is_empty() {
            return Err(self.error(line, ParseErrorKind::EmptyObjectiveName));
        }
        self.finish_draft();
        if self.objectives.iter().any(|o| o.name == text) {
            return Err(ParseError {
                objective: text.to_string(),
                line,
                kind: ParseErrorKind::DuplicateObjective,
            });
        }

        self.draft = Some(Draft::new(text.to_string(), line));
        Ok(())
    }

    /// Parse `[id] Name — current/target`. `text_offset` is the byte offset of `text`
    /// within the whole document.
    fn key_result(&mut self, line: usize, text_offset: usize, text: &str) -> Result<(), ParseError> {
        let Some(id_caps) = KEY_RESULT_ID_RE.captures(text) else {
            return Err(self.error(line, ParseErrorKind::MissingId));
        };
        let id = id_caps[1].trim().to_string();
        if id.is_empty() {
            return Err(self.error(line, ParseErrorKind::MissingId));
        }
        let rest = id_caps.get(2).expect("key result rest group");

        let Some(progress) = PROGRESS_RE.captures(rest.as_str()) else {
            return Err(self.error(line, ParseErrorKind::MissingProgress(id)));
        };
        let name = progress[1].trim().to_string();
        if name.is_empty() {
            return Err(self.error(line, ParseErrorKind::EmptyKeyResultName(id)));
        }

        let current_match = progress.get(2).expect("current group");
        let current = parse_number(current_match.as_str(), "current")
            .map_err(|kind| self.error(line, kind))?;
        let target = parse_number(&progress[3], "target").map_err(|kind| self.error(line, kind))?;
        if current > target {
            return Err(self.error(
                line,
                ParseErrorKind::CurrentExceedsTarget { current, target },
            ));
        }

        let start = text_offset + rest.start() + current_match.start();
        let end = text_offset + rest.start() + current_match.end();

        let duplicate = self
            .draft
            .as_ref()
            .is_some_and(|d| d.objective.find_key_result(&id).is_some());
        if duplicate {
            return Err(self.error(line, ParseErrorKind::DuplicateKeyResult(id)));
        }

        let draft = self.draft.as_mut().expect("key results only parse inside an objective");
        draft.flush_paragraph();
        draft.section = None;
        draft.comment_open = false;
        draft.span.key_results.push(KeyResultSpan {
            id: id.clone(),
            line,
            current: start..end,
        });
        draft
            .objective
            .key_results
            .push(KeyResult::new(id, name, current, target));
        Ok(())
    }

    fn nested_item(&mut self, line: usize, indent: usize, text: &str) -> Result<(), ParseError> {
        let unexpected = || ParseErrorKind::UnexpectedListItem(text.to_string());
        let draft = self.draft.as_mut().expect("nested items only parse inside an objective");

        let Some(key_result) = draft.objective.key_results.last_mut() else {
            return Err(self.error(line, unexpected()));
        };

        if let Some(caps) = SECTION_RE.captures(text) {
            let section = if caps[1].eq_ignore_ascii_case("contributors") {
                Section::Contributors
            } else {
                Section::Comments
            };
            draft.section = Some((section, indent));
            draft.comment_open = false;

            let inline = caps.get(2).map(|m| m.as_str().trim()).unwrap_or("");
            if !inline.is_empty() {
                match section {
                    Section::Contributors => inline
                        .split(',')
                        .map(str::trim)
                        .filter(|name| !name.is_empty())
                        .for_each(|name| key_result.add_contributor(name)),
                    Section::Comments => {
                        key_result.comments.push(inline.to_string());
                        draft.comment_open = true;
                    }
                }
            }
            return Ok(());
        }

        let section = draft.section;
        match section {
            Some((Section::Contributors, header_indent)) if indent > header_indent => {
                key_result.add_contributor(text);
                draft.comment_open = false;
                Ok(())
            }
            Some((Section::Comments, header_indent)) if indent > header_indent => {
                key_result.comments.push(text.to_string());
                draft.comment_open = true;
                Ok(())
            }
            _ => Err(self.error(line, unexpected())),
        }
    }

    fn finish_draft(&mut self) {
        if let Some(draft) = self.draft.take() {
            let (objective, span) = draft.into_parts();
            self.objectives.push(objective);
            self.spans.push(span);
        }
    }

    fn finish(mut self) -> Result<ParsedDocument, ParseError> {
        match self.block {
            Block::HtmlComment { line } => {
                return Err(self.error(line, ParseErrorKind::Unterminated("HTML comment")));
            }
            Block::Fence { line, .. } => {
                return Err(self.error(line, ParseErrorKind::Unterminated("code block")));
            }
            Block::None => {}
        }

        self.finish_draft();
        Ok(ParsedDocument {
            objectives: self.objectives,
            source_map: SourceMap {
                objectives: self.spans,
            },
        })
    }
}

fn parse_number(raw: &str, field: &'static str) -> Result<u64, ParseErrorKind> {
    if !raw.bytes().all(|b| b.is_ascii_digit()) {
        return Err(ParseErrorKind::InvalidNumber {
            field,
            value: raw.to_string(),
        });
    }
    raw.parse().map_err(|_| ParseErrorKind::InvalidNumber {
        field,
        value: raw.to_string(),
    })
}

/// Heading text with an optional closing `#` sequence removed.
fn heading_text(raw: &str) -> &str {
    let text = raw.trim();
    let stripped = text.trim_end_matches('#');
    if stripped.len() == text.len() {
        text
    } else if stripped.is_empty() {
        ""
    } else if stripped.ends_with([' ', '\t']) {
        stripped.trim_end()
    } else {
        text
    }
}

/// Replace every `<!-- … -->` run with spaces of the same byte length.
///
/// Returns `true` when a comment opens on this line without closing.
fn blank_inline_comments(line: &str) -> (Cow<'_, str>, bool) {
    if !line.contains("<!--") {
        return (Cow::Borrowed(line), false);
    }

    let mut output = String::with_capacity(line.len());
    let mut rest = line;
    while let Some(start) = rest.find("<!--") {
        output.push_str(&rest[..start]);
        let Some(close) = rest[start + 4..].find("-->") else {
            output.extend(std::iter::repeat(' ').take(rest.len() - start));
            return (Cow::Owned(output), true);
        };
        let len = 4 + close + 3;
        output.extend(std::iter::repeat(' ').take(len));
        rest = &rest[start + len..];
    }
    output.push_str(rest);
    (Cow::Owned(output), false)
}

/// `---`, `***` or `___`, optionally spaced.
fn is_thematic_break(trimmed: &str) -> bool {
    let marks: Vec<char> = trimmed.chars().filter(|c| !c.is_whitespace()).collect();
    marks.len() >= 3
        && matches!(marks[0], '-' | '*' | '_')
        && marks.iter().all(|c| *c == marks[0])
}

/// Leading whitespace width in columns, tabs counting as four.
fn indent_width(line: &str) -> usize {
    line.chars()
        .take_while(|c| *c == ' ' || *c == '\t')
        .map(|c| if c == '\t' { 4 } else { 1 })
        .sum()
}
