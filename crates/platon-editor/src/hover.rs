//! Keyword documentation on hover

use serde::Serialize;

use crate::links::{Position, Range};

/// `(keyword, description, documentation path)`
const KEYWORDS: &[(&str, &str, &str)] = &[
    (
        "grader",
        "Defines a grader block.",
        "docs/main/programing/exercise/workflow#%C3%A9valuation-grader",
    ),
    (
        "builder",
        "Defines a builder block.",
        "docs/main/programing/exercise/workflow#construction-builder",
    ),
    (
        "extends",
        "Extends a resource.",
        "docs/main/programing/exercise/langage#h%C3%A9ritage-et-composition",
    ),
    (
        "copyurl",
        "Copies the file's URL in the variable.",
        "docs/main/programing/exercise/langage#r%C3%A9f%C3%A9rences-de-fichiers",
    ),
    (
        "copycontent",
        "Copies the file's content in the variable.",
        "docs/main/programing/exercise/langage#r%C3%A9f%C3%A9rences-de-fichiers",
    ),
    (
        "include",
        "Includes a file in the sandbox environment.",
        "docs/main/programing/exercise/langage#inclusion-de-fichiers",
    ),
    (
        "theories",
        "Array of pedagogical resources for the student.",
        "docs/main/doc/programing/exercise/theories",
    ),
    (
        "hint",
        "Array or Object for the hints.",
        "docs/main/programing/exercise/workflow#environnement-dex%C3%A9cution--sandbox",
    ),
    (
        "sandbox",
        "Sandbox environment `python` or `node`.",
        "docs/main/programing/exercise/workflow#environnement-dex%C3%A9cution--sandbox",
    ),
];

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Hover {
    /// Markdown
    pub contents: String,
    pub range: Range,
}

/// Markdown documentation of `word`, if it is a known keyword.
pub fn hover(word: &str, docs_base: &str) -> Option<String> {
    let (_, description, path) = KEYWORDS.iter().find(|(keyword, _, _)| *keyword == word)?;
    let base = docs_base.trim_end_matches('/');
    Some(format!("{description}\n\n[documentation]({base}/{path})"))
}

fn is_word_char(c: char) -> bool {
    c.is_alphanumeric() || c == '_'
}

/// Identifier touching `position`, with its range.
///
/// A cursor right after the last character still designates the word.
pub fn word_at(text: &str, position: Position) -> Option<(String, Range)> {
    let line = text.split('\n').nth(position.line as usize)?;
    let chars: Vec<char> = line.chars().collect();
    let cursor = position.character as usize;
    if cursor > chars.len() {
        return None;
    }

    let mut start = cursor;
    while start > 0 && is_word_char(chars[start - 1]) {
        start -= 1;
    }
    let mut end = cursor;
    while end < chars.len() && is_word_char(chars[end]) {
        end += 1;
    }
    if start == end {
        return None;
    }

    let word = chars[start..end].iter().collect();
    let range = Range {
        start: Position::new(position.line, start as u32),
        end: Position::new(position.line, end as u32),
    };
    Some((word, range))
}

/// Hover for the word under `position`.
pub fn hover_at(text: &str, position: Position, docs_base: &str) -> Option<Hover> {
    let (word, range) = word_at(text, position)?;
    let contents = hover(&word, docs_base)?;
    Some(Hover { contents, range })
}
