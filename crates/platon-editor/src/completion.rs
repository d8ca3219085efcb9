//! Completion of reserved variable names

use serde::Serialize;

/// Variables with a meaning for the exercise player
pub const RESERVED_VARIABLES: [&str; 9] = [
    "title",
    "form",
    "hint",
    "theories",
    "statement",
    "grader",
    "builder",
    "solution",
    "sandbox",
];

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum CompletionKind {
    Variable,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct CompletionItem {
    pub label: &'static str,
    pub kind: CompletionKind,
    pub detail: &'static str,
}

pub fn completions() -> Vec<CompletionItem> {
    RESERVED_VARIABLES
        .into_iter()
        .map(|label| CompletionItem {
            label,
            kind: CompletionKind::Variable,
            detail: "Reserved variable",
        })
        .collect()
}
