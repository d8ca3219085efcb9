//! Clickable links in `.ple` documents
//!
//! Two kinds of links are produced:
//!
//! - `#docs/main/...` and `#docs/components/...` anchors, pointing at the
//!   online documentation
//! - file references after `@extends`, `@copyurl`, `@copycontent` and
//!   `@include`, pointing at the file inside the working copy
//!
//! Positions are zero-based; `character` counts Unicode scalar values.

use std::path::PathBuf;
use std::sync::LazyLock;

use platon_core::ResourceLocation;
use regex::Regex;
use serde::Serialize;

use crate::reference::{ReferenceContext, resolve_file_reference};

static DOCS_LINK: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"#(docs/(?:main|components)(?:/[a-zA-Z0-9\-._~:/?#\[\]@!$&'()*+,;=]*)?)")
        .expect("Invalid documentation link regex")
});

/// `key ==` opens a multi-line value
static BLOCK_START: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^[a-zA-Z_](?:\.?[A-Za-z0-9_]+)*\s*==").expect("Invalid block start regex")
});

static BLOCK_END: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^==\s*$").expect("Invalid block end regex"));

static REFERENCE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(@(?:extends|copyurl|copycontent|include)\s+)(\S+)")
        .expect("Invalid reference regex")
});

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize)]
pub struct Position {
    pub line: u32,
    pub character: u32,
}

impl Position {
    pub fn new(line: u32, character: u32) -> Self {
        Self { line, character }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct Range {
    pub start: Position,
    pub end: Position,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase", tag = "kind", content = "target")]
pub enum LinkTarget {
    Url(String),
    File(PathBuf),
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct DocumentLink {
    pub range: Range,
    pub target: LinkTarget,
}

/// Position of the byte `offset` of `text`.
fn position_at(text: &str, offset: usize) -> Position {
    let before = &text[..offset];
    let line = before.matches('\n').count();
    let line_start = before.rfind('\n').map_or(0, |i| i + 1);
    Position::new(line as u32, before[line_start..].chars().count() as u32)
}

/// Links from `#docs/...` anchors to `docs_base`.
pub fn documentation_links(text: &str, docs_base: &str) -> Vec<DocumentLink> {
    let base = docs_base.trim_end_matches('/');
    DOCS_LINK
        .captures_iter(text)
        .filter_map(|caps| {
            let whole = caps.get(0)?;
            let path = caps.get(1)?.as_str();
            Some(DocumentLink {
                range: Range {
                    start: position_at(text, whole.start()),
                    end: position_at(text, whole.end()),
                },
                target: LinkTarget::Url(format!("{base}/{path}")),
            })
        })
        .collect()
}

/// Links from file references to files of the same resource.
///
/// Lines inside multi-line values are ignored. References to another
/// resource are skipped.
pub fn reference_links(text: &str, location: &ResourceLocation) -> Vec<DocumentLink> {
    let context = ReferenceContext::new(location.id.clone(), Some("latest"));
    let mut links = Vec::new();
    let mut in_block = false;

    for (index, line) in text.split('\n').enumerate() {
        if in_block {
            if BLOCK_END.is_match(line) {
                in_block = false;
            }
            continue;
        }
        if BLOCK_START.is_match(line) {
            in_block = true;
            continue;
        }

        let Some(caps) = REFERENCE.captures(line) else {
            continue;
        };
        let (Some(keyword), Some(token)) = (caps.get(1), caps.get(2)) else {
            continue;
        };

        let reference = resolve_file_reference(token.as_str(), &context);
        if reference.resource != location.id {
            tracing::debug!(token = token.as_str(), "Skipping cross-resource reference");
            continue;
        }

        let line_no = index as u32;
        let start = line[..keyword.end()].chars().count() as u32;
        let width = token.as_str().chars().count() as u32;
        links.push(DocumentLink {
            range: Range {
                start: Position::new(line_no, start),
                end: Position::new(line_no, start + width),
            },
            target: LinkTarget::File(location.root.join(&reference.relpath)),
        });
    }

    links
}
