//! Editor features for `.ple` exercise files
//!
//! Everything here is a pure function of the document text, except the
//! preview panel cache which writes HTML documents to the storage area.
//!
//! - [`reference`]: `@extends`/`@include` style file references
//! - [`links`]: documentation and same-resource file links
//! - [`hover`]: keyword documentation
//! - [`completion`]: reserved variable names
//! - [`preview`]: live preview documents

pub mod completion;
pub mod error;
pub mod hover;
pub mod links;
pub mod preview;
pub mod reference;

pub use completion::{CompletionItem, CompletionKind, RESERVED_VARIABLES, completions};
pub use error::{Error, Result};
pub use hover::{Hover, hover, hover_at, word_at};
pub use links::{DocumentLink, LinkTarget, Position, Range, documentation_links, reference_links};
pub use preview::{Panel, PanelState, PreviewPanels, preview_url, render_preview};
pub use reference::{
    FileReference, ReferenceContext, ReferenceError, resolve_file_reference, validate_reference,
};
