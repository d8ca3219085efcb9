//! Live preview documents
//!
//! The preview is an HTML page framing the platform player. Each resource
//! has at most one preview panel, kept as `<previews dir>/<id>.html`.

use std::path::PathBuf;

use platon_fs::io;
use serde::Serialize;

use crate::Result;

/// Player URL previewing the latest version of `id`.
pub fn preview_url(base_url: &str, id: &str) -> String {
    format!(
        "{}/player/preview/{id}?version=latest&editor-preview=true",
        base_url.trim_end_matches('/')
    )
}

fn escape_html(s: &str) -> String {
    s.replace('&', "&amp;")
        .replace('<', "&lt;")
        .replace('>', "&gt;")
        .replace('"', "&quot;")
}

/// HTML document framing the preview of `id`.
///
/// The content security policy only lets frames load from `base_url`.
pub fn render_preview(base_url: &str, id: &str, title: &str) -> String {
    let origin = escape_html(base_url);
    let src = escape_html(&preview_url(base_url, id));
    let title = escape_html(title);
    format!(
        r#"<!DOCTYPE html>
<html lang="en">
<head>
    <meta charset="UTF-8">
    <meta name="viewport" content="width=device-width, initial-scale=1.0">
    <meta http-equiv="Content-Security-Policy" content="default-src 'none'; script-src 'unsafe-inline' 'unsafe-eval'; style-src 'unsafe-inline'; frame-src {origin};">
    <title>{title}</title>
    <style>
        body {{ margin: 0; padding: 0; display: flex; height: 100vh; }}
        iframe {{ width: 100%; height: 100%; border: none; }}
    </style>
</head>
<body>
    <iframe src="{src}"></iframe>
</body>
</html>
"#
    )
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum PanelState {
    /// First preview of the resource
    Created,
    /// An open panel was refreshed
    Revealed,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Panel {
    pub state: PanelState,
    pub title: String,
    pub path: PathBuf,
}

/// One preview document per resource.
#[derive(Debug, Clone)]
pub struct PreviewPanels {
    dir: PathBuf,
    base_url: String,
}

impl PreviewPanels {
    pub fn new(dir: impl Into<PathBuf>, base_url: impl Into<String>) -> Self {
        Self {
            dir: dir.into(),
            base_url: base_url.into(),
        }
    }

    pub fn path_for(&self, id: &str) -> PathBuf {
        self.dir.join(format!("{id}.html"))
    }

    pub fn is_open(&self, id: &str) -> bool {
        self.path_for(id).exists()
    }

    /// Create the panel of `id`, or refresh it if already open.
    pub fn show(&self, id: &str, name: &str) -> Result<Panel> {
        let path = self.path_for(id);
        let state = if self.is_open(id) {
            PanelState::Revealed
        } else {
            PanelState::Created
        };

        let title = format!("PLaTOn Preview {name}");
        io::write_text(&path, &render_preview(&self.base_url, id, &title))?;
        tracing::debug!(id, path = %path.display(), ?state, "Preview panel");

        Ok(Panel { state, title, path })
    }

    /// Dispose of the panel of `id`. Returns whether one was open.
    pub fn close(&self, id: &str) -> Result<bool> {
        Ok(io::remove_if_exists(&self.path_for(id))?)
    }
}
