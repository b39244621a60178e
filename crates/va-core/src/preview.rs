//! Preview and export of a finished bundle.
//!
//! Generated markup links `style.css` and `script.js` externally. The preview
//! document swaps those two references for inline blocks so it runs as a
//! single file. The bundle itself always keeps the external references.

use std::path::{Path, PathBuf};

use tracing::debug;

use crate::artifact::{CodeBundle, CODE_KINDS};

/// Stylesheet reference the markup prompt asks for.
pub const STYLESHEET_LINK: &str = r#"<link rel="stylesheet" href="style.css">"#;

/// Script reference the markup prompt asks for.
pub const SCRIPT_TAG: &str = r#"<script src="script.js"></script>"#;

/// File name of the combined single-file document.
pub const PREVIEW_FILE: &str = "preview.html";

/// Build a self-contained document from a bundle.
///
/// Only the first occurrence of each reference is replaced. If the model
/// omitted a reference, that artifact is simply not inlined.
pub fn compose_document(bundle: &CodeBundle) -> String {
    let style_block = format!("<style>{}</style>", bundle.styling());
    let script_block = format!("<script>{}</script>", bundle.behavior());

    bundle
        .markup()
        .replacen(STYLESHEET_LINK, &style_block, 1)
        .replacen(SCRIPT_TAG, &script_block, 1)
}

/// Paths written by [`export_bundle`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ExportedFiles {
    pub markup: PathBuf,
    pub styling: PathBuf,
    pub behavior: PathBuf,
}

/// Write `index.html`, `style.css` and `script.js` into `dir`.
pub async fn export_bundle(bundle: &CodeBundle, dir: &Path) -> std::io::Result<ExportedFiles> {
    tokio::fs::create_dir_all(dir).await?;

    let mut paths = Vec::with_capacity(CODE_KINDS.len());
    for (kind, text) in bundle.iter() {
        let path = dir.join(kind.file_name());
        tokio::fs::write(&path, text).await?;
        debug!(file = %path.display(), bytes = text.len(), "exported artifact");
        paths.push(path);
    }

    let mut paths = paths.into_iter();
    match (paths.next(), paths.next(), paths.next()) {
        (Some(markup), Some(styling), Some(behavior)) => Ok(ExportedFiles {
            markup,
            styling,
            behavior,
        }),
        _ => Err(std::io::Error::new(
            std::io::ErrorKind::Other,
            "bundle did not yield three artifacts",
        )),
    }
}

/// Write the combined document as `preview.html` in `dir`.
pub async fn write_preview(bundle: &CodeBundle, dir: &Path) -> std::io::Result<PathBuf> {
    tokio::fs::create_dir_all(dir).await?;
    let path = dir.join(PREVIEW_FILE);
    tokio::fs::write(&path, compose_document(bundle)).await?;
    Ok(path)
}
