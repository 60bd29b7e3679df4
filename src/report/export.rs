use std::path::{Path, PathBuf};

use super::RenderError;

/// Write PDF bytes to `dir/file_name`, creating the directory if needed.
pub fn export_pdf_to_dir(
    pdf_bytes: &[u8],
    dir: &Path,
    file_name: &str,
) -> Result<PathBuf, RenderError> {
    std::fs::create_dir_all(dir)?;
    let path = dir.join(file_name);
    std::fs::write(&path, pdf_bytes)?;
    tracing::info!(path = %path.display(), bytes = pdf_bytes.len(), "PDF exported");
    Ok(path)
}
