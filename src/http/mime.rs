//! Content-Type lookup for files served from the document root.
//!
//! Only a fixed set of extensions is served. Anything else is refused rather
//! than guessed at.

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ContentError {
    #[error("file name has no extension: {0:?}")]
    MalformedFileName(String),
    #[error("file type not supported: {0:?}")]
    UnsupportedFileType(String),
}

/// Returns the MIME type for `file_name`.
///
/// The extension is everything after the first `.` in the name, so
/// `report.tar.pdf` has the extension `tar.pdf` and is rejected.
///
/// # Example
///
/// ```
/// # use beacon::http::mime::content_type_for;
/// assert_eq!(content_type_for("index.html"), Ok("text/html"));
/// assert!(content_type_for("notes.txt").is_err());
/// ```
pub fn content_type_for(file_name: &str) -> Result<&'static str, ContentError> {
    let (_, extension) = file_name
        .split_once('.')
        .ok_or_else(|| ContentError::MalformedFileName(file_name.to_string()))?;

    match extension {
        "html" => Ok("text/html"),
        "jpg" => Ok("image/jpeg"),
        "gif" => Ok("image/gif"),
        "ico" => Ok("image/x-icon"),
        "pdf" => Ok("application/pdf"),
        other => Err(ContentError::UnsupportedFileType(other.to_string())),
    }
}
