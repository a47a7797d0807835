//! Maps request paths onto the document root.

use std::io::ErrorKind;
use std::path::{Component, Path, PathBuf};

/// What a request path points at under the document root.
///
/// Files are located but not read; see [`read_file`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Resource {
    Missing,
    /// Entry names, sorted.
    Directory(Vec<String>),
    File { name: String, path: PathBuf },
}

#[derive(Debug, thiserror::Error)]
pub enum ResolveError {
    #[error("failed to list directory {path}: {source}")]
    List {
        path: PathBuf,
        source: std::io::Error,
    },
    #[error("failed to read file {path}: {source}")]
    Read {
        path: PathBuf,
        source: std::io::Error,
    },
    #[error("failed to stat {path}: {source}")]
    Stat {
        path: PathBuf,
        source: std::io::Error,
    },
}

/// Resolves `request_path` against `document_root`.
///
/// Paths with a `..` segment never leave the document root, and a path that
/// runs through a regular file (`/index.html/x`) does not exist; both resolve
/// to `Resource::Missing`.
pub async fn resolve(document_root: &Path, request_path: &str) -> Result<Resource, ResolveError> {
    let Some(path) = local_path(document_root, request_path) else {
        return Ok(Resource::Missing);
    };

    let metadata = match tokio::fs::metadata(&path).await {
        Ok(metadata) => metadata,
        Err(e) if matches!(e.kind(), ErrorKind::NotFound | ErrorKind::NotADirectory) => {
            return Ok(Resource::Missing);
        }
        Err(source) => return Err(ResolveError::Stat { path, source }),
    };

    if metadata.is_dir() {
        let entries = list_entries(&path)
            .await
            .map_err(|source| ResolveError::List {
                path: path.clone(),
                source,
            })?;
        return Ok(Resource::Directory(entries));
    }

    let name = path
        .file_name()
        .map(|n| n.to_string_lossy().into_owned())
        .unwrap_or_default();

    Ok(Resource::File { name, path })
}

/// Loads a file found by [`resolve`].
pub async fn read_file(path: &Path) -> Result<Vec<u8>, ResolveError> {
    tokio::fs::read(path)
        .await
        .map_err(|source| ResolveError::Read {
            path: path.to_path_buf(),
            source,
        })
}

fn local_path(document_root: &Path, request_path: &str) -> Option<PathBuf> {
    let relative = Path::new(request_path.trim_start_matches('/'));

    if relative
        .components()
        .any(|c| !matches!(c, Component::Normal(_) | Component::CurDir))
    {
        return None;
    }

    Some(document_root.join(relative))
}

async fn list_entries(dir: &Path) -> std::io::Result<Vec<String>> {
    let mut read_dir = tokio::fs::read_dir(dir).await?;
    let mut names = Vec::new();

    while let Some(entry) = read_dir.next_entry().await? {
        names.push(entry.file_name().to_string_lossy().into_owned());
    }

    names.sort();
    Ok(names)
}

/// HTML page linking every entry of a directory.
///
/// Links are the request path with exactly one trailing `/`, followed by the
/// entry name.
pub fn directory_listing(request_path: &str, entries: &[String]) -> String {
    let base = format!("{}/", request_path.trim_end_matches('/'));

    let mut body = String::from(
        "<html><head><title>Directory Listing</title></head><body>\
         <h1>Directory Listing</h1><ul>",
    );

    for name in entries {
        let name = escape_html(name);
        body.push_str(&format!(
            "<li><a href=\"{}{}\">{}</a></li>",
            escape_html(&base),
            name,
            name
        ));
    }

    body.push_str("</ul></body></html>");
    body
}

fn escape_html(s: &str) -> String {
    s.replace('&', "&amp;")
        .replace('<', "&lt;")
        .replace('>', "&gt;")
        .replace('"', "&quot;")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parent_segments_are_rejected() {
        let root = Path::new("/srv/www");
        assert_eq!(local_path(root, "/../etc/passwd"), None);
        assert_eq!(local_path(root, "/a/../../b"), None);
        assert_eq!(
            local_path(root, "/docs/index.html"),
            Some(PathBuf::from("/srv/www/docs/index.html"))
        );
        assert_eq!(local_path(root, "/"), Some(PathBuf::from("/srv/www/")));
    }

    #[test]
    fn listing_normalizes_trailing_slash() {
        let entries = vec!["a.html".to_string()];

        let with = directory_listing("/docs/", &entries);
        let without = directory_listing("/docs", &entries);

        assert_eq!(with, without);
        assert!(with.contains("<li><a href=\"/docs/a.html\">a.html</a></li>"));
    }

    #[test]
    fn listing_of_root() {
        let entries = vec!["x.gif".to_string()];
        let html = directory_listing("/", &entries);
        assert!(html.contains("href=\"/x.gif\""));
    }
}
