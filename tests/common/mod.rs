//! Helpers shared by the integration tests.
#![allow(dead_code)]

use std::path::{Path, PathBuf};
use std::sync::atomic::{AtomicUsize, Ordering};

use beacon::config::SiteConfig;

static NEXT_ROOT: AtomicUsize = AtomicUsize::new(0);

/// Throwaway document root, removed on drop.
pub struct TempRoot {
    path: PathBuf,
}

impl TempRoot {
    pub fn new() -> Self {
        let path = std::env::temp_dir().join(format!(
            "beacon-test-{}-{}",
            std::process::id(),
            NEXT_ROOT.fetch_add(1, Ordering::SeqCst)
        ));
        std::fs::create_dir_all(&path).unwrap();
        Self { path }
    }

    /// A root with `index.html`, `logo.gif`, `notes.txt`, `README` and a
    /// `docs/` directory holding `a.html` and `b.pdf`.
    pub fn populated() -> Self {
        let root = Self::new();
        root.file("index.html", b"<html><body>hello</body></html>");
        root.file("logo.gif", b"GIF89a\x01\x00\x01\x00\x00\xff");
        root.file("notes.txt", b"plain notes");
        root.file("README", b"no extension");
        root.file("docs/a.html", b"<p>a</p>");
        root.file("docs/b.pdf", b"%PDF-1.4");
        root
    }

    pub fn file(&self, relative: &str, contents: &[u8]) {
        let path = self.path.join(relative);
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent).unwrap();
        }
        std::fs::write(path, contents).unwrap();
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    pub fn site(&self) -> SiteConfig {
        SiteConfig {
            document_root: self.path.clone(),
            ..SiteConfig::default()
        }
    }
}

impl Drop for TempRoot {
    fn drop(&mut self) {
        let _ = std::fs::remove_dir_all(&self.path);
    }
}
