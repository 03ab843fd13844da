// Shared helpers for integration tests.
//
// Provides a temporary dotfiles tree with a fluent builder for manifests and
// source files, plus a separate temporary "home" for link destinations.
#![allow(dead_code)]

use std::path::{Path, PathBuf};

use dotlink::config::manifest::MANIFEST_FILE;

/// An isolated dotfiles tree and home directory, both deleted on drop.
pub struct IntegrationTestContext {
    /// Root of the dotfiles tree that gets scanned.
    pub root: tempfile::TempDir,
    /// Directory that link destinations point into.
    pub home: tempfile::TempDir,
}

impl IntegrationTestContext {
    /// Create an empty tree and an empty home.
    pub fn new() -> Self {
        Self {
            root: tempfile::tempdir().expect("create root dir"),
            home: tempfile::tempdir().expect("create home dir"),
        }
    }

    /// Path to the dotfiles root.
    pub fn root_path(&self) -> &Path {
        self.root.path()
    }

    /// Path to the home directory.
    pub fn home_path(&self) -> &Path {
        self.home.path()
    }

    /// `<home>/<name>`.
    pub fn home_file(&self, name: &str) -> PathBuf {
        self.home.path().join(name)
    }

    /// Write raw `contents` as the manifest of `<root>/<dir>`.
    pub fn with_raw_manifest(self, dir: &str, contents: &str) -> Self {
        let site = self.root.path().join(dir);
        std::fs::create_dir_all(&site).expect("create site dir");
        std::fs::write(site.join(MANIFEST_FILE), contents).expect("write manifest");
        self
    }

    /// Write a manifest in `<root>/<dir>` linking each `(source, name)` pair to
    /// `<home>/<name>`, and create each source file.
    pub fn with_site(self, dir: &str, entries: &[(&str, &str)]) -> Self {
        let site = self.root.path().join(dir);
        std::fs::create_dir_all(&site).expect("create site dir");
        let body: Vec<String> = entries
            .iter()
            .map(|(source, name)| {
                std::fs::write(site.join(source), format!("# {source}\n"))
                    .expect("write source file");
                format!(
                    "{}: {}",
                    serde_json::to_string(source).expect("encode source"),
                    serde_json::to_string(&self.home_file(name).to_string_lossy())
                        .expect("encode destination")
                )
            })
            .collect();
        std::fs::write(site.join(MANIFEST_FILE), format!("{{{}}}", body.join(", ")))
            .expect("write manifest");
        self
    }

    /// Create a plain file at `<home>/<name>`.
    pub fn with_home_file(self, name: &str) -> Self {
        std::fs::write(self.home_file(name), "existing\n").expect("write home file");
        self
    }
}
