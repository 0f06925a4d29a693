use super::FileSystem;
use serde::de::DeserializeOwned;
use std::path::{Path, PathBuf};
use tracing::debug;

/// A [`FileSystem`] scoped to one project root.
///
/// All paths handed to a `Project` are relative to the root. This is the only
/// view of the source tree that providers receive.
#[derive(Clone, Copy)]
pub struct Project<'a> {
    fs: &'a dyn FileSystem,
    root: &'a Path,
}

impl<'a> Project<'a> {
    pub fn new(fs: &'a dyn FileSystem, root: &'a Path) -> Self {
        Self { fs, root }
    }

    pub fn root(&self) -> &Path {
        self.root
    }

    fn resolve(&self, rel: &str) -> PathBuf {
        if rel.is_empty() || rel == "." {
            self.root.to_path_buf()
        } else {
            self.root.join(rel)
        }
    }

    pub fn has_file(&self, rel: &str) -> bool {
        self.fs.is_file(&self.resolve(rel))
    }

    pub fn has_dir(&self, rel: &str) -> bool {
        self.fs.is_dir(&self.resolve(rel))
    }

    pub fn has_any(&self, rels: &[&str]) -> bool {
        rels.iter().any(|rel| self.has_file(rel))
    }

    /// Contents of a file, or `None` when it is missing or unreadable.
    pub fn read(&self, rel: &str) -> Option<String> {
        self.fs.read_to_string(&self.resolve(rel)).ok()
    }

    /// Parse a JSON file. Malformed files are treated as absent.
    pub fn read_json<T: DeserializeOwned>(&self, rel: &str) -> Option<T> {
        let content = self.read(rel)?;
        match serde_json::from_str(&content) {
            Ok(value) => Some(value),
            Err(e) => {
                debug!(file = rel, error = %e, "Ignoring malformed JSON file");
                None
            }
        }
    }

    /// Parse a TOML file. Malformed files are treated as absent.
    pub fn read_toml<T: DeserializeOwned>(&self, rel: &str) -> Option<T> {
        let content = self.read(rel)?;
        match toml::from_str(&content) {
            Ok(value) => Some(value),
            Err(e) => {
                debug!(file = rel, error = %e, "Ignoring malformed TOML file");
                None
            }
        }
    }

    /// Names of the entries directly under `rel`, sorted. Empty when `rel` is not
    /// a directory.
    pub fn list(&self, rel: &str) -> Vec<String> {
        self.fs
            .read_dir(&self.resolve(rel))
            .map(|entries| entries.into_iter().map(|e| e.name).collect())
            .unwrap_or_default()
    }

    /// Names of the subdirectories directly under `rel`, sorted.
    pub fn list_dirs(&self, rel: &str) -> Vec<String> {
        self.fs
            .read_dir(&self.resolve(rel))
            .map(|entries| {
                entries
                    .into_iter()
                    .filter(|e| e.is_dir())
                    .map(|e| e.name)
                    .collect()
            })
            .unwrap_or_default()
    }

    /// First file of `candidates` that exists.
    pub fn first_existing<'c>(&self, candidates: &[&'c str]) -> Option<&'c str> {
        candidates.iter().copied().find(|rel| self.has_file(rel))
    }
}

impl std::fmt::Debug for Project<'_> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Project").field("root", &self.root).finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::fs::MockFileSystem;
    use std::collections::BTreeMap;

    #[test]
    fn test_relative_queries() {
        let mut fs = MockFileSystem::new();
        fs.add_file("package.json", r#"{"name": "web"}"#);
        fs.add_file("cmd/api/main.go", "package main");
        let root = fs.root().to_path_buf();
        let project = Project::new(&fs, &root);

        assert!(project.has_file("package.json"));
        assert!(project.has_dir("cmd"));
        assert!(!project.has_file("cmd"));
        assert!(project.has_any(&["yarn.lock", "package.json"]));
        assert_eq!(project.list("."), vec!["cmd", "package.json"]);
        assert_eq!(project.list_dirs("cmd"), vec!["api"]);
        assert!(project.list("missing").is_empty());
        assert_eq!(
            project.first_existing(&["go.mod", "package.json"]),
            Some("package.json")
        );
    }

    #[test]
    fn test_read_json_tolerates_garbage() {
        let mut fs = MockFileSystem::new();
        fs.add_file("good.json", r#"{"a": "b"}"#);
        fs.add_file("bad.json", "{not json");
        let root = fs.root().to_path_buf();
        let project = Project::new(&fs, &root);

        let good: Option<BTreeMap<String, String>> = project.read_json("good.json");
        assert_eq!(good.unwrap().get("a").map(String::as_str), Some("b"));

        let bad: Option<BTreeMap<String, String>> = project.read_json("bad.json");
        assert!(bad.is_none());
    }
}
