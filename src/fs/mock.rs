use super::{DirEntry, FileSystem, FileType};
use anyhow::{anyhow, Result};
use std::collections::BTreeMap;
use std::path::{Path, PathBuf};

/// In-memory project tree used by tests and by callers that already hold the
/// files in memory.
///
/// Entries live in a `BTreeMap`, so directory listings come back in name order.
#[derive(Debug, Clone)]
pub struct MockFileSystem {
    entries: BTreeMap<PathBuf, Option<String>>,
    root: PathBuf,
}

impl MockFileSystem {
    pub fn new() -> Self {
        Self::with_root(PathBuf::from("/project"))
    }

    pub fn with_root(root: PathBuf) -> Self {
        let mut entries = BTreeMap::new();
        entries.insert(root.clone(), None);
        Self { entries, root }
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    pub fn add_file(&mut self, path: impl AsRef<Path>, content: &str) {
        let path = self.normalize_path(path.as_ref());
        if let Some(parent) = path.parent() {
            self.ensure_dirs(parent);
        }
        self.entries.insert(path, Some(content.to_string()));
    }

    pub fn add_dir(&mut self, path: impl AsRef<Path>) {
        let path = self.normalize_path(path.as_ref());
        self.ensure_dirs(&path);
    }

    /// Builder-style variant of [`add_file`](Self::add_file).
    pub fn with_file(mut self, path: impl AsRef<Path>, content: &str) -> Self {
        self.add_file(path, content);
        self
    }

    fn normalize_path(&self, path: &Path) -> PathBuf {
        if path.is_absolute() {
            path.to_path_buf()
        } else {
            self.root.join(path)
        }
    }

    fn ensure_dirs(&mut self, path: &Path) {
        let mut current = PathBuf::new();
        for component in path.components() {
            current.push(component);
            self.entries.entry(current.clone()).or_insert(None);
        }
    }

    fn file_type(content: &Option<String>) -> FileType {
        match content {
            Some(_) => FileType::File,
            None => FileType::Directory,
        }
    }
}

impl Default for MockFileSystem {
    fn default() -> Self {
        Self::new()
    }
}

impl FileSystem for MockFileSystem {
    fn exists(&self, path: &Path) -> bool {
        self.entries.contains_key(&self.normalize_path(path))
    }

    fn is_dir(&self, path: &Path) -> bool {
        matches!(self.entries.get(&self.normalize_path(path)), Some(None))
    }

    fn is_file(&self, path: &Path) -> bool {
        matches!(self.entries.get(&self.normalize_path(path)), Some(Some(_)))
    }

    fn read_to_string(&self, path: &Path) -> Result<String> {
        let path = self.normalize_path(path);
        match self.entries.get(&path) {
            Some(Some(content)) => Ok(content.clone()),
            Some(None) => Err(anyhow!("Not a file: {:?}", path)),
            None => Err(anyhow!("File not found: {:?}", path)),
        }
    }

    fn read_dir(&self, path: &Path) -> Result<Vec<DirEntry>> {
        let path = self.normalize_path(path);
        if !self.is_dir(&path) {
            return Err(anyhow!("Directory not found: {:?}", path));
        }

        let entries = self
            .entries
            .iter()
            .filter(|(entry_path, _)| entry_path.parent() == Some(path.as_path()))
            .map(|(entry_path, content)| DirEntry {
                path: entry_path.clone(),
                name: entry_path
                    .file_name()
                    .and_then(|n| n.to_str())
                    .unwrap_or_default()
                    .to_string(),
                file_type: Self::file_type(content),
            })
            .collect();

        Ok(entries)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_add_file_creates_parents() {
        let mut fs = MockFileSystem::new();
        fs.add_file("a/b/file.txt", "content");

        assert!(fs.is_dir(Path::new("/project/a")));
        assert!(fs.is_dir(Path::new("a/b")));
        assert!(fs.is_file(Path::new("a/b/file.txt")));
        assert!(!fs.is_file(Path::new("a")));
    }

    #[test]
    fn test_read_to_string() {
        let fs = MockFileSystem::new().with_file("package.json", "{}");

        assert_eq!(fs.read_to_string(Path::new("package.json")).unwrap(), "{}");
        assert!(fs.read_to_string(Path::new("missing.json")).is_err());
        assert!(fs.read_to_string(Path::new("/project")).is_err());
    }

    #[test]
    fn test_read_dir_is_sorted_and_shallow() {
        let mut fs = MockFileSystem::new();
        fs.add_file("zeta.txt", "");
        fs.add_file("alpha.txt", "");
        fs.add_file("cmd/server/main.go", "package main");

        let names: Vec<String> = fs
            .read_dir(Path::new("/project"))
            .unwrap()
            .into_iter()
            .map(|e| e.name)
            .collect();
        assert_eq!(names, vec!["alpha.txt", "cmd", "zeta.txt"]);

        let cmd = fs.read_dir(Path::new("cmd")).unwrap();
        assert_eq!(cmd.len(), 1);
        assert!(cmd[0].is_dir());
    }

    #[test]
    fn test_with_root() {
        let mut fs = MockFileSystem::with_root(PathBuf::from("/repo"));
        fs.add_dir("public");

        assert_eq!(fs.root(), Path::new("/repo"));
        assert!(fs.is_dir(Path::new("/repo/public")));
        assert!(fs.read_dir(Path::new("nope")).is_err());
    }
}
