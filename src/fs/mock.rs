use super::FileSystem;
use anyhow::{anyhow, Result};
use std::collections::{HashMap, HashSet};
use std::path::{Path, PathBuf};
use std::sync::RwLock;

#[derive(Debug, Clone, PartialEq, Eq)]
enum MockEntry {
    File(String),
    Directory,
}

/// In-memory file system. Writes to paths registered with
/// [`MockFileSystem::fail_writes_to`] return an error.
pub struct MockFileSystem {
    files: RwLock<HashMap<PathBuf, MockEntry>>,
    failing: RwLock<HashSet<PathBuf>>,
    root: PathBuf,
}

impl MockFileSystem {
    pub fn new() -> Self {
        Self::with_root(PathBuf::from("/mock"))
    }

    pub fn with_root(root: PathBuf) -> Self {
        Self {
            files: RwLock::new(HashMap::new()),
            failing: RwLock::new(HashSet::new()),
            root,
        }
    }

    pub fn add_file(&self, path: impl AsRef<Path>, content: &str) {
        let path = self.normalize_path(path.as_ref());
        let mut files = self.files.write().unwrap();

        if let Some(parent) = path.parent() {
            Self::ensure_parents(&mut files, parent);
        }

        files.insert(path, MockEntry::File(content.to_string()));
    }

    pub fn add_dir(&self, path: impl AsRef<Path>) {
        let path = self.normalize_path(path.as_ref());
        let mut files = self.files.write().unwrap();
        Self::ensure_parents(&mut files, &path);
    }

    pub fn fail_writes_to(&self, path: impl AsRef<Path>) {
        let path = self.normalize_path(path.as_ref());
        self.failing.write().unwrap().insert(path);
    }

    /// Content of a file, if present.
    pub fn contents(&self, path: impl AsRef<Path>) -> Option<String> {
        let path = self.normalize_path(path.as_ref());
        match self.files.read().unwrap().get(&path) {
            Some(MockEntry::File(content)) => Some(content.clone()),
            _ => None,
        }
    }

    /// All file paths, sorted.
    pub fn file_paths(&self) -> Vec<PathBuf> {
        let files = self.files.read().unwrap();
        let mut paths: Vec<PathBuf> = files
            .iter()
            .filter(|(_, e)| matches!(e, MockEntry::File(_)))
            .map(|(p, _)| p.clone())
            .collect();
        paths.sort();
        paths
    }

    fn normalize_path(&self, path: &Path) -> PathBuf {
        if path.is_absolute() {
            path.to_path_buf()
        } else {
            self.root.join(path)
        }
    }

    fn ensure_parents(files: &mut HashMap<PathBuf, MockEntry>, path: &Path) {
        let mut current = PathBuf::new();
        for component in path.components() {
            current.push(component);
            files.entry(current.clone()).or_insert(MockEntry::Directory);
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
        let path = self.normalize_path(path);
        self.files.read().unwrap().contains_key(&path)
    }

    fn read_to_string(&self, path: &Path) -> Result<String> {
        let path = self.normalize_path(path);
        let files = self.files.read().unwrap();
        match files.get(&path) {
            Some(MockEntry::File(content)) => Ok(content.clone()),
            Some(MockEntry::Directory) => Err(anyhow!("Not a file: {:?}", path)),
            None => Err(anyhow!("File not found: {:?}", path)),
        }
    }

    fn create_dir_all(&self, path: &Path) -> Result<()> {
        let path = self.normalize_path(path);
        let mut files = self.files.write().unwrap();

        let mut current = PathBuf::new();
        for component in path.components() {
            current.push(component);
            if let Some(MockEntry::File(_)) = files.get(&current) {
                return Err(anyhow!("Not a directory: {:?}", current));
            }
        }

        Self::ensure_parents(&mut files, &path);
        Ok(())
    }

    fn write(&self, path: &Path, contents: &[u8]) -> Result<()> {
        let path = self.normalize_path(path);

        if self.failing.read().unwrap().contains(&path) {
            return Err(anyhow!("Permission denied: {:?}", path));
        }

        let mut files = self.files.write().unwrap();
        let parent_is_dir = path
            .parent()
            .map(|p| matches!(files.get(p), Some(MockEntry::Directory)))
            .unwrap_or(false);
        if !parent_is_dir {
            return Err(anyhow!("Parent directory missing for {:?}", path));
        }
        if let Some(MockEntry::Directory) = files.get(&path) {
            return Err(anyhow!("Is a directory: {:?}", path));
        }

        let content = String::from_utf8(contents.to_vec())
            .map_err(|e| anyhow!("Non UTF-8 content for {:?}: {}", path, e))?;
        files.insert(path, MockEntry::File(content));
        Ok(())
    }
}
