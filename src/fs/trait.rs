//! FileSystem trait definition

use anyhow::Result;
use std::path::Path;

/// Abstraction over the file operations the scanner performs
pub trait FileSystem: Send + Sync {
    /// Check if a path exists
    fn exists(&self, path: &Path) -> bool;

    /// Read file contents as string
    fn read_to_string(&self, path: &Path) -> Result<String>;

    /// Create a directory and all missing parents
    fn create_dir_all(&self, path: &Path) -> Result<()>;

    /// Create or truncate a file and write `contents` to it
    fn write(&self, path: &Path, contents: &[u8]) -> Result<()>;
}
