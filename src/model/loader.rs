//! Loading declaration files into a [`TypeModel`]
//!
//! Inputs may be files or directories. Directories are walked with the
//! `ignore` crate in file-name order, so batches arrive deterministically.

use std::path::{Path, PathBuf};

use ignore::WalkBuilder;
use thiserror::Error;
use tracing::{debug, info, trace, warn};

use super::index::{Origin, TypeId, TypeModel};
use super::name::NameError;
use super::types::DeclarationFile;
use crate::fs::FileSystem;

#[derive(Debug, Error)]
pub enum LoadError {
    #[error("Input path not found: {0:?}")]
    NotFound(PathBuf),

    #[error("Failed to read {path:?}: {message}")]
    Read { path: PathBuf, message: String },

    #[error("Failed to parse {path:?}: {message}")]
    Parse { path: PathBuf, message: String },

    #[error("Unsupported declaration file {0:?} (expected .json, .yaml or .yml)")]
    UnsupportedFormat(PathBuf),

    #[error("Invalid type name in {path:?}: {source}")]
    InvalidName {
        path: PathBuf,
        #[source]
        source: NameError,
    },

    #[error("Failed to walk {path:?}: {message}")]
    Walk { path: PathBuf, message: String },
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DeclarationFormat {
    Json,
    Yaml,
}

impl DeclarationFormat {
    pub fn from_path(path: &Path) -> Option<Self> {
        match path.extension().and_then(|e| e.to_str()) {
            Some(ext) if ext.eq_ignore_ascii_case("json") => Some(Self::Json),
            Some(ext) if ext.eq_ignore_ascii_case("yaml") || ext.eq_ignore_ascii_case("yml") => {
                Some(Self::Yaml)
            }
            _ => None,
        }
    }
}

/// One loaded batch: its source file and the root declarations it added.
#[derive(Debug, Clone)]
pub struct Batch {
    pub path: PathBuf,
    pub roots: Vec<TypeId>,
}

pub fn parse_declarations(
    content: &str,
    format: DeclarationFormat,
    path: &Path,
) -> Result<DeclarationFile, LoadError> {
    let parsed = match format {
        DeclarationFormat::Json => serde_json::from_str(content).map_err(|e| e.to_string()),
        DeclarationFormat::Yaml => serde_yaml::from_str(content).map_err(|e| e.to_string()),
    };

    parsed.map_err(|message| LoadError::Parse {
        path: path.to_path_buf(),
        message,
    })
}

pub fn read_declaration_file(fs: &dyn FileSystem, path: &Path) -> Result<DeclarationFile, LoadError> {
    let format = DeclarationFormat::from_path(path)
        .ok_or_else(|| LoadError::UnsupportedFormat(path.to_path_buf()))?;

    let content = fs.read_to_string(path).map_err(|e| LoadError::Read {
        path: path.to_path_buf(),
        message: format!("{:#}", e),
    })?;

    parse_declarations(&content, format, path)
}

/// Expands inputs into declaration files. Files are kept as given;
/// directories contribute every `.json`/`.yaml`/`.yml` file below them.
pub fn discover_declaration_files(inputs: &[PathBuf]) -> Result<Vec<PathBuf>, LoadError> {
    let mut files = Vec::new();

    for input in inputs {
        if input.is_file() {
            files.push(input.clone());
            continue;
        }
        if !input.is_dir() {
            return Err(LoadError::NotFound(input.clone()));
        }

        let before = files.len();
        for result in WalkBuilder::new(input)
            .hidden(false)
            .git_ignore(false)
            .git_global(false)
            .git_exclude(false)
            .sort_by_file_name(|a, b| a.cmp(b))
            .build()
        {
            let entry = result.map_err(|e| LoadError::Walk {
                path: input.clone(),
                message: e.to_string(),
            })?;
            let path = entry.path();

            if !path.is_file() {
                continue;
            }
            if DeclarationFormat::from_path(path).is_none() {
                trace!(path = %path.display(), "Skipping non-declaration file");
                continue;
            }
            files.push(path.to_path_buf());
        }

        if files.len() == before {
            warn!(dir = %input.display(), "No declaration files found in directory");
        }
    }

    debug!(count = files.len(), "Discovered declaration files");
    Ok(files)
}

/// Reads every file into `model`, one batch per file, in order.
pub fn load_batches(
    fs: &dyn FileSystem,
    model: &mut TypeModel,
    files: &[PathBuf],
    origin: Origin,
) -> Result<Vec<Batch>, LoadError> {
    let mut batches = Vec::with_capacity(files.len());

    for path in files {
        let file = read_declaration_file(fs, path)?;
        let roots = model
            .add_batch(&file, origin)
            .map_err(|source| LoadError::InvalidName {
                path: path.clone(),
                source,
            })?;

        debug!(path = %path.display(), roots = roots.len(), ?origin, "Loaded declaration file");
        batches.push(Batch {
            path: path.clone(),
            roots,
        });
    }

    info!(
        files = batches.len(),
        types = model.len(),
        ?origin,
        "Declaration files loaded"
    );
    Ok(batches)
}
