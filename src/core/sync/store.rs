use std::{
    fs,
    path::{Path, PathBuf},
};

use anyhow::{Context, Result};

use crate::{core::parsers::table::ResourceFile, utils::display_path};

/// A resource file found on disk, named `{namespace}.{language}.{ext}`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TableFile {
    pub namespace: String,
    pub language: String,
    pub path: PathBuf,
}

/// Per-(namespace, language) resource files under one directory.
pub struct ResourceStore {
    dir: PathBuf,
    extension: String,
    root_dir: PathBuf,
}

impl ResourceStore {
    pub fn new(dir: impl Into<PathBuf>, extension: impl Into<String>, root_dir: impl Into<PathBuf>) -> Self {
        Self {
            dir: dir.into(),
            extension: extension.into(),
            root_dir: root_dir.into(),
        }
    }

    pub fn dir(&self) -> &Path {
        &self.dir
    }

    pub fn file_path(&self, namespace: &str, language: &str) -> PathBuf {
        self.dir
            .join(format!("{}.{}.{}", namespace, language, self.extension))
    }

    /// Path relative to the project root, for reports.
    pub fn display(&self, path: &Path) -> String {
        display_path(path, &self.root_dir)
    }

    /// Read and parse the table of (namespace, language).
    ///
    /// `Ok(None)` when the file does not exist; an error when it cannot be
    /// read or its table region is malformed.
    pub fn read(&self, namespace: &str, language: &str) -> Result<Option<ResourceFile>> {
        self.read_path(&self.file_path(namespace, language))
    }

    pub fn read_path(&self, path: &Path) -> Result<Option<ResourceFile>> {
        if !path.exists() {
            return Ok(None);
        }
        let content =
            fs::read_to_string(path).with_context(|| format!("Failed to read {}", self.display(path)))?;
        ResourceFile::parse(content).map(Some)
    }

    /// Write `content` to `path`, creating the resource directory if needed.
    pub fn write(&self, path: &Path, content: &str) -> Result<()> {
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent)
                .with_context(|| format!("Failed to create directory {}", parent.display()))?;
        }
        fs::write(path, content).with_context(|| format!("Failed to write {}", self.display(path)))
    }

    /// Every resource file in the directory, ordered by file name.
    pub fn list_tables(&self) -> Result<Vec<TableFile>> {
        if !self.dir.is_dir() {
            return Ok(Vec::new());
        }
        let suffix = format!(".{}", self.extension);
        let mut tables = Vec::new();
        let entries = fs::read_dir(&self.dir)
            .with_context(|| format!("Failed to read directory {}", self.dir.display()))?;
        for entry in entries {
            let entry = entry?;
            let path = entry.path();
            if !path.is_file() {
                continue;
            }
            let file_name = entry.file_name().to_string_lossy().to_string();
            let Some(stem) = file_name.strip_suffix(&suffix) else {
                continue;
            };
            let Some((namespace, language)) = stem.rsplit_once('.') else {
                continue;
            };
            if namespace.is_empty() || language.is_empty() {
                continue;
            }
            tables.push(TableFile {
                namespace: namespace.to_string(),
                language: language.to_string(),
                path,
            });
        }
        tables.sort_by(|a, b| a.path.file_name().cmp(&b.path.file_name()));
        Ok(tables)
    }
}
