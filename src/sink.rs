//! Destinations for generated source files.
use std::path::{Path, PathBuf};

use indexmap::IndexMap;

use crate::error::{Error, Result};

/// Receives one generated file per declaration and capability.
pub trait CodeSink {
    /// `namespace` is the declaring module (`config::nested`, empty at the
    /// crate root) and `file_name` has no extension.
    fn emit(&mut self, namespace: &str, file_name: &str, source: &str) -> Result<()>;
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GeneratedFile {
    pub namespace: String,
    pub file_name: String,
    pub source: String,
}

/// Keeps generated files in memory.
#[derive(Debug, Default)]
pub struct MemorySink {
    pub files: Vec<GeneratedFile>,
}

/// Writes generated files under a root directory, one subdirectory per
/// module. [`FileSink::finish`] then writes a `generated.rs` per module that
/// `include!`s the module's files:
///
/// ```text
/// <root>/config/app_config_mergeable.rs
/// <root>/config/generated.rs
/// <root>/generated.rs              (crate root)
/// ```
///
/// Files whose content did not change are left alone so their timestamps
/// don't trigger rebuilds.
#[derive(Debug)]
pub struct FileSink {
    root: PathBuf,
    written: IndexMap<String, Vec<PathBuf>>,
}

pub const INDEX_FILE_NAME: &str = "generated.rs";

// ————————————————————————————————————————————————————————————————————————————
// IMPLEMENTATION
// ————————————————————————————————————————————————————————————————————————————

impl MemorySink {
    pub fn new() -> Self {
        Self::default()
    }
    pub fn get(&self, namespace: &str, file_name: &str) -> Option<&str> {
        self.files
            .iter()
            .find(|file| file.namespace == namespace && file.file_name == file_name)
            .map(|file| file.source.as_str())
    }
}

impl CodeSink for MemorySink {
    fn emit(&mut self, namespace: &str, file_name: &str, source: &str) -> Result<()> {
        self.files.push(GeneratedFile {
            namespace: namespace.to_string(),
            file_name: file_name.to_string(),
            source: source.to_string(),
        });
        Ok(())
    }
}

impl FileSink {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into(), written: IndexMap::new() }
    }

    /// `<root>/config/nested` for `config::nested`.
    pub fn namespace_dir(&self, namespace: &str) -> PathBuf {
        namespace
            .split("::")
            .filter(|segment| !segment.is_empty())
            .fold(self.root.clone(), |dir, segment| dir.join(segment))
    }

    /// Writes the per-module index files and returns every path written to,
    /// generated files first.
    pub fn finish(self) -> Result<Vec<PathBuf>> {
        let mut paths = Vec::new();
        for (namespace, files) in &self.written {
            let mut index = String::from("// @generated by record-synth. Do not edit.\n");
            for file in files {
                let absolute = std::path::absolute(file).map_err(|source| Error::Write {
                    path: file.clone(),
                    source,
                })?;
                index.push_str(&format!("include!({:?});\n", absolute.display().to_string()));
            }
            let path = self.namespace_dir(namespace).join(INDEX_FILE_NAME);
            write_if_changed(&path, &index)?;
            paths.extend(files.iter().cloned());
            paths.push(path);
        }
        Ok(paths)
    }
}

impl CodeSink for FileSink {
    fn emit(&mut self, namespace: &str, file_name: &str, source: &str) -> Result<()> {
        let path = self.namespace_dir(namespace).join(format!("{file_name}.rs"));
        write_if_changed(&path, source)?;
        self.written.entry(namespace.to_string()).or_default().push(path);
        Ok(())
    }
}

// ————————————————————————————————————————————————————————————————————————————
// INTERNAL HELPERS
// ————————————————————————————————————————————————————————————————————————————

fn write_if_changed(path: &Path, contents: &str) -> Result<()> {
    if std::fs::read_to_string(path).is_ok_and(|existing| existing == contents) {
        return Ok(());
    }
    let write_error = |source| Error::Write { path: path.to_path_buf(), source };
    if let Some(parent) = path.parent() {
        std::fs::create_dir_all(parent).map_err(write_error)?;
    }
    std::fs::write(path, contents).map_err(write_error)
}

// ------------------------------- Tests ------------------------------------ //
