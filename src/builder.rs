//! Build script entry point.
//!
//! ```no_run
//! // build.rs
//! fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let report = record_synth::Builder::new().source_root("src").run()?;
//!     if !report.is_ok() {
//!         return Err(format!("{} declaration(s) could not be generated", report.errors).into());
//!     }
//!     Ok(())
//! }
//! ```
//!
//! The generated code is then pulled into each module that declares marked
//! types:
//!
//! ```ignore
//! include!(concat!(env!("OUT_DIR"), "/config/generated.rs"));
//! ```
use std::path::PathBuf;

use crate::diag::{CargoDiagnostics, Diagnostics};
use crate::error::{Error, Result};
use crate::inputs::resolve_file_path_patterns;
use crate::processor::{self, Report};
use crate::sink::FileSink;
use crate::source::SourceSchema;

#[derive(Debug, Clone)]
pub struct Builder {
    source_root: PathBuf,
    inputs: Vec<String>,
    out_dir: Option<PathBuf>,
    cargo: bool,
}

impl Default for Builder {
    fn default() -> Self {
        Self {
            source_root: PathBuf::from("src"),
            inputs: Vec::new(),
            out_dir: None,
            cargo: true,
        }
    }
}

impl Builder {
    pub fn new() -> Self {
        Self::default()
    }

    /// Directory module paths are derived from. Defaults to `src`.
    pub fn source_root(mut self, root: impl Into<PathBuf>) -> Self {
        self.source_root = root.into();
        self
    }

    /// Scan these paths or glob patterns instead of every `.rs` file under
    /// the source root.
    pub fn input(mut self, pattern: impl Into<String>) -> Self {
        self.inputs.push(pattern.into());
        self
    }

    /// Defaults to `OUT_DIR`.
    pub fn out_dir(mut self, dir: impl Into<PathBuf>) -> Self {
        self.out_dir = Some(dir.into());
        self
    }

    /// Print `cargo:` directives (the default). Turn off when running outside
    /// of a build script.
    pub fn cargo_directives(mut self, enabled: bool) -> Self {
        self.cargo = enabled;
        self
    }

    pub fn run(&self) -> Result<Report> {
        let out_dir = match &self.out_dir {
            Some(dir) => dir.clone(),
            None => std::env::var_os("OUT_DIR").map(PathBuf::from).ok_or(Error::MissingOutDir)?,
        };
        let files = resolve_file_path_patterns(&self.source_root, &self.inputs)?;
        if self.cargo {
            println!("cargo:rerun-if-changed={}", self.source_root.display());
            for file in &files {
                println!("cargo:rerun-if-changed={}", file.display());
            }
        }

        let schema = SourceSchema::load(&self.source_root, &files)?;
        let mut diagnostics: Box<dyn Diagnostics> = if self.cargo {
            Box::new(CargoDiagnostics)
        } else {
            Box::new(crate::diag::ConsoleDiagnostics)
        };
        let mut sink = FileSink::new(out_dir);
        let mut report = processor::generate(&schema, diagnostics.as_mut(), &mut sink)?;
        report.written = sink.finish()?;

        if self.cargo {
            for ty in &report.deferred {
                println!("cargo:warning=warning: {ty} mentions types that are not declared in the scanned sources; skipped");
            }
        }
        Ok(report)
    }
}

// ------------------------------- Tests ------------------------------------ //
