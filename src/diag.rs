//! Diagnostics for problems with individual declarations.
//!
//! A diagnostic never stops a pass: the offending declaration is skipped (or
//! generated partially, for warnings) and everything else is processed.
use std::fmt;

use colored::Colorize;

use crate::schema::{Location, TypeHandle};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Severity {
    Error,
    Warning,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Diagnostic {
    pub severity: Severity,
    pub message: String,
    /// The declaration the diagnostic is about.
    pub ty: Option<TypeHandle>,
    pub location: Option<Location>,
}

pub trait Diagnostics {
    fn report(&mut self, diagnostic: Diagnostic);
}

/// Colored `error:` / `warning:` lines on stderr, for the command line.
#[derive(Debug, Default)]
pub struct ConsoleDiagnostics;

/// `cargo:warning=` lines, for build scripts. Cargo shows these in its
/// output; errors are spelled out in the message since cargo has no
/// `cargo:error` for build scripts that should keep going.
#[derive(Debug, Default)]
pub struct CargoDiagnostics;

// ————————————————————————————————————————————————————————————————————————————
// IMPLEMENTATION
// ————————————————————————————————————————————————————————————————————————————

impl Diagnostic {
    pub fn error(message: impl Into<String>, ty: &TypeHandle) -> Self {
        Self::new(Severity::Error, message.into(), ty)
    }
    pub fn warning(message: impl Into<String>, ty: &TypeHandle) -> Self {
        Self::new(Severity::Warning, message.into(), ty)
    }
    fn new(severity: Severity, message: String, ty: &TypeHandle) -> Self {
        Self { severity, message, ty: Some(ty.clone()), location: None }
    }
    pub fn at(mut self, location: Option<Location>) -> Self {
        self.location = location;
        self
    }
    pub fn is_error(&self) -> bool {
        self.severity == Severity::Error
    }
}

impl fmt::Display for Severity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Severity::Error => f.write_str("error"),
            Severity::Warning => f.write_str("warning"),
        }
    }
}

/// `src/config.rs:12: message (crate::config::Config)`
impl fmt::Display for Diagnostic {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if let Some(location) = &self.location {
            write!(f, "{location}: ")?;
        }
        f.write_str(&self.message)?;
        if let Some(ty) = &self.ty {
            write!(f, " ({ty})")?;
        }
        Ok(())
    }
}

impl Diagnostics for Vec<Diagnostic> {
    fn report(&mut self, diagnostic: Diagnostic) {
        self.push(diagnostic);
    }
}

impl Diagnostics for ConsoleDiagnostics {
    fn report(&mut self, diagnostic: Diagnostic) {
        let label = match diagnostic.severity {
            Severity::Error => "error".red().bold(),
            Severity::Warning => "warning".yellow().bold(),
        };
        eprintln!("{label}: {diagnostic}");
    }
}

impl Diagnostics for CargoDiagnostics {
    fn report(&mut self, diagnostic: Diagnostic) {
        // One line per directive; cargo would cut the rest.
        let text = diagnostic.to_string().replace('\n', " ");
        println!("cargo:warning={}: {text}", diagnostic.severity);
    }
}

// ------------------------------- Tests ------------------------------------ //
