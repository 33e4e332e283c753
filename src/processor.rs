//! One generation pass over a schema.
//!
//! For each marker the processor walks the marked declarations, reports the
//! ones it cannot handle, and hands the generated source of the rest to a
//! [`CodeSink`]. Declarations that mention types nobody has produced yet are
//! returned as deferred instead of being reported; a later pass (after other
//! generators have run) may pick them up.
use std::path::PathBuf;

use indexmap::IndexMap;
use serde::Serialize;

use crate::diag::{Diagnostic, Diagnostics};
use crate::error::Result;
use crate::params;
use crate::schema::{Declaration, Marker, SchemaProvider, TypeHandle};
use crate::sink::CodeSink;
use crate::synth::patch::{patch_struct_name, synthesize_patch};
use crate::synth::{self, merge::synthesize_merge};
use crate::tree;

/// What a pass did.
#[derive(Debug, Default, Clone, PartialEq, Eq, Serialize)]
pub struct Report {
    /// `(declaration, generated file name)` for every file handed to the sink.
    pub generated: Vec<(TypeHandle, String)>,
    /// Paths written by a [`crate::sink::FileSink`], index files included.
    pub written: Vec<PathBuf>,
    pub deferred: Vec<TypeHandle>,
    pub errors: usize,
    pub warnings: usize,
}

/// Generates one capability (`merge` or `deep_copy`) for every declaration
/// carrying its marker.
pub struct Processor<'s, S: SchemaProvider> {
    schema: &'s S,
    marker: Marker,
}

// ————————————————————————————————————————————————————————————————————————————
// IMPLEMENTATION
// ————————————————————————————————————————————————————————————————————————————

impl Report {
    pub fn is_ok(&self) -> bool {
        self.errors == 0
    }
    fn extend(&mut self, other: Report) {
        self.generated.extend(other.generated);
        self.written.extend(other.written);
        self.deferred.extend(other.deferred);
        self.errors += other.errors;
        self.warnings += other.warnings;
    }
    fn record(&mut self, diagnostics: &mut dyn Diagnostics, diagnostic: Diagnostic) {
        if diagnostic.is_error() {
            self.errors += 1;
        } else {
            self.warnings += 1;
        }
        diagnostics.report(diagnostic);
    }
}

impl<'s, S: SchemaProvider> Processor<'s, S> {
    pub fn new(schema: &'s S, marker: Marker) -> Self {
        Self { schema, marker }
    }

    pub fn process(&self, diagnostics: &mut dyn Diagnostics, sink: &mut dyn CodeSink) -> Result<Report> {
        let mut report = Report::default();
        // (namespace, file name) → declaration it was generated for.
        let mut emitted: IndexMap<(String, String), TypeHandle> = IndexMap::new();
        for ty in self.schema.marked_types(self.marker) {
            if !self.schema.is_resolved(&ty) {
                report.deferred.push(ty);
                continue;
            }
            let decl = match self.validate(&ty) {
                Ok(decl) => decl,
                Err(diagnostic) => {
                    report.record(diagnostics, diagnostic);
                    continue;
                }
            };
            let file_name = synth::file_name(&decl, self.marker);
            let key = (decl.namespace.clone(), file_name.clone());
            if let Some(owner) = emitted.get(&key) {
                let message = format!(
                    "`{file_name}.rs` is already generated for `{owner}`; rename one of the two declarations"
                );
                report.record(diagnostics, Diagnostic::error(message, &ty).at(decl.location.clone()));
                continue;
            }
            let Some(source) = self.generate(&ty, &decl, diagnostics, &mut report) else {
                continue;
            };
            sink.emit(&decl.namespace, &file_name, &source)?;
            emitted.insert(key, ty.clone());
            report.generated.push((ty, file_name));
        }
        Ok(report)
    }

    fn validate(&self, ty: &TypeHandle) -> Result<Declaration, Diagnostic> {
        let decl = self.schema.declaration(ty);
        let location = decl.as_ref().and_then(|decl| decl.location.clone());
        match decl {
            Some(decl) if self.schema.is_record(ty) => Ok(decl),
            _ => Err(Diagnostic::error(
                format!(
                    "#[derive({})] is only applicable to non-generic structs with named fields",
                    self.marker.derive_name(),
                ),
                ty,
            )
            .at(location)),
        }
    }

    fn generate(
        &self,
        ty: &TypeHandle,
        decl: &Declaration,
        diagnostics: &mut dyn Diagnostics,
        report: &mut Report,
    ) -> Option<String> {
        match self.marker {
            Marker::Mergeable => Some(synthesize_merge(ty, decl, &self.schema.fields(ty))),
            Marker::NestedData => {
                let patch = patch_struct_name(decl);
                let mut taken = vec!["crate".to_string()];
                taken.extend(decl.namespace.split("::").filter(|segment| !segment.is_empty()).map(str::to_string));
                taken.push(patch.clone());
                if self.schema.declaration(&TypeHandle::new(taken.join("::"))).is_some() {
                    let message = format!("`{patch}` is already declared in this module; it cannot be generated");
                    report.record(diagnostics, Diagnostic::error(message, ty).at(decl.location.clone()));
                    return None;
                }
                let tree = tree::build(self.schema, ty);
                for path in &tree.truncated {
                    let message = format!(
                        "`{path}` has a type already being expanded on its own path; \
                         it is overridden as a whole value"
                    );
                    report.record(diagnostics, Diagnostic::warning(message, ty).at(decl.location.clone()));
                }
                for path in &tree.sealed {
                    let message = format!(
                        "`{path}` has fields that are not visible from this module; \
                         it is overridden as a whole value"
                    );
                    report.record(diagnostics, Diagnostic::warning(message, ty).at(decl.location.clone()));
                }
                match params::flatten(&tree) {
                    Ok(params) => Some(synthesize_patch(ty, decl, &params)),
                    Err(clash) => {
                        let diagnostic = Diagnostic::error(clash.to_string(), ty).at(decl.location.clone());
                        report.record(diagnostics, diagnostic);
                        None
                    }
                }
            }
        }
    }
}

/// Runs the processors of every marker over `schema`.
pub fn generate(
    schema: &impl SchemaProvider,
    diagnostics: &mut dyn Diagnostics,
    sink: &mut dyn CodeSink,
) -> Result<Report> {
    let mut report = Report::default();
    for marker in Marker::ALL {
        report.extend(Processor::new(schema, marker).process(diagnostics, sink)?);
    }
    Ok(report)
}

// ------------------------------- Tests ------------------------------------ //
