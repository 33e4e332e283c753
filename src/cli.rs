//! Minimal CLI: scan → (tree | generate)
use std::path::PathBuf;

use anyhow::{Context, bail};
use clap::{Args, Parser, Subcommand};
use indexmap::IndexSet;
use serde::Serialize;

use record_synth::diag::ConsoleDiagnostics;
use record_synth::inputs::resolve_file_path_patterns;
use record_synth::params::{self, Parameter};
use record_synth::sink::{FileSink, MemorySink};
use record_synth::source::SourceSchema;
use record_synth::tree::{self, PropertyNode};
use record_synth::{Marker, SchemaProvider, TypeHandle};

// ————————————————————————————————————————————————————————————————————————————
// TYPES
// ————————————————————————————————————————————————————————————————————————————

/// generate `merge` and `deep_copy` for records marked with `#[derive(Mergeable)]` / `#[derive(NestedData)]`
#[derive(Parser, Debug)]
pub struct CommandLineInterface {
    #[command(subcommand)]
    cmd: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// print the property tree and flattened parameters of marked records as JSON
    Tree(TreeOut),
    /// generate the marked records' functions
    Generate(GenerateOut),
}

#[derive(Args, Debug, Clone)]
struct InputSettings {
    /// source root; module paths are derived from file locations under it
    #[arg(long, default_value = "src")]
    src: PathBuf,

    /// files to scan instead of every .rs file under --src. May be literal paths or quoted glob patterns
    #[arg(long, short, num_args = 1..)]
    input: Vec<String>,
}

#[derive(clap::Parser, Debug)]
struct TreeOut {
    #[command(flatten)]
    input_settings: InputSettings,

    /// only this record (`Config` or `crate::config::Config`)
    #[arg(long = "type")]
    ty: Option<String>,

    /// output .json file (stdout if omitted)
    #[arg(short, long)]
    out: Option<PathBuf>,

    /// debugging
    #[arg(long)]
    no_op: bool,
}

#[derive(clap::Parser, Debug)]
struct GenerateOut {
    #[command(flatten)]
    input_settings: InputSettings,

    /// output directory (stdout if omitted)
    #[arg(short, long)]
    out: Option<PathBuf>,

    /// debugging
    #[arg(long)]
    no_op: bool,
}

#[derive(Serialize)]
struct TreeView<'t> {
    #[serde(rename = "type")]
    ty: &'t TypeHandle,
    tree: &'t PropertyNode,
    truncated: &'t [String],
    sealed: &'t [String],
    parameters: Vec<ParameterView>,
}

#[derive(Serialize)]
struct ParameterView {
    name: String,
    path: String,
    #[serde(rename = "type")]
    ty: String,
    nullable: bool,
    optional: bool,
}

// ————————————————————————————————————————————————————————————————————————————
// IMPLEMENTATION
// ————————————————————————————————————————————————————————————————————————————

impl InputSettings {
    fn load(&self) -> anyhow::Result<SourceSchema> {
        let files = resolve_file_path_patterns(&self.src, &self.input)
            .context("failed to resolve input file paths")?;
        SourceSchema::load(&self.src, &files).context("failed to load sources")
    }
}

impl CommandLineInterface {
    pub fn load() -> Self {
        Self::parse()
    }
    pub fn run(&self) -> anyhow::Result<()> {
        match &self.cmd {
            Command::Tree(target) => {
                // debug path
                if target.no_op {
                    eprintln!("{self:#?}");
                    return Ok(());
                }
                let schema = target.input_settings.load()?;
                let types = selected_types(&schema, target.ty.as_deref());
                if let Some(name) = &target.ty {
                    if types.is_empty() {
                        bail!("no marked record named `{name}`");
                    }
                }

                let trees: Vec<_> = types.iter().map(|ty| (ty, tree::build(&schema, ty))).collect();
                let mut views = Vec::with_capacity(trees.len());
                for (ty, tree) in &trees {
                    let params = params::flatten(tree).with_context(|| format!("cannot flatten {ty}"))?;
                    views.push(TreeView {
                        ty,
                        tree: &tree.root,
                        truncated: &tree.truncated,
                        sealed: &tree.sealed,
                        parameters: params.iter().map(ParameterView::from).collect(),
                    });
                }
                let json = serde_json::to_string_pretty(&views)?;
                write_or_print(target.out.as_ref(), &json)
            }
            Command::Generate(target) => {
                // debug path
                if target.no_op {
                    eprintln!("{self:#?}");
                    return Ok(());
                }
                let schema = target.input_settings.load()?;
                let mut diagnostics = ConsoleDiagnostics;
                let report = match &target.out {
                    Some(out) => {
                        let mut sink = FileSink::new(out);
                        let mut report = record_synth::generate(&schema, &mut diagnostics, &mut sink)?;
                        report.written = sink.finish()?;
                        for path in &report.written {
                            eprintln!("wrote {}", path.display());
                        }
                        report
                    }
                    None => {
                        let mut sink = MemorySink::new();
                        let report = record_synth::generate(&schema, &mut diagnostics, &mut sink)?;
                        for file in &sink.files {
                            let dir = file.namespace.replace("::", "/");
                            let dir = if dir.is_empty() { String::new() } else { format!("{dir}/") };
                            println!("// ———— {dir}{}.rs ————", file.file_name);
                            println!("{}", file.source);
                        }
                        report
                    }
                };
                for ty in &report.deferred {
                    eprintln!("skipped {ty}: it mentions types that are not declared in the scanned sources");
                }
                if !report.is_ok() {
                    bail!("{} declaration(s) could not be generated", report.errors);
                }
                Ok(())
            }
        }
    }
}

impl From<&Parameter<'_>> for ParameterView {
    fn from(param: &Parameter<'_>) -> Self {
        Self {
            name: param.name.clone(),
            path: param.path(),
            ty: param.node.ty().to_string(),
            nullable: param.node.nullable(),
            optional: param.is_optional(),
        }
    }
}

// ————————————————————————————————————————————————————————————————————————————
// INTERNAL HELPERS
// ————————————————————————————————————————————————————————————————————————————

/// Marked records, optionally narrowed to one by simple or full name.
fn selected_types(schema: &SourceSchema, name: Option<&str>) -> Vec<TypeHandle> {
    let marked: IndexSet<TypeHandle> = Marker::ALL
        .into_iter()
        .flat_map(|marker| schema.marked_types(marker))
        .filter(|ty| schema.is_record(ty))
        .collect();
    marked
        .into_iter()
        .filter(|ty| name.is_none_or(|name| ty.as_str() == name || ty.name() == name))
        .collect()
}

fn write_or_print(out: Option<&PathBuf>, text: &str) -> anyhow::Result<()> {
    match out {
        Some(out) => {
            if let Some(parent) = out.parent() {
                std::fs::create_dir_all(parent).with_context(|| format!("failed to create {}", parent.display()))?;
            }
            std::fs::write(out, text).with_context(|| format!("failed to write {}", out.display()))
        }
        None => {
            println!("{text}");
            Ok(())
        }
    }
}
