//! One CLI run: resolve options, read the tree, obfuscate, write JSON.

use super::args::{CliArgs, Preset};
use super::config;
use anyhow::{Context, Result};
use serde::Serialize;
use std::io::{Read, Write};
use std::path::Path;
use veil_ast::SyntaxNode;
use veil_common::ObfuscatorOptions;
use veil_transforms::{Obfuscator, RenderedArtifact};

/// What the binary prints: the rewritten tree and the artifacts the printer
/// must declare ahead of it.
#[derive(Debug, Serialize)]
pub struct ObfuscatedDocument {
    pub program: SyntaxNode,
    pub artifacts: Vec<RenderedArtifact>,
}

impl ObfuscatedDocument {
    pub fn to_json(&self, pretty: bool) -> Result<String> {
        let json = if pretty {
            serde_json::to_string_pretty(self)
        } else {
            serde_json::to_string(self)
        };
        json.context("failed to serialize output")
    }
}

/// Preset, then options file, then `--reserved-name` flags, then the
/// dependency rules unless `--no-normalize` was given.
pub fn resolve_options(args: &CliArgs) -> Result<ObfuscatorOptions> {
    let base = match args.preset {
        Preset::Default => ObfuscatorOptions::default(),
        Preset::NoCustomNodes => ObfuscatorOptions::no_custom_nodes(),
    };
    let mut options = match &args.config {
        Some(path) => config::load_options_over(path, base)?,
        None => base,
    };
    options
        .reserved_names
        .extend(args.reserved_names.iter().cloned());

    Ok(if args.no_normalize {
        options
    } else {
        options.normalize()
    })
}

/// Obfuscate an ESTree JSON document.
pub fn obfuscate_source(
    source: &str,
    options: ObfuscatorOptions,
    seed: Option<u64>,
) -> Result<ObfuscatedDocument> {
    let mut program: SyntaxNode =
        serde_json::from_str(source).context("input is not a valid ESTree tree")?;

    let mut obfuscator = Obfuscator::new(options).context("invalid options")?;
    if let Some(seed) = seed {
        obfuscator = obfuscator.with_seed(seed);
    }
    let output = obfuscator
        .obfuscate(&mut program)
        .context("obfuscation failed")?;

    Ok(ObfuscatedDocument {
        program,
        artifacts: output.artifacts().to_vec(),
    })
}

pub fn run(args: &CliArgs) -> Result<()> {
    let options = resolve_options(args)?;
    tracing::debug!(?options, seed = ?args.seed, "resolved options");

    let source = read_input(args)?;
    let document = obfuscate_source(&source, options, args.seed)?;
    let json = document.to_json(args.pretty)?;
    write_output(args.output.as_deref(), &json)
}

fn read_input(args: &CliArgs) -> Result<String> {
    if args.reads_stdin() {
        let mut source = String::new();
        std::io::stdin()
            .read_to_string(&mut source)
            .context("failed to read standard input")?;
        return Ok(source);
    }

    std::fs::read_to_string(&args.input)
        .with_context(|| format!("failed to read input: {}", args.input.display()))
}

fn write_output(path: Option<&Path>, json: &str) -> Result<()> {
    match path {
        Some(path) => std::fs::write(path, format!("{json}\n"))
            .with_context(|| format!("failed to write {}", path.display())),
        None => {
            let mut stdout = std::io::stdout().lock();
            writeln!(stdout, "{json}").context("failed to write standard output")
        }
    }
}
