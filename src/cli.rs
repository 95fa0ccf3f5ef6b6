//! Command-line driver: load a serialized tree, run the built-in handlers
//! over it and render the results.

use crate::ast::types::Script;
use crate::handlers::{kind_stats, outline, rename_variable, render_stats, OutlineError, RenameRule};
use log::{debug, info};
use similar::TextDiff;
use std::io::Read;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum CliError {
    #[error("Cannot read {path}: {source}")]
    Read {
        path: String,
        #[source]
        source: std::io::Error,
    },

    #[error("Invalid tree: {0}")]
    Parse(#[source] serde_json::Error),

    #[error("Cannot write JSON: {0}")]
    Json(#[from] serde_json::Error),

    #[error("Cannot write YAML: {0}")]
    Yaml(#[from] serde_yaml::Error),

    #[error(transparent)]
    Outline(#[from] OutlineError),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, clap::ValueEnum)]
pub enum OutputFormat {
    #[default]
    Json,
    Yaml,
}

/// What to do with a loaded tree
#[derive(Debug, Clone, Default)]
pub struct CliOptions {
    pub rename: Option<RenameRule>,
    pub outline: bool,
    /// Outline depth limit; `None` prints everything
    pub max_depth: Option<usize>,
    pub stats: bool,
    /// Count nodes inside words too
    pub words: bool,
    pub format: OutputFormat,
    pub diff: bool,
}

/// Everything `run` produced
#[derive(Debug, Default)]
pub struct Report {
    /// The tree after all edits, in the requested format
    pub tree: String,
    pub outline: Option<String>,
    pub stats: Option<String>,
    /// Unified diff between the input and output trees, if asked for
    pub diff: Option<String>,
    pub renamed: usize,
}

fn render(script: &Script, format: OutputFormat) -> Result<String, CliError> {
    Ok(match format {
        OutputFormat::Json => {
            let mut text = serde_json::to_string_pretty(script)?;
            text.push('\n');
            text
        }
        OutputFormat::Yaml => serde_yaml::to_string(script)?,
    })
}

/// Reads the tree text from `path`, or from `reader` when no path is given.
pub fn read_input<R: Read>(path: Option<&str>, mut reader: R) -> Result<String, CliError> {
    match path {
        Some(path) => std::fs::read_to_string(path).map_err(|source| CliError::Read {
            path: format!("tree file: {}", path),
            source,
        }),
        None => {
            let mut buf = String::new();
            reader.read_to_string(&mut buf).map_err(|source| CliError::Read {
                path: "stdin".to_string(),
                source,
            })?;
            Ok(buf)
        }
    }
}

pub fn run(input: &str, options: &CliOptions) -> Result<Report, CliError> {
    let mut script: Script = serde_json::from_str(input).map_err(CliError::Parse)?;
    info!("loaded tree with {} line(s)", script.lines.len());

    let mut report = Report::default();
    let before = if options.diff {
        Some(render(&script, options.format)?)
    } else {
        None
    };

    if let Some(rule) = &options.rename {
        report.renamed = rename_variable(&mut script, rule);
        info!("renamed {} occurrence(s) of {}", report.renamed, rule.from);
    }

    if options.outline {
        report.outline = Some(outline(&mut script, options.max_depth)?);
    }

    if options.stats {
        let counts = kind_stats(&mut script, options.words);
        debug!("{} distinct node kind(s)", counts.len());
        report.stats = Some(render_stats(&counts));
    }

    report.tree = render(&script, options.format)?;

    if let Some(before) = before {
        let diff = TextDiff::from_lines(&before, &report.tree)
            .unified_diff()
            .header("input", "output")
            .to_string();
        report.diff = Some(diff);
    }

    Ok(report)
}
