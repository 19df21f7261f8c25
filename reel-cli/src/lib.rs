//! Reel CLI - analyze scripts from files or stdin.

#![warn(clippy::all)]
#![allow(clippy::pedantic)]

use anyhow::{bail, Context, Result};
use reel_core::{analyze_detailed, AnalyzeResponse, DimensionResult};
use serde::Serialize;
use std::io::Read;
use std::path::{Path, PathBuf};

/// Where a script came from.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Source {
    Stdin,
    File(PathBuf),
}

impl std::fmt::Display for Source {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Stdin => f.write_str("<stdin>"),
            Self::File(path) => write!(f, "{}", path.display()),
        }
    }
}

/// Output options for `reel analyze`.
#[derive(Debug, Clone, Copy, Default)]
pub struct RenderOptions {
    /// Include per-dimension results
    pub breakdown: bool,
    /// Single-line JSON
    pub compact: bool,
}

#[derive(Debug, Serialize)]
struct Breakdown<'a> {
    report: &'a AnalyzeResponse,
    dimensions: Dimensions<'a>,
}

#[derive(Debug, Serialize)]
struct Dimensions<'a> {
    rhythm: &'a DimensionResult,
    emotion: &'a DimensionResult,
    retention: &'a DimensionResult,
}

/// Sources for the given paths, or stdin when there are none.
pub fn sources(files: &[PathBuf]) -> Vec<Source> {
    if files.is_empty() {
        vec![Source::Stdin]
    } else {
        files.iter().cloned().map(Source::File).collect()
    }
}

/// Read a script from `source` and trim it. Empty scripts are rejected.
pub fn read_script(source: &Source) -> Result<String> {
    let raw = match source {
        Source::Stdin => {
            let mut input = String::new();
            std::io::stdin()
                .read_to_string(&mut input)
                .context("Failed to read stdin")?;
            input
        }
        Source::File(path) => read_file(path)?,
    };

    let script = raw.trim();
    if script.is_empty() {
        bail!("{source}: script is empty");
    }
    Ok(script.to_string())
}

fn read_file(path: &Path) -> Result<String> {
    std::fs::read_to_string(path).with_context(|| format!("Error reading {}", path.display()))
}

/// Analyze `script` with the rule engine and render it as JSON.
pub fn render(script: &str, options: RenderOptions) -> Result<String> {
    let analysis = analyze_detailed(script);

    let value = if options.breakdown {
        serde_json::to_value(Breakdown {
            report: &analysis.report,
            dimensions: Dimensions {
                rhythm: &analysis.rhythm,
                emotion: &analysis.emotion,
                retention: &analysis.retention,
            },
        })?
    } else {
        serde_json::to_value(&analysis.report)?
    };

    let rendered = if options.compact {
        serde_json::to_string(&value)?
    } else {
        serde_json::to_string_pretty(&value)?
    };
    Ok(rendered)
}

/// Run `reel analyze` over `files`, printing one JSON document per script.
pub fn run_analyze(files: &[PathBuf], options: RenderOptions) -> Result<()> {
    for source in sources(files) {
        let script = read_script(&source)?;
        tracing::debug!(source = %source, chars = reel_core::text::char_len(&script), "Analyzing");
        println!("{}", render(&script, options)?);
    }
    Ok(())
}
