//! Export and import commands
//!
//! Export writes one of the two interchange formats; import restores a
//! diagram from a structured export file, which round-trips losslessly.

use std::fs;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use chrono::{DateTime, Utc};
use clap::Subcommand;

use super::output::Output;
use crate::export::{to_plmxml_with, to_structured_payload_with, StructuredPayload};
use crate::storage::Project;

#[derive(Subcommand)]
pub enum ExportCommands {
    /// Write the lossless JSON payload
    Json {
        /// Output path (defaults to wbs-export-<epoch-millis>.json)
        #[arg(long)]
        out: Option<PathBuf>,

        /// Print to stdout instead of writing a file
        #[arg(long)]
        stdout: bool,
    },

    /// Write the PLMXML document
    Plmxml {
        /// Output path (defaults to wbs-export-<epoch-millis>.plmxml)
        #[arg(long)]
        out: Option<PathBuf>,

        /// Print to stdout instead of writing a file
        #[arg(long)]
        stdout: bool,
    },
}

pub fn run(cmd: ExportCommands, output: &Output) -> Result<()> {
    let project = Project::open_current()?;
    let (nodes, edges) = project.load_snapshot()?;
    let generator = project.config().generator();
    let now = Utc::now();

    let (content, extension, to_stdout, out) = match cmd {
        ExportCommands::Json { out, stdout } => {
            let payload = to_structured_payload_with(&nodes, &edges, &generator, now);
            let json = payload.to_json().context("Failed to render JSON export")?;
            (json, "json", stdout, out)
        }
        ExportCommands::Plmxml { out, stdout } => {
            let xml = to_plmxml_with(&nodes, &edges, &generator, now);
            (xml, "plmxml", stdout, out)
        }
    };

    if to_stdout {
        println!("{}", content);
        return Ok(());
    }

    let path = out.unwrap_or_else(|| default_filename(extension, now));
    fs::write(&path, &content)
        .with_context(|| format!("Failed to write export: {}", path.display()))?;

    output.verbose_ctx(
        "export",
        &format!("Wrote {} bytes to {}", content.len(), path.display()),
    );

    if output.is_json() {
        output.data(&serde_json::json!({
            "path": path.display().to_string(),
            "nodes": nodes.len(),
            "edges": edges.len(),
        }));
    } else {
        output.success(&format!(
            "Exported {} node(s) and {} edge(s) to {}",
            nodes.len(),
            edges.len(),
            path.display()
        ));
    }

    Ok(())
}

pub fn import(file: &Path, output: &Output) -> Result<()> {
    let project = Project::open_current()?;

    let content = fs::read_to_string(file)
        .with_context(|| format!("Failed to read import file: {}", file.display()))?;
    let payload = StructuredPayload::from_json(&content)
        .with_context(|| format!("Not a structured export file: {}", file.display()))?;

    output.verbose_ctx(
        "import",
        &format!(
            "Restoring snapshot exported at {} by {}",
            payload.meta.exported_at, payload.meta.generator
        ),
    );

    // The payload replaces the whole snapshot; codes are recomputed rather
    // than trusted from the file
    project.refresh_and_save(&payload.nodes, &payload.edges)?;

    if output.is_json() {
        output.data(&serde_json::json!({
            "nodes": payload.nodes.len(),
            "edges": payload.edges.len(),
            "version": payload.meta.version,
        }));
    } else {
        output.success(&format!(
            "Imported {} node(s) and {} edge(s)",
            payload.nodes.len(),
            payload.edges.len()
        ));
    }

    Ok(())
}

fn default_filename(extension: &str, at: DateTime<Utc>) -> PathBuf {
    PathBuf::from(format!("wbs-export-{}.{}", at.timestamp_millis(), extension))
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    #[test]
    fn default_filename_uses_epoch_millis() {
        let at = Utc.with_ymd_and_hms(2026, 8, 7, 12, 0, 0).unwrap();
        let path = default_filename("json", at);

        assert_eq!(
            path,
            PathBuf::from(format!("wbs-export-{}.json", at.timestamp_millis()))
        );
    }
}
