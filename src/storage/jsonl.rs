//! JSONL storage for nodes and edges
//!
//! One JSON object per line, file order preserved. Uses file locking for
//! concurrent access safety and temp-file + rename for atomic writes.

use std::fs::{self, File, OpenOptions};
use std::io::{BufRead, BufReader, BufWriter, Write};
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use fs2::FileExt;
use serde::de::DeserializeOwned;
use serde::Serialize;

use crate::domain::{Edge, Node};

/// Store for node data in JSONL format
pub struct NodeStore {
    path: PathBuf,
}

impl NodeStore {
    /// Creates a node store at the given path
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    /// Creates the default store for a project
    pub fn for_project(project_root: &Path) -> Self {
        Self::new(project_root.join(".wbs").join("nodes.jsonl"))
    }

    /// Returns the path to the store file
    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Reads all nodes in file order
    pub fn read_all(&self) -> Result<Vec<Node>> {
        read_lines(&self.path).context("Failed to read node store")
    }

    /// Writes all nodes (full rewrite, order preserved)
    pub fn write_all(&self, nodes: &[Node]) -> Result<()> {
        write_lines(&self.path, nodes).context("Failed to write node store")
    }
}

/// Store for edge data in JSONL format
pub struct EdgeStore {
    path: PathBuf,
}

impl EdgeStore {
    /// Creates an edge store at the given path
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    /// Creates the default store for a project
    pub fn for_project(project_root: &Path) -> Self {
        Self::new(project_root.join(".wbs").join("edges.jsonl"))
    }

    /// Returns the path to the store file
    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Reads all edges in file order
    pub fn read_all(&self) -> Result<Vec<Edge>> {
        read_lines(&self.path).context("Failed to read edge store")
    }

    /// Writes all edges (full rewrite, order preserved)
    pub fn write_all(&self, edges: &[Edge]) -> Result<()> {
        write_lines(&self.path, edges).context("Failed to write edge store")
    }
}

fn read_lines<T: DeserializeOwned>(path: &Path) -> Result<Vec<T>> {
    if !path.exists() {
        return Ok(Vec::new());
    }

    let file =
        File::open(path).with_context(|| format!("Failed to open store: {}", path.display()))?;

    // Shared lock for reading; released when the file is dropped
    file.lock_shared()
        .context("Failed to acquire read lock on store")?;

    let reader = BufReader::new(&file);
    let mut items = Vec::new();

    for (line_num, line) in reader.lines().enumerate() {
        let line = line.with_context(|| format!("Failed to read line {}", line_num + 1))?;

        if line.trim().is_empty() {
            continue;
        }

        let item: T = serde_json::from_str(&line)
            .with_context(|| format!("Failed to parse entry at line {}", line_num + 1))?;

        items.push(item);
    }

    Ok(items)
}

fn write_lines<T: Serialize>(path: &Path, items: &[T]) -> Result<()> {
    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent)
            .with_context(|| format!("Failed to create directory: {}", parent.display()))?;
    }

    // Write to temp file first
    let temp_path = path.with_extension("jsonl.tmp");

    {
        let file = OpenOptions::new()
            .write(true)
            .create(true)
            .truncate(true)
            .open(&temp_path)
            .with_context(|| format!("Failed to create temp file: {}", temp_path.display()))?;

        file.lock_exclusive()
            .context("Failed to acquire write lock on store")?;

        let mut writer = BufWriter::new(&file);

        for item in items {
            let line = serde_json::to_string(item).context("Failed to serialize entry")?;
            writeln!(writer, "{}", line).context("Failed to write entry")?;
        }

        writer.flush().context("Failed to flush store")?;
    }

    // Atomic rename
    fs::rename(&temp_path, path)
        .with_context(|| format!("Failed to replace store: {}", path.display()))?;

    Ok(())
}
