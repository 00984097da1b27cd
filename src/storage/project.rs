//! Project management
//!
//! Handles project initialization and snapshot access. A project is a
//! directory containing `.wbs/` with the node and edge stores plus the
//! project config.

use std::collections::HashSet;
use std::fs;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use thiserror::Error;

use crate::domain::{assign_codes, Edge, Node};

use super::{Config, EdgeStore, NodeStore};

#[derive(Debug, Error)]
pub enum ProjectError {
    #[error("Not in a wbs project. Run 'wbs init' first.")]
    NotInProject,
}

/// A WBS project
pub struct Project {
    root: PathBuf,
    config: Config,
}

impl Project {
    /// Opens an existing project at the given path
    pub fn open(root: impl Into<PathBuf>) -> Result<Self> {
        let root = root.into();
        let wbs_dir = root.join(".wbs");

        if !wbs_dir.is_dir() {
            return Err(ProjectError::NotInProject.into());
        }

        let config = Config::for_project(&root)?;

        Ok(Self { root, config })
    }

    /// Opens the project at the current directory or a parent
    pub fn open_current() -> Result<Self> {
        let root = Config::find_project_root().ok_or(ProjectError::NotInProject)?;

        Self::open(root)
    }

    /// Initializes a new project at the given path
    pub fn init(root: impl Into<PathBuf>) -> Result<Self> {
        let root = root.into();
        let wbs_dir = root.join(".wbs");

        fs::create_dir_all(&wbs_dir)
            .with_context(|| format!("Failed to create .wbs directory: {}", wbs_dir.display()))?;

        let config_path = wbs_dir.join("config.toml");
        if !config_path.exists() {
            let default_config = r#"# WBS CLI configuration

[edges]
# Treat the edge set as a proper set: reject duplicate parent/child pairs
dedupe = true

[export]
# Generator name stamped into export files
# generator = "WBS Architect"
"#;
            fs::write(&config_path, default_config)
                .with_context(|| format!("Failed to write config: {}", config_path.display()))?;
        }

        Self::open(root)
    }

    /// Returns the project root path
    pub fn root(&self) -> &Path {
        &self.root
    }

    /// Returns the .wbs directory path
    pub fn wbs_dir(&self) -> PathBuf {
        self.root.join(".wbs")
    }

    /// Returns the configuration
    pub fn config(&self) -> &Config {
        &self.config
    }

    /// Returns the node store
    pub fn node_store(&self) -> NodeStore {
        NodeStore::for_project(&self.root)
    }

    /// Returns the edge store
    pub fn edge_store(&self) -> EdgeStore {
        EdgeStore::for_project(&self.root)
    }

    /// Loads the full snapshot, applying the edge dedupe policy
    pub fn load_snapshot(&self) -> Result<(Vec<Node>, Vec<Edge>)> {
        let nodes = self.node_store().read_all()?;
        let mut edges = self.edge_store().read_all()?;

        if self.config.dedupe_edges() {
            let mut seen = HashSet::new();
            edges.retain(|e| seen.insert((e.source_id.clone(), e.target_id.clone())));
        }

        Ok((nodes, edges))
    }

    /// Persists a snapshot verbatim
    pub fn save_snapshot(&self, nodes: &[Node], edges: &[Edge]) -> Result<()> {
        self.node_store().write_all(nodes)?;
        self.edge_store().write_all(edges)?;
        Ok(())
    }

    /// Recomputes hierarchy codes and persists the refreshed snapshot
    ///
    /// This is the hook every structural change runs through. Returns the
    /// refreshed nodes so callers can report newly assigned codes.
    pub fn refresh_and_save(&self, nodes: &[Node], edges: &[Edge]) -> Result<Vec<Node>> {
        let refreshed = assign_codes(nodes, edges);
        self.save_snapshot(&refreshed, edges)?;
        Ok(refreshed)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::{NodeKind, Position};
    use tempfile::TempDir;

    fn make_node(i: usize, x: f64) -> Node {
        Node {
            id: format!("n-{:07x}", i).parse().unwrap(),
            position: Position::new(x, 0.0),
            kind: NodeKind::Task,
            label: format!("Node {}", i),
            description: None,
            progress: None,
            hierarchy_code: String::new(),
        }
    }

    #[test]
    fn init_creates_structure() {
        let dir = TempDir::new().unwrap();
        let project = Project::init(dir.path()).unwrap();

        assert!(project.wbs_dir().is_dir());
        assert!(project.wbs_dir().join("config.toml").is_file());
    }

    #[test]
    fn init_is_idempotent() {
        let dir = TempDir::new().unwrap();

        Project::init(dir.path()).unwrap();
        Project::init(dir.path()).unwrap(); // Should not fail

        assert!(dir.path().join(".wbs").is_dir());
    }

    #[test]
    fn open_existing_project() {
        let dir = TempDir::new().unwrap();
        Project::init(dir.path()).unwrap();

        let project = Project::open(dir.path()).unwrap();
        assert_eq!(project.root(), dir.path());
    }

    #[test]
    fn open_non_project_fails() {
        let dir = TempDir::new().unwrap();
        let result = Project::open(dir.path());

        assert!(result.is_err());
    }

    #[test]
    fn empty_project_loads_empty_snapshot() {
        let dir = TempDir::new().unwrap();
        let project = Project::init(dir.path()).unwrap();

        let (nodes, edges) = project.load_snapshot().unwrap();
        assert!(nodes.is_empty());
        assert!(edges.is_empty());
    }

    #[test]
    fn refresh_and_save_assigns_codes() {
        let dir = TempDir::new().unwrap();
        let project = Project::init(dir.path()).unwrap();

        let parent = make_node(0, 100.0);
        let child = make_node(1, 50.0);
        let edges = vec![Edge::new(parent.id.clone(), child.id.clone())];

        let refreshed = project
            .refresh_and_save(&[parent, child], &edges)
            .unwrap();

        assert_eq!(refreshed[0].hierarchy_code, "1");
        assert_eq!(refreshed[1].hierarchy_code, "1.1");

        let (nodes, loaded_edges) = project.load_snapshot().unwrap();
        assert_eq!(nodes, refreshed);
        assert_eq!(loaded_edges, edges);
    }

    #[test]
    fn dedupe_policy_drops_duplicate_pairs_on_load() {
        let dir = TempDir::new().unwrap();
        let project = Project::init(dir.path()).unwrap();

        let a = make_node(0, 0.0);
        let b = make_node(1, 0.0);
        let dup = Edge::new(a.id.clone(), b.id.clone());
        project
            .save_snapshot(&[a, b], &[dup.clone(), dup.clone()])
            .unwrap();

        let (_, edges) = project.load_snapshot().unwrap();
        assert_eq!(edges.len(), 1);
    }

    #[test]
    fn dedupe_disabled_keeps_duplicates() {
        let dir = TempDir::new().unwrap();
        let project = Project::init(dir.path()).unwrap();
        fs::write(
            project.wbs_dir().join("config.toml"),
            "[edges]\ndedupe = false\n",
        )
        .unwrap();
        let project = Project::open(dir.path()).unwrap();

        let a = make_node(0, 0.0);
        let b = make_node(1, 0.0);
        let dup = Edge::new(a.id.clone(), b.id.clone());
        project
            .save_snapshot(&[a, b], &[dup.clone(), dup.clone()])
            .unwrap();

        let (_, edges) = project.load_snapshot().unwrap();
        assert_eq!(edges.len(), 2);
    }
}
