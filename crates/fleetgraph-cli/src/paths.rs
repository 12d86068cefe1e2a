//! Conventional on-disk layout of a fleetgraph project.
//!
//! ```text
//! <base>/ontology/{concepts.json, relationships.json, base_zero.yaml}
//! <base>/artifacts/{ontology_graph.png, ontology_graph_interactive.html, ontology_graph.cypher}
//! ```

use fleetgraph_ontology::OntologySources;
use std::path::{Path, PathBuf};

pub const ONTOLOGY_DIR: &str = "ontology";
pub const ARTIFACTS_DIR: &str = "artifacts";
pub const STATIC_PNG: &str = "ontology_graph.png";
pub const INTERACTIVE_HTML: &str = "ontology_graph_interactive.html";
pub const CYPHER_SCRIPT: &str = "ontology_graph.cypher";

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PipelinePaths {
    pub base: PathBuf,
    pub ontology_dir: PathBuf,
    pub artifacts_dir: PathBuf,
}

impl PipelinePaths {
    pub fn from_base(base: impl AsRef<Path>) -> Self {
        let base = base.as_ref().to_path_buf();
        Self {
            ontology_dir: base.join(ONTOLOGY_DIR),
            artifacts_dir: base.join(ARTIFACTS_DIR),
            base,
        }
    }

    pub fn sources(&self) -> OntologySources {
        OntologySources::in_dir(&self.ontology_dir)
    }

    pub fn static_png(&self) -> PathBuf {
        self.artifacts_dir.join(STATIC_PNG)
    }

    pub fn interactive_html(&self) -> PathBuf {
        self.artifacts_dir.join(INTERACTIVE_HTML)
    }

    pub fn cypher_script(&self) -> PathBuf {
        self.artifacts_dir.join(CYPHER_SCRIPT)
    }
}

impl Default for PipelinePaths {
    fn default() -> Self {
        Self::from_base(".")
    }
}
