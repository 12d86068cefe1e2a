//! Pipeline steps as plain functions.
//!
//! Every step loads the ontology fresh, so steps can run in any order or
//! alone. Each returns a [`StepReport`] naming the artifact it wrote and any
//! non-fatal diagnostics (fallback source, dangling references).

use crate::paths::PipelinePaths;
use anyhow::{Context, Result};
use fleetgraph_ontology::{
    load, write_artifact, AbstractGraph, Loaded, OntologySource, OntologySummary, ValidationMode,
};
use std::fmt;
use std::path::{Path, PathBuf};
use tracing::info;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Step {
    Show,
    Static,
    Interactive,
    Cypher,
    Export,
}

impl fmt::Display for Step {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Self::Show => "show",
            Self::Static => "static",
            Self::Interactive => "interactive",
            Self::Cypher => "cypher",
            Self::Export => "export",
        })
    }
}

#[derive(Debug, Clone)]
pub struct StepReport {
    pub step: Step,
    pub artifact: Option<PathBuf>,
    pub summary: String,
    pub diagnostics: Vec<String>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ExportFormat {
    Dot,
    Json,
}

/// Loads the ontology and turns fallback/dangling findings into diagnostics.
pub fn load_ontology(paths: &PipelinePaths, mode: ValidationMode) -> Result<(Loaded, Vec<String>)> {
    let loaded = load(&paths.sources(), mode)
        .with_context(|| format!("failed to load ontology from {}", paths.ontology_dir.display()))?;

    let mut diagnostics = Vec::new();
    if loaded.source == OntologySource::BuiltIn {
        diagnostics.push(format!(
            "no ontology files under {}; using the built-in default",
            paths.ontology_dir.display()
        ));
    }
    diagnostics.extend(loaded.dangling.iter().map(ToString::to_string));
    Ok((loaded, diagnostics))
}

pub fn show(paths: &PipelinePaths, mode: ValidationMode) -> Result<StepReport> {
    let (loaded, diagnostics) = load_ontology(paths, mode)?;
    let summary = OntologySummary::of(&loaded.ontology);
    Ok(StepReport {
        step: Step::Show,
        artifact: None,
        summary: format!("Ontology source: {}\n\n{summary}", loaded.source),
        diagnostics,
    })
}

pub fn build_static(
    paths: &PipelinePaths,
    mode: ValidationMode,
    out: Option<&Path>,
    svg_out: Option<&Path>,
) -> Result<StepReport> {
    let (loaded, diagnostics) = load_ontology(paths, mode)?;
    let graph = AbstractGraph::build(&loaded.ontology);
    let out = out.map_or_else(|| paths.static_png(), Path::to_path_buf);

    let report = fleetgraph_viz::render_static(&graph, &out)?;
    if let Some(svg_out) = svg_out {
        let svg = fleetgraph_viz::render_svg(&graph, &fleetgraph_viz::StaticStyle::default());
        write_artifact(svg_out, svg)
            .with_context(|| format!("failed to write {}", svg_out.display()))?;
        info!(path = %svg_out.display(), "wrote static graph svg");
    }

    Ok(StepReport {
        step: Step::Static,
        artifact: Some(report.path),
        summary: format!(
            "nodes={} edges={} size={}x{}",
            report.nodes, report.edges, report.width, report.height
        ),
        diagnostics,
    })
}

pub fn build_interactive(
    paths: &PipelinePaths,
    mode: ValidationMode,
    out: Option<&Path>,
) -> Result<StepReport> {
    let (loaded, diagnostics) = load_ontology(paths, mode)?;
    let graph = AbstractGraph::build(&loaded.ontology);
    let out = out.map_or_else(|| paths.interactive_html(), Path::to_path_buf);

    let report = fleetgraph_viz::render_interactive(&graph, &loaded.ontology, &out)?;
    Ok(StepReport {
        step: Step::Interactive,
        artifact: Some(report.path),
        summary: format!("nodes={} edges={}", report.nodes, report.edges),
        diagnostics,
    })
}

/// Writes the Cypher script; the summary carries the first `preview_chars` characters.
pub fn build_cypher(
    paths: &PipelinePaths,
    mode: ValidationMode,
    out: Option<&Path>,
    preview_chars: usize,
) -> Result<StepReport> {
    let (loaded, diagnostics) = load_ontology(paths, mode)?;
    let out = out.map_or_else(|| paths.cypher_script(), Path::to_path_buf);

    let script = fleetgraph_cypher::generate_to_file(&loaded.ontology, &out)?;
    Ok(StepReport {
        step: Step::Cypher,
        artifact: Some(out),
        summary: script.preview(preview_chars),
        diagnostics,
    })
}

pub fn export(
    paths: &PipelinePaths,
    mode: ValidationMode,
    format: ExportFormat,
    out: &Path,
) -> Result<StepReport> {
    let (loaded, diagnostics) = load_ontology(paths, mode)?;
    let graph = AbstractGraph::build(&loaded.ontology);
    let text = match format {
        ExportFormat::Dot => fleetgraph_viz::render_dot(&graph),
        ExportFormat::Json => fleetgraph_viz::render_json(&graph)?,
    };
    write_artifact(out, text).with_context(|| format!("failed to write {}", out.display()))?;
    info!(path = %out.display(), ?format, "exported graph");

    Ok(StepReport {
        step: Step::Export,
        artifact: Some(out.to_path_buf()),
        summary: format!(
            "nodes={} edges={}",
            graph.node_ids().len(),
            graph.edges.len()
        ),
        diagnostics,
    })
}

/// Static image, interactive page, then Cypher script, all at default paths.
pub fn run_all(paths: &PipelinePaths, mode: ValidationMode, preview_chars: usize) -> Result<Vec<StepReport>> {
    Ok(vec![
        build_static(paths, mode, None, None)?,
        build_interactive(paths, mode, None)?,
        build_cypher(paths, mode, None, preview_chars)?,
    ])
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;

    #[test]
    fn missing_ontology_dir_falls_back_with_a_diagnostic() {
        let dir = tempfile::tempdir().unwrap();
        let paths = PipelinePaths::from_base(dir.path());
        let report = show(&paths, ValidationMode::Permissive).unwrap();
        assert!(report.summary.starts_with("Ontology source: built-in default"));
        assert!(report.summary.contains("Aircraft"));
        assert_eq!(report.diagnostics.len(), 1);
        assert!(report.artifact.is_none());
    }

    #[test]
    fn strict_mode_fails_on_dangling_reference() {
        let dir = tempfile::tempdir().unwrap();
        let paths = PipelinePaths::from_base(dir.path());
        fs::create_dir_all(&paths.ontology_dir).unwrap();
        fs::write(
            paths.sources().declarative,
            "entities:\n  Aircraft: {}\nrelations:\n  parked:\n    from: Aircraft\n    to: Hangar\n",
        )
        .unwrap();

        let permissive = build_cypher(&paths, ValidationMode::Permissive, None, 100).unwrap();
        assert_eq!(permissive.diagnostics.len(), 1);
        assert!(permissive.diagnostics[0].contains("Hangar"));
        // Declarative entities always key on `id`.
        assert!(fs::read_to_string(paths.cypher_script())
            .unwrap()
            .contains("FOR (n:Aircraft) REQUIRE n.id IS UNIQUE;"));

        let err = build_cypher(&paths, ValidationMode::Strict, None, 100).unwrap_err();
        assert!(format!("{err:#}").contains("Hangar"));
    }
}
