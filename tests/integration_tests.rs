//! Integration tests for the complete Fleetgraph pipeline
//!
//! These tests verify end-to-end functionality across crates:
//! - Loader → Graph → Static PNG / Interactive HTML
//! - Loader → Cypher script
//! - Flat catalogs and declarative YAML agreeing on the same ontology
//!
//! Run with: cargo test --test integration_tests

use fleetgraph_cli::pipeline::run_all;
use fleetgraph_cli::PipelinePaths;
use fleetgraph_cypher::{generate, RELATIONSHIPS_MARKER};
use fleetgraph_ontology::loader::{parse_declarative, parse_flat_catalogs};
use fleetgraph_ontology::{load, AbstractGraph, OntologySource, OntologySources, ValidationMode};
use fleetgraph_viz::{render_interactive, render_static};
use std::fs;
use tempfile::tempdir;

// ============================================================================
// Default scenario (no ontology files)
// ============================================================================

#[test]
fn test_builtin_fallback_renders_five_nodes_four_edges() {
    let dir = tempdir().unwrap();
    let loaded = load(
        &OntologySources::in_dir(dir.path().join("ontology")),
        ValidationMode::Strict,
    )
    .unwrap();
    assert_eq!(loaded.source, OntologySource::BuiltIn);

    let graph = AbstractGraph::build(&loaded.ontology);
    assert_eq!((graph.nodes.len(), graph.edges.len()), (5, 4));

    let png = dir.path().join("artifacts/ontology_graph.png");
    let report = render_static(&graph, &png).unwrap();
    assert_eq!((report.nodes, report.edges), (5, 4));
    image::open(&png).unwrap();

    let html = dir.path().join("artifacts/ontology_graph_interactive.html");
    render_interactive(&graph, &loaded.ontology, &html).unwrap();
    let page = fs::read_to_string(&html).unwrap();
    for color in ["#2b8a3e", "#1d4ed8", "#b45309", "#7c3aed", "#dc2626"] {
        assert!(page.contains(&format!(r#""background":"{color}""#)), "{color}");
    }
}

#[test]
fn test_run_all_is_idempotent() {
    let dir = tempdir().unwrap();
    let paths = PipelinePaths::from_base(dir.path());

    run_all(&paths, ValidationMode::Permissive, 2000).unwrap();
    let first = (
        fs::read(paths.static_png()).unwrap(),
        fs::read(paths.interactive_html()).unwrap(),
        fs::read(paths.cypher_script()).unwrap(),
    );
    run_all(&paths, ValidationMode::Permissive, 2000).unwrap();
    let second = (
        fs::read(paths.static_png()).unwrap(),
        fs::read(paths.interactive_html()).unwrap(),
        fs::read(paths.cypher_script()).unwrap(),
    );
    assert_eq!(first, second);
}

// ============================================================================
// Source representations
// ============================================================================

#[test]
fn test_flat_and_declarative_sources_agree_on_graph_shape() {
    let flat = parse_flat_catalogs(
        r#"{"concepts": {"Aircraft": {}, "SensorReading": {}}}"#,
        r#"{"relationships": [
            {"from": "Aircraft", "to": "SensorReading", "type": "HAS_TELEMETRY", "key": "id"}
        ]}"#,
    )
    .unwrap();
    let yaml = parse_declarative(
        r#"
entities:
  Aircraft: {}
  SensorReading: {}
relations:
  telemetry:
    from: Aircraft
    to: SensorReading
    type: HAS_TELEMETRY
"#,
    )
    .unwrap();

    assert_eq!(flat, yaml);
    assert_eq!(AbstractGraph::build(&flat), AbstractGraph::build(&yaml));
    assert_eq!(generate(&flat).render(), generate(&yaml).render());
}

#[test]
fn test_cypher_round_trip_from_files() {
    let dir = tempdir().unwrap();
    let paths = PipelinePaths::from_base(dir.path());
    fs::create_dir_all(&paths.ontology_dir).unwrap();
    fs::write(
        paths.sources().concepts,
        r#"{"concepts": {
            "WorkOrder": {"primary_key": "wo_id", "tags": ["maintenance"]},
            "Part": {"primary_key": "part_number", "tags": ["component"]}
        }}"#,
    )
    .unwrap();
    fs::write(
        paths.sources().relationships,
        r#"{"relationships": [
            {"from": "WorkOrder", "to": "Part", "type": "CONSUMES_COMPONENT", "key": "part_number"}
        ]}"#,
    )
    .unwrap();

    run_all(&paths, ValidationMode::Strict, 2000).unwrap();
    let script = fs::read_to_string(paths.cypher_script()).unwrap();
    assert_eq!(
        script,
        [
            "CREATE CONSTRAINT IF NOT EXISTS FOR (n:WorkOrder) REQUIRE n.wo_id IS UNIQUE;",
            "CREATE CONSTRAINT IF NOT EXISTS FOR (n:Part) REQUIRE n.part_number IS UNIQUE;",
            RELATIONSHIPS_MARKER,
            "MATCH (a:WorkOrder), (b:Part)",
            "WHERE a.part_number = b.part_number",
            "MERGE (a)-[:CONSUMES_COMPONENT]->(b);",
        ]
        .join("\n")
    );
}

#[test]
fn test_empty_declarative_ontology_still_produces_artifacts() {
    let dir = tempdir().unwrap();
    let paths = PipelinePaths::from_base(dir.path());
    fs::create_dir_all(&paths.ontology_dir).unwrap();
    fs::write(paths.sources().declarative, "entities: {}\nrelations: {}\n").unwrap();

    run_all(&paths, ValidationMode::Strict, 2000).unwrap();
    assert_eq!(
        fs::read_to_string(paths.cypher_script()).unwrap(),
        RELATIONSHIPS_MARKER
    );
    assert!(fs::read_to_string(paths.interactive_html())
        .unwrap()
        .contains("new vis.DataSet([])"));
    let img = image::open(paths.static_png()).unwrap();
    assert_eq!((img.width(), img.height()), (1620, 1260));
}

#[test]
fn test_malformed_source_is_fatal() {
    let dir = tempdir().unwrap();
    let paths = PipelinePaths::from_base(dir.path());
    fs::create_dir_all(&paths.ontology_dir).unwrap();
    fs::write(paths.sources().declarative, "entities: [unclosed\n").unwrap();

    let err = run_all(&paths, ValidationMode::Permissive, 2000).unwrap_err();
    assert!(format!("{err:#}").contains("base_zero.yaml"));
    assert!(!paths.static_png().exists());
}
