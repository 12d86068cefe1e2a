//! Self-contained vis-network HTML view of the ontology graph.
//!
//! Node color comes from the entity's tags: the first tag (in declared order)
//! that appears in [`TAG_COLORS`] wins, anything else falls back to
//! [`DEFAULT_COLOR`]. The page pulls vis-network from a CDN and otherwise
//! embeds everything it needs.

use anyhow::{Context, Result};
use fleetgraph_ontology::{write_artifact, AbstractGraph, Ontology};
use serde::Serialize;
use std::path::{Path, PathBuf};
use tracing::info;

pub const TAG_COLORS: [(&str, &str); 5] = [
    ("asset", "#2b8a3e"),
    ("telemetry", "#1d4ed8"),
    ("maintenance", "#b45309"),
    ("component", "#7c3aed"),
    ("signal", "#dc2626"),
];

pub const DEFAULT_COLOR: &str = "#64748b";

pub const VIS_NETWORK_URL: &str =
    "https://cdnjs.cloudflare.com/ajax/libs/vis-network/9.1.9/standalone/umd/vis-network.min.js";

const PAGE_TITLE: &str = "Ontology Graph (Interactive)";

pub fn pick_color<S: AsRef<str>>(tags: &[S]) -> &'static str {
    tags.iter()
        .find_map(|tag| {
            TAG_COLORS
                .iter()
                .find(|(name, _)| *name == tag.as_ref())
                .map(|(_, color)| *color)
        })
        .unwrap_or(DEFAULT_COLOR)
}

pub fn escape_html(s: &str) -> String {
    let mut out = String::with_capacity(s.len());
    for c in s.chars() {
        match c {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&quot;"),
            '\'' => out.push_str("&#x27;"),
            _ => out.push(c),
        }
    }
    out
}

#[derive(Debug, Clone, Serialize)]
pub struct NodeColor {
    pub background: &'static str,
    pub border: &'static str,
    pub highlight: Highlight,
}

#[derive(Debug, Clone, Serialize)]
pub struct Highlight {
    pub background: &'static str,
    pub border: &'static str,
}

#[derive(Debug, Clone, Serialize)]
pub struct Font {
    pub size: u32,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub bold: Option<bool>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub align: Option<&'static str>,
}

#[derive(Debug, Clone, Serialize)]
pub struct VisNode {
    pub id: String,
    pub label: String,
    pub title: String,
    pub shape: &'static str,
    pub size: u32,
    pub color: NodeColor,
    pub font: Font,
}

#[derive(Debug, Clone, Serialize)]
pub struct Smooth {
    #[serde(rename = "type")]
    pub kind: &'static str,
}

#[derive(Debug, Clone, Serialize)]
pub struct VisEdge {
    pub from: String,
    pub to: String,
    pub label: String,
    pub title: String,
    pub arrows: &'static str,
    pub color: &'static str,
    pub font: Font,
    pub smooth: Smooth,
}

#[derive(Debug, Clone, Serialize)]
pub struct VisData {
    pub nodes: Vec<VisNode>,
    pub edges: Vec<VisEdge>,
}

impl VisData {
    /// Nodes in graph order, colored and captioned from `entity_meta`.
    ///
    /// Endpoints that the ontology never declares still get a node, in the
    /// default color with placeholder tooltip fields.
    pub fn build(graph: &AbstractGraph, entity_meta: &Ontology) -> Self {
        let nodes = graph
            .node_ids()
            .into_iter()
            .map(|id| {
                let entity = entity_meta.entity(id);
                let (color, tags, pk) = match entity {
                    Some(e) => (
                        pick_color(&e.tags),
                        if e.tags.is_empty() {
                            "-".to_string()
                        } else {
                            e.tags.join(", ")
                        },
                        e.primary_key.as_str(),
                    ),
                    None => (DEFAULT_COLOR, "-".to_string(), "-"),
                };
                VisNode {
                    id: id.to_string(),
                    label: id.to_string(),
                    title: format!(
                        "<b>{}</b><br>Tags: {}<br>PK: {}",
                        escape_html(id),
                        escape_html(&tags),
                        escape_html(pk)
                    ),
                    shape: "dot",
                    size: 20,
                    color: NodeColor {
                        background: color,
                        border: "#111",
                        highlight: Highlight {
                            background: color,
                            border: "#111",
                        },
                    },
                    font: Font {
                        size: 16,
                        bold: Some(true),
                        align: None,
                    },
                }
            })
            .collect();

        let edges = graph
            .edges
            .iter()
            .map(|e| VisEdge {
                from: e.source.clone(),
                to: e.target.clone(),
                label: e.rel_type.clone(),
                // Edge titles reach vis-network as plain text.
                title: format!("{} (key: {})", e.rel_type, e.key),
                arrows: "to",
                color: "#555",
                font: Font {
                    size: 12,
                    bold: None,
                    align: Some("top"),
                },
                smooth: Smooth { kind: "dynamic" },
            })
            .collect();

        Self { nodes, edges }
    }
}

fn network_options() -> serde_json::Value {
    serde_json::json!({
        "physics": {
            "solver": "barnesHut",
            "barnesHut": {
                "gravitationalConstant": -3000,
                "centralGravity": 0.3,
                "springLength": 150,
                "springConstant": 0.04,
                "damping": 0.09
            },
            "stabilization": { "enabled": true, "iterations": 250 }
        },
        "interaction": { "hover": true, "tooltipDelay": 120 },
        "nodes": { "shape": "dot" },
        "edges": { "arrows": { "to": { "enabled": true } } }
    })
}

fn legend_html() -> String {
    TAG_COLORS
        .iter()
        .map(|(tag, color)| {
            format!(r#"<span class="pill"><span class="swatch" style="background:{color}"></span>{tag}</span>"#)
        })
        .collect::<Vec<_>>()
        .join("\n      ")
}

/// Embeds JSON in a `<script>` block without letting data close the tag.
fn script_json<T: Serialize>(value: &T) -> Result<String> {
    Ok(serde_json::to_string(value)?.replace("</", "<\\/"))
}

pub fn render_html(graph: &AbstractGraph, entity_meta: &Ontology) -> Result<String> {
    let data = VisData::build(graph, entity_meta);

    let template = include_str!("../templates/ontology_graph.html");
    let values = [
        ("TITLE", PAGE_TITLE.to_string()),
        ("VIS_NETWORK_URL", VIS_NETWORK_URL.to_string()),
        ("LEGEND", legend_html()),
        ("NODES_COUNT", data.nodes.len().to_string()),
        ("EDGES_COUNT", data.edges.len().to_string()),
        ("OPTIONS_JSON", script_json(&network_options())?),
        ("NODES_JSON", script_json(&data.nodes)?),
        ("EDGES_JSON", script_json(&data.edges)?),
    ];
    Ok(fill_template(template, &values))
}

/// Substitutes `{{NAME}}` placeholders in one left-to-right pass.
///
/// Inserted values are never rescanned, so data that happens to look like a
/// placeholder stays verbatim. Unknown placeholders are kept as written.
fn fill_template(template: &str, values: &[(&str, String)]) -> String {
    let mut out = String::with_capacity(template.len());
    let mut rest = template;
    while let Some(start) = rest.find("{{") {
        out.push_str(&rest[..start]);
        let after = &rest[start + 2..];
        let Some(end) = after.find("}}") else {
            out.push_str(&rest[start..]);
            return out;
        };
        let name = &after[..end];
        match values.iter().find(|(key, _)| *key == name) {
            Some((_, value)) => out.push_str(value),
            None => {
                out.push_str("{{");
                out.push_str(name);
                out.push_str("}}");
            }
        }
        rest = &after[end + 2..];
    }
    out.push_str(rest);
    out
}

#[derive(Debug, Clone)]
pub struct InteractiveReport {
    pub path: PathBuf,
    pub nodes: usize,
    pub edges: usize,
}

pub fn render_interactive(
    graph: &AbstractGraph,
    entity_meta: &Ontology,
    out: &Path,
) -> Result<InteractiveReport> {
    let html = render_html(graph, entity_meta)?;
    write_artifact(out, html).with_context(|| format!("failed to write {}", out.display()))?;

    let nodes = graph.node_ids().len();
    info!(path = %out.display(), nodes, edges = graph.edges.len(), "wrote interactive graph");
    Ok(InteractiveReport {
        path: out.to_path_buf(),
        nodes,
        edges: graph.edges.len(),
    })
}
