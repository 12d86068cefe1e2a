//! Text exports of the abstract graph for external tooling.

use anyhow::Result;
use fleetgraph_ontology::AbstractGraph;

pub fn render_dot(graph: &AbstractGraph) -> String {
    fn dot_escape(s: &str) -> String {
        s.replace('\\', "\\\\").replace('"', "\\\"")
    }

    let mut out = String::new();
    out.push_str("digraph Ontology {\n");
    out.push_str("  rankdir=LR;\n");
    out.push_str("  node [shape=ellipse, style=filled, fillcolor=\"#d9e8ff\", fontname=\"Helvetica\"];\n");
    out.push_str("  edge [color=\"#555555\", fontname=\"Helvetica\", fontsize=10];\n\n");

    let declared = graph.nodes.len();
    for (i, id) in graph.node_ids().into_iter().enumerate() {
        if i < declared {
            out.push_str(&format!("  \"{}\";\n", dot_escape(id)));
        } else {
            out.push_str(&format!("  \"{}\" [style=dashed];\n", dot_escape(id)));
        }
    }
    if !graph.edges.is_empty() {
        out.push('\n');
    }
    for e in &graph.edges {
        out.push_str(&format!(
            "  \"{}\" -> \"{}\" [label=\"{}\"];\n",
            dot_escape(&e.source),
            dot_escape(&e.target),
            dot_escape(&format!("{} ({})", e.rel_type, e.key))
        ));
    }

    out.push_str("}\n");
    out
}

pub fn render_json(graph: &AbstractGraph) -> Result<String> {
    Ok(serde_json::to_string_pretty(graph)?)
}

#[cfg(test)]
mod tests {
    use super::*;
    use fleetgraph_ontology::{builtin_ontology, Entity, Ontology, Relationship};

    #[test]
    fn dot_lists_nodes_and_labeled_edges() {
        let dot = render_dot(&AbstractGraph::build(&builtin_ontology()));
        assert!(dot.starts_with("digraph Ontology {\n"));
        assert!(dot.contains("  \"Aircraft\";\n"));
        assert!(dot.contains(
            "  \"WorkOrder\" -> \"Part\" [label=\"CONSUMES_COMPONENT (part_number)\"];\n"
        ));
        assert_eq!(dot.matches(" -> ").count(), 4);
        assert!(dot.ends_with("}\n"));
    }

    #[test]
    fn dot_marks_undeclared_endpoints() {
        let o = Ontology::from_parts(
            [Entity::new("Say \"hi\"", "id")],
            [Relationship::new("Say \"hi\"", "Ghost", "HAUNTS", "id")],
        )
        .unwrap();
        let dot = render_dot(&AbstractGraph::build(&o));
        assert!(dot.contains("  \"Say \\\"hi\\\"\";\n"));
        assert!(dot.contains("  \"Ghost\" [style=dashed];\n"));
    }

    #[test]
    fn json_uses_wire_field_names() {
        let json = render_json(&AbstractGraph::build(&builtin_ontology())).unwrap();
        let value: serde_json::Value = serde_json::from_str(&json).unwrap();
        assert_eq!(value["nodes"].as_array().unwrap().len(), 5);
        assert_eq!(value["edges"][0]["type"], "HAS_TELEMETRY");
        assert_eq!(value["edges"][0]["source"], "Aircraft");
    }
}
