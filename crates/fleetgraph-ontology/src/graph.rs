//! Abstract graph derived from an [`Ontology`].
//!
//! Built fresh for every render and never cached. Node order follows entity
//! declaration order, edge order follows relationship order, and parallel
//! edges between the same pair are kept distinct.

use crate::model::Ontology;
use serde::Serialize;
use std::collections::{HashMap, HashSet};

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct GraphNode {
    pub id: String,
    pub label: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct GraphEdge {
    pub source: String,
    pub target: String,
    #[serde(rename = "type")]
    pub rel_type: String,
    pub key: String,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct AbstractGraph {
    pub nodes: Vec<GraphNode>,
    pub edges: Vec<GraphEdge>,
}

impl AbstractGraph {
    pub fn build(ontology: &Ontology) -> Self {
        let nodes = ontology
            .entities()
            .iter()
            .map(|e| GraphNode {
                id: e.name.clone(),
                label: e.name.clone(),
            })
            .collect();
        let edges = ontology
            .relationships()
            .iter()
            .map(|r| GraphEdge {
                source: r.from_entity.clone(),
                target: r.to_entity.clone(),
                rel_type: r.rel_type.clone(),
                key: r.key.clone(),
            })
            .collect();
        Self { nodes, edges }
    }

    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty() && self.edges.is_empty()
    }

    /// Edge endpoints that are not declared nodes, first-seen order, no repeats.
    ///
    /// Renderers draw these in the default style.
    pub fn implicit_nodes(&self) -> Vec<&str> {
        let declared: HashSet<&str> = self.nodes.iter().map(|n| n.id.as_str()).collect();
        let mut seen = HashSet::new();
        let mut out = Vec::new();
        for e in &self.edges {
            for endpoint in [e.source.as_str(), e.target.as_str()] {
                if !declared.contains(endpoint) && seen.insert(endpoint) {
                    out.push(endpoint);
                }
            }
        }
        out
    }

    /// Declared nodes followed by implicit ones; the index every renderer lays out.
    pub fn node_ids(&self) -> Vec<&str> {
        let mut ids: Vec<&str> = self.nodes.iter().map(|n| n.id.as_str()).collect();
        ids.extend(self.implicit_nodes());
        ids
    }

    pub fn node_positions(&self) -> HashMap<&str, usize> {
        self.node_ids()
            .into_iter()
            .enumerate()
            .map(|(i, id)| (id, i))
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::builtin::builtin_ontology;
    use crate::model::{Entity, Relationship};

    #[test]
    fn builtin_graph_shape() {
        let g = AbstractGraph::build(&builtin_ontology());
        assert_eq!(g.nodes.len(), 5);
        assert_eq!(g.edges.len(), 4);
        assert_eq!(g.edges[2].source, "WorkOrder");
        assert_eq!(g.edges[2].target, "Part");
        assert_eq!(g.edges[2].key, "part_number");
        assert!(g.implicit_nodes().is_empty());
    }

    #[test]
    fn parallel_edges_with_different_types_stay_distinct() {
        let o = Ontology::from_parts(
            [Entity::new("A", "id"), Entity::new("B", "id")],
            [
                Relationship::new("A", "B", "OWNS", "id"),
                Relationship::new("A", "B", "WATCHES", "id"),
            ],
        )
        .unwrap();
        let g = AbstractGraph::build(&o);
        assert_eq!(g.edges.len(), 2);
        assert_ne!(g.edges[0].rel_type, g.edges[1].rel_type);
    }

    #[test]
    fn dangling_endpoints_become_implicit_nodes() {
        let o = Ontology::from_parts(
            [Entity::new("A", "id")],
            [
                Relationship::new("A", "Ghost", "R1", "id"),
                Relationship::new("Ghost", "Other", "R2", "id"),
            ],
        )
        .unwrap();
        let g = AbstractGraph::build(&o);
        assert_eq!(g.nodes.len(), 1);
        assert_eq!(g.implicit_nodes(), ["Ghost", "Other"]);
        assert_eq!(g.node_ids(), ["A", "Ghost", "Other"]);
    }

    #[test]
    fn empty_ontology_builds_empty_graph() {
        let g = AbstractGraph::build(&Ontology::new());
        assert!(g.is_empty());
        assert!(g.node_ids().is_empty());
    }
}
