//! Fleetgraph ontology layer.
//!
//! Loads the declared fleet ontology (entities + typed relationships) from
//! either of its on-disk representations, normalizes it into one canonical
//! [`Ontology`], and derives the [`AbstractGraph`] that every renderer and
//! exporter consumes.

pub mod artifact;
pub mod builtin;
pub mod graph;
pub mod loader;
pub mod model;
pub mod summary;

pub use artifact::write_artifact;
pub use builtin::builtin_ontology;
pub use graph::{AbstractGraph, GraphEdge, GraphNode};
pub use loader::{load, Loaded, OntologySource, OntologySources};
pub use model::{
    DanglingReference, Entity, Ontology, OntologyError, Relationship, ValidationMode,
};
pub use summary::OntologySummary;
