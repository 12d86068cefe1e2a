//! Built-in fleet-health ontology.
//!
//! Used when no ontology source is present; doubles as the smoke-test fixture.

use crate::model::{Entity, Ontology, Relationship};

/// `(name, primary_key, tag)`
const ENTITIES: &[(&str, &str, &str)] = &[
    ("Aircraft", "aircraft_id", "asset"),
    ("SensorReading", "reading_id", "telemetry"),
    ("WorkOrder", "wo_id", "maintenance"),
    ("Part", "part_number", "component"),
    ("Alert", "alert_id", "signal"),
];

/// `(from, to, type, key)`
const RELATIONSHIPS: &[(&str, &str, &str, &str)] = &[
    ("Aircraft", "SensorReading", "HAS_TELEMETRY", "aircraft_id"),
    ("Aircraft", "WorkOrder", "HAS_MAINTENANCE_ACTION", "aircraft_id"),
    ("WorkOrder", "Part", "CONSUMES_COMPONENT", "part_number"),
    ("Aircraft", "Alert", "HAS_HEALTH_SIGNAL", "aircraft_id"),
];

pub fn builtin_ontology() -> Ontology {
    let mut ontology = Ontology::new();
    for &(name, pk, tag) in ENTITIES {
        ontology
            .index
            .insert(name.to_string(), ontology.entities.len());
        ontology
            .entities
            .push(Entity::new(name, pk).with_tags([tag]));
    }
    ontology.relationships = RELATIONSHIPS
        .iter()
        .map(|&(from, to, ty, key)| Relationship::new(from, to, ty, key))
        .collect();
    ontology
}
