//! Canonical ontology model.
//!
//! Every loader strategy normalizes into these types. Construction goes through
//! [`Ontology::insert_entity`] / [`Ontology::push_relationship`], which enforce
//! the non-empty and unique-name invariants; the result is read-only for the
//! rest of a pipeline run.

use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::path::PathBuf;
use thiserror::Error;

// ============================================================================
// Errors
// ============================================================================

#[derive(Debug, Error)]
pub enum OntologyError {
    #[error("failed to read {}: {source}", path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("malformed JSON in {}: {source}", path.display())]
    Json {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },
    #[error("malformed YAML in {}: {source}", path.display())]
    Yaml {
        path: PathBuf,
        #[source]
        source: serde_yaml::Error,
    },
    #[error("invalid ontology: {0}")]
    Invalid(String),
    #[error("relationship {rel_type} ({from} -> {to}) references undeclared entity `{missing}`")]
    DanglingReference {
        rel_type: String,
        from: String,
        to: String,
        missing: String,
    },
}

// ============================================================================
// Entity / Relationship
// ============================================================================

/// One node type (e.g. `Aircraft`).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Entity {
    pub name: String,
    pub primary_key: String,
    #[serde(default)]
    pub tags: Vec<String>,
    #[serde(default)]
    pub description: String,
}

impl Entity {
    pub fn new(name: impl Into<String>, primary_key: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            primary_key: primary_key.into(),
            tags: Vec::new(),
            description: String::new(),
        }
    }

    pub fn with_tags<I, S>(mut self, tags: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.tags = tags.into_iter().map(Into::into).collect();
        self
    }

    pub fn with_description(mut self, description: impl Into<String>) -> Self {
        self.description = description.into();
        self
    }
}

/// One directed, typed edge definition between two entity types.
///
/// `key` is recorded verbatim; whether the field exists on both sides is the
/// graph store's problem, not ours.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Relationship {
    #[serde(rename = "from")]
    pub from_entity: String,
    #[serde(rename = "to")]
    pub to_entity: String,
    #[serde(rename = "type")]
    pub rel_type: String,
    pub key: String,
}

impl Relationship {
    pub fn new(
        from_entity: impl Into<String>,
        to_entity: impl Into<String>,
        rel_type: impl Into<String>,
        key: impl Into<String>,
    ) -> Self {
        Self {
            from_entity: from_entity.into(),
            to_entity: to_entity.into(),
            rel_type: rel_type.into(),
            key: key.into(),
        }
    }
}

// ============================================================================
// Ontology
// ============================================================================

/// How relationship endpoints that name no declared entity are treated.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ValidationMode {
    /// Report dangling references and keep going (downstream renders an
    /// implicit node / the script matches nothing).
    #[default]
    Permissive,
    /// Reject the ontology on the first dangling reference.
    Strict,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct DanglingReference {
    pub rel_type: String,
    pub from: String,
    pub to: String,
    pub missing: String,
}

impl std::fmt::Display for DanglingReference {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "relationship {} ({} -> {}) references undeclared entity `{}`",
            self.rel_type, self.from, self.to, self.missing
        )
    }
}

/// Entities in declaration order plus the ordered relationship list.
#[derive(Debug, Clone, Default, Serialize)]
pub struct Ontology {
    pub(crate) entities: Vec<Entity>,
    #[serde(skip)]
    pub(crate) index: HashMap<String, usize>,
    pub(crate) relationships: Vec<Relationship>,
}

impl PartialEq for Ontology {
    fn eq(&self, other: &Self) -> bool {
        self.entities == other.entities && self.relationships == other.relationships
    }
}

impl Eq for Ontology {}

impl Ontology {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn from_parts(
        entities: impl IntoIterator<Item = Entity>,
        relationships: impl IntoIterator<Item = Relationship>,
    ) -> Result<Self, OntologyError> {
        let mut ontology = Self::new();
        for entity in entities {
            ontology.insert_entity(entity)?;
        }
        for rel in relationships {
            ontology.push_relationship(rel)?;
        }
        Ok(ontology)
    }

    pub fn insert_entity(&mut self, entity: Entity) -> Result<(), OntologyError> {
        if entity.name.trim().is_empty() {
            return Err(OntologyError::Invalid("entity name must be non-empty".to_string()));
        }
        if entity.primary_key.trim().is_empty() {
            return Err(OntologyError::Invalid(format!(
                "entity `{}` has an empty primary_key",
                entity.name
            )));
        }
        if self.index.contains_key(&entity.name) {
            return Err(OntologyError::Invalid(format!(
                "entity `{}` is declared more than once",
                entity.name
            )));
        }
        self.index.insert(entity.name.clone(), self.entities.len());
        self.entities.push(entity);
        Ok(())
    }

    pub fn push_relationship(&mut self, rel: Relationship) -> Result<(), OntologyError> {
        let fields = [
            ("from", &rel.from_entity),
            ("to", &rel.to_entity),
            ("type", &rel.rel_type),
            ("key", &rel.key),
        ];
        if let Some((field, _)) = fields.iter().find(|(_, v)| v.trim().is_empty()) {
            return Err(OntologyError::Invalid(format!(
                "relationship #{} has an empty `{field}`",
                self.relationships.len() + 1
            )));
        }
        self.relationships.push(rel);
        Ok(())
    }

    pub fn entities(&self) -> &[Entity] {
        &self.entities
    }

    pub fn relationships(&self) -> &[Relationship] {
        &self.relationships
    }

    pub fn entity(&self, name: &str) -> Option<&Entity> {
        self.index.get(name).map(|&i| &self.entities[i])
    }

    pub fn contains_entity(&self, name: &str) -> bool {
        self.index.contains_key(name)
    }

    pub fn is_empty(&self) -> bool {
        self.entities.is_empty() && self.relationships.is_empty()
    }

    /// Every relationship endpoint that names no declared entity, in
    /// relationship order (`from` before `to`).
    pub fn dangling_references(&self) -> Vec<DanglingReference> {
        let mut out = Vec::new();
        for rel in &self.relationships {
            for endpoint in [&rel.from_entity, &rel.to_entity] {
                if !self.contains_entity(endpoint) {
                    out.push(DanglingReference {
                        rel_type: rel.rel_type.clone(),
                        from: rel.from_entity.clone(),
                        to: rel.to_entity.clone(),
                        missing: endpoint.clone(),
                    });
                }
            }
        }
        out
    }

    /// Applies `mode` to the dangling-reference check.
    ///
    /// Permissive mode returns the findings as diagnostics; strict mode turns
    /// the first one into an error.
    pub fn check_references(
        &self,
        mode: ValidationMode,
    ) -> Result<Vec<DanglingReference>, OntologyError> {
        let dangling = self.dangling_references();
        match (mode, dangling.first()) {
            (ValidationMode::Strict, Some(d)) => Err(OntologyError::DanglingReference {
                rel_type: d.rel_type.clone(),
                from: d.from.clone(),
                to: d.to.clone(),
                missing: d.missing.clone(),
            }),
            _ => {
                for d in &dangling {
                    tracing::warn!("{d}");
                }
                Ok(dangling)
            }
        }
    }
}
