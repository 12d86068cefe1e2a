//! Ontology loading.
//!
//! Two interchangeable on-disk representations normalize into one
//! [`Ontology`]:
//!
//! - **flat catalogs**: `concepts.json` (`{"concepts": {Name: {primary_key, tags, description}}}`)
//!   plus `relationships.json` (`{"relationships": [{from, to, type, key}]}`)
//! - **declarative source**: `base_zero.yaml` with `entities` and `relations` maps
//!
//! Strategy selection looks only at which files exist. Flat catalogs shadow
//! the declarative file, which shadows the built-in ontology; sources are
//! never merged.

use crate::builtin::builtin_ontology;
use crate::model::{
    DanglingReference, Entity, Ontology, OntologyError, Relationship, ValidationMode,
};
use serde::{Deserialize, Serialize};
use serde_json::Value as JsonValue;
use std::fmt;
use std::fs;
use std::path::{Path, PathBuf};
use tracing::{debug, info};

pub const CONCEPTS_FILE: &str = "concepts.json";
pub const RELATIONSHIPS_FILE: &str = "relationships.json";
pub const DECLARATIVE_FILE: &str = "base_zero.yaml";

pub const DEFAULT_PRIMARY_KEY: &str = "id";
pub const DEFAULT_RELATIONSHIP_TYPE: &str = "RELATES_TO";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum OntologySource {
    FlatCatalogs,
    Declarative,
    BuiltIn,
}

impl fmt::Display for OntologySource {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Self::FlatCatalogs => "flat catalogs",
            Self::Declarative => "declarative yaml",
            Self::BuiltIn => "built-in default",
        })
    }
}

/// Candidate ontology files.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OntologySources {
    pub concepts: PathBuf,
    pub relationships: PathBuf,
    pub declarative: PathBuf,
}

impl OntologySources {
    /// The conventional file names inside `dir`.
    pub fn in_dir(dir: impl AsRef<Path>) -> Self {
        let dir = dir.as_ref();
        Self {
            concepts: dir.join(CONCEPTS_FILE),
            relationships: dir.join(RELATIONSHIPS_FILE),
            declarative: dir.join(DECLARATIVE_FILE),
        }
    }

    pub fn select(&self) -> OntologySource {
        if self.concepts.is_file() && self.relationships.is_file() {
            OntologySource::FlatCatalogs
        } else if self.declarative.is_file() {
            OntologySource::Declarative
        } else {
            OntologySource::BuiltIn
        }
    }
}

/// A loaded ontology plus where it came from and what the reference check found.
#[derive(Debug, Clone)]
pub struct Loaded {
    pub ontology: Ontology,
    pub source: OntologySource,
    pub dangling: Vec<DanglingReference>,
}

pub fn load(sources: &OntologySources, mode: ValidationMode) -> Result<Loaded, OntologyError> {
    let source = sources.select();
    debug!(?sources, %source, "selected ontology source");

    let ontology = match source {
        OntologySource::FlatCatalogs => {
            let concepts = read_source(&sources.concepts)?;
            let relationships = read_source(&sources.relationships)?;
            parse_flat_catalogs_at(
                &concepts,
                &sources.concepts,
                &relationships,
                &sources.relationships,
            )?
        }
        OntologySource::Declarative => {
            let text = read_source(&sources.declarative)?;
            parse_declarative_at(&text, &sources.declarative)?
        }
        OntologySource::BuiltIn => builtin_ontology(),
    };

    let dangling = ontology.check_references(mode)?;
    info!(
        %source,
        entities = ontology.entities().len(),
        relationships = ontology.relationships().len(),
        dangling = dangling.len(),
        "loaded ontology"
    );
    Ok(Loaded {
        ontology,
        source,
        dangling,
    })
}

fn read_source(path: &Path) -> Result<String, OntologyError> {
    fs::read_to_string(path).map_err(|source| OntologyError::Io {
        path: path.to_path_buf(),
        source,
    })
}

// ============================================================================
// Flat catalogs
// ============================================================================

#[derive(Debug, Deserialize)]
struct ConceptCatalog {
    concepts: serde_json::Map<String, JsonValue>,
}

#[derive(Debug, Default, Deserialize)]
struct ConceptRecord {
    #[serde(default)]
    primary_key: Option<String>,
    #[serde(default)]
    tags: Vec<String>,
    #[serde(default)]
    description: String,
}

#[derive(Debug, Deserialize)]
struct RelationshipCatalog {
    relationships: Vec<RelationshipRecord>,
}

#[derive(Debug, Deserialize)]
struct RelationshipRecord {
    from: String,
    to: String,
    #[serde(rename = "type", default)]
    rel_type: Option<String>,
    #[serde(default)]
    name: Option<String>,
    #[serde(default)]
    key: Option<String>,
}

/// Parses the flat JSON pair from in-memory text.
pub fn parse_flat_catalogs(concepts: &str, relationships: &str) -> Result<Ontology, OntologyError> {
    parse_flat_catalogs_at(
        concepts,
        Path::new(CONCEPTS_FILE),
        relationships,
        Path::new(RELATIONSHIPS_FILE),
    )
}

fn parse_flat_catalogs_at(
    concepts: &str,
    concepts_path: &Path,
    relationships: &str,
    relationships_path: &Path,
) -> Result<Ontology, OntologyError> {
    let catalog: ConceptCatalog =
        serde_json::from_str(concepts).map_err(json_error(concepts_path))?;
    let rels: RelationshipCatalog =
        serde_json::from_str(relationships).map_err(json_error(relationships_path))?;

    let mut ontology = Ontology::new();
    for (name, value) in catalog.concepts {
        let record: ConceptRecord = if value.is_null() {
            ConceptRecord::default()
        } else {
            serde_json::from_value(value).map_err(json_error(concepts_path))?
        };
        ontology.insert_entity(Entity {
            name,
            primary_key: record
                .primary_key
                .unwrap_or_else(|| DEFAULT_PRIMARY_KEY.to_string()),
            tags: record.tags,
            description: record.description,
        })?;
    }

    for record in rels.relationships {
        let rel_type = record
            .rel_type
            .or(record.name)
            .unwrap_or_else(|| DEFAULT_RELATIONSHIP_TYPE.to_string());
        // A missing join key falls back to the source entity's primary key.
        let key = match record.key {
            Some(key) => key,
            None => ontology
                .entity(&record.from)
                .map(|e| e.primary_key.clone())
                .unwrap_or_else(|| DEFAULT_PRIMARY_KEY.to_string()),
        };
        ontology.push_relationship(Relationship::new(record.from, record.to, rel_type, key))?;
    }
    Ok(ontology)
}

fn json_error(path: &Path) -> impl FnOnce(serde_json::Error) -> OntologyError {
    let path = path.to_path_buf();
    move |source| OntologyError::Json { path, source }
}

// ============================================================================
// Declarative YAML
// ============================================================================

#[derive(Debug, Default, Deserialize)]
struct DeclarativeDoc {
    #[serde(default)]
    entities: Option<serde_yaml::Mapping>,
    #[serde(default)]
    relations: Option<serde_yaml::Mapping>,
}

#[derive(Debug, Deserialize)]
struct DeclaredRelation {
    from: String,
    to: String,
    #[serde(rename = "type", default)]
    rel_type: Option<String>,
    #[serde(default)]
    via: Option<String>,
}

/// Parses the nested declarative source from in-memory text.
pub fn parse_declarative(text: &str) -> Result<Ontology, OntologyError> {
    parse_declarative_at(text, Path::new(DECLARATIVE_FILE))
}

fn parse_declarative_at(text: &str, path: &Path) -> Result<Ontology, OntologyError> {
    let yaml_err = |source| OntologyError::Yaml {
        path: path.to_path_buf(),
        source,
    };

    let value: serde_yaml::Value = serde_yaml::from_str(text).map_err(yaml_err)?;
    let doc: DeclarativeDoc = if value.is_null() {
        DeclarativeDoc::default()
    } else {
        serde_yaml::from_value(value).map_err(yaml_err)?
    };

    let mut ontology = Ontology::new();
    for (key, _) in doc.entities.iter().flatten() {
        let name = mapping_key(key, "entities")?;
        ontology.insert_entity(Entity::new(name, DEFAULT_PRIMARY_KEY))?;
    }

    for (key, value) in doc.relations.iter().flatten() {
        let label = mapping_key(key, "relations")?;
        let rel: DeclaredRelation = serde_yaml::from_value(value.clone()).map_err(yaml_err)?;
        debug!(relation = label, from = %rel.from, to = %rel.to, "declared relation");
        ontology.push_relationship(Relationship::new(
            rel.from,
            rel.to,
            rel.rel_type
                .unwrap_or_else(|| DEFAULT_RELATIONSHIP_TYPE.to_string()),
            rel.via.unwrap_or_else(|| DEFAULT_PRIMARY_KEY.to_string()),
        ))?;
    }
    Ok(ontology)
}

fn mapping_key<'a>(key: &'a serde_yaml::Value, section: &str) -> Result<&'a str, OntologyError> {
    key.as_str().ok_or_else(|| {
        OntologyError::Invalid(format!("`{section}` keys must be strings, found {key:?}"))
    })
}
