//! Cypher load-script generation.
//!
//! The script is a pure function of the ontology:
//!
//! ```text
//! CREATE CONSTRAINT IF NOT EXISTS FOR (n:<Entity>) REQUIRE n.<primary_key> IS UNIQUE;   (per entity)
//! // Relationships
//! MATCH (a:<From>), (b:<To>)
//! WHERE a.<key> = b.<key>
//! MERGE (a)-[:<Type>]->(b);                                                             (per relationship)
//! ```
//!
//! Every statement is create-if-absent, so replaying the script against a
//! populated store adds no duplicate constraints or edges. Nodes are only
//! matched here, never created.

use anyhow::{Context, Result};
use fleetgraph_ontology::{write_artifact, Ontology};
use std::fmt;
use std::path::Path;
use tracing::info;

pub const RELATIONSHIPS_MARKER: &str = "// Relationships";

/// Preview length used when echoing a script back to the user.
pub const DEFAULT_PREVIEW_CHARS: usize = 2000;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Statement {
    UniqueConstraint {
        label: String,
        property: String,
    },
    Comment(String),
    MergeRelationship {
        from_label: String,
        to_label: String,
        rel_type: String,
        key: String,
    },
}

impl fmt::Display for Statement {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::UniqueConstraint { label, property } => write!(
                f,
                "CREATE CONSTRAINT IF NOT EXISTS FOR (n:{}) REQUIRE n.{} IS UNIQUE;",
                quote_ident(label),
                quote_ident(property)
            ),
            Self::Comment(text) => f.write_str(text),
            Self::MergeRelationship {
                from_label,
                to_label,
                rel_type,
                key,
            } => {
                let key = quote_ident(key);
                write!(
                    f,
                    "MATCH (a:{}), (b:{})\nWHERE a.{key} = b.{key}\nMERGE (a)-[:{}]->(b);",
                    quote_ident(from_label),
                    quote_ident(to_label),
                    quote_ident(rel_type)
                )
            }
        }
    }
}

/// Plain identifiers pass through; anything else is backtick-quoted.
pub fn quote_ident(ident: &str) -> String {
    let mut chars = ident.chars();
    let plain = chars
        .next()
        .is_some_and(|c| c.is_ascii_alphabetic() || c == '_')
        && chars.all(|c| c.is_ascii_alphanumeric() || c == '_');
    if plain {
        ident.to_string()
    } else {
        format!("`{}`", ident.replace('`', "``"))
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CypherScript {
    pub statements: Vec<Statement>,
}

impl CypherScript {
    pub fn lines(&self) -> Vec<String> {
        self.statements.iter().map(ToString::to_string).collect()
    }

    /// Statements joined by newlines, exactly as written to disk.
    pub fn render(&self) -> String {
        self.lines().join("\n")
    }

    pub fn constraint_count(&self) -> usize {
        self.statements
            .iter()
            .filter(|s| matches!(s, Statement::UniqueConstraint { .. }))
            .count()
    }

    pub fn merge_count(&self) -> usize {
        self.statements
            .iter()
            .filter(|s| matches!(s, Statement::MergeRelationship { .. }))
            .count()
    }

    /// The first `limit` characters, with a truncation note when cut.
    pub fn preview(&self, limit: usize) -> String {
        let text = self.render();
        if text.chars().count() <= limit {
            return text;
        }
        let mut out: String = text.chars().take(limit).collect();
        out.push_str("\n... (truncated)");
        out
    }
}

impl fmt::Display for CypherScript {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.render())
    }
}

pub fn generate(ontology: &Ontology) -> CypherScript {
    let mut statements: Vec<Statement> = ontology
        .entities()
        .iter()
        .map(|e| Statement::UniqueConstraint {
            label: e.name.clone(),
            property: e.primary_key.clone(),
        })
        .collect();
    statements.push(Statement::Comment(RELATIONSHIPS_MARKER.to_string()));
    statements.extend(
        ontology
            .relationships()
            .iter()
            .map(|r| Statement::MergeRelationship {
                from_label: r.from_entity.clone(),
                to_label: r.to_entity.clone(),
                rel_type: r.rel_type.clone(),
                key: r.key.clone(),
            }),
    );
    CypherScript { statements }
}

pub fn write_script(script: &CypherScript, out: &Path) -> Result<()> {
    write_artifact(out, script.render())
        .with_context(|| format!("failed to write cypher script {}", out.display()))?;
    info!(
        path = %out.display(),
        constraints = script.constraint_count(),
        merges = script.merge_count(),
        "wrote cypher script"
    );
    Ok(())
}

/// Generates the script for `ontology`, writes it to `out`, and returns it for preview.
pub fn generate_to_file(ontology: &Ontology, out: &Path) -> Result<CypherScript> {
    let script = generate(ontology);
    write_script(&script, out)?;
    Ok(script)
}
