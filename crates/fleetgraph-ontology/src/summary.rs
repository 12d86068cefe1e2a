//! Tabular views of an ontology (concept and relationship tables).

use crate::model::Ontology;
use serde::Serialize;
use std::fmt;

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ConceptRow {
    pub entity: String,
    pub primary_key: String,
    pub tags: String,
    pub description: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct RelationshipRow {
    pub from: String,
    pub to: String,
    #[serde(rename = "type")]
    pub rel_type: String,
    pub key: String,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct OntologySummary {
    pub concepts: Vec<ConceptRow>,
    pub relationships: Vec<RelationshipRow>,
}

impl OntologySummary {
    pub fn of(ontology: &Ontology) -> Self {
        Self {
            concepts: ontology
                .entities()
                .iter()
                .map(|e| ConceptRow {
                    entity: e.name.clone(),
                    primary_key: e.primary_key.clone(),
                    tags: e.tags.join(", "),
                    description: e.description.clone(),
                })
                .collect(),
            relationships: ontology
                .relationships()
                .iter()
                .map(|r| RelationshipRow {
                    from: r.from_entity.clone(),
                    to: r.to_entity.clone(),
                    rel_type: r.rel_type.clone(),
                    key: r.key.clone(),
                })
                .collect(),
        }
    }

    pub fn concepts_table(&self) -> String {
        let rows: Vec<[&str; 4]> = self
            .concepts
            .iter()
            .map(|r| {
                [
                    r.entity.as_str(),
                    r.primary_key.as_str(),
                    r.tags.as_str(),
                    r.description.as_str(),
                ]
            })
            .collect();
        render_table(["entity", "primary_key", "tags", "description"], &rows)
    }

    pub fn relationships_table(&self) -> String {
        let rows: Vec<[&str; 4]> = self
            .relationships
            .iter()
            .map(|r| {
                [
                    r.from.as_str(),
                    r.to.as_str(),
                    r.rel_type.as_str(),
                    r.key.as_str(),
                ]
            })
            .collect();
        render_table(["from", "to", "type", "key"], &rows)
    }
}

impl fmt::Display for OntologySummary {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "Concepts")?;
        f.write_str(&self.concepts_table())?;
        writeln!(f)?;
        writeln!(f, "Relationships")?;
        f.write_str(&self.relationships_table())
    }
}

fn render_table<const N: usize>(header: [&str; N], rows: &[[&str; N]]) -> String {
    let mut widths = header.map(|h| h.chars().count());
    for row in rows {
        for (w, cell) in widths.iter_mut().zip(row) {
            *w = (*w).max(cell.chars().count());
        }
    }

    let line = |cells: &[&str; N]| {
        let padded: Vec<String> = cells
            .iter()
            .zip(widths)
            .map(|(c, w)| format!("{c:<w$}"))
            .collect();
        format!("{}\n", padded.join("  ").trim_end())
    };

    let mut out = line(&header);
    let rule = widths.map(|w| "-".repeat(w));
    out.push_str(&line(&rule.each_ref().map(String::as_str)));
    for row in rows {
        out.push_str(&line(row));
    }
    out
}
