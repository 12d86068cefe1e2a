use fleetgraph_cypher::{generate, generate_to_file, RELATIONSHIPS_MARKER};
use fleetgraph_ontology::{loader::parse_flat_catalogs, Entity, Ontology, Relationship};
use proptest::prelude::*;
use std::fs;

#[test]
fn flat_catalog_round_trip_produces_expected_statements() {
    let o = parse_flat_catalogs(
        r#"{"concepts": {
            "Aircraft": {"primary_key": "aircraft_id", "tags": ["asset"]},
            "Alert": {"primary_key": "alert_id", "tags": ["signal"]}
        }}"#,
        r#"{"relationships": [
            {"from": "Aircraft", "to": "Alert", "type": "HAS_HEALTH_SIGNAL", "key": "aircraft_id"}
        ]}"#,
    )
    .unwrap();
    let lines = generate(&o).lines();

    let constraint = &lines[0];
    assert!(constraint.contains("Aircraft") && constraint.contains("aircraft_id"));

    let merge = lines.last().unwrap();
    let positions: Vec<usize> = ["Aircraft", "Alert", "aircraft_id", "HAS_HEALTH_SIGNAL"]
        .iter()
        .map(|needle| merge.find(needle).unwrap())
        .collect();
    assert!(positions.windows(2).all(|w| w[0] < w[1]), "{merge}");
}

#[test]
fn written_script_matches_returned_script() {
    let dir = tempfile::tempdir().unwrap();
    let out = dir.path().join("artifacts").join("ontology_graph.cypher");
    let o = fleetgraph_ontology::builtin_ontology();

    let script = generate_to_file(&o, &out).unwrap();
    let on_disk = fs::read_to_string(&out).unwrap();
    assert_eq!(on_disk, script.render());

    // Re-running overwrites with identical bytes.
    generate_to_file(&o, &out).unwrap();
    assert_eq!(fs::read_to_string(&out).unwrap(), on_disk);
}

#[test]
fn empty_ontology_script_is_only_the_marker() {
    let dir = tempfile::tempdir().unwrap();
    let out = dir.path().join("empty.cypher");
    generate_to_file(&Ontology::new(), &out).unwrap();
    assert_eq!(fs::read_to_string(&out).unwrap(), RELATIONSHIPS_MARKER);
}

fn arb_ontology() -> impl Strategy<Value = Ontology> {
    (
        prop::collection::btree_map("[A-Z][a-z]{1,6}", "[a-z_]{1,8}", 1..6),
        prop::collection::vec(("[A-Z_]{1,8}", "[a-z_]{1,8}", any::<prop::sample::Index>(), any::<prop::sample::Index>()), 0..8),
    )
        .prop_map(|(entities, rels)| {
            let names: Vec<String> = entities.keys().cloned().collect();
            let relationships: Vec<Relationship> = rels
                .into_iter()
                .map(|(ty, key, a, b)| {
                    Relationship::new(a.get(&names).clone(), b.get(&names).clone(), ty, key)
                })
                .collect();
            Ontology::from_parts(
                entities.into_iter().map(|(name, pk)| Entity::new(name, pk)),
                relationships,
            )
            .unwrap()
        })
}

proptest! {
    #[test]
    fn generation_is_byte_identical_across_runs(o in arb_ontology()) {
        prop_assert_eq!(generate(&o).render(), generate(&o).render());
    }

    #[test]
    fn constraints_precede_marker_precede_merges(o in arb_ontology()) {
        let script = generate(&o);
        let lines = script.lines();
        let marker = lines.iter().position(|l| l == RELATIONSHIPS_MARKER).unwrap();
        prop_assert_eq!(marker, o.entities().len());
        prop_assert!(lines[..marker].iter().all(|l| l.starts_with("CREATE CONSTRAINT IF NOT EXISTS")));
        prop_assert!(lines[marker + 1..].iter().all(|l| l.starts_with("MATCH ") && l.contains("MERGE ")));
        prop_assert_eq!(lines.len() - marker - 1, o.relationships().len());
    }
}
