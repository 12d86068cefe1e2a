use fleetgraph_ontology::{AbstractGraph, Entity, Ontology, Relationship};
use proptest::prelude::*;

fn arb_ontology() -> impl Strategy<Value = Ontology> {
    prop::collection::btree_set("[A-Z][a-z]{1,6}", 0..8).prop_flat_map(|names| {
        let names: Vec<String> = names.into_iter().collect();
        let n = names.len();
        let rels = if n == 0 {
            Just(Vec::new()).boxed()
        } else {
            prop::collection::vec((0..n, 0..n, "[A-Z_]{1,8}", "[a-z_]{1,8}"), 0..12).boxed()
        };
        (Just(names), rels).prop_map(|(names, rels)| {
            let entities = names.iter().map(|n| Entity::new(n.clone(), "id"));
            let relationships = rels.into_iter().map(|(a, b, ty, key)| {
                Relationship::new(names[a].clone(), names[b].clone(), ty, key)
            });
            Ontology::from_parts(entities, relationships).unwrap()
        })
    })
}

proptest! {
    #[test]
    fn graph_has_one_node_per_entity_and_one_edge_per_relationship(o in arb_ontology()) {
        let g = AbstractGraph::build(&o);
        prop_assert_eq!(g.nodes.len(), o.entities().len());
        prop_assert_eq!(g.edges.len(), o.relationships().len());
        for (edge, rel) in g.edges.iter().zip(o.relationships()) {
            prop_assert_eq!(&edge.source, &rel.from_entity);
            prop_assert_eq!(&edge.target, &rel.to_entity);
            prop_assert_eq!(&edge.rel_type, &rel.rel_type);
            prop_assert_eq!(&edge.key, &rel.key);
        }
    }

    #[test]
    fn build_is_deterministic(o in arb_ontology()) {
        prop_assert_eq!(AbstractGraph::build(&o), AbstractGraph::build(&o));
    }
}
