use canvas_crate::identity::{IdentityQuery, IdentityRegistry, RoleAssignment, RoleUsage};
use canvas_crate::types::{Agent, Governance, GovernanceStage, Person};
use canvas_crate::{encode, CanvasDocument, EncodeOptions, EntityKind};
use proptest::prelude::*;

fn orcid() -> impl Strategy<Value = String> {
    "[0-9]{4}-[0-9]{4}-[0-9]{4}-[0-9]{3}[0-9X]".prop_map(|digits| format!("https://orcid.org/{}", digits))
}

fn name() -> impl Strategy<Value = String> {
    "[A-Z][a-z]{2,8} [A-Z][a-z]{2,10}"
}

/// Same identifier with case flipped per character and padding around it.
fn disguise(id: &str, flips: &[bool], pad: usize) -> String {
    let body: String = id
        .chars()
        .zip(flips.iter().cycle())
        .map(|(c, &flip)| if flip { c.to_ascii_uppercase() } else { c })
        .collect();
    format!("{}{}{}", " ".repeat(pad), body, "\t".repeat(pad % 3))
}

proptest! {
    #[test]
    fn prop_same_external_id_single_identity(
        id in orcid(),
        names in proptest::collection::vec(name(), 2..6),
        flips in proptest::collection::vec(any::<bool>(), 1..40),
        pad in 0..4usize,
    ) {
        let mut registry = IdentityRegistry::new();
        let first = registry.resolve(&IdentityQuery::named(names[0].clone()).with_external_id(id.clone()));
        for (i, n) in names.iter().enumerate().skip(1) {
            let variant = disguise(&id, &flips, pad + i);
            let resolved = registry.resolve(&IdentityQuery::named(n.clone()).with_external_id(variant));
            prop_assert_eq!(&resolved, &first);
        }
        prop_assert_eq!(registry.persons().len(), 1);
    }

    #[test]
    fn prop_distinct_external_ids_distinct_identities(
        shared_name in name(),
        ids in proptest::collection::hash_set(orcid(), 2..6),
    ) {
        let mut registry = IdentityRegistry::new();
        let mut resolved: Vec<String> = ids
            .iter()
            .map(|id| registry.resolve(&IdentityQuery::named(shared_name.clone()).with_external_id(id.clone())))
            .collect();
        let count = resolved.len();
        resolved.sort();
        resolved.dedup();
        prop_assert_eq!(resolved.len(), count);
        prop_assert!(registry.validate().is_empty());
    }

    #[test]
    fn prop_resolve_is_stable(n in name(), id in proptest::option::of(orcid())) {
        let mut registry = IdentityRegistry::new();
        let mut query = IdentityQuery::named(n);
        if let Some(id) = id {
            query = query.with_external_id(id);
        }
        let a = registry.resolve(&query);
        let b = registry.resolve(&query);
        prop_assert_eq!(a, b);
        prop_assert_eq!(registry.persons().len(), 1);
    }

    #[test]
    fn prop_encode_dedups_persons_by_external_id(
        id in orcid(),
        copies in 1..5usize,
        stages in 1..4usize,
    ) {
        let mut doc = CanvasDocument::new("P", "");
        for i in 0..copies {
            doc.persons.push(Person::new(format!("p{}", i), format!("Person {}", i)).with_external_id(id.to_uppercase()));
        }
        doc.governance = Some(Governance {
            stages: (0..stages)
                .map(|s| {
                    GovernanceStage::new(format!("s{}", s), format!("Stage {}", s))
                        .with_agent(Agent::person(format!("p{}", s % copies), "Reviewer"))
                })
                .collect(),
        });

        let out = encode(&doc, &EncodeOptions::default());
        let persons: Vec<_> = out.container.nodes_of(EntityKind::Person).collect();
        prop_assert_eq!(persons.len(), 1);
        let roles: Vec<_> = out.container.nodes_of(EntityKind::Role).collect();
        prop_assert_eq!(roles.len(), stages);
    }
}

#[test]
fn test_roles_deduplicated_per_scope() {
    let mut registry = IdentityRegistry::new();
    let person = registry.resolve(&IdentityQuery::named("Ana").with_external_id("https://orcid.org/1"));
    let a = registry.assign_role(RoleAssignment::new(person.clone(), Some("Lead".into()), RoleUsage::StageAgent).scoped("#s1"));
    let b = registry.assign_role(RoleAssignment::new(person.clone(), Some("Lead".into()), RoleUsage::StageAgent).scoped("#s1"));
    let c = registry.assign_role(RoleAssignment::new(person, Some("Lead".into()), RoleUsage::StageAgent).scoped("#s2"));
    assert_eq!(a, b);
    assert_ne!(a, c);
    assert_eq!(registry.roles().len(), 2);
}
