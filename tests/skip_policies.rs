use reweave::{
    AttributeValue, Branch, ConfigError, ObjectCreation, ObjectIdentity, Revision, SkipPolicy,
    SkipPolicyConfig, SkippedIdentifiers,
};
use std::collections::BTreeSet;

fn creation(type_name: &str, object_name: &str) -> ObjectCreation {
    ObjectCreation::new(
        ObjectIdentity::new(Branch::TRUNK, type_name, object_name),
        Revision(1),
        Default::default(),
    )
}

fn names(values: &[&str]) -> BTreeSet<String> {
    values.iter().map(|value| value.to_string()).collect()
}

#[test]
fn type_name_skip_matches_configured_types() {
    let policy = SkipPolicyConfig::TypeNames {
        types: names(&["LegacyUser", "LegacyGroup"]),
    }
    .build()
    .expect("valid config");
    let skipped = SkippedIdentifiers::new();
    assert!(policy.should_skip(&creation("LegacyUser", "U1"), &skipped));
    assert!(policy.should_skip(&creation("LegacyGroup", "G1"), &skipped));
    assert!(!policy.should_skip(&creation("Task", "T1"), &skipped));
}

#[test]
fn model_definition_skip_reads_name_attribute() {
    let policy = SkipPolicyConfig::ModelDefinitions {
        definition_types: names(&["ClassDef"]),
        names: names(&["ObsoleteClass"]),
    }
    .build()
    .expect("valid config");
    let skipped = SkippedIdentifiers::new();

    let mut definition = creation("ClassDef", "def-42");
    definition.values.insert(
        "name".into(),
        AttributeValue::Text("ObsoleteClass".into()),
    );
    assert!(policy.should_skip(&definition, &skipped));

    let mut other = creation("ClassDef", "def-43");
    other
        .values
        .insert("name".into(), AttributeValue::Text("LiveClass".into()));
    assert!(!policy.should_skip(&other, &skipped));

    // Instances of a matching name but a non-definition type stay.
    let instance = creation("Order", "ObsoleteClass");
    assert!(!policy.should_skip(&instance, &skipped));
}

#[test]
fn model_definition_skip_falls_back_to_object_name() {
    let policy = SkipPolicyConfig::ModelDefinitions {
        definition_types: names(&["ClassDef"]),
        names: names(&["ObsoleteClass"]),
    }
    .build()
    .expect("valid config");
    let skipped = SkippedIdentifiers::new();
    assert!(policy.should_skip(&creation("ClassDef", "ObsoleteClass"), &skipped));
}

#[test]
fn all_of_requires_every_policy_to_agree() {
    let policy = SkipPolicyConfig::AllOf {
        policies: vec![
            SkipPolicyConfig::TypeNames {
                types: names(&["LegacyUser", "Task"]),
            },
            SkipPolicyConfig::TypeNames {
                types: names(&["LegacyUser"]),
            },
        ],
    }
    .build()
    .expect("valid config");
    let skipped = SkippedIdentifiers::new();
    assert!(policy.should_skip(&creation("LegacyUser", "U1"), &skipped));
    assert!(!policy.should_skip(&creation("Task", "T1"), &skipped));
}

#[test]
fn empty_compositions_fail_at_construction() {
    let empty_types = SkipPolicyConfig::TypeNames {
        types: BTreeSet::new(),
    };
    assert_eq!(empty_types.build().err(), Some(ConfigError::EmptyTypeSet));

    let empty_names = SkipPolicyConfig::ModelDefinitions {
        definition_types: names(&["ClassDef"]),
        names: BTreeSet::new(),
    };
    assert_eq!(
        empty_names.build().err(),
        Some(ConfigError::EmptyDefinitionSet)
    );

    let empty_definition_types = SkipPolicyConfig::ModelDefinitions {
        definition_types: BTreeSet::new(),
        names: names(&["ObsoleteClass"]),
    };
    assert_eq!(
        empty_definition_types.build().err(),
        Some(ConfigError::EmptyDefinitionTypeSet)
    );

    let empty_all_of = SkipPolicyConfig::AllOf {
        policies: Vec::new(),
    };
    assert_eq!(
        empty_all_of.build().err(),
        Some(ConfigError::EmptyComposition)
    );

    // A nested invalid policy also fails the composite.
    let nested = SkipPolicyConfig::AllOf {
        policies: vec![SkipPolicyConfig::TypeNames {
            types: BTreeSet::new(),
        }],
    };
    assert_eq!(nested.build().err(), Some(ConfigError::EmptyTypeSet));
}

#[test]
fn config_deserializes_from_tagged_json() {
    let config = SkipPolicyConfig::from_json(serde_json::json!({
        "kind": "all-of",
        "policies": [
            { "kind": "type-names", "types": ["LegacyUser"] },
            {
                "kind": "model-definitions",
                "definition_types": ["ClassDef"],
                "names": ["ObsoleteClass"]
            }
        ]
    }))
    .expect("well-formed config");
    assert!(config.build().is_ok());

    let keep_all = SkipPolicyConfig::from_json(serde_json::json!({ "kind": "keep-all" }))
        .expect("well-formed config");
    let policy = keep_all.build().expect("valid config");
    assert!(!policy.should_skip(&creation("LegacyUser", "U1"), &SkippedIdentifiers::new()));
}

#[test]
fn malformed_config_is_rejected() {
    let err = SkipPolicyConfig::from_json(serde_json::json!({ "kind": "everything" }))
        .err()
        .expect("unknown kind must fail");
    assert!(matches!(err, ConfigError::Malformed(_)));
}
