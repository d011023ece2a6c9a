//! Property tests for the cascading-skip rewriter: termination, idempotence,
//! and cascade completeness over randomly wired reference graphs.

use proptest::collection::vec;
use proptest::prelude::*;
use reweave::{
    AttributeValue, Branch, BufferSink, CascadingSkipRewriter, ChangeSet, EventRewriter,
    ItemEvent, ObjectCreation, ObjectIdentity, ObjectKey, ReferenceAttribute,
    RepairPolicyConfig, Revision, SkipPolicyConfig, StaticTypeMetadata,
};
use std::collections::BTreeSet;

/// Blueprint of one creation: whether the skip policy targets it, and an
/// optional reference to an earlier object in the same change set.
#[derive(Debug, Clone)]
struct CreationPlan {
    doomed: bool,
    reference: Option<usize>,
}

fn creation_plans() -> impl Strategy<Value = Vec<CreationPlan>> {
    vec(
        (any::<bool>(), proptest::option::of(0usize..64)),
        1..40,
    )
    .prop_map(|entries| {
        entries
            .into_iter()
            .map(|(doomed, reference)| CreationPlan { doomed, reference })
            .collect()
    })
}

fn identity_of(index: usize, plan: &CreationPlan) -> ObjectIdentity {
    let type_name = if plan.doomed { "Doomed" } else { "Node" };
    ObjectIdentity::new(Branch::TRUNK, type_name, format!("obj-{index}"))
}

fn build_change_set(plans: &[CreationPlan]) -> ChangeSet {
    let mut change_set = ChangeSet::new(Revision(1));
    for (index, plan) in plans.iter().enumerate() {
        let mut creation =
            ObjectCreation::new(identity_of(index, plan), Revision(1), Default::default());
        if let Some(target) = plan.reference {
            if target < plans.len() && target != index {
                creation.values.insert(
                    "dep".to_string(),
                    AttributeValue::Reference(ObjectKey::new(
                        identity_of(target, &plans[target]),
                        Revision(1),
                    )),
                );
            }
        }
        change_set.push(ItemEvent::Creation(creation));
    }
    change_set
}

fn rewriter(mandatory: bool) -> CascadingSkipRewriter {
    let metadata = StaticTypeMetadata::new()
        .with_type("Node", vec![ReferenceAttribute::new("dep", mandatory)])
        .with_type("Doomed", vec![ReferenceAttribute::new("dep", mandatory)]);
    CascadingSkipRewriter::from_config(
        Box::new(metadata),
        &SkipPolicyConfig::TypeNames {
            types: BTreeSet::from(["Doomed".to_string()]),
        },
        &RepairPolicyConfig::MandatoryAware,
    )
    .expect("valid config")
}

fn rewrite_once(
    rewriter: &mut CascadingSkipRewriter,
    change_set: ChangeSet,
) -> Vec<ChangeSet> {
    let mut sink = BufferSink::new();
    rewriter.rewrite(change_set, &mut sink).expect("rewrite");
    sink.into_change_sets()
}

proptest! {
    /// The fixpoint terminates and no retained creation references a
    /// skipped identity, for any reference wiring.
    #[test]
    fn retained_creations_never_dangle(plans in creation_plans(), mandatory in any::<bool>()) {
        let mut rewriter = rewriter(mandatory);
        let output = rewrite_once(&mut rewriter, build_change_set(&plans));
        prop_assert_eq!(output.len(), 1);
        for event in &output[0].events {
            let ItemEvent::Creation(creation) = event else {
                panic!("only creations were fed in");
            };
            if let Some(key) = creation.reference("dep") {
                prop_assert!(!rewriter.skipped().contains(&key.identity));
            }
        }
    }

    /// Feeding the output to a fresh, identically configured rewriter
    /// changes nothing.
    #[test]
    fn rewriting_is_idempotent(plans in creation_plans(), mandatory in any::<bool>()) {
        let mut first = rewriter(mandatory);
        let once = rewrite_once(&mut first, build_change_set(&plans));

        let mut second = rewriter(mandatory);
        let mut sink = BufferSink::new();
        for change_set in once.clone() {
            second.rewrite(change_set, &mut sink).expect("rewrite");
        }
        prop_assert_eq!(once, sink.into_change_sets());
    }

    /// Every input creation either survives or has its identity in the
    /// skipped set; nothing vanishes untracked.
    #[test]
    fn removed_creations_are_recorded(plans in creation_plans(), mandatory in any::<bool>()) {
        let mut rewriter = rewriter(mandatory);
        let input = build_change_set(&plans);
        let input_identities: Vec<ObjectIdentity> = input
            .events
            .iter()
            .map(|event| event.identity().clone())
            .collect();
        let output = rewrite_once(&mut rewriter, input);

        let retained: BTreeSet<&ObjectIdentity> =
            output[0].events.iter().map(ItemEvent::identity).collect();
        for identity in &input_identities {
            prop_assert!(
                retained.contains(identity) || rewriter.skipped().contains(identity),
                "{} vanished without being recorded",
                identity
            );
        }
    }

    /// The fixpoint loop never scans more often than once per input
    /// creation plus the final pass that finds nothing to remove.
    #[test]
    fn fixpoint_scan_count_is_linear(plans in creation_plans(), mandatory in any::<bool>()) {
        let mut rewriter = rewriter(mandatory);
        let input = build_change_set(&plans);
        let creations = input.len();
        rewrite_once(&mut rewriter, input);
        prop_assert!(rewriter.settle_passes() <= creations + 1);
    }

    /// With mandatory references, a retained object can never depend on a
    /// doomed type, directly or transitively.
    #[test]
    fn mandatory_cascade_is_complete(plans in creation_plans()) {
        let mut rewriter = rewriter(true);
        let output = rewrite_once(&mut rewriter, build_change_set(&plans));
        for (index, plan) in plans.iter().enumerate() {
            if plan.doomed {
                prop_assert!(rewriter.skipped().contains(&identity_of(index, plan)));
            }
        }
        for event in &output[0].events {
            prop_assert!(event.type_name() != "Doomed");
        }
    }
}
