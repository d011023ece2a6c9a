use reweave::{
    Branch, ChangeSet, ChangeSetSource, HistoryReader, ItemEvent, MemoryHistory, ObjectCreation,
    ObjectIdentity, ReadRange, Revision,
};
use std::collections::BTreeSet;

fn creation_on(branch: Branch, type_name: &str, object_name: &str) -> ItemEvent {
    ItemEvent::Creation(ObjectCreation::new(
        ObjectIdentity::new(branch, type_name, object_name),
        Revision(0),
        Default::default(),
    ))
}

fn history() -> MemoryHistory {
    let mut history = MemoryHistory::default();
    let mut cs2 = ChangeSet::new(Revision(2));
    cs2.push(creation_on(Branch::TRUNK, "AttrDef", "X"));
    cs2.push(creation_on(Branch::TRUNK, "Order", "O1"));
    history.push(cs2);
    let mut cs6 = ChangeSet::new(Revision(6));
    cs6.push(creation_on(Branch(9), "AttrDef", "Y"));
    history.push(cs6);
    let mut cs9 = ChangeSet::new(Revision(9));
    cs9.push(creation_on(Branch::TRUNK, "Order", "O2"));
    history.push(cs9);
    history
}

fn drain(mut cursor: Box<dyn ChangeSetSource + '_>) -> Vec<ChangeSet> {
    let mut drained = Vec::new();
    while let Some(change_set) = cursor.next().expect("read") {
        drained.push(change_set);
    }
    drained
}

#[test]
fn unrestricted_read_yields_everything_in_order() {
    let history = history();
    let drained = drain(history.open(&ReadRange::all()).expect("open"));
    let revisions: Vec<_> = drained.iter().map(|cs| cs.revision).collect();
    assert_eq!(revisions, vec![Revision(2), Revision(6), Revision(9)]);
}

#[test]
fn revision_bounds_are_inclusive() {
    let history = history();
    let range = ReadRange::between(Revision(6), Revision(9));
    let drained = drain(history.open(&range).expect("open"));
    let revisions: Vec<_> = drained.iter().map(|cs| cs.revision).collect();
    assert_eq!(revisions, vec![Revision(6), Revision(9)]);

    let open_ended = ReadRange::between(Revision(6), Revision::CURRENT);
    let drained = drain(history.open(&open_ended).expect("open"));
    assert_eq!(drained.len(), 2);
}

#[test]
fn type_restriction_drops_emptied_change_sets() {
    let history = history();
    let range =
        ReadRange::all().with_type_names(BTreeSet::from(["AttrDef".to_string()]));
    let drained = drain(history.open(&range).expect("open"));
    // Revision 9 has no AttrDef events and is not yielded at all.
    assert_eq!(drained.len(), 2);
    assert!(drained
        .iter()
        .flat_map(|cs| &cs.events)
        .all(|event| event.type_name() == "AttrDef"));
}

#[test]
fn branch_restriction_filters_events() {
    let history = history();
    let range = ReadRange::all().with_branches(BTreeSet::from([Branch(9)]));
    let drained = drain(history.open(&range).expect("open"));
    assert_eq!(drained.len(), 1);
    assert_eq!(drained[0].revision, Revision(6));
    assert_eq!(drained[0].events[0].identity().branch, Branch(9));
}
