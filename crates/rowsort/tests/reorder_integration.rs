//! Integration tests for reorder persistence across relation shapes.

use rowsort::{
    ClassDef, Error, JoinTableDef, ListContext, OrderableRows, RecordId, RelationDescriptor, Row,
    RowKey, SchemaCatalog, Stage, StageSlot, TableStore, Value,
};
use std::collections::BTreeMap;

struct TestContext {
    catalog: SchemaCatalog,
    store: TableStore,
}

impl TestContext {
    fn new() -> Self {
        Self {
            catalog: setup_catalog(),
            store: TableStore::temporary().unwrap(),
        }
    }

    fn list(&self, descriptor: RelationDescriptor, parent_id: RecordId) -> ListContext<'_> {
        ListContext {
            catalog: &self.catalog,
            store: &self.store,
            descriptor,
            parent_id,
            stage: Stage::Draft,
        }
    }
}

fn setup_catalog() -> SchemaCatalog {
    SchemaCatalog::new()
        .with_class(ClassDef::new("Gallery", "Gallery").with_field("Title"))
        .with_class(
            ClassDef::new("Slide", "Slide")
                .with_field("Title")
                .with_field("GalleryID")
                .with_field("Sort"),
        )
        .with_class(
            ClassDef::new("VideoSlide", "VideoSlide")
                .extends("Slide")
                .with_field("Duration"),
        )
        .with_class(
            ClassDef::new("Tag", "Tag")
                .with_field("Title")
                .with_field("Sort"),
        )
        .with_join_table(JoinTableDef::new("Gallery_Tags").with_field("TagSort"))
        .with_class(ClassDef::new("Playlist", "Playlist").with_field("Title"))
        .with_class(
            ClassDef::new("Track", "Track")
                .with_field("Title")
                .with_field("Sort"),
        )
        .with_class(
            ClassDef::new("PlaylistEntry", "PlaylistEntry")
                .with_field("PlaylistID")
                .with_field("TrackID")
                .with_field("Sort"),
        )
        .with_class(
            ClassDef::new("Banner", "Banner")
                .with_field("Title")
                .with_field("Sort")
                .with_versioning(),
        )
        .with_class(ClassDef::new("HeroBanner", "HeroBanner").extends("Banner"))
}

/// Insert `count` id-keyed rows with contiguous 1-based sort values.
fn insert_sorted_rows(
    ctx: &TestContext,
    table: &str,
    slot: StageSlot,
    count: i64,
) -> Vec<RecordId> {
    (1..=count)
        .map(|sort| {
            let id = RecordId::generate();
            let row = Row::new()
                .with("Title", Value::String(format!("row {sort}")))
                .with("Sort", Value::Int(sort));
            match slot {
                StageSlot::Unstaged => ctx
                    .store
                    .insert(table, StageSlot::Unstaged, RowKey::Id(id), &row)
                    .unwrap(),
                // Versioned fixtures start out published: stages identical
                StageSlot::Staged(_) => ctx.store.insert_staged(table, RowKey::Id(id), &row).unwrap(),
            }
            id
        })
        .collect()
}

/// Read the sort column of every id-keyed row in a table slot and map
/// sort value -> id, the way the grid re-reads the list for display.
fn read_order(ctx: &TestContext, table: &str, column: &str, slot: StageSlot) -> BTreeMap<i64, RecordId> {
    ctx.store
        .scan(table, slot)
        .map(|entry| {
            let (key, row) = entry.unwrap();
            let id = match key {
                RowKey::Id(id) => id,
                RowKey::Pair(_, child) => child,
            };
            match row.get(column) {
                Some(Value::Int(sort)) => (*sort, id),
                other => panic!("missing sort value: {other:?}"),
            }
        })
        .collect()
}

#[test]
fn reorder_direct_relation_round_trips() {
    let ctx = TestContext::new();
    let ids = insert_sorted_rows(&ctx, "Slide", StageSlot::Unstaged, 4);

    // Reversed, non-contiguous, 1-based: {1:id4, 3:id3, 5:id2, 7:id1}
    let desired: BTreeMap<i64, RecordId> = ids
        .iter()
        .rev()
        .enumerate()
        .map(|(index, &id)| (index as i64 * 2 + 1, id))
        .collect();

    let original = read_order(&ctx, "Slide", "Sort", StageSlot::Unstaged);
    assert_ne!(original, desired);

    let component = OrderableRows::new();
    let outcome = component
        .execute_reorder(
            &ctx.list(RelationDescriptor::direct("Slide"), RecordId::generate()),
            &desired,
        )
        .unwrap();

    assert_eq!(outcome.updated, 4);
    assert_eq!(read_order(&ctx, "Slide", "Sort", StageSlot::Unstaged), desired);
}

#[test]
fn get_sort_table_resolves_hierarchy_and_join_tables() {
    let ctx = TestContext::new();
    let mut component = OrderableRows::new();
    let parent = RecordId::generate();

    // Direct relation: the related class's own table
    let list = ctx.list(RelationDescriptor::direct("Slide"), parent);
    assert_eq!(component.get_sort_table(&list).unwrap(), "Slide");

    // Subclass list without a redefined sort field: shared ancestor table
    let list = ctx.list(RelationDescriptor::direct("VideoSlide"), parent);
    assert_eq!(component.get_sort_table(&list).unwrap(), "Slide");

    // Many-to-many with the default field: order is a property of the record
    let descriptor = RelationDescriptor::join_table("Gallery_Tags", "GalleryID", "TagID", "Tag");
    let list = ctx.list(descriptor.clone(), parent);
    assert_eq!(component.get_sort_table(&list).unwrap(), "Tag");

    // Same relation with a join-table-only field: order is a property of
    // the membership
    component.set_sort_field("TagSort");
    let list = ctx.list(descriptor, parent);
    assert_eq!(component.get_sort_table(&list).unwrap(), "Gallery_Tags");
}

#[test]
fn reorder_join_table_relation_updates_membership_rows() {
    let ctx = TestContext::new();
    let gallery = RecordId::generate();
    let tags: Vec<_> = (1..=3)
        .map(|sort| {
            let id = RecordId::generate();
            ctx.store
                .insert(
                    "Tag",
                    StageSlot::Unstaged,
                    RowKey::Id(id),
                    &Row::new().with("Sort", Value::Int(sort)),
                )
                .unwrap();
            ctx.store
                .insert(
                    "Gallery_Tags",
                    StageSlot::Unstaged,
                    RowKey::Pair(gallery, id),
                    &Row::new().with("TagSort", Value::Int(sort)),
                )
                .unwrap();
            id
        })
        .collect();

    let desired: BTreeMap<i64, RecordId> =
        vec![(1, tags[2]), (2, tags[0]), (3, tags[1])].into_iter().collect();

    let component = OrderableRows::with_sort_field("TagSort");
    let descriptor = RelationDescriptor::join_table("Gallery_Tags", "GalleryID", "TagID", "Tag");
    component
        .execute_reorder(&ctx.list(descriptor, gallery), &desired)
        .unwrap();

    assert_eq!(
        read_order(&ctx, "Gallery_Tags", "TagSort", StageSlot::Unstaged),
        desired
    );
    // The records themselves were not re-saved
    let tag_order = read_order(&ctx, "Tag", "Sort", StageSlot::Unstaged);
    assert_eq!(tag_order.get(&1), Some(&tags[0]));
}

#[test]
fn reorder_join_table_relation_skips_records_outside_the_list() {
    let ctx = TestContext::new();
    let gallery = RecordId::generate();
    let member = RecordId::generate();
    let ex_member = RecordId::generate();

    // Both records exist in Tag, but only one still has a membership row
    // for this gallery (the other was removed from the list elsewhere)
    for (id, sort) in [(member, 1), (ex_member, 2)] {
        ctx.store
            .insert(
                "Tag",
                StageSlot::Unstaged,
                RowKey::Id(id),
                &Row::new().with("Sort", Value::Int(sort)),
            )
            .unwrap();
    }
    ctx.store
        .insert(
            "Gallery_Tags",
            StageSlot::Unstaged,
            RowKey::Pair(gallery, member),
            &Row::new().with("TagSort", Value::Int(1)),
        )
        .unwrap();

    // Default field: order lives on the record's own table, but the list
    // is still scoped by membership
    let desired: BTreeMap<i64, RecordId> =
        vec![(5, member), (6, ex_member)].into_iter().collect();
    let descriptor = RelationDescriptor::join_table("Gallery_Tags", "GalleryID", "TagID", "Tag");
    let outcome = OrderableRows::new()
        .execute_reorder(&ctx.list(descriptor, gallery), &desired)
        .unwrap();

    assert_eq!(outcome.updated, 1);
    assert_eq!(outcome.skipped, vec![ex_member]);

    let order = read_order(&ctx, "Tag", "Sort", StageSlot::Unstaged);
    assert_eq!(order.get(&5), Some(&member));
    // The record outside the list keeps its previous sort value
    assert_eq!(order.get(&2), Some(&ex_member));
}

#[test]
fn reorder_through_relation_targets_intermediary_only() {
    let ctx = TestContext::new();
    let playlist = RecordId::generate();
    let tracks = insert_sorted_rows(&ctx, "Track", StageSlot::Unstaged, 3);
    let entries: Vec<_> = tracks
        .iter()
        .enumerate()
        .map(|(index, &track)| {
            let entry = RecordId::generate();
            ctx.store
                .insert(
                    "PlaylistEntry",
                    StageSlot::Unstaged,
                    RowKey::Id(entry),
                    &Row::new()
                        .with("PlaylistID", Value::Id(playlist))
                        .with("TrackID", Value::Id(track))
                        .with("Sort", Value::Int(index as i64 + 1)),
                )
                .unwrap();
            entry
        })
        .collect();

    let track_order_before = read_order(&ctx, "Track", "Sort", StageSlot::Unstaged);

    let desired: BTreeMap<i64, RecordId> =
        vec![(1, tracks[1]), (2, tracks[2]), (3, tracks[0])].into_iter().collect();

    let component = OrderableRows::new();
    let descriptor = RelationDescriptor::through("PlaylistEntry", "PlaylistID", "TrackID");
    let outcome = component
        .execute_reorder(&ctx.list(descriptor, playlist), &desired)
        .unwrap();
    assert_eq!(outcome.updated, 3);

    // Intermediary rows carry the new order, keyed by track reference
    let entry_sort = |entry: RecordId| {
        ctx.store
            .get("PlaylistEntry", StageSlot::Unstaged, &RowKey::Id(entry))
            .unwrap()
            .unwrap()
            .get("Sort")
            .cloned()
    };
    assert_eq!(entry_sort(entries[1]), Some(Value::Int(1)));
    assert_eq!(entry_sort(entries[2]), Some(Value::Int(2)));
    assert_eq!(entry_sort(entries[0]), Some(Value::Int(3)));

    // The belongs side is untouched
    assert_eq!(
        read_order(&ctx, "Track", "Sort", StageSlot::Unstaged),
        track_order_before
    );
}

#[test]
fn reorder_versioned_relation_diverges_draft_from_live() {
    let ctx = TestContext::new();
    let ids = insert_sorted_rows(&ctx, "Banner", StageSlot::Staged(Stage::Draft), 4);

    // Published: no difference between stages yet
    assert_eq!(
        read_order(&ctx, "Banner", "Sort", StageSlot::Staged(Stage::Draft)),
        read_order(&ctx, "Banner", "Sort", StageSlot::Staged(Stage::Live)),
    );

    let desired: BTreeMap<i64, RecordId> = ids
        .iter()
        .rev()
        .enumerate()
        .map(|(index, &id)| (index as i64 * 2 + 1, id))
        .collect();

    let component = OrderableRows::new();
    // Subclass of the versioned class; resolves to the ancestor table
    component
        .execute_reorder(
            &ctx.list(RelationDescriptor::direct("HeroBanner"), RecordId::generate()),
            &desired,
        )
        .unwrap();

    // Draft carries the new order without any publish call
    assert_eq!(
        read_order(&ctx, "Banner", "Sort", StageSlot::Staged(Stage::Draft)),
        desired
    );
    // Live keeps the original order
    let live = read_order(&ctx, "Banner", "Sort", StageSlot::Staged(Stage::Live));
    let original: BTreeMap<i64, RecordId> = ids
        .iter()
        .enumerate()
        .map(|(index, &id)| (index as i64 + 1, id))
        .collect();
    assert_eq!(live, original);
}

#[test]
fn omitted_members_keep_their_sort_value() {
    let ctx = TestContext::new();
    let ids = insert_sorted_rows(&ctx, "Slide", StageSlot::Unstaged, 3);

    // Only move the last row; the others are not mentioned
    let desired: BTreeMap<i64, RecordId> = [(9, ids[2])].into_iter().collect();

    OrderableRows::new()
        .execute_reorder(
            &ctx.list(RelationDescriptor::direct("Slide"), RecordId::generate()),
            &desired,
        )
        .unwrap();

    let order = read_order(&ctx, "Slide", "Sort", StageSlot::Unstaged);
    assert_eq!(order.get(&1), Some(&ids[0]));
    assert_eq!(order.get(&2), Some(&ids[1]));
    assert_eq!(order.get(&9), Some(&ids[2]));
}

#[test]
fn unknown_ids_are_tolerated_and_reported() {
    let ctx = TestContext::new();
    let ids = insert_sorted_rows(&ctx, "Slide", StageSlot::Unstaged, 2);
    let stale = RecordId::generate();

    let desired: BTreeMap<i64, RecordId> =
        vec![(1, ids[1]), (2, ids[0]), (3, stale)].into_iter().collect();

    let outcome = OrderableRows::new()
        .execute_reorder(
            &ctx.list(RelationDescriptor::direct("Slide"), RecordId::generate()),
            &desired,
        )
        .unwrap();

    assert_eq!(outcome.updated, 2);
    assert_eq!(outcome.skipped, vec![stale]);

    let order = read_order(&ctx, "Slide", "Sort", StageSlot::Unstaged);
    assert_eq!(order.get(&1), Some(&ids[1]));
    assert_eq!(order.get(&2), Some(&ids[0]));
}

#[test]
fn misconfiguration_aborts_before_any_write() {
    let ctx = TestContext::new();
    let ids = insert_sorted_rows(&ctx, "Slide", StageSlot::Unstaged, 2);

    let desired: BTreeMap<i64, RecordId> =
        vec![(5, ids[0]), (6, ids[1])].into_iter().collect();

    let err = OrderableRows::with_sort_field("NoSuchField")
        .execute_reorder(
            &ctx.list(RelationDescriptor::direct("Slide"), RecordId::generate()),
            &desired,
        )
        .unwrap_err();
    assert!(matches!(err, Error::Configuration(_)));

    // Nothing was written
    let order = read_order(&ctx, "Slide", "Sort", StageSlot::Unstaged);
    assert_eq!(order.get(&1), Some(&ids[0]));
    assert_eq!(order.get(&2), Some(&ids[1]));
}
