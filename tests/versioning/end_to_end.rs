//! End-to-end lifecycle: create, duplicate create, edit, resolve, delete,
//! archive

use std::collections::BTreeMap;

use temporadb::{
    apply_delete, apply_edit, create, grid_rows, resolve, resolve_one, timeline, ActingContext,
    Filter, GridRows, MemoryStore, TableSchema, Timestamp, Value, VersionStore, ViewMode,
    KEY_IN_USE,
};

fn employee_store() -> MemoryStore {
    let store = MemoryStore::new();
    store
        .register(
            TableSchema::new(
                "employee",
                "key",
                &[
                    "id",
                    "key",
                    "effdt",
                    "effstatus",
                    "sync_gid",
                    "last_saved_by",
                    "last_saved_when",
                    "salary",
                ],
            )
            .unwrap(),
        )
        .unwrap();
    store
}

fn salary(n: i64) -> BTreeMap<String, Value> {
    BTreeMap::from([("salary".to_string(), Value::Int(n))])
}

#[test]
fn full_lifecycle() {
    tracing_subscriber::fmt().with_test_writer().try_init().ok();
    let store = employee_store();
    let t0 = Timestamp::from_secs(1_000);
    let t1 = Timestamp::from_secs(2_000);
    let t2 = Timestamp::from_secs(3_000);

    // Create at T0.
    let ctx0 = ActingContext::at(t0).with_user("alice@example.org");
    let v0 = create(&store, "employee", &ctx0, "emp-1", salary(1000), None).unwrap();
    assert_eq!(v0.effdt, t0);
    assert!(v0.sync_gid.is_some());

    // Creating the same key again fails validation; nothing is written.
    let err = create(&store, "employee", &ctx0, "emp-1", salary(1000), None).unwrap_err();
    assert!(matches!(
        err,
        temporadb::Error::Validation { ref message, .. } if message == KEY_IN_USE
    ));
    assert_eq!(store.scan("employee").unwrap().len(), 1);

    // Edit at T1 creates a second row; the original is untouched.
    let ctx1 = ActingContext::at(t1).with_user("bob@example.org");
    let v1 = apply_edit(&store, "employee", &ctx1, v0.id, salary(1200), None).unwrap();
    assert_eq!(v1.effdt, t1);
    assert_ne!(v1.id, v0.id);
    assert_ne!(v1.sync_gid, v0.sync_gid);
    assert_eq!(store.get("employee", v0.id).unwrap().unwrap(), v0);

    // Between T0 and T1 the first salary is effective; from T1 the second.
    let between = resolve_one(
        &store,
        "employee",
        "emp-1",
        Timestamp::from_secs(1_500),
        false,
    )
    .unwrap()
    .unwrap();
    assert_eq!(between.field("salary"), Some(&Value::Int(1000)));

    let after = resolve_one(&store, "employee", "emp-1", t1, false)
        .unwrap()
        .unwrap();
    assert_eq!(after.field("salary"), Some(&Value::Int(1200)));

    // Delete at T2: tombstone appended, live view loses the key.
    let ctx2 = ActingContext::at(t2).with_user("alice@example.org");
    let tomb = apply_delete(&store, "employee", &ctx2, v1.id).unwrap();
    assert!(!tomb.effstatus);
    assert_eq!(tomb.effdt, t2);
    assert_eq!(tomb.field("salary"), Some(&Value::Int(1200)));

    assert!(resolve_one(&store, "employee", "emp-1", t2, false)
        .unwrap()
        .is_none());
    // Before the delete instant the key is still resolvable.
    assert!(resolve_one(&store, "employee", "emp-1", Timestamp::from_secs(2_500), false)
        .unwrap()
        .is_some());

    // The archive lists all three versions, newest first, and flags salary
    // as the changed business field.
    let tl = timeline(&store, "employee", "emp-1", None, None).unwrap();
    assert_eq!(tl.len(), 3);
    let effdts: Vec<_> = tl.entries.iter().map(|e| e.row.effdt).collect();
    assert_eq!(effdts, vec![t2, t1, t0]);
    assert!(tl.changed_fields.contains(&"salary".to_string()));
}

#[test]
fn grid_modes_cover_live_listing_and_archive() {
    let store = employee_store();
    let ctx0 = ActingContext::at(Timestamp::from_secs(100));
    let v0 = create(&store, "employee", &ctx0, "emp-1", salary(10), None).unwrap();
    let ctx1 = ActingContext::at(Timestamp::from_secs(200));
    let v1 = apply_edit(&store, "employee", &ctx1, v0.id, salary(20), None).unwrap();

    let now = ActingContext::at(Timestamp::from_secs(300));

    match grid_rows(&store, "employee", &now, ViewMode::Active, &Filter::All).unwrap() {
        GridRows::Active(rows) => {
            assert_eq!(rows.len(), 1);
            assert_eq!(rows[0].id, v1.id);
        }
        other => panic!("expected Active, got {other:?}"),
    }

    match grid_rows(&store, "employee", &now, ViewMode::Listing, &Filter::All).unwrap() {
        GridRows::Listing(rows) => assert_eq!(rows.len(), 2),
        other => panic!("expected Listing, got {other:?}"),
    }

    match grid_rows(
        &store,
        "employee",
        &now,
        ViewMode::Archive { of: v0.id },
        &Filter::All,
    )
    .unwrap()
    {
        GridRows::Archive(tl) => {
            assert_eq!(tl.len(), 2);
            let viewed: Vec<_> = tl.entries.iter().map(|e| e.is_viewed).collect();
            assert_eq!(viewed, vec![false, true]);
        }
        other => panic!("expected Archive, got {other:?}"),
    }
}

#[test]
fn priority_tiers_override_recency_across_the_stack() {
    let store = MemoryStore::new();
    store
        .register(
            TableSchema::new(
                "rate_override",
                "code",
                &["id", "code", "effdt", "effstatus", "prio", "amount"],
            )
            .unwrap(),
        )
        .unwrap();
    let amount = |n: i64| BTreeMap::from([("amount".to_string(), Value::Int(n))]);

    // Tier 1 creates the key with a recent version.
    let base = ActingContext::at(Timestamp::from_secs(2_020)).with_priority(1);
    let v0 = create(&store, "rate_override", &base, "R-1", amount(10), None).unwrap();

    // A tier-2 edit lands with an OLDER effective date (an override entered
    // for the past).
    let override_ctx = ActingContext::at(Timestamp::from_secs(2_019)).with_priority(2);
    apply_edit(&store, "rate_override", &override_ctx, v0.id, amount(20), None).unwrap();

    // Resolution in priority mode picks tier 2 although tier 1 is newer.
    let rows = resolve(
        &store,
        "rate_override",
        Timestamp::from_secs(3_000),
        &Filter::All,
        true,
    )
    .unwrap();
    assert_eq!(rows.len(), 1);
    assert_eq!(rows[0].prio, Some(2));
    assert_eq!(rows[0].field("amount"), Some(&Value::Int(20)));

    // Without priority mode, plain recency applies instead.
    let rows = resolve(
        &store,
        "rate_override",
        Timestamp::from_secs(3_000),
        &Filter::All,
        false,
    )
    .unwrap();
    assert_eq!(rows[0].field("amount"), Some(&Value::Int(10)));
}

#[test]
fn schema_misconfiguration_surfaces_before_any_query() {
    let err = TableSchema::new("broken", "key", &["id", "key", "effstatus"]).unwrap_err();
    assert!(matches!(
        err,
        temporadb::Error::MissingColumn { ref column, .. } if column == "effdt"
    ));
}

#[test]
fn keyword_filter_narrows_the_live_view() {
    let store = MemoryStore::new();
    store
        .register(
            TableSchema::new(
                "employee",
                "key",
                &["id", "key", "effdt", "effstatus", "name", "title"],
            )
            .unwrap(),
        )
        .unwrap();
    let ctx = ActingContext::at(Timestamp::from_secs(100));
    let person = |name: &str, title: &str| {
        BTreeMap::from([
            ("name".to_string(), Value::String(name.to_string())),
            ("title".to_string(), Value::String(title.to_string())),
        ])
    };
    create(&store, "employee", &ctx, "e1", person("Ada Lovelace", "Engineer"), None).unwrap();
    create(&store, "employee", &ctx, "e2", person("Alan Turing", "Analyst"), None).unwrap();

    let needle = Filter::keyword(&["name", "title"], "engineer");
    let rows = resolve(&store, "employee", Timestamp::from_secs(200), &needle, false).unwrap();
    assert_eq!(rows.len(), 1);
    assert_eq!(rows[0].key, "e1");
}
