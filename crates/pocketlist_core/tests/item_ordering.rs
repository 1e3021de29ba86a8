use pocketlist_core::db::migrations::latest_version;
use pocketlist_core::db::open_db_in_memory;
use pocketlist_core::{
    ChangeBus, ChecklistItem, ChecklistRepository, InsertPolicy, ItemRepoError, ItemRepository,
    ItemService, ItemServiceError, SqliteChecklistRepository, SqliteItemRepository, StoreChange,
};
use rusqlite::Connection;

#[test]
fn insert_appends_new_items_at_bottom_by_default() {
    let conn = open_db_in_memory().unwrap();
    let changes = ChangeBus::new();
    seed_checklist(&conn, &changes, "groceries");
    let service = board_service(&conn, &changes, InsertPolicy::InsertAtBottom);

    service.insert_item("groceries", "Milk", false).unwrap();
    service.insert_item("groceries", "Eggs", false).unwrap();
    service.insert_item("groceries", "Bread", false).unwrap();

    let inspect = SqliteItemRepository::try_new(&conn, &changes).unwrap();
    assert_eq!(
        partition_names(&inspect, "groceries", false),
        ["Milk", "Eggs", "Bread"]
    );
    assert_eq!(partition_positions(&inspect, "groceries", false), [0, 1, 2]);
    assert!(partition_names(&inspect, "groceries", true).is_empty());
}

#[test]
fn insert_at_top_policy_prepends_new_items() {
    let conn = open_db_in_memory().unwrap();
    let changes = ChangeBus::new();
    seed_checklist(&conn, &changes, "groceries");
    let service = board_service(&conn, &changes, InsertPolicy::InsertAtTop);

    service.insert_item("groceries", "Milk", false).unwrap();
    service.insert_item("groceries", "Eggs", false).unwrap();

    let inspect = SqliteItemRepository::try_new(&conn, &changes).unwrap();
    assert_eq!(
        partition_names(&inspect, "groceries", false),
        ["Eggs", "Milk"]
    );
    assert_eq!(partition_positions(&inspect, "groceries", false), [0, 1]);
}

#[test]
fn insert_normalizes_name_before_storing() {
    let conn = open_db_in_memory().unwrap();
    let changes = ChangeBus::new();
    seed_checklist(&conn, &changes, "groceries");
    let service = board_service(&conn, &changes, InsertPolicy::InsertAtBottom);

    service
        .insert_item("groceries", "  olive \t oil ", false)
        .unwrap();

    let inspect = SqliteItemRepository::try_new(&conn, &changes).unwrap();
    assert_eq!(partition_names(&inspect, "groceries", false), ["olive oil"]);
}

#[test]
fn insert_blank_name_is_rejected() {
    let conn = open_db_in_memory().unwrap();
    let changes = ChangeBus::new();
    seed_checklist(&conn, &changes, "groceries");
    let service = board_service(&conn, &changes, InsertPolicy::InsertAtBottom);

    let err = service.insert_item("groceries", "   \t ", false).unwrap_err();
    assert!(matches!(err, ItemServiceError::EmptyName));

    let inspect = SqliteItemRepository::try_new(&conn, &changes).unwrap();
    assert!(inspect.list_items("groceries").unwrap().is_empty());
}

#[test]
fn operations_on_unknown_checklist_are_rejected() {
    let conn = open_db_in_memory().unwrap();
    let changes = ChangeBus::new();
    seed_checklist(&conn, &changes, "groceries");
    let service = board_service(&conn, &changes, InsertPolicy::InsertAtBottom);

    let err = service.insert_item("weekend", "Milk", false).unwrap_err();
    assert!(matches!(err, ItemServiceError::UnknownChecklist(title) if title == "weekend"));

    let err = service.board("weekend").unwrap_err();
    assert!(matches!(err, ItemServiceError::UnknownChecklist(_)));
}

#[test]
fn insert_same_partition_duplicate_moves_existing_to_bottom() {
    let conn = open_db_in_memory().unwrap();
    let changes = ChangeBus::new();
    seed_checklist(&conn, &changes, "groceries");
    let service = board_service(&conn, &changes, InsertPolicy::InsertAtBottom);

    service.insert_item("groceries", "Milk", false).unwrap();
    service.insert_item("groceries", "Eggs", false).unwrap();
    service.insert_item("groceries", "Bread", false).unwrap();

    service.insert_item("groceries", " MILK ", false).unwrap();

    let inspect = SqliteItemRepository::try_new(&conn, &changes).unwrap();
    // The stored row keeps its original casing; only its rank changes.
    assert_eq!(
        partition_names(&inspect, "groceries", false),
        ["Eggs", "Bread", "Milk"]
    );
    assert_eq!(partition_positions(&inspect, "groceries", false), [0, 1, 2]);
    let milk = inspect.find_by_name("groceries", "milk").unwrap().unwrap();
    assert_eq!(milk.incidence, 0);
}

#[test]
fn insert_duplicate_in_opposite_partition_flips_instead() {
    let conn = open_db_in_memory().unwrap();
    let changes = ChangeBus::new();
    seed_checklist(&conn, &changes, "groceries");
    let service = board_service(&conn, &changes, InsertPolicy::InsertAtBottom);

    service.insert_item("groceries", "Milk", false).unwrap();
    service.insert_item("groceries", "Eggs", false).unwrap();
    service.flip_item("groceries", "Milk").unwrap();

    service.insert_item("groceries", "MILK", false).unwrap();

    let inspect = SqliteItemRepository::try_new(&conn, &changes).unwrap();
    assert_eq!(
        partition_names(&inspect, "groceries", false),
        ["Eggs", "Milk"]
    );
    assert!(partition_names(&inspect, "groceries", true).is_empty());
    let milk = inspect.find_by_name("groceries", "milk").unwrap().unwrap();
    assert_eq!(milk.incidence, 2);
}

#[test]
fn insert_checked_duplicate_of_unchecked_item_checks_it() {
    let conn = open_db_in_memory().unwrap();
    let changes = ChangeBus::new();
    seed_checklist(&conn, &changes, "groceries");
    let service = board_service(&conn, &changes, InsertPolicy::InsertAtBottom);

    service.insert_item("groceries", "Milk", false).unwrap();
    service.insert_item("groceries", "Eggs", false).unwrap();

    service.insert_item("groceries", "milk", true).unwrap();

    let inspect = SqliteItemRepository::try_new(&conn, &changes).unwrap();
    assert_eq!(partition_names(&inspect, "groceries", false), ["Eggs"]);
    assert_eq!(partition_names(&inspect, "groceries", true), ["Milk"]);
    let milk = inspect.find_by_name("groceries", "Milk").unwrap().unwrap();
    assert_eq!(milk.incidence, 1);
}

#[test]
fn flip_moves_item_to_checked_and_renumbers_the_rest() {
    let conn = open_db_in_memory().unwrap();
    let changes = ChangeBus::new();
    seed_checklist(&conn, &changes, "groceries");
    let service = board_service(&conn, &changes, InsertPolicy::InsertAtBottom);

    service.insert_item("groceries", "Milk", false).unwrap();
    service.insert_item("groceries", "Eggs", false).unwrap();
    service.insert_item("groceries", "Bread", false).unwrap();

    service.flip_item("groceries", "Eggs").unwrap();

    let inspect = SqliteItemRepository::try_new(&conn, &changes).unwrap();
    assert_eq!(
        partition_names(&inspect, "groceries", false),
        ["Milk", "Bread"]
    );
    assert_eq!(partition_positions(&inspect, "groceries", false), [0, 1]);
    assert_eq!(partition_names(&inspect, "groceries", true), ["Eggs"]);
    let eggs = inspect.find_by_name("groceries", "Eggs").unwrap().unwrap();
    assert_eq!(eggs.incidence, 1);
}

#[test]
fn freshly_checked_item_ranks_above_equal_incidence_peers() {
    let conn = open_db_in_memory().unwrap();
    let changes = ChangeBus::new();
    seed_checklist(&conn, &changes, "groceries");
    let service = board_service(&conn, &changes, InsertPolicy::InsertAtBottom);

    service.insert_item("groceries", "Milk", false).unwrap();
    service.insert_item("groceries", "Eggs", false).unwrap();
    service.flip_item("groceries", "Eggs").unwrap();

    service.flip_item("groceries", "Milk").unwrap();

    let inspect = SqliteItemRepository::try_new(&conn, &changes).unwrap();
    // Both carry incidence 1; the most recently checked one sorts first.
    assert_eq!(
        partition_names(&inspect, "groceries", true),
        ["Milk", "Eggs"]
    );
}

#[test]
fn unchecking_sends_item_to_bottom_and_still_increments_incidence() {
    let conn = open_db_in_memory().unwrap();
    let changes = ChangeBus::new();
    seed_checklist(&conn, &changes, "groceries");
    let service = board_service(&conn, &changes, InsertPolicy::InsertAtBottom);

    service.insert_item("groceries", "Milk", false).unwrap();
    service.insert_item("groceries", "Eggs", false).unwrap();
    service.insert_item("groceries", "Bread", false).unwrap();
    service.flip_item("groceries", "Milk").unwrap();

    service.flip_item("groceries", "Milk").unwrap();

    let inspect = SqliteItemRepository::try_new(&conn, &changes).unwrap();
    assert_eq!(
        partition_names(&inspect, "groceries", false),
        ["Eggs", "Bread", "Milk"]
    );
    assert_eq!(partition_positions(&inspect, "groceries", false), [0, 1, 2]);
    assert!(partition_names(&inspect, "groceries", true).is_empty());
    let milk = inspect.find_by_name("groceries", "Milk").unwrap().unwrap();
    assert_eq!(milk.incidence, 2);
}

#[test]
fn checked_partition_ranks_by_accumulated_incidence() {
    let conn = open_db_in_memory().unwrap();
    let changes = ChangeBus::new();
    seed_checklist(&conn, &changes, "groceries");
    let service = board_service(&conn, &changes, InsertPolicy::InsertAtBottom);

    service.insert_item("groceries", "Milk", false).unwrap();
    service.insert_item("groceries", "Eggs", false).unwrap();
    for _ in 0..3 {
        service.flip_item("groceries", "Milk").unwrap();
    }
    service.flip_item("groceries", "Eggs").unwrap();

    let inspect = SqliteItemRepository::try_new(&conn, &changes).unwrap();
    assert_eq!(
        partition_names(&inspect, "groceries", true),
        ["Milk", "Eggs"]
    );
    assert_eq!(partition_incidences(&inspect, "groceries", true), [3, 1]);
}

#[test]
fn flip_missing_item_is_rejected() {
    let conn = open_db_in_memory().unwrap();
    let changes = ChangeBus::new();
    seed_checklist(&conn, &changes, "groceries");
    let service = board_service(&conn, &changes, InsertPolicy::InsertAtBottom);

    service.insert_item("groceries", "Milk", false).unwrap();

    let err = service.flip_item("groceries", "Juice").unwrap_err();
    assert!(matches!(
        err,
        ItemServiceError::MissingItem { checklist, name }
            if checklist == "groceries" && name == "Juice"
    ));

    let err = service.flip_item("groceries", "   ").unwrap_err();
    assert!(matches!(err, ItemServiceError::MissingItem { .. }));
}

#[test]
fn reorder_unchecked_assigns_dense_positions_and_keeps_incidence() {
    let conn = open_db_in_memory().unwrap();
    let changes = ChangeBus::new();
    seed_checklist(&conn, &changes, "groceries");
    let service = board_service(&conn, &changes, InsertPolicy::InsertAtBottom);

    service.insert_item("groceries", "Milk", false).unwrap();
    service.insert_item("groceries", "Eggs", false).unwrap();
    service.insert_item("groceries", "Bread", false).unwrap();

    service
        .reorder_partition("groceries", false, &names(&["Bread", "Milk", "Eggs"]))
        .unwrap();

    let inspect = SqliteItemRepository::try_new(&conn, &changes).unwrap();
    assert_eq!(
        partition_names(&inspect, "groceries", false),
        ["Bread", "Milk", "Eggs"]
    );
    assert_eq!(partition_positions(&inspect, "groceries", false), [0, 1, 2]);
    assert_eq!(partition_incidences(&inspect, "groceries", false), [0, 0, 0]);
}

#[test]
fn reorder_checked_rewrites_incidence_greedily() {
    let conn = open_db_in_memory().unwrap();
    let changes = ChangeBus::new();
    seed_checklist(&conn, &changes, "groceries");
    let service = board_service(&conn, &changes, InsertPolicy::InsertAtBottom);

    service.insert_item("groceries", "Flour", false).unwrap();
    service.insert_item("groceries", "Yeast", false).unwrap();
    for _ in 0..5 {
        service.flip_item("groceries", "Flour").unwrap();
    }
    for _ in 0..3 {
        service.flip_item("groceries", "Yeast").unwrap();
    }

    let inspect = SqliteItemRepository::try_new(&conn, &changes).unwrap();
    assert_eq!(
        partition_names(&inspect, "groceries", true),
        ["Flour", "Yeast"]
    );
    assert_eq!(partition_incidences(&inspect, "groceries", true), [5, 3]);

    service
        .reorder_partition("groceries", true, &names(&["Yeast", "Flour"]))
        .unwrap();

    // The first item keeps its incidence; the demoted one drops just below.
    assert_eq!(
        partition_names(&inspect, "groceries", true),
        ["Yeast", "Flour"]
    );
    assert_eq!(partition_incidences(&inspect, "groceries", true), [3, 2]);
    assert_eq!(partition_positions(&inspect, "groceries", true), [0, 1]);
}

#[test]
fn reorder_checked_leaves_consistent_incidences_untouched() {
    let conn = open_db_in_memory().unwrap();
    let changes = ChangeBus::new();
    seed_checklist(&conn, &changes, "groceries");
    let service = board_service(&conn, &changes, InsertPolicy::InsertAtBottom);

    service.insert_item("groceries", "Flour", false).unwrap();
    service.insert_item("groceries", "Yeast", false).unwrap();
    for _ in 0..5 {
        service.flip_item("groceries", "Flour").unwrap();
    }
    for _ in 0..3 {
        service.flip_item("groceries", "Yeast").unwrap();
    }

    service
        .reorder_partition("groceries", true, &names(&["Flour", "Yeast"]))
        .unwrap();

    let inspect = SqliteItemRepository::try_new(&conn, &changes).unwrap();
    assert_eq!(partition_incidences(&inspect, "groceries", true), [5, 3]);
}

#[test]
fn reorder_accepts_case_variant_references() {
    let conn = open_db_in_memory().unwrap();
    let changes = ChangeBus::new();
    seed_checklist(&conn, &changes, "groceries");
    let service = board_service(&conn, &changes, InsertPolicy::InsertAtBottom);

    service.insert_item("groceries", "Milk", false).unwrap();
    service.insert_item("groceries", "Eggs", false).unwrap();

    service
        .reorder_partition("groceries", false, &names(&["EGGS", " milk "]))
        .unwrap();

    let inspect = SqliteItemRepository::try_new(&conn, &changes).unwrap();
    assert_eq!(
        partition_names(&inspect, "groceries", false),
        ["Eggs", "Milk"]
    );
}

#[test]
fn reorder_rejects_wrong_length_unknown_and_repeated_references() {
    let conn = open_db_in_memory().unwrap();
    let changes = ChangeBus::new();
    seed_checklist(&conn, &changes, "groceries");
    let service = board_service(&conn, &changes, InsertPolicy::InsertAtBottom);

    service.insert_item("groceries", "Milk", false).unwrap();
    service.insert_item("groceries", "Eggs", false).unwrap();

    let err = service
        .reorder_partition("groceries", false, &names(&["Milk"]))
        .unwrap_err();
    assert!(matches!(err, ItemServiceError::PartitionMismatch(_)));

    let err = service
        .reorder_partition("groceries", false, &names(&["Milk", "Juice"]))
        .unwrap_err();
    assert!(matches!(err, ItemServiceError::PartitionMismatch(_)));

    let err = service
        .reorder_partition("groceries", false, &names(&["Milk", "Milk"]))
        .unwrap_err();
    assert!(matches!(err, ItemServiceError::PartitionMismatch(_)));

    // Stored order is untouched after every rejected reorder.
    let inspect = SqliteItemRepository::try_new(&conn, &changes).unwrap();
    assert_eq!(
        partition_names(&inspect, "groceries", false),
        ["Milk", "Eggs"]
    );
}

#[test]
fn remove_item_deletes_and_renumbers_its_partition() {
    let conn = open_db_in_memory().unwrap();
    let changes = ChangeBus::new();
    seed_checklist(&conn, &changes, "groceries");
    let service = board_service(&conn, &changes, InsertPolicy::InsertAtBottom);

    service.insert_item("groceries", "Milk", false).unwrap();
    service.insert_item("groceries", "Eggs", false).unwrap();
    service.insert_item("groceries", "Bread", false).unwrap();

    service.remove_item("groceries", "eggs").unwrap();

    let inspect = SqliteItemRepository::try_new(&conn, &changes).unwrap();
    assert_eq!(
        partition_names(&inspect, "groceries", false),
        ["Milk", "Bread"]
    );
    assert_eq!(partition_positions(&inspect, "groceries", false), [0, 1]);
    assert!(inspect.find_by_name("groceries", "Eggs").unwrap().is_none());

    let err = service.remove_item("groceries", "Eggs").unwrap_err();
    assert!(matches!(err, ItemServiceError::MissingItem { .. }));
}

#[test]
fn mutating_one_partition_leaves_the_other_untouched() {
    let conn = open_db_in_memory().unwrap();
    let changes = ChangeBus::new();
    seed_checklist(&conn, &changes, "groceries");
    let service = board_service(&conn, &changes, InsertPolicy::InsertAtBottom);

    service.insert_item("groceries", "Milk", false).unwrap();
    service.insert_item("groceries", "Eggs", false).unwrap();
    service.insert_item("groceries", "Bread", false).unwrap();
    service.flip_item("groceries", "Milk").unwrap();

    service.insert_item("groceries", "Butter", false).unwrap();

    let inspect = SqliteItemRepository::try_new(&conn, &changes).unwrap();
    assert_eq!(
        partition_names(&inspect, "groceries", false),
        ["Eggs", "Bread", "Butter"]
    );
    assert_eq!(partition_names(&inspect, "groceries", true), ["Milk"]);
    assert_eq!(partition_positions(&inspect, "groceries", true), [0]);
}

#[test]
fn board_returns_both_partitions_in_display_order() {
    let conn = open_db_in_memory().unwrap();
    let changes = ChangeBus::new();
    seed_checklist(&conn, &changes, "groceries");
    let service = board_service(&conn, &changes, InsertPolicy::InsertAtBottom);

    service.insert_item("groceries", "Milk", false).unwrap();
    service.insert_item("groceries", "Eggs", false).unwrap();
    service.insert_item("groceries", "Bread", false).unwrap();
    service.flip_item("groceries", "Eggs").unwrap();

    let board = service.board("groceries").unwrap();

    assert_eq!(board.title, "groceries");
    let unchecked: Vec<&str> = board.unchecked.iter().map(|v| v.name.as_str()).collect();
    assert_eq!(unchecked, ["Milk", "Bread"]);
    let checked: Vec<&str> = board.checked.iter().map(|v| v.name.as_str()).collect();
    assert_eq!(checked, ["Eggs"]);
    assert!(board.checked.iter().all(|v| v.is_checked));
    assert!(board.unchecked.iter().all(|v| !v.is_checked));
}

#[test]
fn every_successful_mutation_publishes_exactly_one_items_event() {
    let conn = open_db_in_memory().unwrap();
    let changes = ChangeBus::new();
    seed_checklist(&conn, &changes, "groceries");
    let service = board_service(&conn, &changes, InsertPolicy::InsertAtBottom);
    let sub = changes.subscribe();

    service.insert_item("groceries", "Milk", false).unwrap();
    assert_one_items_event(&sub, "groceries");

    service.insert_item("groceries", "Eggs", false).unwrap();
    assert_one_items_event(&sub, "groceries");

    service.flip_item("groceries", "Milk").unwrap();
    assert_one_items_event(&sub, "groceries");

    service
        .reorder_partition("groceries", false, &names(&["Eggs"]))
        .unwrap();
    assert_one_items_event(&sub, "groceries");

    service.remove_item("groceries", "Eggs").unwrap();
    assert_one_items_event(&sub, "groceries");
}

#[test]
fn failed_mutations_publish_nothing() {
    let conn = open_db_in_memory().unwrap();
    let changes = ChangeBus::new();
    seed_checklist(&conn, &changes, "groceries");
    let service = board_service(&conn, &changes, InsertPolicy::InsertAtBottom);
    service.insert_item("groceries", "Milk", false).unwrap();
    let sub = changes.subscribe();

    let _ = service.insert_item("groceries", "  ", false).unwrap_err();
    let _ = service.flip_item("groceries", "Juice").unwrap_err();
    let _ = service
        .reorder_partition("groceries", false, &names(&["Milk", "Juice"]))
        .unwrap_err();
    let _ = service.insert_item("weekend", "Milk", false).unwrap_err();

    assert_eq!(sub.try_next(), None);
}

#[test]
fn conflicting_bulk_write_rolls_back_and_publishes_nothing() {
    let conn = open_db_in_memory().unwrap();
    let changes = ChangeBus::new();
    seed_checklist(&conn, &changes, "groceries");
    let repo = SqliteItemRepository::try_new(&conn, &changes).unwrap();
    repo.replace_items("groceries", &[ChecklistItem::new("Bread", false)])
        .unwrap();
    let sub = changes.subscribe();

    // Two distinct rows whose names collide under the case-insensitive
    // identity index.
    let conflicting = vec![
        ChecklistItem::new("Milk", false),
        ChecklistItem::new("MILK", false),
    ];
    let err = repo.replace_items("groceries", &conflicting).unwrap_err();
    assert!(matches!(err, ItemRepoError::Db(_)));

    assert_eq!(partition_names(&repo, "groceries", false), ["Bread"]);
    assert_eq!(sub.try_next(), None);
}

#[test]
fn repository_rejects_uninitialized_connection() {
    let conn = Connection::open_in_memory().unwrap();
    let changes = ChangeBus::new();

    let result = SqliteItemRepository::try_new(&conn, &changes);
    match result {
        Err(ItemRepoError::UninitializedConnection {
            expected_version,
            actual_version: 0,
        }) => assert!(expected_version > 0),
        Err(other) => panic!("unexpected error: {other}"),
        Ok(_) => panic!("expected uninitialized connection error"),
    }
}

#[test]
fn repository_rejects_connection_without_items_table() {
    let conn = Connection::open_in_memory().unwrap();
    let changes = ChangeBus::new();
    conn.execute_batch(
        "CREATE TABLE checklists (
            title TEXT PRIMARY KEY NOT NULL,
            is_active INTEGER NOT NULL DEFAULT 0,
            created_at INTEGER NOT NULL
        );",
    )
    .unwrap();
    conn.execute_batch(&format!("PRAGMA user_version = {};", latest_version()))
        .unwrap();

    let result = SqliteItemRepository::try_new(&conn, &changes);
    assert!(matches!(
        result,
        Err(ItemRepoError::MissingRequiredTable("checklist_items"))
    ));
}

#[test]
fn repository_rejects_connection_missing_required_item_column() {
    let conn = Connection::open_in_memory().unwrap();
    let changes = ChangeBus::new();
    conn.execute_batch(
        "CREATE TABLE checklists (
            title TEXT PRIMARY KEY NOT NULL,
            is_active INTEGER NOT NULL DEFAULT 0,
            created_at INTEGER NOT NULL
        );
        CREATE TABLE checklist_items (
            uuid TEXT PRIMARY KEY NOT NULL,
            checklist_title TEXT NOT NULL,
            name TEXT NOT NULL,
            is_checked INTEGER NOT NULL DEFAULT 0,
            position INTEGER NOT NULL DEFAULT 0
        );",
    )
    .unwrap();
    conn.execute_batch(&format!("PRAGMA user_version = {};", latest_version()))
        .unwrap();

    let result = SqliteItemRepository::try_new(&conn, &changes);
    assert!(matches!(
        result,
        Err(ItemRepoError::MissingRequiredColumn {
            table: "checklist_items",
            column: "incidence"
        })
    ));
}

fn seed_checklist(conn: &Connection, changes: &ChangeBus, title: &str) {
    let catalog = SqliteChecklistRepository::try_new(conn, changes).unwrap();
    catalog.create_active(title).unwrap();
}

fn board_service<'a>(
    conn: &'a Connection,
    changes: &'a ChangeBus,
    policy: InsertPolicy,
) -> ItemService<SqliteItemRepository<'a>> {
    let repo = SqliteItemRepository::try_new(conn, changes).unwrap();
    ItemService::new(repo, policy)
}

fn names(values: &[&str]) -> Vec<String> {
    values.iter().map(|value| value.to_string()).collect()
}

fn partition_names(
    repo: &SqliteItemRepository<'_>,
    checklist: &str,
    is_checked: bool,
) -> Vec<String> {
    repo.list_partition(checklist, is_checked)
        .unwrap()
        .into_iter()
        .map(|item| item.name)
        .collect()
}

fn partition_positions(
    repo: &SqliteItemRepository<'_>,
    checklist: &str,
    is_checked: bool,
) -> Vec<i64> {
    repo.list_partition(checklist, is_checked)
        .unwrap()
        .into_iter()
        .map(|item| item.position)
        .collect()
}

fn partition_incidences(
    repo: &SqliteItemRepository<'_>,
    checklist: &str,
    is_checked: bool,
) -> Vec<i64> {
    repo.list_partition(checklist, is_checked)
        .unwrap()
        .into_iter()
        .map(|item| item.incidence)
        .collect()
}

fn assert_one_items_event(
    sub: &pocketlist_core::ChangeSubscription,
    expected_checklist: &str,
) {
    assert_eq!(
        sub.try_next(),
        Some(StoreChange::Items {
            checklist: expected_checklist.to_string()
        })
    );
    assert_eq!(sub.try_next(), None);
}
