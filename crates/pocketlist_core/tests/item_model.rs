use pocketlist_core::{normalize_item_name, ChecklistItem, Position};
use uuid::Uuid;

#[test]
fn item_new_sets_defaults() {
    let item = ChecklistItem::new("Milk", false);

    assert!(!item.uuid.is_nil());
    assert_eq!(item.name, "Milk");
    assert!(!item.is_checked);
    assert_eq!(item.position, 0);
    assert_eq!(item.incidence, 0);
}

#[test]
fn with_id_keeps_caller_identity() {
    let id = Uuid::parse_str("11111111-2222-4333-8444-555555555555").unwrap();
    let item = ChecklistItem::with_id(id, "Eggs", true);

    assert_eq!(item.uuid, id);
    assert!(item.is_checked);
}

#[test]
fn answers_to_ignores_ascii_case() {
    let item = ChecklistItem::new("Olive Oil", false);

    assert!(item.answers_to("olive oil"));
    assert!(item.answers_to("OLIVE OIL"));
    assert!(!item.answers_to("olive"));
}

#[test]
fn normalize_item_name_trims_and_collapses_whitespace() {
    assert_eq!(
        normalize_item_name("  olive   oil \t"),
        Some("olive oil".to_string())
    );
    assert_eq!(
        normalize_item_name("one\ttwo\nthree"),
        Some("one two three".to_string())
    );
    assert_eq!(normalize_item_name("plain"), Some("plain".to_string()));
}

#[test]
fn normalize_item_name_rejects_blank_input() {
    assert_eq!(normalize_item_name(""), None);
    assert_eq!(normalize_item_name("   \t\n "), None);
}

#[test]
fn position_end_sorts_after_every_concrete_rank() {
    assert!(Position::At(0) < Position::At(1));
    assert!(Position::At(i64::MAX) < Position::End);
    assert_eq!(Position::End, Position::End);

    let mut positions = vec![Position::End, Position::At(2), Position::At(0)];
    positions.sort();
    assert_eq!(
        positions,
        vec![Position::At(0), Position::At(2), Position::End]
    );
}

#[test]
fn item_serialization_uses_expected_wire_fields() {
    let id = Uuid::parse_str("11111111-2222-4333-8444-555555555555").unwrap();
    let mut item = ChecklistItem::with_id(id, "Flour", true);
    item.position = 4;
    item.incidence = 7;

    let json = serde_json::to_value(&item).unwrap();
    assert_eq!(json["uuid"], id.to_string());
    assert_eq!(json["name"], "Flour");
    assert_eq!(json["is_checked"], true);
    assert_eq!(json["position"], 4);
    assert_eq!(json["incidence"], 7);

    let decoded: ChecklistItem = serde_json::from_value(json).unwrap();
    assert_eq!(decoded, item);
}
