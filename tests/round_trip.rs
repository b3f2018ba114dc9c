use pretty_assertions::assert_eq;
use std::fs;
use std::path::Path;
use ticklist::parse::{load_store, parse_todos, serialize_todos};

fn read_fixture(fixture_name: &str) -> String {
    let path = Path::new(env!("CARGO_MANIFEST_DIR"))
        .join("tests/fixtures")
        .join(fixture_name);
    fs::read_to_string(&path)
        .unwrap_or_else(|e| panic!("Could not read fixture {}: {}", fixture_name, e))
}

/// Helper: load a fixture file, parse it, serialize it, and assert byte-for-byte equality
fn assert_todo_round_trip(fixture_name: &str) {
    let source = read_fixture(fixture_name);
    let (store, dropped) = load_store(&source);
    assert!(dropped.is_empty(), "dropped lines: {:?}", dropped);

    let output = serialize_todos(&store);
    assert_eq!(
        output, source,
        "Round-trip failed for fixture: {}",
        fixture_name
    );
}

// ============================================================================
// Round-trip tests
// ============================================================================

#[test]
fn round_trip_simple_todos() {
    assert_todo_round_trip("simple_todos");
}

#[test]
fn round_trip_completed_and_notes() {
    assert_todo_round_trip("completed_and_notes");
}

#[test]
fn round_trip_is_stable() {
    let source = read_fixture("completed_and_notes");
    let (store, _) = load_store(&source);
    let once = serialize_todos(&store);
    let (again, _) = load_store(&once);
    assert_eq!(serialize_todos(&again), once);
}

// ============================================================================
// Normalization
// ============================================================================

#[test]
fn unsorted_file_is_sorted_on_save() {
    let source = read_fixture("unsorted_todos");
    let (store, _) = load_store(&source);
    assert_eq!(
        serialize_todos(&store),
        "[1] Renew passport\n\
         [1] Second urgent thing\n\
         [2] Water the plants\n\
         [-3] Old errand\n\
         [5] Tidy the garage\n"
    );
}

#[test]
fn malformed_lines_are_dropped() {
    let source = read_fixture("malformed_todos");
    let (todos, dropped) = parse_todos(&source);
    let messages: Vec<&str> = todos.iter().map(|t| t.message.as_str()).collect();
    assert_eq!(messages, vec!["Kept line", "Also kept"]);
    assert_eq!(
        dropped,
        vec![
            "this line has no brackets",
            "[0] zero is not a priority",
            "[12] out of range",
            "[3]",
            "[2]> empty note ref",
        ]
    );

    let (store, _) = load_store(&source);
    assert_eq!(serialize_todos(&store), "[1] Kept line\n[4] Also kept\n");
}
