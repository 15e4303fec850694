//! Integration tests for LogEntry field access through the public API.

use logship_plugin::entry::{CanonicalField, Level, LogEntry};

#[test]
fn test_canonical_keys_reach_typed_accessors() {
    let mut entry = LogEntry::new();
    entry.set_field("tsrc", "2024-05-01T10:00:00Z");
    entry.set_field("pid", "4242");
    entry.set_field("src", "/var/log/app.log");
    entry.set_field("msg", "  padded message  ");
    entry.set_field("trcv", "2024-05-01T10:00:01Z");
    entry.set_field("ip", "192.0.2.10");
    entry.set_field("app", "billing");
    entry.set_field("lvl", "error");

    assert_eq!(entry.src_time(), "2024-05-01T10:00:00Z");
    assert_eq!(entry.pid(), "4242");
    assert_eq!(entry.source(), "/var/log/app.log");
    assert_eq!(entry.message(), "  padded message  ");
    assert_eq!(entry.rcv_time(), "2024-05-01T10:00:01Z");
    assert_eq!(entry.ip(), "192.0.2.10");
    assert_eq!(entry.app_name(), "billing");
    assert_eq!(entry.level(), Level::Error);

    // canonical values never land in the extension map
    assert!(entry.field_names().is_empty());
}

#[test]
fn test_canonical_view_matches_typed_accessors() {
    let entry: LogEntry = [("msg", "hello"), ("lvl", "2"), ("app", "web")]
        .into_iter()
        .collect();

    assert_eq!(entry.canonical(CanonicalField::Message), entry.message());
    assert_eq!(entry.canonical(CanonicalField::AppName), entry.app_name());
    assert_eq!(entry.canonical(CanonicalField::Level), entry.level_name());
    assert_eq!(entry.canonical(CanonicalField::Level), "LOG");
}

#[test]
fn test_level_spellings_agree() {
    for value in ["warn", "WARN", "3", " Warn "] {
        let mut entry = LogEntry::new();
        entry.set_field("lvl", value);
        assert_eq!(entry.level(), Level::Warn, "value {value:?}");
        assert_eq!(entry.level_name(), "WARN");
    }
}

#[test]
fn test_bad_level_values_keep_previous_level() {
    let mut entry = LogEntry::new();
    entry.set_field("lvl", "severe");

    for value in ["99", "-1", "notalevel", ""] {
        entry.set_field("lvl", value);
        assert_eq!(entry.level(), Level::Severe, "value {value:?}");
    }
}

#[test]
fn test_blank_names_are_ignored() {
    let mut entry = LogEntry::new();
    entry.set_field("  ", "x");
    entry.set_field("", "x");
    assert_eq!(entry, LogEntry::new());
}

#[test]
fn test_extension_name_grammar() {
    let mut entry = LogEntry::new();
    entry.set_field("1bad", "x");
    entry.set_field("a", "too short");
    entry.set_field("has-dash", "x");
    entry.set_field("ok_1", "x");
    entry.set_field(" trimmed ", " kept ");

    let mut names = entry.field_names();
    names.sort_unstable();
    assert_eq!(names, vec!["ok_1", "trimmed"]);
    assert_eq!(entry.get_field("ok_1"), "x");
    assert_eq!(entry.get_field("trimmed"), " kept ");
    assert_eq!(entry.get_field("1bad"), "");
}

#[test]
fn test_extension_values_overwrite() {
    let mut entry = LogEntry::new();
    entry.set_field("region", "eu-west");
    entry.set_field("region", "us-east");
    assert_eq!(entry.get_field("region"), "us-east");
    assert_eq!(entry.field_names().len(), 1);
}

#[test]
fn test_level_name_for_out_of_range_ordinals() {
    assert_eq!(Level::name_for_ordinal(5), "SEVERE");
    assert_eq!(Level::name_for_ordinal(6), "PANIC");
    assert_eq!(Level::name_for_ordinal(7), "PANIC");
    assert_eq!(Level::name_for_ordinal(-3), "PANIC");
}

#[test]
fn test_json_output() {
    let mut entry = LogEntry::new();
    entry.set_field("msg", "disk almost full");
    entry.set_field("lvl", "warn");
    entry.set_field("mount", "/data");

    let value: serde_json::Value = serde_json::from_str(&entry.to_json().unwrap()).unwrap();
    assert_eq!(value["msg"], "disk almost full");
    assert_eq!(value["lvl"], "WARN");
    assert_eq!(value["mount"], "/data");
    assert_eq!(value["pid"], "");
}
