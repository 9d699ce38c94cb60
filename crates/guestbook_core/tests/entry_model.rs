use chrono::{Local, NaiveDate};
use guestbook_core::{
    parse_birth, Entry, EntryField, EntryId, EntryValidationError, BIRTH_SENTINEL,
};

fn date(year: i32, month: u32, day: u32) -> NaiveDate {
    NaiveDate::from_ymd_opt(year, month, day).unwrap()
}

#[test]
fn new_populates_fields_and_stamps_construction_time() {
    let before = Local::now().naive_local();
    let entry = Entry::new("Ada", "Hello", "10.12.1815").unwrap();
    let after = Local::now().naive_local();

    assert_eq!(entry.id(), None);
    assert!(!entry.is_persisted());
    assert_eq!(entry.name(), "Ada");
    assert_eq!(entry.text(), "Hello");
    assert_eq!(entry.birth(), date(1815, 12, 10));
    assert!(before <= entry.submitted_at() && entry.submitted_at() <= after);
}

#[test]
fn new_accepts_dash_separated_birth() {
    let entry = Entry::new("Bob", "Hi", "10-12-1815").unwrap();
    assert_eq!(entry.birth(), date(1815, 12, 10));
}

#[test]
fn new_keeps_name_and_text_verbatim() {
    let entry = Entry::new("  Ada  ", "\tline one\nline two ", "1.1.2000").unwrap();
    assert_eq!(entry.name(), "  Ada  ");
    assert_eq!(entry.text(), "\tline one\nline two ");
}

#[test]
fn new_rejects_blank_fields_naming_the_field() {
    assert_eq!(
        Entry::new("", "Hi", "1.1.2000").unwrap_err(),
        EntryValidationError::InvalidInput(EntryField::Name)
    );
    assert_eq!(
        Entry::new("Ada", " \n ", "1.1.2000").unwrap_err(),
        EntryValidationError::InvalidInput(EntryField::Text)
    );
    assert_eq!(
        Entry::new("Ada", "Hi", "").unwrap_err(),
        EntryValidationError::InvalidInput(EntryField::Birth)
    );
}

#[test]
fn unparseable_birth_falls_back_to_sentinel() {
    for birth in ["not-a-date", "31.2.2020", "2020-02-01", "1/2/2020"] {
        let entry = Entry::new("Cleo", "Msg", birth).unwrap();
        assert_eq!(entry.birth(), BIRTH_SENTINEL, "birth input: {birth:?}");
    }
    assert_eq!(BIRTH_SENTINEL, date(1899, 1, 1));
}

#[test]
fn trailing_separator_after_year_still_parses() {
    let entry = Entry::new("Fay", "Msg", "1.2.2020.").unwrap();
    assert_eq!(entry.birth(), date(2020, 2, 1));
}

#[test]
fn new_at_uses_the_given_clock_reading() {
    let submitted_at = date(2024, 5, 17).and_hms_opt(9, 30, 0).unwrap();
    let entry = Entry::new_at("Dan", "Msg", "1.2.2020", submitted_at).unwrap();
    assert_eq!(entry.submitted_at(), submitted_at);
    assert_eq!(entry.birth(), date(2020, 2, 1));
}

#[test]
fn birth_text_round_trips_for_every_day_of_a_leap_year() {
    let mut day = date(2024, 1, 1);
    while day.format("%Y").to_string() == "2024" {
        let (d, m, y) = (
            day.format("%-d").to_string(),
            day.format("%-m").to_string(),
            day.format("%Y").to_string(),
        );
        assert_eq!(parse_birth(&format!("{d}.{m}.{y}")), day);
        assert_eq!(parse_birth(&format!("{d}-{m}-{y}")), day);
        day = day.succ_opt().unwrap();
    }
}

#[test]
fn rehydrate_skips_validation() {
    let submitted_at = date(2019, 3, 1).and_hms_opt(12, 0, 0).unwrap();
    let entry = Entry::rehydrate(
        Some(EntryId::new(3)),
        String::new(),
        String::new(),
        submitted_at,
        BIRTH_SENTINEL,
    );
    assert_eq!(entry.id(), Some(EntryId::new(3)));
    assert_eq!(entry.name(), "");
    assert!(entry.is_persisted());
}

#[test]
fn entry_serialization_uses_expected_wire_fields() {
    let submitted_at = date(2026, 2, 13).and_hms_opt(10, 0, 0).unwrap();
    let entry = Entry::rehydrate(
        Some(EntryId::new(42)),
        "Ada".to_string(),
        "Hello".to_string(),
        submitted_at,
        date(1815, 12, 10),
    );

    let json = serde_json::to_value(&entry).unwrap();
    assert_eq!(json["id"], 42);
    assert_eq!(json["name"], "Ada");
    assert_eq!(json["text"], "Hello");
    assert_eq!(json["submitted_at"], "2026-02-13T10:00:00");
    assert_eq!(json["birth"], "1815-12-10");

    let decoded: Entry = serde_json::from_value(json).unwrap();
    assert_eq!(decoded, entry);
}

#[test]
fn deserialize_rejects_blank_name() {
    let value = serde_json::json!({
        "id": null,
        "name": "   ",
        "text": "Hello",
        "submitted_at": "2026-02-13T10:00:00",
        "birth": "1899-01-01"
    });

    let err = serde_json::from_value::<Entry>(value).unwrap_err();
    assert!(
        err.to_string().contains("name must not be null or empty"),
        "unexpected error: {err}"
    );
}

#[test]
fn entries_are_shareable_across_threads() {
    fn assert_send_sync<T: Send + Sync>() {}
    assert_send_sync::<Entry>();
}
