//! Guestbook entry domain model.
//!
//! # Responsibility
//! - Define the canonical record for one guestbook signature.
//! - Own the construction rules and the birth-date normalization.
//!
//! # Invariants
//! - `name` and `text` contain at least one non-whitespace character.
//! - `birth` is always a valid calendar date; unparseable input maps to
//!   [`BIRTH_SENTINEL`].
//! - `submitted_at` is captured at construction, not at persistence.
//! - `id` is unset until a store assigns it, and is assigned at most once.

use chrono::{Local, NaiveDate, NaiveDateTime};
use serde::{Deserialize, Serialize};
use std::error::Error;
use std::fmt::{Display, Formatter};

/// Birth date used when user input cannot be read as `day.month.year`.
pub const BIRTH_SENTINEL: NaiveDate = match NaiveDate::from_ymd_opt(1899, 1, 1) {
    Some(date) => date,
    None => panic!("sentinel birth date must be valid"),
};

/// Returns [`BIRTH_SENTINEL`], the date stored for unreadable birth input.
pub fn birth_sentinel() -> NaiveDate {
    BIRTH_SENTINEL
}

/// Store-assigned identity of a persisted entry.
///
/// Opaque to callers; ordering follows assignment order of the store.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct EntryId(i64);

impl EntryId {
    /// Wraps a raw store key.
    pub fn new(raw: i64) -> Self {
        Self(raw)
    }

    /// Returns the raw store key.
    pub fn get(self) -> i64 {
        self.0
    }
}

impl Display for EntryId {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// User-supplied field checked by [`Entry::new`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum EntryField {
    Name,
    Text,
    Birth,
}

impl EntryField {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Name => "name",
            Self::Text => "text",
            Self::Birth => "birth",
        }
    }
}

impl Display for EntryField {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Construction failure for [`Entry`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EntryValidationError {
    /// The field was empty or whitespace-only.
    InvalidInput(EntryField),
}

impl EntryValidationError {
    /// Returns the offending field.
    pub fn field(&self) -> EntryField {
        match self {
            Self::InvalidInput(field) => *field,
        }
    }
}

impl Display for EntryValidationError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::InvalidInput(field) => write!(f, "{field} must not be null or empty"),
        }
    }
}

impl Error for EntryValidationError {}

/// Raised when a store tries to overwrite an already assigned identity.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct IdentityConflict {
    pub current: EntryId,
    pub attempted: EntryId,
}

impl Display for IdentityConflict {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "entry identity already assigned to {}; refusing to reassign to {}",
            self.current, self.attempted
        )
    }
}

impl Error for IdentityConflict {}

/// One guestbook record.
///
/// Immutable after construction apart from the one-time identity assignment
/// performed by the store.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(try_from = "EntryRecord")]
pub struct Entry {
    id: Option<EntryId>,
    name: String,
    text: String,
    submitted_at: NaiveDateTime,
    birth: NaiveDate,
}

impl Entry {
    /// Creates a new unpersisted entry stamped with the current local time.
    ///
    /// # Errors
    /// - Returns `InvalidInput` naming the first of `name`, `text`, `birth`
    ///   that is empty or whitespace-only.
    pub fn new(
        name: impl Into<String>,
        text: impl Into<String>,
        birth: &str,
    ) -> Result<Self, EntryValidationError> {
        Self::new_at(name, text, birth, Local::now().naive_local())
    }

    /// Same contract as [`Entry::new`] with a caller-provided clock reading.
    pub fn new_at(
        name: impl Into<String>,
        text: impl Into<String>,
        birth: &str,
        submitted_at: NaiveDateTime,
    ) -> Result<Self, EntryValidationError> {
        let name = name.into();
        let text = text.into();
        ensure_has_text(&name, EntryField::Name)?;
        ensure_has_text(&text, EntryField::Text)?;
        ensure_has_text(birth, EntryField::Birth)?;

        Ok(Self {
            id: None,
            name,
            text,
            submitted_at,
            birth: parse_birth(birth),
        })
    }

    /// Rebuilds a stored entry from all five persisted fields.
    ///
    /// Reserved for store implementations reading back their own rows.
    /// Performs no validation.
    pub fn rehydrate(
        id: Option<EntryId>,
        name: String,
        text: String,
        submitted_at: NaiveDateTime,
        birth: NaiveDate,
    ) -> Self {
        Self {
            id,
            name,
            text,
            submitted_at,
            birth,
        }
    }

    pub fn id(&self) -> Option<EntryId> {
        self.id
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn text(&self) -> &str {
        &self.text
    }

    pub fn submitted_at(&self) -> NaiveDateTime {
        self.submitted_at
    }

    pub fn birth(&self) -> NaiveDate {
        self.birth
    }

    /// Returns whether a store has assigned this entry an identity.
    pub fn is_persisted(&self) -> bool {
        self.id.is_some()
    }

    /// Sets the identity slot. Succeeds once; later calls are rejected
    /// even when they carry the same value.
    pub(crate) fn assign_id(&mut self, id: EntryId) -> Result<(), IdentityConflict> {
        match self.id {
            Some(current) => Err(IdentityConflict {
                current,
                attempted: id,
            }),
            None => {
                self.id = Some(id);
                Ok(())
            }
        }
    }
}

/// Parses hand-typed `dd.mm.yyyy` or `dd-mm-yyyy` input into a date.
///
/// Total: anything that is not exactly three integer components forming a
/// real calendar date yields [`BIRTH_SENTINEL`]. Separators are not
/// collapsed and components are not trimmed; empty components after the
/// last non-empty one are ignored, so `1.2.2020.` still reads as a date.
pub fn parse_birth(input: &str) -> NaiveDate {
    try_parse_birth(input).unwrap_or(BIRTH_SENTINEL)
}

fn try_parse_birth(input: &str) -> Option<NaiveDate> {
    let mut parts: Vec<&str> = input.split(['.', '-']).collect();
    while parts.last() == Some(&"") {
        parts.pop();
    }
    let [day, month, year] = parts.as_slice() else {
        return None;
    };

    let day = u32::try_from(day.parse::<i32>().ok()?).ok()?;
    let month = u32::try_from(month.parse::<i32>().ok()?).ok()?;
    let year = year.parse::<i32>().ok()?;

    NaiveDate::from_ymd_opt(year, month, day)
}

fn ensure_has_text(value: &str, field: EntryField) -> Result<(), EntryValidationError> {
    if value.chars().all(is_blank) {
        return Err(EntryValidationError::InvalidInput(field));
    }
    Ok(())
}

/// Whitespace for the non-empty rule: Unicode space separators except the
/// no-break spaces, plus the ASCII controls TAB..CR and FS..US.
fn is_blank(c: char) -> bool {
    match c {
        '\u{a0}' | '\u{2007}' | '\u{202f}' | '\u{85}' => false,
        '\u{1c}'..='\u{1f}' => true,
        other => other.is_whitespace(),
    }
}

#[derive(Deserialize)]
struct EntryRecord {
    id: Option<EntryId>,
    name: String,
    text: String,
    submitted_at: NaiveDateTime,
    birth: NaiveDate,
}

impl TryFrom<EntryRecord> for Entry {
    type Error = EntryValidationError;

    fn try_from(record: EntryRecord) -> Result<Self, Self::Error> {
        ensure_has_text(&record.name, EntryField::Name)?;
        ensure_has_text(&record.text, EntryField::Text)?;
        Ok(Self::rehydrate(
            record.id,
            record.name,
            record.text,
            record.submitted_at,
            record.birth,
        ))
    }
}

#[cfg(test)]
mod tests {
    use super::{
        birth_sentinel, parse_birth, Entry, EntryField, EntryId, EntryValidationError,
        BIRTH_SENTINEL,
    };
    use chrono::NaiveDate;

    fn date(year: i32, month: u32, day: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(year, month, day).expect("test date should be valid")
    }

    #[test]
    fn parse_birth_accepts_dot_and_dash_formats() {
        assert_eq!(parse_birth("1.2.2020"), date(2020, 2, 1));
        assert_eq!(parse_birth("01-02-2020"), date(2020, 2, 1));
        assert_eq!(parse_birth("10.12.1815"), date(1815, 12, 10));
        assert_eq!(parse_birth("29.2.2024"), date(2024, 2, 29));
    }

    #[test]
    fn parse_birth_allows_mixed_separators() {
        assert_eq!(parse_birth("1.2-2020"), date(2020, 2, 1));
    }

    #[test]
    fn parse_birth_reads_year_first_input_as_day() {
        assert_eq!(parse_birth("2020-02-01"), BIRTH_SENTINEL);
    }

    #[test]
    fn parse_birth_rejects_wrong_component_count() {
        for input in [
            "",
            "..",
            "....",
            "2020",
            "1.2",
            "1.2.3.4",
            "1.2.3.4.",
            "1-2-3-4-5",
            "1/2/2020",
        ] {
            assert_eq!(parse_birth(input), BIRTH_SENTINEL, "input: {input:?}");
        }
    }

    #[test]
    fn parse_birth_keeps_empty_components() {
        assert_eq!(parse_birth("1..2020"), BIRTH_SENTINEL);
        assert_eq!(parse_birth(".2.2020"), BIRTH_SENTINEL);
        assert_eq!(parse_birth("1.2."), BIRTH_SENTINEL);
        assert_eq!(parse_birth("1..2020."), BIRTH_SENTINEL);
        assert_eq!(parse_birth("..2020"), BIRTH_SENTINEL);
    }

    #[test]
    fn parse_birth_ignores_trailing_separators() {
        assert_eq!(parse_birth("1.2.2020."), date(2020, 2, 1));
        assert_eq!(parse_birth("1.2.2020.."), date(2020, 2, 1));
        assert_eq!(parse_birth("1-2-2020-.-"), date(2020, 2, 1));
    }

    #[test]
    fn parse_birth_rejects_negative_components() {
        for input in ["-1.2.2020", "1.-2.2020", "1.2.-2020", "1--2-2020"] {
            assert_eq!(parse_birth(input), BIRTH_SENTINEL, "input: {input:?}");
        }
    }

    #[test]
    fn parse_birth_accepts_explicit_plus_sign() {
        assert_eq!(parse_birth("+1.2.2020"), date(2020, 2, 1));
        assert_eq!(parse_birth("1.+2.+2020"), date(2020, 2, 1));
    }

    #[test]
    fn parse_birth_reads_ascii_digits_only() {
        let fullwidth = "\u{ff11}.\u{ff12}.\u{ff12}\u{ff10}\u{ff12}\u{ff10}";
        assert_eq!(parse_birth(fullwidth), BIRTH_SENTINEL);
    }

    #[test]
    fn parse_birth_maps_years_beyond_calendar_range_to_sentinel() {
        assert_eq!(parse_birth("31.12.9999"), date(9999, 12, 31));
        assert_eq!(parse_birth("1.1.300000"), BIRTH_SENTINEL);
    }

    #[test]
    fn parse_birth_rejects_non_integers_and_out_of_range_values() {
        for input in [
            "aa.bb.cccc",
            "31.2.2020",
            "29.2.2023",
            "0.1.2000",
            "1.0.2000",
            "1.13.2000",
            "32.1.2000",
            "99999999999.1.2000",
        ] {
            assert_eq!(parse_birth(input), BIRTH_SENTINEL, "input: {input:?}");
        }
    }

    #[test]
    fn parse_birth_does_not_trim_components() {
        assert_eq!(parse_birth(" 1 . 2 . 2020"), BIRTH_SENTINEL);
        assert_eq!(parse_birth("1.2.2020 "), BIRTH_SENTINEL);
    }

    #[test]
    fn parse_birth_takes_two_digit_years_literally() {
        assert_eq!(parse_birth("1.1.99"), date(99, 1, 1));
    }

    #[test]
    fn parse_birth_of_sentinel_text_is_sentinel() {
        assert_eq!(parse_birth("1.1.1899"), BIRTH_SENTINEL);
        assert_eq!(birth_sentinel(), date(1899, 1, 1));
        assert_eq!(birth_sentinel(), BIRTH_SENTINEL);
    }

    #[test]
    fn new_reports_first_blank_field() {
        let err = Entry::new("  ", "", "").unwrap_err();
        assert_eq!(err, EntryValidationError::InvalidInput(EntryField::Name));

        let err = Entry::new("Ada", "\t\n", "1.1.2000").unwrap_err();
        assert_eq!(err.field(), EntryField::Text);

        let err = Entry::new("Ada", "Hello", " ").unwrap_err();
        assert_eq!(err.field(), EntryField::Birth);
        assert_eq!(err.to_string(), "birth must not be null or empty");
    }

    #[test]
    fn no_break_spaces_count_as_text() {
        for name in ["\u{a0}", "\u{2007}", "\u{202f}", "\u{85}"] {
            let entry = Entry::new(name, "Hello", "1.1.2000").unwrap();
            assert_eq!(entry.name(), name);
        }
    }

    #[test]
    fn separator_controls_and_unicode_spaces_are_blank() {
        for name in ["\u{1c}", "\u{1f}\u{1e}", "\u{3000}", "\u{2028}", " \u{b}\u{c}"] {
            let err = Entry::new(name, "Hello", "1.1.2000").unwrap_err();
            assert_eq!(err.field(), EntryField::Name, "name: {name:?}");
        }
    }

    #[test]
    fn assign_id_is_write_once() {
        let mut entry = Entry::new("Ada", "Hello", "10.12.1815").unwrap();
        assert!(!entry.is_persisted());

        entry.assign_id(EntryId::new(7)).unwrap();
        assert_eq!(entry.id(), Some(EntryId::new(7)));

        let conflict = entry.assign_id(EntryId::new(7)).unwrap_err();
        assert_eq!(conflict.current, EntryId::new(7));
        assert_eq!(entry.id(), Some(EntryId::new(7)));
    }
}
