#![forbid(unsafe_code)]

use crate::schema::TableSchema;
use crate::table::{Cell, Row, Snapshot};

/// Composite business identifier of a record, one component per key column.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct NaturalKey {
    components: Vec<String>,
}

impl NaturalKey {
    pub fn new<I, S>(components: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        Self {
            components: components
                .into_iter()
                .map(|c| c.as_ref().trim().to_string())
                .collect(),
        }
    }

    pub fn components(&self) -> &[String] {
        &self.components
    }

    pub fn matches(&self, row: &Row, key_columns: &[&str]) -> bool {
        self.components.len() == key_columns.len()
            && key_columns
                .iter()
                .zip(&self.components)
                .all(|(column, expected)| row.get(column).trimmed_text() == *expected)
    }
}

impl std::fmt::Display for NaturalKey {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.components.join(" / "))
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Located {
    pub index: usize,
    /// Further rows sharing the same key. The first match is the one returned.
    pub duplicates: usize,
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub enum LocateError {
    NotFound,
    KeyArity { expected: usize, actual: usize },
}

impl LocateError {
    pub fn message(&self) -> &'static str {
        match self {
            Self::NotFound => "record not found",
            Self::KeyArity { .. } => "natural key has the wrong number of components",
        }
    }
}

/// Finds the first row whose trimmed key cells equal `key` exactly (case-sensitive).
pub fn locate(
    snapshot: &Snapshot,
    schema: &TableSchema,
    key: &NaturalKey,
) -> Result<Located, LocateError> {
    if key.components().len() != schema.key.len() {
        return Err(LocateError::KeyArity {
            expected: schema.key.len(),
            actual: key.components().len(),
        });
    }
    let mut matches = snapshot
        .rows()
        .iter()
        .enumerate()
        .filter(|(_, row)| key.matches(row, schema.key))
        .map(|(index, _)| index);
    let Some(index) = matches.next() else {
        return Err(LocateError::NotFound);
    };
    Ok(Located {
        index,
        duplicates: matches.count(),
    })
}

/// Field replacements for one row, applied in insertion order.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct FieldUpdates {
    fields: Vec<(String, Cell)>,
}

impl FieldUpdates {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn set(mut self, column: &str, value: impl Into<Cell>) -> Self {
        self.insert(column, value);
        self
    }

    pub fn insert(&mut self, column: &str, value: impl Into<Cell>) {
        let value = value.into();
        match self.fields.iter_mut().find(|(c, _)| c == column) {
            Some(slot) => slot.1 = value,
            None => self.fields.push((column.to_string(), value)),
        }
    }

    pub fn columns(&self) -> impl Iterator<Item = &str> {
        self.fields.iter().map(|(c, _)| c.as_str())
    }
}

/// Copy of `row` with only the named fields replaced.
pub fn apply(row: &Row, updates: &FieldUpdates) -> Row {
    let mut out = row.clone();
    for (column, value) in &updates.fields {
        out.set(column, value.clone());
    }
    out
}

/// Applies `updates` to the row at `index` inside the snapshot, extending the
/// header with any updated column it lacks. Returns `false` if `index` is out of range.
pub fn apply_at(snapshot: &mut Snapshot, index: usize, updates: &FieldUpdates) -> bool {
    let Some(row) = snapshot.row(index) else {
        return false;
    };
    let updated = apply(row, updates);
    snapshot.replace_row(index, updated)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::schema::{ACTIVITIES, activities as col};

    fn activity(mabadara: &str, name: &str, progress: i64) -> Row {
        Row::new()
            .with(col::MABADARA, mabadara)
            .with(col::ACTIVITY, name)
            .with(col::PROGRESS, progress)
            .with(col::OWNER_COMMENT, "keep me")
    }

    fn snapshot(rows: Vec<Row>) -> Snapshot {
        let header = ACTIVITIES.columns.iter().map(|c| c.to_string()).collect();
        Snapshot::new(header, rows)
    }

    #[test]
    fn locate_trims_every_key_component() {
        let snap = snapshot(vec![
            activity("A", "X", 10),
            activity(" B ", " Y\t", 20),
        ]);
        let found = locate(&snap, &ACTIVITIES, &NaturalKey::new(["B", "Y "])).unwrap();
        assert_eq!(found, Located { index: 1, duplicates: 0 });
    }

    #[test]
    fn locate_is_case_sensitive() {
        let snap = snapshot(vec![activity("A", "X", 10)]);
        assert_eq!(
            locate(&snap, &ACTIVITIES, &NaturalKey::new(["a", "x"])),
            Err(LocateError::NotFound)
        );
    }

    #[test]
    fn locate_returns_first_match_and_counts_duplicates() {
        let snap = snapshot(vec![
            activity("A", "X", 10),
            activity("A", "X", 20),
            activity("A", "X", 30),
        ]);
        let found = locate(&snap, &ACTIVITIES, &NaturalKey::new(["A", "X"])).unwrap();
        assert_eq!(found.index, 0);
        assert_eq!(found.duplicates, 2);
    }

    #[test]
    fn locate_rejects_wrong_key_arity() {
        let snap = snapshot(vec![activity("A", "X", 10)]);
        assert_eq!(
            locate(&snap, &ACTIVITIES, &NaturalKey::new(["A"])),
            Err(LocateError::KeyArity { expected: 2, actual: 1 })
        );
    }

    #[test]
    fn apply_replaces_only_named_fields() {
        let row = activity("A", "X", 10);
        let updates = FieldUpdates::new().set(col::PROGRESS, 55i64);
        let out = apply(&row, &updates);
        assert_eq!(out.get(col::PROGRESS), &Cell::Int(55));
        assert_eq!(out.get(col::OWNER_COMMENT), &Cell::text("keep me"));
        assert_eq!(out.get(col::MABADARA), &Cell::text("A"));
        assert_eq!(row.get(col::PROGRESS), &Cell::Int(10));
    }

    #[test]
    fn apply_at_leaves_other_rows_untouched() {
        let mut snap = snapshot(vec![activity("A", "X", 10), activity("A", "Y", 20)]);
        let before = snap.rows()[1].clone();
        assert!(apply_at(&mut snap, 0, &FieldUpdates::new().set(col::PROGRESS, 99i64)));
        assert_eq!(snap.rows()[1], before);
        assert!(!apply_at(&mut snap, 7, &FieldUpdates::new()));
    }
}
