//! Row model behind the params and headers editors.
//!
//! A row list handed to the editor is never empty: every operation here that
//! could leave it empty puts a single blank row back.

use std::collections::HashSet;

use super::request_state::{KeyValuePair, new_id};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum KvField {
    Key,
    Value,
    Description,
}

pub fn blank_row() -> KeyValuePair {
    KeyValuePair::default()
}

/// The headers a fresh request starts with.
pub fn default_headers() -> Vec<KeyValuePair> {
    vec![KeyValuePair::new("Content-Type", "application/json")]
}

/// Give every row a unique id and return at least one row.
///
/// An empty input yields `fallback` when it has rows, else one blank row.
pub fn normalize(rows: &[KeyValuePair], fallback: Option<&[KeyValuePair]>) -> Vec<KeyValuePair> {
    let mut seen = HashSet::new();
    let normalized: Vec<KeyValuePair> = rows
        .iter()
        .map(|row| {
            let mut row = row.clone();
            if row.id.trim().is_empty() || seen.contains(&row.id) {
                row.id = new_id();
            }
            seen.insert(row.id.clone());
            row
        })
        .collect();

    ensure_rows(normalized, fallback)
}

fn ensure_rows(rows: Vec<KeyValuePair>, fallback: Option<&[KeyValuePair]>) -> Vec<KeyValuePair> {
    if !rows.is_empty() {
        return rows;
    }
    match fallback {
        Some(fb) if !fb.is_empty() => normalize(fb, None),
        _ => vec![blank_row()],
    }
}

pub fn add_row(rows: &[KeyValuePair]) -> Vec<KeyValuePair> {
    let mut next = rows.to_vec();
    next.push(blank_row());
    next
}

/// Drop the row with `id`. The last remaining row is kept.
pub fn remove_row(rows: &[KeyValuePair], id: &str) -> Vec<KeyValuePair> {
    if rows.len() <= 1 {
        return ensure_rows(rows.to_vec(), None);
    }
    let next = rows.iter().filter(|row| row.id != id).cloned().collect();
    ensure_rows(next, None)
}

pub fn update_field(rows: &[KeyValuePair], id: &str, field: KvField, value: &str) -> Vec<KeyValuePair> {
    rows.iter()
        .map(|row| {
            if row.id != id {
                return row.clone();
            }
            let mut row = row.clone();
            match field {
                KvField::Key => row.key = value.to_string(),
                KvField::Value => row.value = value.to_string(),
                KvField::Description => row.description = value.to_string(),
            }
            row
        })
        .collect()
}

/// Rows that affect an outgoing request.
pub fn active_rows(rows: &[KeyValuePair]) -> impl Iterator<Item = &KeyValuePair> {
    rows.iter().filter(|row| row.is_active())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn row(id: &str, key: &str) -> KeyValuePair {
        KeyValuePair {
            id: id.to_string(),
            key: key.to_string(),
            value: String::new(),
            description: String::new(),
        }
    }

    fn unique_ids(rows: &[KeyValuePair]) -> bool {
        let ids: HashSet<_> = rows.iter().map(|r| r.id.as_str()).collect();
        ids.len() == rows.len()
    }

    #[test]
    fn test_normalize_empty_gives_one_blank_row() {
        let rows = normalize(&[], None);
        assert_eq!(rows.len(), 1);
        assert!(rows[0].key.is_empty());
        assert!(!rows[0].id.is_empty());
    }

    #[test]
    fn test_normalize_empty_uses_fallback() {
        let rows = normalize(&[], Some(&default_headers()));
        assert_eq!(rows.len(), 1);
        assert_eq!(rows[0].key, "Content-Type");
    }

    #[test]
    fn test_normalize_empty_fallback_is_ignored() {
        let rows = normalize(&[], Some(&[]));
        assert_eq!(rows.len(), 1);
        assert!(rows[0].key.is_empty());
    }

    #[test]
    fn test_normalize_assigns_missing_and_duplicate_ids() {
        let input = vec![row("", "a"), row("x", "b"), row("x", "c")];
        let rows = normalize(&input, None);
        assert_eq!(rows.len(), 3);
        assert!(unique_ids(&rows));
        assert_eq!(rows[1].id, "x");
        let keys: Vec<_> = rows.iter().map(|r| r.key.as_str()).collect();
        assert_eq!(keys, ["a", "b", "c"]);
    }

    #[test]
    fn test_normalize_keeps_non_empty_input_over_fallback() {
        let rows = normalize(&[row("1", "q")], Some(&default_headers()));
        assert_eq!(rows.len(), 1);
        assert_eq!(rows[0].key, "q");
    }

    #[test]
    fn test_add_row_appends() {
        let rows = add_row(&[row("1", "a")]);
        assert_eq!(rows.len(), 2);
        assert_eq!(rows[0].id, "1");
        assert!(rows[1].key.is_empty());
        assert!(unique_ids(&rows));
    }

    #[test]
    fn test_remove_last_row_is_noop() {
        let rows = remove_row(&[row("1", "a")], "1");
        assert_eq!(rows.len(), 1);
        assert_eq!(rows[0].id, "1");
    }

    #[test]
    fn test_remove_row_preserves_order() {
        let rows = remove_row(&[row("1", "a"), row("2", "b"), row("3", "c")], "2");
        let ids: Vec<_> = rows.iter().map(|r| r.id.as_str()).collect();
        assert_eq!(ids, ["1", "3"]);
    }

    #[test]
    fn test_update_field_touches_only_target() {
        let rows = update_field(&[row("1", "a"), row("2", "b")], "2", KvField::Value, "v");
        assert_eq!(rows[0].value, "");
        assert_eq!(rows[1].value, "v");
        let rows = update_field(&rows, "1", KvField::Description, "d");
        assert_eq!(rows[0].description, "d");
    }

    #[test]
    fn test_active_rows_skip_blank_keys() {
        let rows = vec![row("1", ""), row("2", "   "), row("3", "q")];
        let active: Vec<_> = active_rows(&rows).map(|r| r.id.as_str()).collect();
        assert_eq!(active, ["3"]);
    }
}
