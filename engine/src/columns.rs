//! FILENAME: engine/src/columns.rs
//! PURPOSE: The ordered, bijective column-name <-> position map.
//! CONTEXT: Backed by an `IndexSet`, so a name's position is its insertion
//! index and uniqueness holds by construction. Names are sanitized before
//! they get here (see `names::sanitize_column_names`).

use indexmap::IndexSet;

#[derive(Debug, Clone, Default)]
pub struct ColumnMap {
    names: IndexSet<String>,
}

impl ColumnMap {
    pub fn new() -> Self {
        ColumnMap::default()
    }

    /// Builds a map from already-unique names. Later duplicates are dropped.
    pub fn from_names<S: AsRef<str>>(names: &[S]) -> Self {
        ColumnMap {
            names: names.iter().map(|n| n.as_ref().to_string()).collect(),
        }
    }

    pub fn len(&self) -> usize {
        self.names.len()
    }

    pub fn is_empty(&self) -> bool {
        self.names.is_empty()
    }

    pub fn contains(&self, name: &str) -> bool {
        self.names.contains(name)
    }

    pub fn position_of(&self, name: &str) -> Option<usize> {
        self.names.get_index_of(name)
    }

    pub fn name_at(&self, position: usize) -> Option<&str> {
        self.names.get_index(position).map(String::as_str)
    }

    pub fn iter(&self) -> impl Iterator<Item = &str> {
        self.names.iter().map(String::as_str)
    }

    pub fn to_vec(&self) -> Vec<String> {
        self.names.iter().cloned().collect()
    }

    /// Appends `name` and returns its position (the existing one if present).
    pub fn push(&mut self, name: impl Into<String>) -> usize {
        self.names.insert_full(name.into()).0
    }

    /// Inserts a new name at `position` (clamped to the end).
    pub(crate) fn insert_at(&mut self, position: usize, name: impl Into<String>) {
        let mut names = self.to_vec();
        names.insert(position.min(names.len()), name.into());
        self.names = names.into_iter().collect();
    }

    /// Removes the given positions; unknown positions are ignored.
    pub(crate) fn remove_positions(&mut self, positions: &[usize]) {
        self.names = self
            .names
            .iter()
            .enumerate()
            .filter(|(i, _)| !positions.contains(i))
            .map(|(_, n)| n.clone())
            .collect();
    }
}

/// Column maps are equal only when names appear in the same order.
impl PartialEq for ColumnMap {
    fn eq(&self, other: &Self) -> bool {
        self.names.len() == other.names.len() && self.names.iter().eq(other.names.iter())
    }
}

impl Eq for ColumnMap {}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn positions_follow_insertion_order() {
        let mut map = ColumnMap::from_names(&["ID", "Name"]);
        assert_eq!(map.position_of("Name"), Some(1));
        assert_eq!(map.push("Age"), 2);
        assert_eq!(map.push("ID"), 0);
        assert_eq!(map.name_at(2), Some("Age"));
        assert_eq!(map.name_at(3), None);
    }

    #[test]
    fn insert_and_remove() {
        let mut map = ColumnMap::from_names(&["a", "c"]);
        map.insert_at(1, "b");
        assert_eq!(map.to_vec(), ["a", "b", "c"]);
        map.remove_positions(&[0, 2]);
        assert_eq!(map.to_vec(), ["b"]);
    }

    #[test]
    fn equality_is_order_sensitive() {
        let a = ColumnMap::from_names(&["a", "b"]);
        let b = ColumnMap::from_names(&["b", "a"]);
        assert_ne!(a, b);
        assert_eq!(a, ColumnMap::from_names(&["a", "b"]));
    }
}
