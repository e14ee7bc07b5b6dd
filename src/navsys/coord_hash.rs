//! `CoordHash<V>` is a thin `HashMap<Coord, V>` wrapper. Equality is by
//! key-set only (values compared by presence, not content) — a deliberate
//! choice preserved from the source because several callers store opaque
//! per-cell payloads that are not themselves comparable.

use std::collections::HashMap;

use super::coord::Coord;

#[derive(Debug, Clone)]
pub struct CoordHash<V> {
    map: HashMap<Coord, V>,
}

impl<V> Default for CoordHash<V> {
    fn default() -> Self {
        CoordHash { map: HashMap::new() }
    }
}

impl<V> CoordHash<V> {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn insert(&mut self, c: Coord, v: V) -> Option<V> {
        self.map.insert(c, v)
    }

    pub fn remove(&mut self, c: Coord) -> Option<V> {
        self.map.remove(&c)
    }

    pub fn contains(&self, c: Coord) -> bool {
        self.map.contains_key(&c)
    }

    pub fn get(&self, c: Coord) -> Option<&V> {
        self.map.get(&c)
    }

    pub fn get_mut(&mut self, c: Coord) -> Option<&mut V> {
        self.map.get_mut(&c)
    }

    pub fn len(&self) -> usize {
        self.map.len()
    }

    pub fn is_empty(&self) -> bool {
        self.map.is_empty()
    }

    pub fn clear(&mut self) {
        self.map.clear();
    }

    pub fn iter(&self) -> impl Iterator<Item = (&Coord, &V)> {
        self.map.iter()
    }

    pub fn keys(&self) -> impl Iterator<Item = &Coord> {
        self.map.keys()
    }
}

impl<V: Clone> CoordHash<V> {
    /// Deep copy: clones every value.
    pub fn deep_clone(&self) -> Self {
        CoordHash {
            map: self.map.clone(),
        }
    }
}

impl<V> PartialEq for CoordHash<V> {
    /// Key-set equality: values are not compared, only presence/absence.
    fn eq(&self, other: &Self) -> bool {
        self.map.len() == other.map.len() && self.map.keys().all(|k| other.map.contains_key(k))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn equality_ignores_value_content() {
        let mut a: CoordHash<i32> = CoordHash::new();
        let mut b: CoordHash<i32> = CoordHash::new();
        a.insert(Coord::new(0, 0), 1);
        b.insert(Coord::new(0, 0), 999);
        assert_eq!(a, b);
    }

    #[test]
    fn remove_and_contains() {
        let mut a: CoordHash<i32> = CoordHash::new();
        a.insert(Coord::new(1, 1), 5);
        assert!(a.contains(Coord::new(1, 1)));
        a.remove(Coord::new(1, 1));
        assert!(!a.contains(Coord::new(1, 1)));
    }
}
