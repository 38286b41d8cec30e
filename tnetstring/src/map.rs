//! String keyed maps which remember the order in which their keys were first inserted.
//!
//! Maps are encoded in insertion order. Equality and lookup however do not care about the order,
//! two maps are equal if they contain the same keys with equal values.

use crate::value::Value;
use std::borrow::Cow;
use std::collections::HashMap;
use std::iter::FromIterator;

#[derive(Debug, Clone, Default)]
pub struct Map<'a> {
    entries: Vec<(Cow<'a, str>, Value<'a>)>,
    /// Position of every key in `entries`
    index: HashMap<Cow<'a, str>, usize>,
}

impl<'a> Map<'a> {

    pub fn new() -> Self {
        Self { entries: Vec::new(), index: HashMap::new() }
    }

    pub fn with_capacity(capacity: usize) -> Self {
        Self { entries: Vec::with_capacity(capacity), index: HashMap::with_capacity(capacity) }
    }

    /// Inserts a value. If the key is already present, its value is replaced in place and the old
    /// value is returned; the key keeps its original position.
    pub fn insert<K: Into<Cow<'a, str>>, V: Into<Value<'a>>>(&mut self, key: K, value: V) -> Option<Value<'a>> {
        let key = key.into();
        let value = value.into();
        if let Some(&i) = self.index.get(&key) {
            return Some(std::mem::replace(&mut self.entries[i].1, value));
        }
        self.index.insert(key.clone(), self.entries.len());
        self.entries.push((key, value));
        None
    }

    pub fn get(&self, key: &str) -> Option<&Value<'a>> {
        self.index.get(key).map(|&i| &self.entries[i].1)
    }

    pub fn get_mut(&mut self, key: &str) -> Option<&mut Value<'a>> {
        let i = *self.index.get(key)?;
        Some(&mut self.entries[i].1)
    }

    pub fn contains_key(&self, key: &str) -> bool {
        self.index.contains_key(key)
    }

    /// Removes a key, the following entries move up one position.
    pub fn remove(&mut self, key: &str) -> Option<Value<'a>> {
        let i = self.index.remove(key)?;
        let (_, value) = self.entries.remove(i);
        for (k, _) in self.entries[i..].iter() {
            if let Some(pos) = self.index.get_mut(k) {
                *pos -= 1;
            }
        }
        Some(value)
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&Cow<'a, str>, &Value<'a>)> {
        self.entries.iter().map(|(k, v)| (k, v))
    }

    pub fn keys(&self) -> impl Iterator<Item = &Cow<'a, str>> {
        self.entries.iter().map(|(k, _)| k)
    }

    pub fn values(&self) -> impl Iterator<Item = &Value<'a>> {
        self.entries.iter().map(|(_, v)| v)
    }

    /// Copies all borrowed keys and values so that the map no longer depends on the input buffer
    pub fn into_owned(self) -> Map<'static> {
        self.entries.into_iter().map(|(k, v)| (Cow::<'static, str>::Owned(k.into_owned()), v.into_owned())).collect()
    }

}

impl<'a> PartialEq for Map<'a> {
    fn eq(&self, other: &Self) -> bool {
        self.len() == other.len() && self.iter().all(|(k, v)| other.get(k) == Some(v))
    }
}

impl<'a, K: Into<Cow<'a, str>>, V: Into<Value<'a>>> FromIterator<(K, V)> for Map<'a> {
    fn from_iter<I: IntoIterator<Item = (K, V)>>(iter: I) -> Self {
        let mut map = Map::new();
        map.extend(iter);
        map
    }
}

impl<'a, K: Into<Cow<'a, str>>, V: Into<Value<'a>>> Extend<(K, V)> for Map<'a> {
    fn extend<I: IntoIterator<Item = (K, V)>>(&mut self, iter: I) {
        for (k, v) in iter {
            self.insert(k, v);
        }
    }
}

impl<'a, K: Into<Cow<'a, str>>, V: Into<Value<'a>>, const N: usize> From<[(K, V); N]> for Map<'a> {
    fn from(entries: [(K, V); N]) -> Self {
        entries.into_iter().collect()
    }
}

impl<'a> IntoIterator for Map<'a> {
    type Item = (Cow<'a, str>, Value<'a>);
    type IntoIter = std::vec::IntoIter<(Cow<'a, str>, Value<'a>)>;

    fn into_iter(self) -> Self::IntoIter {
        self.entries.into_iter()
    }
}

#[cfg(test)]
mod tests {
    use super::Map;
    use crate::value::Value;

    #[test]
    fn insertion_order() {
        let map = Map::from([("cat", "meow"), ("dog", "bark"), ("cow", "moo")]);
        assert_eq!(vec!["cat", "dog", "cow"], map.keys().collect::<Vec<_>>());
    }

    #[test]
    fn replace_keeps_position() {
        let mut map = Map::from([("a", 1), ("b", 2)]);
        assert_eq!(Some(Value::Int(1)), map.insert("a", 3));
        assert_eq!(vec!["a", "b"], map.keys().collect::<Vec<_>>());
        assert_eq!(Some(&Value::Int(3)), map.get("a"));
        assert_eq!(2, map.len());
    }

    #[test]
    fn equality_ignores_order() {
        assert_eq!(Map::from([("a", 1), ("b", 2)]), Map::from([("b", 2), ("a", 1)]));
        assert_ne!(Map::from([("a", 1), ("b", 2)]), Map::from([("a", 1)]));
        assert_ne!(Map::from([("a", 1)]), Map::from([("a", 2)]));
    }

    #[test]
    fn remove() {
        let mut map = Map::from([("a", 1), ("b", 2)]);
        assert_eq!(Some(Value::Int(1)), map.remove("a"));
        assert_eq!(None, map.remove("a"));
        assert!(!map.contains_key("a"));
        assert!(map.contains_key("b"));
        let mut map = Map::from([("a", 1), ("b", 2), ("c", 3), ("d", 4)]);
        assert_eq!(Some(Value::Int(2)), map.remove("b"));
        assert_eq!(vec!["a", "c", "d"], map.keys().collect::<Vec<_>>());
        assert_eq!(Some(&Value::Int(4)), map.get("d"));
        assert_eq!(None, map.insert("b", 5));
        assert_eq!(Some(Value::Int(3)), map.insert("c", 6));
        assert_eq!(vec!["a", "c", "d", "b"], map.keys().collect::<Vec<_>>());
        assert_eq!(Some(&Value::Int(6)), map.get("c"));
    }

    #[test]
    fn lookup_by_borrowed_and_owned_keys() {
        let mut map = Map::new();
        map.insert(String::from("owned"), 1);
        map.insert("borrowed", 2);
        assert_eq!(Some(&Value::Int(1)), map.get("owned"));
        *map.get_mut("borrowed").unwrap() = Value::Null;
        assert_eq!(Some(&Value::Null), map.get("borrowed"));
        assert_eq!(None, map.get("missing"));
    }

}
