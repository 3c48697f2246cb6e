use rustc_hash::FxHashMap;

use super::Value;

/// One lexical scope, chained to the scope that encloses it.
///
/// Lookups walk outward; writes only ever touch this scope. The borrow of
/// `outer` keeps the enclosing scope alive for as long as this one exists.
#[derive(Debug, Default)]
pub struct Environment<'a> {
    store: FxHashMap<String, Value>,
    outer: Option<&'a Environment<'a>>,
}

impl<'a> Environment<'a> {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn enclosed(outer: &'a Environment<'a>) -> Self {
        Self {
            store: FxHashMap::default(),
            outer: Some(outer),
        }
    }

    pub fn get(&self, name: &str) -> Option<&Value> {
        self.store
            .get(name)
            .or_else(|| self.outer.and_then(|outer| outer.get(name)))
    }

    /// Binds `name` in this scope and returns the bound value.
    pub fn set(&mut self, name: impl Into<String>, value: Value) -> Value {
        self.store.insert(name.into(), value.clone());
        value
    }
}
