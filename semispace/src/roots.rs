/// Named entry points into the object graph
use std::collections::BTreeMap;

use crate::error::HeapError;
use crate::ptr::LocalPtr;

/// A mapping of root names to objects in the active region. Only bound roots
/// are stored: binding nil removes the entry.
#[derive(Debug, Default)]
pub struct RootSet {
    roots: BTreeMap<String, LocalPtr>,
}

impl RootSet {
    pub fn new() -> RootSet {
        RootSet {
            roots: BTreeMap::new(),
        }
    }

    /// Bind `name` to `ptr`, or unbind it if `ptr` is nil
    pub fn bind(&mut self, name: &str, ptr: Option<LocalPtr>) {
        match ptr {
            Some(ptr) => {
                self.roots.insert(String::from(name), ptr);
            }
            None => self.unbind(name),
        }
    }

    pub fn unbind(&mut self, name: &str) {
        self.roots.remove(name);
    }

    pub fn lookup(&self, name: &str) -> Result<LocalPtr, HeapError> {
        self.roots
            .get(name)
            .copied()
            .ok_or_else(|| HeapError::UnknownRoot(String::from(name)))
    }

    pub fn len(&self) -> usize {
        self.roots.len()
    }

    pub fn is_empty(&self) -> bool {
        self.roots.is_empty()
    }

    /// Iterate over bound roots in name order
    pub fn iter(&self) -> impl Iterator<Item = (&str, LocalPtr)> {
        self.roots.iter().map(|(name, ptr)| (name.as_str(), *ptr))
    }

    /// Replace every root's address with `relocate(address)`
    pub fn relocate<F>(&mut self, mut relocate: F)
    where
        F: FnMut(LocalPtr) -> LocalPtr,
    {
        for ptr in self.roots.values_mut() {
            *ptr = relocate(*ptr);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn bind_lookup() {
        let mut roots = RootSet::new();
        roots.bind("x", Some(LocalPtr::new(0)));
        roots.bind("y", Some(LocalPtr::new(20)));

        assert_eq!(roots.lookup("y"), Ok(LocalPtr::new(20)));
        assert_eq!(roots.len(), 2);
    }

    #[test]
    fn bind_nil_unbinds() {
        let mut roots = RootSet::new();
        roots.bind("x", Some(LocalPtr::new(0)));
        roots.bind("x", None);

        assert!(roots.is_empty());
        assert_eq!(roots.lookup("x"), Err(HeapError::UnknownRoot(String::from("x"))));
    }

    #[test]
    fn unbind_missing_is_noop() {
        let mut roots = RootSet::new();
        roots.unbind("nope");
        assert!(roots.is_empty());
    }

    #[test]
    fn relocate_all() {
        let mut roots = RootSet::new();
        roots.bind("a", Some(LocalPtr::new(40)));
        roots.bind("b", Some(LocalPtr::new(60)));

        roots.relocate(|p| LocalPtr::new(p.offset() - 40));

        let got: Vec<(&str, LocalPtr)> = roots.iter().collect();
        assert_eq!(got, vec![("a", LocalPtr::new(0)), ("b", LocalPtr::new(20))]);
    }
}
