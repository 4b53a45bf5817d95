use std::convert::TryFrom;
use std::fmt;

use crate::constants;

/// A heap-local address: a byte offset from the start of whichever region is
/// currently active. A `LocalPtr` is never nil; absence is `Option<LocalPtr>`.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct LocalPtr(u32);

impl LocalPtr {
    pub fn new(offset: usize) -> LocalPtr {
        debug_assert!(offset <= constants::MAX_REGION_SIZE);
        LocalPtr(offset as u32)
    }

    /// The byte offset from the active region's base
    pub fn offset(self) -> usize {
        self.0 as usize
    }

    /// Decode a pointer field value, mapping the nil sentinel to `None`
    pub fn from_raw(raw: i32) -> Option<LocalPtr> {
        u32::try_from(raw).ok().map(LocalPtr)
    }

    /// Encode an optional pointer as a pointer field value
    pub fn into_raw(ptr: Option<LocalPtr>) -> i32 {
        match ptr {
            Some(LocalPtr(offset)) => offset as i32,
            None => constants::NIL_PTR,
        }
    }
}

impl fmt::Display for LocalPtr {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn nil_roundtrip() {
        assert_eq!(LocalPtr::from_raw(constants::NIL_PTR), None);
        assert_eq!(LocalPtr::into_raw(None), -1);
    }

    #[test]
    fn offset_roundtrip() {
        let p = LocalPtr::new(44);
        assert_eq!(LocalPtr::from_raw(LocalPtr::into_raw(Some(p))), Some(p));
        assert_eq!(p.offset(), 44);
    }

    #[test]
    fn any_negative_is_nil() {
        assert_eq!(LocalPtr::from_raw(-20), None);
    }
}
