/// Dotted paths from a root through pointer fields, e.g. `x.c.f`
use std::fmt;
use std::str::FromStr;

use crate::arena::Arena;
use crate::error::HeapError;
use crate::object::ObjectType;
use crate::ptr::LocalPtr;
use crate::roots::RootSet;

/// A root name followed by zero or more pointer field names
#[derive(Clone, Debug, PartialEq)]
pub struct Path {
    segments: Vec<String>,
}

impl Path {
    pub fn new<S: Into<String>>(segments: Vec<S>) -> Result<Path, HeapError> {
        let segments: Vec<String> = segments.into_iter().map(Into::into).collect();
        if segments.is_empty() {
            return Err(HeapError::EmptyPath);
        }
        Ok(Path { segments })
    }

    pub fn root(&self) -> &str {
        &self.segments[0]
    }

    pub fn fields(&self) -> &[String] {
        &self.segments[1..]
    }

    /// True if the path names only a root
    pub fn is_root(&self) -> bool {
        self.segments.len() == 1
    }
}

impl FromStr for Path {
    type Err = HeapError;

    fn from_str(s: &str) -> Result<Path, HeapError> {
        if s.is_empty() {
            return Err(HeapError::EmptyPath);
        }
        Path::new(s.split('.').collect::<Vec<&str>>())
    }
}

impl fmt::Display for Path {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "{}", self.segments.join("."))
    }
}

/// The location a path resolves to
#[derive(Clone, Debug, PartialEq)]
pub enum Slot<'path> {
    /// The root binding itself
    Root(&'path str),
    /// A pointer field inside an object in the active region
    Field {
        object: LocalPtr,
        object_type: ObjectType,
        offset: usize,
    },
}

/// Walk `path` from its root one field at a time, validating each field name
/// against the type of the object it is looked up on.
pub fn resolve<'path>(
    roots: &RootSet,
    arena: &Arena,
    path: &'path Path,
) -> Result<Slot<'path>, HeapError> {
    if path.is_root() {
        return Ok(Slot::Root(path.root()));
    }

    let mut current = Some(roots.lookup(path.root())?);
    let mut slot = None;

    for (depth, name) in path.fields().iter().enumerate() {
        let object = match current {
            Some(object) => object,
            None => {
                let walked = &path.segments[..depth + 1];
                return Err(HeapError::NilDereference(walked.join(".")));
            }
        };

        let object_type = arena.type_at(object).ok_or(HeapError::BadAddress(object))?;
        let field = object_type
            .pointer_field(name)
            .ok_or_else(|| HeapError::NoSuchField {
                object: object_type,
                field: name.clone(),
            })?;

        current = arena.read_ptr(object, field.offset);
        slot = Some(Slot::Field {
            object,
            object_type,
            offset: field.offset,
        });
    }

    // a path with at least one field always produces a slot
    slot.ok_or(HeapError::EmptyPath)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::object::{Alpha, Beta, Gamma};
    use crate::allocator::AllocObject;

    fn alloc<T: AllocObject>(arena: &mut Arena, id: u32) -> LocalPtr {
        let ptr = arena.inner_alloc(T::TYPE_ID.size()).unwrap();
        arena.write(ptr, T::new(id));
        ptr
    }

    // x: Alpha, x.c: Beta, x.c.f: Gamma
    fn fixture() -> (RootSet, Arena) {
        let mut arena = Arena::new(200).unwrap();
        let x = alloc::<Alpha>(&mut arena, 0);
        let bar = alloc::<Beta>(&mut arena, 1);
        let baz = alloc::<Gamma>(&mut arena, 2);

        arena.write_ptr(x, 12, Some(bar));
        arena.write_ptr(bar, 20, Some(baz));

        let mut roots = RootSet::new();
        roots.bind("x", Some(x));
        (roots, arena)
    }

    #[test]
    fn parse_paths() {
        let path: Path = "x.c.f".parse().unwrap();
        assert_eq!(path.root(), "x");
        assert_eq!(path.fields(), &[String::from("c"), String::from("f")]);
        assert_eq!(path.to_string(), "x.c.f");
        assert_eq!("".parse::<Path>(), Err(HeapError::EmptyPath));
    }

    #[test]
    fn resolve_root() {
        let (roots, arena) = fixture();
        let path: Path = "anything".parse().unwrap();
        assert_eq!(resolve(&roots, &arena, &path), Ok(Slot::Root("anything")));
    }

    #[test]
    fn resolve_nested() {
        let (roots, arena) = fixture();
        let path: Path = "x.c.f".parse().unwrap();
        assert_eq!(
            resolve(&roots, &arena, &path),
            Ok(Slot::Field {
                object: LocalPtr::new(20),
                object_type: ObjectType::Beta,
                offset: 20,
            })
        );
    }

    #[test]
    fn unknown_root() {
        let (roots, arena) = fixture();
        let path: Path = "y.c".parse().unwrap();
        assert_eq!(
            resolve(&roots, &arena, &path),
            Err(HeapError::UnknownRoot(String::from("y")))
        );
    }

    #[test]
    fn data_field_not_addressable() {
        let (roots, arena) = fixture();
        let path: Path = "x.c.d".parse().unwrap();
        assert_eq!(
            resolve(&roots, &arena, &path),
            Err(HeapError::NoSuchField {
                object: ObjectType::Beta,
                field: String::from("d"),
            })
        );
    }

    #[test]
    fn nil_mid_path() {
        let (roots, arena) = fixture();
        let path: Path = "x.d.c".parse().unwrap();
        assert_eq!(
            resolve(&roots, &arena, &path),
            Err(HeapError::NilDereference(String::from("x.d")))
        );
    }
}
