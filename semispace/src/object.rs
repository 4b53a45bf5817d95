/// The fixed set of heap object shapes.
///
/// Every record is `#[repr(C)]`, starts with its one-byte type tag, and spells
/// out its padding as explicit fields so that every byte of a record is
/// initialized and may be copied or inspected as plain bytes.
use std::fmt;
use std::mem::{offset_of, size_of};
use std::str::FromStr;

use num_derive::FromPrimitive;
use num_traits::FromPrimitive;

use crate::allocator::AllocObject;
use crate::constants::NIL_PTR;

/// Type tag stored in the first byte of every object
#[repr(u8)]
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash, FromPrimitive)]
pub enum ObjectType {
    Alpha = 0,
    Beta = 1,
    Gamma = 2,
}

/// A named pointer field and its byte offset within the record
#[derive(Copy, Clone, Debug, PartialEq)]
pub struct PointerField {
    pub name: &'static str,
    pub offset: usize,
}

const ALPHA_POINTERS: [PointerField; 2] = [
    PointerField {
        name: "c",
        offset: offset_of!(Alpha, c),
    },
    PointerField {
        name: "d",
        offset: offset_of!(Alpha, d),
    },
];

const BETA_POINTERS: [PointerField; 2] = [
    PointerField {
        name: "c",
        offset: offset_of!(Beta, c),
    },
    PointerField {
        name: "f",
        offset: offset_of!(Beta, f),
    },
];

const GAMMA_POINTERS: [PointerField; 2] = [
    PointerField {
        name: "b",
        offset: offset_of!(Gamma, b),
    },
    PointerField {
        name: "c",
        offset: offset_of!(Gamma, c),
    },
];

/// Byte offset of the object id, common to all records
pub const ID_OFFSET: usize = 4;

impl ObjectType {
    pub const ALL: [ObjectType; 3] = [ObjectType::Alpha, ObjectType::Beta, ObjectType::Gamma];

    /// Decode a type tag byte
    pub fn from_tag(tag: u8) -> Option<ObjectType> {
        ObjectType::from_u8(tag)
    }

    pub fn tag(self) -> u8 {
        self as u8
    }

    /// Record size in bytes, which is also the allocation size
    pub fn size(self) -> usize {
        match self {
            ObjectType::Alpha => size_of::<Alpha>(),
            ObjectType::Beta => size_of::<Beta>(),
            ObjectType::Gamma => size_of::<Gamma>(),
        }
    }

    pub fn name(self) -> &'static str {
        match self {
            ObjectType::Alpha => "Alpha",
            ObjectType::Beta => "Beta",
            ObjectType::Gamma => "Gamma",
        }
    }

    /// The fields that hold heap pointers. Plain-data fields are not listed.
    pub fn pointer_fields(self) -> &'static [PointerField] {
        match self {
            ObjectType::Alpha => &ALPHA_POINTERS,
            ObjectType::Beta => &BETA_POINTERS,
            ObjectType::Gamma => &GAMMA_POINTERS,
        }
    }

    /// Look up a pointer field by name
    pub fn pointer_field(self, name: &str) -> Option<&'static PointerField> {
        self.pointer_fields().iter().find(|field| field.name == name)
    }
}

impl fmt::Display for ObjectType {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// Returned when parsing a name that isn't one of the object types
#[derive(Debug, PartialEq)]
pub struct UnknownObjectType(pub String);

impl FromStr for ObjectType {
    type Err = UnknownObjectType;

    fn from_str(name: &str) -> Result<ObjectType, UnknownObjectType> {
        ObjectType::ALL
            .iter()
            .copied()
            .find(|t| t.name() == name)
            .ok_or_else(|| UnknownObjectType(String::from(name)))
    }
}

#[repr(C)]
#[derive(Debug, Clone, PartialEq)]
pub struct Alpha {
    tag: u8,
    _pad0: [u8; 3],
    pub id: u32,
    pub a: u8,
    pub b: u8,
    _pad1: [u8; 2],
    pub c: i32,
    pub d: i32,
}

#[repr(C)]
#[derive(Debug, Clone, PartialEq)]
pub struct Beta {
    tag: u8,
    _pad0: [u8; 3],
    pub id: u32,
    pub a: u8,
    pub b: u8,
    _pad1: [u8; 2],
    pub c: i32,
    pub d: u8,
    pub e: u8,
    _pad2: [u8; 2],
    pub f: i32,
}

#[repr(C)]
#[derive(Debug, Clone, PartialEq)]
pub struct Gamma {
    tag: u8,
    _pad0: [u8; 3],
    pub id: u32,
    pub a: u8,
    _pad1: [u8; 3],
    pub b: i32,
    pub c: i32,
}

// Safety: each record is repr(C), made only of integers, and every padding
// byte is an explicit field.
unsafe impl AllocObject for Alpha {
    const TYPE_ID: ObjectType = ObjectType::Alpha;

    fn new(id: u32) -> Alpha {
        Alpha {
            tag: Self::TYPE_ID.tag(),
            _pad0: [0; 3],
            id,
            a: 0,
            b: 0,
            _pad1: [0; 2],
            c: NIL_PTR,
            d: NIL_PTR,
        }
    }
}

unsafe impl AllocObject for Beta {
    const TYPE_ID: ObjectType = ObjectType::Beta;

    fn new(id: u32) -> Beta {
        Beta {
            tag: Self::TYPE_ID.tag(),
            _pad0: [0; 3],
            id,
            a: 0,
            b: 0,
            _pad1: [0; 2],
            c: NIL_PTR,
            d: 0,
            e: 0,
            _pad2: [0; 2],
            f: NIL_PTR,
        }
    }
}

unsafe impl AllocObject for Gamma {
    const TYPE_ID: ObjectType = ObjectType::Gamma;

    fn new(id: u32) -> Gamma {
        Gamma {
            tag: Self::TYPE_ID.tag(),
            _pad0: [0; 3],
            id,
            a: 0,
            _pad1: [0; 3],
            b: NIL_PTR,
            c: NIL_PTR,
        }
    }
}
