//! A fixed-size heap of small tagged objects, reclaimed by semispace copying
//! garbage collection.
//!
//! ```
//! use semispace::{Heap, HeapConfig, HeapReport, ObjectType, Path};
//!
//! let mut heap = Heap::with_inspector(HeapConfig::default(), Box::new(|_: &HeapReport| {})).unwrap();
//!
//! let x = heap.new_object(ObjectType::Alpha).unwrap();
//! heap.set(&"x".parse::<Path>().unwrap(), Some(x)).unwrap();
//! let y = heap.new_object(ObjectType::Beta).unwrap();
//! heap.set(&"x.c".parse::<Path>().unwrap(), Some(y)).unwrap();
//! heap.new_object(ObjectType::Gamma).unwrap();
//!
//! let report = heap.collect();
//! assert_eq!(report.ids(), vec![0, 1]);
//! ```

extern crate blockalloc;

mod allocator;
mod arena;
mod collect;
mod config;
mod constants;
mod error;
mod heap;
mod object;
mod path;
mod ptr;
mod report;
mod roots;

pub use allocator::{AllocError, AllocObject};

pub use arena::Region;

pub use collect::CollectStats;

pub use config::HeapConfig;

pub use constants::{DEFAULT_HEAP_SIZE, NIL_PTR};

pub use error::HeapError;

pub use heap::Heap;

pub use object::{Alpha, Beta, Gamma, ObjectType, PointerField, UnknownObjectType};

pub use path::Path;

pub use ptr::LocalPtr;

pub use report::{HeapDump, HeapReport, Inspector, ObjectInfo, PrintReport};

pub use roots::RootSet;
