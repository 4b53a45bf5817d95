use thiserror::Error;

use crate::allocator::AllocError;
use crate::object::ObjectType;
use crate::ptr::LocalPtr;

/// Errors reported by heap operations. None of them leave the heap in a
/// partially modified state.
#[derive(Debug, Error, PartialEq)]
pub enum HeapError {
    #[error("Out of memory")]
    OutOfMemory,

    #[error("Heap size must be positive and even, got {0}")]
    BadHeapSize(usize),

    #[error("An invalid memory size allocation was requested: {0} bytes")]
    BadRequest(usize),

    #[error("No such root: {0}")]
    UnknownRoot(String),

    #[error("No such field: {object}.{field}")]
    NoSuchField { object: ObjectType, field: String },

    #[error("Nil dereference at {0}")]
    NilDereference(String),

    #[error("Empty path")]
    EmptyPath,

    #[error("No object at address {0}")]
    BadAddress(LocalPtr),
}

impl HeapError {
    /// Convert an arena construction failure for a heap of `heap_size` bytes
    pub fn from_alloc(error: AllocError, heap_size: usize) -> HeapError {
        match error {
            AllocError::BadRequest => HeapError::BadHeapSize(heap_size),
            AllocError::OOM => HeapError::OutOfMemory,
        }
    }
}
