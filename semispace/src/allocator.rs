use blockalloc::BlockError;

use crate::object::ObjectType;

/// An allocation error type
#[derive(Copy, Clone, Debug, PartialEq)]
pub enum AllocError {
    /// Some attribute of the allocation, most likely the size requested,
    /// could not be fulfilled
    BadRequest,
    /// Out of memory - allocating the space failed
    OOM,
}

impl From<BlockError> for AllocError {
    fn from(error: BlockError) -> AllocError {
        match error {
            BlockError::BadRequest => AllocError::BadRequest,
            BlockError::OOM => AllocError::OOM,
        }
    }
}

/// All managed object types must implement this trait in order to be allocatable.
///
/// # Safety
///
/// Implementors must be `#[repr(C)]`, consist only of integer fields with no
/// implicit padding, and store `TYPE_ID.tag()` in their first byte. The heap
/// copies and inspects records as raw bytes relying on this.
pub unsafe trait AllocObject: Sized {
    const TYPE_ID: ObjectType;

    /// Construct a zero-initialized object with nil pointer fields
    fn new(id: u32) -> Self;
}
