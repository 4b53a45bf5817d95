/// A block allocator for zero-filled blocks of memory that must be:
///  - a non-zero number of bytes in size
///  - aligned to `BLOCK_ALIGN`
///
/// Internally this calls the stabilized std Alloc API.
/// https://doc.rust-lang.org/std/alloc/index.html
///
/// Usage:
/// ```
/// extern crate blockalloc;
/// use blockalloc::Block;
///
/// let size = 200;
/// let block = Block::new(size).unwrap();
/// assert!(block.as_slice().iter().all(|b| *b == 0));
/// ```
///
/// Normal scoping rules will call Block::drop() when `block` goes out of scope
/// causing the block to be fully deallocated.
use std::ptr::NonNull;
use std::slice;

pub type BlockPtr = NonNull<u8>;
pub type BlockSize = usize;

/// Every block starts on a boundary of this many bytes
pub const BLOCK_ALIGN: usize = 8;

/// Set of possible block allocation failures
#[derive(Debug, PartialEq)]
pub enum BlockError {
    /// Usually means the requested block size was zero or too large to
    /// describe as a memory layout
    BadRequest,
    /// Insufficient memory, couldn't allocate a block
    OOM,
}

/// A zero-filled block of memory
pub struct Block {
    ptr: BlockPtr,
    size: BlockSize,
}

impl Block {
    /// Instantiate a new block of the given size. Size must be non-zero.
    pub fn new(size: BlockSize) -> Result<Block, BlockError> {
        if size == 0 {
            return Err(BlockError::BadRequest);
        }

        Ok(Block {
            ptr: internal::alloc_block(size)?,
            size,
        })
    }

    /// Return the size in bytes of the block
    pub fn size(&self) -> BlockSize {
        self.size
    }

    /// Return a bare mutable pointer to the base of the block
    pub fn as_mut_ptr(&mut self) -> *mut u8 {
        self.ptr.as_ptr()
    }

    /// View the whole block as bytes
    pub fn as_slice(&self) -> &[u8] {
        // The block was allocated zero-filled, so every byte is initialized.
        unsafe { slice::from_raw_parts(self.ptr.as_ptr(), self.size) }
    }

    /// View the whole block as mutable bytes
    pub fn as_mut_slice(&mut self) -> &mut [u8] {
        unsafe { slice::from_raw_parts_mut(self.ptr.as_ptr(), self.size) }
    }
}

impl Drop for Block {
    fn drop(&mut self) {
        internal::dealloc_block(self.ptr, self.size);
    }
}

mod internal {
    use super::{BlockError, BlockPtr, BlockSize, BLOCK_ALIGN};
    use std::alloc::{alloc_zeroed, dealloc, Layout};
    use std::ptr::NonNull;

    fn layout(size: BlockSize) -> Result<Layout, BlockError> {
        Layout::from_size_align(size, BLOCK_ALIGN).map_err(|_| BlockError::BadRequest)
    }

    pub fn alloc_block(size: BlockSize) -> Result<BlockPtr, BlockError> {
        let layout = layout(size)?;

        unsafe {
            let ptr = alloc_zeroed(layout);
            if ptr.is_null() {
                Err(BlockError::OOM)
            } else {
                Ok(NonNull::new_unchecked(ptr))
            }
        }
    }

    pub fn dealloc_block(ptr: BlockPtr, size: BlockSize) {
        // the layout was validated when the block was allocated
        unsafe {
            let layout = Layout::from_size_align_unchecked(size, BLOCK_ALIGN);

            dealloc(ptr.as_ptr(), layout);
        }
    }
}

#[cfg(test)]
mod tests {

    use crate::{Block, BlockError, BlockSize, BLOCK_ALIGN};

    fn alloc_dealloc(size: BlockSize) -> Result<(), BlockError> {
        let block = Block::new(size)?;

        // the block address bitwise AND the alignment bits should be zero
        let mask = BLOCK_ALIGN - 1;
        assert!(block.ptr.as_ptr() as usize & mask == 0);

        drop(block);
        Ok(())
    }

    #[test]
    fn test_zero_size() {
        assert!(alloc_dealloc(0) == Err(BlockError::BadRequest))
    }

    #[test]
    fn test_huge_size() {
        assert!(alloc_dealloc(usize::MAX) == Err(BlockError::BadRequest))
    }

    #[test]
    fn test_200() {
        assert!(alloc_dealloc(200).is_ok())
    }

    #[test]
    fn test_odd_size() {
        assert!(alloc_dealloc(999).is_ok())
    }

    #[test]
    fn test_32k() {
        assert!(alloc_dealloc(32768).is_ok())
    }

    #[test]
    fn test_zero_filled() {
        let block = Block::new(4096).unwrap();
        assert!(block.as_slice().iter().all(|b| *b == 0));
    }

    #[test]
    fn test_write_read() {
        let mut block = Block::new(64).unwrap();
        block.as_mut_slice()[63] = 7;
        assert_eq!(block.as_slice()[63], 7);
        assert_eq!(block.size(), 64);
    }
}
