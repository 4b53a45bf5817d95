use std::mem::size_of;
use std::ptr::write_unaligned;

use blockalloc::Block;

use crate::allocator::{AllocError, AllocObject};
use crate::constants;
use crate::object::{ObjectType, ID_OFFSET};
use crate::ptr::LocalPtr;

/// One half of the arena
#[derive(Copy, Clone, Debug, PartialEq)]
pub enum Region {
    A,
    B,
}

impl Region {
    pub fn other(self) -> Region {
        match self {
            Region::A => Region::B,
            Region::B => Region::A,
        }
    }
}

/// A single block of memory split into two equal regions. The active region
/// holds the object graph and is bump-allocated into; the reserve region is
/// scratch space that the collector copies survivors into before the two
/// swap roles.
///
/// All addresses handed in and out are `LocalPtr` offsets relative to a
/// region's base, never absolute positions in the block.
pub struct Arena {
    block: Block,
    region_size: usize,
    active: Region,
    bump: usize,
}

impl Arena {
    /// Allocate the backing block. The total size must be positive and even.
    pub fn new(heap_size: usize) -> Result<Arena, AllocError> {
        if heap_size == 0 || heap_size % 2 != 0 {
            return Err(AllocError::BadRequest);
        }

        let region_size = heap_size / 2;
        if region_size > constants::MAX_REGION_SIZE {
            return Err(AllocError::BadRequest);
        }

        Ok(Arena {
            block: Block::new(heap_size)?,
            region_size,
            active: Region::A,
            bump: 0,
        })
    }

    /// The capacity of each region, i.e. half the arena
    pub fn region_size(&self) -> usize {
        self.region_size
    }

    /// Bytes in use in the active region
    pub fn bump(&self) -> usize {
        self.bump
    }

    pub fn active(&self) -> Region {
        self.active
    }

    fn base(&self, region: Region) -> usize {
        match region {
            Region::A => 0,
            Region::B => self.region_size,
        }
    }

    /// Reserve `alloc_size` bytes at the bump offset, or None if the active
    /// region can't hold them. Nothing is written.
    pub fn inner_alloc(&mut self, alloc_size: usize) -> Option<LocalPtr> {
        let next_bump = self.bump.checked_add(alloc_size)?;

        if next_bump > self.region_size {
            None
        } else {
            let offset = self.bump;
            self.bump = next_bump;
            Some(LocalPtr::new(offset))
        }
    }

    /// Write an object into the active region at a previously reserved address.
    pub fn write<T: AllocObject>(&mut self, at: LocalPtr, object: T) {
        let start = self.base(self.active) + at.offset();
        assert!(
            at.offset() + size_of::<T>() <= self.bump,
            "object write outside the allocated part of the active region"
        );

        // The bounds were checked above and AllocObject guarantees a plain
        // byte layout, so an unaligned write of the whole record is sound.
        unsafe {
            let p = self.block.as_mut_ptr().add(start) as *mut T;
            write_unaligned(p, object);
        }
    }

    fn read_u32(&self, region: Region, offset: usize) -> u32 {
        let start = self.base(region) + offset;
        let mut raw = [0u8; 4];
        raw.copy_from_slice(&self.block.as_slice()[start..start + 4]);
        u32::from_ne_bytes(raw)
    }

    fn read_i32(&self, region: Region, offset: usize) -> i32 {
        let start = self.base(region) + offset;
        let mut raw = [0u8; constants::PTR_SIZE];
        raw.copy_from_slice(&self.block.as_slice()[start..start + constants::PTR_SIZE]);
        i32::from_ne_bytes(raw)
    }

    fn write_i32(&mut self, region: Region, offset: usize, value: i32) {
        let start = self.base(region) + offset;
        self.block.as_mut_slice()[start..start + constants::PTR_SIZE]
            .copy_from_slice(&value.to_ne_bytes());
    }

    fn tag_in(&self, region: Region, at: LocalPtr) -> Option<ObjectType> {
        ObjectType::from_tag(self.block.as_slice()[self.base(region) + at.offset()])
    }

    /// Read the type tag of the object at `at` in the active region. Returns
    /// None if `at` lies beyond the bump offset or holds no valid tag.
    pub fn type_at(&self, at: LocalPtr) -> Option<ObjectType> {
        if at.offset() >= self.bump {
            return None;
        }
        self.tag_in(self.active, at)
    }

    /// The type of the object starting exactly at `at`. Walks the records of
    /// the active region from its base, so an address inside a record, or
    /// past the bump offset, is None.
    pub fn object_at(&self, at: LocalPtr) -> Option<ObjectType> {
        let mut position = 0;

        while position < self.bump {
            let object_type = self.tag_in(self.active, LocalPtr::new(position))?;
            let end = position + object_type.size();

            if position == at.offset() {
                return if end <= self.bump {
                    Some(object_type)
                } else {
                    None
                };
            }
            if position > at.offset() {
                return None;
            }
            position = end;
        }

        None
    }

    /// Read the id of the object at `at` in the active region
    pub fn id_at(&self, at: LocalPtr) -> u32 {
        self.read_u32(self.active, at.offset() + ID_OFFSET)
    }

    /// Read the pointer field at `field_offset` of the object at `at`
    pub fn read_ptr(&self, at: LocalPtr, field_offset: usize) -> Option<LocalPtr> {
        LocalPtr::from_raw(self.read_i32(self.active, at.offset() + field_offset))
    }

    /// Overwrite the pointer field at `field_offset` of the object at `at`
    pub fn write_ptr(&mut self, at: LocalPtr, field_offset: usize, value: Option<LocalPtr>) {
        self.write_i32(
            self.active,
            at.offset() + field_offset,
            LocalPtr::into_raw(value),
        );
    }

    /// Copy `size` bytes verbatim from `from` in the active region to `to` in
    /// the reserve region.
    pub fn copy_to_reserve(&mut self, from: LocalPtr, to: LocalPtr, size: usize) {
        assert!(to.offset() + size <= self.region_size, "reserve region overflow");

        let src = self.base(self.active) + from.offset();
        let dest = self.base(self.active.other()) + to.offset();
        self.block.as_mut_slice().copy_within(src..src + size, dest);
    }

    /// Type tag of a copy sitting in the reserve region
    pub fn reserve_type_at(&self, at: LocalPtr) -> Option<ObjectType> {
        self.tag_in(self.active.other(), at)
    }

    pub fn read_reserve_ptr(&self, at: LocalPtr, field_offset: usize) -> Option<LocalPtr> {
        LocalPtr::from_raw(self.read_i32(self.active.other(), at.offset() + field_offset))
    }

    pub fn write_reserve_ptr(&mut self, at: LocalPtr, field_offset: usize, value: Option<LocalPtr>) {
        self.write_i32(
            self.active.other(),
            at.offset() + field_offset,
            LocalPtr::into_raw(value),
        );
    }

    /// Make the reserve region active with `bump` bytes in use
    pub fn flip(&mut self, bump: usize) {
        debug_assert!(bump <= self.region_size);
        self.active = self.active.other();
        self.bump = bump;
    }
}
