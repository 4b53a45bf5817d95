/// The in-memory encoding of a nil pointer field. Local addresses are never
/// negative so this can't collide with a real object.
pub const NIL_PTR: i32 = -1;

/// Size of a pointer field in bytes
pub const PTR_SIZE: usize = 4;

/// Arena size used when none is configured
pub const DEFAULT_HEAP_SIZE: usize = 200;

/// Local addresses are stored in 32 bit signed pointer fields, so a region can
/// never be larger than this.
pub const MAX_REGION_SIZE: usize = i32::MAX as usize;
