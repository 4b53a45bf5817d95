use crate::allocator::AllocObject;
use crate::arena::Arena;
use crate::collect::{self, CollectStats};
use crate::config::HeapConfig;
use crate::error::HeapError;
use crate::object::{Alpha, Beta, Gamma, ObjectType};
use crate::path::{self, Path, Slot};
use crate::ptr::LocalPtr;
use crate::report::{HeapDump, HeapReport, Inspector, ObjectInfo, PrintReport};
use crate::roots::RootSet;

/// A fixed-size heap of tagged objects reclaimed by semispace copying
/// collection.
///
/// Objects are addressed by `LocalPtr` offsets into the active region.
/// Any allocation may trigger a collection, which moves every surviving
/// object, so a `LocalPtr` held outside the heap is only good until the next
/// allocation. Keep long-lived references in the root set.
pub struct Heap {
    arena: Arena,
    roots: RootSet,
    next_id: u32,
    inspector: Box<dyn Inspector>,
    last_collection: Option<CollectStats>,
}

impl Heap {
    /// Create a heap that prints the live object report to stdout after each
    /// collection.
    pub fn new(config: HeapConfig) -> Result<Heap, HeapError> {
        Heap::with_inspector(config, Box::new(PrintReport))
    }

    /// Create a heap that hands the report of each collection to `inspector`
    pub fn with_inspector(
        config: HeapConfig,
        inspector: Box<dyn Inspector>,
    ) -> Result<Heap, HeapError> {
        let heap_size = config.heap_size();
        let arena = Arena::new(heap_size).map_err(|e| HeapError::from_alloc(e, heap_size))?;

        log::debug!(
            "heap of {} bytes, {} bytes per region",
            heap_size,
            arena.region_size()
        );

        Ok(Heap {
            arena,
            roots: RootSet::new(),
            next_id: 0,
            inspector,
            last_collection: None,
        })
    }

    /// Reserve `size` bytes in the active region and return their address.
    ///
    /// If the region is full, collect once and retry. Fails with
    /// `OutOfMemory` if the space still isn't there.
    pub fn allocate(&mut self, size: usize) -> Result<LocalPtr, HeapError> {
        if size == 0 {
            return Err(HeapError::BadRequest(size));
        }

        if let Some(ptr) = self.arena.inner_alloc(size) {
            return Ok(ptr);
        }

        log::debug!(
            "{} bytes requested with {} of {} in use, collecting",
            size,
            self.arena.bump(),
            self.arena.region_size()
        );
        self.collect();

        self.arena.inner_alloc(size).ok_or_else(|| {
            log::debug!("out of memory allocating {} bytes", size);
            HeapError::OutOfMemory
        })
    }

    /// Allocate and initialize an object of type T, assigning it the next id
    fn alloc<T: AllocObject>(&mut self) -> Result<LocalPtr, HeapError> {
        let ptr = self.allocate(T::TYPE_ID.size())?;

        let id = self.next_id;
        self.next_id = self.next_id.wrapping_add(1);

        self.arena.write(ptr, T::new(id));
        Ok(ptr)
    }

    /// Allocate a new object with nil pointer fields and return its address
    pub fn new_object(&mut self, object_type: ObjectType) -> Result<LocalPtr, HeapError> {
        match object_type {
            ObjectType::Alpha => self.alloc::<Alpha>(),
            ObjectType::Beta => self.alloc::<Beta>(),
            ObjectType::Gamma => self.alloc::<Gamma>(),
        }
    }

    /// Read the pointer a path leads to. A single segment path reads the root
    /// binding, which must exist.
    pub fn get(&self, path: &Path) -> Result<Option<LocalPtr>, HeapError> {
        match path::resolve(&self.roots, &self.arena, path)? {
            Slot::Root(name) => self.roots.lookup(name).map(Some),
            Slot::Field { object, offset, .. } => Ok(self.arena.read_ptr(object, offset)),
        }
    }

    /// Store `value` at the end of a path. A single segment path binds the
    /// root, or unbinds it if `value` is nil.
    pub fn set(&mut self, path: &Path, value: Option<LocalPtr>) -> Result<(), HeapError> {
        if let Some(ptr) = value {
            self.check_address(ptr)?;
        }

        match path::resolve(&self.roots, &self.arena, path)? {
            Slot::Root(name) => self.roots.bind(name, value),
            Slot::Field { object, offset, .. } => self.arena.write_ptr(object, offset, value),
        }
        Ok(())
    }

    /// Fail unless `ptr` is the start of an object in the active region
    fn check_address(&self, ptr: LocalPtr) -> Result<ObjectType, HeapError> {
        self.arena.object_at(ptr).ok_or(HeapError::BadAddress(ptr))
    }

    /// The type of the object at `ptr` in the active region
    pub fn type_of(&self, ptr: LocalPtr) -> Result<ObjectType, HeapError> {
        self.check_address(ptr)
    }

    /// Id, type and pointer fields of the object at `ptr`
    pub fn object(&self, ptr: LocalPtr) -> Result<ObjectInfo, HeapError> {
        self.check_address(ptr)?;
        ObjectInfo::read(&self.arena, ptr).ok_or(HeapError::BadAddress(ptr))
    }

    /// Run a full collection. The report of surviving objects is passed to
    /// the inspector and returned.
    pub fn collect(&mut self) -> HeapReport {
        log::debug!(
            "collection start: {} bytes in use, {} roots",
            self.arena.bump(),
            self.roots.len()
        );

        let stats = collect::collect(&mut self.arena, &mut self.roots);

        log::debug!(
            "collection end: {} -> {} bytes, {} objects survived",
            stats.bytes_before,
            stats.bytes_after,
            stats.objects_copied
        );
        self.last_collection = Some(stats);

        let report = self.report();
        self.inspector.inspect(&report);
        report
    }

    /// The objects resident in the active region, by increasing id
    pub fn report(&self) -> HeapReport {
        HeapReport::new(&self.arena)
    }

    /// Write the report to stdout
    pub fn print(&self) {
        print!("{}", self.report());
    }

    /// A detailed snapshot of regions, roots and objects
    pub fn dump(&self) -> HeapDump {
        HeapDump::new(&self.arena, &self.roots)
    }

    pub fn roots(&self) -> &RootSet {
        &self.roots
    }

    /// Bytes in use in the active region
    pub fn used(&self) -> usize {
        self.arena.bump()
    }

    /// Numbers from the most recent collection, if any has run
    pub fn last_collection(&self) -> Option<CollectStats> {
        self.last_collection
    }
}
