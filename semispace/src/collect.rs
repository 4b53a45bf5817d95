/// Semispace copying collection.
///
/// Survivors are found by tracing from the root set and copied, bytes
/// verbatim, into the reserve region. A forwarding table maps each old
/// address to its copy; it is what stops shared objects and cycles from being
/// copied twice. Once everything reachable has been copied, the pointer
/// fields of the copies and the roots are rewritten through the table and the
/// regions swap roles.
use fnv::FnvHashMap;

use crate::arena::Arena;
use crate::object::ObjectType;
use crate::ptr::LocalPtr;
use crate::roots::RootSet;

/// Old address -> new address for a single collection
#[derive(Debug, Default)]
pub struct ForwardingTable {
    map: FnvHashMap<LocalPtr, LocalPtr>,
}

impl ForwardingTable {
    pub fn new() -> ForwardingTable {
        ForwardingTable {
            map: FnvHashMap::default(),
        }
    }

    pub fn is_forwarded(&self, old: LocalPtr) -> bool {
        self.map.contains_key(&old)
    }

    pub fn insert(&mut self, old: LocalPtr, new: LocalPtr) {
        self.map.insert(old, new);
    }

    /// The new address of a copied object.
    ///
    /// # Panics
    ///
    /// Every pointer reachable from a root is copied before anything is
    /// rewritten, so a missing entry means the object graph was corrupt.
    pub fn forward(&self, old: LocalPtr) -> LocalPtr {
        debug_assert!(self.is_forwarded(old), "pointer to {} was never copied", old);
        *self
            .map
            .get(&old)
            .expect("every reachable object is copied before pointers are rewritten")
    }

    pub fn len(&self) -> usize {
        self.map.len()
    }

    /// Addresses of the copies in the reserve region
    pub fn copies(&self) -> impl Iterator<Item = LocalPtr> + '_ {
        self.map.values().copied()
    }
}

/// Numbers describing one collection
#[derive(Copy, Clone, Debug, Default, PartialEq)]
pub struct CollectStats {
    pub bytes_before: usize,
    pub bytes_after: usize,
    pub objects_copied: usize,
}

/// Copy one object into the reserve region at `fill` and record where it went.
fn evacuate(
    arena: &mut Arena,
    forwarding: &mut ForwardingTable,
    old: LocalPtr,
    fill: usize,
) -> ObjectType {
    debug_assert!(
        arena.object_at(old).is_some(),
        "live pointer {} does not address an object",
        old
    );
    let object_type = arena
        .type_at(old)
        .expect("roots and pointer fields only hold object addresses");
    let size = object_type.size();
    let new = LocalPtr::new(fill);

    arena.copy_to_reserve(old, new, size);
    forwarding.insert(old, new);

    log::trace!("copied {} #{} {} -> {}", object_type, arena.id_at(old), old, new);

    object_type
}

/// Copy everything reachable from `roots` into the reserve region, rewrite
/// all pointers to the new addresses and make the reserve region active.
pub fn collect(arena: &mut Arena, roots: &mut RootSet) -> CollectStats {
    let bytes_before = arena.bump();
    let mut forwarding = ForwardingTable::new();
    let mut fill = 0;

    // objects copied but whose children have not been visited yet
    let mut grey: Vec<LocalPtr> = Vec::new();

    for (_, root) in roots.iter() {
        grey.push(root);

        while let Some(old) = grey.pop() {
            if forwarding.is_forwarded(old) {
                continue;
            }

            let object_type = evacuate(arena, &mut forwarding, old, fill);
            fill += object_type.size();

            for field in object_type.pointer_fields().iter().rev() {
                if let Some(child) = arena.read_ptr(old, field.offset) {
                    if !forwarding.is_forwarded(child) {
                        grey.push(child);
                    }
                }
            }
        }
    }

    // Every reachable object has been copied. Rewrite the pointer fields of
    // the copies from old addresses to new ones.
    for new in forwarding.copies() {
        let object_type = arena
            .reserve_type_at(new)
            .expect("copies keep the type tag of their original");

        for field in object_type.pointer_fields() {
            if let Some(target) = arena.read_reserve_ptr(new, field.offset) {
                arena.write_reserve_ptr(new, field.offset, Some(forwarding.forward(target)));
            }
        }
    }

    roots.relocate(|old| {
        let new = forwarding.forward(old);
        log::trace!("root {} -> {}", old, new);
        new
    });

    arena.flip(fill);

    CollectStats {
        bytes_before,
        bytes_after: fill,
        objects_copied: forwarding.len(),
    }
}
