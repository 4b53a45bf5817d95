/// Read-only views of the active region: the live object listing printed
/// after every collection, and a more detailed dump for debugging.
use std::collections::BTreeMap;
use std::fmt;

use itertools::join;

use crate::arena::{Arena, Region};
use crate::object::ObjectType;
use crate::ptr::LocalPtr;
use crate::roots::RootSet;

/// One object resident in the active region
#[derive(Clone, Debug, PartialEq)]
pub struct ObjectInfo {
    pub address: LocalPtr,
    pub id: u32,
    pub object_type: ObjectType,
    pub fields: Vec<(&'static str, Option<LocalPtr>)>,
}

impl ObjectInfo {
    /// Read the object at `address`, or None if nothing valid lives there
    pub fn read(arena: &Arena, address: LocalPtr) -> Option<ObjectInfo> {
        let object_type = arena.type_at(address)?;

        let fields = object_type
            .pointer_fields()
            .iter()
            .map(|field| (field.name, arena.read_ptr(address, field.offset)))
            .collect();

        Some(ObjectInfo {
            address,
            id: arena.id_at(address),
            object_type,
            fields,
        })
    }

    /// The value of a named pointer field
    pub fn field(&self, name: &str) -> Option<LocalPtr> {
        self.fields
            .iter()
            .find(|(field, _)| *field == name)
            .and_then(|(_, value)| *value)
    }
}

/// Walk the active region from its start up to the bump offset, one record
/// at a time, sizing each record by its type tag.
pub fn scan(arena: &Arena) -> Vec<ObjectInfo> {
    let mut objects = Vec::new();
    let mut position = 0;

    while position < arena.bump() {
        match ObjectInfo::read(arena, LocalPtr::new(position)) {
            Some(info) => {
                position += info.object_type.size();
                objects.push(info);
            }
            None => {
                log::error!("invalid type tag at offset {}, heap scan stopped", position);
                break;
            }
        }
    }

    objects
}

/// The live objects of the active region, ordered by id. Ids wrap, so two
/// residents may share one; address breaks the tie.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct HeapReport {
    objects: BTreeMap<(u32, LocalPtr), ObjectType>,
}

impl HeapReport {
    pub fn new(arena: &Arena) -> HeapReport {
        HeapReport {
            objects: scan(arena)
                .into_iter()
                .map(|info| ((info.id, info.address), info.object_type))
                .collect(),
        }
    }

    /// (id, type) pairs in increasing id order
    pub fn objects(&self) -> impl Iterator<Item = (u32, ObjectType)> + '_ {
        self.objects.iter().map(|((id, _), t)| (*id, *t))
    }

    pub fn ids(&self) -> Vec<u32> {
        self.objects.keys().map(|(id, _)| *id).collect()
    }

    pub fn len(&self) -> usize {
        self.objects.len()
    }
}

impl fmt::Display for HeapReport {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        writeln!(f, "Objects in from-space:")?;
        for (id, object_type) in self.objects() {
            writeln!(f, " - {}:{}", id, object_type)?;
        }
        Ok(())
    }
}

/// Receives the report produced at the end of every collection
pub trait Inspector {
    fn inspect(&mut self, report: &HeapReport);
}

/// Prints each report to stdout
pub struct PrintReport;

impl Inspector for PrintReport {
    fn inspect(&mut self, report: &HeapReport) {
        print!("{}", report);
    }
}

impl<F> Inspector for F
where
    F: FnMut(&HeapReport),
{
    fn inspect(&mut self, report: &HeapReport) {
        self(report)
    }
}

/// A detailed snapshot of the heap for debugging: region, bump offset, roots
/// and every resident object with its pointer fields.
#[derive(Clone, Debug)]
pub struct HeapDump {
    active: Region,
    bump: usize,
    region_size: usize,
    roots: Vec<(String, LocalPtr)>,
    objects: Vec<ObjectInfo>,
}

impl HeapDump {
    pub fn new(arena: &Arena, roots: &RootSet) -> HeapDump {
        HeapDump {
            active: arena.active(),
            bump: arena.bump(),
            region_size: arena.region_size(),
            roots: roots
                .iter()
                .map(|(name, ptr)| (String::from(name), ptr))
                .collect(),
            objects: scan(arena),
        }
    }

    pub fn objects(&self) -> &[ObjectInfo] {
        &self.objects
    }
}

fn show_ptr(ptr: Option<LocalPtr>) -> String {
    match ptr {
        Some(ptr) => ptr.to_string(),
        None => String::from("nil"),
    }
}

impl fmt::Display for HeapDump {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        writeln!(
            f,
            "Region {:?} active, {}/{} bytes used",
            self.active, self.bump, self.region_size
        )?;

        writeln!(f, "Roots:")?;
        for (name, ptr) in &self.roots {
            writeln!(f, "  {} -> {}", name, ptr)?;
        }

        writeln!(f, "Objects:")?;
        for info in &self.objects {
            let fields = join(
                info.fields
                    .iter()
                    .map(|(name, value)| format!("{}={}", name, show_ptr(*value))),
                " ",
            );
            writeln!(
                f,
                "  @{} #{} {} {}",
                info.address, info.id, info.object_type, fields
            )?;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::allocator::AllocObject;
    use crate::object::{Alpha, Beta, Gamma};

    fn alloc<T: AllocObject>(arena: &mut Arena, id: u32) -> LocalPtr {
        let ptr = arena.inner_alloc(T::TYPE_ID.size()).unwrap();
        arena.write(ptr, T::new(id));
        ptr
    }

    #[test]
    fn report_orders_by_id() {
        let mut arena = Arena::new(200).unwrap();
        alloc::<Gamma>(&mut arena, 7);
        alloc::<Alpha>(&mut arena, 2);
        alloc::<Beta>(&mut arena, 4);

        let report = HeapReport::new(&arena);
        assert_eq!(report.ids(), vec![2, 4, 7]);
        assert_eq!(
            report.to_string(),
            "Objects in from-space:\n - 2:Alpha\n - 4:Beta\n - 7:Gamma\n"
        );
    }

    #[test]
    fn duplicate_ids_are_both_listed() {
        let mut arena = Arena::new(200).unwrap();
        alloc::<Beta>(&mut arena, u32::MAX);
        alloc::<Gamma>(&mut arena, 0);
        alloc::<Alpha>(&mut arena, u32::MAX);

        let report = HeapReport::new(&arena);
        assert_eq!(report.len(), 3);
        assert_eq!(
            report.to_string(),
            format!(
                "Objects in from-space:\n - 0:Gamma\n - {0}:Beta\n - {0}:Alpha\n",
                u32::MAX
            )
        );
    }

    #[test]
    fn empty_report() {
        let arena = Arena::new(200).unwrap();
        let report = HeapReport::new(&arena);
        assert_eq!(report.len(), 0);
        assert_eq!(report.to_string(), "Objects in from-space:\n");
    }

    #[test]
    fn dump_shows_fields() {
        let mut arena = Arena::new(200).unwrap();
        let x = alloc::<Alpha>(&mut arena, 0);
        let y = alloc::<Beta>(&mut arena, 1);
        arena.write_ptr(x, 16, Some(y));

        let mut roots = RootSet::new();
        roots.bind("x", Some(x));

        let dump = HeapDump::new(&arena, &roots);
        assert_eq!(dump.objects().len(), 2);
        assert_eq!(dump.objects()[0].field("d"), Some(y));
        assert_eq!(dump.objects()[0].field("c"), None);

        let text = dump.to_string();
        assert!(text.contains("x -> 0"));
        assert!(text.contains("@0 #0 Alpha c=nil d=20"));
        assert!(text.contains("@20 #1 Beta c=nil f=nil"));
    }
}
