use crate::constants::DEFAULT_HEAP_SIZE;
use crate::error::HeapError;

/// Heap construction parameters
#[derive(Copy, Clone, Debug, PartialEq)]
pub struct HeapConfig {
    heap_size: usize,
}

impl HeapConfig {
    /// Validate a total arena size. It must split evenly into two regions.
    pub fn new(heap_size: usize) -> Result<HeapConfig, HeapError> {
        if heap_size == 0 || heap_size % 2 != 0 {
            Err(HeapError::BadHeapSize(heap_size))
        } else {
            Ok(HeapConfig { heap_size })
        }
    }

    /// Total arena size in bytes, both regions included
    pub fn heap_size(&self) -> usize {
        self.heap_size
    }
}

impl Default for HeapConfig {
    fn default() -> HeapConfig {
        HeapConfig {
            heap_size: DEFAULT_HEAP_SIZE,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn rejects_odd_and_zero() {
        assert_eq!(HeapConfig::new(0), Err(HeapError::BadHeapSize(0)));
        assert_eq!(HeapConfig::new(7), Err(HeapError::BadHeapSize(7)));
    }

    #[test]
    fn default_size() {
        assert_eq!(HeapConfig::default().heap_size(), 200);
        assert_eq!(HeapConfig::new(64).map(|c| c.heap_size()), Ok(64));
    }
}
