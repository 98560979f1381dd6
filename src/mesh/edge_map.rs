//! Symmetric map keyed by undirected edges.
//!
//! [`EdgeMap`] associates a value with the unordered vertex pair `{a, b}`.
//! The pair is canonicalized with the smaller index first and packed into a
//! single `u64`, so `(a, b)` and `(b, a)` address the same slot.
//!
//! An `EdgeMap` is a scratch structure: algorithms create one, fill it during a
//! single pass over the faces, and drop it when the pass is done.
//!
//! # Example
//!
//! ```
//! use tessel::mesh::EdgeMap;
//!
//! let mut edges = EdgeMap::new();
//! edges.set(3, 1, "shared");
//! assert_eq!(edges.get(1, 3), Some(&"shared"));
//! assert!(edges.has(3, 1) && edges.has(1, 3));
//! ```

use std::collections::hash_map::{self, HashMap};

/// Pack an unordered edge into a single key.
///
/// # Panics
///
/// Panics if `a == b` (self-edges are not edges) or if either index does not
/// fit in 32 bits.
#[inline]
fn edge_key(a: usize, b: usize) -> u64 {
    assert_ne!(a, b, "self-edge ({a}, {b}) is not a valid edge key");
    let (lo, hi) = if a < b { (a, b) } else { (b, a) };
    assert!(
        hi <= u32::MAX as usize,
        "vertex index {hi} does not fit in an edge key"
    );
    ((lo as u64) << 32) | hi as u64
}

#[inline]
fn unpack(key: u64) -> (usize, usize) {
    ((key >> 32) as usize, (key & 0xffff_ffff) as usize)
}

/// A map from undirected edges `{a, b}` to values of type `V`.
#[derive(Debug, Clone)]
pub struct EdgeMap<V> {
    map: HashMap<u64, V>,
}

impl<V> Default for EdgeMap<V> {
    fn default() -> Self {
        Self::new()
    }
}

impl<V> EdgeMap<V> {
    /// Create an empty map.
    pub fn new() -> Self {
        Self {
            map: HashMap::new(),
        }
    }

    /// Create an empty map with room for `capacity` edges.
    pub fn with_capacity(capacity: usize) -> Self {
        Self {
            map: HashMap::with_capacity(capacity),
        }
    }

    /// Whether the edge `{a, b}` has a value.
    #[inline]
    pub fn has(&self, a: usize, b: usize) -> bool {
        self.map.contains_key(&edge_key(a, b))
    }

    /// Associate `value` with the edge `{a, b}`, returning the previous value.
    #[inline]
    pub fn set(&mut self, a: usize, b: usize, value: V) -> Option<V> {
        self.map.insert(edge_key(a, b), value)
    }

    /// The value stored for edge `{a, b}`, if any.
    #[inline]
    pub fn get(&self, a: usize, b: usize) -> Option<&V> {
        self.map.get(&edge_key(a, b))
    }

    /// Mutable access to the value stored for edge `{a, b}`.
    #[inline]
    pub fn get_mut(&mut self, a: usize, b: usize) -> Option<&mut V> {
        self.map.get_mut(&edge_key(a, b))
    }

    /// The value for `{a, b}`, inserting `default()` first if absent.
    pub fn entry_or_insert_with<F: FnOnce() -> V>(&mut self, a: usize, b: usize, default: F) -> &mut V {
        self.map.entry(edge_key(a, b)).or_insert_with(default)
    }

    /// Number of distinct edges in the map.
    #[inline]
    pub fn len(&self) -> usize {
        self.map.len()
    }

    /// Whether the map holds no edges.
    #[inline]
    pub fn is_empty(&self) -> bool {
        self.map.is_empty()
    }

    /// Iterate over `((min, max), value)` pairs in arbitrary order.
    pub fn iter(&self) -> Iter<'_, V> {
        Iter {
            inner: self.map.iter(),
        }
    }
}

/// Iterator over the entries of an [`EdgeMap`].
pub struct Iter<'a, V> {
    inner: hash_map::Iter<'a, u64, V>,
}

impl<'a, V> Iterator for Iter<'a, V> {
    type Item = ((usize, usize), &'a V);

    fn next(&mut self) -> Option<Self::Item> {
        self.inner.next().map(|(&k, v)| (unpack(k), v))
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        self.inner.size_hint()
    }
}
