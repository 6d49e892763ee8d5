//! Dense matrix maps over ordered key dimensions
//!
//! A matrix map is built from two or three ordered sequences of distinct keys. Every
//! combination of keys addresses one cell. A cell is either explicitly set or falls
//! back to the default given at construction, so a lookup with valid keys always
//! yields a value while a lookup with a key outside a dimension is an error.
//!
//! Cells are stored in a single vector with the first dimension varying fastest.

use crate::{Error, Result};
use std::collections::HashMap;
use std::fmt::Debug;
use std::hash::Hash;

/// An ordered sequence of distinct keys with O(1) position lookup
#[derive(Debug, Clone)]
pub struct Dimension<K> {
    keys: Vec<K>,
    positions: HashMap<K, usize>,
}

impl<K: PartialEq> PartialEq for Dimension<K> {
    fn eq(&self, other: &Self) -> bool {
        self.keys == other.keys
    }
}

impl<K> Dimension<K>
where
    K: Clone + Eq + Hash + Debug,
{
    /// Build a dimension, keeping the first occurrence of any repeated key
    pub fn new(keys: impl IntoIterator<Item = K>) -> Self {
        let mut ordered = Vec::new();
        let mut positions = HashMap::new();
        for key in keys {
            if !positions.contains_key(&key) {
                positions.insert(key.clone(), ordered.len());
                ordered.push(key);
            }
        }
        Self {
            keys: ordered,
            positions,
        }
    }

    /// Keys in order
    pub fn keys(&self) -> &[K] {
        &self.keys
    }

    /// Number of keys
    pub fn len(&self) -> usize {
        self.keys.len()
    }

    /// Whether the dimension has no keys
    pub fn is_empty(&self) -> bool {
        self.keys.is_empty()
    }

    /// Position of `key`, or `None` if it is not part of this dimension
    pub fn position(&self, key: &K) -> Option<usize> {
        self.positions.get(key).copied()
    }

    /// Whether `key` is part of this dimension
    pub fn contains(&self, key: &K) -> bool {
        self.positions.contains_key(key)
    }

    fn require(&self, key: &K, dimension: usize) -> Result<usize> {
        self.position(key).ok_or_else(|| {
            Error::resource_validation(format!(
                "Key {:?} is not in dimension {} of the matrix map",
                key, dimension
            ))
        })
    }
}

/// A map addressed by two keys
#[derive(Debug, Clone, PartialEq)]
pub struct MatrixMap2<K1, K2, V> {
    dim1: Dimension<K1>,
    dim2: Dimension<K2>,
    cells: Vec<Option<V>>,
    default: V,
}

impl<K1, K2, V> MatrixMap2<K1, K2, V>
where
    K1: Clone + Eq + Hash + Debug,
    K2: Clone + Eq + Hash + Debug,
{
    /// Create an empty map where every cell falls back to `default`
    pub fn new(
        keys1: impl IntoIterator<Item = K1>,
        keys2: impl IntoIterator<Item = K2>,
        default: V,
    ) -> Self {
        let dim1 = Dimension::new(keys1);
        let dim2 = Dimension::new(keys2);
        let size = dim1.len() * dim2.len();
        let mut cells = Vec::with_capacity(size);
        cells.resize_with(size, || None);
        Self {
            dim1,
            dim2,
            cells,
            default,
        }
    }

    /// Create a full map with every cell computed from its keys
    pub fn with_generator(
        keys1: impl IntoIterator<Item = K1>,
        keys2: impl IntoIterator<Item = K2>,
        default: V,
        generator: impl FnMut(&K1, &K2) -> V,
    ) -> Self {
        let mut map = Self::new(keys1, keys2, default);
        map.set_all(generator);
        map
    }

    fn offset(&self, key1: &K1, key2: &K2) -> Result<usize> {
        let i1 = self.dim1.require(key1, 1)?;
        let i2 = self.dim2.require(key2, 2)?;
        Ok(i1 + i2 * self.dim1.len())
    }

    /// Value of a cell, falling back to the default when it is not set
    pub fn get(&self, key1: &K1, key2: &K2) -> Result<&V> {
        let offset = self.offset(key1, key2)?;
        Ok(self.cells[offset].as_ref().unwrap_or(&self.default))
    }

    /// Value of a cell only if it has been explicitly set
    pub fn get_explicit(&self, key1: &K1, key2: &K2) -> Result<Option<&V>> {
        let offset = self.offset(key1, key2)?;
        Ok(self.cells[offset].as_ref())
    }

    /// Explicitly set a cell, returning the previous explicit value
    pub fn put(&mut self, key1: &K1, key2: &K2, value: V) -> Result<Option<V>> {
        let offset = self.offset(key1, key2)?;
        Ok(self.cells[offset].replace(value))
    }

    /// Clear a cell so it falls back to the default
    pub fn remove(&mut self, key1: &K1, key2: &K2) -> Result<Option<V>> {
        let offset = self.offset(key1, key2)?;
        Ok(self.cells[offset].take())
    }

    /// Overwrite every cell with a value computed from its keys
    pub fn set_all(&mut self, mut generator: impl FnMut(&K1, &K2) -> V) {
        let len1 = self.dim1.len();
        for (offset, cell) in self.cells.iter_mut().enumerate() {
            let key1 = &self.dim1.keys[offset % len1];
            let key2 = &self.dim2.keys[offset / len1];
            *cell = Some(generator(key1, key2));
        }
    }

    /// Whether every cell is explicitly set
    pub fn is_full(&self) -> bool {
        self.cells.iter().all(Option::is_some)
    }

    /// Whether no cell is explicitly set
    pub fn is_empty(&self) -> bool {
        self.cells.iter().all(Option::is_none)
    }

    /// The default value for unset cells
    pub fn default_value(&self) -> &V {
        &self.default
    }

    /// Keys of the first dimension
    pub fn keys1(&self) -> &[K1] {
        self.dim1.keys()
    }

    /// Keys of the second dimension
    pub fn keys2(&self) -> &[K2] {
        self.dim2.keys()
    }

    /// Iterate over every cell with its keys, applying defaults
    pub fn iter(&self) -> impl Iterator<Item = (&K1, &K2, &V)> + '_ {
        let len1 = self.dim1.len();
        self.cells.iter().enumerate().map(move |(offset, cell)| {
            (
                &self.dim1.keys[offset % len1],
                &self.dim2.keys[offset / len1],
                cell.as_ref().unwrap_or(&self.default),
            )
        })
    }
}

impl<K1, K2, V> MatrixMap2<K1, K2, V>
where
    K1: Clone + Eq + Hash + Debug,
    K2: Clone + Eq + Hash + Debug,
    V: Clone,
{
    /// Mutable access to a cell, materializing the default first if it is unset
    pub fn get_mut(&mut self, key1: &K1, key2: &K2) -> Result<&mut V> {
        let offset = self.offset(key1, key2)?;
        let default = &self.default;
        Ok(self.cells[offset].get_or_insert_with(|| default.clone()))
    }

    /// Set every cell to a copy of `value`
    pub fn fill(&mut self, value: V) {
        self.set_all(|_, _| value.clone());
    }
}

/// A map addressed by three keys
#[derive(Debug, Clone, PartialEq)]
pub struct MatrixMap3<K1, K2, K3, V> {
    dim1: Dimension<K1>,
    dim2: Dimension<K2>,
    dim3: Dimension<K3>,
    cells: Vec<Option<V>>,
    default: V,
}

impl<K1, K2, K3, V> MatrixMap3<K1, K2, K3, V>
where
    K1: Clone + Eq + Hash + Debug,
    K2: Clone + Eq + Hash + Debug,
    K3: Clone + Eq + Hash + Debug,
{
    /// Create an empty map where every cell falls back to `default`
    pub fn new(
        keys1: impl IntoIterator<Item = K1>,
        keys2: impl IntoIterator<Item = K2>,
        keys3: impl IntoIterator<Item = K3>,
        default: V,
    ) -> Self {
        let dim1 = Dimension::new(keys1);
        let dim2 = Dimension::new(keys2);
        let dim3 = Dimension::new(keys3);
        let size = dim1.len() * dim2.len() * dim3.len();
        let mut cells = Vec::with_capacity(size);
        cells.resize_with(size, || None);
        Self {
            dim1,
            dim2,
            dim3,
            cells,
            default,
        }
    }

    fn offset(&self, key1: &K1, key2: &K2, key3: &K3) -> Result<usize> {
        let i1 = self.dim1.require(key1, 1)?;
        let i2 = self.dim2.require(key2, 2)?;
        let i3 = self.dim3.require(key3, 3)?;
        Ok(i1 + self.dim1.len() * (i2 + self.dim2.len() * i3))
    }

    fn keys_at(&self, offset: usize) -> (&K1, &K2, &K3) {
        let len1 = self.dim1.len();
        let len2 = self.dim2.len();
        (
            &self.dim1.keys[offset % len1],
            &self.dim2.keys[(offset / len1) % len2],
            &self.dim3.keys[offset / (len1 * len2)],
        )
    }

    /// Value of a cell, falling back to the default when it is not set
    pub fn get(&self, key1: &K1, key2: &K2, key3: &K3) -> Result<&V> {
        let offset = self.offset(key1, key2, key3)?;
        Ok(self.cells[offset].as_ref().unwrap_or(&self.default))
    }

    /// Value of a cell only if it has been explicitly set
    pub fn get_explicit(&self, key1: &K1, key2: &K2, key3: &K3) -> Result<Option<&V>> {
        let offset = self.offset(key1, key2, key3)?;
        Ok(self.cells[offset].as_ref())
    }

    /// Explicitly set a cell, returning the previous explicit value
    pub fn put(&mut self, key1: &K1, key2: &K2, key3: &K3, value: V) -> Result<Option<V>> {
        let offset = self.offset(key1, key2, key3)?;
        Ok(self.cells[offset].replace(value))
    }

    /// Clear a cell so it falls back to the default
    pub fn remove(&mut self, key1: &K1, key2: &K2, key3: &K3) -> Result<Option<V>> {
        let offset = self.offset(key1, key2, key3)?;
        Ok(self.cells[offset].take())
    }

    /// Overwrite every cell with a value computed from its keys
    pub fn set_all(&mut self, mut generator: impl FnMut(&K1, &K2, &K3) -> V) {
        for offset in 0..self.cells.len() {
            let (key1, key2, key3) = self.keys_at(offset);
            let value = generator(key1, key2, key3);
            self.cells[offset] = Some(value);
        }
    }

    /// Whether every cell is explicitly set
    pub fn is_full(&self) -> bool {
        self.cells.iter().all(Option::is_some)
    }

    /// Whether no cell is explicitly set
    pub fn is_empty(&self) -> bool {
        self.cells.iter().all(Option::is_none)
    }

    /// The default value for unset cells
    pub fn default_value(&self) -> &V {
        &self.default
    }

    pub fn keys1(&self) -> &[K1] {
        self.dim1.keys()
    }

    pub fn keys2(&self) -> &[K2] {
        self.dim2.keys()
    }

    pub fn keys3(&self) -> &[K3] {
        self.dim3.keys()
    }

    /// Iterate over every cell with its keys, applying defaults
    pub fn iter(&self) -> impl Iterator<Item = (&K1, &K2, &K3, &V)> + '_ {
        self.cells.iter().enumerate().map(move |(offset, cell)| {
            let (key1, key2, key3) = self.keys_at(offset);
            (key1, key2, key3, cell.as_ref().unwrap_or(&self.default))
        })
    }
}

impl<K1, K2, K3, V> MatrixMap3<K1, K2, K3, V>
where
    K1: Clone + Eq + Hash + Debug,
    K2: Clone + Eq + Hash + Debug,
    K3: Clone + Eq + Hash + Debug,
    V: Clone,
{
    /// Mutable access to a cell, materializing the default first if it is unset
    pub fn get_mut(&mut self, key1: &K1, key2: &K2, key3: &K3) -> Result<&mut V> {
        let offset = self.offset(key1, key2, key3)?;
        let default = &self.default;
        Ok(self.cells[offset].get_or_insert_with(|| default.clone()))
    }

    /// Set every cell to a copy of `value`
    pub fn fill(&mut self, value: V) {
        self.set_all(|_, _, _| value.clone());
    }
}
