//! Index-offset coefficient vectors
//!
//! Coefficient tables in control files number their values from 0 or 1, and the
//! utilization vector numbers its slots from -1. [`Coefficients`] keeps the caller's
//! lower index so that equations can be written with the same indices the
//! documentation uses.

use crate::{Error, Result};
use serde::{Deserialize, Serialize};
use std::ops::RangeInclusive;

/// A vector of `f32` values addressed from a caller chosen lower index
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Coefficients {
    values: Vec<f32>,
    from: i32,
}

impl Coefficients {
    /// Create coefficients whose first value has index `from`
    pub fn new(values: Vec<f32>, from: i32) -> Self {
        Self { values, from }
    }

    /// Coefficients of the given size with every value set to `value`
    pub fn filled(size: usize, from: i32, value: f32) -> Self {
        Self::new(vec![value; size], from)
    }

    /// Coefficients of the given size with every value set to zero
    pub fn empty(size: usize, from: i32) -> Self {
        Self::filled(size, from, 0.0)
    }

    /// Number of values
    pub fn size(&self) -> usize {
        self.values.len()
    }

    /// Lower index
    pub fn from(&self) -> i32 {
        self.from
    }

    /// The range of valid indices, empty when there are no values
    pub fn indices(&self) -> RangeInclusive<i32> {
        self.from..=(self.from + self.values.len() as i32 - 1)
    }

    fn offset(&self, index: i32) -> Option<usize> {
        let offset = index.checked_sub(self.from)?;
        let offset = usize::try_from(offset).ok()?;
        (offset < self.values.len()).then_some(offset)
    }

    /// Value at `index`, or `None` outside the valid range
    pub fn get(&self, index: i32) -> Option<f32> {
        self.offset(index).map(|offset| self.values[offset])
    }

    /// Value at `index`, or an error naming the valid range
    pub fn coe(&self, index: i32) -> Result<f32> {
        self.get(index).ok_or_else(|| self.index_error(index))
    }

    /// Replace the value at `index`
    pub fn set(&mut self, index: i32, value: f32) -> Result<()> {
        let offset = self.offset(index).ok_or_else(|| self.index_error(index))?;
        self.values[offset] = value;
        Ok(())
    }

    /// Apply `op` to the value at `index` in place
    pub fn scalar_in_place(&mut self, index: i32, op: impl FnOnce(f32) -> f32) -> Result<()> {
        let offset = self.offset(index).ok_or_else(|| self.index_error(index))?;
        self.values[offset] = op(self.values[offset]);
        Ok(())
    }

    /// Apply `op` to every value, keeping the size and lower index
    pub fn scalar(&self, op: impl Fn(f32) -> f32) -> Coefficients {
        Coefficients::new(self.values.iter().map(|v| op(*v)).collect(), self.from)
    }

    /// Combine with `other` value by value
    ///
    /// Both vectors must have the same size and lower index.
    pub fn pairwise(&self, other: &Coefficients, op: impl Fn(f32, f32) -> f32) -> Result<Coefficients> {
        self.check_compatible(other)?;
        let values = self
            .values
            .iter()
            .zip(other.values.iter())
            .map(|(a, b)| op(*a, *b))
            .collect();
        Ok(Coefficients::new(values, self.from))
    }

    /// Combine with `other` value by value, storing the result in `self`
    pub fn pairwise_in_place(
        &mut self,
        other: &Coefficients,
        op: impl Fn(f32, f32) -> f32,
    ) -> Result<()> {
        self.check_compatible(other)?;
        for (a, b) in self.values.iter_mut().zip(other.values.iter()) {
            *a = op(*a, *b);
        }
        Ok(())
    }

    /// Sum of all values
    pub fn sum(&self) -> f32 {
        self.values.iter().sum()
    }

    /// The values in index order
    pub fn as_slice(&self) -> &[f32] {
        &self.values
    }

    /// The values in index order, mutably
    pub fn as_mut_slice(&mut self) -> &mut [f32] {
        &mut self.values
    }

    /// Iterate over `(index, value)` pairs
    pub fn iter(&self) -> impl Iterator<Item = (i32, f32)> + '_ {
        self.values
            .iter()
            .enumerate()
            .map(move |(offset, value)| (self.from + offset as i32, *value))
    }

    fn check_compatible(&self, other: &Coefficients) -> Result<()> {
        if self.values.len() != other.values.len() || self.from != other.from {
            return Err(Error::resource_validation(format!(
                "Coefficients must have the same size and lower index: {}@{} vs {}@{}",
                self.values.len(),
                self.from,
                other.values.len(),
                other.from
            )));
        }
        Ok(())
    }

    fn index_error(&self, index: i32) -> Error {
        Error::resource_validation(format!(
            "Coefficient index {} is outside {}..={}",
            index,
            self.from,
            self.from + self.values.len() as i32 - 1
        ))
    }
}
