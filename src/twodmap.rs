// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at http://mozilla.org/MPL/2.0/.

//! Two-dimensional scratch fields
//!
//! Every intermediate product of a carve (the energy map, the cost
//! table and its back pointers) is a rectangular field of plain values
//! addressed by `(x, y)`.  They all live in a `TwoDimensionalMap`.

use std::ops::{Index, IndexMut};

/// Read-only access to a rectangular field.  Seam searches are written
/// against this trait so the same code can walk a map directly or
/// through a transposing view.
pub trait Lattice<P: Copy> {
    /// `(width, height)` of the field.
    fn dimensions(&self) -> (u32, u32);

    /// The value at column `x`, row `y`.
    fn get(&self, x: u32, y: u32) -> P;
}

/// An addressable two-dimensional field, stored row-major.  The
/// content type must implement `Default` so a fresh map can be
/// allocated in one step.
#[derive(Debug, Clone, PartialEq)]
pub struct TwoDimensionalMap<P: Default + Copy> {
    width: u32,
    height: u32,
    data: Vec<P>,
}

impl<P: Default + Copy> TwoDimensionalMap<P> {
    /// Allocate a map with every cell set to `P::default()`.
    pub fn new(width: u32, height: u32) -> Self {
        TwoDimensionalMap {
            width,
            height,
            data: vec![P::default(); width as usize * height as usize],
        }
    }

    /// Wrap an existing row-major buffer.  Returns `None` if the buffer
    /// length does not match the requested dimensions.
    pub fn from_raw(width: u32, height: u32, data: Vec<P>) -> Option<Self> {
        if data.len() != width as usize * height as usize {
            return None;
        }
        Some(TwoDimensionalMap {
            width,
            height,
            data,
        })
    }

    pub fn width(&self) -> u32 {
        self.width
    }

    pub fn height(&self) -> u32 {
        self.height
    }

    /// True when either dimension is zero.
    pub fn is_empty(&self) -> bool {
        self.width == 0 || self.height == 0
    }

    pub fn as_slice(&self) -> &[P] {
        &self.data
    }

    pub(crate) fn as_mut_slice(&mut self) -> &mut [P] {
        &mut self.data
    }

    /// One row of the map.
    pub fn row(&self, y: u32) -> &[P] {
        let start = self.get_index(0, y);
        &self.data[start..start + self.width as usize]
    }

    /// Mutable rows, in order.  Yields nothing for an empty map.
    pub fn rows_mut(&mut self) -> impl Iterator<Item = &mut [P]> {
        let width = (self.width as usize).max(1);
        self.data.chunks_mut(width)
    }

    // Keep the index math in one place and never mess with it.
    fn get_index(&self, x: u32, y: u32) -> usize {
        (y as usize) * (self.width as usize) + (x as usize)
    }
}

impl<P: Default + Copy> Lattice<P> for TwoDimensionalMap<P> {
    fn dimensions(&self) -> (u32, u32) {
        (self.width, self.height)
    }

    fn get(&self, x: u32, y: u32) -> P {
        self.data[self.get_index(x, y)]
    }
}

impl<P: Default + Copy> Index<(u32, u32)> for TwoDimensionalMap<P> {
    type Output = P;

    fn index(&self, (x, y): (u32, u32)) -> &P {
        let index = self.get_index(x, y);
        &self.data[index]
    }
}

impl<P: Default + Copy> IndexMut<(u32, u32)> for TwoDimensionalMap<P> {
    fn index_mut(&mut self, (x, y): (u32, u32)) -> &mut P {
        let index = self.get_index(x, y);
        &mut self.data[index]
    }
}

/// A cell of the cost table: the cheapest accumulated energy that
/// reaches this cell, and the index in the previous row it came from.
#[derive(Default, Debug, Copy, Clone, PartialEq)]
pub(crate) struct EnergyAndBackPointer<P: Default + Copy> {
    pub energy: P,
    pub parent: u32,
}
