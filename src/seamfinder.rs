// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at http://mozilla.org/MPL/2.0/.

//! Find seams in an energy map
//!
//! A vertical seam holds one column index per row, a horizontal seam
//! one row index per column, and consecutive entries never differ by
//! more than one.  Both orientations are found by the same search: a
//! horizontal seam is the vertical seam of the flipped map.
//!
//! Whenever candidates cost the same, the first one wins: the left
//! predecessor before the straight one before the right one, and the
//! lowest index among equally cheap endpoints.

use crate::energy::EnergyMap;
use crate::error::{CarveError, Result};
use crate::flipper::Flipper;
use crate::twodmap::{EnergyAndBackPointer, Lattice, TwoDimensionalMap};
use itertools::Itertools;
use std::cmp::Ordering;
use std::fmt;

/// Which way a seam runs.  A vertical seam runs top to bottom and
/// removes a column; a horizontal one runs left to right and removes a
/// row.
#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub enum Orientation {
    Vertical,
    Horizontal,
}

impl fmt::Display for Orientation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Orientation::Vertical => f.write_str("vertical"),
            Orientation::Horizontal => f.write_str("horizontal"),
        }
    }
}

/// How to search for a seam.
#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub enum SeamStrategy {
    /// The globally cheapest seam, by dynamic programming over the
    /// whole map.
    DynamicProgramming,
    /// Start at the cheapest pixel of the first row and step to the
    /// cheapest of the three neighbors below, row by row.  Fast, but
    /// only locally optimal.
    Greedy,
}

impl Default for SeamStrategy {
    fn default() -> Self {
        SeamStrategy::DynamicProgramming
    }
}

/// A connected path of pixels across the image.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Seam {
    orientation: Orientation,
    indices: Vec<u32>,
}

impl Seam {
    pub fn new(orientation: Orientation, indices: Vec<u32>) -> Self {
        Seam {
            orientation,
            indices,
        }
    }

    pub fn orientation(&self) -> Orientation {
        self.orientation
    }

    /// Column indices (vertical) or row indices (horizontal), in path
    /// order.
    pub fn indices(&self) -> &[u32] {
        &self.indices
    }

    pub fn len(&self) -> usize {
        self.indices.len()
    }

    /// An empty seam means there was nothing to search.
    pub fn is_empty(&self) -> bool {
        self.indices.is_empty()
    }

    /// True when no two consecutive entries differ by more than one.
    pub fn is_connected(&self) -> bool {
        first_break(&self.indices).is_none()
    }

    /// Check that this seam crosses a grid whose opposite dimension is
    /// `span` and whose carved dimension is `limit`.
    pub fn validate(&self, span: u32, limit: u32) -> Result<()> {
        check_path(self.orientation, &self.indices, span, limit)
    }

    pub fn into_indices(self) -> Vec<u32> {
        self.indices
    }
}

fn first_break(indices: &[u32]) -> Option<usize> {
    indices
        .iter()
        .tuple_windows()
        .position(|(a, b)| (i64::from(*a) - i64::from(*b)).abs() > 1)
}

pub(crate) fn check_path(
    orientation: Orientation,
    indices: &[u32],
    span: u32,
    limit: u32,
) -> Result<()> {
    if indices.len() != span as usize {
        return Err(CarveError::SeamLength {
            orientation,
            expected: span,
            found: indices.len(),
        });
    }
    if let Some((position, &index)) = indices.iter().enumerate().find(|(_, i)| **i >= limit) {
        return Err(CarveError::SeamOutOfBounds {
            index,
            position,
            limit,
        });
    }
    match first_break(indices) {
        Some(position) => Err(CarveError::SeamDisconnected { position }),
        None => Ok(()),
    }
}

/// Anything that can turn an energy map into seams.
pub trait SeamFinder {
    /// One column index per row of `energy`.
    fn find_vertical_seam(&self, energy: &EnergyMap) -> Seam;

    /// One row index per column of `energy`.
    fn find_horizontal_seam(&self, energy: &EnergyMap) -> Seam;

    fn find_seam(&self, energy: &EnergyMap, orientation: Orientation) -> Seam {
        match orientation {
            Orientation::Vertical => self.find_vertical_seam(energy),
            Orientation::Horizontal => self.find_horizontal_seam(energy),
        }
    }
}

impl SeamFinder for SeamStrategy {
    fn find_vertical_seam(&self, energy: &EnergyMap) -> Seam {
        Seam::new(Orientation::Vertical, search(*self, energy))
    }

    fn find_horizontal_seam(&self, energy: &EnergyMap) -> Seam {
        Seam::new(Orientation::Horizontal, search(*self, &Flipper::new(energy)))
    }
}

/// Given an energy map, return the list of x-coordinates that, when
/// mapped with the range (0..height), give the XY coordinates for each
/// pixel in the globally cheapest top-to-bottom seam.
pub fn energy_to_vertical_seam(energy: &EnergyMap) -> Vec<u32> {
    dynamic_seam(energy)
}

/// Given an energy map, return the list of y-coordinates that, when
/// mapped with the range (0..width), give the XY coordinates for each
/// pixel in the globally cheapest left-to-right seam.
pub fn energy_to_horizontal_seam(energy: &EnergyMap) -> Vec<u32> {
    dynamic_seam(&Flipper::new(energy))
}

fn search<L: Lattice<f32>>(strategy: SeamStrategy, energy: &L) -> Vec<u32> {
    match strategy {
        SeamStrategy::DynamicProgramming => dynamic_seam(energy),
        SeamStrategy::Greedy => greedy_seam(energy),
    }
}

// First minimum of a sequence of costs.  Ties keep the earlier
// candidate, which is what Iterator::min_by promises.
fn cheapest<I>(candidates: I, cost: impl Fn(u32) -> f32) -> Option<u32>
where
    I: Iterator<Item = u32>,
{
    candidates.min_by(|a, b| cost(*a).partial_cmp(&cost(*b)).unwrap_or(Ordering::Equal))
}

// The in-bounds neighbors of `x` in the adjacent row, left first.
// Out-of-bounds neighbors cost +infinity, which is the same as never
// offering them.
fn neighbors(x: u32, width: u32) -> std::ops::RangeInclusive<u32> {
    let low = if x == 0 { 0 } else { x - 1 };
    let high = if x + 1 >= width { width - 1 } else { x + 1 };
    low..=high
}

fn dynamic_seam<L: Lattice<f32>>(energy: &L) -> Vec<u32> {
    let (width, height) = energy.dimensions();
    if width == 0 || height == 0 {
        return Vec::new();
    }

    let first_row = |x: u32| energy.get(x, 0);
    if height == 1 {
        return cheapest(0..width, first_row).into_iter().collect();
    }

    let mut target: TwoDimensionalMap<EnergyAndBackPointer<f32>> =
        TwoDimensionalMap::new(width, height);

    // Populate the first row with their native energies.
    for x in 0..width {
        target[(x, 0)].energy = first_row(x);
    }

    // Every subsequent cell is its own energy plus the cheapest of the
    // (up to) three cells that can reach it from the row above.
    for y in 1..height {
        for x in 0..width {
            let above = |px: u32| target[(px, y - 1)].energy;
            let parent = match cheapest(neighbors(x, width), above) {
                Some(parent) => parent,
                None => x,
            };
            let cell = EnergyAndBackPointer {
                energy: energy.get(x, y) + above(parent),
                parent,
            };
            target[(x, y)] = cell;
        }
    }

    let last = height - 1;
    let mut seam_col = match cheapest(0..width, |x| target[(x, last)].energy) {
        Some(x) => x,
        None => return Vec::new(),
    };

    // Working backwards, follow the back pointers to the first row,
    // then put the seam back in top-to-bottom order.
    let mut seam: Vec<u32> = (0..height)
        .rev()
        .map(|y| {
            let here = seam_col;
            seam_col = target[(here, y)].parent;
            here
        })
        .collect();
    seam.reverse();
    seam
}

fn greedy_seam<L: Lattice<f32>>(energy: &L) -> Vec<u32> {
    let (width, height) = energy.dimensions();
    if width == 0 || height == 0 {
        return Vec::new();
    }

    let mut x = match cheapest(0..width, |px| energy.get(px, 0)) {
        Some(x) => x,
        None => return Vec::new(),
    };

    let mut seam = Vec::with_capacity(height as usize);
    seam.push(x);
    for y in 1..height {
        if let Some(next) = cheapest(neighbors(x, width), |px| energy.get(px, y)) {
            x = next;
        }
        seam.push(x);
    }
    seam
}

#[cfg(test)]
mod tests {
    use super::*;

    const ENERGY_DATA: [f32; 20] = [
        9.0, 9.0, 0.0, 9.0, 9.0, 9.0, 1.0, 9.0, 8.0, 9.0, 9.0, 9.0, 9.0, 9.0, 0.0, 9.0, 9.0, 9.0,
        0.0, 9.0,
    ];

    fn fixture() -> EnergyMap {
        EnergyMap::from_raw(5, 4, ENERGY_DATA.to_vec()).unwrap()
    }

    fn path_cost(energy: &EnergyMap, seam: &Seam) -> f32 {
        seam.indices()
            .iter()
            .enumerate()
            .map(|(i, &j)| match seam.orientation() {
                Orientation::Vertical => energy[(j, i as u32)],
                Orientation::Horizontal => energy[(i as u32, j)],
            })
            .sum()
    }

    #[test]
    fn energy_grid_to_vertical_seam() {
        assert_eq!(energy_to_vertical_seam(&fixture()), [2, 3, 4, 3]);
    }

    #[test]
    fn energy_grid_to_horizontal_seam() {
        assert_eq!(energy_to_horizontal_seam(&fixture()), [0, 1, 0, 1, 2]);
    }

    #[test]
    fn seams_span_the_map_and_stay_connected() {
        let energy = EnergyMap::from_raw(
            6,
            5,
            (0..30).map(|i| ((i * 7919) % 13) as f32).collect(),
        )
        .unwrap();
        for strategy in &[SeamStrategy::DynamicProgramming, SeamStrategy::Greedy] {
            let vertical = strategy.find_vertical_seam(&energy);
            assert_eq!(vertical.len(), 5);
            assert!(vertical.is_connected());
            assert!(vertical.validate(5, 6).is_ok());

            let horizontal = strategy.find_horizontal_seam(&energy);
            assert_eq!(horizontal.len(), 6);
            assert!(horizontal.is_connected());
            assert!(horizontal.validate(6, 5).is_ok());
        }
    }

    #[test]
    fn uniform_map_prefers_the_leftmost_column() {
        let energy = EnergyMap::new(5, 5);
        let seam = SeamStrategy::DynamicProgramming.find_vertical_seam(&energy);
        assert_eq!(seam.indices(), &[0, 0, 0, 0, 0]);
        let seam = SeamStrategy::DynamicProgramming.find_horizontal_seam(&energy);
        assert_eq!(seam.indices(), &[0, 0, 0, 0, 0]);
    }

    #[test]
    fn ties_prefer_the_left_predecessor() {
        // Both 0 and 2 reach the bottom center for the same cost.
        let energy =
            EnergyMap::from_raw(3, 2, vec![1.0, 5.0, 1.0, 9.0, 0.0, 9.0]).unwrap();
        assert_eq!(energy_to_vertical_seam(&energy), [0, 1]);
    }

    #[test]
    fn single_row_picks_the_first_minimum() {
        let energy = EnergyMap::from_raw(5, 1, vec![4.0, 2.0, 3.0, 2.0, 6.0]).unwrap();
        assert_eq!(energy_to_vertical_seam(&energy), [1]);
        let energy = EnergyMap::from_raw(1, 4, vec![3.0, 1.0, 1.0, 2.0]).unwrap();
        assert_eq!(energy_to_horizontal_seam(&energy), [1]);
    }

    #[test]
    fn empty_map_yields_empty_seam() {
        let energy = EnergyMap::new(0, 4);
        assert!(SeamStrategy::DynamicProgramming
            .find_vertical_seam(&energy)
            .is_empty());
        assert!(SeamStrategy::Greedy.find_horizontal_seam(&energy).is_empty());
    }

    #[test]
    fn search_is_deterministic() {
        let energy = fixture();
        let first = SeamStrategy::DynamicProgramming.find_vertical_seam(&energy);
        let second = SeamStrategy::DynamicProgramming.find_vertical_seam(&energy);
        assert_eq!(first, second);
    }

    #[test]
    fn greedy_never_beats_dynamic_programming() {
        let energy = fixture();
        let dp = SeamStrategy::DynamicProgramming.find_vertical_seam(&energy);
        let greedy = SeamStrategy::Greedy.find_vertical_seam(&energy);
        assert_eq!(greedy.indices(), &[2, 1, 0, 0]);
        assert!(path_cost(&energy, &dp) <= path_cost(&energy, &greedy));
    }

    #[test]
    fn validation_reports_the_first_problem() {
        let short = Seam::new(Orientation::Vertical, vec![0, 1]);
        match short.validate(3, 4) {
            Err(CarveError::SeamLength { expected, found, .. }) => {
                assert_eq!((expected, found), (3, 2))
            }
            other => panic!("unexpected {:?}", other),
        }

        let wide = Seam::new(Orientation::Vertical, vec![2, 3, 4]);
        match wide.validate(3, 4) {
            Err(CarveError::SeamOutOfBounds { index, position, .. }) => {
                assert_eq!((index, position), (4, 2))
            }
            other => panic!("unexpected {:?}", other),
        }

        let broken = Seam::new(Orientation::Horizontal, vec![0, 2, 2]);
        match broken.validate(3, 4) {
            Err(CarveError::SeamDisconnected { position }) => assert_eq!(position, 0),
            other => panic!("unexpected {:?}", other),
        }
    }
}
