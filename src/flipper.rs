// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at http://mozilla.org/MPL/2.0/.

//! Lattice dimensional flipper
//!
//! A proxy for any `Lattice` that maps the width to the original
//! height, and vice versa, as well as every x to y and vice versa.
//!
//! A horizontal seam through a map is a vertical seam through the
//! flipped map, so the seam search only has to be written once.  The
//! "left" neighbor of a flipped cell is the cell above it in the
//! original, which keeps the up/straight/down preference of a
//! horizontal search the mirror of the left/straight/right preference
//! of a vertical one.

use crate::twodmap::Lattice;
use std::marker::PhantomData;

pub struct Flipper<'a, L, P>
where
    L: Lattice<P>,
    P: Copy,
{
    pub lattice: &'a L,
    _cell: PhantomData<P>,
}

impl<'a, L, P> Flipper<'a, L, P>
where
    L: Lattice<P>,
    P: Copy,
{
    pub fn new(lattice: &'a L) -> Self {
        Flipper {
            lattice,
            _cell: PhantomData,
        }
    }
}

impl<'a, L, P> Lattice<P> for Flipper<'a, L, P>
where
    L: Lattice<P>,
    P: Copy,
{
    fn dimensions(&self) -> (u32, u32) {
        let (x, y) = self.lattice.dimensions();
        (y, x)
    }

    fn get(&self, x: u32, y: u32) -> P {
        self.lattice.get(y, x)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::twodmap::TwoDimensionalMap;

    #[test]
    fn flips_coordinates() {
        let map = TwoDimensionalMap::from_raw(3, 2, vec![0, 1, 2, 3, 4, 5]).unwrap();
        let flipped = Flipper::new(&map);
        assert_eq!(flipped.dimensions(), (2, 3));
        assert_eq!(flipped.get(1, 0), 3);
        assert_eq!(flipped.get(0, 2), 2);
        assert_eq!(Flipper::new(&flipped).get(2, 1), 5);
    }
}
