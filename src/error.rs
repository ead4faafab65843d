// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at http://mozilla.org/MPL/2.0/.

//! Errors reported by the carver.  Every failure here is a
//! precondition violation; nothing is transient, so nothing is retried.

use crate::seamfinder::Orientation;
use failure::Fail;

#[derive(Debug, Fail)]
pub enum CarveError {
    /// The requested size is non-positive, or asks for nothing to be
    /// removed.  The image is left as it was.
    #[fail(
        display = "invalid target size {}x{} for a {}x{} image",
        width, height, current_width, current_height
    )]
    InvalidTarget {
        width: i64,
        height: i64,
        current_width: u32,
        current_height: u32,
    },

    #[fail(
        display = "{} seam has {} entries, expected {}",
        orientation, found, expected
    )]
    SeamLength {
        orientation: Orientation,
        expected: u32,
        found: usize,
    },

    #[fail(
        display = "seam index {} at position {} is outside 0..{}",
        index, position, limit
    )]
    SeamOutOfBounds { index: u32, position: usize, limit: u32 },

    /// Consecutive entries at `position` and `position + 1` differ by
    /// more than one.
    #[fail(display = "seam breaks after position {}", position)]
    SeamDisconnected { position: usize },

    /// Removing one more seam would leave an image with no rows or no
    /// columns.
    #[fail(display = "cannot remove a {} seam from a {}x{} image", orientation, width, height)]
    WouldEmpty {
        orientation: Orientation,
        width: u32,
        height: u32,
    },

    #[fail(display = "image error: {}", _0)]
    Image(#[cause] image::ImageError),

    #[fail(display = "I/O error: {}", _0)]
    Io(#[cause] std::io::Error),
}

impl From<image::ImageError> for CarveError {
    fn from(err: image::ImageError) -> Self {
        CarveError::Image(err)
    }
}

impl From<std::io::Error> for CarveError {
    fn from(err: std::io::Error) -> Self {
        CarveError::Io(err)
    }
}

pub type Result<T> = std::result::Result<T, CarveError>;
