// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at http://mozilla.org/MPL/2.0/.

//! Calculate the energy of an image
//!
//! The energy of a pixel is the magnitude of the luminance gradient at
//! that pixel: the image is reduced to a single luminance channel
//! normalized to `[0, 1]`, the horizontal and vertical derivatives are
//! approximated with 3×3 Sobel kernels, and the two are combined as
//! `sqrt(gx² + gy²)`.  Borders are mirrored without repeating the edge
//! pixel (`-1 -> 1`, `n -> n - 2`).

use crate::config::CarveOptions;
use crate::twodmap::{Lattice, TwoDimensionalMap};
use image::{GenericImageView, GrayImage, Luma, Pixel, Primitive};
use num_traits::cast;

/// One non-negative energy per pixel.
pub type EnergyMap = TwoDimensionalMap<f32>;

// Image -> normalized luminance plane.
fn luminance<I, P, S>(image: &I) -> EnergyMap
where
    I: GenericImageView<Pixel = P>,
    P: Pixel<Subpixel = S> + 'static,
    S: Primitive + 'static,
{
    let (width, height) = image.dimensions();
    let max: f32 = cast(S::DEFAULT_MAX_VALUE).unwrap_or(1.0);
    let max = if max > 0.0 { max } else { 1.0 };

    let mut plane = EnergyMap::new(width, height);
    for y in 0..height {
        for x in 0..width {
            let luma = image.get_pixel(x, y).to_luma();
            let value: f32 = cast(luma.channels()[0]).unwrap_or(0.0);
            plane[(x, y)] = value / max;
        }
    }
    plane
}

// Mirror an out-of-range coordinate back into 0..n without repeating
// the edge.  A dimension of one has nowhere to mirror to.
fn reflect(i: i64, n: u32) -> u32 {
    let n = i64::from(n);
    if n <= 1 {
        return 0;
    }
    let mirrored = if i < 0 {
        -i
    } else if i >= n {
        2 * n - 2 - i
    } else {
        i
    };
    mirrored as u32
}

// Fill one output row with the Sobel gradient magnitude.
fn sobel_row(luma: &EnergyMap, y: u32, out: &mut [f32]) {
    let (width, height) = luma.dimensions();
    let up = reflect(i64::from(y) - 1, height);
    let down = reflect(i64::from(y) + 1, height);

    for x in 0..width {
        let left = reflect(i64::from(x) - 1, width);
        let right = reflect(i64::from(x) + 1, width);
        let p = |px: u32, py: u32| luma.get(px, py);

        let gx = (p(right, up) - p(left, up))
            + 2.0 * (p(right, y) - p(left, y))
            + (p(right, down) - p(left, down));
        let gy = (p(left, down) - p(left, up))
            + 2.0 * (p(x, down) - p(x, up))
            + (p(right, down) - p(right, up));

        out[x as usize] = (gx * gx + gy * gy).sqrt();
    }
}

fn sobel_serial(luma: &EnergyMap) -> EnergyMap {
    let mut emap = EnergyMap::new(luma.width(), luma.height());
    for (y, row) in emap.rows_mut().enumerate() {
        sobel_row(luma, y as u32, row);
    }
    emap
}

// The rows of the output are independent of each other, so the map is
// cut into horizontal bands and each band is filled by its own thread.
#[cfg(feature = "threaded")]
fn sobel(luma: &EnergyMap, threads: usize) -> EnergyMap {
    let (width, height) = luma.dimensions();
    if threads <= 1 || height < 2 || luma.is_empty() {
        return sobel_serial(luma);
    }

    let rows_per_band = (height as usize + threads - 1) / threads;
    let band_len = rows_per_band * width as usize;
    let mut emap = EnergyMap::new(width, height);

    let outcome = crossbeam::scope(|scope| {
        for (band, cells) in emap.as_mut_slice().chunks_mut(band_len).enumerate() {
            let first_row = band * rows_per_band;
            scope.spawn(move |_| {
                for (k, row) in cells.chunks_mut(width as usize).enumerate() {
                    sobel_row(luma, (first_row + k) as u32, row);
                }
            });
        }
    });

    if let Err(panic) = outcome {
        std::panic::resume_unwind(panic);
    }
    emap
}

#[cfg(not(feature = "threaded"))]
fn sobel(luma: &EnergyMap, _threads: usize) -> EnergyMap {
    sobel_serial(luma)
}

/// Compute the energy of every pixel in an image.  The map has exactly
/// the image's dimensions; an image with no rows or no columns yields
/// an empty map.
pub fn calculate_energy<I, P, S>(image: &I) -> EnergyMap
where
    I: GenericImageView<Pixel = P>,
    P: Pixel<Subpixel = S> + 'static,
    S: Primitive + 'static,
{
    sobel_serial(&luminance(image))
}

/// As `calculate_energy`, spreading the gradient pass over
/// `options.threads` workers when built with the `threaded` feature.
pub fn calculate_energy_with<I, P, S>(image: &I, options: &CarveOptions) -> EnergyMap
where
    I: GenericImageView<Pixel = P>,
    P: Pixel<Subpixel = S> + 'static,
    S: Primitive + 'static,
{
    sobel(&luminance(image), options.threads)
}

/// Render an energy map as a greyscale image, scaled so that the most
/// energetic pixel is white.  A map with no energy at all is black.
pub fn energy_to_image(energy: &EnergyMap) -> GrayImage {
    let (width, height) = energy.dimensions();
    let factor = energy.as_slice().iter().cloned().fold(0.0f32, f32::max);

    GrayImage::from_fn(width, height, |x, y| {
        if factor <= 0.0 {
            return Luma([0]);
        }
        let scaled = (energy.get(x, y) / factor * 255.0).round();
        Luma([scaled.max(0.0).min(255.0) as u8])
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use image::{ImageBuffer, Rgb};

    const STEP_DATA: [u8; 9] = [0, 0, 255, 0, 0, 255, 0, 0, 255];

    #[test]
    fn energy_has_image_dimensions() {
        let buf: ImageBuffer<Rgb<u8>, _> = ImageBuffer::from_pixel(7, 4, Rgb([10, 20, 30]));
        let energy = calculate_energy(&buf);
        assert_eq!(energy.dimensions(), (7, 4));
    }

    #[test]
    fn flat_image_has_no_energy() {
        let buf: ImageBuffer<Rgb<u8>, _> = ImageBuffer::from_pixel(5, 5, Rgb([90, 90, 90]));
        let energy = calculate_energy(&buf);
        assert!(energy.as_slice().iter().all(|e| *e == 0.0));
    }

    #[test]
    fn vertical_edge_is_energetic() {
        let buf: ImageBuffer<Luma<u8>, _> = ImageBuffer::from_raw(3, 3, &STEP_DATA[..]).unwrap();
        let energy = calculate_energy(&buf);
        for y in 0..3 {
            assert_eq!(energy.row(y), &[0.0, 4.0, 0.0]);
        }
    }

    #[test]
    fn single_pixel_has_no_energy() {
        let buf: ImageBuffer<Luma<u8>, _> = ImageBuffer::from_pixel(1, 1, Luma([200]));
        assert_eq!(calculate_energy(&buf).as_slice(), &[0.0]);
    }

    #[test]
    fn empty_image_yields_empty_map() {
        let buf: ImageBuffer<Luma<u8>, Vec<u8>> = ImageBuffer::new(0, 3);
        let energy = calculate_energy(&buf);
        assert!(energy.is_empty());
        assert_eq!(energy.dimensions(), (0, 3));
    }

    #[test]
    fn reflects_without_repeating_the_edge() {
        assert_eq!(reflect(-1, 5), 1);
        assert_eq!(reflect(5, 5), 3);
        assert_eq!(reflect(2, 5), 2);
        assert_eq!(reflect(-1, 1), 0);
    }

    #[test]
    fn threaded_energy_matches_serial() {
        let buf: ImageBuffer<Luma<u8>, _> =
            ImageBuffer::from_fn(13, 11, |x, y| Luma([((x * 37 + y * 91) % 256) as u8]));
        let options = CarveOptions::new().set_threads(4);
        assert_eq!(calculate_energy_with(&buf, &options), calculate_energy(&buf));
    }

    #[test]
    fn energy_image_scales_to_white() {
        let energy = EnergyMap::from_raw(3, 1, vec![0.0, 2.0, 4.0]).unwrap();
        let img = energy_to_image(&energy);
        assert_eq!(img.into_raw(), vec![0, 128, 255]);
    }
}
