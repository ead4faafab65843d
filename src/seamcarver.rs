// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at http://mozilla.org/MPL/2.0/.

//! Seamcarve - The main routine
//!
//! Seam removal for both orientations, and the carver that drives
//! energy → seam → removal until the image reaches its target size.
//!
//! The carver owns its image outright.  Each removal builds a new,
//! smaller buffer from the old one and the old one is dropped, so there
//! is never more than one live grid between iterations.

use crate::config::CarveOptions;
use crate::energy::calculate_energy_with;
use crate::error::{CarveError, Result};
use crate::metrics::{CarveMetrics, Stage};
use crate::seamfinder::{check_path, Orientation, Seam, SeamFinder};
use image::{GenericImageView, ImageBuffer, Pixel, Primitive};
use std::time::Instant;
use tracing::{debug, info, warn};

/// Remove one pixel from every row, at the column given by `seam`.
/// Pixels left of the seam keep their place; pixels right of it move
/// one column left.  Nothing is blended.
pub fn remove_vertical_seam<I, P, S>(image: &I, seam: &[u32]) -> Result<ImageBuffer<P, Vec<S>>>
where
    I: GenericImageView<Pixel = P>,
    P: Pixel<Subpixel = S> + 'static,
    S: Primitive + 'static,
{
    let (width, height) = image.dimensions();
    if width <= 1 {
        return Err(CarveError::WouldEmpty {
            orientation: Orientation::Vertical,
            width,
            height,
        });
    }
    check_path(Orientation::Vertical, seam, height, width)?;

    let mut imgbuf = ImageBuffer::new(width - 1, height);
    for (y, &cut) in seam.iter().enumerate() {
        let y = y as u32;
        for x in 0..cut {
            imgbuf.put_pixel(x, y, image.get_pixel(x, y));
        }
        for x in (cut + 1)..width {
            imgbuf.put_pixel(x - 1, y, image.get_pixel(x, y));
        }
    }
    Ok(imgbuf)
}

/// Remove one pixel from every column, at the row given by `seam`.
/// The transposed twin of `remove_vertical_seam`.
pub fn remove_horizontal_seam<I, P, S>(
    image: &I,
    seam: &[u32],
) -> Result<ImageBuffer<P, Vec<S>>>
where
    I: GenericImageView<Pixel = P>,
    P: Pixel<Subpixel = S> + 'static,
    S: Primitive + 'static,
{
    let (width, height) = image.dimensions();
    if height <= 1 {
        return Err(CarveError::WouldEmpty {
            orientation: Orientation::Horizontal,
            width,
            height,
        });
    }
    check_path(Orientation::Horizontal, seam, width, height)?;

    let mut imgbuf = ImageBuffer::new(width, height - 1);
    for (x, &cut) in seam.iter().enumerate() {
        let x = x as u32;
        for y in 0..cut {
            imgbuf.put_pixel(x, y, image.get_pixel(x, y));
        }
        for y in (cut + 1)..height {
            imgbuf.put_pixel(x, y - 1, image.get_pixel(x, y));
        }
    }
    Ok(imgbuf)
}

/// Remove `seam` in whichever direction it runs.
pub fn remove_seam<I, P, S>(image: &I, seam: &Seam) -> Result<ImageBuffer<P, Vec<S>>>
where
    I: GenericImageView<Pixel = P>,
    P: Pixel<Subpixel = S> + 'static,
    S: Primitive + 'static,
{
    match seam.orientation() {
        Orientation::Vertical => remove_vertical_seam(image, seam.indices()),
        Orientation::Horizontal => remove_horizontal_seam(image, seam.indices()),
    }
}

// Decide which dimension to shrink next.  When both still need work,
// the one with the larger share of its size left to remove goes first,
// and width wins a tie; this keeps the two axes shrinking in
// proportion instead of exhausting one before touching the other.
pub(crate) fn next_orientation(
    (width, height): (u32, u32),
    (target_width, target_height): (u32, u32),
) -> Option<Orientation> {
    let remaining_width = width.saturating_sub(target_width);
    let remaining_height = height.saturating_sub(target_height);
    match (remaining_width > 0, remaining_height > 0) {
        (false, false) => None,
        (true, false) => Some(Orientation::Vertical),
        (false, true) => Some(Orientation::Horizontal),
        (true, true) => {
            let width_share = f64::from(remaining_width) / f64::from(width);
            let height_share = f64::from(remaining_height) / f64::from(height);
            if width_share >= height_share {
                Some(Orientation::Vertical)
            } else {
                Some(Orientation::Horizontal)
            }
        }
    }
}

/// Where a carver is in its resize.
#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub enum CarveState {
    /// Seams remain to be removed.
    Running,
    /// The target was reached, or there was nothing left to search.
    Done,
    /// The target was refused and the image was not touched.
    Rejected,
}

/// What an observer sees after every removal.
pub struct CarveStep<'a, P, S>
where
    P: Pixel<Subpixel = S> + 'static,
    S: Primitive + 'static,
{
    /// The image as it is now, with the seam already gone.
    pub image: &'a ImageBuffer<P, Vec<S>>,
    /// The seam that was just removed.
    pub seam: &'a Seam,
    pub before: (u32, u32),
    pub after: (u32, u32),
}

impl<'a, P, S> CarveStep<'a, P, S>
where
    P: Pixel<Subpixel = S> + 'static,
    S: Primitive + 'static,
{
    pub fn orientation(&self) -> Orientation {
        self.seam.orientation()
    }
}

/// Receives progress from `SeamCarver::carve_with`.  Any
/// `FnMut(&CarveStep)` closure will do.  The carver never depends on
/// what an observer does.
pub trait CarveObserver<P, S>
where
    P: Pixel<Subpixel = S> + 'static,
    S: Primitive + 'static,
{
    fn on_seam(&mut self, step: &CarveStep<'_, P, S>);
}

impl<P, S, F> CarveObserver<P, S> for F
where
    P: Pixel<Subpixel = S> + 'static,
    S: Primitive + 'static,
    F: FnMut(&CarveStep<'_, P, S>),
{
    fn on_seam(&mut self, step: &CarveStep<'_, P, S>) {
        self(step)
    }
}

/// How many seams a resize removed, and where it ended up.
#[derive(Debug, Default, Copy, Clone, PartialEq, Eq)]
pub struct CarveSummary {
    pub vertical: u32,
    pub horizontal: u32,
    pub width: u32,
    pub height: u32,
}

/// A struct for holding the image to be carved.
pub struct SeamCarver<P, S>
where
    P: Pixel<Subpixel = S> + 'static,
    S: Primitive + 'static,
{
    image: ImageBuffer<P, Vec<S>>,
    options: CarveOptions,
    state: CarveState,
    target: Option<(u32, u32)>,
    removed: (u32, u32),
}

impl<P, S> SeamCarver<P, S>
where
    P: Pixel<Subpixel = S> + 'static,
    S: Primitive + 'static,
{
    /// Take ownership of an image to be carved.
    pub fn new(image: ImageBuffer<P, Vec<S>>) -> Self {
        SeamCarver {
            image,
            options: CarveOptions::default(),
            state: CarveState::Done,
            target: None,
            removed: (0, 0),
        }
    }

    /// Copy any image view into a carver of its own.
    pub fn from_view<I>(image: &I) -> Self
    where
        I: GenericImageView<Pixel = P>,
    {
        let (width, height) = image.dimensions();
        Self::new(ImageBuffer::from_fn(width, height, |x, y| {
            image.get_pixel(x, y)
        }))
    }

    pub fn with_options(mut self, options: CarveOptions) -> Self {
        self.options = options;
        self
    }

    pub fn options(&self) -> &CarveOptions {
        &self.options
    }

    pub fn image(&self) -> &ImageBuffer<P, Vec<S>> {
        &self.image
    }

    /// Hand the image back.
    pub fn into_image(self) -> ImageBuffer<P, Vec<S>> {
        self.image
    }

    pub fn dimensions(&self) -> (u32, u32) {
        self.image.dimensions()
    }

    pub fn state(&self) -> CarveState {
        self.state
    }

    pub fn target(&self) -> Option<(u32, u32)> {
        self.target
    }

    /// Seams removed since the last `set_target`, as
    /// `(vertical, horizontal)`.
    pub fn removed(&self) -> (u32, u32) {
        self.removed
    }

    /// Aim the carver at a new size.  A zero target, or one that asks
    /// for nothing to be removed, is refused and leaves the carver
    /// `Rejected` with its image untouched.
    pub fn set_target(&mut self, width: u32, height: u32) -> Result<()> {
        let (current_width, current_height) = self.dimensions();
        self.removed = (0, 0);

        if width == 0 || height == 0 || (width >= current_width && height >= current_height) {
            warn!(
                width,
                height, current_width, current_height, "rejected target size"
            );
            self.state = CarveState::Rejected;
            self.target = None;
            return Err(CarveError::InvalidTarget {
                width: i64::from(width),
                height: i64::from(height),
                current_width,
                current_height,
            });
        }

        self.state = CarveState::Running;
        self.target = Some((width, height));
        Ok(())
    }

    /// Remove one seam.
    pub fn step(&mut self) -> Result<Option<Seam>> {
        self.step_with(&mut ())
    }

    /// Remove one seam, reporting stage timings to `metrics`.  Returns
    /// the seam that was removed, or `None` once the carver is no
    /// longer `Running`.  Between two calls is the only place a host
    /// can stop a resize.
    pub fn step_with<M: CarveMetrics>(&mut self, metrics: &mut M) -> Result<Option<Seam>> {
        let target = match (self.state, self.target) {
            (CarveState::Running, Some(target)) => target,
            _ => return Ok(None),
        };

        let orientation = match next_orientation(self.dimensions(), target) {
            Some(orientation) => orientation,
            None => {
                self.state = CarveState::Done;
                return Ok(None);
            }
        };

        let clock = Instant::now();
        let energy = calculate_energy_with(&self.image, &self.options);
        metrics.record(Stage::Energy, clock.elapsed());

        let clock = Instant::now();
        let seam = self.options.strategy.find_seam(&energy, orientation);
        metrics.record(Stage::SeamSearch, clock.elapsed());

        if seam.is_empty() {
            let (width, height) = self.dimensions();
            warn!(%orientation, width, height, "no seam to remove, stopping");
            self.state = CarveState::Done;
            return Ok(None);
        }

        let clock = Instant::now();
        self.image = remove_seam(&self.image, &seam)?;
        metrics.record(Stage::SeamRemoval, clock.elapsed());

        match orientation {
            Orientation::Vertical => self.removed.0 += 1,
            Orientation::Horizontal => self.removed.1 += 1,
        }
        let (width, height) = self.dimensions();
        debug!(%orientation, width, height, "removed seam");
        Ok(Some(seam))
    }

    /// Repeatedly carve seams out of the image until it is `width` by
    /// `height`.
    pub fn carve(&mut self, width: u32, height: u32) -> Result<CarveSummary> {
        self.carve_with(width, height, &mut |_: &CarveStep<'_, P, S>| {}, &mut ())
    }

    /// As `carve`, telling `observer` about every removal and `metrics`
    /// about every stage.
    pub fn carve_with<O, M>(
        &mut self,
        width: u32,
        height: u32,
        observer: &mut O,
        metrics: &mut M,
    ) -> Result<CarveSummary>
    where
        O: CarveObserver<P, S>,
        M: CarveMetrics,
    {
        self.set_target(width, height)?;
        let (start_width, start_height) = self.dimensions();
        info!(
            start_width,
            start_height,
            width,
            height,
            strategy = ?self.options.strategy,
            "carving"
        );

        loop {
            let before = self.dimensions();
            match self.step_with(metrics)? {
                Some(seam) => observer.on_seam(&CarveStep {
                    image: &self.image,
                    seam: &seam,
                    before,
                    after: self.dimensions(),
                }),
                None => break,
            }
        }

        let (final_width, final_height) = self.dimensions();
        let summary = CarveSummary {
            vertical: self.removed.0,
            horizontal: self.removed.1,
            width: final_width,
            height: final_height,
        };
        info!(
            vertical = summary.vertical,
            horizontal = summary.horizontal,
            final_width,
            final_height,
            "carve finished"
        );
        Ok(summary)
    }
}

/// Given an image and a desired new width and height, carve seams out
/// of a copy of the image until it fits.  The original is never
/// touched.
pub fn seamcarve<I, P, S>(image: &I, width: u32, height: u32) -> Result<ImageBuffer<P, Vec<S>>>
where
    I: GenericImageView<Pixel = P>,
    P: Pixel<Subpixel = S> + 'static,
    S: Primitive + 'static,
{
    seamcarve_with(image, width, height, CarveOptions::default())
}

/// `seamcarve` with explicit options.
pub fn seamcarve_with<I, P, S>(
    image: &I,
    width: u32,
    height: u32,
    options: CarveOptions,
) -> Result<ImageBuffer<P, Vec<S>>>
where
    I: GenericImageView<Pixel = P>,
    P: Pixel<Subpixel = S> + 'static,
    S: Primitive + 'static,
{
    let mut carver = SeamCarver::from_view(image).with_options(options);
    carver.carve(width, height)?;
    Ok(carver.into_image())
}
