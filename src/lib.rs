// #![deny(missing_docs)]

//! Content-aware image shrinking.
//!
//! An image is shrunk by repeatedly finding the connected path of
//! pixels ("seam") with the least total energy and cutting it out,
//! interleaving column and row removals until the target size is
//! reached.

extern crate image;

pub mod config;
pub mod energy;
pub mod error;
pub mod flipper;
pub mod metrics;
pub mod seamcarver;
pub mod seamfinder;
pub mod twodmap;

pub use config::CarveOptions;
pub use energy::{calculate_energy, calculate_energy_with, energy_to_image, EnergyMap};
pub use error::{CarveError, Result};
pub use metrics::{CarveMetrics, Stage, StageTimings};
pub use seamcarver::{
    remove_horizontal_seam, remove_seam, remove_vertical_seam, seamcarve, seamcarve_with,
    CarveObserver, CarveState, CarveStep, CarveSummary, SeamCarver,
};
pub use seamfinder::{
    energy_to_horizontal_seam, energy_to_vertical_seam, Orientation, Seam, SeamFinder,
    SeamStrategy,
};
pub use twodmap::{Lattice, TwoDimensionalMap};
