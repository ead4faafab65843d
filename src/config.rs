// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at http://mozilla.org/MPL/2.0/.

//! Carving options
//!
//! Everything that used to be a compile-time switch is chosen here, at
//! call time.

use crate::seamfinder::SeamStrategy;

/// Options for a single resize.
#[derive(Clone, Debug, PartialEq)]
pub struct CarveOptions {
    /// How seams are searched for.
    pub strategy: SeamStrategy,

    /// Worker threads for the energy pass.  Only consulted when the
    /// crate is built with the `threaded` feature; `1` always takes the
    /// serial path.
    pub threads: usize,
}

impl Default for CarveOptions {
    fn default() -> Self {
        Self {
            strategy: SeamStrategy::default(),
            threads: default_threads(),
        }
    }
}

#[cfg(feature = "threaded")]
fn default_threads() -> usize {
    num_cpus::get()
}

#[cfg(not(feature = "threaded"))]
fn default_threads() -> usize {
    1
}

impl CarveOptions {
    pub fn new() -> Self {
        Self::default()
    }

    // Set the seam strategy
    pub fn set_strategy(mut self, strategy: SeamStrategy) -> Self {
        self.strategy = strategy;
        self
    }

    // Set the worker count; zero is treated as one
    pub fn set_threads(mut self, threads: usize) -> Self {
        self.threads = threads.max(1);
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_to_dynamic_programming() {
        assert_eq!(CarveOptions::new().strategy, SeamStrategy::DynamicProgramming);
        assert!(CarveOptions::new().threads >= 1);
    }

    #[test]
    fn builder_sets_fields() {
        let options = CarveOptions::new()
            .set_strategy(SeamStrategy::Greedy)
            .set_threads(0);
        assert_eq!(options.strategy, SeamStrategy::Greedy);
        assert_eq!(options.threads, 1);
    }
}
