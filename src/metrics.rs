// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at http://mozilla.org/MPL/2.0/.

//! Per-stage timing
//!
//! A carve can be handed a collector that is told how long each stage
//! of every iteration took.  The collector belongs to the caller and
//! lives exactly as long as the caller wants it to.

use std::fmt;
use std::time::Duration;

/// The three stages of one carving iteration.
#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub enum Stage {
    Energy,
    SeamSearch,
    SeamRemoval,
}

impl Stage {
    const ALL: [Stage; 3] = [Stage::Energy, Stage::SeamSearch, Stage::SeamRemoval];

    fn slot(self) -> usize {
        match self {
            Stage::Energy => 0,
            Stage::SeamSearch => 1,
            Stage::SeamRemoval => 2,
        }
    }
}

impl fmt::Display for Stage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Stage::Energy => "energy",
            Stage::SeamSearch => "seam search",
            Stage::SeamRemoval => "seam removal",
        };
        f.write_str(name)
    }
}

/// Receives one call per completed stage.
pub trait CarveMetrics {
    fn record(&mut self, stage: Stage, elapsed: Duration);
}

/// Discards everything.
impl CarveMetrics for () {
    fn record(&mut self, _stage: Stage, _elapsed: Duration) {}
}

/// Call counts and cumulative durations for each stage.
#[derive(Debug, Default, Clone)]
pub struct StageTimings {
    calls: [u64; 3],
    totals: [Duration; 3],
}

impl StageTimings {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn calls(&self, stage: Stage) -> u64 {
        self.calls[stage.slot()]
    }

    pub fn total(&self, stage: Stage) -> Duration {
        self.totals[stage.slot()]
    }

    /// Mean time per call, or zero if the stage never ran.
    pub fn average(&self, stage: Stage) -> Duration {
        match self.calls(stage) {
            0 => Duration::from_secs(0),
            n => self.total(stage) / n as u32,
        }
    }
}

impl CarveMetrics for StageTimings {
    fn record(&mut self, stage: Stage, elapsed: Duration) {
        self.calls[stage.slot()] += 1;
        self.totals[stage.slot()] += elapsed;
    }
}

impl fmt::Display for StageTimings {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for (i, stage) in Stage::ALL.iter().enumerate() {
            if i > 0 {
                f.write_str("; ")?;
            }
            write!(
                f,
                "{}: {} calls, {:?} total",
                stage,
                self.calls(*stage),
                self.total(*stage)
            )?;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn accumulates_per_stage() {
        let mut timings = StageTimings::new();
        timings.record(Stage::Energy, Duration::from_millis(3));
        timings.record(Stage::Energy, Duration::from_millis(5));
        timings.record(Stage::SeamRemoval, Duration::from_millis(1));

        assert_eq!(timings.calls(Stage::Energy), 2);
        assert_eq!(timings.total(Stage::Energy), Duration::from_millis(8));
        assert_eq!(timings.average(Stage::Energy), Duration::from_millis(4));
        assert_eq!(timings.calls(Stage::SeamSearch), 0);
        assert_eq!(timings.average(Stage::SeamSearch), Duration::from_secs(0));
    }

    #[test]
    fn summary_names_every_stage() {
        let summary = StageTimings::new().to_string();
        assert!(summary.contains("energy: 0 calls"));
        assert!(summary.contains("seam search: 0 calls"));
        assert!(summary.contains("seam removal: 0 calls"));
    }
}
