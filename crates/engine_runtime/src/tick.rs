//! Fixed-timestep tick loop.
//!
//! Drives an [`EnginesRoot`] at a constant rate:
//!
//! 1. Sample input for the frame from the host.
//! 2. Tick every engine with the fixed delta.
//! 3. Flush removals requested during the frame.
//! 4. Sleep whatever is left of the frame budget.

use std::time::{Duration, Instant};

use serde::{Deserialize, Serialize};
use tracing::{info, warn};

use crate::error::RuntimeError;
use crate::root::EnginesRoot;
use crate::signals::FrameInput;

/// Configuration for the tick loop.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct TickConfig {
    /// Target ticks per second.
    pub tick_rate: f64,
    /// Maximum number of ticks to run (0 = unlimited).
    pub max_ticks: u64,
}

impl Default for TickConfig {
    fn default() -> Self {
        Self {
            tick_rate: 60.0,
            max_ticks: 0,
        }
    }
}

impl TickConfig {
    /// Seconds per tick.
    ///
    /// # Errors
    ///
    /// [`RuntimeError::InvalidTickRate`] unless the rate is positive and
    /// finite.
    pub fn delta(&self) -> Result<f64, RuntimeError> {
        if self.tick_rate.is_finite() && self.tick_rate > 0.0 {
            Ok(1.0 / self.tick_rate)
        } else {
            Err(RuntimeError::InvalidTickRate(self.tick_rate))
        }
    }
}

/// Runs frames against a root at the configured rate.
#[derive(Debug)]
pub struct TickLoop {
    /// Ticks completed by this loop.
    tick_count: u64,
    config: TickConfig,
}

impl TickLoop {
    /// Create a new tick loop with the given configuration.
    #[must_use]
    pub fn new(config: TickConfig) -> Self {
        Self {
            tick_count: 0,
            config,
        }
    }

    /// Returns the number of ticks run so far.
    #[must_use]
    pub fn tick_count(&self) -> u64 {
        self.tick_count
    }

    #[must_use]
    pub fn config(&self) -> &TickConfig {
        &self.config
    }

    /// Run until `max_ticks` is reached, or forever when it is 0.
    ///
    /// `sample` is called once per tick with the upcoming tick number
    /// (starting at 1) and returns that frame's input.
    ///
    /// # Errors
    ///
    /// An invalid tick rate, or the first engine failure, which stops the
    /// loop.
    pub fn run<F>(&mut self, root: &mut EnginesRoot, mut sample: F) -> anyhow::Result<()>
    where
        F: FnMut(u64) -> FrameInput,
    {
        let dt = self.config.delta()?;
        let tick_duration = Duration::from_secs_f64(dt);

        info!(
            tick_rate = self.config.tick_rate,
            max_ticks = self.config.max_ticks,
            "starting tick loop"
        );

        loop {
            let start = Instant::now();

            let input = sample(self.tick_count + 1);
            root.tick(dt as f32, input)?;

            self.tick_count += 1;
            if self.config.max_ticks > 0 && self.tick_count >= self.config.max_ticks {
                info!(ticks = self.tick_count, "tick loop complete");
                return Ok(());
            }

            let elapsed = start.elapsed();
            if elapsed < tick_duration {
                std::thread::sleep(tick_duration - elapsed);
            } else {
                warn!(
                    tick = self.tick_count,
                    elapsed_ms = elapsed.as_millis() as u64,
                    budget_ms = tick_duration.as_millis() as u64,
                    "tick exceeded time budget"
                );
            }
        }
    }
}
