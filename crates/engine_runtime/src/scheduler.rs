//! Frame scheduler.
//!
//! Every tickable engine ticks exactly once per frame, in registration order,
//! with the same delta. The first failing engine ends the frame; engines
//! after it do not tick.

use anyhow::Context;
use tracing::{debug, warn};

use crate::engine::Engine;
use crate::signals::{FrameInput, FrameSignals};

/// Drives tickable engines one frame at a time.
#[derive(Debug, Default)]
pub struct Scheduler {
    frame: u64,
    signals: FrameSignals,
}

impl Scheduler {
    /// Create a new scheduler publishing into `signals`.
    #[must_use]
    pub fn new(signals: FrameSignals) -> Self {
        Self { frame: 0, signals }
    }

    /// Number of frames started so far.
    #[must_use]
    pub fn frame(&self) -> u64 {
        self.frame
    }

    /// The signals handle this scheduler publishes into.
    #[must_use]
    pub fn signals(&self) -> &FrameSignals {
        &self.signals
    }

    /// Publish `input` and tick every tickable engine once.
    ///
    /// A negative or non-finite `delta` is treated as zero.
    ///
    /// # Errors
    ///
    /// Returns the first engine error, annotated with the engine name and
    /// frame number.
    pub fn run_frame(
        &mut self,
        engines: &mut [Box<dyn Engine>],
        delta: f32,
        input: FrameInput,
    ) -> anyhow::Result<()> {
        self.frame += 1;
        let delta = if delta.is_finite() && delta >= 0.0 {
            delta
        } else {
            warn!(frame = self.frame, delta, "invalid frame delta, using 0");
            0.0
        };

        self.signals.publish(self.frame, delta, input);
        debug!(
            frame = self.frame,
            delta,
            primary_action = input.primary_action,
            paused = input.paused,
            "frame start"
        );

        for engine in engines.iter_mut() {
            let name = engine.name();
            let frame = self.frame;
            if let Some(tickable) = engine.as_tickable() {
                tickable
                    .tick(delta)
                    .with_context(|| format!("engine `{name}` failed on frame {frame}"))?;
            }
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use std::cell::RefCell;
    use std::rc::Rc;

    use super::*;
    use crate::engine::Tickable;

    struct Counter {
        name: &'static str,
        seen: Rc<RefCell<Vec<(&'static str, f32)>>>,
        fail: bool,
    }

    impl Engine for Counter {
        fn name(&self) -> &'static str {
            self.name
        }
        fn as_tickable(&mut self) -> Option<&mut dyn Tickable> {
            Some(self)
        }
    }

    impl Tickable for Counter {
        fn tick(&mut self, delta: f32) -> anyhow::Result<()> {
            self.seen.borrow_mut().push((self.name, delta));
            if self.fail {
                anyhow::bail!("out of ammo");
            }
            Ok(())
        }
    }

    struct Passive;

    impl Engine for Passive {
        fn name(&self) -> &'static str {
            "passive"
        }
    }

    fn engines(
        seen: &Rc<RefCell<Vec<(&'static str, f32)>>>,
        failing: Option<&'static str>,
    ) -> Vec<Box<dyn Engine>> {
        ["a", "b", "c"]
            .into_iter()
            .map(|name| {
                Box::new(Counter {
                    name,
                    seen: Rc::clone(seen),
                    fail: failing == Some(name),
                }) as Box<dyn Engine>
            })
            .chain(std::iter::once(Box::new(Passive) as Box<dyn Engine>))
            .collect()
    }

    #[test]
    fn test_ticks_in_registration_order() {
        let seen = Rc::default();
        let mut engines = engines(&seen, None);
        let mut scheduler = Scheduler::default();

        scheduler
            .run_frame(&mut engines, 0.1, FrameInput::default())
            .unwrap();

        assert_eq!(*seen.borrow(), vec![("a", 0.1), ("b", 0.1), ("c", 0.1)]);
        assert_eq!(scheduler.frame(), 1);
    }

    #[test]
    fn test_failure_stops_the_frame() {
        let seen = Rc::default();
        let mut engines = engines(&seen, Some("b"));
        let mut scheduler = Scheduler::default();

        let err = scheduler
            .run_frame(&mut engines, 0.1, FrameInput::default())
            .unwrap_err();

        assert_eq!(err.to_string(), "engine `b` failed on frame 1");
        assert_eq!(err.root_cause().to_string(), "out of ammo");
        assert_eq!(seen.borrow().len(), 2);
    }

    #[test]
    fn test_bad_delta_clamped_to_zero() {
        let seen = Rc::default();
        let mut engines = engines(&seen, None);
        let mut scheduler = Scheduler::default();

        scheduler
            .run_frame(&mut engines, -1.0, FrameInput::default())
            .unwrap();
        scheduler
            .run_frame(&mut engines, f32::NAN, FrameInput::default())
            .unwrap();

        assert!(seen.borrow().iter().all(|&(_, delta)| delta == 0.0));
    }

    #[test]
    fn test_input_published_before_ticking() {
        let signals = FrameSignals::new();
        let mut scheduler = Scheduler::new(signals.clone());
        scheduler
            .run_frame(&mut [], 0.5, FrameInput::firing())
            .unwrap();

        assert!(signals.primary_action());
        assert_eq!(signals.frame(), 1);
        assert_eq!(signals.delta(), 0.5);
    }
}
