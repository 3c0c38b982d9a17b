//! Tick-driven ownership of the live [`SpriteSet`].
//!
//! [`AnimationDriver`] is the single writer: each tick it steps the current
//! set and publishes the result as an `Arc<SpriteSet>`. Renderers either get
//! the snapshot directly or hold a [`SnapshotReader`], which can live on
//! another thread and only ever sees complete, immutable sets.

use std::sync::{Arc, PoisonError, RwLock};
use std::time::Duration;

use rand::rngs::SmallRng;
use rand::{Rng, SeedableRng};

use crate::error::SpriteError;
use crate::motion::MotionSimulator;
use crate::sprite::SpriteSet;

/// Interval between animation frames, `floor(1000 / 60)` ms.
pub const FRAME_INTERVAL_MS: u64 = 16;
/// Simulation time advanced per frame.
pub const DEFAULT_DT: f64 = 1.0 / 50.0;

/// Supplies the time delta for each tick.
pub trait TickSource {
    fn next_dt(&mut self) -> f64;
}

/// Constant time step.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct FixedTick {
    dt: f64,
}

impl FixedTick {
    pub fn new(dt: f64) -> Self {
        Self { dt }
    }

    pub fn dt(&self) -> f64 {
        self.dt
    }

    /// Wall-clock interval a scheduler should wait between ticks.
    pub fn frame_interval(&self) -> Duration {
        Duration::from_millis(FRAME_INTERVAL_MS)
    }
}

impl Default for FixedTick {
    fn default() -> Self {
        Self::new(DEFAULT_DT)
    }
}

impl TickSource for FixedTick {
    fn next_dt(&mut self) -> f64 {
        self.dt
    }
}

impl<F: FnMut() -> f64> TickSource for F {
    fn next_dt(&mut self) -> f64 {
        self()
    }
}

/// Read-only consumer of published sprite sets.
pub trait SpriteRenderer {
    type Error;

    fn draw(&mut self, sprites: &SpriteSet) -> Result<(), Self::Error>;
}

type Slot = Arc<RwLock<Arc<SpriteSet>>>;

/// Cloneable handle onto the driver's latest published set.
#[derive(Debug, Clone)]
pub struct SnapshotReader {
    slot: Slot,
}

impl SnapshotReader {
    /// The most recently published set. The lock is held only for the
    /// pointer clone.
    pub fn latest(&self) -> Arc<SpriteSet> {
        Arc::clone(&self.slot.read().unwrap_or_else(PoisonError::into_inner))
    }
}

/// Owns the current sprite set and advances it once per tick.
pub struct AnimationDriver<T = FixedTick, R = SmallRng> {
    current: Arc<SpriteSet>,
    published: Slot,
    simulator: MotionSimulator,
    ticks: T,
    rng: R,
    tick_count: u64,
}

impl AnimationDriver<FixedTick, SmallRng> {
    /// Driver with the default fixed step and an entropy-seeded RNG.
    pub fn with_defaults(initial: SpriteSet, simulator: MotionSimulator) -> Self {
        Self::new(initial, simulator, FixedTick::default(), SmallRng::from_entropy())
    }
}

impl<T: TickSource, R: Rng> AnimationDriver<T, R> {
    pub fn new(initial: SpriteSet, simulator: MotionSimulator, ticks: T, rng: R) -> Self {
        let current = Arc::new(initial);
        Self {
            published: Arc::new(RwLock::new(Arc::clone(&current))),
            current,
            simulator,
            ticks,
            rng,
            tick_count: 0,
        }
    }

    /// Latest published set.
    pub fn snapshot(&self) -> Arc<SpriteSet> {
        Arc::clone(&self.current)
    }

    /// Handle that observes every future publish.
    pub fn reader(&self) -> SnapshotReader {
        SnapshotReader {
            slot: Arc::clone(&self.published),
        }
    }

    /// Number of ticks that completed successfully.
    pub fn ticks(&self) -> u64 {
        self.tick_count
    }

    pub fn simulator(&self) -> &MotionSimulator {
        &self.simulator
    }

    /// Runs one motion step and publishes the result.
    ///
    /// On failure the previous snapshot stays published and the error is
    /// returned for the caller to act on.
    pub fn tick(&mut self) -> Result<Arc<SpriteSet>, SpriteError> {
        let dt = self.ticks.next_dt();
        match self.simulator.step(&self.current, dt, &mut self.rng) {
            Ok(next) => {
                self.tick_count += 1;
                self.publish(next);
                Ok(self.snapshot())
            }
            Err(e) => {
                log::warn!("tick {} skipped: {e}", self.tick_count + 1);
                Err(e)
            }
        }
    }

    /// Runs `n` ticks, stopping at the first failure.
    pub fn run(&mut self, n: usize) -> Result<Arc<SpriteSet>, SpriteError> {
        for _ in 0..n {
            self.tick()?;
        }
        Ok(self.snapshot())
    }

    /// Replaces the live set wholesale, e.g. after the sprite count changed.
    pub fn regenerate(&mut self, sprites: SpriteSet) {
        log::debug!("regenerated sprite set with {} sprites", sprites.len());
        self.tick_count = 0;
        self.publish(sprites);
    }

    /// Hands the latest snapshot to `renderer`.
    pub fn render<S: SpriteRenderer>(&self, renderer: &mut S) -> Result<(), S::Error> {
        renderer.draw(&self.current)
    }

    fn publish(&mut self, sprites: SpriteSet) {
        self.current = Arc::new(sprites);
        *self
            .published
            .write()
            .unwrap_or_else(PoisonError::into_inner) = Arc::clone(&self.current);
    }
}
