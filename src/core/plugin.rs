//! CorePlugin wires global timing, pause control, and tick ordering.
use std::collections::HashSet;
use std::time::Duration;

use bevy::prelude::*;

const DEFAULT_TIME_SCALE: f32 = 1.0;
const MIN_TIME_SCALE: f32 = 0.001;

/// Fixed ordering of the per-tick interaction pipeline.
///
/// Input sampling happens first, then chat session bookkeeping, then
/// targeting/gathering/dispatch, and finally the UI surfaces.
#[derive(SystemSet, Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum TickSet {
    Input,
    Session,
    Act,
    Surface,
}

/// Tracks scaled simulation time derived from real frame deltas.
///
/// While the simulation is paused the scaled delta is zero, so every system
/// driven by this clock freezes without extra checks.
#[derive(Resource, Debug)]
pub struct SimulationClock {
    time_scale: f32,
    last_scaled_delta: Duration,
    elapsed: Duration,
}

impl SimulationClock {
    pub fn new(time_scale: f32) -> Self {
        Self {
            time_scale: time_scale.max(MIN_TIME_SCALE),
            last_scaled_delta: Duration::ZERO,
            elapsed: Duration::ZERO,
        }
    }

    pub fn time_scale(&self) -> f32 {
        self.time_scale
    }

    /// Scaled delta of the most recent tick.
    pub fn last_scaled_delta(&self) -> Duration {
        self.last_scaled_delta
    }

    /// Total scaled time accumulated since startup.
    #[cfg_attr(not(test), allow(dead_code))]
    pub fn elapsed(&self) -> Duration {
        self.elapsed
    }

    pub fn tick(&mut self, real_delta: Duration) {
        self.last_scaled_delta = real_delta.mul_f32(self.time_scale);
        self.elapsed += self.last_scaled_delta;
    }
}

impl Default for SimulationClock {
    fn default() -> Self {
        Self::new(DEFAULT_TIME_SCALE)
    }
}

/// Owners that can hold the simulation paused.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum PauseSource {
    ChatModal,
    #[cfg_attr(not(test), allow(dead_code))]
    Scripted,
}

/// Claim-counted pause switch.
///
/// Acquire and release are idempotent per source, so redundant calls from the
/// same owner are safe, and one owner releasing never unpauses the world while
/// another owner still holds a claim.
#[derive(Resource, Debug, Default)]
pub struct SimulationPause {
    claims: HashSet<PauseSource>,
}

impl SimulationPause {
    /// Returns true if the claim was newly taken.
    pub fn acquire(&mut self, source: PauseSource) -> bool {
        self.claims.insert(source)
    }

    /// Returns true if the claim was actually held.
    pub fn release(&mut self, source: PauseSource) -> bool {
        self.claims.remove(&source)
    }

    pub fn is_paused(&self) -> bool {
        !self.claims.is_empty()
    }
}

/// Registers simulation timing resources and the tick ordering sets.
#[derive(Debug, Clone, Copy)]
pub struct CorePlugin {
    time_scale: f32,
}

impl CorePlugin {
    pub const fn with_time_scale(time_scale: f32) -> Self {
        Self { time_scale }
    }
}

impl Default for CorePlugin {
    fn default() -> Self {
        Self::with_time_scale(DEFAULT_TIME_SCALE)
    }
}

impl Plugin for CorePlugin {
    fn build(&self, app: &mut App) {
        app.insert_resource(SimulationClock::new(self.time_scale))
            .init_resource::<SimulationPause>()
            .configure_sets(
                Update,
                (
                    TickSet::Input,
                    TickSet::Session,
                    TickSet::Act,
                    TickSet::Surface,
                )
                    .chain(),
            )
            .add_systems(Startup, log_startup_time_scale)
            .add_systems(Update, update_simulation_clock.before(TickSet::Input));
    }
}

fn update_simulation_clock(
    mut clock: ResMut<SimulationClock>,
    pause: Res<SimulationPause>,
    time: Res<Time>,
) {
    let delta = if pause.is_paused() {
        Duration::ZERO
    } else {
        time.delta()
    };
    clock.tick(delta);
}

fn log_startup_time_scale(clock: Res<SimulationClock>) {
    info!(
        "CorePlugin initialised with time scale: {:.3}",
        clock.time_scale()
    );
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn clock_scales_delta_with_multiplier() {
        let mut clock = SimulationClock::new(2.0);
        clock.tick(Duration::from_millis(500));

        assert_eq!(clock.last_scaled_delta(), Duration::from_secs(1));
        assert_eq!(clock.elapsed(), Duration::from_secs(1));
    }

    #[test]
    fn clock_clamps_min_time_scale() {
        let clock = SimulationClock::new(0.0);
        assert!((clock.time_scale() - MIN_TIME_SCALE).abs() < f32::EPSILON);
    }

    #[test]
    fn pause_claims_are_idempotent() {
        let mut pause = SimulationPause::default();
        assert!(!pause.is_paused());

        assert!(pause.acquire(PauseSource::ChatModal));
        assert!(!pause.acquire(PauseSource::ChatModal));
        assert!(pause.is_paused());

        assert!(pause.release(PauseSource::ChatModal));
        assert!(!pause.release(PauseSource::ChatModal));
        assert!(!pause.is_paused());
    }

    #[test]
    fn pause_holds_until_every_claim_is_released() {
        let mut pause = SimulationPause::default();
        pause.acquire(PauseSource::ChatModal);
        pause.acquire(PauseSource::Scripted);

        pause.release(PauseSource::ChatModal);
        assert!(pause.is_paused());

        pause.release(PauseSource::Scripted);
        assert!(!pause.is_paused());
    }
}
