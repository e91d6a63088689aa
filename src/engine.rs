//! The engine facade: one owned `GameState`, command entry points for the
//! UI collaborator, and the run clock.

use crate::content::{GeneratorKind, UpgradeKind};
use crate::logic;
use crate::state::GameState;
use crate::time::{PausePolicy, RunClock};

/// How a command landed. Failures are silent no-ops on state; this value
/// is the only signal a caller gets.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum ActionOutcome {
    Applied,
    InsufficientFunds,
    InvalidTarget,
    /// The operation does not fit the current lifecycle state, e.g. a
    /// tick while mutation selection is pending, or confirming a card
    /// when no selection is open.
    WrongState,
}

impl ActionOutcome {
    pub fn is_applied(&self) -> bool {
        *self == ActionOutcome::Applied
    }
}

/// Engine construction options.
#[derive(Clone, Copy, Debug)]
pub struct EngineConfig {
    /// Handling of wall-clock time spent on the mutation selection
    /// screen. `Accrue` reproduces the catch-up jump of the original
    /// game; `Discard` resumes without one.
    pub pause_policy: PausePolicy,
    /// Fixed RNG seed for reproducible runs; `None` seeds from the OS.
    pub seed: Option<u64>,
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            pause_policy: PausePolicy::Accrue,
            seed: None,
        }
    }
}

/// A single game instance. All reads go through `state`; all writes go
/// through the command methods, which serialize naturally because they
/// take `&mut self`.
pub struct Engine {
    pub state: GameState,
    clock: RunClock,
}

impl Engine {
    pub fn new() -> Self {
        Self::with_config(EngineConfig::default())
    }

    pub fn with_config(config: EngineConfig) -> Self {
        let state = match config.seed {
            Some(seed) => GameState::with_seed(seed),
            None => GameState::new(),
        };
        Self {
            state,
            clock: RunClock::new(config.pause_policy),
        }
    }

    /// Advance the simulation by an explicit elapsed-seconds delta.
    pub fn tick(&mut self, delta: f64) -> ActionOutcome {
        if self.state.mutation_pending {
            return ActionOutcome::WrongState;
        }
        if !delta.is_finite() || delta < 0.0 {
            return ActionOutcome::InvalidTarget;
        }
        logic::tick(&mut self.state, delta);
        ActionOutcome::Applied
    }

    /// Drive the simulation from a host timestamp instead of a manual
    /// delta. Returns the seconds actually ticked, zero while paused.
    pub fn pump(&mut self, now_seconds: f64) -> f64 {
        let paused = self.state.mutation_pending;
        let delta = self.clock.advance(now_seconds, paused);
        if delta > 0.0 {
            logic::tick(&mut self.state, delta);
        }
        delta
    }

    pub fn click_produce(&mut self) -> ActionOutcome {
        logic::click_produce(&mut self.state)
    }

    pub fn buy_generator(&mut self, kind: GeneratorKind) -> ActionOutcome {
        logic::buy_generator(&mut self.state, kind)
    }

    pub fn buy_upgrade(&mut self, kind: UpgradeKind) -> ActionOutcome {
        logic::buy_upgrade(&mut self.state, kind)
    }

    pub fn select_substrate(&mut self, id: &str) -> ActionOutcome {
        logic::select_substrate(&mut self.state, id)
    }

    pub fn advance_biome(&mut self) -> ActionOutcome {
        logic::advance_biome(&mut self.state)
    }

    pub fn prestige(&mut self) -> ActionOutcome {
        logic::prestige(&mut self.state)
    }

    pub fn confirm_mutation(&mut self, index: usize) -> ActionOutcome {
        logic::confirm_mutation(&mut self.state, index)
    }

    pub fn select_goal(&mut self, index: usize) -> ActionOutcome {
        logic::select_goal(&mut self.state, index)
    }
}

impl Default for Engine {
    fn default() -> Self {
        Self::new()
    }
}
