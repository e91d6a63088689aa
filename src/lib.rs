//! Mycelium Idle simulation core.
//!
//! An incremental game engine: a fungal colony clicks and grows hyphae,
//! buys generators, digests the substrates of successive biomes through a
//! limited number of concurrent slots, and prestiges its biomass into
//! permanent spores before picking a mutation for the next run.
//!
//! The crate is UI-agnostic. A rendering collaborator owns the screen and
//! the event loop; it drives an [`Engine`] through its command methods
//! and reads [`state::GameState`] to draw. All gameplay failures are
//! silent no-ops reported as an [`ActionOutcome`], never panics.
//!
//! ```
//! use mycelium_idle::{Engine, GeneratorKind};
//!
//! let mut engine = Engine::new();
//! for _ in 0..10 {
//!     engine.click_produce();
//! }
//! engine.buy_generator(GeneratorKind::BranchingTip);
//! engine.tick(0.25);
//! assert!(engine.state.resources.hyphae > 0.0);
//! ```

pub mod content;
pub mod engine;
pub mod logic;
pub mod state;
pub mod time;

pub use content::{
    Effect, GeneratorKind, GoalKind, MutationKind, ResourceKind, SubstrateKind, UpgradeKind,
};
pub use engine::{ActionOutcome, Engine, EngineConfig};
pub use state::{GameState, ModifierSet, ProductionRates, Resources};
pub use time::{PausePolicy, RunClock};
