//! Runtime state: resources, generators, modifiers, biomes, and the
//! `GameState` aggregate that owns a whole game instance.

use rand::rngs::StdRng;
use rand::seq::SliceRandom;
use rand::SeedableRng;

use crate::content::{
    self, Effect, GeneratorKind, GoalKind, MutationKind, ResourceKind, SubstrateKind, UpgradeKind,
};

/// Cost growth per owned unit.
pub const COST_GROWTH: f64 = 1.15;

/// Base number of concurrent digestion slots at run start.
pub const BASE_SLOTS: usize = 1;

/// How many mutation or goal cards an offer contains at most.
pub const OFFER_SIZE: usize = 3;

const LOG_CAP: usize = 50;

/// The four resource pools. All values stay non-negative.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Resources {
    pub hyphae: f64,
    pub nutrients: f64,
    pub biomass: f64,
    pub spores: f64,
}

impl Resources {
    fn zeroed() -> Self {
        Self {
            hyphae: 0.0,
            nutrients: 0.0,
            biomass: 0.0,
            spores: 0.0,
        }
    }

    pub fn get(&self, kind: ResourceKind) -> f64 {
        match kind {
            ResourceKind::Hyphae => self.hyphae,
            ResourceKind::Nutrients => self.nutrients,
            ResourceKind::Biomass => self.biomass,
            ResourceKind::Spores => self.spores,
        }
    }

    pub fn add(&mut self, kind: ResourceKind, amount: f64) {
        match kind {
            ResourceKind::Hyphae => self.hyphae += amount,
            ResourceKind::Nutrients => self.nutrients += amount,
            ResourceKind::Biomass => self.biomass += amount,
            ResourceKind::Spores => self.spores += amount,
        }
    }

    /// Deduct `amount`; callers check the balance first.
    pub fn sub(&mut self, kind: ResourceKind, amount: f64) {
        self.add(kind, -amount);
    }
}

/// Named production multipliers. Neutral at 1.0, raised by additive
/// deltas from upgrades, mutations, and biome bonuses.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct ModifierSet {
    pub hyphae: f64,
    pub click: f64,
    pub branching: f64,
    pub nutrient: f64,
    pub leaf: f64,
    pub log_enzyme: f64,
    pub biomass: f64,
    pub substrate_speed: f64,
}

impl ModifierSet {
    pub fn neutral() -> Self {
        Self {
            hyphae: 1.0,
            click: 1.0,
            branching: 1.0,
            nutrient: 1.0,
            leaf: 1.0,
            log_enzyme: 1.0,
            biomass: 1.0,
            substrate_speed: 1.0,
        }
    }

    /// Back to neutral. Permanent upgrade effects are re-applied on top
    /// afterwards, never accumulated across runs.
    pub fn reset(&mut self) {
        *self = Self::neutral();
    }

    /// The per-kind multiplier that scales a generator's output.
    pub fn generator_multiplier(&self, kind: GeneratorKind) -> f64 {
        match kind {
            GeneratorKind::BranchingTip => self.branching,
            GeneratorKind::LeafDecomposer => self.leaf,
            GeneratorKind::LogEnzyme => self.log_enzyme,
        }
    }
}

fn cost_at(kind: GeneratorKind, count: u32) -> f64 {
    (kind.base_cost() * COST_GROWTH.powi(count as i32)).floor()
}

/// One generator type with its owned count.
#[derive(Clone, Debug)]
pub struct Generator {
    pub kind: GeneratorKind,
    pub count: u32,
}

impl Generator {
    pub fn new(kind: GeneratorKind) -> Self {
        Self { kind, count: 0 }
    }

    /// Cost of the next unit. Integer-valued and strictly increasing in
    /// owned count.
    pub fn cost(&self) -> f64 {
        cost_at(self.kind, self.count)
    }
}

/// One permanent upgrade with its ownership flag.
#[derive(Clone, Debug)]
pub struct Upgrade {
    pub kind: UpgradeKind,
    pub purchased: bool,
}

/// Per-second output of something, with modifiers applied.
#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct ProductionRates {
    pub hyphae: f64,
    pub nutrients: f64,
    pub biomass: f64,
}

/// A depletable entity inside a biome.
#[derive(Clone, Debug)]
pub struct Substrate {
    pub id: String,
    pub kind: SubstrateKind,
    /// Progress threshold at which the substrate is fully decomposed.
    pub mass: f64,
    /// Accumulated decomposition. May transiently exceed `mass` inside
    /// the tick that completes it; displays should use `progress_ratio`.
    pub progress: f64,
    pub branching_factor: f64,
    pub leaf_factor: f64,
    pub log_factor: f64,
    pub drip_hyphae: f64,
    pub drip_nutrients: f64,
    pub reward_hyphae: f64,
    pub reward_nutrients: f64,
    pub reward_biomass: f64,
    pub completed: bool,
}

impl Substrate {
    /// Decomposition progress clamped to 0..=1 for display.
    pub fn progress_ratio(&self) -> f64 {
        if self.mass <= 0.0 {
            return 1.0;
        }
        (self.progress / self.mass).min(1.0)
    }
}

/// An ordered stage of progression.
#[derive(Clone, Debug)]
pub struct Biome {
    pub name: &'static str,
    pub description: &'static str,
    /// Applied once on entry (and re-applied after a prestige wipe).
    pub bonus: &'static [Effect],
    /// Generators that become purchasable when this biome is entered.
    pub unlocks: &'static [GeneratorKind],
    pub substrates: Vec<Substrate>,
}

impl Biome {
    /// True once every substrate is fully decomposed.
    pub fn cleared(&self) -> bool {
        self.substrates.iter().all(|s| s.completed)
    }
}

/// One line of the in-game message log.
#[derive(Clone, Debug)]
pub struct LogEntry {
    pub text: String,
    pub important: bool,
}

/// Counters that survive prestige. Goal progress reads these.
#[derive(Clone, Copy, Debug, Default)]
pub struct Stats {
    pub total_clicks: u64,
    pub lifetime_hyphae: f64,
    pub substrates_decomposed: u64,
    pub lifetime_spores: f64,
    pub runs_completed: u32,
}

/// Everything one game instance owns. Operations in `logic` take this by
/// mutable reference; there are no process-wide tables.
pub struct GameState {
    pub resources: Resources,
    pub generators: Vec<Generator>,
    pub upgrades: Vec<Upgrade>,
    pub modifiers: ModifierSet,

    pub biomes: Vec<Biome>,
    pub biome_index: usize,
    pub unlocked_generators: Vec<GeneratorKind>,

    /// Concurrency limit on digesting substrates.
    pub simultaneous_targets: usize,
    /// Ids chosen by the allocator last tick, at most `simultaneous_targets`.
    pub active_substrates: Vec<String>,
    /// Explicit player focus, drained when the substrate completes.
    pub selected_substrate: Option<String>,

    pub mutation_pool: Vec<MutationKind>,
    pub active_mutation: Option<MutationKind>,
    pub mutation_pending: bool,
    pub mutation_options: Vec<MutationKind>,
    /// Seconds until the next Runaway Mycelial Burst payout; `None`
    /// unless that mutation is active this run.
    pub burst_countdown: Option<f64>,

    pub goal_options: Vec<GoalKind>,
    pub active_goal: Option<GoalKind>,
    pub goal_completed: bool,

    pub run_number: u32,
    pub stats: Stats,
    pub log: Vec<LogEntry>,

    pub(crate) rng: StdRng,
}

impl GameState {
    /// A fresh game with an OS-seeded RNG.
    pub fn new() -> Self {
        Self::from_rng(StdRng::from_entropy())
    }

    /// A fresh game reproducible from `seed`.
    pub fn with_seed(seed: u64) -> Self {
        Self::from_rng(StdRng::seed_from_u64(seed))
    }

    fn from_rng(rng: StdRng) -> Self {
        let mut state = Self {
            resources: Resources::zeroed(),
            generators: GeneratorKind::all().iter().map(|&k| Generator::new(k)).collect(),
            upgrades: UpgradeKind::all()
                .iter()
                .map(|&kind| Upgrade {
                    kind,
                    purchased: false,
                })
                .collect(),
            modifiers: ModifierSet::neutral(),
            biomes: content::build_biomes(),
            biome_index: 0,
            unlocked_generators: Vec::new(),
            simultaneous_targets: BASE_SLOTS,
            active_substrates: Vec::new(),
            selected_substrate: None,
            mutation_pool: content::base_mutation_pool(),
            active_mutation: None,
            mutation_pending: false,
            mutation_options: Vec::new(),
            burst_countdown: None,
            goal_options: Vec::new(),
            active_goal: None,
            goal_completed: false,
            run_number: 1,
            stats: Stats::default(),
            log: Vec::new(),
            rng,
        };

        // Enter the starting biome: bonus and unlocks apply immediately.
        let bonus = state.biomes[0].bonus;
        let unlocks = state.biomes[0].unlocks;
        state.unlocked_generators = unlocks.to_vec();
        for &effect in bonus {
            state.apply_effect(effect);
        }

        // Goals are offered exactly once, before the first run.
        state.goal_options = GoalKind::all()
            .choose_multiple(&mut state.rng, OFFER_SIZE)
            .copied()
            .collect();

        state.add_log("A spore settles on the soil patch.", true);
        state
    }

    /// Interpret one effect value against this state.
    pub fn apply_effect(&mut self, effect: Effect) {
        match effect {
            Effect::Hyphae(d) => self.modifiers.hyphae += d,
            Effect::Click(d) => self.modifiers.click += d,
            Effect::Branching(d) => self.modifiers.branching += d,
            Effect::Nutrient(d) => self.modifiers.nutrient += d,
            Effect::Leaf(d) => self.modifiers.leaf += d,
            Effect::LogEnzyme(d) => self.modifiers.log_enzyme += d,
            Effect::Biomass(d) => self.modifiers.biomass += d,
            Effect::SubstrateSpeed(d) => self.modifiers.substrate_speed += d,
            Effect::SlotBonus(n) => self.simultaneous_targets += n as usize,
            Effect::UnlockMutation(card) => {
                if !self.mutation_pool.contains(&card) {
                    self.mutation_pool.push(card);
                }
            }
        }
    }

    pub fn generator(&self, kind: GeneratorKind) -> Option<&Generator> {
        self.generators.iter().find(|g| g.kind == kind)
    }

    pub fn generator_mut(&mut self, kind: GeneratorKind) -> Option<&mut Generator> {
        self.generators.iter_mut().find(|g| g.kind == kind)
    }

    pub fn generator_count(&self, kind: GeneratorKind) -> u32 {
        self.generator(kind).map_or(0, |g| g.count)
    }

    /// Cost of the next unit of `kind`.
    pub fn generator_cost(&self, kind: GeneratorKind) -> f64 {
        cost_at(kind, self.generator_count(kind))
    }

    /// Whether `kind` can currently be bought. Generators stay unlocked
    /// for the rest of the run once their biome has been entered.
    pub fn is_generator_unlocked(&self, kind: GeneratorKind) -> bool {
        self.unlocked_generators.contains(&kind) || self.generator_count(kind) > 0
    }

    pub fn owns_upgrade(&self, kind: UpgradeKind) -> bool {
        self.upgrades
            .iter()
            .any(|u| u.kind == kind && u.purchased)
    }

    /// Current per-second output of one generator type, modifiers applied.
    pub fn generator_rates(&self, kind: GeneratorKind) -> ProductionRates {
        let n = self.generator_count(kind) as f64;
        let gm = self.modifiers.generator_multiplier(kind);
        ProductionRates {
            hyphae: n * kind.base_hyphae_rate() * gm * self.modifiers.hyphae,
            nutrients: n * kind.base_nutrient_rate() * gm * self.modifiers.nutrient,
            biomass: n * kind.base_biomass_rate() * gm * self.modifiers.biomass,
        }
    }

    /// Total per-second output across all generators. Recomputed on
    /// demand; modifiers can change between ticks.
    pub fn total_rates(&self) -> ProductionRates {
        let mut total = ProductionRates::default();
        for g in &self.generators {
            let r = self.generator_rates(g.kind);
            total.hyphae += r.hyphae;
            total.nutrients += r.nutrients;
            total.biomass += r.biomass;
        }
        total
    }

    /// Hyphae granted by one manual click.
    pub fn click_power(&self) -> f64 {
        1.0 * self.modifiers.click * self.modifiers.hyphae
    }

    pub fn current_biome(&self) -> &Biome {
        &self.biomes[self.biome_index]
    }

    /// Look up a substrate of the current biome by id.
    pub fn find_substrate(&self, id: &str) -> Option<&Substrate> {
        self.current_biome().substrates.iter().find(|s| s.id == id)
    }

    /// True once every substrate in the current biome is decomposed.
    pub fn biome_cleared(&self) -> bool {
        self.current_biome().cleared()
    }

    pub fn add_log(&mut self, text: &str, important: bool) {
        self.log.push(LogEntry {
            text: text.to_string(),
            important,
        });
        if self.log.len() > LOG_CAP {
            self.log.remove(0);
        }
    }
}
