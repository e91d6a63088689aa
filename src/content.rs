//! Static game content: generator kinds, upgrade and mutation catalogs,
//! biome/substrate seeds, goal definitions, and the `Effect` values they
//! carry. Everything here is data; interpretation lives in `logic`.

use serde::{Deserialize, Serialize};

use crate::state::{Biome, Substrate};

/// The four resource pools.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum ResourceKind {
    Hyphae,
    Nutrients,
    Biomass,
    /// Permanent prestige currency.
    Spores,
}

/// Kinds of generators (passive producers).
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum GeneratorKind {
    BranchingTip,
    LeafDecomposer,
    LogEnzyme,
}

impl GeneratorKind {
    /// All generator kinds in display order.
    pub fn all() -> &'static [GeneratorKind] {
        &[
            GeneratorKind::BranchingTip,
            GeneratorKind::LeafDecomposer,
            GeneratorKind::LogEnzyme,
        ]
    }

    /// Display name.
    pub fn name(&self) -> &'static str {
        match self {
            GeneratorKind::BranchingTip => "Branching Tip",
            GeneratorKind::LeafDecomposer => "Leaf Decomposer",
            GeneratorKind::LogEnzyme => "Log Enzyme",
        }
    }

    /// Cost of the first unit.
    pub fn base_cost(&self) -> f64 {
        match self {
            GeneratorKind::BranchingTip => 10.0,
            GeneratorKind::LeafDecomposer => 50.0,
            GeneratorKind::LogEnzyme => 100.0,
        }
    }

    /// Which resource pays for this generator.
    pub fn cost_resource(&self) -> ResourceKind {
        match self {
            GeneratorKind::BranchingTip | GeneratorKind::LeafDecomposer => ResourceKind::Hyphae,
            GeneratorKind::LogEnzyme => ResourceKind::Nutrients,
        }
    }

    /// One-line output description for shop listings.
    pub fn output_desc(&self) -> &'static str {
        match self {
            GeneratorKind::BranchingTip => "Hyphae/sec",
            GeneratorKind::LeafDecomposer => "Nutrients/sec",
            GeneratorKind::LogEnzyme => "Nutrients & Biomass/sec",
        }
    }

    /// Base hyphae output per unit per second.
    pub fn base_hyphae_rate(&self) -> f64 {
        match self {
            GeneratorKind::BranchingTip => 1.0,
            _ => 0.0,
        }
    }

    /// Base nutrient output per unit per second.
    pub fn base_nutrient_rate(&self) -> f64 {
        match self {
            GeneratorKind::LeafDecomposer => 0.5,
            GeneratorKind::LogEnzyme => 0.2,
            _ => 0.0,
        }
    }

    /// Base biomass output per unit per second.
    pub fn base_biomass_rate(&self) -> f64 {
        match self {
            GeneratorKind::LogEnzyme => 0.05,
            _ => 0.0,
        }
    }
}

/// A single state change carried by an upgrade, mutation card, or biome
/// bonus. Plain data, so catalogs stay inspectable and serializable
/// instead of hiding behavior in closures.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub enum Effect {
    /// Additive delta to the global hyphae multiplier.
    Hyphae(f64),
    /// Additive delta to the manual-click multiplier.
    Click(f64),
    /// Additive delta to the Branching Tip multiplier.
    Branching(f64),
    /// Additive delta to the global nutrient multiplier.
    Nutrient(f64),
    /// Additive delta to the Leaf Decomposer multiplier.
    Leaf(f64),
    /// Additive delta to the Log Enzyme multiplier.
    LogEnzyme(f64),
    /// Additive delta to the global biomass multiplier.
    Biomass(f64),
    /// Additive delta to the substrate decomposition speed multiplier.
    SubstrateSpeed(f64),
    /// Additional concurrent digestion slots.
    SlotBonus(u32),
    /// Adds a mutation card to the selection pool (duplicates are ignored).
    UnlockMutation(MutationKind),
}

/// Permanent upgrades, purchased with spores. Effects are re-applied after
/// every prestige in the order of `all()`.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum UpgradeKind {
    HyphaeBoost1,
    ClickBoost1,
    BranchingBoost1,
    NutrientBoost1,
    LeafBoost1,
    BiomassBoost1,
    LogBoost1,
    ParallelDigestion1,
    ParallelDigestion2,
    UnlockFocusedGrowth,
    UnlockLogEfficiency,
    UnlockBurst,
}

impl UpgradeKind {
    /// All upgrades in definition order.
    pub fn all() -> &'static [UpgradeKind] {
        &[
            UpgradeKind::HyphaeBoost1,
            UpgradeKind::ClickBoost1,
            UpgradeKind::BranchingBoost1,
            UpgradeKind::NutrientBoost1,
            UpgradeKind::LeafBoost1,
            UpgradeKind::BiomassBoost1,
            UpgradeKind::LogBoost1,
            UpgradeKind::ParallelDigestion1,
            UpgradeKind::ParallelDigestion2,
            UpgradeKind::UnlockFocusedGrowth,
            UpgradeKind::UnlockLogEfficiency,
            UpgradeKind::UnlockBurst,
        ]
    }

    pub fn name(&self) -> &'static str {
        match self {
            UpgradeKind::HyphaeBoost1 => "Hyphae Boost I",
            UpgradeKind::ClickBoost1 => "Click Efficiency I",
            UpgradeKind::BranchingBoost1 => "Branching Tips Boost I",
            UpgradeKind::NutrientBoost1 => "Nutrient Flow I",
            UpgradeKind::LeafBoost1 => "Leaf Decomposer Boost I",
            UpgradeKind::BiomassBoost1 => "Biomass Gain I",
            UpgradeKind::LogBoost1 => "Log Enzyme Boost I",
            UpgradeKind::ParallelDigestion1 => "Parallel Digestion I",
            UpgradeKind::ParallelDigestion2 => "Parallel Digestion II",
            UpgradeKind::UnlockFocusedGrowth => "Unlock Mutation: Focused Growth",
            UpgradeKind::UnlockLogEfficiency => "Unlock Mutation: Log Efficiency",
            UpgradeKind::UnlockBurst => "Unlock Mutation: Mycelial Burst",
        }
    }

    pub fn description(&self) -> &'static str {
        match self {
            UpgradeKind::HyphaeBoost1 => "+10% global Hyphae production",
            UpgradeKind::ClickBoost1 => "+20% manual Hyphae from clicking",
            UpgradeKind::BranchingBoost1 => "+10% Branching Tip output",
            UpgradeKind::NutrientBoost1 => "+10% nutrient production",
            UpgradeKind::LeafBoost1 => "+15% Leaf Decomposer output",
            UpgradeKind::BiomassBoost1 => "+5% biomass gain",
            UpgradeKind::LogBoost1 => "+10% Log Enzyme biomass bonus",
            UpgradeKind::ParallelDigestion1 => "+1 simultaneous substrate slot",
            UpgradeKind::ParallelDigestion2 => "+1 simultaneous substrate slot",
            UpgradeKind::UnlockFocusedGrowth => "Adds Focused Growth mutation to the pool",
            UpgradeKind::UnlockLogEfficiency => "Adds Log Enzyme Efficiency mutation to the pool",
            UpgradeKind::UnlockBurst => "Adds Runaway Mycelium Burst mutation to the pool",
        }
    }

    /// Spore cost.
    pub fn cost(&self) -> f64 {
        match self {
            UpgradeKind::HyphaeBoost1 | UpgradeKind::ClickBoost1 => 5.0,
            UpgradeKind::BranchingBoost1 | UpgradeKind::NutrientBoost1 => 8.0,
            UpgradeKind::LeafBoost1 | UpgradeKind::BiomassBoost1 => 10.0,
            UpgradeKind::LogBoost1 => 12.0,
            UpgradeKind::ParallelDigestion1 => 15.0,
            UpgradeKind::ParallelDigestion2 => 40.0,
            UpgradeKind::UnlockFocusedGrowth | UpgradeKind::UnlockLogEfficiency => 10.0,
            UpgradeKind::UnlockBurst => 20.0,
        }
    }

    pub fn effects(&self) -> &'static [Effect] {
        match self {
            UpgradeKind::HyphaeBoost1 => &[Effect::Hyphae(0.10)],
            UpgradeKind::ClickBoost1 => &[Effect::Click(0.20)],
            UpgradeKind::BranchingBoost1 => &[Effect::Branching(0.10)],
            UpgradeKind::NutrientBoost1 => &[Effect::Nutrient(0.10)],
            UpgradeKind::LeafBoost1 => &[Effect::Leaf(0.15)],
            UpgradeKind::BiomassBoost1 => &[Effect::Biomass(0.05)],
            UpgradeKind::LogBoost1 => &[Effect::LogEnzyme(0.10)],
            UpgradeKind::ParallelDigestion1 => &[Effect::SlotBonus(1)],
            UpgradeKind::ParallelDigestion2 => &[Effect::SlotBonus(1)],
            UpgradeKind::UnlockFocusedGrowth => {
                &[Effect::UnlockMutation(MutationKind::FocusedGrowth)]
            }
            UpgradeKind::UnlockLogEfficiency => {
                &[Effect::UnlockMutation(MutationKind::LogEfficiency)]
            }
            UpgradeKind::UnlockBurst => &[Effect::UnlockMutation(MutationKind::Burst)],
        }
    }
}

/// Per-run mutation cards. One is chosen at each run start.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum MutationKind {
    HyphaSurge,
    EfficientBranching,
    AcceleratedDecay,
    FocusedGrowth,
    LogEfficiency,
    /// Recurring: grants a burst of hyphae on a fixed interval instead of
    /// a one-time modifier delta. Handled specially on activation.
    Burst,
}

impl MutationKind {
    pub fn name(&self) -> &'static str {
        match self {
            MutationKind::HyphaSurge => "Hypha Surge",
            MutationKind::EfficientBranching => "Efficient Branching",
            MutationKind::AcceleratedDecay => "Accelerated Decay",
            MutationKind::FocusedGrowth => "Focused Growth",
            MutationKind::LogEfficiency => "Log Efficiency",
            MutationKind::Burst => "Runaway Mycelial Burst",
        }
    }

    pub fn description(&self) -> &'static str {
        match self {
            MutationKind::HyphaSurge => "+25% Hyphae production this run",
            MutationKind::EfficientBranching => {
                "Branching Tips produce +15% more Hyphae this run"
            }
            MutationKind::AcceleratedDecay => {
                "Leaf Decomposers generate +20% Nutrients this run"
            }
            MutationKind::FocusedGrowth => "Clicking produces +50% more Hyphae this run",
            MutationKind::LogEfficiency => "Log Enzymes produce +15% more Biomass this run",
            MutationKind::Burst => {
                "Every 60s gain a burst of Hyphae equal to 30s of Branching production"
            }
        }
    }

    /// Modifier deltas applied on activation. Empty for `Burst`, which
    /// arms a recurring countdown instead.
    pub fn effects(&self) -> &'static [Effect] {
        match self {
            MutationKind::HyphaSurge => &[Effect::Hyphae(0.25)],
            MutationKind::EfficientBranching => &[Effect::Branching(0.15)],
            MutationKind::AcceleratedDecay => &[Effect::Leaf(0.20)],
            MutationKind::FocusedGrowth => &[Effect::Click(0.50)],
            MutationKind::LogEfficiency => &[Effect::LogEnzyme(0.15)],
            MutationKind::Burst => &[],
        }
    }
}

/// Cards available before any unlock upgrade is bought.
pub fn base_mutation_pool() -> Vec<MutationKind> {
    vec![
        MutationKind::HyphaSurge,
        MutationKind::EfficientBranching,
        MutationKind::AcceleratedDecay,
    ]
}

/// Visual classes of substrates. The engine only keys sprite choice off
/// this; actual art belongs to the rendering collaborator.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum SubstrateKind {
    SmallDebris,
    LeafPile,
    TwigDebris,
    DecayingLog,
    BarkSlab,
}

impl SubstrateKind {
    pub fn name(&self) -> &'static str {
        match self {
            SubstrateKind::SmallDebris => "Small Debris",
            SubstrateKind::LeafPile => "Leaf Pile",
            SubstrateKind::TwigDebris => "Twig Debris",
            SubstrateKind::DecayingLog => "Decaying Log",
            SubstrateKind::BarkSlab => "Bark Slab",
        }
    }
}

/// Long-term objectives offered once, at the start of the very first run.
/// Purely observational: completion is reported, never gating.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum GoalKind {
    HyphaeHoard,
    SporeBank,
    MasterDecomposer,
    DeepDecomposer,
    TirelessClicker,
}

impl GoalKind {
    pub fn all() -> &'static [GoalKind] {
        &[
            GoalKind::HyphaeHoard,
            GoalKind::SporeBank,
            GoalKind::MasterDecomposer,
            GoalKind::DeepDecomposer,
            GoalKind::TirelessClicker,
        ]
    }

    pub fn name(&self) -> &'static str {
        match self {
            GoalKind::HyphaeHoard => "Hyphae Hoard",
            GoalKind::SporeBank => "Spore Bank",
            GoalKind::MasterDecomposer => "Master Decomposer",
            GoalKind::DeepDecomposer => "Deep Decomposer",
            GoalKind::TirelessClicker => "Tireless Clicker",
        }
    }

    pub fn description(&self) -> &'static str {
        match self {
            GoalKind::HyphaeHoard => "Hold 1,000 hyphae at once",
            GoalKind::SporeBank => "Earn 25 spores across all runs",
            GoalKind::MasterDecomposer => "Fully decompose 15 substrates",
            GoalKind::DeepDecomposer => "Spread into the Decaying Log biome",
            GoalKind::TirelessClicker => "Click for hyphae 200 times",
        }
    }

    /// Target value against which progress is measured.
    pub fn target(&self) -> f64 {
        match self {
            GoalKind::HyphaeHoard => 1_000.0,
            GoalKind::SporeBank => 25.0,
            GoalKind::MasterDecomposer => 15.0,
            GoalKind::DeepDecomposer => 3.0,
            GoalKind::TirelessClicker => 200.0,
        }
    }
}

fn substrate(
    id: String,
    kind: SubstrateKind,
    mass: f64,
    branching_factor: f64,
    leaf_factor: f64,
    log_factor: f64,
    drip_nutrients: f64,
    reward_biomass: f64,
) -> Substrate {
    Substrate {
        id,
        kind,
        mass,
        progress: 0.0,
        branching_factor,
        leaf_factor,
        log_factor,
        drip_hyphae: 0.0,
        drip_nutrients,
        reward_hyphae: 0.0,
        reward_nutrients: 0.0,
        reward_biomass,
        completed: false,
    }
}

/// Build the full biome progression with fresh substrates.
pub fn build_biomes() -> Vec<Biome> {
    let soil = Biome {
        name: "Soil Patch",
        description: "+5% click hyphae",
        bonus: &[Effect::Click(0.05)],
        unlocks: &[GeneratorKind::BranchingTip],
        substrates: vec![substrate(
            "debris1".to_string(),
            SubstrateKind::SmallDebris,
            20.0,
            0.2,
            0.0,
            0.0,
            0.0,
            0.1,
        )],
    };

    let mut litter_subs = Vec::new();
    for i in 0..10 {
        litter_subs.push(substrate(
            format!("leaf{}", i),
            SubstrateKind::LeafPile,
            40.0,
            0.1,
            1.0,
            0.0,
            0.1,
            0.3,
        ));
    }
    for i in 0..3 {
        litter_subs.push(substrate(
            format!("twig{}", i),
            SubstrateKind::TwigDebris,
            25.0,
            0.1,
            0.8,
            0.0,
            0.05,
            0.2,
        ));
    }
    let litter = Biome {
        name: "Leaf Litter",
        description: "+10% nutrient output",
        bonus: &[Effect::Nutrient(0.10)],
        unlocks: &[GeneratorKind::LeafDecomposer],
        substrates: litter_subs,
    };

    let mut log_subs = Vec::new();
    for i in 0..5 {
        log_subs.push(substrate(
            format!("log{}", i),
            SubstrateKind::DecayingLog,
            100.0,
            0.05,
            0.2,
            1.0,
            0.05,
            2.0,
        ));
    }
    for i in 0..2 {
        log_subs.push(substrate(
            format!("bark{}", i),
            SubstrateKind::BarkSlab,
            60.0,
            0.05,
            0.2,
            0.8,
            0.05,
            1.0,
        ));
    }
    let logwood = Biome {
        name: "Decaying Log",
        description: "+15% nutrient output & +50% biomass yield",
        bonus: &[Effect::Nutrient(0.15), Effect::Biomass(0.50)],
        unlocks: &[GeneratorKind::LogEnzyme],
        substrates: log_subs,
    };

    vec![soil, litter, logwood]
}
