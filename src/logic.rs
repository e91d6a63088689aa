//! Simulation logic: pure functions over `GameState`, fully testable.
//!
//! Every gameplay failure is a silent no-op reported through
//! [`ActionOutcome`]; nothing in here panics or raises.

use crate::content::{GeneratorKind, GoalKind, MutationKind, SubstrateKind, UpgradeKind};
use crate::engine::ActionOutcome;
use crate::state::{GameState, BASE_SLOTS, OFFER_SIZE};

use rand::seq::SliceRandom;

/// Seconds between Runaway Mycelial Burst payouts.
pub const BURST_INTERVAL_SECS: f64 = 60.0;
/// Each payout is worth this many seconds of branching production,
/// evaluated at fire time.
pub const BURST_PAYOUT_SECS: f64 = 30.0;

/// Biomass needed per spore earned at prestige.
const BIOMASS_PER_SPORE: f64 = 10.0;

/// Advance the simulation by `delta` seconds of elapsed time.
///
/// Forward Euler, linear in `delta` with no capping; a zero delta is a
/// no-op and ticks are skipped entirely while mutation selection is
/// pending. Order matters: resources integrate first, then the active
/// substrate set is refreshed, then substrates advance and may complete.
pub fn tick(state: &mut GameState, delta: f64) {
    if state.mutation_pending {
        return;
    }
    if !delta.is_finite() || delta <= 0.0 {
        return;
    }

    let hyphae_before = state.resources.hyphae;

    // Generator production.
    let rates = state.total_rates();
    state.resources.hyphae += rates.hyphae * delta;
    state.resources.nutrients += rates.nutrients * delta;
    state.resources.biomass += rates.biomass * delta;

    // Substrate decomposition.
    allocate_active_substrates(state);
    let active = state.active_substrates.clone();
    let branching = state.generator_count(GeneratorKind::BranchingTip) as f64;
    let leaf = state.generator_count(GeneratorKind::LeafDecomposer) as f64;
    let enzyme = state.generator_count(GeneratorKind::LogEnzyme) as f64;
    let speed = state.modifiers.substrate_speed;

    let mut drip_hyphae = 0.0;
    let mut drip_nutrients = 0.0;
    let mut reward_hyphae = 0.0;
    let mut reward_nutrients = 0.0;
    let mut reward_biomass = 0.0;
    let mut completed: Vec<(String, SubstrateKind, f64)> = Vec::new();

    let index = state.biome_index;
    for sub in &mut state.biomes[index].substrates {
        if sub.completed || !active.iter().any(|id| *id == sub.id) {
            continue;
        }

        let contribution = branching * sub.branching_factor
            + leaf * sub.leaf_factor
            + enzyme * sub.log_factor;
        sub.progress += contribution * speed * delta;

        drip_hyphae += sub.drip_hyphae * delta;
        drip_nutrients += sub.drip_nutrients * delta;

        // Integrate first, then check the threshold: the one-time reward
        // lands in the same tick the mass is crossed, unscaled by delta.
        if sub.progress >= sub.mass {
            sub.completed = true;
            reward_hyphae += sub.reward_hyphae;
            reward_nutrients += sub.reward_nutrients;
            reward_biomass += sub.reward_biomass;
            completed.push((sub.id.clone(), sub.kind, sub.reward_biomass));
        }
    }

    state.resources.hyphae += drip_hyphae + reward_hyphae;
    state.resources.nutrients += drip_nutrients + reward_nutrients;
    state.resources.biomass += reward_biomass;

    for (id, kind, biomass) in &completed {
        if state.selected_substrate.as_deref() == Some(id.as_str()) {
            state.selected_substrate = None;
        }
        state.stats.substrates_decomposed += 1;
        state.add_log(
            &format!("{} fully decomposed (+{:.2} biomass)", kind.name(), biomass),
            false,
        );
    }

    advance_burst(state, delta);

    state.stats.lifetime_hyphae += state.resources.hyphae - hyphae_before;
    check_goal(state);
}

/// Count down the recurring burst mutation and pay out on each crossing.
/// A large delta can cover several intervals; each firing is evaluated
/// against production at that moment.
fn advance_burst(state: &mut GameState, delta: f64) {
    let Some(countdown) = state.burst_countdown else {
        return;
    };
    let mut remaining = countdown - delta;
    while remaining <= 0.0 {
        let branching = state.generator_count(GeneratorKind::BranchingTip) as f64;
        let per_sec = branching
            * GeneratorKind::BranchingTip.base_hyphae_rate()
            * state.modifiers.branching
            * state.modifiers.hyphae;
        let payout = per_sec * BURST_PAYOUT_SECS;
        state.resources.hyphae += payout;
        state.add_log(
            &format!("Mycelial burst: +{} hyphae", format_amount(payout)),
            true,
        );
        remaining += BURST_INTERVAL_SECS;
    }
    state.burst_countdown = Some(remaining);
}

/// Decide which substrates digest this tick.
///
/// Order of precedence, bounded by `simultaneous_targets`:
/// 1. the player-selected substrate, if still incomplete;
/// 2. substrates active last tick, so partial progress is not abandoned;
/// 3. remaining capacity filled in biome definition order.
pub fn allocate_active_substrates(state: &mut GameState) {
    let max_slots = state.simultaneous_targets.max(1);
    let pending: Vec<String> = state.biomes[state.biome_index]
        .substrates
        .iter()
        .filter(|s| !s.completed)
        .map(|s| s.id.clone())
        .collect();

    let mut active: Vec<String> = Vec::new();

    if let Some(sel) = &state.selected_substrate {
        if pending.contains(sel) {
            active.push(sel.clone());
        }
    }

    for id in &state.active_substrates {
        if active.len() >= max_slots {
            break;
        }
        if active.contains(id) {
            continue;
        }
        if pending.contains(id) {
            active.push(id.clone());
        }
    }

    for id in &pending {
        if active.len() >= max_slots {
            break;
        }
        if active.contains(id) {
            continue;
        }
        active.push(id.clone());
    }

    state.active_substrates = active;
}

/// Manual click: one hyphae scaled by the click and hyphae multipliers.
pub fn click_produce(state: &mut GameState) -> ActionOutcome {
    if state.mutation_pending {
        return ActionOutcome::WrongState;
    }
    let amount = state.click_power();
    state.resources.hyphae += amount;
    state.stats.total_clicks += 1;
    state.stats.lifetime_hyphae += amount;
    ActionOutcome::Applied
}

/// Buy one unit of a generator, paying with its configured resource.
pub fn buy_generator(state: &mut GameState, kind: GeneratorKind) -> ActionOutcome {
    if !state.is_generator_unlocked(kind) {
        return ActionOutcome::InvalidTarget;
    }
    let cost = state.generator_cost(kind);
    let currency = kind.cost_resource();
    if state.resources.get(currency) < cost {
        return ActionOutcome::InsufficientFunds;
    }
    state.resources.sub(currency, cost);
    let count = match state.generator_mut(kind) {
        Some(g) => {
            g.count += 1;
            g.count
        }
        None => return ActionOutcome::InvalidTarget,
    };
    state.add_log(&format!("{} grown ({} owned)", kind.name(), count), false);
    ActionOutcome::Applied
}

/// Buy a permanent upgrade with spores. Owned upgrades are a no-op, so
/// the cost can never be deducted twice.
pub fn buy_upgrade(state: &mut GameState, kind: UpgradeKind) -> ActionOutcome {
    let index = match state.upgrades.iter().position(|u| u.kind == kind) {
        Some(i) => i,
        None => return ActionOutcome::InvalidTarget,
    };
    if state.upgrades[index].purchased {
        return ActionOutcome::InvalidTarget;
    }
    if state.resources.spores < kind.cost() {
        return ActionOutcome::InsufficientFunds;
    }
    state.resources.spores -= kind.cost();
    state.upgrades[index].purchased = true;
    for &effect in kind.effects() {
        state.apply_effect(effect);
    }
    state.add_log(&format!("Upgrade: {}", kind.name()), true);
    ActionOutcome::Applied
}

/// Focus digestion on one substrate of the current biome. Selecting an
/// already-active or already-selected substrate changes nothing further.
pub fn select_substrate(state: &mut GameState, id: &str) -> ActionOutcome {
    let valid = match state.find_substrate(id) {
        Some(sub) => !sub.completed,
        None => false,
    };
    if !valid {
        return ActionOutcome::InvalidTarget;
    }
    state.selected_substrate = Some(id.to_string());
    allocate_active_substrates(state);
    ActionOutcome::Applied
}

/// Move into the next biome. Requires every substrate of the current one
/// to be decomposed; the final biome has no successor.
pub fn advance_biome(state: &mut GameState) -> ActionOutcome {
    if !state.biome_cleared() {
        return ActionOutcome::WrongState;
    }
    if state.biome_index + 1 >= state.biomes.len() {
        return ActionOutcome::InvalidTarget;
    }
    state.biome_index += 1;

    let biome = &state.biomes[state.biome_index];
    let bonus = biome.bonus;
    let unlocks = biome.unlocks;
    let name = biome.name;
    for &effect in bonus {
        state.apply_effect(effect);
    }
    for &kind in unlocks {
        if !state.unlocked_generators.contains(&kind) {
            state.unlocked_generators.push(kind);
        }
    }
    state.active_substrates.clear();
    state.selected_substrate = None;
    state.add_log(&format!("The mycelium spreads into the {}", name), true);
    ActionOutcome::Applied
}

/// End the run: convert biomass into spores, wipe transient state,
/// restore permanent effects, and open mutation selection for the next
/// run. The tick engine stays paused until a card is confirmed.
pub fn prestige(state: &mut GameState) -> ActionOutcome {
    if state.mutation_pending {
        return ActionOutcome::WrongState;
    }

    let earned = (state.resources.biomass / BIOMASS_PER_SPORE).floor();
    state.resources.spores += earned;
    state.stats.lifetime_spores += earned;
    state.stats.runs_completed += 1;

    state.resources.hyphae = 0.0;
    state.resources.nutrients = 0.0;
    state.resources.biomass = 0.0;
    for g in &mut state.generators {
        g.count = 0;
    }

    state.biome_index = 0;
    for biome in &mut state.biomes {
        for sub in &mut biome.substrates {
            sub.progress = 0.0;
            sub.completed = false;
        }
    }

    state.simultaneous_targets = BASE_SLOTS;
    state.active_substrates.clear();
    state.selected_substrate = None;

    // The recurring burst dies with the run; nothing can fire across the
    // prestige boundary.
    state.burst_countdown = None;
    state.active_mutation = None;

    state.modifiers.reset();
    reapply_permanent_upgrades(state);

    let unlocks = state.biomes[0].unlocks;
    state.unlocked_generators = unlocks.to_vec();

    state.run_number += 1;
    state.add_log(
        &format!(
            "Run {}: {} spores released to the wind",
            state.run_number,
            format_amount(earned)
        ),
        true,
    );

    open_mutation_selection(state);
    ActionOutcome::Applied
}

/// Restore every owned upgrade's effect onto freshly-reset modifiers.
/// Iterates ownership in definition order, so the same set of upgrades
/// always rebuilds the same modifier values.
pub fn reapply_permanent_upgrades(state: &mut GameState) {
    let owned: Vec<_> = state
        .upgrades
        .iter()
        .filter(|u| u.purchased)
        .map(|u| u.kind)
        .collect();
    for kind in owned {
        for &effect in kind.effects() {
            state.apply_effect(effect);
        }
    }
}

/// Offer up to three cards sampled from the unlocked pool without
/// replacement.
fn open_mutation_selection(state: &mut GameState) {
    let pool = state.mutation_pool.clone();
    state.mutation_options = pool
        .choose_multiple(&mut state.rng, OFFER_SIZE)
        .copied()
        .collect();
    state.mutation_pending = true;
}

/// Confirm one of the offered mutation cards and resume the run. Acts on
/// the exact options that were displayed, never on a fresh sample.
pub fn confirm_mutation(state: &mut GameState, index: usize) -> ActionOutcome {
    if !state.mutation_pending {
        return ActionOutcome::WrongState;
    }
    let chosen = match state.mutation_options.get(index) {
        Some(&card) => card,
        None => return ActionOutcome::InvalidTarget,
    };

    state.active_mutation = Some(chosen);
    if chosen == MutationKind::Burst {
        state.burst_countdown = Some(BURST_INTERVAL_SECS);
    } else {
        for &effect in chosen.effects() {
            state.apply_effect(effect);
        }
    }
    state.mutation_pending = false;
    state.mutation_options.clear();

    // Modifiers were wiped at prestige, so the entry biome's bonus has to
    // land again now that the run is live.
    let bonus = state.biomes[state.biome_index].bonus;
    for &effect in bonus {
        state.apply_effect(effect);
    }

    state.add_log(&format!("Mutation active: {}", chosen.name()), true);
    ActionOutcome::Applied
}

/// Accept one of the goals offered at first-run start.
pub fn select_goal(state: &mut GameState, index: usize) -> ActionOutcome {
    if state.active_goal.is_some() || state.goal_options.is_empty() {
        return ActionOutcome::WrongState;
    }
    let chosen = match state.goal_options.get(index) {
        Some(&goal) => goal,
        None => return ActionOutcome::InvalidTarget,
    };
    state.active_goal = Some(chosen);
    state.goal_options.clear();
    state.add_log(&format!("Goal accepted: {}", chosen.name()), false);
    ActionOutcome::Applied
}

/// Current progress of a goal, read from state without mutating it.
pub fn goal_progress(state: &GameState, goal: GoalKind) -> f64 {
    match goal {
        GoalKind::HyphaeHoard => state.resources.hyphae,
        GoalKind::SporeBank => state.stats.lifetime_spores,
        GoalKind::MasterDecomposer => state.stats.substrates_decomposed as f64,
        GoalKind::DeepDecomposer => (state.biome_index + 1) as f64,
        GoalKind::TirelessClicker => state.stats.total_clicks as f64,
    }
}

fn check_goal(state: &mut GameState) {
    if state.goal_completed {
        return;
    }
    let Some(goal) = state.active_goal else {
        return;
    };
    if goal_progress(state, goal) >= goal.target() {
        state.goal_completed = true;
        state.add_log(&format!("Goal reached: {}", goal.name()), true);
    }
}

/// Format a number with commas (e.g. 1234567 -> "1,234,567"), keeping a
/// single decimal when the fraction is visible.
pub fn format_amount(n: f64) -> String {
    if n < 0.0 {
        return format!("-{}", format_amount(-n));
    }
    let int_part = n.floor() as u64;
    let frac = n - int_part as f64;

    let s = int_part.to_string();
    let mut grouped = String::new();
    for (i, c) in s.chars().rev().enumerate() {
        if i > 0 && i % 3 == 0 {
            grouped.push(',');
        }
        grouped.push(c);
    }
    let grouped: String = grouped.chars().rev().collect();

    if frac > 0.05 {
        format!("{}.{}", grouped, (frac * 10.0).round() as u8)
    } else {
        grouped
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::content::{Effect, UpgradeKind};
    use crate::state::ModifierSet;

    fn fresh() -> GameState {
        GameState::with_seed(7)
    }

    fn set_count(state: &mut GameState, kind: GeneratorKind, count: u32) {
        if let Some(g) = state.generator_mut(kind) {
            g.count = count;
        }
    }

    // ── Tick engine ───────────────────────────────────────

    #[test]
    fn tick_zero_is_noop() {
        let mut state = fresh();
        set_count(&mut state, GeneratorKind::BranchingTip, 10);
        let resources = state.resources;
        let modifiers = state.modifiers;
        let progress = state.biomes[0].substrates[0].progress;
        tick(&mut state, 0.0);
        assert_eq!(state.resources, resources);
        assert_eq!(state.modifiers, modifiers);
        assert!((state.biomes[0].substrates[0].progress - progress).abs() < f64::EPSILON);
    }

    #[test]
    fn tick_negative_or_nan_is_noop() {
        let mut state = fresh();
        set_count(&mut state, GeneratorKind::BranchingTip, 10);
        tick(&mut state, -1.0);
        tick(&mut state, f64::NAN);
        tick(&mut state, f64::INFINITY);
        assert!((state.resources.hyphae - 0.0).abs() < f64::EPSILON);
    }

    #[test]
    fn tick_integrates_production() {
        let mut state = fresh();
        state.modifiers.reset();
        set_count(&mut state, GeneratorKind::BranchingTip, 10);
        set_count(&mut state, GeneratorKind::LeafDecomposer, 4);
        tick(&mut state, 2.0);
        // 10 hyphae/sec and 2 nutrients/sec over two seconds.
        assert!((state.resources.hyphae - 20.0).abs() < 1e-9);
        assert!((state.resources.nutrients - 4.0).abs() < 1e-9);
    }

    #[test]
    fn tick_split_matches_single_tick() {
        let mut a = fresh();
        let mut b = fresh();
        for state in [&mut a, &mut b] {
            set_count(state, GeneratorKind::BranchingTip, 5);
            set_count(state, GeneratorKind::LeafDecomposer, 2);
        }
        tick(&mut a, 0.3);
        tick(&mut a, 0.7);
        tick(&mut b, 1.0);
        assert!((a.resources.hyphae - b.resources.hyphae).abs() < 1e-9);
        assert!((a.resources.nutrients - b.resources.nutrients).abs() < 1e-9);
        let pa = a.biomes[0].substrates[0].progress;
        let pb = b.biomes[0].substrates[0].progress;
        assert!((pa - pb).abs() < 1e-9);
    }

    #[test]
    fn soil_patch_decomposes_in_ten_seconds() {
        let mut state = fresh();
        state.modifiers.reset();
        set_count(&mut state, GeneratorKind::BranchingTip, 10);
        // 10 tips * 0.2 branching factor = 2 mass/sec against mass 20.
        for _ in 0..40 {
            tick(&mut state, 0.25);
        }
        let sub = &state.biomes[0].substrates[0];
        assert!(sub.completed);
        assert!(sub.progress >= sub.mass);
        assert!((state.resources.biomass - 0.1).abs() < 1e-9);
        assert_eq!(state.stats.substrates_decomposed, 1);
    }

    #[test]
    fn completion_reward_is_not_scaled_by_delta() {
        let mut a = fresh();
        let mut b = fresh();
        for state in [&mut a, &mut b] {
            state.modifiers.reset();
            set_count(state, GeneratorKind::BranchingTip, 10);
        }
        // Different deltas, same one-time reward once the mass is crossed.
        tick(&mut a, 10.0);
        for _ in 0..100 {
            tick(&mut b, 0.1);
        }
        assert!(a.biomes[0].substrates[0].completed);
        assert!(b.biomes[0].substrates[0].completed);
        assert!((a.resources.biomass - 0.1).abs() < 1e-9);
        assert!((b.resources.biomass - 0.1).abs() < 1e-9);
    }

    #[test]
    fn completed_substrate_accrues_nothing_further() {
        let mut state = fresh();
        state.modifiers.reset();
        set_count(&mut state, GeneratorKind::BranchingTip, 10);
        tick(&mut state, 10.0);
        let progress = state.biomes[0].substrates[0].progress;
        let biomass = state.resources.biomass;
        tick(&mut state, 10.0);
        assert!((state.biomes[0].substrates[0].progress - progress).abs() < f64::EPSILON);
        assert!((state.resources.biomass - biomass).abs() < f64::EPSILON);
    }

    #[test]
    fn drip_rewards_accrue_with_delta() {
        let mut state = fresh();
        state.modifiers.reset();
        state.biome_index = 1;
        set_count(&mut state, GeneratorKind::BranchingTip, 1);
        // leaf0 drips 0.1 nutrients/sec while active.
        tick(&mut state, 4.0);
        assert!((state.resources.nutrients - 0.4).abs() < 1e-9);
    }

    #[test]
    fn completion_deselects_the_finished_substrate() {
        let mut state = fresh();
        state.modifiers.reset();
        set_count(&mut state, GeneratorKind::BranchingTip, 10);
        assert_eq!(select_substrate(&mut state, "debris1"), ActionOutcome::Applied);
        tick(&mut state, 10.0);
        assert!(state.selected_substrate.is_none());
    }

    #[test]
    fn tick_skipped_while_selection_pending() {
        let mut state = fresh();
        set_count(&mut state, GeneratorKind::BranchingTip, 10);
        prestige(&mut state);
        assert!(state.mutation_pending);
        tick(&mut state, 100.0);
        assert!((state.resources.hyphae - 0.0).abs() < f64::EPSILON);
    }

    // ── Slot allocator ────────────────────────────────────

    #[test]
    fn allocator_respects_slot_limit() {
        let mut state = fresh();
        state.biome_index = 1;
        allocate_active_substrates(&mut state);
        assert_eq!(state.active_substrates, vec!["leaf0".to_string()]);

        state.simultaneous_targets = 3;
        allocate_active_substrates(&mut state);
        assert_eq!(
            state.active_substrates,
            vec!["leaf0".to_string(), "leaf1".to_string(), "leaf2".to_string()]
        );
    }

    #[test]
    fn allocator_puts_selection_first_and_retains_active() {
        let mut state = fresh();
        state.biome_index = 1;
        state.simultaneous_targets = 3;
        allocate_active_substrates(&mut state);

        assert_eq!(select_substrate(&mut state, "twig0"), ActionOutcome::Applied);
        assert_eq!(
            state.active_substrates,
            vec!["twig0".to_string(), "leaf0".to_string(), "leaf1".to_string()]
        );
    }

    #[test]
    fn allocator_skips_completed_and_backfills_in_order() {
        let mut state = fresh();
        state.biome_index = 1;
        state.simultaneous_targets = 3;
        allocate_active_substrates(&mut state);
        select_substrate(&mut state, "twig0");

        let leaf0 = state.biomes[1]
            .substrates
            .iter_mut()
            .find(|s| s.id == "leaf0")
            .unwrap();
        leaf0.progress = leaf0.mass;
        leaf0.completed = true;

        allocate_active_substrates(&mut state);
        assert_eq!(
            state.active_substrates,
            vec!["twig0".to_string(), "leaf1".to_string(), "leaf2".to_string()]
        );
    }

    #[test]
    fn allocator_shrinks_with_remaining_substrates() {
        let mut state = fresh();
        state.simultaneous_targets = 4;
        allocate_active_substrates(&mut state);
        // Soil Patch only has a single substrate.
        assert_eq!(state.active_substrates, vec!["debris1".to_string()]);
    }

    #[test]
    fn reselecting_an_active_substrate_changes_nothing() {
        let mut state = fresh();
        state.biome_index = 1;
        state.simultaneous_targets = 2;
        allocate_active_substrates(&mut state);
        select_substrate(&mut state, "leaf0");
        let before = state.active_substrates.clone();
        select_substrate(&mut state, "leaf0");
        assert_eq!(state.active_substrates, before);
    }

    #[test]
    fn selecting_missing_or_completed_substrate_is_rejected() {
        let mut state = fresh();
        assert_eq!(
            select_substrate(&mut state, "no-such-substrate"),
            ActionOutcome::InvalidTarget
        );
        let sub = &mut state.biomes[0].substrates[0];
        sub.progress = sub.mass;
        sub.completed = true;
        allocate_active_substrates(&mut state);
        let before = state.active_substrates.clone();
        assert_eq!(
            select_substrate(&mut state, "debris1"),
            ActionOutcome::InvalidTarget
        );
        assert_eq!(state.active_substrates, before);
    }

    // ── Purchases ─────────────────────────────────────────

    #[test]
    fn buy_generator_deducts_and_increments() {
        let mut state = fresh();
        state.resources.hyphae = 100.0;
        assert_eq!(
            buy_generator(&mut state, GeneratorKind::BranchingTip),
            ActionOutcome::Applied
        );
        assert_eq!(state.generator_count(GeneratorKind::BranchingTip), 1);
        assert!((state.resources.hyphae - 90.0).abs() < 1e-9);
        // Next one costs floor(10 * 1.15) = 11.
        assert!((state.generator_cost(GeneratorKind::BranchingTip) - 11.0).abs() < f64::EPSILON);
    }

    #[test]
    fn buy_generator_insufficient_funds() {
        let mut state = fresh();
        state.resources.hyphae = 9.0;
        assert_eq!(
            buy_generator(&mut state, GeneratorKind::BranchingTip),
            ActionOutcome::InsufficientFunds
        );
        assert_eq!(state.generator_count(GeneratorKind::BranchingTip), 0);
        assert!((state.resources.hyphae - 9.0).abs() < f64::EPSILON);
    }

    #[test]
    fn buy_generator_locked_in_early_biome() {
        let mut state = fresh();
        state.resources.hyphae = 1_000.0;
        assert_eq!(
            buy_generator(&mut state, GeneratorKind::LeafDecomposer),
            ActionOutcome::InvalidTarget
        );
        assert!((state.resources.hyphae - 1_000.0).abs() < f64::EPSILON);
    }

    #[test]
    fn log_enzyme_is_paid_in_nutrients() {
        let mut state = fresh();
        state.unlocked_generators.push(GeneratorKind::LogEnzyme);
        state.resources.hyphae = 500.0;
        state.resources.nutrients = 120.0;
        assert_eq!(
            buy_generator(&mut state, GeneratorKind::LogEnzyme),
            ActionOutcome::Applied
        );
        assert!((state.resources.nutrients - 20.0).abs() < 1e-9);
        assert!((state.resources.hyphae - 500.0).abs() < f64::EPSILON);
    }

    #[test]
    fn buy_upgrade_applies_effects_once() {
        let mut state = fresh();
        state.resources.spores = 10.0;
        assert_eq!(
            buy_upgrade(&mut state, UpgradeKind::HyphaeBoost1),
            ActionOutcome::Applied
        );
        assert!(state.owns_upgrade(UpgradeKind::HyphaeBoost1));
        assert!((state.resources.spores - 5.0).abs() < 1e-9);
        assert!((state.modifiers.hyphae - 1.1).abs() < 1e-9);

        // Second purchase is a no-op: no deduction, no double delta.
        assert_eq!(
            buy_upgrade(&mut state, UpgradeKind::HyphaeBoost1),
            ActionOutcome::InvalidTarget
        );
        assert!(state.owns_upgrade(UpgradeKind::HyphaeBoost1));
        assert!((state.resources.spores - 5.0).abs() < 1e-9);
        assert!((state.modifiers.hyphae - 1.1).abs() < 1e-9);
    }

    #[test]
    fn slot_upgrade_raises_concurrency() {
        let mut state = fresh();
        state.resources.spores = 60.0;
        buy_upgrade(&mut state, UpgradeKind::ParallelDigestion1);
        assert_eq!(state.simultaneous_targets, 2);
        buy_upgrade(&mut state, UpgradeKind::ParallelDigestion2);
        assert_eq!(state.simultaneous_targets, 3);
    }

    #[test]
    fn unlock_upgrade_grows_pool_without_duplicates() {
        let mut state = fresh();
        state.resources.spores = 100.0;
        assert_eq!(state.mutation_pool.len(), 3);
        buy_upgrade(&mut state, UpgradeKind::UnlockBurst);
        assert_eq!(state.mutation_pool.len(), 4);
        assert!(state.mutation_pool.contains(&MutationKind::Burst));
        // Re-application at prestige must not append again.
        prestige(&mut state);
        assert_eq!(state.mutation_pool.len(), 4);
    }

    // ── Biome progression ─────────────────────────────────

    #[test]
    fn advance_requires_cleared_biome() {
        let mut state = fresh();
        assert_eq!(advance_biome(&mut state), ActionOutcome::WrongState);
        assert_eq!(state.biome_index, 0);
    }

    #[test]
    fn advance_applies_bonus_and_unlocks() {
        let mut state = fresh();
        for sub in &mut state.biomes[0].substrates {
            sub.progress = sub.mass;
            sub.completed = true;
        }
        let nutrient_before = state.modifiers.nutrient;
        assert_eq!(advance_biome(&mut state), ActionOutcome::Applied);
        assert_eq!(state.biome_index, 1);
        assert!((state.modifiers.nutrient - (nutrient_before + 0.10)).abs() < 1e-9);
        assert!(state.is_generator_unlocked(GeneratorKind::LeafDecomposer));
        assert!(state.active_substrates.is_empty());
    }

    #[test]
    fn advance_stops_at_last_biome() {
        let mut state = fresh();
        state.biome_index = 2;
        for sub in &mut state.biomes[2].substrates {
            sub.progress = sub.mass;
            sub.completed = true;
        }
        assert_eq!(advance_biome(&mut state), ActionOutcome::InvalidTarget);
        assert_eq!(state.biome_index, 2);
    }

    // ── Prestige & mutation selection ─────────────────────

    #[test]
    fn prestige_converts_biomass_and_resets() {
        let mut state = fresh();
        state.resources.hyphae = 500.0;
        state.resources.nutrients = 300.0;
        state.resources.biomass = 47.0;
        state.resources.spores = 2.0;
        set_count(&mut state, GeneratorKind::BranchingTip, 12);
        state.biome_index = 2;
        state.simultaneous_targets = 3;
        state.biomes[1].substrates[0].progress = 17.0;
        state.biomes[1].substrates[1].completed = true;
        state.burst_countdown = Some(12.5);
        state.active_mutation = Some(MutationKind::HyphaSurge);

        let run_before = state.run_number;
        assert_eq!(prestige(&mut state), ActionOutcome::Applied);

        assert!((state.resources.spores - 6.0).abs() < 1e-9); // 2 + floor(4.7)
        assert!((state.resources.hyphae - 0.0).abs() < f64::EPSILON);
        assert!((state.resources.nutrients - 0.0).abs() < f64::EPSILON);
        assert!((state.resources.biomass - 0.0).abs() < f64::EPSILON);
        for kind in GeneratorKind::all() {
            assert_eq!(state.generator_count(*kind), 0);
        }
        assert_eq!(state.biome_index, 0);
        for biome in &state.biomes {
            for sub in &biome.substrates {
                assert!((sub.progress - 0.0).abs() < f64::EPSILON);
                assert!(!sub.completed);
            }
        }
        assert_eq!(state.simultaneous_targets, 1);
        assert!(state.active_substrates.is_empty());
        assert!(state.burst_countdown.is_none());
        assert!(state.active_mutation.is_none());
        assert_eq!(state.run_number, run_before + 1);
        assert!(state.mutation_pending);
        assert!(!state.mutation_options.is_empty());
        assert!(state.mutation_options.len() <= 3);
    }

    #[test]
    fn prestige_restores_permanent_modifiers_exactly() {
        let mut state = fresh();
        state.resources.spores = 50.0;
        buy_upgrade(&mut state, UpgradeKind::HyphaeBoost1);
        buy_upgrade(&mut state, UpgradeKind::LeafBoost1);
        buy_upgrade(&mut state, UpgradeKind::ParallelDigestion1);

        // Reference: neutral modifiers plus owned-upgrade effects only.
        let mut scratch = fresh();
        scratch.resources.spores = 50.0;
        scratch.modifiers.reset();
        buy_upgrade(&mut scratch, UpgradeKind::HyphaeBoost1);
        buy_upgrade(&mut scratch, UpgradeKind::LeafBoost1);

        prestige(&mut state);
        // Pending state: biome bonus not yet re-applied, so modifiers are
        // exactly neutral + permanent upgrades.
        assert_eq!(state.modifiers, scratch.modifiers);
        assert_eq!(state.simultaneous_targets, 2);

        // Reapplying again from neutral lands on the same values.
        let after_first = state.modifiers;
        state.modifiers.reset();
        reapply_permanent_upgrades(&mut state);
        assert_eq!(state.modifiers, after_first);
    }

    #[test]
    fn prestige_while_pending_is_rejected() {
        let mut state = fresh();
        prestige(&mut state);
        let run = state.run_number;
        assert_eq!(prestige(&mut state), ActionOutcome::WrongState);
        assert_eq!(state.run_number, run);
    }

    #[test]
    fn confirm_acts_on_the_displayed_options() {
        let mut state = fresh();
        prestige(&mut state);
        let offered = state.mutation_options.clone();
        assert!(!offered.is_empty());
        let pick = offered.len() - 1;
        assert_eq!(confirm_mutation(&mut state, pick), ActionOutcome::Applied);
        assert_eq!(state.active_mutation, Some(offered[pick]));
        assert!(!state.mutation_pending);
        assert!(state.mutation_options.is_empty());
    }

    #[test]
    fn confirm_reapplies_entry_biome_bonus() {
        let mut state = fresh();
        prestige(&mut state);
        assert!((state.modifiers.click - 1.0).abs() < 1e-9);
        confirm_mutation(&mut state, 0);
        assert!(state.modifiers.click >= 1.05 - 1e-9);
    }

    #[test]
    fn confirm_out_of_bounds_keeps_pending() {
        let mut state = fresh();
        prestige(&mut state);
        assert_eq!(confirm_mutation(&mut state, 99), ActionOutcome::InvalidTarget);
        assert!(state.mutation_pending);
    }

    #[test]
    fn confirm_without_pending_is_rejected() {
        let mut state = fresh();
        assert_eq!(confirm_mutation(&mut state, 0), ActionOutcome::WrongState);
    }

    #[test]
    fn offer_from_pool_of_two_returns_both() {
        for seed in 0..20 {
            let mut state = GameState::with_seed(seed);
            state.mutation_pool = vec![MutationKind::HyphaSurge, MutationKind::Burst];
            prestige(&mut state);
            assert_eq!(state.mutation_options.len(), 2);
            assert!(state.mutation_options.contains(&MutationKind::HyphaSurge));
            assert!(state.mutation_options.contains(&MutationKind::Burst));
        }
    }

    #[test]
    fn click_is_blocked_while_pending() {
        let mut state = fresh();
        prestige(&mut state);
        assert_eq!(click_produce(&mut state), ActionOutcome::WrongState);
        assert!((state.resources.hyphae - 0.0).abs() < f64::EPSILON);
    }

    // ── Burst mutation ────────────────────────────────────

    fn state_with_burst_active() -> GameState {
        let mut state = fresh();
        state.mutation_pool = vec![MutationKind::Burst];
        prestige(&mut state);
        confirm_mutation(&mut state, 0);
        state
    }

    #[test]
    fn burst_fires_every_interval() {
        let mut state = state_with_burst_active();
        set_count(&mut state, GeneratorKind::BranchingTip, 5);
        tick(&mut state, 59.0);
        // Production only so far: 5 hyphae/sec * 59.
        assert!((state.resources.hyphae - 295.0).abs() < 1e-6);
        tick(&mut state, 1.0);
        // One more second of production plus 30 seconds' worth of burst.
        assert!((state.resources.hyphae - (300.0 + 150.0)).abs() < 1e-6);
    }

    #[test]
    fn burst_is_linear_across_split_ticks() {
        let mut a = state_with_burst_active();
        let mut b = state_with_burst_active();
        for state in [&mut a, &mut b] {
            set_count(state, GeneratorKind::BranchingTip, 3);
        }
        tick(&mut a, 60.0);
        for _ in 0..4 {
            tick(&mut b, 15.0);
        }
        assert!((a.resources.hyphae - b.resources.hyphae).abs() < 1e-6);
    }

    #[test]
    fn burst_covers_multiple_intervals_in_one_tick() {
        let mut state = state_with_burst_active();
        set_count(&mut state, GeneratorKind::BranchingTip, 2);
        tick(&mut state, 120.0);
        // 2 hyphae/sec * 120 of production plus two payouts of 60 each.
        assert!((state.resources.hyphae - (240.0 + 120.0)).abs() < 1e-6);
    }

    #[test]
    fn burst_evaluates_production_at_fire_time() {
        let mut state = state_with_burst_active();
        tick(&mut state, 30.0);
        // Tips grown mid-interval count fully at the next firing.
        set_count(&mut state, GeneratorKind::BranchingTip, 4);
        tick(&mut state, 30.0);
        // 4/sec * 30 production + 4/sec * 30s payout.
        assert!((state.resources.hyphae - (120.0 + 120.0)).abs() < 1e-6);
    }

    #[test]
    fn prestige_cancels_burst_timer() {
        let mut state = state_with_burst_active();
        set_count(&mut state, GeneratorKind::BranchingTip, 5);
        tick(&mut state, 30.0);
        prestige(&mut state);
        assert!(state.burst_countdown.is_none());
        confirm_mutation(&mut state, 0);
        if state.active_mutation == Some(MutationKind::Burst) {
            // Re-armed fresh, never carried over from the previous run.
            assert_eq!(state.burst_countdown, Some(BURST_INTERVAL_SECS));
        }
    }

    // ── Goals ─────────────────────────────────────────────

    #[test]
    fn goal_selection_consumes_the_offer() {
        let mut state = fresh();
        let offered = state.goal_options.clone();
        assert_eq!(select_goal(&mut state, 1), ActionOutcome::Applied);
        assert_eq!(state.active_goal, Some(offered[1]));
        assert!(state.goal_options.is_empty());
        assert_eq!(select_goal(&mut state, 0), ActionOutcome::WrongState);
    }

    #[test]
    fn goal_completion_is_observational() {
        let mut state = fresh();
        state.active_goal = Some(GoalKind::TirelessClicker);
        state.goal_options.clear();
        for _ in 0..200 {
            click_produce(&mut state);
        }
        assert!(!state.goal_completed);
        tick(&mut state, 0.25);
        assert!(state.goal_completed);
        // Completion gates nothing; the run keeps going.
        assert_eq!(click_produce(&mut state), ActionOutcome::Applied);
    }

    #[test]
    fn goal_progress_reads_lifetime_stats() {
        let mut state = fresh();
        state.stats.substrates_decomposed = 9;
        assert!((goal_progress(&state, GoalKind::MasterDecomposer) - 9.0).abs() < f64::EPSILON);
        state.biome_index = 2;
        assert!((goal_progress(&state, GoalKind::DeepDecomposer) - 3.0).abs() < f64::EPSILON);
    }

    // ── Formatting ────────────────────────────────────────

    #[test]
    fn format_amount_groups_thousands() {
        assert_eq!(format_amount(0.0), "0");
        assert_eq!(format_amount(123.0), "123");
        assert_eq!(format_amount(1234.0), "1,234");
        assert_eq!(format_amount(1234567.0), "1,234,567");
    }

    #[test]
    fn format_amount_keeps_visible_fraction() {
        assert_eq!(format_amount(12.5), "12.5");
    }

    // ── Modifier registry ─────────────────────────────────

    #[test]
    fn modifier_reset_restores_neutral() {
        let mut state = fresh();
        state.apply_effect(Effect::Nutrient(0.4));
        state.apply_effect(Effect::SubstrateSpeed(0.3));
        state.modifiers.reset();
        assert_eq!(state.modifiers, ModifierSet::neutral());
    }
}
