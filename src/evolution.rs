//! Evolution engine — battle outcomes drive DNA mutation.
//!
//! Winners refine their formula with small mutations; agents below the
//! round average mutate harder the further behind they are, with extra
//! pressure on agents stuck on a losing streak.

use std::collections::BTreeMap;

use rand::Rng;
use rand::seq::{SliceRandom, index};
use rand_distr::StandardNormal;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use tracing::{debug, info};

use crate::agent::Agent;
use crate::battle::BattleResults;
use crate::dna::{
    Dna, EffectType, MAX_EFFECTS, PITCH_DOWN_MAX, PITCH_DOWN_MIN, TEMPO_MAX, TEMPO_MIN,
    VocalChopStyle,
};
use crate::events::round_to;
use crate::profile;

// ── Mutation primitives ─────────────────────────────────────

fn gauss<R: Rng + ?Sized>(rng: &mut R, std_dev: f64) -> f64 {
    rng.sample::<f64, _>(StandardNormal) * std_dev
}

/// `value + N(0, magnitude)`, clamped to [0, 1].
pub fn mutate_unit<R: Rng + ?Sized>(value: f64, magnitude: f64, rng: &mut R) -> f64 {
    (value + gauss(rng, magnitude)).clamp(0.0, 1.0)
}

/// Tempo drift of `round(N(0, 15 * magnitude))` BPM.
pub fn mutate_tempo<R: Rng + ?Sized>(tempo: i32, magnitude: f64, rng: &mut R) -> i32 {
    let delta = gauss(rng, magnitude * 15.0).round() as i32;
    tempo.saturating_add(delta).clamp(TEMPO_MIN, TEMPO_MAX)
}

/// Vocal pitch-down drift of `round(N(0, 4 * magnitude))` semitones.
pub fn mutate_pitch_down<R: Rng + ?Sized>(semitones: i32, magnitude: f64, rng: &mut R) -> i32 {
    let delta = gauss(rng, magnitude * 4.0).round() as i32;
    semitones
        .saturating_add(delta)
        .clamp(PITCH_DOWN_MIN, PITCH_DOWN_MAX)
}

/// With `probability`, switch to a different style.
pub fn mutate_vocal_style<R: Rng + ?Sized>(
    current: VocalChopStyle,
    probability: f64,
    rng: &mut R,
) -> VocalChopStyle {
    if rng.r#gen::<f64>() >= probability {
        return current;
    }
    let options: Vec<VocalChopStyle> = VocalChopStyle::ALL
        .into_iter()
        .filter(|s| *s != current)
        .collect();
    options.choose(rng).copied().unwrap_or(current)
}

/// With `probability`, switch to a different melody profile.
pub fn mutate_melody_profile<R: Rng + ?Sized>(current: &str, probability: f64, rng: &mut R) -> String {
    if rng.r#gen::<f64>() >= probability {
        return current.to_string();
    }
    let options: Vec<&str> = profile::profile_ids().filter(|id| *id != current).collect();
    options
        .choose(rng)
        .map_or_else(|| current.to_string(), |id| id.to_string())
}

/// Remove, add or swap effects, keeping 1 to 4 distinct entries.
pub fn mutate_effects<R: Rng + ?Sized>(
    current: &[EffectType],
    magnitude: f64,
    rng: &mut R,
) -> Vec<EffectType> {
    let mut effects: Vec<EffectType> = Vec::with_capacity(MAX_EFFECTS + 1);
    for &effect in current {
        if !effects.contains(&effect) {
            effects.push(effect);
        }
    }

    if !effects.is_empty() && rng.r#gen::<f64>() < magnitude * 0.5 {
        let idx = rng.gen_range(0..effects.len());
        effects.remove(idx);
    }

    if rng.r#gen::<f64>() < magnitude * 0.5 {
        if let Some(added) = absent_effect(&effects, rng) {
            effects.push(added);
        }
    }

    if !effects.is_empty() && rng.r#gen::<f64>() < magnitude * 0.3 {
        let idx = rng.gen_range(0..effects.len());
        if let Some(replacement) = absent_effect(&effects, rng) {
            effects[idx] = replacement;
        }
    }

    if effects.is_empty() {
        if let Some(&effect) = EffectType::ALL.choose(rng) {
            effects.push(effect);
        }
    } else if effects.len() > MAX_EFFECTS {
        effects = index::sample(rng, effects.len(), MAX_EFFECTS)
            .into_iter()
            .map(|i| effects[i])
            .collect();
    }
    effects
}

fn absent_effect<R: Rng + ?Sized>(effects: &[EffectType], rng: &mut R) -> Option<EffectType> {
    let available: Vec<EffectType> = EffectType::ALL
        .into_iter()
        .filter(|e| !effects.contains(e))
        .collect();
    available.choose(rng).copied()
}

// ── DNA mutation ────────────────────────────────────────────

/// A mutated copy of `dna`. `magnitude` runs from 0 (no change) to 1
/// (major overhaul) and is clamped to that range. The sample pack
/// selector is never mutated.
pub fn mutate_dna<R: Rng + ?Sized>(dna: &Dna, magnitude: f64, rng: &mut R) -> Dna {
    let m = magnitude.clamp(0.0, 1.0);
    let mut new = dna.clone();
    new.bass_intensity = mutate_unit(dna.bass_intensity, m, rng);
    new.cowbell_frequency = mutate_unit(dna.cowbell_frequency, m, rng);
    new.melody_complexity = mutate_unit(dna.melody_complexity, m, rng);
    new.hi_hat_density = mutate_unit(dna.hi_hat_density, m, rng);
    new.swing = mutate_unit(dna.swing, m, rng);
    new.sample_variation = mutate_unit(dna.sample_variation, m, rng);
    new.melody_profile = mutate_melody_profile(&dna.melody_profile, m * 0.22, rng);
    new.glide_probability = mutate_unit(dna.glide_probability, m, rng);
    new.darkness = mutate_unit(dna.darkness, m, rng);
    new.distortion_drive = mutate_unit(dna.distortion_drive, m, rng);
    new.vocal_pitch_down = mutate_pitch_down(dna.vocal_pitch_down, m, rng);
    new.tempo = mutate_tempo(dna.tempo, m, rng);
    new.vocal_chop_style = mutate_vocal_style(dna.vocal_chop_style, m * 0.5, rng);
    new.effects = mutate_effects(&dna.effects, m, rng);
    new
}

// ── Magnitude policy ────────────────────────────────────────

/// Lowest magnitude a non-winner can get.
pub const LOSER_BASE_MAGNITUDE: f64 = 0.15;
/// Highest magnitude the policy ever returns.
pub const MAX_MAGNITUDE: f64 = 0.7;
const STREAK_MIN_BATTLES: u32 = 5;
const STREAK_WIN_RATE: f64 = 0.3;
const STREAK_BONUS: f64 = 0.1;

/// How hard an agent should mutate after a round. Call after the round
/// has been recorded in the agent's stats.
pub fn mutation_magnitude<R: Rng + ?Sized>(
    agent: &Agent,
    likes: u64,
    avg_likes: f64,
    won: bool,
    rng: &mut R,
) -> f64 {
    if won {
        return rng.gen_range(0.03..=0.12);
    }
    if avg_likes <= 0.0 {
        return rng.gen_range(0.2..=0.4);
    }

    let deficit = ((avg_likes - likes as f64) / avg_likes).clamp(0.0, 1.0);
    let mut base = LOSER_BASE_MAGNITUDE + deficit * 0.5;
    if agent.stats.total_battles >= STREAK_MIN_BATTLES && agent.stats.win_rate() < STREAK_WIN_RATE {
        base += STREAK_BONUS;
    }
    base.min(MAX_MAGNITUDE)
}

// ── Round orchestration ─────────────────────────────────────

/// Before/after values of one DNA field.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FieldChange {
    pub old: Value,
    pub new: Value,
}

/// What happened to one agent in a round.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EvolutionReport {
    pub agent_id: String,
    pub agent_name: String,
    pub won: bool,
    pub likes: u64,
    /// Rounded to 3 dp.
    pub magnitude: f64,
    /// Generation after evolving.
    pub generation: u32,
    pub changed_params: BTreeMap<String, FieldChange>,
}

/// Serialized fields that differ between two DNA records.
pub fn diff_dna(old: &Dna, new: &Dna) -> BTreeMap<String, FieldChange> {
    let before = old.to_fields();
    let after = new.to_fields();
    before
        .into_iter()
        .filter_map(|(key, old_value)| {
            let new_value = after.get(&key)?;
            (old_value != *new_value).then(|| {
                let change = FieldChange {
                    old: old_value,
                    new: new_value.clone(),
                };
                (key, change)
            })
        })
        .collect()
}

/// Index of the first participant holding the strict maximum.
fn winner_index(likes: &[u64]) -> Option<usize> {
    let mut best: Option<(usize, u64)> = None;
    for (i, &l) in likes.iter().enumerate() {
        if best.is_none_or(|(_, top)| l > top) {
            best = Some((i, l));
        }
    }
    best.map(|(i, _)| i)
}

/// Record a finished battle on every participant and evolve each one.
/// Agents missing from `results` count as 0 likes. Reports come back in
/// participant order.
pub fn evolve_after_battle<R: Rng + ?Sized>(
    agents: &mut [Agent],
    results: &BattleResults,
    rng: &mut R,
) -> Vec<EvolutionReport> {
    if agents.is_empty() {
        return Vec::new();
    }

    let likes: Vec<u64> = agents.iter().map(|a| results.likes_for(&a.id)).collect();
    let total: u64 = likes.iter().sum();
    let avg_likes = total as f64 / agents.len() as f64;
    let winner = winner_index(&likes);
    debug!(participants = agents.len(), total, avg_likes, "evolving round");

    agents
        .iter_mut()
        .zip(likes)
        .enumerate()
        .map(|(i, (agent, likes))| {
            let won = winner == Some(i);
            agent.record_battle(likes, won);

            let magnitude = mutation_magnitude(agent, likes, avg_likes, won, rng);
            let new_dna = mutate_dna(&agent.dna, magnitude, rng);
            let changed_params = diff_dna(&agent.dna, &new_dna);
            agent.evolve(new_dna);

            info!(
                agent = %agent.id,
                won,
                likes,
                magnitude,
                generation = agent.generation,
                changed = changed_params.len(),
                "agent evolved"
            );
            EvolutionReport {
                agent_id: agent.id.clone(),
                agent_name: agent.name.clone(),
                won,
                likes,
                magnitude: round_to(magnitude, 3),
                generation: agent.generation,
                changed_params,
            }
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::agent::AgentStats;
    use rand::SeedableRng;
    use rand_chacha::ChaCha8Rng;

    fn agent(id: &str) -> Agent {
        Agent::new(id, id.to_uppercase(), Dna::default())
    }

    fn results(pairs: &[(&str, u64)]) -> BattleResults {
        pairs.iter().map(|&(id, l)| (id.to_string(), l)).collect()
    }

    #[test]
    fn mutated_fields_stay_in_domain() {
        let mut rng = ChaCha8Rng::seed_from_u64(1);
        let mut dna = Dna::default();
        for step in 0..400 {
            let m = (step % 11) as f64 / 10.0;
            dna = mutate_dna(&dna, m, &mut rng);
            for v in [
                dna.bass_intensity,
                dna.cowbell_frequency,
                dna.melody_complexity,
                dna.hi_hat_density,
                dna.swing,
                dna.sample_variation,
                dna.glide_probability,
                dna.darkness,
                dna.distortion_drive,
            ] {
                assert!((0.0..=1.0).contains(&v), "unit field escaped: {v}");
            }
            assert!((TEMPO_MIN..=TEMPO_MAX).contains(&dna.tempo));
            assert!((PITCH_DOWN_MIN..=PITCH_DOWN_MAX).contains(&dna.vocal_pitch_down));
            assert!((1..=MAX_EFFECTS).contains(&dna.effects.len()));
            let mut sorted = dna.effects.clone();
            sorted.sort_by_key(|e| EffectType::ALL.iter().position(|x| x == e));
            sorted.dedup();
            assert_eq!(sorted.len(), dna.effects.len(), "duplicate effects");
            assert!(profile::profile_ids().any(|id| id == dna.melody_profile));
        }
    }

    #[test]
    fn zero_magnitude_is_identity() {
        let mut rng = ChaCha8Rng::seed_from_u64(2);
        let dna = Dna::default();
        assert_eq!(mutate_dna(&dna, 0.0, &mut rng), dna);
    }

    #[test]
    fn sample_pack_never_mutates() {
        let mut rng = ChaCha8Rng::seed_from_u64(3);
        let dna = Dna {
            sample_pack: "dark_pack|core".into(),
            ..Dna::default()
        };
        for _ in 0..50 {
            assert_eq!(mutate_dna(&dna, 1.0, &mut rng).sample_pack, "dark_pack|core");
        }
    }

    #[test]
    fn empty_effects_are_refilled() {
        let mut rng = ChaCha8Rng::seed_from_u64(4);
        for m in [0.0, 0.3, 1.0] {
            let out = mutate_effects(&[], m, &mut rng);
            assert!(!out.is_empty());
            assert!(out.len() <= MAX_EFFECTS);
        }
    }

    #[test]
    fn oversized_effects_are_trimmed() {
        let mut rng = ChaCha8Rng::seed_from_u64(5);
        let out = mutate_effects(&EffectType::ALL, 0.0, &mut rng);
        assert_eq!(out.len(), MAX_EFFECTS);
    }

    #[test]
    fn duplicate_effects_are_collapsed() {
        let mut rng = ChaCha8Rng::seed_from_u64(6);
        let out = mutate_effects(&[EffectType::Chorus, EffectType::Chorus], 0.0, &mut rng);
        assert_eq!(out, vec![EffectType::Chorus]);
    }

    #[test]
    fn style_switch_always_changes_at_full_probability() {
        let mut rng = ChaCha8Rng::seed_from_u64(7);
        for style in VocalChopStyle::ALL {
            assert_ne!(mutate_vocal_style(style, 1.0, &mut rng), style);
            assert_eq!(mutate_vocal_style(style, 0.0, &mut rng), style);
        }
        assert_ne!(mutate_melody_profile("drift_night", 1.0, &mut rng), "drift_night");
    }

    #[test]
    fn winner_magnitude_below_any_loser() {
        let mut rng = ChaCha8Rng::seed_from_u64(8);
        let a = agent("a");
        for _ in 0..200 {
            let m = mutation_magnitude(&a, 10, 5.0, true, &mut rng);
            assert!((0.03..=0.12).contains(&m));
            assert!(m < LOSER_BASE_MAGNITUDE);
        }
    }

    #[test]
    fn zero_average_uses_wide_band() {
        let mut rng = ChaCha8Rng::seed_from_u64(9);
        let a = agent("a");
        for _ in 0..200 {
            let m = mutation_magnitude(&a, 0, 0.0, false, &mut rng);
            assert!((0.2..=0.4).contains(&m));
        }
    }

    #[test]
    fn losing_streak_adds_pressure() {
        let mut rng = ChaCha8Rng::seed_from_u64(10);
        let mut a = agent("a");
        a.stats = AgentStats {
            total_battles: 6,
            wins: 1,
            total_likes: 10,
        };
        let m = mutation_magnitude(&a, 5, 5.0, false, &mut rng);
        assert!((m - 0.25).abs() < 1e-12);
        assert_eq!(mutation_magnitude(&a, 0, 5.0, false, &mut rng), MAX_MAGNITUDE);
    }

    #[test]
    fn round_scenario() {
        let mut agents = vec![agent("a"), agent("b"), agent("c")];
        let res = results(&[("a", 10), ("b", 5), ("c", 0)]);
        let mut rng = ChaCha8Rng::seed_from_u64(11);
        let reports = evolve_after_battle(&mut agents, &res, &mut rng);

        assert_eq!(reports.len(), 3);
        assert_eq!(reports[0].agent_id, "a");
        assert!(reports[0].won);
        assert!(!reports[1].won && !reports[2].won);
        assert!((0.03..=0.12).contains(&reports[0].magnitude));
        assert_eq!(reports[1].magnitude, 0.15);
        assert_eq!(reports[2].magnitude, 0.65);
        assert_eq!(reports[0].agent_name, "A");

        for (agent, report) in agents.iter().zip(&reports) {
            assert_eq!(agent.generation, 2);
            assert_eq!(report.generation, 2);
            assert_eq!(agent.dna_history.len(), 1);
            assert_eq!(agent.dna_history[0], Dna::default());
            assert_eq!(agent.stats.total_battles, 1);
        }
        assert_eq!(agents[0].stats.wins, 1);
        assert_eq!(agents[0].stats.total_likes, 10);
        assert_eq!(agents[2].stats.wins, 0);
    }

    #[test]
    fn changed_params_match_dna_diff() {
        let mut agents = vec![agent("a"), agent("b")];
        let res = results(&[("a", 3), ("b", 1)]);
        let mut rng = ChaCha8Rng::seed_from_u64(12);
        let reports = evolve_after_battle(&mut agents, &res, &mut rng);
        for (agent, report) in agents.iter().zip(&reports) {
            let expected = diff_dna(&agent.dna_history[0], &agent.dna);
            assert_eq!(report.changed_params, expected);
            for (key, change) in &report.changed_params {
                assert_ne!(change.old, change.new, "{key} listed but unchanged");
            }
        }
    }

    #[test]
    fn all_zero_likes_first_agent_wins() {
        let mut agents = vec![agent("x"), agent("y"), agent("z")];
        let res = results(&[]);
        let mut rng = ChaCha8Rng::seed_from_u64(13);
        let reports = evolve_after_battle(&mut agents, &res, &mut rng);
        assert!(reports[0].won);
        for r in &reports[1..] {
            assert!(!r.won);
            assert!((0.2..=0.4).contains(&r.magnitude));
        }
    }

    #[test]
    fn ties_go_to_earlier_participant() {
        assert_eq!(winner_index(&[3, 7, 7, 1]), Some(1));
        assert_eq!(winner_index(&[]), None);
    }

    #[test]
    fn empty_round_is_empty_report() {
        let mut rng = ChaCha8Rng::seed_from_u64(14);
        assert!(evolve_after_battle(&mut [], &results(&[("a", 1)]), &mut rng).is_empty());
    }
}
