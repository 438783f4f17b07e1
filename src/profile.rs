//! Melody style profiles.
//!
//! A closed table of named blueprints inspired by slowed/dark phonk
//! references. Each binds a tonal center, scale, accent grid and per-stem
//! gain multipliers. Unknown ids resolve to [`DEFAULT_PROFILE`].

/// Identifier used whenever a DNA names no profile or an unknown one.
pub const DEFAULT_PROFILE: &str = "acido_slowed";

#[derive(Debug, Clone, PartialEq)]
pub struct StyleProfile {
    pub id: &'static str,
    /// 808 root frequency in Hz.
    pub root_hz: f64,
    /// Scale degrees in semitones above the root.
    pub intervals: &'static [i32],
    /// Melody accent positions within a bar, in beats.
    pub melody_steps_beats: &'static [f64],
    /// Transposition choices applied on top of the scale degree.
    pub melody_transpose: &'static [i32],
    /// Base chance that the 808 moves to a new note at a bar line.
    pub bass_move_prob: f64,
    pub cowbell_mul: f64,
    pub vocal_mul: f64,
}

pub static PROFILES: [StyleProfile; 5] = [
    StyleProfile {
        id: "acido_slowed",
        root_hz: 43.65, // F
        intervals: &[0, 3, 5, 7, 10],
        melody_steps_beats: &[0.0, 1.5, 3.0],
        melody_transpose: &[-3, -2, 0, 2],
        bass_move_prob: 0.2,
        cowbell_mul: 0.9,
        vocal_mul: 0.9,
    },
    StyleProfile {
        id: "memphis_classic",
        root_hz: 49.00, // G
        intervals: &[0, 3, 5, 7, 10],
        melody_steps_beats: &[0.0, 2.0, 3.5],
        melody_transpose: &[-5, -3, -2, 0, 2],
        bass_move_prob: 0.34,
        cowbell_mul: 1.05,
        vocal_mul: 1.2,
    },
    StyleProfile {
        id: "drift_night",
        root_hz: 41.20, // E
        intervals: &[0, 2, 3, 5, 7, 10],
        melody_steps_beats: &[0.0, 1.0, 2.5, 3.5],
        melody_transpose: &[-7, -5, -3, -2, 0],
        bass_move_prob: 0.28,
        cowbell_mul: 1.15,
        vocal_mul: 0.85,
    },
    StyleProfile {
        id: "cowbell_ritual",
        root_hz: 46.25, // F#
        intervals: &[0, 3, 5, 6, 7, 10],
        melody_steps_beats: &[0.0, 1.5, 2.0, 3.0],
        melody_transpose: &[-5, -3, -2, 0, 3],
        bass_move_prob: 0.24,
        cowbell_mul: 1.35,
        vocal_mul: 0.8,
    },
    StyleProfile {
        id: "shadow_drive",
        root_hz: 38.89, // D#
        intervals: &[0, 1, 3, 5, 7, 8, 10],
        melody_steps_beats: &[0.0, 2.0, 3.0],
        melody_transpose: &[-7, -5, -3, -2, 0, 2],
        bass_move_prob: 0.16,
        cowbell_mul: 0.75,
        vocal_mul: 1.0,
    },
];

/// All profile ids, in table order.
pub fn profile_ids() -> impl Iterator<Item = &'static str> {
    PROFILES.iter().map(|p| p.id)
}

/// Look up a profile by id (case-insensitive), falling back to the default.
pub fn resolve(id: &str) -> &'static StyleProfile {
    let wanted = id.trim().to_lowercase();
    PROFILES
        .iter()
        .find(|p| p.id == wanted)
        .unwrap_or_else(default_profile)
}

pub fn default_profile() -> &'static StyleProfile {
    &PROFILES[0]
}

impl StyleProfile {
    /// Frequencies of each scale degree above the root.
    pub fn scale_frequencies(&self) -> Vec<f64> {
        self.intervals
            .iter()
            .map(|&semi| self.root_hz * 2.0_f64.powf(semi as f64 / 12.0))
            .collect()
    }

    /// Melody degree weights: root-heavy, tapering toward upper degrees.
    pub fn degree_weights(&self) -> Vec<f64> {
        (0..self.intervals.len())
            .map(|i| match i {
                0 => 0.45,
                1 => 0.2,
                _ => 0.12,
            })
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_is_in_table() {
        assert_eq!(default_profile().id, DEFAULT_PROFILE);
    }

    #[test]
    fn resolve_known_and_unknown() {
        assert_eq!(resolve("drift_night").id, "drift_night");
        assert_eq!(resolve("  Shadow_Drive ").id, "shadow_drive");
        assert_eq!(resolve("hyperpop").id, DEFAULT_PROFILE);
        assert_eq!(resolve("").id, DEFAULT_PROFILE);
    }

    #[test]
    fn ids_are_unique() {
        let mut ids: Vec<&str> = profile_ids().collect();
        ids.sort();
        ids.dedup();
        assert_eq!(ids.len(), PROFILES.len());
    }

    #[test]
    fn scale_starts_at_root() {
        for p in &PROFILES {
            let scale = p.scale_frequencies();
            assert_eq!(scale.len(), p.intervals.len());
            assert!((scale[0] - p.root_hz).abs() < 1e-9);
            assert!(scale.windows(2).all(|w| w[1] > w[0]), "{} scale not ascending", p.id);
        }
    }

    #[test]
    fn degree_weights_match_scale_length() {
        let p = resolve("shadow_drive");
        let w = p.degree_weights();
        assert_eq!(w.len(), 7);
        assert_eq!(&w[..3], &[0.45, 0.2, 0.12]);
    }
}
