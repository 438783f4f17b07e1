//! Competing agents and their lifetime statistics.

use serde::{Deserialize, Serialize};

use crate::dna::Dna;

/// Lifetime battle record. Counters only ever grow.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct AgentStats {
    pub total_battles: u32,
    pub wins: u32,
    pub total_likes: u64,
}

impl AgentStats {
    pub fn win_rate(&self) -> f64 {
        if self.total_battles == 0 {
            0.0
        } else {
            self.wins as f64 / self.total_battles as f64
        }
    }

    pub fn avg_likes_per_track(&self) -> f64 {
        if self.total_battles == 0 {
            0.0
        } else {
            self.total_likes as f64 / self.total_battles as f64
        }
    }
}

/// A competing agent in the arena.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Agent {
    pub id: String,
    pub name: String,
    #[serde(default)]
    pub description: String,
    /// Starts at 1, incremented once per evolution step.
    pub generation: u32,
    pub dna: Dna,
    #[serde(default)]
    pub stats: AgentStats,
    /// Previous DNA snapshots, oldest first. Append-only.
    #[serde(default)]
    pub dna_history: Vec<Dna>,
}

impl Agent {
    pub fn new(id: impl Into<String>, name: impl Into<String>, dna: Dna) -> Self {
        Agent {
            id: id.into(),
            name: name.into(),
            description: String::new(),
            generation: 1,
            dna,
            stats: AgentStats::default(),
            dna_history: Vec::new(),
        }
    }

    pub fn record_battle(&mut self, likes: u64, won: bool) {
        self.stats.total_battles += 1;
        self.stats.total_likes += likes;
        if won {
            self.stats.wins += 1;
        }
    }

    /// Archive the current DNA and adopt `new_dna` as the next generation.
    pub fn evolve(&mut self, new_dna: Dna) {
        let previous = std::mem::replace(&mut self.dna, new_dna);
        self.dna_history.push(previous);
        self.generation += 1;
    }
}
