//! Battle bookkeeping — entries, votes and the finalized like tally the
//! evolution engine consumes.

use std::collections::BTreeMap;
use std::path::PathBuf;

use serde::{Deserialize, Deserializer, Serialize, Serializer};
use tracing::info;

use crate::error::BattleError;

// ── Results ─────────────────────────────────────────────────

/// Ordered agent id → likes mapping for one finished round.
///
/// Serializes as a JSON object. Deserialized objects come back sorted by
/// agent id; lookups never depend on order.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct BattleResults {
    entries: Vec<(String, u64)>,
}

impl BattleResults {
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the likes for `agent_id`, replacing any earlier value in place.
    pub fn insert(&mut self, agent_id: impl Into<String>, likes: u64) {
        let agent_id = agent_id.into();
        match self.entries.iter_mut().find(|(id, _)| *id == agent_id) {
            Some(entry) => entry.1 = likes,
            None => self.entries.push((agent_id, likes)),
        }
    }

    pub fn get(&self, agent_id: &str) -> Option<u64> {
        self.entries
            .iter()
            .find(|(id, _)| id == agent_id)
            .map(|&(_, likes)| likes)
    }

    /// Likes for `agent_id`, 0 when absent.
    pub fn likes_for(&self, agent_id: &str) -> u64 {
        self.get(agent_id).unwrap_or(0)
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, u64)> {
        self.entries.iter().map(|(id, likes)| (id.as_str(), *likes))
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn total(&self) -> u64 {
        self.entries.iter().map(|(_, likes)| likes).sum()
    }
}

impl<S: Into<String>> FromIterator<(S, u64)> for BattleResults {
    fn from_iter<I: IntoIterator<Item = (S, u64)>>(iter: I) -> Self {
        let mut results = BattleResults::new();
        for (id, likes) in iter {
            results.insert(id, likes);
        }
        results
    }
}

impl Serialize for BattleResults {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_map(self.iter())
    }
}

impl<'de> Deserialize<'de> for BattleResults {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let map = BTreeMap::<String, u64>::deserialize(deserializer)?;
        Ok(map.into_iter().collect())
    }
}

// ── Battle ──────────────────────────────────────────────────

/// One agent's track in a battle.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BattleEntry {
    pub agent_id: String,
    pub track_path: PathBuf,
    #[serde(default)]
    pub votes: u64,
}

/// A head-to-head round between agent tracks.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Battle {
    pub id: String,
    /// Seconds since the Unix epoch.
    pub timestamp: u64,
    pub entries: Vec<BattleEntry>,
    #[serde(default)]
    pub finalized: bool,
    #[serde(default)]
    pub winner_id: Option<String>,
}

impl Battle {
    pub fn new(id: impl Into<String>, timestamp: u64) -> Self {
        Battle {
            id: id.into(),
            timestamp,
            entries: Vec::new(),
            finalized: false,
            winner_id: None,
        }
    }

    /// Enter a track. Re-entering an agent replaces its track and keeps
    /// its place.
    pub fn add_entry(&mut self, agent_id: impl Into<String>, track_path: impl Into<PathBuf>) {
        let agent_id = agent_id.into();
        let track_path = track_path.into();
        match self.entries.iter_mut().find(|e| e.agent_id == agent_id) {
            Some(entry) => entry.track_path = track_path,
            None => self.entries.push(BattleEntry {
                agent_id,
                track_path,
                votes: 0,
            }),
        }
    }

    pub fn with_entry(mut self, agent_id: impl Into<String>, track_path: impl Into<PathBuf>) -> Self {
        self.add_entry(agent_id, track_path);
        self
    }

    pub fn vote(&mut self, agent_id: &str) -> Result<(), BattleError> {
        if self.finalized {
            return Err(BattleError::AlreadyFinalized);
        }
        let entry = self
            .entries
            .iter_mut()
            .find(|e| e.agent_id == agent_id)
            .ok_or_else(|| BattleError::UnknownAgent {
                agent_id: agent_id.to_string(),
            })?;
        entry.votes += 1;
        Ok(())
    }

    /// Close voting and return the winner: the first entry holding the
    /// maximum vote count.
    pub fn finalize(&mut self) -> Result<&str, BattleError> {
        if self.finalized {
            return Err(BattleError::AlreadyFinalized);
        }
        let mut winner: Option<&BattleEntry> = None;
        for entry in &self.entries {
            if winner.is_none_or(|w| entry.votes > w.votes) {
                winner = Some(entry);
            }
        }
        let winner = winner.ok_or(BattleError::NoEntries)?;
        info!(battle = %self.id, winner = %winner.agent_id, votes = winner.votes, "battle finalized");

        self.winner_id = Some(winner.agent_id.clone());
        self.finalized = true;
        Ok(self.winner_id.as_deref().unwrap_or_default())
    }

    /// Votes per agent, in entry order.
    pub fn results(&self) -> BattleResults {
        self.entries
            .iter()
            .map(|e| (e.agent_id.as_str(), e.votes))
            .collect()
    }

    pub fn total_votes(&self) -> u64 {
        self.entries.iter().map(|e| e.votes).sum()
    }
}
