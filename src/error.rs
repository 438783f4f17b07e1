use std::path::PathBuf;

use thiserror::Error;

/// Crate-wide result alias.
pub type Result<T, E = ArenaError> = std::result::Result<T, E>;

#[derive(Debug, Error)]
pub enum ArenaError {
    #[error("I/O error on {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("WAV error on {path}: {source}")]
    Wav {
        path: PathBuf,
        #[source]
        source: hound::Error,
    },
    #[error("WAV encode error: {0}")]
    WavEncode(#[source] hound::Error),
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
    #[error("Invalid DNA: {0}")]
    InvalidDna(String),
    #[error(transparent)]
    Battle(#[from] BattleError),
}

/// Vote bookkeeping failures. The evolution engine itself never raises these;
/// it consumes the results of an already-finalized battle.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum BattleError {
    #[error("Battle already finalized")]
    AlreadyFinalized,
    #[error("Agent {agent_id} not in this battle")]
    UnknownAgent { agent_id: String },
    #[error("No entries in battle")]
    NoEntries,
}

impl ArenaError {
    pub(crate) fn io(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        ArenaError::Io {
            path: path.into(),
            source,
        }
    }

    pub(crate) fn wav(path: impl Into<PathBuf>, source: hound::Error) -> Self {
        ArenaError::Wav {
            path: path.into(),
            source,
        }
    }
}
