//! Generator configuration: where sample packs live on disk.

use std::env;
use std::ffi::OsStr;
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

/// Environment variable holding extra pack directories (platform path list).
pub const PACK_DIRS_ENV: &str = "PHONK_PACK_DIRS";

/// Directory name of the pack root, resolved next to the base samples dir.
const DEFAULT_PACKS_DIR_NAME: &str = "samples_packs";

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GeneratorConfig {
    /// Base sample directory, exposed as the `core` pack.
    pub samples_dir: PathBuf,
    /// Root whose subdirectories are packs. `None` means
    /// `<samples_dir>/../samples_packs`.
    #[serde(default)]
    pub packs_dir: Option<PathBuf>,
    /// Additional pack directories, each one a pack of its own.
    #[serde(default)]
    pub extra_pack_dirs: Vec<PathBuf>,
}

impl GeneratorConfig {
    pub fn new(samples_dir: impl Into<PathBuf>) -> Self {
        GeneratorConfig {
            samples_dir: samples_dir.into(),
            packs_dir: None,
            extra_pack_dirs: Vec::new(),
        }
    }

    /// Like [`GeneratorConfig::new`], plus any directories listed in
    /// `PHONK_PACK_DIRS`.
    pub fn from_env(samples_dir: impl Into<PathBuf>) -> Self {
        let mut config = Self::new(samples_dir);
        if let Some(value) = env::var_os(PACK_DIRS_ENV) {
            config.extra_pack_dirs = parse_pack_dirs(&value);
        }
        config
    }

    pub fn with_packs_dir(mut self, packs_dir: impl Into<PathBuf>) -> Self {
        self.packs_dir = Some(packs_dir.into());
        self
    }

    pub fn with_extra_pack_dir(mut self, dir: impl Into<PathBuf>) -> Self {
        self.extra_pack_dirs.push(dir.into());
        self
    }

    /// The effective pack root.
    pub fn packs_root(&self) -> PathBuf {
        match &self.packs_dir {
            Some(dir) => dir.clone(),
            None => sibling_packs_dir(&self.samples_dir),
        }
    }
}

fn sibling_packs_dir(samples_dir: &Path) -> PathBuf {
    match samples_dir.parent() {
        Some(parent) => parent.join(DEFAULT_PACKS_DIR_NAME),
        None => samples_dir.join("..").join(DEFAULT_PACKS_DIR_NAME),
    }
}

/// Split a platform path list, dropping empty entries.
pub fn parse_pack_dirs(value: &OsStr) -> Vec<PathBuf> {
    env::split_paths(value)
        .filter(|p| !p.as_os_str().is_empty())
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn packs_root_defaults_to_sibling() {
        let config = GeneratorConfig::new("/data/samples");
        assert_eq!(config.packs_root(), PathBuf::from("/data/samples_packs"));
    }

    #[test]
    fn explicit_packs_dir_wins() {
        let config = GeneratorConfig::new("/data/samples").with_packs_dir("/opt/packs");
        assert_eq!(config.packs_root(), PathBuf::from("/opt/packs"));
    }

    #[test]
    fn pack_dir_list_skips_empty_entries() {
        let joined = env::join_paths(["/a/one", "", "/b/two"]).unwrap();
        let dirs = parse_pack_dirs(&joined);
        assert_eq!(dirs, vec![PathBuf::from("/a/one"), PathBuf::from("/b/two")]);
    }

    #[test]
    fn config_json_defaults() {
        let config: GeneratorConfig =
            serde_json::from_str(r#"{"samplesDir": "samples"}"#).unwrap();
        assert_eq!(config, GeneratorConfig::new("samples"));
    }
}
