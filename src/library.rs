//! Sample library — named sources of categorized one-shot samples.
//!
//! A *source* (or pack) is a named collection of samples split into the
//! five [`SampleCategory`] folders. Stems ask the library for a category
//! under a free-text pack selector and get back ordered [`SampleRef`]s,
//! which are then loaded as shared mono buffers.
//!
//! Two implementations are provided:
//! - [`PackLibrary`] reads WAV files from disk and decodes each file once.
//! - [`MemoryLibrary`] holds buffers in memory (tests, wasm builds).

use std::collections::{BTreeMap, HashMap};
use std::fs;
use std::path::{Path, PathBuf};
use std::sync::{Arc, OnceLock};

use parking_lot::Mutex;
use rand::{Rng, RngCore};
use serde::{Deserialize, Serialize};
use tracing::{debug, warn};

use crate::config::GeneratorConfig;
use crate::error::{ArenaError, Result};

/// Name of the source backed by the base samples directory.
pub const CORE_PACK: &str = "core";

/// Variation below this always picks the first candidate.
const VARIATION_RANDOM_THRESHOLD: f64 = 0.3;

// ── Categories ──────────────────────────────────────────────

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SampleCategory {
    Drums,
    Bass,
    Cowbell,
    Vocals,
    Melody,
}

impl SampleCategory {
    pub const ALL: [SampleCategory; 5] = [
        SampleCategory::Drums,
        SampleCategory::Bass,
        SampleCategory::Cowbell,
        SampleCategory::Vocals,
        SampleCategory::Melody,
    ];

    /// Folder name inside a source.
    pub fn as_str(&self) -> &'static str {
        match self {
            SampleCategory::Drums => "drums",
            SampleCategory::Bass => "bass",
            SampleCategory::Cowbell => "cowbell",
            SampleCategory::Vocals => "vocals",
            SampleCategory::Melody => "melody",
        }
    }
}

// ── Pack selectors ──────────────────────────────────────────

/// Parsed form of the DNA `sample_pack` string.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PackSelector {
    tokens: Vec<String>,
}

impl PackSelector {
    /// Lower-case, treat `| + ; /` as commas, split and trim. An empty
    /// result selects `core`.
    pub fn parse(selector: &str) -> Self {
        let normalized: String = selector
            .to_lowercase()
            .chars()
            .map(|c| if matches!(c, '|' | '+' | ';' | '/') { ',' } else { c })
            .collect();
        let mut tokens: Vec<String> = normalized
            .split(',')
            .map(str::trim)
            .filter(|t| !t.is_empty())
            .map(str::to_string)
            .collect();
        if tokens.is_empty() {
            tokens.push(CORE_PACK.to_string());
        }
        PackSelector { tokens }
    }

    pub fn tokens(&self) -> &[String] {
        &self.tokens
    }

    /// `any` or `all` among the tokens.
    pub fn is_wildcard(&self) -> bool {
        self.tokens.iter().any(|t| t == "any" || t == "all")
    }

    /// A source matches when a token equals or is contained in its name.
    pub fn matches(&self, source_name: &str) -> bool {
        let name = source_name.to_lowercase();
        self.is_wildcard() || self.tokens.iter().any(|t| name.contains(t.as_str()))
    }

    /// Samples that `collect` yields for the selected sources, or for every
    /// source when the selected ones hold none.
    fn collect_with_fallback<'a, I, F>(&self, names: I, mut collect: F) -> Vec<SampleRef>
    where
        I: IntoIterator<Item = &'a str>,
        F: FnMut(usize) -> Vec<SampleRef>,
    {
        let names: Vec<&str> = names.into_iter().collect();
        let selected: Vec<SampleRef> = (0..names.len())
            .filter(|&i| self.matches(names[i]))
            .flat_map(&mut collect)
            .collect();
        if !selected.is_empty() {
            return selected;
        }
        (0..names.len()).flat_map(collect).collect()
    }
}

// ── Library trait ───────────────────────────────────────────

/// Reference to one sample in a library.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct SampleRef {
    pub source: String,
    pub category: SampleCategory,
    /// File name (pack library) or registered name (memory library).
    pub name: String,
    /// Backing file, if any.
    pub path: Option<PathBuf>,
}

pub trait SampleLibrary: Send + Sync {
    /// Sorted names of all known sources.
    fn pack_names(&self) -> Vec<String>;

    /// Ordered samples of `category` from the sources `selector` picks.
    /// When those sources hold nothing for the category, every source is
    /// used.
    fn list(&self, category: SampleCategory, selector: &str) -> Vec<SampleRef>;

    /// Decoded mono waveform in [-1, 1].
    fn load(&self, sample: &SampleRef) -> Option<Arc<[f64]>>;

    /// Whether `selector` names at least one known source.
    fn has_pack(&self, selector: &str) -> bool {
        let parsed = PackSelector::parse(selector);
        parsed.is_wildcard() || self.pack_names().iter().any(|n| parsed.matches(n))
    }

    /// Choose one sample: narrow by a case-insensitive `keyword` in the
    /// name (ignored if nothing matches), then take the first entry when
    /// `variation` is low or a uniform random one otherwise.
    fn pick(
        &self,
        category: SampleCategory,
        variation: f64,
        keyword: Option<&str>,
        selector: &str,
        rng: &mut dyn RngCore,
    ) -> Option<SampleRef> {
        let mut candidates = self.list(category, selector);
        if let Some(keyword) = keyword {
            let keyword = keyword.to_lowercase();
            let filtered: Vec<SampleRef> = candidates
                .iter()
                .filter(|s| s.name.to_lowercase().contains(&keyword))
                .cloned()
                .collect();
            if !filtered.is_empty() {
                candidates = filtered;
            }
        }
        if candidates.is_empty() {
            return None;
        }
        let index = if variation < VARIATION_RANDOM_THRESHOLD {
            0
        } else {
            rng.gen_range(0..candidates.len())
        };
        Some(candidates.swap_remove(index))
    }

    /// [`SampleLibrary::pick`] followed by [`SampleLibrary::load`].
    fn pick_loaded(
        &self,
        category: SampleCategory,
        variation: f64,
        keyword: Option<&str>,
        selector: &str,
        rng: &mut dyn RngCore,
    ) -> Option<Arc<[f64]>> {
        let sample = self.pick(category, variation, keyword, selector, rng)?;
        self.load(&sample)
    }
}

// ── Filesystem packs ────────────────────────────────────────

#[derive(Debug, Clone)]
struct PackSource {
    name: String,
    root: PathBuf,
}

/// Decoded buffers keyed by path. Each path is decoded at most once, even
/// when several renders ask for it at the same time; failures are cached
/// as `None`.
#[derive(Debug, Default)]
struct SampleCache {
    entries: Mutex<HashMap<PathBuf, Arc<OnceLock<Option<Arc<[f64]>>>>>>,
}

impl SampleCache {
    fn get_or_load(&self, path: &Path) -> Option<Arc<[f64]>> {
        let cell = {
            let mut entries = self.entries.lock();
            Arc::clone(entries.entry(path.to_path_buf()).or_default())
        };
        cell.get_or_init(|| match decode_wav(path) {
            Ok(samples) => {
                debug!(path = %path.display(), samples = samples.len(), "decoded sample");
                Some(Arc::from(samples))
            }
            Err(e) => {
                warn!(path = %path.display(), error = %e, "failed to decode sample");
                None
            }
        })
        .clone()
    }

    fn len(&self) -> usize {
        self.entries.lock().len()
    }
}

/// Sample library backed by directories of WAV files.
#[derive(Debug)]
pub struct PackLibrary {
    sources: Vec<PackSource>,
    cache: SampleCache,
}

impl PackLibrary {
    /// Discover sources: `core` (the base directory), each subdirectory of
    /// the pack root, then each existing extra directory. Missing
    /// directories are skipped; a later source replaces an earlier one of
    /// the same name.
    pub fn open(config: &GeneratorConfig) -> Self {
        let mut sources = vec![PackSource {
            name: CORE_PACK.to_string(),
            root: config.samples_dir.clone(),
        }];

        let packs_root = config.packs_root();
        if let Ok(entries) = fs::read_dir(&packs_root) {
            let mut packs: Vec<PackSource> = entries
                .filter_map(|entry| entry.ok())
                .map(|entry| entry.path())
                .filter(|path| path.is_dir())
                .filter_map(|path| source_for_dir(&path))
                .collect();
            packs.sort_by(|a, b| a.name.cmp(&b.name));
            for source in packs {
                insert_source(&mut sources, source);
            }
        }

        let extras = config
            .extra_pack_dirs
            .iter()
            .filter(|dir| dir.is_dir())
            .filter_map(|dir| source_for_dir(dir));
        for source in extras {
            insert_source(&mut sources, source);
        }

        debug!(
            sources = sources.len(),
            packs_root = %packs_root.display(),
            "discovered sample sources"
        );
        PackLibrary {
            sources,
            cache: SampleCache::default(),
        }
    }

    /// Number of distinct files the cache has been asked for.
    pub fn cached_files(&self) -> usize {
        self.cache.len()
    }
}

/// Add `source`, replacing an earlier source of the same name in place.
fn insert_source(sources: &mut Vec<PackSource>, source: PackSource) {
    match sources.iter_mut().find(|s| s.name == source.name) {
        Some(existing) => {
            debug!(name = %source.name, root = %source.root.display(), "sample source replaced");
            *existing = source;
        }
        None => sources.push(source),
    }
}

fn source_for_dir(dir: &Path) -> Option<PackSource> {
    let name = dir.file_name()?.to_string_lossy().to_lowercase();
    Some(PackSource {
        name,
        root: dir.to_path_buf(),
    })
}

/// All `*.wav` files under `dir`, recursively, sorted by path.
fn collect_wavs(dir: &Path) -> Vec<PathBuf> {
    let mut found = Vec::new();
    let mut pending = vec![dir.to_path_buf()];
    while let Some(current) = pending.pop() {
        let Ok(entries) = fs::read_dir(&current) else {
            continue;
        };
        for entry in entries.filter_map(|e| e.ok()) {
            let path = entry.path();
            if path.is_dir() {
                pending.push(path);
            } else if path
                .extension()
                .is_some_and(|ext| ext.eq_ignore_ascii_case("wav"))
            {
                found.push(path);
            }
        }
    }
    found.sort();
    found
}

impl SampleLibrary for PackLibrary {
    fn pack_names(&self) -> Vec<String> {
        let mut names: Vec<String> = self.sources.iter().map(|s| s.name.clone()).collect();
        names.sort();
        names
    }

    fn list(&self, category: SampleCategory, selector: &str) -> Vec<SampleRef> {
        let names = self.sources.iter().map(|s| s.name.as_str());
        PackSelector::parse(selector).collect_with_fallback(names, |i| {
            let source = &self.sources[i];
            collect_wavs(&source.root.join(category.as_str()))
                .into_iter()
                .map(|path| SampleRef {
                    source: source.name.clone(),
                    category,
                    name: path
                        .file_name()
                        .map(|n| n.to_string_lossy().into_owned())
                        .unwrap_or_default(),
                    path: Some(path),
                })
                .collect()
        })
    }

    fn load(&self, sample: &SampleRef) -> Option<Arc<[f64]>> {
        let path = sample.path.as_deref()?;
        self.cache.get_or_load(path)
    }
}

// ── WAV decoding ────────────────────────────────────────────

/// Decode a WAV file to mono `f64` in [-1, 1]. Integer PCM is divided by
/// the format's positive full scale; channels are averaged.
pub fn decode_wav(path: &Path) -> Result<Vec<f64>> {
    let reader = hound::WavReader::open(path).map_err(|e| ArenaError::wav(path, e))?;
    let spec = reader.spec();
    let channels = spec.channels.max(1) as usize;

    let decoded: std::result::Result<Vec<f64>, hound::Error> = match (
        spec.sample_format,
        spec.bits_per_sample,
    ) {
        (hound::SampleFormat::Float, _) => reader
            .into_samples::<f32>()
            .map(|s| s.map(f64::from))
            .collect(),
        (hound::SampleFormat::Int, 16) => reader
            .into_samples::<i16>()
            .map(|s| s.map(|v| f64::from(v) / 32767.0))
            .collect(),
        (hound::SampleFormat::Int, 32) => reader
            .into_samples::<i32>()
            .map(|s| s.map(|v| f64::from(v) / 2147483647.0))
            .collect(),
        (hound::SampleFormat::Int, bits) => {
            let full_scale = ((1i64 << (bits.clamp(2, 32) - 1)) - 1) as f64;
            reader
                .into_samples::<i32>()
                .map(|s| s.map(|v| f64::from(v) / full_scale))
                .collect()
        }
    };
    let interleaved = decoded.map_err(|e| ArenaError::wav(path, e))?;

    if channels == 1 {
        return Ok(interleaved);
    }
    Ok(interleaved
        .chunks(channels)
        .map(|frame| frame.iter().sum::<f64>() / frame.len() as f64)
        .collect())
}

// ── In-memory library ───────────────────────────────────────

#[derive(Debug, Clone, Default)]
struct MemorySource {
    name: String,
    samples: BTreeMap<SampleCategory, BTreeMap<String, Arc<[f64]>>>,
}

/// Sample library held entirely in memory. Sources keep insertion order;
/// samples within a category are ordered by name.
#[derive(Debug, Clone, Default)]
pub struct MemoryLibrary {
    sources: Vec<MemorySource>,
}

impl MemoryLibrary {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a sample, creating the source if needed.
    pub fn insert(
        &mut self,
        source: &str,
        category: SampleCategory,
        name: &str,
        samples: impl Into<Arc<[f64]>>,
    ) {
        let source_name = source.to_lowercase();
        let index = match self.sources.iter().position(|s| s.name == source_name) {
            Some(i) => i,
            None => {
                self.sources.push(MemorySource {
                    name: source_name,
                    samples: BTreeMap::new(),
                });
                self.sources.len() - 1
            }
        };
        self.sources[index]
            .samples
            .entry(category)
            .or_default()
            .insert(name.to_string(), samples.into());
    }

    /// Builder form of [`MemoryLibrary::insert`].
    pub fn with_sample(
        mut self,
        source: &str,
        category: SampleCategory,
        name: &str,
        samples: impl Into<Arc<[f64]>>,
    ) -> Self {
        self.insert(source, category, name, samples);
        self
    }
}

impl SampleLibrary for MemoryLibrary {
    fn pack_names(&self) -> Vec<String> {
        let mut names: Vec<String> = self.sources.iter().map(|s| s.name.clone()).collect();
        names.sort();
        names
    }

    fn list(&self, category: SampleCategory, selector: &str) -> Vec<SampleRef> {
        let names = self.sources.iter().map(|s| s.name.as_str());
        PackSelector::parse(selector).collect_with_fallback(names, |i| {
            let source = &self.sources[i];
            source
                .samples
                .get(&category)
                .into_iter()
                .flat_map(|by_name| by_name.keys())
                .map(|name| SampleRef {
                    source: source.name.clone(),
                    category,
                    name: name.clone(),
                    path: None,
                })
                .collect()
        })
    }

    fn load(&self, sample: &SampleRef) -> Option<Arc<[f64]>> {
        self.sources
            .iter()
            .find(|s| s.name == sample.source)?
            .samples
            .get(&sample.category)?
            .get(&sample.name)
            .cloned()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::SeedableRng;
    use rand_chacha::ChaCha8Rng;

    fn write_wav_i16(path: &Path, channels: u16, samples: &[i16]) {
        fs::create_dir_all(path.parent().unwrap()).unwrap();
        let spec = hound::WavSpec {
            channels,
            sample_rate: 44100,
            bits_per_sample: 16,
            sample_format: hound::SampleFormat::Int,
        };
        let mut writer = hound::WavWriter::create(path, spec).unwrap();
        for &s in samples {
            writer.write_sample(s).unwrap();
        }
        writer.finalize().unwrap();
    }

    fn memory_fixture() -> MemoryLibrary {
        MemoryLibrary::new()
            .with_sample("core", SampleCategory::Drums, "kick_01", vec![1.0; 8])
            .with_sample("core", SampleCategory::Drums, "snare_01", vec![0.5; 8])
            .with_sample("dark_pack", SampleCategory::Drums, "kick_dark", vec![0.25; 8])
            .with_sample("dark_pack", SampleCategory::Vocals, "chant", vec![0.1; 8])
    }

    #[test]
    fn selector_parsing() {
        assert_eq!(PackSelector::parse("").tokens(), &["core".to_string()]);
        assert_eq!(PackSelector::parse(" ,; ").tokens(), &["core".to_string()]);
        assert_eq!(
            PackSelector::parse("Dark|Core + drift/x;y").tokens(),
            &["dark", "core", "drift", "x", "y"].map(String::from)
        );
    }

    #[test]
    fn selector_matching() {
        let sel = PackSelector::parse("dark");
        assert!(sel.matches("dark_pack"));
        assert!(sel.matches("DARK"));
        assert!(!sel.matches("core"));
        assert!(PackSelector::parse("ALL").matches("anything"));
        assert!(PackSelector::parse("core,any").is_wildcard());
    }

    #[test]
    fn list_falls_back_to_all_sources() {
        let lib = memory_fixture();
        let names: Vec<String> = lib
            .list(SampleCategory::Drums, "missing")
            .into_iter()
            .map(|s| s.name)
            .collect();
        assert_eq!(names, vec!["kick_01", "snare_01", "kick_dark"]);

        let dark = lib.list(SampleCategory::Drums, "dark");
        assert_eq!(dark.len(), 1);
        assert_eq!(dark[0].source, "dark_pack");
    }

    #[test]
    fn selected_pack_without_category_falls_back() {
        let lib = MemoryLibrary::new()
            .with_sample("core", SampleCategory::Vocals, "chant_core", vec![0.2; 8])
            .with_sample("dark_pack", SampleCategory::Drums, "kick_dark", vec![0.3; 8]);

        let vocals = lib.list(SampleCategory::Vocals, "dark_pack");
        assert_eq!(vocals.len(), 1);
        assert_eq!(vocals[0].source, "core");
        assert_eq!(vocals[0].name, "chant_core");

        let drums = lib.list(SampleCategory::Drums, "dark_pack");
        assert_eq!(drums.len(), 1);
        assert_eq!(drums[0].source, "dark_pack");

        let mut rng = ChaCha8Rng::seed_from_u64(5);
        assert!(lib
            .pick_loaded(SampleCategory::Vocals, 0.0, Some("dark"), "dark_pack", &mut rng)
            .is_some());
    }

    #[test]
    fn has_pack_and_names() {
        let lib = memory_fixture();
        assert_eq!(lib.pack_names(), vec!["core", "dark_pack"]);
        assert!(lib.has_pack("dark"));
        assert!(lib.has_pack("any"));
        assert!(!lib.has_pack("nope"));
    }

    #[test]
    fn pick_respects_keyword_and_variation() {
        let lib = memory_fixture();
        let mut rng = ChaCha8Rng::seed_from_u64(1);

        let snare = lib
            .pick(SampleCategory::Drums, 0.0, Some("SNARE"), "core", &mut rng)
            .unwrap();
        assert_eq!(snare.name, "snare_01");

        // Unmatched keyword is ignored; low variation takes the first entry
        let first = lib
            .pick(SampleCategory::Drums, 0.1, Some("clap"), "core", &mut rng)
            .unwrap();
        assert_eq!(first.name, "kick_01");

        assert!(lib.pick(SampleCategory::Melody, 0.9, None, "core", &mut rng).is_none());
    }

    #[test]
    fn pick_with_high_variation_stays_in_candidates() {
        let lib = memory_fixture();
        let mut rng = ChaCha8Rng::seed_from_u64(99);
        for _ in 0..20 {
            let s = lib
                .pick(SampleCategory::Drums, 0.9, Some("kick"), "any", &mut rng)
                .unwrap();
            assert!(s.name.starts_with("kick"));
        }
    }

    #[test]
    fn memory_load_returns_shared_buffer() {
        let lib = memory_fixture();
        let sample = &lib.list(SampleCategory::Vocals, "dark")[0];
        let a = lib.load(sample).unwrap();
        let b = lib.load(sample).unwrap();
        assert!(Arc::ptr_eq(&a, &b));
        assert_eq!(a.len(), 8);
    }

    #[test]
    fn pack_library_discovers_sources() {
        let tmp = tempfile::tempdir().unwrap();
        let base = tmp.path().join("samples");
        write_wav_i16(&base.join("drums/kick_a.wav"), 1, &[32767, 0]);
        write_wav_i16(&base.join("drums/nested/hat_b.wav"), 1, &[0, 0]);
        write_wav_i16(
            &tmp.path().join("samples_packs/Dark_Pack/drums/kick_dark.wav"),
            1,
            &[100],
        );
        let extra = tmp.path().join("extra_kit");
        write_wav_i16(&extra.join("vocals/chant.wav"), 1, &[1]);

        let config = GeneratorConfig::new(&base)
            .with_extra_pack_dir(&extra)
            .with_extra_pack_dir(tmp.path().join("does_not_exist"));
        let lib = PackLibrary::open(&config);

        assert_eq!(lib.pack_names(), vec!["core", "dark_pack", "extra_kit"]);
        let core: Vec<String> = lib
            .list(SampleCategory::Drums, "core")
            .into_iter()
            .map(|s| s.name)
            .collect();
        assert_eq!(core, vec!["kick_a.wav", "hat_b.wav"]);
        assert_eq!(lib.list(SampleCategory::Drums, "dark").len(), 1);
        assert_eq!(lib.list(SampleCategory::Vocals, "extra").len(), 1);
        assert!(lib.list(SampleCategory::Melody, "any").is_empty());
    }

    #[test]
    fn pack_library_fallback_per_category() {
        let tmp = tempfile::tempdir().unwrap();
        let base = tmp.path().join("samples");
        write_wav_i16(&base.join("vocals/chant.wav"), 1, &[1]);
        write_wav_i16(
            &tmp.path().join("samples_packs/dark_pack/drums/kick.wav"),
            1,
            &[1],
        );
        let lib = PackLibrary::open(&GeneratorConfig::new(&base));

        let vocals = lib.list(SampleCategory::Vocals, "dark_pack");
        assert_eq!(vocals.len(), 1);
        assert_eq!(vocals[0].source, "core");
        assert_eq!(lib.list(SampleCategory::Drums, "dark_pack")[0].source, "dark_pack");
    }

    #[test]
    fn later_source_with_same_name_wins() {
        let tmp = tempfile::tempdir().unwrap();
        let base = tmp.path().join("samples");
        write_wav_i16(&base.join("drums/base_kick.wav"), 1, &[1]);
        let override_dir = tmp.path().join("override/Core");
        write_wav_i16(&override_dir.join("drums/override_kick.wav"), 1, &[1]);

        let config = GeneratorConfig::new(&base).with_extra_pack_dir(&override_dir);
        let lib = PackLibrary::open(&config);

        assert_eq!(lib.pack_names(), vec!["core"]);
        let names: Vec<String> = lib
            .list(SampleCategory::Drums, "core")
            .into_iter()
            .map(|s| s.name)
            .collect();
        assert_eq!(names, vec!["override_kick.wav"]);
    }

    #[test]
    fn pack_library_decodes_and_caches() {
        let tmp = tempfile::tempdir().unwrap();
        let base = tmp.path().join("samples");
        write_wav_i16(&base.join("bass/sub.wav"), 2, &[32767, -32767, 16384, 16384]);
        let lib = PackLibrary::open(&GeneratorConfig::new(&base));

        let sample = &lib.list(SampleCategory::Bass, "core")[0];
        let a = lib.load(sample).unwrap();
        assert_eq!(a.len(), 2);
        assert!(a[0].abs() < 1e-12, "stereo frames should be averaged");
        assert!((a[1] - 16384.0 / 32767.0).abs() < 1e-12);

        let b = lib.load(sample).unwrap();
        assert!(Arc::ptr_eq(&a, &b));
        assert_eq!(lib.cached_files(), 1);
    }

    #[test]
    fn unreadable_file_behaves_as_missing() {
        let tmp = tempfile::tempdir().unwrap();
        let base = tmp.path().join("samples");
        fs::create_dir_all(base.join("melody")).unwrap();
        fs::write(base.join("melody/broken.wav"), b"not a wav").unwrap();
        let lib = PackLibrary::open(&GeneratorConfig::new(&base));

        let sample = &lib.list(SampleCategory::Melody, "core")[0];
        assert!(lib.load(sample).is_none());
        assert!(lib.load(sample).is_none());
    }

    #[test]
    fn decode_float_wav() {
        let tmp = tempfile::tempdir().unwrap();
        let path = tmp.path().join("f.wav");
        let spec = hound::WavSpec {
            channels: 1,
            sample_rate: 44100,
            bits_per_sample: 32,
            sample_format: hound::SampleFormat::Float,
        };
        let mut writer = hound::WavWriter::create(&path, spec).unwrap();
        writer.write_sample(0.5f32).unwrap();
        writer.write_sample(-0.25f32).unwrap();
        writer.finalize().unwrap();

        assert_eq!(decode_wav(&path).unwrap(), vec![0.5, -0.25]);
    }
}
