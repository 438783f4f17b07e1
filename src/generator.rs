//! Track generator — the public render API.
//!
//! A render turns one DNA into a mono loop: each stem gets a child random
//! source drawn from the render's seeded ChaCha stream (always in the same
//! order), the stems are mixed and mastered, and an optional event log
//! records every hit.

use std::fs;
use std::path::Path;
use std::sync::Arc;

use rand::{RngCore, SeedableRng};
use rand_chacha::ChaCha8Rng;
use rayon::prelude::*;
use tracing::{debug, info, instrument};

use crate::config::GeneratorConfig;
use crate::dna::Dna;
use crate::dsp::{SAMPLE_RATE_F64, renderer};
use crate::error::{ArenaError, Result};
use crate::events::{DspSummary, EventLog, EventRecorder, RenderMeta, TrackEvent, round_to};
use crate::library::{PackLibrary, SampleLibrary};
use crate::mix::{self, Stems};
use crate::profile;
use crate::stems::{self, StemContext};

/// Default loop length in seconds.
pub const DEFAULT_DURATION_SECONDS: f64 = 10.0;

/// One entry of a batch render.
#[derive(Debug, Clone, PartialEq)]
pub struct RenderRequest {
    pub dna: Dna,
    pub duration: f64,
    pub seed: Option<u64>,
}

impl RenderRequest {
    pub fn new(dna: Dna, duration: f64, seed: Option<u64>) -> Self {
        RenderRequest {
            dna,
            duration,
            seed,
        }
    }
}

/// Renders DNA into audio using a shared sample library.
#[derive(Clone)]
pub struct TrackGenerator {
    library: Arc<dyn SampleLibrary>,
}

impl std::fmt::Debug for TrackGenerator {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("TrackGenerator")
            .field("packs", &self.library.pack_names())
            .finish()
    }
}

impl TrackGenerator {
    pub fn new(library: Arc<dyn SampleLibrary>) -> Self {
        TrackGenerator { library }
    }

    /// Generator over the filesystem packs described by `config`.
    pub fn from_config(config: &GeneratorConfig) -> Self {
        Self::new(Arc::new(PackLibrary::open(config)))
    }

    pub fn library(&self) -> &dyn SampleLibrary {
        self.library.as_ref()
    }

    /// Sorted names of every known sample source.
    pub fn available_packs(&self) -> Vec<String> {
        self.library.pack_names()
    }

    pub fn has_sample_pack(&self, selector: &str) -> bool {
        self.library.has_pack(selector)
    }

    /// Render a loop of `duration` seconds. The same DNA, duration and seed
    /// always give the same samples; `None` seeds from OS entropy.
    pub fn render_track(&self, dna: &Dna, duration: f64, seed: Option<u64>) -> Vec<f64> {
        self.generate(dna, duration, seed, EventRecorder::disabled()).0
    }

    /// Render and also return the event log. The audio is identical to
    /// [`TrackGenerator::render_track`] for the same inputs.
    pub fn render_track_with_events(
        &self,
        dna: &Dna,
        duration: f64,
        seed: Option<u64>,
    ) -> (Vec<f64>, EventLog) {
        let (audio, events, meta) = self.generate(dna, duration, seed, EventRecorder::enabled());
        (audio, EventLog { meta, events })
    }

    /// Render straight to in-memory WAV bytes.
    pub fn render_wav_bytes(&self, dna: &Dna, duration: f64, seed: Option<u64>) -> Result<Vec<u8>> {
        renderer::render_wav(&self.render_track(dna, duration, seed))
    }

    /// Render to a WAV file, plus a pretty-printed event log when
    /// `events_path` is given. Parent directories are created.
    #[instrument(skip(self, dna), fields(wav = %wav_path.display()))]
    pub fn render_to_files(
        &self,
        dna: &Dna,
        wav_path: &Path,
        events_path: Option<&Path>,
        duration: f64,
        seed: Option<u64>,
    ) -> Result<()> {
        ensure_parent(wav_path)?;
        match events_path {
            Some(events_path) => {
                let (audio, log) = self.render_track_with_events(dna, duration, seed);
                renderer::write_wav(wav_path, &audio)?;
                ensure_parent(events_path)?;
                fs::write(events_path, log.to_json_pretty()?)
                    .map_err(|e| ArenaError::io(events_path, e))?;
                info!(events = log.events.len(), "wrote track and event log");
            }
            None => {
                let audio = self.render_track(dna, duration, seed);
                renderer::write_wav(wav_path, &audio)?;
                info!("wrote track");
            }
        }
        Ok(())
    }

    /// Render several requests in parallel. Output order matches input.
    pub fn render_batch(&self, requests: &[RenderRequest]) -> Vec<Vec<f64>> {
        requests
            .par_iter()
            .map(|r| self.render_track(&r.dna, r.duration, r.seed))
            .collect()
    }

    #[instrument(level = "debug", skip(self, dna, recorder), fields(tempo = dna.tempo, pack = %dna.sample_pack))]
    fn generate(
        &self,
        dna: &Dna,
        duration: f64,
        seed: Option<u64>,
        mut recorder: EventRecorder,
    ) -> (Vec<f64>, Vec<TrackEvent>, RenderMeta) {
        let mut rng = match seed {
            Some(seed) => ChaCha8Rng::seed_from_u64(seed),
            None => ChaCha8Rng::from_entropy(),
        };
        let num_samples = (duration.max(0.0) * SAMPLE_RATE_F64) as usize;
        let profile = profile::resolve(&dna.melody_profile);
        let ctx = StemContext::new(dna, profile, self.library.as_ref(), num_samples);

        // One child stream per stem, then one for the effects chain.
        let mut child = || ChaCha8Rng::seed_from_u64(rng.next_u64());
        let (mut drums_rng, mut bass_rng, mut cowbell_rng) = (child(), child(), child());
        let (mut vocals_rng, mut melody_rng, mut effects_rng) = (child(), child(), child());

        let stems = Stems {
            drums: stems::drums::render(&ctx, &mut drums_rng, &mut recorder),
            bass: stems::bass::render(&ctx, &mut bass_rng, &mut recorder),
            cowbell: stems::cowbell::render(&ctx, &mut cowbell_rng, &mut recorder),
            vocals: stems::vocals::render(&ctx, &mut vocals_rng, &mut recorder),
            melody: stems::melody::render(&ctx, &mut melody_rng, &mut recorder),
        };
        let audio = mix::mix_and_master(&stems, dna, ctx.tempo, &mut effects_rng);

        let meta = RenderMeta {
            duration_seconds: round_to(duration, 3),
            tempo_bpm: ctx.tempo,
            bars_estimate: round_to(duration / (60.0 / ctx.tempo as f64 * 4.0), 2),
            sample_pack: dna.sample_pack.clone(),
            sample_pack_found: self.library.has_pack(&dna.sample_pack),
            melody_profile: dna.melody_profile.clone(),
            available_packs: self.library.pack_names(),
            dsp: DspSummary::new(dna, ctx.tempo, profile),
        };
        let events = recorder.into_sorted();
        debug!(samples = audio.len(), events = events.len(), "render finished");
        (audio, events, meta)
    }
}

fn ensure_parent(path: &Path) -> Result<()> {
    match path.parent() {
        Some(parent) if !parent.as_os_str().is_empty() => {
            fs::create_dir_all(parent).map_err(|e| ArenaError::io(parent, e))
        }
        _ => Ok(()),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::dna::EffectType;
    use crate::library::MemoryLibrary;
    use crate::stems::test_support::full_library;

    fn generator() -> TrackGenerator {
        TrackGenerator::new(Arc::new(full_library()))
    }

    #[test]
    fn same_seed_same_track() {
        let generator = generator();
        let dna = Dna::default();
        let a = generator.render_track(&dna, 3.0, Some(42));
        let b = generator.render_track(&dna, 3.0, Some(42));
        assert_eq!(a, b);
        assert_eq!(a.len(), 132300);
    }

    #[test]
    fn different_seeds_differ() {
        let generator = generator();
        let dna = Dna::default();
        let a = generator.render_track(&dna, 3.0, Some(1));
        let b = generator.render_track(&dna, 3.0, Some(2));
        assert_ne!(a, b);
    }

    #[test]
    fn events_do_not_change_audio() {
        let generator = generator();
        let dna = Dna {
            effects: vec![EffectType::VinylCrackle, EffectType::SidechainHard],
            ..Dna::default()
        };
        let plain = generator.render_track(&dna, 2.5, Some(9));
        let (with_events, log) = generator.render_track_with_events(&dna, 2.5, Some(9));
        assert_eq!(plain, with_events);
        assert!(!log.events.is_empty());
        assert!(log.events.windows(2).all(|w| w[0].time <= w[1].time));
    }

    #[test]
    fn event_logs_are_deterministic() {
        let generator = generator();
        let dna = Dna::default();
        let (_, a) = generator.render_track_with_events(&dna, 2.0, Some(5));
        let (_, b) = generator.render_track_with_events(&dna, 2.0, Some(5));
        assert_eq!(a, b);
    }

    #[test]
    fn master_peak_is_bounded() {
        let out = generator().render_track(&Dna::default(), 4.0, Some(3));
        assert!(out.iter().all(|s| s.abs() <= 0.92 + 1e-9));
    }

    #[test]
    fn empty_library_still_renders_808() {
        let generator = TrackGenerator::new(Arc::new(MemoryLibrary::new()));
        let out = generator.render_track(&Dna::default(), 2.0, Some(1));
        assert_eq!(out.len(), 88200);
        assert!(out.iter().any(|&s| s != 0.0));
        assert!(generator.available_packs().is_empty());
    }

    #[test]
    fn zero_duration_is_empty() {
        assert!(generator().render_track(&Dna::default(), 0.0, Some(1)).is_empty());
    }

    #[test]
    fn meta_reports_render_settings() {
        let generator = generator();
        let dna = Dna {
            sample_pack: "nonexistent".into(),
            ..Dna::default()
        };
        let (_, log) = generator.render_track_with_events(&dna, 10.0, Some(1));
        let meta = &log.meta;
        assert_eq!(meta.duration_seconds, 10.0);
        assert_eq!(meta.tempo_bpm, 90);
        assert_eq!(meta.bars_estimate, 3.75);
        assert!(!meta.sample_pack_found);
        assert_eq!(meta.available_packs, vec!["core"]);
        assert_eq!(meta.dsp.tempo_bpm, 90);
        assert_eq!(meta.dsp.style_root_hz, 43.65);
    }

    #[test]
    fn wav_bytes_have_header() {
        let wav = generator().render_wav_bytes(&Dna::default(), 1.0, Some(1)).unwrap();
        assert_eq!(&wav[0..4], b"RIFF");
        assert_eq!(wav.len(), 44 + 44100 * 2);
    }

    #[test]
    fn render_to_files_creates_directories() {
        let tmp = tempfile::tempdir().unwrap();
        let wav = tmp.path().join("renders/gen_2/track.wav");
        let events = tmp.path().join("logs/track.json");
        generator()
            .render_to_files(&Dna::default(), &wav, Some(&events), 1.0, Some(4))
            .unwrap();

        let reader = hound::WavReader::open(&wav).unwrap();
        assert_eq!(reader.spec().channels, 1);
        assert_eq!(reader.len(), 44100);

        let json: serde_json::Value =
            serde_json::from_str(&fs::read_to_string(&events).unwrap()).unwrap();
        assert!(json["meta"]["dsp"].is_object());
        assert!(json["events"].is_array());
    }

    #[test]
    fn batch_matches_sequential_renders() {
        let generator = generator();
        let requests = vec![
            RenderRequest::new(Dna::default(), 1.0, Some(1)),
            RenderRequest::new(
                Dna {
                    tempo: 100,
                    ..Dna::default()
                },
                1.5,
                Some(2),
            ),
        ];
        let batch = generator.render_batch(&requests);
        assert_eq!(batch.len(), 2);
        for (request, audio) in requests.iter().zip(&batch) {
            assert_eq!(
                audio,
                &generator.render_track(&request.dna, request.duration, request.seed)
            );
        }
    }
}
