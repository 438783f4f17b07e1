//! Render event log — what each stem played and when, plus render metadata.
//!
//! The log is a diagnostic side-channel: recording never draws from the
//! random source, so a render with events produces exactly the same audio
//! as one without.

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

use crate::dna::Dna;
use crate::error::Result;
use crate::profile::StyleProfile;

/// Round to `places` decimal digits.
pub fn round_to(value: f64, places: i32) -> f64 {
    let scale = 10f64.powi(places);
    (value * scale).round() / scale
}

// ── Events ──────────────────────────────────────────────────

/// A note label: a pitch name / sample tag, or a frequency in Hz.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum EventNote {
    Pitch(f64),
    Name(String),
}

impl From<&str> for EventNote {
    fn from(name: &str) -> Self {
        EventNote::Name(name.to_string())
    }
}

impl From<String> for EventNote {
    fn from(name: String) -> Self {
        EventNote::Name(name)
    }
}

impl From<f64> for EventNote {
    fn from(hz: f64) -> Self {
        EventNote::Pitch(hz)
    }
}

/// One triggered sound.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TrackEvent {
    /// Onset in seconds (4 dp).
    pub time: f64,
    pub instrument: String,
    /// Clamped to [0, 1], 3 dp.
    pub velocity: f64,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub note: Option<EventNote>,
    /// Length in seconds (4 dp).
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub duration: Option<f64>,
    /// Instrument-specific fields (glide targets, profile id, ...).
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

impl TrackEvent {
    pub fn new(time: f64, instrument: &str, velocity: f64) -> Self {
        TrackEvent {
            time: round_to(time, 4),
            instrument: instrument.to_string(),
            velocity: round_to(velocity.clamp(0.0, 1.0), 3),
            note: None,
            duration: None,
            extra: Map::new(),
        }
    }

    pub fn with_note(mut self, note: impl Into<EventNote>) -> Self {
        self.note = Some(note.into());
        self
    }

    pub fn with_duration(mut self, seconds: f64) -> Self {
        self.duration = Some(round_to(seconds, 4));
        self
    }

    pub fn with_extra(mut self, key: &str, value: impl Into<Value>) -> Self {
        self.extra.insert(key.to_string(), value.into());
        self
    }
}

/// Collects events when enabled; a disabled recorder drops everything.
#[derive(Debug, Clone, Default)]
pub struct EventRecorder {
    events: Option<Vec<TrackEvent>>,
}

impl EventRecorder {
    pub fn enabled() -> Self {
        EventRecorder {
            events: Some(Vec::new()),
        }
    }

    pub fn disabled() -> Self {
        EventRecorder { events: None }
    }

    pub fn is_enabled(&self) -> bool {
        self.events.is_some()
    }

    pub fn record(&mut self, event: TrackEvent) {
        if let Some(events) = &mut self.events {
            events.push(event);
        }
    }

    /// Recorded events, stably sorted by onset time.
    pub fn into_sorted(self) -> Vec<TrackEvent> {
        let mut events = self.events.unwrap_or_default();
        events.sort_by(|a, b| a.time.total_cmp(&b.time));
        events
    }
}

// ── Metadata ────────────────────────────────────────────────

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DrumBusSummary {
    pub saturation_drive: f64,
    pub clip_threshold: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BassBusSummary {
    pub waveshaper_drive: f64,
    pub clip_threshold: f64,
    pub glide_probability: f64,
    pub glide_ms_range: [u32; 2],
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct VocalBusSummary {
    pub pitch_range_semitones: [i32; 2],
    pub room_reverb_chance: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MasterSummary {
    pub soft_clip_drive: f64,
    pub limiter_threshold: f64,
}

/// The processing settings a render used, derived from the DNA.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DspSummary {
    pub tempo_bpm: i32,
    pub sample_pack: String,
    pub melody_profile: String,
    pub style_root_hz: f64,
    pub drum_bus: DrumBusSummary,
    pub bass_bus: BassBusSummary,
    pub vocal_bus: VocalBusSummary,
    pub master: MasterSummary,
}

impl DspSummary {
    pub fn new(dna: &Dna, tempo_bpm: i32, profile: &StyleProfile) -> Self {
        let drive = dna.distortion_drive;
        DspSummary {
            tempo_bpm,
            sample_pack: dna.sample_pack.clone(),
            melody_profile: dna.melody_profile.clone(),
            style_root_hz: round_to(profile.root_hz, 2),
            drum_bus: DrumBusSummary {
                saturation_drive: round_to(0.12 + drive * 0.4, 3),
                clip_threshold: 0.96,
            },
            bass_bus: BassBusSummary {
                waveshaper_drive: round_to(0.16 + drive * 0.3, 3),
                clip_threshold: 0.97,
                glide_probability: round_to(dna.glide_probability.clamp(0.1, 0.6), 3),
                glide_ms_range: [80, 140],
            },
            vocal_bus: VocalBusSummary {
                pitch_range_semitones: [-6, -3],
                room_reverb_chance: 0.22,
            },
            master: MasterSummary {
                soft_clip_drive: round_to(0.1 + drive * 0.35, 3),
                limiter_threshold: 0.92,
            },
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RenderMeta {
    pub duration_seconds: f64,
    pub tempo_bpm: i32,
    pub bars_estimate: f64,
    pub sample_pack: String,
    pub sample_pack_found: bool,
    pub melody_profile: String,
    pub available_packs: Vec<String>,
    pub dsp: DspSummary,
}

/// The JSON document written next to a render.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EventLog {
    pub meta: RenderMeta,
    pub events: Vec<TrackEvent>,
}

impl EventLog {
    pub fn to_json_pretty(&self) -> Result<String> {
        Ok(serde_json::to_string_pretty(self)?)
    }
}
