use serde::{Deserialize, Serialize};

use crate::formats::time::round_ms;

/// One timed caption unit as it appears in the source, before deduplication.
#[derive(Debug, Clone, PartialEq)]
pub struct Cue {
    pub start: f64,
    pub end: f64,
    pub text: String,
}

impl Cue {
    pub fn duration(&self) -> f64 {
        self.end - self.start
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Segment {
    pub start: f64,
    pub dur: f64,
    pub text: String,
}

impl Segment {
    pub fn end(&self) -> f64 {
        self.start + self.dur
    }
}

impl From<Cue> for Segment {
    fn from(c: Cue) -> Self {
        Self {
            start: round_ms(c.start),
            dur: round_ms(c.duration()),
            text: c.text,
        }
    }
}

/// Identity fields of a transcript, resolved from the metadata sidecar.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct VideoIdentity {
    pub video_id: String,
    pub title: String,
    pub published_at: String,
    pub channel: String,
    pub duration_seconds: u64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TranscriptDocument {
    #[serde(flatten)]
    pub identity: VideoIdentity,
    pub segments: Vec<Segment>,
}

impl TranscriptDocument {
    pub fn video_id(&self) -> &str {
        &self.identity.video_id
    }

    pub fn is_empty(&self) -> bool {
        self.segments.is_empty()
    }

    pub fn covered_seconds(&self) -> f64 {
        self.segments.last().map(Segment::end).unwrap_or(0.0)
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ManifestDocument {
    pub generated_at: String,
    pub total_videos: usize,
    pub videos: Vec<ManifestEntry>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ManifestEntry {
    pub video_id: String,
    pub title: String,
    pub published_at: String,
    pub segment_count: usize,
}
