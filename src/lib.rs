//! Turn downloaded WebVTT captions plus `info.json` sidecars into normalized
//! transcript documents and a batch manifest.

pub mod cli;
pub mod config;
pub mod dedup;
pub mod error;
pub mod formats;
pub mod manifest;
pub mod metadata;
pub mod model;
pub mod normalize;
pub mod pipeline;

pub use error::NormalizeError;
pub use model::{Cue, ManifestDocument, ManifestEntry, Segment, TranscriptDocument, VideoIdentity};
