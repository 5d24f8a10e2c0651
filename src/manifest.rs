use crate::{
    metadata::Clock,
    model::{ManifestDocument, ManifestEntry, TranscriptDocument},
};

/// Summarize a batch of transcripts, one entry per document, order preserved.
pub fn build_manifest(transcripts: &[TranscriptDocument], clock: &dyn Clock) -> ManifestDocument {
    let videos: Vec<ManifestEntry> = transcripts
        .iter()
        .map(|t| ManifestEntry {
            video_id: t.identity.video_id.clone(),
            title: t.identity.title.clone(),
            published_at: t.identity.published_at.clone(),
            segment_count: t.segments.len(),
        })
        .collect();

    ManifestDocument {
        generated_at: clock.timestamp(),
        total_videos: videos.len(),
        videos,
    }
}
