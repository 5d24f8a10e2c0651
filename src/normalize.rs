use std::path::Path;

use serde_json::Value;

use crate::{
    dedup::deduplicate,
    error::NormalizeError,
    formats::vtt::extract_cues,
    metadata::Clock,
    model::{Segment, TranscriptDocument, VideoIdentity},
};

/// Caption text to deduplicated segments.
pub fn segments_from_vtt(vtt: &str) -> Result<Vec<Segment>, NormalizeError> {
    let cues = extract_cues(vtt)?;
    let extracted = cues.len();
    let segments = deduplicate(cues.into_iter().map(Segment::from).collect());
    tracing::debug!(cues = extracted, segments = segments.len(), "deduplicated");
    Ok(segments)
}

/// Build one transcript document from a caption file and its optional metadata.
///
/// Only a malformed timestamp fails; missing metadata falls back to defaults and
/// a caption file without usable cues yields an empty `segments` list.
pub fn normalize_transcript(
    vtt: &str,
    metadata: Option<&Value>,
    fallback_id: &str,
    clock: &dyn Clock,
) -> Result<TranscriptDocument, NormalizeError> {
    let segments = segments_from_vtt(vtt)?;
    let identity = VideoIdentity::from_metadata(metadata, fallback_id, clock);
    Ok(TranscriptDocument { identity, segments })
}

/// `abc123.en.vtt` -> `abc123`.
pub fn video_id_from_path(path: &Path) -> Option<String> {
    let name = path.file_name()?.to_str()?;
    let id = name.split('.').next()?;
    (!id.is_empty()).then(|| id.to_string())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::metadata::FixedClock;
    use chrono::{TimeZone, Utc};
    use serde_json::json;

    fn clock() -> FixedClock {
        FixedClock(Utc.with_ymd_and_hms(2025, 1, 2, 3, 4, 5).unwrap())
    }

    const TWO_CUES: &str = "WEBVTT\n\n\
00:00:01.000 --> 00:00:03.500\n<c>Good</c> evening\n\n\
00:00:03.500 --> 00:00:06.000\nHere is the news\n";

    #[test]
    fn two_cues_with_full_metadata() {
        let meta = json!({
            "id": "vid42",
            "title": "Six O'Clock News",
            "upload_date": "20240105",
            "channel": "BBC News",
            "duration": 1800
        });
        let doc = normalize_transcript(TWO_CUES, Some(&meta), "ignored", &clock()).unwrap();

        assert_eq!(doc.segments.len(), 2);
        assert_eq!(
            doc.identity,
            VideoIdentity {
                video_id: "vid42".to_string(),
                title: "Six O'Clock News".to_string(),
                published_at: "2024-01-05".to_string(),
                channel: "BBC News".to_string(),
                duration_seconds: 1800,
            }
        );
        assert_eq!(
            doc.segments[0],
            Segment {
                start: 1.0,
                dur: 2.5,
                text: "Good evening".to_string()
            }
        );
    }

    #[test]
    fn rolling_repeats_collapse() {
        let vtt = "WEBVTT\n\n\
00:00:00.000 --> 00:00:02.000\nA\n\n\
00:00:01.000 --> 00:00:04.000\nA\n\n\
00:00:04.000 --> 00:00:05.000\nHello world\n\n\
00:00:05.000 --> 00:00:06.000\nHello\n";
        let segs = segments_from_vtt(vtt).unwrap();
        assert_eq!(segs.len(), 2);
        assert_eq!(segs[0].dur, 4.0);
        assert_eq!(segs[1].text, "Hello world");
    }

    #[test]
    fn markup_only_file_gives_empty_document() {
        let vtt = "WEBVTT\n\n00:00:00.000 --> 00:00:01.000\n<c></c>\n";
        let doc = normalize_transcript(vtt, None, "empty1", &clock()).unwrap();
        assert!(doc.is_empty());
        assert_eq!(doc.video_id(), "empty1");
        assert_eq!(doc.identity.published_at, "2025-01-02");
    }

    #[test]
    fn malformed_timestamp_propagates() {
        let vtt = "WEBVTT\n\n00:00:0x.000 --> 00:00:01.000\ntext\n";
        let err = normalize_transcript(vtt, None, "bad", &clock()).unwrap_err();
        assert!(matches!(err, NormalizeError::MalformedTimestamp { .. }));
    }

    #[test]
    fn video_id_is_name_before_first_dot() {
        assert_eq!(
            video_id_from_path(Path::new("raw/abc123.en.vtt")).as_deref(),
            Some("abc123")
        );
        assert_eq!(
            video_id_from_path(Path::new("xyz.vtt")).as_deref(),
            Some("xyz")
        );
        assert_eq!(video_id_from_path(Path::new(".vtt")), None);
    }
}
