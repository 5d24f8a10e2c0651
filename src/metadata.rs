use std::path::Path;

use chrono::{DateTime, Local, NaiveDate, SecondsFormat, Utc};
use serde_json::Value;

use crate::{error::NormalizeError, model::VideoIdentity};

pub const UNKNOWN: &str = "Unknown";

/// Source of "now" for default publish dates and manifest timestamps.
pub trait Clock {
    fn now(&self) -> DateTime<Utc>;

    fn today(&self) -> NaiveDate {
        self.now().date_naive()
    }

    fn timestamp(&self) -> String {
        self.now().to_rfc3339_opts(SecondsFormat::Millis, true)
    }
}

#[derive(Debug, Clone, Copy, Default)]
pub struct SystemClock;

impl Clock for SystemClock {
    fn now(&self) -> DateTime<Utc> {
        Utc::now()
    }

    fn today(&self) -> NaiveDate {
        Local::now().date_naive()
    }
}

#[derive(Debug, Clone, Copy)]
pub struct FixedClock(pub DateTime<Utc>);

impl Clock for FixedClock {
    fn now(&self) -> DateTime<Utc> {
        self.0
    }
}

impl VideoIdentity {
    /// Resolve identity fields from a downloader metadata object.
    ///
    /// Never fails: anything absent, empty or of the wrong type falls back
    /// field by field. The id names the output file, so an id that is not a
    /// plain file name also falls back.
    pub fn from_metadata(meta: Option<&Value>, fallback_id: &str, clock: &dyn Clock) -> Self {
        let video_id = str_field(meta, "id")
            .filter(|s| is_file_safe_id(s))
            .unwrap_or(fallback_id)
            .to_string();

        let title = str_field(meta, "title").unwrap_or(UNKNOWN).to_string();

        let published_at = str_field(meta, "upload_date")
            .and_then(format_upload_date)
            .unwrap_or_else(|| clock.today().format("%Y-%m-%d").to_string());

        let channel = str_field(meta, "channel")
            .or_else(|| str_field(meta, "uploader"))
            .unwrap_or(UNKNOWN)
            .to_string();

        let duration_seconds = meta
            .and_then(|m| m.get("duration"))
            .and_then(duration_to_seconds)
            .unwrap_or(0);

        Self {
            video_id,
            title,
            published_at,
            channel,
            duration_seconds,
        }
    }
}

/// Non-empty, no leading dot, no path separators or other characters that
/// cannot appear in a portable file name.
pub fn is_file_safe_id(id: &str) -> bool {
    let reserved = |c: char| {
        c.is_control() || matches!(c, '/' | '\\' | ':' | '*' | '?' | '"' | '<' | '>' | '|')
    };
    !id.trim().is_empty() && !id.starts_with('.') && !id.chars().any(reserved)
}

fn str_field<'a>(meta: Option<&'a Value>, key: &str) -> Option<&'a str> {
    meta?.get(key)?.as_str()
}

/// `YYYYMMDD` to `YYYY-MM-DD`.
fn format_upload_date(raw: &str) -> Option<String> {
    if raw.len() != 8 || !raw.bytes().all(|b| b.is_ascii_digit()) {
        return None;
    }
    Some(format!("{}-{}-{}", &raw[..4], &raw[4..6], &raw[6..8]))
}

fn duration_to_seconds(v: &Value) -> Option<u64> {
    if let Some(n) = v.as_u64() {
        return Some(n);
    }
    let f = v.as_f64()?;
    (f.is_finite() && f >= 0.0).then(|| f.round() as u64)
}

/// Load a downloader `info.json` sidecar. `Ok(None)` when the file does not exist.
pub fn load_sidecar(path: &Path) -> Result<Option<Value>, NormalizeError> {
    if !path.exists() {
        return Ok(None);
    }
    let raw = std::fs::read_to_string(path)
        .map_err(|e| NormalizeError::io(format!("reading {}", path.display()), e))?;
    let v: Value = serde_json::from_str(&raw)
        .map_err(|e| NormalizeError::json(format!("parsing {}", path.display()), e))?;
    Ok(Some(v))
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;
    use serde_json::json;

    fn clock() -> FixedClock {
        FixedClock(Utc.with_ymd_and_hms(2025, 6, 15, 12, 30, 0).unwrap())
    }

    #[test]
    fn absent_metadata_takes_every_default() {
        let id = VideoIdentity::from_metadata(None, "abc123", &clock());
        assert_eq!(
            id,
            VideoIdentity {
                video_id: "abc123".to_string(),
                title: "Unknown".to_string(),
                published_at: "2025-06-15".to_string(),
                channel: "Unknown".to_string(),
                duration_seconds: 0,
            }
        );
    }

    #[test]
    fn complete_metadata_is_used_verbatim() {
        let meta = json!({
            "id": "dQw4w9WgXcQ",
            "title": "Evening bulletin",
            "upload_date": "20240229",
            "channel": "BBC News",
            "uploader": "BBC",
            "duration": 612,
            "view_count": 10
        });
        let id = VideoIdentity::from_metadata(Some(&meta), "file-id", &clock());
        assert_eq!(id.video_id, "dQw4w9WgXcQ");
        assert_eq!(id.title, "Evening bulletin");
        assert_eq!(id.published_at, "2024-02-29");
        assert_eq!(id.channel, "BBC News");
        assert_eq!(id.duration_seconds, 612);
    }

    #[test]
    fn channel_falls_back_to_uploader() {
        let meta = json!({ "uploader": "Someone", "channel": null });
        let id = VideoIdentity::from_metadata(Some(&meta), "x", &clock());
        assert_eq!(id.channel, "Someone");
    }

    #[test]
    fn bad_fields_fall_back_independently() {
        let meta = json!({
            "id": "",
            "title": 42,
            "upload_date": "2024-02-29",
            "duration": -3.0
        });
        let id = VideoIdentity::from_metadata(Some(&meta), "from-file", &clock());
        assert_eq!(id.video_id, "from-file");
        assert_eq!(id.title, "Unknown");
        assert_eq!(id.published_at, "2025-06-15");
        assert_eq!(id.channel, "Unknown");
        assert_eq!(id.duration_seconds, 0);
    }

    #[test]
    fn path_like_ids_fall_back_to_file_id() {
        for bad in ["nested/evil", "../x", "..", ".hidden", "a\\b", "c:d", "tab\tid"] {
            let meta = json!({ "id": bad });
            let id = VideoIdentity::from_metadata(Some(&meta), "from-file", &clock());
            assert_eq!(id.video_id, "from-file", "{bad:?} was accepted");
        }

        let meta = json!({ "id": "a-B_9.x" });
        let id = VideoIdentity::from_metadata(Some(&meta), "from-file", &clock());
        assert_eq!(id.video_id, "a-B_9.x");
    }

    #[test]
    fn fractional_duration_is_rounded() {
        let meta = json!({ "duration": 61.6 });
        let id = VideoIdentity::from_metadata(Some(&meta), "x", &clock());
        assert_eq!(id.duration_seconds, 62);
    }

    #[test]
    fn non_object_metadata_is_ignored() {
        let meta = json!(["not", "an", "object"]);
        let id = VideoIdentity::from_metadata(Some(&meta), "x", &clock());
        assert_eq!(id.video_id, "x");
        assert_eq!(id.title, "Unknown");
    }

    #[test]
    fn fixed_clock_timestamp_is_utc_millis() {
        assert_eq!(clock().timestamp(), "2025-06-15T12:30:00.000Z");
    }

    #[test]
    fn missing_sidecar_is_none() {
        let dir = tempfile::tempdir().unwrap();
        let got = load_sidecar(&dir.path().join("nope.info.json")).unwrap();
        assert!(got.is_none());
    }

    #[test]
    fn invalid_sidecar_is_a_json_error() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("bad.info.json");
        std::fs::write(&path, "{ not json").unwrap();
        let err = load_sidecar(&path).unwrap_err();
        assert!(matches!(err, NormalizeError::Json { .. }));
    }
}
