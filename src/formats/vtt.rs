//! WebVTT cue extraction.
//!
//! A cue block is a timing line (`start --> end [settings]`) followed by text
//! lines up to the next blank line or the next timing line. Everything outside
//! cue blocks (the `WEBVTT` header, `Kind:`/`Language:` lines, cue identifiers,
//! NOTE bodies) is skipped.

use crate::{
    error::NormalizeError,
    formats::{
        markup::sanitize,
        time::{parse_timestamp, round_ms},
    },
    model::Cue,
};

pub fn looks_like_timestamp_line(line: &str) -> bool {
    line.contains("-->")
}

/// Split a timing line into `(start, end)` seconds, ignoring cue settings.
pub fn parse_timing_line(line: &str) -> Result<(f64, f64), NormalizeError> {
    let (a, b) = line
        .split_once("-->")
        .ok_or_else(|| NormalizeError::malformed(line.trim()))?;
    let end_token = b.split_whitespace().next().unwrap_or("");
    Ok((parse_timestamp(a)?, parse_timestamp(end_token)?))
}

enum State<'a> {
    SeekCue,
    InText {
        start: f64,
        end: f64,
        lines: Vec<&'a str>,
    },
}

/// Scan caption text into cues in source order.
///
/// Cues whose sanitized text is empty, or whose millisecond-rounded duration
/// is not positive, are dropped. A malformed timing line fails the whole scan.
pub fn extract_cues(input: &str) -> Result<Vec<Cue>, NormalizeError> {
    let input = input.strip_prefix('\u{FEFF}').unwrap_or(input);
    let mut cues = Vec::new();
    let mut state = State::SeekCue;

    for raw_line in input.lines() {
        let line = raw_line.trim_end_matches('\r');

        state = match state {
            State::SeekCue => {
                if looks_like_timestamp_line(line) {
                    let (start, end) = parse_timing_line(line)?;
                    State::InText {
                        start,
                        end,
                        lines: Vec::new(),
                    }
                } else {
                    State::SeekCue
                }
            }
            State::InText {
                start,
                end,
                mut lines,
            } => {
                if line.trim().is_empty() {
                    emit_cue(&mut cues, start, end, &lines);
                    State::SeekCue
                } else if looks_like_timestamp_line(line) {
                    emit_cue(&mut cues, start, end, &lines);
                    let (start, end) = parse_timing_line(line)?;
                    State::InText {
                        start,
                        end,
                        lines: Vec::new(),
                    }
                } else {
                    lines.push(line);
                    State::InText { start, end, lines }
                }
            }
        };
    }

    if let State::InText { start, end, lines } = state {
        emit_cue(&mut cues, start, end, &lines);
    }

    Ok(cues)
}

fn emit_cue(cues: &mut Vec<Cue>, start: f64, end: f64, lines: &[&str]) {
    let text = sanitize(&lines.join("\n"));
    if text.is_empty() {
        return;
    }
    if round_ms(end - start) <= 0.0 {
        tracing::trace!(start, end, "dropping cue with non-positive duration");
        return;
    }
    cues.push(Cue { start, end, text });
}
