//! Collapse the repetition that rolling auto-captions produce.
//!
//! Each segment is compared only with the last kept one. Identical text
//! stretches the kept segment to end where the repeat ends; text that is a
//! substring of the kept text is dropped. Text that *grows* the kept text is
//! appended as a new segment.

use crate::{formats::time::round_ms, model::Segment};

pub fn deduplicate(segments: Vec<Segment>) -> Vec<Segment> {
    let mut kept: Vec<Segment> = Vec::with_capacity(segments.len());

    for seg in segments {
        let Some(prev) = kept.last_mut() else {
            kept.push(seg);
            continue;
        };

        if seg.text == prev.text {
            let merged = round_ms(seg.end() - prev.start);
            if merged > 0.0 {
                prev.dur = merged;
            }
        } else if prev.text.contains(seg.text.as_str()) {
            tracing::trace!(dropped = seg.text.as_str(), "subset of previous segment");
        } else {
            kept.push(seg);
        }
    }

    kept
}
