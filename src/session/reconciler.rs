use tracing::debug;

/// How many of the most recent segments are consulted when checking
/// whether an incoming final restates older content.
const CONTAINMENT_WINDOW: usize = 3;

/// Accumulated transcript for one session.
///
/// The recognition service re-emits "final" results across finalization
/// windows: a new final may duplicate, extend, or subsume one it already
/// delivered. [`accept_final`](Self::accept_final) filters those so each
/// utterance reaches the client and storage exactly once. Accepted
/// segments are never mutated afterwards; the list only grows.
#[derive(Debug, Default)]
pub struct TranscriptState {
    segments: Vec<String>,
    last_accepted: String,
}

impl TranscriptState {
    pub fn new() -> Self {
        Self::default()
    }

    /// Reconcile an incoming final result against what has already been
    /// accepted. Returns the text to forward downstream, or `None` when
    /// the result is a duplicate.
    ///
    /// Containment is a plain substring check, most recent segment first.
    /// Known limitation: a genuinely new utterance that happens to contain
    /// an old segment verbatim is dropped, and only the last
    /// `CONTAINMENT_WINDOW` segments are consulted. Time-aligned matching
    /// would be more precise, but this preserves the behavior clients were
    /// built against.
    pub fn accept_final(&mut self, text: &str) -> Option<String> {
        if text.is_empty() {
            return None;
        }

        if !self.last_accepted.is_empty() {
            if text == self.last_accepted {
                debug!("exact duplicate final, skipping");
                return None;
            }

            if text.contains(&self.last_accepted) {
                // The service extended the last utterance. Keep only the
                // part that wasn't delivered yet.
                let remainder = text
                    .replacen(&self.last_accepted, "", 1)
                    .trim()
                    .to_string();
                if remainder.is_empty() {
                    debug!("duplicate within extended final, skipping");
                    return None;
                }
                if self.contains_recent_segment(&remainder) {
                    debug!("extended final restates an older segment, skipping");
                    return None;
                }
                debug!(remainder = %remainder, "extracted new part from extended final");
                return Some(self.accept(remainder));
            }

            if self.contains_recent_segment(text) {
                debug!("final restates a recent segment, skipping");
                return None;
            }
        }

        Some(self.accept(text.to_string()))
    }

    fn accept(&mut self, text: String) -> String {
        self.segments.push(text.clone());
        self.last_accepted = text.clone();
        debug!(total = self.segments.len(), "accepted transcript segment");
        text
    }

    /// True when any of the most recently accepted segments appears
    /// verbatim inside `text`.
    fn contains_recent_segment(&self, text: &str) -> bool {
        self.segments
            .iter()
            .rev()
            .take(CONTAINMENT_WINDOW)
            .any(|segment| text.contains(segment.as_str()))
    }

    pub fn is_empty(&self) -> bool {
        self.segments.is_empty()
    }

    pub fn segment_count(&self) -> usize {
        self.segments.len()
    }

    /// Full transcript as one flat document, segments joined by spaces.
    pub fn joined(&self) -> String {
        self.segments.join(" ")
    }
}
