//! Conversational lead-in suppression
//!
//! Narrator prompts forbid pleasantries, but some responses still open
//! with one ("Understood, let me narrate...") before the story starts.
//! This decorator probes the earliest accumulated text for a known
//! lead-in and drops everything before the first structural boundary.

use once_cell::sync::Lazy;
use regex::Regex;
use tracing::debug;

use crate::handler::StreamHandler;

/// Probe window in characters. Once this much text has accumulated the
/// filter gives up and passes everything through.
const PROBE_WINDOW: usize = 200;

/// Lead-in phrases, anchored at the start of the response. Ordered, not
/// exhaustive: this is a presentation nicety, not a correctness guarantee.
static LEAD_IN_PATTERNS: Lazy<Vec<Regex>> = Lazy::new(|| {
    [
        r"(?i)^(okay|ok|sure|understood|certainly|of course|got it|very well|alright)[,.!: ]",
        r"(?i)^let me (tell|narrate|recount|begin|walk you through)",
        r"(?i)^(here is|here's) (the|your|a) (story|tale|narrative|account)",
        r"(?i)^allow me to",
        r"(?i)^as (you )?requested[,.:]",
        r"(?i)^i('ll| will) (now )?(narrate|tell|begin)",
    ]
    .iter()
    .map(|pattern| Regex::new(pattern).expect("lead-in pattern"))
    .collect()
});

/// A heading at the start of a line.
static HEADING: Lazy<Regex> = Lazy::new(|| Regex::new(r"(?m)^##").expect("heading pattern"));

/// A sentence terminator immediately followed by a line break.
static SENTENCE_BREAK: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"[.!?。！？][ \t]*\n").expect("sentence-break pattern"));

enum Probe {
    /// Still inside the inspection window; arriving text is withheld.
    Probing { held: String },
    /// Single shot spent: everything passes through unmodified.
    Passthrough,
}

/// Decorator that strips a conversational lead-in from the start of a
/// stream before forwarding to the inner handler.
///
/// While probing, text is withheld rather than forwarded, so nothing
/// before the detected boundary ever reaches the inner handler. If the
/// window fills or the stream ends without a match, the withheld text is
/// released unmodified. Terminal callbacks always flush withheld text
/// first.
pub struct PreambleSuppressor<H: StreamHandler> {
    inner: H,
    probe: Probe,
}

impl<H: StreamHandler> PreambleSuppressor<H> {
    pub fn new(inner: H) -> Self {
        Self {
            inner,
            probe: Probe::Probing {
                held: String::new(),
            },
        }
    }

    /// Consume the suppressor, returning the inner handler.
    pub fn into_inner(self) -> H {
        self.inner
    }

    /// Release withheld text unmodified and stop probing.
    fn release(&mut self) {
        if let Probe::Probing { held } = std::mem::replace(&mut self.probe, Probe::Passthrough) {
            if !held.is_empty() {
                self.inner.on_chunk(&held);
            }
        }
    }

    /// Drop everything before `boundary` and forward the rest.
    fn suppress_up_to(&mut self, boundary: usize) {
        if let Probe::Probing { held } = std::mem::replace(&mut self.probe, Probe::Passthrough) {
            debug!(dropped = boundary, "suppressed conversational lead-in");
            let rest = held[boundary..].trim_start_matches(['\r', '\n']);
            if !rest.is_empty() {
                self.inner.on_chunk(rest);
            }
        }
    }
}

impl<H: StreamHandler> StreamHandler for PreambleSuppressor<H> {
    fn on_chunk(&mut self, text: &str) {
        let held = match &mut self.probe {
            Probe::Passthrough => {
                self.inner.on_chunk(text);
                return;
            }
            Probe::Probing { held } => {
                held.push_str(text);
                held
            }
        };

        // Inspection only applies while the accumulated text is still
        // short; past the window the lead-in ship has sailed.
        if held.chars().count() >= PROBE_WINDOW {
            self.release();
            return;
        }

        let matched = LEAD_IN_PATTERNS.iter().find_map(|p| p.find(held));
        if let Some(m) = matched {
            if let Some(boundary) = structural_boundary(held, m.end()) {
                self.suppress_up_to(boundary);
            }
            // Matched but no boundary yet: keep withholding until one
            // arrives or the window fills.
        }
    }

    fn on_end(&mut self) {
        self.release();
        self.inner.on_end();
    }

    fn on_error(&mut self, message: &str) {
        self.release();
        self.inner.on_error(message);
    }
}

/// First structural boundary at or after `from`: the start of a heading
/// line, or the position just past a sentence terminator and its line
/// break.
fn structural_boundary(text: &str, from: usize) -> Option<usize> {
    let heading = HEADING.find_at(text, from).map(|m| m.start());
    let sentence = SENTENCE_BREAK.find_at(text, from).map(|m| m.end());
    match (heading, sentence) {
        (Some(h), Some(s)) => Some(h.min(s)),
        (Some(h), None) => Some(h),
        (None, Some(s)) => Some(s),
        (None, None) => None,
    }
}
