//! Spoken narration queue.
//!
//! The core decides *what* to say and in which order; the browser's speech
//! engine does the talking. The bridge pulls one phrase at a time with
//! [`NarrationQueue::next_phrase`] and reports back through
//! [`NarrationQueue::phrase_finished`] when the utterance ends (or errors).
//! Until then no further phrase is handed out, so two phrases never overlap.

use std::collections::VecDeque;

use serde::{Deserialize, Serialize};

/// Cheers spoken at the end of a round.
pub const CELEBRATION_PHRASES: [&str; 5] = [
    "Wonderful!",
    "Great job!",
    "Amazing!",
    "You did it!",
    "Fantastic!",
];

/// Utterance settings forwarded to the speech engine. Slow and bright for young listeners.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct VoiceSettings {
    pub rate: f32,
    pub pitch: f32,
    pub volume: f32,
    pub lang: String,
}

impl Default for VoiceSettings {
    fn default() -> Self {
        Self {
            rate: 0.8,
            pitch: 1.2,
            volume: 1.0,
            lang: "en-US".to_string(),
        }
    }
}

#[derive(Debug, Clone)]
pub struct NarrationQueue {
    pending: VecDeque<String>,
    speaking: bool,
    enabled: bool,
}

impl NarrationQueue {
    pub fn new() -> Self {
        Self {
            pending: VecDeque::new(),
            speaking: false,
            enabled: true,
        }
    }

    /// Queue a phrase behind anything already waiting. Dropped while disabled.
    pub fn enqueue(&mut self, phrase: impl Into<String>) {
        if !self.enabled {
            return;
        }
        self.pending.push_back(phrase.into());
    }

    /// Hand out the next phrase, unless one is still being spoken.
    pub fn next_phrase(&mut self) -> Option<String> {
        if self.speaking {
            return None;
        }
        let phrase = self.pending.pop_front()?;
        self.speaking = true;
        Some(phrase)
    }

    /// The speech engine finished (or failed) the current phrase.
    pub fn phrase_finished(&mut self) {
        self.speaking = false;
    }

    pub fn is_speaking(&self) -> bool {
        self.speaking
    }

    /// Phrases waiting behind the one being spoken.
    pub fn len(&self) -> usize {
        self.pending.len()
    }

    pub fn is_empty(&self) -> bool {
        self.pending.is_empty()
    }

    /// Drop everything, including the in-flight slot. The bridge cancels the
    /// utterance on its side.
    pub fn clear(&mut self) {
        self.pending.clear();
        self.speaking = false;
    }

    pub fn set_enabled(&mut self, enabled: bool) {
        self.enabled = enabled;
        if !enabled {
            self.clear();
        }
    }

    pub fn is_enabled(&self) -> bool {
        self.enabled
    }
}

impl Default for NarrationQueue {
    fn default() -> Self {
        Self::new()
    }
}
