//! The hero's type-and-delete text cycle.

use crate::config::TypingConfig;

/// What to show now and how long to wait before the next tick.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TypingStep {
    pub text: String,
    pub delay_ms: u64,
}

/// Types each phrase one character at a time, holds, deletes it, then moves
/// on to the next phrase, forever.
///
/// Works on `char`s, so multi-byte phrases are never split mid-character.
#[derive(Debug, Clone)]
pub struct TypingCycle {
    phrases: Vec<Vec<char>>,
    phrase: usize,
    chars: usize,
    deleting: bool,
    config: TypingConfig,
}

impl TypingCycle {
    /// Empty phrases are skipped.
    pub fn new(config: &TypingConfig) -> Self {
        let phrases = config
            .phrases
            .iter()
            .filter(|p| !p.is_empty())
            .map(|p| p.chars().collect())
            .collect();
        Self {
            phrases,
            phrase: 0,
            chars: 0,
            deleting: false,
            config: config.clone(),
        }
    }

    /// Index of the phrase currently being typed or deleted.
    pub fn phrase_index(&self) -> usize {
        self.phrase
    }

    pub fn is_deleting(&self) -> bool {
        self.deleting
    }

    pub fn tick(&mut self) -> TypingStep {
        let Some(current) = self.phrases.get(self.phrase) else {
            return TypingStep {
                text: String::new(),
                delay_ms: self.config.next_delay_ms,
            };
        };
        let len = current.len();

        let mut delay_ms = if self.deleting {
            self.chars = self.chars.saturating_sub(1);
            self.config.delete_delay_ms
        } else {
            self.chars = (self.chars + 1).min(len);
            self.config.type_delay_ms
        };
        let text: String = current[..self.chars].iter().collect();

        if !self.deleting && self.chars == len {
            self.deleting = true;
            delay_ms = self.config.hold_delay_ms;
        } else if self.deleting && self.chars == 0 {
            self.deleting = false;
            self.phrase = (self.phrase + 1) % self.phrases.len();
            delay_ms = self.config.next_delay_ms;
        }

        TypingStep { text, delay_ms }
    }
}
