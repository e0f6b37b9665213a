use std::path::PathBuf;

use serde::{Deserialize, Serialize};

pub const NO_FILES_STATUS: &str = "No files uploaded";
pub const NO_REFERENCE_DATA: &str = "No reference data available";
pub const FALLBACK_QUERY: &str = "Error";
pub const FALLBACK_ANSWER: &str = "Something went wrong. Please try again.";

/// What the chat view renders for one request: `(query, answer)` pairs plus
/// the spoken reply, when one was synthesized.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ChatReply {
    pub turns: Vec<(String, String)>,
    pub audio: Option<PathBuf>,
}

impl ChatReply {
    pub fn new(query: impl Into<String>, answer: impl Into<String>) -> Self {
        Self {
            turns: vec![(query.into(), answer.into())],
            audio: None,
        }
    }

    pub fn fallback() -> Self {
        Self::new(FALLBACK_QUERY, FALLBACK_ANSWER)
    }

    #[must_use]
    pub fn with_audio(mut self, audio: Option<PathBuf>) -> Self {
        self.audio = audio;
        self
    }

    pub fn answer(&self) -> Option<&str> {
        self.turns.last().map(|(_, answer)| answer.as_str())
    }
}

#[derive(Debug, Clone, PartialEq)]
pub enum Samples {
    I16(Vec<i16>),
    F32(Vec<f32>),
}

impl Samples {
    pub fn len(&self) -> usize {
        match self {
            Self::I16(s) => s.len(),
            Self::F32(s) => s.len(),
        }
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

/// A recorded question: interleaved samples at `sample_rate`.
#[derive(Debug, Clone, PartialEq)]
pub struct AudioInput {
    pub sample_rate: u32,
    pub channels: u16,
    pub samples: Samples,
}

impl AudioInput {
    pub const fn mono(sample_rate: u32, samples: Samples) -> Self {
        Self {
            sample_rate,
            channels: 1,
            samples,
        }
    }
}
