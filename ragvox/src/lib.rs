//! Retrieval-augmented question answering over uploaded documents, by text
//! or by voice.

pub mod adapters;
pub mod audio;
pub mod config;
pub mod domain;
pub mod error;
pub mod index;
pub mod ports;
pub mod services;

pub use error::{RagError, Result};
