//! Temporary audio files written while handling voice requests.
//!
//! Recordings live only for the request that created them. Replies are
//! handed to the caller and pruned to the newest `keep_replies`.

mod wav;

use std::path::{Path, PathBuf};
use std::time::SystemTime;

use tempfile::NamedTempFile;

use crate::config::SpeechConfig;
use crate::error::{RagError, Result};

pub use wav::{read_wav, write_wav};

const RECORDING_PREFIX: &str = "rec-";
const REPLY_PREFIX: &str = "reply-";
const WAV_SUFFIX: &str = ".wav";

#[derive(Debug, Clone)]
pub struct AudioArtifacts {
    recordings_dir: PathBuf,
    replies_dir: PathBuf,
    keep_replies: usize,
}

impl AudioArtifacts {
    pub fn new(
        recordings_dir: impl Into<PathBuf>,
        replies_dir: impl Into<PathBuf>,
        keep_replies: usize,
    ) -> Self {
        Self {
            recordings_dir: recordings_dir.into(),
            replies_dir: replies_dir.into(),
            keep_replies,
        }
    }

    pub fn from_config(config: &SpeechConfig) -> Self {
        Self::new(
            &config.recordings_dir,
            &config.replies_dir,
            config.keep_replies,
        )
    }

    pub fn recordings_dir(&self) -> &Path {
        &self.recordings_dir
    }

    pub fn replies_dir(&self) -> &Path {
        &self.replies_dir
    }

    /// A fresh recording file, deleted when the handle is dropped.
    pub fn new_recording(&self) -> Result<NamedTempFile> {
        std::fs::create_dir_all(&self.recordings_dir)?;
        let file = tempfile::Builder::new()
            .prefix(RECORDING_PREFIX)
            .suffix(WAV_SUFFIX)
            .tempfile_in(&self.recordings_dir)?;
        Ok(file)
    }

    /// A fresh, persistent path for a synthesized reply.
    pub fn new_reply(&self) -> Result<PathBuf> {
        std::fs::create_dir_all(&self.replies_dir)?;
        let path = tempfile::Builder::new()
            .prefix(REPLY_PREFIX)
            .suffix(WAV_SUFFIX)
            .tempfile_in(&self.replies_dir)?
            .into_temp_path()
            .keep()
            .map_err(|e| RagError::Io(e.error))?;
        Ok(path)
    }

    pub fn discard(&self, path: &Path) {
        match std::fs::remove_file(path) {
            Ok(()) => tracing::debug!("Removed {}", path.display()),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => {}
            Err(e) => tracing::warn!("Failed to remove {}: {}", path.display(), e),
        }
    }

    /// Deletes all but the newest `keep_replies` reply files.
    pub fn prune_replies(&self) -> Result<usize> {
        let mut replies: Vec<(SystemTime, PathBuf)> = Vec::new();
        for entry in std::fs::read_dir(&self.replies_dir)? {
            let entry = entry?;
            let name = entry.file_name();
            let name = name.to_string_lossy();
            if !(name.starts_with(REPLY_PREFIX) && name.ends_with(WAV_SUFFIX)) {
                continue;
            }
            let modified = entry
                .metadata()
                .and_then(|m| m.modified())
                .unwrap_or(SystemTime::UNIX_EPOCH);
            replies.push((modified, entry.path()));
        }

        if replies.len() <= self.keep_replies {
            return Ok(0);
        }

        replies.sort_by(|a, b| b.0.cmp(&a.0).then_with(|| b.1.cmp(&a.1)));
        let stale = replies.split_off(self.keep_replies);
        for (_, path) in &stale {
            self.discard(path);
        }
        tracing::debug!(removed = stale.len(), "Pruned reply audio");
        Ok(stale.len())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    fn artifacts(dir: &TempDir, keep: usize) -> AudioArtifacts {
        AudioArtifacts::new(dir.path().join("rec"), dir.path().join("out"), keep)
    }

    #[test]
    fn test_recording_removed_on_drop() {
        let dir = TempDir::new().unwrap();
        let store = artifacts(&dir, 5);

        let recording = store.new_recording().unwrap();
        let path = recording.path().to_path_buf();
        assert!(path.exists());
        assert!(path.file_name().unwrap().to_string_lossy().starts_with("rec-"));

        drop(recording);
        assert!(!path.exists());
    }

    #[test]
    fn test_each_reply_gets_a_fresh_file() {
        let dir = TempDir::new().unwrap();
        let store = artifacts(&dir, 5);

        let a = store.new_reply().unwrap();
        let b = store.new_reply().unwrap();
        assert_ne!(a, b);
        assert!(a.exists() && b.exists());
        assert_eq!(a.extension().unwrap(), "wav");
    }

    #[test]
    fn test_prune_keeps_newest_replies() {
        let dir = TempDir::new().unwrap();
        let store = artifacts(&dir, 2);

        let replies: Vec<PathBuf> = (0..4)
            .map(|_| {
                let path = store.new_reply().unwrap();
                std::thread::sleep(std::time::Duration::from_millis(20));
                path
            })
            .collect();
        std::fs::write(store.replies_dir().join("notes.txt"), "keep me").unwrap();

        assert_eq!(store.prune_replies().unwrap(), 2);
        assert!(!replies[0].exists());
        assert!(!replies[1].exists());
        assert!(replies[2].exists());
        assert!(replies[3].exists());
        assert!(store.replies_dir().join("notes.txt").exists());
    }

    #[test]
    fn test_discard_missing_file_is_quiet() {
        let dir = TempDir::new().unwrap();
        artifacts(&dir, 1).discard(&dir.path().join("gone.wav"));
    }
}
