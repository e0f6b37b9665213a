use std::path::{Path, PathBuf};

use ragvox::audio::read_wav;
use ragvox::config::Config;
use ragvox::error::{RagError, Result};

use super::app::{build_bot, documents, upload};
use super::output::{print_reply, print_status};

pub async fn run(
    config: &Config,
    docs: Vec<PathBuf>,
    audio: &Path,
    speak: bool,
    json: bool,
) -> Result<()> {
    if config.speech.url.is_none() {
        return Err(RagError::Config(
            "speech.url must be set (or RAGVOX_SPEECH_URL) to transcribe audio".to_string(),
        ));
    }

    let input = read_wav(audio)?;
    let bot = build_bot(config, speak)?;

    let status = upload(&bot, &documents(docs)).await;
    print_status(&status, json)?;

    let reply = bot.respond_audio(&input).await;
    print_reply(&reply, json)
}
