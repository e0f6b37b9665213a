mod common;

use std::sync::Arc;
use std::time::Duration;

use common::{
    EchoGenerator, FileSynthesizer, KeywordEmbedder, ScriptedTranscriber, files_in, session_with,
    test_config, write_doc,
};
use pretty_assertions::assert_eq;
use ragvox::audio::AudioArtifacts;
use ragvox::domain::conversation::{FALLBACK_ANSWER, FALLBACK_QUERY};
use ragvox::domain::{AudioInput, ChatReply, Samples};
use ragvox::services::VoiceBot;
use tempfile::TempDir;

const FRUIT: &str = "apple apple apple apple banana banana banana banana";

struct Fixture {
    dir: TempDir,
    bot: VoiceBot,
}

impl Fixture {
    async fn new(keep_replies: usize) -> Self {
        Self::with_generator(EchoGenerator::answering("Apples are red."), keep_replies).await
    }

    async fn with_generator(generator: EchoGenerator, keep_replies: usize) -> Self {
        let dir = TempDir::new().unwrap();
        let session = session_with(
            Arc::new(KeywordEmbedder::new()),
            Arc::new(generator),
            &test_config(),
        );
        let artifacts = AudioArtifacts::new(
            dir.path().join("recordings"),
            dir.path().join("replies"),
            keep_replies,
        );
        let bot = VoiceBot::new(Arc::new(session), artifacts);
        let status = bot.upload(&[write_doc(&dir, "fruit.txt", FRUIT)]).await;
        assert!(status.starts_with("1 document processed"));
        Self { dir, bot }
    }

    fn recordings(&self) -> Vec<std::path::PathBuf> {
        files_in(&self.dir.path().join("recordings"))
    }

    fn replies(&self) -> Vec<std::path::PathBuf> {
        files_in(&self.dir.path().join("replies"))
    }
}

fn tone() -> AudioInput {
    let samples = (0..1600).map(|i| ((i % 50) * 200 - 5000) as i16).collect();
    AudioInput::mono(16_000, Samples::I16(samples))
}

#[tokio::test]
async fn test_text_reply_without_speech() {
    let fixture = Fixture::new(5).await;

    let reply = fixture.bot.respond_text("apple?").await;
    assert_eq!(reply, ChatReply::new("apple?", "Apples are red."));
    assert!(fixture.replies().is_empty());
}

#[tokio::test]
async fn test_text_reply_is_spoken() {
    let fixture = Fixture::new(5).await;
    let bot = fixture.bot.with_synthesizer(Arc::new(FileSynthesizer::default()));
    let fixture = Fixture { bot, ..fixture };

    let reply = fixture.bot.respond_text("apple?").await;
    assert_eq!(reply.answer(), Some("Apples are red."));

    let audio = reply.audio.expect("reply audio");
    assert_eq!(std::fs::read_to_string(&audio).unwrap(), "Apples are red.");
    assert_eq!(fixture.replies(), vec![audio]);
}

#[tokio::test]
async fn test_failed_synthesis_keeps_answer() {
    let fixture = Fixture::new(5).await;
    let bot = fixture
        .bot
        .with_synthesizer(Arc::new(FileSynthesizer { fail: true }));
    let fixture = Fixture { bot, ..fixture };

    let reply = fixture.bot.respond_text("apple?").await;
    assert_eq!(reply, ChatReply::new("apple?", "Apples are red."));
    assert!(fixture.replies().is_empty());
}

#[tokio::test]
async fn test_generation_failure_gives_fallback_without_audio() {
    let fixture = Fixture::with_generator(EchoGenerator::failing(), 5).await;
    let bot = fixture.bot.with_synthesizer(Arc::new(FileSynthesizer::default()));
    let fixture = Fixture { bot, ..fixture };

    let reply = fixture.bot.respond_text("apple").await;
    assert_eq!(reply, ChatReply::new(FALLBACK_QUERY, FALLBACK_ANSWER));
    assert!(reply.audio.is_none());
    assert!(fixture.replies().is_empty());
}

#[tokio::test]
async fn test_audio_question_is_transcribed_and_recording_removed() {
    let fixture = Fixture::new(5).await;
    let transcriber = Arc::new(ScriptedTranscriber::saying(&[" Tell me ", "", " about apple? "]));
    let bot = fixture.bot.with_transcriber(transcriber.clone());
    let fixture = Fixture { bot, ..fixture };

    let reply = fixture.bot.respond_audio(&tone()).await;
    assert_eq!(reply, ChatReply::new("Tell me about apple?", "Apples are red."));

    let heard = transcriber.heard.lock().unwrap().clone();
    assert_eq!(heard.len(), 1);
    assert_eq!(heard[0].1, 1600);
    assert!(!heard[0].0.exists());
    assert!(fixture.recordings().is_empty());
}

#[tokio::test]
async fn test_audio_without_transcriber_falls_back() {
    let fixture = Fixture::new(5).await;

    let reply = fixture.bot.respond_audio(&tone()).await;
    assert_eq!(reply, ChatReply::new(FALLBACK_QUERY, FALLBACK_ANSWER));
    assert!(reply.audio.is_none());
}

#[tokio::test]
async fn test_empty_recording_falls_back() {
    let fixture = Fixture::new(5).await;
    let transcriber = Arc::new(ScriptedTranscriber::saying(&["apple"]));
    let bot = fixture.bot.with_transcriber(transcriber.clone());

    let reply = bot
        .respond_audio(&AudioInput::mono(16_000, Samples::F32(Vec::new())))
        .await;
    assert_eq!(reply, ChatReply::fallback());
    assert!(transcriber.heard.lock().unwrap().is_empty());
}

#[tokio::test]
async fn test_transcription_failure_falls_back_and_cleans_up() {
    let fixture = Fixture::new(5).await;
    let bot = fixture
        .bot
        .with_transcriber(Arc::new(ScriptedTranscriber::failing()))
        .with_synthesizer(Arc::new(FileSynthesizer::default()));
    let fixture = Fixture { bot, ..fixture };

    let reply = fixture.bot.respond_audio(&tone()).await;
    assert_eq!(reply, ChatReply::fallback());
    assert!(fixture.recordings().is_empty());
    assert!(fixture.replies().is_empty());
}

#[tokio::test]
async fn test_old_replies_are_pruned() {
    let fixture = Fixture::new(2).await;
    let bot = fixture.bot.with_synthesizer(Arc::new(FileSynthesizer::default()));
    let fixture = Fixture { bot, ..fixture };

    let mut last = None;
    for _ in 0..4 {
        last = fixture.bot.respond_text("apple").await.audio;
        tokio::time::sleep(Duration::from_millis(20)).await;
    }

    let replies = fixture.replies();
    assert_eq!(replies.len(), 2);
    assert!(replies.contains(&last.unwrap()));
}
