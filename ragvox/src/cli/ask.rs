use std::path::PathBuf;

use ragvox::config::Config;
use ragvox::error::Result;

use super::app::{build_bot, documents, upload};
use super::output::{print_reply, print_status};

pub async fn run(
    config: &Config,
    docs: Vec<PathBuf>,
    question: &str,
    speak: bool,
    json: bool,
) -> Result<()> {
    let bot = build_bot(config, speak)?;

    let status = upload(&bot, &documents(docs)).await;
    print_status(&status, json)?;

    let reply = bot.respond_text(question).await;
    print_reply(&reply, json)
}
