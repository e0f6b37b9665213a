use std::io::Write;
use std::path::PathBuf;

use console::style;
use ragvox::config::Config;
use ragvox::error::Result;
use tokio::io::{AsyncBufReadExt, BufReader};

use super::app::{build_bot, documents, upload};
use super::output::{print_reply, print_status};

enum Input {
    Question(String),
    Load(Vec<PathBuf>),
    Quit,
    Empty,
}

fn parse(line: &str) -> Input {
    let line = line.trim();
    if line.is_empty() {
        return Input::Empty;
    }
    if matches!(line, ":quit" | ":q" | ":exit") {
        return Input::Quit;
    }
    if let Some(paths) = line.strip_prefix(":load") {
        return Input::Load(paths.split_whitespace().map(PathBuf::from).collect());
    }
    Input::Question(line.to_string())
}

pub async fn run(config: &Config, docs: Vec<PathBuf>, speak: bool, json: bool) -> Result<()> {
    let bot = build_bot(config, speak)?;

    if !docs.is_empty() {
        let status = upload(&bot, &documents(docs)).await;
        print_status(&status, json)?;
    }

    if !json {
        eprintln!(
            "{}",
            style("Ask a question, `:load <file>...` to add documents, `:quit` to leave.").dim()
        );
    }

    let mut lines = BufReader::new(tokio::io::stdin()).lines();
    loop {
        if !json {
            print!("{} ", style(">").bold());
            std::io::stdout().flush()?;
        }

        let Some(line) = lines.next_line().await? else {
            break;
        };

        match parse(&line) {
            Input::Empty => {}
            Input::Quit => break,
            Input::Load(paths) => {
                let status = upload(&bot, &documents(paths)).await;
                print_status(&status, json)?;
            }
            Input::Question(question) => {
                let reply = bot.respond_text(&question).await;
                print_reply(&reply, json)?;
            }
        }
    }

    Ok(())
}
