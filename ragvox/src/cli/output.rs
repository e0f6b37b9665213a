use console::style;
use ragvox::domain::ChatReply;
use serde_json::json;

use ragvox::error::Result;

pub fn print_status(status: &str, json: bool) -> Result<()> {
    if json {
        println!("{}", serde_json::to_string(&json!({ "status": status }))?);
    } else {
        eprintln!("{}", style(status).dim());
    }
    Ok(())
}

pub fn print_reply(reply: &ChatReply, json: bool) -> Result<()> {
    if json {
        println!("{}", serde_json::to_string(reply)?);
        return Ok(());
    }

    for (query, answer) in &reply.turns {
        println!("{} {}", style("Q:").bold().cyan(), query);
        println!("{} {}", style("A:").bold().green(), answer);
    }
    if let Some(audio) = &reply.audio {
        println!("{} {}", style("Audio:").dim(), audio.display());
    }
    Ok(())
}
