use std::path::PathBuf;

use clap::{Parser, Subcommand};
use ragvox::config::Config;
use ragvox::error::Result;

mod app;
mod ask;
mod chat;
mod chunk;
mod listen;
mod output;

#[derive(Parser)]
#[command(name = "ragvox")]
#[command(about = "Ask questions about your documents, by text or voice")]
#[command(version)]
pub struct Cli {
    #[arg(long, global = true, help = "Output as JSON")]
    pub json: bool,

    #[arg(long, global = true, help = "Number of chunks handed to the generator")]
    pub top_k: Option<usize>,

    #[arg(long, global = true, help = "Words per chunk")]
    pub chunk_size: Option<usize>,

    #[arg(long, global = true, help = "Words shared by adjacent chunks")]
    pub overlap: Option<usize>,

    #[arg(long, global = true, help = "Do not synthesize spoken replies")]
    pub no_speech: bool,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand)]
pub enum Commands {
    #[command(about = "Index documents and answer one question")]
    Ask {
        #[arg(help = "Question to answer")]
        question: String,

        #[arg(long = "doc", required = true, help = "Document to index (repeatable)")]
        docs: Vec<PathBuf>,
    },

    #[command(about = "Interactive question loop over indexed documents")]
    Chat {
        #[arg(long = "doc", help = "Document to index before the first question (repeatable)")]
        docs: Vec<PathBuf>,
    },

    #[command(about = "Answer a spoken question recorded in a WAV file")]
    Listen {
        #[arg(help = "WAV recording of the question")]
        audio: PathBuf,

        #[arg(long = "doc", required = true, help = "Document to index (repeatable)")]
        docs: Vec<PathBuf>,
    },

    #[command(about = "Show the chunks a document is split into")]
    Chunk {
        #[arg(help = "Document to extract and chunk")]
        file: PathBuf,
    },
}

impl Cli {
    fn apply_overrides(&self, mut config: Config) -> Result<Config> {
        if let Some(top_k) = self.top_k {
            config.retrieval.top_k = top_k;
        }
        if let Some(chunk_size) = self.chunk_size {
            config.chunking.chunk_size = chunk_size;
        }
        if let Some(overlap) = self.overlap {
            config.chunking.overlap = overlap;
        }
        config.validate()?;
        Ok(config)
    }
}

pub async fn run(cli: Cli) -> Result<()> {
    let config = cli.apply_overrides(Config::load()?)?;
    let speak = !cli.no_speech;

    match cli.command {
        Commands::Ask { question, docs } => ask::run(&config, docs, &question, speak, cli.json).await,
        Commands::Chat { docs } => chat::run(&config, docs, speak, cli.json).await,
        Commands::Listen { audio, docs } => listen::run(&config, docs, &audio, speak, cli.json).await,
        Commands::Chunk { file } => chunk::run(&config, file, cli.json).await,
    }
}
