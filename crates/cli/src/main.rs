//! # hrchat-cli: A CLI for `hrchat`
//!
//! Ask the HR policy chatbot a question, hold a conversation with it, or load
//! the policy documents into the vector index, all from the terminal.

mod output;

use anyhow::{bail, Result};
use clap::{Parser, Subcommand};
use hrchat::{
    graph::Message,
    ingest::{IngestOptions, Ingestor},
    ChatState,
};
use hrchat_server::{
    config::get_config,
    state::{build_app_state, AppState},
};
use std::fs::File;
use tokio::io::{AsyncBufReadExt, AsyncWriteExt, BufReader};
use tracing::info;
use tracing_subscriber::{fmt, EnvFilter};

// --- CLI Definition ---

#[derive(Parser, Debug)]
#[command(author, version, about, long_about = None)]
#[command(propagate_version = true)]
struct Cli {
    /// Path to the configuration file. Defaults to the server's `config.yml` lookup.
    #[arg(long, global = true, env = "HRCHAT_CONFIG")]
    config: Option<String>,
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// Ask a single HR policy question
    Ask(AskArgs),
    /// Start an interactive conversation
    Chat,
    /// Load markdown policy documents into the vector index
    Ingest(IngestArgs),
}

#[derive(Parser, Debug)]
struct AskArgs {
    /// The question to ask
    #[arg(required = true)]
    question: Vec<String>,
    /// Print the full pipeline state as JSON
    #[arg(long)]
    json: bool,
}

#[derive(Parser, Debug)]
struct IngestArgs {
    /// Markdown files to load. Defaults to `documents.paths` from the configuration.
    paths: Vec<String>,
    /// Delete every vector in the index before uploading
    #[arg(long)]
    recreate: bool,
}

// --- Main Application Entry ---

#[tokio::main]
async fn main() -> Result<()> {
    dotenvy::dotenv().ok();

    // Setup logging to a file so it does not interleave with answers.
    let log_file = File::create("hrchat-cli.log")?;
    let subscriber = fmt::Subscriber::builder()
        .with_writer(log_file)
        .with_env_filter(EnvFilter::from_default_env())
        .finish();
    tracing::subscriber::set_global_default(subscriber)?;

    let cli = Cli::parse();
    let config = get_config(cli.config.as_deref())?;
    let app_state = build_app_state(config).await?;

    match cli.command {
        Commands::Ask(args) => handle_ask(&app_state, args).await,
        Commands::Chat => handle_chat(&app_state).await,
        Commands::Ingest(args) => handle_ingest(&app_state, args).await,
    }
}

// --- Command Handlers ---

async fn handle_ask(app_state: &AppState, args: AskArgs) -> Result<()> {
    let question = args.question.join(" ");
    if question.trim().is_empty() {
        bail!("The question must not be empty.");
    }
    info!("Asking: '{}'", question);

    let state = app_state.graph.ask(&question).await?;
    if args.json {
        println!("{}", serde_json::to_string_pretty(&state)?);
    } else {
        println!("{}", output::format_answer(&state));
    }
    Ok(())
}

async fn handle_chat(app_state: &AppState) -> Result<()> {
    let mut stdout = tokio::io::stdout();
    let mut lines = BufReader::new(tokio::io::stdin()).lines();
    let mut history: Vec<Message> = Vec::new();

    println!("HR 정책 챗봇입니다. 종료하려면 'exit'를 입력하세요.");
    loop {
        stdout.write_all(b"\n> ").await?;
        stdout.flush().await?;

        let Some(line) = lines.next_line().await? else {
            break;
        };
        let line = line.trim();
        if line.is_empty() {
            continue;
        }
        if matches!(line, "exit" | "quit") {
            break;
        }

        history.push(Message::user(line));
        match app_state
            .graph
            .invoke(ChatState::from_messages(history.clone()))
            .await
        {
            Ok(state) => {
                println!("{}", output::format_answer(&state));
                history = state.messages;
            }
            Err(e) => {
                history.pop();
                eprintln!("Error: {e}");
            }
        }
    }
    Ok(())
}

async fn handle_ingest(app_state: &AppState, args: IngestArgs) -> Result<()> {
    let paths = if args.paths.is_empty() {
        app_state.config.documents.paths.clone()
    } else {
        args.paths
    };
    if paths.is_empty() {
        bail!("No document paths given and none configured under `documents.paths`.");
    }

    let result = app_state
        .ingestor
        .ingest(
            &paths,
            IngestOptions {
                recreate: args.recreate,
            },
        )
        .await?;
    println!("{}", output::format_ingestion(&result));
    Ok(())
}
