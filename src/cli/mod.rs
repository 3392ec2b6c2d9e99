//! Command-line interface for the contract intelligence engine.

use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use comfy_table::{presets::UTF8_FULL, Cell, Table};
use console::style;

use crate::domain::models::{Config, StructuredOutcome};
use crate::services::Engine;

#[derive(Parser)]
#[command(name = "contract-intel")]
#[command(about = "Contract intelligence: ingest, ask, extract, audit", long_about = None)]
#[command(version)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,

    /// Path to a config file (defaults to contract-intel.yaml plus env)
    #[arg(short, long, global = true)]
    pub config: Option<PathBuf>,

    /// Output in JSON format
    #[arg(short, long, global = true)]
    pub json: bool,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Copy PDF files into the corpus and rebuild the index
    Ingest {
        /// PDF files to ingest
        #[arg(required = true)]
        files: Vec<PathBuf>,
    },

    /// Rebuild the index from the corpus directory
    Rebuild,

    /// Ask a question against the indexed corpus
    Ask {
        /// The question
        question: String,

        /// Print the answer in fixed-size segments
        #[arg(long)]
        chunked: bool,
    },

    /// Extract structured fields from one corpus document
    Extract {
        /// Document ID (file name inside the corpus directory)
        document_id: String,
    },

    /// Audit one corpus document for contractual risks
    Audit {
        /// Document ID (file name inside the corpus directory)
        document_id: String,
    },

    /// Show what the index currently holds
    Status,
}

/// Build the engine from the loaded configuration and dispatch.
pub async fn run(cli: Cli, config: Config) -> Result<()> {
    let engine = Engine::init(&config)
        .await
        .context("Failed to initialize engine")?;

    match cli.command {
        Commands::Ingest { files } => handle_ingest(&engine, files, cli.json).await,
        Commands::Rebuild => handle_rebuild(&engine, cli.json).await,
        Commands::Ask { question, chunked } => {
            handle_ask(&engine, &question, chunked, cli.json).await
        }
        Commands::Extract { document_id } => handle_extract(&engine, &document_id, cli.json).await,
        Commands::Audit { document_id } => handle_audit(&engine, &document_id, cli.json).await,
        Commands::Status => handle_status(&engine, cli.json).await,
    }
}

async fn handle_ingest(engine: &Engine, files: Vec<PathBuf>, json: bool) -> Result<()> {
    let ids = engine
        .ingest_files(&files)
        .await
        .context("Failed to ingest files")?;

    if json {
        println!(
            "{}",
            serde_json::to_string_pretty(&serde_json::json!({ "document_ids": ids }))?
        );
    } else {
        println!("{} {} file(s):", style("Ingested").green().bold(), ids.len());
        for id in &ids {
            println!("  {id}");
        }
    }

    Ok(())
}

async fn handle_rebuild(engine: &Engine, json: bool) -> Result<()> {
    let report = engine.rebuild().await.context("Failed to rebuild index")?;

    if json {
        println!(
            "{}",
            serde_json::to_string_pretty(&serde_json::json!({
                "documents": report.documents,
                "skipped": report.skipped,
                "chunks": report.chunks,
            }))?
        );
    } else {
        println!(
            "{} {} document(s), {} chunk(s), {} skipped",
            style("Index rebuilt:").green().bold(),
            report.documents,
            report.chunks,
            report.skipped
        );
    }

    Ok(())
}

async fn handle_ask(engine: &Engine, question: &str, chunked: bool, json: bool) -> Result<()> {
    engine
        .load_or_build()
        .await
        .context("Failed to prepare index")?;

    if chunked {
        let segments = engine
            .ask_chunked(question)
            .await
            .context("Failed to answer question")?;

        if json {
            println!(
                "{}",
                serde_json::to_string_pretty(&serde_json::json!({ "segments": segments }))?
            );
        } else {
            for segment in segments {
                println!("{segment}");
            }
        }
        return Ok(());
    }

    let result = engine
        .ask(question)
        .await
        .context("Failed to answer question")?;

    if json {
        let sources: Vec<_> = result
            .context
            .chunks
            .iter()
            .map(|s| {
                serde_json::json!({
                    "chunk_id": s.chunk.id,
                    "score": s.score,
                })
            })
            .collect();
        println!(
            "{}",
            serde_json::to_string_pretty(&serde_json::json!({
                "answer": result.answer,
                "sources": sources,
            }))?
        );
    } else {
        println!("{}", result.answer);
        if !result.context.chunks.is_empty() {
            println!();
            println!("{}", style("Sources:").dim());
            for scored in &result.context.chunks {
                println!(
                    "  {} {}",
                    style(format!("[{:.3}]", scored.score)).dim(),
                    scored.chunk.id
                );
            }
        }
    }

    Ok(())
}

async fn handle_extract(engine: &Engine, document_id: &str, json: bool) -> Result<()> {
    let outcome = engine
        .extract(document_id)
        .await
        .context("Failed to extract fields")?;

    print_outcome(document_id, "extracted", &outcome, json)
}

async fn handle_audit(engine: &Engine, document_id: &str, json: bool) -> Result<()> {
    let outcome = engine
        .audit(document_id)
        .await
        .context("Failed to audit document")?;

    print_outcome(document_id, "risks", &outcome, json)
}

/// Shared printer for the two structured operations. The unparsed case is
/// surfaced as `{"raw": ...}` so callers always see the model output.
fn print_outcome<T: serde::Serialize>(
    document_id: &str,
    key: &str,
    outcome: &StructuredOutcome<T>,
    json: bool,
) -> Result<()> {
    if json {
        println!(
            "{}",
            serde_json::to_string_pretty(&serde_json::json!({
                "document_id": document_id,
                key: outcome,
            }))?
        );
        return Ok(());
    }

    match outcome {
        StructuredOutcome::Parsed(value) => {
            println!("{} {document_id}", style("Document:").bold());
            println!("{}", serde_json::to_string_pretty(value)?);
        }
        StructuredOutcome::Unparsed { raw } => {
            println!(
                "{} model response was not valid JSON; raw output follows",
                style("Warning:").yellow().bold()
            );
            println!("{raw}");
        }
    }

    Ok(())
}

async fn handle_status(engine: &Engine, json: bool) -> Result<()> {
    engine
        .load_or_build()
        .await
        .context("Failed to prepare index")?;
    let status = engine.status().await;

    if json {
        let documents: Vec<_> = status
            .documents
            .iter()
            .map(|(id, chunks)| serde_json::json!({ "document_id": id, "chunks": chunks }))
            .collect();
        println!(
            "{}",
            serde_json::to_string_pretty(&serde_json::json!({
                "indexed_chunks": status.indexed_chunks,
                "documents": documents,
            }))?
        );
        return Ok(());
    }

    if status.documents.is_empty() {
        println!("Index is empty. Run `contract-intel ingest <files>` first.");
        return Ok(());
    }

    let mut table = Table::new();
    table.load_preset(UTF8_FULL);
    table.set_header(vec!["Document", "Chunks"]);
    for (id, chunks) in &status.documents {
        table.add_row(vec![Cell::new(id), Cell::new(chunks)]);
    }

    println!("{table}");
    println!(
        "{} chunk(s) across {} document(s)",
        status.indexed_chunks,
        status.documents.len()
    );

    Ok(())
}
