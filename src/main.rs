// src/main.rs

// Modules defined in the crate
mod api;
mod attachments;
mod config;
mod constants;
mod error;
mod model;
mod pipeline;
mod storage;
mod types;

use crate::api::{ConfluenceHttpClient, PublishingClient};
use crate::config::{CommandLineInput, PublishConfig};
use crate::error::AppError;
use crate::pipeline::{publish_all, PublishDocument, PublishOutcome};
use clap::Parser;
use log::LevelFilter;
use log4rs::{
    append::console::ConsoleAppender,
    append::file::FileAppender,
    config::{Appender, Root},
    encode::pattern::PatternEncoder,
    filter::threshold::ThresholdFilter,
    Config,
};
use std::fs;
use std::path::Path;

/// Sets up logging configuration.
fn setup_logging(verbose: bool) -> Result<(), Box<dyn std::error::Error>> {
    let log_level = if verbose {
        LevelFilter::Debug
    } else {
        LevelFilter::Warn
    };

    let log_file_path = std::env::temp_dir().join("adf2confluence.log");
    if let Some(parent) = log_file_path.parent() {
        fs::create_dir_all(parent)?;
    }

    let pattern = if verbose {
        "{d(%Y-%m-%d %H:%M:%S)} [{l}] - {m}{n}"
    } else {
        "{m}{n}"
    };

    let stdout_appender = ConsoleAppender::builder()
        .encoder(Box::new(PatternEncoder::new(pattern)))
        .build();

    let file_appender = FileAppender::builder()
        .encoder(Box::new(PatternEncoder::new(
            "{d(%Y-%m-%d %H:%M:%S)} [{l}] - {m}{n}",
        )))
        .build(&log_file_path)?;

    let config = Config::builder()
        .appender(
            Appender::builder()
                .filter(Box::new(ThresholdFilter::new(log_level)))
                .build("stdout", Box::new(stdout_appender)),
        )
        .appender(Appender::builder().build("file", Box::new(file_appender)))
        .build(
            Root::builder()
                .appender("stdout")
                .appender("file")
                .build(LevelFilter::Debug),
        )?;

    log4rs::init_config(config)?;
    Ok(())
}

/// Reads one document description file.
fn load_document(path: &Path) -> Result<PublishDocument, AppError> {
    let text = fs::read_to_string(path)?;
    let mut document: PublishDocument =
        serde_json::from_str(&text).map_err(|source| AppError::JsonParseError {
            path: path.to_path_buf(),
            source,
        })?;
    if document.source.is_empty() {
        document.source = path.display().to_string();
    }
    Ok(document)
}

fn print_report(outcomes: &[PublishOutcome]) {
    let failed = outcomes.iter().filter(|o| !o.succeeded()).count();
    println!(
        "Published {}/{} document(s)",
        outcomes.len() - failed,
        outcomes.len()
    );
    for outcome in outcomes {
        match &outcome.error {
            None => println!("  ok    {}", outcome.source),
            Some(reason) => println!("  FAIL  {} — {}", outcome.source, reason),
        }
    }
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let input = CommandLineInput::parse();

    if let Err(e) = setup_logging(input.verbose) {
        eprintln!("Failed to set up logging: {}", e);
    }

    let config = PublishConfig::from_input(input)?;
    log::info!(
        "Publishing {} document(s) to {} ({} variant)",
        config.documents.len(),
        config.base_url,
        config.variant
    );

    let mut documents = Vec::with_capacity(config.documents.len());
    for path in &config.documents {
        documents.push(load_document(path)?);
    }

    let http = ConfluenceHttpClient::new(
        config.site_base(),
        config.email.clone(),
        config.api_key.clone(),
    )?;
    let mut client = PublishingClient::new(http, config.variant, config.site_base());

    let outcomes = publish_all(&mut client, &config.space_key, documents).await;
    print_report(&outcomes);

    let failures: Vec<String> = outcomes
        .iter()
        .filter(|o| !o.succeeded())
        .map(|o| o.source.clone())
        .collect();
    if !failures.is_empty() {
        return Err(AppError::PublishFailed { failures }.into());
    }
    Ok(())
}
