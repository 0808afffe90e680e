//! zulip-pilot CLI
//!
//! Runs one scripted workflow against a Zulip realm: log in, open a stream
//! topic, post a message, read back the last messages, optionally summarize
//! them via OpenAI, and write a JSON report.
//!
//! Requires a running chromedriver (see WEBDRIVER_URL) plus ZULIP_URL,
//! ZULIP_EMAIL and ZULIP_PASSWORD in the environment or a .env file.
//! OPENAI_API_KEY enables the summarization stage.

use anyhow::{Context, Result};
use clap::Parser;
use colored::Colorize;
use rand::Rng;
use std::path::PathBuf;
use std::time::Duration;
use zulip_pilot::driver::{self, DriverOptions};
use zulip_pilot::{
    run_workflow, Credentials, OpenAiSummarizer, RunConfig, Session, Stage, StatusSink,
    Summarizer, ZulipTarget,
};

mod config;
mod utils;

use config::Config;

const CANNED_MESSAGES: &[&str] = &[
    "Hey there! Just testing the Zulip pilot",
    "Automated message from the workflow runner",
    "Random check-in: everything looks good!",
    "Workflow test: message delivery in progress",
];

#[derive(Parser, Debug)]
#[command(name = "zulip-pilot")]
#[command(about = "🤖 Scripted Zulip web UI workflow over WebDriver")]
struct Args {
    /// Run Chrome without a visible window
    #[arg(long)]
    headless: bool,

    /// Href fragment identifying the stream link in the left sidebar
    #[arg(long, default_value = "#narrow/channel/512718-general")]
    stream: String,

    /// Topic name within the stream
    #[arg(long, default_value = "test-topic")]
    topic: String,

    /// Message to post; a canned test message is picked when omitted
    #[arg(long)]
    message: Option<String>,

    /// How many recent messages to read back
    #[arg(long, default_value_t = 5)]
    count: usize,

    /// Where the JSON result document is written
    #[arg(long, default_value = "output/output.json")]
    output: PathBuf,

    /// Shared upper bound for every UI wait, in seconds
    #[arg(long, default_value_t = 15)]
    timeout_secs: u64,
}

/// Renders each narrative line to the operator as it is appended.
struct ConsoleSink;

impl StatusSink for ConsoleSink {
    fn push(&mut self, line: &str) {
        println!("{line}");
    }
}

#[tokio::main]
async fn main() -> Result<()> {
    utils::init_logging()?;
    let args = Args::parse();
    let config = Config::from_env()?;

    let message = args.message.clone().unwrap_or_else(|| {
        let mut rng = rand::thread_rng();
        CANNED_MESSAGES[rng.gen_range(0..CANNED_MESSAGES.len())].to_string()
    });

    let run_config = RunConfig {
        target: ZulipTarget {
            url: config.zulip_url.clone(),
            stream_href: args.stream.clone(),
            topic: args.topic.clone(),
        },
        credentials: Credentials {
            email: config.zulip_email.clone(),
            password: config.zulip_password.clone(),
        },
        message,
        message_count: args.count,
        output_path: args.output.clone(),
    };

    let summarizer = config
        .openai_api_key
        .as_ref()
        .map(|key| OpenAiSummarizer::new(key.clone()));

    let driver_options = DriverOptions {
        webdriver_url: config.webdriver_url.clone(),
        headless: args.headless,
    };
    let engine = driver::connect(&driver_options)
        .await
        .context("failed to start the browser session (is chromedriver running?)")?;
    let session = Session::new(engine, Duration::from_secs(args.timeout_secs));

    let mut sink = ConsoleSink;
    let outcome = run_workflow(
        session,
        &run_config,
        summarizer.as_ref().map(|s| s as &dyn Summarizer),
        &mut sink,
    )
    .await;

    println!();
    match outcome.stage {
        Stage::Done => {
            if let Some(result) = &outcome.result {
                println!("{}", "📊 JSON Output".bold());
                println!("{}", serde_json::to_string_pretty(result)?);
            }
            println!("{}", "✅ SUCCESS".green().bold());
            Ok(())
        }
        _ => {
            let reason = outcome.error.as_deref().unwrap_or("unknown error");
            eprintln!(
                "{} {reason} (last stage reached: {})",
                "❌ FAILURE:".red().bold(),
                outcome.reached
            );
            std::process::exit(1);
        }
    }
}
