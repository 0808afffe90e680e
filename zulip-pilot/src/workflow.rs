use crate::errors::AutomationError;
use crate::report::{save_report, Timings, WorkflowResult};
use crate::session::Session;
use crate::summarize::Summarizer;
use crate::zulip::{Credentials, ZulipBot, ZulipTarget};
use serde::Serialize;
use std::fmt;
use std::path::PathBuf;
use std::time::Instant;
use tracing::{debug, error, warn};

/// Timing-record keys, one per timed stage transition.
pub mod timing {
    pub const LOGIN: &str = "login";
    pub const NAVIGATE: &str = "navigate_to_topic";
    pub const SEND: &str = "send_message";
    pub const RETRIEVE: &str = "get_last_messages";
    pub const SUMMARIZE: &str = "summarize_messages";
    pub const SAVE: &str = "save_output";
}

/// Stages of the workflow state machine. `Failed` is terminal and reachable
/// from any stage.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Stage {
    Init,
    LoggedIn,
    Navigated,
    Sent,
    Retrieved,
    Summarized,
    Saved,
    Done,
    Failed,
}

impl fmt::Display for Stage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Stage::Init => "init",
            Stage::LoggedIn => "logged_in",
            Stage::Navigated => "navigated",
            Stage::Sent => "sent",
            Stage::Retrieved => "retrieved",
            Stage::Summarized => "summarized",
            Stage::Saved => "saved",
            Stage::Done => "done",
            Stage::Failed => "failed",
        };
        write!(f, "{name}")
    }
}

/// Receives each narrative line as it is appended, so the operator surface
/// can render progress live.
pub trait StatusSink: Send {
    fn push(&mut self, line: &str);
}

/// Sink that drops every line; handy when no operator surface exists.
pub struct NullSink;

impl StatusSink for NullSink {
    fn push(&mut self, _line: &str) {}
}

/// Everything one run needs, loaded once by the caller and passed in
/// explicitly; the workflow never reads process-wide state.
#[derive(Debug, Clone)]
pub struct RunConfig {
    pub target: ZulipTarget,
    pub credentials: Credentials,
    /// The message to post.
    pub message: String,
    /// How many recent messages to read back.
    pub message_count: usize,
    /// Where the JSON result document lands.
    pub output_path: PathBuf,
}

/// What a run hands back to the caller. `result` is present only for runs
/// that reached `Done`; `timings` covers every stage that executed either
/// way.
#[derive(Debug)]
pub struct RunOutcome {
    /// Terminal state of the run, `Done` or `Failed`.
    pub stage: Stage,
    /// Last non-terminal state the machine entered: `Saved` for a completed
    /// run, the stage the failure interrupted otherwise.
    pub reached: Stage,
    pub result: Option<WorkflowResult>,
    pub narrative: Vec<String>,
    pub timings: Timings,
    pub error: Option<String>,
}

/// Run the whole workflow: login, navigate, send, retrieve, optionally
/// summarize, save. Sequential and single-session; the browser session is
/// closed exactly once on every exit path before the outcome is returned.
pub async fn run_workflow(
    session: Session,
    cfg: &RunConfig,
    summarizer: Option<&dyn Summarizer>,
    sink: &mut dyn StatusSink,
) -> RunOutcome {
    let mut narrative = Vec::new();
    let mut timings = Timings::default();
    let mut stage = Stage::Init;

    let outcome = run_steps(
        &session,
        cfg,
        summarizer,
        &mut stage,
        &mut narrative,
        &mut timings,
        sink,
    )
    .await;

    if let Err(e) = session.close().await {
        warn!(error = %e, "failed to close browser session");
    }

    match outcome {
        Ok(result) => RunOutcome {
            stage: Stage::Done,
            reached: stage,
            result: Some(result),
            narrative,
            timings,
            error: None,
        },
        Err(e) => {
            error!(stage = %stage, error = %e, "workflow failed");
            note(&mut narrative, sink, format!("❌ Fatal error in execution: {e}"));
            RunOutcome {
                stage: Stage::Failed,
                reached: stage,
                result: None,
                narrative,
                timings,
                error: Some(e.to_string()),
            }
        }
    }
}

async fn run_steps(
    session: &Session,
    cfg: &RunConfig,
    summarizer: Option<&dyn Summarizer>,
    stage: &mut Stage,
    narrative: &mut Vec<String>,
    timings: &mut Timings,
    sink: &mut dyn StatusSink,
) -> Result<WorkflowResult, AutomationError> {
    let total_start = Instant::now();
    let bot = ZulipBot::new(session, &cfg.target, &cfg.credentials);

    // Init -> LoggedIn
    note(narrative, sink, "🌐 Navigating to Zulip login page...");
    let t0 = Instant::now();
    let logged_in = bot.login().await;
    timings.record(timing::LOGIN, t0.elapsed());
    logged_in?;
    advance(stage, Stage::LoggedIn);
    note(
        narrative,
        sink,
        format!("✅ Logged in! (took {:.2}s)", elapsed(timings, timing::LOGIN)),
    );

    // LoggedIn -> Navigated
    note(
        narrative,
        sink,
        format!("➡️ Navigating to stream and topic '{}'...", cfg.target.topic),
    );
    let t0 = Instant::now();
    let navigated = bot.navigate_to_topic().await;
    timings.record(timing::NAVIGATE, t0.elapsed());
    navigated?;
    advance(stage, Stage::Navigated);
    note(
        narrative,
        sink,
        format!(
            "✅ Opened topic '{}' and armed compose (took {:.2}s)",
            cfg.target.topic,
            elapsed(timings, timing::NAVIGATE)
        ),
    );

    // Navigated -> Sent
    note(narrative, sink, format!("💬 Typing message: {}", cfg.message));
    let t0 = Instant::now();
    let sent = bot.send_message(&cfg.message).await;
    timings.record(timing::SEND, t0.elapsed());
    sent?;
    advance(stage, Stage::Sent);
    note(
        narrative,
        sink,
        format!("✅ Message sent! (took {:.2}s)", elapsed(timings, timing::SEND)),
    );

    // Sent -> Retrieved
    note(
        narrative,
        sink,
        format!("📥 Retrieving last {} messages...", cfg.message_count),
    );
    let t0 = Instant::now();
    let retrieved = bot.last_messages(cfg.message_count).await;
    timings.record(timing::RETRIEVE, t0.elapsed());
    let messages = retrieved?;
    advance(stage, Stage::Retrieved);
    for (idx, message) in messages.iter().enumerate() {
        note(
            narrative,
            sink,
            format!("{}. [{}] {}", idx + 1, message.timestamp, message.content),
        );
    }
    note(
        narrative,
        sink,
        format!(
            "📦 Messages retrieved in {:.2}s.",
            elapsed(timings, timing::RETRIEVE)
        ),
    );

    // Retrieved -> Summarized, skipped entirely without a credential
    let (summary, usage) = match summarizer {
        Some(summarizer) => {
            let t0 = Instant::now();
            let summarized = summarizer.summarize(&messages).await;
            timings.record(timing::SUMMARIZE, t0.elapsed());
            advance(stage, Stage::Summarized);
            note(
                narrative,
                sink,
                format!(
                    "🧠 Summary ready (took {:.2}s)",
                    elapsed(timings, timing::SUMMARIZE)
                ),
            );
            (Some(summarized.summary), Some(summarized.usage))
        }
        None => {
            note(
                narrative,
                sink,
                "⚠️ No summarization credential configured. Skipping summarization.",
            );
            (None, None)
        }
    };

    // Summarized -> Saved, best effort
    let mut result = WorkflowResult {
        messages,
        summary,
        usage,
        timings: timings.clone(),
    };
    let t0 = Instant::now();
    match save_report(&cfg.output_path, &result) {
        Ok(()) => {
            timings.record(timing::SAVE, t0.elapsed());
            note(
                narrative,
                sink,
                format!(
                    "💾 Messages saved to {} (took {:.2}s)",
                    cfg.output_path.display(),
                    elapsed(timings, timing::SAVE)
                ),
            );
        }
        Err(e) => {
            timings.record(timing::SAVE, t0.elapsed());
            warn!(error = %e, path = %cfg.output_path.display(), "failed to save output");
            note(narrative, sink, format!("⚠️ Failed to save output: {e}"));
        }
    }
    advance(stage, Stage::Saved);
    result.timings = timings.clone();

    note(
        narrative,
        sink,
        format!(
            "✅ Total execution time: {:.2}s",
            total_start.elapsed().as_secs_f64()
        ),
    );
    Ok(result)
}

fn advance(stage: &mut Stage, next: Stage) {
    debug!(from = %stage, to = %next, "stage transition");
    *stage = next;
}

fn note(narrative: &mut Vec<String>, sink: &mut dyn StatusSink, line: impl Into<String>) {
    let line = line.into();
    sink.push(&line);
    narrative.push(line);
}

fn elapsed(timings: &Timings, stage: &str) -> f64 {
    timings.get(stage).unwrap_or_default()
}
