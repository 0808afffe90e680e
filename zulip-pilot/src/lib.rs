//! Scripted automation of the Zulip web UI through a WebDriver session,
//! inspired by Playwright's locator model.
//!
//! One run is a fixed sequence: log in, open a stream topic, post a message,
//! read back the most recent messages, optionally summarize them through the
//! OpenAI API, and persist a JSON report. Every UI wait goes through a single
//! bounded poll primitive; the browser session is released on every exit
//! path.
//!
//! The browser backend and the summarization service both sit behind
//! capability traits ([`BrowserEngine`], [`Summarizer`]) so the whole
//! workflow runs against test doubles.

pub mod driver;
pub mod element;
pub mod errors;
pub mod extract;
pub mod locator;
pub mod report;
pub mod selector;
pub mod session;
pub mod summarize;
#[cfg(test)]
mod tests;
pub mod workflow;
pub mod zulip;

pub use element::{ElementImpl, WebElement};
pub use errors::AutomationError;
pub use extract::{extract_messages, Message};
pub use locator::{poll_until, ElementState, Locator};
pub use report::{save_report, Timings, WorkflowResult};
pub use selector::Selector;
pub use session::{BrowserEngine, Session};
pub use summarize::{
    estimate_cost, OpenAiSummarizer, SummaryResult, Summarizer, UsageStats, SENTINEL_SUMMARY,
};
pub use workflow::{run_workflow, NullSink, RunConfig, RunOutcome, Stage, StatusSink};
pub use zulip::{Credentials, ZulipBot, ZulipTarget};
