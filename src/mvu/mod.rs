// SPDX-License-Identifier: MIT
// SPDX-FileCopyrightText: 2025 Alexander Minges

//! Root Model-View-Update kernel wiring component state, messages, and commands.

use std::path::PathBuf;
use std::time::{Duration, Instant};

use tracing::{debug, info, warn};

use crate::client::{ProcessingClient, ProcessingOutcome, Submission};
use crate::config::AppConfig;
use crate::models::candidate::CandidateFile;
use crate::models::page_ranges::parse_page_ranges;
use crate::models::severity::Severity;
use crate::models::tool::{PAGE_RANGES_FIELD, Tool};
use crate::ui::components::feedback::{
    self, BusyControl, FeedbackModel, FeedbackMsg, clear_busy, set_busy,
};
use crate::ui::components::staging::{self, StagingCommand, StagingModel, StagingMsg};
use crate::utils::{format_size, output_filename};

const BUSY_LABEL: &str = "Processing...";

/// Top-level application state.
#[derive(Debug)]
pub struct AppModel {
    /// Staging area for the active tool.
    pub staging: StagingModel,
    /// Notification stack.
    pub feedback: FeedbackModel,
    /// Submit button state.
    pub submit: BusyControl,
    /// Raw output filename as typed by the user.
    pub output_name: String,
    /// Selected value of the tool's extra option, if the tool has one.
    pub tool_option: Option<String>,
    /// Raw page ranges as typed, used when splitting by ranges.
    pub page_ranges: String,
    /// Count of queued background commands.
    pub pending_commands: usize,
    max_size_bytes: u64,
    // Label captured by `set_busy`, handed back to `clear_busy`.
    busy_original: Option<String>,
}

/// Application messages routed through the update function.
#[derive(Debug)]
pub enum Msg {
    SelectTool(Tool),
    OutputNameChanged(String),
    ToolOptionChanged(String),
    PageRangesChanged(String),
    SubmitRequested,
    SubmitCompleted(Result<ProcessingOutcome, String>),
    LinkOpened(Result<(), String>),
    Staging(StagingMsg),
    Feedback(FeedbackMsg),
}

/// Commands represent side-effects executed between frames.
#[derive(Debug)]
pub enum Command {
    PickFiles {
        title: String,
        extensions: Vec<&'static str>,
        multiple: bool,
    },
    InspectFile {
        path: PathBuf,
    },
    Submit(Submission),
    OpenUrl(String),
}

impl AppModel {
    pub fn new(config: &AppConfig) -> Self {
        let tool = config.tool;
        let mut submit = BusyControl::new(tool.label());
        submit.set_enabled(false);
        Self {
            staging: StagingModel::new(tool, config.max_size_bytes),
            feedback: FeedbackModel::with_ttl(config.notification_ttl()),
            submit,
            output_name: String::new(),
            tool_option: tool.option().map(|o| o.default.to_string()),
            page_ranges: String::new(),
            pending_commands: 0,
            max_size_bytes: config.max_size_bytes,
            busy_original: None,
        }
    }

    pub fn tool(&self) -> Tool {
        self.staging.tool()
    }

    /// Whether the staged files satisfy the tool's minimum count.
    pub fn ready_to_submit(&self) -> bool {
        self.staging.list().len() >= self.tool().min_files()
    }
}

/// Update the application model and enqueue commands.
pub fn update(model: &mut AppModel, msg: Msg, cmds: &mut Vec<Command>, now: Instant) {
    match msg {
        Msg::SelectTool(tool) => select_tool(model, tool, now),
        Msg::OutputNameChanged(text) => model.output_name = text,
        Msg::ToolOptionChanged(value) => {
            if model
                .tool()
                .option()
                .is_some_and(|o| o.choices.contains(&value.as_str()))
            {
                model.tool_option = Some(value);
            }
        }
        Msg::PageRangesChanged(text) => model.page_ranges = text,
        Msg::SubmitRequested => request_submit(model, cmds, now),
        Msg::SubmitCompleted(result) => {
            // Always restore the control first so a failure never leaves it disabled.
            let original = model
                .busy_original
                .take()
                .unwrap_or_else(|| model.tool().label().to_string());
            clear_busy(&mut model.submit, &original);
            match result {
                Ok(outcome) => {
                    info!(filename = %outcome.filename, "processing finished");
                    match outcome.download_url {
                        Some(url) => model.feedback.notify_with_link(
                            outcome.message,
                            Severity::Success,
                            url.to_string(),
                            now,
                        ),
                        None => model.feedback.notify(outcome.message, Severity::Success, now),
                    };
                }
                Err(err) => {
                    warn!(%err, "processing failed");
                    model.feedback.notify(err, Severity::Danger, now);
                }
            }
        }
        Msg::LinkOpened(result) => {
            if let Err(err) = result {
                model
                    .feedback
                    .notify(format!("Could not open link: {err}"), Severity::Warning, now);
            }
        }
        Msg::Staging(m) => {
            let mut staging_cmds = Vec::new();
            for event in staging::update(&mut model.staging, m, &mut staging_cmds, now) {
                model.feedback.notify(event.message, event.severity, now);
            }
            for c in staging_cmds {
                cmds.push(match c {
                    StagingCommand::PickFiles {
                        title,
                        extensions,
                        multiple,
                    } => Command::PickFiles {
                        title,
                        extensions,
                        multiple,
                    },
                    StagingCommand::InspectFile { path } => Command::InspectFile { path },
                });
            }
        }
        Msg::Feedback(m) => {
            if let Some(url) = feedback::update(&mut model.feedback, m) {
                cmds.push(Command::OpenUrl(url));
            }
        }
    }
    let ready = model.ready_to_submit();
    model.submit.set_enabled(ready);
}

/// Advance timers; returns how long until the next one is due.
pub fn tick(model: &mut AppModel, now: Instant) -> Option<Duration> {
    let expired = model.feedback.tick(now);
    if expired > 0 {
        debug!(expired, "notifications expired");
    }
    model.staging.tick(now);
    [
        model.feedback.next_deadline(now),
        model.staging.next_deadline(now),
    ]
    .into_iter()
    .flatten()
    .min()
}

/// Cancel all deferred work owned by the model.
pub fn teardown(model: &mut AppModel) {
    model.feedback.teardown();
    model.staging.teardown();
}

fn select_tool(model: &mut AppModel, tool: Tool, now: Instant) {
    if tool == model.tool() {
        return;
    }
    if model.submit.is_busy() {
        model.feedback.notify(
            "Wait for the current job to finish before switching tools.",
            Severity::Warning,
            now,
        );
        return;
    }
    debug!(?tool, "switching tool");
    model.staging.teardown();
    model.staging = StagingModel::new(tool, model.max_size_bytes);
    model.submit = BusyControl::new(tool.label());
    model.tool_option = tool.option().map(|o| o.default.to_string());
    model.page_ranges.clear();
    model.output_name.clear();
}

/// Validate model state and enqueue the submission.
fn request_submit(model: &mut AppModel, cmds: &mut Vec<Command>, now: Instant) {
    if model.submit.is_busy() {
        return;
    }
    let tool = model.tool();
    let staged = model.staging.list().len();
    if staged < tool.min_files() {
        let message = if tool.min_files() == 1 {
            "Add a file first.".to_string()
        } else {
            format!("{} needs at least {} files.", tool.label(), tool.min_files())
        };
        model.feedback.notify(message, Severity::Warning, now);
        return;
    }

    // The service rejects oversized requests before reading any file.
    let total = model.staging.list().total_size_bytes();
    if total > model.max_size_bytes {
        model.feedback.notify(
            format!(
                "Total upload size {} exceeds the {} limit.",
                format_size(total),
                format_size(model.max_size_bytes)
            ),
            Severity::Warning,
            now,
        );
        return;
    }

    let mut options = match (tool.option(), &model.tool_option) {
        (Some(opt), Some(value)) => vec![(opt.field.to_string(), value.clone())],
        _ => Vec::new(),
    };
    if tool.needs_page_ranges(model.tool_option.as_deref()) {
        match parse_page_ranges(&model.page_ranges) {
            Ok(ranges) => options.extend(
                ranges
                    .into_iter()
                    .map(|range| (PAGE_RANGES_FIELD.to_string(), range)),
            ),
            Err(err) => {
                model.feedback.notify(err.to_string(), Severity::Warning, now);
                return;
            }
        }
    }
    let submission = Submission {
        tool,
        files: model.staging.list().files(),
        output_filename: output_filename(&model.output_name, tool),
        options,
    };

    model.busy_original = Some(set_busy(&mut model.submit, BUSY_LABEL));
    model.feedback.notify(
        format!("Uploading {staged} file(s)..."),
        Severity::Info,
        now,
    );
    cmds.push(Command::Submit(submission));
}

/// Execute a command synchronously on a worker thread and return a resulting message.
pub fn run_command(cmd: Command, client: &dyn ProcessingClient) -> Msg {
    match cmd {
        Command::PickFiles {
            title,
            extensions,
            multiple,
        } => {
            let mut dialog = rfd::FileDialog::new().set_title(&title);
            if !extensions.is_empty() {
                dialog = dialog.add_filter("Supported files", extensions.as_slice());
            }
            let files = if multiple {
                dialog.pick_files().unwrap_or_default()
            } else {
                dialog.pick_file().into_iter().collect()
            };
            Msg::Staging(StagingMsg::FilesPicked(files))
        }
        Command::InspectFile { path } => match CandidateFile::from_path(&path) {
            Ok(file) => Msg::Staging(StagingMsg::FileInspected(file)),
            Err(err) => Msg::Staging(StagingMsg::InspectFailed {
                path,
                error: format!("{err:#}"),
            }),
        },
        Command::Submit(submission) => {
            Msg::SubmitCompleted(client.submit(&submission).map_err(|e| e.to_string()))
        }
        Command::OpenUrl(url) => Msg::LinkOpened(open::that(&url).map_err(|e| e.to_string())),
    }
}
