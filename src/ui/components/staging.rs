// SPDX-License-Identifier: MIT
// SPDX-FileCopyrightText: 2025 Alexander Minges

//! Staging panel: picker and drop ingestion, admission checks and the removable preview list.

use std::collections::HashSet;
use std::path::PathBuf;
use std::time::{Duration, Instant};

use eframe::egui;
use tracing::{debug, warn};

use crate::models::candidate::CandidateFile;
use crate::models::severity::Severity;
use crate::models::staging::{EntryId, StagedEntry, StagingList};
use crate::models::tool::Tool;
use crate::models::validation::ValidationRule;
use crate::scheduler::TaskList;
use crate::ui::components::drop_zone::{self, DragEvent, DropZone, DroppedItem};
use crate::utils::{format_size, icon_for};

/// Delay between consecutive preview items fading in after a batch is added.
const REVEAL_STAGGER: Duration = Duration::from_millis(60);

/// MVU state for one tool's staging area.
#[derive(Debug)]
pub struct StagingModel {
    tool: Tool,
    rule: ValidationRule,
    list: StagingList,
    drop_zone: DropZone,
    reveals: TaskList<EntryId>,
    revealed: HashSet<EntryId>,
}

/// Messages emitted by the staging view and by finished commands.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum StagingMsg {
    RequestPickFiles,
    FilesPicked(Vec<PathBuf>),
    FileInspected(CandidateFile),
    InspectFailed { path: PathBuf, error: String },
    Drag(Vec<DragEvent>),
    Remove(EntryId),
    Clear,
}

/// Side effects requested by the staging panel.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum StagingCommand {
    PickFiles {
        title: String,
        extensions: Vec<&'static str>,
        multiple: bool,
    },
    InspectFile {
        path: PathBuf,
    },
}

/// User-facing feedback produced by an update.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct StagingEvent {
    pub message: String,
    pub severity: Severity,
}

impl StagingEvent {
    fn new(message: impl Into<String>, severity: Severity) -> Self {
        Self {
            message: message.into(),
            severity,
        }
    }
}

impl StagingModel {
    pub fn new(tool: Tool, max_size_bytes: u64) -> Self {
        Self {
            tool,
            rule: tool.validation_rule(max_size_bytes),
            list: StagingList::new(),
            drop_zone: DropZone::default(),
            reveals: TaskList::new(),
            revealed: HashSet::new(),
        }
    }

    pub fn tool(&self) -> Tool {
        self.tool
    }

    pub fn rule(&self) -> &ValidationRule {
        &self.rule
    }

    pub fn list(&self) -> &StagingList {
        &self.list
    }

    pub fn drop_zone(&self) -> &DropZone {
        &self.drop_zone
    }

    pub fn is_revealed(&self, id: EntryId) -> bool {
        self.revealed.contains(&id)
    }

    /// Fire due fade-in tasks. Entries removed in the meantime are skipped.
    pub fn tick(&mut self, now: Instant) {
        for id in self.reveals.take_due(now) {
            if self.list.contains(id) {
                self.revealed.insert(id);
            }
        }
    }

    pub fn next_deadline(&self, now: Instant) -> Option<Duration> {
        self.reveals.next_deadline(now)
    }

    /// Cancel pending animations; called when the panel is replaced.
    pub fn teardown(&mut self) {
        self.reveals.cancel_all();
        self.revealed.clear();
    }

    /// Route one drop: described files are admitted now, bare paths are
    /// inspected by a worker first. Items beyond the tool's file limit are ignored.
    fn ingest_drop(
        &mut self,
        mut items: Vec<DroppedItem>,
        cmds: &mut Vec<StagingCommand>,
        now: Instant,
        events: &mut Vec<StagingEvent>,
    ) {
        if let Some(max) = self.tool.max_files()
            && items.len() > max
        {
            let ignored = items.len() - max;
            items.truncate(max);
            events.push(StagingEvent::new(
                format!(
                    "{} uses {max} file at a time; ignored {ignored} more",
                    self.tool.label()
                ),
                Severity::Warning,
            ));
        }

        let mut files = Vec::new();
        for item in items {
            match item {
                DroppedItem::File(file) => files.push(file),
                DroppedItem::Path(path) => cmds.push(StagingCommand::InspectFile { path }),
            }
        }
        self.admit_all(files, now, events);
    }

    /// Validate and stage a batch of candidates, one event per rejection.
    fn admit_all(
        &mut self,
        files: Vec<CandidateFile>,
        now: Instant,
        events: &mut Vec<StagingEvent>,
    ) {
        let mut added = Vec::new();
        for (slot, file) in files.into_iter().enumerate() {
            match self.rule.check(&file) {
                Ok(()) => {
                    if self.tool.max_files() == Some(1) && !self.list.is_empty() {
                        debug!(name = %file.name, "replacing staged file");
                        self.list.clear();
                        self.revealed.clear();
                        self.reveals.cancel_all();
                        added.clear();
                    }
                    let entry = self.list.add(file);
                    self.reveals
                        .schedule(now, REVEAL_STAGGER * slot as u32, entry.id);
                    added.push(entry);
                }
                Err(err) => {
                    warn!(%err, "file rejected");
                    events.push(StagingEvent::new(err.to_string(), err.severity()));
                }
            }
        }

        match added.as_slice() {
            [] => {}
            [only] => events.push(StagingEvent::new(
                format!("Added {}", only.file.name),
                Severity::Success,
            )),
            many => events.push(StagingEvent::new(
                format!("Added {} files", many.len()),
                Severity::Success,
            )),
        }
    }
}

/// Apply a message to the staging model. Returns user-facing events to surface.
pub fn update(
    model: &mut StagingModel,
    msg: StagingMsg,
    cmds: &mut Vec<StagingCommand>,
    now: Instant,
) -> Vec<StagingEvent> {
    let mut events = Vec::new();
    match msg {
        StagingMsg::RequestPickFiles => cmds.push(StagingCommand::PickFiles {
            title: format!("Select files for {}", model.tool.label()),
            extensions: model.rule.extensions(),
            multiple: model.tool.accepts_multiple(),
        }),
        StagingMsg::FilesPicked(paths) => {
            for path in paths {
                cmds.push(StagingCommand::InspectFile { path });
            }
        }
        StagingMsg::FileInspected(file) => model.admit_all(vec![file], now, &mut events),
        StagingMsg::InspectFailed { path, error } => {
            warn!(path = %path.display(), %error, "could not inspect picked file");
            events.push(StagingEvent::new(
                format!("Could not read {}: {error}", path.display()),
                Severity::Danger,
            ));
        }
        StagingMsg::Drag(mut surface_events) => {
            let mut batches = Vec::new();
            model
                .drop_zone
                .attach(&mut surface_events, |files| batches.push(files));
            for items in batches {
                model.ingest_drop(items, cmds, now, &mut events);
            }
        }
        StagingMsg::Remove(id) => match model.list.remove(id) {
            Ok(removed) => {
                model.revealed.remove(&id);
                events.push(StagingEvent::new(
                    format!("Removed {}", removed.file.name),
                    Severity::Info,
                ));
            }
            Err(err) => warn!(%err, "ignoring stale removal"),
        },
        StagingMsg::Clear => {
            model.list.clear();
            model.revealed.clear();
            model.reveals.cancel_all();
        }
    }
    events
}

/// Render the drop target and preview list, returning messages triggered by user interaction.
pub fn view(ui: &mut egui::Ui, model: &StagingModel) -> Vec<StagingMsg> {
    let mut msgs = Vec::new();

    ui.horizontal(|ui| {
        let add_resp = ui
            .add(egui::Button::new(format!(
                "{} Add files",
                egui_phosphor::regular::PLUS
            )))
            .on_hover_text(format!(
                "Accepted: {} (max {} each)",
                model.rule.extensions().join(", "),
                format_size(model.rule.max_size_bytes)
            ));
        if add_resp.clicked() {
            msgs.push(StagingMsg::RequestPickFiles);
        }

        if !model.list.is_empty()
            && ui
                .button(format!("{} Clear", egui_phosphor::regular::BROOM))
                .clicked()
        {
            msgs.push(StagingMsg::Clear);
        }
    });

    ui.add_space(6.0);
    drop_zone::view(ui, &model.drop_zone, "Drag and drop files here");
    ui.add_space(6.0);

    let visuals = ui.visuals().clone();
    egui::Frame::new()
        .fill(visuals.panel_fill)
        .stroke(visuals.window_stroke())
        .inner_margin(8.0)
        .show(ui, |ui| {
            ui.set_width(ui.available_width());
            let entries = model.list.to_ordered_sequence();
            if entries.is_empty() {
                ui.label(egui::RichText::new("No files staged").color(egui::Color32::from_gray(150)));
                return;
            }
            for entry in &entries {
                render_preview_item(ui, model, entry, &mut msgs);
                if entry.ordinal + 1 < entries.len() {
                    ui.separator();
                }
            }
            ui.add_space(4.0);
            ui.label(
                egui::RichText::new(format!(
                    "{} file(s), {}",
                    entries.len(),
                    format_size(model.list.total_size_bytes())
                ))
                .small()
                .color(egui::Color32::from_gray(110)),
            );
        });

    msgs
}

/// One preview row; its remove button carries the entry's stable id.
fn render_preview_item(
    ui: &mut egui::Ui,
    model: &StagingModel,
    entry: &StagedEntry,
    msgs: &mut Vec<StagingMsg>,
) {
    let opacity = ui.ctx().animate_bool_with_time(
        egui::Id::new(("staged", entry.id)),
        model.is_revealed(entry.id),
        0.25,
    );
    ui.scope(|ui| {
        ui.multiply_opacity(opacity.max(0.15));
        ui.horizontal(|ui| {
            ui.label(
                egui::RichText::new(format!("{}.", entry.ordinal + 1))
                    .color(egui::Color32::from_gray(120)),
            );
            ui.label(
                egui::RichText::new(icon_for(&entry.file.mime_type, &entry.file.name)).size(20.0),
            );
            ui.vertical(|ui| {
                ui.label(entry.file.name.as_str());
                ui.label(
                    egui::RichText::new(format!(
                        "{} | {}",
                        format_size(entry.file.size_bytes),
                        entry.file.mime_type
                    ))
                    .small()
                    .color(egui::Color32::from_gray(90)),
                );
            });
            ui.with_layout(egui::Layout::right_to_left(egui::Align::Center), |ui| {
                if ui
                    .button(egui::RichText::new(egui_phosphor::regular::TRASH_SIMPLE))
                    .on_hover_text("Remove file")
                    .clicked()
                {
                    msgs.push(StagingMsg::Remove(entry.id));
                }
            });
        });
    });
}
