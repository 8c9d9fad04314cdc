// SPDX-License-Identifier: MIT
// SPDX-FileCopyrightText: 2025 Alexander Minges

//! Drag-and-drop ingestion: turns drag events from a surface into a single callback.
//!
//! The zone performs no validation; it only tracks hover state for presentation
//! and forwards whatever set of files was dropped, including an empty one.
//! Nothing here touches the filesystem.

use std::path::PathBuf;

use eframe::egui;
use tracing::debug;

use crate::models::candidate::{CandidateFile, guess_mime};

/// One dropped file: either fully described by the platform or only a path
/// whose metadata still has to be read off the UI thread.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum DroppedItem {
    File(CandidateFile),
    Path(PathBuf),
}

impl From<CandidateFile> for DroppedItem {
    fn from(file: CandidateFile) -> Self {
        DroppedItem::File(file)
    }
}

/// A drag event delivered by a drop-target surface.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum DragEvent {
    Over,
    Leave,
    Drop(Vec<DroppedItem>),
}

impl DragEvent {
    /// Drop of files whose metadata is already known.
    pub fn drop_files(files: Vec<CandidateFile>) -> Self {
        DragEvent::Drop(files.into_iter().map(DroppedItem::from).collect())
    }
}

/// Source of drag events, drained in delivery order.
pub trait DragSurface {
    fn poll_events(&mut self) -> Vec<DragEvent>;
}

/// Events already collected from a surface in an earlier frame.
impl DragSurface for Vec<DragEvent> {
    fn poll_events(&mut self) -> Vec<DragEvent> {
        std::mem::take(self)
    }
}

/// Transient presentation state of a drop zone.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct DropZoneState {
    pub is_hovering: bool,
}

#[derive(Debug, Default)]
pub struct DropZone {
    state: DropZoneState,
}

impl DropZone {
    pub fn state(&self) -> DropZoneState {
        self.state
    }

    pub fn is_hovering(&self) -> bool {
        self.state.is_hovering
    }

    /// Apply one event. Drops invoke `on_files_dropped` synchronously.
    ///
    /// Always returns `true`: every drag event over the zone is consumed so the
    /// platform never falls back to opening the file itself.
    pub fn handle<F>(&mut self, event: DragEvent, on_files_dropped: &mut F) -> bool
    where
        F: FnMut(Vec<DroppedItem>),
    {
        match event {
            DragEvent::Over => self.state.is_hovering = true,
            DragEvent::Leave => self.state.is_hovering = false,
            DragEvent::Drop(files) => {
                self.state.is_hovering = false;
                debug!(count = files.len(), "files dropped");
                on_files_dropped(files);
            }
        }
        true
    }

    /// Drain all pending events from `surface`, returning how many were handled.
    pub fn attach<S, F>(&mut self, surface: &mut S, mut on_files_dropped: F) -> usize
    where
        S: DragSurface + ?Sized,
        F: FnMut(Vec<DroppedItem>),
    {
        let events = surface.poll_events();
        let count = events.len();
        for event in events {
            self.handle(event, &mut on_files_dropped);
        }
        count
    }
}

/// Window-wide drop surface backed by the egui input state.
///
/// Dropped files are taken out of the raw input so no other widget handles them.
pub struct EguiDropSurface<'a> {
    ctx: &'a egui::Context,
    was_hovering: bool,
}

impl<'a> EguiDropSurface<'a> {
    pub fn new(ctx: &'a egui::Context, was_hovering: bool) -> Self {
        Self { ctx, was_hovering }
    }
}

impl DragSurface for EguiDropSurface<'_> {
    fn poll_events(&mut self) -> Vec<DragEvent> {
        let dropped = self
            .ctx
            .input_mut(|i| std::mem::take(&mut i.raw.dropped_files));
        if !dropped.is_empty() {
            self.was_hovering = false;
            return vec![DragEvent::Drop(
                dropped.iter().map(dropped_item).collect(),
            )];
        }

        let hovering = self.ctx.input(|i| !i.raw.hovered_files.is_empty());
        let event = match (self.was_hovering, hovering) {
            (false, true) => Some(DragEvent::Over),
            (true, false) => Some(DragEvent::Leave),
            _ => None,
        };
        self.was_hovering = hovering;
        event.into_iter().collect()
    }
}

/// Describe an egui dropped file using its declared metadata.
///
/// Web backends hand over bytes, so the size is known. Native backends only
/// give a path, which is returned as-is for inspection by a worker.
pub fn dropped_item(file: &egui::DroppedFile) -> DroppedItem {
    let declared_size = match (&file.bytes, &file.path) {
        (Some(bytes), _) => Some(bytes.len() as u64),
        (None, Some(path)) => return DroppedItem::Path(path.clone()),
        (None, None) => None,
    };

    let name = if file.name.is_empty() {
        file.path
            .as_deref()
            .and_then(|p| p.file_name())
            .map(|n| n.to_string_lossy().into_owned())
            .unwrap_or_else(|| "dropped-file".to_string())
    } else {
        file.name.clone()
    };

    let mime_type = if file.mime.is_empty() {
        guess_mime(&name)
    } else {
        file.mime.clone()
    };

    let candidate = CandidateFile::new(name, declared_size.unwrap_or(0), mime_type);
    DroppedItem::File(match &file.path {
        Some(path) => candidate.with_path(path.clone()),
        None => candidate,
    })
}

/// Render the drop target, highlighted while files hover over the window.
pub fn view(ui: &mut egui::Ui, zone: &DropZone, hint: &str) {
    let visuals = ui.visuals().clone();
    let (fill, stroke) = if zone.is_hovering() {
        (
            visuals.selection.bg_fill.gamma_multiply(0.25),
            visuals.selection.stroke,
        )
    } else {
        (visuals.extreme_bg_color, visuals.window_stroke())
    };

    egui::Frame::new()
        .fill(fill)
        .stroke(stroke)
        .inner_margin(16.0)
        .show(ui, |ui| {
            ui.set_width(ui.available_width());
            ui.vertical_centered(|ui| {
                ui.label(egui::RichText::new(egui_phosphor::regular::UPLOAD_SIMPLE).size(28.0));
                let text = if zone.is_hovering() {
                    "Release to add files"
                } else {
                    hint
                };
                ui.label(egui::RichText::new(text).color(egui::Color32::from_gray(120)));
            });
        });
}
