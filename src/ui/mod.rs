// SPDX-License-Identifier: MIT
// SPDX-FileCopyrightText: 2025 Alexander Minges

//! Top-level egui application shell for staging and submitting documents.
//! Handles layout, tool selection, and wiring to the background workers.

pub mod components;

use std::sync::Arc;
use std::time::{Duration, Instant};

use eframe::egui;

use crate::client::ProcessingClient;
use crate::config::AppConfig;
use crate::models::tool::Tool;
use crate::mvu::{self, AppModel, Command, Msg};
use crate::ui::components::drop_zone::{DragSurface, EguiDropSurface};
use crate::ui::components::feedback::{self, busy_button};
use crate::ui::components::staging::{self, StagingMsg};

/// Stateful egui application for one staging window.
pub struct DocStageApp {
    model: AppModel,
    inbox: Vec<Msg>,
    cmd_tx: crossbeam_channel::Sender<Command>,
    msg_rx: crossbeam_channel::Receiver<Msg>,
}

impl DocStageApp {
    /// Build the app and spawn `config.workers` command workers sharing `client`.
    pub fn new(config: &AppConfig, client: Arc<dyn ProcessingClient>) -> Self {
        let (cmd_tx, cmd_rx) = crossbeam_channel::unbounded::<Command>();
        let (msg_tx, msg_rx) = crossbeam_channel::unbounded::<Msg>();

        for _ in 0..config.workers {
            let cmd_rx = cmd_rx.clone();
            let msg_tx = msg_tx.clone();
            let client = Arc::clone(&client);
            std::thread::spawn(move || {
                for cmd in cmd_rx.iter() {
                    let msg = mvu::run_command(cmd, client.as_ref());
                    let _ = msg_tx.send(msg);
                }
            });
        }

        Self {
            model: AppModel::new(config),
            inbox: Vec::new(),
            cmd_tx,
            msg_rx,
        }
    }

    /// Apply queued messages in delivery order and dispatch resulting commands.
    fn process_inbox(&mut self, now: Instant) {
        for msg in std::mem::take(&mut self.inbox) {
            let mut commands = Vec::new();
            mvu::update(&mut self.model, msg, &mut commands, now);
            for cmd in commands {
                if self.cmd_tx.send(cmd).is_ok() {
                    self.model.pending_commands += 1;
                }
            }
        }
    }
}

impl Drop for DocStageApp {
    fn drop(&mut self) {
        mvu::teardown(&mut self.model);
    }
}

impl eframe::App for DocStageApp {
    /// Required by eframe 0.34; all rendering happens in [`Self::update`], which eframe still calls.
    fn ui(&mut self, _ui: &mut egui::Ui, _frame: &mut eframe::Frame) {}

    /// Drives a single UI frame: collects worker results and drag events, updates the
    /// model, advances timers, and renders the tool bar, staging panel and notifications.
    fn update(&mut self, ctx: &egui::Context, _frame: &mut eframe::Frame) {
        let now = Instant::now();

        // Pull messages produced by the command workers.
        while let Ok(msg) = self.msg_rx.try_recv() {
            self.model.pending_commands = self.model.pending_commands.saturating_sub(1);
            self.inbox.push(msg);
        }

        let was_hovering = self.model.staging.drop_zone().is_hovering();
        let drag_events = EguiDropSurface::new(ctx, was_hovering).poll_events();
        if !drag_events.is_empty() {
            self.inbox.push(Msg::Staging(StagingMsg::Drag(drag_events)));
        }

        self.process_inbox(now);

        if let Some(next) = mvu::tick(&mut self.model, now) {
            ctx.request_repaint_after(next);
        }
        if self.model.pending_commands > 0 {
            ctx.request_repaint_after(Duration::from_millis(100));
        }

        egui::TopBottomPanel::top("top_bar").show(ctx, |ui| {
            ui.add_space(6.0);
            ui.horizontal(|ui| {
                ui.heading("docstage");
                ui.separator();
                self.render_tool_selector(ui);
                ui.with_layout(egui::Layout::right_to_left(egui::Align::Center), |ui| {
                    ui.add_space(2.0);
                    egui::widgets::global_theme_preference_switch(ui);
                });
            });
            ui.add_space(4.0);
        });

        egui::TopBottomPanel::bottom("status_panel")
            .resizable(false)
            .show(ctx, |ui| {
                self.render_status(ui);
            });

        egui::CentralPanel::default().show(ctx, |ui| {
            ui.add_space(8.0);
            egui::ScrollArea::vertical().show(ui, |ui| {
                ui.heading(self.model.tool().label());
                ui.add_space(8.0);

                let msgs = staging::view(ui, &self.model.staging);
                self.inbox.extend(msgs.into_iter().map(Msg::Staging));
                ui.add_space(12.0);

                self.render_submit_group(ui);
            });
        });

        let feedback_msgs = egui::Area::new(egui::Id::new("notifications"))
            .anchor(egui::Align2::RIGHT_TOP, egui::vec2(-12.0, 48.0))
            .show(ctx, |ui| feedback::view(ui, &self.model.feedback))
            .inner;
        self.inbox
            .extend(feedback_msgs.into_iter().map(Msg::Feedback));

        if !self.inbox.is_empty() {
            ctx.request_repaint();
        }
    }
}

impl DocStageApp {
    /// Segmented buttons for the available tools; the active one is highlighted.
    fn render_tool_selector(&mut self, ui: &mut egui::Ui) {
        let current = self.model.tool();
        for tool in Tool::ALL {
            let button = egui::Button::new(tool.label()).selected(tool == current);
            if ui.add(button).clicked() && tool != current {
                self.inbox.push(Msg::SelectTool(tool));
            }
        }
    }

    /// Output filename, tool option and the busy-aware submit button.
    fn render_submit_group(&mut self, ui: &mut egui::Ui) {
        let tool = self.model.tool();
        egui::Frame::group(ui.style()).show(ui, |ui| {
            ui.set_width(ui.available_width());
            egui::Grid::new("submit_grid")
                .num_columns(2)
                .spacing(egui::vec2(8.0, 10.0))
                .min_col_width(120.0)
                .show(ui, |ui| {
                    ui.label("Output name");
                    let mut name = self.model.output_name.clone();
                    if ui
                        .add(
                            egui::TextEdit::singleline(&mut name)
                                .hint_text(tool.default_output_name()),
                        )
                        .changed()
                    {
                        self.inbox.push(Msg::OutputNameChanged(name));
                    }
                    ui.end_row();

                    if let Some(option) = tool.option() {
                        ui.label(option.label);
                        let mut selected = self
                            .model
                            .tool_option
                            .clone()
                            .unwrap_or_else(|| option.default.to_string());
                        let before = selected.clone();
                        egui::ComboBox::from_id_salt("tool_option")
                            .selected_text(selected.clone())
                            .show_ui(ui, |ui| {
                                for choice in option.choices {
                                    ui.selectable_value(&mut selected, choice.to_string(), *choice);
                                }
                            });
                        if selected != before {
                            self.inbox.push(Msg::ToolOptionChanged(selected));
                        }
                        ui.end_row();
                    }

                    if tool.needs_page_ranges(self.model.tool_option.as_deref()) {
                        ui.label("Page ranges");
                        let mut ranges = self.model.page_ranges.clone();
                        if ui
                            .add(egui::TextEdit::singleline(&mut ranges).hint_text("1-3, 4-6, 7"))
                            .changed()
                        {
                            self.inbox.push(Msg::PageRangesChanged(ranges));
                        }
                        ui.end_row();
                    }
                });

            ui.add_space(8.0);
            let response = busy_button(ui, &self.model.submit, egui_phosphor::regular::PAPER_PLANE_RIGHT);
            let response = if tool.min_files() > 1 {
                response.on_disabled_hover_text(format!("Add at least {} files", tool.min_files()))
            } else {
                response.on_disabled_hover_text("Add a file first")
            };
            if response.clicked() {
                self.inbox.push(Msg::SubmitRequested);
            }
        });
    }

    /// Render the background-work indicator.
    fn render_status(&self, ui: &mut egui::Ui) {
        ui.horizontal(|ui| {
            let staged = self.model.staging.list().len();
            ui.label(
                egui::RichText::new(format!("{staged} file(s) staged"))
                    .color(egui::Color32::from_gray(68)),
            );
            if self.model.pending_commands > 0 {
                ui.add(egui::Spinner::new().size(14.0)).on_hover_text(format!(
                    "{} task(s) running in background",
                    self.model.pending_commands
                ));
            }
        });
    }
}
