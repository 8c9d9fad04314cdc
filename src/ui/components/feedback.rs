// SPDX-License-Identifier: MIT
// SPDX-FileCopyrightText: 2025 Alexander Minges

//! Transient notifications and busy/idle state for action controls.

use std::time::{Duration, Instant};

use eframe::egui;
use tracing::debug;

use crate::models::severity::Severity;
use crate::scheduler::{TaskHandle, TaskList};

/// Default lifetime of a notification before it removes itself.
pub const DEFAULT_NOTIFICATION_TTL: Duration = Duration::from_secs(5);

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct NotificationId(u64);

/// One dismissible message in the notification area.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Notification {
    pub id: NotificationId,
    pub message: String,
    pub severity: Severity,
    /// Optional URL offered as an "Open" action (e.g. a processed download).
    pub link: Option<String>,
    expiry: TaskHandle,
}

/// An action control (typically the submit button) that can be put into a busy state.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct BusyControl {
    label: String,
    busy: bool,
    enabled: bool,
}

impl BusyControl {
    pub fn new(label: impl Into<String>) -> Self {
        Self {
            label: label.into(),
            busy: false,
            enabled: true,
        }
    }

    pub fn label(&self) -> &str {
        &self.label
    }

    pub fn is_busy(&self) -> bool {
        self.busy
    }

    pub fn is_enabled(&self) -> bool {
        self.enabled
    }

    pub fn set_enabled(&mut self, enabled: bool) {
        if !self.busy {
            self.enabled = enabled;
        }
    }
}

/// Show `busy_label` with a spinner and disable the control.
///
/// Returns the label that was displayed before, which must be handed back to
/// [`clear_busy`] once the operation finishes.
pub fn set_busy(control: &mut BusyControl, busy_label: &str) -> String {
    let original = std::mem::replace(&mut control.label, busy_label.to_string());
    control.busy = true;
    control.enabled = false;
    original
}

/// Restore `original_text` and re-enable the control. Idempotent.
pub fn clear_busy(control: &mut BusyControl, original_text: &str) {
    control.label = original_text.to_string();
    control.busy = false;
    control.enabled = true;
}

/// Messages emitted by the notification area.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum FeedbackMsg {
    Dismiss(NotificationId),
    OpenLink(String),
}

/// Notification stack with self-expiring entries.
#[derive(Debug)]
pub struct FeedbackModel {
    notifications: Vec<Notification>,
    timers: TaskList<NotificationId>,
    ttl: Duration,
    next_id: u64,
}

impl Default for FeedbackModel {
    fn default() -> Self {
        Self::with_ttl(DEFAULT_NOTIFICATION_TTL)
    }
}

impl FeedbackModel {
    pub fn with_ttl(ttl: Duration) -> Self {
        Self {
            notifications: Vec::new(),
            timers: TaskList::new(),
            ttl,
            next_id: 0,
        }
    }

    /// Currently visible notifications, oldest first.
    pub fn notifications(&self) -> &[Notification] {
        &self.notifications
    }

    /// Append a notification that removes itself after the configured lifetime.
    pub fn notify(
        &mut self,
        message: impl Into<String>,
        severity: Severity,
        now: Instant,
    ) -> NotificationId {
        self.push(message.into(), severity, None, now)
    }

    /// Like [`FeedbackModel::notify`] with an attached URL action.
    pub fn notify_with_link(
        &mut self,
        message: impl Into<String>,
        severity: Severity,
        link: String,
        now: Instant,
    ) -> NotificationId {
        self.push(message.into(), severity, Some(link), now)
    }

    fn push(
        &mut self,
        message: String,
        severity: Severity,
        link: Option<String>,
        now: Instant,
    ) -> NotificationId {
        let id = NotificationId(self.next_id);
        self.next_id += 1;
        let expiry = self.timers.schedule(now, self.ttl, id);
        debug!(id = id.0, severity = severity.as_str(), %message, "notification shown");
        self.notifications.push(Notification {
            id,
            message,
            severity,
            link,
            expiry,
        });
        id
    }

    /// Explicit user dismissal. Returns `false` when the notification is already gone.
    pub fn dismiss(&mut self, id: NotificationId) -> bool {
        match self.remove(id) {
            Some(removed) => {
                self.timers.cancel(removed.expiry);
                true
            }
            None => false,
        }
    }

    /// Expire notifications whose timer has elapsed; returns how many were actually removed.
    pub fn tick(&mut self, now: Instant) -> usize {
        self.timers
            .take_due(now)
            .into_iter()
            .filter(|id| self.remove(*id).is_some())
            .count()
    }

    /// Time until the next expiry, if any notification is pending.
    pub fn next_deadline(&self, now: Instant) -> Option<Duration> {
        self.timers.next_deadline(now)
    }

    /// Drop all notifications and cancel their timers.
    pub fn teardown(&mut self) {
        self.timers.cancel_all();
        self.notifications.clear();
    }

    // Existence check guards against the timer and the dismiss button racing.
    fn remove(&mut self, id: NotificationId) -> Option<Notification> {
        let index = self.notifications.iter().position(|n| n.id == id)?;
        Some(self.notifications.remove(index))
    }
}

/// Apply a notification-area message. Returns a URL to open, when requested.
pub fn update(model: &mut FeedbackModel, msg: FeedbackMsg) -> Option<String> {
    match msg {
        FeedbackMsg::Dismiss(id) => {
            model.dismiss(id);
            None
        }
        FeedbackMsg::OpenLink(url) => Some(url),
    }
}

/// Render the notification stack and return any messages triggered by user interaction.
pub fn view(ui: &mut egui::Ui, model: &FeedbackModel) -> Vec<FeedbackMsg> {
    let mut msgs = Vec::new();

    for notification in &model.notifications {
        let color = severity_color(notification.severity);
        egui::Frame::new()
            .fill(ui.visuals().panel_fill)
            .stroke(egui::Stroke::new(1.0, color))
            .inner_margin(6.0)
            .show(ui, |ui| {
                ui.set_width(280.0);
                ui.horizontal(|ui| {
                    ui.label(egui::RichText::new(severity_icon(notification.severity)).color(color));
                    ui.label(notification.message.as_str());
                    ui.with_layout(egui::Layout::right_to_left(egui::Align::Center), |ui| {
                        if ui
                            .small_button(egui_phosphor::regular::X)
                            .on_hover_text("Dismiss")
                            .clicked()
                        {
                            msgs.push(FeedbackMsg::Dismiss(notification.id));
                        }
                        if let Some(link) = &notification.link
                            && ui
                                .small_button(egui_phosphor::regular::ARROW_SQUARE_OUT)
                                .on_hover_text("Open")
                                .clicked()
                        {
                            msgs.push(FeedbackMsg::OpenLink(link.clone()));
                        }
                    });
                });
            });
        ui.add_space(4.0);
    }

    msgs
}

/// Render a busy-aware button for `control`. Clicks are only reported while enabled.
pub fn busy_button(ui: &mut egui::Ui, control: &BusyControl, icon: &str) -> egui::Response {
    ui.horizontal(|ui| {
        if control.is_busy() {
            ui.add(egui::Spinner::new().size(14.0));
        }
        let text = if control.is_busy() {
            control.label().to_string()
        } else {
            format!("{icon} {}", control.label())
        };
        ui.add_enabled(control.is_enabled(), egui::Button::new(text))
    })
    .inner
}

fn severity_color(severity: Severity) -> egui::Color32 {
    match severity {
        Severity::Info => egui::Color32::from_rgb(13, 110, 253),
        Severity::Success => egui::Color32::from_rgb(25, 135, 84),
        Severity::Warning => egui::Color32::from_rgb(232, 89, 12),
        Severity::Danger => egui::Color32::from_rgb(220, 53, 69),
    }
}

fn severity_icon(severity: Severity) -> &'static str {
    match severity {
        Severity::Info => egui_phosphor::regular::INFO,
        Severity::Success => egui_phosphor::regular::CHECK_CIRCLE,
        Severity::Warning => egui_phosphor::regular::WARNING,
        Severity::Danger => egui_phosphor::regular::WARNING_OCTAGON,
    }
}
