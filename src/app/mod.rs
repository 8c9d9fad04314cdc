// SPDX-License-Identifier: MIT
// SPDX-FileCopyrightText: 2025 Alexander Minges

//! Application entry point wiring egui/eframe to launch the docstage UI.

use std::sync::Arc;

use anyhow::{Context, anyhow};
use eframe::egui;
use egui_phosphor::Variant;
use tracing::info;
use tracing_subscriber::EnvFilter;

use crate::client::{HttpProcessingClient, ProcessingClient};
use crate::config::AppConfig;
use crate::ui::DocStageApp;

/// Install the global tracing subscriber. `RUST_LOG` wins over `verbose`.
pub fn init_logging(verbose: bool) {
    let default_level = if verbose { "debug" } else { "info" };
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(format!("docstage={default_level},warn")));
    let _ = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .try_init();
}

/// One-shot context setup: Phosphor icon font and spacing.
pub fn init(ctx: &egui::Context) {
    let mut fonts = egui::FontDefinitions::default();
    egui_phosphor::add_to_fonts(&mut fonts, Variant::Regular);
    ctx.set_fonts(fonts);
    ctx.style_mut(|style| {
        style.spacing.item_spacing = egui::vec2(6.0, 6.0);
    });
}

/// Bootstrap the desktop application and run the main egui event loop.
pub fn run(config: AppConfig) -> anyhow::Result<()> {
    let client: Arc<dyn ProcessingClient> = Arc::new(
        HttpProcessingClient::new(&config.service_url, config.request_timeout())
            .with_context(|| format!("invalid service URL {}", config.service_url))?,
    );
    info!(service = %config.service_url, tool = config.tool.label(), "starting docstage");

    let options = eframe::NativeOptions {
        viewport: egui::ViewportBuilder::default()
            .with_inner_size([900.0, 700.0])
            .with_min_inner_size([600.0, 400.0])
            .with_drag_and_drop(true),
        ..Default::default()
    };

    eframe::run_native(
        "docstage",
        options,
        Box::new(move |cc| {
            init(&cc.egui_ctx);
            Ok(Box::new(DocStageApp::new(&config, client)))
        }),
    )
    .map_err(|err| anyhow!("failed to run UI: {err}"))
}
