// SPDX-License-Identifier: MIT
// SPDX-FileCopyrightText: 2025 Alexander Minges

//! Client-side staging of documents for a remote processing service.

pub mod app;
pub mod client;
pub mod config;
pub mod models;
pub mod mvu;
pub mod scheduler;
pub mod ui;
pub mod utils;
