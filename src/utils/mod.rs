// SPDX-License-Identifier: MIT
// SPDX-FileCopyrightText: 2025 Alexander Minges

//! Shared helper utilities reused by UI and business logic.

pub mod file_icons;
pub mod format;
pub mod output_name;

/// Select a Phosphor icon for the given MIME/filename.
pub use file_icons::icon_for;
/// Human-readable byte counts.
pub use format::format_size;
/// Build a safe output filename for a processing tool.
pub use output_name::output_filename;
