// SPDX-License-Identifier: MIT
// SPDX-FileCopyrightText: 2025 Alexander Minges

//! Domain layer: pure data types and validation helpers shared between UI and submission logic.

pub mod candidate;
pub mod page_ranges;
pub mod severity;
pub mod staging;
pub mod tool;
pub mod validation;
