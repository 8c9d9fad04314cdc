// SPDX-License-Identifier: MIT
// SPDX-FileCopyrightText: 2025 Alexander Minges

use clap::Parser;

use docstage::config::{AppConfig, Cli};

fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();
    docstage::app::init_logging(cli.verbose);
    let config = AppConfig::resolve(&cli)?;
    docstage::app::run(config)
}
