// Copyright 2025 Benchscope Contributors
// SPDX-License-Identifier: Apache-2.0

//! benchscope CLI entry point.

use clap::Parser;
use colored::Colorize;

#[tokio::main]
async fn main() {
    // A missing .env file is fine.
    let _ = dotenvy::dotenv();

    let cli = benchscope_cli::Cli::parse();
    benchscope_cli::init_logging(cli.verbose, cli.log_format);

    if let Err(e) = benchscope_cli::run(cli).await {
        eprintln!("{} {:#}", "Error:".red().bold(), e);
        std::process::exit(1);
    }
}
