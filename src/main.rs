/*
 * This file is part of Browserprint.
 *
 * Copyright (C) 2025 Browserprint contributors
 *
 * Browserprint is free software: you can redistribute it and/or modify
 * it under the terms of the GNU General Public License as published by
 * the Free Software Foundation, either version 3 of the License, or
 * (at your option) any later version.
 *
 * Browserprint is distributed in the hope that it will be useful,
 * but WITHOUT ANY WARRANTY; without even the implied warranty of
 * MERCHANTABILITY or FITNESS FOR A PARTICULAR PURPOSE. See the
 * GNU General Public License for more details.
 *
 * You should have received a copy of the GNU General Public License
 * along with Browserprint. If not, see <https://www.gnu.org/licenses/>.
 */

use clap::Parser;

use browserprint::cli::{self, Cli};
use browserprint::logger;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli_args = Cli::parse();

    let settings = cli::load_cli_settings(&cli_args);
    logger::init_logging(&settings.general.log_level, cli_args.verbose);

    cli::run_cli(&cli_args, &settings).await
}
