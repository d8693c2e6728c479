// Copyright 2025 Fernando Borretti
//
// Licensed under the Apache License, Version 2.0 (the "License");
// you may not use this file except in compliance with the License.
// You may obtain a copy of the License at
//
//     http://www.apache.org/licenses/LICENSE-2.0
//
// Unless required by applicable law or agreed to in writing, software
// distributed under the License is distributed on an "AS IS" BASIS,
// WITHOUT WARRANTIES OR CONDITIONS OF ANY KIND, either express or implied.
// See the License for the specific language governing permissions and
// limitations under the License.

use std::path::PathBuf;

use clap::Parser;

use crate::cmd::deal::DealFormat;
use crate::cmd::deal::print_deal;
use crate::config::Config;
use crate::config::ConfigFile;
use crate::config::Overrides;
use crate::error::Fallible;
use crate::server::start::start_server;

#[derive(Parser)]
#[command(version, about, long_about = None)]
enum Command {
    /// Serve the Pokédex and the memory game.
    Serve {
        /// Path to the config file. Defaults to `pokememo.toml` if present.
        #[arg(long)]
        config: Option<PathBuf>,
        /// The port to listen on.
        #[arg(long)]
        port: Option<u16>,
        /// Path to the story database.
        #[arg(long)]
        database: Option<PathBuf>,
        /// Base URL of the PokéAPI.
        #[arg(long)]
        upstream: Option<String>,
        /// Number of pairs in a game.
        #[arg(long)]
        pairs: Option<usize>,
        /// Points awarded for each matched pair.
        #[arg(long)]
        match_reward: Option<u32>,
        /// How long a mismatched pair stays face up, in milliseconds.
        #[arg(long)]
        mismatch_delay_ms: Option<u64>,
        /// Seed for shuffling, for reproducible games.
        #[arg(long)]
        seed: Option<u64>,
        /// Open the browser once the server is up.
        #[arg(long, default_value_t = false)]
        open: bool,
    },
    /// Deal a deck and print it.
    Deal {
        /// Path to the config file. Defaults to `pokememo.toml` if present.
        #[arg(long)]
        config: Option<PathBuf>,
        /// Base URL of the PokéAPI.
        #[arg(long)]
        upstream: Option<String>,
        /// Number of pairs to deal.
        #[arg(long)]
        pairs: Option<usize>,
        /// Points awarded for each matched pair.
        #[arg(long)]
        match_reward: Option<u32>,
        /// How long a mismatched pair stays face up, in milliseconds.
        #[arg(long)]
        mismatch_delay_ms: Option<u64>,
        /// Seed for shuffling.
        #[arg(long)]
        seed: Option<u64>,
        /// Output format.
        #[arg(long, default_value_t = DealFormat::Text)]
        format: DealFormat,
    },
}

/// What to do once the config is resolved.
enum Action {
    Serve { open: bool },
    Deal { format: DealFormat },
}

/// Merge the command-line flags over the config file.
fn resolve(cli: Command) -> Fallible<(Config, Action)> {
    match cli {
        Command::Serve {
            config,
            port,
            database,
            upstream,
            pairs,
            match_reward,
            mismatch_delay_ms,
            seed,
            open,
        } => {
            let file = ConfigFile::load(config.as_deref())?;
            let overrides = Overrides {
                port,
                database,
                upstream,
                pairs,
                match_reward,
                mismatch_delay_ms,
                seed,
            };
            Ok((Config::resolve(file, overrides)?, Action::Serve { open }))
        }
        Command::Deal {
            config,
            upstream,
            pairs,
            match_reward,
            mismatch_delay_ms,
            seed,
            format,
        } => {
            let file = ConfigFile::load(config.as_deref())?;
            let overrides = Overrides {
                upstream,
                pairs,
                match_reward,
                mismatch_delay_ms,
                seed,
                ..Overrides::default()
            };
            Ok((Config::resolve(file, overrides)?, Action::Deal { format }))
        }
    }
}

pub async fn entrypoint() -> Fallible<()> {
    let (config, action) = resolve(Command::parse())?;
    match action {
        Action::Serve { open } => start_server(config, open).await,
        Action::Deal { format } => print_deal(&config, format).await,
    }
}
