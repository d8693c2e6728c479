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

use std::path::Path;
use std::path::PathBuf;
use std::time::Duration;

use serde::Deserialize;

use crate::error::Fallible;
use crate::error::fail;
use crate::game::session::GameRules;
use crate::pokeapi::client::DEFAULT_UPSTREAM;
use crate::pokeapi::listing::ARTWORK_ID_LIMIT;

/// Read when `--config` is not given, if it exists.
pub const DEFAULT_CONFIG_FILE: &str = "pokememo.toml";
const DEFAULT_PORT: u16 = 8080;
const DEFAULT_DATABASE: &str = "pokemon.db";

/// The optional TOML config file.
#[derive(Deserialize, Default, Debug)]
#[serde(default, deny_unknown_fields)]
pub struct ConfigFile {
    server: ServerSection,
    game: GameSection,
}

#[derive(Deserialize, Default, Debug)]
#[serde(default, deny_unknown_fields)]
struct ServerSection {
    port: Option<u16>,
    database: Option<PathBuf>,
    upstream: Option<String>,
}

#[derive(Deserialize, Default, Debug)]
#[serde(default, deny_unknown_fields)]
struct GameSection {
    pairs: Option<usize>,
    match_reward: Option<u32>,
    mismatch_delay_ms: Option<u64>,
    seed: Option<u64>,
}

impl ConfigFile {
    pub fn parse(contents: &str) -> Fallible<Self> {
        Ok(toml::from_str(contents)?)
    }

    /// Load `path` if given, otherwise the default file if present.
    pub fn load(path: Option<&Path>) -> Fallible<Self> {
        match path {
            Some(path) => {
                if !path.exists() {
                    return fail("config file does not exist.");
                }
                log::debug!("Loading config from {}", path.display());
                Self::parse(&std::fs::read_to_string(path)?)
            }
            None => {
                let path = Path::new(DEFAULT_CONFIG_FILE);
                if path.exists() {
                    log::debug!("Loading config from {DEFAULT_CONFIG_FILE}");
                    Self::parse(&std::fs::read_to_string(path)?)
                } else {
                    Ok(Self::default())
                }
            }
        }
    }
}

/// Values given on the command line. They take precedence over the file.
#[derive(Default, Debug)]
pub struct Overrides {
    pub port: Option<u16>,
    pub database: Option<PathBuf>,
    pub upstream: Option<String>,
    pub pairs: Option<usize>,
    pub match_reward: Option<u32>,
    pub mismatch_delay_ms: Option<u64>,
    pub seed: Option<u64>,
}

#[derive(Clone, Debug)]
pub struct Config {
    pub port: u16,
    pub database: PathBuf,
    pub upstream: String,
    pub rules: GameRules,
    pub seed: Option<u64>,
}

impl Config {
    pub fn resolve(file: ConfigFile, overrides: Overrides) -> Fallible<Self> {
        let defaults = GameRules::default();
        let pairs = overrides.pairs.or(file.game.pairs).unwrap_or(defaults.pairs);
        if pairs == 0 || pairs > ARTWORK_ID_LIMIT as usize {
            return fail(format!("pairs must be between 1 and {ARTWORK_ID_LIMIT}."));
        }
        let match_reward = overrides
            .match_reward
            .or(file.game.match_reward)
            .unwrap_or(defaults.match_reward);
        if match_reward == 0 {
            return fail("match reward must be positive.");
        }
        let mismatch_delay = overrides
            .mismatch_delay_ms
            .or(file.game.mismatch_delay_ms)
            .map(Duration::from_millis)
            .unwrap_or(defaults.mismatch_delay);
        Ok(Self {
            port: overrides.port.or(file.server.port).unwrap_or(DEFAULT_PORT),
            database: overrides
                .database
                .or(file.server.database)
                .unwrap_or_else(|| PathBuf::from(DEFAULT_DATABASE)),
            upstream: overrides
                .upstream
                .or(file.server.upstream)
                .unwrap_or_else(|| DEFAULT_UPSTREAM.to_string()),
            rules: GameRules {
                pairs,
                match_reward,
                mismatch_delay,
            },
            seed: overrides.seed.or(file.game.seed),
        })
    }
}
