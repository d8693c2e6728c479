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

use std::fmt::Display;
use std::fmt::Formatter;
use std::fmt::Write;

use clap::ValueEnum;

use crate::config::Config;
use crate::error::Fallible;
use crate::game::session::GameSession;
use crate::game::shuffle::dealer_rng;
use crate::pokeapi::client::PokeApi;
use crate::pokeapi::listing::ListingProvider;

#[derive(ValueEnum, Clone)]
pub enum DealFormat {
    /// One card per line.
    Text,
    /// The board as the JSON API returns it.
    Json,
}

impl Display for DealFormat {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            DealFormat::Text => write!(f, "text"),
            DealFormat::Json => write!(f, "json"),
        }
    }
}

/// Fetch a random set of Pokémon and print the shuffled deck they make.
pub async fn print_deal(config: &Config, format: DealFormat) -> Fallible<()> {
    let api = PokeApi::new(&config.upstream)?;
    let summaries = api.fetch_random_pokemon_set(config.rules.pairs).await?;
    let mut rng = dealer_rng(config.seed);
    let session = GameSession::start(summaries, &config.rules, &mut rng)?;
    print!("{}", render_deal(&session, &format)?);
    Ok(())
}

fn render_deal(session: &GameSession, format: &DealFormat) -> Fallible<String> {
    match format {
        DealFormat::Text => {
            let mut out = String::new();
            for (position, card) in session.deck().iter().enumerate() {
                // Writing to a String cannot fail.
                let _ = writeln!(
                    out,
                    "{:>3}  {:<8} {}",
                    position + 1,
                    card.card_id(),
                    card.display_name()
                );
            }
            Ok(out)
        }
        DealFormat::Json => {
            let json = serde_json::to_string_pretty(&session.view())?;
            Ok(format!("{json}\n"))
        }
    }
}
