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

use serde::Deserialize;
use serde::Serialize;

use crate::types::pokemon_id::PokemonId;

/// The minimal description of a Pokémon needed to deal it into a game.
#[derive(Clone, PartialEq, Eq, Debug, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PokemonSummary {
    pub identifier: PokemonId,
    pub display_name: String,
    /// URL of the official artwork.
    pub artwork_ref: String,
}

impl PokemonSummary {
    pub fn new(
        identifier: PokemonId,
        display_name: impl Into<String>,
        artwork_ref: impl Into<String>,
    ) -> Self {
        Self {
            identifier,
            display_name: display_name.into(),
            artwork_ref: artwork_ref.into(),
        }
    }
}
