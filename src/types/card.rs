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

use serde::Deserialize;
use serde::Serialize;

use crate::types::pokemon_id::PokemonId;
use crate::types::summary::PokemonSummary;

/// Identifies one physical card. The two cards of a pair share a
/// [`PokemonId`] but never a `CardId`.
#[derive(Clone, PartialEq, Eq, Hash, Debug, Serialize, Deserialize)]
#[serde(transparent)]
pub struct CardId(String);

impl CardId {
    pub fn new(identifier: PokemonId, copy: u8) -> Self {
        Self(format!("{identifier}-{copy}"))
    }

    #[cfg(test)]
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl From<&str> for CardId {
    fn from(value: &str) -> Self {
        Self(value.to_string())
    }
}

impl From<String> for CardId {
    fn from(value: String) -> Self {
        Self(value)
    }
}

impl Display for CardId {
    fn fmt(&self, f: &mut Formatter) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

#[derive(Clone, PartialEq, Eq, Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Card {
    card_id: CardId,
    identifier: PokemonId,
    display_name: String,
    artwork_ref: String,
}

impl Card {
    pub fn new(summary: &PokemonSummary, copy: u8) -> Self {
        Self {
            card_id: CardId::new(summary.identifier, copy),
            identifier: summary.identifier,
            display_name: summary.display_name.clone(),
            artwork_ref: summary.artwork_ref.clone(),
        }
    }

    pub fn card_id(&self) -> &CardId {
        &self.card_id
    }

    pub fn identifier(&self) -> PokemonId {
        self.identifier
    }

    pub fn display_name(&self) -> &str {
        &self.display_name
    }

    pub fn artwork_ref(&self) -> &str {
        &self.artwork_ref
    }
}
