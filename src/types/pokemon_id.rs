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
use std::str::FromStr;

use rusqlite::ToSql;
use rusqlite::types::FromSql;
use rusqlite::types::FromSqlError;
use rusqlite::types::FromSqlResult;
use rusqlite::types::ToSqlOutput;
use rusqlite::types::ValueRef;
use serde::Deserialize;
use serde::Serialize;

use crate::error::ErrorReport;
use crate::error::Fallible;
use crate::error::fail;

/// The national Pokédex number PokéAPI uses to identify a Pokémon.
#[derive(Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Debug, Serialize, Deserialize)]
#[serde(transparent)]
pub struct PokemonId(u32);

impl PokemonId {
    pub fn new(id: u32) -> Fallible<Self> {
        if id == 0 {
            return fail("Pokémon identifiers start at 1.");
        }
        Ok(Self(id))
    }

    pub fn get(self) -> u32 {
        self.0
    }

    /// Extract the identifier from a resource URL such as
    /// `https://pokeapi.co/api/v2/pokemon-species/25/`.
    pub fn from_resource_url(url: &str) -> Fallible<Self> {
        let segment = url
            .split('/')
            .filter(|s| !s.is_empty())
            .next_back()
            .ok_or_else(|| ErrorReport::new(format!("no identifier in URL: {url}")))?;
        segment.parse()
    }
}

impl FromStr for PokemonId {
    type Err = ErrorReport;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let id: u32 = s
            .trim()
            .parse()
            .map_err(|_| ErrorReport::new(format!("invalid Pokémon identifier: {s}")))?;
        Self::new(id)
    }
}

impl Display for PokemonId {
    fn fmt(&self, f: &mut Formatter) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl ToSql for PokemonId {
    fn to_sql(&self) -> rusqlite::Result<ToSqlOutput<'_>> {
        Ok(ToSqlOutput::from(self.0))
    }
}

impl FromSql for PokemonId {
    fn column_result(value: ValueRef<'_>) -> FromSqlResult<Self> {
        let id: u32 = FromSql::column_result(value)?;
        PokemonId::new(id).map_err(|e| FromSqlError::Other(Box::new(e)))
    }
}
