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

use std::sync::Arc;
use std::sync::Mutex;
use std::sync::MutexGuard;
use std::sync::PoisonError;

use rusqlite::Connection;
use rusqlite::OptionalExtension;
use rusqlite::Row;
use rusqlite::Transaction;
use serde::Serialize;

use crate::error::Fallible;
use crate::types::pokemon_id::PokemonId;
use crate::types::timestamp::Timestamp;

/// Storage for the user-written story attached to each Pokémon.
#[derive(Clone)]
pub struct Database {
    conn: Arc<Mutex<Connection>>,
}

#[derive(Clone, PartialEq, Eq, Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Story {
    pub pokemon_id: PokemonId,
    pub story: String,
    pub updated_at: Timestamp,
}

impl Database {
    pub fn new(database_path: &str) -> Fallible<Self> {
        let mut conn = Connection::open(database_path)?;
        {
            let tx = conn.transaction()?;
            if !probe_schema_exists(&tx)? {
                log::debug!("Creating schema in {database_path}");
                tx.execute_batch(include_str!("schema.sql"))?;
                tx.commit()?;
            }
        }
        let conn = Arc::new(Mutex::new(conn));
        Ok(Self { conn })
    }

    /// The story for a Pokémon, if one was written.
    pub fn get_story(&self, pokemon_id: PokemonId) -> Fallible<Option<Story>> {
        let conn = self.acquire();
        let sql = "select pokemon_id, story, updated_at from stories where pokemon_id = ?;";
        let story = conn.query_row(sql, [pokemon_id], story_from_row).optional()?;
        Ok(story)
    }

    /// Create or replace the story for a Pokémon.
    pub fn set_story(
        &self,
        pokemon_id: PokemonId,
        story: &str,
        updated_at: Timestamp,
    ) -> Fallible<Story> {
        log::debug!("Saving story for {pokemon_id}");
        let mut conn = self.acquire();
        let tx = conn.transaction()?;
        let sql = "insert into stories (pokemon_id, story, updated_at) values (?, ?, ?) on conflict (pokemon_id) do update set story = excluded.story, updated_at = excluded.updated_at;";
        tx.execute(sql, (pokemon_id, story, updated_at))?;
        tx.commit()?;
        Ok(Story {
            pokemon_id,
            story: story.to_string(),
            updated_at,
        })
    }

    /// Remove a Pokémon's story. Returns whether there was one.
    pub fn delete_story(&self, pokemon_id: PokemonId) -> Fallible<bool> {
        let conn = self.acquire();
        let deleted = conn.execute("delete from stories where pokemon_id = ?;", [pokemon_id])?;
        Ok(deleted > 0)
    }

    /// All stories, ordered by Pokémon.
    pub fn list_stories(&self) -> Fallible<Vec<Story>> {
        let conn = self.acquire();
        let mut stmt = conn
            .prepare("select pokemon_id, story, updated_at from stories order by pokemon_id;")?;
        let stories = stmt
            .query_map([], story_from_row)?
            .collect::<Result<Vec<_>, _>>()?;
        Ok(stories)
    }

    fn acquire(&self) -> MutexGuard<'_, Connection> {
        self.conn.lock().unwrap_or_else(PoisonError::into_inner)
    }
}

fn story_from_row(row: &Row<'_>) -> rusqlite::Result<Story> {
    Ok(Story {
        pokemon_id: row.get(0)?,
        story: row.get(1)?,
        updated_at: row.get(2)?,
    })
}

fn probe_schema_exists(tx: &Transaction) -> Fallible<bool> {
    let sql = "select count(*) from sqlite_master where type='table' AND name=?;";
    let count: i64 = tx.query_row(sql, ["stories"], |row| row.get(0))?;
    Ok(count > 0)
}
