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

use std::collections::HashSet;
use std::future::Future;

use rand::Rng;
use rand::seq::index::sample;
use tokio::task::JoinSet;

use crate::error::Fallible;
use crate::error::fail;
use crate::pokeapi::client::PokeApi;
use crate::types::pokemon_id::PokemonId;
use crate::types::summary::PokemonSummary;

/// Only the first generations have consistent official artwork.
pub const ARTWORK_ID_LIMIT: u32 = 1010;

/// Supplies the Pokémon a game is dealt from.
pub trait ListingProvider {
    /// Exactly `count` summaries with distinct identifiers, or an error.
    /// Never a partial list.
    fn fetch_random_pokemon_set(
        &self,
        count: usize,
    ) -> impl Future<Output = Fallible<Vec<PokemonSummary>>> + Send;
}

impl ListingProvider for PokeApi {
    async fn fetch_random_pokemon_set(&self, count: usize) -> Fallible<Vec<PokemonSummary>> {
        let total = self.count().await?;
        let upper = total.min(ARTWORK_ID_LIMIT);
        let ids = pick_distinct_ids(count, upper, &mut rand::thread_rng())?;
        log::debug!("Fetching {count} random Pokémon out of {upper}");

        let mut tasks = JoinSet::new();
        for id in ids {
            let api = self.clone();
            tasks.spawn(async move { api.pokemon(&id.to_string()).await });
        }
        let mut summaries = Vec::with_capacity(count);
        while let Some(joined) = tasks.join_next().await {
            let pokemon = joined??;
            summaries.push(pokemon.summary()?);
        }
        summaries.sort_by_key(|s| s.identifier);
        check_distinct(&summaries, count)?;
        Ok(summaries)
    }
}

/// `count` distinct identifiers drawn uniformly from `1..=upper`.
pub fn pick_distinct_ids<R: Rng + ?Sized>(
    count: usize,
    upper: u32,
    rng: &mut R,
) -> Fallible<Vec<PokemonId>> {
    if count > upper as usize {
        return fail(format!(
            "cannot pick {count} distinct Pokémon out of {upper}."
        ));
    }
    sample(rng, upper as usize, count)
        .into_iter()
        .map(|index| PokemonId::new(index as u32 + 1))
        .collect()
}

/// Reject a set that is short or repeats a Pokémon.
pub fn check_distinct(summaries: &[PokemonSummary], count: usize) -> Fallible<()> {
    let distinct: HashSet<PokemonId> = summaries.iter().map(|s| s.identifier).collect();
    if summaries.len() != count || distinct.len() != count {
        return fail(format!(
            "expected {count} distinct Pokémon, upstream gave {}.",
            distinct.len()
        ));
    }
    Ok(())
}

#[cfg(test)]
pub mod testing {
    use super::*;

    /// A provider that always deals the same Pokémon.
    pub struct StaticListing(pub Vec<PokemonSummary>);

    impl ListingProvider for StaticListing {
        async fn fetch_random_pokemon_set(&self, count: usize) -> Fallible<Vec<PokemonSummary>> {
            let summaries: Vec<PokemonSummary> = self.0.iter().take(count).cloned().collect();
            check_distinct(&summaries, count)?;
            Ok(summaries)
        }
    }

    pub fn summaries(ids: &[u32]) -> Fallible<Vec<PokemonSummary>> {
        ids.iter()
            .map(|id| {
                Ok(PokemonSummary::new(
                    PokemonId::new(*id)?,
                    format!("pokemon-{id}"),
                    format!("https://img.example/{id}.png"),
                ))
            })
            .collect()
    }
}
