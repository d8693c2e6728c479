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

use crate::types::card::Card;
use crate::types::summary::PokemonSummary;

/// Deal two cards for every summary, in input order. Identifiers are assumed
/// to be distinct; duplicates are not removed here.
pub fn build_deck(summaries: &[PokemonSummary]) -> Vec<Card> {
    summaries
        .iter()
        .flat_map(|summary| [Card::new(summary, 1), Card::new(summary, 2)])
        .collect()
}

#[cfg(test)]
mod tests {
    use std::collections::HashMap;
    use std::collections::HashSet;

    use super::*;
    use crate::error::Fallible;
    use crate::types::pokemon_id::PokemonId;

    fn summaries(n: u32) -> Fallible<Vec<PokemonSummary>> {
        (1..=n)
            .map(|id| {
                Ok(PokemonSummary::new(
                    PokemonId::new(id)?,
                    format!("pokemon-{id}"),
                    format!("https://img.example/{id}.png"),
                ))
            })
            .collect()
    }

    #[test]
    fn test_deck_parity() -> Fallible<()> {
        for n in 1..=24 {
            let deck = build_deck(&summaries(n)?);
            assert_eq!(deck.len(), 2 * n as usize);

            let mut per_identifier: HashMap<PokemonId, usize> = HashMap::new();
            for card in &deck {
                *per_identifier.entry(card.identifier()).or_default() += 1;
            }
            assert_eq!(per_identifier.len(), n as usize);
            assert!(per_identifier.values().all(|count| *count == 2));

            let ids: HashSet<&str> = deck.iter().map(|card| card.card_id().as_str()).collect();
            assert_eq!(ids.len(), deck.len());
        }
        Ok(())
    }

    #[test]
    fn test_empty() {
        assert!(build_deck(&[]).is_empty());
    }

    #[test]
    fn test_display_attributes_copied() -> Fallible<()> {
        let deck = build_deck(&summaries(1)?);
        for card in deck {
            assert_eq!(card.display_name(), "pokemon-1");
            assert_eq!(card.artwork_ref(), "https://img.example/1.png");
        }
        Ok(())
    }
}
