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

use serde::Serialize;

use crate::db::Story;
use crate::error::Fallible;
use crate::pokeapi::client::PokeApi;
use crate::pokeapi::models::NamedResource;
use crate::pokeapi::models::Pokemon;
use crate::pokeapi::models::Species;
use crate::pokeapi::models::TypeInfo;
use crate::types::pokemon_id::PokemonId;
use crate::types::timestamp::Timestamp;

const UNKNOWN: &str = "unknown";
const NO_DESCRIPTION: &str = "No description available";

/// Everything the encyclopedia page shows about one Pokémon.
#[derive(Clone, Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Profile {
    pub id: PokemonId,
    pub en_name: String,
    pub jp_name: String,
    pub artwork: Option<String>,
    pub types: Vec<String>,
    pub details: Details,
    pub habitat: String,
    pub generation: String,
    pub base_stats: BaseStats,
    pub weaknesses: Vec<String>,
    pub resistances: Vec<String>,
    pub story: String,
    /// Whether `story` was written by the user rather than taken from the
    /// game's flavor text.
    pub custom_story: bool,
    pub story_updated_at: Option<Timestamp>,
    pub evolution_chain: Vec<Evolution>,
}

#[derive(Clone, Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Details {
    pub abilities: Vec<String>,
    pub weight: String,
    pub height: String,
    pub gender_rate: i32,
    pub category: String,
}

#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct BaseStats {
    pub hp: u32,
    pub attack: u32,
    pub defense: u32,
    pub special_attack: u32,
    pub special_defense: u32,
    pub speed: u32,
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub struct Evolution {
    pub id: PokemonId,
    pub name: String,
    pub artwork: Option<String>,
}

impl Profile {
    /// Replace the flavor text with the user's own story, if there is one.
    pub fn with_story(mut self, story: Option<Story>) -> Self {
        if let Some(story) = story {
            self.story = story.story;
            self.custom_story = true;
            self.story_updated_at = Some(story.updated_at);
        }
        self
    }
}

/// Fetch a Pokémon together with its species, types, and evolution line.
pub async fn fetch_profile(api: &PokeApi, key: &str) -> Fallible<Profile> {
    let pokemon = api.pokemon(key).await?;
    let species = api
        .species(PokemonId::from_resource_url(&pokemon.species.url)?)
        .await?;
    let mut types = Vec::with_capacity(pokemon.types.len());
    for name in pokemon.type_names() {
        types.push(api.type_info(&name).await?);
    }
    let evolution_chain = match &species.evolution_chain {
        Some(resource) => {
            let chain_id = PokemonId::from_resource_url(&resource.url)?.get();
            let chain = api.evolution_chain(chain_id).await?;
            let mut evolutions = Vec::new();
            for member in chain.chain.flatten() {
                let id = PokemonId::from_resource_url(&member.url)?;
                let artwork = api
                    .pokemon(&id.to_string())
                    .await?
                    .artwork_ref()
                    .map(str::to_string);
                evolutions.push(Evolution {
                    id,
                    name: member.name.clone(),
                    artwork,
                });
            }
            evolutions
        }
        None => Vec::new(),
    };
    build_profile(&pokemon, &species, &types, evolution_chain)
}

pub fn build_profile(
    pokemon: &Pokemon,
    species: &Species,
    types: &[TypeInfo],
    evolution_chain: Vec<Evolution>,
) -> Fallible<Profile> {
    let story = species
        .flavor_text_in("en")
        .unwrap_or_else(|| NO_DESCRIPTION.to_string());
    Ok(Profile {
        id: pokemon.identifier()?,
        en_name: pokemon.name.clone(),
        jp_name: species
            .name_in("ja-Hrkt")
            .unwrap_or(pokemon.name.as_str())
            .to_string(),
        artwork: pokemon.artwork_ref().map(str::to_string),
        types: pokemon.type_names(),
        details: Details {
            abilities: pokemon
                .abilities
                .iter()
                .map(|a| a.ability.name.clone())
                .collect(),
            weight: format!("{} kg", pokemon.weight as f64 / 10.0),
            height: format!("{} m", pokemon.height as f64 / 10.0),
            gender_rate: species.gender_rate,
            category: species.genus_in("en").unwrap_or(UNKNOWN).to_string(),
        },
        habitat: species
            .habitat
            .as_ref()
            .map_or(UNKNOWN, |h| h.name.as_str())
            .to_string(),
        generation: species
            .generation
            .as_ref()
            .map_or(UNKNOWN, |g| g.name.as_str())
            .to_string(),
        base_stats: BaseStats {
            hp: pokemon.base_stat("hp"),
            attack: pokemon.base_stat("attack"),
            defense: pokemon.base_stat("defense"),
            special_attack: pokemon.base_stat("special-attack"),
            special_defense: pokemon.base_stat("special-defense"),
            speed: pokemon.base_stat("speed"),
        },
        weaknesses: union_of(types.iter().map(|t| &t.damage_relations.double_damage_from)),
        resistances: union_of(types.iter().map(|t| &t.damage_relations.half_damage_from)),
        story,
        custom_story: false,
        story_updated_at: None,
        evolution_chain,
    })
}

/// Type names across several relation lists, first occurrence wins.
fn union_of<'a>(
    lists: impl Iterator<Item = &'a Vec<NamedResource>>,
) -> Vec<String> {
    let mut names: Vec<String> = Vec::new();
    for resource in lists.flatten() {
        if !names.contains(&resource.name) {
            names.push(resource.name.clone());
        }
    }
    names
}

#[cfg(test)]
mod tests {
    use super::*;

    fn pokemon() -> Fallible<Pokemon> {
        Ok(serde_json::from_str(
            r#"{
            "id": 6, "name": "charizard", "height": 17, "weight": 905,
            "sprites": {"other": {"official-artwork": {"front_default": "art/6.png"}}},
            "types": [
                {"slot": 1, "type": {"name": "fire", "url": "u/type/10/"}},
                {"slot": 2, "type": {"name": "flying", "url": "u/type/3/"}}
            ],
            "abilities": [{"ability": {"name": "blaze", "url": "u"}}, {"ability": {"name": "solar-power", "url": "u"}}],
            "stats": [
                {"base_stat": 78, "stat": {"name": "hp", "url": "u"}},
                {"base_stat": 84, "stat": {"name": "attack", "url": "u"}},
                {"base_stat": 78, "stat": {"name": "defense", "url": "u"}},
                {"base_stat": 109, "stat": {"name": "special-attack", "url": "u"}},
                {"base_stat": 85, "stat": {"name": "special-defense", "url": "u"}},
                {"base_stat": 100, "stat": {"name": "speed", "url": "u"}}
            ],
            "species": {"name": "charizard", "url": "u/pokemon-species/6/"}
        }"#,
        )?)
    }

    fn species() -> Fallible<Species> {
        Ok(serde_json::from_str(
            r#"{
            "id": 6, "gender_rate": 1,
            "names": [{"name": "リザードン", "language": {"name": "ja-Hrkt", "url": "u"}}],
            "genera": [{"genus": "Flame Pokémon", "language": {"name": "en", "url": "u"}}],
            "habitat": {"name": "mountain", "url": "u"},
            "generation": {"name": "generation-i", "url": "u"},
            "evolution_chain": {"url": "u/evolution-chain/2/"},
            "flavor_text_entries": [{"flavor_text": "Spits fire that\fis hot.", "language": {"name": "en", "url": "u"}}]
        }"#,
        )?)
    }

    fn types() -> Fallible<Vec<TypeInfo>> {
        Ok(serde_json::from_str(
            r#"[
            {"name": "fire", "damage_relations": {
                "double_damage_from": [{"name": "ground", "url": "u"}, {"name": "rock", "url": "u"}, {"name": "water", "url": "u"}],
                "half_damage_from": [{"name": "bug", "url": "u"}, {"name": "fire", "url": "u"}]}},
            {"name": "flying", "damage_relations": {
                "double_damage_from": [{"name": "electric", "url": "u"}, {"name": "rock", "url": "u"}],
                "half_damage_from": [{"name": "bug", "url": "u"}, {"name": "grass", "url": "u"}]}}
        ]"#,
        )?)
    }

    #[test]
    fn test_build_profile() -> Fallible<()> {
        let profile = build_profile(&pokemon()?, &species()?, &types()?, Vec::new())?;
        assert_eq!(profile.id.get(), 6);
        assert_eq!(profile.jp_name, "リザードン");
        assert_eq!(profile.artwork.as_deref(), Some("art/6.png"));
        assert_eq!(profile.types, vec!["fire", "flying"]);
        assert_eq!(profile.details.weight, "90.5 kg");
        assert_eq!(profile.details.height, "1.7 m");
        assert_eq!(profile.details.category, "Flame Pokémon");
        assert_eq!(profile.details.abilities, vec!["blaze", "solar-power"]);
        assert_eq!(profile.habitat, "mountain");
        assert_eq!(profile.generation, "generation-i");
        assert_eq!(profile.base_stats.special_attack, 109);
        assert_eq!(profile.base_stats.speed, 100);
        assert_eq!(profile.weaknesses, vec!["ground", "rock", "water", "electric"]);
        assert_eq!(profile.resistances, vec!["bug", "fire", "grass"]);
        assert_eq!(profile.story, "Spits fire that is hot.");
        assert!(!profile.custom_story);
        Ok(())
    }

    #[test]
    fn test_custom_story_wins() -> Fallible<()> {
        let updated_at = Timestamp::now();
        let story = Story {
            pokemon_id: PokemonId::new(6)?,
            story: "Mine now.".to_string(),
            updated_at,
        };
        let profile =
            build_profile(&pokemon()?, &species()?, &[], Vec::new())?.with_story(Some(story));
        assert_eq!(profile.story, "Mine now.");
        assert!(profile.custom_story);
        assert_eq!(profile.story_updated_at, Some(updated_at));
        assert!(profile.weaknesses.is_empty());
        Ok(())
    }

    #[test]
    fn test_fallbacks() -> Fallible<()> {
        let species: Species = serde_json::from_str(r#"{"id": 6}"#)?;
        let profile = build_profile(&pokemon()?, &species, &[], Vec::new())?.with_story(None);
        assert_eq!(profile.jp_name, "charizard");
        assert_eq!(profile.details.category, "unknown");
        assert_eq!(profile.habitat, "unknown");
        assert_eq!(profile.generation, "unknown");
        assert_eq!(profile.story, "No description available");
        assert_eq!(profile.story_updated_at, None);
        Ok(())
    }
}
