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

//! The subset of PokéAPI v2 response bodies this application reads. Unknown
//! fields are ignored.

use serde::Deserialize;
use serde::Serialize;

use crate::error::ErrorReport;
use crate::error::Fallible;
use crate::types::pokemon_id::PokemonId;
use crate::types::summary::PokemonSummary;

#[derive(Clone, PartialEq, Eq, Debug, Serialize, Deserialize)]
pub struct NamedResource {
    pub name: String,
    pub url: String,
}

#[derive(Clone, PartialEq, Eq, Debug, Serialize, Deserialize)]
pub struct NamedResourceList {
    pub count: u32,
    pub next: Option<String>,
    pub previous: Option<String>,
    pub results: Vec<NamedResource>,
}

#[derive(Clone, Debug, Deserialize)]
pub struct Pokemon {
    pub id: u32,
    pub name: String,
    /// In decimetres.
    #[serde(default)]
    pub height: u32,
    /// In hectograms.
    #[serde(default)]
    pub weight: u32,
    pub sprites: Sprites,
    #[serde(default)]
    pub types: Vec<PokemonType>,
    #[serde(default)]
    pub abilities: Vec<PokemonAbility>,
    #[serde(default)]
    pub stats: Vec<PokemonStat>,
    pub species: NamedResource,
}

#[derive(Clone, Debug, Default, Deserialize)]
pub struct Sprites {
    pub front_default: Option<String>,
    #[serde(default)]
    pub other: OtherSprites,
}

#[derive(Clone, Debug, Default, Deserialize)]
pub struct OtherSprites {
    #[serde(rename = "official-artwork", default)]
    pub official_artwork: Option<Artwork>,
}

#[derive(Clone, Debug, Default, Deserialize)]
pub struct Artwork {
    pub front_default: Option<String>,
}

#[derive(Clone, Debug, Deserialize)]
pub struct PokemonType {
    pub slot: u32,
    #[serde(rename = "type")]
    pub kind: NamedResource,
}

#[derive(Clone, Debug, Deserialize)]
pub struct PokemonAbility {
    pub ability: NamedResource,
}

#[derive(Clone, Debug, Deserialize)]
pub struct PokemonStat {
    pub base_stat: u32,
    pub stat: NamedResource,
}

impl Pokemon {
    pub fn identifier(&self) -> Fallible<PokemonId> {
        PokemonId::new(self.id)
    }

    /// The official artwork, falling back to the default sprite.
    pub fn artwork_ref(&self) -> Option<&str> {
        self.sprites
            .other
            .official_artwork
            .as_ref()
            .and_then(|artwork| artwork.front_default.as_deref())
            .or(self.sprites.front_default.as_deref())
    }

    pub fn summary(&self) -> Fallible<PokemonSummary> {
        let artwork = self.artwork_ref().ok_or_else(|| {
            ErrorReport::new(format!("Pokémon {} has no artwork.", self.name))
        })?;
        Ok(PokemonSummary::new(self.identifier()?, &self.name, artwork))
    }

    pub fn type_names(&self) -> Vec<String> {
        let mut types = self.types.clone();
        types.sort_by_key(|t| t.slot);
        types.into_iter().map(|t| t.kind.name).collect()
    }

    pub fn base_stat(&self, name: &str) -> u32 {
        self.stats
            .iter()
            .find(|s| s.stat.name == name)
            .map(|s| s.base_stat)
            .unwrap_or(0)
    }
}

#[derive(Clone, Debug, Deserialize)]
pub struct Species {
    #[serde(default)]
    pub names: Vec<LocalizedName>,
    #[serde(default)]
    pub genera: Vec<Genus>,
    /// Chance of being female in eighths, or -1 for genderless.
    #[serde(default)]
    pub gender_rate: i32,
    pub habitat: Option<NamedResource>,
    pub generation: Option<NamedResource>,
    pub evolution_chain: Option<ApiResource>,
    #[serde(default)]
    pub flavor_text_entries: Vec<FlavorText>,
}

#[derive(Clone, Debug, Deserialize)]
pub struct ApiResource {
    pub url: String,
}

#[derive(Clone, Debug, Deserialize)]
pub struct LocalizedName {
    pub name: String,
    pub language: NamedResource,
}

#[derive(Clone, Debug, Deserialize)]
pub struct Genus {
    pub genus: String,
    pub language: NamedResource,
}

#[derive(Clone, Debug, Deserialize)]
pub struct FlavorText {
    pub flavor_text: String,
    pub language: NamedResource,
}

impl Species {
    pub fn name_in(&self, language: &str) -> Option<&str> {
        self.names
            .iter()
            .find(|n| n.language.name == language)
            .map(|n| n.name.as_str())
    }

    pub fn genus_in(&self, language: &str) -> Option<&str> {
        self.genera
            .iter()
            .find(|g| g.language.name == language)
            .map(|g| g.genus.as_str())
    }

    /// The first flavor text in the given language, with the form feeds the
    /// game text contains replaced by spaces.
    pub fn flavor_text_in(&self, language: &str) -> Option<String> {
        self.flavor_text_entries
            .iter()
            .find(|f| f.language.name == language)
            .map(|f| f.flavor_text.replace('\u{c}', " "))
    }
}

#[derive(Clone, Debug, Deserialize)]
pub struct TypeInfo {
    pub damage_relations: DamageRelations,
}

#[derive(Clone, Debug, Default, Deserialize)]
pub struct DamageRelations {
    #[serde(default)]
    pub double_damage_from: Vec<NamedResource>,
    #[serde(default)]
    pub half_damage_from: Vec<NamedResource>,
}

#[derive(Clone, Debug, Deserialize)]
pub struct EvolutionChain {
    pub chain: ChainLink,
}

#[derive(Clone, Debug, Deserialize)]
pub struct ChainLink {
    pub species: NamedResource,
    #[serde(default)]
    pub evolves_to: Vec<ChainLink>,
}

impl ChainLink {
    /// Every species in the chain, parents before their evolutions.
    pub fn flatten(&self) -> Vec<&NamedResource> {
        let mut species = vec![&self.species];
        for next in &self.evolves_to {
            species.extend(next.flatten());
        }
        species
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const PIKACHU: &str = r#"{
        "id": 25,
        "name": "pikachu",
        "height": 4,
        "weight": 60,
        "sprites": {
            "front_default": "https://img/sprite/25.png",
            "other": {
                "official-artwork": {"front_default": "https://img/art/25.png"},
                "home": {"front_default": null}
            }
        },
        "types": [{"slot": 1, "type": {"name": "electric", "url": "https://x/type/13/"}}],
        "abilities": [{"ability": {"name": "static", "url": "https://x/ability/9/"}}],
        "stats": [
            {"base_stat": 35, "stat": {"name": "hp", "url": "u"}},
            {"base_stat": 90, "stat": {"name": "speed", "url": "u"}}
        ],
        "species": {"name": "pikachu", "url": "https://x/pokemon-species/25/"},
        "moves": []
    }"#;

    #[test]
    fn test_pokemon_summary() -> Fallible<()> {
        let pokemon: Pokemon = serde_json::from_str(PIKACHU)?;
        let summary = pokemon.summary()?;
        assert_eq!(summary.identifier.get(), 25);
        assert_eq!(summary.display_name, "pikachu");
        assert_eq!(summary.artwork_ref, "https://img/art/25.png");
        assert_eq!(pokemon.base_stat("speed"), 90);
        assert_eq!(pokemon.base_stat("attack"), 0);
        assert_eq!(pokemon.type_names(), vec!["electric"]);
        Ok(())
    }

    #[test]
    fn test_artwork_fallback() -> Fallible<()> {
        let json = r#"{"id": 1, "name": "a", "sprites": {"front_default": "s.png", "other": {"official-artwork": {"front_default": null}}}, "species": {"name": "a", "url": "u/1/"}}"#;
        let pokemon: Pokemon = serde_json::from_str(json)?;
        assert_eq!(pokemon.artwork_ref(), Some("s.png"));
        Ok(())
    }

    #[test]
    fn test_missing_artwork() -> Fallible<()> {
        let json = r#"{"id": 1, "name": "a", "sprites": {"front_default": null}, "species": {"name": "a", "url": "u/1/"}}"#;
        let pokemon: Pokemon = serde_json::from_str(json)?;
        assert!(pokemon.summary().is_err());
        Ok(())
    }

    #[test]
    fn test_type_order_follows_slot() -> Fallible<()> {
        let json = r#"{"id": 6, "name": "charizard", "sprites": {}, "species": {"name": "c", "url": "u/6/"},
            "types": [{"slot": 2, "type": {"name": "flying", "url": "u"}}, {"slot": 1, "type": {"name": "fire", "url": "u"}}]}"#;
        let pokemon: Pokemon = serde_json::from_str(json)?;
        assert_eq!(pokemon.type_names(), vec!["fire", "flying"]);
        Ok(())
    }

    #[test]
    fn test_flavor_text_form_feed() -> Fallible<()> {
        let json = r#"{"id": 25, "gender_rate": 4, "habitat": null, "generation": null, "evolution_chain": null,
            "flavor_text_entries": [
                {"flavor_text": "Pika\fpika", "language": {"name": "ja", "url": "u"}},
                {"flavor_text": "When several of\fthese POKéMON", "language": {"name": "en", "url": "u"}}
            ]}"#;
        let species: Species = serde_json::from_str(json)?;
        assert_eq!(
            species.flavor_text_in("en").as_deref(),
            Some("When several of these POKéMON")
        );
        assert_eq!(species.name_in("ja-Hrkt"), None);
        Ok(())
    }

    #[test]
    fn test_chain_flatten() -> Fallible<()> {
        let json = r#"{"id": 67, "chain": {
            "species": {"name": "eevee", "url": "u/133/"},
            "evolves_to": [
                {"species": {"name": "vaporeon", "url": "u/134/"}, "evolves_to": []},
                {"species": {"name": "jolteon", "url": "u/135/"}, "evolves_to": []}
            ]}}"#;
        let chain: EvolutionChain = serde_json::from_str(json)?;
        let names: Vec<&str> = chain.chain.flatten().iter().map(|s| s.name.as_str()).collect();
        assert_eq!(names, vec!["eevee", "vaporeon", "jolteon"]);
        Ok(())
    }

    #[test]
    fn test_type_relations() -> Fallible<()> {
        let json = r#"{"id": 10, "name": "fire", "damage_relations": {
            "double_damage_from": [{"name": "water", "url": "u/11/"}, {"name": "rock", "url": "u/6/"}],
            "half_damage_from": [{"name": "grass", "url": "u/12/"}],
            "no_damage_from": []
        }}"#;
        let info: TypeInfo = serde_json::from_str(json)?;
        let weak: Vec<&str> = info
            .damage_relations
            .double_damage_from
            .iter()
            .map(|t| t.name.as_str())
            .collect();
        assert_eq!(weak, vec!["water", "rock"]);
        assert_eq!(info.damage_relations.half_damage_from.len(), 1);
        Ok(())
    }
}
