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

//! JSON endpoints that forward to PokéAPI.

use axum::Json;
use axum::extract::Path;
use axum::extract::Query;
use axum::extract::State;
use serde::Deserialize;
use serde::Serialize;

use crate::error::Fallible;
use crate::pokeapi::listing::ListingProvider;
use crate::pokeapi::models::NamedResource;
use crate::pokeapi::models::NamedResourceList;
use crate::pokeapi::profile::Profile;
use crate::pokeapi::profile::fetch_profile;
use crate::server::reply::Reply;
use crate::server::reply::database_failure;
use crate::server::reply::upstream_failure;
use crate::server::state::ServerState;
use crate::types::pokemon_id::PokemonId;
use crate::types::summary::PokemonSummary;

/// Size of the listing on the landing endpoint.
const FEATURED_LIMIT: u32 = 8;
const DEFAULT_PAGE_SIZE: u32 = 20;
/// Enough to cover every Pokémon PokéAPI knows.
const SEARCH_LIMIT: u32 = 2000;

pub async fn featured(State(state): State<ServerState>) -> Reply<NamedResourceList> {
    let list = state
        .api
        .list(FEATURED_LIMIT, 0)
        .await
        .map_err(upstream_failure)?;
    Ok(Json(list))
}

#[derive(Deserialize)]
pub struct PageQuery {
    page: Option<String>,
    limit: Option<String>,
}

impl PageQuery {
    /// Missing, malformed, and zero values fall back to the defaults.
    pub fn resolve(&self) -> (u32, u32) {
        let page = positive(self.page.as_deref()).unwrap_or(1);
        let limit = positive(self.limit.as_deref()).unwrap_or(DEFAULT_PAGE_SIZE);
        (page, limit)
    }
}

fn positive(value: Option<&str>) -> Option<u32> {
    value
        .and_then(|v| v.trim().parse::<u32>().ok())
        .filter(|v| *v > 0)
}

#[derive(Serialize)]
pub struct PokedexPage {
    #[serde(flatten)]
    pub list: NamedResourceList,
    pub pagination: Pagination,
}

#[derive(Serialize, Debug, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct Pagination {
    pub current_page: u32,
    pub total_pages: u32,
    pub total_count: u32,
    pub limit: u32,
    pub has_next: bool,
    pub has_previous: bool,
}

pub fn paginate(page: u32, limit: u32, list: &NamedResourceList) -> Pagination {
    Pagination {
        current_page: page,
        total_pages: list.count.div_ceil(limit),
        total_count: list.count,
        limit,
        has_next: list.next.is_some(),
        has_previous: list.previous.is_some(),
    }
}

pub async fn fetch_page(state: &ServerState, query: &PageQuery) -> Fallible<PokedexPage> {
    let (page, limit) = query.resolve();
    let offset = (page - 1).saturating_mul(limit);
    let list = state.api.list(limit, offset).await?;
    let pagination = paginate(page, limit, &list);
    Ok(PokedexPage { list, pagination })
}

pub async fn pokedex(
    State(state): State<ServerState>,
    Query(query): Query<PageQuery>,
) -> Reply<PokedexPage> {
    let page = fetch_page(&state, &query)
        .await
        .map_err(upstream_failure)?;
    Ok(Json(page))
}

#[derive(Deserialize)]
pub struct SearchQuery {
    query: Option<String>,
}

/// Case-insensitive substring match on the name.
pub fn filter_by_name(results: Vec<NamedResource>, query: &str) -> Vec<NamedResource> {
    let needle = query.trim().to_lowercase();
    results
        .into_iter()
        .filter(|r| r.name.to_lowercase().contains(&needle))
        .collect()
}

pub async fn search(
    State(state): State<ServerState>,
    Query(query): Query<SearchQuery>,
) -> Reply<Vec<NamedResource>> {
    let query = query.query.unwrap_or_default();
    if query.trim().is_empty() {
        return Ok(Json(Vec::new()));
    }
    let list = state
        .api
        .list(SEARCH_LIMIT, 0)
        .await
        .map_err(upstream_failure)?;
    Ok(Json(filter_by_name(list.results, &query)))
}

pub async fn pokemon(
    State(state): State<ServerState>,
    Path(key): Path<String>,
) -> Reply<serde_json::Value> {
    let pokemon = state
        .api
        .pokemon_raw(&key)
        .await
        .map_err(upstream_failure)?;
    Ok(Json(pokemon))
}

pub async fn load_profile(state: &ServerState, key: &str) -> Fallible<Profile> {
    let profile = fetch_profile(&state.api, key).await?;
    let story = state.db.get_story(profile.id)?;
    Ok(profile.with_story(story))
}

pub async fn profile(
    State(state): State<ServerState>,
    Path(key): Path<String>,
) -> Reply<Profile> {
    let profile = fetch_profile(&state.api, &key)
        .await
        .map_err(upstream_failure)?;
    let story = state.db.get_story(profile.id).map_err(database_failure)?;
    Ok(Json(profile.with_story(story)))
}

#[derive(Serialize)]
pub struct RandomSet {
    count: usize,
    results: Vec<PokemonSummary>,
}

/// A fresh random set of the size the game deals.
pub async fn memory_game(State(state): State<ServerState>) -> Reply<RandomSet> {
    let results = state
        .api
        .fetch_random_pokemon_set(state.game.rules().pairs)
        .await
        .map_err(upstream_failure)?;
    Ok(Json(RandomSet {
        count: results.len(),
        results,
    }))
}

/// The identifier in a listing entry's URL, if it has one.
pub fn listing_id(resource: &NamedResource) -> Option<PokemonId> {
    PokemonId::from_resource_url(&resource.url).ok()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn resource(name: &str, id: u32) -> NamedResource {
        NamedResource {
            name: name.to_string(),
            url: format!("https://pokeapi.co/api/v2/pokemon/{id}/"),
        }
    }

    fn list(count: u32, next: bool, previous: bool) -> NamedResourceList {
        NamedResourceList {
            count,
            next: next.then(|| "next".to_string()),
            previous: previous.then(|| "previous".to_string()),
            results: Vec::new(),
        }
    }

    #[test]
    fn test_page_query_defaults() {
        let query = PageQuery {
            page: None,
            limit: None,
        };
        assert_eq!(query.resolve(), (1, 20));
        let query = PageQuery {
            page: Some("abc".to_string()),
            limit: Some("0".to_string()),
        };
        assert_eq!(query.resolve(), (1, 20));
        let query = PageQuery {
            page: Some("3".to_string()),
            limit: Some("50".to_string()),
        };
        assert_eq!(query.resolve(), (3, 50));
    }

    #[test]
    fn test_paginate() {
        let pagination = paginate(2, 20, &list(1302, true, true));
        assert_eq!(
            pagination,
            Pagination {
                current_page: 2,
                total_pages: 66,
                total_count: 1302,
                limit: 20,
                has_next: true,
                has_previous: true,
            }
        );
        let pagination = paginate(1, 20, &list(20, false, false));
        assert_eq!(pagination.total_pages, 1);
        assert!(!pagination.has_next);
    }

    #[test]
    fn test_filter_by_name() {
        let results = vec![
            resource("charmander", 4),
            resource("charmeleon", 5),
            resource("squirtle", 7),
        ];
        let names: Vec<String> = filter_by_name(results.clone(), " CHARM ")
            .into_iter()
            .map(|r| r.name)
            .collect();
        assert_eq!(names, vec!["charmander", "charmeleon"]);
        assert!(filter_by_name(results, "mew").is_empty());
    }

    #[test]
    fn test_listing_id() {
        assert_eq!(listing_id(&resource("squirtle", 7)).map(PokemonId::get), Some(7));
        let broken = NamedResource {
            name: "x".to_string(),
            url: "nowhere".to_string(),
        };
        assert_eq!(listing_id(&broken), None);
    }
}
