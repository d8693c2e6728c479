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

//! Server-rendered Pokédex pages.

use axum::extract::Path;
use axum::extract::Query;
use axum::extract::State;
use axum::http::StatusCode;
use axum::response::Html;
use maud::Markup;
use maud::PreEscaped;
use maud::html;

use crate::markdown::markdown_to_html;
use crate::pokeapi::profile::Profile;
use crate::server::proxy::PageQuery;
use crate::server::proxy::PokedexPage;
use crate::server::proxy::fetch_page;
use crate::server::proxy::listing_id;
use crate::server::proxy::load_profile;
use crate::server::reply::UPSTREAM_FAILURE;
use crate::server::state::ServerState;
use crate::server::template::error_page;
use crate::server::template::page_template;

pub async fn index_handler(
    State(state): State<ServerState>,
    Query(query): Query<PageQuery>,
) -> (StatusCode, Html<String>) {
    match fetch_page(&state, &query).await {
        Ok(page) => {
            let html = page_template("Pokédex", render_index(&page));
            (StatusCode::OK, Html(html.into_string()))
        }
        Err(e) => {
            log::error!("{e}");
            let html = error_page(UPSTREAM_FAILURE);
            (StatusCode::INTERNAL_SERVER_ERROR, Html(html.into_string()))
        }
    }
}

fn render_index(page: &PokedexPage) -> Markup {
    let p = &page.pagination;
    html! {
        h1 { "Pokédex" }
        div.pokedex {
            @for entry in &page.list.results {
                @if let Some(id) = listing_id(entry) {
                    a href={ "/view/" (id) } { "#" (id) " " (entry.name) }
                } @else {
                    span { (entry.name) }
                }
            }
        }
        div.pager {
            @if p.has_previous {
                a id="previous" href={ "/?page=" (p.current_page - 1) "&limit=" (p.limit) } { "Previous" }
            } @else {
                span {}
            }
            span { "Page " (p.current_page) " of " (p.total_pages) }
            @if p.has_next {
                a id="next" href={ "/?page=" (p.current_page + 1) "&limit=" (p.limit) } { "Next" }
            } @else {
                span {}
            }
        }
    }
}

pub async fn view_handler(
    State(state): State<ServerState>,
    Path(key): Path<String>,
) -> (StatusCode, Html<String>) {
    match load_profile(&state, &key).await {
        Ok(profile) => {
            let html = page_template(&profile.en_name, render_profile(&profile));
            (StatusCode::OK, Html(html.into_string()))
        }
        Err(e) => {
            log::error!("{e}");
            let html = error_page(UPSTREAM_FAILURE);
            (StatusCode::INTERNAL_SERVER_ERROR, Html(html.into_string()))
        }
    }
}

fn render_profile(profile: &Profile) -> Markup {
    let stats = &profile.base_stats;
    let details = &profile.details;
    html! {
        div.profile {
            h1 { "#" (profile.id) " " (profile.en_name) }
            @if !profile.jp_name.is_empty() {
                p.jp-name { (profile.jp_name) }
            }
            @if let Some(artwork) = &profile.artwork {
                img src=(artwork) alt=(profile.en_name);
            }
            div.types {
                @for kind in &profile.types {
                    span { (kind) }
                }
            }
            table.details {
                tr { th { "Category" } td { (details.category) } }
                tr { th { "Height" } td { (details.height) } }
                tr { th { "Weight" } td { (details.weight) } }
                tr { th { "Abilities" } td { (details.abilities.join(", ")) } }
                tr { th { "Habitat" } td { (profile.habitat) } }
                tr { th { "Generation" } td { (profile.generation) } }
            }
            h2 { "Base stats" }
            table.stats {
                tr { th { "HP" } td { (stats.hp) } }
                tr { th { "Attack" } td { (stats.attack) } }
                tr { th { "Defense" } td { (stats.defense) } }
                tr { th { "Sp. Attack" } td { (stats.special_attack) } }
                tr { th { "Sp. Defense" } td { (stats.special_defense) } }
                tr { th { "Speed" } td { (stats.speed) } }
            }
            @if !profile.weaknesses.is_empty() {
                p.weaknesses { "Weak to: " (profile.weaknesses.join(", ")) }
            }
            @if !profile.resistances.is_empty() {
                p.resistances { "Resists: " (profile.resistances.join(", ")) }
            }
            div.story {
                h2 { "Story" }
                @if profile.custom_story {
                    div.custom-story { (PreEscaped(markdown_to_html(&profile.story))) }
                    @if let Some(updated_at) = profile.story_updated_at {
                        p.edited { "Edited " (updated_at.short()) }
                    }
                } @else {
                    p.flavor-text { (profile.story) }
                }
                form action={ "/view/" (profile.id) "/story" } method="post" {
                    textarea name="story" placeholder="Write your own story in Markdown" {
                        @if profile.custom_story { (profile.story) }
                    }
                    input id="save" type="submit" name="action" value="Save";
                    @if profile.custom_story {
                        input id="delete" type="submit" name="action" value="Delete";
                    }
                }
            }
            @if profile.evolution_chain.len() > 1 {
                h2 { "Evolutions" }
                div.evolutions {
                    @for evolution in &profile.evolution_chain {
                        a href={ "/view/" (evolution.id) } {
                            @if let Some(artwork) = &evolution.artwork {
                                img src=(artwork) alt=(evolution.name);
                            }
                            span { (evolution.name) }
                        }
                    }
                }
            }
        }
    }
}
