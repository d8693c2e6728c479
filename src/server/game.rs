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

//! The memory game board and its JSON twin.

use axum::Form;
use axum::Json;
use axum::extract::Path;
use axum::extract::State;
use axum::http::StatusCode;
use axum::response::Html;
use axum::response::Redirect;
use maud::Markup;
use maud::html;
use serde::Deserialize;
use serde::Serialize;

use crate::game::session::CardView;
use crate::game::session::FlipOutcome;
use crate::game::session::Phase;
use crate::game::session::SessionView;
use crate::server::reply::Reply;
use crate::server::reply::error_reply;
use crate::server::reply::upstream_failure;
use crate::server::state::ServerState;
use crate::server::template::error_page;
use crate::server::template::page_template;
use crate::server::template::refreshing_page_template;
use crate::types::card::CardId;

pub async fn get_handler(State(state): State<ServerState>) -> (StatusCode, Html<String>) {
    if let Err(e) = state.game.ensure_dealt(&state.api).await {
        log::error!("{e}");
        let html = error_page("Failed to load Pokémon");
        return (StatusCode::BAD_GATEWAY, Html(html.into_string()));
    }
    let Some(view) = state.game.view() else {
        let html = error_page("Failed to load Pokémon");
        return (StatusCode::BAD_GATEWAY, Html(html.into_string()));
    };
    let body = render_board(&view);
    let html = if view.phase == Phase::Resolving {
        let delay = state.game.rules().mismatch_delay;
        refreshing_page_template("Memory Game", body, delay.as_secs_f64().ceil() as u64)
    } else {
        page_template("Memory Game", body)
    };
    (StatusCode::OK, Html(html.into_string()))
}

fn render_board(view: &SessionView) -> Markup {
    html! {
        div.game {
            div.status {
                span id="score" { "Score: " (view.score) }
                span id="attempts" { "Attempts: " (view.attempts) }
                span id="matched" { "Matched: " (view.matched_count) " / " (view.pair_count) }
            }
            @if view.won {
                div.won {
                    p { "You found every pair!" }
                }
            }
            div.board {
                @for card in &view.cards {
                    (render_card(card))
                }
            }
            div.controls {
                form action="/game" method="post" {
                    input id="reset" type="submit" name="action" value="Reset";
                    input id="new-game" type="submit" name="action" value="NewGame";
                }
            }
        }
    }
}

fn render_card(card: &CardView) -> Markup {
    if card.face_up {
        html! {
            div.memory-card.face-up.matched[card.matched] data-card=(card.card_id) {
                img src=(card.artwork_ref) alt=(card.display_name);
                p.name { (card.display_name) }
            }
        }
    } else {
        html! {
            form.card-form action="/game" method="post" {
                input type="hidden" name="card" value=(card.card_id);
                button.memory-card.face-down type="submit" name="action" value="Flip" data-card=(card.card_id) {
                    "?"
                }
            }
        }
    }
}

#[derive(Debug, Deserialize)]
enum GameAction {
    Flip,
    Reset,
    NewGame,
}

#[derive(Deserialize)]
pub struct GameForm {
    action: GameAction,
    card: Option<String>,
}

pub async fn post_handler(State(state): State<ServerState>, Form(form): Form<GameForm>) -> Redirect {
    match form.action {
        GameAction::Flip => match form.card {
            Some(card) => {
                state.game.flip(&CardId::from(card));
            }
            None => {
                log::error!("Flip without a card.");
            }
        },
        GameAction::Reset => {
            state.game.reset();
        }
        GameAction::NewGame => {
            if let Err(e) = state.game.deal_from(&state.api).await {
                log::error!("{e}");
            }
        }
    }
    Redirect::to("/game")
}

fn current_view(state: &ServerState) -> Reply<SessionView> {
    match state.game.view() {
        Some(view) => Ok(Json(view)),
        None => Err(error_reply(StatusCode::NOT_FOUND, "No game in progress")),
    }
}

pub async fn view_handler(State(state): State<ServerState>) -> Reply<SessionView> {
    current_view(&state)
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
pub struct FlipReply {
    outcome: &'static str,
    session: SessionView,
}

pub async fn flip_handler(
    State(state): State<ServerState>,
    Path(card): Path<String>,
) -> Reply<FlipReply> {
    let outcome = match state.game.flip(&CardId::from(card)) {
        FlipOutcome::Ignored => "ignored",
        FlipOutcome::Revealed => "revealed",
        FlipOutcome::Matched { .. } => "matched",
        FlipOutcome::Mismatched { .. } => "mismatched",
    };
    let Json(session) = current_view(&state)?;
    Ok(Json(FlipReply { outcome, session }))
}

pub async fn reset_handler(State(state): State<ServerState>) -> Reply<SessionView> {
    state.game.reset();
    current_view(&state)
}

/// Deal a new game from freshly fetched Pokémon.
pub async fn new_game_handler(State(state): State<ServerState>) -> Reply<SessionView> {
    state
        .game
        .deal_from(&state.api)
        .await
        .map_err(upstream_failure)?;
    current_view(&state)
}
