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

//! Story CRUD, as JSON and as the form on the profile page.

use axum::Form;
use axum::Json;
use axum::extract::Path;
use axum::extract::State;
use axum::http::StatusCode;
use axum::response::Redirect;
use serde::Deserialize;

use crate::db::Story;
use crate::error::Fallible;
use crate::server::reply::ErrorBody;
use crate::server::reply::Reply;
use crate::server::reply::database_failure;
use crate::server::reply::error_reply;
use crate::server::state::ServerState;
use crate::types::pokemon_id::PokemonId;
use crate::types::timestamp::Timestamp;

fn parse_id(raw: &str) -> Result<PokemonId, (StatusCode, Json<ErrorBody>)> {
    raw.parse()
        .map_err(|_| error_reply(StatusCode::BAD_REQUEST, "Invalid Pokemon id"))
}

pub async fn list_stories(State(state): State<ServerState>) -> Reply<Vec<Story>> {
    let stories = state.db.list_stories().map_err(database_failure)?;
    Ok(Json(stories))
}

pub async fn get_story(
    State(state): State<ServerState>,
    Path(raw): Path<String>,
) -> Reply<Story> {
    let id = parse_id(&raw)?;
    match state.db.get_story(id).map_err(database_failure)? {
        Some(story) => Ok(Json(story)),
        None => Err(error_reply(StatusCode::NOT_FOUND, "No story for this Pokemon")),
    }
}

#[derive(Deserialize)]
pub struct StoryBody {
    story: String,
}

pub async fn put_story(
    State(state): State<ServerState>,
    Path(raw): Path<String>,
    Json(body): Json<StoryBody>,
) -> Reply<Story> {
    let id = parse_id(&raw)?;
    let text = body.story.trim();
    if text.is_empty() {
        return Err(error_reply(StatusCode::BAD_REQUEST, "Story must not be empty"));
    }
    let story = state
        .db
        .set_story(id, text, Timestamp::now())
        .map_err(database_failure)?;
    Ok(Json(story))
}

pub async fn delete_story(
    State(state): State<ServerState>,
    Path(raw): Path<String>,
) -> Result<StatusCode, (StatusCode, Json<ErrorBody>)> {
    let id = parse_id(&raw)?;
    if state.db.delete_story(id).map_err(database_failure)? {
        Ok(StatusCode::NO_CONTENT)
    } else {
        Err(error_reply(StatusCode::NOT_FOUND, "No story for this Pokemon"))
    }
}

#[derive(Debug, Deserialize)]
enum StoryAction {
    Save,
    Delete,
}

#[derive(Deserialize)]
pub struct StoryForm {
    action: StoryAction,
    #[serde(default)]
    story: String,
}

pub async fn story_form(
    State(state): State<ServerState>,
    Path(raw): Path<String>,
    Form(form): Form<StoryForm>,
) -> Redirect {
    let id: PokemonId = match raw.parse() {
        Ok(id) => id,
        Err(e) => {
            log::error!("{e}");
            return Redirect::to("/");
        }
    };
    match story_form_handler(&state, id, form) {
        Ok(_) => {}
        Err(e) => {
            log::error!("{e}");
        }
    }
    Redirect::to(&format!("/view/{id}"))
}

fn story_form_handler(state: &ServerState, id: PokemonId, form: StoryForm) -> Fallible<()> {
    match form.action {
        StoryAction::Save => {
            let text = form.story.trim();
            if text.is_empty() {
                state.db.delete_story(id)?;
            } else {
                state.db.set_story(id, text, Timestamp::now())?;
            }
        }
        StoryAction::Delete => {
            state.db.delete_story(id)?;
        }
    }
    Ok(())
}
