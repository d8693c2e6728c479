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

use std::time::Duration;

use axum::Router;
use axum::http::HeaderName;
use axum::http::StatusCode;
use axum::http::header::CACHE_CONTROL;
use axum::http::header::CONTENT_TYPE;
use axum::response::Html;
use axum::routing::get;
use axum::routing::post;
use tokio::net::TcpListener;
use tokio::net::TcpStream;
use tokio::time::sleep;

use crate::config::Config;
use crate::db::Database;
use crate::error::ErrorReport;
use crate::error::Fallible;
use crate::game::controller::GameController;
use crate::pokeapi::client::PokeApi;
use crate::server::game;
use crate::server::pages;
use crate::server::proxy;
use crate::server::state::ServerState;
use crate::server::story;

pub async fn start_server(config: Config, open_browser: bool) -> Fallible<()> {
    log::debug!("Opening story database at {}", config.database.display());
    let db = Database::new(
        config
            .database
            .to_str()
            .ok_or_else(|| ErrorReport::new("invalid database path"))?,
    )?;
    let api = PokeApi::new(&config.upstream)?;
    log::debug!("Using upstream {}", api.base_url());
    let game = GameController::new(config.rules, config.seed);

    let state = ServerState { api, db, game };
    let app = router(state);
    let bind = format!("0.0.0.0:{}", config.port);

    if open_browser {
        // Start a separate task to open the browser.
        let url = format!("http://localhost:{}/", config.port);
        let target = bind.clone();
        tokio::spawn(async move {
            loop {
                if let Ok(stream) = TcpStream::connect(&target).await {
                    drop(stream);
                    break;
                }
                sleep(Duration::from_millis(1)).await;
            }
            if let Err(e) = open::that(&url) {
                log::warn!("Failed to open {url}: {e}");
            }
        });
    }

    log::info!("Starting server on {bind}");
    let listener = TcpListener::bind(&bind).await?;
    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;
    log::info!("Server stopped.");
    Ok(())
}

fn router(state: ServerState) -> Router {
    let app = Router::new();
    let app = app.route("/", get(pages::index_handler));
    let app = app.route("/view/{id}", get(pages::view_handler));
    let app = app.route("/view/{id}/story", post(story::story_form));
    let app = app.route("/game", get(game::get_handler).post(game::post_handler));
    let app = app.route("/style.css", get(stylesheet));
    let app = app.route("/api/pokemon", get(proxy::featured));
    let app = app.route("/api/pokedex", get(proxy::pokedex));
    let app = app.route("/api/search", get(proxy::search));
    let app = app.route("/api/pokemon/{id}", get(proxy::pokemon));
    let app = app.route("/api/profile/{id}", get(proxy::profile));
    let app = app.route("/api/memory-game", get(proxy::memory_game));
    let app = app.route("/api/stories", get(story::list_stories));
    let app = app.route(
        "/api/story/{id}",
        get(story::get_story)
            .put(story::put_story)
            .delete(story::delete_story),
    );
    let app = app.route("/api/game", get(game::view_handler));
    let app = app.route("/api/game/flip/{card}", post(game::flip_handler));
    let app = app.route("/api/game/reset", post(game::reset_handler));
    let app = app.route("/api/game/new", post(game::new_game_handler));
    let app = app.fallback(not_found_handler);
    app.with_state(state)
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        log::error!("Failed to listen for shutdown signal: {e}");
        std::future::pending::<()>().await;
    }
    log::info!("Shutting down.");
}

async fn stylesheet() -> (StatusCode, [(HeaderName, &'static str); 2], &'static [u8]) {
    let bytes = include_bytes!("style.css");
    (
        StatusCode::OK,
        [
            (CONTENT_TYPE, "text/css"),
            (CACHE_CONTROL, "public, max-age=604800, immutable"),
        ],
        bytes,
    )
}

async fn not_found_handler() -> (StatusCode, Html<String>) {
    (StatusCode::NOT_FOUND, Html("Not Found".to_string()))
}
