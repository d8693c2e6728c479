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

//! A stand-in for PokéAPI serving six Pokémon from two evolution lines.

use axum::Json;
use axum::Router;
use axum::extract::Path;
use axum::extract::Query;
use axum::http::StatusCode;
use axum::routing::get;
use serde::Deserialize;
use serde_json::Value;
use serde_json::json;
use tokio::net::TcpListener;

use crate::error::Fallible;

const RESOURCE_ROOT: &str = "https://pokeapi.co/api/v2";

struct Fixture {
    id: u32,
    name: &'static str,
    jp_name: &'static str,
    types: &'static [&'static str],
    height: u32,
    weight: u32,
    chain: u32,
}

static FIXTURES: [Fixture; 6] = [
    Fixture {
        id: 1,
        name: "bulbasaur",
        jp_name: "フシギダネ",
        types: &["grass", "poison"],
        height: 7,
        weight: 69,
        chain: 1,
    },
    Fixture {
        id: 2,
        name: "ivysaur",
        jp_name: "フシギソウ",
        types: &["grass", "poison"],
        height: 10,
        weight: 130,
        chain: 1,
    },
    Fixture {
        id: 3,
        name: "venusaur",
        jp_name: "フシギバナ",
        types: &["grass", "poison"],
        height: 20,
        weight: 1000,
        chain: 1,
    },
    Fixture {
        id: 4,
        name: "charmander",
        jp_name: "ヒトカゲ",
        types: &["fire"],
        height: 6,
        weight: 85,
        chain: 2,
    },
    Fixture {
        id: 5,
        name: "charmeleon",
        jp_name: "リザード",
        types: &["fire"],
        height: 11,
        weight: 190,
        chain: 2,
    },
    Fixture {
        id: 6,
        name: "charizard",
        jp_name: "リザードン",
        types: &["fire", "flying"],
        height: 17,
        weight: 905,
        chain: 2,
    },
];

/// Serve the fake upstream on an ephemeral port and return its base URL.
pub async fn spawn_upstream() -> Fallible<String> {
    let app = Router::new()
        .route("/pokemon", get(list))
        .route("/pokemon/{key}", get(pokemon))
        .route("/pokemon-species/{key}", get(species))
        .route("/type/{name}", get(type_info))
        .route("/evolution-chain/{id}", get(evolution_chain));
    let listener = TcpListener::bind("127.0.0.1:0").await?;
    let addr = listener.local_addr()?;
    tokio::spawn(async move { axum::serve(listener, app).await });
    Ok(format!("http://{addr}"))
}

fn find(key: &str) -> Result<&'static Fixture, StatusCode> {
    FIXTURES
        .iter()
        .find(|f| f.name == key || f.id.to_string() == key)
        .ok_or(StatusCode::NOT_FOUND)
}

fn resource(kind: &str, name: &str, id: u32) -> Value {
    json!({"name": name, "url": format!("{RESOURCE_ROOT}/{kind}/{id}/")})
}

fn english(field: &str, value: String) -> Value {
    json!({field: value, "language": {"name": "en", "url": "u"}})
}

#[derive(Deserialize)]
struct ListQuery {
    limit: usize,
    offset: usize,
}

async fn list(Query(query): Query<ListQuery>) -> Json<Value> {
    let results: Vec<Value> = FIXTURES
        .iter()
        .skip(query.offset)
        .take(query.limit)
        .map(|f| resource("pokemon", f.name, f.id))
        .collect();
    let next = query.offset + query.limit < FIXTURES.len();
    let previous = query.offset > 0;
    Json(json!({
        "count": FIXTURES.len(),
        "next": next.then(|| format!("{RESOURCE_ROOT}/pokemon?offset={}", query.offset + query.limit)),
        "previous": previous.then(|| format!("{RESOURCE_ROOT}/pokemon?offset=0")),
        "results": results,
    }))
}

async fn pokemon(Path(key): Path<String>) -> Result<Json<Value>, StatusCode> {
    let f = find(&key)?;
    let types: Vec<Value> = f
        .types
        .iter()
        .enumerate()
        .map(|(i, t)| json!({"slot": i + 1, "type": {"name": t, "url": "u"}}))
        .collect();
    Ok(Json(json!({
        "id": f.id,
        "name": f.name,
        "height": f.height,
        "weight": f.weight,
        "sprites": {
            "front_default": format!("https://img.example/sprite/{}.png", f.id),
            "other": {
                "official-artwork": {"front_default": format!("https://img.example/art/{}.png", f.id)}
            }
        },
        "types": types,
        "abilities": [{"ability": {"name": "overgrow", "url": "u"}}],
        "stats": [
            {"base_stat": 45 + f.id, "stat": {"name": "hp", "url": "u"}},
            {"base_stat": 50 + f.id, "stat": {"name": "speed", "url": "u"}}
        ],
        "species": resource("pokemon-species", f.name, f.id),
    })))
}

async fn species(Path(key): Path<String>) -> Result<Json<Value>, StatusCode> {
    let f = find(&key)?;
    Ok(Json(json!({
        "id": f.id,
        "names": [
            {"name": f.jp_name, "language": {"name": "ja-Hrkt", "url": "u"}},
            english("name", f.name.to_string()),
        ],
        "genera": [english("genus", "Test Pokémon".to_string())],
        "gender_rate": 1,
        "habitat": {"name": "grassland", "url": "u"},
        "generation": {"name": "generation-i", "url": "u"},
        "evolution_chain": {"url": format!("{RESOURCE_ROOT}/evolution-chain/{}/", f.chain)},
        "flavor_text_entries": [english("flavor_text", format!("{} lives\u{c}in the wild.", f.name))],
    })))
}

async fn type_info(Path(name): Path<String>) -> Result<Json<Value>, StatusCode> {
    let (double, half): (&[&str], &[&str]) = match name.as_str() {
        "grass" => (&["fire", "ice", "flying", "psychic"], &["water", "grass"]),
        "poison" => (&["ground", "psychic"], &["grass", "poison"]),
        "fire" => (&["water", "ground", "rock"], &["fire", "grass"]),
        "flying" => (&["electric", "ice", "rock"], &["grass", "bug"]),
        _ => return Err(StatusCode::NOT_FOUND),
    };
    Ok(Json(json!({
        "name": name,
        "damage_relations": {
            "double_damage_from": relation(double),
            "half_damage_from": relation(half),
        }
    })))
}

fn relation(types: &[&str]) -> Vec<Value> {
    types.iter().map(|t| json!({"name": t, "url": "u"})).collect()
}

async fn evolution_chain(Path(id): Path<u32>) -> Result<Json<Value>, StatusCode> {
    let members: Vec<&Fixture> = FIXTURES.iter().filter(|f| f.chain == id).collect();
    if members.is_empty() {
        return Err(StatusCode::NOT_FOUND);
    }
    let mut link = Value::Null;
    for f in members.iter().rev() {
        let evolves_to = if link.is_null() { json!([]) } else { json!([link]) };
        link = json!({
            "species": resource("pokemon-species", f.name, f.id),
            "evolves_to": evolves_to,
        });
    }
    Ok(Json(json!({"id": id, "chain": link})))
}
