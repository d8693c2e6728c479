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

use percent_encoding::AsciiSet;
use percent_encoding::CONTROLS;
use percent_encoding::utf8_percent_encode;
use serde::de::DeserializeOwned;

use crate::error::Fallible;
use crate::error::fail;
use crate::pokeapi::models::EvolutionChain;
use crate::pokeapi::models::NamedResourceList;
use crate::pokeapi::models::Pokemon;
use crate::pokeapi::models::Species;
use crate::pokeapi::models::TypeInfo;
use crate::types::pokemon_id::PokemonId;

pub const DEFAULT_UPSTREAM: &str = "https://pokeapi.co/api/v2";

/// Characters escaped when a user-supplied value is placed in a URL path.
const PATH_SEGMENT: &AsciiSet = &CONTROLS
    .add(b' ')
    .add(b'"')
    .add(b'#')
    .add(b'%')
    .add(b'/')
    .add(b'<')
    .add(b'>')
    .add(b'?')
    .add(b'`')
    .add(b'{')
    .add(b'}');

/// A client for the PokéAPI, or anything that serves the same paths.
#[derive(Clone)]
pub struct PokeApi {
    base_url: String,
    http: reqwest::Client,
}

impl PokeApi {
    pub fn new(base_url: &str) -> Fallible<Self> {
        let http = reqwest::Client::builder()
            .user_agent(concat!("pokememo/", env!("CARGO_PKG_VERSION")))
            .timeout(Duration::from_secs(20))
            .build()?;
        Ok(Self {
            base_url: base_url.trim_end_matches('/').to_string(),
            http,
        })
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    fn endpoint(&self, resource: &str, key: &str) -> String {
        let key = utf8_percent_encode(key, PATH_SEGMENT);
        format!("{}/{resource}/{key}", self.base_url)
    }

    async fn get_json<T: DeserializeOwned>(&self, url: &str) -> Fallible<T> {
        log::debug!("GET {url}");
        let response = self.http.get(url).send().await?;
        let status = response.status();
        if !status.is_success() {
            return fail(format!("upstream returned {status} for {url}"));
        }
        let bytes = response.bytes().await?;
        Ok(serde_json::from_slice(&bytes)?)
    }

    /// One page of the Pokémon listing.
    pub async fn list(&self, limit: u32, offset: u32) -> Fallible<NamedResourceList> {
        let url = format!(
            "{}/pokemon?limit={limit}&offset={offset}",
            self.base_url
        );
        self.get_json(&url).await
    }

    /// How many Pokémon upstream knows about.
    pub async fn count(&self) -> Fallible<u32> {
        Ok(self.list(1, 0).await?.count)
    }

    /// A Pokémon by number or by name.
    pub async fn pokemon(&self, key: &str) -> Fallible<Pokemon> {
        self.get_json(&self.endpoint("pokemon", key)).await
    }

    /// A Pokémon exactly as upstream describes it.
    pub async fn pokemon_raw(&self, key: &str) -> Fallible<serde_json::Value> {
        self.get_json(&self.endpoint("pokemon", key)).await
    }

    pub async fn species(&self, id: PokemonId) -> Fallible<Species> {
        self.get_json(&self.endpoint("pokemon-species", &id.to_string()))
            .await
    }

    pub async fn type_info(&self, name: &str) -> Fallible<TypeInfo> {
        self.get_json(&self.endpoint("type", name)).await
    }

    pub async fn evolution_chain(&self, id: u32) -> Fallible<EvolutionChain> {
        self.get_json(&self.endpoint("evolution-chain", &id.to_string()))
            .await
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_endpoint() -> Fallible<()> {
        let api = PokeApi::new("http://localhost:1234/api/v2/")?;
        assert_eq!(api.base_url(), "http://localhost:1234/api/v2");
        assert_eq!(
            api.endpoint("pokemon", "25"),
            "http://localhost:1234/api/v2/pokemon/25"
        );
        assert_eq!(
            api.endpoint("pokemon", "mr mime/../x"),
            "http://localhost:1234/api/v2/pokemon/mr%20mime%2F..%2Fx"
        );
        Ok(())
    }

    #[tokio::test]
    async fn test_unreachable_upstream() -> Fallible<()> {
        let port = portpicker::pick_unused_port().expect("no free port");
        let api = PokeApi::new(&format!("http://127.0.0.1:{port}"))?;
        assert!(api.count().await.is_err());
        Ok(())
    }
}
