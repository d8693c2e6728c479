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

use std::sync::Arc;
use std::sync::Mutex;
use std::sync::MutexGuard;
use std::sync::PoisonError;

use rand_chacha::ChaCha8Rng;
use tokio::task::JoinHandle;
use tokio::time::sleep;

use crate::error::Fallible;
use crate::game::session::FlipOutcome;
use crate::game::session::GameRules;
use crate::game::session::GameSession;
use crate::game::session::SessionView;
use crate::game::shuffle::dealer_rng;
use crate::pokeapi::listing::ListingProvider;
use crate::types::card::CardId;
use crate::types::summary::PokemonSummary;

/// The single owner of the live game session. Every mutation goes through
/// one mutex, and the controller is the only thing that schedules the delayed
/// turning-over of a mismatched pair.
#[derive(Clone)]
pub struct GameController {
    rules: GameRules,
    mutable: Arc<Mutex<ControllerState>>,
}

struct ControllerState {
    session: Option<GameSession>,
    rng: ChaCha8Rng,
    pending_clear: Option<JoinHandle<()>>,
}

impl ControllerState {
    fn cancel_pending_clear(&mut self) {
        if let Some(handle) = self.pending_clear.take() {
            log::debug!("Cancelling pending mismatch clear");
            handle.abort();
        }
    }
}

impl GameController {
    pub fn new(rules: GameRules, seed: Option<u64>) -> Self {
        Self {
            rules,
            mutable: Arc::new(Mutex::new(ControllerState {
                session: None,
                rng: dealer_rng(seed),
                pending_clear: None,
            })),
        }
    }

    pub fn rules(&self) -> &GameRules {
        &self.rules
    }

    pub fn is_loaded(&self) -> bool {
        self.acquire().session.is_some()
    }

    /// Deal a new session from `summaries`, replacing whatever was there.
    pub fn start(&self, summaries: Vec<PokemonSummary>) -> Fallible<()> {
        let mut state = self.acquire();
        let state = &mut *state;
        let session = match &state.session {
            Some(previous) => previous.restart(summaries, &mut state.rng)?,
            None => GameSession::start(summaries, &self.rules, &mut state.rng)?,
        };
        state.cancel_pending_clear();
        log::debug!(
            "Dealt {} cards (generation {})",
            session.deck().len(),
            session.generation()
        );
        state.session = Some(session);
        Ok(())
    }

    /// Deal a session only if none exists yet. Returns whether this call
    /// installed it.
    pub fn start_if_empty(&self, summaries: Vec<PokemonSummary>) -> Fallible<bool> {
        let mut state = self.acquire();
        let state = &mut *state;
        if state.session.is_some() {
            return Ok(false);
        }
        let session = GameSession::start(summaries, &self.rules, &mut state.rng)?;
        log::debug!("Dealt {} cards", session.deck().len());
        state.session = Some(session);
        Ok(true)
    }

    /// Fetch a fresh set of Pokémon and deal them, replacing any session.
    /// On failure the current session, if any, is left untouched.
    pub async fn deal_from<P: ListingProvider>(&self, provider: &P) -> Fallible<()> {
        let summaries = provider.fetch_random_pokemon_set(self.rules.pairs).await?;
        self.start(summaries)
    }

    /// Make sure a session exists, fetching Pokémon for it if needed.
    pub async fn ensure_dealt<P: ListingProvider>(&self, provider: &P) -> Fallible<()> {
        if self.is_loaded() {
            return Ok(());
        }
        let summaries = provider.fetch_random_pokemon_set(self.rules.pairs).await?;
        self.start_if_empty(summaries)?;
        Ok(())
    }

    /// Flip a card. A mismatch schedules the pair to be turned back over once
    /// the configured delay has passed. Must be called inside a tokio runtime.
    pub fn flip(&self, card_id: &CardId) -> FlipOutcome {
        let mut state = self.acquire();
        let Some(session) = state.session.as_mut() else {
            return FlipOutcome::Ignored;
        };
        let outcome = session.flip(card_id);
        match outcome {
            FlipOutcome::Ignored => {
                log::debug!("Ignored flip of {card_id}");
            }
            FlipOutcome::Revealed => {
                log::debug!("Revealed {card_id}");
            }
            FlipOutcome::Matched { identifier, won } => {
                log::debug!(
                    "Matched {identifier}: score={} attempts={}",
                    session.score(),
                    session.attempts()
                );
                if won {
                    log::info!(
                        "Game won in {} attempts with {} points",
                        session.attempts(),
                        session.score()
                    );
                }
            }
            FlipOutcome::Mismatched { generation } => {
                log::debug!("Mismatch on {card_id}: attempts={}", session.attempts());
                state.cancel_pending_clear();
                state.pending_clear = Some(self.schedule_clear(generation));
            }
        }
        outcome
    }

    fn schedule_clear(&self, generation: u64) -> JoinHandle<()> {
        let mutable = Arc::clone(&self.mutable);
        let delay = self.rules.mismatch_delay;
        tokio::spawn(async move {
            sleep(delay).await;
            let mut state = mutable.lock().unwrap_or_else(PoisonError::into_inner);
            let cleared = match state.session.as_mut() {
                Some(session) => session.clear_mismatch(generation),
                None => false,
            };
            if cleared {
                state.pending_clear = None;
                log::debug!("Turned mismatched pair face-down");
            }
        })
    }

    /// Reshuffle the current Pokémon and zero the score. Any pending clear
    /// from the previous round is cancelled. Returns false if no session has
    /// been dealt yet.
    pub fn reset(&self) -> bool {
        let mut state = self.acquire();
        let state = &mut *state;
        state.cancel_pending_clear();
        match &state.session {
            Some(session) => {
                let fresh = session.reset(&mut state.rng);
                log::debug!("Session reset (generation {})", fresh.generation());
                state.session = Some(fresh);
                true
            }
            None => false,
        }
    }

    pub fn view(&self) -> Option<SessionView> {
        self.acquire().session.as_ref().map(GameSession::view)
    }

    /// Run `f` against the current session, if any.
    #[cfg(test)]
    pub fn inspect<T>(&self, f: impl FnOnce(&GameSession) -> T) -> Option<T> {
        self.acquire().session.as_ref().map(f)
    }

    fn acquire(&self) -> MutexGuard<'_, ControllerState> {
        self.mutable.lock().unwrap_or_else(PoisonError::into_inner)
    }
}
