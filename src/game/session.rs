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

use std::collections::HashSet;
use std::time::Duration;

use rand::Rng;
use serde::Serialize;

use crate::error::Fallible;
use crate::error::fail;
use crate::game::deck::build_deck;
use crate::game::shuffle::shuffle;
use crate::types::card::Card;
use crate::types::card::CardId;
use crate::types::pokemon_id::PokemonId;
use crate::types::summary::PokemonSummary;

/// Tunable constants of the game.
#[derive(Clone, Copy, PartialEq, Eq, Debug)]
pub struct GameRules {
    /// How many distinct Pokémon are dealt (the deck holds twice as many cards).
    pub pairs: usize,
    /// Points awarded for each matched pair.
    pub match_reward: u32,
    /// How long a mismatched pair stays face-up.
    pub mismatch_delay: Duration,
}

impl Default for GameRules {
    fn default() -> Self {
        Self {
            pairs: 5,
            match_reward: 10,
            mismatch_delay: Duration::from_millis(1000),
        }
    }
}

#[derive(Clone, Copy, PartialEq, Eq, Debug, Serialize)]
pub enum Phase {
    AwaitingFirstFlip,
    AwaitingSecondFlip,
    /// Two mismatched cards are face-up, waiting to be turned back over.
    Resolving,
    Won,
}

/// What a call to [`GameSession::flip`] did.
#[derive(Clone, Copy, PartialEq, Eq, Debug)]
pub enum FlipOutcome {
    /// The flip was not allowed and nothing changed.
    Ignored,
    /// The first card of a pair was turned face-up.
    Revealed,
    Matched { identifier: PokemonId, won: bool },
    /// The pair stays face-up until [`GameSession::clear_mismatch`] is called
    /// with this generation.
    Mismatched { generation: u64 },
}

/// One playthrough of the memory game.
#[derive(Clone, Debug)]
pub struct GameSession {
    summaries: Vec<PokemonSummary>,
    deck: Vec<Card>,
    /// Face-up cards awaiting resolution, in the order they were flipped.
    flipped: Vec<Card>,
    matched: HashSet<PokemonId>,
    score: u32,
    attempts: u32,
    won: bool,
    /// Bumped every time the session is replaced, so that a delayed clear
    /// scheduled for an earlier session can recognise itself as stale.
    generation: u64,
    match_reward: u32,
}

impl GameSession {
    /// Deal a fresh, shuffled session. Fails if `summaries` is empty or
    /// contains the same Pokémon twice.
    pub fn start<R: Rng + ?Sized>(
        summaries: Vec<PokemonSummary>,
        rules: &GameRules,
        rng: &mut R,
    ) -> Fallible<Self> {
        Self::deal(summaries, rules.match_reward, 0, rng)
    }

    /// Start over with the same Pokémon, reshuffled.
    pub fn reset<R: Rng + ?Sized>(&self, rng: &mut R) -> Self {
        let deck = shuffle(&build_deck(&self.summaries), rng);
        Self {
            summaries: self.summaries.clone(),
            deck,
            flipped: Vec::new(),
            matched: HashSet::new(),
            score: 0,
            attempts: 0,
            won: false,
            generation: self.generation + 1,
            match_reward: self.match_reward,
        }
    }

    /// Start over with a different set of Pokémon.
    pub fn restart<R: Rng + ?Sized>(
        &self,
        summaries: Vec<PokemonSummary>,
        rng: &mut R,
    ) -> Fallible<Self> {
        Self::deal(summaries, self.match_reward, self.generation + 1, rng)
    }

    fn deal<R: Rng + ?Sized>(
        summaries: Vec<PokemonSummary>,
        match_reward: u32,
        generation: u64,
        rng: &mut R,
    ) -> Fallible<Self> {
        if summaries.is_empty() {
            return fail("cannot start a game without any Pokémon.");
        }
        let mut seen = HashSet::new();
        for summary in &summaries {
            if !seen.insert(summary.identifier) {
                return fail(format!(
                    "Pokémon {} was dealt more than once.",
                    summary.identifier
                ));
            }
        }
        let deck = shuffle(&build_deck(&summaries), rng);
        Ok(Self {
            summaries,
            deck,
            flipped: Vec::new(),
            matched: HashSet::new(),
            score: 0,
            attempts: 0,
            won: false,
            generation,
            match_reward,
        })
    }

    /// Turn a card face-up. Flipping a card that is already face-up, a card
    /// whose pair has been found, an unknown card, or any card while two are
    /// pending is ignored. The second card of a pair is resolved immediately.
    pub fn flip(&mut self, card_id: &CardId) -> FlipOutcome {
        if self.flipped.len() >= 2 {
            return FlipOutcome::Ignored;
        }
        if self.flipped.iter().any(|card| card.card_id() == card_id) {
            return FlipOutcome::Ignored;
        }
        let Some(card) = self.card(card_id) else {
            return FlipOutcome::Ignored;
        };
        if self.matched.contains(&card.identifier()) {
            return FlipOutcome::Ignored;
        }
        let card = card.clone();
        self.flipped.push(card);
        if self.flipped.len() < 2 {
            FlipOutcome::Revealed
        } else {
            self.resolve()
        }
    }

    fn resolve(&mut self) -> FlipOutcome {
        self.attempts += 1;
        let first = self.flipped[0].identifier();
        let second = self.flipped[1].identifier();
        if first == second {
            self.matched.insert(first);
            self.score += self.match_reward;
            self.flipped.clear();
            self.won = self.matched.len() == self.deck.len() / 2;
            FlipOutcome::Matched {
                identifier: first,
                won: self.won,
            }
        } else {
            FlipOutcome::Mismatched {
                generation: self.generation,
            }
        }
    }

    /// Turn a mismatched pair back over. Returns false, changing nothing,
    /// when the generation is stale or no mismatch is pending.
    pub fn clear_mismatch(&mut self, generation: u64) -> bool {
        if generation != self.generation || self.flipped.len() != 2 {
            return false;
        }
        self.flipped.clear();
        true
    }

    pub fn is_face_up(&self, card_id: &CardId) -> bool {
        if self.flipped.iter().any(|card| card.card_id() == card_id) {
            return true;
        }
        match self.card(card_id) {
            Some(card) => self.matched.contains(&card.identifier()),
            None => false,
        }
    }

    pub fn is_won(&self) -> bool {
        self.won
    }

    pub fn score(&self) -> u32 {
        self.score
    }

    pub fn attempts(&self) -> u32 {
        self.attempts
    }

    pub fn matched_count(&self) -> usize {
        self.matched.len()
    }

    pub fn pair_count(&self) -> usize {
        self.deck.len() / 2
    }

    pub fn generation(&self) -> u64 {
        self.generation
    }

    pub fn deck(&self) -> &[Card] {
        &self.deck
    }

    pub fn phase(&self) -> Phase {
        if self.won {
            return Phase::Won;
        }
        match self.flipped.len() {
            0 => Phase::AwaitingFirstFlip,
            1 => Phase::AwaitingSecondFlip,
            _ => Phase::Resolving,
        }
    }

    fn card(&self, card_id: &CardId) -> Option<&Card> {
        self.deck.iter().find(|card| card.card_id() == card_id)
    }

    /// A read-only projection for the presentation layer.
    pub fn view(&self) -> SessionView {
        let cards = self
            .deck
            .iter()
            .map(|card| CardView {
                card_id: card.card_id().clone(),
                identifier: card.identifier(),
                face_up: self.is_face_up(card.card_id()),
                matched: self.matched.contains(&card.identifier()),
                display_name: card.display_name().to_string(),
                artwork_ref: card.artwork_ref().to_string(),
            })
            .collect();
        SessionView {
            phase: self.phase(),
            score: self.score,
            attempts: self.attempts,
            matched_count: self.matched_count(),
            pair_count: self.pair_count(),
            won: self.is_won(),
            cards,
        }
    }
}

#[derive(Clone, Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SessionView {
    pub phase: Phase,
    pub score: u32,
    pub attempts: u32,
    pub matched_count: usize,
    pub pair_count: usize,
    pub won: bool,
    pub cards: Vec<CardView>,
}

/// A card as the board shows it. Name and artwork are always included; the
/// board decides whether to draw them.
#[derive(Clone, Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CardView {
    pub card_id: CardId,
    pub identifier: PokemonId,
    pub face_up: bool,
    pub matched: bool,
    pub display_name: String,
    pub artwork_ref: String,
}
