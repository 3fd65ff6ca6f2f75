//! Game aggregate - one playthrough from setup to reveal
//!
//! # Phases
//!
//! ```text
//! Setup -> Welcome -> Playing <-> Thinking -> Reveal
//! ```
//!
//! `Playing <-> Thinking` repeats once per round per player. Any phase can
//! go back to `Setup` through `reset_game`.
//!
//! # Rustic DDD Design
//!
//! - **Private fields**: the roster, cursors and inventory only change
//!   through the operations below
//! - **Errors never mutate**: every guard runs before the first write
//! - **Injected effects**: randomness and the clock come in as arguments

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::conversation::{generate_thinking, ThinkingContext};
use crate::entities::{AiInteraction, EnhancedAiResponse, Inventory, Player, Round};
use crate::error::DomainError;
use crate::ids::{PlayerId, SessionId};
use crate::personality::{resolve_personality, IceCreamPersonality};
use crate::random::RandomSource;
use crate::value_objects::{FlavorTag, PlayerName, Selection};

/// Where the game currently is
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum GamePhase {
    Setup,
    Welcome,
    Playing,
    Thinking,
    Reveal,
}

impl GamePhase {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Setup => "setup",
            Self::Welcome => "welcome",
            Self::Playing => "playing",
            Self::Thinking => "thinking",
            Self::Reveal => "reveal",
        }
    }
}

impl std::fmt::Display for GamePhase {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Table rules for a game
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct GameRules {
    pub max_players: usize,
    pub rounds_per_player: usize,
    /// Per-player budget. `None` means unlimited.
    #[serde(default)]
    pub spending_limit: Option<f64>,
}

impl Default for GameRules {
    fn default() -> Self {
        Self {
            max_players: 4,
            rounds_per_player: 4,
            spending_limit: None,
        }
    }
}

/// Serializable copy of everything a game needs to resume.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GameSnapshot {
    pub phase: GamePhase,
    pub rules: GameRules,
    pub players: Vec<Player>,
    pub current_player_index: usize,
    pub current_round_index: usize,
    #[serde(default)]
    pub session_id: Option<SessionId>,
    /// Personalities fixed at the first reveal, in roster order
    #[serde(default)]
    pub revealed: Vec<(PlayerId, IceCreamPersonality)>,
    #[serde(default)]
    pub results_reported: bool,
}

/// The game state machine
#[derive(Debug, Clone)]
pub struct Game {
    phase: GamePhase,
    rules: GameRules,
    rounds: Vec<Round>,
    players: Vec<Player>,
    inventory: Inventory,
    current_player_index: usize,
    current_round_index: usize,
    session_id: Option<SessionId>,
    revealed: Vec<(PlayerId, IceCreamPersonality)>,
    results_reported: bool,
}

impl Game {
    pub fn new(rules: GameRules, inventory: Inventory) -> Self {
        let mut rounds = Round::standard_rounds();
        rounds.truncate(rules.rounds_per_player);
        Self {
            phase: GamePhase::Setup,
            rules,
            rounds,
            players: Vec::new(),
            inventory,
            current_player_index: 0,
            current_round_index: 0,
            session_id: None,
            revealed: Vec::new(),
            results_reported: false,
        }
    }

    // =========================================================================
    // Accessors
    // =========================================================================

    pub fn phase(&self) -> GamePhase {
        self.phase
    }

    pub fn rules(&self) -> &GameRules {
        &self.rules
    }

    pub fn rounds(&self) -> &[Round] {
        &self.rounds
    }

    pub fn players(&self) -> &[Player] {
        &self.players
    }

    pub fn inventory(&self) -> &Inventory {
        &self.inventory
    }

    pub fn session_id(&self) -> Option<&SessionId> {
        self.session_id.as_ref()
    }

    /// Whether the reveal has already been sent to the backend
    pub fn results_reported(&self) -> bool {
        self.results_reported
    }

    pub fn current_player_index(&self) -> usize {
        self.current_player_index
    }

    pub fn current_round_index(&self) -> usize {
        self.current_round_index
    }

    /// The player whose turn it is. `None` before players are submitted.
    pub fn current_player(&self) -> Option<&Player> {
        self.players.get(self.current_player_index)
    }

    pub fn current_round(&self) -> Option<&Round> {
        self.rounds.get(self.current_round_index)
    }

    pub fn player(&self, id: PlayerId) -> Option<&Player> {
        self.players.iter().find(|p| p.id == id)
    }

    // =========================================================================
    // Transitions
    // =========================================================================

    /// Register the roster. Blank names are dropped.
    ///
    /// # Errors
    ///
    /// - `InvalidStateTransition` outside `Setup`
    /// - `Validation` for no names, too many names, or a name over 50 chars
    pub fn submit_players<S: AsRef<str>>(&mut self, names: &[S]) -> Result<(), DomainError> {
        self.require_phase(GamePhase::Setup, "submit players")?;

        let names = names
            .iter()
            .map(AsRef::as_ref)
            .filter(|name| !name.trim().is_empty())
            .map(PlayerName::new)
            .collect::<Result<Vec<_>, _>>()?;

        if names.is_empty() {
            return Err(DomainError::validation("At least one player is required"));
        }
        if names.len() > self.rules.max_players {
            return Err(DomainError::validation(format!(
                "At most {} players can join a game",
                self.rules.max_players
            )));
        }

        self.players = names.into_iter().map(Player::new).collect();
        self.current_player_index = 0;
        self.current_round_index = 0;
        self.phase = GamePhase::Welcome;
        Ok(())
    }

    pub fn start_game(&mut self) -> Result<(), DomainError> {
        self.require_phase(GamePhase::Welcome, "start the game")?;
        self.current_player_index = 0;
        self.current_round_index = 0;
        self.phase = GamePhase::Playing;
        Ok(())
    }

    /// Check whether `tag` may be chosen right now and return its price.
    ///
    /// Shared by `select_choice` and callers that want to refuse a choice
    /// before contacting the backend.
    pub fn check_choice(&self, tag: FlavorTag) -> Result<f64, DomainError> {
        self.require_phase(GamePhase::Playing, "make a selection")?;
        let round = self
            .current_round()
            .ok_or_else(|| DomainError::invalid_state_transition("No round in progress"))?;
        if !round.offers(tag) {
            return Err(DomainError::validation(format!(
                "{} is not a choice in the {} round",
                tag, round.stage
            )));
        }

        if self.inventory.available(tag) == 0 {
            return Err(DomainError::out_of_stock(tag));
        }

        let price = self.inventory.price(tag);
        if let Some(limit) = self.rules.spending_limit {
            let current = self.current_player().map(|p| p.total_cost).unwrap_or(0.0);
            let needed = current + price;
            if needed > limit {
                return Err(DomainError::insufficient_funds(needed, limit));
            }
        }
        Ok(price)
    }

    /// Record a flavor pick for the current player and move to `Thinking`.
    ///
    /// Inventory is not touched; stock only changes when the backend
    /// reports a new quantity.
    pub fn select_choice(
        &mut self,
        tag: FlavorTag,
        enhanced: Option<EnhancedAiResponse>,
        rng: &mut dyn RandomSource,
        now: DateTime<Utc>,
    ) -> Result<AiInteraction, DomainError> {
        let price = self.check_choice(tag)?;
        let interaction = self.record(Selection::Flavor(tag), enhanced, rng, now)?;
        if let Some(player) = self.players.get_mut(self.current_player_index) {
            player.total_cost += price;
        }
        Ok(interaction)
    }

    /// Decline the current round. No cost change.
    pub fn skip_round(
        &mut self,
        rng: &mut dyn RandomSource,
        now: DateTime<Utc>,
    ) -> Result<AiInteraction, DomainError> {
        self.require_phase(GamePhase::Playing, "skip a round")?;
        self.record(Selection::Skip, None, rng, now)
    }

    /// Leave `Thinking`: next round, next player, or the reveal.
    pub fn advance(&mut self) -> Result<GamePhase, DomainError> {
        self.require_phase(GamePhase::Thinking, "advance")?;
        if self.current_round_index + 1 < self.rounds.len() {
            self.current_round_index += 1;
            self.phase = GamePhase::Playing;
        } else if self.current_player_index + 1 < self.players.len() {
            self.current_player_index += 1;
            self.current_round_index = 0;
            self.phase = GamePhase::Playing;
        } else {
            self.phase = GamePhase::Reveal;
        }
        Ok(self.phase)
    }

    /// Back to an empty `Setup`. Allowed from any phase.
    ///
    /// `inventory` replaces the projection when given; otherwise the current
    /// projection is kept.
    pub fn reset_game(&mut self, inventory: Option<Inventory>) {
        self.players.clear();
        self.current_player_index = 0;
        self.current_round_index = 0;
        self.session_id = None;
        self.revealed.clear();
        self.results_reported = false;
        self.phase = GamePhase::Setup;
        if let Some(inventory) = inventory {
            self.inventory = inventory;
        }
    }

    // =========================================================================
    // Backend-driven updates
    // =========================================================================

    pub fn set_session(&mut self, session_id: SessionId) {
        self.session_id = Some(session_id);
    }

    /// Overwrite a player's total with the backend's figure.
    pub fn apply_authoritative_cost(
        &mut self,
        player_id: PlayerId,
        cost: f64,
    ) -> Result<(), DomainError> {
        if !cost.is_finite() || cost < 0.0 {
            return Err(DomainError::validation(format!("Invalid cost: {}", cost)));
        }
        self.player_mut(player_id)?.total_cost = cost;
        Ok(())
    }

    pub fn set_generated_image(
        &mut self,
        player_id: PlayerId,
        url: impl Into<String>,
    ) -> Result<(), DomainError> {
        self.player_mut(player_id)?.generated_image_url = Some(url.into());
        Ok(())
    }

    pub fn apply_server_quantity(&mut self, tag: FlavorTag, available: u32) {
        self.inventory.apply_server_quantity(tag, available);
    }

    pub fn replace_inventory(&mut self, inventory: Inventory) {
        self.inventory = inventory;
    }

    /// Resolve each player's personality, in roster order.
    pub fn personalities(
        &self,
        rng: &mut dyn RandomSource,
    ) -> Vec<(PlayerId, IceCreamPersonality)> {
        self.players
            .iter()
            .map(|p| (p.id, resolve_personality(&p.selections, rng)))
            .collect()
    }

    /// Personalities for the reveal. Resolved once, then replayed, so a
    /// resumed reveal shows the same result.
    pub fn settle_personalities(
        &mut self,
        rng: &mut dyn RandomSource,
    ) -> Result<Vec<(PlayerId, IceCreamPersonality)>, DomainError> {
        self.require_phase(GamePhase::Reveal, "reveal personalities")?;
        if self.revealed.is_empty() {
            self.revealed = self.personalities(rng);
        }
        Ok(self.revealed.clone())
    }

    pub fn mark_results_reported(&mut self) -> Result<(), DomainError> {
        self.require_phase(GamePhase::Reveal, "report results")?;
        self.results_reported = true;
        Ok(())
    }

    // =========================================================================
    // Snapshots
    // =========================================================================

    pub fn snapshot(&self) -> GameSnapshot {
        GameSnapshot {
            phase: self.phase,
            rules: self.rules,
            players: self.players.clone(),
            current_player_index: self.current_player_index,
            current_round_index: self.current_round_index,
            session_id: self.session_id.clone(),
            revealed: self.revealed.clone(),
            results_reported: self.results_reported,
        }
    }

    /// Rebuild a game from a snapshot, rejecting snapshots that break the
    /// roster or cursor invariants.
    pub fn restore(snapshot: GameSnapshot, inventory: Inventory) -> Result<Self, DomainError> {
        let GameSnapshot {
            phase,
            rules,
            players,
            current_player_index,
            current_round_index,
            session_id,
            revealed,
            results_reported,
        } = snapshot;

        let mut game = Game::new(rules, inventory);
        let rounds = game.rounds.len();

        match phase {
            GamePhase::Setup if !players.is_empty() => {
                return Err(DomainError::validation("Setup snapshot cannot hold players"));
            }
            GamePhase::Setup => {}
            _ if players.is_empty() => {
                return Err(DomainError::validation(format!(
                    "{} snapshot has no players",
                    phase
                )));
            }
            _ => {}
        }
        if players.len() > rules.max_players {
            return Err(DomainError::validation("Snapshot exceeds max players"));
        }
        if !players.is_empty() && current_player_index >= players.len() {
            return Err(DomainError::validation("Player cursor out of range"));
        }
        if current_round_index >= rounds.max(1) {
            return Err(DomainError::validation("Round cursor out of range"));
        }
        if phase != GamePhase::Reveal && (results_reported || !revealed.is_empty()) {
            return Err(DomainError::validation(format!(
                "{} snapshot cannot carry reveal results",
                phase
            )));
        }
        if let Some((id, _)) = revealed
            .iter()
            .find(|(id, _)| !players.iter().any(|p| p.id == *id))
        {
            return Err(DomainError::not_found("Player", id.to_string()));
        }
        if let Some(player) = players.iter().find(|p| p.selections.len() > rounds) {
            return Err(DomainError::validation(format!(
                "{} has more selections than rounds",
                player.name
            )));
        }

        game.phase = phase;
        game.players = players;
        game.current_player_index = current_player_index;
        game.current_round_index = current_round_index;
        game.session_id = session_id;
        game.revealed = revealed;
        game.results_reported = results_reported;
        Ok(game)
    }

    // =========================================================================
    // Internals
    // =========================================================================

    fn require_phase(&self, expected: GamePhase, action: &str) -> Result<(), DomainError> {
        if self.phase != expected {
            return Err(DomainError::invalid_state_transition(format!(
                "Cannot {} during {} (expected {})",
                action, self.phase, expected
            )));
        }
        Ok(())
    }

    fn player_mut(&mut self, id: PlayerId) -> Result<&mut Player, DomainError> {
        self.players
            .iter_mut()
            .find(|p| p.id == id)
            .ok_or_else(|| DomainError::not_found("Player", id.to_string()))
    }

    /// Append the selection and its commentary, then enter `Thinking`.
    fn record(
        &mut self,
        selection: Selection,
        enhanced: Option<EnhancedAiResponse>,
        rng: &mut dyn RandomSource,
        now: DateTime<Utc>,
    ) -> Result<AiInteraction, DomainError> {
        let round = self.current_round_index as u8 + 1;
        let rounds = self.rounds.len();
        let player = self
            .players
            .get_mut(self.current_player_index)
            .ok_or_else(|| DomainError::invalid_state_transition("No current player"))?;
        if player.selections.len() >= rounds {
            return Err(DomainError::invalid_state_transition(format!(
                "{} has already finished every round",
                player.name
            )));
        }

        let script = generate_thinking(
            &ThinkingContext {
                player_name: player.name.as_str(),
                selection,
                history: &player.selections,
            },
            rng,
        );
        let interaction = AiInteraction {
            selection,
            ai_thought: script.thought,
            ai_emoji: script.emoji,
            ai_steps: script.steps,
            round,
            timestamp: now,
            enhanced_ai_response: enhanced,
        };

        player.selections.push(selection);
        player.ai_interactions.push(interaction.clone());
        self.phase = GamePhase::Thinking;
        Ok(interaction)
    }
}
