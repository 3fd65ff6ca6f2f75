//! Game Service - orchestrates one playthrough against the backend
//!
//! Owns the `Game` aggregate and every effect around it: backend calls,
//! randomness, the clock, persistence and the image poller. The domain
//! decides what is allowed; this service decides what to ask the backend
//! and how to degrade when it does not answer.
//!
//! Backend failures never end the game. They surface as warning toasts and
//! the game continues on local data.

use std::collections::{HashMap, VecDeque};
use std::sync::Arc;
use std::time::Duration;

use serde_json::json;
use stampalooza_domain::{
    AiInteraction, DomainError, EnhancedAiResponse, FlavorTag, Game, GamePhase, GameRules,
    IceCreamPersonality, Player, PlayerId, RandomSource, Selection, SessionId,
};
use stampalooza_shared::{
    CostValidationRequest, FinalRevealRequest, GameResultsRequest, InventoryUpdateRequest, PlayerGameRequest, ProcessingConfig, RealTimePricingRequest,
    SessionCreateRequest, SuggestionsRequest, GAME_VERSION,
};
use tokio_util::sync::CancellationToken;

use crate::application::api::Api;
use crate::application::services::image_generation::{
    GenerationState, ImageGenerationPoller, ImageTrigger, PollPolicy,
};
use crate::application::services::inventory_service::{
    load_inventory, InventoryCatalog, InventorySource,
};
use crate::ports::outbound::{ClockPort, PersistedGame, SnapshotStorePort};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ToastLevel {
    Info,
    Warning,
    Error,
}

/// Transient notification for the player
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Toast {
    pub level: ToastLevel,
    pub message: String,
}

/// Tunables supplied by configuration
#[derive(Debug, Clone, PartialEq)]
pub struct GameSettings {
    /// How long the "thinking" screen stays up after each round
    pub thinking_delay: Duration,
    /// Shown when no generated image is available
    pub fallback_image: String,
    pub generate_images: bool,
    pub image_policy: PollPolicy,
    pub spending_limit: Option<f64>,
}

impl Default for GameSettings {
    fn default() -> Self {
        Self {
            thinking_delay: Duration::from_millis(2500),
            fallback_image: "/images/fallback-ice-cream.png".to_string(),
            generate_images: true,
            image_policy: PollPolicy::status_polling(),
            spending_limit: None,
        }
    }
}

/// Everything the reveal screen shows for one player
#[derive(Debug, Clone, PartialEq)]
pub struct PlayerReveal {
    pub player_id: PlayerId,
    pub name: String,
    pub selections: Vec<Selection>,
    pub personality: IceCreamPersonality,
    pub total_cost: f64,
    pub image_url: String,
    /// The backend's best guess at a real ice cream
    pub suggestion: Option<String>,
}

pub struct GameService {
    game: Game,
    api: Api,
    poller: ImageGenerationPoller,
    store: Arc<dyn SnapshotStorePort>,
    clock: Arc<dyn ClockPort>,
    rng: Box<dyn RandomSource + Send>,
    catalog: InventoryCatalog,
    settings: GameSettings,
    toasts: VecDeque<Toast>,
    cancel: CancellationToken,
    images: HashMap<PlayerId, GenerationState>,
}

impl GameService {
    /// Fresh game on the fallback inventory. No backend calls.
    pub fn new(
        api: Api,
        store: Arc<dyn SnapshotStorePort>,
        clock: Arc<dyn ClockPort>,
        rng: Box<dyn RandomSource + Send>,
        settings: GameSettings,
    ) -> Self {
        let catalog = InventoryCatalog::fallback();
        let game = Game::new(rules_for(&settings), catalog.inventory.clone());
        let poller = ImageGenerationPoller::new(api.clone(), settings.image_policy);
        Self {
            game,
            api,
            poller,
            store,
            clock,
            rng,
            catalog,
            settings,
            toasts: VecDeque::new(),
            cancel: CancellationToken::new(),
            images: HashMap::new(),
        }
    }

    /// Load inventory and resume a persisted game when one exists.
    pub async fn boot(
        api: Api,
        store: Arc<dyn SnapshotStorePort>,
        clock: Arc<dyn ClockPort>,
        rng: Box<dyn RandomSource + Send>,
        settings: GameSettings,
    ) -> Self {
        let mut service = Self::new(api, store, clock, rng, settings);
        service.catalog = load_inventory(&service.api).await;
        if service.catalog.source == InventorySource::Fallback {
            service.toast(
                ToastLevel::Warning,
                "Backend unavailable, using the offline inventory",
            );
        }
        service
            .game
            .replace_inventory(service.catalog.inventory.clone());

        match service.store.load() {
            Ok(Some(persisted)) => service.resume(persisted),
            Ok(None) => {}
            Err(e) => tracing::warn!(error = %e, "Failed to load saved game, starting fresh"),
        }
        service
    }

    fn resume(&mut self, persisted: PersistedGame) {
        // A live backend projection beats the saved one
        let inventory = match self.catalog.source {
            InventorySource::Backend => self.catalog.inventory.clone(),
            InventorySource::Fallback => persisted.inventory,
        };
        match Game::restore(persisted.game, inventory) {
            Ok(game) => {
                tracing::info!(
                    phase = %game.phase(),
                    players = game.players().len(),
                    "Resumed saved game"
                );
                self.game = game;
            }
            Err(e) => {
                tracing::warn!(error = %e, "Saved game is inconsistent, discarding it");
                if let Err(e) = self.store.clear() {
                    tracing::warn!(error = %e, "Failed to clear saved game");
                }
            }
        }
    }

    // =========================================================================
    // Accessors
    // =========================================================================

    pub fn game(&self) -> &Game {
        &self.game
    }

    pub fn catalog(&self) -> &InventoryCatalog {
        &self.catalog
    }

    pub fn settings(&self) -> &GameSettings {
        &self.settings
    }

    pub fn image_state(&self, player_id: PlayerId) -> GenerationState {
        self.images
            .get(&player_id)
            .cloned()
            .unwrap_or(GenerationState::Idle)
    }

    /// Take every pending toast, oldest first
    pub fn drain_toasts(&mut self) -> Vec<Toast> {
        self.toasts.drain(..).collect()
    }

    // =========================================================================
    // Setup
    // =========================================================================

    pub fn submit_players<S: AsRef<str>>(&mut self, names: &[S]) -> Result<(), DomainError> {
        self.game.submit_players(names).map_err(|e| self.reject(e))?;
        tracing::info!(players = self.game.players().len(), "Players registered");
        self.persist();
        Ok(())
    }

    /// Start play and open a backend session. A failed session leaves the
    /// game running without a session id.
    pub async fn start_game(&mut self) -> Result<(), DomainError> {
        self.game.start_game().map_err(|e| self.reject(e))?;

        let request = SessionCreateRequest::new(self.game.players().to_vec(), GAME_VERSION);
        match self.api.create_session(&request).await {
            Ok(response) if response.success && !response.session_id.is_empty() => {
                tracing::info!(session_id = %response.session_id, "Session created");
                self.game.set_session(SessionId::new(response.session_id));
            }
            Ok(response) => {
                tracing::warn!(message = %response.message, "Session was not created");
                self.toast(ToastLevel::Warning, "Playing without a backend session");
            }
            Err(e) => {
                tracing::warn!(error = %e, "Failed to create session");
                self.toast(ToastLevel::Warning, "Playing without a backend session");
            }
        }

        self.persist();
        Ok(())
    }

    // =========================================================================
    // Play
    // =========================================================================

    /// Pick `tag` for the current player.
    ///
    /// Stock and budget are checked before anything is sent. The backend's
    /// AI response is fetched first so the recorded interaction is complete
    /// when appended; pricing and inventory are then synced from the backend.
    pub async fn choose(&mut self, tag: FlavorTag) -> Result<AiInteraction, DomainError> {
        self.game.check_choice(tag).map_err(|e| self.reject(e))?;
        let player = self
            .game
            .current_player()
            .cloned()
            .ok_or_else(|| self.reject(DomainError::invalid_state_transition("No current player")))?;

        let enhanced = self.process_selection(&player, tag).await;
        let interaction = self
            .game
            .select_choice(tag, enhanced, self.rng.as_mut(), self.clock.now())
            .map_err(|e| self.reject(e))?;
        tracing::info!(player = %player.name, flavor = %tag, "Selection recorded");

        self.refresh_cost(player.id).await;
        self.sync_inventory(tag).await;
        self.persist();
        Ok(interaction)
    }

    pub fn skip(&mut self) -> Result<AiInteraction, DomainError> {
        let interaction = self
            .game
            .skip_round(self.rng.as_mut(), self.clock.now())
            .map_err(|e| self.reject(e))?;
        tracing::info!(round = interaction.round, "Round skipped");
        self.persist();
        Ok(interaction)
    }

    /// Hold the thinking screen for the configured delay, then advance.
    pub async fn finish_thinking(&mut self) -> Result<GamePhase, DomainError> {
        if self.game.phase() == GamePhase::Thinking {
            tokio::select! {
                _ = self.cancel.cancelled() => {}
                _ = tokio::time::sleep(self.settings.thinking_delay) => {}
            }
        }
        let phase = self.game.advance().map_err(|e| self.reject(e))?;
        self.persist();
        Ok(phase)
    }

    async fn process_selection(&mut self, player: &Player, tag: FlavorTag) -> Option<EnhancedAiResponse> {
        let mut preview = player.clone();
        preview.selections.push(Selection::Flavor(tag));

        let request = PlayerGameRequest {
            player_data: preview,
            processing_config: ProcessingConfig {
                session_id: self.session_id(),
                ..ProcessingConfig::default()
            },
        };
        match self.api.process_player_game(&request).await {
            Ok(response) => {
                if !response.success {
                    tracing::warn!(
                        error = response.error.as_deref().unwrap_or("unknown"),
                        "Backend AI processing failed"
                    );
                    self.toast(ToastLevel::Warning, "AI kitchen is offline, using local commentary");
                }
                response.enhanced().cloned()
            }
            Err(e) => {
                tracing::warn!(error = %e, "Backend AI processing unavailable");
                self.toast(ToastLevel::Warning, "AI kitchen is offline, using local commentary");
                None
            }
        }
    }

    /// Replace the provisional total with `/real-time-pricing`
    async fn refresh_cost(&mut self, player_id: PlayerId) {
        let Some(player) = self.game.player(player_id) else {
            return;
        };
        let request = RealTimePricingRequest {
            selections: player.selections.clone(),
            player_name: player.name.to_string(),
            session_id: self.session_id(),
        };

        match self.api.real_time_pricing(&request).await {
            Ok(response) if response.success => {
                for warning in &response.warnings {
                    tracing::debug!(warning = %warning, "Pricing warning");
                }
                if let Err(e) = self.game.apply_authoritative_cost(player_id, response.total_cost) {
                    tracing::warn!(error = %e, "Ignoring backend price");
                }
            }
            Ok(response) => {
                tracing::warn!(
                    error = response.error.as_deref().unwrap_or("unknown"),
                    "Real-time pricing failed"
                );
                self.toast(ToastLevel::Warning, "Live pricing unavailable, showing estimated cost");
            }
            Err(e) => {
                tracing::warn!(error = %e, "Real-time pricing unavailable");
                self.toast(ToastLevel::Warning, "Live pricing unavailable, showing estimated cost");
            }
        }
    }

    /// Decrement stock on the backend and adopt its new quantity
    async fn sync_inventory(&mut self, tag: FlavorTag) {
        let request = InventoryUpdateRequest::decrease(self.catalog.ingredient_name(tag), 1);
        match self.api.update_inventory(&request).await {
            Ok(response) if response.success => {
                let available = u32::try_from(response.new_quantity.max(0)).unwrap_or(u32::MAX);
                tracing::debug!(
                    flavor = %tag,
                    previous = response.previous_quantity,
                    available,
                    "Inventory updated"
                );
                self.game.apply_server_quantity(tag, available);
            }
            Ok(response) => {
                tracing::warn!(
                    flavor = %tag,
                    error = response.error.as_deref().unwrap_or("unknown"),
                    "Inventory update rejected"
                );
                self.toast(ToastLevel::Warning, "Inventory could not be updated");
            }
            Err(e) => {
                tracing::warn!(flavor = %tag, error = %e, "Inventory update failed");
                self.toast(ToastLevel::Warning, "Inventory could not be updated");
            }
        }
    }

    // =========================================================================
    // Reveal
    // =========================================================================

    /// Build the reveal for every player and report the results.
    ///
    /// Results are reported once per game. Revealing a resumed game that
    /// already reported replays the saved personalities without contacting
    /// the results endpoints or generating images again.
    pub async fn reveal(&mut self) -> Result<Vec<PlayerReveal>, DomainError> {
        if self.game.phase() != GamePhase::Reveal {
            return Err(self.reject(DomainError::invalid_state_transition(
                "The reveal is not ready yet",
            )));
        }

        let report = !self.game.results_reported();
        let personalities = self
            .game
            .settle_personalities(self.rng.as_mut())
            .map_err(|e| self.reject(e))?;
        if !report {
            tracing::info!("Results already reported, replaying the saved reveal");
        }

        let mut reveals = Vec::with_capacity(personalities.len());
        for (player_id, personality) in personalities {
            if report {
                self.validate_cost(player_id).await;
            }
            let image_url = self.player_image(player_id, report).await;
            let suggestion = self.suggestion(player_id).await;

            let Some(player) = self.game.player(player_id).cloned() else {
                continue;
            };
            if report {
                self.send_final_reveal(&player, &personality, &image_url, suggestion.as_deref())
                    .await;
            }
            reveals.push(PlayerReveal {
                player_id,
                name: player.name.to_string(),
                selections: player.selections,
                personality,
                total_cost: player.total_cost,
                image_url,
                suggestion,
            });
        }

        if report {
            self.send_game_results().await;
            if let Some(session_id) = self.session_id() {
                if let Err(e) = self.api.complete_session(&session_id).await {
                    tracing::warn!(session_id = %session_id, error = %e, "Failed to complete session");
                }
            }
            self.game.mark_results_reported().map_err(|e| self.reject(e))?;
        }
        self.persist();
        Ok(reveals)
    }

    /// Adopt the backend's total when it disagrees with ours
    async fn validate_cost(&mut self, player_id: PlayerId) {
        let Some(player) = self.game.player(player_id) else {
            return;
        };
        let request = CostValidationRequest {
            selections: player.selections.clone(),
            frontend_total_cost: player.total_cost,
            player_name: player.name.to_string(),
        };

        match self.api.validate_cost(&request).await {
            Ok(response) if response.success && !response.is_valid => {
                tracing::info!(
                    player = %request.player_name,
                    frontend_cost = response.frontend_cost,
                    backend_cost = response.backend_cost,
                    discrepancy = response.discrepancy,
                    "Cost discrepancy, adopting backend total"
                );
                if let Err(e) = self.game.apply_authoritative_cost(player_id, response.backend_cost) {
                    tracing::warn!(error = %e, "Ignoring backend cost");
                }
            }
            Ok(_) => {}
            Err(e) => {
                tracing::warn!(player = %request.player_name, error = %e, "Cost validation unavailable");
            }
        }
    }

    async fn player_image(&mut self, player_id: PlayerId, generate: bool) -> String {
        let Some(player) = self.game.player(player_id) else {
            return self.settings.fallback_image.clone();
        };
        if let Some(url) = &player.generated_image_url {
            return url.clone();
        }
        if !generate || !self.settings.generate_images {
            return self.settings.fallback_image.clone();
        }

        let trigger = ImageTrigger::for_player(player, self.session_id());
        self.images
            .insert(player_id, GenerationState::Generating { attempts: 0 });
        let state = self.poller.run(&trigger, &self.cancel).await;
        self.images.insert(player_id, state.clone());

        match state {
            GenerationState::Completed { url } => {
                if let Err(e) = self.game.set_generated_image(player_id, url.clone()) {
                    tracing::warn!(error = %e, "Failed to store generated image");
                }
                url
            }
            GenerationState::Cancelled => self.settings.fallback_image.clone(),
            _ => {
                self.toast(
                    ToastLevel::Info,
                    format!("No picture for {} this time, here is a classic cone", trigger.player()),
                );
                self.settings.fallback_image.clone()
            }
        }
    }

    /// Backend suggestion, else the last AI guess recorded during play
    async fn suggestion(&self, player_id: PlayerId) -> Option<String> {
        let player = self.game.player(player_id)?;
        let local = player
            .ai_interactions
            .iter()
            .rev()
            .filter_map(|i| i.enhanced_ai_response.as_ref())
            .map(|r| r.probable_ice_cream.clone())
            .find(|name| !name.is_empty());
        let request = SuggestionsRequest {
            selections: player.selections.clone(),
        };

        match self.api.ice_cream_suggestions(&request).await {
            Ok(response) if response.success => response
                .probable_ice_cream
                .filter(|name| !name.is_empty())
                .or(local),
            Ok(_) => local,
            Err(e) => {
                tracing::warn!(error = %e, "Ice cream suggestions unavailable");
                local
            }
        }
    }

    async fn send_final_reveal(
        &mut self,
        player: &Player,
        personality: &IceCreamPersonality,
        image_url: &str,
        suggestion: Option<&str>,
    ) {
        let request = FinalRevealRequest {
            player_name: player.name.to_string(),
            character: personality.name.clone(),
            ice_cream_data: json!({
                "emoji": personality.emoji,
                "description": personality.description,
                "selections": player.selections,
                "imageUrl": image_url,
                "probableIceCream": suggestion,
            }),
            ingredients_used: player
                .chosen_flavors()
                .map(|tag| self.catalog.ingredient_name(tag).to_string())
                .collect(),
            total_cost: Some(player.total_cost),
        };
        if let Err(e) = self.api.final_reveal(&request).await {
            tracing::warn!(player = %request.player_name, error = %e, "Failed to send final reveal");
            self.toast(ToastLevel::Warning, "Results could not be sent to the kitchen");
        }
    }

    async fn send_game_results(&mut self) {
        let request = GameResultsRequest {
            game_date: self.clock.now().to_rfc3339(),
            players: self.game.players().to_vec(),
            total_players: self.game.players().len(),
            game_version: GAME_VERSION.to_string(),
        };
        if let Err(e) = self.api.game_results(&request).await {
            tracing::warn!(error = %e, "Failed to send game results");
            self.toast(ToastLevel::Warning, "Results could not be sent to the kitchen");
        }
    }

    // =========================================================================
    // Reset
    // =========================================================================

    /// Cancel outstanding waits, reload inventory and return to `Setup`.
    pub async fn play_again(&mut self) {
        self.cancel.cancel();
        self.cancel = CancellationToken::new();
        self.images.clear();

        self.catalog = load_inventory(&self.api).await;
        if self.catalog.source == InventorySource::Fallback {
            self.toast(
                ToastLevel::Warning,
                "Backend unavailable, using the offline inventory",
            );
        }
        self.game.reset_game(Some(self.catalog.inventory.clone()));
        if let Err(e) = self.store.clear() {
            tracing::warn!(error = %e, "Failed to clear saved game");
        }
        tracing::info!("Game reset");
    }

    // =========================================================================
    // Helpers
    // =========================================================================

    fn session_id(&self) -> Option<String> {
        self.game.session_id().map(|id| id.as_str().to_string())
    }

    fn persist(&self) {
        let state = PersistedGame {
            game: self.game.snapshot(),
            inventory: self.game.inventory().clone(),
        };
        if let Err(e) = self.store.save(&state) {
            tracing::warn!(error = %e, "Failed to save game");
        }
    }

    /// Queue a toast, skipping one identical to a toast still queued
    fn toast(&mut self, level: ToastLevel, message: impl Into<String>) {
        let message = message.into();
        if self
            .toasts
            .iter()
            .any(|t| t.level == level && t.message == message)
        {
            return;
        }
        self.toasts.push_back(Toast { level, message });
    }

    /// Surface a refused action and hand the error back
    fn reject(&mut self, error: DomainError) -> DomainError {
        let level = if error.is_player_facing() {
            ToastLevel::Error
        } else {
            ToastLevel::Warning
        };
        tracing::debug!(error = %error, "Action refused");
        let message = match &error {
            DomainError::OutOfStock { flavor } => format!("Sorry, {} is out of stock!", flavor),
            DomainError::InsufficientFunds { needed, limit } => format!(
                "That would cost ${:.2}, over the ${:.2} limit",
                needed, limit
            ),
            other => other.to_string(),
        };
        self.toast(level, message);
        error
    }
}

impl Drop for GameService {
    fn drop(&mut self) {
        self.cancel.cancel();
    }
}

fn rules_for(settings: &GameSettings) -> GameRules {
    GameRules {
        spending_limit: settings.spending_limit,
        ..GameRules::default()
    }
}
