//! Image generation poller
//!
//! Drives one player's image from trigger to a final state:
//!
//! ```text
//! Idle -> Generating -> Completed | Failed | TimedOut | Cancelled
//! ```
//!
//! Generation starts with a trigger: a direct `POST` carrying the player's
//! picks, or the on-demand `GET` that leaves the picks to the backend
//! session. The trigger may finish at once (`imageUrl`), hand back a task id
//! to poll, or report a bare pending status. Follow-up calls are paced by a
//! single `PollPolicy`, and every wait races the caller's
//! `CancellationToken`.

use std::time::Duration;

use stampalooza_domain::Player;
use stampalooza_shared::{
    ImageGenerationQuery, ImageGenerationRequest, ImageGenerationResponse, ImageStatus,
    ImageStatusResponse,
};
use tokio::time::Instant;
use tokio_util::sync::CancellationToken;

use crate::application::api::Api;
use crate::ports::outbound::ApiError;

/// Which non-final outcomes earn another attempt
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RetryOn {
    /// Re-trigger when the backend reports pending without a task id
    pub pending: bool,
    /// Keep going after a transport or HTTP error
    pub network_error: bool,
}

/// Pacing for follow-up calls after the initial trigger
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PollPolicy {
    pub interval: Duration,
    /// Follow-up calls allowed; the trigger itself is not counted
    pub max_attempts: u32,
    pub max_wall_clock: Option<Duration>,
    pub retry_on: RetryOn,
}

impl PollPolicy {
    /// Status polling: every 2 s for up to 60 attempts
    pub fn status_polling() -> Self {
        Self {
            interval: Duration::from_secs(2),
            max_attempts: 60,
            max_wall_clock: None,
            retry_on: RetryOn {
                pending: true,
                network_error: false,
            },
        }
    }

    /// Reveal-time retries: every 10 s, 3 attempts, inside 2 minutes
    pub fn reveal_retry() -> Self {
        Self {
            interval: Duration::from_secs(10),
            max_attempts: 3,
            max_wall_clock: Some(Duration::from_secs(120)),
            retry_on: RetryOn {
                pending: true,
                network_error: true,
            },
        }
    }
}

impl Default for PollPolicy {
    fn default() -> Self {
        Self::status_polling()
    }
}

/// Where one player's image generation stands
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum GenerationState {
    Idle,
    Generating { attempts: u32 },
    Completed { url: String },
    Failed { reason: String },
    TimedOut,
    Cancelled,
}

impl GenerationState {
    pub fn is_final(&self) -> bool {
        !matches!(self, Self::Idle | Self::Generating { .. })
    }

    pub fn image_url(&self) -> Option<&str> {
        match self {
            Self::Completed { url } => Some(url),
            _ => None,
        }
    }
}

/// How generation is started for one player
#[derive(Debug, Clone, PartialEq)]
pub enum ImageTrigger {
    /// `POST /generate-ice-cream-image` with the selections in the body
    Direct(ImageGenerationRequest),
    /// `GET /generate-ice-cream-image`; the backend reads the selections
    /// from its session and substitutes a house cone when it has none
    OnDemand(ImageGenerationQuery),
}

impl ImageTrigger {
    /// The session is created before any round is played and never sees the
    /// picks, so players with at least one flavor send them directly. A
    /// player who skipped everything gets the backend's house cone.
    pub fn for_player(player: &Player, session_id: Option<String>) -> Self {
        if player.chosen_flavors().next().is_some() {
            Self::Direct(ImageGenerationRequest::new(
                player.name.to_string(),
                player.selections.clone(),
            ))
        } else {
            Self::OnDemand(ImageGenerationQuery {
                player: player.name.to_string(),
                session_id,
            })
        }
    }

    pub fn player(&self) -> &str {
        match self {
            Self::Direct(request) => &request.player_name,
            Self::OnDemand(query) => &query.player,
        }
    }
}

/// Result of a single backend call
enum Step {
    Done(GenerationState),
    /// Still running; `Some` when the backend named a task to poll
    Pending(Option<String>),
}

#[derive(Clone)]
pub struct ImageGenerationPoller {
    api: Api,
    policy: PollPolicy,
}

impl ImageGenerationPoller {
    pub fn new(api: Api, policy: PollPolicy) -> Self {
        Self { api, policy }
    }

    pub fn policy(&self) -> &PollPolicy {
        &self.policy
    }

    /// Run generation to a final state.
    pub async fn run(&self, trigger: &ImageTrigger, cancel: &CancellationToken) -> GenerationState {
        let started = Instant::now();
        tracing::info!(
            player = %trigger.player(),
            direct = matches!(trigger, ImageTrigger::Direct(_)),
            "Starting image generation"
        );

        let first = tokio::select! {
            _ = cancel.cancelled() => return GenerationState::Cancelled,
            result = self.trigger(trigger) => result,
        };
        let mut task_id = match self.on_trigger(first) {
            Step::Done(state) => return self.finish(trigger, state, 0),
            Step::Pending(task_id) => task_id,
        };

        for attempt in 1..=self.policy.max_attempts {
            tokio::select! {
                _ = cancel.cancelled() => return self.finish(trigger, GenerationState::Cancelled, attempt - 1),
                _ = tokio::time::sleep(self.policy.interval) => {}
            }

            if let Some(limit) = self.policy.max_wall_clock {
                if started.elapsed() > limit {
                    return self.finish(trigger, GenerationState::TimedOut, attempt - 1);
                }
            }

            tracing::debug!(
                player = %trigger.player(),
                attempt,
                max_attempts = self.policy.max_attempts,
                task_id = task_id.as_deref().unwrap_or("-"),
                "Polling image generation"
            );

            let step = match &task_id {
                Some(id) => {
                    let result = tokio::select! {
                        _ = cancel.cancelled() => return self.finish(trigger, GenerationState::Cancelled, attempt),
                        result = self.api.image_generation_status(id) => result,
                    };
                    self.on_status(result)
                }
                None => {
                    let result = tokio::select! {
                        _ = cancel.cancelled() => return self.finish(trigger, GenerationState::Cancelled, attempt),
                        result = self.trigger(trigger) => result,
                    };
                    self.on_trigger(result)
                }
            };

            match step {
                Step::Done(state) => return self.finish(trigger, state, attempt),
                Step::Pending(Some(id)) => task_id = Some(id),
                Step::Pending(None) => {}
            }
        }

        self.finish(trigger, GenerationState::TimedOut, self.policy.max_attempts)
    }

    async fn trigger(&self, trigger: &ImageTrigger) -> Result<ImageGenerationResponse, ApiError> {
        match trigger {
            ImageTrigger::Direct(request) => self.api.generate_image_direct(request).await,
            ImageTrigger::OnDemand(query) => self.api.trigger_image_generation(query).await,
        }
    }

    fn finish(&self, trigger: &ImageTrigger, state: GenerationState, attempts: u32) -> GenerationState {
        let player = trigger.player();
        match &state {
            GenerationState::Completed { url } => {
                tracing::info!(player = %player, attempts, url = %url, "Image generation completed")
            }
            GenerationState::Failed { reason } => {
                tracing::warn!(player = %player, attempts, reason = %reason, "Image generation failed")
            }
            GenerationState::TimedOut => {
                tracing::warn!(player = %player, attempts, "Image generation timed out")
            }
            GenerationState::Cancelled => {
                tracing::info!(player = %player, attempts, "Image generation cancelled")
            }
            GenerationState::Idle | GenerationState::Generating { .. } => {}
        }
        state
    }

    fn on_trigger(&self, result: Result<ImageGenerationResponse, ApiError>) -> Step {
        let response = match result {
            Ok(response) => response,
            Err(e) => return self.on_error(e),
        };

        if let Some(url) = response.image_url.filter(|url| !url.is_empty()) {
            return Step::Done(GenerationState::Completed { url });
        }
        if response.status == Some(ImageStatus::Failed) {
            return Step::Done(failed(response.error, "Image generation failed"));
        }
        if let Some(task_id) = response.task_id {
            return Step::Pending(Some(task_id));
        }

        // No url and no task: typically "already in progress"
        let pending = response.status == Some(ImageStatus::Pending);
        if (pending || response.success) && self.policy.retry_on.pending {
            return Step::Pending(None);
        }
        Step::Done(failed(response.error, "Image generation unavailable"))
    }

    fn on_status(&self, result: Result<ImageStatusResponse, ApiError>) -> Step {
        let response = match result {
            Ok(response) => response,
            Err(e) => return self.on_error(e),
        };

        match response.status {
            ImageStatus::Completed => match response.image_url.filter(|url| !url.is_empty()) {
                Some(url) => Step::Done(GenerationState::Completed { url }),
                None => Step::Done(failed(response.error, "Completed without an image")),
            },
            ImageStatus::Failed => Step::Done(failed(response.error, "Image generation failed")),
            ImageStatus::Pending | ImageStatus::Unknown => Step::Pending(None),
        }
    }

    fn on_error(&self, error: ApiError) -> Step {
        if self.policy.retry_on.network_error {
            tracing::warn!(error = %error, "Image generation request failed, will retry");
            Step::Pending(None)
        } else {
            Step::Done(GenerationState::Failed {
                reason: error.to_string(),
            })
        }
    }
}

fn failed(error: Option<String>, default: &str) -> GenerationState {
    GenerationState::Failed {
        reason: error.unwrap_or_else(|| default.to_string()),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ports::outbound::MockRawApiPort;
    use serde_json::json;
    use stampalooza_domain::{FlavorTag, PlayerName, Selection};
    use std::sync::atomic::{AtomicU32, Ordering};
    use std::sync::Arc;

    fn query() -> ImageTrigger {
        ImageTrigger::OnDemand(ImageGenerationQuery {
            player: "Amy".into(),
            session_id: None,
        })
    }

    fn poller(raw: MockRawApiPort, policy: PollPolicy) -> ImageGenerationPoller {
        ImageGenerationPoller::new(Api::new(Arc::new(raw)), policy)
    }

    fn is_trigger(path: &str) -> bool {
        path.starts_with("/generate-ice-cream-image")
    }

    fn is_status(path: &str) -> bool {
        path.starts_with("/image-generation-status/")
    }

    #[tokio::test(start_paused = true)]
    async fn immediate_url_completes_without_polling() {
        let mut raw = MockRawApiPort::new();
        raw.expect_get_json()
            .withf(|path| is_trigger(path))
            .times(1)
            .returning(|_| Ok(json!({"success": true, "imageUrl": "https://img/a.png", "status": "completed"})));

        let started = Instant::now();
        let state = poller(raw, PollPolicy::status_polling())
            .run(&query(), &CancellationToken::new())
            .await;
        assert_eq!(state.image_url(), Some("https://img/a.png"));
        assert_eq!(started.elapsed(), Duration::ZERO);
    }

    #[tokio::test(start_paused = true)]
    async fn pending_three_times_then_completed() {
        let calls = Arc::new(AtomicU32::new(0));
        let mut raw = MockRawApiPort::new();
        raw.expect_get_json()
            .withf(|path| is_trigger(path))
            .times(1)
            .returning(|_| Ok(json!({"success": true, "status": "pending", "taskId": "t-1"})));
        let counter = calls.clone();
        raw.expect_get_json()
            .withf(|path| path == "/image-generation-status/t-1")
            .times(4)
            .returning(move |_| {
                let n = counter.fetch_add(1, Ordering::SeqCst) + 1;
                if n < 4 {
                    Ok(json!({"status": "pending"}))
                } else {
                    Ok(json!({"status": "completed", "imageUrl": "https://img/amy.png"}))
                }
            });

        let started = Instant::now();
        let state = poller(raw, PollPolicy::status_polling())
            .run(&query(), &CancellationToken::new())
            .await;

        assert_eq!(
            state,
            GenerationState::Completed {
                url: "https://img/amy.png".into()
            }
        );
        assert_eq!(calls.load(Ordering::SeqCst), 4);
        assert_eq!(started.elapsed(), Duration::from_secs(8));
    }

    #[tokio::test(start_paused = true)]
    async fn always_pending_times_out_after_max_attempts() {
        let mut raw = MockRawApiPort::new();
        raw.expect_get_json()
            .withf(|path| is_trigger(path))
            .times(1)
            .returning(|_| Ok(json!({"success": true, "status": "pending", "taskId": "t-2"})));
        raw.expect_get_json()
            .withf(|path| is_status(path))
            .times(60)
            .returning(|_| Ok(json!({"status": "pending"})));

        let started = Instant::now();
        let state = poller(raw, PollPolicy::status_polling())
            .run(&query(), &CancellationToken::new())
            .await;

        assert_eq!(state, GenerationState::TimedOut);
        assert_eq!(started.elapsed(), Duration::from_secs(120));
    }

    #[tokio::test(start_paused = true)]
    async fn failed_status_is_terminal() {
        let mut raw = MockRawApiPort::new();
        raw.expect_get_json()
            .withf(|path| is_trigger(path))
            .returning(|_| Ok(json!({"success": true, "taskId": "t-3"})));
        raw.expect_get_json()
            .withf(|path| is_status(path))
            .times(1)
            .returning(|_| Ok(json!({"status": "failed", "error": "GPU on fire"})));

        let state = poller(raw, PollPolicy::status_polling())
            .run(&query(), &CancellationToken::new())
            .await;
        assert_eq!(
            state,
            GenerationState::Failed {
                reason: "GPU on fire".into()
            }
        );
    }

    #[tokio::test(start_paused = true)]
    async fn network_error_is_terminal_without_retry() {
        let mut raw = MockRawApiPort::new();
        raw.expect_get_json()
            .times(1)
            .returning(|_| Err(ApiError::RequestFailed("refused".into())));

        let state = poller(raw, PollPolicy::status_polling())
            .run(&query(), &CancellationToken::new())
            .await;
        assert!(matches!(state, GenerationState::Failed { .. }));
    }

    #[tokio::test(start_paused = true)]
    async fn reveal_retry_retriggers_through_errors_and_pending() {
        let calls = Arc::new(AtomicU32::new(0));
        let counter = calls.clone();
        let mut raw = MockRawApiPort::new();
        raw.expect_get_json()
            .withf(|path| is_trigger(path))
            .times(3)
            .returning(move |_| match counter.fetch_add(1, Ordering::SeqCst) {
                0 => Err(ApiError::RequestFailed("refused".into())),
                1 => Ok(json!({
                    "success": false,
                    "status": "pending",
                    "error": "Image generation already in progress for this player. Please wait."
                })),
                _ => Ok(json!({"success": true, "imageUrl": "https://img/late.png", "cached": true})),
            });

        let started = Instant::now();
        let state = poller(raw, PollPolicy::reveal_retry())
            .run(&query(), &CancellationToken::new())
            .await;
        assert_eq!(state.image_url(), Some("https://img/late.png"));
        assert_eq!(started.elapsed(), Duration::from_secs(20));
    }

    #[tokio::test(start_paused = true)]
    async fn reveal_retry_gives_up_after_three_attempts() {
        let mut raw = MockRawApiPort::new();
        raw.expect_get_json()
            .withf(|path| is_trigger(path))
            .times(4)
            .returning(|_| Ok(json!({"success": false, "status": "pending"})));

        let started = Instant::now();
        let state = poller(raw, PollPolicy::reveal_retry())
            .run(&query(), &CancellationToken::new())
            .await;
        assert_eq!(state, GenerationState::TimedOut);
        assert_eq!(started.elapsed(), Duration::from_secs(30));
    }

    #[tokio::test(start_paused = true)]
    async fn wall_clock_limit_stops_polling() {
        let policy = PollPolicy {
            interval: Duration::from_secs(50),
            max_attempts: 10,
            max_wall_clock: Some(Duration::from_secs(120)),
            retry_on: RetryOn {
                pending: true,
                network_error: false,
            },
        };
        let mut raw = MockRawApiPort::new();
        raw.expect_get_json()
            .withf(|path| is_trigger(path))
            .returning(|_| Ok(json!({"success": true, "taskId": "t-4"})));
        raw.expect_get_json()
            .withf(|path| is_status(path))
            .times(2)
            .returning(|_| Ok(json!({"status": "pending"})));

        let state = poller(raw, policy).run(&query(), &CancellationToken::new()).await;
        assert_eq!(state, GenerationState::TimedOut);
    }

    #[tokio::test(start_paused = true)]
    async fn pending_without_task_fails_when_not_retrying() {
        let policy = PollPolicy {
            retry_on: RetryOn {
                pending: false,
                network_error: false,
            },
            ..PollPolicy::status_polling()
        };
        let mut raw = MockRawApiPort::new();
        raw.expect_get_json()
            .times(1)
            .returning(|_| Ok(json!({"success": false, "status": "pending", "error": "busy"})));

        let state = poller(raw, policy).run(&query(), &CancellationToken::new()).await;
        assert_eq!(state, GenerationState::Failed { reason: "busy".into() });
    }

    #[tokio::test(start_paused = true)]
    async fn direct_trigger_posts_selections() {
        let mut raw = MockRawApiPort::new();
        raw.expect_post_json()
            .withf(|path, body| {
                path == "/generate-ice-cream-image"
                    && body["playerName"] == "Amy"
                    && body["selections"] == json!(["Adventure", "Skip", "Crunchy", "Sprinkles"])
            })
            .times(1)
            .returning(|_, _| Ok(json!({"success": true, "imageUrl": "https://img/amy.png"})));
        raw.expect_get_json().never();

        let trigger = ImageTrigger::Direct(ImageGenerationRequest::new(
            "Amy",
            vec![
                FlavorTag::Adventure.into(),
                Selection::Skip,
                FlavorTag::Crunchy.into(),
                FlavorTag::Sprinkles.into(),
            ],
        ));
        let state = poller(raw, PollPolicy::status_polling())
            .run(&trigger, &CancellationToken::new())
            .await;
        assert_eq!(state.image_url(), Some("https://img/amy.png"));
    }

    #[test]
    fn trigger_sends_picks_unless_everything_was_skipped() {
        let mut amy = Player::new(PlayerName::new("Amy").expect("name"));
        amy.selections = vec![Selection::Skip, FlavorTag::Light.into()];
        match ImageTrigger::for_player(&amy, Some("s-1".into())) {
            ImageTrigger::Direct(request) => assert_eq!(request.selections, amy.selections),
            other => panic!("expected a direct trigger, got {:?}", other),
        }

        amy.selections = vec![Selection::Skip; 4];
        assert_eq!(
            ImageTrigger::for_player(&amy, Some("s-1".into())),
            ImageTrigger::OnDemand(ImageGenerationQuery {
                player: "Amy".into(),
                session_id: Some("s-1".into()),
            })
        );
    }

    #[tokio::test(start_paused = true)]
    async fn cancellation_interrupts_the_wait() {
        let mut raw = MockRawApiPort::new();
        raw.expect_get_json()
            .withf(|path| is_trigger(path))
            .returning(|_| Ok(json!({"success": true, "taskId": "t-5"})));
        raw.expect_get_json().withf(|path| is_status(path)).never();

        let cancel = CancellationToken::new();
        let trigger = cancel.clone();
        tokio::spawn(async move {
            tokio::time::sleep(Duration::from_secs(1)).await;
            trigger.cancel();
        });

        let started = Instant::now();
        let state = poller(raw, PollPolicy::status_polling()).run(&query(), &cancel).await;
        assert_eq!(state, GenerationState::Cancelled);
        assert_eq!(started.elapsed(), Duration::from_secs(1));
    }
}
