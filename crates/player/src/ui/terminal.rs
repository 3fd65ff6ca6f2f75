//! Terminal front-end
//!
//! Reads one command per line and drives the `GameService`:
//!
//! - setup: comma-separated player names
//! - welcome: Enter to start
//! - playing: `1`, `2` or `s`
//! - reveal: `again` or `quit`
//!
//! `quit` (or end of input) leaves from any phase. The saved game stays on
//! disk, so the next run resumes where this one stopped.

use anyhow::Result;
use stampalooza_domain::GamePhase;
use tokio::io::{AsyncBufRead, AsyncBufReadExt, AsyncWrite, AsyncWriteExt};

use crate::application::services::{GameService, PlayerReveal};
use crate::ui::render;

/// One line of player input, interpreted for the current phase
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Command {
    Names(Vec<String>),
    Start,
    Choose(usize),
    Skip,
    Again,
    Quit,
    Unknown,
}

pub fn parse_command(phase: GamePhase, line: &str) -> Command {
    let input = line.trim();
    if input.eq_ignore_ascii_case("quit") || input.eq_ignore_ascii_case("q") {
        return Command::Quit;
    }

    match phase {
        GamePhase::Setup => Command::Names(
            input
                .split(',')
                .map(|name| name.trim().to_string())
                .filter(|name| !name.is_empty())
                .collect(),
        ),
        GamePhase::Welcome => Command::Start,
        GamePhase::Playing => match input.to_ascii_lowercase().as_str() {
            "1" => Command::Choose(1),
            "2" => Command::Choose(2),
            "s" | "skip" => Command::Skip,
            _ => Command::Unknown,
        },
        GamePhase::Reveal => match input.to_ascii_lowercase().as_str() {
            "again" | "a" => Command::Again,
            _ => Command::Unknown,
        },
        GamePhase::Thinking => Command::Unknown,
    }
}

pub struct TerminalUi<R, W> {
    input: R,
    output: W,
}

impl<R, W> TerminalUi<R, W>
where
    R: AsyncBufRead + Unpin,
    W: AsyncWrite + Unpin,
{
    pub fn new(input: R, output: W) -> Self {
        Self { input, output }
    }

    pub fn into_output(self) -> W {
        self.output
    }

    /// Run until the player quits or input ends.
    pub async fn run(&mut self, service: &mut GameService) -> Result<()> {
        let mut reveals: Option<Vec<PlayerReveal>> = None;

        loop {
            self.flush_toasts(service).await?;
            let phase = service.game().phase();

            if phase == GamePhase::Thinking {
                // Resumed mid-round
                let _ = service.finish_thinking().await;
                continue;
            }
            if phase == GamePhase::Reveal && reveals.is_none() {
                self.say("\n🍨 Scooping up your results...").await?;
                reveals = Some(service.reveal().await.unwrap_or_default());
                self.flush_toasts(service).await?;
            }

            let prompt = match (phase, &reveals) {
                (GamePhase::Setup, _) => render::setup(service.game().rules().max_players),
                (GamePhase::Welcome, _) => render::welcome(service.game()),
                (GamePhase::Playing, _) => render::round(service.game()),
                (GamePhase::Reveal, Some(rows)) => render::reveal(rows),
                _ => String::new(),
            };
            self.say(&prompt).await?;

            let Some(line) = self.read_line().await? else {
                tracing::info!("Input closed");
                return Ok(());
            };

            match parse_command(phase, &line) {
                Command::Quit => {
                    self.say("Bye! 👋").await?;
                    return Ok(());
                }
                Command::Names(names) => {
                    let _ = service.submit_players(&names);
                }
                Command::Start => {
                    let _ = service.start_game().await;
                }
                Command::Choose(position) => self.choose(service, position).await?,
                Command::Skip => {
                    let name = current_name(service);
                    if let Ok(interaction) = service.skip() {
                        self.say(&render::thinking(&name, &interaction)).await?;
                        let _ = service.finish_thinking().await;
                    }
                }
                Command::Again => {
                    reveals = None;
                    service.play_again().await;
                }
                Command::Unknown => self.say("Sorry, I didn't get that.").await?,
            }
        }
    }

    async fn choose(&mut self, service: &mut GameService, position: usize) -> Result<()> {
        let tag = service
            .game()
            .current_round()
            .and_then(|round| round.choice_at(position))
            .map(|choice| choice.value);
        let Some(tag) = tag else {
            return self.say("Sorry, I didn't get that.").await;
        };

        let name = current_name(service);
        if let Ok(interaction) = service.choose(tag).await {
            self.flush_toasts(service).await?;
            self.say(&render::thinking(&name, &interaction)).await?;
            let _ = service.finish_thinking().await;
        }
        Ok(())
    }

    async fn flush_toasts(&mut self, service: &mut GameService) -> Result<()> {
        for toast in service.drain_toasts() {
            self.say(&render::toast(&toast)).await?;
        }
        Ok(())
    }

    async fn say(&mut self, text: &str) -> Result<()> {
        if text.is_empty() {
            return Ok(());
        }
        self.output.write_all(text.as_bytes()).await?;
        self.output.write_all(b"\n").await?;
        self.output.flush().await?;
        Ok(())
    }

    async fn read_line(&mut self) -> Result<Option<String>> {
        let mut line = String::new();
        let read = self.input.read_line(&mut line).await?;
        Ok((read > 0).then_some(line))
    }
}

fn current_name(service: &GameService) -> String {
    service
        .game()
        .current_player()
        .map(|p| p.name.to_string())
        .unwrap_or_default()
}
