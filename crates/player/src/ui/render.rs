//! Text rendering for each game phase
//!
//! Pure functions from state to strings, so the terminal loop only moves
//! lines between stdin, the service and stdout.

use std::fmt::Write;

use stampalooza_domain::{AiInteraction, Game, Selection};

use crate::application::services::{PlayerReveal, Toast, ToastLevel};

pub fn setup(max_players: usize) -> String {
    format!(
        "🍦 Welcome to STAMPalooza!\n\
         Enter up to {} player names, separated by commas:",
        max_players
    )
}

pub fn welcome(game: &Game) -> String {
    let names: Vec<&str> = game.players().iter().map(|p| p.name.as_str()).collect();
    format!(
        "Hello {}! Each of you gets {} rounds to build a dream cone.\n\
         Press Enter to start, or type 'quit'.",
        names.join(", "),
        game.rounds().len()
    )
}

/// The current round with prices and stock for both choices
pub fn round(game: &Game) -> String {
    let (Some(player), Some(round)) = (game.current_player(), game.current_round()) else {
        return String::new();
    };

    let mut out = format!(
        "\n{}'s turn, round {} of {} (spent ${:.2})\n{}\n",
        player.name,
        round.id,
        game.rounds().len(),
        player.total_cost,
        round.question
    );
    for (position, choice) in round.choices.iter().enumerate() {
        let available = game.inventory().available(choice.value);
        let stock = if available == 0 {
            "sold out".to_string()
        } else {
            format!("{} left", available)
        };
        let _ = writeln!(
            out,
            "  [{}] {} (${:.2}, {})",
            position + 1,
            choice.value,
            game.inventory().price(choice.value),
            stock
        );
    }
    out.push_str("Type 1, 2, or s to skip:");
    out
}

pub fn thinking(player_name: &str, interaction: &AiInteraction) -> String {
    let mut out = format!("\n🤔 Thinking about {}'s choice...\n", player_name);
    for step in &interaction.ai_steps {
        let _ = writeln!(out, "  • {}", step);
    }
    let _ = write!(out, "{} {}", interaction.ai_emoji, interaction.ai_thought);
    out
}

pub fn reveal(reveals: &[PlayerReveal]) -> String {
    let mut out = String::from("\n🎉 The big reveal!\n");
    for reveal in reveals {
        let personality = &reveal.personality;
        let _ = writeln!(
            out,
            "\n{} {} is a {}!\n  {}",
            personality.emoji, reveal.name, personality.name, personality.description
        );
        let _ = writeln!(out, "  Picks: {}", selections(&reveal.selections));
        for insight in &personality.insights {
            let _ = writeln!(out, "  - {}", insight);
        }
        if let Some(suggestion) = &reveal.suggestion {
            let _ = writeln!(out, "  Closest real scoop: {}", suggestion);
        }
        let _ = writeln!(out, "  Total: ${:.2}", reveal.total_cost);
        let _ = writeln!(out, "  Picture: {}", reveal.image_url);
    }
    out.push_str("\nType 'again' to play again or 'quit' to leave:");
    out
}

pub fn toast(toast: &Toast) -> String {
    let icon = match toast.level {
        ToastLevel::Info => "ℹ️",
        ToastLevel::Warning => "⚠️",
        ToastLevel::Error => "❌",
    };
    format!("{} {}", icon, toast.message)
}

fn selections(selections: &[Selection]) -> String {
    if selections.is_empty() {
        return "none".to_string();
    }
    selections
        .iter()
        .map(|s| s.to_string())
        .collect::<Vec<_>>()
        .join(", ")
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Utc;
    use stampalooza_domain::{FlavorTag, GameRules, Inventory, PlayerId, RandomSource};

    struct FixedRandom;

    impl RandomSource for FixedRandom {
        fn random_f64(&mut self) -> f64 {
            0.5
        }
    }

    fn playing_game() -> Game {
        let mut inventory = Inventory::fallback();
        inventory.apply_server_quantity(FlavorTag::Classic, 0);
        let mut game = Game::new(GameRules::default(), inventory);
        game.submit_players(&["Amy", "Bo"]).expect("players");
        game.start_game().expect("started");
        game
    }

    #[test]
    fn round_lists_both_choices_with_stock() {
        let text = round(&playing_game());
        assert!(text.contains("Amy's turn, round 1 of 4"));
        assert!(text.contains("[1] Adventure ($3.50, 3 left)"));
        assert!(text.contains("[2] Classic ($2.50, sold out)"));
    }

    #[test]
    fn round_is_empty_outside_play() {
        let game = Game::new(GameRules::default(), Inventory::fallback());
        assert!(round(&game).is_empty());
    }

    #[test]
    fn thinking_lists_steps_then_thought() {
        let mut game = playing_game();
        let interaction = game
            .select_choice(FlavorTag::Adventure, None, &mut FixedRandom, Utc::now())
            .expect("chosen");
        let text = thinking("Amy", &interaction);
        assert!(text.starts_with("\n🤔 Thinking about Amy's choice"));
        assert_eq!(text.matches("  • ").count(), interaction.ai_steps.len());
        assert!(text.ends_with(&interaction.ai_thought));
    }

    #[test]
    fn reveal_shows_suggestion_only_when_known() {
        let game = playing_game();
        let personality = game.personalities(&mut FixedRandom).remove(0).1;
        let mut reveal_row = PlayerReveal {
            player_id: PlayerId::new(),
            name: "Amy".into(),
            selections: vec![Selection::Skip],
            personality,
            total_cost: 0.0,
            image_url: "cone.png".into(),
            suggestion: None,
        };
        assert!(!reveal(std::slice::from_ref(&reveal_row)).contains("Closest real scoop"));

        reveal_row.suggestion = Some("Rocky Road".into());
        let text = reveal(&[reveal_row]);
        assert!(text.contains("Closest real scoop: Rocky Road"));
        assert!(text.contains("Picks: Skip"));
    }

    #[test]
    fn toast_prefixes_level_icon() {
        let text = toast(&Toast {
            level: ToastLevel::Error,
            message: "Sorry, Caramel is out of stock!".into(),
        });
        assert_eq!(text, "❌ Sorry, Caramel is out of stock!");
    }
}
