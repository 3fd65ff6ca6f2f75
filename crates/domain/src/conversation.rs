//! Simulated AI "thinking" commentary
//!
//! After each round the player watches a short reasoning script followed by
//! a final thought. Scripts are assembled from templates with `{PLAYER}`,
//! `{SELECTION}`, `{LAST_CHOICE}` and `{HISTORY}` placeholders. Every random
//! draw goes through the injected `RandomSource`.

use serde::{Deserialize, Serialize};

use crate::random::{pick, RandomSource};
use crate::value_objects::{FlavorTag, Selection};

/// Probability of drawing the final thought from the positive pool
pub const POSITIVE_RESPONSE_CHANCE: f64 = 0.7;

/// Probability of adding a connecting step when a slot is free
pub const CONNECTING_STEP_CHANCE: f64 = 0.6;

const MIN_STEPS: usize = 2;
const MAX_STEPS: usize = 4;

/// Inputs for one script
#[derive(Debug, Clone, Copy)]
pub struct ThinkingContext<'a> {
    pub player_name: &'a str,
    pub selection: Selection,
    /// Selections made before this one, in play order
    pub history: &'a [Selection],
}

/// Generated commentary for one round
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ThinkingScript {
    pub steps: Vec<String>,
    pub thought: String,
    pub emoji: String,
}

const ANALYZING: &[&str] = &[
    "Analyzing {PLAYER}'s choice of {SELECTION}...",
    "Hmm, {SELECTION}! Let me scan my flavor database for {PLAYER}...",
    "Processing {SELECTION} through the taste-o-meter...",
];

const CONSIDERING: &[&str] = &[
    "Considering how {SELECTION} pairs with {LAST_CHOICE}...",
    "Cross-referencing with earlier picks: {HISTORY}...",
    "{PLAYER} went with {LAST_CHOICE} last time, so {SELECTION} is an interesting twist...",
];

const CONNECTING: &[&str] = &[
    "Connecting {SELECTION} to similar flavor profiles...",
    "Checking which toppings love {SELECTION}...",
    "Mapping {SELECTION} onto the secret ice cream matrix...",
];

const CONCLUDING: &[&str] = &[
    "Conclusion forming: {PLAYER} has great taste!",
    "Locking in {SELECTION} for {PLAYER}'s cone...",
    "Almost there... {PLAYER}'s flavor profile is taking shape!",
];

const SKIP_STEPS: &[&str] = &[
    "Wait, {PLAYER} skipped this one...",
    "Recalculating without a pick this round...",
    "So far we have {HISTORY} to work with...",
    "Adding a dash of mystery to the recipe...",
];

const SKIP_RESPONSES: &[(&str, &str)] = &[
    ("Keeping us guessing, I see!", "🤫"),
    ("A mystery scoop it is!", "❓"),
    ("Sometimes the best choice is no choice.", "🧘"),
    ("Saving room for later, smart move.", "😏"),
];

struct ResponsePools {
    positive: &'static [(&'static str, &'static str)],
    thoughtful: &'static [(&'static str, &'static str)],
}

fn response_pools(tag: FlavorTag) -> ResponsePools {
    match tag {
        FlavorTag::Adventure => ResponsePools {
            positive: &[
                ("A true explorer! Bold flavors ahead!", "🚀"),
                ("Adventure it is, let's get wild!", "🌋"),
            ],
            thoughtful: &[("Daring... I wonder where this leads.", "🧭")],
        },
        FlavorTag::Classic => ResponsePools {
            positive: &[
                ("A timeless choice, you can't go wrong!", "🍦"),
                ("Classic never goes out of style!", "✨"),
            ],
            thoughtful: &[("Sticking with what works. Wise.", "🤔")],
        },
        FlavorTag::Rich => ResponsePools {
            positive: &[
                ("Decadent! You know how to treat yourself.", "🍫"),
                ("Rich and indulgent, excellent!", "😋"),
            ],
            thoughtful: &[("Deep flavors for a deep thinker...", "🧐")],
        },
        FlavorTag::Light => ResponsePools {
            positive: &[
                ("Fresh and zesty, love it!", "🍋"),
                ("Light as a summer breeze!", "🌤️"),
            ],
            thoughtful: &[("Keeping it bright. Interesting balance.", "💭")],
        },
        FlavorTag::Smooth => ResponsePools {
            positive: &[
                ("Silky smooth, pure bliss!", "🌊"),
                ("Smooth operator!", "😎"),
            ],
            thoughtful: &[("No bumps in the road for you.", "🤔")],
        },
        FlavorTag::Crunchy => ResponsePools {
            positive: &[
                ("Crunch time! Great texture choice!", "🥜"),
                ("Every bite a surprise, love it!", "💥"),
            ],
            thoughtful: &[("A little resistance makes it memorable.", "🧐")],
        },
        FlavorTag::Sprinkles => ResponsePools {
            positive: &[
                ("Party on a cone!", "🎉"),
                ("Sprinkles make everything better!", "🌈"),
            ],
            thoughtful: &[("A celebration in every bite...", "💭")],
        },
        FlavorTag::Caramel => ResponsePools {
            positive: &[
                ("Golden and gooey, perfection!", "🍯"),
                ("Caramel dreams come true!", "💛"),
            ],
            thoughtful: &[("Sweet with a hint of salt. Complex.", "🤔")],
        },
    }
}

/// Generate the thinking script for one selection.
pub fn generate_thinking(ctx: &ThinkingContext<'_>, rng: &mut dyn RandomSource) -> ThinkingScript {
    match ctx.selection {
        Selection::Flavor(tag) => flavor_script(ctx, tag, rng),
        Selection::Skip => skip_script(ctx, rng),
    }
}

fn flavor_script(
    ctx: &ThinkingContext<'_>,
    tag: FlavorTag,
    rng: &mut dyn RandomSource,
) -> ThinkingScript {
    let step_count = rng.random_range(MIN_STEPS, MAX_STEPS);
    let has_history = ctx.history.iter().any(|s| !s.is_skip());

    let mut steps = vec![render(draw(rng, ANALYZING), ctx)];
    // Slots between the first and last step
    let mut middle = step_count.saturating_sub(2);
    if has_history && middle > 0 {
        steps.push(render(draw(rng, CONSIDERING), ctx));
        middle -= 1;
    }
    if middle > 0 && rng.chance(CONNECTING_STEP_CHANCE) {
        steps.push(render(draw(rng, CONNECTING), ctx));
    }
    steps.push(render(draw(rng, CONCLUDING), ctx));

    let pools = response_pools(tag);
    let pool = if rng.chance(POSITIVE_RESPONSE_CHANCE) {
        pools.positive
    } else {
        pools.thoughtful
    };
    let (thought, emoji) = pick(rng, pool).copied().unwrap_or(("Yum!", "😋"));

    ThinkingScript {
        steps,
        thought: thought.to_string(),
        emoji: emoji.to_string(),
    }
}

fn skip_script(ctx: &ThinkingContext<'_>, rng: &mut dyn RandomSource) -> ThinkingScript {
    let step_count = rng.random_range(2, 3);
    let mut steps = Vec::with_capacity(step_count);
    // Walk the templates from a random start so steps never repeat
    let start = rng.random_range(0, SKIP_STEPS.len() - 1);
    for offset in 0..step_count {
        let template = SKIP_STEPS[(start + offset) % SKIP_STEPS.len()];
        steps.push(render(template, ctx));
    }
    let (thought, emoji) = pick(rng, SKIP_RESPONSES)
        .copied()
        .unwrap_or(("A mystery scoop it is!", "❓"));
    ThinkingScript {
        steps,
        thought: thought.to_string(),
        emoji: emoji.to_string(),
    }
}

fn draw(rng: &mut dyn RandomSource, templates: &'static [&'static str]) -> &'static str {
    pick(rng, templates).copied().unwrap_or("Thinking...")
}

fn render(template: &str, ctx: &ThinkingContext<'_>) -> String {
    let chosen: Vec<&str> = ctx
        .history
        .iter()
        .filter_map(|s| s.flavor())
        .map(|tag| tag.as_str())
        .collect();
    let last_choice = chosen.last().copied().unwrap_or("nothing yet");
    let history = if chosen.is_empty() {
        "a blank slate".to_string()
    } else {
        chosen.join(", ")
    };
    template
        .replace("{PLAYER}", ctx.player_name)
        .replace("{SELECTION}", ctx.selection.as_str())
        .replace("{LAST_CHOICE}", last_choice)
        .replace("{HISTORY}", &history)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::random::ScriptedRandom;

    fn ctx<'a>(selection: Selection, history: &'a [Selection]) -> ThinkingContext<'a> {
        ThinkingContext {
            player_name: "Amy",
            selection,
            history,
        }
    }

    #[test]
    fn flavor_script_has_two_to_four_steps() {
        let history = [Selection::Flavor(FlavorTag::Adventure)];
        for seed in [0.0, 0.2, 0.45, 0.7, 0.99] {
            let mut rng = ScriptedRandom::constant(seed);
            let script =
                generate_thinking(&ctx(FlavorTag::Rich.into(), &history), &mut rng);
            assert!((MIN_STEPS..=MAX_STEPS).contains(&script.steps.len()));
            assert!(!script.thought.is_empty());
        }
    }

    #[test]
    fn first_and_last_steps_are_analyzing_and_concluding() {
        let mut rng = ScriptedRandom::constant(0.0);
        let script = generate_thinking(&ctx(FlavorTag::Classic.into(), &[]), &mut rng);
        assert_eq!(script.steps.first().map(String::as_str), Some("Analyzing Amy's choice of Classic..."));
        assert_eq!(
            script.steps.last().map(String::as_str),
            Some("Conclusion forming: Amy has great taste!")
        );
    }

    #[test]
    fn considering_step_needs_history() {
        // 0.99 -> four steps, connecting skipped (0.99 >= 0.6)
        let mut rng = ScriptedRandom::constant(0.99);
        let script = generate_thinking(&ctx(FlavorTag::Smooth.into(), &[]), &mut rng);
        assert_eq!(script.steps.len(), 2);

        let history = [Selection::Skip, Selection::Flavor(FlavorTag::Light)];
        let mut rng = ScriptedRandom::constant(0.99);
        let script = generate_thinking(&ctx(FlavorTag::Smooth.into(), &history), &mut rng);
        assert_eq!(script.steps.len(), 3);
        assert!(script.steps[1].contains("Light"));
    }

    #[test]
    fn positive_pool_below_threshold() {
        // 0.0 everywhere: two steps, positive pool, first entry
        let mut rng = ScriptedRandom::constant(0.0);
        let script = generate_thinking(&ctx(FlavorTag::Sprinkles.into(), &[]), &mut rng);
        assert_eq!(script.thought, "Party on a cone!");
        assert_eq!(script.emoji, "🎉");
    }

    #[test]
    fn thoughtful_pool_above_threshold() {
        let mut rng = ScriptedRandom::constant(0.8);
        let script = generate_thinking(&ctx(FlavorTag::Caramel.into(), &[]), &mut rng);
        assert_eq!(script.thought, "Sweet with a hint of salt. Complex.");
    }

    #[test]
    fn placeholders_fall_back_without_history() {
        let text = render("{LAST_CHOICE} / {HISTORY}", &ctx(Selection::Skip, &[Selection::Skip]));
        assert_eq!(text, "nothing yet / a blank slate");

        let history = [
            Selection::Flavor(FlavorTag::Adventure),
            Selection::Skip,
            Selection::Flavor(FlavorTag::Smooth),
        ];
        let text = render("{LAST_CHOICE} / {HISTORY}", &ctx(FlavorTag::Caramel.into(), &history));
        assert_eq!(text, "Smooth / Adventure, Smooth");
    }

    #[test]
    fn skip_script_uses_skip_templates() {
        let mut rng = ScriptedRandom::constant(0.0);
        let script = generate_thinking(&ctx(Selection::Skip, &[]), &mut rng);
        assert_eq!(script.steps.len(), 2);
        assert_eq!(script.steps[0], "Wait, Amy skipped this one...");
        assert!(SKIP_RESPONSES.iter().any(|(t, _)| *t == script.thought));
    }
}
