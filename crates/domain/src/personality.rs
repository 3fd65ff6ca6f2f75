//! Ice cream personality resolution
//!
//! A personality is derived from a player's four selections at reveal time
//! and never stored. Resolution order:
//!
//! 1. All skips (or nothing chosen) - the "Empty Cone" easter egg
//! 2. More than half skipped - "Mysterious Skipper"
//! 3. Otherwise pad missing picks with random mystery tags and look the
//!    4-tuple up in the combination table

use serde::{Deserialize, Serialize};

use crate::random::{pick, RandomSource};
use crate::value_objects::{FlavorTag, RoundStage, Selection};

/// Derived end-of-game summary for one player
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct IceCreamPersonality {
    pub name: String,
    pub emoji: String,
    pub description: String,
    pub insights: Vec<String>,
    pub color: String,
    pub gradient: String,
}

impl IceCreamPersonality {
    fn new(
        name: &str,
        emoji: &str,
        description: &str,
        color: &str,
        gradient: &str,
    ) -> Self {
        Self {
            name: name.to_string(),
            emoji: emoji.to_string(),
            description: description.to_string(),
            insights: Vec::new(),
            color: color.to_string(),
            gradient: gradient.to_string(),
        }
    }

    fn with_insights(mut self, insights: Vec<String>) -> Self {
        self.insights = insights;
        self
    }
}

pub const EMPTY_CONE: &str = "Empty Cone";
pub const MYSTERIOUS_SKIPPER: &str = "Mysterious Skipper";
pub const DEFAULT_PERSONALITY: &str = "Delightful Discovery";

/// `"{style}-{sweetness}-{texture}-{topping}"`
pub fn combination_key(combo: &[FlavorTag; 4]) -> String {
    combo
        .iter()
        .map(FlavorTag::as_str)
        .collect::<Vec<_>>()
        .join("-")
}

/// Resolve the personality for a player's selections.
///
/// The only randomness is the mystery padding for partially skipped games.
pub fn resolve_personality(
    selections: &[Selection],
    rng: &mut dyn RandomSource,
) -> IceCreamPersonality {
    let skip_count = selections.iter().filter(|s| s.is_skip()).count();
    let chosen: Vec<FlavorTag> = selections.iter().filter_map(|s| s.flavor()).collect();

    if chosen.is_empty() {
        return empty_cone(skip_count);
    }
    if skip_count * 2 > selections.len() {
        return mysterious_skipper(skip_count);
    }

    let padded = skip_count > 0 || chosen.len() < RoundStage::ALL.len();
    let combo = pad_to_combination(&chosen, rng);
    let mut personality = combination_personality(&combo);

    let mut insights = combo.iter().map(|tag| tag_insight(*tag).to_string()).collect::<Vec<_>>();
    if padded {
        let missing = RoundStage::ALL.len().saturating_sub(chosen.len());
        personality.description = format!(
            "{} {}",
            personality.description,
            mystery_note(missing)
        );
        insights.push(format!(
            "You skipped {} round{}, so the freezer filled in {} mystery scoop{}.",
            skip_count,
            plural(skip_count),
            missing,
            plural(missing)
        ));
    }
    personality.with_insights(insights)
}

/// Fill the four slots from the chosen tags, then mystery tags.
///
/// Tags land in stage order when their stage slot is free. Padding draws
/// uniformly from all eight tags, so a mystery scoop can repeat a stage.
fn pad_to_combination(chosen: &[FlavorTag], rng: &mut dyn RandomSource) -> [FlavorTag; 4] {
    let mut slots: [Option<FlavorTag>; 4] = [None; 4];
    let mut overflow = Vec::new();
    for tag in chosen {
        let index = stage_index(tag.stage());
        match slots[index] {
            None => slots[index] = Some(*tag),
            Some(_) => overflow.push(*tag),
        }
    }
    let mut combo = [FlavorTag::Classic; 4];
    for (index, slot) in slots.iter().enumerate() {
        combo[index] = match slot {
            Some(tag) => *tag,
            None => match overflow.pop() {
                Some(tag) => tag,
                None => pick(rng, &FlavorTag::ALL).copied().unwrap_or(FlavorTag::Classic),
            },
        };
    }
    combo
}

fn stage_index(stage: RoundStage) -> usize {
    match stage {
        RoundStage::Style => 0,
        RoundStage::Sweetness => 1,
        RoundStage::Texture => 2,
        RoundStage::Topping => 3,
    }
}

fn plural(n: usize) -> &'static str {
    if n == 1 {
        ""
    } else {
        "s"
    }
}

fn mystery_note(missing: usize) -> &'static str {
    match missing {
        0 => "Every scoop was your own pick.",
        1 => "One mystery scoop snuck in, just to keep things interesting.",
        2 => "Half the cone is a mystery, and that suits you fine.",
        _ => "Most of this cone is a mystery, even to you.",
    }
}

fn empty_cone(skip_count: usize) -> IceCreamPersonality {
    IceCreamPersonality::new(
        EMPTY_CONE,
        "🍦",
        "You skipped every round! A crisp, empty cone: pure potential, zero commitment.",
        "#F5DEB3",
        "from-amber-100 to-yellow-200",
    )
    .with_insights(vec![
        format!("You skipped all {} rounds", skip_count),
        "You appreciate the cone for what it is".to_string(),
        "Minimalism is your love language".to_string(),
        "Next time, the freezer is waiting for you".to_string(),
    ])
}

fn mysterious_skipper(skip_count: usize) -> IceCreamPersonality {
    IceCreamPersonality::new(
        MYSTERIOUS_SKIPPER,
        "🕵️",
        "You kept your cards close. Nobody knows your true flavor, maybe not even you.",
        "#6B5B95",
        "from-purple-400 to-indigo-600",
    )
    .with_insights(vec![
        format!("You skipped {} rounds", skip_count),
        "Mystery is part of your charm".to_string(),
        "You choose carefully, or not at all".to_string(),
        "Your flavor profile remains classified".to_string(),
    ])
}

/// The combination table. Four named combinations; everything else falls
/// through to the default arm.
fn combination_personality(combo: &[FlavorTag; 4]) -> IceCreamPersonality {
    use FlavorTag::*;
    match combo {
        [Adventure, Rich, Crunchy, Sprinkles] => IceCreamPersonality::new(
            "Rainbow Hero Crunch",
            "🦸",
            "Bold, decadent and full of surprises. You dive into every adventure with a crunch and a celebration.",
            "#FF6B9D",
            "from-pink-400 via-purple-400 to-indigo-400",
        ),
        [Classic, Light, Smooth, Caramel] => IceCreamPersonality::new(
            "Golden Breeze Swirl",
            "🌅",
            "Gentle, warm and effortlessly elegant. You know the classics are classics for a reason.",
            "#F4C542",
            "from-yellow-200 via-amber-300 to-orange-300",
        ),
        [Adventure, Light, Smooth, Sprinkles] => IceCreamPersonality::new(
            "Cloud Surfer Sorbet",
            "☁️",
            "Curious and carefree. You chase new horizons without ever feeling weighed down.",
            "#7FDBFF",
            "from-sky-200 via-cyan-300 to-teal-300",
        ),
        [Classic, Rich, Crunchy, Caramel] => IceCreamPersonality::new(
            "Midnight Crunch Royale",
            "👑",
            "Grounded, indulgent and a little regal. You savor depth, texture and tradition.",
            "#8B4513",
            "from-amber-700 via-orange-800 to-stone-800",
        ),
        _ => IceCreamPersonality::new(
            DEFAULT_PERSONALITY,
            "🍨",
            "A one-of-a-kind blend nobody else would have dreamed up. Your cone is entirely your own.",
            "#FFB6C1",
            "from-rose-200 via-pink-300 to-fuchsia-300",
        ),
    }
}

fn tag_insight(tag: FlavorTag) -> &'static str {
    match tag {
        FlavorTag::Adventure => "You crave bold new experiences",
        FlavorTag::Classic => "You value timeless traditions",
        FlavorTag::Rich => "You love deep, indulgent moments",
        FlavorTag::Light => "You prefer things bright and refreshing",
        FlavorTag::Smooth => "You like life to flow smoothly",
        FlavorTag::Crunchy => "You enjoy a little texture and surprise",
        FlavorTag::Sprinkles => "You bring the party wherever you go",
        FlavorTag::Caramel => "You have a sweet, golden heart",
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::random::ScriptedRandom;

    fn flavors(tags: [FlavorTag; 4]) -> Vec<Selection> {
        tags.iter().map(|t| Selection::Flavor(*t)).collect()
    }

    const NAMED: [&str; 4] = [
        "Rainbow Hero Crunch",
        "Golden Breeze Swirl",
        "Cloud Surfer Sorbet",
        "Midnight Crunch Royale",
    ];

    #[test]
    fn every_combination_resolves_to_table_or_default() {
        let mut rng = ScriptedRandom::constant(0.5);
        let mut seen = std::collections::BTreeSet::new();
        for a in FlavorTag::ALL {
            for b in FlavorTag::ALL {
                for c in FlavorTag::ALL {
                    for d in FlavorTag::ALL {
                        let p = resolve_personality(&flavors([a, b, c, d]), &mut rng);
                        assert!(
                            NAMED.contains(&p.name.as_str()) || p.name == DEFAULT_PERSONALITY,
                            "unexpected personality {}",
                            p.name
                        );
                        assert!(!p.insights.is_empty());
                        seen.insert(p.name);
                    }
                }
            }
        }
        // Every named combination is reachable, plus the default
        assert_eq!(seen.len(), NAMED.len() + 1);
    }

    #[test]
    fn rainbow_hero_crunch() {
        let mut rng = ScriptedRandom::constant(0.0);
        let p = resolve_personality(
            &flavors([
                FlavorTag::Adventure,
                FlavorTag::Rich,
                FlavorTag::Crunchy,
                FlavorTag::Sprinkles,
            ]),
            &mut rng,
        );
        assert_eq!(p.name, "Rainbow Hero Crunch");
        assert_eq!(p.insights.len(), 4);
    }

    #[test]
    fn all_skips_is_empty_cone() {
        let mut rng = ScriptedRandom::constant(0.3);
        let p = resolve_personality(&[Selection::Skip; 4], &mut rng);
        assert_eq!(p.name, EMPTY_CONE);
        assert_eq!(resolve_personality(&[], &mut rng).name, EMPTY_CONE);
    }

    #[test]
    fn majority_skips_is_mysterious_skipper() {
        let mut rng = ScriptedRandom::constant(0.3);
        let selections = vec![
            Selection::Skip,
            Selection::Flavor(FlavorTag::Rich),
            Selection::Skip,
            Selection::Skip,
        ];
        assert_eq!(resolve_personality(&selections, &mut rng).name, MYSTERIOUS_SKIPPER);
    }

    #[test]
    fn half_skipped_pads_with_mystery_scoops() {
        // 0.0 always draws Adventure, the first tag
        let mut rng = ScriptedRandom::constant(0.0);
        let selections = vec![
            Selection::Skip,
            Selection::Flavor(FlavorTag::Rich),
            Selection::Flavor(FlavorTag::Crunchy),
            Selection::Skip,
        ];
        let p = resolve_personality(&selections, &mut rng);
        // Adventure-Rich-Crunchy-Adventure is not named
        assert_eq!(p.name, DEFAULT_PERSONALITY);
        assert_eq!(p.insights.len(), 5);
        assert!(p.description.contains("Half the cone is a mystery"));
    }

    #[test]
    fn padding_fills_free_stage_slots() {
        let mut rng = ScriptedRandom::constant(0.999);
        let combo = pad_to_combination(&[FlavorTag::Rich, FlavorTag::Adventure], &mut rng);
        assert_eq!(combo[0], FlavorTag::Adventure);
        assert_eq!(combo[1], FlavorTag::Rich);
        // 0.999 draws the last tag
        assert_eq!(combo[2], FlavorTag::Caramel);
        assert_eq!(combo[3], FlavorTag::Caramel);
    }

    #[test]
    fn key_joins_with_dashes() {
        assert_eq!(
            combination_key(&[
                FlavorTag::Classic,
                FlavorTag::Light,
                FlavorTag::Smooth,
                FlavorTag::Caramel
            ]),
            "Classic-Light-Smooth-Caramel"
        );
    }
}
