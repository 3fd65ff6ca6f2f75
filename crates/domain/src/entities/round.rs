//! Round configuration - the four fixed binary choices every player makes

use serde::{Deserialize, Serialize};

use crate::value_objects::{FlavorTag, RoundStage};

/// One of the two images offered in a round
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ImageChoice {
    pub id: String,
    pub image: String,
    pub value: FlavorTag,
}

impl ImageChoice {
    fn for_tag(tag: FlavorTag) -> Self {
        let slug = tag.as_str().to_ascii_lowercase();
        Self {
            id: slug.clone(),
            image: format!("/images/choices/{}.png", slug),
            value: tag,
        }
    }
}

/// A single binary-choice step
///
/// # ADR-008 Tier 4: Simple Data Struct
///
/// Static configuration; every round is built by `Round::standard_rounds`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Round {
    /// 1-based round number
    pub id: u8,
    pub stage: RoundStage,
    pub question: String,
    pub choices: [ImageChoice; 2],
}

impl Round {
    fn for_stage(id: u8, stage: RoundStage) -> Self {
        let question = match stage {
            RoundStage::Style => "Which adventure calls to you?",
            RoundStage::Sweetness => "How sweet is your perfect moment?",
            RoundStage::Texture => "Smooth sailing or a little crunch?",
            RoundStage::Topping => "Pick the crown for your cone!",
        };
        let [first, second] = stage.choices();
        Self {
            id,
            stage,
            question: question.to_string(),
            choices: [ImageChoice::for_tag(first), ImageChoice::for_tag(second)],
        }
    }

    /// The four rounds in play order: style, sweetness, texture, toppings.
    pub fn standard_rounds() -> Vec<Round> {
        RoundStage::ALL
            .iter()
            .enumerate()
            .map(|(index, stage)| Round::for_stage(index as u8 + 1, *stage))
            .collect()
    }

    pub fn offers(&self, tag: FlavorTag) -> bool {
        self.choices.iter().any(|choice| choice.value == tag)
    }

    /// Choice by 1-based position, as shown to the player
    pub fn choice_at(&self, position: usize) -> Option<&ImageChoice> {
        position.checked_sub(1).and_then(|index| self.choices.get(index))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn standard_rounds_follow_stage_order() {
        let rounds = Round::standard_rounds();
        let stages: Vec<RoundStage> = rounds.iter().map(|r| r.stage).collect();
        assert_eq!(stages, RoundStage::ALL.to_vec());
        assert_eq!(rounds[0].id, 1);
        assert_eq!(rounds[3].id, 4);
    }

    #[test]
    fn each_round_offers_only_its_stage_tags() {
        for round in Round::standard_rounds() {
            for tag in FlavorTag::ALL {
                assert_eq!(round.offers(tag), tag.stage() == round.stage);
            }
        }
    }

    #[test]
    fn choice_positions_are_one_based() {
        let round = &Round::standard_rounds()[0];
        assert_eq!(round.choice_at(1).map(|c| c.value), Some(FlavorTag::Adventure));
        assert_eq!(round.choice_at(2).map(|c| c.value), Some(FlavorTag::Classic));
        assert!(round.choice_at(0).is_none());
        assert!(round.choice_at(3).is_none());
    }
}
