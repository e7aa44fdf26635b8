use core::fmt;
use std::fmt::Display;

use strum_macros::{Display, EnumCount as EnumCountMacro, EnumIter, EnumString};

use crate::constants::{
    DRAW_TWO_VALUE, REVERSE_VALUE, SKIP_VALUE, WILD_DRAW_FOUR_VALUE, WILD_VALUE,
};

#[derive(Clone, Copy, Debug, Display, EnumString, EnumCountMacro, EnumIter, PartialEq, Eq, Hash)]
pub enum CardColor {
    Red,
    Blue,
    Green,
    Yellow,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum ColoredCard {
    Number(u8),
    Skip,
    Reverse,
    Draw,
}

impl ColoredCard {
    pub fn value(&self) -> u8 {
        match self {
            ColoredCard::Number(number) => *number,
            ColoredCard::Draw => DRAW_TWO_VALUE,
            ColoredCard::Skip => SKIP_VALUE,
            ColoredCard::Reverse => REVERSE_VALUE,
        }
    }

    fn from_value(value: u8) -> Option<Self> {
        match value {
            0..=9 => Some(ColoredCard::Number(value)),
            DRAW_TWO_VALUE => Some(ColoredCard::Draw),
            SKIP_VALUE => Some(ColoredCard::Skip),
            REVERSE_VALUE => Some(ColoredCard::Reverse),
            _ => None,
        }
    }
}

/// A card as the server deals it. Two cards with the same color and rank are
/// interchangeable.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum Card {
    Colored(CardColor, ColoredCard),
    /// Change-color wild.
    Wild,
    /// Draw-four wild.
    WildDraw,
}

impl Card {
    /// Builds a card from its color and numeric rank. Wild ranks ignore the
    /// color, every other rank needs one.
    pub fn from_parts(color: Option<CardColor>, value: u8) -> Option<Self> {
        match value {
            WILD_VALUE => Some(Card::Wild),
            WILD_DRAW_FOUR_VALUE => Some(Card::WildDraw),
            _ => Some(Card::Colored(color?, ColoredCard::from_value(value)?)),
        }
    }

    /// Intrinsic color, `None` for wild cards.
    pub fn color(&self) -> Option<CardColor> {
        match self {
            Card::Colored(color, _) => Some(*color),
            Card::Wild | Card::WildDraw => None,
        }
    }

    /// Numeric rank as used on the wire.
    pub fn value(&self) -> u8 {
        match self {
            Card::Colored(_, card) => card.value(),
            Card::Wild => WILD_VALUE,
            Card::WildDraw => WILD_DRAW_FOUR_VALUE,
        }
    }

    pub fn is_wild(&self) -> bool {
        matches!(self, Card::Wild | Card::WildDraw)
    }

    pub fn reverses(&self) -> bool {
        matches!(self, Card::Colored(_, ColoredCard::Reverse))
    }

    /// Skip, draw-two and draw-four make the following seat lose its turn.
    pub fn skips_next(&self) -> bool {
        matches!(
            self,
            Card::Colored(_, ColoredCard::Skip | ColoredCard::Draw) | Card::WildDraw
        )
    }

    /// Number of cards the skipped seat has to take.
    pub fn forced_draws(&self) -> u8 {
        match self {
            Card::Colored(_, ColoredCard::Draw) => 2,
            Card::WildDraw => 4,
            _ => 0,
        }
    }
}

impl Display for Card {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Card::Colored(color, card) => {
                write!(f, "{} {}", color, {
                    match card {
                        ColoredCard::Number(number) => number.to_string(),
                        ColoredCard::Skip => "Skip".to_string(),
                        ColoredCard::Reverse => "Reverse".to_string(),
                        ColoredCard::Draw => "Draw Two".to_string(),
                    }
                })
            }
            Card::Wild => write!(f, "Wild"),
            Card::WildDraw => write!(f, "Wild Draw Four"),
        }
    }
}

#[cfg(test)]
mod tests {
    use strum::{EnumCount, IntoEnumIterator};

    use super::*;

    #[test]
    fn return_correct_string_for_number_card() {
        let red_3 = Card::Colored(CardColor::Red, ColoredCard::Number(3));
        assert_eq!(red_3.to_string(), "Red 3");

        let blue_9 = Card::Colored(CardColor::Blue, ColoredCard::Number(9));
        assert_eq!(blue_9.to_string(), "Blue 9");
    }

    #[test]
    fn return_correct_string_for_action_cards() {
        let yellow_skip = Card::Colored(CardColor::Yellow, ColoredCard::Skip);
        assert_eq!(yellow_skip.to_string(), "Yellow Skip");

        let green_reverse = Card::Colored(CardColor::Green, ColoredCard::Reverse);
        assert_eq!(green_reverse.to_string(), "Green Reverse");

        let red_draw = Card::Colored(CardColor::Red, ColoredCard::Draw);
        assert_eq!(red_draw.to_string(), "Red Draw Two");
    }

    #[test]
    fn return_correct_string_for_wild_cards() {
        assert_eq!(Card::Wild.to_string(), "Wild");
        assert_eq!(Card::WildDraw.to_string(), "Wild Draw Four");
    }

    #[test]
    fn wire_values_match_server_numbering() {
        assert_eq!(Card::Colored(CardColor::Red, ColoredCard::Number(7)).value(), 7);
        assert_eq!(Card::Colored(CardColor::Red, ColoredCard::Draw).value(), 10);
        assert_eq!(Card::Colored(CardColor::Red, ColoredCard::Skip).value(), 11);
        assert_eq!(Card::Colored(CardColor::Red, ColoredCard::Reverse).value(), 12);
        assert_eq!(Card::WildDraw.value(), 13);
        assert_eq!(Card::Wild.value(), 14);
    }

    #[test]
    fn from_parts_rejects_colorless_ordinary_cards() {
        assert_eq!(Card::from_parts(None, 5), None);
        assert_eq!(Card::from_parts(Some(CardColor::Red), 15), None);
        assert_eq!(Card::from_parts(None, 14), Some(Card::Wild));
        assert_eq!(Card::from_parts(Some(CardColor::Blue), 13), Some(Card::WildDraw));
        assert_eq!(
            Card::from_parts(Some(CardColor::Green), 11),
            Some(Card::Colored(CardColor::Green, ColoredCard::Skip))
        );
    }

    #[test]
    fn skip_like_ranks_are_recognised() {
        assert!(Card::Colored(CardColor::Red, ColoredCard::Skip).skips_next());
        assert!(Card::Colored(CardColor::Red, ColoredCard::Draw).skips_next());
        assert!(Card::WildDraw.skips_next());
        assert!(!Card::Wild.skips_next());
        assert!(!Card::Colored(CardColor::Red, ColoredCard::Reverse).skips_next());
    }

    #[test]
    fn every_colored_rank_decodes_once_per_color() {
        let decoded = CardColor::iter()
            .flat_map(|color| {
                (0..=REVERSE_VALUE).filter_map(move |value| Card::from_parts(Some(color), value))
            })
            .count();
        assert_eq!(decoded, CardColor::COUNT * 13);
    }

    #[test]
    fn color_parses_from_server_names() {
        assert_eq!("Yellow".parse::<CardColor>().unwrap(), CardColor::Yellow);
        assert!("Black".parse::<CardColor>().is_err());
    }
}
