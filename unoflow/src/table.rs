use crate::card::{Card, CardColor};

/// Top of the discard pile plus the color chosen for it when it is a wild.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct TableState {
    top: Card,
    wild_color: Option<CardColor>,
}

impl TableState {
    pub fn new(top: Card) -> Self {
        Self {
            top,
            wild_color: None,
        }
    }

    pub fn with_wild_color(top: Card, wild_color: CardColor) -> Self {
        Self {
            top,
            wild_color: Some(wild_color),
        }
    }

    pub fn top(&self) -> &Card {
        &self.top
    }

    pub fn wild_color(&self) -> Option<CardColor> {
        self.wild_color
    }

    /// The color a card has to match. A wild on top only has one once its
    /// player picked it.
    pub fn effective_color(&self) -> Option<CardColor> {
        match self.top.color() {
            Some(color) => Some(color),
            None => self.wild_color,
        }
    }

    pub(crate) fn set_top(&mut self, top: Card) {
        self.top = top;
    }

    pub(crate) fn set_wild_color(&mut self, wild_color: Option<CardColor>) {
        self.wild_color = wild_color;
    }
}
