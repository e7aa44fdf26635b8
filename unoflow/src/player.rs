use rand::{seq::SliceRandom, thread_rng};

use crate::card::Card;
use crate::constants::AVATARS;
use crate::turn::Direction;

#[derive(Clone, Debug)]
pub struct Player {
    name: String,
    pub hand: Vec<Card>,
    pub score: i32,
    avatar: String,
}

impl Player {
    pub fn new(name: String, hand: Vec<Card>, score: i32, avatar: String) -> Self {
        Self {
            name,
            hand,
            score,
            avatar,
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn avatar(&self) -> &str {
        &self.avatar
    }

    pub fn cards_count(&self) -> usize {
        self.hand.len()
    }

    pub fn holds(&self, card: &Card) -> bool {
        self.hand.contains(card)
    }

    /// Drops one copy of `card`, returns whether it was held.
    pub(crate) fn remove_card(&mut self, card: &Card) -> bool {
        match self.hand.iter().position(|held| held == card) {
            Some(index) => {
                self.hand.remove(index);
                true
            }
            None => false,
        }
    }
}

/// Players in seating order. Seats never move once the game started.
#[derive(Clone, Debug)]
pub struct PlayerRegistry {
    seats: Vec<Player>,
}

impl PlayerRegistry {
    pub fn new(seats: Vec<Player>) -> Self {
        Self { seats }
    }

    /// Seats `names` in order with empty hands and a shuffled, distinct avatar
    /// each.
    pub fn seat(names: &[String]) -> Self {
        let mut avatars = AVATARS.to_vec();
        avatars.shuffle(&mut thread_rng());

        let seats = names
            .iter()
            .zip(avatars.into_iter().cycle())
            .map(|(name, avatar)| Player::new(name.clone(), Vec::new(), 0, avatar.to_string()))
            .collect();

        Self { seats }
    }

    pub fn len(&self) -> usize {
        self.seats.len()
    }

    pub fn is_empty(&self) -> bool {
        self.seats.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = &Player> {
        self.seats.iter()
    }

    pub fn names(&self) -> Vec<String> {
        self.seats.iter().map(|player| player.name.clone()).collect()
    }

    pub fn contains(&self, name: &str) -> bool {
        self.seat_of(name).is_some()
    }

    pub fn seat_of(&self, name: &str) -> Option<usize> {
        self.seats.iter().position(|player| player.name == name)
    }

    pub fn get(&self, name: &str) -> Option<&Player> {
        self.seats.iter().find(|player| player.name == name)
    }

    pub fn get_mut(&mut self, name: &str) -> Option<&mut Player> {
        self.seats.iter_mut().find(|player| player.name == name)
    }

    /// Name of the player `steps` seats away from `from` in `direction`.
    pub fn nth_after(&self, from: &str, direction: Direction, steps: usize) -> Option<&str> {
        let len = self.seats.len();
        let seat = self.seat_of(from)?;
        let offset = steps % len;
        let next = match direction {
            Direction::Clockwise => (seat + offset) % len,
            Direction::CounterClockwise => (seat + len - offset) % len,
        };
        Some(self.seats[next].name.as_str())
    }

    /// First seated player holding no cards.
    pub fn player_without_cards(&self) -> Option<&Player> {
        self.seats.iter().find(|player| player.hand.is_empty())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashSet;

    fn create_player_names(count: usize) -> Vec<String> {
        let mut player_names = Vec::new();
        for i in 0..count {
            player_names.push(format!("Player {}", i + 1));
        }
        player_names
    }

    #[test]
    fn seating_keeps_order_and_gives_distinct_avatars() {
        let registry = PlayerRegistry::seat(&create_player_names(4));

        assert_eq!(registry.names(), create_player_names(4));

        let avatars = registry.iter().map(|p| p.avatar()).collect::<HashSet<_>>();
        assert_eq!(avatars.len(), 4);
    }

    #[test]
    fn next_seat_wraps_clockwise() {
        let registry = PlayerRegistry::seat(&create_player_names(4));

        assert_eq!(registry.nth_after("Player 1", Direction::Clockwise, 1), Some("Player 2"));
        assert_eq!(registry.nth_after("Player 4", Direction::Clockwise, 1), Some("Player 1"));
        assert_eq!(registry.nth_after("Player 3", Direction::Clockwise, 2), Some("Player 1"));
    }

    #[test]
    fn next_seat_wraps_counter_clockwise() {
        let registry = PlayerRegistry::seat(&create_player_names(4));

        assert_eq!(
            registry.nth_after("Player 1", Direction::CounterClockwise, 1),
            Some("Player 4")
        );
        assert_eq!(
            registry.nth_after("Player 2", Direction::CounterClockwise, 2),
            Some("Player 4")
        );
    }

    #[test]
    fn next_seat_of_unknown_player_is_none() {
        let registry = PlayerRegistry::seat(&create_player_names(4));
        assert_eq!(registry.nth_after("Nobody", Direction::Clockwise, 1), None);
    }

    #[test]
    fn remove_card_drops_a_single_copy() {
        let mut player = Player::new(
            "Player 1".to_string(),
            vec![Card::Wild, Card::Wild, Card::WildDraw],
            0,
            "elf".to_string(),
        );

        assert!(player.remove_card(&Card::Wild));
        assert_eq!(player.cards_count(), 2);
        assert!(player.holds(&Card::Wild));
        assert!(!player.remove_card(&Card::Colored(
            crate::card::CardColor::Red,
            crate::card::ColoredCard::Number(1)
        )));
    }
}
