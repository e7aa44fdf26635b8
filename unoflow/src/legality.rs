//! Local move legality, mirroring the server's rules so obviously illegal
//! plays never leave the client.

use crate::card::Card;
use crate::table::TableState;

/// Whether `card` may be played on `table` by a player holding `hand`.
///
/// Missing information is treated as illegal.
pub fn is_playable(card: Option<&Card>, table: Option<&TableState>, hand: &[Card]) -> bool {
    let (Some(card), Some(table)) = (card, table) else {
        return false;
    };

    let effective_color = table.effective_color();

    match card {
        Card::Wild => true,
        Card::WildDraw => match effective_color {
            // Only legal when nothing in hand could follow the color instead.
            Some(color) => !hand.iter().any(|held| held.color() == Some(color)),
            None => true,
        },
        Card::Colored(color, _) => {
            effective_color == Some(*color) || card.value() == table.top().value()
        }
    }
}

/// Indices of the cards in `hand` that are currently playable.
pub fn playable_indices(table: &TableState, hand: &[Card]) -> Vec<usize> {
    hand.iter()
        .enumerate()
        .filter(|(_, card)| is_playable(Some(card), Some(table), hand))
        .map(|(index, _)| index)
        .collect()
}
