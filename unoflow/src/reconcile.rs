//! Turning server answers into local state.
//!
//! The server does not always say who plays next, and when it does the field
//! name varies. [`resolve_next_player`] walks a fixed precedence list and
//! always lands on a seated player so play never stalls.

use tracing::{debug, warn};

use crate::card::Card;
use crate::player::PlayerRegistry;
use crate::remote::{decode_cards, DrawResponse, GameId, GameServer, PlayResponse, RemoteError};
use crate::table::TableState;
use crate::turn::Direction;

/// Where a resolved next player came from, most authoritative first.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum NextPlayerSource {
    NextPlayerField,
    PlayerField,
    Computed,
    /// Nothing usable came back; the seat after the acting player.
    SeatFallback,
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Resolution {
    pub player: String,
    pub source: NextPlayerSource,
}

/// Local facts the resolution needs besides the server's answer.
#[derive(Clone, Copy, Debug)]
pub struct PlayContext<'a> {
    pub players: &'a PlayerRegistry,
    pub acting: &'a str,
    pub direction: Direction,
    pub played: &'a Card,
}

type Resolver = fn(&PlayResponse, &PlayContext<'_>) -> Option<String>;

const PRECEDENCE: [(NextPlayerSource, Resolver); 3] = [
    (NextPlayerSource::NextPlayerField, declared_next_player),
    (NextPlayerSource::PlayerField, declared_player),
    (NextPlayerSource::Computed, computed_locally),
];

fn non_empty(field: &Option<String>) -> Option<String> {
    field.as_ref().filter(|name| !name.is_empty()).cloned()
}

fn declared_next_player(response: &PlayResponse, _ctx: &PlayContext<'_>) -> Option<String> {
    non_empty(&response.next_player)
}

fn declared_player(response: &PlayResponse, _ctx: &PlayContext<'_>) -> Option<String> {
    non_empty(&response.player)
}

fn computed_locally(_response: &PlayResponse, ctx: &PlayContext<'_>) -> Option<String> {
    let steps = if ctx.played.skips_next() { 2 } else { 1 };
    ctx.players
        .nth_after(ctx.acting, ctx.direction, steps)
        .map(str::to_string)
}

fn seat_fallback(ctx: &PlayContext<'_>) -> Option<String> {
    ctx.players
        .nth_after(ctx.acting, Direction::Clockwise, 1)
        .map(str::to_string)
}

/// Picks the next player after a confirmed play.
///
/// The first source in [`PRECEDENCE`] that yields a name wins. A name that is
/// not seated is replaced by the seat after the acting player.
pub fn resolve_next_player(response: &PlayResponse, ctx: &PlayContext<'_>) -> Resolution {
    let candidate = PRECEDENCE
        .iter()
        .find_map(|(source, resolve)| resolve(response, ctx).map(|name| (*source, name)));

    match candidate {
        Some((source, player)) if ctx.players.contains(&player) => {
            if source == NextPlayerSource::Computed {
                warn!(
                    acting = %ctx.acting,
                    %player,
                    "Server named no next player, computed locally"
                );
            }
            debug!(?source, %player, "Resolved next player");
            Resolution { player, source }
        }
        candidate => {
            let player = seat_fallback(ctx).unwrap_or_else(|| ctx.acting.to_string());
            warn!(
                rejected = ?candidate.map(|(_, name)| name),
                %player,
                "Next player unknown, falling back to the following seat"
            );
            Resolution {
                player,
                source: NextPlayerSource::SeatFallback,
            }
        }
    }
}

/// Picks the next player after a confirmed draw: the server's answer if it is
/// seated, otherwise one seat on in the current direction.
pub fn resolve_after_draw(
    response: &DrawResponse,
    players: &PlayerRegistry,
    current: &str,
    direction: Direction,
) -> Resolution {
    if let Some(player) = non_empty(&response.next_player).filter(|name| players.contains(name)) {
        return Resolution {
            player,
            source: NextPlayerSource::NextPlayerField,
        };
    }

    let player = players
        .nth_after(current, direction, 1)
        .unwrap_or(current)
        .to_string();
    warn!(
        declared = ?response.next_player,
        %player,
        "Draw response named no seated player, advancing one seat"
    );
    Resolution {
        player,
        source: NextPlayerSource::Computed,
    }
}

/// Records a play the server accepted: the card lands on the table and
/// leaves the acting player's hand.
pub fn apply_confirmed_play(
    players: &mut PlayerRegistry,
    table: &mut TableState,
    acting: &str,
    card: &Card,
) {
    if let Some(player) = players.get_mut(acting) {
        if !player.remove_card(card) {
            warn!(%acting, %card, "Confirmed card was not in the local hand");
        }
    }
    table.set_top(*card);
}

#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct RefreshReport {
    /// Players whose hand could not be fetched this time.
    pub failed: Vec<String>,
    /// First seated player found holding no cards.
    pub winner: Option<String>,
}

/// Pulls the top card and every hand from the server.
///
/// Without a top card the refresh is abandoned. A hand that cannot be
/// fetched keeps its previous contents.
pub async fn refresh<S>(
    server: &S,
    game: &GameId,
    players: &mut PlayerRegistry,
    table: &mut TableState,
) -> Result<RefreshReport, RemoteError>
where
    S: GameServer + ?Sized,
{
    let top = server.top_card(game).await?;
    table.set_top(Card::try_from(&top)?);

    let mut report = RefreshReport::default();

    for name in players.names() {
        let fetched = match server.hand(game, &name).await {
            Ok(response) => decode_cards(&response.cards).map(|cards| (cards, response.score)),
            Err(error) => Err(error),
        };

        match fetched {
            Ok((cards, score)) => {
                if let Some(player) = players.get_mut(&name) {
                    if player.cards_count() != cards.len() {
                        debug!(
                            player = %name,
                            before = player.cards_count(),
                            after = cards.len(),
                            "Hand size changed"
                        );
                    }
                    player.hand = cards;
                    player.score = score.unwrap_or(0);
                }
            }
            Err(error) => {
                warn!(player = %name, %error, "Could not fetch hand");
                report.failed.push(name);
            }
        }
    }

    report.winner = players
        .player_without_cards()
        .filter(|player| !report.failed.iter().any(|name| name == player.name()))
        .map(|player| player.name().to_string());

    Ok(report)
}
