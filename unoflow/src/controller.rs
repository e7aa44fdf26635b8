//! Orchestrates one game: takes move intents, checks them locally, talks to
//! the server and settles the result into the session.
//!
//! Every operation takes `&mut self`, so intents are handled one at a time and
//! a pending call-out cannot race a move. Nothing is changed locally before the
//! server confirmed it.

use std::collections::HashSet;

use tokio::sync::watch;
use tokio::time::Instant;
use tracing::{info, instrument, warn};

use crate::callout::{Acknowledgement, CallOut, CallOutResolution};
use crate::card::Card;
use crate::config::EngineConfig;
use crate::constants::PLAYER_COUNT;
use crate::error::{Result, TurnError};
use crate::legality;
use crate::player::PlayerRegistry;
use crate::prompt::{self, ColorPrompt};
use crate::reconcile::{self, PlayContext, RefreshReport};
use crate::remote::{decode_cards, GameServer};
use crate::session::GameSession;
use crate::snapshot::TableSnapshot;
use crate::table::TableState;
use crate::turn::{DrawOutcome, MoveOutcome};

pub struct TurnController<S, P> {
    server: S,
    prompt: P,
    config: EngineConfig,
    session: Option<GameSession>,
    snapshots: watch::Sender<Option<TableSnapshot>>,
}

impl<S, P> TurnController<S, P>
where
    S: GameServer,
    P: ColorPrompt,
{
    pub fn new(server: S, prompt: P, config: EngineConfig) -> Self {
        let (snapshots, _) = watch::channel(None);
        Self {
            server,
            prompt,
            config,
            session: None,
            snapshots,
        }
    }

    pub fn server(&self) -> &S {
        &self.server
    }

    pub fn config(&self) -> &EngineConfig {
        &self.config
    }

    pub fn session(&self) -> Option<&GameSession> {
        self.session.as_ref()
    }

    /// Receives a fresh snapshot after every settled transition, `None` while
    /// no game is running.
    pub fn subscribe(&self) -> watch::Receiver<Option<TableSnapshot>> {
        self.snapshots.subscribe()
    }

    pub fn snapshot(&self) -> Option<TableSnapshot> {
        self.session
            .as_ref()
            .map(|session| TableSnapshot::capture(session, Instant::now()))
    }

    /// When the pending call-out runs out, if there is one.
    pub fn call_out_deadline(&self) -> Option<Instant> {
        self.session.as_ref()?.call_out.deadline()
    }

    /// Starts a new game with exactly four uniquely named players, replacing
    /// any game in progress.
    #[instrument(skip(self))]
    pub async fn start_game(&mut self, names: Vec<String>) -> Result<()> {
        let names = validate_names(names)?;

        let response = self.server.start(&names).await?;
        let top = Card::try_from(&response.top_card)?;

        let mut players = PlayerRegistry::seat(&names);
        for dealt in &response.players {
            let Some(player) = players.get_mut(&dealt.player) else {
                warn!(player = %dealt.player, "Server dealt to an unknown player");
                continue;
            };
            player.hand = decode_cards(&dealt.cards)?;
            player.score = dealt.score.unwrap_or(0);
        }

        let first = response
            .next_player
            .filter(|name| players.contains(name))
            .or_else(|| names.first().cloned())
            .ok_or_else(|| TurnError::InvalidPlayers("nobody to start".to_string()))?;

        if let Some(previous) = self.session.take() {
            info!(game = %previous.id(), "Discarding previous game");
        }

        info!(game = %response.id, %first, %top, "Game started");
        self.session = Some(GameSession::new(
            response.id,
            players,
            TableState::new(top),
            first,
        ));
        self.publish();
        Ok(())
    }

    /// Drops the current game, cancelling any pending call-out.
    pub fn end_game(&mut self) -> Option<GameSession> {
        let mut session = self.session.take()?;
        session.call_out.cancel();
        self.publish();
        Some(session)
    }

    /// Plays `card` from `player`'s hand.
    #[instrument(skip(self, card), fields(card = %card))]
    pub async fn play_card(&mut self, player: &str, card: Card) -> Result<MoveOutcome> {
        let session = self.session.as_ref().ok_or(TurnError::NoActiveGame)?;
        let current = session.ensure_accepting()?;
        if current != player {
            return Err(TurnError::NotYourTurn(player.to_string()));
        }

        let hand = session
            .players()
            .get(player)
            .map(|held| held.hand.as_slice())
            .unwrap_or_default();
        if !hand.contains(&card) {
            return Err(TurnError::CardNotInHand(player.to_string()));
        }
        if !legality::is_playable(Some(&card), Some(session.table()), hand) {
            return Err(TurnError::IllegalMove);
        }

        // Going down to one card means calling UNO.
        let needs_call_out = hand.len() == 2;
        let game = session.id().clone();

        let wild_color = if card.is_wild() {
            match prompt::choose_within(&self.prompt, self.config.prompt_timeout).await {
                Some(color) => Some(color),
                None => {
                    info!(%player, "No wild color chosen, move abandoned");
                    return Err(TurnError::PromptTimeout);
                }
            }
        } else {
            None
        };

        let response = self
            .server
            .play(&game, &card, wild_color)
            .await
            .map_err(|error| {
                warn!(%player, %error, "Server rejected play");
                TurnError::ServerRejected(error)
            })?;

        let session = self.session.as_mut().ok_or(TurnError::NoActiveGame)?;
        let resolution = reconcile::resolve_next_player(
            &response,
            &PlayContext {
                players: &session.players,
                acting: player,
                direction: session.turn.direction(),
                played: &card,
            },
        );
        reconcile::apply_confirmed_play(&mut session.players, &mut session.table, player, &card);
        session.table.set_wild_color(wild_color);

        let winner = refresh_logged(&self.server, session).await;

        let reverse = card.reverses();
        let next = resolution.player.clone();
        let mut call_out_target = None;
        match &winner {
            Some(winner) => session.finish(winner.clone())?,
            None if needs_call_out => {
                session.turn.block(next.clone(), reverse)?;
                let call_out = session.call_out.start(
                    player.to_string(),
                    next.clone(),
                    self.config.call_out_window,
                    Instant::now(),
                );
                info!(%player, deadline = ?call_out.deadline(), "Waiting for UNO call");
                call_out_target = Some(player.to_string());
            }
            None => session.turn.advance(next.clone(), reverse)?,
        }
        debug_assert!(session.is_consistent());

        let direction = session.turn.direction();
        let forced_draw = match card.forced_draws() {
            0 => None,
            count => session
                .players
                .nth_after(&next, direction.reversed(), 1)
                .map(|seat| (seat.to_string(), count)),
        };

        info!(
            %player,
            %next,
            source = ?resolution.source,
            direction = direction.sign(),
            "Play settled"
        );
        self.publish();

        Ok(MoveOutcome {
            next_player: next,
            source: resolution.source,
            direction,
            forced_draw,
            call_out_target,
            winner,
        })
    }

    /// Draws a card for the player whose turn it is.
    #[instrument(skip(self))]
    pub async fn draw(&mut self) -> Result<DrawOutcome> {
        let session = self.session.as_ref().ok_or(TurnError::NoActiveGame)?;
        let current = session.ensure_accepting()?.to_string();
        let game = session.id().clone();

        let response = self.server.draw(&game).await.map_err(|error| {
            warn!(%current, %error, "Server rejected draw");
            TurnError::ServerRejected(error)
        })?;

        let session = self.session.as_mut().ok_or(TurnError::NoActiveGame)?;
        let resolution = reconcile::resolve_after_draw(
            &response,
            &session.players,
            &current,
            session.turn.direction(),
        );
        session.turn.advance(resolution.player.clone(), false)?;

        if let Some(winner) = refresh_logged(&self.server, session).await {
            session.finish(winner)?;
        }

        info!(drawn_by = %current, next = %resolution.player, "Draw settled");
        self.publish();

        Ok(DrawOutcome {
            drawn_by: response.player.filter(|name| !name.is_empty()).or(Some(current)),
            next_player: resolution.player,
            source: resolution.source,
        })
    }

    /// The UNO call. Resolves a pending call-out without penalty while its
    /// window is open; a late call takes the expiry path instead. Without a
    /// pending call-out this does nothing.
    pub async fn acknowledge_call_out(&mut self) -> Result<Option<CallOutResolution>> {
        let session = self.session.as_mut().ok_or(TurnError::NoActiveGame)?;
        if session.winner().is_some() {
            return Err(TurnError::NoActiveGame);
        }

        match session.call_out.acknowledge(Instant::now()) {
            Acknowledgement::NoCallOut => Ok(None),
            Acknowledgement::Late => {
                info!("UNO called after the deadline");
                self.expire_call_out().await
            }
            Acknowledgement::Accepted(call_out) => {
                info!(player = %call_out.target(), "UNO called in time");
                self.resolve_call_out(call_out, false).await.map(Some)
            }
        }
    }

    /// Applies the penalty for a missed call-out once its deadline passed.
    /// Before the deadline, or without a call-out, nothing happens.
    ///
    /// The draw request names no player, so the cards go to whoever the
    /// server has on turn. A server that already passed the turn on charges
    /// the next seat instead of the call-out target.
    pub async fn expire_call_out(&mut self) -> Result<Option<CallOutResolution>> {
        let session = self.session.as_ref().ok_or(TurnError::NoActiveGame)?;
        if !session.call_out.is_due(Instant::now()) {
            return Ok(None);
        }
        let Some(call_out) = session.call_out.active().cloned() else {
            return Ok(None);
        };
        let game = session.id().clone();

        warn!(
            player = %call_out.target(),
            draws = self.config.penalty_draws,
            "UNO not called, applying penalty"
        );
        for draw in 1..=self.config.penalty_draws {
            if let Err(error) = self.server.draw(&game).await {
                warn!(player = %call_out.target(), draw, %error, "Penalty draw failed");
                break;
            }
        }

        let session = self.session.as_mut().ok_or(TurnError::NoActiveGame)?;
        let Some(call_out) = session.call_out.finish(call_out.id()) else {
            return Ok(None);
        };
        self.resolve_call_out(call_out, true).await.map(Some)
    }

    /// Waits out the pending call-out and expires it.
    pub async fn run_call_out(&mut self) -> Result<Option<CallOutResolution>> {
        let Some(deadline) = self.call_out_deadline() else {
            return Ok(None);
        };
        tokio::time::sleep_until(deadline).await;
        self.expire_call_out().await
    }

    /// Re-reads the table and every hand from the server.
    pub async fn refresh(&mut self) -> Result<RefreshReport> {
        let session = self.session.as_mut().ok_or(TurnError::NoActiveGame)?;
        let report = reconcile::refresh(
            &self.server,
            &session.id,
            &mut session.players,
            &mut session.table,
        )
        .await?;

        if let Some(winner) = &report.winner {
            if session.winner().is_none() {
                session.finish(winner.clone())?;
            }
        }
        self.publish();
        Ok(report)
    }

    async fn resolve_call_out(
        &mut self,
        call_out: CallOut,
        penalized: bool,
    ) -> Result<CallOutResolution> {
        let session = self.session.as_mut().ok_or(TurnError::NoActiveGame)?;
        let next = session.turn.unblock()?;
        if next != call_out.resolved_next() {
            warn!(
                %next,
                expected = %call_out.resolved_next(),
                "Call-out resolved to a different player"
            );
        }

        if let Some(winner) = refresh_logged(&self.server, session).await {
            session.finish(winner)?;
        }
        debug_assert!(session.is_consistent());

        info!(player = %call_out.target(), %next, penalized, "Call-out resolved");
        self.publish();

        Ok(CallOutResolution {
            target: call_out.target().to_string(),
            next_player: next,
            penalized,
        })
    }

    fn publish(&self) {
        self.snapshots.send_replace(self.snapshot());
    }
}

/// Refreshes the session, logging instead of failing. Returns the winner if
/// the refresh found one.
async fn refresh_logged<S>(server: &S, session: &mut GameSession) -> Option<String>
where
    S: GameServer + ?Sized,
{
    match reconcile::refresh(server, &session.id, &mut session.players, &mut session.table).await
    {
        Ok(report) => report.winner,
        Err(error) => {
            warn!(%error, "Refresh failed, keeping local state");
            None
        }
    }
}

fn validate_names(names: Vec<String>) -> Result<Vec<String>> {
    let names = names
        .into_iter()
        .map(|name| name.trim().to_string())
        .collect::<Vec<_>>();

    if names.len() != PLAYER_COUNT {
        return Err(TurnError::InvalidPlayers(format!(
            "exactly {PLAYER_COUNT} players are needed, got {}",
            names.len()
        )));
    }
    if names.iter().any(|name| name.is_empty()) {
        return Err(TurnError::InvalidPlayers("names must not be empty".to_string()));
    }
    if names.iter().collect::<HashSet<_>>().len() != names.len() {
        return Err(TurnError::InvalidPlayers("names must be unique".to_string()));
    }

    Ok(names)
}
