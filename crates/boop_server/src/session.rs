//! One match between two connected players.

use crate::error::SessionError;
use crate::message::{ServerMessage, SessionId};
use boop_rules::{GameState, MoveError, PieceKind, Player, Position, Rank};
use std::collections::BTreeMap;
use std::sync::{Mutex, MutexGuard, PoisonError};
use tokio::sync::mpsc;
use tracing::{debug, info, instrument, warn};

/// Outbound queue of one connected player.
pub type Outbox = mpsc::UnboundedSender<ServerMessage>;

/// A game session: the game plus the queues of the players seated at it.
///
/// All mutation happens under a single lock. Broadcasts are queued on the
/// unbounded outboxes before the lock is released, so every player sees the
/// states in commit order; the sockets are written by each player's writer
/// task.
#[derive(Debug)]
pub struct Session {
    id: SessionId,
    inner: Mutex<Table>,
}

#[derive(Debug)]
struct Table {
    game: GameState,
    players: BTreeMap<Player, Outbox>,
    closed: bool,
}

impl Session {
    /// Opens a session with its creator seated as player one. The creator's
    /// `joined` frame is queued right away.
    #[instrument(skip(creator))]
    pub fn open(id: SessionId, creator: Outbox) -> Self {
        info!(session_id = %id, "Creating new game session");
        let game = GameState::new();
        let joined = ServerMessage::Joined {
            game_id: id.clone(),
            player_id: Player::One,
            game_state: game.clone(),
        };
        if creator.send(joined).is_err() {
            debug!(session_id = %id, "Outbox closed, skipping joined frame");
        }

        Self {
            id,
            inner: Mutex::new(Table {
                game,
                players: BTreeMap::from([(Player::One, creator)]),
                closed: false,
            }),
        }
    }

    /// Session id.
    pub fn id(&self) -> &str {
        &self.id
    }

    fn lock(&self) -> MutexGuard<'_, Table> {
        self.inner.lock().unwrap_or_else(PoisonError::into_inner)
    }

    /// Seats a player in the first free seat and returns it.
    ///
    /// The `joined` frame is queued under the lock, so it always reaches the
    /// player before any broadcast.
    ///
    /// # Errors
    ///
    /// Returns [`SessionError::Closed`] once the session has been torn down,
    /// or [`SessionError::Full`] if both seats are taken.
    #[instrument(skip(self, outbox), fields(session_id = %self.id))]
    pub fn seat(&self, outbox: Outbox) -> Result<Player, SessionError> {
        let mut table = self.lock();
        if table.closed {
            warn!("Seat requested on a closed session");
            return Err(SessionError::Closed);
        }

        let Some(player) = [Player::One, Player::Two]
            .into_iter()
            .find(|player| !table.players.contains_key(player))
        else {
            warn!("Session already has 2 players");
            return Err(SessionError::Full);
        };

        let joined = ServerMessage::Joined {
            game_id: self.id.clone(),
            player_id: player,
            game_state: table.game.clone(),
        };
        if outbox.send(joined).is_err() {
            debug!(%player, "Outbox closed, skipping joined frame");
        }
        table.players.insert(player, outbox);
        info!(%player, "Player seated");
        Ok(player)
    }

    /// Places a piece for `player`. `piece` is the rank code (0 kitten, 1 cat).
    ///
    /// # Errors
    ///
    /// Returns a [`SessionError`] without touching the game if the player may
    /// not move now or the rule engine refuses the placement.
    #[instrument(skip(self), fields(session_id = %self.id))]
    pub fn submit_move(
        &self,
        player: Player,
        position: Position,
        piece: u8,
    ) -> Result<(), SessionError> {
        let mut table = self.lock();
        table.check_turn(player)?;

        let rank = Rank::try_from(piece).map_err(|e| {
            warn!(error = %e, "Unknown piece code");
            MoveError::InvalidPieceKind(PieceKind::Empty)
        })?;

        let report = table
            .game
            .place(position, PieceKind::of(player, rank))
            .inspect_err(|e| warn!(error = %e, "Move rejected"))?;

        debug!(
            boops = report.boops.len(),
            graduated = ?report.graduated,
            phase = table.game.phase().label(),
            "Move completed successfully"
        );
        table.broadcast(&self.id);
        Ok(())
    }

    /// Submits a line or return choice for `player`.
    ///
    /// # Errors
    ///
    /// Returns a [`SessionError`] without touching the game if the player may
    /// not act now or the choice is not one on offer.
    #[instrument(skip(self), fields(session_id = %self.id))]
    pub fn submit_choice(&self, player: Player, position: Position) -> Result<(), SessionError> {
        let mut table = self.lock();
        table.check_turn(player)?;

        table
            .game
            .choose(position)
            .inspect_err(|e| warn!(error = %e, "Choice rejected"))?;

        debug!(phase = table.game.phase().label(), "Choice resolved");
        table.broadcast(&self.id);
        Ok(())
    }

    /// Unseats `player` and returns how many players remain.
    ///
    /// The session closes once nobody is left; it then refuses new seats.
    #[instrument(skip(self), fields(session_id = %self.id))]
    pub fn remove_player(&self, player: Player) -> usize {
        let mut table = self.lock();
        if table.players.remove(&player).is_some() {
            info!(%player, "Player left the session");
        }

        let remaining = table.players.len();
        if remaining == 0 {
            table.closed = true;
        }
        remaining
    }

    /// Number of seated players.
    pub fn player_count(&self) -> usize {
        self.lock().players.len()
    }

    /// Returns true once both seats are filled.
    pub fn is_full(&self) -> bool {
        self.player_count() == 2
    }

    /// Returns true once every player has left.
    pub fn is_closed(&self) -> bool {
        self.lock().closed
    }

    /// A copy of the game as it stands.
    pub fn game(&self) -> GameState {
        self.lock().game.clone()
    }

    /// Label of the current phase.
    pub fn phase_label(&self) -> &'static str {
        self.lock().game.phase().label()
    }

    /// An error frame for this session, tagged with the current phase.
    pub fn error_message(&self, payload: impl Into<String>) -> ServerMessage {
        ServerMessage::Error {
            game_id: self.id.clone(),
            payload: payload.into(),
            state: self.phase_label(),
        }
    }
}

impl Table {
    fn check_turn(&self, player: Player) -> Result<(), SessionError> {
        if self.closed {
            return Err(SessionError::Closed);
        }
        if !self.players.contains_key(&player) {
            return Err(SessionError::UnknownPlayer(player));
        }
        if self.game.is_concluded() {
            return Err(MoveError::GameOver.into());
        }
        if self.players.len() < 2 {
            return Err(SessionError::WaitingForOpponent);
        }
        if self.game.active_player() != player {
            warn!(
                %player,
                expected = %self.game.active_player(),
                "Player tried to move out of turn"
            );
            return Err(SessionError::NotYourTurn);
        }
        Ok(())
    }

    /// Queues the current game for every seated player. Must be called with
    /// the lock held.
    fn broadcast(&self, session_id: &str) {
        let state = self.game.phase().label();
        for (player, outbox) in &self.players {
            let message = ServerMessage::GameState {
                game_id: session_id.to_string(),
                player_id: *player,
                state,
                payload: self.game.clone(),
            };
            if outbox.send(message).is_err() {
                debug!(session_id, %player, "Outbox closed, skipping broadcast");
            }
        }
    }
}
