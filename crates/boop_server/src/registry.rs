//! Directory of live sessions and the pool of games waiting for a second
//! player.

use crate::error::{RegistryError, SessionError};
use crate::message::SessionId;
use crate::session::{Outbox, Session};
use boop_rules::Player;
use rand::Rng;
use std::collections::{HashMap, VecDeque};
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};
use tracing::{debug, info, instrument, warn};

const ID_ALPHABET: &[u8] = b"ABCDEFGHIJKLMNOPQRSTUVWXYZ0123456789";
const ID_LENGTH: usize = 6;

/// Manages all game sessions.
///
/// Cheap to clone; clones share the same directory. The directory lock is
/// never held while a session lock is taken.
#[derive(Debug, Clone, Default)]
pub struct Registry {
    inner: Arc<Mutex<Directory>>,
}

#[derive(Debug, Default)]
struct Directory {
    sessions: HashMap<SessionId, Arc<Session>>,
    waiting: VecDeque<SessionId>,
}

impl Registry {
    /// Creates an empty registry.
    #[instrument]
    pub fn new() -> Self {
        info!("Creating session registry");
        Self::default()
    }

    fn lock(&self) -> MutexGuard<'_, Directory> {
        self.inner.lock().unwrap_or_else(PoisonError::into_inner)
    }

    /// Opens a new session with `creator` as player one and puts it in the
    /// matchmaking pool.
    #[instrument(skip(self, creator))]
    pub fn create(&self, creator: Outbox) -> (Arc<Session>, Player) {
        let mut directory = self.lock();

        let id = loop {
            let candidate = generate_id();
            if !directory.sessions.contains_key(&candidate) {
                break candidate;
            }
            debug!(session_id = %candidate, "Session id collision, retrying");
        };

        let session = Arc::new(Session::open(id.clone(), creator));
        directory.sessions.insert(id.clone(), Arc::clone(&session));
        directory.waiting.push_back(id.clone());

        info!(session_id = %id, waiting = directory.waiting.len(), "Session pooled");
        (session, Player::One)
    }

    /// Takes session `id` out of the pool and seats `joiner` in it.
    ///
    /// # Errors
    ///
    /// Returns [`RegistryError::GameNotFound`] if no such session exists (or
    /// it closed meanwhile) and [`RegistryError::GameFull`] if it is not
    /// waiting for a player.
    #[instrument(skip(self, joiner))]
    pub fn join(&self, id: &str, joiner: Outbox) -> Result<(Arc<Session>, Player), RegistryError> {
        let session = {
            let mut directory = self.lock();
            let Some(index) = directory.waiting.iter().position(|waiting| waiting == id) else {
                return Err(if directory.sessions.contains_key(id) {
                    warn!(session_id = %id, "Session is not waiting for a player");
                    RegistryError::GameFull(id.to_string())
                } else {
                    warn!(session_id = %id, "Session not found");
                    RegistryError::GameNotFound(id.to_string())
                });
            };
            directory.waiting.remove(index);
            directory.sessions.get(id).cloned()
        };

        let session = session.ok_or_else(|| RegistryError::GameNotFound(id.to_string()))?;
        let player = session.seat(joiner).map_err(|e| match e {
            SessionError::Full => RegistryError::GameFull(id.to_string()),
            _ => RegistryError::GameNotFound(id.to_string()),
        })?;

        info!(session_id = %id, %player, "Player joined session");
        Ok((session, player))
    }

    /// Unseats `player` from `session`, tearing the session down once it is
    /// empty.
    #[instrument(skip(self, session), fields(session_id = %session.id()))]
    pub fn leave(&self, session: &Session, player: Player) {
        let remaining = session.remove_player(player);
        if remaining > 0 {
            info!(remaining, "Session kept for the remaining player");
            return;
        }

        let mut directory = self.lock();
        directory.sessions.remove(session.id());
        directory.waiting.retain(|id| id != session.id());
        info!(sessions = directory.sessions.len(), "Session torn down");
    }

    /// Ids of sessions waiting for a second player, oldest first.
    pub fn waiting_ids(&self) -> Vec<SessionId> {
        self.lock().waiting.iter().cloned().collect()
    }

    /// Looks up a live session.
    pub fn get(&self, id: &str) -> Option<Arc<Session>> {
        self.lock().sessions.get(id).cloned()
    }

    /// Number of live sessions.
    pub fn len(&self) -> usize {
        self.lock().sessions.len()
    }

    /// Returns true when no session is live.
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

/// A random six-character id drawn from `A-Z0-9`.
fn generate_id() -> SessionId {
    let mut rng = rand::thread_rng();
    (0..ID_LENGTH)
        .map(|_| char::from(ID_ALPHABET[rng.gen_range(0..ID_ALPHABET.len())]))
        .collect()
}
