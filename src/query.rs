//! Read-only projections that bypass the engine and read committed state
//! directly — get-session, paginated list-sessions, and leaderboard
//! aggregation over FINISHED sessions.

use std::collections::HashMap;

use tracing::instrument;

use crate::db::{SessionFilter, SessionStore};
use crate::domain::Session;
use crate::error::EngineError;

/// Which ranking to compute for [`QueryService::leaderboard`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LeaderboardMetric {
    /// Rank by total wins, descending.
    WinCount,
    /// Rank by average moves per win, ascending (lower is better).
    Efficiency,
}

/// One player's aggregated standing.
#[derive(Debug, Clone, PartialEq)]
pub struct LeaderboardEntry {
    /// The player id.
    pub player_id: String,
    /// The player's display name, as last seen on a finished session.
    pub name: String,
    /// Finished sessions won.
    pub wins: u32,
    /// Finished sessions lost (someone else won while this player played).
    pub losses: u32,
    /// Finished sessions drawn while this player played.
    pub draws: u32,
    /// Average `moves_played / 2` across sessions this player won; `None`
    /// when `wins == 0`.
    pub efficiency: Option<f64>,
}

/// A page of sessions, compact projection.
#[derive(Debug, Clone)]
pub struct SessionPage {
    /// The sessions on this page.
    pub items: Vec<Session>,
    /// Opaque token for the next page, if there is one.
    pub next_cursor: Option<String>,
}

/// Read-only query operations over committed session state.
#[derive(Debug, Clone)]
pub struct QueryService {
    store: SessionStore,
}

impl QueryService {
    /// Builds a query service over the given store.
    pub fn new(store: SessionStore) -> Self {
        Self { store }
    }

    /// Full projection for one session, including its move log.
    #[instrument(skip(self))]
    pub fn get_session(&self, session_id: &str) -> Result<Session, EngineError> {
        let row = self
            .store
            .get_session(session_id)
            .map_err(EngineError::from)?
            .ok_or_else(|| EngineError::not_found("session does not exist"))?;
        let moves = self.store.list_moves(session_id).map_err(EngineError::from)?;
        Session::from_row(row, moves)
    }

    /// Lists sessions matching `filter`, newest first.
    #[instrument(skip(self, filter))]
    pub fn list_sessions(&self, filter: SessionFilter) -> Result<SessionPage, EngineError> {
        let (rows, next_cursor) = self.store.list_sessions(filter).map_err(EngineError::from)?;
        let items = rows
            .into_iter()
            .map(|row| {
                let id = row.id().clone();
                let moves = self.store.list_moves(&id).map_err(EngineError::from)?;
                Session::from_row(row, moves)
            })
            .collect::<Result<Vec<_>, EngineError>>()?;
        Ok(SessionPage { items, next_cursor })
    }

    /// Computes the leaderboard over all FINISHED sessions.
    #[instrument(skip(self))]
    pub fn leaderboard(
        &self,
        metric: LeaderboardMetric,
        limit: usize,
    ) -> Result<Vec<LeaderboardEntry>, EngineError> {
        let finished = self.store.finished_sessions().map_err(EngineError::from)?;
        let session_ids: Vec<String> = finished.iter().map(|row| row.id().clone()).collect();
        let move_counts = self
            .store
            .move_counts(&session_ids)
            .map_err(EngineError::from)?;

        let mut stats: HashMap<String, PlayerStats> = HashMap::new();

        for row in &finished {
            let players: Vec<(&String, &String)> = std::iter::once((row.host_id(), row.host_name()))
                .chain(row.guest_id().iter().zip(row.guest_name().iter()))
                .collect();
            let move_count = *move_counts.get(row.id()).unwrap_or(&0) as u32;

            for (player_id, name) in players {
                let entry = stats.entry(player_id.clone()).or_default();
                entry.name = name.clone();
                if row.winner().as_deref() == Some(player_id.as_str()) {
                    entry.wins += 1;
                    entry.moves_in_wins += move_count;
                } else if *row.draw() {
                    entry.draws += 1;
                } else if row.winner().is_some() {
                    entry.losses += 1;
                }
            }
        }

        let mut entries: Vec<LeaderboardEntry> = stats
            .into_iter()
            .map(|(player_id, s)| LeaderboardEntry {
                player_id,
                name: s.name,
                wins: s.wins,
                losses: s.losses,
                draws: s.draws,
                efficiency: if s.wins == 0 {
                    None
                } else {
                    Some(f64::from(s.moves_in_wins) / 2.0 / f64::from(s.wins))
                },
            })
            .collect();

        match metric {
            LeaderboardMetric::WinCount => {
                entries.sort_by(|a, b| {
                    b.wins
                        .cmp(&a.wins)
                        .then(a.losses.cmp(&b.losses))
                        .then(a.name.cmp(&b.name))
                });
            }
            LeaderboardMetric::Efficiency => {
                entries.sort_by(|a, b| match (a.efficiency, b.efficiency) {
                    (Some(x), Some(y)) => x.partial_cmp(&y).unwrap_or(std::cmp::Ordering::Equal),
                    (Some(_), None) => std::cmp::Ordering::Less,
                    (None, Some(_)) => std::cmp::Ordering::Greater,
                    (None, None) => a.name.cmp(&b.name),
                });
            }
        }

        entries.truncate(limit);
        Ok(entries)
    }
}

#[derive(Debug, Default)]
struct PlayerStats {
    name: String,
    wins: u32,
    losses: u32,
    draws: u32,
    moves_in_wins: u32,
}
