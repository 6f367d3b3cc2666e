use std::collections::{BTreeMap, BTreeSet};

use tripweave_shared::{Error, Itinerary, MapImage, Result};

use crate::{Token, Tokens};

const OVERALL: &str = "overall";

#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum ArtifactKey {
    Overall,
    /// `YYYY-MM-DD` key of the itinerary.
    Day(String),
}

impl ArtifactKey {
    pub fn parse(value: &str) -> Self {
        if value == OVERALL {
            return Self::Overall;
        }

        Self::Day(value.to_owned())
    }
}

impl std::fmt::Display for ArtifactKey {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ArtifactKey::Overall => f.write_str(OVERALL),
            ArtifactKey::Day(date) => f.write_str(date),
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub enum ArtifactState {
    #[default]
    Absent,
    Pending,
    Ready(MapImage),
    Failed(String),
}

#[derive(Debug, Default)]
struct Entry {
    state: ArtifactState,
    token: Option<Token>,
    requests: usize,
}

/// Lazily populated map artifacts: one overall entry plus one per itinerary
/// day.
///
/// At most one request per key is in flight. A ready entry is final for the
/// session, a failed one is retried only when asked again.
#[derive(Debug, Default)]
pub struct ArtifactCache {
    days: BTreeSet<String>,
    entries: BTreeMap<ArtifactKey, Entry>,
}

impl ArtifactCache {
    pub fn for_itinerary(itinerary: &Itinerary) -> Self {
        Self {
            days: itinerary.dates().map(str::to_owned).collect(),
            entries: BTreeMap::new(),
        }
    }

    pub fn is_valid(&self, key: &ArtifactKey) -> bool {
        match key {
            ArtifactKey::Overall => true,
            ArtifactKey::Day(date) => self.days.contains(date),
        }
    }

    /// Returns the token of a request the caller must now issue, or `None`
    /// when the entry is already pending or ready.
    pub fn ensure(&mut self, key: &ArtifactKey, tokens: &mut Tokens) -> Result<Option<Token>> {
        if !self.is_valid(key) {
            tripweave_shared::validation!("`{key}` is not a day of this itinerary.");
        }

        match self.state(key) {
            ArtifactState::Pending | ArtifactState::Ready(_) => Ok(None),
            ArtifactState::Absent | ArtifactState::Failed(_) => {
                self.mark_pending(key, tokens).map(Some)
            }
        }
    }

    fn mark_pending(&mut self, key: &ArtifactKey, tokens: &mut Tokens) -> Result<Token> {
        let entry = self.entries.entry(key.clone()).or_default();
        if entry.state == ArtifactState::Pending {
            return Err(Error::DuplicateRequest(key.to_string()));
        }

        let token = tokens.next();
        entry.state = ArtifactState::Pending;
        entry.token = Some(token);
        entry.requests += 1;
        tracing::debug!(%key, %token, attempt = entry.requests, "rendering map");

        Ok(token)
    }

    /// Applies a finished render. Returns `false` when the completion does
    /// not belong to the pending request of that key.
    pub fn complete(&mut self, key: &ArtifactKey, token: Token, result: Result<MapImage>) -> bool {
        let Some(entry) = self.entries.get_mut(key) else {
            tracing::debug!(%key, %token, "discarding map for unknown entry");
            return false;
        };

        if entry.state != ArtifactState::Pending || entry.token != Some(token) {
            tracing::debug!(%key, %token, "discarding stale map");
            return false;
        }

        entry.token = None;
        entry.state = match result {
            Ok(image) => ArtifactState::Ready(image),
            Err(err) => {
                tracing::warn!(%key, %token, error = %err, "map render failed");
                ArtifactState::Failed(err.to_string())
            }
        };

        true
    }

    pub fn state(&self, key: &ArtifactKey) -> ArtifactState {
        self.entries
            .get(key)
            .map(|e| e.state.clone())
            .unwrap_or_default()
    }

    pub fn image(&self, key: &ArtifactKey) -> Option<&MapImage> {
        match self.entries.get(key).map(|e| &e.state) {
            Some(ArtifactState::Ready(image)) => Some(image),
            _ => None,
        }
    }

    /// Number of requests issued for a key this session.
    pub fn requests(&self, key: &ArtifactKey) -> usize {
        self.entries.get(key).map(|e| e.requests).unwrap_or_default()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}
