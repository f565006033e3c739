//! Load-state coordination for the two roster fetches.
//!
//! [`LoadCoordinator`] owns the characters and planets result slots and
//! decides when the pair is ready to render. [`RosterLoader`] drives the
//! fetches against a [`DragonBallApi`] and feeds the coordinator, either
//! awaiting both results with `tokio::join!` or as two detached tasks that
//! publish every transition on a watch channel.

use crate::clients::{ClientError, DragonBallApi};
use crate::models::{Character, Planet};
use crate::services::resolver::Roster;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::sync::Arc;
use thiserror::Error;
use tokio::sync::{Mutex, watch};
use tokio_util::sync::CancellationToken;
use tracing::{debug, info, warn};

/// What counts as "arrived" for a collection.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum ReadinessPolicy {
    /// A collection counts once a non-empty result has been observed. A
    /// successful empty response is indistinguishable from one that has not
    /// arrived, so an empty planet list keeps the loader waiting forever.
    #[default]
    NonEmpty,

    /// A collection counts as soon as its fetch completed successfully.
    Completed,
}

impl fmt::Display for ReadinessPolicy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::NonEmpty => write!(f, "non-empty"),
            Self::Completed => write!(f, "completed"),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Collection {
    Characters,
    Planets,
}

impl fmt::Display for Collection {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Characters => write!(f, "characters"),
            Self::Planets => write!(f, "planets"),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum LoadError {
    #[error("Failed to fetch {collection}: {message}")]
    Fetch {
        collection: Collection,
        message: String,
    },

    #[error("Load cancelled")]
    Cancelled,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum LoadState {
    Loading,
    Ready(Roster),
    Failed(LoadError),
}

impl LoadState {
    #[must_use]
    pub const fn is_loading(&self) -> bool {
        matches!(self, Self::Loading)
    }

    #[must_use]
    pub const fn is_ready(&self) -> bool {
        matches!(self, Self::Ready(_))
    }

    #[must_use]
    pub const fn roster(&self) -> Option<&Roster> {
        match self {
            Self::Ready(roster) => Some(roster),
            _ => None,
        }
    }

    #[must_use]
    pub const fn error(&self) -> Option<&LoadError> {
        match self {
            Self::Failed(err) => Some(err),
            _ => None,
        }
    }
}

/// Completion of one of the two fetches.
#[derive(Debug)]
pub enum FetchOutcome {
    Characters(Result<Vec<Character>, ClientError>),
    Planets(Result<Vec<Planet>, ClientError>),
}

#[derive(Debug, Clone)]
enum Slot<T> {
    Pending,
    Loaded(Vec<T>),
    Failed(String),
}

impl<T> Slot<T> {
    fn arrived(&self, policy: ReadinessPolicy) -> Option<&[T]> {
        match self {
            Self::Loaded(items) if policy == ReadinessPolicy::Completed || !items.is_empty() => {
                Some(items.as_slice())
            }
            _ => None,
        }
    }

    fn failure(&self) -> Option<&str> {
        match self {
            Self::Failed(message) => Some(message.as_str()),
            _ => None,
        }
    }

    fn fill(
        &mut self,
        collection: Collection,
        result: Result<Vec<T>, ClientError>,
        policy: ReadinessPolicy,
    ) {
        match result {
            Ok(items) => {
                debug!("Received {} {}", items.len(), collection);
                // An empty result never hides an earlier non-empty one.
                if items.is_empty()
                    && policy == ReadinessPolicy::NonEmpty
                    && self.arrived(policy).is_some()
                {
                    return;
                }
                *self = Self::Loaded(items);
            }
            Err(e) => {
                warn!("Failed to fetch {}: {}", collection, e);
                *self = Self::Failed(e.to_string());
            }
        }
    }
}

/// Combines the characters and planets fetches into one readiness signal.
///
/// `Loading` moves to `Ready` once both collections have arrived under the
/// configured [`ReadinessPolicy`], or to `Failed` as soon as either fetch
/// fails. Both outcomes are terminal.
#[derive(Debug, Clone)]
pub struct LoadCoordinator {
    policy: ReadinessPolicy,
    characters: Slot<Character>,
    planets: Slot<Planet>,
    state: LoadState,
}

impl Default for LoadCoordinator {
    fn default() -> Self {
        Self::new(ReadinessPolicy::default())
    }
}

impl LoadCoordinator {
    #[must_use]
    pub const fn new(policy: ReadinessPolicy) -> Self {
        Self {
            policy,
            characters: Slot::Pending,
            planets: Slot::Pending,
            state: LoadState::Loading,
        }
    }

    #[must_use]
    pub const fn state(&self) -> &LoadState {
        &self.state
    }

    #[must_use]
    pub fn into_state(self) -> LoadState {
        self.state
    }

    #[must_use]
    pub const fn is_ready(&self) -> bool {
        self.state.is_ready()
    }

    #[must_use]
    pub const fn roster(&self) -> Option<&Roster> {
        self.state.roster()
    }

    pub fn record_characters(&mut self, result: Result<Vec<Character>, ClientError>) -> &LoadState {
        self.record(FetchOutcome::Characters(result))
    }

    pub fn record_planets(&mut self, result: Result<Vec<Planet>, ClientError>) -> &LoadState {
        self.record(FetchOutcome::Planets(result))
    }

    pub fn record(&mut self, outcome: FetchOutcome) -> &LoadState {
        if !self.state.is_loading() {
            debug!(
                "Load already settled, ignoring late {} result",
                outcome_collection(&outcome)
            );
            return &self.state;
        }

        match outcome {
            FetchOutcome::Characters(result) => {
                self.characters
                    .fill(Collection::Characters, result, self.policy);
            }
            FetchOutcome::Planets(result) => {
                self.planets.fill(Collection::Planets, result, self.policy);
            }
        }

        self.advance();
        &self.state
    }

    fn advance(&mut self) {
        let failure = self
            .characters
            .failure()
            .map(|m| (Collection::Characters, m))
            .or_else(|| self.planets.failure().map(|m| (Collection::Planets, m)));

        if let Some((collection, message)) = failure {
            self.state = LoadState::Failed(LoadError::Fetch {
                collection,
                message: message.to_string(),
            });
            return;
        }

        if let (Some(characters), Some(planets)) = (
            self.characters.arrived(self.policy),
            self.planets.arrived(self.policy),
        ) {
            let roster = Roster::build(characters, planets);
            info!(
                "Roster ready: {} characters, {} planets, {} unresolved origins",
                roster.len(),
                roster.planets.len(),
                roster.unresolved().count()
            );
            self.state = LoadState::Ready(roster);
        }
    }
}

const fn outcome_collection(outcome: &FetchOutcome) -> Collection {
    match outcome {
        FetchOutcome::Characters(_) => Collection::Characters,
        FetchOutcome::Planets(_) => Collection::Planets,
    }
}

/// Issues the characters and planets fetches and coordinates their results.
pub struct RosterLoader<A> {
    api: Arc<A>,
    policy: ReadinessPolicy,
}

impl<A> Clone for RosterLoader<A> {
    fn clone(&self) -> Self {
        Self {
            api: Arc::clone(&self.api),
            policy: self.policy,
        }
    }
}

impl<A: DragonBallApi + 'static> RosterLoader<A> {
    pub fn new(api: A, policy: ReadinessPolicy) -> Self {
        Self::from_shared(Arc::new(api), policy)
    }

    pub const fn from_shared(api: Arc<A>, policy: ReadinessPolicy) -> Self {
        Self { api, policy }
    }

    /// Runs both fetches concurrently and returns the settled state.
    ///
    /// Under [`ReadinessPolicy::NonEmpty`] the result is still `Loading` when
    /// either collection came back empty.
    pub async fn load(&self) -> LoadState {
        let (characters, planets) =
            tokio::join!(self.api.fetch_characters(), self.api.fetch_planets());

        let mut coordinator = LoadCoordinator::new(self.policy);
        coordinator.record_characters(characters);
        coordinator.record_planets(planets);
        coordinator.into_state()
    }

    pub async fn load_with_cancellation(
        &self,
        cancellation: CancellationToken,
    ) -> Result<LoadState, LoadError> {
        tokio::select! {
            biased;
            () = cancellation.cancelled() => {
                debug!("Roster load cancelled");
                Err(LoadError::Cancelled)
            }
            state = self.load() => Ok(state),
        }
    }

    /// Starts both fetches as detached tasks.
    ///
    /// Every state change is published on the returned receiver. After
    /// `cancellation` fires, completions are dropped without touching the
    /// coordinator.
    pub fn spawn(&self, cancellation: CancellationToken) -> watch::Receiver<LoadState> {
        let (tx, rx) = watch::channel(LoadState::Loading);
        let tx = Arc::new(tx);
        let coordinator = Arc::new(Mutex::new(LoadCoordinator::new(self.policy)));

        let api = Arc::clone(&self.api);
        spawn_fetch(
            async move { FetchOutcome::Characters(api.fetch_characters().await) },
            Arc::clone(&coordinator),
            Arc::clone(&tx),
            cancellation.clone(),
        );

        let api = Arc::clone(&self.api);
        spawn_fetch(
            async move { FetchOutcome::Planets(api.fetch_planets().await) },
            coordinator,
            tx,
            cancellation,
        );

        rx
    }
}

fn spawn_fetch<F>(
    fetch: F,
    coordinator: Arc<Mutex<LoadCoordinator>>,
    tx: Arc<watch::Sender<LoadState>>,
    cancellation: CancellationToken,
) where
    F: Future<Output = FetchOutcome> + Send + 'static,
{
    tokio::spawn(async move {
        let outcome = tokio::select! {
            biased;
            () = cancellation.cancelled() => return,
            outcome = fetch => outcome,
        };

        if cancellation.is_cancelled() {
            debug!(
                "Dropping {} result after cancellation",
                outcome_collection(&outcome)
            );
            return;
        }

        // Publish while holding the lock so snapshots reach the channel in
        // the order they were recorded.
        let mut guard = coordinator.lock().await;
        let state = guard.record(outcome);
        if state.is_loading() {
            return;
        }
        tx.send_if_modified(|current| {
            if *current == *state {
                false
            } else {
                *current = state.clone();
                true
            }
        });
        drop(guard);
    });
}
