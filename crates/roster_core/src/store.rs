//! crates/roster_core/src/store.rs
//!
//! The client-side cache of the profile collection. It is the only stateful
//! component: every view is derived from the snapshot it holds, and every
//! mutation is followed by a full reload instead of a local patch.

use crate::availability::DayAvailabilityIndex;
use crate::domain::{DaySet, Profile, ProfileDraft, ProfileId};
use crate::matcher::{match_schedule, MatchReport};
use crate::ports::{PortError, PortResult, ProfileRepository};
use crate::projectors::{list_rows, reserved_view, ReservedQuery, ReservedView, WeeklyView};
use crate::validation::{validate_draft, DraftPurpose};
use std::future::Future;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::watch;
use tokio_util::sync::CancellationToken;
use tracing::{debug, info, warn};

//=========================================================================================
// Snapshot
//=========================================================================================

/// The full profile collection as of one successful load, in backend order.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Snapshot {
    profiles: Vec<Profile>,
}

impl Snapshot {
    pub fn new(profiles: Vec<Profile>) -> Self {
        Self { profiles }
    }

    pub fn profiles(&self) -> &[Profile] {
        &self.profiles
    }

    pub fn len(&self) -> usize {
        self.profiles.len()
    }

    pub fn is_empty(&self) -> bool {
        self.profiles.is_empty()
    }

    pub fn find(&self, id: &ProfileId) -> Option<&Profile> {
        self.profiles.iter().find(|profile| &profile.id == id)
    }

    pub fn availability(&self) -> DayAvailabilityIndex<'_> {
        DayAvailabilityIndex::new(&self.profiles)
    }

    pub fn list(&self, search: &str) -> Vec<&Profile> {
        list_rows(&self.profiles, search)
    }

    pub fn weekly(&self) -> WeeklyView<'_> {
        WeeklyView::new(&self.profiles)
    }

    pub fn match_days(&self, selected: DaySet) -> MatchReport<'_> {
        match_schedule(&self.profiles, selected)
    }

    pub fn reserved(&self, query: &ReservedQuery) -> ReservedView<'_> {
        reserved_view(&self.profiles, query)
    }
}

//=========================================================================================
// StoreState
//=========================================================================================

/// The lifecycle of the store's snapshot.
///
/// `Empty -> Loading -> Ready -> Loading -> Ready | Error`. `Loading` and
/// `Error` keep the last good snapshot so views can keep showing it.
#[derive(Debug, Clone, Default, PartialEq)]
pub enum StoreState {
    #[default]
    Empty,
    Loading {
        previous: Option<Arc<Snapshot>>,
    },
    Ready(Arc<Snapshot>),
    Error {
        error: PortError,
        last_good: Option<Arc<Snapshot>>,
    },
}

impl StoreState {
    /// The most recent good snapshot, whatever the current phase.
    pub fn snapshot(&self) -> Option<&Arc<Snapshot>> {
        match self {
            StoreState::Empty => None,
            StoreState::Loading { previous } => previous.as_ref(),
            StoreState::Ready(snapshot) => Some(snapshot),
            StoreState::Error { last_good, .. } => last_good.as_ref(),
        }
    }

    pub fn is_loading(&self) -> bool {
        matches!(self, StoreState::Loading { .. })
    }

    pub fn error(&self) -> Option<&PortError> {
        match self {
            StoreState::Error { error, .. } => Some(error),
            _ => None,
        }
    }
}

//=========================================================================================
// ProfileStore
//=========================================================================================

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct StoreOptions {
    /// Upper bound on every backend call.
    pub request_timeout: Duration,
}

impl Default for StoreOptions {
    fn default() -> Self {
        Self {
            request_timeout: Duration::from_secs(10),
        }
    }
}

pub struct ProfileStore {
    repo: Arc<dyn ProfileRepository>,
    options: StoreOptions,
    state: watch::Sender<StoreState>,
    /// Generation handed to the most recently started load.
    issued: AtomicU64,
    /// Generation of the most recently applied load result.
    applied: AtomicU64,
    shutdown: CancellationToken,
}

impl ProfileStore {
    pub fn new(repo: Arc<dyn ProfileRepository>, options: StoreOptions) -> Self {
        let (state, _) = watch::channel(StoreState::Empty);
        Self {
            repo,
            options,
            state,
            issued: AtomicU64::new(0),
            applied: AtomicU64::new(0),
            shutdown: CancellationToken::new(),
        }
    }

    pub fn state(&self) -> StoreState {
        self.state.borrow().clone()
    }

    /// The last good snapshot, if any load has ever succeeded.
    pub fn snapshot(&self) -> Option<Arc<Snapshot>> {
        self.state.borrow().snapshot().cloned()
    }

    /// Receives every state transition from now on.
    pub fn subscribe(&self) -> watch::Receiver<StoreState> {
        self.state.subscribe()
    }

    /// Fetches the whole collection and swaps it in as the new snapshot.
    ///
    /// On failure the previous snapshot stays available through
    /// [`StoreState::Error`]. A result that arrives after a newer load has
    /// already been applied is dropped.
    pub async fn load(&self) -> PortResult<Arc<Snapshot>> {
        if self.shutdown.is_cancelled() {
            return Err(PortError::Cancelled);
        }
        let generation = self.issued.fetch_add(1, Ordering::SeqCst) + 1;
        self.state.send_modify(|state| {
            let previous = state.snapshot().cloned();
            *state = StoreState::Loading { previous };
        });
        debug!(generation, "Loading profiles");

        let result = self.guarded(self.repo.list_profiles()).await;
        if self.shutdown.is_cancelled() {
            debug!(generation, "Store torn down, dropping load result");
            return Err(PortError::Cancelled);
        }

        match result {
            Ok(profiles) => {
                let snapshot = Arc::new(Snapshot::new(profiles));
                if self.apply(generation, StoreState::Ready(snapshot.clone())) {
                    info!(generation, profiles = snapshot.len(), "Profiles loaded");
                }
                Ok(snapshot)
            }
            Err(error) => {
                warn!(generation, %error, "Failed to load profiles");
                let last_good = self.snapshot();
                self.apply(
                    generation,
                    StoreState::Error {
                        error: error.clone(),
                        last_good,
                    },
                );
                Err(error)
            }
        }
    }

    /// Validates and submits a new profile, then reloads.
    pub async fn create(&self, draft: &ProfileDraft) -> PortResult<Profile> {
        validate_draft(draft, DraftPurpose::Create)?;
        let created = self
            .guarded(self.repo.create_profile(draft))
            .await
            .inspect_err(|error| warn!(%error, "Failed to create profile"))?;
        info!(id = %created.id, "Profile created");
        self.reload_after_mutation().await;
        Ok(created)
    }

    /// Validates and submits a full replacement of profile `id`, then reloads.
    pub async fn update(&self, id: &ProfileId, draft: &ProfileDraft) -> PortResult<Profile> {
        validate_draft(draft, DraftPurpose::Update)?;
        let updated = self
            .guarded(self.repo.update_profile(id, draft))
            .await
            .inspect_err(|error| warn!(%id, %error, "Failed to update profile"))?;
        info!(%id, "Profile updated");
        self.reload_after_mutation().await;
        Ok(updated)
    }

    /// Deletes profile `id`, then reloads. A failed delete triggers no reload.
    pub async fn remove(&self, id: &ProfileId) -> PortResult<()> {
        self.guarded(self.repo.delete_profile(id))
            .await
            .inspect_err(|error| warn!(%id, %error, "Failed to delete profile"))?;
        info!(%id, "Profile deleted");
        self.reload_after_mutation().await;
        Ok(())
    }

    /// Cancels outstanding calls and discards the snapshot. Results that
    /// arrive afterwards are ignored.
    pub fn teardown(&self) {
        self.shutdown.cancel();
        self.state.send_replace(StoreState::Empty);
        debug!("Profile store torn down");
    }

    /// The mutation already happened server-side, so a failed reload is
    /// reported through the state rather than as the mutation's result.
    async fn reload_after_mutation(&self) {
        if let Err(error) = self.load().await {
            warn!(%error, "Reload after mutation failed; keeping last snapshot");
        }
    }

    /// Publishes `next` unless the store was torn down or a newer load has
    /// already been applied. Both checks run under the channel lock.
    fn apply(&self, generation: u64, next: StoreState) -> bool {
        self.state.send_if_modified(|state| {
            if self.shutdown.is_cancelled() {
                debug!(generation, "Store torn down, discarding load result");
                return false;
            }
            if self.applied.load(Ordering::SeqCst) > generation {
                debug!(generation, "Discarding stale load result");
                return false;
            }
            self.applied.store(generation, Ordering::SeqCst);
            *state = next;
            true
        })
    }

    /// Runs one backend call under the request timeout and the teardown token.
    async fn guarded<T, F>(&self, call: F) -> PortResult<T>
    where
        F: Future<Output = PortResult<T>>,
    {
        let timeout = self.options.request_timeout;
        tokio::select! {
            biased;
            _ = self.shutdown.cancelled() => Err(PortError::Cancelled),
            outcome = tokio::time::timeout(timeout, call) => {
                outcome.unwrap_or(Err(PortError::Timeout(timeout)))
            }
        }
    }
}

impl Drop for ProfileStore {
    fn drop(&mut self) {
        self.shutdown.cancel();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::availability::tests::profile;
    use crate::domain::{Gender, PendingPhoto, Weekday};
    use crate::validation::Field;
    use async_trait::async_trait;
    use std::collections::VecDeque;
    use std::sync::atomic::AtomicUsize;
    use std::sync::Mutex;
    use tokio::sync::{oneshot, Notify};

    /// In-memory repository that counts calls and can be told to fail.
    #[derive(Default)]
    struct RepositoryStub {
        profiles: Mutex<Vec<Profile>>,
        list_calls: AtomicUsize,
        mutation_calls: AtomicUsize,
        fail_list: Mutex<Option<PortError>>,
        /// When set, `list_profiles` parks until notified.
        gate: Option<Arc<Notify>>,
        /// Per-call results; each `list_profiles` call takes the next one and
        /// waits for the test to send it.
        script: Mutex<VecDeque<oneshot::Receiver<PortResult<Vec<Profile>>>>>,
    }

    impl RepositoryStub {
        fn with(profiles: Vec<Profile>) -> Arc<Self> {
            Arc::new(Self {
                profiles: Mutex::new(profiles),
                ..Default::default()
            })
        }

        fn lists(&self) -> usize {
            self.list_calls.load(Ordering::SeqCst)
        }

        fn mutations(&self) -> usize {
            self.mutation_calls.load(Ordering::SeqCst)
        }
    }

    #[async_trait]
    impl ProfileRepository for RepositoryStub {
        async fn list_profiles(&self) -> PortResult<Vec<Profile>> {
            self.list_calls.fetch_add(1, Ordering::SeqCst);
            let scripted = self.script.lock().unwrap().pop_front();
            if let Some(result) = scripted {
                return result.await.unwrap_or(Err(PortError::Cancelled));
            }
            if let Some(gate) = &self.gate {
                gate.notified().await;
            }
            if let Some(error) = self.fail_list.lock().unwrap().clone() {
                return Err(error);
            }
            Ok(self.profiles.lock().unwrap().clone())
        }

        async fn create_profile(&self, draft: &ProfileDraft) -> PortResult<Profile> {
            self.mutation_calls.fetch_add(1, Ordering::SeqCst);
            let mut profiles = self.profiles.lock().unwrap();
            let created = Profile {
                id: ProfileId::new(format!("p{}", profiles.len() + 1)),
                first_name: draft.first_name.clone(),
                last_name: draft.last_name.clone(),
                email: draft.email.clone(),
                phone: draft.phone.clone(),
                photo: draft
                    .photo
                    .as_ref()
                    .map(|p| crate::domain::PhotoRef::new(p.file_name.clone())),
                kin1: draft.kin1.clone(),
                kin2: draft.kin2.clone(),
                gender: draft.gender,
                available_days: draft.available_days,
            };
            profiles.push(created.clone());
            Ok(created)
        }

        async fn update_profile(
            &self,
            id: &ProfileId,
            draft: &ProfileDraft,
        ) -> PortResult<Profile> {
            self.mutation_calls.fetch_add(1, Ordering::SeqCst);
            let mut profiles = self.profiles.lock().unwrap();
            let existing = profiles
                .iter_mut()
                .find(|p| &p.id == id)
                .ok_or_else(|| PortError::NotFound(format!("Profile {id} not found")))?;
            existing.first_name = draft.first_name.clone();
            existing.last_name = draft.last_name.clone();
            existing.available_days = draft.available_days;
            Ok(existing.clone())
        }

        async fn delete_profile(&self, id: &ProfileId) -> PortResult<()> {
            self.mutation_calls.fetch_add(1, Ordering::SeqCst);
            let mut profiles = self.profiles.lock().unwrap();
            let before = profiles.len();
            profiles.retain(|p| &p.id != id);
            if profiles.len() == before {
                return Err(PortError::NotFound(format!("Profile {id} not found")));
            }
            Ok(())
        }
    }

    fn store(repo: Arc<RepositoryStub>) -> ProfileStore {
        ProfileStore::new(repo, StoreOptions::default())
    }

    fn new_hire() -> ProfileDraft {
        ProfileDraft {
            first_name: "Mae".into(),
            last_name: "Jemison".into(),
            email: "mae@example.com".into(),
            phone: "5550123".into(),
            kin1: None,
            kin2: None,
            gender: Some(Gender::Female),
            available_days: DaySet::from([Weekday::Tuesday, Weekday::Thursday]),
            photo: Some(PendingPhoto::new("mae.jpg", vec![0xFFu8, 0xD8])),
        }
    }

    #[tokio::test]
    async fn starts_empty_and_becomes_ready() {
        let repo = RepositoryStub::with(vec![profile("1", "A", "A", &[Weekday::Monday])]);
        let store = store(repo.clone());
        assert_eq!(store.state(), StoreState::Empty);

        let snapshot = store.load().await.unwrap();
        assert_eq!(snapshot.len(), 1);
        assert_eq!(store.state(), StoreState::Ready(snapshot));
        assert_eq!(repo.lists(), 1);
    }

    #[tokio::test]
    async fn loading_twice_yields_equal_snapshots() {
        let repo = RepositoryStub::with(vec![
            profile("1", "A", "A", &[Weekday::Monday]),
            profile("2", "B", "B", &[Weekday::Friday]),
        ]);
        let store = store(repo);
        let first = store.load().await.unwrap();
        let second = store.load().await.unwrap();
        assert_eq!(*first, *second);
    }

    #[tokio::test]
    async fn failed_load_keeps_last_good_snapshot() {
        let repo = RepositoryStub::with(vec![profile("1", "A", "A", &[Weekday::Monday])]);
        let store = store(repo.clone());
        let good = store.load().await.unwrap();

        *repo.fail_list.lock().unwrap() = Some(PortError::Network("connection refused".into()));
        let err = store.load().await.unwrap_err();
        assert_eq!(err, PortError::Network("connection refused".into()));

        let state = store.state();
        assert_eq!(state.error(), Some(&err));
        assert_eq!(state.snapshot(), Some(&good));
        assert_eq!(store.snapshot(), Some(good));
    }

    #[tokio::test]
    async fn create_reloads_the_snapshot() {
        let repo = RepositoryStub::with(vec![]);
        let store = store(repo.clone());
        store.load().await.unwrap();

        let created = store.create(&new_hire()).await.unwrap();
        assert_eq!(created.first_name, "Mae");
        assert_eq!(repo.lists(), 2);
        let snapshot = store.snapshot().unwrap();
        assert_eq!(snapshot.find(&created.id), Some(&created));
    }

    #[tokio::test]
    async fn invalid_draft_never_reaches_the_backend() {
        let repo = RepositoryStub::with(vec![profile("1", "A", "A", &[Weekday::Monday])]);
        let store = store(repo.clone());
        let before = store.load().await.unwrap();

        let draft = ProfileDraft {
            email: String::new(),
            ..new_hire()
        };
        let err = store.create(&draft).await.unwrap_err();
        match err {
            PortError::Validation(errors) => {
                assert_eq!(errors.get(Field::Email), Some("Email is required"))
            }
            other => panic!("expected a validation error, got {other:?}"),
        }
        assert_eq!(repo.mutations(), 0);
        assert_eq!(repo.lists(), 1);
        assert_eq!(store.state(), StoreState::Ready(before));
    }

    #[tokio::test]
    async fn removing_a_missing_profile_does_not_reload() {
        let repo = RepositoryStub::with(vec![profile("1", "A", "A", &[Weekday::Monday])]);
        let store = store(repo.clone());
        let before = store.load().await.unwrap();

        let err = store.remove(&ProfileId::new("ghost")).await.unwrap_err();
        assert!(matches!(err, PortError::NotFound(_)));
        assert_eq!(repo.lists(), 1);
        assert_eq!(store.state(), StoreState::Ready(before));
    }

    #[tokio::test]
    async fn update_and_remove_reload_on_success() {
        let repo = RepositoryStub::with(vec![profile("1", "A", "A", &[Weekday::Monday])]);
        let store = store(repo.clone());
        let snapshot = store.load().await.unwrap();

        let mut draft = ProfileDraft::from(&snapshot.profiles()[0]);
        draft.available_days = DaySet::from([Weekday::Saturday]);
        store.update(&ProfileId::new("1"), &draft).await.unwrap();
        let reloaded = store.snapshot().unwrap();
        assert_eq!(
            reloaded.profiles()[0].available_days,
            DaySet::from([Weekday::Saturday])
        );

        store.remove(&ProfileId::new("1")).await.unwrap();
        assert!(store.snapshot().unwrap().is_empty());
        assert_eq!(repo.lists(), 3);
    }

    #[tokio::test]
    async fn update_of_missing_profile_surfaces_not_found() {
        let repo = RepositoryStub::with(vec![]);
        let store = store(repo.clone());
        store.load().await.unwrap();
        let draft = ProfileDraft {
            photo: None,
            ..new_hire()
        };
        let err = store.update(&ProfileId::new("nope"), &draft).await.unwrap_err();
        assert!(matches!(err, PortError::NotFound(_)));
        assert_eq!(repo.lists(), 1);
    }

    #[tokio::test(start_paused = true)]
    async fn slow_backend_times_out() {
        let gate = Arc::new(Notify::new());
        let repo = Arc::new(RepositoryStub {
            gate: Some(gate),
            ..Default::default()
        });
        let store = ProfileStore::new(
            repo,
            StoreOptions {
                request_timeout: Duration::from_millis(50),
            },
        );
        let err = store.load().await.unwrap_err();
        assert_eq!(err, PortError::Timeout(Duration::from_millis(50)));
        assert!(matches!(store.state(), StoreState::Error { last_good: None, .. }));
    }

    #[tokio::test]
    async fn teardown_cancels_in_flight_loads() {
        let gate = Arc::new(Notify::new());
        let repo = Arc::new(RepositoryStub {
            gate: Some(gate.clone()),
            ..Default::default()
        });
        let store = Arc::new(store(repo.clone()));

        let pending = tokio::spawn({
            let store = store.clone();
            async move { store.load().await }
        });
        while repo.lists() == 0 {
            tokio::task::yield_now().await;
        }
        assert!(store.state().is_loading());

        store.teardown();
        let result = pending.await.unwrap();
        assert_eq!(result, Err(PortError::Cancelled));
        assert_eq!(store.state(), StoreState::Empty);
        assert_eq!(store.load().await, Err(PortError::Cancelled));
    }

    #[tokio::test]
    async fn stale_load_cannot_overwrite_a_newer_snapshot() {
        let store = store(RepositoryStub::with(vec![]));
        let newer = Arc::new(Snapshot::new(vec![profile("2", "B", "B", &[])]));
        let older = Arc::new(Snapshot::new(vec![profile("1", "A", "A", &[])]));

        assert!(store.apply(2, StoreState::Ready(newer.clone())));
        assert!(!store.apply(1, StoreState::Ready(older)));
        assert_eq!(store.state(), StoreState::Ready(newer));
    }

    #[tokio::test]
    async fn overlapping_loads_keep_the_newest_result() {
        // Arrange: two loads in flight, the older one answered last.
        let (older_tx, older_rx) = oneshot::channel();
        let (newer_tx, newer_rx) = oneshot::channel();
        let repo = Arc::new(RepositoryStub {
            script: Mutex::new(VecDeque::from([older_rx, newer_rx])),
            ..Default::default()
        });
        let store = Arc::new(store(repo.clone()));

        let first = tokio::spawn({
            let store = store.clone();
            async move { store.load().await }
        });
        while repo.lists() < 1 {
            tokio::task::yield_now().await;
        }
        let second = tokio::spawn({
            let store = store.clone();
            async move { store.load().await }
        });
        while repo.lists() < 2 {
            tokio::task::yield_now().await;
        }

        // Act
        newer_tx.send(Ok(vec![profile("2", "B", "B", &[])])).unwrap();
        let newer = second.await.unwrap().unwrap();
        older_tx.send(Ok(vec![profile("1", "A", "A", &[])])).unwrap();
        let older = first.await.unwrap().unwrap();

        // Assert
        assert_ne!(older, newer);
        assert_eq!(store.state(), StoreState::Ready(newer));
    }

    #[tokio::test]
    async fn results_arriving_after_teardown_are_discarded() {
        let store = store(RepositoryStub::with(vec![]));
        let late = Arc::new(Snapshot::new(vec![profile("1", "A", "A", &[])]));

        store.teardown();

        assert!(!store.apply(1, StoreState::Ready(late)));
        assert_eq!(store.state(), StoreState::Empty);
    }

    #[tokio::test]
    async fn subscribers_observe_transitions() {
        let repo = RepositoryStub::with(vec![profile("1", "A", "A", &[Weekday::Monday])]);
        let store = store(repo);
        let mut updates = store.subscribe();

        store.load().await.unwrap();
        assert!(updates.has_changed().unwrap());
        assert!(matches!(*updates.borrow_and_update(), StoreState::Ready(_)));
    }
}
