// Aggregate snapshot store
// Owner-keyed cache over the repository ports: single-flight fetch
// de-duplication, a generation counter for invalidation, and atomic
// whole-snapshot replacement.
//
// Freshness contract: a snapshot is served indefinitely until a write-path
// event calls `invalidate` (or a caller forces a refresh). There is no
// TTL-based expiry.

use std::collections::HashMap;
use std::sync::Arc;

use chrono::Utc;
use tokio::sync::{watch, Mutex};
use tracing::{debug, info};

use backend_domain::entities::AnalyticsSnapshot;
use backend_domain::ports::{AttendeeRepository, MetadataRepository};
use backend_domain::services::{aggregator, normalizer, returning};
use backend_domain::{FetchError, OwnerId};

use crate::Metrics;

type FlightOutcome = Result<Arc<AnalyticsSnapshot>, FetchError>;

/// An upstream round trip in progress. Identified by the generation it was
/// launched under; a landing flight whose generation is behind the slot's
/// current one is delivered to its waiters but never stored.
struct Flight {
    generation: u64,
    outcome: watch::Receiver<Option<FlightOutcome>>,
}

#[derive(Default)]
struct OwnerSlot {
    generation: u64,
    stale: bool,
    snapshot: Option<Arc<AnalyticsSnapshot>>,
    last_error: Option<FetchError>,
    flight: Option<Flight>,
}

impl OwnerSlot {
    fn fresh(&self) -> Option<&Arc<AnalyticsSnapshot>> {
        if self.stale {
            return None;
        }
        self.snapshot.as_ref()
    }
}

enum Plan {
    Hit(Arc<AnalyticsSnapshot>),
    Fail(FetchError),
    Join(watch::Receiver<Option<FlightOutcome>>),
    Lead {
        generation: u64,
        tx: watch::Sender<Option<FlightOutcome>>,
    },
}

pub struct AnalyticsStore {
    metadata_repo: Arc<dyn MetadataRepository>,
    attendee_repo: Arc<dyn AttendeeRepository>,
    metrics: Arc<Metrics>,
    slots: Mutex<HashMap<OwnerId, OwnerSlot>>,
}

impl AnalyticsStore {
    pub fn new(
        metadata_repo: Arc<dyn MetadataRepository>,
        attendee_repo: Arc<dyn AttendeeRepository>,
        metrics: Arc<Metrics>,
    ) -> Self {
        Self {
            metadata_repo,
            attendee_repo,
            metrics,
            slots: Mutex::new(HashMap::new()),
        }
    }

    /// Returns the owner's snapshot, fetching upstream only when needed.
    ///
    /// Concurrent callers for the same owner attach to the one in-flight
    /// fetch and all observe the same resolved snapshot or the same error.
    /// A failed fetch leaves any previously cached snapshot in place; the
    /// error is returned verbatim to the callers of that cycle, while later
    /// non-forced reads prefer the stale-but-valid snapshot over no data.
    pub async fn fetch(&self, owner: &OwnerId, force: bool) -> FlightOutcome {
        let plan = {
            let mut slots = self.slots.lock().await;
            let slot = slots.entry(owner.clone()).or_default();

            let current_flight = slot.flight.as_ref().and_then(|flight| {
                (flight.generation == slot.generation).then(|| flight.outcome.clone())
            });

            if let Some(outcome) = current_flight {
                self.metrics.record_flight_join();
                Plan::Join(outcome)
            } else if slot.flight.is_some() {
                // Invalidated while in flight; the old flight will be
                // discarded on landing, so lead a fresh one.
                self.lead(slot)
            } else if force {
                self.lead(slot)
            } else if let Some(snapshot) = slot.fresh() {
                self.metrics.record_store_hit();
                Plan::Hit(snapshot.clone())
            } else if let Some(error) = &slot.last_error {
                // No auto-retry: an errored cycle stays errored until an
                // invalidate or forced refresh starts the next one.
                match &slot.snapshot {
                    Some(snapshot) => {
                        self.metrics.record_store_hit();
                        Plan::Hit(snapshot.clone())
                    }
                    None => Plan::Fail(error.clone()),
                }
            } else {
                self.lead(slot)
            }
        };

        match plan {
            Plan::Hit(snapshot) => Ok(snapshot),
            Plan::Fail(error) => Err(error),
            Plan::Join(outcome) => Self::join_flight(outcome).await,
            Plan::Lead { generation, tx } => self.run_flight(owner, generation, tx).await,
        }
    }

    /// Marks the owner's snapshot stale. Does not fetch; the next `fetch`
    /// (or `refresh`) does.
    pub async fn invalidate(&self, owner: &OwnerId) {
        let mut slots = self.slots.lock().await;
        let slot = slots.entry(owner.clone()).or_default();
        slot.generation += 1;
        slot.stale = true;
        slot.last_error = None;
        debug!(
            "invalidated analytics for {} (generation {})",
            owner, slot.generation
        );
    }

    pub async fn refresh(&self, owner: &OwnerId) -> FlightOutcome {
        self.fetch(owner, true).await
    }

    fn lead(&self, slot: &mut OwnerSlot) -> Plan {
        let (tx, rx) = watch::channel(None);
        let generation = slot.generation;
        slot.flight = Some(Flight {
            generation,
            outcome: rx,
        });
        self.metrics.record_store_lead();
        Plan::Lead { generation, tx }
    }

    async fn join_flight(mut outcome: watch::Receiver<Option<FlightOutcome>>) -> FlightOutcome {
        loop {
            let settled = outcome.borrow().clone();
            if let Some(result) = settled {
                return result;
            }
            if outcome.changed().await.is_err() {
                return Err(FetchError::Network(
                    "analytics fetch ended before completing".to_string(),
                ));
            }
        }
    }

    async fn run_flight(
        &self,
        owner: &OwnerId,
        generation: u64,
        tx: watch::Sender<Option<FlightOutcome>>,
    ) -> FlightOutcome {
        let outcome: FlightOutcome = self.load_snapshot(owner).await.map(Arc::new);

        {
            let mut slots = self.slots.lock().await;
            let slot = slots.entry(owner.clone()).or_default();
            if slot
                .flight
                .as_ref()
                .map(|flight| flight.generation == generation)
                .unwrap_or(false)
            {
                slot.flight = None;
            }
            if slot.generation == generation {
                match &outcome {
                    Ok(snapshot) => {
                        // The whole snapshot is replaced in one step so
                        // readers never see a mix of two generations.
                        slot.snapshot = Some(snapshot.clone());
                        slot.stale = false;
                        slot.last_error = None;
                    }
                    Err(error) => {
                        slot.last_error = Some(error.clone());
                    }
                }
            } else {
                debug!(
                    "discarding stale fetch for {} (generation {} behind {})",
                    owner, generation, slot.generation
                );
            }
        }

        let _ = tx.send(Some(outcome.clone()));
        outcome
    }

    async fn load_snapshot(&self, owner: &OwnerId) -> Result<AnalyticsSnapshot, FetchError> {
        self.metrics.record_upstream_fetch();
        let (events, attendees) = tokio::join!(
            self.metadata_repo.list_events(owner),
            self.attendee_repo.list_attendees(owner)
        );
        let raw_events = events.map_err(|error| {
            self.metrics.record_upstream_error();
            error
        })?;
        let raw_attendees = attendees.map_err(|error| {
            self.metrics.record_upstream_error();
            error
        })?;

        let events = normalizer::normalize_events(raw_events);
        let attendees = normalizer::normalize_attendees(raw_attendees);

        let fetched_at = Utc::now();
        let reference_date = fetched_at.fixed_offset();
        let mut metrics = aggregator::compute_aggregate(&events);
        let returning_count = returning::count_returning(&attendees, &reference_date);
        metrics.return_rate_percent =
            returning::global_return_rate_percent(metrics.total_check_ins, returning_count);

        info!(
            "refreshed analytics for {}: {} events, {} attendees",
            owner,
            events.len(),
            attendees.len()
        );
        Ok(AnalyticsSnapshot {
            events,
            attendees,
            metrics,
            fetched_at,
        })
    }
}

#[cfg(test)]
mod tests {
    use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};
    use std::time::Duration;

    use async_trait::async_trait;
    use serde_json::json;

    use backend_domain::entities::{RawAttendeeRow, RawEventRow};

    use super::*;

    struct FakeBackend {
        event_calls: AtomicUsize,
        attendee_calls: AtomicUsize,
        fail: AtomicBool,
        release: watch::Receiver<bool>,
    }

    impl FakeBackend {
        /// Gate starts open: calls complete immediately.
        fn open() -> (Arc<Self>, watch::Sender<bool>) {
            Self::with_gate(true)
        }

        /// Gate starts closed: calls block until the sender flips it.
        fn gated() -> (Arc<Self>, watch::Sender<bool>) {
            Self::with_gate(false)
        }

        fn with_gate(open: bool) -> (Arc<Self>, watch::Sender<bool>) {
            let (tx, rx) = watch::channel(open);
            let backend = Arc::new(Self {
                event_calls: AtomicUsize::new(0),
                attendee_calls: AtomicUsize::new(0),
                fail: AtomicBool::new(false),
                release: rx,
            });
            (backend, tx)
        }

        async fn wait_released(&self) {
            let mut release = self.release.clone();
            loop {
                if *release.borrow() {
                    return;
                }
                if release.changed().await.is_err() {
                    return;
                }
            }
        }

        fn outcome<T>(&self, rows: Vec<T>) -> Result<Vec<T>, FetchError> {
            if self.fail.load(Ordering::SeqCst) {
                Err(FetchError::Network("connection refused".to_string()))
            } else {
                Ok(rows)
            }
        }
    }

    #[async_trait]
    impl MetadataRepository for FakeBackend {
        async fn list_events(&self, _owner: &OwnerId) -> Result<Vec<RawEventRow>, FetchError> {
            self.event_calls.fetch_add(1, Ordering::SeqCst);
            self.wait_released().await;
            self.outcome(vec![
                RawEventRow {
                    eventid: Some("ev-1".to_string()),
                    eventname: Some("Demo night".to_string()),
                    eventdate: Some("2025-04-07 19:30:00+00".to_string()),
                    totalattendance: Some(json!(80)),
                    totalrsvps: Some(json!(100)),
                    ..RawEventRow::default()
                },
                RawEventRow {
                    eventid: Some("ev-2".to_string()),
                    eventname: Some("Launch party".to_string()),
                    eventdate: Some("2025-05-02 18:00:00+00".to_string()),
                    totalattendance: Some(json!(50)),
                    totalrsvps: Some(json!(50)),
                    ..RawEventRow::default()
                },
            ])
        }

        async fn ping(&self) -> Result<(), FetchError> {
            Ok(())
        }
    }

    #[async_trait]
    impl AttendeeRepository for FakeBackend {
        async fn list_attendees(
            &self,
            _owner: &OwnerId,
        ) -> Result<Vec<RawAttendeeRow>, FetchError> {
            self.attendee_calls.fetch_add(1, Ordering::SeqCst);
            self.wait_released().await;
            self.outcome(vec![RawAttendeeRow {
                cleaned_email: Some("ada@example.com".to_string()),
                first_checkin_date: Some("2024-11-01 19:00:00+00".to_string()),
                total_events_checked_in: Some(json!("2")),
                ..RawAttendeeRow::default()
            }])
        }
    }

    fn store_for(backend: &Arc<FakeBackend>) -> Arc<AnalyticsStore> {
        Arc::new(AnalyticsStore::new(
            backend.clone(),
            backend.clone(),
            Arc::new(Metrics::default()),
        ))
    }

    #[tokio::test]
    async fn concurrent_fetches_share_one_upstream_round_trip() {
        let (backend, release) = FakeBackend::gated();
        let store = store_for(&backend);
        let owner = OwnerId::from("owner-1");

        let first = tokio::spawn({
            let store = store.clone();
            let owner = owner.clone();
            async move { store.fetch(&owner, false).await }
        });
        let second = tokio::spawn({
            let store = store.clone();
            let owner = owner.clone();
            async move { store.fetch(&owner, false).await }
        });

        tokio::time::sleep(Duration::from_millis(20)).await;
        release.send(true).expect("open gate");

        let a = first.await.expect("join").expect("fetch");
        let b = second.await.expect("join").expect("fetch");

        assert_eq!(backend.event_calls.load(Ordering::SeqCst), 1);
        assert_eq!(backend.attendee_calls.load(Ordering::SeqCst), 1);
        assert!(Arc::ptr_eq(&a, &b));
        assert_eq!(a.metrics.total_check_ins, 130);
        assert_eq!(a.metrics.check_in_rate_percent, 87);
    }

    #[tokio::test]
    async fn fresh_snapshots_are_served_without_refetching() {
        let (backend, _release) = FakeBackend::open();
        let store = store_for(&backend);
        let owner = OwnerId::from("owner-1");

        let first = store.fetch(&owner, false).await.expect("fetch");
        let second = store.fetch(&owner, false).await.expect("fetch");

        assert!(Arc::ptr_eq(&first, &second));
        assert_eq!(backend.event_calls.load(Ordering::SeqCst), 1);
    }

    #[tokio::test]
    async fn invalidate_makes_the_next_fetch_hit_upstream() {
        let (backend, _release) = FakeBackend::open();
        let store = store_for(&backend);
        let owner = OwnerId::from("owner-1");

        store.fetch(&owner, false).await.expect("fetch");
        store.invalidate(&owner).await;
        store.fetch(&owner, false).await.expect("fetch");

        assert_eq!(backend.event_calls.load(Ordering::SeqCst), 2);
        assert_eq!(backend.attendee_calls.load(Ordering::SeqCst), 2);
    }

    #[tokio::test]
    async fn refresh_forces_a_new_round_trip() {
        let (backend, _release) = FakeBackend::open();
        let store = store_for(&backend);
        let owner = OwnerId::from("owner-1");

        store.fetch(&owner, false).await.expect("fetch");
        store.refresh(&owner).await.expect("refresh");
        store.fetch(&owner, false).await.expect("fetch");

        assert_eq!(backend.event_calls.load(Ordering::SeqCst), 2);
    }

    #[tokio::test]
    async fn a_failed_refresh_keeps_serving_the_cached_snapshot() {
        let (backend, _release) = FakeBackend::open();
        let store = store_for(&backend);
        let owner = OwnerId::from("owner-1");

        let original = store.fetch(&owner, false).await.expect("fetch");

        backend.fail.store(true, Ordering::SeqCst);
        let error = store.refresh(&owner).await.expect_err("refresh fails");
        assert!(matches!(error, FetchError::Network(_)));

        let served = store.fetch(&owner, false).await.expect("stale fetch");
        assert!(Arc::ptr_eq(&original, &served));
    }

    #[tokio::test]
    async fn errors_with_no_snapshot_stick_until_invalidated() {
        let (backend, _release) = FakeBackend::open();
        backend.fail.store(true, Ordering::SeqCst);
        let store = store_for(&backend);
        let owner = OwnerId::from("owner-1");

        store.fetch(&owner, false).await.expect_err("first fetch fails");
        store.fetch(&owner, false).await.expect_err("error is sticky");
        assert_eq!(backend.event_calls.load(Ordering::SeqCst), 1);

        backend.fail.store(false, Ordering::SeqCst);
        store.invalidate(&owner).await;
        store.fetch(&owner, false).await.expect("fetch after invalidate");
        assert_eq!(backend.event_calls.load(Ordering::SeqCst), 2);
    }

    #[tokio::test]
    async fn invalidation_during_a_flight_discards_its_result() {
        let (backend, release) = FakeBackend::gated();
        let store = store_for(&backend);
        let owner = OwnerId::from("owner-1");

        let flight = tokio::spawn({
            let store = store.clone();
            let owner = owner.clone();
            async move { store.fetch(&owner, false).await }
        });
        tokio::time::sleep(Duration::from_millis(20)).await;
        store.invalidate(&owner).await;
        release.send(true).expect("open gate");

        // The stale flight still resolves for its caller...
        flight.await.expect("join").expect("stale flight result");

        // ...but its result was not stored: the next fetch leads a new one.
        store.fetch(&owner, false).await.expect("fetch");
        assert_eq!(backend.event_calls.load(Ordering::SeqCst), 2);
    }
}
