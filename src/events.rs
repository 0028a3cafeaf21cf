//! Contract event subscription registry
//!
//! Single source of truth for "is this contract event currently being
//! listened to, and by whom". The registry tracks one active subscription
//! per (contract address, event name) pair, refuses duplicates, and
//! delegates the actual attach/detach work to an injected [`EventSource`]
//! capability. It performs no retry, no batching, and no reordering:
//! events for a pair arrive in whatever order the source emits them.

use std::collections::HashMap;
use std::sync::{Arc, Mutex, MutexGuard};

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Reserved event name meaning "all events emitted by the contract".
///
/// The registry treats the wildcard as an ordinary key: a wildcard
/// subscription and a named-event subscription on the same contract are
/// independent pairs.
pub const WILDCARD_EVENT: &str = "*";

/// Opaque failure reported by an external event source.
#[derive(Debug, Clone, Error)]
#[error("{0}")]
pub struct SourceError(String);

impl SourceError {
    /// Wrap a source-side failure message
    pub fn new(message: impl Into<String>) -> Self {
        Self(message.into())
    }
}

/// Subscription registry errors
///
/// All variants are recoverable; the registry never logs or swallows
/// them, it returns them to the caller.
#[derive(Debug, Error)]
pub enum EventError {
    /// The pair already has a live subscription; the original callback
    /// stays attached and no side effect was performed
    #[error("already subscribed to {contract_address}::{event_name}")]
    AlreadySubscribed {
        /// Contract the duplicate subscribe targeted
        contract_address: String,
        /// Event name the duplicate subscribe targeted
        event_name: String,
    },

    /// No live subscription exists for the pair
    #[error("not subscribed to {contract_address}::{event_name}")]
    NotSubscribed {
        /// Contract the unsubscribe targeted
        contract_address: String,
        /// Event name the unsubscribe targeted
        event_name: String,
    },

    /// The external event source failed to attach or detach
    #[error("event source unavailable: {0}")]
    SourceUnavailable(#[from] SourceError),

    /// Empty contract address or event name
    #[error("invalid subscription key: {0}")]
    InvalidKey(String),
}

/// Result type for registry operations
pub type Result<T> = std::result::Result<T, EventError>;

/// Opaque token identifying a live attachment at the event source,
/// used to detach it later
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct SubscriptionHandle(u64);

impl SubscriptionHandle {
    /// Create a handle from a source-assigned id
    pub fn new(raw: u64) -> Self {
        Self(raw)
    }

    /// The source-assigned id
    pub fn raw(&self) -> u64 {
        self.0
    }
}

/// Contract event payload delivered to subscription callbacks
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ContractEvent {
    /// Contract that emitted the event
    pub contract_address: String,
    /// Name of the emitted event
    pub event_name: String,
    /// Transaction that emitted the event, if the source reports one
    pub transaction_id: Option<String>,
    /// Block the event was included in, if the source reports one
    pub block_number: Option<u64>,
    /// Decoded event data (JSON)
    pub data: serde_json::Value,
    /// Source-reported timestamp (Unix milliseconds)
    pub timestamp: u64,
}

/// Handler invoked with event payloads
///
/// Shared, not owned: the registry records a clone of the `Arc` and the
/// caller keeps theirs.
pub type EventCallback = Arc<dyn Fn(ContractEvent) + Send + Sync>;

/// Boundary to the blockchain SDK's event machinery
///
/// Supplied by the caller; the registry never constructs or configures
/// it. Attach and detach may suspend (e.g. a network round-trip to
/// register a listener).
#[async_trait]
pub trait EventSource: Send + Sync {
    /// Begin delivering events for the pair to `callback`
    async fn attach(
        &self,
        contract_address: &str,
        event_name: &str,
        callback: EventCallback,
    ) -> std::result::Result<SubscriptionHandle, SourceError>;

    /// Stop the attachment identified by `handle`
    async fn detach(&self, handle: SubscriptionHandle) -> std::result::Result<(), SourceError>;
}

type PairKey = (String, String);

struct ActiveSubscription {
    handle: SubscriptionHandle,
    callback: EventCallback,
}

/// Tracks live contract event subscriptions keyed by
/// (contract address, event name)
///
/// Invariants:
/// - at most one active subscription per pair; re-subscribing an active
///   pair is a no-op signalled with [`EventError::AlreadySubscribed`];
/// - a pair is marked active only after the source attach succeeds;
/// - unsubscribe removes the entry optimistically: if the source detach
///   fails the entry is still cleared and the error surfaced, so that
///   cleanup against an unreachable source never wedges.
///
/// Subscribe/unsubscribe calls for the same pair are serialized in
/// submission order through a per-pair lock; distinct pairs do not
/// contend beyond a short map access.
pub struct SubscriptionRegistry {
    source: Arc<dyn EventSource>,
    // Per-pair serialization locks. Slots are retained after unsubscribe
    // so waiters queued on a pair never observe a dangling lock.
    locks: Mutex<HashMap<PairKey, Arc<tokio::sync::Mutex<()>>>>,
    active: Mutex<HashMap<PairKey, ActiveSubscription>>,
}

impl SubscriptionRegistry {
    /// Create a registry backed by the given event source
    pub fn new(source: Arc<dyn EventSource>) -> Self {
        Self {
            source,
            locks: Mutex::new(HashMap::new()),
            active: Mutex::new(HashMap::new()),
        }
    }

    /// Subscribe `callback` to events for the pair
    ///
    /// Returns [`EventError::AlreadySubscribed`] without side effect when
    /// the pair is already live, and [`EventError::SourceUnavailable`]
    /// when the source rejects the attach (registry state unchanged).
    pub async fn subscribe(
        &self,
        contract_address: &str,
        event_name: &str,
        callback: EventCallback,
    ) -> Result<()> {
        let key = pair_key(contract_address, event_name)?;
        let pair_lock = self.pair_lock(&key);
        let _serialized = pair_lock.lock().await;

        if lock_map(&self.active).contains_key(&key) {
            return Err(EventError::AlreadySubscribed {
                contract_address: key.0,
                event_name: key.1,
            });
        }

        let handle = self
            .source
            .attach(&key.0, &key.1, Arc::clone(&callback))
            .await?;

        lock_map(&self.active).insert(key, ActiveSubscription { handle, callback });
        Ok(())
    }

    /// Unsubscribe the pair, stopping event delivery
    ///
    /// Returns [`EventError::NotSubscribed`] when the pair is not live.
    /// The entry is removed before the source detach completes; a detach
    /// failure is surfaced as [`EventError::SourceUnavailable`] but the
    /// pair is already free for re-subscription.
    pub async fn unsubscribe(&self, contract_address: &str, event_name: &str) -> Result<()> {
        let key = pair_key(contract_address, event_name)?;
        let pair_lock = self.pair_lock(&key);
        let _serialized = pair_lock.lock().await;

        let entry = lock_map(&self.active).remove(&key);
        let entry = entry.ok_or(EventError::NotSubscribed {
            contract_address: key.0,
            event_name: key.1,
        })?;

        self.source.detach(entry.handle).await?;
        Ok(())
    }

    /// Whether the pair currently has a live subscription
    pub fn is_subscribed(&self, contract_address: &str, event_name: &str) -> bool {
        let key = (contract_address.to_string(), event_name.to_string());
        lock_map(&self.active).contains_key(&key)
    }

    /// The callback attached to the pair, if it is live
    pub fn callback_for(&self, contract_address: &str, event_name: &str) -> Option<EventCallback> {
        let key = (contract_address.to_string(), event_name.to_string());
        lock_map(&self.active)
            .get(&key)
            .map(|sub| Arc::clone(&sub.callback))
    }

    /// All pairs with a live subscription
    pub fn active_pairs(&self) -> Vec<(String, String)> {
        lock_map(&self.active).keys().cloned().collect()
    }

    /// Number of live subscriptions
    pub fn len(&self) -> usize {
        lock_map(&self.active).len()
    }

    /// Whether no subscription is live
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    fn pair_lock(&self, key: &PairKey) -> Arc<tokio::sync::Mutex<()>> {
        let mut locks = lock_map(&self.locks);
        Arc::clone(
            locks
                .entry(key.clone())
                .or_insert_with(|| Arc::new(tokio::sync::Mutex::new(()))),
        )
    }
}

fn pair_key(contract_address: &str, event_name: &str) -> Result<PairKey> {
    if contract_address.is_empty() {
        return Err(EventError::InvalidKey(
            "contract address must not be empty".to_string(),
        ));
    }
    if event_name.is_empty() {
        return Err(EventError::InvalidKey(
            "event name must not be empty".to_string(),
        ));
    }
    Ok((contract_address.to_string(), event_name.to_string()))
}

// Guards here protect plain map operations that cannot panic, so a
// poisoned lock still holds a consistent map.
fn lock_map<T>(map: &Mutex<T>) -> MutexGuard<'_, T> {
    map.lock().unwrap_or_else(|poisoned| poisoned.into_inner())
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::atomic::{AtomicU64, Ordering};

    /// Records attach/detach traffic and can be told to fail either side.
    struct MockSource {
        next_handle: AtomicU64,
        attached: Mutex<HashMap<SubscriptionHandle, (String, String, EventCallback)>>,
        fail_attach: bool,
        fail_detach: bool,
    }

    impl MockSource {
        fn new() -> Self {
            Self {
                next_handle: AtomicU64::new(1),
                attached: Mutex::new(HashMap::new()),
                fail_attach: false,
                fail_detach: false,
            }
        }

        fn failing_attach() -> Self {
            Self {
                fail_attach: true,
                ..Self::new()
            }
        }

        fn failing_detach() -> Self {
            Self {
                fail_detach: true,
                ..Self::new()
            }
        }

        fn attachment_count(&self) -> usize {
            self.attached.lock().unwrap().len()
        }

        fn attached_callback(&self, contract: &str, event: &str) -> Option<EventCallback> {
            self.attached
                .lock()
                .unwrap()
                .values()
                .find(|(c, e, _)| c == contract && e == event)
                .map(|(_, _, cb)| Arc::clone(cb))
        }
    }

    #[async_trait]
    impl EventSource for MockSource {
        async fn attach(
            &self,
            contract_address: &str,
            event_name: &str,
            callback: EventCallback,
        ) -> std::result::Result<SubscriptionHandle, SourceError> {
            if self.fail_attach {
                return Err(SourceError::new("network down"));
            }
            let handle = SubscriptionHandle::new(self.next_handle.fetch_add(1, Ordering::SeqCst));
            self.attached.lock().unwrap().insert(
                handle,
                (
                    contract_address.to_string(),
                    event_name.to_string(),
                    callback,
                ),
            );
            Ok(handle)
        }

        async fn detach(
            &self,
            handle: SubscriptionHandle,
        ) -> std::result::Result<(), SourceError> {
            if self.fail_detach {
                return Err(SourceError::new("network down"));
            }
            self.attached.lock().unwrap().remove(&handle);
            Ok(())
        }
    }

    fn noop_callback() -> EventCallback {
        Arc::new(|_event| {})
    }

    fn registry_with(source: MockSource) -> (SubscriptionRegistry, Arc<MockSource>) {
        let source = Arc::new(source);
        let registry = SubscriptionRegistry::new(Arc::clone(&source) as Arc<dyn EventSource>);
        (registry, source)
    }

    #[tokio::test]
    async fn double_subscribe_signals_already_subscribed() {
        let (registry, source) = registry_with(MockSource::new());

        registry
            .subscribe("TABC", "Transfer", noop_callback())
            .await
            .unwrap();
        let second = registry.subscribe("TABC", "Transfer", noop_callback()).await;

        assert!(matches!(second, Err(EventError::AlreadySubscribed { .. })));
        assert_eq!(source.attachment_count(), 1);
    }

    #[tokio::test]
    async fn duplicate_subscribe_keeps_original_callback() {
        let (registry, source) = registry_with(MockSource::new());

        let cb1: EventCallback = Arc::new(|_| {});
        let cb2: EventCallback = Arc::new(|_| {});

        registry
            .subscribe("TABC", "Transfer", Arc::clone(&cb1))
            .await
            .unwrap();
        let second = registry.subscribe("TABC", "Transfer", Arc::clone(&cb2)).await;
        assert!(matches!(second, Err(EventError::AlreadySubscribed { .. })));

        let attached = source.attached_callback("TABC", "Transfer").unwrap();
        assert!(Arc::ptr_eq(&attached, &cb1));

        let recorded = registry.callback_for("TABC", "Transfer").unwrap();
        assert!(Arc::ptr_eq(&recorded, &cb1));
    }

    #[tokio::test]
    async fn unsubscribe_without_subscribe_signals_not_subscribed() {
        let (registry, _source) = registry_with(MockSource::new());

        let result = registry.unsubscribe("TABC", "Transfer").await;
        assert!(matches!(result, Err(EventError::NotSubscribed { .. })));
    }

    #[tokio::test]
    async fn pair_state_fully_resets_after_unsubscribe() {
        let (registry, source) = registry_with(MockSource::new());

        registry
            .subscribe("TABC", "Transfer", noop_callback())
            .await
            .unwrap();
        registry.unsubscribe("TABC", "Transfer").await.unwrap();
        registry
            .subscribe("TABC", "Transfer", noop_callback())
            .await
            .unwrap();

        assert!(registry.is_subscribed("TABC", "Transfer"));
        assert_eq!(source.attachment_count(), 1);
    }

    #[tokio::test]
    async fn is_subscribed_tracks_lifecycle() {
        let (registry, _source) = registry_with(MockSource::new());

        assert!(!registry.is_subscribed("TABC", "Transfer"));
        registry
            .subscribe("TABC", "Transfer", noop_callback())
            .await
            .unwrap();
        assert!(registry.is_subscribed("TABC", "Transfer"));
        registry.unsubscribe("TABC", "Transfer").await.unwrap();
        assert!(!registry.is_subscribed("TABC", "Transfer"));
    }

    #[tokio::test]
    async fn failed_attach_leaves_registry_unchanged() {
        let (registry, source) = registry_with(MockSource::failing_attach());

        let result = registry.subscribe("TABC", "Transfer", noop_callback()).await;
        assert!(matches!(result, Err(EventError::SourceUnavailable(_))));
        assert!(!registry.is_subscribed("TABC", "Transfer"));
        assert_eq!(source.attachment_count(), 0);

        // The pair is still free for a later attempt.
        let retry = registry.subscribe("TABC", "Transfer", noop_callback()).await;
        assert!(matches!(retry, Err(EventError::SourceUnavailable(_))));
    }

    #[tokio::test]
    async fn failed_detach_still_clears_the_entry() {
        let (registry, _source) = registry_with(MockSource::failing_detach());

        registry
            .subscribe("TABC", "Transfer", noop_callback())
            .await
            .unwrap();
        let result = registry.unsubscribe("TABC", "Transfer").await;

        assert!(matches!(result, Err(EventError::SourceUnavailable(_))));
        assert!(!registry.is_subscribed("TABC", "Transfer"));
    }

    #[tokio::test]
    async fn pairs_on_one_contract_are_independent() {
        let (registry, source) = registry_with(MockSource::new());

        registry
            .subscribe("TABC", "Transfer", noop_callback())
            .await
            .unwrap();
        registry
            .subscribe("TABC", "Approval", noop_callback())
            .await
            .unwrap();
        assert_eq!(source.attachment_count(), 2);

        registry.unsubscribe("TABC", "Transfer").await.unwrap();
        assert!(!registry.is_subscribed("TABC", "Transfer"));
        assert!(registry.is_subscribed("TABC", "Approval"));
        assert_eq!(source.attachment_count(), 1);
    }

    #[tokio::test]
    async fn wildcard_is_an_ordinary_key() {
        let (registry, _source) = registry_with(MockSource::new());

        registry
            .subscribe("TABC", WILDCARD_EVENT, noop_callback())
            .await
            .unwrap();
        registry
            .subscribe("TABC", "Transfer", noop_callback())
            .await
            .unwrap();

        assert!(registry.is_subscribed("TABC", WILDCARD_EVENT));
        assert!(registry.is_subscribed("TABC", "Transfer"));

        let dup = registry.subscribe("TABC", WILDCARD_EVENT, noop_callback()).await;
        assert!(matches!(dup, Err(EventError::AlreadySubscribed { .. })));
    }

    #[tokio::test]
    async fn empty_keys_are_rejected() {
        let (registry, source) = registry_with(MockSource::new());

        let no_contract = registry.subscribe("", "Transfer", noop_callback()).await;
        assert!(matches!(no_contract, Err(EventError::InvalidKey(_))));

        let no_event = registry.subscribe("TABC", "", noop_callback()).await;
        assert!(matches!(no_event, Err(EventError::InvalidKey(_))));

        assert_eq!(source.attachment_count(), 0);
    }

    #[tokio::test]
    async fn racing_subscribes_on_one_pair_attach_once() {
        let source = Arc::new(MockSource::new());
        let registry = Arc::new(SubscriptionRegistry::new(
            Arc::clone(&source) as Arc<dyn EventSource>
        ));

        let a = {
            let registry = Arc::clone(&registry);
            tokio::spawn(async move { registry.subscribe("TABC", "Transfer", noop_callback()).await })
        };
        let b = {
            let registry = Arc::clone(&registry);
            tokio::spawn(async move { registry.subscribe("TABC", "Transfer", noop_callback()).await })
        };

        let outcomes = [a.await.unwrap(), b.await.unwrap()];
        let oks = outcomes.iter().filter(|r| r.is_ok()).count();
        let dups = outcomes
            .iter()
            .filter(|r| matches!(r, Err(EventError::AlreadySubscribed { .. })))
            .count();

        assert_eq!(oks, 1);
        assert_eq!(dups, 1);
        assert_eq!(source.attachment_count(), 1);
    }

    #[tokio::test]
    async fn active_pairs_reports_live_subscriptions() {
        let (registry, _source) = registry_with(MockSource::new());
        assert!(registry.is_empty());

        registry
            .subscribe("TABC", "Transfer", noop_callback())
            .await
            .unwrap();
        registry
            .subscribe("TXYZ", "Approval", noop_callback())
            .await
            .unwrap();

        let mut pairs = registry.active_pairs();
        pairs.sort();
        assert_eq!(
            pairs,
            vec![
                ("TABC".to_string(), "Transfer".to_string()),
                ("TXYZ".to_string(), "Approval".to_string()),
            ]
        );
        assert_eq!(registry.len(), 2);
    }
}
