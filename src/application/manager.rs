//! Notification manager use case

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Arc, Weak};

use thiserror::Error;
use tokio::sync::{broadcast, Mutex};
use tokio::time::{interval_at, Instant, MissedTickBehavior};

use crate::domain::config::{AppConfig, DEFAULT_RETENTION, DEFAULT_SIMULATE_PROBABILITY};
use crate::domain::notification::{
    ExportSnapshot, NewNotification, Notification, NotificationFilter, NotificationId,
};
use crate::domain::time::Duration;

use super::events::{Listener, ListenerError, ListenerId, ListenerRegistry, NotificationEvent};
use super::ports::{
    NativeNotification, Notifier, Permission, RecordStore, SyncChannel, ToastSurface,
};
use super::simulation::ActivitySimulator;
use super::timers::TimerSet;

/// Store collection holding notification records
pub const NOTIFICATIONS_COLLECTION: &str = "notifications";

/// Errors surfaced to callers of lookups on the manager
#[derive(Debug, Clone, Error)]
pub enum ManagerError {
    #[error("Notification not found: {0}")]
    NotFound(NotificationId),

    #[error("Notification {id} has no action '{action}'")]
    UnknownAction { id: NotificationId, action: String },
}

/// Simulated activity settings
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SimulationSettings {
    /// Time between rolls
    pub interval: Duration,
    /// Chance that a roll creates a notification
    pub probability: f64,
}

impl Default for SimulationSettings {
    fn default() -> Self {
        Self {
            interval: Duration::default_simulate_interval(),
            probability: DEFAULT_SIMULATE_PROBABILITY,
        }
    }
}

/// Configuration for the notification manager
#[derive(Debug, Clone)]
pub struct ManagerConfig {
    /// Store collection name
    pub collection: String,
    /// Records kept by cleanup
    pub retention: usize,
    /// Auto-close delay when a notification does not specify one
    pub default_duration: Duration,
    /// Lifetime of non-persistent native notifications
    pub native_timeout: Duration,
    /// Whether native notifications may be shown at all
    pub enable_native: bool,
    /// Simulated activity timer, armed by `init` when set
    pub simulation: Option<SimulationSettings>,
}

impl Default for ManagerConfig {
    fn default() -> Self {
        Self {
            collection: NOTIFICATIONS_COLLECTION.to_string(),
            retention: DEFAULT_RETENTION,
            default_duration: Duration::default_toast(),
            native_timeout: Duration::default_native_timeout(),
            enable_native: true,
            simulation: None,
        }
    }
}

impl ManagerConfig {
    /// Build from merged application configuration
    pub fn from_app_config(config: &AppConfig) -> Self {
        Self {
            collection: NOTIFICATIONS_COLLECTION.to_string(),
            retention: config.retention_or_default(),
            default_duration: config.default_duration_or_default(),
            native_timeout: config.native_timeout_or_default(),
            enable_native: config.native_or_default(),
            simulation: config.simulate_or_default().then(|| SimulationSettings {
                interval: config.simulate_interval_or_default(),
                probability: config.simulate_probability_or_default(),
            }),
        }
    }
}

struct Inner<S, N, T, Y> {
    store: S,
    notifier: N,
    surface: T,
    sync: Y,
    config: ManagerConfig,
    simulator: ActivitySimulator,
    /// Newest first
    notifications: Mutex<Vec<Notification>>,
    permission_granted: AtomicBool,
    listeners: ListenerRegistry,
    timers: TimerSet,
}

/// Owns the notification list and mediates between the record store,
/// the native notifier, the toast surface and subscribers.
///
/// Cloning yields another handle to the same manager. Timer tasks hold
/// weak handles, so dropping the last clone (or calling `shutdown`)
/// cancels them.
pub struct NotificationManager<S, N, T, Y> {
    inner: Arc<Inner<S, N, T, Y>>,
}

impl<S, N, T, Y> Clone for NotificationManager<S, N, T, Y> {
    fn clone(&self) -> Self {
        Self {
            inner: Arc::clone(&self.inner),
        }
    }
}

impl<S, N, T, Y> NotificationManager<S, N, T, Y>
where
    S: RecordStore + 'static,
    N: Notifier + 'static,
    T: ToastSurface + 'static,
    Y: SyncChannel + 'static,
{
    /// Create a manager with an empty list. Call `init` to load history.
    pub fn new(store: S, notifier: N, surface: T, sync: Y, config: ManagerConfig) -> Self {
        let probability = config
            .simulation
            .map(|s| s.probability)
            .unwrap_or(DEFAULT_SIMULATE_PROBABILITY);

        Self {
            inner: Arc::new(Inner {
                store,
                notifier,
                surface,
                sync,
                simulator: ActivitySimulator::new(probability),
                config,
                notifications: Mutex::new(Vec::new()),
                permission_granted: AtomicBool::new(false),
                listeners: ListenerRegistry::new(),
                timers: TimerSet::new(),
            }),
        }
    }

    fn from_inner(inner: Arc<Inner<S, N, T, Y>>) -> Self {
        Self { inner }
    }

    fn downgrade(&self) -> Weak<Inner<S, N, T, Y>> {
        Arc::downgrade(&self.inner)
    }

    /// Resolve permission, load persisted history and arm the simulation timer.
    pub async fn init(&self) {
        self.resolve_permission().await;
        self.load().await;

        if let Some(simulation) = self.inner.config.simulation {
            self.start_simulation(simulation.interval);
        }

        tracing::info!(
            notifications = self.len().await,
            native = self.permission_granted(),
            "Notification manager initialized"
        );
    }

    async fn resolve_permission(&self) {
        if !self.inner.config.enable_native {
            self.inner.permission_granted.store(false, Ordering::SeqCst);
            return;
        }

        let permission = match self.inner.notifier.permission() {
            Permission::Default => match self.inner.notifier.request_permission().await {
                Ok(permission) => permission,
                Err(e) => {
                    tracing::warn!("Notification permission request failed: {}", e);
                    Permission::Denied
                }
            },
            decided => decided,
        };

        tracing::debug!(%permission, "Native notification permission");
        self.inner
            .permission_granted
            .store(permission.is_granted(), Ordering::SeqCst);
    }

    /// Whether native notifications will be shown
    pub fn permission_granted(&self) -> bool {
        self.inner.permission_granted.load(Ordering::SeqCst)
    }

    /// Replace the list with the persisted records, newest first.
    ///
    /// A store failure leaves the list empty. Undecodable records are skipped.
    pub async fn load(&self) {
        let collection = &self.inner.config.collection;
        let mut loaded: Vec<Notification> = match self.inner.store.get_all(collection).await {
            Ok(records) => records
                .into_iter()
                .filter_map(|record| match serde_json::from_value::<Notification>(record) {
                    Ok(n) => Some(n),
                    Err(e) => {
                        tracing::warn!("Skipping unreadable notification record: {}", e);
                        None
                    }
                })
                .collect(),
            Err(e) => {
                tracing::error!("Failed to load notifications: {}", e);
                Vec::new()
            }
        };

        loaded.sort_by(|a, b| b.timestamp.cmp(&a.timestamp));
        // Source data may carry duplicates; keep the first (newest) copy
        let mut seen = std::collections::HashSet::new();
        loaded.retain(|n| seen.insert(n.id));

        *self.inner.notifications.lock().await = loaded;
    }

    /// Create a notification, persist it, show it and broadcast it.
    ///
    /// Failures of collaborators are logged, never returned.
    pub async fn create(&self, input: NewNotification) -> Notification {
        let notification = input.into_notification(self.inner.config.default_duration);

        self.inner
            .notifications
            .lock()
            .await
            .insert(0, notification.clone());

        self.persist(&notification).await;

        if self.permission_granted() && !self.inner.surface.has_focus() {
            let native = NativeNotification::from_record(&notification, self.inner.config.native_timeout);
            if let Err(e) = self.inner.notifier.display(&native).await {
                tracing::warn!(id = %notification.id, "Failed to show native notification: {}", e);
            }
        }

        if let Err(e) = self.inner.surface.show(&notification) {
            tracing::warn!(id = %notification.id, "Failed to show toast: {}", e);
        }

        self.inner
            .listeners
            .broadcast(&NotificationEvent::Created(notification.clone()));

        if let Some(delay) = notification.auto_close_delay() {
            self.schedule_auto_close(notification.id, delay);
        }

        tracing::debug!(id = %notification.id, kind = %notification.kind, "Notification created");
        notification
    }

    fn schedule_auto_close(&self, id: NotificationId, delay: Duration) {
        let weak = self.downgrade();
        self.inner.timers.after(delay.as_std(), async move {
            if let Some(inner) = weak.upgrade() {
                Self::from_inner(inner).mark_as_read(id).await;
            }
        });
    }

    async fn persist(&self, notification: &Notification) {
        let record = match serde_json::to_value(notification) {
            Ok(record) => record,
            Err(e) => {
                tracing::warn!(id = %notification.id, "Failed to encode notification: {}", e);
                return;
            }
        };

        if let Err(e) = self
            .inner
            .store
            .save(&self.inner.config.collection, &notification.id.to_string(), record)
            .await
        {
            tracing::warn!(id = %notification.id, "Failed to save notification: {}", e);
            return;
        }

        self.publish_sync().await;
    }

    async fn publish_sync(&self) {
        if let Err(e) = self.inner.sync.publish().await {
            tracing::warn!("{}", e);
        }
    }

    /// Mark a notification as read.
    ///
    /// Returns false if the id is unknown or the notification was already read.
    pub async fn mark_as_read(&self, id: NotificationId) -> bool {
        let updated = {
            let mut list = self.inner.notifications.lock().await;
            match list.iter_mut().find(|n| n.id == id) {
                Some(n) if !n.read => {
                    n.read = true;
                    n.clone()
                }
                _ => return false,
            }
        };

        self.persist(&updated).await;

        if let Err(e) = self.inner.surface.dismiss(&id) {
            tracing::warn!(%id, "Failed to dismiss toast: {}", e);
        }

        self.inner
            .listeners
            .broadcast(&NotificationEvent::Read(updated));
        true
    }

    /// Mark every unread notification as read, one after another.
    ///
    /// Returns how many changed.
    pub async fn mark_all_as_read(&self) -> usize {
        let unread: Vec<NotificationId> = {
            let list = self.inner.notifications.lock().await;
            list.iter().filter(|n| !n.read).map(|n| n.id).collect()
        };

        let mut changed = 0;
        for id in unread {
            if self.mark_as_read(id).await {
                changed += 1;
            }
        }
        changed
    }

    /// Toast close button
    pub async fn dismiss(&self, id: NotificationId) -> bool {
        self.mark_as_read(id).await
    }

    /// Native notification clicked
    pub async fn handle_native_click(&self, id: NotificationId) -> bool {
        tracing::debug!(%id, "Native notification clicked");
        self.mark_as_read(id).await
    }

    /// Toast action button: run the action callback, then mark as read.
    pub async fn trigger_action(
        &self,
        id: NotificationId,
        action_id: &str,
    ) -> Result<(), ManagerError> {
        let notification = self.get(id).await.ok_or(ManagerError::NotFound(id))?;
        let action = notification
            .action(action_id)
            .ok_or_else(|| ManagerError::UnknownAction {
                id,
                action: action_id.to_string(),
            })?;

        if let Some(callback) = &action.callback {
            callback(&notification);
        }

        self.mark_as_read(id).await;
        Ok(())
    }

    /// Snapshot of the notifications matching a filter, newest first
    pub async fn query(&self, filter: &NotificationFilter) -> Vec<Notification> {
        let list = self.inner.notifications.lock().await;
        filter.apply(list.iter())
    }

    /// Snapshot of a single notification
    pub async fn get(&self, id: NotificationId) -> Option<Notification> {
        let list = self.inner.notifications.lock().await;
        list.iter().find(|n| n.id == id).cloned()
    }

    pub async fn unread_count(&self) -> usize {
        let list = self.inner.notifications.lock().await;
        list.iter().filter(|n| !n.read).count()
    }

    pub async fn len(&self) -> usize {
        self.inner.notifications.lock().await.len()
    }

    pub async fn is_empty(&self) -> bool {
        self.len().await == 0
    }

    /// Trim the list to the retention cap, deleting the overflow from the store.
    /// The newest notification is always kept.
    ///
    /// Returns the number of notifications removed.
    pub async fn cleanup(&self) -> usize {
        let retention = self.inner.config.retention.max(1);
        let overflow = {
            let mut list = self.inner.notifications.lock().await;
            if list.len() <= retention {
                return 0;
            }
            list.split_off(retention)
        };

        for notification in &overflow {
            if let Err(e) = self
                .inner
                .store
                .delete(&self.inner.config.collection, &notification.id.to_string())
                .await
            {
                tracing::warn!(id = %notification.id, "Failed to delete notification: {}", e);
            }
        }

        self.publish_sync().await;
        tracing::info!(removed = overflow.len(), "Old notifications cleaned up");
        overflow.len()
    }

    /// Snapshot for export
    pub async fn export(&self) -> ExportSnapshot {
        let list = self.inner.notifications.lock().await;
        ExportSnapshot::new(list.clone())
    }

    /// One simulation tick. Returns the created notification, if any.
    pub async fn simulate_activity(&self) -> Option<Notification> {
        let input = {
            let mut rng = rand::rng();
            self.inner.simulator.roll(&mut rng)
        }?;
        Some(self.create(input).await)
    }

    /// Arm the recurring simulation timer.
    ///
    /// A zero interval is refused with a warning; returns whether the timer was armed.
    pub fn start_simulation(&self, interval: Duration) -> bool {
        let period = interval.as_std();
        if period.is_zero() {
            tracing::warn!("Simulation interval must be greater than zero, not starting");
            return false;
        }
        let weak = self.downgrade();
        tracing::debug!(%interval, "Starting simulated activity");

        self.inner.timers.spawn(async move {
            let mut ticker = interval_at(Instant::now() + period, period);
            ticker.set_missed_tick_behavior(MissedTickBehavior::Delay);
            loop {
                ticker.tick().await;
                let Some(inner) = weak.upgrade() else {
                    break;
                };
                Self::from_inner(inner).simulate_activity().await;
            }
        });
        true
    }

    /// Reload from the store after another instance changed it
    pub async fn handle_sync(&self) {
        self.load().await;
        self.inner.listeners.broadcast(&NotificationEvent::Sync);
    }

    /// Subscribe to the sync channel and reload on every signal
    pub fn spawn_sync_listener(&self) {
        let mut receiver = self.inner.sync.subscribe();
        let weak = self.downgrade();

        self.inner.timers.spawn(async move {
            loop {
                match receiver.recv().await {
                    Ok(_) | Err(broadcast::error::RecvError::Lagged(_)) => {}
                    Err(broadcast::error::RecvError::Closed) => break,
                }
                let Some(inner) = weak.upgrade() else {
                    break;
                };
                Self::from_inner(inner).handle_sync().await;
            }
        });
    }

    /// Register a subscriber
    pub fn add_listener<F>(&self, listener: F) -> ListenerId
    where
        F: Fn(&NotificationEvent) -> Result<(), ListenerError> + Send + Sync + 'static,
    {
        let listener: Listener = Arc::new(listener);
        self.inner.listeners.add(listener)
    }

    /// Unregister a subscriber
    pub fn remove_listener(&self, id: ListenerId) -> bool {
        self.inner.listeners.remove(id)
    }

    /// Number of pending timer tasks
    pub fn active_timers(&self) -> usize {
        self.inner.timers.active()
    }

    /// Cancel every timer owned by the manager
    pub fn shutdown(&self) {
        self.inner.timers.abort_all();
        tracing::debug!("Notification manager timers cancelled");
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::application::ports::{
        NotificationError, StoreError, SurfaceError, SyncError, SyncSignal,
    };
    use crate::domain::notification::{NotificationAction, NotificationKind};
    use async_trait::async_trait;
    use serde_json::Value;
    use std::collections::HashMap;
    use std::sync::atomic::AtomicUsize;
    use std::sync::Mutex as StdMutex;

    #[derive(Default)]
    struct MockStore {
        records: StdMutex<HashMap<String, Value>>,
        fail_reads: AtomicBool,
        fail_writes: AtomicBool,
    }

    impl MockStore {
        fn ids(&self) -> Vec<String> {
            self.records.lock().unwrap().keys().cloned().collect()
        }

        fn get(&self, id: &NotificationId) -> Option<Value> {
            self.records.lock().unwrap().get(&id.to_string()).cloned()
        }
    }

    #[async_trait]
    impl RecordStore for Arc<MockStore> {
        async fn save(&self, _collection: &str, id: &str, record: Value) -> Result<(), StoreError> {
            if self.fail_writes.load(Ordering::SeqCst) {
                return Err(StoreError::Io("disk full".to_string()));
            }
            self.records.lock().unwrap().insert(id.to_string(), record);
            Ok(())
        }

        async fn get_all(&self, _collection: &str) -> Result<Vec<Value>, StoreError> {
            if self.fail_reads.load(Ordering::SeqCst) {
                return Err(StoreError::Io("unreadable".to_string()));
            }
            Ok(self.records.lock().unwrap().values().cloned().collect())
        }

        async fn delete(&self, _collection: &str, id: &str) -> Result<(), StoreError> {
            self.records.lock().unwrap().remove(id);
            Ok(())
        }
    }

    struct MockNotifier {
        permission: Permission,
        request_result: Result<Permission, NotificationError>,
        shown: StdMutex<Vec<NativeNotification>>,
    }

    impl MockNotifier {
        fn granted() -> Self {
            Self {
                permission: Permission::Granted,
                request_result: Ok(Permission::Granted),
                shown: StdMutex::new(Vec::new()),
            }
        }
    }

    #[async_trait]
    impl Notifier for Arc<MockNotifier> {
        fn permission(&self) -> Permission {
            self.permission
        }

        async fn request_permission(&self) -> Result<Permission, NotificationError> {
            self.request_result.clone()
        }

        async fn display(&self, notification: &NativeNotification) -> Result<(), NotificationError> {
            self.shown.lock().unwrap().push(notification.clone());
            Ok(())
        }
    }

    #[derive(Default)]
    struct MockSurface {
        focused: AtomicBool,
        shown: StdMutex<Vec<NotificationId>>,
        dismissed: StdMutex<Vec<NotificationId>>,
    }

    impl ToastSurface for Arc<MockSurface> {
        fn show(&self, notification: &Notification) -> Result<(), SurfaceError> {
            self.shown.lock().unwrap().push(notification.id);
            Ok(())
        }

        fn dismiss(&self, id: &NotificationId) -> Result<(), SurfaceError> {
            self.dismissed.lock().unwrap().push(*id);
            Ok(())
        }

        fn has_focus(&self) -> bool {
            self.focused.load(Ordering::SeqCst)
        }
    }

    struct MockSync {
        sender: broadcast::Sender<SyncSignal>,
        published: AtomicUsize,
    }

    impl Default for MockSync {
        fn default() -> Self {
            Self {
                sender: broadcast::channel(8).0,
                published: AtomicUsize::new(0),
            }
        }
    }

    #[async_trait]
    impl SyncChannel for Arc<MockSync> {
        async fn publish(&self) -> Result<(), SyncError> {
            self.published.fetch_add(1, Ordering::SeqCst);
            Ok(())
        }

        fn subscribe(&self) -> broadcast::Receiver<SyncSignal> {
            self.sender.subscribe()
        }
    }

    type TestManager =
        NotificationManager<Arc<MockStore>, Arc<MockNotifier>, Arc<MockSurface>, Arc<MockSync>>;

    struct Harness {
        manager: TestManager,
        store: Arc<MockStore>,
        notifier: Arc<MockNotifier>,
        surface: Arc<MockSurface>,
        sync: Arc<MockSync>,
    }

    fn harness_with(notifier: MockNotifier, config: ManagerConfig) -> Harness {
        let store = Arc::new(MockStore::default());
        let notifier = Arc::new(notifier);
        let surface = Arc::new(MockSurface::default());
        let sync = Arc::new(MockSync::default());
        let manager = NotificationManager::new(
            Arc::clone(&store),
            Arc::clone(&notifier),
            Arc::clone(&surface),
            Arc::clone(&sync),
            config,
        );
        Harness {
            manager,
            store,
            notifier,
            surface,
            sync,
        }
    }

    fn harness() -> Harness {
        harness_with(MockNotifier::granted(), ManagerConfig::default())
    }

    fn sticky(title: &str) -> NewNotification {
        NewNotification::new(title, "").auto_close(false)
    }

    #[tokio::test]
    async fn create_with_no_fields_fills_defaults() {
        let h = harness();
        let n = h.manager.create(NewNotification::default()).await;

        assert_eq!(n.kind, NotificationKind::Info);
        assert!(!n.read);
        assert!(!n.id.to_string().is_empty());
        assert!(!n.timestamp.to_rfc3339().is_empty());
        h.manager.shutdown();
    }

    #[tokio::test]
    async fn create_prepends_and_counts_unread() {
        let h = harness();
        h.manager.create(sticky("first")).await;
        let before = h.manager.unread_count().await;
        let second = h.manager.create(sticky("second")).await;

        let list = h.manager.query(&NotificationFilter::all()).await;
        assert_eq!(list[0].id, second.id);
        assert_eq!(h.manager.unread_count().await, before + 1);
    }

    #[tokio::test]
    async fn create_persists_renders_and_publishes() {
        let h = harness();
        let n = h.manager.create(sticky("saved")).await;

        assert!(h.store.get(&n.id).is_some());
        assert_eq!(h.surface.shown.lock().unwrap().as_slice(), &[n.id]);
        assert_eq!(h.sync.published.load(Ordering::SeqCst), 1);
    }

    #[tokio::test]
    async fn ids_are_unique() {
        let h = harness();
        let mut ids = std::collections::HashSet::new();
        for i in 0..50 {
            let n = h.manager.create(sticky(&format!("n{}", i))).await;
            assert!(ids.insert(n.id));
        }
    }

    #[tokio::test]
    async fn native_shown_only_when_granted_and_unfocused() {
        let h = harness();
        h.manager.init().await;

        h.manager.create(sticky("unfocused")).await;
        assert_eq!(h.notifier.shown.lock().unwrap().len(), 1);

        h.surface.focused.store(true, Ordering::SeqCst);
        h.manager.create(sticky("focused")).await;
        assert_eq!(h.notifier.shown.lock().unwrap().len(), 1);

        // Toasts render either way
        assert_eq!(h.surface.shown.lock().unwrap().len(), 2);
    }

    #[tokio::test]
    async fn native_carries_persistence_and_tag() {
        let h = harness();
        h.manager.init().await;
        let n = h.manager.create(sticky("keep").persistent(true)).await;

        let shown = h.notifier.shown.lock().unwrap();
        assert!(shown[0].require_interaction);
        assert_eq!(shown[0].tag, format!("notiflow-{}", n.id));
        assert_eq!(shown[0].timeout, Duration::default_native_timeout());
    }

    #[tokio::test]
    async fn permission_request_failure_means_not_granted() {
        let notifier = MockNotifier {
            permission: Permission::Default,
            request_result: Err(NotificationError::PermissionFailed("no server".to_string())),
            shown: StdMutex::new(Vec::new()),
        };
        let h = harness_with(notifier, ManagerConfig::default());
        h.manager.init().await;

        assert!(!h.manager.permission_granted());
        h.manager.create(sticky("quiet")).await;
        assert!(h.notifier.shown.lock().unwrap().is_empty());
    }

    #[tokio::test]
    async fn permission_is_requested_when_undecided() {
        let notifier = MockNotifier {
            permission: Permission::Default,
            request_result: Ok(Permission::Granted),
            shown: StdMutex::new(Vec::new()),
        };
        let h = harness_with(notifier, ManagerConfig::default());
        h.manager.init().await;
        assert!(h.manager.permission_granted());
    }

    #[tokio::test]
    async fn native_disabled_by_config() {
        let config = ManagerConfig {
            enable_native: false,
            ..Default::default()
        };
        let h = harness_with(MockNotifier::granted(), config);
        h.manager.init().await;
        assert!(!h.manager.permission_granted());
    }

    #[tokio::test]
    async fn mark_as_read_is_idempotent() {
        let h = harness();
        let n = h.manager.create(sticky("once")).await;
        let events = Arc::new(AtomicUsize::new(0));
        let counter = Arc::clone(&events);
        h.manager.add_listener(move |event| {
            if matches!(event, NotificationEvent::Read(_)) {
                counter.fetch_add(1, Ordering::SeqCst);
            }
            Ok(())
        });

        assert!(h.manager.mark_as_read(n.id).await);
        assert!(!h.manager.mark_as_read(n.id).await);

        assert_eq!(events.load(Ordering::SeqCst), 1);
        assert_eq!(h.surface.dismissed.lock().unwrap().len(), 1);
        assert_eq!(h.store.get(&n.id).unwrap()["read"], true);
    }

    #[tokio::test]
    async fn mark_as_read_unknown_id_is_noop() {
        let h = harness();
        assert!(!h.manager.mark_as_read(NotificationId::generate()).await);
        assert_eq!(h.sync.published.load(Ordering::SeqCst), 0);
    }

    #[tokio::test]
    async fn dismiss_and_native_click_mark_read() {
        let h = harness();
        let toast = h.manager.create(sticky("toast")).await;
        let native = h.manager.create(sticky("native")).await;

        assert!(h.manager.dismiss(toast.id).await);
        assert!(h.manager.handle_native_click(native.id).await);
        assert!(!h.manager.handle_native_click(native.id).await);

        assert_eq!(h.manager.unread_count().await, 0);
        assert_eq!(
            h.surface.dismissed.lock().unwrap().as_slice(),
            &[toast.id, native.id]
        );
    }

    #[tokio::test]
    async fn mark_all_as_read_counts_changes() {
        let h = harness();
        let a = h.manager.create(sticky("a")).await;
        h.manager.create(sticky("b")).await;
        h.manager.create(sticky("c")).await;
        h.manager.mark_as_read(a.id).await;

        assert_eq!(h.manager.mark_all_as_read().await, 2);
        assert_eq!(h.manager.unread_count().await, 0);
    }

    #[tokio::test]
    async fn query_unread_preserves_order() {
        let h = harness();
        let a = h.manager.create(sticky("a")).await;
        let b = h.manager.create(sticky("b")).await;
        let c = h.manager.create(sticky("c")).await;
        h.manager.mark_as_read(b.id).await;

        let unread: Vec<_> = h
            .manager
            .query(&NotificationFilter::unread())
            .await
            .into_iter()
            .map(|n| n.id)
            .collect();
        assert_eq!(unread, vec![c.id, a.id]);
    }

    #[tokio::test]
    async fn query_returns_a_copy() {
        let h = harness();
        let n = h.manager.create(sticky("copy")).await;
        let mut snapshot = h.manager.query(&NotificationFilter::all()).await;
        snapshot[0].read = true;

        assert!(!h.manager.get(n.id).await.unwrap().read);
    }

    #[tokio::test]
    async fn cleanup_keeps_newest_and_deletes_overflow() {
        let h = harness();
        let mut created = Vec::new();
        for i in 0..105 {
            created.push(h.manager.create(sticky(&format!("n{}", i))).await);
        }

        assert_eq!(h.manager.cleanup().await, 5);
        assert_eq!(h.manager.len().await, 100);

        let oldest: Vec<_> = created[..5].iter().map(|n| n.id).collect();
        for id in &oldest {
            assert!(h.manager.get(*id).await.is_none());
            assert!(h.store.get(id).is_none());
        }
        assert_eq!(h.store.ids().len(), 100);

        let list = h.manager.query(&NotificationFilter::all()).await;
        assert_eq!(list[0].id, created[104].id);
        assert_eq!(list[99].id, created[5].id);
    }

    #[tokio::test]
    async fn cleanup_with_zero_retention_keeps_newest() {
        let config = ManagerConfig {
            retention: 0,
            ..Default::default()
        };
        let h = harness_with(MockNotifier::granted(), config);
        h.manager.create(sticky("old")).await;
        let newest = h.manager.create(sticky("new")).await;

        assert_eq!(h.manager.cleanup().await, 1);
        assert_eq!(h.manager.len().await, 1);
        assert!(h.manager.get(newest.id).await.is_some());
    }

    #[tokio::test]
    async fn cleanup_under_cap_is_noop() {
        let h = harness();
        h.manager.create(sticky("only")).await;
        assert_eq!(h.manager.cleanup().await, 0);
        assert_eq!(h.manager.len().await, 1);
    }

    #[tokio::test(start_paused = true)]
    async fn auto_close_marks_read_after_duration() {
        let h = harness();
        let n = h
            .manager
            .create(NewNotification::new("temp", "").duration(Duration::from_secs(2)))
            .await;

        tokio::time::sleep(std::time::Duration::from_millis(1900)).await;
        assert!(!h.manager.get(n.id).await.unwrap().read);

        tokio::time::sleep(std::time::Duration::from_millis(200)).await;
        assert!(h.manager.get(n.id).await.unwrap().read);
    }

    #[tokio::test(start_paused = true)]
    async fn auto_close_disabled_stays_unread() {
        let h = harness();
        let n = h.manager.create(sticky("stays")).await;

        tokio::time::sleep(Duration::default_toast().as_std() * 2).await;
        assert!(!h.manager.get(n.id).await.unwrap().read);
    }

    #[tokio::test(start_paused = true)]
    async fn shutdown_cancels_auto_close() {
        let h = harness();
        let n = h.manager.create(NewNotification::new("temp", "")).await;
        assert_eq!(h.manager.active_timers(), 1);

        h.manager.shutdown();
        tokio::time::sleep(Duration::default_toast().as_std() * 2).await;
        assert!(!h.manager.get(n.id).await.unwrap().read);
    }

    #[tokio::test]
    async fn failing_listener_does_not_block_delivery() {
        let h = harness();
        let received = Arc::new(AtomicUsize::new(0));
        let counter = Arc::clone(&received);
        h.manager
            .add_listener(|_| Err(ListenerError::new("subscriber failed")));
        h.manager.add_listener(move |_| {
            counter.fetch_add(1, Ordering::SeqCst);
            Ok(())
        });

        h.manager.create(sticky("broadcast")).await;
        assert_eq!(received.load(Ordering::SeqCst), 1);
    }

    #[tokio::test]
    async fn removed_listener_stops_receiving() {
        let h = harness();
        let received = Arc::new(AtomicUsize::new(0));
        let counter = Arc::clone(&received);
        let id = h.manager.add_listener(move |_| {
            counter.fetch_add(1, Ordering::SeqCst);
            Ok(())
        });

        h.manager.create(sticky("one")).await;
        assert!(h.manager.remove_listener(id));
        h.manager.create(sticky("two")).await;
        assert_eq!(received.load(Ordering::SeqCst), 1);
    }

    #[tokio::test]
    async fn store_write_failure_is_swallowed() {
        let h = harness();
        h.store.fail_writes.store(true, Ordering::SeqCst);

        let n = h.manager.create(sticky("memory only")).await;
        assert!(h.manager.get(n.id).await.is_some());
        assert!(h.store.get(&n.id).is_none());
        assert_eq!(h.sync.published.load(Ordering::SeqCst), 0);
    }

    #[tokio::test]
    async fn load_sorts_newest_first() {
        let h = harness();
        for (id, ts) in [
            ("67e55044-10b1-426f-9247-bb680e5fe0c8", "2024-01-01T10:00:00Z"),
            ("a1a2a3a4-b1b2-4c1c-9d1d-e1e2e3e4e5e6", "2024-03-01T10:00:00Z"),
            ("0e0e0e0e-1111-4222-8333-444455556666", "2024-02-01T10:00:00Z"),
        ] {
            h.store.records.lock().unwrap().insert(
                id.to_string(),
                serde_json::json!({ "id": id, "title": ts, "timestamp": ts }),
            );
        }

        h.manager.load().await;
        let titles: Vec<_> = h
            .manager
            .query(&NotificationFilter::all())
            .await
            .into_iter()
            .map(|n| n.title)
            .collect();
        assert_eq!(
            titles,
            vec!["2024-03-01T10:00:00Z", "2024-02-01T10:00:00Z", "2024-01-01T10:00:00Z"]
        );
    }

    #[tokio::test]
    async fn load_skips_bad_records() {
        let h = harness();
        h.store
            .records
            .lock()
            .unwrap()
            .insert("junk".to_string(), serde_json::json!({ "nope": true }));
        let good = NewNotification::new("good", "").into_notification(Duration::default_toast());
        h.store
            .records
            .lock()
            .unwrap()
            .insert(good.id.to_string(), serde_json::to_value(&good).unwrap());

        h.manager.load().await;
        assert_eq!(h.manager.len().await, 1);
    }

    #[tokio::test]
    async fn load_failure_leaves_empty_list() {
        let h = harness();
        h.manager.create(sticky("gone")).await;
        h.store.fail_reads.store(true, Ordering::SeqCst);

        h.manager.load().await;
        assert!(h.manager.is_empty().await);
    }

    #[tokio::test]
    async fn handle_sync_reloads_and_broadcasts() {
        let h = harness();
        let other = NewNotification::new("from elsewhere", "").into_notification(Duration::default_toast());
        h.store
            .records
            .lock()
            .unwrap()
            .insert(other.id.to_string(), serde_json::to_value(&other).unwrap());

        let synced = Arc::new(AtomicBool::new(false));
        let flag = Arc::clone(&synced);
        h.manager.add_listener(move |event| {
            if *event == NotificationEvent::Sync {
                flag.store(true, Ordering::SeqCst);
            }
            Ok(())
        });

        h.manager.handle_sync().await;
        assert!(h.manager.get(other.id).await.is_some());
        assert!(synced.load(Ordering::SeqCst));
    }

    #[tokio::test]
    async fn sync_signal_triggers_reload() {
        let h = harness();
        h.manager.spawn_sync_listener();

        let other = NewNotification::new("remote", "").into_notification(Duration::default_toast());
        h.store
            .records
            .lock()
            .unwrap()
            .insert(other.id.to_string(), serde_json::to_value(&other).unwrap());

        let (tx, mut rx) = tokio::sync::mpsc::unbounded_channel();
        h.manager.add_listener(move |event| {
            let _ = tx.send(event.as_str());
            Ok(())
        });

        h.sync.sender.send(SyncSignal).unwrap();
        assert_eq!(rx.recv().await, Some("sync"));
        assert!(h.manager.get(other.id).await.is_some());
        h.manager.shutdown();
    }

    #[tokio::test]
    async fn trigger_action_runs_callback_then_marks_read() {
        let h = harness();
        let ran = Arc::new(AtomicBool::new(false));
        let flag = Arc::clone(&ran);
        let n = h
            .manager
            .create(sticky("with action").action(
                NotificationAction::new("open", "Open").on_trigger(move |_| {
                    flag.store(true, Ordering::SeqCst);
                }),
            ))
            .await;

        h.manager.trigger_action(n.id, "open").await.unwrap();
        assert!(ran.load(Ordering::SeqCst));
        assert!(h.manager.get(n.id).await.unwrap().read);
    }

    #[tokio::test]
    async fn trigger_action_reports_missing() {
        let h = harness();
        let n = h.manager.create(sticky("plain")).await;

        assert!(matches!(
            h.manager.trigger_action(n.id, "nope").await,
            Err(ManagerError::UnknownAction { .. })
        ));
        assert!(matches!(
            h.manager.trigger_action(NotificationId::generate(), "open").await,
            Err(ManagerError::NotFound(_))
        ));
    }

    #[tokio::test]
    async fn export_reports_totals() {
        let h = harness();
        let a = h.manager.create(sticky("a")).await;
        h.manager.create(sticky("b")).await;
        h.manager.mark_as_read(a.id).await;

        let snapshot = h.manager.export().await;
        assert_eq!(snapshot.total, 2);
        assert_eq!(snapshot.unread, 1);
        assert_eq!(snapshot.notifications.len(), 2);
    }

    #[tokio::test]
    async fn simulate_activity_creates_when_certain() {
        let config = ManagerConfig {
            simulation: Some(SimulationSettings {
                interval: Duration::from_secs(30),
                probability: 1.0,
            }),
            ..Default::default()
        };
        let h = harness_with(MockNotifier::granted(), config);
        let created = h.manager.simulate_activity().await.unwrap();
        assert!(h.store.get(&created.id).is_some());
        h.manager.shutdown();
    }

    #[tokio::test(start_paused = true)]
    async fn simulation_timer_fires_each_interval() {
        let config = ManagerConfig {
            simulation: Some(SimulationSettings {
                interval: Duration::from_secs(30),
                probability: 1.0,
            }),
            ..Default::default()
        };
        let h = harness_with(MockNotifier::granted(), config);
        h.manager.init().await;

        tokio::time::sleep(std::time::Duration::from_secs(29)).await;
        assert_eq!(h.manager.len().await, 0);

        tokio::time::sleep(std::time::Duration::from_secs(2)).await;
        assert_eq!(h.manager.len().await, 1);

        tokio::time::sleep(std::time::Duration::from_secs(30)).await;
        assert_eq!(h.manager.len().await, 2);
        h.manager.shutdown();
    }

    #[tokio::test(start_paused = true)]
    async fn zero_simulation_interval_is_refused() {
        let config = ManagerConfig {
            simulation: Some(SimulationSettings {
                interval: Duration::from_millis(0),
                probability: 1.0,
            }),
            ..Default::default()
        };
        let h = harness_with(MockNotifier::granted(), config);
        assert!(!h.manager.start_simulation(Duration::from_secs(0)));

        h.manager.init().await;
        tokio::time::sleep(std::time::Duration::from_secs(5)).await;
        assert_eq!(h.manager.len().await, 0);
        assert!(h.manager.start_simulation(Duration::from_secs(1)));
        h.manager.shutdown();
    }

    #[test]
    fn config_from_app_config() {
        let mut app = AppConfig::defaults();
        app.retention = Some(10);
        let config = ManagerConfig::from_app_config(&app);
        assert_eq!(config.retention, 10);
        assert!(config.simulation.is_none());
        assert_eq!(config.collection, NOTIFICATIONS_COLLECTION);
    }
}
