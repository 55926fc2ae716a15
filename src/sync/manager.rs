use std::sync::Arc;
use std::time::Duration;

use tokio::sync::{broadcast, mpsc, Mutex, RwLock};
use tokio::task::JoinHandle;
use tokio::time::MissedTickBehavior;

use crate::error::{Error, Result};
use crate::quotes::item::Quote;
use crate::quotes::store::QuoteStore;

use super::merge::MergeReport;
use super::remote::RemoteSource;
use super::types::*;

/// `userId` sent with published quotes.
const PUBLISH_USER_ID: u64 = 1;

struct SyncTask {
    shutdown_tx: mpsc::Sender<()>,
    handle: JoinHandle<()>,
}

pub struct SyncManager<R: RemoteSource> {
    remote: R,
    store: Arc<QuoteStore>,
    remote_limit: usize,
    status: RwLock<SyncStatus>,
    notifications: broadcast::Sender<Notification>,
    in_flight: Mutex<()>,
    task: Mutex<Option<SyncTask>>,
}

impl<R: RemoteSource> SyncManager<R> {
    /// `remote_limit` caps how many remote items are merged per run; 0 means all.
    pub fn new(remote: R, store: Arc<QuoteStore>, remote_limit: usize) -> Self {
        let (notifications, _) = broadcast::channel(32);
        Self {
            remote,
            store,
            remote_limit,
            status: RwLock::new(SyncStatus::Idle),
            notifications,
            in_flight: Mutex::new(()),
            task: Mutex::new(None),
        }
    }

    pub fn subscribe(&self) -> broadcast::Receiver<Notification> {
        self.notifications.subscribe()
    }

    pub async fn status(&self) -> SyncStatus {
        *self.status.read().await
    }

    fn notify(&self, kind: NotificationKind, message: String) {
        // No subscribers is fine; the message is transient.
        let _ = self.notifications.send(Notification::new(kind, message));
    }

    /// Fetch the remote list and merge it into the store.
    ///
    /// Returns `Ok(None)` when another run is already in flight. On failure
    /// the store is left untouched and an error notification is emitted.
    pub async fn sync_once(&self) -> Result<Option<MergeReport>> {
        let Ok(_guard) = self.in_flight.try_lock() else {
            qlog!("sync: previous run still in flight, skipping");
            return Ok(None);
        };

        *self.status.write().await = SyncStatus::Syncing;
        let result = self.fetch_and_merge().await;
        *self.status.write().await = SyncStatus::Idle;

        match result {
            Ok(report) => {
                qlog!(
                    "sync: added={} conflicts={} duplicates_removed={}",
                    report.added,
                    report.conflicts,
                    report.duplicates_removed
                );
                if report.has_conflicts() {
                    self.notify(
                        NotificationKind::ConflictsResolved,
                        format!(
                            "Conflicts resolved: {} quote(s) updated from server.",
                            report.conflicts
                        ),
                    );
                } else {
                    self.notify(NotificationKind::Synced, "Quotes synced with server.".to_string());
                }
                Ok(Some(report))
            }
            Err(e) => {
                qwarn!("ERROR: sync failed: {}", e);
                self.notify(
                    NotificationKind::Error,
                    format!("Failed to sync with server: {}", e),
                );
                Err(e)
            }
        }
    }

    async fn fetch_and_merge(&self) -> Result<MergeReport> {
        let posts = self.remote.fetch_posts().await?;
        let take = match self.remote_limit {
            0 => posts.len(),
            n => n,
        };
        let titles: Vec<String> = posts.into_iter().take(take).map(|p| p.title).collect();
        qlog!("sync: fetched {} remote titles", titles.len());

        self.store.merge_remote(&titles).await
    }

    /// Run `sync_once` now and then every `interval` until `shutdown`.
    /// Calling it again restarts the task with the new interval.
    pub async fn start(self: &Arc<Self>, interval: Duration) {
        self.shutdown().await;

        let (shutdown_tx, mut shutdown_rx) = mpsc::channel::<()>(1);
        let manager = Arc::clone(self);

        let handle = tokio::spawn(async move {
            qlog!("sync: periodic task started, every {:?}", interval);
            let mut ticker = tokio::time::interval(interval);
            ticker.set_missed_tick_behavior(MissedTickBehavior::Delay);

            loop {
                tokio::select! {
                    _ = ticker.tick() => {
                        tokio::select! {
                            _ = manager.sync_once() => {}
                            _ = shutdown_rx.recv() => break,
                        }
                    }
                    _ = shutdown_rx.recv() => break,
                }
            }
            qlog!("sync: periodic task stopped");
        });

        *self.task.lock().await = Some(SyncTask {
            shutdown_tx,
            handle,
        });
    }

    /// Stop the periodic task and wait for it to finish.
    pub async fn shutdown(&self) {
        let Some(task) = self.task.lock().await.take() else {
            return;
        };
        let _ = task.shutdown_tx.send(()).await;
        if let Err(e) = task.handle.await {
            qwarn!("ERROR: sync task ended abnormally: {}", e);
        }
        *self.status.write().await = SyncStatus::Stopped;
    }

    pub async fn is_running(&self) -> bool {
        self.task.lock().await.is_some()
    }

    /// Send a new quote to the remote and keep the echoed copy locally.
    pub async fn publish(&self, text: &str, category: &str) -> Result<Quote> {
        let draft = Quote::new(text, category)?;
        let req = NewPostRequest {
            title: draft.text,
            body: draft.category,
            user_id: PUBLISH_USER_ID,
        };

        let echoed = self.remote.create_post(&req).await?;
        let quote = Quote::new(&echoed.title, &echoed.body)
            .map_err(|_| Error::Parse("server echoed an empty quote".to_string()))?;

        self.store.append(quote.clone()).await?;
        qlog!("publish: stored {:?} from server echo", quote.text);
        Ok(quote)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};
    use std::sync::Mutex as StdMutex;

    use crate::storage::database::Database;
    use crate::storage::QUOTES_KEY;

    #[derive(Default)]
    struct FakeRemote {
        posts: StdMutex<Vec<RemotePost>>,
        fail: AtomicBool,
        calls: AtomicUsize,
        delay: Duration,
    }

    impl FakeRemote {
        fn with_titles(titles: &[&str]) -> Self {
            let posts = titles
                .iter()
                .map(|t| RemotePost {
                    id: None,
                    title: t.to_string(),
                    body: String::new(),
                    user_id: None,
                })
                .collect();
            Self {
                posts: StdMutex::new(posts),
                ..Self::default()
            }
        }
    }

    impl RemoteSource for FakeRemote {
        async fn fetch_posts(&self) -> Result<Vec<RemotePost>> {
            self.calls.fetch_add(1, Ordering::SeqCst);
            if !self.delay.is_zero() {
                tokio::time::sleep(self.delay).await;
            }
            if self.fail.load(Ordering::SeqCst) {
                return Err(Error::Network("connection refused".to_string()));
            }
            Ok(self.posts.lock().unwrap().clone())
        }

        async fn create_post(&self, req: &NewPostRequest) -> Result<RemotePost> {
            if self.fail.load(Ordering::SeqCst) {
                return Err(Error::Network("connection refused".to_string()));
            }
            Ok(RemotePost {
                id: Some(101),
                title: req.title.clone(),
                body: req.body.clone(),
                user_id: Some(req.user_id),
            })
        }
    }

    async fn setup(remote: FakeRemote, local: Vec<Quote>) -> (Arc<Database>, Arc<QuoteStore>, Arc<SyncManager<FakeRemote>>) {
        let db = Arc::new(Database::open_in_memory().unwrap());
        let store = Arc::new(QuoteStore::load(db.clone()));
        store.replace_all(local).await.unwrap();
        let manager = Arc::new(SyncManager::new(remote, store.clone(), 0));
        (db, store, manager)
    }

    fn quote(text: &str, category: &str) -> Quote {
        Quote::new(text, category).unwrap()
    }

    #[tokio::test]
    async fn test_sync_overwrites_and_reports_conflict() {
        let remote = FakeRemote::with_titles(&["Believe in yourself."]);
        let (_db, store, manager) =
            setup(remote, vec![quote("Believe in yourself.", "Motivation")]).await;
        let mut rx = manager.subscribe();

        let report = manager.sync_once().await.unwrap().unwrap();

        assert_eq!(report.conflicts, 1);
        assert_eq!(store.quotes().await, vec![quote("Believe in yourself.", "Server")]);
        let note = rx.recv().await.unwrap();
        assert_eq!(note.kind, NotificationKind::ConflictsResolved);
    }

    #[tokio::test]
    async fn test_sync_appends_new_and_reports_synced() {
        let remote = FakeRemote::with_titles(&["B"]);
        let (db, store, manager) = setup(remote, vec![quote("A", "X")]).await;
        let mut rx = manager.subscribe();

        manager.sync_once().await.unwrap();

        let expected = vec![quote("A", "X"), quote("B", "Server")];
        assert_eq!(store.quotes().await, expected);
        let mirrored: Vec<Quote> =
            serde_json::from_str(&db.get_setting(QUOTES_KEY).unwrap().unwrap()).unwrap();
        assert_eq!(mirrored, expected);
        assert_eq!(rx.recv().await.unwrap().kind, NotificationKind::Synced);
        assert_eq!(manager.status().await, SyncStatus::Idle);
    }

    #[tokio::test]
    async fn test_failed_fetch_leaves_store_untouched() {
        let remote = FakeRemote::with_titles(&["B"]);
        remote.fail.store(true, Ordering::SeqCst);
        let (_db, store, manager) = setup(remote, vec![quote("A", "X")]).await;
        let mut rx = manager.subscribe();

        let err = manager.sync_once().await.unwrap_err();

        assert!(err.is_remote());
        assert_eq!(store.quotes().await, vec![quote("A", "X")]);
        let note = rx.recv().await.unwrap();
        assert_eq!(note.kind, NotificationKind::Error);
        assert!(note.message.starts_with("Failed to sync with server"));
    }

    #[tokio::test]
    async fn test_remote_limit_caps_merged_items() {
        let db = Arc::new(Database::open_in_memory().unwrap());
        let store = Arc::new(QuoteStore::load(db));
        store.replace_all(Vec::new()).await.unwrap();
        let manager = SyncManager::new(FakeRemote::with_titles(&["A", "B", "C"]), store.clone(), 2);

        manager.sync_once().await.unwrap();

        assert_eq!(
            store.quotes().await,
            vec![quote("A", "Server"), quote("B", "Server")]
        );
    }

    #[tokio::test]
    async fn test_default_config_merges_every_remote_item() {
        let titles: Vec<String> = (1..=12).map(|n| format!("Remote {n}")).collect();
        let titles: Vec<&str> = titles.iter().map(String::as_str).collect();
        let config = crate::config::Config::from_lookup(|key: &str| {
            (key == "QUOTESYNC_DATA_DIR").then(|| "/tmp/quotesync-test".to_string())
        })
        .unwrap();

        let db = Arc::new(Database::open_in_memory().unwrap());
        let store = Arc::new(QuoteStore::load(db));
        store.replace_all(Vec::new()).await.unwrap();
        let manager = SyncManager::new(
            FakeRemote::with_titles(&titles),
            store.clone(),
            config.remote_limit,
        );

        let report = manager.sync_once().await.unwrap().unwrap();

        assert_eq!(report.added, 12);
        assert_eq!(store.len().await, 12);
    }

    #[tokio::test]
    async fn test_overlapping_sync_is_skipped() {
        let mut remote = FakeRemote::with_titles(&["B"]);
        remote.delay = Duration::from_millis(50);
        let (_db, _store, manager) = setup(remote, Vec::new()).await;

        let (first, second) = tokio::join!(manager.sync_once(), manager.sync_once());

        assert!(first.unwrap().is_some());
        assert!(second.unwrap().is_none());
        assert_eq!(manager.remote.calls.load(Ordering::SeqCst), 1);
    }

    #[tokio::test]
    async fn test_add_during_sync_is_not_lost() {
        let mut remote = FakeRemote::with_titles(&["B"]);
        remote.delay = Duration::from_millis(50);
        let (_db, store, manager) = setup(remote, vec![quote("A", "X")]).await;

        let syncing = {
            let manager = manager.clone();
            tokio::spawn(async move { manager.sync_once().await })
        };
        tokio::time::sleep(Duration::from_millis(10)).await;
        store.add("Added mid-sync.", "Local").await.unwrap();
        syncing.await.unwrap().unwrap();

        let quotes = store.quotes().await;
        assert!(quotes.contains(&quote("Added mid-sync.", "Local")));
        assert!(quotes.contains(&quote("B", "Server")));
        assert_eq!(quotes.len(), 3);
    }

    #[tokio::test]
    async fn test_start_runs_immediately_and_shutdown_stops() {
        let remote = FakeRemote::with_titles(&["B"]);
        let (_db, _store, manager) = setup(remote, Vec::new()).await;
        let mut rx = manager.subscribe();

        manager.start(Duration::from_millis(40)).await;
        let first = tokio::time::timeout(Duration::from_secs(2), rx.recv())
            .await
            .expect("immediate sync should notify")
            .unwrap();
        assert_eq!(first.kind, NotificationKind::Synced);
        assert!(manager.is_running().await);

        let second = tokio::time::timeout(Duration::from_millis(120), rx.recv())
            .await
            .expect("interval should trigger a second sync")
            .unwrap();
        assert_eq!(second.kind, NotificationKind::Synced);
        assert!(manager.remote.calls.load(Ordering::SeqCst) >= 2);

        manager.shutdown().await;
        assert!(!manager.is_running().await);
        assert_eq!(manager.status().await, SyncStatus::Stopped);

        let calls = manager.remote.calls.load(Ordering::SeqCst);
        tokio::time::sleep(Duration::from_millis(150)).await;
        assert_eq!(manager.remote.calls.load(Ordering::SeqCst), calls);
    }

    #[tokio::test]
    async fn test_start_leaves_in_flight_status_alone() {
        let mut remote = FakeRemote::with_titles(&["B"]);
        remote.delay = Duration::from_millis(100);
        let (_db, _store, manager) = setup(remote, Vec::new()).await;

        manager.start(Duration::from_secs(60)).await;
        tokio::time::sleep(Duration::from_millis(30)).await;
        assert_eq!(manager.status().await, SyncStatus::Syncing);

        manager.shutdown().await;
    }

    #[tokio::test]
    async fn test_publish_stores_echoed_quote() {
        let (_db, store, manager) = setup(FakeRemote::default(), Vec::new()).await;

        let quote = manager.publish(" Ship it. ", "Work").await.unwrap();

        assert_eq!(quote, self::quote("Ship it.", "Work"));
        assert_eq!(store.quotes().await, vec![quote]);
    }

    #[tokio::test]
    async fn test_publish_rejects_empty_and_network_failure() {
        let remote = FakeRemote::default();
        remote.fail.store(true, Ordering::SeqCst);
        let (_db, store, manager) = setup(remote, Vec::new()).await;

        assert!(matches!(
            manager.publish("", "Work").await,
            Err(Error::EmptyInput)
        ));
        assert!(matches!(
            manager.publish("Ship it.", "Work").await,
            Err(Error::Network(_))
        ));
        assert!(store.is_empty().await);
    }
}
