use std::sync::Arc;

use async_trait::async_trait;
use chrono::{DateTime, Datelike, Timelike, Utc};
use tokio::sync::watch;
use tracing::{error, info};

use weekcast_core::Publisher;
use weekcast_store::{PostStore, StoreError, WeeklyPost};

use crate::align::{wait_until_boundary, BOUNDARY_SECS};

/// Read side of the schedule store, as seen by the dispatch loop.
///
/// One method is all the loop needs: a materialized snapshot of today's
/// posts. Store failures arrive as [`StoreError`] so the loop can apply its
/// empty-candidate fallback.
#[async_trait]
pub trait PostSource: Send + Sync {
    async fn posts_for_day(&self, day_of_week: u8) -> Result<Vec<WeeklyPost>, StoreError>;
}

#[async_trait]
impl PostSource for PostStore {
    async fn posts_for_day(&self, day_of_week: u8) -> Result<Vec<WeeklyPost>, StoreError> {
        self.get_by_day_of_week(day_of_week)
    }
}

/// The recurring dispatcher: aligns once, then ticks every 30 minutes for
/// the lifetime of the process.
pub struct DispatchEngine {
    source: Arc<dyn PostSource>,
    publisher: Arc<dyn Publisher>,
}

impl DispatchEngine {
    pub fn new(source: Arc<dyn PostSource>, publisher: Arc<dyn Publisher>) -> Self {
        Self { source, publisher }
    }

    /// Main loop. Waits for boundary alignment, then ticks every 30 minutes
    /// until `shutdown` broadcasts `true`.
    ///
    /// Alignment runs exactly once; there is no path back to it short of a
    /// process restart.
    pub async fn run(self, mut shutdown: watch::Receiver<bool>) {
        info!("dispatch engine started, aligning to half-hour boundary");
        tokio::select! {
            _ = wait_until_boundary() => {}
            _ = wait_for_shutdown(&mut shutdown) => {
                info!("dispatch engine shutting down before first tick");
                return;
            }
        }
        info!("dispatch engine aligned, ticking every 30 minutes");

        let mut interval =
            tokio::time::interval(std::time::Duration::from_secs(BOUNDARY_SECS as u64));
        loop {
            tokio::select! {
                _ = interval.tick() => {
                    self.tick(Utc::now()).await;
                }
                _ = shutdown.changed() => {
                    if *shutdown.borrow() {
                        info!("dispatch engine shutting down");
                        break;
                    }
                }
            }
        }
    }

    /// One dispatch pass against the instant `now`.
    ///
    /// `now` is captured once by the caller and never re-read here, so every
    /// post in the tick is matched against the same instant. Infallible by
    /// contract: store and delivery failures are logged and absorbed.
    pub async fn tick(&self, now: DateTime<Utc>) {
        let day = now.weekday().num_days_from_monday() as u8;
        info!(
            day_of_week = day,
            hour = now.hour(),
            minute = now.minute(),
            "executing dispatch tick"
        );

        let candidates = match self.source.posts_for_day(day).await {
            Ok(posts) => posts,
            Err(e) => {
                // Treat this tick as empty; the next tick reads fresh.
                error!("failed to load weekly posts: {e}");
                Vec::new()
            }
        };
        info!(count = candidates.len(), "candidate posts for today");

        for post in &candidates {
            if u32::from(post.hour) != now.hour() || u32::from(post.minute) != now.minute() {
                continue;
            }
            info!(post_id = post.id, "sending weekly post");
            match self.publisher.publish(&post.content).await {
                Ok(()) => info!(post_id = post.id, "weekly post sent"),
                Err(e) => error!(post_id = post.id, "delivery failed: {e}"),
            }
        }
    }
}

/// Resolve only when shutdown is signalled; park forever if the sender is
/// dropped without signalling.
async fn wait_for_shutdown(rx: &mut watch::Receiver<bool>) {
    while rx.changed().await.is_ok() {
        if *rx.borrow() {
            return;
        }
    }
    std::future::pending::<()>().await;
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;
    use std::sync::Mutex;
    use weekcast_core::PublishError;

    /// Fixed candidate set, or a store failure when `fail` is set.
    struct FakeSource {
        posts: Vec<WeeklyPost>,
        fail: bool,
    }

    #[async_trait]
    impl PostSource for FakeSource {
        async fn posts_for_day(&self, day_of_week: u8) -> Result<Vec<WeeklyPost>, StoreError> {
            if self.fail {
                return Err(StoreError::Database(
                    rusqlite::Error::InvalidQuery,
                ));
            }
            Ok(self
                .posts
                .iter()
                .filter(|p| p.day_of_week == day_of_week)
                .cloned()
                .collect())
        }
    }

    /// Records every published text; contents in `fail_on` error out.
    #[derive(Default)]
    struct RecordingPublisher {
        sent: Mutex<Vec<String>>,
        fail_on: Vec<String>,
    }

    #[async_trait]
    impl Publisher for RecordingPublisher {
        async fn publish(&self, text: &str) -> Result<(), PublishError> {
            if self.fail_on.iter().any(|f| f == text) {
                return Err(PublishError::Transport("connection reset".into()));
            }
            self.sent.lock().unwrap().push(text.to_string());
            Ok(())
        }
    }

    fn post(id: i64, content: &str, day_of_week: u8, hour: u8, minute: u8) -> WeeklyPost {
        let now = Utc::now().to_rfc3339();
        WeeklyPost {
            id,
            content: content.to_string(),
            day_of_week,
            hour,
            minute,
            created_at: now.clone(),
            updated_at: now,
        }
    }

    fn engine(
        source: FakeSource,
        publisher: Arc<RecordingPublisher>,
    ) -> DispatchEngine {
        DispatchEngine::new(Arc::new(source), publisher)
    }

    /// 2026-08-26 is a Wednesday (day_of_week 2).
    fn wednesday(hour: u32, minute: u32) -> DateTime<Utc> {
        let now = Utc.with_ymd_and_hms(2026, 8, 26, hour, minute, 0).unwrap();
        assert_eq!(now.weekday().num_days_from_monday(), 2);
        now
    }

    #[tokio::test]
    async fn exact_match_is_dispatched_once() {
        let publisher = Arc::new(RecordingPublisher::default());
        let engine = engine(
            FakeSource {
                posts: vec![post(1, "hi", 2, 9, 30)],
                fail: false,
            },
            publisher.clone(),
        );

        engine.tick(wednesday(9, 30)).await;
        assert_eq!(*publisher.sent.lock().unwrap(), vec!["hi".to_string()]);
    }

    #[tokio::test]
    async fn near_misses_send_nothing() {
        let publisher = Arc::new(RecordingPublisher::default());
        let engine = engine(
            FakeSource {
                posts: vec![post(1, "hi", 2, 14, 30)],
                fail: false,
            },
            publisher.clone(),
        );

        // Same day, wrong minute; same day, wrong hour.
        engine.tick(wednesday(14, 0)).await;
        engine.tick(wednesday(15, 0)).await;
        // Right time, wrong weekday (Thursday).
        let thursday = Utc.with_ymd_and_hms(2026, 8, 27, 14, 30, 0).unwrap();
        assert_eq!(thursday.weekday().num_days_from_monday(), 3);
        engine.tick(thursday).await;

        assert!(publisher.sent.lock().unwrap().is_empty());
    }

    #[tokio::test]
    async fn duplicate_schedules_all_fire() {
        let publisher = Arc::new(RecordingPublisher::default());
        let engine = engine(
            FakeSource {
                posts: vec![post(1, "first", 2, 9, 30), post(2, "second", 2, 9, 30)],
                fail: false,
            },
            publisher.clone(),
        );

        engine.tick(wednesday(9, 30)).await;
        assert_eq!(
            *publisher.sent.lock().unwrap(),
            vec!["first".to_string(), "second".to_string()]
        );
    }

    #[tokio::test]
    async fn failed_delivery_does_not_stop_remaining_posts() {
        let publisher = Arc::new(RecordingPublisher {
            sent: Mutex::new(Vec::new()),
            fail_on: vec!["b".to_string()],
        });
        let engine = engine(
            FakeSource {
                posts: vec![
                    post(1, "a", 2, 9, 30),
                    post(2, "b", 2, 9, 30),
                    post(3, "c", 2, 9, 30),
                ],
                fail: false,
            },
            publisher.clone(),
        );

        engine.tick(wednesday(9, 30)).await;
        assert_eq!(
            *publisher.sent.lock().unwrap(),
            vec!["a".to_string(), "c".to_string()]
        );
    }

    #[tokio::test]
    async fn store_failure_yields_zero_sends_and_no_panic() {
        let publisher = Arc::new(RecordingPublisher::default());
        let engine = engine(
            FakeSource {
                posts: vec![post(1, "hi", 2, 9, 30)],
                fail: true,
            },
            publisher.clone(),
        );

        engine.tick(wednesday(9, 30)).await;
        assert!(publisher.sent.lock().unwrap().is_empty());
    }

    #[tokio::test]
    async fn real_store_create_then_match() {
        let store =
            PostStore::new(rusqlite::Connection::open_in_memory().unwrap()).unwrap();
        store.create("hi", 2, 9, 30).unwrap();

        let publisher = Arc::new(RecordingPublisher::default());
        let engine = DispatchEngine::new(Arc::new(store), publisher.clone());

        engine.tick(wednesday(9, 0)).await;
        assert!(publisher.sent.lock().unwrap().is_empty());

        engine.tick(wednesday(9, 30)).await;
        assert_eq!(*publisher.sent.lock().unwrap(), vec!["hi".to_string()]);
    }
}
