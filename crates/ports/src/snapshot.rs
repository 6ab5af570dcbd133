//! 实时快照端口
//!
//! 存储每次变更后整体发布一份新快照，订阅方总是基于最新快照重新计算

use std::sync::Arc;
use std::sync::atomic::{AtomicU64, Ordering};
use std::time::Duration;

use tokio::sync::watch;
use tracing::{debug, warn};

/// 不可变快照
///
/// `version == 0` 表示存储尚未确认任何初始数据
#[derive(Debug)]
pub struct Snapshot<T> {
    pub version: u64,
    pub items: Arc<Vec<T>>,
}

impl<T> Clone for Snapshot<T> {
    fn clone(&self) -> Self {
        Self {
            version: self.version,
            items: Arc::clone(&self.items),
        }
    }
}

impl<T> Snapshot<T> {
    pub fn empty() -> Self {
        Self {
            version: 0,
            items: Arc::new(Vec::new()),
        }
    }

    pub fn is_loaded(&self) -> bool {
        self.version > 0
    }

    pub fn len(&self) -> usize {
        self.items.len()
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }
}

/// 快照订阅端口
pub trait SnapshotFeed<T>: Send + Sync {
    /// 订阅快照流，接收端立即可读到当前快照
    fn subscribe(&self) -> watch::Receiver<Snapshot<T>>;
}

/// 快照发布器
pub struct SnapshotPublisher<T> {
    sender: watch::Sender<Snapshot<T>>,
    version: AtomicU64,
}

impl<T> SnapshotPublisher<T> {
    pub fn new() -> Self {
        let (sender, _) = watch::channel(Snapshot::empty());
        Self {
            sender,
            version: AtomicU64::new(0),
        }
    }

    /// 发布新快照，返回其版本号
    pub fn publish(&self, items: Vec<T>) -> u64 {
        let version = self.version.fetch_add(1, Ordering::SeqCst) + 1;
        self.sender.send_replace(Snapshot {
            version,
            items: Arc::new(items),
        });
        debug!(version, "Snapshot published");
        version
    }

    pub fn subscribe(&self) -> watch::Receiver<Snapshot<T>> {
        self.sender.subscribe()
    }

    pub fn current(&self) -> Snapshot<T> {
        self.sender.borrow().clone()
    }
}

impl<T> Default for SnapshotPublisher<T> {
    fn default() -> Self {
        Self::new()
    }
}

/// 初始快照等待结果
#[derive(Debug)]
pub struct InitialSnapshot<T> {
    pub snapshot: Snapshot<T>,
    /// 是否因超时而放弃等待
    pub timed_out: bool,
}

/// 等待首个已确认快照
///
/// 超时或发布端关闭时不会一直挂起，而是返回当前快照（可能为空）
pub async fn wait_initial_snapshot<T>(
    mut receiver: watch::Receiver<Snapshot<T>>,
    timeout: Duration,
) -> InitialSnapshot<T> {
    let waited = tokio::time::timeout(timeout, async {
        receiver
            .wait_for(|snapshot| snapshot.is_loaded())
            .await
            .map(|snapshot| snapshot.clone())
    })
    .await;

    match waited {
        Ok(Ok(snapshot)) => InitialSnapshot {
            snapshot,
            timed_out: false,
        },
        Ok(Err(_)) => {
            warn!("Snapshot publisher closed before initial load");
            InitialSnapshot {
                snapshot: receiver.borrow().clone(),
                timed_out: true,
            }
        }
        Err(_) => {
            warn!(
                timeout_ms = timeout.as_millis() as u64,
                "Initial snapshot load timed out, continuing with current data"
            );
            InitialSnapshot {
                snapshot: receiver.borrow().clone(),
                timed_out: true,
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_publish_increments_version() {
        let publisher = SnapshotPublisher::new();
        assert!(!publisher.current().is_loaded());

        assert_eq!(publisher.publish(vec![1, 2, 3]), 1);
        assert_eq!(publisher.publish(vec![4]), 2);

        let current = publisher.current();
        assert_eq!(current.version, 2);
        assert_eq!(*current.items, vec![4]);
    }

    #[tokio::test]
    async fn test_wait_returns_published_snapshot() {
        let publisher = Arc::new(SnapshotPublisher::new());
        let receiver = publisher.subscribe();

        let background = Arc::clone(&publisher);
        tokio::spawn(async move {
            tokio::time::sleep(Duration::from_millis(10)).await;
            background.publish(vec!["a", "b"]);
        });

        let initial = wait_initial_snapshot(receiver, Duration::from_secs(5)).await;
        assert!(!initial.timed_out);
        assert_eq!(initial.snapshot.len(), 2);
    }

    #[tokio::test]
    async fn test_wait_times_out_with_empty_snapshot() {
        let publisher: SnapshotPublisher<u32> = SnapshotPublisher::new();
        let initial = wait_initial_snapshot(publisher.subscribe(), Duration::from_millis(20)).await;

        assert!(initial.timed_out);
        assert!(initial.snapshot.is_empty());
        assert!(!initial.snapshot.is_loaded());
    }
}
