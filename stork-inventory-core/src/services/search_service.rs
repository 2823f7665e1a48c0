//! Debounced, sequenced search.

use std::time::Duration;

use stork_inventory_backend::{InventoryRecord, RecordBackend};
use tokio::sync::watch;

/// Default quiet period before a query is issued.
pub const DEFAULT_DEBOUNCE: Duration = Duration::from_millis(300);

/// A numbered fetch. Only the newest ticket's response is applied.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SearchTicket {
    seq: u64,
    query: String,
}

impl SearchTicket {
    pub(crate) fn new(seq: u64, query: &str) -> Self {
        Self {
            seq,
            query: query.trim().to_string(),
        }
    }

    pub fn seq(&self) -> u64 {
        self.seq
    }

    pub fn query(&self) -> &str {
        &self.query
    }

    /// Blank query means a full refetch rather than a search.
    pub fn is_full_fetch(&self) -> bool {
        self.query.is_empty()
    }

    /// Run the backend call this ticket stands for.
    pub async fn fetch<R: InventoryRecord>(
        &self,
        backend: &dyn RecordBackend<R>,
    ) -> stork_inventory_backend::Result<Vec<R>> {
        if self.is_full_fetch() {
            backend.list_all().await
        } else {
            backend.search(&self.query).await
        }
    }
}

/// Sending half of a [`QueryDebouncer`], fed by the search box.
#[derive(Debug, Clone)]
pub struct QuerySender(watch::Sender<String>);

impl QuerySender {
    /// Returns `false` when the debouncer has been dropped.
    pub fn send(&self, query: impl Into<String>) -> bool {
        self.0.send(query.into()).is_ok()
    }
}

/// Yields a query only after it has been stable for the quiet period.
pub struct QueryDebouncer {
    rx: watch::Receiver<String>,
    quiet: Duration,
}

impl QueryDebouncer {
    pub fn new(quiet: Duration) -> (QuerySender, Self) {
        let (tx, rx) = watch::channel(String::new());
        (QuerySender(tx), Self { rx, quiet })
    }

    pub fn quiet(&self) -> Duration {
        self.quiet
    }

    /// Wait for the next settled query. `None` once the sender is gone and
    /// nothing is left to flush.
    pub async fn next_settled(&mut self) -> Option<String> {
        self.rx.changed().await.ok()?;
        loop {
            match tokio::time::timeout(self.quiet, self.rx.changed()).await {
                // 静默期内有新输入，重新计时
                Ok(Ok(())) => {}
                // 超时或发送端已关闭：输出最后一次输入
                Err(_) | Ok(Err(_)) => return Some(self.rx.borrow_and_update().clone()),
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use tokio::time::Instant;

    use super::*;

    #[tokio::test(start_paused = true)]
    async fn only_last_query_in_window_is_emitted() {
        let (tx, mut debouncer) = QueryDebouncer::new(DEFAULT_DEBOUNCE);
        let start = Instant::now();

        let typing = tokio::spawn(async move {
            for q in ["h", "hp", "hp m"] {
                tx.send(q);
                tokio::time::sleep(Duration::from_millis(100)).await;
            }
            tx
        });

        assert_eq!(debouncer.next_settled().await.as_deref(), Some("hp m"));
        // 最后一次输入在 200ms，静默 300ms 后才发出
        assert!(start.elapsed() >= Duration::from_millis(500));
        drop(typing.await.unwrap());
    }

    #[tokio::test(start_paused = true)]
    async fn separate_bursts_emit_separately() {
        let (tx, mut debouncer) = QueryDebouncer::new(Duration::from_millis(300));
        tx.send("canon");
        assert_eq!(debouncer.next_settled().await.as_deref(), Some("canon"));
        tx.send("");
        assert_eq!(debouncer.next_settled().await.as_deref(), Some(""));
    }

    #[tokio::test(start_paused = true)]
    async fn flushes_then_ends_when_sender_dropped() {
        let (tx, mut debouncer) = QueryDebouncer::new(DEFAULT_DEBOUNCE);
        tx.send("brother");
        drop(tx);
        assert_eq!(debouncer.next_settled().await.as_deref(), Some("brother"));
        assert_eq!(debouncer.next_settled().await, None);
    }

    #[test]
    fn ticket_trims_query() {
        let t = SearchTicket::new(3, "  hp  ");
        assert_eq!(t.query(), "hp");
        assert!(!t.is_full_fetch());
        assert!(SearchTicket::new(4, "   ").is_full_fetch());
    }
}
