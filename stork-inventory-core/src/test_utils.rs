//! 测试辅助模块
//!
//! 提供 mock backend 和便捷的记录工厂方法。

use async_trait::async_trait;
use chrono::Utc;
use stork_inventory_backend::{
    BackendError, InMemoryBackend, InventoryRecord, NetworkDraft, NetworkRecord, PcDraft,
    PcRecord, PrinterDraft, PrinterRecord, RecordBackend, RecordId, RecordMeta, Result,
};
use tokio::sync::RwLock;

fn text(value: &str) -> Option<String> {
    (!value.is_empty()).then(|| value.to_string())
}

fn ip(value: Option<&str>) -> Option<String> {
    value.and_then(text)
}

// ===== Record factories =====

pub fn pc(id: RecordId, name: &str, cpu: &str, ip_address: Option<&str>) -> PcRecord {
    PcRecord {
        meta: RecordMeta::new(id, Utc::now()),
        data: PcDraft {
            computer_name: text(name),
            cpu_name: text(cpu),
            ip_address: ip(ip_address),
            ..PcDraft::default()
        },
    }
}

pub fn printer(id: RecordId, brand: &str, model: &str, ip_address: Option<&str>) -> PrinterRecord {
    PrinterRecord {
        meta: RecordMeta::new(id, Utc::now()),
        data: PrinterDraft {
            brand: text(brand),
            model: text(model),
            ip_address: ip(ip_address),
            ..PrinterDraft::default()
        },
    }
}

pub fn network(id: RecordId, brand: &str, model: &str, ip_address: Option<&str>) -> NetworkRecord {
    NetworkRecord {
        meta: RecordMeta::new(id, Utc::now()),
        data: NetworkDraft {
            brand: text(brand),
            model: text(model),
            ip_address: ip(ip_address),
            ..NetworkDraft::default()
        },
    }
}

// ===== MockRecordBackend =====

/// In-memory backend that records every call and can be told to fail.
pub struct MockRecordBackend<R: InventoryRecord> {
    inner: InMemoryBackend<R>,
    calls: RwLock<Vec<String>>,
    /// 如果 Some，所有调用都返回此错误
    error: RwLock<Option<BackendError>>,
}

impl<R: InventoryRecord> MockRecordBackend<R> {
    pub fn new(records: impl IntoIterator<Item = R>) -> Self {
        Self {
            inner: InMemoryBackend::with_records(records),
            calls: RwLock::new(Vec::new()),
            error: RwLock::new(None),
        }
    }

    pub async fn set_error(&self, err: Option<BackendError>) {
        *self.error.write().await = err;
    }

    /// Calls so far, e.g. `["list_all", "hide:[7]"]`.
    pub async fn calls(&self) -> Vec<String> {
        self.calls.read().await.clone()
    }

    pub async fn call_count(&self, name: &str) -> usize {
        self.calls
            .read()
            .await
            .iter()
            .filter(|c| c.split(':').next() == Some(name))
            .count()
    }

    pub async fn rows(&self) -> Vec<R> {
        self.inner.snapshot().await
    }

    async fn record(&self, call: String) -> Result<()> {
        self.calls.write().await.push(call);
        match self.error.read().await.clone() {
            Some(err) => Err(err),
            None => Ok(()),
        }
    }
}

pub fn network_error(detail: &str) -> BackendError {
    BackendError::Network {
        backend: "mock".to_string(),
        detail: detail.to_string(),
    }
}

#[async_trait]
impl<R: InventoryRecord> RecordBackend<R> for MockRecordBackend<R> {
    fn id(&self) -> &'static str {
        "mock"
    }

    async fn list_all(&self) -> Result<Vec<R>> {
        self.record("list_all".to_string()).await?;
        self.inner.list_all().await
    }

    async fn create(&self, draft: &R::Draft) -> Result<R> {
        self.record("create".to_string()).await?;
        self.inner.create(draft).await
    }

    async fn update(&self, id: RecordId, draft: &R::Draft) -> Result<R> {
        self.record(format!("update:{id}")).await?;
        self.inner.update(id, draft).await
    }

    async fn hide(&self, ids: &[RecordId]) -> Result<()> {
        self.record(format!("hide:{ids:?}")).await?;
        self.inner.hide(ids).await
    }

    async fn restore(&self, ids: &[RecordId]) -> Result<()> {
        self.record(format!("restore:{ids:?}")).await?;
        self.inner.restore(ids).await
    }

    async fn permanent_delete(&self, ids: &[RecordId]) -> Result<()> {
        self.record(format!("permanent_delete:{ids:?}")).await?;
        self.inner.permanent_delete(ids).await
    }

    async fn search(&self, query: &str) -> Result<Vec<R>> {
        self.record(format!("search:{query}")).await?;
        self.inner.search(query).await
    }
}
