//! Platform-agnostic application bootstrap for the Stork IT asset inventory.
//!
//! Provides `AppState` (the three independent panels plus shared services),
//! `AppStateBuilder` (backend injection) and `InventoryConfig`.

pub mod adapters;
pub mod config;
mod search_loop;

use std::sync::Arc;

use stork_inventory_backend::{
    InstalledSoftwareSource, InventoryRecord, NetworkRecord, PcRecord, PrinterRecord,
    RecordBackend, RecordKind, RestBackend, RestInstalledSoftware,
};
use stork_inventory_core::InventoryPanel;
use stork_inventory_core::error::{CoreError, CoreResult};
use stork_inventory_core::export::Exporter;
use stork_inventory_core::services::{QueryDebouncer, QuerySender, SoftwareService};
use tokio::sync::Mutex;

pub use config::InventoryConfig;
pub use search_loop::run_search_loop;

use adapters::CsvExporter;

/// Shared, lockable panel.
pub type SharedPanel<R> = Arc<Mutex<InventoryPanel<R>>>;

/// Platform-agnostic application state.
///
/// Every frontend constructs this once at startup via `AppStateBuilder`.
pub struct AppState {
    pub config: InventoryConfig,
    /// 电脑
    pub pcs: SharedPanel<PcRecord>,
    /// 打印机
    pub printers: SharedPanel<PrinterRecord>,
    /// 网络设备
    pub network: SharedPanel<NetworkRecord>,
    /// Installed software for the PC detail view, when a source is configured.
    pub software: Option<SoftwareService>,
    pub exporter: Arc<dyn Exporter>,
}

impl AppState {
    /// Fetch all three tables concurrently. Returns the kinds that failed;
    /// each failing panel also carries its own notice.
    pub async fn refresh_all(&self) -> Vec<RecordKind> {
        let (pcs, printers, network) = futures::join!(
            async { self.pcs.lock().await.load().await },
            async { self.printers.lock().await.load().await },
            async { self.network.lock().await.load().await },
        );

        let failed: Vec<RecordKind> = [
            (RecordKind::Pc, pcs),
            (RecordKind::Printer, printers),
            (RecordKind::Network, network),
        ]
        .into_iter()
        .filter_map(|(kind, result)| result.is_err().then_some(kind))
        .collect();

        if failed.is_empty() {
            log::info!("All inventory tables loaded");
        } else {
            log::warn!("Failed to load: {failed:?}");
        }
        failed
    }

    /// A search box feed for one panel, using the configured quiet period.
    /// Spawn [`run_search_loop`] with the returned debouncer.
    pub fn search_channel(&self) -> (QuerySender, QueryDebouncer) {
        QueryDebouncer::new(self.config.debounce())
    }
}

/// Builder for constructing `AppState`.
///
/// Backends not injected explicitly are built from the config's
/// `backend_url`; with neither, `build` fails.
pub struct AppStateBuilder {
    config: InventoryConfig,
    pc_backend: Option<Arc<dyn RecordBackend<PcRecord>>>,
    printer_backend: Option<Arc<dyn RecordBackend<PrinterRecord>>>,
    network_backend: Option<Arc<dyn RecordBackend<NetworkRecord>>>,
    software_source: Option<Arc<dyn InstalledSoftwareSource>>,
    exporter: Option<Arc<dyn Exporter>>,
}

impl AppStateBuilder {
    #[must_use]
    pub fn new(config: InventoryConfig) -> Self {
        Self {
            config,
            pc_backend: None,
            printer_backend: None,
            network_backend: None,
            software_source: None,
            exporter: None,
        }
    }

    #[must_use]
    pub fn pc_backend(mut self, backend: Arc<dyn RecordBackend<PcRecord>>) -> Self {
        self.pc_backend = Some(backend);
        self
    }

    #[must_use]
    pub fn printer_backend(mut self, backend: Arc<dyn RecordBackend<PrinterRecord>>) -> Self {
        self.printer_backend = Some(backend);
        self
    }

    #[must_use]
    pub fn network_backend(mut self, backend: Arc<dyn RecordBackend<NetworkRecord>>) -> Self {
        self.network_backend = Some(backend);
        self
    }

    #[must_use]
    pub fn software_source(mut self, source: Arc<dyn InstalledSoftwareSource>) -> Self {
        self.software_source = Some(source);
        self
    }

    #[must_use]
    pub fn exporter(mut self, exporter: Arc<dyn Exporter>) -> Self {
        self.exporter = Some(exporter);
        self
    }

    /// Build the `AppState`.
    ///
    /// # Errors
    /// `CoreError::Config` if the config is invalid or a backend is missing
    /// and no `backend_url` is configured.
    pub fn build(self) -> CoreResult<AppState> {
        self.config.validate()?;
        let rest = self.config.rest_config()?;

        let software_source = match (self.software_source, &rest) {
            (Some(source), _) => Some(source),
            (None, Some(rest)) => {
                Some(Arc::new(RestInstalledSoftware::new(rest.clone())?)
                    as Arc<dyn InstalledSoftwareSource>)
            }
            (None, None) => None,
        };

        let pc_backend: Arc<dyn RecordBackend<PcRecord>> = match (self.pc_backend, &rest) {
            (Some(backend), _) => backend,
            (None, Some(rest)) => {
                let mut backend = RestBackend::<PcRecord>::new(rest.clone())?;
                if let Some(source) = &software_source {
                    backend = backend.with_software(Arc::clone(source));
                }
                Arc::new(backend)
            }
            (None, None) => return Err(missing_backend(RecordKind::Pc)),
        };
        let printer_backend = resolve(self.printer_backend, rest.as_ref())?;
        let network_backend = resolve(self.network_backend, rest.as_ref())?;

        let exporter = self
            .exporter
            .unwrap_or_else(|| Arc::new(CsvExporter::new(self.config.export_dir())));
        let options = self.config.panel_options();

        log::info!(
            "Inventory backends: pc={}, printer={}, network={}",
            pc_backend.id(),
            printer_backend.id(),
            network_backend.id()
        );

        Ok(AppState {
            pcs: Arc::new(Mutex::new(InventoryPanel::new(pc_backend, options))),
            printers: Arc::new(Mutex::new(InventoryPanel::new(printer_backend, options))),
            network: Arc::new(Mutex::new(InventoryPanel::new(network_backend, options))),
            software: software_source.map(SoftwareService::new),
            exporter,
            config: self.config,
        })
    }
}

impl Default for AppStateBuilder {
    fn default() -> Self {
        Self::new(InventoryConfig::default())
    }
}

fn resolve<R: InventoryRecord>(
    injected: Option<Arc<dyn RecordBackend<R>>>,
    rest: Option<&stork_inventory_backend::RestConfig>,
) -> CoreResult<Arc<dyn RecordBackend<R>>> {
    match (injected, rest) {
        (Some(backend), _) => Ok(backend),
        (None, Some(rest)) => Ok(Arc::new(RestBackend::<R>::new(rest.clone())?)),
        (None, None) => Err(missing_backend(R::descriptor().kind)),
    }
}

fn missing_backend(kind: RecordKind) -> CoreError {
    CoreError::Config(format!(
        "No backend for {} and no backend_url configured",
        kind.table()
    ))
}
