//! 业务逻辑服务层

mod form;
mod lifecycle;
mod panel_service;
mod search_service;
mod software_service;

pub use form::{DraftForm, archive_toner_date};
pub use lifecycle::{LifecycleTarget, PendingAction, check_transition};
pub use panel_service::{InventoryPanel, PAGE_WINDOW, PanelOptions, PanelPage, is_modified_today};
pub use search_service::{DEFAULT_DEBOUNCE, QueryDebouncer, QuerySender, SearchTicket};
pub use software_service::SoftwareService;
