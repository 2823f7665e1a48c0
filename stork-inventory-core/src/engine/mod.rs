//! Pure list transforms: sort, filter, paginate, validate, select, confirm.

mod confirm;
mod filter;
mod paginate;
mod selection;
mod sort;
mod validate;
mod view;

pub use confirm::{ConfirmationGate, LifecycleAction};
pub use filter::{filter_visibility, visibility_counts};
pub use paginate::{PageInfo, PageSlice, clamp_page, page_window, paginate, total_pages};
pub use selection::SelectionSet;
pub use sort::{SortDirection, SortKey, SortSpec, SortState, compare_records, compare_values, sort};
pub use validate::{ValidationError, validate};
pub use view::{DEFAULT_PAGE_SIZE, ViewState};
