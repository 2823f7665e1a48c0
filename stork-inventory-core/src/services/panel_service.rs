//! Panel controller: one record store plus its view, selection and
//! confirmation state, wired to a [`RecordBackend`].

use std::path::PathBuf;
use std::sync::Arc;

use chrono::{Local, NaiveDate};
use log::{debug, error, info, warn};
use stork_inventory_backend::{BackendError, InventoryRecord, RecordBackend, RecordId, RecordKind};

use crate::engine::{
    LifecycleAction, PageInfo, SelectionSet, SortKey, ValidationError, ViewState,
    filter_visibility, page_window, paginate, sort, total_pages, validate, visibility_counts,
};
use crate::error::{CoreError, CoreResult};
use crate::export::{ExportFormat, ExportRow, ExportTable, Exporter, build_export_table, default_filename};
use crate::i18n::{Action, Language};

use super::form::DraftForm;
use super::lifecycle::{self, LifecycleTarget, PendingAction};
use super::search_service::SearchTicket;

/// Page numbers shown by the pager.
pub const PAGE_WINDOW: usize = 5;

/// Construction options shared by every panel.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PanelOptions {
    pub page_size: usize,
    pub language: Language,
}

impl Default for PanelOptions {
    fn default() -> Self {
        Self {
            page_size: crate::engine::DEFAULT_PAGE_SIZE,
            language: Language::default(),
        }
    }
}

/// The rendered page: visible slice, page metadata and pager window.
#[derive(Debug)]
pub struct PanelPage<'a, R> {
    pub items: Vec<&'a R>,
    pub info: PageInfo,
    pub window: Vec<usize>,
}

/// Panel controller for one record type.
///
/// Owns all mutable state of the panel; the three panels never share
/// state. Every failure is also turned into [`notice`](Self::notice).
pub struct InventoryPanel<R: InventoryRecord> {
    backend: Arc<dyn RecordBackend<R>>,
    records: Vec<R>,
    view: ViewState<R::Field>,
    selection: SelectionSet,
    pending: Option<PendingAction>,
    search_seq: u64,
    loading: bool,
    notice: Option<String>,
    language: Language,
}

impl<R: InventoryRecord> InventoryPanel<R> {
    #[must_use]
    pub fn new(backend: Arc<dyn RecordBackend<R>>, options: PanelOptions) -> Self {
        Self {
            backend,
            records: Vec::new(),
            view: ViewState::new(options.page_size),
            selection: SelectionSet::new(),
            pending: None,
            search_seq: 0,
            loading: false,
            notice: None,
            language: options.language,
        }
    }

    pub fn kind(&self) -> RecordKind {
        R::descriptor().kind
    }

    pub fn backend(&self) -> Arc<dyn RecordBackend<R>> {
        Arc::clone(&self.backend)
    }

    /// Record store as last fetched (`id` descending).
    pub fn records(&self) -> &[R] {
        &self.records
    }

    pub fn view(&self) -> &ViewState<R::Field> {
        &self.view
    }

    pub fn selection(&self) -> &SelectionSet {
        &self.selection
    }

    pub fn is_loading(&self) -> bool {
        self.loading
    }

    pub fn notice(&self) -> Option<&str> {
        self.notice.as_deref()
    }

    pub fn dismiss_notice(&mut self) {
        self.notice = None;
    }

    pub fn language(&self) -> Language {
        self.language
    }

    pub fn set_language(&mut self, language: Language) {
        self.language = language;
    }

    // ===== Fetch / search =====

    /// Fetch-on-mount and refetch: full list, or the active search.
    pub async fn load(&mut self) -> CoreResult<()> {
        let ticket = self.issue_ticket();
        let result = ticket.fetch(self.backend.as_ref()).await;
        self.finish_search(&ticket, result).map(|_| ())
    }

    /// Set the query (page resets when it changed) and number a new fetch.
    /// Run it with [`SearchTicket::fetch`] and hand the outcome to
    /// [`finish_search`](Self::finish_search).
    pub fn begin_search(&mut self, query: &str) -> SearchTicket {
        self.view.set_query(query);
        self.issue_ticket()
    }

    /// Apply a fetch result. Returns `Ok(false)` when a newer fetch has been
    /// issued since `ticket`; the stale result is dropped.
    pub fn finish_search(
        &mut self,
        ticket: &SearchTicket,
        result: stork_inventory_backend::Result<Vec<R>>,
    ) -> CoreResult<bool> {
        if ticket.seq() != self.search_seq {
            debug!(
                "[{}] Discarding stale result for {:?} (#{} < #{})",
                R::descriptor().table(),
                ticket.query(),
                ticket.seq(),
                self.search_seq
            );
            return Ok(false);
        }
        self.loading = false;

        match result {
            Ok(rows) => {
                debug!("[{}] Loaded {} records", R::descriptor().table(), rows.len());
                self.records = rows;
                self.selection.retain_existing(&self.records);
                self.clamp_page();
                Ok(true)
            }
            Err(e) => {
                let action = if ticket.is_full_fetch() {
                    Action::Load
                } else {
                    Action::Search
                };
                Err(self.fail_backend(action, e))
            }
        }
    }

    /// Debounced search entry point: blank query refetches everything.
    pub async fn search(&mut self, query: &str) -> CoreResult<()> {
        let ticket = self.begin_search(query);
        let result = ticket.fetch(self.backend.as_ref()).await;
        self.finish_search(&ticket, result).map(|_| ())
    }

    fn issue_ticket(&mut self) -> SearchTicket {
        self.search_seq += 1;
        self.loading = true;
        SearchTicket::new(self.search_seq, self.view.query())
    }

    async fn refetch(&mut self) {
        if let Err(e) = self.load().await {
            debug!("[{}] Refetch after write failed: {e}", R::descriptor().table());
        }
    }

    // ===== Create / update =====

    pub fn blank_form(&self) -> DraftForm<R::Draft> {
        DraftForm::blank()
    }

    /// Prefill the form to edit record `id`.
    pub fn edit_draft(&self, id: RecordId) -> CoreResult<DraftForm<R::Draft>> {
        let record = self.find(id)?;
        Ok(DraftForm {
            editing_id: Some(id),
            draft: record.to_draft(),
        })
    }

    /// Prefill the form with a copy of record `id`, saved as a new record.
    pub fn clone_draft(&self, id: RecordId) -> CoreResult<DraftForm<R::Draft>> {
        let record = self.find(id)?;
        Ok(DraftForm {
            editing_id: None,
            draft: record.to_draft(),
        })
    }

    /// Live check for the form (e.g. the IP hint under the input).
    pub fn check_draft(
        &self,
        draft: &R::Draft,
        current_id: Option<RecordId>,
    ) -> Result<(), ValidationError> {
        validate(draft, &self.records, current_id)
    }

    pub async fn submit(&mut self, form: DraftForm<R::Draft>) -> CoreResult<R> {
        match form.editing_id {
            Some(id) => self.update(id, form.draft).await,
            None => self.create(form.draft).await,
        }
    }

    /// Validate locally, insert, refetch.
    pub async fn create(&mut self, draft: R::Draft) -> CoreResult<R> {
        self.notice = None;
        if let Err(e) = validate(&draft, &self.records, None) {
            return Err(self.fail(e.into()));
        }

        self.loading = true;
        let result = self.backend.create(&draft).await;
        self.loading = false;

        match result {
            Ok(record) => {
                info!(
                    "[{}] Created #{} ({})",
                    R::descriptor().table(),
                    record.id(),
                    record.display_name()
                );
                self.refetch().await;
                Ok(record)
            }
            Err(e) => Err(self.fail_backend(Action::Create, e)),
        }
    }

    /// Validate locally (ignoring the record itself), update, refetch.
    pub async fn update(&mut self, id: RecordId, draft: R::Draft) -> CoreResult<R> {
        self.notice = None;
        if let Err(e) = self.find(id).map(|_| ()) {
            return Err(self.fail(e));
        }
        if let Err(e) = validate(&draft, &self.records, Some(id)) {
            return Err(self.fail(e.into()));
        }

        self.loading = true;
        let result = self.backend.update(id, &draft).await;
        self.loading = false;

        match result {
            Ok(record) => {
                info!("[{}] Updated #{id}", R::descriptor().table());
                self.refetch().await;
                Ok(record)
            }
            Err(e) => Err(self.fail_backend(Action::Update, e)),
        }
    }

    // ===== Lifecycle =====

    pub fn request_hide(&mut self, id: RecordId) -> CoreResult<()> {
        self.open_single(LifecycleAction::Hide, id)
    }

    pub fn request_restore(&mut self, id: RecordId) -> CoreResult<()> {
        self.open_single(LifecycleAction::Restore, id)
    }

    /// Only offered for hidden records.
    pub fn request_permanent_delete(&mut self, id: RecordId) -> CoreResult<()> {
        self.open_single(LifecycleAction::PermanentDelete, id)
    }

    /// Bulk action of the current mode: hide the selection in the normal
    /// view, restore it in the hidden view.
    pub fn request_bulk(&mut self) -> CoreResult<()> {
        let action = if self.view.hidden_mode() {
            LifecycleAction::Restore
        } else {
            LifecycleAction::Hide
        };
        self.open_bulk(action)
    }

    /// Hidden view only.
    pub fn request_bulk_permanent_delete(&mut self) -> CoreResult<()> {
        self.open_bulk(LifecycleAction::PermanentDelete)
    }

    fn open_single(&mut self, action: LifecycleAction, id: RecordId) -> CoreResult<()> {
        self.notice = None;
        match lifecycle::check_transition(&self.records, action, id).map(R::display_name) {
            Ok(name) => {
                self.pending = Some(PendingAction::new(
                    action,
                    LifecycleTarget::Single(id),
                    name,
                ));
                Ok(())
            }
            Err(e) => Err(self.fail(e)),
        }
    }

    /// Targets the selected ids within the current partition only.
    fn open_bulk(&mut self, action: LifecycleAction) -> CoreResult<()> {
        self.notice = None;
        let hidden = self.view.hidden_mode();
        let ids: Vec<RecordId> = self
            .records
            .iter()
            .filter(|r| r.is_hidden() == hidden && self.selection.contains(r.id()))
            .map(InventoryRecord::id)
            .collect();

        let Some(&first) = ids.first() else {
            return Err(self.fail(CoreError::NoSelection));
        };
        if !action.allowed_from(hidden) {
            return Err(self.fail(CoreError::InvalidTransition { action, id: first }));
        }
        self.pending = Some(PendingAction::new(
            action,
            LifecycleTarget::Bulk(ids),
            String::new(),
        ));
        Ok(())
    }

    pub fn pending(&self) -> Option<&PendingAction> {
        self.pending.as_ref()
    }

    /// Localized `請輸入 "HIDE" 以確認隱藏` style prompt of the open dialog.
    pub fn confirm_prompt(&self) -> Option<String> {
        self.pending
            .as_ref()
            .map(|p| self.language.confirm_prompt(p.action()))
    }

    /// Returns whether the confirm action is now enabled.
    pub fn type_confirmation(&mut self, text: &str) -> bool {
        self.pending.as_mut().is_some_and(|p| {
            p.gate.type_text(text);
            p.gate.is_armed()
        })
    }

    pub fn can_confirm(&self) -> bool {
        self.pending.as_ref().is_some_and(|p| p.gate.is_armed())
    }

    pub fn cancel_confirmation(&mut self) {
        self.pending = None;
    }

    /// Run the pending action as one batched call.
    ///
    /// On success: refetch, drop the targets from the selection (a bulk
    /// action clears it) and close the dialog. On failure the dialog and
    /// selection stay as they were so the user can retry or cancel.
    pub async fn confirm(&mut self) -> CoreResult<()> {
        let Some(pending) = self.pending.as_ref() else {
            return Err(CoreError::NoPendingConfirmation);
        };
        if !pending.gate.is_armed() {
            let expected = pending.gate.expected();
            return Err(self.fail(CoreError::ConfirmationMismatch { expected }));
        }
        let action = pending.action();
        let target = pending.target.clone();

        self.notice = None;
        self.loading = true;
        let result = lifecycle::execute(self.backend.as_ref(), action, target.ids()).await;
        self.loading = false;

        match result {
            Ok(()) => {
                info!(
                    "[{}] {action:?} {:?}",
                    R::descriptor().table(),
                    target.ids()
                );
                self.pending = None;
                if target.is_bulk() {
                    self.selection.clear();
                } else {
                    self.selection.remove_all(target.ids());
                }
                self.refetch().await;
                Ok(())
            }
            Err(e) => {
                let failed = if target.is_bulk() {
                    Action::BulkLifecycle(action)
                } else {
                    action.into()
                };
                Err(self.fail_backend(failed, e))
            }
        }
    }

    // ===== Selection =====

    pub fn toggle_select(&mut self, id: RecordId) -> bool {
        self.selection.toggle(id)
    }

    /// Select or clear the whole sorted + filtered list, not just the page.
    pub fn select_all(&mut self, checked: bool) {
        let visible = Self::visible_of(&self.records, &self.view);
        self.selection.select_all(visible, checked);
    }

    pub fn all_selected(&self) -> bool {
        self.selection.all_selected(&self.visible_records())
    }

    pub fn clear_selection(&mut self) {
        self.selection.clear();
    }

    // ===== View =====

    pub fn request_sort(&mut self, key: SortKey<R::Field>) {
        self.view.request_sort(key);
    }

    /// Switch between active and hidden records; the selection is kept.
    pub fn set_hidden_mode(&mut self, hidden: bool) {
        self.view.set_hidden_mode(hidden);
    }

    pub fn set_page_size(&mut self, page_size: usize) {
        self.view.set_page_size(page_size);
    }

    /// No-op returning `false` outside `[1, total_pages]`.
    pub fn go_to_page(&mut self, page: usize) -> bool {
        let total = total_pages(self.visible_count_in_mode(), self.view.page_size());
        self.view.go_to_page(page, total)
    }

    /// Filter by mode, then sort.
    pub fn visible_records(&self) -> Vec<&R> {
        Self::visible_of(&self.records, &self.view)
    }

    pub fn current_page(&self) -> PanelPage<'_, R> {
        let visible = self.visible_records();
        let slice = paginate(&visible, self.view.page(), self.view.page_size());
        let window = page_window(slice.info.page, slice.info.total_pages, PAGE_WINDOW);
        PanelPage {
            items: slice.items.to_vec(),
            info: slice.info,
            window,
        }
    }

    /// What an export receives: sorted + filtered, not paginated.
    pub fn export_records(&self) -> Vec<&R> {
        self.visible_records()
    }

    /// Records in the current mode, the count shown on the panel's tab.
    pub fn visible_count(&self) -> usize {
        self.visible_count_in_mode()
    }

    /// `(active, hidden)`
    pub fn visibility_counts(&self) -> (usize, usize) {
        visibility_counts(&self.records)
    }

    fn visible_count_in_mode(&self) -> usize {
        let hidden = self.view.hidden_mode();
        self.records.iter().filter(|r| r.is_hidden() == hidden).count()
    }

    fn visible_of<'a>(records: &'a [R], view: &ViewState<R::Field>) -> Vec<&'a R> {
        sort(filter_visibility(records, view.hidden_mode()), view.sort_spec())
    }

    fn clamp_page(&mut self) {
        let total = total_pages(self.visible_count_in_mode(), self.view.page_size());
        self.view.clamp_to(total);
    }

    fn find(&self, id: RecordId) -> CoreResult<&R> {
        self.records
            .iter()
            .find(|r| r.id() == id)
            .ok_or(CoreError::RecordNotFound(id))
    }

    // ===== Error surfacing =====

    fn fail(&mut self, err: CoreError) -> CoreError {
        let message = self.language.error(&err);
        if err.is_expected() {
            warn!("[{}] {message}", R::descriptor().table());
        } else {
            error!("[{}] {message}", R::descriptor().table());
        }
        self.notice = Some(message);
        err
    }

    fn fail_backend(&mut self, action: Action, err: BackendError) -> CoreError {
        let message = self
            .language
            .failure(R::descriptor().kind, action, &err.to_string());
        if err.is_expected() {
            warn!("[{}] {message}", R::descriptor().table());
        } else {
            error!("[{}] {message}", R::descriptor().table());
        }
        self.notice = Some(message);
        CoreError::Backend(err)
    }
}

impl<R: ExportRow> InventoryPanel<R> {
    pub fn export_table(&self, format: ExportFormat) -> ExportTable {
        build_export_table(self.export_records(), format)
    }

    /// Export the sorted + filtered list. `filename` defaults to
    /// `{stem}_YYYYMMDD_HHMM`.
    pub fn export(
        &mut self,
        exporter: &dyn Exporter,
        format: ExportFormat,
        filename: Option<&str>,
    ) -> CoreResult<PathBuf> {
        if !exporter.supports(format) {
            return Err(self.fail(CoreError::Export(format!(
                "{format} export is not supported"
            ))));
        }
        let filename =
            filename.map_or_else(|| default_filename::<R, _>(&Local::now()), ToString::to_string);
        let table = self.export_table(format);
        match exporter.export(&table, &filename, format) {
            Ok(path) => {
                info!(
                    "[{}] Exported {} rows to {}",
                    R::descriptor().table(),
                    table.rows.len(),
                    path.display()
                );
                Ok(path)
            }
            Err(e) => Err(self.fail(e)),
        }
    }
}

/// Highlight rule: created or updated on `today` (local time).
pub fn is_modified_today<R: InventoryRecord>(record: &R, today: NaiveDate) -> bool {
    [record.created_at(), record.updated_at()]
        .into_iter()
        .flatten()
        .any(|ts| ts.with_timezone(&Local).date_naive() == today)
}
