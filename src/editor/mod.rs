pub mod drag;
pub mod search_client;

use std::sync::Arc;
use std::time::{Duration, Instant};

use tracing::{debug, info, warn};

use crate::io::config_io::ResolvedConfig;
use crate::io::persist::Persistence;
use crate::io::search_backend::{
    CorpusBackend, HttpBackend, SearchBackend, SearchError, SearchWorker,
};
use crate::io::store::{JsonFileStore, KvStore, MemoryStore};
use crate::model::collection::{TagCollection, TagRef};
use crate::model::search::SearchResponse;
use crate::model::tag::TagLabel;

use drag::{ChipLayout, DragController, DragOutcome, PointerEvent};
use search_client::SearchClient;

/// Reason shown when no search endpoint is configured
pub const NO_BACKEND: &str = "no search backend configured";

/// The tag editor: owns the picked collection and its export string, and
/// routes search and drag interactions into it.
///
/// Every successful mutation saves the snapshot, re-derives the export
/// string and raises the redraw flag. Persistence failures are logged and
/// remembered for the status row; they never undo the in-memory change.
pub struct TagEditor {
    collection: TagCollection,
    exported: String,
    separator: String,
    persistence: Persistence,
    search: SearchClient,
    worker: Option<SearchWorker>,
    drag: DragController,
    redraw: bool,
    save_error: Option<String>,
}

impl TagEditor {
    /// Build an editor, seeding the collection from the stored snapshot.
    pub fn new(
        persistence: Persistence,
        search: SearchClient,
        worker: Option<SearchWorker>,
        separator: &str,
    ) -> Self {
        let collection = TagCollection::from_labels(persistence.load());
        debug!(count = collection.len(), "restored collection");
        let exported = collection.to_delimited_string(separator);
        TagEditor {
            collection,
            exported,
            separator: separator.to_string(),
            persistence,
            search,
            worker,
            drag: DragController::new(),
            redraw: true,
            save_error: None,
        }
    }

    /// Build an editor from configuration: the JSON file store (or a
    /// throwaway memory store when `ephemeral`), and the configured search
    /// endpoint, if any.
    pub fn open(resolved: &ResolvedConfig, ephemeral: bool) -> Result<Self, SearchError> {
        let worker = open_backend(resolved)?.map(SearchWorker::spawn);
        let search = &resolved.config.search;
        Ok(TagEditor::new(
            Persistence::new(open_store(resolved, ephemeral)),
            SearchClient::new(Duration::from_millis(search.debounce_ms)),
            worker,
            &resolved.config.export.separator,
        ))
    }

    pub fn collection(&self) -> &TagCollection {
        &self.collection
    }

    /// The export string for the current order
    pub fn exported(&self) -> &str {
        &self.exported
    }

    pub fn separator(&self) -> &str {
        &self.separator
    }

    pub fn search(&self) -> &SearchClient {
        &self.search
    }

    pub fn search_mut(&mut self) -> &mut SearchClient {
        &mut self.search
    }

    pub fn drag(&self) -> &DragController {
        &self.drag
    }

    /// Last persistence failure, if the most recent write did not stick
    pub fn save_error(&self) -> Option<&str> {
        self.save_error.as_deref()
    }

    /// Returns and resets the re-render signal.
    pub fn take_redraw(&mut self) -> bool {
        std::mem::take(&mut self.redraw)
    }

    /// Order to display: the drag preview while dragging, else the collection.
    pub fn display_order(&self) -> Vec<TagLabel> {
        match self.drag.session() {
            Some(session) => session.preview.clone(),
            None => self.collection.labels(),
        }
    }

    // -----------------------------------------------------------------------
    // Collection mutations

    pub fn add(&mut self, text: &str) -> bool {
        self.abandon_drag();
        let changed = self.collection.add(text);
        if changed {
            self.commit();
        }
        changed
    }

    pub fn remove(&mut self, label: &str) -> bool {
        self.abandon_drag();
        let changed = self.collection.remove(label);
        if changed {
            self.commit();
        }
        changed
    }

    pub fn move_tag(&mut self, which: TagRef<'_>, target: usize) -> bool {
        self.abandon_drag();
        self.apply_move(which, target)
    }

    fn apply_move(&mut self, which: TagRef<'_>, target: usize) -> bool {
        let changed = self.collection.move_tag(which, target);
        if changed {
            self.commit();
        }
        changed
    }

    /// Empty the collection and delete the snapshot. Callers gate this on an
    /// explicit confirmation from the user.
    pub fn clear_confirmed(&mut self) -> bool {
        self.abandon_drag();
        let changed = self.collection.clear();
        self.exported.clear();
        match self.persistence.clear_persisted() {
            Ok(()) => self.save_error = None,
            Err(e) => {
                warn!(error = %e, "could not remove snapshot");
                self.save_error = Some(e.to_string());
            }
        }
        self.redraw = true;
        changed
    }

    /// A preview built from the old order cannot be dropped onto a new one.
    fn abandon_drag(&mut self) {
        if self.drag.is_dragging() {
            self.drag.cancel();
            self.redraw = true;
        }
    }

    fn commit(&mut self) {
        self.exported = self.collection.to_delimited_string(&self.separator);
        match self.persistence.save(&self.collection.labels()) {
            Ok(()) => self.save_error = None,
            Err(e) => {
                warn!(error = %e, "could not save snapshot");
                self.save_error = Some(e.to_string());
            }
        }
        self.redraw = true;
    }

    // -----------------------------------------------------------------------
    // Search

    pub fn set_query(&mut self, text: &str, now: Instant) {
        self.search.set_query(text, now);
        self.redraw = true;
    }

    /// When the event loop must wake up next for a pending search
    pub fn next_deadline(&self) -> Option<Instant> {
        self.search.next_deadline()
    }

    /// Fire a due search request and apply any answers that arrived.
    pub fn tick(&mut self, now: Instant) {
        if let Some(request) = self.search.poll(now) {
            self.redraw = true;
            match &self.worker {
                Some(worker) => worker.submit(request),
                None => {
                    self.search.apply(SearchResponse {
                        token: request.token,
                        outcome: Err(NO_BACKEND.to_string()),
                    });
                }
            }
        }
        if let Some(worker) = &self.worker {
            for response in worker.poll() {
                if self.search.apply(response) {
                    self.redraw = true;
                }
            }
        }
    }

    /// Apply one endpoint answer directly (used by synchronous callers).
    pub fn apply_response(&mut self, response: SearchResponse) -> bool {
        let applied = self.search.apply(response);
        if applied {
            self.redraw = true;
        }
        applied
    }

    /// Add the highlighted candidate. The query is left as typed.
    pub fn pick_selected(&mut self) -> bool {
        let label = match self.search.selected_tag() {
            Some(tag) => tag.label.clone(),
            None => return false,
        };
        self.add(label.as_str())
    }

    /// Add the candidate at `index` and highlight it.
    pub fn pick(&mut self, index: usize) -> bool {
        if index >= self.search.results().len() {
            return false;
        }
        self.search.select(index);
        self.pick_selected()
    }

    // -----------------------------------------------------------------------
    // Drag

    /// Route a pointer event over the tag strip. `layout` must describe the
    /// strip as last drawn (i.e. built from [`display_order`]).
    ///
    /// [`display_order`]: TagEditor::display_order
    pub fn pointer(&mut self, event: PointerEvent, layout: &ChipLayout) -> DragOutcome {
        let order = self.collection.labels();
        let outcome = self.drag.handle(event, layout, &order);
        match &outcome {
            DragOutcome::Dropped(cmd) => {
                self.apply_move(TagRef::Label(cmd.label.as_str()), cmd.to);
                self.redraw = true;
            }
            DragOutcome::Started | DragOutcome::Previewed | DragOutcome::Cancelled => {
                self.redraw = true;
            }
            DragOutcome::Ignored => {}
        }
        outcome
    }

    pub fn cancel_drag(&mut self) -> bool {
        let cancelled = self.drag.cancel() == DragOutcome::Cancelled;
        if cancelled {
            self.redraw = true;
        }
        cancelled
    }
}

/// The snapshot store: the JSON state file, or a throwaway memory store
/// when `ephemeral`.
pub fn open_store(resolved: &ResolvedConfig, ephemeral: bool) -> Box<dyn KvStore> {
    if ephemeral {
        Box::new(MemoryStore::new())
    } else {
        Box::new(JsonFileStore::new(&resolved.store_path))
    }
}

/// The configured search endpoint. A remote endpoint wins over a corpus file.
pub fn open_backend(
    resolved: &ResolvedConfig,
) -> Result<Option<Arc<dyn SearchBackend>>, SearchError> {
    let search = &resolved.config.search;
    if let Some(endpoint) = &search.endpoint {
        info!(endpoint = %endpoint, "using remote search endpoint");
        let timeout = Duration::from_millis(search.timeout_ms);
        let backend = HttpBackend::new(endpoint, timeout, search.limit)?;
        return Ok(Some(Arc::new(backend)));
    }
    if let Some(path) = &resolved.corpus_path {
        info!(corpus = %path.display(), "using corpus file");
        return Ok(Some(Arc::new(CorpusBackend::open(path, search.limit)?)));
    }
    warn!("no search endpoint configured");
    Ok(None)
}
