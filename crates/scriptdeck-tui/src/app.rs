//! TUI application state and key handling

use crate::clipboard::{Clipboard, SystemClipboard};
use crate::components::{DetailPane, SearchBar, Spinner, Toast, ToastManager, ViewerBody};
use crossterm::event::{KeyCode, KeyModifiers};
use ratatui::widgets::ListState;
use scriptdeck_core::export::save_script;
use scriptdeck_core::{Catalog, CategoryFilter, DataEvent, Entry, LoadReport};
use std::path::PathBuf;
use std::sync::Arc;
use tokio::sync::{broadcast, mpsc, oneshot};
use tracing::{debug, info, warn};

/// What to do with a script once its text is available
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Action {
    View,
    Copy,
    Download,
}

/// A content fetch finished in the background
#[derive(Debug)]
pub struct ContentReady {
    pub action: Action,
    pub entry: Entry,
    pub result: Result<Arc<str>, String>,
}

/// TUI Application state
pub struct App {
    /// Catalog shared with background tasks
    pub catalog: Arc<Catalog>,

    /// Catalog events (reload results)
    pub event_rx: broadcast::Receiver<DataEvent>,

    pub search: SearchBar,
    pub category: CategoryFilter,

    /// Entries matching the current query and category
    pub filtered: Vec<Entry>,
    pub list_state: ListState,

    /// Open script viewer, if any
    pub viewer: Option<DetailPane>,

    pub toast_manager: ToastManager,
    pub spinner: Spinner,

    /// A metadata reload is running
    pub is_loading: bool,

    pub should_quit: bool,

    /// Where the download action writes scripts
    pub download_dir: PathBuf,

    clipboard: Box<dyn Clipboard>,
    content_tx: mpsc::UnboundedSender<ContentReady>,
    content_rx: mpsc::UnboundedReceiver<ContentReady>,
    reload_rx: Option<oneshot::Receiver<LoadReport>>,
    in_flight: usize,
}

impl App {
    pub fn new(catalog: Arc<Catalog>, download_dir: PathBuf) -> Self {
        let event_rx = catalog.event_bus().subscribe();
        let (content_tx, content_rx) = mpsc::unbounded_channel();

        let mut app = Self {
            catalog,
            event_rx,
            search: SearchBar::new(),
            category: CategoryFilter::All,
            filtered: Vec::new(),
            list_state: ListState::default(),
            viewer: None,
            toast_manager: ToastManager::new(),
            spinner: Spinner::new(),
            is_loading: false,
            should_quit: false,
            download_dir,
            clipboard: Box::new(SystemClipboard::new()),
            content_tx,
            content_rx,
            reload_rx: None,
            in_flight: 0,
        };
        app.update_filter();
        app
    }

    /// Swap the clipboard backend
    pub fn with_clipboard(mut self, clipboard: Box<dyn Clipboard>) -> Self {
        self.clipboard = clipboard;
        self
    }

    /// Number of content fetches still running
    pub fn in_flight(&self) -> usize {
        self.in_flight
    }

    /// Nothing is loading and no fetch is pending
    pub fn is_idle(&self) -> bool {
        !self.is_loading && self.in_flight == 0
    }

    pub fn selected_entry(&self) -> Option<&Entry> {
        self.list_state.selected().and_then(|i| self.filtered.get(i))
    }

    /// Label for the active category filter
    pub fn category_label(&self) -> String {
        match &self.category {
            CategoryFilter::All => "All".to_string(),
            CategoryFilter::Only(name) => name.clone(),
        }
    }

    /// Start a metadata reload in the background
    ///
    /// Ignored while a reload is already running.
    pub fn reload(&mut self) {
        if self.reload_rx.is_some() {
            return;
        }

        let (tx, rx) = oneshot::channel();
        let catalog = Arc::clone(&self.catalog);
        tokio::spawn(async move {
            let report = catalog.reload().await;
            let _ = tx.send(report);
        });

        self.reload_rx = Some(rx);
        self.is_loading = true;
    }

    /// Drain background results (non-blocking)
    pub fn poll(&mut self) {
        self.poll_events();
        self.poll_reload();

        while let Ok(ready) = self.content_rx.try_recv() {
            self.in_flight = self.in_flight.saturating_sub(1);
            self.complete(ready);
        }
    }

    fn poll_events(&mut self) {
        loop {
            match self.event_rx.try_recv() {
                Ok(DataEvent::MetadataLoaded { entries }) => {
                    debug!(entries, "Metadata loaded");
                    self.update_filter();
                }
                Ok(DataEvent::MetadataFailed(message)) => {
                    let text = if self.catalog.entries().is_empty() {
                        message
                    } else {
                        self.catalog.status_message()
                    };
                    self.toast_manager.push(Toast::warning(text));
                }
                Ok(DataEvent::ContentFailed { path, reason }) => {
                    debug!(path = %path, reason = %reason, "Content fetch failed");
                }
                Ok(DataEvent::MetadataLoading) | Ok(DataEvent::ContentCached(_)) => {}
                Err(broadcast::error::TryRecvError::Lagged(skipped)) => {
                    warn!(skipped, "Event receiver lagged");
                    self.update_filter();
                }
                Err(_) => break,
            }
        }
    }

    fn poll_reload(&mut self) {
        let Some(rx) = self.reload_rx.as_mut() else {
            return;
        };

        match rx.try_recv() {
            Ok(report) => {
                info!(
                    entries = report.entries,
                    categories = report.categories,
                    elapsed_ms = report.elapsed.as_millis() as u64,
                    success = report.is_success(),
                    "Reload finished"
                );
                self.finish_reload();
            }
            Err(oneshot::error::TryRecvError::Empty) => {}
            Err(oneshot::error::TryRecvError::Closed) => {
                warn!("Reload task ended without a report");
                self.finish_reload();
            }
        }
    }

    fn finish_reload(&mut self) {
        self.reload_rx = None;
        self.is_loading = false;
        if let CategoryFilter::Only(name) = &self.category {
            if !self.catalog.categories().iter().any(|c| &c.name == name) {
                self.category = CategoryFilter::All;
            }
        }
        self.update_filter();
    }

    /// Re-run the filter, keeping the selected entry when it survives
    pub fn update_filter(&mut self) {
        let previous = self.selected_entry().map(Entry::id);
        self.filtered = self.catalog.search(&self.search.query, &self.category);

        let selected = previous
            .and_then(|id| self.filtered.iter().position(|e| e.is(&id)))
            .or(if self.filtered.is_empty() { None } else { Some(0) });
        self.list_state.select(selected);
    }

    fn cycle_category(&mut self, forward: bool) {
        let mut options = vec![CategoryFilter::All];
        options.extend(
            self.catalog
                .categories()
                .into_iter()
                .map(|c| CategoryFilter::Only(c.name)),
        );

        let current = options.iter().position(|c| c == &self.category).unwrap_or(0);
        let len = options.len();
        let next = if forward {
            (current + 1) % len
        } else {
            (current + len - 1) % len
        };
        self.category = options.swap_remove(next);
        self.update_filter();
    }

    fn move_selection(&mut self, delta: isize) {
        if self.filtered.is_empty() {
            self.list_state.select(None);
            return;
        }
        let last = self.filtered.len() - 1;
        let current = self.list_state.selected().unwrap_or(0);
        let next = current.saturating_add_signed(delta).min(last);
        self.list_state.select(Some(next));
    }

    /// Handle keyboard input
    /// Returns true if the key did something
    pub fn handle_key(&mut self, key: KeyCode, modifiers: KeyModifiers) -> bool {
        if modifiers.contains(KeyModifiers::CONTROL) && key == KeyCode::Char('c') {
            self.should_quit = true;
            return true;
        }

        if self.viewer.is_some() {
            return self.handle_viewer_key(key);
        }

        if self.search.active {
            return self.handle_search_key(key);
        }

        match key {
            KeyCode::Char('q') => self.should_quit = true,
            KeyCode::Char('/') => self.search.active = true,
            KeyCode::Esc if !self.search.query.is_empty() => {
                self.search.clear();
                self.update_filter();
            }
            KeyCode::Char('j') | KeyCode::Down => self.move_selection(1),
            KeyCode::Char('k') | KeyCode::Up => self.move_selection(-1),
            KeyCode::PageDown => self.move_selection(10),
            KeyCode::PageUp => self.move_selection(-10),
            KeyCode::Char('g') | KeyCode::Home => self.move_selection(isize::MIN),
            KeyCode::Char('G') | KeyCode::End => self.move_selection(isize::MAX),
            KeyCode::Enter => self.request(Action::View),
            KeyCode::Char('c') => self.request(Action::Copy),
            KeyCode::Char('d') => self.request(Action::Download),
            KeyCode::Tab => self.cycle_category(true),
            KeyCode::BackTab => self.cycle_category(false),
            KeyCode::F(5) => self.reload(),
            _ => return false,
        }
        true
    }

    fn handle_search_key(&mut self, key: KeyCode) -> bool {
        match key {
            KeyCode::Char(c) => {
                self.search.push(c);
                self.update_filter();
            }
            KeyCode::Backspace => {
                self.search.pop();
                self.update_filter();
            }
            KeyCode::Esc => {
                self.search.clear();
                self.search.active = false;
                self.update_filter();
            }
            KeyCode::Enter => self.search.active = false,
            KeyCode::Down => self.move_selection(1),
            KeyCode::Up => self.move_selection(-1),
            KeyCode::Tab => self.cycle_category(true),
            KeyCode::BackTab => self.cycle_category(false),
            _ => return false,
        }
        true
    }

    fn handle_viewer_key(&mut self, key: KeyCode) -> bool {
        let Some(viewer) = self.viewer.as_mut() else {
            return false;
        };

        match key {
            KeyCode::Esc | KeyCode::Char('q') => self.viewer = None,
            KeyCode::Char('j') | KeyCode::Down => viewer.scroll_down(1),
            KeyCode::Char('k') | KeyCode::Up => viewer.scroll_up(1),
            KeyCode::PageDown | KeyCode::Char(' ') => viewer.scroll_down(20),
            KeyCode::PageUp => viewer.scroll_up(20),
            KeyCode::Char('g') | KeyCode::Home => viewer.scroll = 0,
            KeyCode::Char('c') => self.request(Action::Copy),
            KeyCode::Char('d') => self.request(Action::Download),
            _ => return false,
        }
        true
    }

    /// Run an action against the viewed entry, or the selected one
    pub fn request(&mut self, action: Action) {
        let entry = match (&self.viewer, self.selected_entry()) {
            (Some(viewer), _) => viewer.entry.clone(),
            (None, Some(entry)) => entry.clone(),
            (None, None) => return,
        };

        if action == Action::View {
            self.viewer = Some(DetailPane::new(entry.clone()));
        }

        if let Some(text) = self.catalog.content_cache().peek(&entry) {
            self.complete(ContentReady {
                action,
                entry,
                result: Ok(text),
            });
            return;
        }

        debug!(id = %entry.id(), ?action, "Fetching script");
        self.in_flight += 1;

        let catalog = Arc::clone(&self.catalog);
        let tx = self.content_tx.clone();
        tokio::spawn(async move {
            let result = catalog.content_for(&entry).await.map_err(|e| {
                warn!(id = %entry.id(), error = %e, "Script fetch failed");
                e.user_message()
            });
            let _ = tx.send(ContentReady {
                action,
                entry,
                result,
            });
        });
    }

    fn complete(&mut self, ready: ContentReady) {
        let ContentReady {
            action,
            entry,
            result,
        } = ready;

        match action {
            Action::View => {
                if let Some(viewer) = self.viewer.as_mut().filter(|v| v.entry.is(&entry.id())) {
                    viewer.body = match result {
                        Ok(text) => ViewerBody::Loaded(text),
                        Err(message) => ViewerBody::Failed(message),
                    };
                }
            }
            Action::Copy => match result {
                Ok(text) => match self.clipboard.set_text(&text) {
                    Ok(()) => self
                        .toast_manager
                        .push(Toast::success(format!("Copied {} to clipboard", entry.filename))),
                    Err(e) => {
                        warn!(error = %e, "Clipboard write failed");
                        self.toast_manager.push(Toast::error(format!("Copy failed: {}", e)));
                    }
                },
                Err(message) => self.toast_manager.push(Toast::error(message)),
            },
            Action::Download => match result {
                Ok(text) => match save_script(&self.download_dir, &entry, &text) {
                    Ok(path) => self
                        .toast_manager
                        .push(Toast::success(format!("Saved {}", path.display()))),
                    Err(e) => {
                        warn!(error = %e, "Download failed");
                        self.toast_manager.push(Toast::error(e.user_message()));
                    }
                },
                Err(message) => self.toast_manager.push(Toast::error(message)),
            },
        }
    }
}
