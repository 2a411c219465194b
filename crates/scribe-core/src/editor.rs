//! Editor orchestration.
//!
//! ## Learning: The Facade Pattern
//!
//! `Editor` is the one type the host talks to. It owns the session state
//! and the collaborators (bridge client, syntax library, document store,
//! clipboard) and turns their results into [`SessionEvent`]s for the pure
//! reducer.
//!
//! ## Thread Safety
//!
//! `Editor` is owned by the interactive task. Probes and compiles run in
//! spawned Tokio tasks and report back over an unbounded channel, so the
//! interactive path never waits on the network. The host drains that
//! channel with [`Editor::pump`] or [`Editor::process_next`].

use scribe_bridge::BridgeClient;
use scribe_buffer::{Selection, StyledSequence, TextSnapshot};
use scribe_syntax::SyntaxLibrary;
use std::path::{Path, PathBuf};
use tokio::sync::{broadcast, mpsc};
use tokio::task::JoinHandle;

use crate::clipboard::Clipboard;
use crate::config::Config;
use crate::event::{EventBus, SessionNotification};
use crate::language::LanguageMode;
use crate::session::{SessionEvent, SessionState};
use crate::storage::DocumentStore;
use crate::{CoreError, CoreResult};

/// The interactive editing session.
pub struct Editor {
    state: SessionState,
    config: Config,
    client: BridgeClient,
    library: SyntaxLibrary,
    store: Box<dyn DocumentStore>,
    clipboard: Box<dyn Clipboard>,
    event_bus: EventBus,

    /// Results from background tasks
    tx: mpsc::UnboundedSender<SessionEvent>,
    rx: mpsc::UnboundedReceiver<SessionEvent>,

    compile_task: Option<JoinHandle<()>>,
    next_generation: u64,
}

impl Editor {
    /// Creates an editor with an empty `Untitled` document.
    pub fn new(
        config: Config,
        store: Box<dyn DocumentStore>,
        clipboard: Box<dyn Clipboard>,
    ) -> CoreResult<Self> {
        let client = BridgeClient::new(config.bridge.endpoint())?;
        let library = config.syntax.library();
        let (tx, rx) = mpsc::unbounded_channel();

        Ok(Self {
            state: SessionState::new(&config.editor),
            config,
            client,
            library,
            store,
            clipboard,
            event_bus: EventBus::new(),
            tx,
            rx,
            compile_task: None,
            next_generation: 1,
        })
    }

    pub fn state(&self) -> &SessionState {
        &self.state
    }

    pub fn config(&self) -> &Config {
        &self.config
    }

    /// Subscribes to session notifications.
    pub fn subscribe(&self) -> broadcast::Receiver<SessionNotification> {
        self.event_bus.subscribe()
    }

    /// Returns the styled text for the current state.
    pub fn render(&self) -> StyledSequence {
        self.state.render()
    }

    // ==================== State Transitions ====================

    /// Applies an event, autosaves the draft if the text changed and
    /// notifies subscribers.
    pub fn dispatch(&mut self, event: SessionEvent) {
        let notification = self.notification_for(&event);
        let previous_text = self.state.text.clone();

        let state = std::mem::take(&mut self.state);
        self.state = state.apply(event);

        if self.state.text != previous_text {
            self.autosave();
        }
        if let Some(notification) = notification {
            self.event_bus.emit(notification);
        }
        self.event_bus.emit(SessionNotification::StateChanged);
    }

    fn notification_for(&self, event: &SessionEvent) -> Option<SessionNotification> {
        match event {
            SessionEvent::CompileLine { generation, line }
                if self.state.is_current_compile(*generation) =>
            {
                Some(SessionNotification::CompileLine(line.text().to_string()))
            }
            SessionEvent::CompileFinished { generation, result }
                if self.state.is_current_compile(*generation) =>
            {
                Some(SessionNotification::CompileFinished {
                    ok: matches!(result, Ok(true)),
                })
            }
            SessionEvent::ConnectFinished(result) => Some(SessionNotification::ConnectionChecked {
                connected: result.is_ok(),
            }),
            _ => None,
        }
    }

    /// Applies every background result that has already arrived.
    pub fn pump(&mut self) -> usize {
        let mut applied = 0;
        while let Ok(event) = self.rx.try_recv() {
            self.dispatch(event);
            applied += 1;
        }
        applied
    }

    /// Waits for the next background result and applies it.
    pub async fn process_next(&mut self) -> bool {
        match self.rx.recv().await {
            Some(event) => {
                self.dispatch(event);
                true
            }
            None => false,
        }
    }

    // ==================== Text Field ====================

    /// Reports the field's current text and selection.
    pub fn edit(&mut self, text: impl Into<TextSnapshot>, selection: Selection) {
        self.dispatch(SessionEvent::Edited {
            text: text.into(),
            selection,
        });
    }

    pub fn copy(&mut self) {
        if let Some(selected) = self.state.selected_text() {
            self.clipboard.set_text(selected.to_string());
        }
    }

    pub fn cut(&mut self) {
        if let Some(selected) = self.state.selected_text() {
            self.clipboard.set_text(selected.to_string());
            self.dispatch(SessionEvent::Cut);
        }
    }

    pub fn paste(&mut self) {
        let clip = self.clipboard.get_text().unwrap_or_default();
        self.dispatch(SessionEvent::Pasted(clip));
    }

    // ==================== Language ====================

    /// Switches the base styling layer. A configured mode whose resource
    /// cannot be loaded renders plain text.
    pub fn select_language(&mut self, mode: LanguageMode) {
        let syntax = mode.resource().and_then(|name| self.library.load(name));
        tracing::info!(language = %mode.label(), configured = syntax.is_some(), "language selected");
        self.dispatch(SessionEvent::LanguageSelected { mode, syntax });
    }

    // ==================== Documents ====================

    pub fn new_document(&mut self) {
        self.dispatch(SessionEvent::NewDocument);
    }

    pub fn open(&mut self, handle: impl AsRef<Path>) -> CoreResult<()> {
        let handle = handle.as_ref();
        let text = self.store.load(handle)?;
        tracing::info!(path = %handle.display(), bytes = text.len(), "opened document");
        self.dispatch(SessionEvent::DocumentOpened {
            handle: handle.to_path_buf(),
            text,
        });
        Ok(())
    }

    /// Saves to the current handle.
    ///
    /// Fails with [`CoreError::NoSaveTarget`] for a document that was never
    /// opened or saved; the host should ask for a name and call `save_as`.
    pub fn save(&mut self) -> CoreResult<()> {
        let handle = self.state.handle.clone().ok_or_else(|| CoreError::NoSaveTarget {
            suggested: self.state.suggested_save_name(),
        })?;
        self.save_as(handle)
    }

    pub fn save_as(&mut self, handle: impl Into<PathBuf>) -> CoreResult<()> {
        let handle = handle.into();
        self.store.save(&handle, self.state.text.as_str())?;
        tracing::info!(path = %handle.display(), "saved document");
        self.dispatch(SessionEvent::DocumentSaved { handle });
        Ok(())
    }

    /// Loads the autosaved draft, if there is one. Returns whether it was.
    pub fn restore_draft(&mut self) -> bool {
        let name = Path::new(&self.config.editor.draft_file_name);
        match self.store.load(name) {
            Ok(text) => {
                self.dispatch(SessionEvent::DraftRestored(text));
                true
            }
            Err(e) => {
                tracing::debug!(error = %e, "no draft restored");
                false
            }
        }
    }

    fn autosave(&self) {
        let name = Path::new(&self.config.editor.draft_file_name);
        if let Err(e) = self.store.save(name, self.state.text.as_str()) {
            tracing::warn!(error = %e, "draft autosave failed");
        }
    }

    // ==================== Bridge ====================

    /// Probes the bridge in the background.
    ///
    /// Must be called inside a Tokio runtime.
    pub fn connect(&mut self) {
        self.dispatch(SessionEvent::ConnectStarted);

        let client = self.client.clone();
        let tx = self.tx.clone();
        tokio::spawn(async move {
            let result = client.check_liveness().await.map_err(|e| e.reason());
            if let Err(reason) = &result {
                tracing::info!(%reason, "bridge not reachable");
            }
            let _ = tx.send(SessionEvent::ConnectFinished(result));
        });
    }

    /// Compiles the current text in the background, superseding any
    /// compile still running.
    ///
    /// The error set is reset before this returns, so no line of the new
    /// stream can be mixed with a previous one. Must be called inside a
    /// Tokio runtime.
    pub fn compile(&mut self) {
        self.cancel_compile();

        let generation = self.next_generation;
        self.next_generation += 1;
        self.dispatch(SessionEvent::CompileStarted { generation });

        let client = self.client.clone();
        let tx = self.tx.clone();
        let file_name = self.state.file_name.clone();
        let text = self.state.text.clone();
        self.compile_task = Some(tokio::spawn(async move {
            let line_tx = tx.clone();
            let result = client
                .compile(&file_name, text.as_str(), |line| {
                    let _ = line_tx.send(SessionEvent::CompileLine {
                        generation,
                        line: line.clone(),
                    });
                })
                .await
                .map(|outcome| outcome.ok)
                .map_err(|e| e.reason());
            let _ = tx.send(SessionEvent::CompileFinished { generation, result });
        }));
    }

    /// Aborts the running compile, if any. Its connection is released.
    pub fn cancel_compile(&mut self) {
        if let Some(task) = self.compile_task.take() {
            if !task.is_finished() {
                tracing::debug!(generation = self.state.compile_generation, "aborting compile");
                task.abort();
                self.dispatch(SessionEvent::CompileCancelled {
                    generation: self.state.compile_generation,
                });
            }
        }
    }
}

impl Drop for Editor {
    fn drop(&mut self) {
        if let Some(task) = self.compile_task.take() {
            task.abort();
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::clipboard::MemoryClipboard;
    use crate::status::CompileStatus;
    use crate::storage::FsDocumentStore;
    use axum::Router;
    use axum::routing::{get, post};
    use scribe_syntax::palette;
    use tempfile::TempDir;

    fn editor_with(port: u16) -> (Editor, TempDir) {
        let dir = tempfile::tempdir().unwrap();
        let mut config = Config::default();
        config.bridge.port = port;
        config.bridge.probe_timeout_ms = 500;
        let editor = Editor::new(
            config,
            Box::new(FsDocumentStore::new(dir.path())),
            Box::new(MemoryClipboard::new()),
        )
        .unwrap();
        (editor, dir)
    }

    async fn serve(app: Router) -> u16 {
        let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
        let port = listener.local_addr().unwrap().port();
        tokio::spawn(async move {
            axum::serve(listener, app).await.unwrap();
        });
        port
    }

    async fn settle(editor: &mut Editor) {
        while editor.state().status.is_pending() {
            assert!(editor.process_next().await);
        }
    }

    #[test]
    fn test_draft_autosave_and_restore() {
        let (mut editor, dir) = editor_with(1);
        editor.edit("val draft = 1", Selection::cursor(0));
        assert_eq!(
            std::fs::read_to_string(dir.path().join("autosave_draft.txt")).unwrap(),
            "val draft = 1"
        );

        let mut fresh = Editor::new(
            Config::default(),
            Box::new(FsDocumentStore::new(dir.path())),
            Box::new(MemoryClipboard::new()),
        )
        .unwrap();
        assert!(fresh.restore_draft());
        assert_eq!(fresh.state().text.as_str(), "val draft = 1");
        assert_eq!(fresh.state().selection, Selection::cursor(13));
    }

    #[test]
    fn test_restore_without_draft() {
        let (mut editor, _dir) = editor_with(1);
        assert!(!editor.restore_draft());
        assert!(editor.state().text.is_empty());
    }

    #[test]
    fn test_open_save_and_save_as() {
        let (mut editor, dir) = editor_with(1);
        std::fs::write(dir.path().join("Main.kt"), "fun main() {}").unwrap();

        editor.open("Main.kt").unwrap();
        assert_eq!(editor.state().file_name, "Main.kt");

        editor.edit("fun main() { }", Selection::cursor(0));
        editor.save().unwrap();
        assert_eq!(
            std::fs::read_to_string(dir.path().join("Main.kt")).unwrap(),
            "fun main() { }"
        );

        editor.new_document();
        assert!(matches!(
            editor.save(),
            Err(CoreError::NoSaveTarget { suggested }) if suggested == "Untitled.kt"
        ));
        editor.save_as("Other.kt").unwrap();
        assert_eq!(editor.state().file_name, "Other.kt");
        assert!(dir.path().join("Other.kt").exists());

        assert!(editor.open("missing.kt").is_err());
    }

    #[test]
    fn test_clipboard_round() {
        let (mut editor, _dir) = editor_with(1);
        editor.edit("alpha beta", Selection::new(0, 5));

        editor.copy();
        editor.dispatch(SessionEvent::SelectionChanged(Selection::cursor(10)));
        editor.paste();
        assert_eq!(editor.state().text.as_str(), "alpha betaalpha");

        editor.dispatch(SessionEvent::SelectionChanged(Selection::new(5, 10)));
        editor.cut();
        assert_eq!(editor.state().text.as_str(), "alphaalpha");
        editor.paste();
        assert_eq!(editor.state().text.as_str(), "alpha betaalpha");
    }

    #[test]
    fn test_select_bundled_language() {
        let (mut editor, _dir) = editor_with(1);
        editor.edit("def f(): pass # hi", Selection::cursor(0));
        editor.select_language(LanguageMode::python());

        assert!(editor.state().syntax.is_some());
        assert_eq!(editor.render().style_at(0), palette::CONFIG_KEYWORD);
    }

    #[tokio::test]
    async fn test_compile_updates_session() {
        let app = Router::new().route(
            "/compile",
            post(|| async { "error: Untitled.kt:2: unexpected token\n{\"ok\":false}\n" }),
        );
        let port = serve(app).await;
        let (mut editor, _dir) = editor_with(port);
        let mut notifications = editor.subscribe();

        editor.edit("fun main() {\n  val\n}", Selection::cursor(0));
        editor.compile();
        assert_eq!(editor.state().status, CompileStatus::Compiling);
        settle(&mut editor).await;

        let state = editor.state();
        assert_eq!(state.status, CompileStatus::Failed);
        assert_eq!(state.errors.iter().collect::<Vec<_>>(), vec![2]);
        assert!(state.output.starts_with("error: Untitled.kt:2:"));

        let mut lines = Vec::new();
        let mut finished = None;
        while let Ok(n) = notifications.try_recv() {
            match n {
                SessionNotification::CompileLine(line) => lines.push(line),
                SessionNotification::CompileFinished { ok } => finished = Some(ok),
                _ => {}
            }
        }
        assert_eq!(lines.len(), 2);
        assert_eq!(finished, Some(false));
    }

    #[tokio::test]
    async fn test_connect_success_and_failure() {
        let port = serve(Router::new().route("/health", get(|| async { "ok" }))).await;
        let (mut editor, _dir) = editor_with(port);
        editor.connect();
        assert_eq!(editor.state().status.label(), "Connecting…");
        settle(&mut editor).await;
        assert_eq!(editor.state().status.label(), "Connected");

        let closed = std::net::TcpListener::bind("127.0.0.1:0")
            .unwrap()
            .local_addr()
            .unwrap()
            .port();
        let (mut offline, _dir) = editor_with(closed);
        offline.connect();
        settle(&mut offline).await;
        assert_eq!(offline.state().status.label(), "Not connected");
        assert!(offline.state().status_detail.is_some());
    }

    #[tokio::test]
    async fn test_new_compile_supersedes_running_one() {
        let app = Router::new().route(
            "/compile",
            post(|body: String| async move {
                if body.contains("slow") {
                    tokio::time::sleep(std::time::Duration::from_secs(30)).await;
                }
                "x.kt:5: fresh\n{\"ok\":true}\n"
            }),
        );
        let port = serve(app).await;
        let (mut editor, _dir) = editor_with(port);

        editor.edit("slow", Selection::cursor(0));
        editor.compile();
        editor.edit("fast", Selection::cursor(0));
        editor.compile();
        settle(&mut editor).await;

        let state = editor.state();
        assert_eq!(state.compile_generation, 2);
        assert_eq!(state.status, CompileStatus::Success);
        assert_eq!(state.errors.iter().collect::<Vec<_>>(), vec![5]);
        assert_eq!(state.output, "x.kt:5: fresh\n{\"ok\":true}\n");
    }

    #[tokio::test]
    async fn test_cancel_compile() {
        let app = Router::new().route(
            "/compile",
            post(|| async {
                tokio::time::sleep(std::time::Duration::from_secs(30)).await;
                "late\n"
            }),
        );
        let port = serve(app).await;
        let (mut editor, _dir) = editor_with(port);

        editor.compile();
        editor.cancel_compile();
        assert_eq!(editor.state().status, CompileStatus::Idle);
        assert_eq!(editor.pump(), 0);
    }
}
