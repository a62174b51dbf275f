//! Restore/Save Controller
//!
//! Owns the lifecycle of one embedded drawing:
//!
//! 1. `Uninitialized -> Restoring`: fetch the block's saved asset path, read
//!    and parse the stored document, and resolve the initial-scene channel
//!    exactly once.
//! 2. `Restoring -> Ready`: the channel is resolved; the engine consumes it
//!    exactly once.
//! 3. While `Ready`: every change notification reschedules a debounced save
//!    (2000 ms); only the most recent snapshot within the window is
//!    persisted.
//!
//! All persistence failures are logged and recovered locally: a failed
//! restore falls back to a fresh document, a failed save is dropped and
//! superseded by the next debounced save. Saves are last-write-wins; two
//! in-flight saves may race and the last attribute write wins.

use std::sync::Arc;
use std::time::Duration;
use tokio::sync::oneshot;
use tracing::{debug, error, info, warn};

use blockdraw_host::{AssetPayload, BlockRef, HostBinding};
use blockdraw_scene::{parse_document, serialize_document, SceneDocument};

use crate::debounce::Debouncer;
use crate::error::Result;

/// Fixed autosave debounce window
pub const SAVE_DEBOUNCE: Duration = Duration::from_millis(2000);

/// Controller lifecycle state
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SyncState {
    /// Created, restore not yet started
    Uninitialized,
    /// Restore in flight
    Restoring,
    /// Initial scene delivered; autosave active
    Ready,
}

/// The engine's initial state, delivered exactly once per embedding
#[derive(Debug, Clone, PartialEq)]
pub struct InitialScene {
    /// Document to load into the engine
    pub document: SceneDocument,
    /// Whether the canvas starts read-only
    pub view_mode: bool,
    /// Whether the grid starts enabled
    pub grid_mode: bool,
    /// Whether the engine should scroll to the restored content
    pub scroll_to_content: bool,
}

impl InitialScene {
    /// A fresh editable canvas: defaults, grid on, view-mode off
    #[must_use]
    pub fn fresh() -> Self {
        Self {
            document: SceneDocument::new(),
            view_mode: false,
            grid_mode: true,
            scroll_to_content: false,
        }
    }

    /// A restored prior drawing: read-only, grid off
    #[must_use]
    pub fn restored(document: SceneDocument) -> Self {
        Self {
            document,
            view_mode: true,
            grid_mode: false,
            scroll_to_content: true,
        }
    }
}

/// Load the block's previously saved drawing, falling back to a fresh scene
///
/// Absence (no asset path, empty content) is logged at `debug`; corruption
/// (unparseable content) and network failures at `warn`. Never fails: the
/// fallback is always a usable fresh scene.
pub async fn load_prior_scene<H: HostBinding + ?Sized>(host: &H, block: &BlockRef) -> InitialScene {
    let path = match host.fetch_asset_path(block).await {
        Ok(Some(path)) => path,
        Ok(None) => {
            debug!(block = %block, "no prior drawing for block");
            return InitialScene::fresh();
        }
        Err(e) => {
            warn!(block = %block, error = %e, "failed to fetch block attributes");
            return InitialScene::fresh();
        }
    };

    let content = match host.read_file(&path).await {
        Ok(content) => content,
        Err(e) => {
            warn!(block = %block, path, error = %e, "failed to read stored drawing");
            return InitialScene::fresh();
        }
    };

    if content.trim().is_empty() {
        debug!(block = %block, path, "stored drawing is empty");
        return InitialScene::fresh();
    }

    match parse_document(&content) {
        Ok(document) => {
            debug!(block = %block, path, elements = document.elements.len(), "restored prior drawing");
            InitialScene::restored(document)
        }
        Err(e) => {
            warn!(block = %block, path, error = %e, "stored drawing is corrupt, starting fresh");
            InitialScene::fresh()
        }
    }
}

/// Serialize and persist one snapshot: upload, then record the stored path
///
/// Returns the host-assigned asset path.
pub async fn save_snapshot<H: HostBinding + ?Sized>(
    host: &H,
    block: &BlockRef,
    document: &SceneDocument,
) -> Result<String> {
    let json = serialize_document(document)?;
    let filename = block.asset_filename();
    let path = host.upload_asset(&filename, AssetPayload::Text(json)).await?;
    host.write_asset_path(block, &path).await?;
    info!(block = %block, path, "drawing saved");
    Ok(path)
}

/// Restore/save controller for one embedded drawing
pub struct SyncController<H: HostBinding + 'static> {
    host: Arc<H>,
    block: Option<BlockRef>,
    state: SyncState,
    initial_tx: Option<oneshot::Sender<InitialScene>>,
    debouncer: Debouncer,
}

impl<H: HostBinding + 'static> SyncController<H> {
    /// Create a controller and the one-shot initial-scene channel
    ///
    /// The receiver is handed to the engine and resolves exactly once, when
    /// [`restore`](Self::restore) completes.
    #[must_use]
    pub fn new(host: Arc<H>, block: Option<BlockRef>) -> (Self, oneshot::Receiver<InitialScene>) {
        let (tx, rx) = oneshot::channel();
        let controller = Self {
            host,
            block,
            state: SyncState::Uninitialized,
            initial_tx: Some(tx),
            debouncer: Debouncer::new(SAVE_DEBOUNCE),
        };
        (controller, rx)
    }

    /// Current lifecycle state
    #[must_use]
    pub fn state(&self) -> SyncState {
        self.state
    }

    /// The block reference this controller persists to, if one resolved
    #[must_use]
    pub fn block(&self) -> Option<&BlockRef> {
        self.block.as_ref()
    }

    /// Run the restore flow and resolve the initial-scene channel
    ///
    /// Idempotent: only the first call does anything. Without a block
    /// reference no host call is made; the canvas gets a fresh scene and
    /// stays ephemeral.
    pub async fn restore(&mut self) {
        if self.state != SyncState::Uninitialized {
            return;
        }
        let Some(tx) = self.initial_tx.take() else {
            return;
        };
        self.state = SyncState::Restoring;

        let scene = match &self.block {
            Some(block) => load_prior_scene(self.host.as_ref(), block).await,
            None => {
                error!("no block reference resolved; drawing will not be persisted");
                InitialScene::fresh()
            }
        };

        // The receiver may already be gone if the engine was torn down
        // mid-restore; nothing to do about it.
        let _ = tx.send(scene);
        self.state = SyncState::Ready;
    }

    /// Handle a change notification from the engine
    ///
    /// Reschedules the debounced save with this snapshot. Notifications
    /// before `Ready` are engine initialization noise and are ignored, as is
    /// everything when no block reference resolved.
    pub fn on_change(&mut self, snapshot: SceneDocument) {
        if self.state != SyncState::Ready {
            return;
        }
        let Some(block) = self.block.clone() else {
            return;
        };

        let host = Arc::clone(&self.host);
        self.debouncer.schedule(async move {
            if let Err(e) = save_snapshot(host.as_ref(), &block, &snapshot).await {
                warn!(block = %block, error = %e, "autosave failed, awaiting next change");
            }
        });
    }

    /// True when a save is scheduled but has not run yet
    #[must_use]
    pub fn save_pending(&self) -> bool {
        self.debouncer.is_pending()
    }

    /// Cancel any pending save (teardown)
    ///
    /// In-flight uploads are not aborted; only the not-yet-started save is.
    pub fn shutdown(&mut self) {
        self.debouncer.cancel();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use async_trait::async_trait;
    use blockdraw_host::{HostError, Result as HostResult};
    use blockdraw_scene::Element;
    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::sync::Mutex;

    /// In-memory host: records uploads and attribute writes, serves one
    /// stored file.
    #[derive(Default)]
    struct FakeHost {
        stored_path: Mutex<Option<String>>,
        stored_content: Mutex<Option<String>>,
        uploads: Mutex<Vec<(String, String)>>,
        attr_writes: Mutex<Vec<String>>,
        calls: AtomicUsize,
        fail_uploads: bool,
        upload_delay: Option<Duration>,
    }

    impl FakeHost {
        fn with_stored(path: &str, content: &str) -> Self {
            Self {
                stored_path: Mutex::new(Some(path.to_string())),
                stored_content: Mutex::new(Some(content.to_string())),
                ..Self::default()
            }
        }

        fn upload_count(&self) -> usize {
            self.uploads.lock().unwrap().len()
        }

        fn last_upload(&self) -> Option<(String, String)> {
            self.uploads.lock().unwrap().last().cloned()
        }

        fn call_count(&self) -> usize {
            self.calls.load(Ordering::SeqCst)
        }
    }

    #[async_trait]
    impl HostBinding for FakeHost {
        async fn fetch_asset_path(&self, _block: &BlockRef) -> HostResult<Option<String>> {
            self.calls.fetch_add(1, Ordering::SeqCst);
            Ok(self.stored_path.lock().unwrap().clone())
        }

        async fn write_asset_path(&self, _block: &BlockRef, asset_path: &str) -> HostResult<()> {
            self.calls.fetch_add(1, Ordering::SeqCst);
            self.attr_writes.lock().unwrap().push(asset_path.to_string());
            Ok(())
        }

        async fn read_file(&self, _path: &str) -> HostResult<String> {
            self.calls.fetch_add(1, Ordering::SeqCst);
            Ok(self.stored_content.lock().unwrap().clone().unwrap_or_default())
        }

        async fn upload_asset(&self, filename: &str, payload: AssetPayload) -> HostResult<String> {
            self.calls.fetch_add(1, Ordering::SeqCst);
            if let Some(delay) = self.upload_delay {
                tokio::time::sleep(delay).await;
            }
            if self.fail_uploads {
                return Err(HostError::UploadIncomplete {
                    filename: filename.to_string(),
                });
            }
            let content = String::from_utf8(payload.into_bytes()?).unwrap();
            self.uploads
                .lock()
                .unwrap()
                .push((filename.to_string(), content));
            Ok(format!("assets/{filename}"))
        }

        async fn is_auth_required(&self) -> HostResult<bool> {
            self.calls.fetch_add(1, Ordering::SeqCst);
            Ok(false)
        }
    }

    fn snapshot_with(id: &str) -> SceneDocument {
        let mut doc = SceneDocument::new();
        doc.add_element(Element::new(id, "rectangle"));
        doc
    }

    fn stored_scene_json() -> String {
        serialize_document(&snapshot_with("prior")).unwrap()
    }

    #[tokio::test]
    async fn test_restore_without_prior_save_is_fresh_and_editable() {
        let host = Arc::new(FakeHost::default());
        let (mut controller, rx) = SyncController::new(Arc::clone(&host), Some(BlockRef::new("b1")));

        controller.restore().await;
        let scene = rx.await.unwrap();

        assert_eq!(controller.state(), SyncState::Ready);
        assert!(!scene.view_mode);
        assert!(scene.grid_mode);
        assert_eq!(scene.document.app_state.view_background_color, "#ffffff");
    }

    #[tokio::test]
    async fn test_restore_with_prior_save_is_read_only() {
        let host = Arc::new(FakeHost::with_stored("assets/b1.excalidraw", &stored_scene_json()));
        let (mut controller, rx) = SyncController::new(Arc::clone(&host), Some(BlockRef::new("b1")));

        controller.restore().await;
        let scene = rx.await.unwrap();

        assert!(scene.view_mode);
        assert!(!scene.grid_mode);
        assert!(scene.scroll_to_content);
        assert_eq!(scene.document.elements[0].id, "prior");
    }

    #[tokio::test]
    async fn test_restore_with_corrupt_save_falls_back_fresh() {
        let host = Arc::new(FakeHost::with_stored("assets/b1.excalidraw", "{broken"));
        let (mut controller, rx) = SyncController::new(Arc::clone(&host), Some(BlockRef::new("b1")));

        controller.restore().await;
        let scene = rx.await.unwrap();

        assert!(!scene.view_mode);
        assert!(scene.document.is_empty());
    }

    #[tokio::test]
    async fn test_restore_is_one_shot() {
        let host = Arc::new(FakeHost::default());
        let (mut controller, _rx) = SyncController::new(Arc::clone(&host), Some(BlockRef::new("b1")));

        controller.restore().await;
        let calls = host.call_count();
        controller.restore().await;
        assert_eq!(host.call_count(), calls);
    }

    #[tokio::test(start_paused = true)]
    async fn test_changes_within_window_coalesce_to_last() {
        let host = Arc::new(FakeHost::default());
        let (mut controller, rx) = SyncController::new(Arc::clone(&host), Some(BlockRef::new("b1")));
        controller.restore().await;
        let _ = rx.await;

        controller.on_change(snapshot_with("first"));
        controller.on_change(snapshot_with("second"));
        controller.on_change(snapshot_with("third"));

        tokio::time::sleep(Duration::from_millis(2500)).await;

        assert_eq!(host.upload_count(), 1);
        let (filename, content) = host.last_upload().unwrap();
        assert_eq!(filename, "b1.excalidraw");
        assert!(content.contains("third"));
        assert!(!content.contains("second"));

        let writes = host.attr_writes.lock().unwrap();
        assert_eq!(writes.len(), 1);
        assert_eq!(writes[0], "assets/b1.excalidraw");
    }

    #[tokio::test(start_paused = true)]
    async fn test_changes_in_separate_windows_save_twice() {
        let host = Arc::new(FakeHost::default());
        let (mut controller, rx) = SyncController::new(Arc::clone(&host), Some(BlockRef::new("b1")));
        controller.restore().await;
        let _ = rx.await;

        controller.on_change(snapshot_with("first"));
        tokio::time::sleep(Duration::from_millis(2100)).await;
        controller.on_change(snapshot_with("second"));
        tokio::time::sleep(Duration::from_millis(2100)).await;

        assert_eq!(host.upload_count(), 2);
    }

    #[tokio::test(start_paused = true)]
    async fn test_no_block_ref_never_touches_host() {
        let host = Arc::new(FakeHost::default());
        let (mut controller, rx) = SyncController::new(Arc::clone(&host), None);

        controller.restore().await;
        let scene = rx.await.unwrap();
        assert!(!scene.view_mode);

        controller.on_change(snapshot_with("x"));
        tokio::time::sleep(Duration::from_millis(2500)).await;

        assert_eq!(host.call_count(), 0);
    }

    #[tokio::test(start_paused = true)]
    async fn test_changes_before_ready_are_ignored() {
        let host = Arc::new(FakeHost::default());
        let (mut controller, _rx) = SyncController::new(Arc::clone(&host), Some(BlockRef::new("b1")));

        // Engine initialization noise before restore has run.
        controller.on_change(snapshot_with("init"));
        tokio::time::sleep(Duration::from_millis(2500)).await;

        assert_eq!(host.upload_count(), 0);
    }

    #[tokio::test(start_paused = true)]
    async fn test_shutdown_cancels_pending_save() {
        let host = Arc::new(FakeHost::default());
        let (mut controller, rx) = SyncController::new(Arc::clone(&host), Some(BlockRef::new("b1")));
        controller.restore().await;
        let _ = rx.await;

        controller.on_change(snapshot_with("doomed"));
        assert!(controller.save_pending());
        controller.shutdown();

        tokio::time::sleep(Duration::from_millis(2500)).await;
        assert_eq!(host.upload_count(), 0);
    }

    #[tokio::test(start_paused = true)]
    async fn test_failed_upload_writes_no_attribute() {
        let host = Arc::new(FakeHost {
            fail_uploads: true,
            ..FakeHost::default()
        });
        let (mut controller, rx) = SyncController::new(Arc::clone(&host), Some(BlockRef::new("b1")));
        controller.restore().await;
        let _ = rx.await;

        controller.on_change(snapshot_with("lost"));
        tokio::time::sleep(Duration::from_millis(2500)).await;

        // Upload failed: no attribute write happened.
        assert!(host.attr_writes.lock().unwrap().is_empty());
    }

    #[tokio::test(start_paused = true)]
    async fn test_shutdown_mid_upload_lets_save_complete() {
        let host = Arc::new(FakeHost {
            upload_delay: Some(Duration::from_millis(500)),
            ..FakeHost::default()
        });
        let (mut controller, rx) = SyncController::new(Arc::clone(&host), Some(BlockRef::new("b1")));
        controller.restore().await;
        let _ = rx.await;

        controller.on_change(snapshot_with("committed"));

        // Past the debounce window: the upload is in flight.
        tokio::time::sleep(Duration::from_millis(2200)).await;
        controller.shutdown();

        tokio::time::sleep(Duration::from_millis(1000)).await;
        assert_eq!(host.upload_count(), 1);
        assert_eq!(host.attr_writes.lock().unwrap().len(), 1);
    }

    #[tokio::test]
    async fn test_save_snapshot_round_trips() {
        let host = FakeHost::default();
        let block = BlockRef::new("b9");
        let doc = snapshot_with("kept");

        let path = save_snapshot(&host, &block, &doc).await.unwrap();
        assert_eq!(path, "assets/b9.excalidraw");

        let (_, content) = host.last_upload().unwrap();
        assert_eq!(parse_document(&content).unwrap(), doc);
    }
}
