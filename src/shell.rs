//! Presentation shell
//!
//! Wires a drawing engine surface to the restore/save controller. The
//! surface is injected explicitly rather than discovered, and the shell owns
//! the coupled view-only/grid toggle: the single auxiliary checkbox flips
//! both together.

use std::sync::Arc;
use tokio::sync::oneshot;

use blockdraw_host::{BlockRef, EmbedContext, HostBinding};
use blockdraw_scene::SceneDocument;
use blockdraw_sync::{InitialScene, SyncController};

use crate::links::{route_link, LinkAction, Modifiers};

/// The drawing engine surface the shell drives
pub trait CanvasSurface {
    /// Load the initial scene; called exactly once, on mount
    fn apply_initial_scene(&mut self, scene: &InitialScene);

    /// Enable or disable read-only rendering
    fn set_view_mode(&mut self, enabled: bool);

    /// Enable or disable the grid
    fn set_grid_mode(&mut self, enabled: bool);
}

/// Shell binding one engine surface to one host block
pub struct Shell<S: CanvasSurface, H: HostBinding + 'static> {
    surface: S,
    controller: SyncController<H>,
    initial: Option<oneshot::Receiver<InitialScene>>,
    origin: String,
    view_mode: bool,
    grid_mode: bool,
}

impl<S: CanvasSurface, H: HostBinding + 'static> Shell<S, H> {
    /// Create a shell for the given surface and embedding context
    #[must_use]
    pub fn new(surface: S, host: Arc<H>, context: &EmbedContext) -> Self {
        let (controller, initial) = SyncController::new(host, context.resolve_block_ref());
        Self {
            surface,
            controller,
            initial: Some(initial),
            origin: context.origin().unwrap_or_default().to_string(),
            view_mode: false,
            grid_mode: false,
        }
    }

    /// Mount: restore prior state and feed the engine its initial scene
    pub async fn mount(&mut self) {
        self.controller.restore().await;
        let Some(initial) = self.initial.take() else {
            return;
        };
        if let Ok(scene) = initial.await {
            self.view_mode = scene.view_mode;
            self.grid_mode = scene.grid_mode;
            self.surface.set_view_mode(self.view_mode);
            self.surface.set_grid_mode(self.grid_mode);
            self.surface.apply_initial_scene(&scene);
        }
    }

    /// Change notification from the engine; schedules a debounced save
    pub fn on_change(&mut self, snapshot: SceneDocument) {
        self.controller.on_change(snapshot);
    }

    /// Flip view-only and grid mode together (the auxiliary checkbox)
    pub fn toggle_view_mode(&mut self) {
        self.view_mode = !self.view_mode;
        self.grid_mode = !self.grid_mode;
        self.surface.set_view_mode(self.view_mode);
        self.surface.set_grid_mode(self.grid_mode);
    }

    /// Whether the canvas is read-only
    #[must_use]
    pub fn view_mode(&self) -> bool {
        self.view_mode
    }

    /// Whether the grid is shown
    #[must_use]
    pub fn grid_mode(&self) -> bool {
        self.grid_mode
    }

    /// The block this shell persists to, if one resolved
    #[must_use]
    pub fn block(&self) -> Option<&BlockRef> {
        self.controller.block()
    }

    /// Decide what to do with a link activated on the canvas
    #[must_use]
    pub fn on_link_activate(&self, link: &str, modifiers: Modifiers) -> LinkAction {
        route_link(link, modifiers, &self.origin)
    }

    /// True when a save is scheduled but has not run yet
    #[must_use]
    pub fn save_pending(&self) -> bool {
        self.controller.save_pending()
    }

    /// Unmount: cancel any pending save
    pub fn unmount(&mut self) {
        self.controller.shutdown();
    }
}
