//! Content binding layer
//!
//! Maps panel identity to renderable content and forwards workspace
//! callbacks onto the dock manager. A panel's rendered content is the
//! descriptor whose key equals the panel's `content_key`, falling back
//! to the panel's embedded content. Descriptors marked as panel
//! components are re-keyed per content key so switching descriptors
//! creates a fresh instance instead of leaking state across panels.
//!
//! Save traffic flows through here too: panels are bound to store
//! paths, and completed saves are reconciled by path, not identity, so
//! a rebinding that races a save still lands on the right node.

use std::collections::HashMap;

use tracing::{debug, warn};

use crate::dock::{DockManager, Panel};
use crate::drawing::DrawingFile;
use crate::geometry::DropPosition;
use crate::storage::{FileStore, StoreError};

/// How a descriptor's content behaves when mounted in a panel
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ContentKind {
    /// Plain content; instances may be shared freely
    Static,
    /// A stateful panel component; the host must key instances on the
    /// panel's content key
    PanelComponent,
}

/// A renderable content offering
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ContentDescriptor {
    /// Matched against panels' `content_key`
    pub key: String,
    /// Display label for pickers
    pub label: String,
    pub kind: ContentKind,
}

impl ContentDescriptor {
    pub fn new(key: impl Into<String>, label: impl Into<String>, kind: ContentKind) -> Self {
        Self {
            key: key.into(),
            label: label.into(),
            kind,
        }
    }
}

/// Where a panel's content comes from
#[derive(Debug, Clone, PartialEq)]
pub enum ContentSource<'a> {
    Descriptor(&'a ContentDescriptor),
    /// The panel's embedded fallback content
    Embedded(&'a serde_json::Value),
}

/// A resolved binding for one panel
#[derive(Debug, Clone, PartialEq)]
pub struct PanelContent<'a> {
    pub source: ContentSource<'a>,
    /// Key the host should mount the instance under. Panel components
    /// change key when the content key changes, forcing a fresh
    /// instance.
    pub instance_key: String,
}

/// The set of contents available to panels
#[derive(Debug, Clone, Default)]
pub struct ContentRegistry {
    descriptors: Vec<ContentDescriptor>,
}

impl ContentRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a descriptor. Keys are unique; a duplicate is rejected.
    pub fn register(&mut self, descriptor: ContentDescriptor) -> bool {
        if self.descriptors.iter().any(|d| d.key == descriptor.key) {
            return false;
        }
        self.descriptors.push(descriptor);
        true
    }

    /// All registered descriptors, in registration order
    pub fn available(&self) -> &[ContentDescriptor] {
        &self.descriptors
    }

    pub fn get(&self, key: &str) -> Option<&ContentDescriptor> {
        self.descriptors.iter().find(|d| d.key == key)
    }

    /// Resolve what a panel renders: its descriptor by key, else its
    /// embedded content. `None` means the panel has nothing to show.
    pub fn resolve<'a>(&'a self, panel: &'a Panel) -> Option<PanelContent<'a>> {
        if let Some(descriptor) = self.get(&panel.content_key) {
            let instance_key = match descriptor.kind {
                ContentKind::PanelComponent => format!("{}:{}", panel.id, panel.content_key),
                ContentKind::Static => panel.id.clone(),
            };
            return Some(PanelContent {
                source: ContentSource::Descriptor(descriptor),
                instance_key,
            });
        }
        panel.content.as_ref().map(|embedded| PanelContent {
            source: ContentSource::Embedded(embedded),
            instance_key: panel.id.clone(),
        })
    }
}

/// Glue between the dock manager, the content registry, and the store
pub struct WorkspaceBinding<S: FileStore> {
    dock: DockManager,
    registry: ContentRegistry,
    store: S,
    /// Panel id -> store path of the drawing bound to it
    panel_paths: HashMap<String, String>,
}

impl<S: FileStore> WorkspaceBinding<S> {
    pub fn new(dock: DockManager, registry: ContentRegistry, store: S) -> Self {
        Self {
            dock,
            registry,
            store,
            panel_paths: HashMap::new(),
        }
    }

    pub fn dock(&self) -> &DockManager {
        &self.dock
    }

    pub fn dock_mut(&mut self) -> &mut DockManager {
        &mut self.dock
    }

    pub fn registry(&self) -> &ContentRegistry {
        &self.registry
    }

    pub fn store(&self) -> &S {
        &self.store
    }

    pub fn store_mut(&mut self) -> &mut S {
        &mut self.store
    }

    // ========================================================================
    // Panel/path tracking
    // ========================================================================

    /// Bind a panel to the store path backing its drawing
    pub fn bind_panel(&mut self, panel_id: &str, path: &str) -> bool {
        if self.dock.root().find_panel(panel_id).is_none() {
            return false;
        }
        self.panel_paths
            .insert(panel_id.to_string(), path.to_string());
        true
    }

    pub fn path_of(&self, panel_id: &str) -> Option<&str> {
        self.panel_paths.get(panel_id).map(String::as_str)
    }

    /// Which panel currently bears a path. Completed saves reconcile
    /// through here so a rebinding mid-save still resolves correctly.
    pub fn panel_for_path(&self, path: &str) -> Option<&str> {
        self.panel_paths
            .iter()
            .find(|(_, p)| p.as_str() == path)
            .map(|(id, _)| id.as_str())
    }

    // ========================================================================
    // Workspace callbacks
    // ========================================================================

    pub fn on_move(&mut self, source_id: &str, target_id: &str, position: DropPosition) -> bool {
        self.dock.move_panel(source_id, target_id, position)
    }

    /// Remove a panel and drop its binding
    pub fn on_remove(&mut self, panel_id: &str) -> bool {
        if !self.dock.remove_panel(panel_id) {
            return false;
        }
        self.panel_paths.remove(panel_id);
        true
    }

    pub fn on_activate(&mut self, panel_id: &str) -> bool {
        self.dock.activate_panel(panel_id)
    }

    pub fn on_maximize(&mut self, panel_id: &str) -> bool {
        self.dock.maximize_panel(panel_id)
    }

    pub fn on_restore(&mut self) -> bool {
        self.dock.restore_panel()
    }

    pub fn on_resize(&mut self, node_id: &str, size: f64) -> bool {
        self.dock.resize(node_id, size)
    }

    // ========================================================================
    // Save / open
    // ========================================================================

    /// Persist a panel's drawing to its bound path. The dock tree is
    /// never touched by a save, success or failure.
    pub fn save_panel(&mut self, panel_id: &str, drawing: &DrawingFile) -> Result<(), StoreError> {
        let Some(path) = self.panel_paths.get(panel_id).cloned() else {
            return Err(StoreError::NotFound(format!(
                "panel {} has no bound path",
                panel_id
            )));
        };
        let bytes = drawing.to_bytes().map_err(StoreError::unknown)?;
        match self.store.write_file(&path, &bytes) {
            Ok(()) => {
                debug!(panel_id, %path, "drawing saved");
                Ok(())
            }
            Err(error) => {
                warn!(panel_id, %path, %error, "drawing save failed");
                Err(error)
            }
        }
    }

    /// Load a panel's drawing from its bound path. A payload that fails
    /// validation refuses the open.
    pub fn open_panel(&mut self, panel_id: &str) -> Result<DrawingFile, StoreError> {
        let Some(path) = self.panel_paths.get(panel_id).cloned() else {
            return Err(StoreError::NotFound(format!(
                "panel {} has no bound path",
                panel_id
            )));
        };
        let bytes = self.store.read_file(&path)?;
        DrawingFile::from_bytes(&bytes).map_err(|error| {
            warn!(panel_id, %path, %error, "refused to open malformed drawing");
            StoreError::unknown(error)
        })
    }
}
