//! Binding between the active session and one editing surface.
//!
//! # Invariants
//! - At most one surface is mounted.
//! - Mounting always builds a new surface; surfaces are never reused across
//!   loads.

use super::{EditorFactory, EditorSurface};
use crate::model::document::MemoDocument;
use log::debug;

pub struct EditorBinding<F: EditorFactory> {
    factory: F,
    surface: Option<F::Surface>,
    instances_created: u64,
}

impl<F: EditorFactory> EditorBinding<F> {
    pub fn new(factory: F) -> Self {
        Self {
            factory,
            surface: None,
            instances_created: 0,
        }
    }

    /// Discards any current surface and builds a new one from `initial`.
    pub fn mount(&mut self, initial: &MemoDocument) {
        self.surface = Some(self.factory.create(initial));
        self.instances_created += 1;
        debug!(
            "event=editor_mount module=editor status=ok blocks={} instance={}",
            initial.len(),
            self.instances_created
        );
    }

    pub fn unmount(&mut self) {
        if self.surface.take().is_some() {
            debug!("event=editor_unmount module=editor status=ok");
        }
    }

    pub fn is_mounted(&self) -> bool {
        self.surface.is_some()
    }

    pub fn surface(&self) -> Option<&F::Surface> {
        self.surface.as_ref()
    }

    pub(crate) fn surface_mut(&mut self) -> Option<&mut F::Surface> {
        self.surface.as_mut()
    }

    /// Live document of the mounted surface.
    pub fn snapshot(&self) -> Option<MemoDocument> {
        self.surface.as_ref().map(EditorSurface::document)
    }

    /// Total surfaces built over this binding's lifetime.
    pub fn instances_created(&self) -> u64 {
        self.instances_created
    }
}
