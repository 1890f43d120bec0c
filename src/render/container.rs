use std::sync::{Arc, Mutex, MutexGuard, PoisonError};

use crate::core::models::PreviewElement;

#[derive(Debug, Default)]
struct Slot {
    generation: u64,
    element: Option<PreviewElement>,
}

/// The single preview slot a renderer draws into.
///
/// Every mount carries the generation it was started for; mounts from any
/// generation other than the current one are refused, so a slow render can
/// never replace the output of a newer one.
#[derive(Debug, Clone, Default)]
pub struct PreviewContainer {
    inner: Arc<Mutex<Slot>>,
}

impl PreviewContainer {
    pub fn new() -> Self {
        Self::default()
    }

    /// Empty the slot and only accept mounts for `generation` from now on.
    pub fn reset(&self, generation: u64) {
        let mut slot = self.slot();
        slot.generation = generation;
        slot.element = None;
    }

    pub fn mount(&self, generation: u64, element: PreviewElement) -> bool {
        let mut slot = self.slot();
        if slot.generation != generation {
            return false;
        }
        slot.element = Some(element);
        true
    }

    pub fn element(&self) -> Option<PreviewElement> {
        self.slot().element.clone()
    }

    /// The element, but only while the slot still belongs to `generation`.
    pub fn element_for(&self, generation: u64) -> Option<PreviewElement> {
        let slot = self.slot();
        if slot.generation != generation {
            return None;
        }
        slot.element.clone()
    }

    /// Source of a mounted image element; canvases have none until encoded.
    pub fn image_src(&self) -> Option<String> {
        match &self.slot().element {
            Some(PreviewElement::Image { src }) => Some(src.clone()),
            _ => None,
        }
    }

    pub fn is_empty(&self) -> bool {
        self.slot().element.is_none()
    }

    pub fn generation(&self) -> u64 {
        self.slot().generation
    }

    /// Handle a renderer uses to mount its output for `generation`.
    pub fn target(&self, generation: u64) -> MountTarget {
        MountTarget {
            container: self.clone(),
            generation,
        }
    }

    fn slot(&self) -> MutexGuard<'_, Slot> {
        self.inner.lock().unwrap_or_else(PoisonError::into_inner)
    }
}

#[derive(Debug, Clone)]
pub struct MountTarget {
    container: PreviewContainer,
    generation: u64,
}

impl MountTarget {
    pub fn generation(&self) -> u64 {
        self.generation
    }

    /// Returns false when the container has moved on to a newer generation.
    pub fn mount(&self, element: PreviewElement) -> bool {
        self.container.mount(self.generation, element)
    }
}
