use crate::error::{ChartError, ChartResult};
use crate::extensions::ChartEventListener;
use crate::render::Renderer;

use super::ChartEngine;

impl<R: Renderer> ChartEngine<R> {
    /// Registers a listener with a unique identifier.
    pub fn register_listener(&mut self, listener: Box<dyn ChartEventListener>) -> ChartResult<()> {
        let listener_id = listener.id().to_owned();
        if listener_id.is_empty() {
            return Err(ChartError::InvalidData(
                "listener id must not be empty".to_owned(),
            ));
        }
        if self.has_listener(&listener_id) {
            return Err(ChartError::DuplicateListener(listener_id));
        }
        self.core.runtime.listeners.push(listener);
        Ok(())
    }

    /// Unregisters a listener by id. Returns `true` when removed.
    pub fn unregister_listener(&mut self, listener_id: &str) -> bool {
        if let Some(position) = self
            .core
            .runtime
            .listeners
            .iter()
            .position(|entry| entry.id() == listener_id)
        {
            self.core.runtime.listeners.remove(position);
            return true;
        }
        false
    }

    #[must_use]
    pub fn listener_count(&self) -> usize {
        self.core.runtime.listeners.len()
    }

    #[must_use]
    pub fn has_listener(&self, listener_id: &str) -> bool {
        self.core
            .runtime
            .listeners
            .iter()
            .any(|listener| listener.id() == listener_id)
    }
}
