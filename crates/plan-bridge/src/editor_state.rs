use tracing::debug;

use plan_kernel::{DragSession, EditError, KernelConfig, Point, TopologyStore};

/// Editor state behind the message boundary.
///
/// Holds the current plan snapshot and the endpoint drag in progress, if any.
/// Edits are refused while a drag is active so the drag commits against the
/// plan it started from.
#[derive(Debug, Clone, Default)]
pub struct EditorState {
    /// The current plan snapshot.
    pub plan: TopologyStore,
    /// The drag in progress.
    pub drag: Option<DragSession>,
}

impl EditorState {
    pub fn new(config: KernelConfig) -> Self {
        Self {
            plan: TopologyStore::new(config),
            drag: None,
        }
    }

    /// Run a kernel edit against the current plan and keep its result.
    pub fn edit<T>(
        &mut self,
        op: impl FnOnce(&TopologyStore) -> Result<(TopologyStore, T), EditError>,
    ) -> Result<T, BridgeError> {
        if self.drag.is_some() {
            return Err(BridgeError::DragInProgress);
        }
        let (next, out) = op(&self.plan)?;
        self.plan = next;
        Ok(out)
    }

    pub fn configure(&mut self, config: KernelConfig) -> Result<(), BridgeError> {
        if self.drag.is_some() {
            return Err(BridgeError::DragInProgress);
        }
        self.plan = self.plan.with_config(config);
        Ok(())
    }

    /// Grab the vertex under `point`.
    pub fn begin_drag(&mut self, point: Point) -> Result<&DragSession, BridgeError> {
        if self.drag.is_some() {
            return Err(BridgeError::DragInProgress);
        }
        let session = DragSession::begin(&self.plan, point).ok_or(BridgeError::NoEndpointNear {
            x: point.x,
            y: point.y,
        })?;
        debug!(anchor = ?session.anchor(), walls = session.walls().len(), "drag started");
        Ok(self.drag.insert(session))
    }

    pub fn drag_to(&mut self, point: Point) -> Result<&DragSession, BridgeError> {
        let session = self.drag.as_mut().ok_or(BridgeError::NoActiveDrag)?;
        session.update(point);
        Ok(session)
    }

    /// Commit the drag into the plan.
    pub fn end_drag(&mut self) -> Result<(), BridgeError> {
        let session = self.drag.take().ok_or(BridgeError::NoActiveDrag)?;
        self.plan = session.commit();
        Ok(())
    }

    /// Drop the drag; the plan stays as it was before the drag began.
    pub fn cancel_drag(&mut self) -> Result<(), BridgeError> {
        let session = self.drag.take().ok_or(BridgeError::NoActiveDrag)?;
        self.plan = session.cancel();
        Ok(())
    }
}

/// Errors from the message bridge layer.
#[derive(Debug, Clone, thiserror::Error)]
pub enum BridgeError {
    #[error("{0}")]
    Edit(#[from] EditError),

    #[error("no drag in progress")]
    NoActiveDrag,

    #[error("a drag is already in progress")]
    DragInProgress,

    #[error("no wall endpoint near ({x:.1}, {y:.1})")]
    NoEndpointNear { x: f64, y: f64 },

    #[error("serialization error: {reason}")]
    Serialization { reason: String },
}
