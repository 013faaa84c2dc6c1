use blockpad_document::{BlockId, DropSide};

/// Block drag-and-drop tracking.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub enum DragState {
    #[default]
    Idle,
    Dragging {
        dragged: BlockId,
        over: Option<(BlockId, DropSide)>,
    },
}

/// A drop worth handing to the coordinator.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DropRequest {
    pub dragged: BlockId,
    pub target: BlockId,
    pub side: DropSide,
}

impl DragState {
    pub fn start(&mut self, dragged: BlockId) {
        *self = DragState::Dragging {
            dragged,
            over: None,
        };
    }

    pub fn hover(&mut self, target: BlockId, side: DropSide) {
        if let DragState::Dragging { over, .. } = self {
            *over = Some((target, side));
        }
    }

    /// End the drag. Returns a request only when hovering a target other
    /// than the dragged block.
    pub fn release(&mut self) -> Option<DropRequest> {
        match std::mem::take(self) {
            DragState::Dragging {
                dragged,
                over: Some((target, side)),
            } if target != dragged => Some(DropRequest {
                dragged,
                target,
                side,
            }),
            _ => None,
        }
    }

    pub fn end(&mut self) {
        *self = DragState::Idle;
    }
}
