//! Pointer and drag events in, canvas mutations out.
//!
//! The host UI translates DOM events into [`CanvasEvent`]s expressed in canvas
//! coordinates. [`DragController`] tracks which of the three interaction modes
//! is active (palette drop, block reposition, connection authoring) and
//! applies the matching [`CanvasModel`] operation.

use crate::canvas::{BlockId, CanvasModel, ConnectionKind, Position};
use crate::registry::BlockTemplate;

/// The interaction currently in progress. Only one can be active at a time.
#[derive(Debug, Clone, PartialEq, Default)]
pub enum Interaction {
    #[default]
    Idle,
    /// A palette block is being dragged over the canvas.
    DragOverCanvas,
    /// A placed block follows the pointer.
    Dragging { block: BlockId, grab_offset: Position },
    /// The first end of a connection has been picked.
    PendingConnection { source: BlockId, kind: ConnectionKind },
}

#[derive(Debug, Clone, PartialEq)]
pub enum CanvasEvent {
    PaletteDragOver,
    PaletteDragLeave,
    /// A palette block was released over the canvas with its serialized template.
    PaletteDrop { payload: String, at: Position },
    PointerDown { block: BlockId, at: Position },
    PointerMove { at: Position },
    PointerUp,
    PointerLeave,
    BlockClick { block: BlockId },
    /// A connection handle of the given kind was clicked on a block.
    ConnectorClick { block: BlockId, kind: ConnectionKind },
    /// A click on empty canvas.
    CanvasClick,
}

/// What handling an event did to the model.
#[derive(Debug, Clone, PartialEq)]
pub enum ControllerOutcome {
    Placed(BlockId),
    Selected(BlockId),
    Moved(BlockId),
    Connected {
        from: BlockId,
        to: BlockId,
        kind: ConnectionKind,
    },
    /// A connection was attempted and the model declined it.
    Declined {
        from: BlockId,
        to: BlockId,
        kind: ConnectionKind,
    },
    Pending {
        source: BlockId,
        kind: ConnectionKind,
    },
    Cancelled,
    Ignored,
}

#[derive(Debug, Default)]
pub struct DragController {
    interaction: Interaction,
}

impl DragController {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn interaction(&self) -> &Interaction {
        &self.interaction
    }

    pub fn is_idle(&self) -> bool {
        self.interaction == Interaction::Idle
    }

    /// Forgets any interaction in progress without touching the model.
    pub fn reset(&mut self) {
        self.interaction = Interaction::Idle;
    }

    pub fn handle(&mut self, model: &mut CanvasModel, event: CanvasEvent) -> ControllerOutcome {
        let outcome = match event {
            CanvasEvent::PaletteDragOver => self.on_drag_over(),
            CanvasEvent::PaletteDragLeave => self.on_drag_leave(),
            CanvasEvent::PaletteDrop { payload, at } => self.on_drop(model, &payload, at),
            CanvasEvent::PointerDown { block, at } => self.on_pointer_down(model, block, at),
            CanvasEvent::PointerMove { at } => self.on_pointer_move(model, at),
            CanvasEvent::PointerUp | CanvasEvent::PointerLeave => self.on_pointer_release(),
            CanvasEvent::BlockClick { block } => Self::select(model, &block),
            CanvasEvent::ConnectorClick { block, kind } => {
                self.on_connector_click(model, block, kind)
            }
            CanvasEvent::CanvasClick => self.on_canvas_click(),
        };
        log::trace!("Interaction now {:?}", self.interaction);
        outcome
    }

    /// A palette drag takes over from a pending connection.
    fn on_drag_over(&mut self) -> ControllerOutcome {
        match self.interaction {
            Interaction::Idle | Interaction::DragOverCanvas => {
                self.interaction = Interaction::DragOverCanvas;
                ControllerOutcome::Ignored
            }
            Interaction::PendingConnection { .. } => {
                self.interaction = Interaction::DragOverCanvas;
                ControllerOutcome::Cancelled
            }
            Interaction::Dragging { .. } => ControllerOutcome::Ignored,
        }
    }

    fn on_drag_leave(&mut self) -> ControllerOutcome {
        if self.interaction == Interaction::DragOverCanvas {
            self.interaction = Interaction::Idle;
            return ControllerOutcome::Cancelled;
        }
        ControllerOutcome::Ignored
    }

    fn on_drop(&mut self, model: &mut CanvasModel, payload: &str, at: Position) -> ControllerOutcome {
        if matches!(self.interaction, Interaction::Dragging { .. }) {
            return ControllerOutcome::Ignored;
        }
        self.interaction = Interaction::Idle;
        match BlockTemplate::from_payload(payload) {
            Ok(template) => ControllerOutcome::Placed(model.place_block(&template, at).id.clone()),
            Err(e) => {
                log::warn!("Ignoring dropped block: {}", e);
                ControllerOutcome::Ignored
            }
        }
    }

    fn on_pointer_down(
        &mut self,
        model: &mut CanvasModel,
        block: BlockId,
        at: Position,
    ) -> ControllerOutcome {
        let Some(instance) = model.select_block(&block) else {
            return ControllerOutcome::Ignored;
        };
        let grab_offset = at - instance.position;
        self.interaction = Interaction::Dragging {
            block: block.clone(),
            grab_offset,
        };
        ControllerOutcome::Selected(block)
    }

    fn on_pointer_move(&mut self, model: &mut CanvasModel, at: Position) -> ControllerOutcome {
        let Interaction::Dragging { block, grab_offset } = &self.interaction else {
            return ControllerOutcome::Ignored;
        };
        if model.move_block(block, at - *grab_offset) {
            ControllerOutcome::Moved(block.clone())
        } else {
            // The block vanished mid-drag.
            self.interaction = Interaction::Idle;
            ControllerOutcome::Cancelled
        }
    }

    fn on_pointer_release(&mut self) -> ControllerOutcome {
        if matches!(self.interaction, Interaction::Dragging { .. }) {
            self.interaction = Interaction::Idle;
        }
        ControllerOutcome::Ignored
    }

    fn select(model: &mut CanvasModel, block: &BlockId) -> ControllerOutcome {
        match model.select_block(block) {
            Some(selected) => ControllerOutcome::Selected(selected.id.clone()),
            None => ControllerOutcome::Ignored,
        }
    }

    fn on_connector_click(
        &mut self,
        model: &mut CanvasModel,
        block: BlockId,
        kind: ConnectionKind,
    ) -> ControllerOutcome {
        match &self.interaction {
            Interaction::Idle => {
                let qualifies = model.block(&block).is_some_and(|b| b.is_agent_capable());
                if !qualifies {
                    return ControllerOutcome::Ignored;
                }
                self.interaction = Interaction::PendingConnection {
                    source: block.clone(),
                    kind,
                };
                ControllerOutcome::Pending {
                    source: block,
                    kind,
                }
            }
            Interaction::PendingConnection {
                source,
                kind: pending_kind,
            } => {
                if *source == block || *pending_kind != kind || model.block(&block).is_none() {
                    return ControllerOutcome::Ignored;
                }
                let from = source.clone();
                self.interaction = Interaction::Idle;
                if model.connect(&from, &block, kind).is_some() {
                    ControllerOutcome::Connected {
                        from,
                        to: block,
                        kind,
                    }
                } else {
                    ControllerOutcome::Declined {
                        from,
                        to: block,
                        kind,
                    }
                }
            }
            _ => ControllerOutcome::Ignored,
        }
    }

    fn on_canvas_click(&mut self) -> ControllerOutcome {
        if matches!(self.interaction, Interaction::PendingConnection { .. }) {
            self.interaction = Interaction::Idle;
            return ControllerOutcome::Cancelled;
        }
        ControllerOutcome::Ignored
    }
}
