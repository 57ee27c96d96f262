//! Tests for the drag/drop and connection-authoring state machine.
mod common;
use common::{fixed_canvas, place_at, position_of, template};
use glassbox::canvas::{BlockId, ConnectionKind, Position};
use glassbox::controller::{CanvasEvent, ControllerOutcome, DragController, Interaction};

fn drop_event(template_id: &str, x: f64, y: f64) -> CanvasEvent {
    CanvasEvent::PaletteDrop {
        payload: template(template_id).to_payload(),
        at: Position::new(x, y),
    }
}

#[test]
fn test_palette_drop_places_a_block() {
    let mut canvas = fixed_canvas();
    let mut controller = DragController::new();

    assert_eq!(
        controller.handle(&mut canvas, CanvasEvent::PaletteDragOver),
        ControllerOutcome::Ignored
    );
    assert_eq!(controller.interaction(), &Interaction::DragOverCanvas);

    let outcome = controller.handle(&mut canvas, drop_event("agent", 400.0, 300.0));
    let ControllerOutcome::Placed(id) = outcome else {
        panic!("expected a placement, got {:?}", outcome);
    };
    assert!(controller.is_idle());
    assert_eq!(position_of(&canvas, &id), Position::new(240.0, 252.0));
}

#[test]
fn test_drag_leave_returns_to_idle() {
    let mut canvas = fixed_canvas();
    let mut controller = DragController::new();
    controller.handle(&mut canvas, CanvasEvent::PaletteDragOver);

    assert_eq!(
        controller.handle(&mut canvas, CanvasEvent::PaletteDragLeave),
        ControllerOutcome::Cancelled
    );
    assert!(controller.is_idle());
    assert!(canvas.is_empty());
}

#[test]
fn test_malformed_payload_places_nothing() {
    let mut canvas = fixed_canvas();
    let mut controller = DragController::new();
    controller.handle(&mut canvas, CanvasEvent::PaletteDragOver);

    for payload in ["not json", "{\"title\": \"No id\"}", ""] {
        let outcome = controller.handle(
            &mut canvas,
            CanvasEvent::PaletteDrop {
                payload: payload.to_string(),
                at: Position::new(10.0, 10.0),
            },
        );
        assert_eq!(outcome, ControllerOutcome::Ignored, "payload {:?}", payload);
    }
    assert!(canvas.is_empty());
    assert!(controller.is_idle());
}

#[test]
fn test_drop_classifies_payloads_without_a_category() {
    let mut canvas = fixed_canvas();
    let mut controller = DragController::new();
    let payload = r#"{"id":"helper","title":"AI Helper","description":"","icon":"Robot","color":"blue"}"#;

    let outcome = controller.handle(
        &mut canvas,
        CanvasEvent::PaletteDrop {
            payload: payload.to_string(),
            at: Position::new(200.0, 200.0),
        },
    );
    let ControllerOutcome::Placed(id) = outcome else {
        panic!("expected a placement, got {:?}", outcome);
    };
    assert!(canvas.block(&id).is_some_and(|b| b.is_agent_capable()));
}

#[test]
fn test_pointer_drag_moves_by_grab_offset() {
    let mut canvas = fixed_canvas();
    let mut controller = DragController::new();
    let start = place_at(&mut canvas, "connect", 100.0, 100.0);

    let outcome = controller.handle(
        &mut canvas,
        CanvasEvent::PointerDown {
            block: start.clone(),
            at: Position::new(130.0, 110.0),
        },
    );
    assert_eq!(outcome, ControllerOutcome::Selected(start.clone()));
    assert!(matches!(controller.interaction(), Interaction::Dragging { .. }));

    let outcome = controller.handle(
        &mut canvas,
        CanvasEvent::PointerMove {
            at: Position::new(330.0, 410.0),
        },
    );
    assert_eq!(outcome, ControllerOutcome::Moved(start.clone()));
    assert_eq!(position_of(&canvas, &start), Position::new(300.0, 400.0));

    controller.handle(&mut canvas, CanvasEvent::PointerUp);
    assert!(controller.is_idle());
    assert_eq!(
        controller.handle(
            &mut canvas,
            CanvasEvent::PointerMove {
                at: Position::new(0.0, 0.0)
            }
        ),
        ControllerOutcome::Ignored
    );
    assert_eq!(position_of(&canvas, &start), Position::new(300.0, 400.0));
}

#[test]
fn test_pointer_leave_ends_a_drag() {
    let mut canvas = fixed_canvas();
    let mut controller = DragController::new();
    let start = place_at(&mut canvas, "connect", 100.0, 100.0);
    controller.handle(
        &mut canvas,
        CanvasEvent::PointerDown {
            block: start,
            at: Position::new(100.0, 100.0),
        },
    );

    controller.handle(&mut canvas, CanvasEvent::PointerLeave);
    assert!(controller.is_idle());
}

#[test]
fn test_block_removed_mid_drag_cancels() {
    let mut canvas = fixed_canvas();
    let mut controller = DragController::new();
    let start = place_at(&mut canvas, "connect", 100.0, 100.0);
    controller.handle(
        &mut canvas,
        CanvasEvent::PointerDown {
            block: start.clone(),
            at: Position::new(100.0, 100.0),
        },
    );
    canvas.remove_block(&start);

    let outcome = controller.handle(
        &mut canvas,
        CanvasEvent::PointerMove {
            at: Position::new(10.0, 10.0),
        },
    );
    assert_eq!(outcome, ControllerOutcome::Cancelled);
    assert!(controller.is_idle());
}

#[test]
fn test_block_click_selects() {
    let mut canvas = fixed_canvas();
    let mut controller = DragController::new();
    let agent = place_at(&mut canvas, "agent", 0.0, 0.0);

    assert_eq!(
        controller.handle(&mut canvas, CanvasEvent::BlockClick { block: agent.clone() }),
        ControllerOutcome::Selected(agent.clone())
    );
    assert_eq!(
        controller.handle(
            &mut canvas,
            CanvasEvent::BlockClick {
                block: BlockId::from("ghost-1")
            }
        ),
        ControllerOutcome::Ignored
    );
    assert_eq!(canvas.selected().map(|b| b.id.clone()), Some(agent));
}

#[test]
fn test_two_connector_clicks_connect() {
    let mut canvas = fixed_canvas();
    let mut controller = DragController::new();
    let agent = place_at(&mut canvas, "agent", 0.0, 0.0);
    let tool = place_at(&mut canvas, "send-email", 700.0, 700.0);
    let kind = ConnectionKind::AgentToTool;

    assert_eq!(
        controller.handle(&mut canvas, CanvasEvent::ConnectorClick { block: agent.clone(), kind }),
        ControllerOutcome::Pending {
            source: agent.clone(),
            kind
        }
    );
    assert_eq!(
        controller.handle(&mut canvas, CanvasEvent::ConnectorClick { block: tool.clone(), kind }),
        ControllerOutcome::Connected {
            from: agent.clone(),
            to: tool.clone(),
            kind
        }
    );
    assert!(controller.is_idle());
    assert_eq!(canvas.connections().len(), 1);
    assert_eq!(position_of(&canvas, &tool), Position::new(0.0, 150.0));
}

#[test]
fn test_connector_click_requires_an_agent_source() {
    let mut canvas = fixed_canvas();
    let mut controller = DragController::new();
    let tool = place_at(&mut canvas, "send-email", 0.0, 0.0);

    let outcome = controller.handle(
        &mut canvas,
        CanvasEvent::ConnectorClick {
            block: tool,
            kind: ConnectionKind::AgentToTool,
        },
    );
    assert_eq!(outcome, ControllerOutcome::Ignored);
    assert!(controller.is_idle());
}

#[test]
fn test_pending_connection_ignores_self_and_other_kind() {
    let mut canvas = fixed_canvas();
    let mut controller = DragController::new();
    let a = place_at(&mut canvas, "agent", 0.0, 0.0);
    let b = place_at(&mut canvas, "agent", 0.0, 400.0);
    controller.handle(
        &mut canvas,
        CanvasEvent::ConnectorClick {
            block: a.clone(),
            kind: ConnectionKind::AgentToAgent,
        },
    );

    for event in [
        CanvasEvent::ConnectorClick {
            block: a.clone(),
            kind: ConnectionKind::AgentToAgent,
        },
        CanvasEvent::ConnectorClick {
            block: b.clone(),
            kind: ConnectionKind::AgentToTool,
        },
    ] {
        assert_eq!(controller.handle(&mut canvas, event), ControllerOutcome::Ignored);
    }
    assert!(matches!(
        controller.interaction(),
        Interaction::PendingConnection { .. }
    ));
    assert!(canvas.connections().is_empty());
}

#[test]
fn test_declined_connection_returns_to_idle() {
    let mut canvas = fixed_canvas();
    let mut controller = DragController::new();
    let agent = place_at(&mut canvas, "agent", 0.0, 0.0);
    let start = place_at(&mut canvas, "connect", 0.0, 400.0);
    let kind = ConnectionKind::AgentToTool;

    controller.handle(&mut canvas, CanvasEvent::ConnectorClick { block: agent.clone(), kind });
    let outcome =
        controller.handle(&mut canvas, CanvasEvent::ConnectorClick { block: start.clone(), kind });

    assert_eq!(
        outcome,
        ControllerOutcome::Declined {
            from: agent,
            to: start,
            kind
        }
    );
    assert!(controller.is_idle());
    assert!(canvas.connections().is_empty());
}

#[test]
fn test_canvas_click_cancels_a_pending_connection() {
    let mut canvas = fixed_canvas();
    let mut controller = DragController::new();
    let agent = place_at(&mut canvas, "agent", 0.0, 0.0);
    controller.handle(
        &mut canvas,
        CanvasEvent::ConnectorClick {
            block: agent,
            kind: ConnectionKind::AgentToTool,
        },
    );

    assert_eq!(
        controller.handle(&mut canvas, CanvasEvent::CanvasClick),
        ControllerOutcome::Cancelled
    );
    assert!(controller.is_idle());
    assert_eq!(
        controller.handle(&mut canvas, CanvasEvent::CanvasClick),
        ControllerOutcome::Ignored
    );
}

#[test]
fn test_pointer_down_overrides_pending_connection() {
    let mut canvas = fixed_canvas();
    let mut controller = DragController::new();
    let agent = place_at(&mut canvas, "agent", 0.0, 0.0);
    let tool = place_at(&mut canvas, "send-email", 600.0, 0.0);
    controller.handle(
        &mut canvas,
        CanvasEvent::ConnectorClick {
            block: agent,
            kind: ConnectionKind::AgentToTool,
        },
    );

    controller.handle(
        &mut canvas,
        CanvasEvent::PointerDown {
            block: tool.clone(),
            at: Position::new(600.0, 0.0),
        },
    );
    assert!(matches!(
        controller.interaction(),
        Interaction::Dragging { block, .. } if *block == tool
    ));

    // A drop is ignored while a block is being dragged.
    assert_eq!(
        controller.handle(&mut canvas, drop_event("agent", 0.0, 0.0)),
        ControllerOutcome::Ignored
    );
    assert_eq!(canvas.len(), 2);
}

#[test]
fn test_palette_drop_cancels_a_pending_connection() {
    let mut canvas = fixed_canvas();
    let mut controller = DragController::new();
    let agent = place_at(&mut canvas, "agent", 0.0, 0.0);
    controller.handle(
        &mut canvas,
        CanvasEvent::ConnectorClick {
            block: agent.clone(),
            kind: ConnectionKind::AgentToTool,
        },
    );

    assert_eq!(
        controller.handle(&mut canvas, CanvasEvent::PaletteDragOver),
        ControllerOutcome::Cancelled
    );
    assert_eq!(controller.interaction(), &Interaction::DragOverCanvas);

    let outcome = controller.handle(&mut canvas, drop_event("send-email", 600.0, 300.0));
    let ControllerOutcome::Placed(tool) = outcome else {
        panic!("expected a placement, got {:?}", outcome);
    };
    assert!(controller.is_idle());
    assert_eq!(canvas.len(), 2);
    assert!(canvas.connections().is_empty());

    // Without a drag-over, the drop alone still places the block.
    controller.handle(
        &mut canvas,
        CanvasEvent::ConnectorClick {
            block: agent,
            kind: ConnectionKind::AgentToTool,
        },
    );
    assert!(matches!(
        controller.handle(&mut canvas, drop_event("create-report", 600.0, 600.0)),
        ControllerOutcome::Placed(_)
    ));
    assert!(controller.is_idle());
    assert_eq!(canvas.len(), 3);
    assert!(canvas.block(&tool).is_some());
}
