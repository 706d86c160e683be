use std::cell::RefCell;
use std::rc::Rc;

use serde_json::Value;

use apexhud_core::hud::{HudFrame, HudModel};
use apexhud_core::net::{ClientEvent, EventKind};
use apexhud_core::telemetry::{FrameOutcome, classify_frame};

use crate::net_client::WsClient;
use crate::renderer::Renderer;

/// Overlay page state: the HUD model and where it is drawn.
pub struct Overlay {
    model: RefCell<HudModel>,
    renderer: Rc<Renderer>,
    last_server_error: RefCell<Option<String>>,
}

impl Overlay {
    pub fn new(renderer: Rc<Renderer>) -> Rc<Self> {
        Rc::new(Self {
            model: RefCell::new(HudModel::new()),
            renderer,
            last_server_error: RefCell::new(None),
        })
    }

    pub fn renderer(&self) -> &Rc<Renderer> {
        &self.renderer
    }

    /// Render one parsed frame. Server-reported errors and frames that are
    /// not snapshots leave the page untouched.
    pub fn handle_message(&self, value: &Value) -> Option<HudFrame> {
        match classify_frame(value) {
            FrameOutcome::Snapshot(snapshot) => {
                let frame = self.model.borrow_mut().apply(&snapshot);
                self.renderer.render(&frame);
                Some(frame)
            },
            FrameOutcome::ServerError(message) => {
                crate::diag::console_error!("Server error: {message}");
                *self.last_server_error.borrow_mut() = Some(message);
                None
            },
            FrameOutcome::Malformed(reason) => {
                crate::diag::console_warn!("Ignoring frame: {reason}");
                None
            },
        }
    }

    pub fn last_server_error(&self) -> Option<String> {
        self.last_server_error.borrow().clone()
    }
}

/// Subscribe the overlay to the client's events.
pub fn wire(client: &WsClient, overlay: &Rc<Overlay>) {
    for kind in [EventKind::Connect, EventKind::Disconnect] {
        let status = client.clone();
        let renderer = Rc::clone(overlay.renderer());
        client.on(kind, move |_| renderer.set_status(&status.status_text()));
    }

    {
        let renderer = Rc::clone(overlay.renderer());
        client.on(EventKind::Error, move |event| {
            if let ClientEvent::Error(message) = event {
                crate::diag::console_warn!("WebSocket error: {message}");
            }
            renderer.set_status("Connection error");
        });
    }

    {
        let overlay = Rc::clone(overlay);
        client.on(EventKind::Message, move |event| {
            if let ClientEvent::Message(value) = event {
                overlay.handle_message(value);
            }
        });
    }
}
