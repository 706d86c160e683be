use std::cell::{Cell, RefCell};
use std::rc::Rc;
use std::time::Duration;

use serde::Serialize;

use apexhud_core::net::{
    ClientEvent, ConnectOrigin, ConnectionState, EventBus, EventKind, ReconnectDecision,
    ReconnectPolicy, SendError, Session, Step, TransportEvent, status_text,
};

#[cfg(target_family = "wasm")]
use wasm_bindgen::prelude::*;

/// A scheduled reconnect that has not fired yet.
struct PendingRetry {
    #[cfg(target_family = "wasm")]
    handle: i32,
    delay: Duration,
}

struct Inner {
    url: RefCell<String>,
    session: RefCell<Session>,
    bus: RefCell<EventBus>,
    pending: RefCell<Option<PendingRetry>>,
    /// Bumped for every socket opened; events from older sockets are ignored.
    generation: Cell<u64>,
    #[cfg(target_family = "wasm")]
    socket: RefCell<Option<web_sys::WebSocket>>,
    #[cfg(not(target_family = "wasm"))]
    sent: RefCell<Vec<String>>,
}

/// Telemetry WebSocket client with bounded automatic reconnection.
/// Uses Rc<RefCell> because WASM is single-threaded; clones share one
/// connection.
#[derive(Clone)]
pub struct WsClient {
    inner: Rc<Inner>,
}

impl WsClient {
    pub fn new(url: &str, policy: ReconnectPolicy, greeting: Option<String>) -> Self {
        Self {
            inner: Rc::new(Inner {
                url: RefCell::new(url.to_string()),
                session: RefCell::new(Session::new(policy, greeting)),
                bus: RefCell::new(EventBus::new()),
                pending: RefCell::new(None),
                generation: Cell::new(0),
                #[cfg(target_family = "wasm")]
                socket: RefCell::new(None),
                #[cfg(not(target_family = "wasm"))]
                sent: RefCell::new(Vec::new()),
            }),
        }
    }

    /// Register a handler; handlers for a kind run in registration order.
    pub fn on(&self, kind: EventKind, handler: impl FnMut(&ClientEvent) + 'static) {
        self.inner.bus.borrow_mut().on(kind, handler);
    }

    /// Point later connections at a different URL.
    pub fn set_url(&self, url: &str) {
        *self.inner.url.borrow_mut() = url.to_string();
    }

    /// Open the connection. Cancels any pending retry and restores the full
    /// reconnect budget.
    pub fn connect(&self) {
        cancel_pending(&self.inner);
        self.inner
            .session
            .borrow_mut()
            .begin_connect(ConnectOrigin::Manual);
        open_socket(&self.inner);
    }

    /// Close on purpose. No reconnect follows.
    pub fn disconnect(&self) {
        let retry_cancelled = cancel_pending(&self.inner);
        let socket_live = !retry_cancelled
            && matches!(
                self.state(),
                ConnectionState::Connecting | ConnectionState::Connected
            );
        if socket_live {
            self.inner.session.borrow_mut().request_close();
            close_socket(&self.inner);
        } else {
            // No close event will arrive; settle the session here.
            let step = self.inner.session.borrow_mut().closed_by_request();
            apply_step(&self.inner, step);
        }
    }

    /// Send a payload: strings verbatim, anything else as JSON. Nothing is
    /// sent while disconnected.
    pub fn send<T: Serialize>(&self, payload: &T) -> Result<(), SendError> {
        let prepared = self.inner.session.borrow().prepare_send(payload);
        let result = prepared.and_then(|frame| send_raw(&self.inner, &frame));
        if let Err(e) = &result {
            crate::diag::console_warn!("WebSocket send skipped: {e}");
        }
        result
    }

    pub fn is_connected(&self) -> bool {
        self.inner.session.borrow().is_connected()
    }

    pub fn state(&self) -> ConnectionState {
        self.inner.session.borrow().state()
    }

    pub fn status_text(&self) -> String {
        let session = self.inner.session.borrow();
        status_text(
            session.state(),
            session.attempts(),
            session.policy().max_attempts,
        )
    }

    /// Delay of the reconnect currently scheduled, if any.
    pub fn pending_retry(&self) -> Option<Duration> {
        self.inner.pending.borrow().as_ref().map(|p| p.delay)
    }

    #[cfg(test)]
    fn inject(&self, event: TransportEvent) {
        let generation = self.inner.generation.get();
        on_transport(&self.inner, generation, event);
    }

    #[cfg(test)]
    fn fire_pending_retry(&self) -> Option<Duration> {
        let delay = self.pending_retry()?;
        retry_now(&self.inner);
        Some(delay)
    }

    #[cfg(test)]
    fn sent(&self) -> Vec<String> {
        self.inner.sent.borrow().clone()
    }
}

/// Feed a socket event through the session, then act on the result. The
/// session borrow ends before handlers run so they may call back into the
/// client.
fn on_transport(inner: &Rc<Inner>, generation: u64, event: TransportEvent) {
    if generation != inner.generation.get() {
        return;
    }
    let step = inner.session.borrow_mut().handle(event);
    apply_step(inner, step);
}

fn apply_step(inner: &Rc<Inner>, step: Step) {
    if let Some(e) = &step.dropped {
        crate::diag::console_warn!("Dropped frame: {e}");
    }

    if let Some(frame) = step.outbound
        && let Err(e) = send_raw(inner, &frame)
    {
        crate::diag::console_warn!("greeting not sent: {e}");
    }

    for event in &step.events {
        EventBus::dispatch(&inner.bus, event);
    }

    match step.reconnect {
        Some(ReconnectDecision::Retry { attempt, delay }) => {
            crate::diag::console_log!("Reconnecting in {}ms (attempt {attempt})", delay.as_millis());
            schedule_retry(inner, delay);
        },
        Some(ReconnectDecision::GiveUp { attempts }) => {
            crate::diag::console_error!("Gave up reconnecting after {attempts} attempts");
        },
        None => {},
    }
}

fn retry_now(inner: &Rc<Inner>) {
    inner.pending.borrow_mut().take();
    inner
        .session
        .borrow_mut()
        .begin_connect(ConnectOrigin::Retry);
    open_socket(inner);
}

#[cfg(target_family = "wasm")]
fn open_socket(inner: &Rc<Inner>) {
    close_socket(inner);
    let generation = inner.generation.get() + 1;
    inner.generation.set(generation);

    let url = inner.url.borrow().clone();
    let ws = match web_sys::WebSocket::new(&url) {
        Ok(ws) => ws,
        Err(e) => {
            crate::diag::console_error!("WebSocket error: {e:?}");
            on_transport(inner, generation, TransportEvent::Failed(format!("{e:?}")));
            on_transport(inner, generation, TransportEvent::Closed);
            return;
        },
    };

    let target = Rc::clone(inner);
    let onopen = Closure::<dyn FnMut()>::new(move || {
        on_transport(&target, generation, TransportEvent::Opened);
    });
    ws.set_onopen(Some(onopen.as_ref().unchecked_ref()));
    onopen.forget();

    let target = Rc::clone(inner);
    let onmessage =
        Closure::<dyn FnMut(web_sys::MessageEvent)>::new(move |evt: web_sys::MessageEvent| {
            if let Some(text) = evt.data().as_string() {
                on_transport(&target, generation, TransportEvent::Frame(text));
            }
        });
    ws.set_onmessage(Some(onmessage.as_ref().unchecked_ref()));
    onmessage.forget();

    let target = Rc::clone(inner);
    let onerror = Closure::<dyn FnMut(web_sys::Event)>::new(move |_: web_sys::Event| {
        on_transport(
            &target,
            generation,
            TransportEvent::Failed("WebSocket error".to_string()),
        );
    });
    ws.set_onerror(Some(onerror.as_ref().unchecked_ref()));
    onerror.forget();

    let target = Rc::clone(inner);
    let onclose =
        Closure::<dyn FnMut(web_sys::CloseEvent)>::new(move |_: web_sys::CloseEvent| {
            if target.generation.get() == generation {
                target.socket.borrow_mut().take();
            }
            on_transport(&target, generation, TransportEvent::Closed);
        });
    ws.set_onclose(Some(onclose.as_ref().unchecked_ref()));
    onclose.forget();

    *inner.socket.borrow_mut() = Some(ws);
}

/// Native builds have no socket; tests drive the session through `inject`.
#[cfg(not(target_family = "wasm"))]
fn open_socket(inner: &Rc<Inner>) {
    inner.generation.set(inner.generation.get() + 1);
}

#[cfg(target_family = "wasm")]
fn close_socket(inner: &Rc<Inner>) {
    if let Some(ws) = inner.socket.borrow_mut().take()
        && let Err(e) = ws.close()
    {
        crate::diag::console_warn!("WebSocket close failed: {e:?}");
    }
}

#[cfg(not(target_family = "wasm"))]
fn close_socket(_inner: &Rc<Inner>) {}

#[cfg(target_family = "wasm")]
fn send_raw(inner: &Rc<Inner>, frame: &str) -> Result<(), SendError> {
    match inner.socket.borrow().as_ref() {
        Some(ws) => ws
            .send_with_str(frame)
            .map_err(|e| SendError::Socket(format!("{e:?}"))),
        None => Err(SendError::NotConnected),
    }
}

#[cfg(not(target_family = "wasm"))]
fn send_raw(inner: &Rc<Inner>, frame: &str) -> Result<(), SendError> {
    inner.sent.borrow_mut().push(frame.to_string());
    Ok(())
}

#[cfg(target_family = "wasm")]
fn schedule_retry(inner: &Rc<Inner>, delay: Duration) {
    cancel_pending(inner);
    let Some(window) = web_sys::window() else {
        return;
    };
    let target = Rc::clone(inner);
    let callback = Closure::once_into_js(move || retry_now(&target));
    let millis = i32::try_from(delay.as_millis()).unwrap_or(i32::MAX);
    match window
        .set_timeout_with_callback_and_timeout_and_arguments_0(callback.unchecked_ref(), millis)
    {
        Ok(handle) => *inner.pending.borrow_mut() = Some(PendingRetry { handle, delay }),
        Err(e) => crate::diag::console_error!("Failed to schedule reconnect: {e:?}"),
    }
}

#[cfg(not(target_family = "wasm"))]
fn schedule_retry(inner: &Rc<Inner>, delay: Duration) {
    *inner.pending.borrow_mut() = Some(PendingRetry { delay });
}

/// Returns whether a retry was waiting.
fn cancel_pending(inner: &Rc<Inner>) -> bool {
    let Some(_pending) = inner.pending.borrow_mut().take() else {
        return false;
    };
    #[cfg(target_family = "wasm")]
    if let Some(window) = web_sys::window() {
        window.clear_timeout_with_handle(_pending.handle);
    }
    true
}
