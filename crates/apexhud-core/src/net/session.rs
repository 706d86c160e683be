use serde::Serialize;
use serde_json::Value;

use super::events::ClientEvent;
use super::reconnect::{Backoff, ReconnectDecision, ReconnectPolicy};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ConnectionState {
    Idle,
    Connecting,
    Connected,
    /// Closed on request; no retry pending.
    Closed,
    /// Reconnect budget used up.
    Exhausted,
}

/// What the socket reported.
#[derive(Debug, Clone, PartialEq)]
pub enum TransportEvent {
    Opened,
    Closed,
    Frame(String),
    Failed(String),
}

/// Why a connection attempt is being made.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ConnectOrigin {
    /// Requested by the page; restores the full reconnect budget.
    Manual,
    /// Fired by a reconnect timer.
    Retry,
}

/// Result of feeding one [`TransportEvent`] to the session.
#[derive(Debug, Default, PartialEq)]
pub struct Step {
    pub events: Vec<ClientEvent>,
    /// Text frame to send right away.
    pub outbound: Option<String>,
    pub reconnect: Option<ReconnectDecision>,
    /// A frame that was discarded without publishing anything.
    pub dropped: Option<FrameError>,
}

#[derive(Debug, Clone, PartialEq)]
pub enum FrameError {
    InvalidJson(String),
}

impl std::fmt::Display for FrameError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::InvalidJson(e) => write!(f, "invalid JSON frame: {e}"),
        }
    }
}

impl std::error::Error for FrameError {}

#[derive(Debug)]
pub enum SendError {
    NotConnected,
    Serialize(String),
    /// The socket refused the frame.
    Socket(String),
}

impl std::fmt::Display for SendError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::NotConnected => write!(f, "not connected; message not sent"),
            Self::Serialize(e) => write!(f, "serialize error: {e}"),
            Self::Socket(e) => write!(f, "send failed: {e}"),
        }
    }
}

impl std::error::Error for SendError {}

pub fn parse_frame(text: &str) -> Result<Value, FrameError> {
    serde_json::from_str(text).map_err(|e| FrameError::InvalidJson(e.to_string()))
}

/// `{"type": "hello", "message": ...}`, sent once per successful open.
pub fn greeting_frame(message: &str) -> String {
    serde_json::json!({ "type": "hello", "message": message }).to_string()
}

/// Connection bookkeeping independent of any socket implementation.
///
/// The owner feeds it transport events and acts on the returned [`Step`]:
/// publish the events, send the outbound frame, schedule the reconnect.
#[derive(Debug)]
pub struct Session {
    state: ConnectionState,
    backoff: Backoff,
    close_requested: bool,
    greeting: Option<String>,
}

impl Session {
    pub fn new(policy: ReconnectPolicy, greeting: Option<String>) -> Self {
        Self {
            state: ConnectionState::Idle,
            backoff: Backoff::new(policy),
            close_requested: false,
            greeting,
        }
    }

    pub fn state(&self) -> ConnectionState {
        self.state
    }

    pub fn is_connected(&self) -> bool {
        self.state == ConnectionState::Connected
    }

    pub fn attempts(&self) -> u32 {
        self.backoff.attempts()
    }

    pub fn policy(&self) -> &ReconnectPolicy {
        self.backoff.policy()
    }

    pub fn begin_connect(&mut self, origin: ConnectOrigin) {
        if origin == ConnectOrigin::Manual {
            self.backoff.reset();
        }
        self.close_requested = false;
        self.state = ConnectionState::Connecting;
        tracing::debug!(?origin, attempts = self.backoff.attempts(), "connecting");
    }

    /// Mark the next close as intentional so it does not trigger a retry.
    pub fn request_close(&mut self) {
        self.close_requested = true;
    }

    /// Close while no socket is left to report it: a retry was waiting or
    /// the budget ran out. Publishes one `Disconnect` unless already closed.
    pub fn closed_by_request(&mut self) -> Step {
        let was_closed = matches!(self.state, ConnectionState::Idle | ConnectionState::Closed);
        self.state = ConnectionState::Closed;
        self.close_requested = false;
        tracing::info!("connection closed on request");
        Step {
            events: if was_closed { Vec::new() } else { vec![ClientEvent::Disconnect] },
            ..Step::default()
        }
    }

    pub fn handle(&mut self, event: TransportEvent) -> Step {
        match event {
            TransportEvent::Opened => {
                self.state = ConnectionState::Connected;
                self.backoff.reset();
                tracing::info!("connected");
                Step {
                    events: vec![ClientEvent::Connect],
                    outbound: self.greeting.as_deref().map(greeting_frame),
                    ..Step::default()
                }
            },
            TransportEvent::Closed => {
                let reconnect = if self.close_requested {
                    self.state = ConnectionState::Closed;
                    tracing::info!("connection closed on request");
                    None
                } else {
                    let decision = self.backoff.next();
                    match decision {
                        ReconnectDecision::Retry { attempt, delay } => {
                            self.state = ConnectionState::Connecting;
                            tracing::info!(
                                attempt,
                                max = self.backoff.policy().max_attempts,
                                delay_ms = delay.as_millis() as u64,
                                "connection lost, scheduling reconnect"
                            );
                        },
                        ReconnectDecision::GiveUp { attempts } => {
                            self.state = ConnectionState::Exhausted;
                            tracing::error!(
                                attempts,
                                "reconnect attempts exhausted; manual reconnect required"
                            );
                        },
                    }
                    Some(decision)
                };
                Step {
                    events: vec![ClientEvent::Disconnect],
                    reconnect,
                    ..Step::default()
                }
            },
            TransportEvent::Frame(text) => match parse_frame(&text) {
                Ok(value) => Step {
                    events: vec![ClientEvent::Message(value)],
                    ..Step::default()
                },
                Err(e) => {
                    tracing::warn!(error = %e, len = text.len(), "dropping frame");
                    Step {
                        dropped: Some(e),
                        ..Step::default()
                    }
                },
            },
            TransportEvent::Failed(message) => {
                tracing::warn!(%message, "socket error");
                Step {
                    events: vec![ClientEvent::Error(message)],
                    ..Step::default()
                }
            },
        }
    }

    /// Serialize an outbound payload. Strings are sent verbatim; anything
    /// else as JSON. Fails unless connected.
    pub fn prepare_send<T: Serialize>(&self, payload: &T) -> Result<String, SendError> {
        if !self.is_connected() {
            return Err(SendError::NotConnected);
        }
        match serde_json::to_value(payload).map_err(|e| SendError::Serialize(e.to_string()))? {
            Value::String(s) => Ok(s),
            other => Ok(other.to_string()),
        }
    }
}

#[cfg(test)]
mod tests {
    use std::time::Duration;

    use super::*;

    fn session(max_attempts: u32) -> Session {
        Session::new(
            ReconnectPolicy {
                delay: Duration::from_millis(3000),
                max_attempts,
            },
            Some("overlay connected".to_string()),
        )
    }

    #[test]
    fn open_emits_connect_and_greeting() {
        let mut s = session(5);
        s.begin_connect(ConnectOrigin::Manual);
        let step = s.handle(TransportEvent::Opened);
        assert_eq!(step.events, vec![ClientEvent::Connect]);
        let greeting: Value = serde_json::from_str(step.outbound.as_deref().unwrap()).unwrap();
        assert_eq!(greeting["type"], "hello");
        assert_eq!(greeting["message"], "overlay connected");
        assert!(s.is_connected());
    }

    #[test]
    fn valid_frame_emits_exactly_one_message() {
        let mut s = session(5);
        let step = s.handle(TransportEvent::Frame(r#"{"player":{"name":"Foo"}}"#.into()));
        assert_eq!(step.events.len(), 1);
        assert!(matches!(&step.events[0], ClientEvent::Message(v) if v["player"]["name"] == "Foo"));
    }

    #[test]
    fn malformed_frame_emits_nothing() {
        let mut s = session(5);
        let step = s.handle(TransportEvent::Frame("{not json".into()));
        assert!(step.events.is_empty());
        assert_eq!(step.outbound, None);
        assert_eq!(step.reconnect, None);
        assert!(matches!(step.dropped, Some(FrameError::InvalidJson(_))));
    }

    #[test]
    fn unexpected_closes_are_bounded() {
        let mut s = session(3);
        s.begin_connect(ConnectOrigin::Manual);
        let mut retries = 0;
        for _ in 0..10 {
            let step = s.handle(TransportEvent::Closed);
            assert_eq!(step.events, vec![ClientEvent::Disconnect]);
            match step.reconnect {
                Some(ReconnectDecision::Retry { .. }) => {
                    retries += 1;
                    s.begin_connect(ConnectOrigin::Retry);
                },
                Some(ReconnectDecision::GiveUp { .. }) => break,
                None => panic!("unexpected close must produce a decision"),
            }
        }
        assert_eq!(retries, 3);
        assert_eq!(s.state(), ConnectionState::Exhausted);
    }

    #[test]
    fn successful_open_resets_attempts() {
        let mut s = session(2);
        s.begin_connect(ConnectOrigin::Manual);
        s.handle(TransportEvent::Closed);
        s.begin_connect(ConnectOrigin::Retry);
        assert_eq!(s.attempts(), 1);
        s.handle(TransportEvent::Opened);
        assert_eq!(s.attempts(), 0);
    }

    #[test]
    fn manual_connect_after_exhaustion_restores_budget() {
        let mut s = session(1);
        s.begin_connect(ConnectOrigin::Manual);
        s.handle(TransportEvent::Closed);
        s.begin_connect(ConnectOrigin::Retry);
        s.handle(TransportEvent::Closed);
        assert_eq!(s.state(), ConnectionState::Exhausted);
        s.begin_connect(ConnectOrigin::Manual);
        assert!(matches!(
            s.handle(TransportEvent::Closed).reconnect,
            Some(ReconnectDecision::Retry { attempt: 1, .. })
        ));
    }

    #[test]
    fn requested_close_does_not_reconnect() {
        let mut s = session(5);
        s.begin_connect(ConnectOrigin::Manual);
        s.handle(TransportEvent::Opened);
        s.request_close();
        let step = s.handle(TransportEvent::Closed);
        assert_eq!(step.events, vec![ClientEvent::Disconnect]);
        assert_eq!(step.reconnect, None);
        assert_eq!(s.state(), ConnectionState::Closed);
    }

    #[test]
    fn close_while_retry_waits_ends_in_closed() {
        let mut s = session(5);
        s.begin_connect(ConnectOrigin::Manual);
        s.handle(TransportEvent::Closed);
        assert_eq!(s.state(), ConnectionState::Connecting);

        let step = s.closed_by_request();
        assert_eq!(step.events, vec![ClientEvent::Disconnect]);
        assert_eq!(step.reconnect, None);
        assert_eq!(s.state(), ConnectionState::Closed);
        assert_eq!(s.closed_by_request(), Step::default());
    }

    #[test]
    fn send_requires_connection() {
        let mut s = session(5);
        assert!(matches!(
            s.prepare_send(&serde_json::json!({"a": 1})),
            Err(SendError::NotConnected)
        ));
        s.handle(TransportEvent::Opened);
        assert_eq!(s.prepare_send(&"raw").unwrap(), "raw");
        assert_eq!(
            s.prepare_send(&serde_json::json!({"a": 1})).unwrap(),
            r#"{"a":1}"#
        );
    }

    #[test]
    fn error_is_published() {
        let mut s = session(5);
        let step = s.handle(TransportEvent::Failed("boom".into()));
        assert_eq!(step.events, vec![ClientEvent::Error("boom".into())]);
    }
}
