pub mod events;
pub mod reconnect;
pub mod session;

pub use events::{ClientEvent, EventBus, EventKind, Handler};
pub use reconnect::{Backoff, ReconnectDecision, ReconnectPolicy};
pub use session::{
    ConnectOrigin, ConnectionState, FrameError, SendError, Session, Step, TransportEvent,
    greeting_frame, parse_frame,
};

/// Status line shown next to the HUD for a session state.
pub fn status_text(state: ConnectionState, attempts: u32, max_attempts: u32) -> String {
    match state {
        ConnectionState::Connected => "Connected".to_string(),
        ConnectionState::Connecting if attempts > 0 => {
            format!("Reconnecting ({attempts}/{max_attempts})")
        },
        ConnectionState::Connecting => "Connecting".to_string(),
        ConnectionState::Exhausted => "Reconnect failed".to_string(),
        ConnectionState::Idle | ConnectionState::Closed => "Disconnected".to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn status_lines() {
        assert_eq!(status_text(ConnectionState::Connected, 0, 5), "Connected");
        assert_eq!(
            status_text(ConnectionState::Connecting, 2, 5),
            "Reconnecting (2/5)"
        );
        assert_eq!(status_text(ConnectionState::Exhausted, 5, 5), "Reconnect failed");
        assert_eq!(status_text(ConnectionState::Closed, 0, 5), "Disconnected");
    }
}
