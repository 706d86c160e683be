use std::cell::RefCell;
use std::rc::Rc;
use std::time::Duration;

use apexhud_core::hud::{HudFrame, HudModel, MatchStatus};
use apexhud_core::net::{
    ClientEvent, ConnectOrigin, ConnectionState, EventBus, EventKind, ReconnectDecision,
    ReconnectPolicy, Session, TransportEvent, status_text,
};
use apexhud_core::telemetry::{FrameOutcome, classify_frame};

/// Wire a session to a bus the way the browser client does: transport
/// events go through the session, resulting client events are published.
fn pump(
    session: &mut Session,
    bus: &RefCell<EventBus>,
    event: TransportEvent,
) -> Option<ReconnectDecision> {
    let step = session.handle(event);
    for event in &step.events {
        EventBus::dispatch(bus, event);
    }
    step.reconnect
}

#[test]
fn frames_flow_into_hud_frames() {
    let bus = RefCell::new(EventBus::new());
    let model = Rc::new(RefCell::new(HudModel::new()));
    let rendered: Rc<RefCell<Vec<HudFrame>>> = Rc::new(RefCell::new(Vec::new()));
    let errors = Rc::new(RefCell::new(Vec::new()));

    {
        let model = Rc::clone(&model);
        let rendered = Rc::clone(&rendered);
        let errors = Rc::clone(&errors);
        bus.borrow_mut().on(EventKind::Message, move |event| {
            let ClientEvent::Message(value) = event else {
                return;
            };
            match classify_frame(value) {
                FrameOutcome::Snapshot(snapshot) => {
                    rendered.borrow_mut().push(model.borrow_mut().apply(&snapshot));
                },
                FrameOutcome::ServerError(message) => errors.borrow_mut().push(message),
                FrameOutcome::Malformed(_) => {},
            }
        });
    }

    let mut session = Session::new(ReconnectPolicy::default(), None);
    session.begin_connect(ConnectOrigin::Manual);
    pump(&mut session, &bus, TransportEvent::Opened);

    let frame = r#"{
        "gameState": "playing",
        "match": {"inProgress": true, "remainingSquads": 12, "squadEliminated": false},
        "player": {"name": "Foo", "legend": "Wraith", "health": 100, "maxHealth": 100,
                   "shields": 50, "maxShields": 100, "kills": 2, "damage": 340},
        "squad": [{"name": "Foo"}, {"name": "Bar", "legend": "Bangalore"}]
    }"#;
    pump(&mut session, &bus, TransportEvent::Frame(frame.to_string()));
    pump(&mut session, &bus, TransportEvent::Frame("not json".to_string()));
    pump(
        &mut session,
        &bus,
        TransportEvent::Frame(r#"{"error": "game not running"}"#.to_string()),
    );

    let rendered = rendered.borrow();
    assert_eq!(rendered.len(), 1);
    let hud = &rendered[0];
    assert_eq!(hud.phase.as_deref(), Some("playing"));
    let match_view = hud.match_view.as_ref().unwrap();
    assert_eq!(match_view.status, MatchStatus::InMatch);
    assert_eq!(match_view.remaining_text().as_deref(), Some("12 squads remaining"));
    let player = hud.player.as_ref().unwrap();
    assert_eq!(player.health.text(), "100/100");
    assert_eq!(player.shields.width(), "50%");
    let squad = hud.squad.as_ref().unwrap();
    assert_eq!(squad.len(), 1);
    assert_eq!(squad[0].name, "Bar");

    assert_eq!(*errors.borrow(), vec!["game not running".to_string()]);
}

#[test]
fn lost_connection_retries_then_gives_up() {
    let bus = RefCell::new(EventBus::new());
    let disconnects = Rc::new(RefCell::new(0));
    {
        let disconnects = Rc::clone(&disconnects);
        bus.borrow_mut()
            .on(EventKind::Disconnect, move |_| *disconnects.borrow_mut() += 1);
    }

    let policy = ReconnectPolicy {
        delay: Duration::from_millis(3000),
        max_attempts: 5,
    };
    let mut session = Session::new(policy, None);
    session.begin_connect(ConnectOrigin::Manual);

    let mut scheduled = Vec::new();
    loop {
        match pump(&mut session, &bus, TransportEvent::Closed) {
            Some(ReconnectDecision::Retry { attempt, delay }) => {
                assert_eq!(delay, Duration::from_millis(3000));
                scheduled.push(attempt);
                assert_eq!(
                    status_text(session.state(), session.attempts(), 5),
                    format!("Reconnecting ({attempt}/5)")
                );
                session.begin_connect(ConnectOrigin::Retry);
            },
            Some(ReconnectDecision::GiveUp { .. }) => break,
            None => panic!("unexpected close must decide"),
        }
    }

    assert_eq!(scheduled, vec![1, 2, 3, 4, 5]);
    assert_eq!(*disconnects.borrow(), 6);
    assert_eq!(session.state(), ConnectionState::Exhausted);
    assert_eq!(status_text(session.state(), session.attempts(), 5), "Reconnect failed");
}
