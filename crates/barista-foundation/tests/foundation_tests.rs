use std::time::Duration;

use barista_foundation::{
    AppError, AudioError, Clock, DialogError, RecoveryStrategy, RuntimeState, StateManager,
    TestClock,
};

#[test]
fn lifecycle_transitions_follow_the_table() {
    let mgr = StateManager::new();
    assert_eq!(mgr.current(), RuntimeState::Initializing);

    mgr.transition(RuntimeState::Running).unwrap();
    mgr.transition(RuntimeState::Stopping).unwrap();
    mgr.transition(RuntimeState::Stopped).unwrap();
    assert_eq!(mgr.current(), RuntimeState::Stopped);
}

#[test]
fn invalid_transition_is_rejected() {
    let mgr = StateManager::new();
    // Cannot stop before ever running or stopping.
    assert!(mgr.transition(RuntimeState::Stopped).is_err());
    assert_eq!(mgr.current(), RuntimeState::Initializing);
}

#[test]
fn subscribers_observe_transitions() {
    let mgr = StateManager::new();
    let rx = mgr.subscribe();
    mgr.transition(RuntimeState::Running).unwrap();
    assert_eq!(rx.try_recv().unwrap(), RuntimeState::Running);
}

#[test]
fn dialog_errors_are_recoverable() {
    let noise = AppError::Dialog(DialogError::RecognitionNoise {
        category: "Drink".into(),
    });
    assert_eq!(noise.recovery_strategy(), RecoveryStrategy::Reprompt);

    let ambiguous = AppError::Dialog(DialogError::AmbiguousConfirmation);
    assert_eq!(ambiguous.recovery_strategy(), RecoveryStrategy::Reprompt);

    let gone = AppError::Dialog(DialogError::UnknownCatalogEntry {
        name: "milk tea".into(),
    });
    assert_eq!(gone.recovery_strategy(), RecoveryStrategy::FreshAsk);

    let delivery = AppError::Dialog(DialogError::NotifierDelivery("channel closed".into()));
    assert_eq!(delivery.recovery_strategy(), RecoveryStrategy::Ignore);
}

#[test]
fn stream_errors_ask_for_a_reopen() {
    let disconnected = AppError::Audio(AudioError::DeviceDisconnected);
    assert_eq!(disconnected.recovery_strategy(), RecoveryStrategy::Reopen);

    let stalled = AppError::Audio(AudioError::NoDataTimeout {
        duration: Duration::from_secs(5),
    });
    assert_eq!(stalled.recovery_strategy(), RecoveryStrategy::Reopen);

    let overflow = AppError::Audio(AudioError::QueueOverflow { samples: 4000 });
    assert_eq!(overflow.recovery_strategy(), RecoveryStrategy::Ignore);
}

#[test]
fn test_clock_sleep_advances_without_blocking() {
    let clock = TestClock::new();
    let before = clock.now();
    clock.sleep(Duration::from_millis(300));
    assert_eq!(clock.now() - before, Duration::from_millis(300));
}
