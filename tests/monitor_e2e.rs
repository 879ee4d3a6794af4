use std::sync::{Arc, Mutex};
use std::time::Duration;

use cellwatch::{
    BatteryLevel, BatteryMonitor, BatteryObserver, BatteryReading, ChargingState, KindFilter,
    MonitorConfig, MonitorError, Notification, NotificationKind, Percentage, SimulatedSource,
    StreamError,
};

fn reading(percentage: u8, state: ChargingState) -> BatteryReading {
    BatteryReading::known(percentage, state).unwrap()
}

fn monitor_at(percentage: u8, state: ChargingState) -> (Arc<SimulatedSource>, BatteryMonitor) {
    let source = Arc::new(SimulatedSource::new(reading(percentage, state)));
    let monitor = BatteryMonitor::new(source.clone(), MonitorConfig::default());
    (source, monitor)
}

fn drain(stream: &cellwatch::MonitorStream) -> Vec<Notification> {
    let mut out = Vec::new();
    while let Some(event) = stream.try_recv() {
        out.push(event.notification);
    }
    out
}

#[test]
fn discharge_into_critical_emits_percentage_and_level() {
    // Start at 15% (Low), unplugged; drop to 9%.
    let (_source, monitor) = monitor_at(15, ChargingState::Unplugged);
    let stream = monitor.subscribe(KindFilter::all());
    monitor.start_monitoring();

    monitor.observe_reading(reading(9, ChargingState::Unplugged));

    let notifications = drain(&stream);
    assert!(notifications.contains(&Notification::LevelChanged {
        percentage: Percentage::new(9).ok(),
    }));
    assert!(notifications.contains(&Notification::SignificantLevelChange {
        level: BatteryLevel::CriticallyLow,
    }));
    assert!(!notifications
        .iter()
        .any(|n| n.kind() == NotificationKind::StateChanged));
}

#[test]
fn watch_target_fires_once_alongside_level_transition() {
    let (_source, monitor) = monitor_at(18, ChargingState::Unplugged);
    monitor.notify_for_battery_level(20);
    monitor.notify_for_battery_level(20); // registering twice is a no-op
    let stream = monitor.subscribe(KindFilter::all());
    monitor.start_monitoring();

    monitor.observe_reading(reading(19, ChargingState::Unplugged));
    monitor.observe_reading(reading(20, ChargingState::Unplugged));

    let notifications = drain(&stream);
    let hits: Vec<_> = notifications
        .iter()
        .filter(|n| n.kind() == NotificationKind::BatteryLevelReached)
        .collect();
    assert_eq!(
        hits,
        vec![&Notification::BatteryLevelReached {
            percentage: Percentage::new(20).unwrap(),
        }]
    );
    // 19 is Low, 20 is Normal: the bucket transition co-fires on the same reading.
    assert!(notifications.contains(&Notification::SignificantLevelChange {
        level: BatteryLevel::Normal,
    }));

    // Same session, same percentage again: no re-fire.
    monitor.observe_reading(reading(21, ChargingState::Unplugged));
    monitor.observe_reading(reading(20, ChargingState::Unplugged));
    assert!(!drain(&stream)
        .iter()
        .any(|n| n.kind() == NotificationKind::BatteryLevelReached));
}

#[test]
fn watch_target_rearms_on_restart() {
    let (source, monitor) = monitor_at(49, ChargingState::Unplugged);
    monitor.notify_for_battery_level(50);
    let stream = monitor.subscribe(KindFilter::only(NotificationKind::BatteryLevelReached));
    monitor.start_monitoring();

    monitor.observe_reading(reading(50, ChargingState::Unplugged));
    assert_eq!(drain(&stream).len(), 1);

    monitor.stop_monitoring();
    source.set(reading(49, ChargingState::Unplugged));
    monitor.start_monitoring();

    monitor.observe_reading(reading(50, ChargingState::Unplugged));
    assert_eq!(drain(&stream).len(), 1, "restart re-arms watch targets");
}

#[test]
fn charging_suppression_keeps_combined_channel() {
    let (_source, monitor) = monitor_at(54, ChargingState::Charging);
    monitor.set_report_while_charging(false);
    let stream = monitor.subscribe(KindFilter::all());
    monitor.start_monitoring();

    monitor.observe_reading(reading(55, ChargingState::Charging));

    let notifications = drain(&stream);
    assert_eq!(
        notifications,
        vec![Notification::LevelAndStateChanged {
            percentage: Percentage::new(55).ok(),
            state: ChargingState::Charging,
        }]
    );
}

#[test]
fn inverted_polarity_alias_configures_the_same_flag() {
    let (_source, monitor) = monitor_at(54, ChargingState::Charging);
    monitor.set_report_only_on_discharging(true);
    assert!(!monitor.report_while_charging());

    let stream = monitor.subscribe(KindFilter::only(NotificationKind::LevelChanged));
    monitor.start_monitoring();
    monitor.observe_reading(reading(55, ChargingState::Charging));
    assert!(drain(&stream).is_empty());

    monitor.set_report_only_on_discharging(false);
    monitor.observe_reading(reading(56, ChargingState::Charging));
    assert_eq!(drain(&stream).len(), 1);
}

#[test]
fn full_transition_reports_while_charging_suppressed() {
    let (_source, monitor) = monitor_at(99, ChargingState::Charging);
    monitor.set_report_while_charging(false);
    let stream = monitor.subscribe(KindFilter::all());
    monitor.start_monitoring();

    monitor.observe_reading(reading(100, ChargingState::Charging));

    let notifications = drain(&stream);
    assert!(notifications.contains(&Notification::SignificantLevelChange {
        level: BatteryLevel::Full,
    }));
    assert!(!notifications
        .iter()
        .any(|n| n.kind() == NotificationKind::LevelChanged));
}

#[test]
fn stop_gate_silences_observers_and_streams() {
    struct Counter(Mutex<u32>);

    impl BatteryObserver for Counter {
        fn battery_level_changed(&self, _percentage: Option<Percentage>) {
            *self.0.lock().unwrap() += 1;
        }
    }

    let (_source, monitor) = monitor_at(50, ChargingState::Unplugged);
    let counter = Arc::new(Counter(Mutex::new(0)));
    monitor.register_observer(counter.clone());
    let stream = monitor.subscribe(KindFilter::all());
    monitor.start_monitoring();

    monitor.observe_reading(reading(49, ChargingState::Unplugged));
    assert_eq!(*counter.0.lock().unwrap(), 1);
    assert!(!drain(&stream).is_empty());

    monitor.stop_monitoring();
    monitor.observe_reading(reading(30, ChargingState::Unplugged));
    monitor.observe_reading(reading(10, ChargingState::Charging));

    assert_eq!(*counter.0.lock().unwrap(), 1);
    assert!(drain(&stream).is_empty());
    // Queries still answer with the last value observed before the stop.
    assert_eq!(
        monitor.current_battery_percentage(),
        Percentage::new(49).ok()
    );
    assert_eq!(monitor.battery_state(), ChargingState::Unplugged);
}

#[test]
fn observers_receive_only_their_implemented_callbacks() {
    #[derive(Default)]
    struct StateOnly {
        states: Mutex<Vec<ChargingState>>,
    }

    impl BatteryObserver for StateOnly {
        fn battery_state_changed(&self, state: ChargingState) {
            self.states.lock().unwrap().push(state);
        }
    }

    let (_source, monitor) = monitor_at(50, ChargingState::Unplugged);
    let observer = Arc::new(StateOnly::default());
    monitor.register_observer(observer.clone());
    monitor.start_monitoring();

    // Percentage change only: the state-only observer sees nothing.
    monitor.observe_reading(reading(49, ChargingState::Unplugged));
    assert!(observer.states.lock().unwrap().is_empty());

    monitor.observe_reading(reading(49, ChargingState::Charging));
    assert_eq!(
        *observer.states.lock().unwrap(),
        vec![ChargingState::Charging]
    );
}

#[test]
fn unregistering_an_observer_stops_delivery() {
    #[derive(Default)]
    struct Counter(Mutex<u32>);

    impl BatteryObserver for Counter {
        fn battery_level_changed(&self, _percentage: Option<Percentage>) {
            *self.0.lock().unwrap() += 1;
        }
    }

    let (_source, monitor) = monitor_at(50, ChargingState::Unplugged);
    let counter = Arc::new(Counter::default());
    let id = monitor.register_observer(counter.clone());
    monitor.start_monitoring();

    monitor.observe_reading(reading(49, ChargingState::Unplugged));
    assert!(monitor.unregister_observer(id));
    monitor.observe_reading(reading(48, ChargingState::Unplugged));

    assert_eq!(*counter.0.lock().unwrap(), 1);
}

#[test]
fn unknown_percentage_flows_through_as_normal_data() {
    let (_source, monitor) = monitor_at(50, ChargingState::Unplugged);
    let stream = monitor.subscribe(KindFilter::all());
    monitor.start_monitoring();

    monitor.observe_reading(BatteryReading::new(None, ChargingState::Unplugged));

    let notifications = drain(&stream);
    assert!(notifications.contains(&Notification::LevelChanged { percentage: None }));
    assert!(notifications.contains(&Notification::SignificantLevelChange {
        level: BatteryLevel::Unknown,
    }));
    assert_eq!(monitor.current_battery_percentage(), None);
    assert_eq!(monitor.battery_level(), BatteryLevel::Unknown);
}

#[test]
fn unsubscribed_stream_disconnects_after_drain() {
    let (_source, monitor) = monitor_at(50, ChargingState::Unplugged);
    let stream = monitor.subscribe(KindFilter::all());
    monitor.start_monitoring();

    monitor.observe_reading(reading(49, ChargingState::Unplugged));
    stream.unsubscribe();
    stream.unsubscribe(); // idempotent

    // Buffered events remain receivable, then the stream disconnects.
    assert!(stream.recv().is_ok());
    assert!(stream.recv().is_ok());
    let err = stream.recv_timeout(Duration::from_millis(50)).unwrap_err();
    assert_eq!(err, MonitorError::Stream(StreamError::Disconnected));
}

#[test]
fn slow_stream_drops_events_without_blocking() {
    let source = Arc::new(SimulatedSource::new(reading(100, ChargingState::Unplugged)));
    let monitor = BatteryMonitor::new(
        source,
        MonitorConfig {
            stream_capacity: 2,
            ..MonitorConfig::default()
        },
    );
    let stream = monitor.subscribe(KindFilter::only(NotificationKind::LevelChanged));
    monitor.start_monitoring();

    for value in (1..=99).rev() {
        monitor.observe_reading(reading(value, ChargingState::Unplugged));
    }

    assert!(monitor.dropped_events() > 0);
    // The buffer still holds the oldest events in order.
    assert_eq!(
        stream.recv_timeout(Duration::from_millis(100)).unwrap().notification,
        Notification::LevelChanged {
            percentage: Percentage::new(99).ok(),
        }
    );
    let _keep = stream;
}

#[test]
fn events_serialize_with_tagged_payloads() {
    let notification = Notification::LevelAndStateChanged {
        percentage: Percentage::new(55).ok(),
        state: ChargingState::Charging,
    };

    let json = serde_json::to_value(notification).unwrap();
    assert_eq!(
        json,
        serde_json::json!({
            "type": "level_and_state_changed",
            "percentage": 55,
            "state": "charging",
        })
    );

    let back: Notification = serde_json::from_value(json).unwrap();
    assert_eq!(back, notification);
}
