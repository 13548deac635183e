use af_controls::*;
use af_telemetry::Reading;
use proptest::prelude::*;

fn reading(sunlight: f64, soil_moisture: f64, light_on: bool, pump_on: bool) -> Reading {
    Reading {
        temperature: 24.0,
        humidity: 55.0,
        soil_moisture,
        sunlight,
        timestamp: "00:00:00".to_string(),
        light_on,
        pump_on,
    }
}

fn arb_reading() -> impl Strategy<Value = Reading> {
    (0.0f64..1024.0, 0.0f64..1024.0, any::<bool>(), any::<bool>())
        .prop_map(|(sun, soil, light, pump)| reading(sun, soil, light, pump))
}

proptest! {
    #[test]
    fn manual_mode_is_isolated(readings in proptest::collection::vec(arb_reading(), 0..64)) {
        let mut engine = AutoControlEngine::default();
        for r in &readings {
            prop_assert!(engine.on_reading(r).is_none());
        }
        prop_assert!(!engine.in_flight());
        prop_assert_eq!(engine.stats().commands_issued, 0);
    }

    #[test]
    fn at_most_one_write_outstanding(readings in proptest::collection::vec(arb_reading(), 1..64)) {
        let mut engine = AutoControlEngine::default();
        engine.set_mode(ControlMode::Auto);

        let mut outstanding = 0;
        for r in &readings {
            if engine.on_reading(r).is_some() {
                outstanding += 1;
            }
            prop_assert!(outstanding <= 1);
        }
    }
}

#[test]
fn sink_round_trip_with_guard() {
    let mut engine = AutoControlEngine::default();
    let mut sink = MemorySink::new();
    engine.set_mode(ControlMode::Auto);

    let first = engine.on_reading(&reading(120.0, 800.0, false, false)).unwrap();
    // Second push lands before the first write is acknowledged.
    assert!(engine.on_reading(&reading(120.0, 100.0, false, false)).is_none());

    let result = sink.write(&first.command);
    engine.on_command_result(result).unwrap();
    assert!(sink.state.light);
    assert!(!sink.state.pump);

    // The store now reports the light on; the dry soil is picked up here.
    let next = engine.on_reading(&reading(120.0, 100.0, true, false)).unwrap();
    assert_eq!(next.command, ActuatorCommand::set(Actuator::Pump, true));
    engine.on_command_result(sink.write(&next.command)).unwrap();
    assert_eq!(sink.writes.len(), 2);
}
