mod common;

use common::{
    capture, info_events, CountingProvider, MockError, RecordingBackward, RecordingForward,
};
use fc_dispatch::device::FixedCapability;
use fc_dispatch::dtype::{ElementType, Precision};
use fc_dispatch::error::DispatchError;
use fc_dispatch::ops::binding::{lookup, resolve, Direction, Engine, BINDINGS};

#[test]
fn table_has_one_entry_per_name_engine_pair() {
    assert_eq!(BINDINGS.len(), 8);
    for (i, a) in BINDINGS.iter().enumerate() {
        for b in &BINDINGS[i + 1..] {
            assert!(a.name != b.name || a.engine != b.engine, "{a:?} duplicated");
        }
    }
}

#[test]
fn high_throughput_never_runs_half_math() {
    for name in ["FC", "FCTransposed"] {
        let binding = lookup(name, Engine::HighThroughput).unwrap();
        let mut op = RecordingForward::new(ElementType::Float16);
        let caps = CountingProvider::new(8);

        let (result, events) = capture(|| binding.forward(true, &mut op, &caps));

        assert_eq!(result, Ok(true));
        assert_eq!(op.calls[0].math, Precision::Full);
        assert!(caps.queries().is_empty());
        assert!(info_events(&events).is_empty());
    }
}

#[test]
fn high_throughput_gradient_never_logs_on_old_devices() {
    let binding = resolve("FCTransposedGradient", "TENSORCORE").unwrap();
    let mut op = RecordingBackward::new(ElementType::Float16);

    let (result, events) = capture(|| binding.backward(true, &mut op, &FixedCapability::new(5, 0)));

    assert_eq!(result, Ok(true));
    assert_eq!(op.calls[0].math, Precision::Full);
    assert!(info_events(&events).is_empty());
}

#[test]
fn full_precision_gradients_stay_full_on_every_engine() {
    for engine in ["", "TENSORCORE"] {
        for name in ["FCGradient", "FCTransposedGradient"] {
            let binding = resolve(name, engine).unwrap();
            for flag in [false, true] {
                let mut op = RecordingBackward::new(ElementType::Float32);
                let caps = CountingProvider::new(8);
                binding.backward(flag, &mut op, &caps).unwrap();
                assert_eq!(op.calls[0].data(), [Precision::Full; 7]);
                assert_eq!(op.calls[0].math, Precision::Full);
                assert!(caps.queries().is_empty());
            }
        }
    }
}

#[test]
fn default_engine_honors_the_flag() {
    let caps = FixedCapability::new(7, 0);
    for name in ["FC", "FCTransposed"] {
        let binding = lookup(name, Engine::Default).unwrap();
        let mut op = RecordingForward::new(ElementType::Float16);
        binding.forward(true, &mut op, &caps).unwrap();
        binding.forward(false, &mut op, &caps).unwrap();
        assert_eq!(op.calls[0].math, Precision::Half);
        assert_eq!(op.calls[1].math, Precision::Full);
    }
}

#[test]
fn transposed_and_plain_bindings_dispatch_identically() {
    let caps = FixedCapability::new(5, 0);
    for engine in [Engine::Default, Engine::HighThroughput] {
        let plain = lookup("FC", engine).unwrap();
        let transposed = lookup("FCTransposed", engine).unwrap();
        assert_ne!(plain.layout, transposed.layout);

        for input in [ElementType::Float32, ElementType::Float16] {
            for flag in [false, true] {
                let mut a = RecordingForward::new(input);
                let mut b = RecordingForward::new(input);
                plain.forward(flag, &mut a, &caps).unwrap();
                transposed.forward(flag, &mut b, &caps).unwrap();
                assert_eq!(a.calls, b.calls);
                if input == ElementType::Float32 {
                    assert_eq!(a.calls[0].data(), [Precision::Full; 4]);
                    assert_eq!(a.calls[0].math, Precision::Full);
                }
            }
        }
    }
}

#[test]
fn wrong_direction_is_rejected() {
    let caps = FixedCapability::new(7, 0);
    let gradient = lookup("FCGradient", Engine::Default).unwrap();
    assert_eq!(gradient.direction, Direction::Backward);

    let mut fwd = RecordingForward::new(ElementType::Float32);
    assert_eq!(
        gradient.forward(false, &mut fwd, &caps),
        Err(MockError::Dispatch(DispatchError::DirectionMismatch {
            name: "FCGradient"
        }))
    );
    assert!(fwd.calls.is_empty());

    let forward = lookup("FC", Engine::Default).unwrap();
    let mut bwd = RecordingBackward::new(ElementType::Float32);
    assert!(forward.backward(false, &mut bwd, &caps).is_err());
    assert!(bwd.calls.is_empty());
}
