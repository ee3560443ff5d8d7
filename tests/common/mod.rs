#![allow(dead_code)]

use std::fmt;
use std::sync::{Arc, Mutex};

use fc_dispatch::device::{CapabilityProvider, DeviceCapability};
use fc_dispatch::dtype::ElementType;
use fc_dispatch::error::DispatchError;
use fc_dispatch::ops::backward::FcBackward;
use fc_dispatch::ops::forward::FcForward;
use fc_dispatch::types::{BackwardSignature, BackwardTypes, ForwardSignature, ForwardTypes};
use tracing::field::{Field, Visit};
use tracing::{Event, Level, Subscriber};
use tracing_subscriber::layer::{Context, Layer, SubscriberExt};

/// Error type for mock operators: either a dispatch failure or a kernel failure.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum MockError {
    Dispatch(DispatchError),
    Kernel(&'static str),
}

impl From<DispatchError> for MockError {
    fn from(e: DispatchError) -> Self {
        Self::Dispatch(e)
    }
}

/// What a mock kernel returns when invoked.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Outcome {
    Ok(bool),
    Fail(&'static str),
}

impl Outcome {
    fn result(self) -> Result<bool, MockError> {
        match self {
            Self::Ok(v) => Ok(v),
            Self::Fail(msg) => Err(MockError::Kernel(msg)),
        }
    }
}

/// Forward operator that records every typed invocation.
#[derive(Debug)]
pub struct RecordingForward {
    pub input: ElementType,
    pub device: usize,
    pub outcome: Outcome,
    pub calls: Vec<ForwardSignature>,
}

impl RecordingForward {
    pub fn new(input: ElementType) -> Self {
        Self {
            input,
            device: 0,
            outcome: Outcome::Ok(true),
            calls: Vec::new(),
        }
    }
}

impl FcForward for RecordingForward {
    type Error = MockError;

    fn input_type(&self) -> ElementType {
        self.input
    }

    fn device_index(&self) -> usize {
        self.device
    }

    fn run_with_types<T: ForwardTypes>(&mut self) -> Result<bool, Self::Error> {
        self.calls.push(T::signature());
        self.outcome.result()
    }
}

/// Backward operator that records every typed invocation.
#[derive(Debug)]
pub struct RecordingBackward {
    pub input: ElementType,
    pub device: usize,
    pub outcome: Outcome,
    pub calls: Vec<BackwardSignature>,
}

impl RecordingBackward {
    pub fn new(input: ElementType) -> Self {
        Self {
            input,
            device: 0,
            outcome: Outcome::Ok(true),
            calls: Vec::new(),
        }
    }
}

impl FcBackward for RecordingBackward {
    type Error = MockError;

    fn input_type(&self) -> ElementType {
        self.input
    }

    fn device_index(&self) -> usize {
        self.device
    }

    fn run_with_types<T: BackwardTypes>(&mut self) -> Result<bool, Self::Error> {
        self.calls.push(T::signature());
        self.outcome.result()
    }
}

/// Provider that counts how often it is asked.
#[derive(Debug, Default)]
pub struct CountingProvider {
    pub revision: u32,
    pub queries: Mutex<Vec<usize>>,
}

impl CountingProvider {
    pub fn new(revision: u32) -> Self {
        Self {
            revision,
            queries: Mutex::new(Vec::new()),
        }
    }

    pub fn queries(&self) -> Vec<usize> {
        self.queries.lock().unwrap().clone()
    }
}

impl CapabilityProvider for CountingProvider {
    fn query(&self, device_index: usize) -> Result<DeviceCapability, DispatchError> {
        self.queries.lock().unwrap().push(device_index);
        Ok(DeviceCapability::new(self.revision, 0))
    }
}

/// A log event seen by [`capture`].
#[derive(Debug, Clone)]
pub struct Captured {
    pub level: Level,
    pub target: String,
    pub message: String,
}

#[derive(Clone, Default)]
struct CaptureLayer(Arc<Mutex<Vec<Captured>>>);

struct MessageVisitor(String);

impl Visit for MessageVisitor {
    fn record_debug(&mut self, field: &Field, value: &dyn fmt::Debug) {
        if field.name() == "message" {
            self.0 = format!("{value:?}");
        }
    }
}

impl<S: Subscriber> Layer<S> for CaptureLayer {
    fn on_event(&self, event: &Event<'_>, _ctx: Context<'_, S>) {
        let mut visitor = MessageVisitor(String::new());
        event.record(&mut visitor);
        self.0.lock().unwrap().push(Captured {
            level: *event.metadata().level(),
            target: event.metadata().target().to_owned(),
            message: visitor.0,
        });
    }
}

/// Runs `f` with a subscriber that records every event on this thread.
pub fn capture<R>(f: impl FnOnce() -> R) -> (R, Vec<Captured>) {
    let layer = CaptureLayer::default();
    let subscriber = tracing_subscriber::registry().with(layer.clone());
    let out = tracing::subscriber::with_default(subscriber, f);
    let events = layer.0.lock().unwrap().clone();
    (out, events)
}

/// Informational events emitted by this crate.
pub fn info_events(events: &[Captured]) -> Vec<&Captured> {
    events
        .iter()
        .filter(|e| e.level == Level::INFO && e.target.starts_with("fc_dispatch"))
        .collect()
}
