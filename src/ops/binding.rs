//! Static binding of operator names and engines to dispatchers.
//!
//! Four operator names are registered under two engines:
//!
//! | Name                   | Direction | Weights             |
//! |------------------------|-----------|---------------------|
//! | `FC`                   | forward   | transposed (`N×K`)  |
//! | `FCTransposed`         | forward   | as stored (`K×N`)   |
//! | `FCGradient`           | backward  | transposed (`N×K`)  |
//! | `FCTransposedGradient` | backward  | as stored (`K×N`)   |
//!
//! Under [`Engine::HighThroughput`] (engine name `TENSORCORE`) the operator's
//! reduced-precision flag is ignored and dispatch always runs with it off; that
//! engine applies its own mixed-precision strategy inside the kernel.
//!
//! The table is fixed at compile time and performs no per-call decisions
//! beyond that override.

use super::backward::{dispatch_backward, FcBackward};
use super::forward::{dispatch_forward, FcForward};
use crate::device::CapabilityProvider;
use crate::error::DispatchError;

/// Pass a binding dispatches to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Direction {
    /// Forward pass.
    Forward,
    /// Gradient pass.
    Backward,
}

/// Execution strategy an operator was registered under.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum Engine {
    /// Regular matrix-multiply path.
    #[default]
    Default,
    /// Specialized high-throughput hardware path with its own precision handling.
    HighThroughput,
}

impl Engine {
    /// Registry name of this engine. The default engine has an empty name.
    #[must_use]
    pub const fn name(self) -> &'static str {
        match self {
            Self::Default => "",
            Self::HighThroughput => "TENSORCORE",
        }
    }

    /// Parses a registry engine name.
    #[must_use]
    pub fn from_name(name: &str) -> Option<Self> {
        match name.trim() {
            "" | "DEFAULT" => Some(Self::Default),
            "TENSORCORE" => Some(Self::HighThroughput),
            _ => None,
        }
    }
}

/// Memory layout of the weight operand.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum WeightLayout {
    /// `W` is stored `N×K` and used transposed.
    Transposed,
    /// `W` is stored `K×N` and used as is.
    NoTranspose,
}

impl WeightLayout {
    /// Whether the kernel must transpose `W`.
    #[must_use]
    pub const fn transpose_weights(self) -> bool {
        matches!(self, Self::Transposed)
    }
}

/// One registered operator identity.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Binding {
    /// Operator name.
    pub name: &'static str,
    /// Pass this binding runs.
    pub direction: Direction,
    /// Engine this binding is registered under.
    pub engine: Engine,
    /// Weight layout assumed by the kernel.
    pub layout: WeightLayout,
}

const fn bind(
    name: &'static str,
    direction: Direction,
    engine: Engine,
    layout: WeightLayout,
) -> Binding {
    Binding {
        name,
        direction,
        engine,
        layout,
    }
}

/// Every registered fully connected operator.
pub static BINDINGS: [Binding; 8] = [
    bind("FC", Direction::Forward, Engine::Default, WeightLayout::Transposed),
    bind("FCTransposed", Direction::Forward, Engine::Default, WeightLayout::NoTranspose),
    bind("FCGradient", Direction::Backward, Engine::Default, WeightLayout::Transposed),
    bind("FCTransposedGradient", Direction::Backward, Engine::Default, WeightLayout::NoTranspose),
    bind("FC", Direction::Forward, Engine::HighThroughput, WeightLayout::Transposed),
    bind("FCTransposed", Direction::Forward, Engine::HighThroughput, WeightLayout::NoTranspose),
    bind("FCGradient", Direction::Backward, Engine::HighThroughput, WeightLayout::Transposed),
    bind(
        "FCTransposedGradient",
        Direction::Backward,
        Engine::HighThroughput,
        WeightLayout::NoTranspose,
    ),
];

/// Finds the binding registered for `name` under `engine`.
#[must_use]
pub fn lookup(name: &str, engine: Engine) -> Option<&'static Binding> {
    BINDINGS.iter().find(|b| b.name == name && b.engine == engine)
}

/// Finds the binding for `name` under the engine named `engine_name`.
///
/// # Errors
///
/// [`DispatchError::UnknownOperator`] if the engine name is not recognized or
/// nothing is registered for the pair.
pub fn resolve(name: &str, engine_name: &str) -> Result<&'static Binding, DispatchError> {
    Engine::from_name(engine_name)
        .and_then(|engine| lookup(name, engine))
        .ok_or_else(|| DispatchError::UnknownOperator {
            name: name.to_owned(),
            engine: engine_name.to_owned(),
        })
}

impl Binding {
    /// The precision flag this binding dispatches with, given the operator's own.
    #[must_use]
    pub const fn reduced_precision(&self, configured: bool) -> bool {
        match self.engine {
            Engine::Default => configured,
            Engine::HighThroughput => false,
        }
    }

    /// Runs the forward dispatcher for `op`.
    ///
    /// # Errors
    ///
    /// [`DispatchError::DirectionMismatch`] on a backward binding, otherwise
    /// whatever [`dispatch_forward`] returns.
    pub fn forward<Op, P>(&self, configured: bool, op: &mut Op, caps: &P) -> Result<bool, Op::Error>
    where
        Op: FcForward,
        P: CapabilityProvider + ?Sized,
    {
        if self.direction != Direction::Forward {
            return Err(DispatchError::DirectionMismatch { name: self.name }.into());
        }
        dispatch_forward(self.reduced_precision(configured), op, caps)
    }

    /// Runs the backward dispatcher for `op`.
    ///
    /// # Errors
    ///
    /// [`DispatchError::DirectionMismatch`] on a forward binding, otherwise
    /// whatever [`dispatch_backward`] returns.
    pub fn backward<Op, P>(
        &self,
        configured: bool,
        op: &mut Op,
        caps: &P,
    ) -> Result<bool, Op::Error>
    where
        Op: FcBackward,
        P: CapabilityProvider + ?Sized,
    {
        if self.direction != Direction::Backward {
            return Err(DispatchError::DirectionMismatch { name: self.name }.into());
        }
        dispatch_backward(self.reduced_precision(configured), op, caps)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn every_name_is_registered_under_both_engines() {
        for name in ["FC", "FCTransposed", "FCGradient", "FCTransposedGradient"] {
            for engine in [Engine::Default, Engine::HighThroughput] {
                let binding = lookup(name, engine).unwrap();
                assert_eq!(binding.engine, engine);
                assert_eq!(binding.direction == Direction::Backward, name.ends_with("Gradient"));
                assert_eq!(binding.layout.transpose_weights(), !name.contains("Transposed"));
            }
        }
    }

    #[test]
    fn high_throughput_overrides_the_flag() {
        let tc = lookup("FC", Engine::HighThroughput).unwrap();
        assert!(!tc.reduced_precision(true));
        let default = lookup("FC", Engine::Default).unwrap();
        assert!(default.reduced_precision(true));
        assert!(!default.reduced_precision(false));
    }

    #[test]
    fn resolves_engine_names() {
        assert_eq!(resolve("FCGradient", "TENSORCORE").unwrap().engine, Engine::HighThroughput);
        assert_eq!(resolve("FCGradient", "").unwrap().engine, Engine::Default);
        assert_eq!(
            resolve("FC", "CUDNN"),
            Err(DispatchError::UnknownOperator {
                name: "FC".into(),
                engine: "CUDNN".into()
            })
        );
        assert!(resolve("Conv", "").is_err());
    }

    #[test]
    fn engine_names_round_trip() {
        for engine in [Engine::Default, Engine::HighThroughput] {
            assert_eq!(Engine::from_name(engine.name()), Some(engine));
        }
    }
}
