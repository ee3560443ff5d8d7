//! Operator instances.
//!
//! A [`FullyConnected`] (or [`FullyConnectedGradient`]) is created once when
//! the graph is built, from a registered name, an [`FcConfig`] and a host
//! kernel that does the actual math. Every [`Operator::run`] resolves the
//! instantiation afresh through the operator's [`Binding`] and calls the kernel
//! with the selected marker type and the binding's weight layout.
//!
//! Instances never share mutable state, so distinct instances may run on
//! different threads at the same time; [`run_independent`] does exactly that
//! for a batch of them. One instance runs one call at a time (`&mut self`).

use rayon::prelude::*;

use super::backward::FcBackward;
use super::binding::{lookup, Binding, Direction, WeightLayout};
use super::forward::FcForward;
use crate::config::FcConfig;
use crate::device::CapabilityProvider;
use crate::dtype::ElementType;
use crate::error::DispatchError;
use crate::types::{BackwardTypes, ForwardTypes};

/// Host-side forward math for a fully connected layer.
pub trait FcKernel {
    /// Error reported by the kernel. Dispatch failures convert into it.
    type Error: From<DispatchError>;

    /// Element type of the input tensor `X`.
    fn input_type(&self) -> ElementType;

    /// Computes `Y` with the element types of `T`.
    ///
    /// # Errors
    ///
    /// Kernel-defined.
    fn forward<T: ForwardTypes>(&mut self, layout: WeightLayout) -> Result<bool, Self::Error>;
}

/// Host-side gradient math for a fully connected layer.
pub trait FcGradientKernel {
    /// Error reported by the kernel. Dispatch failures convert into it.
    type Error: From<DispatchError>;

    /// Element type of the forward input tensor `X`.
    fn input_type(&self) -> ElementType;

    /// Computes `dX`, `dW` and `dB` with the element types of `T`.
    ///
    /// # Errors
    ///
    /// Kernel-defined.
    fn backward<T: BackwardTypes>(&mut self, layout: WeightLayout) -> Result<bool, Self::Error>;
}

/// Something a graph step can run.
pub trait Operator {
    /// Error returned by [`Operator::run`].
    type Error;

    /// Runs one pass on the device described by `caps`.
    ///
    /// # Errors
    ///
    /// Dispatch or kernel failures.
    fn run<P: CapabilityProvider + ?Sized>(&mut self, caps: &P) -> Result<bool, Self::Error>;
}

fn bind_operator(
    name: &str,
    config: FcConfig,
    direction: Direction,
) -> Result<(FcConfig, &'static Binding), DispatchError> {
    let config = config.validated()?;
    let binding = lookup(name, config.engine).ok_or_else(|| DispatchError::UnknownOperator {
        name: name.to_owned(),
        engine: config.engine.name().to_owned(),
    })?;
    if binding.direction != direction {
        return Err(DispatchError::DirectionMismatch { name: binding.name });
    }
    Ok((config, binding))
}

/// A forward fully connected operator.
#[derive(Debug)]
pub struct FullyConnected<K> {
    config: FcConfig,
    binding: &'static Binding,
    kernel: K,
}

impl<K: FcKernel> FullyConnected<K> {
    /// Creates the operator registered as `name` under `config.engine`.
    ///
    /// # Errors
    ///
    /// - [`DispatchError::InvalidConfig`] if `config` fails validation
    /// - [`DispatchError::UnknownOperator`] if nothing is registered for the pair
    /// - [`DispatchError::DirectionMismatch`] if `name` is a gradient operator
    pub fn new(name: &str, config: FcConfig, kernel: K) -> Result<Self, DispatchError> {
        let (config, binding) = bind_operator(name, config, Direction::Forward)?;
        Ok(Self {
            config,
            binding,
            kernel,
        })
    }
}

impl<K> FullyConnected<K> {
    /// The operator's configuration.
    #[must_use]
    pub const fn config(&self) -> &FcConfig {
        &self.config
    }

    /// The binding this operator dispatches through.
    #[must_use]
    pub const fn binding(&self) -> &'static Binding {
        self.binding
    }

    /// Whether the kernel is told to transpose `W`.
    #[must_use]
    pub const fn transpose_weights(&self) -> bool {
        self.binding.layout.transpose_weights()
    }

    /// The host kernel.
    #[must_use]
    pub const fn kernel(&self) -> &K {
        &self.kernel
    }

    /// Mutable access to the host kernel, e.g. to swap tensors between runs.
    pub fn kernel_mut(&mut self) -> &mut K {
        &mut self.kernel
    }

    /// Consumes the operator and returns its kernel.
    pub fn into_kernel(self) -> K {
        self.kernel
    }
}

impl<K: FcKernel> FcForward for FullyConnected<K> {
    type Error = K::Error;

    fn input_type(&self) -> ElementType {
        self.kernel.input_type()
    }

    fn device_index(&self) -> usize {
        self.config.device_index
    }

    fn run_with_types<T: ForwardTypes>(&mut self) -> Result<bool, Self::Error> {
        self.kernel.forward::<T>(self.binding.layout)
    }
}

impl<K: FcKernel> Operator for FullyConnected<K> {
    type Error = K::Error;

    fn run<P: CapabilityProvider + ?Sized>(&mut self, caps: &P) -> Result<bool, Self::Error> {
        let binding = self.binding;
        binding.forward(self.config.reduced_precision, self, caps)
    }
}

/// A fully connected gradient operator.
#[derive(Debug)]
pub struct FullyConnectedGradient<K> {
    config: FcConfig,
    binding: &'static Binding,
    kernel: K,
}

impl<K: FcGradientKernel> FullyConnectedGradient<K> {
    /// Creates the gradient operator registered as `name` under `config.engine`.
    ///
    /// # Errors
    ///
    /// Same as [`FullyConnected::new`], with the direction check reversed.
    pub fn new(name: &str, config: FcConfig, kernel: K) -> Result<Self, DispatchError> {
        let (config, binding) = bind_operator(name, config, Direction::Backward)?;
        Ok(Self {
            config,
            binding,
            kernel,
        })
    }
}

impl<K> FullyConnectedGradient<K> {
    /// The operator's configuration.
    #[must_use]
    pub const fn config(&self) -> &FcConfig {
        &self.config
    }

    /// The binding this operator dispatches through.
    #[must_use]
    pub const fn binding(&self) -> &'static Binding {
        self.binding
    }

    /// Whether the kernel is told to transpose `W`.
    #[must_use]
    pub const fn transpose_weights(&self) -> bool {
        self.binding.layout.transpose_weights()
    }

    /// The host kernel.
    #[must_use]
    pub const fn kernel(&self) -> &K {
        &self.kernel
    }

    /// Mutable access to the host kernel.
    pub fn kernel_mut(&mut self) -> &mut K {
        &mut self.kernel
    }

    /// Consumes the operator and returns its kernel.
    pub fn into_kernel(self) -> K {
        self.kernel
    }
}

impl<K: FcGradientKernel> FcBackward for FullyConnectedGradient<K> {
    type Error = K::Error;

    fn input_type(&self) -> ElementType {
        self.kernel.input_type()
    }

    fn device_index(&self) -> usize {
        self.config.device_index
    }

    fn run_with_types<T: BackwardTypes>(&mut self) -> Result<bool, Self::Error> {
        self.kernel.backward::<T>(self.binding.layout)
    }
}

impl<K: FcGradientKernel> Operator for FullyConnectedGradient<K> {
    type Error = K::Error;

    fn run<P: CapabilityProvider + ?Sized>(&mut self, caps: &P) -> Result<bool, Self::Error> {
        let binding = self.binding;
        binding.backward(self.config.reduced_precision, self, caps)
    }
}

/// Runs every operator in `ops` once, in parallel.
///
/// Results come back in the order of `ops`. A failure in one operator does not
/// stop the others.
pub fn run_independent<O, P>(ops: &mut [O], caps: &P) -> Vec<Result<bool, O::Error>>
where
    O: Operator + Send,
    O::Error: Send,
    P: CapabilityProvider + Sync + ?Sized,
{
    ops.par_iter_mut().map(|op| op.run(caps)).collect()
}
