//! Operation vocabulary for the task store

pub mod registry;

pub use registry::{lookup, OperationDescriptor, ParamSpec, RenderStyle, ValueRole};
