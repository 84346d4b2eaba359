//! Todo Pilot - natural language front end for the `todo` CLI

pub mod core;
pub mod directive;
pub mod exec;
pub mod llm;
pub mod ops;
pub mod session;
pub mod store;
pub mod weather;
