//! Generates Java wrapper classes whose methods no longer declare checked
//! exceptions, rethrowing them wrapped in an unchecked one.

pub mod ast_builder;
pub mod code_generator;
pub mod config;
pub mod error;
pub mod java_ast;
pub mod orchestrator;
pub mod parser;
pub mod sink;
pub mod source;
pub mod transformations;
pub mod types;
