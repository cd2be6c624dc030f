//! Abstract syntax tree for the source language.
//!
//! A pure data description of parsed programs with a string-dumping helper
//! for debugging; nothing here evaluates or lowers to bytecode yet. Note
//! that floating-point literals exist only at this level: no bytecode
//! instruction operates on them.

mod node;

pub use node::{
    BinaryOperation, Expression, Literal, Parameter, Statement, UnaryOperation,
};
