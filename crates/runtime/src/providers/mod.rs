//! Decision sources that do not need a script or a human.

pub mod builtin;

pub use builtin::BuiltinAi;
