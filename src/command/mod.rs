//! Sandboxed command surface
//!
//! A line of text can only reach three names: `Vector2D`, `engine` and `obj`.
//! It is tokenized, parsed into [`Command`]s and run against the engine.

pub mod interpreter;
pub mod lexer;
pub mod parser;

pub use interpreter::{CommandInterpreter, Value};
pub use parser::{Command, Expr, parse};
