pub mod ast;
pub mod config;
pub mod diagnostic;
pub mod error;
pub mod http;
pub mod interpreter;
pub mod module;
pub mod parser;
pub mod resolver;
pub mod runner;
pub mod scanner;
pub mod value;

mod builtins;
mod callable;
mod class;
mod dict;
mod environment;
mod handle;
mod instance;
mod shared_list;
mod token;

pub use crate::shared_list::SharedList;
