//! Model Context Protocol tool server
//!
//! Lets an agent record consumptions and list people over stdio.

mod protocol;
mod server;
mod tools;

pub use server::McpServer;
