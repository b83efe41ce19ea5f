//! tasklist - a to-do list kept in a hosted Postgres table
//!
//! The `sync` module keeps a local, newest-first copy of the remote table in
//! step with it; `store` talks to the table; `cli` and `tui` are the two
//! front ends.

pub mod cli;
pub mod config;
pub mod store;
pub mod sync;
pub mod tui;
