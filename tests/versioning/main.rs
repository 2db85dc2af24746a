//! Integration tests for the effective-dated record store
//!
//! Exercises the full stack — schema registration, mutation protocol,
//! as-of resolution and archive reconstruction — through the public facade,
//! the way an embedding grid would.

mod end_to_end;
mod properties;
