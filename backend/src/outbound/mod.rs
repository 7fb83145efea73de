//! Outbound adapters implementing the domain's driven ports.
//!
//! - **persistence**: PostgreSQL repositories using Diesel.
//! - **memory**: in-process stores for login throttling and database-less
//!   runs.
//!
//! Adapters only translate between domain types and storage
//! representations; they contain no business rules.

pub mod memory;
pub mod persistence;
