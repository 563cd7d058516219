//! Domain model for the project aggregate.
//!
//! # Responsibility
//! - Define the canonical project record and its child entities.
//! - Keep validation rules next to the data they protect.
//!
//! # Invariants
//! - `project_id` is store-assigned and never reused once set.
//! - Child collections are always initialized; "summary vs hydrated" is a
//!   repository contract, not a type-level distinction.

pub mod project;
