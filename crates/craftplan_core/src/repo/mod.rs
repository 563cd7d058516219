//! Repository layer abstractions and persistence implementations.
//!
//! # Responsibility
//! - Define use-case oriented data access contracts.
//! - Isolate SQLite query details from service/business orchestration.
//! - Own transaction demarcation for every public operation.
//!
//! # Invariants
//! - Each public repository operation is exactly one transaction with three
//!   terminal states: committed-success, rolled-back-failure, or
//!   committed-empty (a by-id miss).
//! - Repository writes must enforce `Project::validate()` before SQL
//!   mutations.

use rusqlite::{Connection, Transaction, TransactionBehavior};

pub mod project_repo;

use self::project_repo::RepoResult;

/// Runs `op` inside one immediate transaction on `conn`.
///
/// Commits when `op` returns `Ok`; otherwise the transaction rolls back on
/// drop. Rollback is best-effort: a failed rollback never masks the error
/// that `op` produced.
pub(crate) fn with_transaction<T, F>(conn: &mut Connection, op: F) -> RepoResult<T>
where
    F: FnOnce(&Transaction<'_>) -> RepoResult<T>,
{
    let tx = conn.transaction_with_behavior(TransactionBehavior::Immediate)?;
    match op(&tx) {
        Ok(value) => {
            tx.commit()?;
            Ok(value)
        }
        Err(err) => {
            drop(tx);
            Err(err)
        }
    }
}
