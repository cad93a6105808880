/*
 * Responsibility
 * - the meaning a repo failure carries upward
 * - Display keeps the driver detail so the error-mapping log line has it
 */
use thiserror::Error;

#[derive(Debug, Error)]
pub enum RepoError {
    #[error("db error: {0}")]
    Db(#[from] sqlx::Error),
}
