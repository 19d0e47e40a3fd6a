use thiserror::Error;

#[derive(Error, Debug)]
pub enum StoreError {
    #[error("Store unavailable: {0}")]
    Unavailable(#[from] rusqlite::Error),

    #[error("Store lock poisoned")]
    Poisoned,
}
