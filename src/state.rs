use sqlx::PgPool;

/// Shared application state handed to every handler. The pool is built once
/// at startup and injected here rather than living in a global.
#[derive(Clone)]
pub struct AppState {
    pub pool: PgPool,
}

impl AppState {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}
