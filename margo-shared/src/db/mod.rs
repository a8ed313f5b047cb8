/// PostgreSQL access
///
/// - `pool`: connection pool creation and health check
/// - `migrations`: embedded schema migrations from `migrations/`
///
/// Query code lives on the model types in [`crate::models`]; the
/// [`crate::store::PgStore`] adapter wires them to the store trait.

pub mod migrations;
pub mod pool;
