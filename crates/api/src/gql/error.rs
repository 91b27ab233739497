use crate::error::LadderError;

/// Unified error type for GraphQL resolvers.
///
/// async-graphql has a blanket `impl<T: Display + Send + Sync + 'static> From<T> for Error`,
/// so any type implementing `Display` auto-converts via `?`.
///
/// This enum gives us:
///   - `From<sqlx::Error>`: logs the DB detail, shows a sanitized message to clients
///   - `From<LadderError>`: operator-facing messages, DB and invariant failures are logged and hidden
#[derive(Debug)]
pub enum GqlError {
    Sqlx(sqlx::Error),
    Ladder(LadderError),
}

impl std::fmt::Display for GqlError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            GqlError::Sqlx(e) | GqlError::Ladder(LadderError::Database(e)) => {
                // Log the real error server-side; return a generic message to clients
                tracing::error!("Database error: {e}");
                write!(f, "Internal database error")
            }
            GqlError::Ladder(LadderError::Invariant(msg)) => {
                tracing::error!("Invariant violated: {msg}");
                write!(f, "Internal error")
            }
            GqlError::Ladder(e) => write!(f, "{e}"),
        }
    }
}

impl std::error::Error for GqlError {}

impl From<sqlx::Error> for GqlError {
    fn from(e: sqlx::Error) -> Self {
        GqlError::Sqlx(e)
    }
}

impl From<LadderError> for GqlError {
    fn from(e: LadderError) -> Self {
        GqlError::Ladder(e)
    }
}

/// Extension trait that converts any `Result<T, E>` where `E: Display`
/// into `async_graphql::Result<T>` with a contextual message prefix.
///
/// Usage: `loader.load_one(id).await.gql_err("Data loading failed")?`
pub trait ResultExt<T> {
    fn gql_err(self, context: &str) -> std::result::Result<T, async_graphql::Error>;
}

impl<T, E: std::fmt::Display> ResultExt<T> for std::result::Result<T, E> {
    fn gql_err(self, context: &str) -> std::result::Result<T, async_graphql::Error> {
        self.map_err(|e| async_graphql::Error::new(format!("{context}: {e}")))
    }
}

/// Converts engine results into resolver results, keeping database detail
/// out of client responses.
pub trait LadderResultExt<T> {
    fn gql(self) -> async_graphql::Result<T>;
}

impl<T, E: Into<GqlError>> LadderResultExt<T> for Result<T, E> {
    fn gql(self) -> async_graphql::Result<T> {
        self.map_err(|e| {
            let err: GqlError = e.into();
            async_graphql::Error::from(err)
        })
    }
}
