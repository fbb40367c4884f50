use std::env;

/// Database configuration.
///
/// Reads from the `PLANTPLAN_DATABASE_URL` environment variable, falling back
/// to `postgresql://localhost:5432/plantplan` when unset.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DbConfig {
    /// Full PostgreSQL connection URL.
    pub database_url: String,
}

impl DbConfig {
    /// Environment variable consulted by [`DbConfig::from_env`].
    pub const ENV_VAR: &str = "PLANTPLAN_DATABASE_URL";

    /// The default connection URL used when no environment variable is set.
    pub const DEFAULT_URL: &str = "postgresql://localhost:5432/plantplan";

    /// Build a config from the environment.
    pub fn from_env() -> Self {
        let database_url =
            env::var(Self::ENV_VAR).unwrap_or_else(|_| Self::DEFAULT_URL.to_owned());
        Self { database_url }
    }

    /// Build a config from an explicit URL (tests and CLI flags).
    pub fn new(database_url: impl Into<String>) -> Self {
        Self {
            database_url: database_url.into(),
        }
    }

    /// Extract the database name from the URL.
    ///
    /// Query parameters (`?sslmode=...`) are not part of the name. Returns
    /// `None` if the URL has no path component.
    pub fn database_name(&self) -> Option<&str> {
        let (start, end) = self.name_span()?;
        Some(&self.database_url[start..end]).filter(|s| !s.is_empty())
    }

    /// Return a URL pointing at the `postgres` maintenance database on the
    /// same host. Used to issue `CREATE DATABASE` when the target DB does not
    /// yet exist.
    pub fn maintenance_url(&self) -> String {
        match self.name_span() {
            Some((start, end)) => format!(
                "{}postgres{}",
                &self.database_url[..start],
                &self.database_url[end..]
            ),
            None => format!("{}/postgres", self.database_url.trim_end_matches('/')),
        }
    }

    /// Byte range of the database name: after the first `/` following the
    /// authority, up to the query string or the end of the URL.
    fn name_span(&self) -> Option<(usize, usize)> {
        let url = self.database_url.as_str();
        let authority = url.find("://")? + 3;
        let start = authority + url[authority..].find('/')? + 1;
        let end = url[start..].find('?').map_or(url.len(), |q| start + q);
        Some((start, end))
    }
}

impl Default for DbConfig {
    fn default() -> Self {
        Self::from_env()
    }
}
