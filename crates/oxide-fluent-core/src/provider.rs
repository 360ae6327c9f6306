//! Database provider identifiers.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::FluentError;

/// A database engine a migration can target.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum DatabaseProvider {
    /// Microsoft SQL Server.
    SqlServer,
    /// SQLite.
    Sqlite,
    /// PostgreSQL.
    Postgres,
    /// MySQL / MariaDB.
    MySql,
}

impl DatabaseProvider {
    /// Returns the canonical provider name.
    #[must_use]
    pub const fn name(self) -> &'static str {
        match self {
            Self::SqlServer => "sqlserver",
            Self::Sqlite => "sqlite",
            Self::Postgres => "postgres",
            Self::MySql => "mysql",
        }
    }
}

impl fmt::Display for DatabaseProvider {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for DatabaseProvider {
    type Err = FluentError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "sqlserver" | "mssql" => Ok(Self::SqlServer),
            "sqlite" => Ok(Self::Sqlite),
            "postgres" | "postgresql" => Ok(Self::Postgres),
            "mysql" | "mariadb" => Ok(Self::MySql),
            _ => Err(FluentError::UnknownProvider(s.to_string())),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_aliases() {
        assert_eq!(
            "MSSQL".parse::<DatabaseProvider>().unwrap(),
            DatabaseProvider::SqlServer
        );
        assert_eq!(
            "postgresql".parse::<DatabaseProvider>().unwrap(),
            DatabaseProvider::Postgres
        );
        assert_eq!(
            "SQLite".parse::<DatabaseProvider>().unwrap(),
            DatabaseProvider::Sqlite
        );
    }

    #[test]
    fn test_parse_unknown() {
        let err = "oracle".parse::<DatabaseProvider>().unwrap_err();
        assert!(matches!(err, FluentError::UnknownProvider(name) if name == "oracle"));
    }

    #[test]
    fn test_display_round_trips() {
        for provider in [
            DatabaseProvider::SqlServer,
            DatabaseProvider::Sqlite,
            DatabaseProvider::Postgres,
            DatabaseProvider::MySql,
        ] {
            assert_eq!(provider.to_string().parse::<DatabaseProvider>().unwrap(), provider);
        }
    }
}
