use sqlx::mysql::MySqlDatabaseError;
use thiserror::Error;

pub const ER_ACCESS_DENIED_ERROR: u16 = 1045;
pub const ER_BAD_DB_ERROR: u16 = 1049;

#[derive(Debug, Error)]
pub enum Error {
    #[error("Access denied: Check user name or password. ({0})")]
    AccessDenied(String),

    #[error("Database does not exist. ({0})")]
    UnknownDatabase(String),

    #[error("Server warning treated as error: {0}")]
    Warning(String),

    #[error("{0}")]
    Database(String),

    #[error("Invalid configuration: {0}")]
    Config(String),
}

impl Error {
    pub fn from_server_code(code: u16, message: String) -> Self {
        match code {
            ER_ACCESS_DENIED_ERROR => Self::AccessDenied(message),
            ER_BAD_DB_ERROR => Self::UnknownDatabase(message),
            _ => Self::Database(format!("{} ({})", message, code)),
        }
    }
}

impl From<sqlx::Error> for Error {
    fn from(err: sqlx::Error) -> Self {
        let server_error = err.as_database_error().and_then(|db_err| {
            db_err
                .try_downcast_ref::<MySqlDatabaseError>()
                .map(|mysql_err| (mysql_err.number(), db_err.message().to_string()))
        });

        match server_error {
            Some((code, message)) => Self::from_server_code(code, message),
            None => Self::Database(err.to_string()),
        }
    }
}
