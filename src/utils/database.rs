use crate::error::Error;
use crate::schema;
use crate::utils::config::DatabaseConfig;
use async_trait::async_trait;
use sqlx::mysql::{MySqlConnectOptions, MySqlConnection};
use sqlx::{ConnectOptions, Connection, Executor, Row};

/// The statements the provisioner needs from a database session.
#[async_trait]
pub trait SchemaExecutor: Send {
    async fn execute(&mut self, statement: &str) -> Result<(), Error>;

    async fn column_count(&mut self, database: &str, table: &str) -> Result<u64, Error>;
}

pub struct MySqlSession {
    conn: MySqlConnection,
    raise_on_warnings: bool,
}

pub async fn connect(config: &DatabaseConfig) -> Result<MySqlSession, Error> {
    let conn = MySqlConnectOptions::new()
        .host(&config.host)
        .port(config.port)
        .username(&config.user)
        .password(&config.password)
        .charset(schema::DATABASE_CHARSET)
        .log_statements(log::LevelFilter::Debug)
        .connect()
        .await?;

    tracing::info!(
        "Connected to database server at {}:{}",
        config.host,
        config.port
    );

    Ok(MySqlSession {
        conn,
        raise_on_warnings: config.raise_on_warnings,
    })
}

impl MySqlSession {
    pub fn connection(&mut self) -> &mut MySqlConnection {
        &mut self.conn
    }

    pub async fn close(self) -> Result<(), Error> {
        self.conn.close().await?;
        tracing::debug!("Database connection closed");
        Ok(())
    }

    async fn check_warnings(&mut self) -> Result<(), Error> {
        let rows = self.conn.fetch_all("SHOW WARNINGS").await?;

        let warnings = rows
            .iter()
            .map(|row| -> Result<(String, String), Error> {
                Ok((row.try_get("Level")?, row.try_get("Message")?))
            })
            .collect::<Result<Vec<_>, _>>()?;

        raise_warnings(warnings)
    }
}

/// Fails on any `Warning` or `Error` row. Notes are skipped: IF NOT EXISTS on
/// an existing object raises one.
pub fn raise_warnings<I>(rows: I) -> Result<(), Error>
where
    I: IntoIterator<Item = (String, String)>,
{
    let warnings: Vec<String> = rows
        .into_iter()
        .filter(|(level, _)| !level.eq_ignore_ascii_case("note"))
        .map(|(level, message)| format!("{}: {}", level, message))
        .collect();

    if warnings.is_empty() {
        Ok(())
    } else {
        Err(Error::Warning(warnings.join("; ")))
    }
}

#[async_trait]
impl SchemaExecutor for MySqlSession {
    async fn execute(&mut self, statement: &str) -> Result<(), Error> {
        self.conn.execute(statement).await?;

        if self.raise_on_warnings {
            self.check_warnings().await?;
        }

        Ok(())
    }

    async fn column_count(&mut self, database: &str, table: &str) -> Result<u64, Error> {
        let count: i64 = sqlx::query_scalar(
            "
            SELECT COUNT(*)
            FROM information_schema.COLUMNS
            WHERE TABLE_SCHEMA = ? AND TABLE_NAME = ?
            ",
        )
        .bind(database)
        .bind(table)
        .fetch_one(&mut self.conn)
        .await?;

        Ok(count.max(0) as u64)
    }
}

#[cfg(test)]
mod test {
    use super::*;

    fn row(level: &str, message: &str) -> (String, String) {
        (level.to_string(), message.to_string())
    }

    #[test]
    fn should_pass_without_warnings() {
        assert!(raise_warnings(vec![]).is_ok());
    }

    #[test]
    fn should_ignore_notes() {
        let rows = vec![
            row("Note", "Can't create database 'premium_restaurant'; database exists"),
            row("note", "Table 'orders' already exists"),
        ];

        assert!(raise_warnings(rows).is_ok());
    }

    #[test]
    fn should_fail_on_warning() {
        let rows = vec![row("Warning", "Integer display width is deprecated")];

        assert!(matches!(raise_warnings(rows), Err(Error::Warning(_))));
    }

    #[test]
    fn should_name_only_non_note_rows() {
        let rows = vec![
            row("Note", "Table 'orders' already exists"),
            row("Warning", "Integer display width is deprecated"),
            row("Error", "Unknown storage engine"),
        ];

        match raise_warnings(rows) {
            Err(Error::Warning(message)) => {
                assert_eq!(
                    message,
                    "Warning: Integer display width is deprecated; Error: Unknown storage engine"
                );
                assert!(!message.contains("already exists"));
            }
            other => panic!("expected a warning error, got {:?}", other),
        }
    }
}
