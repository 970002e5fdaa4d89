use crate::error::Error;
use crate::schema::{self, TableDefinition};
use crate::utils::database::SchemaExecutor;

#[derive(Clone, Debug, PartialEq, Eq)]
pub enum TableStatus {
    Created,
    Failed(String),
    Mismatched { expected: u64, found: u64 },
}

#[derive(Clone, Debug)]
pub struct TableOutcome {
    pub name: String,
    pub status: TableStatus,
}

#[derive(Clone, Debug)]
pub struct ProvisionReport {
    pub database: String,
    pub tables: Vec<TableOutcome>,
}

impl ProvisionReport {
    pub fn is_complete(&self) -> bool {
        self.tables
            .iter()
            .all(|table| table.status == TableStatus::Created)
    }

    pub fn failed_tables(&self) -> Vec<&str> {
        self.tables
            .iter()
            .filter(|table| table.status != TableStatus::Created)
            .map(|table| table.name.as_str())
            .collect()
    }
}

pub const EXIT_SUCCESS: u8 = 0;
pub const EXIT_FATAL: u8 = 1;
pub const EXIT_PARTIAL: u8 = 2;

/// Process exit status for a finished run: fatal errors exit 1, any table
/// that is not `Created` exits 2.
pub fn exit_status(result: &Result<ProvisionReport, Error>) -> u8 {
    match result {
        Ok(report) if report.is_complete() => EXIT_SUCCESS,
        Ok(_) => EXIT_PARTIAL,
        Err(_) => EXIT_FATAL,
    }
}

pub struct Provisioner<'a, E> {
    executor: &'a mut E,
    database: &'a str,
}

impl<'a, E: SchemaExecutor> Provisioner<'a, E> {
    pub fn new(executor: &'a mut E, database: &'a str) -> Self {
        Self { executor, database }
    }

    pub async fn ensure_database(&mut self) -> Result<(), Error> {
        match self
            .executor
            .execute(&schema::create_database_statement(self.database))
            .await
        {
            Ok(_) => {
                tracing::info!("Database '{}' created or already exists.", self.database);
                Ok(())
            }
            Err(err) => {
                tracing::error!("Failed to create database: {}", err);
                Err(err)
            }
        }
    }

    pub async fn select_database(&mut self) -> Result<(), Error> {
        self.executor
            .execute(&schema::use_database_statement(self.database))
            .await
            .map_err(|err| {
                tracing::error!("Failed to select database '{}': {}", self.database, err);
                err
            })
    }

    /// Creates one table and checks its shape. Never aborts the run.
    pub async fn ensure_table(&mut self, table: &TableDefinition) -> TableOutcome {
        let status = match self.executor.execute(table.ddl).await {
            Ok(_) => self.verify_table(table).await,
            Err(err) => TableStatus::Failed(err.to_string()),
        };

        match &status {
            TableStatus::Created => tracing::info!("Creating table '{}'... OK", table.name),
            TableStatus::Failed(reason) => {
                tracing::error!("Creating table '{}'... FAILED: {}", table.name, reason)
            }
            TableStatus::Mismatched { expected, found } => tracing::error!(
                "Creating table '{}'... MISMATCH: expected {} columns, found {}",
                table.name,
                expected,
                found
            ),
        }

        TableOutcome {
            name: table.name.to_string(),
            status,
        }
    }

    async fn verify_table(&mut self, table: &TableDefinition) -> TableStatus {
        let expected = table.column_count() as u64;

        match self.executor.column_count(self.database, table.name).await {
            Ok(found) if found == expected => TableStatus::Created,
            Ok(found) => TableStatus::Mismatched { expected, found },
            Err(err) => TableStatus::Failed(format!("could not verify columns: {}", err)),
        }
    }

    pub async fn run(mut self, tables: &[TableDefinition]) -> Result<ProvisionReport, Error> {
        self.ensure_database().await?;
        self.select_database().await?;

        let mut outcomes = Vec::with_capacity(tables.len());
        for table in tables {
            outcomes.push(self.ensure_table(table).await);
        }

        Ok(ProvisionReport {
            database: self.database.to_string(),
            tables: outcomes,
        })
    }
}
