use crate::error::Error;
use crate::schema;
use std::env;

#[derive(Clone, Debug)]
pub struct DatabaseConfig {
    pub host: String,
    pub port: u16,
    pub user: String,
    pub password: String,
    pub raise_on_warnings: bool,
}

#[derive(Clone, Debug)]
pub struct Config {
    pub database: DatabaseConfig,
    pub database_name: String,
}

pub fn get_config() -> Result<Config, Error> {
    get_config_from(|key| env::var(key).ok())
}

pub fn get_config_from<F>(lookup: F) -> Result<Config, Error>
where
    F: Fn(&str) -> Option<String>,
{
    let host = lookup("DB_HOST").unwrap_or_else(|| "localhost".to_string());
    let port = lookup("DB_PORT")
        .unwrap_or_else(|| "3306".to_string())
        .parse::<u16>()
        .map_err(|_| Error::Config("Invalid DB_PORT number".to_string()))?;
    let user = lookup("DB_USER").unwrap_or_else(|| "root".to_string());
    let password = lookup("DB_PASSWORD").unwrap_or_default();
    let raise_on_warnings = match lookup("DB_RAISE_ON_WARNINGS") {
        Some(raw) => parse_flag(&raw).ok_or_else(|| {
            Error::Config(format!(
                "DB_RAISE_ON_WARNINGS must be one of true/false/1/0/yes/no, got '{}'",
                raw
            ))
        })?,
        None => true,
    };
    let database_name =
        lookup("DB_NAME").unwrap_or_else(|| schema::DATABASE_NAME.to_string());

    if !schema::is_valid_identifier(&database_name) {
        return Err(Error::Config(format!(
            "DB_NAME '{}' is not a plain identifier",
            database_name
        )));
    }

    Ok(Config {
        database: DatabaseConfig {
            host,
            port,
            user,
            password,
            raise_on_warnings,
        },
        database_name,
    })
}

fn parse_flag(raw: &str) -> Option<bool> {
    match raw.trim().to_ascii_lowercase().as_str() {
        "true" | "1" | "yes" => Some(true),
        "false" | "0" | "no" => Some(false),
        _ => None,
    }
}
