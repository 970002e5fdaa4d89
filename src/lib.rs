pub mod error;
pub mod provisioner;
pub mod schema;
pub mod utils;

pub use error::Error;
pub use provisioner::{exit_status, ProvisionReport, Provisioner, TableOutcome, TableStatus};
