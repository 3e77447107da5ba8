//! Command implementations.

pub mod run;
pub mod status;
pub mod verify;

pub use self::run::execute_run;
pub use self::status::execute_status;
pub use self::verify::execute_verify;
