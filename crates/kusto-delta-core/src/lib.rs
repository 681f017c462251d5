mod error;
pub use error::DeltaError;

pub mod command;
pub use command::Command;

pub mod delta;
pub use delta::compute_delta;

pub mod parser;
pub use parser::parse_script;

pub mod schema;
pub use schema::DatabaseModel;

pub mod script;
pub use script::ScriptingContext;

/// A Result type alias that uses the crate's [`DeltaError`] type.
pub type Result<T, E = DeltaError> = core::result::Result<T, E>;
