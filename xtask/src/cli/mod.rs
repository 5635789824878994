mod request;
mod types;

pub use request::{Request, USAGE};
pub use types::Cli;
