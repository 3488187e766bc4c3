pub mod aggregator;
pub mod environment;
pub mod error;
pub mod message;
pub mod telemetry;
pub mod types;

pub use aggregator::*;
pub use environment::*;
pub use error::*;
pub use message::*;
pub use types::*;
