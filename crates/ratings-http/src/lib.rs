//! Server plumbing shared by the price-target HTTP services.

pub mod error;
pub mod server;

pub use error::{require_symbol, AppError};
pub use server::{serve, shutdown_signal};
