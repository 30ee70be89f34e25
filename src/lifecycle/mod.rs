//! Lifecycle management subsystem.
//!
//! # Data Flow
//! ```text
//! Signals (signals.rs):
//!     SIGTERM/SIGINT → trigger Shutdown
//!
//! Shutdown (shutdown.rs):
//!     broadcast → gateway listener, admin listener stop accepting → drain → exit
//! ```

pub mod shutdown;
pub mod signals;

pub use shutdown::Shutdown;
pub use signals::shutdown_signal;
