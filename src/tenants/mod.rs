//! Tenant content subsystem.
//!
//! # Data Flow
//! ```text
//! Rewritten request /{tenant}/{page}
//!     → resolver.rs (strip scheme, look up, pick page)
//!     → directory.rs (TenantDirectory: in-memory, snapshot-backed)
//!     → FunnelPage content, or not found
//! ```

pub mod directory;
pub mod resolver;
pub mod types;

pub use directory::{DirectoryError, InMemoryDirectory, TenantDirectory};
pub use resolver::{resolve_landing, resolve_page, strip_scheme, ResolveError};
pub use types::{Funnel, FunnelPage};
