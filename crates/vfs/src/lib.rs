//! Swappable virtual filesystem backends behind one capability contract
//!
//! [`VfsBackend`] is the sole boundary host code depends on. [`MemoryFs`]
//! reproduces hierarchical filesystem semantics over flat containers;
//! [`LocalFs`] forwards to the real disk. Decorators ([`PassthroughFs`],
//! [`EventingFs`]) wrap any backend without altering call sites.

pub mod backend;
pub mod decorator;
pub mod error;
pub mod eventing;
pub mod ext;
pub mod local;
pub mod memory;

mod path;

pub use backend::{FileMetadata, VfsBackend};
pub use decorator::PassthroughFs;
pub use error::VfsError;
pub use eventing::{EventHandler, EventingFs, FsEvent};
pub use ext::{append_file_lines, read_file_lines, read_file_text, write_file_text};
pub use local::LocalFs;
pub use memory::MemoryFs;
