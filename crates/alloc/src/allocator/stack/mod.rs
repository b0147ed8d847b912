//! Region allocator with LIFO reclamation
//!
//! ## Modules
//! - `allocator` - `StackAllocator`, a bump allocator over one fixed buffer
//! - `config` - Debug fill patterns and presets
//! - `frame` - RAII helper for automatic cursor restoration
//! - `marker` - Cursor positions for scoped release
pub mod allocator;
pub mod config;
pub mod frame;
pub mod marker;
pub use allocator::StackAllocator;
pub use config::StackConfig;
pub use frame::StackFrame;
pub use marker::StackMarker;
