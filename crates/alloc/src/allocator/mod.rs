//! Allocators and the combinators that compose them
//!
//! ## Modules
//! - `traits` - Capability traits and the `AllocatorExt` builder layer
//! - `stack` - Region allocator with LIFO reclamation
//! - `fallback` - Primary/secondary composition
//! - `managed` - Observer-instrumented wrapper
//! - `limited` - Size-filtered wrapper
//!
//! Composites wrap any allocator, including other composites, and forward
//! exactly the capabilities their components support.

pub mod fallback;
pub mod limited;
pub mod managed;
pub mod stack;
pub mod traits;

pub use fallback::TryAllocator;
pub use limited::{LimitedAllocator, MaxAllocator, MinAllocator};
pub use managed::ManagedAllocator;
pub use stack::{StackAllocator, StackConfig, StackFrame, StackMarker};
pub use traits::{
    AlignedAllocator, AllocateAll, Allocator, AllocatorExt, DeallocateAll, Owns,
    ResizableAllocator,
};
