//! Domain layer for Make Guardian
//!
//! Holds the parsed document model rules consume and the violation types
//! they produce. Nothing here touches the file system.

pub mod makefile;
pub mod violations;

// Re-export main domain types for convenience
pub use makefile::*;
pub use violations::*;
