// All protocol logic is in pdftutor-core
// This CLI acts as a thin wrapper around the core library

// CLI-specific modules
pub mod report;

// Re-export core types for convenience
pub use pdftutor_core::*;

pub use report::ReplayReport;
