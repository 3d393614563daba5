pub mod core;
pub mod cpuid;
pub mod error;
pub mod report;
