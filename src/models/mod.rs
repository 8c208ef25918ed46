pub mod entry;
pub mod report;

pub use entry::{display_path, DirectoryEntry, ReadOutcome};
pub use report::Report;
