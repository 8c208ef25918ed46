pub mod filter;
pub mod reader;
pub mod traversal;

pub use filter::PathFilter;
pub use reader::{read_file, FileReader, FsReader};
pub use traversal::{ExclusionSet, TraversalSource};
