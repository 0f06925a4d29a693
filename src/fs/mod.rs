//! FileSystem abstraction over the project being analyzed

mod mock;
mod project;
mod real;
mod r#trait;

pub use mock::MockFileSystem;
pub use project::Project;
pub use r#trait::{DirEntry, FileSystem, FileType};
pub use real::RealFileSystem;
