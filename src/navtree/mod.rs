pub mod errors;
pub mod index;
pub mod loader;
pub mod node;
pub mod store;
pub mod walk;

pub use errors::{LoadError, LoadIssue, LoadIssueKind, MalformedNodeError};
pub use index::{AnchorIndex, IndexChunk};
pub use loader::{LoadReport, Loader, SourceFile};
pub use node::{Children, TreeNode};
pub use store::{NavigationStore, SyncMessages};
pub use walk::{Visit, Walk};
