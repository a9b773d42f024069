//! Loads Doxygen `navtreedata.js` scripts into an immutable navigation store.

pub mod config;
pub mod language;
pub mod navtree;
pub mod tools;

pub use config::NavConfig;
pub use navtree::{
    AnchorIndex, Children, LoadError, LoadReport, Loader, MalformedNodeError, NavigationStore,
    TreeNode,
};
