//! Shared data model for the page builder: component nodes and trees,
//! viewports, the editor overlay map, node paths and the key/value storage
//! abstraction used for client-local persistence.

pub mod error;
pub mod issue;
pub mod node;
pub mod overlay;
pub mod result;
pub mod storage;
pub mod viewport;
pub mod visitor;

pub use error::*;
pub use issue::*;
pub use node::*;
pub use overlay::*;
pub use result::*;
pub use storage::*;
pub use viewport::*;
pub use visitor::*;
