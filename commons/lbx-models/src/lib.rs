pub mod enums;
pub mod requests;
pub mod resources;
pub mod status_tree;

pub use enums::*;
pub use requests::*;
pub use resources::*;
pub use status_tree::*;
