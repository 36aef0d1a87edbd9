pub mod dates;
pub mod error;
pub mod inspect;
pub mod io;
pub mod model;
pub mod normalize;
pub mod pipeline;
pub mod roster;
pub mod status;

pub use error::{Result, ToolError};
