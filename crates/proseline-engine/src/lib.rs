pub mod convert;
pub mod io;
pub mod markup;
pub mod models;

// Re-export key types for easier usage
pub use convert::{ConvertError, Converter, Renderers};
pub use markup::*;
pub use models::*;
