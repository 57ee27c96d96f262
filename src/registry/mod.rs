pub mod catalog;
pub mod template;

pub use catalog::*;
pub use template::*;
