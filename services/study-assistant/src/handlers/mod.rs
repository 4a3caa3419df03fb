pub mod health;
pub mod notes;
pub mod study;
pub mod upload;

pub use health::*;
pub use notes::*;
pub use study::*;
pub use upload::*;
