pub mod config;
pub mod logging;
pub mod error;
pub mod validation;
pub mod recovery;

pub use self::config::*;
pub use logging::*;
pub use error::*;
pub use validation::*;
pub use recovery::{recover_flashcards, recover_mindmap, recover_quiz, FailureKind, RecoveryOutput, Schema};
