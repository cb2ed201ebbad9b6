pub mod answer_cache;
pub mod navigation;
pub mod position;

pub use answer_cache::AnswerCache;
pub use navigation::{NavOutcome, NavSnapshot, NavigationController};
pub use position::Position;
