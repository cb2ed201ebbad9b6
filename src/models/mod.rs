pub mod answer;
pub mod exam_view;
pub mod material;
pub mod question;

pub use answer::{Answer, AnswerKey};
pub use exam_view::{ExamView, ExamViewSection};
pub use material::{MaterialStructure, SectionInfo};
pub use question::{Question, QuestionContent, UiType};
