pub mod answer_sheet;
pub mod section_cutter;

pub use answer_sheet::{AnswerSheet, SheetLine};
pub use section_cutter::{Cut, CutExam, CutKind, CutQuestion, CutSection, SectionCutter};
