//! 答题位置
//!
//! 封装"当前在哪个章节的第几题"这一信息

use std::fmt::Display;

use crate::models::AnswerKey;

/// 答题位置
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Position {
    /// 章节在资料中的索引（从0开始）
    pub section_index: usize,

    /// 章节ID
    pub section_uuid: String,

    /// 题目在章节中的索引（从0开始）
    pub question_index: usize,
}

impl Position {
    pub fn new(section_index: usize, section_uuid: impl Into<String>, question_index: usize) -> Self {
        Self {
            section_index,
            section_uuid: section_uuid.into(),
            question_index,
        }
    }

    /// 该位置在答案缓存中的键
    pub fn key(&self) -> AnswerKey {
        AnswerKey::new(self.section_uuid.clone(), self.question_index)
    }
}

impl Display for Position {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "[章节 #{} ({}) 题目 #{}]",
            self.section_index + 1,
            self.section_uuid,
            self.question_index + 1
        )
    }
}
