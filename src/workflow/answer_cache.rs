//! 答案缓存
//!
//! 记录用户在各题位置上最后一次输入的答案，生命周期与一次资料会话相同

use std::collections::HashMap;

use crate::models::{Answer, AnswerKey};

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct AnswerCache {
    entries: HashMap<AnswerKey, Answer>,
}

impl AnswerCache {
    pub fn new() -> Self {
        Self::default()
    }

    /// 写入答案，返回该位置之前的答案
    pub fn record(&mut self, key: AnswerKey, answer: Answer) -> Option<Answer> {
        self.entries.insert(key, answer)
    }

    pub fn get(&self, key: &AnswerKey) -> Option<&Answer> {
        self.entries.get(key)
    }

    /// 计算切换到 `target` 时需要携带的答案
    ///
    /// 当前位置与目标位置的缓存答案不同（含一方缺失）时，携带目标位置的答案；
    /// 相同或目标位置没有答案时不携带。
    pub fn carry_forward(&self, current: Option<&AnswerKey>, target: &AnswerKey) -> Option<Answer> {
        let target_answer = self.get(target);
        let current_answer = current.and_then(|key| self.get(key));
        if target_answer != current_answer {
            target_answer.cloned()
        } else {
            None
        }
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn clear(&mut self) {
        self.entries.clear();
    }

    pub fn iter(&self) -> impl Iterator<Item = (&AnswerKey, &Answer)> {
        self.entries.iter()
    }
}
