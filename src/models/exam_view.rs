use serde::{Deserialize, Serialize};
use serde_json::Value;

use super::material::{MaterialStructure, SectionInfo};

/// 试卷视图（`POST /v1/exam/view` 的响应）
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ExamView {
    pub name: String,
    #[serde(default)]
    pub description: String,
    #[serde(default)]
    pub sections: Vec<ExamViewSection>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ExamViewSection {
    pub uuid: String,
    pub name: String,
    /// 题目列表，字段由后端决定，这里原样保留
    #[serde(default)]
    pub question_list: Vec<Value>,
}

impl ExamView {
    /// 转为可导航的资料结构
    pub fn to_structure(&self, exam_uuid: &str) -> MaterialStructure {
        MaterialStructure {
            uuid: exam_uuid.to_string(),
            name: self.name.clone(),
            sections: self
                .sections
                .iter()
                .enumerate()
                .map(|(i, s)| SectionInfo {
                    uuid: s.uuid.clone(),
                    name: s.name.clone(),
                    order_in_material: i + 1,
                    question_count: s.question_list.len(),
                })
                .collect(),
        }
    }

    pub fn question_count(&self) -> usize {
        self.sections.iter().map(|s| s.question_list.len()).sum()
    }
}
