//! 答题卡 - 业务能力层
//!
//! 根据资料结构和答案缓存生成可打印的纯文本答题卡

use crate::models::{AnswerKey, MaterialStructure};
use crate::workflow::AnswerCache;

const BLANK: &str = "____";

/// 答题卡中的一行
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SheetLine {
    pub section_order: usize,
    pub section_name: String,
    /// 章节内题号（从1开始）
    pub question_number: usize,
    pub answer: Option<String>,
}

/// 答题卡
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AnswerSheet {
    pub title: String,
    pub generated_at: String,
    pub lines: Vec<SheetLine>,
}

impl AnswerSheet {
    pub fn build(structure: &MaterialStructure, answers: &AnswerCache) -> Self {
        let lines = structure
            .sections
            .iter()
            .enumerate()
            .flat_map(move |(i, section)| {
                let section_order = if section.order_in_material > 0 {
                    section.order_in_material
                } else {
                    i + 1
                };
                (0..section.question_count).map(move |q| SheetLine {
                    section_order,
                    section_name: section.name.clone(),
                    question_number: q + 1,
                    answer: answers
                        .get(&AnswerKey::new(section.uuid.clone(), q))
                        .map(ToString::to_string),
                })
            })
            .collect();

        Self {
            title: structure.name.clone(),
            generated_at: chrono::Local::now().format("%Y-%m-%d %H:%M:%S").to_string(),
            lines,
        }
    }

    pub fn answered(&self) -> usize {
        self.lines.iter().filter(|l| l.answer.is_some()).count()
    }

    pub fn total(&self) -> usize {
        self.lines.len()
    }

    pub fn render(&self) -> String {
        let mut out = String::new();
        out.push_str(&format!("{}\n", "=".repeat(60)));
        out.push_str(&format!("答题卡 - {}\n", self.title));
        out.push_str(&format!("生成时间: {}\n", self.generated_at));
        out.push_str(&format!("{}\n", "=".repeat(60)));

        let mut current_section: Option<usize> = None;
        for line in &self.lines {
            if current_section != Some(line.section_order) {
                current_section = Some(line.section_order);
                out.push_str(&format!("【{}】{}\n", line.section_order, line.section_name));
            }
            out.push_str(&format!(
                "  {}. {}\n",
                line.question_number,
                line.answer.as_deref().unwrap_or(BLANK)
            ));
        }

        out.push_str(&format!("{}\n", "─".repeat(60)));
        out.push_str(&format!("已作答 {}/{}\n", self.answered(), self.total()));
        out
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{Answer, SectionInfo};

    #[test]
    fn renders_answers_and_blanks_per_section() {
        let structure = MaterialStructure {
            uuid: "m".into(),
            name: "单元测验".into(),
            sections: vec![
                SectionInfo {
                    uuid: "s0".into(),
                    name: "选择题".into(),
                    order_in_material: 1,
                    question_count: 2,
                },
                SectionInfo {
                    uuid: "s1".into(),
                    name: "填空题".into(),
                    order_in_material: 2,
                    question_count: 1,
                },
            ],
        };
        let mut answers = AnswerCache::new();
        answers.record(AnswerKey::new("s0", 1), Answer::multi(["C", "A"]));
        answers.record(AnswerKey::new("s1", 0), Answer::FillInBlank(vec!["3".into(), "4".into()]));

        let sheet = AnswerSheet::build(&structure, &answers);
        assert_eq!(sheet.total(), 3);
        assert_eq!(sheet.answered(), 2);

        let text = sheet.render();
        assert!(text.contains("答题卡 - 单元测验"));
        assert!(text.contains("【1】选择题\n  1. ____\n  2. A,C\n"));
        assert!(text.contains("【2】填空题\n  1. 3 | 4\n"));
        assert!(text.ends_with("已作答 2/3\n"));
    }
}
