use serde::{Deserialize, Serialize};
use std::fmt;

use super::question::UiType;

/// 用户答案
///
/// 每种题型对应一种答案形态，多选答案在构造时排序去重，
/// 保证"选了同样的选项"总是相等。
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "uiType", content = "value", rename_all = "snake_case")]
pub enum Answer {
    SingleSelection(String),
    MultiSelection(Vec<String>),
    FillInBlank(Vec<String>),
    Calculation(String),
    ShortAnswer(String),
}

impl Answer {
    /// 创建多选答案（排序去重）
    pub fn multi<I, S>(values: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Answer::MultiSelection(values.into_iter().map(Into::into).collect()).normalized()
    }

    pub fn ui_type(&self) -> UiType {
        match self {
            Answer::SingleSelection(_) => UiType::SingleSelection,
            Answer::MultiSelection(_) => UiType::MultiSelection,
            Answer::FillInBlank(_) => UiType::FillInBlank,
            Answer::Calculation(_) => UiType::Calculation,
            Answer::ShortAnswer(_) => UiType::ShortAnswer,
        }
    }

    pub fn normalized(self) -> Self {
        match self {
            Answer::MultiSelection(mut values) => {
                values.sort();
                values.dedup();
                Answer::MultiSelection(values)
            }
            other => other,
        }
    }

    /// 选择题选中的选项；非选择题返回空
    pub fn selected_options(&self) -> &[String] {
        match self {
            Answer::SingleSelection(value) => std::slice::from_ref(value),
            Answer::MultiSelection(values) => values,
            _ => &[],
        }
    }

    /// 按题型解析用户输入
    ///
    /// - 多选：逗号分隔（`A,C`）
    /// - 填空：竖线分隔（`3|5`）
    /// - 其余：整段文本
    ///
    /// 输入为空时返回 None
    pub fn parse(ui_type: UiType, input: &str) -> Option<Self> {
        let input = input.trim();
        if input.is_empty() {
            return None;
        }
        let split = |sep: &[char]| -> Vec<String> {
            input
                .split(sep)
                .map(str::trim)
                .filter(|s| !s.is_empty())
                .map(String::from)
                .collect()
        };
        let answer = match ui_type {
            UiType::SingleSelection => Answer::SingleSelection(input.to_string()),
            UiType::MultiSelection => Answer::multi(split(&[',', '，'][..])),
            UiType::FillInBlank => Answer::FillInBlank(input.split('|').map(|s| s.trim().to_string()).collect()),
            UiType::Calculation => Answer::Calculation(input.to_string()),
            UiType::ShortAnswer => Answer::ShortAnswer(input.to_string()),
        };
        Some(answer)
    }

    /// 作为 `answer` 查询参数发送的值
    ///
    /// 文本类答案原样发送，列表类答案发送 JSON 数组字符串
    pub fn hint_value(&self) -> String {
        match self {
            Answer::SingleSelection(v) | Answer::Calculation(v) | Answer::ShortAnswer(v) => v.clone(),
            Answer::MultiSelection(values) | Answer::FillInBlank(values) => {
                serde_json::to_string(values).unwrap_or_default()
            }
        }
    }
}

impl fmt::Display for Answer {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Answer::SingleSelection(v) | Answer::Calculation(v) | Answer::ShortAnswer(v) => f.write_str(v),
            Answer::MultiSelection(values) => f.write_str(&values.join(",")),
            Answer::FillInBlank(values) => f.write_str(&values.join(" | ")),
        }
    }
}

/// 答案缓存键：章节 + 章节内序号
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct AnswerKey {
    pub section_uuid: String,
    pub order_in_section: usize,
}

impl AnswerKey {
    pub fn new(section_uuid: impl Into<String>, order_in_section: usize) -> Self {
        Self {
            section_uuid: section_uuid.into(),
            order_in_section,
        }
    }
}

impl fmt::Display for AnswerKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}_{}", self.section_uuid, self.order_in_section)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn multi_selection_is_order_insensitive() {
        assert_eq!(Answer::multi(["C", "A", "C"]), Answer::multi(["A", "C"]));
        assert_eq!(Answer::multi(["B", "A"]).hint_value(), r#"["A","B"]"#);
    }

    #[test]
    fn parse_follows_ui_type() {
        assert_eq!(
            Answer::parse(UiType::MultiSelection, "B， A ,"),
            Some(Answer::multi(["A", "B"]))
        );
        assert_eq!(
            Answer::parse(UiType::FillInBlank, "3 | | 5"),
            Some(Answer::FillInBlank(vec!["3".into(), "".into(), "5".into()]))
        );
        assert_eq!(
            Answer::parse(UiType::Calculation, " x = 2 "),
            Some(Answer::Calculation("x = 2".into()))
        );
        assert_eq!(Answer::parse(UiType::ShortAnswer, "   "), None);
    }

    #[test]
    fn text_hint_is_sent_verbatim() {
        assert_eq!(Answer::SingleSelection("B".into()).hint_value(), "B");
        assert_eq!(
            Answer::FillInBlank(vec!["1".into(), "2".into()]).hint_value(),
            r#"["1","2"]"#
        );
    }

    #[test]
    fn serializes_with_ui_type_tag() {
        let json = serde_json::to_value(Answer::SingleSelection("A".into())).unwrap();
        assert_eq!(json, serde_json::json!({"uiType": "single_selection", "value": "A"}));
    }

    #[test]
    fn key_display_joins_section_and_order() {
        assert_eq!(AnswerKey::new("s1", 3).to_string(), "s1_3");
    }
}
