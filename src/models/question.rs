use regex::Regex;
use serde::{Deserialize, Deserializer, Serialize};
use std::fmt;

use super::material::deserialize_index;

/// 题型（决定答题控件和答案形态）
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum UiType {
    SingleSelection,
    MultiSelection,
    FillInBlank,
    Calculation,
    ShortAnswer,
}

impl UiType {
    pub fn as_str(&self) -> &'static str {
        match self {
            UiType::SingleSelection => "single_selection",
            UiType::MultiSelection => "multi_selection",
            UiType::FillInBlank => "fill_in_blank",
            UiType::Calculation => "calculation",
            UiType::ShortAnswer => "short_answer",
        }
    }

    /// 是否为选择题
    pub fn is_choice(&self) -> bool {
        matches!(self, UiType::SingleSelection | UiType::MultiSelection)
    }
}

impl fmt::Display for UiType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// 题目内容：Markdown 文本 + 图片引用
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct QuestionContent {
    pub text: String,
    pub images: Vec<String>,
}

impl QuestionContent {
    /// 创建题目内容，并把正文中内嵌的图片合并进图片列表
    pub fn new(text: impl Into<String>, images: Vec<String>) -> Self {
        let text = text.into();
        let mut all = images;
        for url in extract_image_urls(&text) {
            if !all.contains(&url) {
                all.push(url);
            }
        }
        Self { text, images: all }
    }
}

impl<'de> Deserialize<'de> for QuestionContent {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        #[derive(Deserialize)]
        #[serde(untagged)]
        enum Raw {
            Text(String),
            Rich {
                #[serde(default)]
                text: String,
                #[serde(default)]
                images: Vec<String>,
            },
        }

        Ok(match Option::<Raw>::deserialize(deserializer)? {
            None => QuestionContent::default(),
            Some(Raw::Text(text)) => QuestionContent::new(text, Vec::new()),
            Some(Raw::Rich { text, images }) => QuestionContent::new(text, images),
        })
    }
}

/// 题目（按位置单独加载）
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Question {
    pub uuid: String,
    #[serde(rename = "sectionUuid")]
    pub section_uuid: String,
    /// 章节内序号（从0开始），即加载时使用的索引
    #[serde(deserialize_with = "deserialize_index")]
    pub order_in_section: usize,
    #[serde(rename = "uiType")]
    pub ui_type: UiType,
    #[serde(default)]
    pub rows: Vec<String>,
    #[serde(default)]
    pub content: QuestionContent,
}

impl Question {
    /// 题干预览（用于日志）
    pub fn preview(&self, max_len: usize) -> String {
        crate::utils::logging::truncate_text(self.content.text.trim(), max_len)
    }
}

/// 提取 Markdown / HTML 中的图片地址
pub fn extract_image_urls(text: &str) -> Vec<String> {
    let mut urls: Vec<String> = Vec::new();
    let patterns = [
        r#"!\[[^\]]*\]\(\s*([^)\s]+)[^)]*\)"#,
        r#"<img\s+[^>]*src="([^"]+)""#,
    ];

    let mut found: Vec<(usize, String)> = Vec::new();
    for pattern in patterns {
        if let Ok(re) = Regex::new(pattern) {
            found.extend(
                re.captures_iter(text)
                    .filter_map(|cap| cap.get(1).map(|m| (m.start(), m.as_str().to_string()))),
            );
        }
    }
    found.sort_by_key(|(pos, _)| *pos);

    for (_, url) in found {
        if !urls.contains(&url) {
            urls.push(url);
        }
    }
    urls
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_question_with_plain_content() {
        let json = r#"{
            "uuid": "q1",
            "sectionUuid": "s1",
            "order_in_section": 2,
            "uiType": "multi_selection",
            "rows": ["A", "B", "C"],
            "content": "下列说法正确的是 ![图1](https://img.example/1.png)"
        }"#;
        let q: Question = serde_json::from_str(json).unwrap();
        assert_eq!(q.ui_type, UiType::MultiSelection);
        assert_eq!(q.order_in_section, 2);
        assert_eq!(q.rows, vec!["A", "B", "C"]);
        assert_eq!(q.content.images, vec!["https://img.example/1.png"]);
    }

    #[test]
    fn parses_rich_content_and_merges_inline_images() {
        let json = r#"{
            "uuid": "q2",
            "sectionUuid": "s1",
            "order_in_section": "0",
            "uiType": "short_answer",
            "content": {
                "text": "<img src=\"b.png\"> 见图 ![](a.png) 与 ![](b.png)",
                "images": ["a.png"]
            }
        }"#;
        let q: Question = serde_json::from_str(json).unwrap();
        assert!(q.rows.is_empty());
        assert_eq!(q.content.images, vec!["a.png", "b.png"]);
    }

    #[test]
    fn missing_or_null_content_is_empty() {
        let json = r#"{"uuid": "q", "sectionUuid": "s", "order_in_section": 0, "uiType": "calculation", "content": null}"#;
        let q: Question = serde_json::from_str(json).unwrap();
        assert_eq!(q.content, QuestionContent::default());
    }

    #[test]
    fn unknown_ui_type_is_rejected() {
        let json = r#"{"uuid": "q", "sectionUuid": "s", "order_in_section": 0, "uiType": "drawing"}"#;
        assert!(serde_json::from_str::<Question>(json).is_err());
    }

    #[test]
    fn image_urls_keep_order_of_appearance() {
        let text = "![x](first.png) <img src=\"second.png\"> ![y]( third.png \"title\")";
        assert_eq!(
            extract_image_urls(text),
            vec!["first.png", "second.png", "third.png"]
        );
    }
}
