use serde::{Deserialize, Serialize};

/// 章节信息（资料结构中的一项）
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SectionInfo {
    pub uuid: String,
    pub name: String,
    /// 展示顺序（从1开始）
    #[serde(default, deserialize_with = "deserialize_index")]
    pub order_in_material: usize,
    /// 本章节可选题目总数
    #[serde(rename = "questionCount", deserialize_with = "deserialize_index")]
    pub question_count: usize,
}

/// 资料（试卷）结构
///
/// 只包含名称和章节列表，题目内容按需单独加载
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MaterialStructure {
    /// 资料ID（结构接口不返回，加载后回填）
    #[serde(default)]
    pub uuid: String,
    pub name: String,
    #[serde(default)]
    pub sections: Vec<SectionInfo>,
}

impl MaterialStructure {
    pub fn with_uuid(mut self, uuid: impl Into<String>) -> Self {
        self.uuid = uuid.into();
        self
    }

    /// 按 uuid 查找章节索引
    pub fn section_index(&self, section_uuid: &str) -> Option<usize> {
        self.sections.iter().position(|s| s.uuid == section_uuid)
    }

    pub fn section(&self, index: usize) -> Option<&SectionInfo> {
        self.sections.get(index)
    }

    /// 题目总数
    pub fn total_questions(&self) -> usize {
        self.sections.iter().map(|s| s.question_count).sum()
    }

    /// 第一个有题目的位置
    pub fn first_position(&self) -> Option<(usize, usize)> {
        self.sections
            .iter()
            .position(|s| s.question_count > 0)
            .map(|si| (si, 0))
    }

    /// 下一题的位置，跨章节时跳过空章节；已是最后一题时返回 None
    pub fn next_position(&self, section_index: usize, question_index: usize) -> Option<(usize, usize)> {
        let section = self.sections.get(section_index)?;
        if question_index + 1 < section.question_count {
            return Some((section_index, question_index + 1));
        }
        self.sections
            .iter()
            .enumerate()
            .skip(section_index + 1)
            .find(|(_, s)| s.question_count > 0)
            .map(|(si, _)| (si, 0))
    }

    /// 上一题的位置，跨章节时落到上一个非空章节的最后一题
    pub fn previous_position(&self, section_index: usize, question_index: usize) -> Option<(usize, usize)> {
        if section_index >= self.sections.len() {
            return None;
        }
        if question_index > 0 {
            return Some((section_index, question_index - 1));
        }
        self.sections[..section_index]
            .iter()
            .enumerate()
            .rev()
            .find(|(_, s)| s.question_count > 0)
            .map(|(si, s)| (si, s.question_count - 1))
    }
}

/// 兼容字符串或整数形式的序号
pub(crate) fn deserialize_index<'de, D>(deserializer: D) -> Result<usize, D::Error>
where
    D: serde::Deserializer<'de>,
{
    use serde::de::Visitor;
    use std::fmt;

    struct IndexVisitor;

    impl<'de> Visitor<'de> for IndexVisitor {
        type Value = usize;

        fn expecting(&self, formatter: &mut fmt::Formatter) -> fmt::Result {
            formatter.write_str("a non-negative integer or a numeric string")
        }

        fn visit_str<E>(self, value: &str) -> Result<Self::Value, E>
        where
            E: serde::de::Error,
        {
            value
                .trim()
                .parse()
                .map_err(|_| E::custom(format!("invalid index: {}", value)))
        }

        fn visit_i64<E>(self, value: i64) -> Result<Self::Value, E>
        where
            E: serde::de::Error,
        {
            usize::try_from(value).map_err(|_| E::custom(format!("negative index: {}", value)))
        }

        fn visit_u64<E>(self, value: u64) -> Result<Self::Value, E>
        where
            E: serde::de::Error,
        {
            usize::try_from(value).map_err(|_| E::custom(format!("index too large: {}", value)))
        }
    }

    deserializer.deserialize_any(IndexVisitor)
}
