//! Markdown 切分工具 - 业务能力层
//!
//! 按用户选中的行号，把原始 Markdown 切成"章节 → 题目"两级结构，
//! 供录入试卷时使用。

use regex::Regex;
use serde::{Deserialize, Serialize};

use crate::error::CutError;

/// 切分点类型
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum CutKind {
    Section,
    Question,
}

/// 切分点：从第 `line` 行（从1开始）起新开一个章节或题目
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Cut {
    pub line: usize,
    pub kind: CutKind,
}

impl Cut {
    pub fn section(line: usize) -> Self {
        Self {
            line,
            kind: CutKind::Section,
        }
    }

    pub fn question(line: usize) -> Self {
        Self {
            line,
            kind: CutKind::Question,
        }
    }
}

/// 切分结果
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct CutExam {
    /// 第一个切分点之前的内容
    pub preamble: String,
    pub sections: Vec<CutSection>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct CutSection {
    /// 章节标题（去掉 `#` 标记）；隐式章节为空
    pub title: String,
    pub start_line: usize,
    /// 标题之后、第一道题之前的说明
    pub intro: String,
    pub questions: Vec<CutQuestion>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct CutQuestion {
    /// 章节内题号（从1开始）
    pub number: usize,
    pub start_line: usize,
    pub text: String,
}

impl CutExam {
    pub fn question_count(&self) -> usize {
        self.sections.iter().map(|s| s.questions.len()).sum()
    }

    /// 导出为 TOML
    pub fn to_toml(&self) -> Result<String, toml::ser::Error> {
        toml::to_string(self)
    }
}

/// Markdown 切分器
pub struct SectionCutter {
    lines: Vec<String>,
}

impl SectionCutter {
    pub fn new(markdown: &str) -> Self {
        Self {
            lines: markdown.lines().map(String::from).collect(),
        }
    }

    pub fn line_count(&self) -> usize {
        self.lines.len()
    }

    /// 按切分点切分
    ///
    /// 切分点会按行号排序；行号为 0、超出范围或重复时返回错误
    pub fn cut(&self, cuts: &[Cut]) -> Result<CutExam, CutError> {
        let cuts = self.validate(cuts)?;
        let total = self.lines.len();
        let mut exam = CutExam::default();

        let first_start = cuts.first().map_or(total, |c| c.line - 1);
        exam.preamble = join_trimmed(&self.lines[..first_start]);

        for (i, cut) in cuts.iter().enumerate() {
            let start = cut.line - 1;
            let end = cuts.get(i + 1).map_or(total, |next| next.line - 1);
            let block = &self.lines[start..end];

            match cut.kind {
                CutKind::Section => exam.sections.push(CutSection {
                    title: heading_text(&block[0]),
                    start_line: cut.line,
                    intro: join_trimmed(&block[1..]),
                    questions: Vec::new(),
                }),
                CutKind::Question => {
                    if exam.sections.is_empty() {
                        exam.sections.push(CutSection {
                            start_line: cut.line,
                            ..CutSection::default()
                        });
                    }
                    if let Some(section) = exam.sections.last_mut() {
                        section.questions.push(CutQuestion {
                            number: section.questions.len() + 1,
                            start_line: cut.line,
                            text: join_trimmed(block),
                        });
                    }
                }
            }
        }

        Ok(exam)
    }

    fn validate(&self, cuts: &[Cut]) -> Result<Vec<Cut>, CutError> {
        let total = self.lines.len();
        let mut sorted = cuts.to_vec();
        sorted.sort_by_key(|c| c.line);

        for (i, cut) in sorted.iter().enumerate() {
            if cut.line == 0 {
                return Err(CutError::ZeroLine);
            }
            if cut.line > total {
                return Err(CutError::LineOutOfRange {
                    line: cut.line,
                    total,
                });
            }
            if i > 0 && sorted[i - 1].line == cut.line {
                return Err(CutError::DuplicateLine(cut.line));
            }
        }
        Ok(sorted)
    }

    /// 推荐切分点
    ///
    /// - Markdown 标题（`#` ~ `######`）→ 章节
    /// - 编号行（`1.`、`1、`、`(1)`、`（1）`）→ 题目
    ///
    /// 代码块内的行不参与推荐
    pub fn suggest_cuts(&self) -> Vec<Cut> {
        let (Ok(heading), Ok(numbered)) = (
            Regex::new(r"^\s{0,3}#{1,6}\s+\S"),
            Regex::new(r"^\s*(?:\d+[\.．]\s+|\d+、\s*|[（(]\d+[)）]\s*)\S"),
        ) else {
            return Vec::new();
        };

        let mut cuts = Vec::new();
        let mut in_fence = false;
        for (i, line) in self.lines.iter().enumerate() {
            if line.trim_start().starts_with("```") {
                in_fence = !in_fence;
                continue;
            }
            if in_fence {
                continue;
            }
            if heading.is_match(line) {
                cuts.push(Cut::section(i + 1));
            } else if numbered.is_match(line) {
                cuts.push(Cut::question(i + 1));
            }
        }
        cuts
    }
}

fn heading_text(line: &str) -> String {
    line.trim().trim_start_matches('#').trim().to_string()
}

/// 去掉首尾空行后拼接
fn join_trimmed(lines: &[String]) -> String {
    let is_blank = |l: &String| l.trim().is_empty();
    let Some(start) = lines.iter().position(|l| !is_blank(l)) else {
        return String::new();
    };
    let end = lines.iter().rposition(|l| !is_blank(l)).map_or(start, |e| e + 1);
    lines[start..end].join("\n")
}
