//! 错误类型
//!
//! 按来源划分：
//! - `ApiError` - 与后端 API 的交互（网络 / 状态码 / JSON）
//! - `NavError` - 导航控制器（题目切换、答案记录）
//! - `CutError` - Markdown 切分工具
//! - `ConfigError` - 配置加载

use thiserror::Error;

use crate::models::UiType;

/// API 调用错误
#[derive(Debug, Error)]
pub enum ApiError {
    /// 网络请求失败
    #[error("API请求失败 ({endpoint}): {source}")]
    RequestFailed {
        endpoint: String,
        #[source]
        source: reqwest::Error,
    },
    /// API 返回非 2xx 状态码
    #[error("API返回错误响应 ({endpoint}): status={status}, body={body}")]
    BadStatus {
        endpoint: String,
        status: u16,
        body: String,
    },
    /// JSON 解析失败
    #[error("JSON解析失败 ({endpoint}): {source}")]
    JsonParseFailed {
        endpoint: String,
        #[source]
        source: serde_json::Error,
    },
    /// 基础 URL 无法拼接路径
    #[error("无效的 API 地址: {0}")]
    InvalidUrl(String),
}

/// 导航控制器错误
///
/// 被新导航取代的请求不会出现在这里，而是以 `NavOutcome::Superseded` 返回。
#[derive(Debug, Error)]
pub enum NavError {
    /// 资料结构加载失败
    #[error("资料结构加载失败 ({material_uuid}): {source}")]
    StructureLoad {
        material_uuid: String,
        #[source]
        source: ApiError,
    },
    /// 题目加载失败（非取消）
    #[error("题目加载失败 (章节 {section_uuid} 第 {question_index} 题): {source}")]
    QuestionLoad {
        section_uuid: String,
        question_index: usize,
        #[source]
        source: ApiError,
    },
    /// 请求任务异常终止
    #[error("题目加载任务异常终止: {0}")]
    TaskFailed(String),
    /// 尚未加载资料
    #[error("尚未加载资料")]
    NoMaterial,
    /// 当前没有题目
    #[error("当前没有题目")]
    NoCurrentQuestion,
    /// 章节不存在
    #[error("章节不存在: {0}")]
    UnknownSection(String),
    /// 章节索引超出范围
    #[error("章节索引 {index} 超出范围 (共 {count} 个章节)")]
    SectionOutOfRange { index: usize, count: usize },
    /// 题目索引超出范围
    #[error("题目索引 {index} 超出范围 [0, {count})")]
    QuestionOutOfRange { index: usize, count: usize },
    /// 答案类型与题型不符
    #[error("答案类型 {got} 与题型 {expected} 不符")]
    AnswerKindMismatch { expected: UiType, got: UiType },
    /// 选项不存在
    #[error("选项不存在: {0}")]
    UnknownOption(String),
    /// 会话已关闭
    #[error("会话已关闭")]
    Closed,
}

impl NavError {
    /// 是否属于需要展示给用户的加载错误
    pub fn is_load_error(&self) -> bool {
        matches!(
            self,
            NavError::StructureLoad { .. } | NavError::QuestionLoad { .. } | NavError::TaskFailed(_)
        )
    }
}

/// 切分工具错误
#[derive(Debug, Error, PartialEq, Eq)]
pub enum CutError {
    #[error("行号从 1 开始，收到 0")]
    ZeroLine,
    #[error("行号 {line} 超出范围 (共 {total} 行)")]
    LineOutOfRange { line: usize, total: usize },
    #[error("行号 {0} 被重复选择")]
    DuplicateLine(usize),
}

/// 配置错误
#[derive(Debug, Error)]
pub enum ConfigError {
    /// 环境变量解析失败
    #[error("环境变量 {var_name} 解析失败: 值 '{value}' 无法转换为 {expected_type}")]
    EnvVarParseFailed {
        var_name: String,
        value: String,
        expected_type: String,
    },
    /// 读取配置文件失败
    #[error("读取配置文件失败 ({path}): {source}")]
    ReadFailed {
        path: String,
        #[source]
        source: std::io::Error,
    },
    /// TOML 解析失败
    #[error("TOML解析失败 ({path}): {source}")]
    TomlParseFailed {
        path: String,
        #[source]
        source: toml::de::Error,
    },
}

// ========== 便捷构造函数 ==========

impl ApiError {
    /// 创建API请求失败错误
    pub fn request_failed(endpoint: impl Into<String>, source: reqwest::Error) -> Self {
        ApiError::RequestFailed {
            endpoint: endpoint.into(),
            source,
        }
    }

    /// 创建JSON解析失败错误
    pub fn json_parse_failed(endpoint: impl Into<String>, source: serde_json::Error) -> Self {
        ApiError::JsonParseFailed {
            endpoint: endpoint.into(),
            source,
        }
    }
}

// ========== Result 类型别名 ==========

/// API 结果类型
pub type ApiResult<T> = Result<T, ApiError>;

/// 导航结果类型
pub type NavResult<T> = Result<T, NavError>;
