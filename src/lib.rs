//! # Exam Navigator
//!
//! 试卷 / 学习资料答题客户端
//!
//! ## 架构设计
//!
//! ### ① 客户端层（Clients）
//! - `clients/` - 与后端 API 的唯一交互点
//! - `StudyApi` - 后端能力抽象（结构 / 题目 / 试卷视图）
//! - `HttpStudyApi` - 基于 reqwest 的实现
//!
//! ### ② 业务能力层（Services）
//! - `services/` - 不依赖网络的独立能力
//! - `SectionCutter` - 按行号把 Markdown 切成章节和题目
//! - `AnswerSheet` - 生成可打印的答题卡
//!
//! ### ③ 流程层（Workflow）
//! - `workflow/` - 一次资料会话内的导航流程
//! - `NavigationController` - 位置维护、按需加载、答案缓存、取消过期请求
//! - `AnswerCache` / `Position` - 会话状态
//!
//! ### ④ 应用层（App）
//! - `app` - 命令行子命令分发（study / view / cut）
//!
//! ## 模块结构

pub mod app;
pub mod clients;
pub mod config;
pub mod error;
pub mod models;
pub mod services;
pub mod utils;
pub mod workflow;

// 重新导出常用类型
pub use clients::{HttpStudyApi, StudyApi};
pub use config::Config;
pub use error::{ApiError, CutError, NavError};
pub use models::{Answer, AnswerKey, MaterialStructure, Question, UiType};
pub use services::{AnswerSheet, Cut, SectionCutter};
pub use workflow::{AnswerCache, NavOutcome, NavSnapshot, NavigationController, Position};
