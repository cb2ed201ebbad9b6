//! 后端 API 抽象
//!
//! 导航控制器只依赖这个 trait，生产环境使用 `HttpStudyApi`，测试中可替换为脚本化实现。

use async_trait::async_trait;

use crate::error::ApiResult;
use crate::models::{ExamView, MaterialStructure, Question};

#[async_trait]
pub trait StudyApi: Send + Sync {
    /// 加载资料结构（名称 + 章节列表）
    async fn load_structure(&self, material_uuid: &str) -> ApiResult<MaterialStructure>;

    /// 加载指定位置的题目
    ///
    /// `answer_hint` 为需要带给后端的答案（已编码为查询参数值）
    async fn load_question(
        &self,
        material_uuid: &str,
        section_uuid: &str,
        question_index: usize,
        answer_hint: Option<String>,
    ) -> ApiResult<Question>;

    /// 获取试卷视图
    async fn view_exam(&self, exam_uuid: &str) -> ApiResult<ExamView>;
}
