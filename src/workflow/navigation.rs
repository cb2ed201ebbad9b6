//! 题目导航控制器 - 流程层
//!
//! 核心职责：
//! - 维护当前位置（章节索引 + 题目索引）
//! - 按需加载当前题目
//! - 缓存尚未提交的答案，切题时把目标题目的答案带给后端
//! - 保证只有最后一次导航请求的结果会被应用
//!
//! ## 取消机制
//!
//! 每次请求都在独立的 tokio 任务中执行，并记录其 `AbortHandle`；
//! 新的导航开始时先取消旧任务，同时递增请求代数（generation）。
//! 请求完成后只有代数仍然匹配时才会写入状态，
//! 这样即使旧响应在取消信号发出前已经返回，也不会覆盖新结果。
//!
//! 状态锁只在同步代码段中持有，不跨 `.await`。

use std::future::Future;
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};

use tokio::task::{AbortHandle, JoinError, JoinHandle};
use tracing::{debug, info, warn};

use crate::clients::StudyApi;
use crate::error::{NavError, NavResult};
use crate::models::{Answer, AnswerKey, MaterialStructure, Question};
use crate::utils::logging::log_material_loaded;
use crate::workflow::answer_cache::AnswerCache;
use crate::workflow::position::Position;

/// 导航结果
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NavOutcome {
    /// 结果已应用到状态
    Applied,
    /// 请求被更新的导航取代，结果已丢弃
    Superseded,
    /// 无需导航（已在边界）
    Unchanged,
}

/// 对外展示的状态快照
#[derive(Debug, Clone, Default, PartialEq)]
pub struct NavSnapshot {
    pub material_name: Option<String>,
    pub position: Option<Position>,
    pub current_question: Option<Question>,
    /// 是否有最新一次请求尚未完成
    pub navigating: bool,
    /// 最近一次加载错误
    pub error: Option<String>,
}

#[derive(Default)]
struct Session {
    structure: Option<MaterialStructure>,
    position: Option<Position>,
    current_question: Option<Question>,
    answers: AnswerCache,
    navigating: bool,
    error: Option<String>,
    generation: u64,
    in_flight: Option<AbortHandle>,
    closed: bool,
}

impl Session {
    fn abort_in_flight(&mut self) {
        if let Some(handle) = self.in_flight.take() {
            debug!("取消进行中的请求 (generation {})", self.generation);
            handle.abort();
        }
    }

    /// 开始新请求：取消旧请求并进入新一代
    fn begin_request(&mut self) -> u64 {
        self.abort_in_flight();
        self.generation += 1;
        self.navigating = true;
        self.generation
    }

    /// 清空会话状态，已发出的请求全部作废
    fn reset(&mut self) {
        self.abort_in_flight();
        self.generation += 1;
        self.structure = None;
        self.position = None;
        self.current_question = None;
        self.answers.clear();
        self.navigating = false;
        self.error = None;
    }

    fn structure(&self) -> NavResult<&MaterialStructure> {
        if self.closed {
            return Err(NavError::Closed);
        }
        self.structure.as_ref().ok_or(NavError::NoMaterial)
    }
}

/// 题目导航控制器
///
/// 每个资料会话持有一个实例，通过构造参数注入后端 API。
pub struct NavigationController {
    api: Arc<dyn StudyApi>,
    session: Mutex<Session>,
}

impl NavigationController {
    pub fn new(api: Arc<dyn StudyApi>) -> Self {
        Self {
            api,
            session: Mutex::new(Session::default()),
        }
    }

    fn lock(&self) -> MutexGuard<'_, Session> {
        self.session.lock().unwrap_or_else(PoisonError::into_inner)
    }

    /// 在独立任务中执行请求，并登记为当前可取消的请求
    fn spawn_request<T, F>(session: &mut Session, request: F) -> (u64, JoinHandle<T>)
    where
        F: Future<Output = T> + Send + 'static,
        T: Send + 'static,
    {
        let generation = session.begin_request();
        let handle = tokio::spawn(request);
        session.in_flight = Some(handle.abort_handle());
        (generation, handle)
    }

    /// 请求完成后重新加锁；已被取代时返回 None
    fn finish_request(&self, generation: u64) -> Option<MutexGuard<'_, Session>> {
        let mut session = self.lock();
        if session.generation != generation {
            debug!("请求 (generation {}) 已被取代，丢弃结果", generation);
            return None;
        }
        session.in_flight = None;
        session.navigating = false;
        Some(session)
    }

    /// 加载资料结构，并跳转到第一题
    ///
    /// 会替换之前的资料并清空答案缓存。结构加载失败时不会发起题目请求。
    pub async fn load_material(&self, material_uuid: &str) -> NavResult<NavOutcome> {
        let (generation, handle) = {
            let mut session = self.lock();
            if session.closed {
                return Err(NavError::Closed);
            }
            session.reset();

            let api = Arc::clone(&self.api);
            let uuid = material_uuid.to_string();
            Self::spawn_request(&mut session, async move { api.load_structure(&uuid).await })
        };

        info!("📚 正在加载资料结构: {}", material_uuid);
        let result = handle.await;

        let first_section = {
            let Some(mut session) = self.finish_request(generation) else {
                return Ok(NavOutcome::Superseded);
            };

            let structure = match result {
                Ok(Ok(structure)) => structure.with_uuid(material_uuid),
                Ok(Err(source)) => {
                    let err = NavError::StructureLoad {
                        material_uuid: material_uuid.to_string(),
                        source,
                    };
                    warn!("❌ {}", err);
                    session.error = Some(err.to_string());
                    return Err(err);
                }
                Err(join_err) => return Self::join_failure(&mut session, join_err),
            };

            log_material_loaded(&structure.name, structure.sections.len(), structure.total_questions());

            let first = structure
                .first_position()
                .map(|(si, _)| structure.sections[si].uuid.clone());
            session.structure = Some(structure);
            first
        };

        match first_section {
            Some(section_uuid) => self.go_to(&section_uuid, 0).await,
            None => {
                warn!("⚠️ 资料中没有可作答的题目");
                Ok(NavOutcome::Unchanged)
            }
        }
    }

    /// 跳转到指定章节的指定题目
    ///
    /// # 参数
    /// - `section_uuid`: 章节ID，必须属于已加载的资料
    /// - `question_index`: 题目索引，范围 `[0, questionCount)`
    ///
    /// # 返回
    /// - `Applied`: 题目已加载并成为当前题目
    /// - `Superseded`: 被更新的导航取代，状态未变
    pub async fn go_to(&self, section_uuid: &str, question_index: usize) -> NavResult<NavOutcome> {
        let (generation, target, handle) = {
            let mut session = self.lock();
            let structure = session.structure()?;
            let section_index = structure
                .section_index(section_uuid)
                .ok_or_else(|| NavError::UnknownSection(section_uuid.to_string()))?;
            let count = structure.sections[section_index].question_count;
            if question_index >= count {
                return Err(NavError::QuestionOutOfRange {
                    index: question_index,
                    count,
                });
            }
            let material_uuid = structure.uuid.clone();

            let target = Position::new(section_index, section_uuid, question_index);
            let current_key = session.position.as_ref().map(Position::key);
            let hint = session
                .answers
                .carry_forward(current_key.as_ref(), &target.key())
                .map(|answer| answer.hint_value());

            debug!("➡️ 跳转到 {} (携带答案: {})", target, hint.is_some());

            let api = Arc::clone(&self.api);
            let section = section_uuid.to_string();
            let (generation, handle) = Self::spawn_request(&mut session, async move {
                api.load_question(&material_uuid, &section, question_index, hint).await
            });
            (generation, target, handle)
        };

        let result = handle.await;

        let Some(mut session) = self.finish_request(generation) else {
            return Ok(NavOutcome::Superseded);
        };

        match result {
            Ok(Ok(question)) => {
                info!("✓ {} 已加载: {}", target, question.preview(40));
                session.current_question = Some(question);
                session.position = Some(target);
                session.error = None;
                Ok(NavOutcome::Applied)
            }
            Ok(Err(source)) => {
                let err = NavError::QuestionLoad {
                    section_uuid: target.section_uuid,
                    question_index: target.question_index,
                    source,
                };
                warn!("❌ {}", err);
                session.error = Some(err.to_string());
                Err(err)
            }
            Err(join_err) => Self::join_failure(&mut session, join_err),
        }
    }

    fn join_failure(session: &mut Session, join_err: JoinError) -> NavResult<NavOutcome> {
        if join_err.is_cancelled() {
            return Ok(NavOutcome::Superseded);
        }
        let err = NavError::TaskFailed(join_err.to_string());
        warn!("❌ {}", err);
        session.error = Some(err.to_string());
        Err(err)
    }

    /// 下一题；已是最后一题时不做任何事
    ///
    /// 首题加载失败（尚无位置）时，重新尝试第一题
    pub async fn next(&self) -> NavResult<NavOutcome> {
        let target = {
            let session = self.lock();
            let structure = session.structure()?;
            let next = match &session.position {
                Some(p) => structure.next_position(p.section_index, p.question_index),
                None => structure.first_position(),
            };
            next.map(|(si, qi)| (structure.sections[si].uuid.clone(), qi))
        };
        self.go_to_target(target).await
    }

    /// 上一题；已是第一题时不做任何事
    pub async fn previous(&self) -> NavResult<NavOutcome> {
        let target = {
            let session = self.lock();
            let structure = session.structure()?;
            session
                .position
                .as_ref()
                .and_then(|p| structure.previous_position(p.section_index, p.question_index))
                .map(|(si, qi)| (structure.sections[si].uuid.clone(), qi))
        };
        self.go_to_target(target).await
    }

    /// 按章节索引跳转（题号选择器）
    pub async fn jump_to(&self, section_index: usize, question_index: usize) -> NavResult<NavOutcome> {
        let section_uuid = {
            let session = self.lock();
            let structure = session.structure()?;
            structure
                .section(section_index)
                .map(|s| s.uuid.clone())
                .ok_or(NavError::SectionOutOfRange {
                    index: section_index,
                    count: structure.sections.len(),
                })?
        };
        self.go_to(&section_uuid, question_index).await
    }

    async fn go_to_target(&self, target: Option<(String, usize)>) -> NavResult<NavOutcome> {
        match target {
            Some((section_uuid, question_index)) => self.go_to(&section_uuid, question_index).await,
            None => {
                debug!("已到边界，保持当前位置");
                Ok(NavOutcome::Unchanged)
            }
        }
    }

    /// 记录当前题目的答案（仅本地缓存，不发请求）
    ///
    /// 答案类型必须与当前题型一致，选择题的选项必须在 `rows` 中
    pub fn record_answer(&self, answer: Answer) -> NavResult<AnswerKey> {
        let mut session = self.lock();
        if session.closed {
            return Err(NavError::Closed);
        }

        let answer = answer.normalized();
        let key = {
            let question = session
                .current_question
                .as_ref()
                .ok_or(NavError::NoCurrentQuestion)?;
            let position = session.position.as_ref().ok_or(NavError::NoCurrentQuestion)?;

            if answer.ui_type() != question.ui_type {
                return Err(NavError::AnswerKindMismatch {
                    expected: question.ui_type,
                    got: answer.ui_type(),
                });
            }
            if !question.rows.is_empty() {
                if let Some(unknown) = answer
                    .selected_options()
                    .iter()
                    .find(|option| !question.rows.contains(*option))
                {
                    return Err(NavError::UnknownOption(unknown.clone()));
                }
            }
            position.key()
        };

        debug!("记录答案 {} = {}", key, answer);
        session.answers.record(key.clone(), answer);
        Ok(key)
    }

    /// 结束会话：取消进行中的请求，丢弃位置和答案缓存
    ///
    /// 之后到达的响应不会再修改任何状态
    pub fn close(&self) {
        let mut session = self.lock();
        if !session.closed {
            info!("会话结束");
        }
        session.reset();
        session.closed = true;
    }

    pub fn is_closed(&self) -> bool {
        self.lock().closed
    }

    pub fn snapshot(&self) -> NavSnapshot {
        let session = self.lock();
        NavSnapshot {
            material_name: session.structure.as_ref().map(|s| s.name.clone()),
            position: session.position.clone(),
            current_question: session.current_question.clone(),
            navigating: session.navigating,
            error: session.error.clone(),
        }
    }

    pub fn structure(&self) -> Option<MaterialStructure> {
        self.lock().structure.clone()
    }

    pub fn cached_answer(&self, key: &AnswerKey) -> Option<Answer> {
        self.lock().answers.get(key).cloned()
    }

    pub fn answers(&self) -> AnswerCache {
        self.lock().answers.clone()
    }
}

impl Drop for NavigationController {
    fn drop(&mut self) {
        self.lock().abort_in_flight();
    }
}
