//! 应用层
//!
//! 持有配置和 HTTP 客户端，把命令行子命令分发给各个组件

use anyhow::{Context, Result};
use clap::Subcommand;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use tokio::io::{AsyncBufReadExt, BufReader};
use tracing::{info, warn};

use crate::clients::{HttpStudyApi, StudyApi};
use crate::config::Config;
use crate::models::Answer;
use crate::services::{AnswerSheet, Cut, SectionCutter};
use crate::workflow::{NavOutcome, NavSnapshot, NavigationController};

/// 子命令
#[derive(Debug, Subcommand)]
pub enum Command {
    /// 交互式答题：n 下一题 / p 上一题 / j <章节> <题号> / a <答案> / s 答题卡 / q 退出
    Study {
        /// 资料ID
        material_uuid: String,
    },
    /// 查看试卷视图
    View {
        /// 试卷ID
        exam_uuid: String,
    },
    /// 按行号切分 Markdown 试卷并导出 TOML
    Cut {
        /// Markdown 文件
        file: PathBuf,
        /// 章节起始行（从1开始，可重复）
        #[arg(long = "section")]
        sections: Vec<usize>,
        /// 题目起始行（从1开始，可重复）
        #[arg(long = "question")]
        questions: Vec<usize>,
        /// 合并自动推荐的切分点
        #[arg(long)]
        suggest: bool,
        /// 输出文件，缺省时打印到标准输出
        #[arg(long, short)]
        output: Option<PathBuf>,
    },
}

/// 交互式答题中的一条指令
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SessionCommand {
    Next,
    Previous,
    /// 章节、题号（均从1开始）
    Jump(usize, usize),
    Answer(String),
    Sheet,
    Quit,
}

impl SessionCommand {
    pub fn parse(line: &str) -> Option<Self> {
        let line = line.trim();
        let (head, rest) = match line.split_once(char::is_whitespace) {
            Some((head, rest)) => (head, rest.trim()),
            None => (line, ""),
        };
        match head {
            "n" | "next" => Some(SessionCommand::Next),
            "p" | "prev" => Some(SessionCommand::Previous),
            "s" | "sheet" => Some(SessionCommand::Sheet),
            "q" | "quit" => Some(SessionCommand::Quit),
            "a" | "answer" if !rest.is_empty() => Some(SessionCommand::Answer(rest.to_string())),
            "j" | "jump" => {
                let mut parts = rest.split_whitespace().map(str::parse::<usize>);
                match (parts.next(), parts.next(), parts.next()) {
                    (Some(Ok(s)), Some(Ok(q)), None) if s > 0 && q > 0 => Some(SessionCommand::Jump(s, q)),
                    _ => None,
                }
            }
            _ => None,
        }
    }
}

/// 应用主结构
pub struct App {
    config: Config,
    api: Arc<HttpStudyApi>,
}

impl App {
    /// 初始化应用
    pub fn initialize(config: Config) -> Result<Self> {
        let api = HttpStudyApi::new(&config).context("无法创建 API 客户端")?;
        info!("🚀 后端地址: {}", config.api_base_url);
        Ok(Self {
            config,
            api: Arc::new(api),
        })
    }

    /// 运行子命令
    pub async fn run(&self, command: Command) -> Result<()> {
        match command {
            Command::Study { material_uuid } => self.study(&material_uuid).await,
            Command::View { exam_uuid } => self.view(&exam_uuid).await,
            Command::Cut {
                file,
                sections,
                questions,
                suggest,
                output,
            } => {
                let mut cuts: Vec<Cut> = sections.into_iter().map(Cut::section).collect();
                cuts.extend(questions.into_iter().map(Cut::question));
                self.cut(&file, cuts, suggest, output.as_deref()).await
            }
        }
    }

    async fn study(&self, material_uuid: &str) -> Result<()> {
        let controller = NavigationController::new(self.api.clone());

        if let Err(e) = controller.load_material(material_uuid).await {
            if e.is_load_error() && controller.structure().is_none() {
                return Err(e).context("资料加载失败");
            }
            warn!("⚠️ {}", e);
        }
        print_question(&controller.snapshot());

        let mut lines = BufReader::new(tokio::io::stdin()).lines();
        while let Some(line) = lines.next_line().await? {
            let Some(command) = SessionCommand::parse(&line) else {
                println!("指令: n / p / j <章节> <题号> / a <答案> / s / q");
                continue;
            };

            let outcome = match command {
                SessionCommand::Quit => break,
                SessionCommand::Next => controller.next().await,
                SessionCommand::Previous => controller.previous().await,
                SessionCommand::Jump(s, q) => controller.jump_to(s - 1, q - 1).await,
                SessionCommand::Answer(input) => {
                    record_input(&controller, &input);
                    continue;
                }
                SessionCommand::Sheet => {
                    self.write_sheet(&controller, material_uuid).await?;
                    continue;
                }
            };

            match outcome {
                Ok(NavOutcome::Applied) => print_question(&controller.snapshot()),
                Ok(NavOutcome::Unchanged) => println!("已经到头了"),
                Ok(NavOutcome::Superseded) => {}
                Err(e) => println!("❌ {}", e),
            }
        }

        controller.close();
        Ok(())
    }

    async fn write_sheet(&self, controller: &NavigationController, material_uuid: &str) -> Result<()> {
        let Some(structure) = controller.structure() else {
            println!("尚未加载资料");
            return Ok(());
        };
        let text = AnswerSheet::build(&structure, &controller.answers()).render();
        println!("{}", text);

        let dir = Path::new(&self.config.output_dir);
        tokio::fs::create_dir_all(dir)
            .await
            .with_context(|| format!("无法创建目录: {}", dir.display()))?;
        let path = dir.join(format!("answer_sheet_{}.txt", material_uuid));
        tokio::fs::write(&path, text)
            .await
            .with_context(|| format!("无法写入答题卡: {}", path.display()))?;
        info!("答题卡已保存至: {}", path.display());
        Ok(())
    }

    async fn view(&self, exam_uuid: &str) -> Result<()> {
        let view = self
            .api
            .view_exam(exam_uuid)
            .await
            .with_context(|| format!("无法获取试卷视图: {}", exam_uuid))?;

        println!("{}", view.name);
        if !view.description.is_empty() {
            println!("{}", view.description);
        }
        for (i, section) in view.sections.iter().enumerate() {
            println!("  {}. {} ({} 题)", i + 1, section.name, section.question_list.len());
        }
        println!("共 {} 题", view.question_count());
        Ok(())
    }

    async fn cut(&self, file: &Path, mut cuts: Vec<Cut>, suggest: bool, output: Option<&Path>) -> Result<()> {
        let markdown = tokio::fs::read_to_string(file)
            .await
            .with_context(|| format!("无法读取文件: {}", file.display()))?;
        let cutter = SectionCutter::new(&markdown);

        if suggest {
            let suggested = cutter.suggest_cuts();
            info!("💡 推荐 {} 个切分点", suggested.len());
            for cut in suggested {
                if !cuts.iter().any(|c| c.line == cut.line) {
                    cuts.push(cut);
                }
            }
        }

        let exam = cutter.cut(&cuts).context("切分失败")?;
        info!(
            "✓ 切分完成: {} 个章节, {} 道题",
            exam.sections.len(),
            exam.question_count()
        );
        let toml = exam.to_toml().context("无法导出 TOML")?;

        match output {
            Some(path) => {
                tokio::fs::write(path, toml)
                    .await
                    .with_context(|| format!("无法写入文件: {}", path.display()))?;
                info!("已保存至: {}", path.display());
            }
            None => println!("{}", toml),
        }
        Ok(())
    }
}

fn record_input(controller: &NavigationController, input: &str) {
    let Some(ui_type) = controller.snapshot().current_question.map(|q| q.ui_type) else {
        println!("当前没有题目");
        return;
    };
    match Answer::parse(ui_type, input) {
        Some(answer) => match controller.record_answer(answer) {
            Ok(key) => println!("✓ 已记录 ({})", key),
            Err(e) => println!("❌ {}", e),
        },
        None => println!("答案为空"),
    }
}

fn print_question(snapshot: &NavSnapshot) {
    if let Some(error) = &snapshot.error {
        println!("❌ {}", error);
    }
    let (Some(position), Some(question)) = (&snapshot.position, &snapshot.current_question) else {
        return;
    };

    println!("{}", "─".repeat(60));
    println!("{} [{}]", position, question.ui_type);
    println!("{}", question.content.text.trim());
    for image in &question.content.images {
        println!("  🖼 {}", image);
    }
    for (i, row) in question.rows.iter().enumerate() {
        println!("  ({}) {}", i + 1, row);
    }
}
