//! 应用主循环 - 会话层
//!
//! 菜单路由、角色门禁和渲染的薄胶水层。每个动作都是一次完整的
//! 同步往返（表格或生成服务），没有后台任务。

use anyhow::Result;
use chrono::Local;
use std::fs;
use std::io::{stdin, stdout, Write};
use tracing::{info, warn};

use crate::config::Config;
use crate::models::draft::{field_or_placeholder, QuestionDraft};
use crate::models::mistake::MistakeRecord;
use crate::models::subject::Subject;
use crate::scheduler;
use crate::services::{ImageArchiver, MistakeStore, QuestionGenerator};
use crate::session::{Role, SessionContext};
use crate::utils::logging::truncate_text;

/// 各科目标与备注（作战大屏的精细化进度表）
const SUBJECT_PROGRESS: [(&str, u32, &str); 7] = [
    ("语文", 130, "古诗文默写满分，阅读理解待加强"),
    ("数学", 145, "⚡ 重点突破：二次函数、圆的证明"),
    ("英语", 140, "完形填空稳定，作文注意书写"),
    ("物理", 95, "电学实验题需专项训练"),
    ("化学", 68, "酸碱盐推断题熟练度提升"),
    ("历史", 48, "知识点背诵完成，刷真题"),
    ("政治", 48, "时事热点已整理"),
];

/// 应用主结构
pub struct App {
    config: Config,
    store: MistakeStore,
    generator: QuestionGenerator,
    archiver: ImageArchiver,
}

impl App {
    /// 初始化应用
    pub fn initialize(config: Config) -> Result<Self> {
        log_startup(&config);

        let store = MistakeStore::new(&config);
        let generator = QuestionGenerator::new(&config);
        let archiver = ImageArchiver::new(&config);

        Ok(Self {
            config,
            store,
            generator,
            archiver,
        })
    }

    /// 运行应用主逻辑：登录 → 会话菜单循环 → 退出登录重置
    pub async fn run(&self) -> Result<()> {
        loop {
            let Some(role) = prompt_role()? else {
                info!("👋 再见！");
                return Ok(());
            };

            let mut session = SessionContext::new(role);
            info!("✓ 以 [{}] 身份登录", role.name());

            self.session_loop(&mut session).await?;

            session.logout();
            info!("✓ 已退出登录，会话状态已重置");
        }
    }

    async fn session_loop(&self, session: &mut SessionContext) -> Result<()> {
        loop {
            print_menu(session.role);
            let choice = read_line("请选择: ")?;

            match choice.as_str() {
                "1" => self.show_dashboard().await,
                "2" if session.role.can_edit() => self.show_daily(session).await?,
                "3" if session.role.can_edit() => self.run_generation(session).await?,
                "4" if session.role.can_edit() => self.run_image_archive().await?,
                "5" => self.show_notebook().await,
                "0" => return Ok(()),
                _ => warn!("无效选项: {}", choice),
            }
        }
    }

    // ========== 🏠 作战大屏 ==========

    async fn show_dashboard(&self) {
        let today = Local::now().date_naive();
        let mistakes = self.store.load_all().await;
        let due_count = mistakes
            .iter()
            .filter(|m| scheduler::review_status(&m.added_date, today).0)
            .count();

        println!("\n🎓 中考智700 · 作战大屏");
        match scheduler::parse_exam_date(&self.config.exam_date) {
            Some(exam_date) => {
                println!("⏳ 中考倒计时: {} 天", scheduler::exam_countdown(exam_date, today));
            }
            None => warn!("考试日期配置无法解析: {}", self.config.exam_date),
        }
        println!("📓 错题库存: {} 题 (其中 {} 题待复习)", mistakes.len(), due_count);

        println!("\n📊 全科精细化进度表");
        for (subject, goal, note) in SUBJECT_PROGRESS {
            println!("  {} (目标 {} 分)  📌 {}", subject, goal, note);
        }
    }

    // ========== 📅 今日日报 ==========

    async fn show_daily(&self, session: &mut SessionContext) -> Result<()> {
        let today = Local::now().date_naive();
        println!("\n📅 今日智能日报  | 日期：{}", today.format("%Y-%m-%d"));

        let drafts = self.generator.daily_tasks(today).await;
        if drafts.is_empty() {
            warn!("日报生成失败，稍后再试");
            return Ok(());
        }

        for (i, draft) in drafts.iter().enumerate() {
            render_draft(i, draft);
        }

        self.offer_save(session.role, &drafts, "综合").await
    }

    // ========== 🤖 定向刷题 ==========

    async fn run_generation(&self, session: &mut SessionContext) -> Result<()> {
        println!("\n🤖 AI 定向特训");

        let subject = match Subject::find(&read_line("科目 (如 数学): ")?) {
            Some(subject) => subject,
            None => {
                warn!("无法识别的科目，默认使用数学");
                Subject::Math
            }
        };
        let question_type = {
            let input = read_line("题型 (选择题/填空题/简答题): ")?;
            if input.is_empty() {
                "选择题".to_string()
            } else {
                input
            }
        };
        let count: u32 = read_line("数量 (1-5): ")?.parse().unwrap_or(3).clamp(1, 5);

        info!("✨ 生成中...");
        let drafts = self.generator.generate(subject, &question_type, count).await;
        if drafts.is_empty() {
            warn!("本次生成没有返回题目");
            return Ok(());
        }

        for (i, draft) in drafts.iter().enumerate() {
            render_draft(i, draft);
        }

        session.selected_subject = Some(subject);
        session.generated = drafts.clone();

        self.offer_save(session.role, &drafts, subject.name()).await
    }

    /// 让学生把生成的题目存入错题本
    async fn offer_save(
        &self,
        role: Role,
        drafts: &[QuestionDraft],
        fallback_subject: &str,
    ) -> Result<()> {
        if !role.can_edit() {
            return Ok(());
        }

        let input = read_line("💾 输入题号存入错题本（回车跳过）: ")?;
        let Ok(index) = input.parse::<usize>() else {
            return Ok(());
        };
        let Some(draft) = index.checked_sub(1).and_then(|i| drafts.get(i)) else {
            warn!("题号 {} 超出范围", input);
            return Ok(());
        };

        let record = draft.normalize(fallback_subject, Local::now().date_naive());
        if self.store.append(record).await {
            info!("✓ 已加入错题本");
        } else {
            warn!("未入库（重复或存储不可达）");
        }
        Ok(())
    }

    // ========== 📸 错题录入 ==========

    async fn run_image_archive(&self) -> Result<()> {
        println!("\n📸 试卷错题归档");

        let subject = read_line("科目: ")?;
        let source = read_line("题目来源 (如：一模卷第10题): ")?;
        let note = read_line("错因备注: ")?;
        let path = read_line("图片路径: ")?;

        let bytes = match fs::read(&path) {
            Ok(bytes) => bytes,
            Err(e) => {
                warn!("读取图片失败 ({}): {}", path, e);
                return Ok(());
            }
        };

        let payload = match self.archiver.encode_image(&bytes) {
            Ok(payload) => payload,
            Err(e) => {
                warn!("图片处理失败: {}", e);
                return Ok(());
            }
        };

        let record = self
            .archiver
            .build_image_record(&subject, &source, &note, payload);

        if self.store.append(record).await {
            info!("✓ 保存成功！");
        } else {
            warn!("保存失败（存储不可达）");
        }
        Ok(())
    }

    // ========== 📓 智能错题本 ==========

    async fn show_notebook(&self) {
        let today = Local::now().date_naive();
        let mistakes = self.store.load_all().await;

        if mistakes.is_empty() {
            println!("\n📓 暂无错题");
            return;
        }

        let due: Vec<&MistakeRecord> = mistakes
            .iter()
            .filter(|m| scheduler::review_status(&m.added_date, today).0)
            .collect();

        println!("\n📓 智能错题本  🔥 待复习 ({})  🗂️ 全部 ({})", due.len(), mistakes.len());

        if !due.is_empty() {
            println!("\n── 🔥 待复习 ──");
            for record in &due {
                render_card(record, today);
            }
        }

        println!("\n── 🗂️ 全部 ──");
        for record in &mistakes {
            render_card(record, today);
        }
    }
}

// ========== 渲染与输入辅助函数 ==========

fn log_startup(config: &Config) {
    info!("{}", "=".repeat(60));
    info!("🚀 全能提分系统启动");
    info!("🤖 模型: {}", config.llm_model_name);
    info!("{}", "=".repeat(60));
}

fn print_menu(role: Role) {
    println!("\n───────── 功能模块 [{}] ─────────", role.name());
    println!("  1. 🏠 冲刺作战室");
    if role.can_edit() {
        println!("  2. 📅 今日专属日报");
        println!("  3. 🤖 定向刷题");
        println!("  4. 📸 错题录入");
    }
    println!("  5. 📓 智能错题本");
    println!("  0. 🚪 退出登录");
}

/// 登录入口；返回 None 表示退出程序
fn prompt_role() -> Result<Option<Role>> {
    println!("\n登录身份: 1.学生  2.家长  0.退出");
    loop {
        match read_line("请选择: ")?.as_str() {
            "1" => return Ok(Some(Role::Student)),
            "2" => return Ok(Some(Role::Parent)),
            "0" => return Ok(None),
            other => warn!("无效选项: {}", other),
        }
    }
}

fn read_line(prompt: &str) -> Result<String> {
    print!("{}", prompt);
    stdout().flush()?;
    let mut buf = String::new();
    stdin().read_line(&mut buf)?;
    Ok(buf.trim().to_string())
}

fn render_draft(index: usize, draft: &QuestionDraft) {
    let subject = draft.subject.as_deref().unwrap_or("综合");
    println!("\n第 {} 题 [{}]", index + 1, subject);
    println!("{}", field_or_placeholder(draft.content.as_deref().unwrap_or_default()));

    if let Some(options) = &draft.options {
        for option in options {
            println!("  ◦ {}", option);
        }
    }
    println!("答案：{}", field_or_placeholder(draft.answer.as_deref().unwrap_or_default()));
    println!("解析：{}", field_or_placeholder(draft.analysis.as_deref().unwrap_or_default()));
    if let Some(formula) = draft.function_formula.as_deref().filter(|f| !f.is_empty()) {
        println!("函数：{}", formula);
    }
}

fn render_card(record: &MistakeRecord, today: chrono::NaiveDate) {
    let (_, status) = scheduler::review_status(&record.added_date, today);
    println!("\n[{}] {}", record.subject, status);
    println!("  {}", truncate_text(&record.content, 30));

    if record.is_image_upload {
        if record.image_payload.is_empty() {
            println!("  ⚠️ 图片丢失");
        } else {
            println!("  🖼️ 图片载荷 {} 字符", record.image_payload.len());
        }
        println!("  备注：{}", field_or_placeholder(&record.analysis));
    } else {
        println!("  答案：{}", field_or_placeholder(&record.answer));
        println!("  解析：{}", field_or_placeholder(&record.analysis));
    }
    println!("  录入时间：{}", record.added_date);
}
