//! # Mistake Book
//!
//! 中考冲刺错题本：AI 出题 + 表格错题归档 + 遗忘曲线复习调度
//!
//! ## 架构设计
//!
//! 本系统采用分层架构：
//!
//! ### ① 客户端层（Clients）
//! - `clients/` - 只封装外部服务的调用方式
//! - `LlmClient` - 聊天补全服务（单次非流式调用）
//! - `SheetClient` - 远程表格的整表读写
//!
//! ### ② 业务能力层（Services）
//! - `services/` - 描述"我能做什么"
//! - `MistakeStore` - 错题追加与去重（表格 / 本地文件后端）
//! - `QuestionGenerator` - 提示词构造 → LLM → JSON 解析，日报缓存
//! - `ImageArchiver` - 图片限宽压缩为 base64 载荷
//!
//! ### ③ 纯逻辑（Scheduler / Models）
//! - `scheduler` - 固定检查点 {1,3,7,15,30} 的复习调度纯函数
//! - `models/` - 严格的 `MistakeRecord` 与未校验的 `QuestionDraft`，
//!   草稿只在 `normalize` 边界上收敛
//!
//! ### ④ 会话层（App / Session）
//! - `app` - 菜单路由与渲染（薄胶水）
//! - `session` - 显式的会话上下文，退出登录时整体重置

pub mod app;
pub mod clients;
pub mod config;
pub mod error;
pub mod models;
pub mod scheduler;
pub mod services;
pub mod session;
pub mod utils;

// 重新导出常用类型
pub use app::App;
pub use config::Config;
pub use error::{AppError, AppResult};
pub use models::{MistakeRecord, QuestionDraft, Subject};
pub use scheduler::{exam_countdown, review_status, REVIEW_CHECKPOINTS};
pub use services::{ImageArchiver, MistakeStore, QuestionGenerator};
pub use session::{Role, SessionContext};
