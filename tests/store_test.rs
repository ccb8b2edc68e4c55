//! 错题存储集成测试（本地文件后端）
//!
//! 远程表格后端与文件后端共享同一套契约，联网用例默认忽略，
//! 需要手动运行：cargo test -- --ignored

use std::path::PathBuf;

use mistake_book::{Config, MistakeRecord, MistakeStore};

/// 每个用例独立的临时文件，避免互相干扰
fn temp_store(name: &str) -> (MistakeStore, PathBuf) {
    let path = std::env::temp_dir().join(format!(
        "mistake_book_test_{}_{}.json",
        std::process::id(),
        name
    ));
    let _ = std::fs::remove_file(&path);
    (MistakeStore::with_file(&path), path)
}

fn text_record(content: &str) -> MistakeRecord {
    MistakeRecord {
        subject: "数学".to_string(),
        content: content.to_string(),
        answer: "x=2".to_string(),
        analysis: "移项".to_string(),
        ..Default::default()
    }
}

#[tokio::test]
async fn test_append_then_load_round_trip() {
    let (store, path) = temp_store("round_trip");

    assert!(store.append(text_record("2x+3=7")).await);

    let records = store.load_all().await;
    assert_eq!(records.len(), 1);
    let record = &records[0];
    assert_eq!(record.subject, "数学");
    assert_eq!(record.content, "2x+3=7");
    assert_eq!(record.answer, "x=2");
    // 存储层补齐的默认值：日期非空、计数归零、可选字段为空而非缺失
    assert!(!record.added_date.is_empty());
    assert_eq!(record.review_count, 0);
    assert_eq!(record.function_formula, "");
    assert_eq!(record.image_payload, "");

    let _ = std::fs::remove_file(path);
}

#[tokio::test]
async fn test_duplicate_content_rejected_once_stored() {
    let (store, path) = temp_store("dedup");

    assert!(store.append(text_record("2x+3=7")).await);
    assert!(!store.append(text_record("2x+3=7")).await);

    let records = store.load_all().await;
    assert_eq!(records.len(), 1, "幂等：重复追加只留一条");

    let _ = std::fs::remove_file(path);
}

#[tokio::test]
async fn test_image_records_share_placeholder_content() {
    let (store, path) = temp_store("image_dup");

    let image_record = || MistakeRecord {
        subject: "物理".to_string(),
        content: "📸 一模卷第10题".to_string(),
        is_image_upload: true,
        image_payload: "QUJD".to_string(),
        ..Default::default()
    };

    assert!(store.append(image_record()).await);
    assert!(store.append(image_record()).await, "图片记录跳过去重");

    assert_eq!(store.load_all().await.len(), 2);

    let _ = std::fs::remove_file(path);
}

#[tokio::test]
async fn test_unreadable_store_is_absorbed() {
    let (store, path) = temp_store("corrupt");
    std::fs::write(&path, "not json").unwrap();

    // 读失败 → 空列表；写前读失败 → false，且不破坏原文件
    assert!(store.load_all().await.is_empty());
    assert!(!store.append(text_record("新题")).await);
    assert_eq!(std::fs::read_to_string(&path).unwrap(), "not json");

    let _ = std::fs::remove_file(path);
}

#[tokio::test]
async fn test_missing_file_is_uninitialized_store() {
    let (store, _path) = temp_store("missing");
    assert!(store.load_all().await.is_empty());
}

/// 远程表格后端连通性测试
///
/// 运行方式：SHEET_API_BASE_URL=... SHEET_TOKEN=... cargo test -- --ignored
#[tokio::test]
#[ignore]
async fn test_sheet_backend_round_trip() {
    let config = Config::default().from_env();
    assert!(config.use_sheet_backend(), "需要配置 SHEET_API_BASE_URL");

    let store = MistakeStore::new(&config);
    let before = store.load_all().await.len();

    let mut record = text_record("连通性测试题目");
    record.content = format!("连通性测试 {}", chrono::Local::now().timestamp());
    assert!(store.append(record).await);

    assert_eq!(store.load_all().await.len(), before + 1);
}
