// ==========================================
// 班级排课看板 - JSON 导入/导出
// ==========================================
// 导出格式: { boxes, schedule, restrictions, exportDate }，两空格缩进
// ==========================================

use chrono::{DateTime, Utc};
use std::path::Path;
use tracing::{info, instrument};

use crate::domain::snapshot::{ExportDocument, ScheduleSnapshot};
use crate::export::{ExportError, ExportResult};

/// 构造导出文档（盒子 initialQuantity 已规范化）
pub fn export_document(snapshot: &ScheduleSnapshot, now: DateTime<Utc>) -> ExportDocument {
    ExportDocument::new(snapshot, now)
}

/// 将导出文档写入文件
#[instrument(skip(document), fields(path = %path.display()))]
pub async fn write_json_export(path: &Path, document: &ExportDocument) -> ExportResult<()> {
    let body = serde_json::to_string_pretty(document)?;
    tokio::fs::write(path, body)
        .await
        .map_err(|e| ExportError::Io {
            path: path.display().to_string(),
            message: e.to_string(),
        })?;
    info!(boxes = document.snapshot.boxes.len(), "JSON 导出完成");
    Ok(())
}

/// 读取待导入的 JSON 文件（只读取，不解析）
pub async fn read_import_file(path: &Path) -> ExportResult<String> {
    tokio::fs::read_to_string(path)
        .await
        .map_err(|e| ExportError::Io {
            path: path.display().to_string(),
            message: e.to_string(),
        })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::class_box::ClassBox;
    use tempfile::tempdir;

    #[tokio::test]
    async fn test_write_then_read_back() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("schema-export.json");

        let mut snap = ScheduleSnapshot::empty();
        let mut b = ClassBox::new(1, "Matte 1A", "Anna", "#FFB3BA".into(), 3);
        b.initial_quantity = None;
        snap.boxes.push(b);

        let doc = export_document(&snap, Utc::now());
        write_json_export(&path, &doc).await.unwrap();

        let raw = read_import_file(&path).await.unwrap();
        assert!(raw.contains("\"exportDate\""));
        assert!(raw.contains("\n  \"boxes\""));

        let back = ScheduleSnapshot::from_json_document(&raw).unwrap();
        assert_eq!(back.boxes[0].initial_quantity, Some(3));
    }

    #[tokio::test]
    async fn test_read_missing_file() {
        let dir = tempdir().unwrap();
        let result = read_import_file(&dir.path().join("saknas.json")).await;
        assert!(matches!(result, Err(ExportError::Io { .. })));
    }
}
