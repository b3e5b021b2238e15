// ==========================================
// 班级排课看板 - 导入/导出层
// ==========================================
// 职责: JSON 文档读写、PDF 页面布局与外部渲染协作
// 红线: 导出失败不得修改看板状态
// ==========================================

pub mod json;
pub mod pdf;

use thiserror::Error;

/// 导入/导出错误
#[derive(Error, Debug)]
pub enum ExportError {
    #[error("文件读写失败 ({path}): {message}")]
    Io { path: String, message: String },

    #[error("文档序列化失败: {0}")]
    Serialization(#[from] serde_json::Error),

    #[error("图像尺寸无效: {width}x{height}")]
    InvalidImage { width: u32, height: u32 },

    #[error("渲染失败: {0}")]
    Render(String),
}

pub type ExportResult<T> = Result<T, ExportError>;

pub use json::{export_document, read_import_file, write_json_export};
pub use pdf::{export_pdf, GridRasterizer, PdfPageLayout, PdfSink, RasterImage};
