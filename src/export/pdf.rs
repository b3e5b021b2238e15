// ==========================================
// 班级排课看板 - PDF 导出
// ==========================================
// 页面: A4 横向 (297 x 210 mm)
// 布局: 课表图像按页宽等比缩放并居中；缩放后超出页高时改按页高缩放
// 光栅化与 PDF 写出由外部协作方实现（GridRasterizer / PdfSink）
// ==========================================

use async_trait::async_trait;
use serde::Serialize;
use std::path::Path;
use tracing::{error, info};

use crate::export::{ExportError, ExportResult};

pub const A4_LANDSCAPE_WIDTH_MM: f64 = 297.0;
pub const A4_LANDSCAPE_HEIGHT_MM: f64 = 210.0;

/// 光栅化后的课表图像
#[derive(Debug, Clone)]
pub struct RasterImage {
    pub width_px: u32,
    pub height_px: u32,
    pub png: Vec<u8>,
}

// ==========================================
// PdfPageLayout - 图像在页面上的摆放
// ==========================================
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PdfPageLayout {
    pub page_width_mm: f64,
    pub page_height_mm: f64,
    pub x_mm: f64,
    pub y_mm: f64,
    pub width_mm: f64,
    pub height_mm: f64,
}

impl PdfPageLayout {
    pub fn fit(image_width: u32, image_height: u32) -> ExportResult<Self> {
        if image_width == 0 || image_height == 0 {
            return Err(ExportError::InvalidImage {
                width: image_width,
                height: image_height,
            });
        }

        let (page_w, page_h) = (A4_LANDSCAPE_WIDTH_MM, A4_LANDSCAPE_HEIGHT_MM);
        let aspect = image_height as f64 / image_width as f64;

        let (width, height) = if page_w * aspect <= page_h {
            (page_w, page_w * aspect)
        } else {
            (page_h / aspect, page_h)
        };

        Ok(Self {
            page_width_mm: page_w,
            page_height_mm: page_h,
            x_mm: (page_w - width) / 2.0,
            y_mm: (page_h - height) / 2.0,
            width_mm: width,
            height_mm: height,
        })
    }
}

/// 课表光栅化（外部画布实现）
#[async_trait]
pub trait GridRasterizer: Send + Sync {
    async fn rasterize(&self) -> anyhow::Result<RasterImage>;
}

/// 单页 PDF 写出（外部 PDF 库实现）
#[async_trait]
pub trait PdfSink: Send + Sync {
    async fn write_page(
        &self,
        image: &RasterImage,
        layout: &PdfPageLayout,
        path: &Path,
    ) -> anyhow::Result<()>;
}

/// 导出课表 PDF
///
/// 任一环节失败都归为 ExportError::Render，调用方据此提示用户
pub async fn export_pdf(
    rasterizer: &dyn GridRasterizer,
    sink: &dyn PdfSink,
    path: &Path,
) -> ExportResult<PdfPageLayout> {
    let image = rasterizer.rasterize().await.map_err(|e| {
        error!(error = %e, "课表光栅化失败");
        ExportError::Render(e.to_string())
    })?;

    let layout = PdfPageLayout::fit(image.width_px, image.height_px)?;

    sink.write_page(&image, &layout, path).await.map_err(|e| {
        error!(error = %e, path = %path.display(), "PDF 写出失败");
        ExportError::Render(e.to_string())
    })?;

    info!(
        path = %path.display(),
        width_mm = layout.width_mm,
        height_mm = layout.height_mm,
        "PDF 导出完成"
    );
    Ok(layout)
}
