//! 图片归档服务 - 业务能力层
//!
//! 把上传的试卷照片转成可随记录入库的文本载荷：
//! 解码 → 限宽缩放 → 压到不透明白底 → JPEG 降质重编码 → base64。

use base64::{engine::general_purpose, Engine as _};
use image::{imageops::FilterType, DynamicImage, GenericImageView, ImageOutputFormat, RgbaImage};
use std::io::Cursor;
use tracing::debug;

use crate::config::Config;
use crate::error::AppResult;
use crate::models::mistake::MistakeRecord;

/// 图片归档服务
pub struct ImageArchiver {
    max_width: u32,
    jpeg_quality: u8,
}

impl ImageArchiver {
    /// 创建新的图片归档服务
    pub fn new(config: &Config) -> Self {
        Self {
            max_width: config.image_max_width,
            jpeg_quality: config.image_jpeg_quality,
        }
    }

    /// 编码图片为入库载荷
    ///
    /// # 参数
    /// - `bytes`: 原始图片文件内容（png/jpg 等任意可识别格式）
    ///
    /// # 返回
    /// 返回 base64 编码的 JPEG 数据
    pub fn encode_image(&self, bytes: &[u8]) -> AppResult<String> {
        let img = image::load_from_memory(bytes)?;
        let (width, height) = img.dimensions();

        // 限宽缩放，保持宽高比；Triangle 滤波在质量和速度间取平衡
        let img = if width > self.max_width {
            let scale = self.max_width as f64 / width as f64;
            let new_height = (height as f64 * scale) as u32;
            img.resize(self.max_width, new_height.max(1), FilterType::Triangle)
        } else {
            img
        };

        // 压到不透明白底，避免透明 PNG 在 JPEG 里变成黑底
        let flattened = flatten_onto_white(&img);

        let mut buffer = Cursor::new(Vec::new());
        flattened.write_to(&mut buffer, ImageOutputFormat::Jpeg(self.jpeg_quality))?;

        let encoded = general_purpose::STANDARD.encode(buffer.into_inner());

        debug!(
            "图片归档: {}x{} -> {}x{}, 载荷 {} 字符",
            width,
            height,
            flattened.width(),
            flattened.height(),
            encoded.len()
        );

        Ok(encoded)
    }

    /// 构建一条图片错题记录
    ///
    /// 图片记录的 `content` 只是来源占位文本，允许与其他记录重复。
    pub fn build_image_record(
        &self,
        subject: &str,
        source: &str,
        note: &str,
        image_payload: String,
    ) -> MistakeRecord {
        MistakeRecord {
            subject: subject.to_string(),
            content: format!("📸 {}", source),
            answer: "见图".to_string(),
            analysis: note.to_string(),
            is_image_upload: true,
            image_payload,
            ..Default::default()
        }
    }
}

/// 把任意图片铺到同尺寸的白底画布上
fn flatten_onto_white(img: &DynamicImage) -> DynamicImage {
    let (width, height) = img.dimensions();
    let mut canvas = RgbaImage::from_pixel(width, height, image::Rgba([255, 255, 255, 255]));
    image::imageops::overlay(&mut canvas, &img.to_rgba8(), 0, 0);
    DynamicImage::ImageRgb8(DynamicImage::ImageRgba8(canvas).to_rgb8())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::Config;

    fn archiver() -> ImageArchiver {
        ImageArchiver::new(&Config::default())
    }

    /// 生成一张纯色测试图片并编码为 PNG 字节
    fn png_bytes(width: u32, height: u32) -> Vec<u8> {
        let img = RgbaImage::from_pixel(width, height, image::Rgba([10, 20, 30, 255]));
        let mut buffer = Cursor::new(Vec::new());
        DynamicImage::ImageRgba8(img)
            .write_to(&mut buffer, image::ImageOutputFormat::Png)
            .unwrap();
        buffer.into_inner()
    }

    #[test]
    fn test_encode_is_reversible_and_bounded() {
        let payload = archiver().encode_image(&png_bytes(1600, 1200)).unwrap();

        let decoded = general_purpose::STANDARD.decode(&payload).unwrap();
        assert_eq!(
            image::guess_format(&decoded).unwrap(),
            image::ImageFormat::Jpeg
        );

        let img = image::load_from_memory(&decoded).unwrap();
        assert_eq!(img.width(), 800);
        assert_eq!(img.height(), 600);
    }

    #[test]
    fn test_small_image_not_upscaled() {
        let payload = archiver().encode_image(&png_bytes(200, 100)).unwrap();
        let decoded = general_purpose::STANDARD.decode(&payload).unwrap();
        let img = image::load_from_memory(&decoded).unwrap();
        assert_eq!(img.width(), 200);
        assert_eq!(img.height(), 100);
    }

    #[test]
    fn test_garbage_bytes_rejected() {
        assert!(archiver().encode_image(b"not an image").is_err());
    }

    #[test]
    fn test_image_record_shape() {
        let record =
            archiver().build_image_record("数学", "一模卷第10题", "计算错误", "QUJD".to_string());
        assert!(record.is_image_upload);
        assert_eq!(record.content, "📸 一模卷第10题");
        assert_eq!(record.answer, "见图");
        assert_eq!(record.analysis, "计算错误");
        assert_eq!(record.image_payload, "QUJD");
    }
}
