use crate::utils::error::{FortuneError, Result};
use ab_glyph::{point, Font, FontArc, PxScale, ScaleFont};
use base64::{engine::general_purpose, Engine as _};
use image::{ImageFormat, Rgba, RgbaImage};
use std::io::Cursor;
use std::path::Path;

pub const CANVAS_WIDTH: u32 = 600;
pub const CANVAS_HEIGHT: u32 = 400;
/// 文字從 (20, 20) 開始繪製
pub const TEXT_OFFSET: (f32, f32) = (20.0, 20.0);

const BACKGROUND: Rgba<u8> = Rgba([32, 24, 64, 255]);
const FOREGROUND: Rgba<u8> = Rgba([250, 246, 230, 255]);

/// 依寬度自動換行；`advance` 回傳單一字元的寬度
pub fn wrap_lines<F>(text: &str, max_width: f32, advance: F) -> Vec<String>
where
    F: Fn(char) -> f32,
{
    let mut lines = Vec::new();

    for paragraph in text.lines() {
        let mut line = String::new();
        let mut width = 0.0;

        for ch in paragraph.chars() {
            let w = advance(ch);
            if width + w > max_width && !line.is_empty() {
                lines.push(std::mem::take(&mut line));
                width = 0.0;
            }
            line.push(ch);
            width += w;
        }
        lines.push(line);
    }

    lines
}

pub struct ImageRenderer {
    font: FontArc,
    scale: PxScale,
}

impl ImageRenderer {
    pub fn from_bytes(bytes: Vec<u8>, font_size: f32) -> Result<Self> {
        let font = FontArc::try_from_vec(bytes).map_err(|e| FortuneError::RenderError {
            message: format!("invalid font: {}", e),
        })?;
        Ok(Self {
            font,
            scale: PxScale::from(font_size),
        })
    }

    pub fn from_file<P: AsRef<Path>>(path: P, font_size: f32) -> Result<Self> {
        let bytes = std::fs::read(&path)?;
        tracing::debug!("Loaded font {}", path.as_ref().display());
        Self::from_bytes(bytes, font_size)
    }

    /// 將文字畫到 600x400 的畫布上，超出底部的行直接裁掉
    pub fn render(&self, text: &str) -> RgbaImage {
        let mut canvas = blank_canvas();
        let scaled = self.font.as_scaled(self.scale);
        let (left, top) = TEXT_OFFSET;
        let max_width = CANVAS_WIDTH as f32 - left * 2.0;
        let line_height = scaled.height() + scaled.line_gap();

        let lines = wrap_lines(text, max_width, |ch| scaled.h_advance(scaled.glyph_id(ch)));
        let mut baseline = top + scaled.ascent();

        for line in lines {
            if baseline - scaled.descent() > CANVAS_HEIGHT as f32 {
                break;
            }

            let mut x = left;
            for ch in line.chars() {
                let glyph_id = scaled.glyph_id(ch);
                let glyph = glyph_id.with_scale_and_position(self.scale, point(x, baseline));
                x += scaled.h_advance(glyph_id);

                if let Some(outlined) = self.font.outline_glyph(glyph) {
                    let bounds = outlined.px_bounds();
                    outlined.draw(|gx, gy, coverage| {
                        let px = bounds.min.x as i32 + gx as i32;
                        let py = bounds.min.y as i32 + gy as i32;
                        if px >= 0 && py >= 0 && (px as u32) < CANVAS_WIDTH && (py as u32) < CANVAS_HEIGHT
                        {
                            let pixel = canvas.get_pixel_mut(px as u32, py as u32);
                            *pixel = blend(*pixel, FOREGROUND, coverage);
                        }
                    });
                }
            }

            baseline += line_height;
        }

        canvas
    }
}

pub fn blank_canvas() -> RgbaImage {
    RgbaImage::from_pixel(CANVAS_WIDTH, CANVAS_HEIGHT, BACKGROUND)
}

fn blend(base: Rgba<u8>, over: Rgba<u8>, coverage: f32) -> Rgba<u8> {
    let c = coverage.clamp(0.0, 1.0);
    let mix = |a: u8, b: u8| (f32::from(a) * (1.0 - c) + f32::from(b) * c).round() as u8;
    Rgba([
        mix(base[0], over[0]),
        mix(base[1], over[1]),
        mix(base[2], over[2]),
        255,
    ])
}

pub fn encode_png(image: &RgbaImage) -> Result<Vec<u8>> {
    let mut buffer = Cursor::new(Vec::new());
    image
        .write_to(&mut buffer, ImageFormat::Png)
        .map_err(|e| FortuneError::RenderError {
            message: e.to_string(),
        })?;
    Ok(buffer.into_inner())
}

/// 下載連結用的 `data:image/png;base64,...`
pub fn png_data_uri(png: &[u8]) -> String {
    let mut uri = String::from("data:image/png;base64,");
    general_purpose::STANDARD.encode_string(png, &mut uri);
    uri
}
