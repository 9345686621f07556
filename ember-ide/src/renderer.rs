//! Editor renderer using softbuffer (CPU rendering)
//!
//! Draws the whole window into a software buffer every frame: text with
//! selection and cursor, gutter, sidebar buttons, output panel and status
//! bar. Glyphs are rasterized once per character and cached.

use std::collections::HashMap;
use std::fs;
use std::num::NonZeroU32;
use std::path::PathBuf;
use std::rc::Rc;

use ember_core::highlight::{Highlighter, LineStyle};
use ember_core::width::{char_width, display_col};
use ember_core::Editor;
use ember_toolchain::ERROR_MARKER;
use fontdue::{Font, FontSettings};
use softbuffer::{Context, SoftBufferError, Surface};
use thiserror::Error;
use winit::window::Window;

use crate::config::{ColorScheme, FontConfig};
use crate::layout::{Layout, Rect, SidebarAction, PANEL_PADDING};

/// Width of the bar cursor
const CURSOR_WIDTH: u32 = 2;
/// Left margin of output and status text
const PANEL_TEXT_X: u32 = 15;

/// Renderer error type
#[derive(Error, Debug)]
pub enum RendererError {
    #[error("Failed to parse font {path}: {message}")]
    Font { path: PathBuf, message: String },

    #[error("No usable font found (tried {tried} paths); pass --font or set font.path")]
    NoFont { tried: usize },

    #[error("Surface error: {0}")]
    Surface(#[from] SoftBufferError),
}

/// Load the configured font, falling back through the list of well-known paths
///
/// Unreadable and unparseable files are skipped. When nothing loads, the last
/// parse failure is reported if there was one.
pub fn load_font(config: &FontConfig) -> Result<(Font, PathBuf), RendererError> {
    let candidates: Vec<&PathBuf> = config.path.iter().chain(config.fallbacks.iter()).collect();
    let mut parse_error = None;

    for path in &candidates {
        let data = match fs::read(path) {
            Ok(data) => data,
            Err(e) => {
                log::debug!("Skipping font {}: {}", path.display(), e);
                continue;
            }
        };
        match Font::from_bytes(data, FontSettings::default()) {
            Ok(font) => {
                log::debug!("Loaded font {}", path.display());
                return Ok((font, path.to_path_buf()));
            }
            Err(message) => {
                log::warn!("Failed to parse font {}: {}", path.display(), message);
                parse_error = Some(RendererError::Font {
                    path: path.to_path_buf(),
                    message: message.to_string(),
                });
            }
        }
    }

    Err(parse_error.unwrap_or(RendererError::NoFont {
        tried: candidates.len(),
    }))
}

/// Glyph cache entry
struct GlyphEntry {
    /// Bitmap data (alpha values)
    bitmap: Vec<u8>,
    width: usize,
    height: usize,
    /// X offset from pen position
    xmin: i32,
    /// Y offset from baseline
    ymin: i32,
}

/// Everything a frame shows
pub struct Frame<'a> {
    pub editor: &'a Editor,
    pub highlighter: &'a Highlighter,
    pub scroll: usize,
    pub output: &'a [String],
    pub output_scroll: usize,
    pub status: &'a str,
    pub hovered: Option<SidebarAction>,
}

/// Pixel buffer with its dimensions
struct Canvas<'a> {
    pixels: &'a mut [u32],
    width: u32,
    height: u32,
}

impl Canvas<'_> {
    fn fill_rect(&mut self, rect: Rect, color: (u8, u8, u8)) {
        let pixel = rgb_to_pixel(color);
        let right = rect.right().min(self.width);
        let bottom = rect.bottom().min(self.height);

        for py in rect.y.min(bottom)..bottom {
            let row = (py * self.width) as usize;
            for px in rect.x.min(right)..right {
                self.pixels[row + px as usize] = pixel;
            }
        }
    }

    /// Alpha-blend a glyph with its pen position at (x, baseline), clipped to `clip`
    fn draw_glyph(&mut self, x: i32, baseline: i32, glyph: &GlyphEntry, color: (u8, u8, u8), clip: Rect) {
        if glyph.width == 0 || glyph.height == 0 {
            return;
        }

        let gx = x + glyph.xmin;
        let gy = baseline - glyph.ymin - glyph.height as i32;
        let min_x = clip.x as i32;
        let min_y = clip.y as i32;
        let max_x = clip.right().min(self.width) as i32;
        let max_y = clip.bottom().min(self.height) as i32;

        for dy in 0..glyph.height {
            let py = gy + dy as i32;
            if py < min_y || py >= max_y {
                continue;
            }

            for dx in 0..glyph.width {
                let px = gx + dx as i32;
                if px < min_x || px >= max_x {
                    continue;
                }

                let alpha = glyph.bitmap[dy * glyph.width + dx];
                if alpha == 0 {
                    continue;
                }

                let idx = (py as u32 * self.width + px as u32) as usize;
                if alpha == 255 {
                    self.pixels[idx] = rgb_to_pixel(color);
                } else {
                    let existing = pixel_to_rgb(self.pixels[idx]);
                    let blended = blend_color(existing, color, alpha as f32 / 255.0);
                    self.pixels[idx] = rgb_to_pixel(blended);
                }
            }
        }
    }
}

/// Editor renderer
pub struct Renderer {
    #[allow(dead_code)]
    context: Context<Rc<Window>>,
    surface: Surface<Rc<Window>, Rc<Window>>,
    font: Font,
    font_size: f32,
    glyph_cache: HashMap<char, GlyphEntry>,
    /// Advance of one narrow cell
    cell_width: f32,
    /// Distance from the top of a row to the baseline
    baseline: f32,
    line_height: u32,
    colors: ColorScheme,
    width: u32,
    height: u32,
}

impl Renderer {
    /// Create a renderer for the window
    pub fn new(
        window: Rc<Window>,
        font_config: &FontConfig,
        line_height: u32,
        colors: ColorScheme,
    ) -> Result<Self, RendererError> {
        let context = Context::new(window.clone())?;
        let surface = Surface::new(&context, window.clone())?;

        let (font, path) = load_font(font_config)?;
        log::info!("Using font {} at {}px", path.display(), font_config.size);

        let font_size = font_config.size;
        let cell_width = font.metrics('M', font_size).advance_width.ceil().max(1.0);
        let (ascent, descent) = font
            .horizontal_line_metrics(font_size)
            .map(|m| (m.ascent, m.descent))
            .unwrap_or((font_size, 0.0));
        // centre the ascent..descent box in the row
        let baseline = ((line_height as f32 - (ascent - descent)) / 2.0).max(0.0) + ascent;

        let size = window.inner_size();

        let mut renderer = Self {
            context,
            surface,
            font,
            font_size,
            glyph_cache: HashMap::with_capacity(128),
            cell_width,
            baseline: baseline.round(),
            line_height,
            colors,
            width: size.width,
            height: size.height,
        };
        for c in ' '..='~' {
            renderer.ensure_glyph_cached(c);
        }

        Ok(renderer)
    }

    pub fn cell_width(&self) -> f32 {
        self.cell_width
    }

    pub fn resize(&mut self, width: u32, height: u32) {
        self.width = width;
        self.height = height;
    }

    /// Set the color scheme (for theme switching)
    pub fn set_colors(&mut self, colors: ColorScheme) {
        self.colors = colors;
    }

    /// Draw one frame
    pub fn render(&mut self, layout: &Layout, frame: &Frame<'_>) -> Result<(), RendererError> {
        let (width, height) = (self.width, self.height);
        let (Some(w), Some(h)) = (NonZeroU32::new(width), NonZeroU32::new(height)) else {
            return Ok(());
        };
        self.surface.resize(w, h)?;

        let buffer_lines = frame.editor.buffer();
        let rows = layout.visible_rows();
        let last_line = (frame.scroll + rows).min(buffer_lines.line_count());
        let output_end = (frame.output_scroll + layout.output_rows()).min(frame.output.len());

        // Rasterize everything this frame needs before borrowing the surface
        let mut needed: Vec<&str> = Vec::new();
        for line in frame.scroll..last_line {
            needed.extend(buffer_lines.line(line));
        }
        needed.extend(frame.output.get(frame.output_scroll..output_end).unwrap_or(&[]).iter().map(String::as_str));
        needed.push(frame.status);
        needed.extend(SidebarAction::ALL.iter().map(|a| a.label()));
        for text in needed {
            for c in text.chars() {
                self.ensure_glyph_cached(c);
            }
        }

        let colors = &self.colors;
        let rgb = ColorScheme::rgb;
        let mut buffer = self.surface.buffer_mut()?;
        let mut canvas = Canvas {
            pixels: &mut buffer,
            width,
            height,
        };
        let text = TextStyle {
            glyphs: &self.glyph_cache,
            cell_width: self.cell_width,
            baseline: self.baseline as i32,
        };

        canvas.fill_rect(Rect::new(0, 0, width, height), rgb(&colors.background));

        // Text area
        let area = layout.text_area();
        let text_x = layout.text_x();
        let selection = frame.editor.selection().filter(|s| !s.is_empty());
        let cursor = frame.editor.cursor().position();
        let line_height = self.line_height;

        for (row, index) in (frame.scroll..last_line).enumerate() {
            let line = buffer_lines.line(index).unwrap_or("");
            let y = row as u32 * line_height;

            if let Some(sel) = selection {
                if sel.touches_line(index) {
                    let (start, end) = sel.bounds();
                    let from = if index == start.line { start.col } else { 0 };
                    let len = line.chars().count();
                    let x0 = display_col(line, from);
                    let x1 = if index == end.line {
                        display_col(line, end.col)
                    } else {
                        // include the line break
                        display_col(line, len) + 1
                    };
                    if x1 > x0 {
                        let rect = Rect::new(
                            text_x + (x0 as f32 * self.cell_width) as u32,
                            y,
                            ((x1 - x0) as f32 * self.cell_width) as u32,
                            line_height,
                        );
                        canvas.fill_rect(clip_rect(rect, area), rgb(&colors.selection));
                    }
                }
            }

            let color = match frame.highlighter.style(line) {
                LineStyle::Keyword => rgb(&colors.keyword),
                LineStyle::Plain => rgb(&colors.foreground),
            };
            text.draw(&mut canvas, line, text_x as i32, y as i32, color, area);

            if index == cursor.line {
                let cx = text_x + (display_col(line, cursor.col) as f32 * self.cell_width) as u32;
                let inset = line_height / 6;
                let bar = Rect::new(cx, y + inset, CURSOR_WIDTH, line_height.saturating_sub(inset * 2));
                canvas.fill_rect(clip_rect(bar, area), rgb(&colors.cursor));
            }
        }

        // Gutter with centred line numbers
        let gutter = layout.gutter();
        canvas.fill_rect(gutter, rgb(&colors.gutter));
        for (row, index) in (frame.scroll..last_line).enumerate() {
            let label = (index + 1).to_string();
            let x = gutter.width as i32 / 2 - text.measure(&label) / 2;
            let y = (row as u32 * line_height) as i32;
            text.draw(&mut canvas, &label, x, y, rgb(&colors.gutter_text), gutter);
        }

        // Sidebar
        canvas.fill_rect(layout.sidebar(), rgb(&colors.sidebar));
        for button in layout.buttons() {
            let fill = if frame.hovered == Some(button.action) {
                &colors.button_hover
            } else {
                &colors.button
            };
            canvas.fill_rect(button.rect, rgb(fill));
            let label = button.action.label();
            let x = button.rect.x as i32 + (button.rect.width as i32 - text.measure(label)) / 2;
            let y = button.rect.y as i32 + (button.rect.height as i32 - line_height as i32) / 2;
            text.draw(&mut canvas, label, x, y, rgb(&colors.button_text), button.rect);
        }

        // Output panel
        let panel = layout.output_panel();
        canvas.fill_rect(panel, rgb(&colors.output_background));
        for (row, message) in frame.output[frame.output_scroll.min(output_end)..output_end]
            .iter()
            .enumerate()
        {
            let color = if message.starts_with(ERROR_MARKER) {
                rgb(&colors.error_text)
            } else {
                rgb(&colors.output_text)
            };
            let y = panel.y + PANEL_PADDING / 2 + row as u32 * line_height;
            text.draw(&mut canvas, message, PANEL_TEXT_X as i32, y as i32, color, panel);
        }

        // Status bar
        let status = layout.status_bar();
        canvas.fill_rect(status, rgb(&colors.status_background));
        let y = status.y as i32 + (status.height as i32 - line_height as i32) / 2;
        text.draw(&mut canvas, frame.status, PANEL_PADDING as i32, y, rgb(&colors.status_text), status);

        buffer.present()?;
        Ok(())
    }

    fn ensure_glyph_cached(&mut self, c: char) {
        if c.is_whitespace() || self.glyph_cache.contains_key(&c) {
            return;
        }

        let (metrics, bitmap) = self.font.rasterize(c, self.font_size);
        self.glyph_cache.insert(
            c,
            GlyphEntry {
                bitmap,
                width: metrics.width,
                height: metrics.height,
                xmin: metrics.xmin,
                ymin: metrics.ymin,
            },
        );
    }
}

/// Monospace text drawing parameters
struct TextStyle<'a> {
    glyphs: &'a HashMap<char, GlyphEntry>,
    cell_width: f32,
    baseline: i32,
}

impl TextStyle<'_> {
    /// Width of a string in pixels
    fn measure(&self, text: &str) -> i32 {
        let cells: usize = text.chars().map(char_width).sum();
        (cells as f32 * self.cell_width) as i32
    }

    /// Draw a single row of text with its row top at `y`
    fn draw(&self, canvas: &mut Canvas<'_>, text: &str, x: i32, y: i32, color: (u8, u8, u8), clip: Rect) {
        let mut cells = 0usize;
        for c in text.chars() {
            let pen = x + (cells as f32 * self.cell_width) as i32;
            if pen >= clip.right() as i32 {
                break;
            }
            if let Some(glyph) = self.glyphs.get(&c) {
                canvas.draw_glyph(pen, y + self.baseline, glyph, color, clip);
            }
            cells += char_width(c);
        }
    }
}

fn clip_rect(rect: Rect, clip: Rect) -> Rect {
    let x = rect.x.clamp(clip.x, clip.right());
    let y = rect.y.clamp(clip.y, clip.bottom());
    let right = rect.right().clamp(x, clip.right());
    let bottom = rect.bottom().clamp(y, clip.bottom());
    Rect::new(x, y, right - x, bottom - y)
}

/// Convert RGB to pixel value (ARGB format)
fn rgb_to_pixel(color: (u8, u8, u8)) -> u32 {
    0xFF000000 | ((color.0 as u32) << 16) | ((color.1 as u32) << 8) | (color.2 as u32)
}

fn pixel_to_rgb(pixel: u32) -> (u8, u8, u8) {
    (
        ((pixel >> 16) & 0xFF) as u8,
        ((pixel >> 8) & 0xFF) as u8,
        (pixel & 0xFF) as u8,
    )
}

fn blend_color(a: (u8, u8, u8), b: (u8, u8, u8), t: f32) -> (u8, u8, u8) {
    (
        (a.0 as f32 * (1.0 - t) + b.0 as f32 * t) as u8,
        (a.1 as f32 * (1.0 - t) + b.1 as f32 * t) as u8,
        (a.2 as f32 * (1.0 - t) + b.2 as f32 * t) as u8,
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_pixel_roundtrip() {
        let color = (0x12, 0x34, 0x56);
        assert_eq!(rgb_to_pixel(color), 0xFF123456);
        assert_eq!(pixel_to_rgb(rgb_to_pixel(color)), color);
    }

    #[test]
    fn test_blend_color() {
        assert_eq!(blend_color((0, 0, 0), (255, 255, 255), 0.0), (0, 0, 0));
        assert_eq!(blend_color((0, 0, 0), (255, 255, 255), 1.0), (255, 255, 255));
        assert_eq!(blend_color((0, 0, 0), (200, 100, 50), 0.5), (100, 50, 25));
    }

    #[test]
    fn test_clip_rect() {
        let clip = Rect::new(60, 0, 100, 50);
        assert_eq!(clip_rect(Rect::new(70, 10, 20, 20), clip), Rect::new(70, 10, 20, 20));
        assert_eq!(clip_rect(Rect::new(150, 40, 30, 30), clip), Rect::new(150, 40, 10, 10));
        assert_eq!(clip_rect(Rect::new(0, 0, 10, 10), clip).width, 0);
    }

    #[test]
    fn test_fill_rect_clips_to_canvas() {
        let mut pixels = vec![0u32; 4 * 3];
        let mut canvas = Canvas {
            pixels: &mut pixels,
            width: 4,
            height: 3,
        };
        canvas.fill_rect(Rect::new(2, 1, 10, 10), (255, 0, 0));
        assert_eq!(pixels[0], 0);
        assert_eq!(pixels[4 + 2], 0xFFFF0000);
        assert_eq!(pixels[4 + 3], 0xFFFF0000);
        assert_eq!(pixels[8 + 1], 0);
    }

    #[test]
    fn test_draw_glyph_blends() {
        let mut pixels = vec![rgb_to_pixel((0, 0, 0)); 4 * 4];
        let mut canvas = Canvas {
            pixels: &mut pixels,
            width: 4,
            height: 4,
        };
        let glyph = GlyphEntry {
            bitmap: vec![255, 0, 0, 128],
            width: 2,
            height: 2,
            xmin: 0,
            ymin: 0,
        };
        canvas.draw_glyph(1, 3, &glyph, (200, 200, 200), Rect::new(0, 0, 4, 4));
        // glyph occupies rows 1..3, columns 1..3
        assert_eq!(pixel_to_rgb(pixels[4 + 1]), (200, 200, 200));
        assert_eq!(pixel_to_rgb(pixels[4 + 2]), (0, 0, 0));
        assert_eq!(pixel_to_rgb(pixels[8 + 2]), (100, 100, 100));
    }

    #[test]
    fn test_missing_fonts_reported() {
        let config = FontConfig {
            path: Some(PathBuf::from("/nonexistent/ember/a.ttf")),
            size: 16.0,
            fallbacks: vec![PathBuf::from("/nonexistent/ember/b.ttf")],
        };
        match load_font(&config) {
            Err(RendererError::NoFont { tried }) => assert_eq!(tried, 2),
            other => panic!("unexpected: {:?}", other.map(|(_, p)| p)),
        }
    }

    #[test]
    fn test_garbage_font_is_a_parse_error() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("bad.ttf");
        fs::write(&path, b"not a font").unwrap();
        let config = FontConfig {
            path: Some(path.clone()),
            size: 16.0,
            fallbacks: Vec::new(),
        };
        match load_font(&config) {
            Err(RendererError::Font { path: p, .. }) => assert_eq!(p, path),
            other => panic!("unexpected: {:?}", other.map(|(_, p)| p)),
        }
    }

    #[test]
    fn test_unparseable_font_falls_through_to_fallbacks() {
        let dir = tempfile::tempdir().unwrap();
        let configured = dir.path().join("broken.ttf");
        let fallback = dir.path().join("also-broken.otf");
        fs::write(&configured, b"not a font").unwrap();
        fs::write(&fallback, b"still not a font").unwrap();
        let config = FontConfig {
            path: Some(configured),
            size: 16.0,
            fallbacks: vec![PathBuf::from("/nonexistent/ember/c.ttf"), fallback.clone()],
        };
        match load_font(&config) {
            Err(RendererError::Font { path, .. }) => assert_eq!(path, fallback),
            other => panic!("unexpected: {:?}", other.map(|(_, p)| p)),
        }
    }
}
