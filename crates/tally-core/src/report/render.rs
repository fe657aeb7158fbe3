//! Chart rendering onto RGBA buffers with imageproc.
//!
//! Two charts are produced per run: a confusion-matrix heat map with the value
//! printed in every cell, and a grouped bar chart of per-class precision and
//! sensitivity around a zero baseline. Text is set in the bundled DejaVu Sans
//! Mono.

use ab_glyph::{FontRef, PxScale};
use image::{imageops, Rgba, RgbaImage};
use imageproc::drawing::{draw_filled_rect_mut, draw_hollow_rect_mut, draw_text_mut, text_size};
use imageproc::rect::Rect;

use crate::config::ReportConfig;
use crate::error::MetricsError;
use crate::metrics::ConfusionMatrix;

static FONT_DATA: &[u8] = include_bytes!("../../assets/fonts/DejaVuSansMono.ttf");

const BACKGROUND: Rgba<u8> = Rgba([255, 255, 255, 255]);
const AXIS: Rgba<u8> = Rgba([40, 40, 40, 255]);
const TEXT_DARK: Rgba<u8> = Rgba([0, 0, 0, 255]);
const TEXT_LIGHT: Rgba<u8> = Rgba([255, 255, 255, 255]);
const SERIES_PRIMARY: Rgba<u8> = Rgba([31, 119, 180, 255]);
const SERIES_SECONDARY: Rgba<u8> = Rgba([255, 127, 14, 255]);

/// End points of the heat-map ramp (light for zero, dark for the maximum).
const RAMP_LOW: [f32; 3] = [247.0, 251.0, 255.0];
const RAMP_HIGH: [f32; 3] = [8.0, 48.0, 107.0];

/// Bar width in x-axis units.
const BAR_WIDTH: f64 = 0.4;

/// Titles for a bar chart.
#[derive(Debug, Clone, Copy)]
pub struct BarLabels<'a> {
    pub title: &'a str,
    pub x_label: &'a str,
    pub y_label: &'a str,
}

impl Default for BarLabels<'_> {
    fn default() -> Self {
        Self {
            title: "Bar Chart",
            x_label: "X",
            y_label: "Y",
        }
    }
}

/// Renders report charts at a fixed canvas size.
#[derive(Debug, Clone, Copy)]
pub struct ChartRenderer {
    width: u32,
    height: u32,
    normalize: bool,
}

/// Placement of the confusion-matrix grid on the canvas.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
struct Grid {
    left: u32,
    top: u32,
    cell: u32,
    /// Width of the widest class-name tick, capped at a quarter of the canvas
    tick_w: u32,
}

impl ChartRenderer {
    pub fn new(width: u32, height: u32) -> Self {
        Self {
            width,
            height,
            normalize: false,
        }
    }

    pub fn from_config(config: &ReportConfig) -> Self {
        Self::new(config.chart_width, config.chart_height)
            .with_normalize(config.normalize_confusion)
    }

    /// Print row-normalized rates (two decimals) instead of raw counts in the
    /// confusion chart.
    pub fn with_normalize(mut self, normalize: bool) -> Self {
        self.normalize = normalize;
        self
    }

    fn short_side(&self) -> u32 {
        self.width.min(self.height)
    }

    fn margin(&self) -> u32 {
        (self.short_side() / 24).max(4)
    }

    fn label_scale(&self) -> PxScale {
        PxScale::from((self.short_side() as f32 / 28.0).max(8.0))
    }

    fn title_scale(&self) -> PxScale {
        PxScale::from((self.short_side() as f32 / 20.0).max(10.0))
    }

    /// The grid takes the largest square left after the title, the axis names,
    /// the class-name ticks and the color bar.
    fn confusion_grid<S: AsRef<str>>(&self, font: &FontRef<'_>, class_names: &[S]) -> Grid {
        let m = self.margin();
        let (_, title_h) = text_size(self.title_scale(), font, "Confusion matrix");
        let (_, label_h) = text_size(self.label_scale(), font, "Predicted label");
        let tick_w = class_names
            .iter()
            .map(|name| text_size(self.label_scale(), font, name.as_ref()).0)
            .max()
            .unwrap_or(0)
            .min(self.short_side() / 4);

        let left = m + label_h + m + tick_w + m / 2;
        let top = m + title_h + m;
        let right = 3 * m;
        let bottom = m / 2 + tick_w + m + label_h + m;
        let side = self
            .width
            .saturating_sub(left + right)
            .min(self.height.saturating_sub(top + bottom));
        let n = class_names.len().max(1) as u32;

        Grid {
            left,
            top,
            cell: (side / n).max(1),
            tick_w,
        }
    }

    /// Heat map of a confusion matrix, rows = true class, columns = predicted.
    ///
    /// Rows are labelled on the left and columns underneath with `class_names`.
    /// Fails if `class_names` does not have one entry per matrix row.
    pub fn render_confusion<S: AsRef<str>>(
        &self,
        cm: &ConfusionMatrix,
        class_names: &[S],
    ) -> Result<RgbaImage, MetricsError> {
        cm.check_classes(class_names)?;
        let font = load_font()?;

        let n = cm.num_classes();
        let values: Vec<Vec<f64>> = if self.normalize {
            cm.normalized()
        } else {
            (0..n)
                .map(|i| (0..n).map(|j| cm.get(i, j) as f64).collect())
                .collect()
        };
        let max = values.iter().flatten().copied().fold(0.0_f64, f64::max);
        let threshold = max / 2.0;

        let mut img = RgbaImage::from_pixel(self.width, self.height, BACKGROUND);
        let m = self.margin();
        let label = self.label_scale();
        let Grid {
            left,
            top,
            cell,
            tick_w,
        } = self.confusion_grid(&font, class_names);
        let grid = cell * n as u32;
        let value_scale = PxScale::from((cell as f32 * 0.4).min(label.y * 1.5));

        for (i, row) in values.iter().enumerate() {
            for (j, &v) in row.iter().enumerate() {
                let intensity = if max > 0.0 { (v / max) as f32 } else { 0.0 };
                let (x0, y0) = (left + j as u32 * cell, top + i as u32 * cell);
                fill(&mut img, x0, y0, cell, cell, ramp(intensity));

                let text = if self.normalize {
                    format!("{v:.2}")
                } else {
                    cm.get(i, j).to_string()
                };
                let (tw, th) = text_size(value_scale, &font, &text);
                if tw + 2 <= cell && th + 2 <= cell {
                    let color = if v > threshold { TEXT_LIGHT } else { TEXT_DARK };
                    draw_text_mut(
                        &mut img,
                        color,
                        (x0 + (cell - tw) / 2) as i32,
                        (y0 + (cell - th) / 2) as i32,
                        value_scale,
                        &font,
                        &text,
                    );
                }
            }
        }
        outline(&mut img, left, top, grid, grid);

        for (i, name) in class_names.iter().enumerate() {
            let name = name.as_ref();
            let (tw, th) = text_size(label, &font, name);
            let offset = i as u32 * cell + cell.saturating_sub(th) / 2;
            draw_text_mut(
                &mut img,
                TEXT_DARK,
                left as i32 - (m / 2) as i32 - tw as i32,
                (top + offset) as i32,
                label,
                &font,
                name,
            );
            draw_vertical_text(&mut img, &font, label, name, left + offset, top + grid + m / 2);
        }

        let title = if self.normalize {
            "Normalized confusion matrix"
        } else {
            "Confusion matrix"
        };
        draw_centered(&mut img, &font, self.title_scale(), title, left + grid / 2, m);
        draw_centered(
            &mut img,
            &font,
            label,
            "Predicted label",
            left + grid / 2,
            top + grid + m / 2 + tick_w + m,
        );
        let (tw, _) = text_size(label, &font, "True label");
        draw_vertical_text(
            &mut img,
            &font,
            label,
            "True label",
            m,
            (top + grid / 2).saturating_sub(tw / 2),
        );

        // Vertical color bar, dark at the top.
        let bar_x = left + grid + m;
        for dy in 0..grid {
            let t = 1.0 - dy as f32 / grid.max(1) as f32;
            fill(&mut img, bar_x, top + dy, m, 1, ramp(t));
        }
        outline(&mut img, bar_x, top, m, grid);

        Ok(img)
    }

    /// Grouped bar chart: `heights` centred on `x`, optional `heights2` one bar
    /// width to the left.
    ///
    /// The y-range always includes zero, so negative values (the `-1` sentinel)
    /// draw downward from the baseline.
    pub fn render_bar(
        &self,
        x: &[f64],
        heights: &[f64],
        heights2: Option<&[f64]>,
        labels: BarLabels<'_>,
    ) -> Result<RgbaImage, MetricsError> {
        if heights.len() != x.len() {
            return Err(MetricsError::InvalidInput(format!(
                "{} bar heights for {} x positions",
                heights.len(),
                x.len()
            )));
        }
        if let Some(h2) = heights2 {
            if h2.len() != x.len() {
                return Err(MetricsError::InvalidInput(format!(
                    "{} secondary bar heights for {} x positions",
                    h2.len(),
                    x.len()
                )));
            }
        }
        let all = || x.iter().chain(heights).chain(heights2.unwrap_or(&[]));
        if all().any(|v| !v.is_finite()) {
            return Err(MetricsError::InvalidInput(
                "bar chart values must be finite".to_string(),
            ));
        }
        let font = load_font()?;

        let values = || heights.iter().chain(heights2.unwrap_or(&[]));
        let y_min = values().copied().fold(0.0_f64, f64::min);
        let mut y_max = values().copied().fold(0.0_f64, f64::max);
        if y_max == y_min {
            y_max = y_min + 1.0;
        }
        let (x_min, x_max) = if x.is_empty() {
            (0.0, 1.0)
        } else {
            let lo = x.iter().copied().fold(f64::INFINITY, f64::min);
            let hi = x.iter().copied().fold(f64::NEG_INFINITY, f64::max);
            (lo - 2.0 * BAR_WIDTH, hi + 2.0 * BAR_WIDTH)
        };

        let m = self.margin();
        let label = self.label_scale();
        let y_ticks = [y_max, 0.0, y_min];
        let y_texts = y_ticks.map(|v| format!("{v:.1}"));
        let ytick_w = y_texts
            .iter()
            .map(|t| text_size(label, &font, t).0)
            .max()
            .unwrap_or(0);
        let (_, title_h) = text_size(self.title_scale(), &font, labels.title);
        let (_, label_h) = text_size(label, &font, "0123456789");

        let left = m + label_h + m + ytick_w + m / 2;
        let top = m + title_h + m;
        let bottom = m / 2 + label_h + m / 2 + label_h + m;
        let plot_w = self.width.saturating_sub(left + m).max(1);
        let plot_h = self.height.saturating_sub(top + bottom).max(1);

        let mut img = RgbaImage::from_pixel(self.width, self.height, BACKGROUND);
        let to_px = |v: f64| left as f64 + (v - x_min) / (x_max - x_min) * plot_w as f64;
        let to_py = |v: f64| top as f64 + (y_max - v) / (y_max - y_min) * plot_h as f64;
        let baseline = to_py(0.0);

        let mut draw_series = |offset: f64, series: &[f64], color: Rgba<u8>| {
            for (&xi, &h) in x.iter().zip(series) {
                let l = to_px(xi + offset - BAR_WIDTH / 2.0);
                let r = to_px(xi + offset + BAR_WIDTH / 2.0);
                let t = to_py(h).min(baseline);
                let b = to_py(h).max(baseline);
                fill(
                    &mut img,
                    l.round() as u32,
                    t.round() as u32,
                    (r - l).round() as u32,
                    (b - t).round() as u32,
                    color,
                );
            }
        };
        draw_series(0.0, heights, SERIES_PRIMARY);
        if let Some(h2) = heights2 {
            draw_series(-BAR_WIDTH, h2, SERIES_SECONDARY);
        }

        fill(&mut img, left, baseline.round() as u32, plot_w, 1, AXIS);
        outline(&mut img, left, top, plot_w, plot_h);

        for (v, text) in y_ticks.iter().zip(&y_texts) {
            let (tw, th) = text_size(label, &font, text);
            draw_text_mut(
                &mut img,
                AXIS,
                left as i32 - (m / 2) as i32 - tw as i32,
                to_py(*v).round() as i32 - (th / 2) as i32,
                label,
                &font,
                text,
            );
        }
        for &xi in x {
            let text = format!("{xi}");
            let (tw, _) = text_size(label, &font, &text);
            draw_text_mut(
                &mut img,
                AXIS,
                to_px(xi).round() as i32 - (tw / 2) as i32,
                (top + plot_h + m / 2) as i32,
                label,
                &font,
                &text,
            );
        }

        let center = left + plot_w / 2;
        draw_centered(&mut img, &font, self.title_scale(), labels.title, center, m);
        draw_centered(
            &mut img,
            &font,
            label,
            labels.x_label,
            center,
            top + plot_h + m / 2 + label_h + m / 2,
        );
        let (tw, _) = text_size(label, &font, labels.y_label);
        draw_vertical_text(
            &mut img,
            &font,
            label,
            labels.y_label,
            m,
            (top + plot_h / 2).saturating_sub(tw / 2),
        );

        Ok(img)
    }
}

fn load_font() -> Result<FontRef<'static>, MetricsError> {
    FontRef::try_from_slice(FONT_DATA).map_err(|e| MetricsError::Font(e.to_string()))
}

fn ramp(t: f32) -> Rgba<u8> {
    let t = t.clamp(0.0, 1.0);
    let mix = |c: usize| (RAMP_LOW[c] + (RAMP_HIGH[c] - RAMP_LOW[c]) * t).round() as u8;
    Rgba([mix(0), mix(1), mix(2), 255])
}

/// Filled rectangle, at least one pixel each way.
fn fill(img: &mut RgbaImage, x: u32, y: u32, w: u32, h: u32, color: Rgba<u8>) {
    let rect = Rect::at(x as i32, y as i32).of_size(w.max(1), h.max(1));
    draw_filled_rect_mut(img, rect, color);
}

fn outline(img: &mut RgbaImage, x: u32, y: u32, w: u32, h: u32) {
    let rect = Rect::at(x as i32, y as i32).of_size(w.max(1), h.max(1));
    draw_hollow_rect_mut(img, rect, AXIS);
}

/// Dark text horizontally centred on `cx`, top edge at `y`.
fn draw_centered(img: &mut RgbaImage, font: &FontRef<'_>, scale: PxScale, text: &str, cx: u32, y: u32) {
    let (tw, _) = text_size(scale, font, text);
    draw_text_mut(
        img,
        TEXT_DARK,
        cx as i32 - (tw / 2) as i32,
        y as i32,
        scale,
        font,
        text,
    );
}

/// Dark text reading bottom to top, top-left corner at `(x, y)`.
fn draw_vertical_text(
    img: &mut RgbaImage,
    font: &FontRef<'_>,
    scale: PxScale,
    text: &str,
    x: u32,
    y: u32,
) {
    let (w, h) = text_size(scale, font, text);
    if w == 0 || h == 0 {
        return;
    }
    let mut strip = RgbaImage::from_pixel(w, h, BACKGROUND);
    draw_text_mut(&mut strip, TEXT_DARK, 0, 0, scale, font, text);
    let rotated = imageops::rotate270(&strip);
    imageops::overlay(img, &rotated, x as i64, y as i64);
}
