//! Ridge plot rendering.
//!
//! One row per day, each holding a kernel density curve of the hours spent
//! asleep. Rows share a density scale and overlap vertically so the shift in
//! sleep timing reads as a continuous landscape. Later days are drawn over
//! earlier ones.
//!
//! All geometry is specified in inches and points and scaled by the DPI, so
//! the same options produce the same picture at any resolution.

use crate::kde::GaussianKde;
use crate::palette::Cubehelix;
use crate::{Error, Result, Sample, HOURS_PER_DAY};
use plotters::coord::Shift;
use plotters::prelude::*;
use plotters::style::text_anchor::{HPos, Pos, VPos};
use plotters::style::{FontDesc, FontFamily, FontStyle};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::panic::{self, AssertUnwindSafe};
use std::path::Path;

const POINTS_PER_INCH: f64 = 72.0;

/// Hours between x-axis ticks
const TICK_EVERY_HOURS: usize = 3;

/// Headroom above the tallest curve, as a fraction of the density range
const Y_MARGIN: f64 = 0.05;

/// Day label position left of the axis, as a fraction of the plot width
const LABEL_OFFSET: f64 = 0.015;

const FILL_OUTLINE_PT: f64 = 1.5;
const HIGHLIGHT_PT: f64 = 2.0;
const BASELINE_PT: f64 = 2.0;

/// Styling and geometry of the rendered figure
#[derive(Clone, Debug, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct RenderOptions {
    pub title: String,
    pub dpi: u32,
    /// Blank border around the whole figure
    pub pad_inches: f64,
    /// Width of the plotting area, excluding padding and labels
    pub width_inches: f64,
    pub row_height_inches: f64,
    /// Fraction of a row hidden under the next one, in `[0, 1)`
    pub overlap: f64,
    /// Multiplier on Scott's rule bandwidth
    pub bw_adjust: f64,
    /// Density evaluation points per curve
    pub gridsize: usize,
    pub font_family: String,
    pub font_size_pt: f64,
    pub palette: Cubehelix,
}

impl Default for RenderOptions {
    fn default() -> Self {
        Self {
            title: "the first 100 days and nights".into(),
            dpi: 350,
            pad_inches: 1.0,
            width_inches: 10.0,
            row_height_inches: 0.7,
            overlap: 0.75,
            bw_adjust: 0.1,
            gridsize: 1000,
            font_family: "serif".into(),
            font_size_pt: 10.0,
            palette: Cubehelix::default(),
        }
    }
}

impl RenderOptions {
    pub fn validate(&self) -> Result<()> {
        let invalid = |what: &str| -> Result<()> { Err(Error::InvalidParameter(what.to_string())) };

        if self.dpi == 0 {
            return invalid("dpi must be positive");
        }
        if !(self.pad_inches >= 0.0) {
            return invalid("pad_inches must not be negative");
        }
        if !(self.width_inches > 0.0) || !(self.row_height_inches > 0.0) {
            return invalid("figure dimensions must be positive");
        }
        if !(0.0..1.0).contains(&self.overlap) {
            return invalid("overlap must be in [0, 1)");
        }
        if !(self.bw_adjust > 0.0) {
            return invalid("bw_adjust must be positive");
        }
        if self.gridsize < 2 {
            return invalid("gridsize must be at least 2");
        }
        if !(self.font_size_pt > 0.0) {
            return invalid("font_size_pt must be positive");
        }
        Ok(())
    }
}

/// Tick label for an hour of the day on a 12-hour clock
pub fn format_hour_tick(hour: u32) -> String {
    match hour {
        0 | 24 => "12 am".to_string(),
        h if h < 12 => format!("{} am", h),
        12 => "12 pm".to_string(),
        h => format!("{} pm", h - 12),
    }
}

/// Pixel geometry derived from `RenderOptions` and the number of rows
#[derive(Clone, Debug)]
struct Layout {
    px_per_inch: f64,
    plot_left: f64,
    plot_width: f64,
    top: f64,
    row_height: f64,
    row_step: f64,
    font_px: f64,
    title_px: f64,
    tick_y: f64,
    title_y: f64,
    width: u32,
    height: u32,
}

impl Layout {
    fn new(options: &RenderOptions, rows: usize) -> Self {
        let px_per_inch = f64::from(options.dpi);
        let pad = options.pad_inches * px_per_inch;
        let plot_width = options.width_inches * px_per_inch;
        let gutter = plot_width * LABEL_OFFSET * 3.0;
        let row_height = options.row_height_inches * px_per_inch;
        let row_step = row_height * (1.0 - options.overlap);
        let font_px = options.font_size_pt * px_per_inch / POINTS_PER_INCH;
        let title_px = font_px * 1.2;

        let last_baseline = pad + row_height + rows.saturating_sub(1) as f64 * row_step;
        let tick_y = last_baseline + 0.1 * px_per_inch;
        let title_y = tick_y + font_px * 2.0;
        let bottom = title_y + title_px * 1.5 + pad;

        Self {
            px_per_inch,
            plot_left: pad + gutter,
            plot_width,
            top: pad,
            row_height,
            row_step,
            font_px,
            title_px,
            tick_y,
            title_y,
            width: (pad + gutter + plot_width + pad).ceil() as u32,
            height: bottom.ceil() as u32,
        }
    }

    fn points(&self, pt: f64) -> u32 {
        (pt * self.px_per_inch / POINTS_PER_INCH).round().max(1.0) as u32
    }

    fn x(&self, hour: f64) -> i32 {
        (self.plot_left + hour / HOURS_PER_DAY * self.plot_width).round() as i32
    }

    fn baseline(&self, row: usize) -> i32 {
        (self.top + self.row_height + row as f64 * self.row_step).round() as i32
    }
}

/// Image size in pixels for `rows` ridge rows
pub fn figure_size(options: &RenderOptions, rows: usize) -> (u32, u32) {
    let layout = Layout::new(options, rows);
    (layout.width, layout.height)
}

/// A day's row: its label and, when estimable, the density curve
struct Ridge {
    day: i64,
    curve: Option<Vec<(f64, f64)>>,
}

fn build_ridges(samples: &[Sample], options: &RenderOptions) -> Vec<Ridge> {
    let mut by_day: BTreeMap<i64, Vec<f64>> = BTreeMap::new();
    for sample in samples {
        by_day.entry(sample.day).or_default().push(sample.hour_offset);
    }

    by_day
        .into_iter()
        .map(|(day, hours)| {
            let curve = GaussianKde::fit(&hours, options.bw_adjust)
                .map(|kde| kde.curve((0.0, HOURS_PER_DAY), options.gridsize));
            if curve.is_none() {
                tracing::warn!(
                    "Day {} has {} samples with no spread; skipping its density curve",
                    day,
                    hours.len()
                );
            }
            Ridge { day, curve }
        })
        .collect()
}

/// Render `samples` as a ridge plot PNG at `output`.
///
/// The file is overwritten if it exists.
pub fn render_ridge_plot(samples: &[Sample], output: &Path, options: &RenderOptions) -> Result<()> {
    options.validate()?;
    if samples.is_empty() {
        return Err(Error::NoSamples);
    }

    let ridges = build_ridges(samples, options);
    let max_density = ridges
        .iter()
        .filter_map(|r| r.curve.as_ref())
        .flatten()
        .map(|&(_, density)| density)
        .fold(0.0, f64::max);
    let y_top = if max_density > 0.0 {
        max_density * (1.0 + Y_MARGIN)
    } else {
        1.0
    };

    let palette = options.palette.palette(ridges.len());
    let text_color = palette.last().copied().unwrap_or(BLACK);
    let layout = Layout::new(options, ridges.len());

    tracing::debug!(
        "Rendering {} rows at {}x{} px",
        ridges.len(),
        layout.width,
        layout.height
    );

    let root = BitMapBackend::new(output, (layout.width, layout.height)).into_drawing_area();
    root.fill(&WHITE)?;

    let font = FontDesc::new(
        FontFamily::from(options.font_family.as_str()),
        layout.font_px,
        FontStyle::Normal,
    );

    for (row, (ridge, color)) in ridges.iter().zip(palette.iter()).enumerate() {
        let baseline = layout.baseline(row);

        if let Some(curve) = &ridge.curve {
            draw_curve(&root, &layout, curve, baseline, y_top, color)?;
        }

        root.draw(&PathElement::new(
            vec![(layout.x(0.0), baseline), (layout.x(HOURS_PER_DAY), baseline)],
            color.stroke_width(layout.points(BASELINE_PT)),
        ))?;

        let label_x = (layout.plot_left - LABEL_OFFSET * layout.plot_width).round() as i32;
        let style = font
            .color(color)
            .pos(Pos::new(HPos::Center, VPos::Center));
        draw_text(&root, &ridge.day.to_string(), (label_x, baseline), &style);
    }

    let tick_style = font
        .color(&text_color)
        .pos(Pos::new(HPos::Center, VPos::Top));
    for hour in (0..=HOURS_PER_DAY as usize).step_by(TICK_EVERY_HOURS) {
        let label = format_hour_tick(hour as u32);
        let pos = (layout.x(hour as f64), layout.tick_y.round() as i32);
        draw_text(&root, &label, pos, &tick_style);
    }

    let title_style = FontDesc::new(
        FontFamily::from(options.font_family.as_str()),
        layout.title_px,
        FontStyle::Normal,
    )
    .color(&text_color)
    .pos(Pos::new(HPos::Left, VPos::Top));
    let title_pos = (layout.plot_left.round() as i32, layout.title_y.round() as i32);
    draw_text(&root, &options.title, title_pos, &title_style);

    root.present()?;

    tracing::info!(
        "Wrote ridge plot with {} rows to {:?}",
        ridges.len(),
        output
    );
    Ok(())
}

fn draw_curve<DB: DrawingBackend>(
    area: &DrawingArea<DB, Shift>,
    layout: &Layout,
    curve: &[(f64, f64)],
    baseline: i32,
    y_top: f64,
    color: &RGBColor,
) -> Result<()> {
    let (Some(first), Some(last)) = (curve.first(), curve.last()) else {
        return Ok(());
    };

    let scale = layout.row_height / y_top;
    let points: Vec<(i32, i32)> = curve
        .iter()
        .map(|&(hour, density)| (layout.x(hour), baseline - (density * scale).round() as i32))
        .collect();

    let mut outline = Vec::with_capacity(points.len() + 2);
    outline.push((layout.x(first.0), baseline));
    outline.extend(points.iter().copied());
    outline.push((layout.x(last.0), baseline));

    area.draw(&Polygon::new(outline.clone(), color.filled()))?;
    area.draw(&PathElement::new(
        outline,
        color.stroke_width(layout.points(FILL_OUTLINE_PT)),
    ))?;
    area.draw(&PathElement::new(
        points,
        WHITE.stroke_width(layout.points(HIGHLIGHT_PT)),
    ))?;
    Ok(())
}

/// Draw text, tolerating hosts without usable fonts.
///
/// A missing font family either errors or panics inside the rasteriser
/// depending on the platform; either way the label is dropped with a warning
/// and the rest of the figure still renders. A caught panic is still reported
/// on stderr by the process panic hook, which is left alone because it is
/// shared with every other thread.
fn draw_text<DB: DrawingBackend>(
    area: &DrawingArea<DB, Shift>,
    text: &str,
    pos: (i32, i32),
    style: &TextStyle<'_>,
) {
    if text.trim().is_empty() {
        return;
    }

    let element = Text::new(text.to_string(), pos, style.clone());
    match panic::catch_unwind(AssertUnwindSafe(|| area.draw(&element))) {
        Ok(Ok(())) => {}
        Ok(Err(e)) => tracing::warn!("Skipping text {:?}: {}", text, e),
        Err(_) => tracing::warn!("Font rasteriser panicked on {:?}; text skipped", text),
    }
}
