use std::panic;
use std::path::Path;

use anyhow::Context;
use plotters::coord::Shift;
use plotters::prelude::*;
use plotters::style::text_anchor::{HPos, Pos, VPos};
use plotters::style::{FontDesc, FontFamily, FontStyle};
use plotters_backend::{
    BackendColor, BackendCoord, BackendStyle, BackendTextStyle, DrawingBackend, DrawingErrorKind,
};

use crate::models::{ChartDataset, FillMode, TraceStyle};

pub const DEFAULT_WIDTH: u32 = 1024;
pub const DEFAULT_HEIGHT: u32 = 720;
pub const DEFAULT_MARGIN: u32 = 50;

const SKILL_COLOR: RGBColor = RGBColor(200, 0, 100);
const GRID_COLOR: RGBColor = RGBColor(170, 170, 170);
const BAND_PALETTE: [RGBColor; 5] = [
    RGBColor(30, 144, 255),
    RGBColor(34, 139, 34),
    RGBColor(255, 165, 0),
    RGBColor(148, 103, 189),
    RGBColor(90, 90, 90),
];

// Normalized radius 1.0 is the outermost ring; labels sit outside it and
// the coordinate range leaves room for them.
const LABEL_RADIUS: f64 = 1.12;
const COORD_EXTENT: f64 = 1.3;

#[derive(Debug, Clone)]
pub struct RenderOptions {
    pub width: u32,
    pub height: u32,
    pub margin: u32,
    pub band_style: TraceStyle,
    pub skill_style: TraceStyle,
}

impl Default for RenderOptions {
    fn default() -> Self {
        Self {
            width: DEFAULT_WIDTH,
            height: DEFAULT_HEIGHT,
            margin: DEFAULT_MARGIN,
            band_style: TraceStyle::band_default(),
            skill_style: TraceStyle::skill_default(),
        }
    }
}

/// Renders the prepared dataset as a radar chart PNG at `path`.
pub fn render_png(
    dataset: &ChartDataset,
    path: &Path,
    options: &RenderOptions,
) -> anyhow::Result<()> {
    // The bitmap backend re-attempts the save when dropped and panics if
    // that fails, so the missing-directory case has to be caught up front
    // and anything left guarded against unwinds.
    if let Some(parent) = path.parent() {
        if !parent.as_os_str().is_empty() && !parent.is_dir() {
            anyhow::bail!(
                "failed to write chart to {}: directory {} does not exist",
                path.display(),
                parent.display()
            );
        }
    }

    let rendered = panic::catch_unwind(panic::AssertUnwindSafe(|| -> anyhow::Result<()> {
        let backend = BitMapBackend::new(path, (options.width, options.height));
        let root = FontTolerantBackend::new(backend).into_drawing_area();
        draw_radar(&root, dataset, options)?;
        root.present()?;
        Ok(())
    }));

    match rendered {
        Ok(result) => {
            result.with_context(|| format!("failed to write chart to {}", path.display()))
        }
        Err(_) => Err(anyhow::anyhow!(
            "plotting backend panicked while writing {}",
            path.display()
        )),
    }
}

/// Maps axis `index` of `axis_count` at normalized `radius` onto cartesian
/// coordinates. The first axis points straight up and the rest follow
/// clockwise; `index == axis_count` lands back on the first axis, which is
/// how the dataset's closure row comes out on top of row zero.
fn project(index: usize, axis_count: usize, radius: f64) -> (f64, f64) {
    let angle = std::f64::consts::FRAC_PI_2
        - std::f64::consts::TAU * (index as f64) / (axis_count as f64);
    (radius * angle.cos(), radius * angle.sin())
}

fn band_color(index: usize) -> RGBColor {
    BAND_PALETTE[index % BAND_PALETTE.len()]
}

fn draw_radar<DB>(
    root: &DrawingArea<DB, Shift>,
    dataset: &ChartDataset,
    options: &RenderOptions,
) -> anyhow::Result<()>
where
    DB: DrawingBackend,
    DB::ErrorType: 'static,
{
    root.fill(&WHITE)?;

    let axis_count = dataset.skill_count();
    anyhow::ensure!(axis_count > 0, "dataset has no skill rows");

    let mut max_radius = dataset.max_radius();
    if !max_radius.is_finite() || max_radius <= 0.0 {
        max_radius = 1.0;
    }

    // Equal x/y value ranges on an unequal pixel area would squash the
    // circle, so the wider axis range absorbs the aspect ratio.
    let plot_width = options.width.saturating_sub(options.margin * 2).max(1) as f64;
    let plot_height = options.height.saturating_sub(options.margin * 2).max(1) as f64;
    let aspect = plot_width / plot_height;
    let (x_extent, y_extent) = if aspect >= 1.0 {
        (COORD_EXTENT * aspect, COORD_EXTENT)
    } else {
        (COORD_EXTENT, COORD_EXTENT / aspect)
    };

    let mut chart = ChartBuilder::on(root)
        .margin(options.margin)
        .build_cartesian_2d(-x_extent..x_extent, -y_extent..y_extent)?;

    let thresholds: Vec<f64> = dataset.rows[0].band_levels.clone();

    // Fill pass, outermost band first so each inner band paints over it
    // and the visible result is nested rings.
    if options.band_style.fill() == FillMode::ToNext {
        let mut fill_order: Vec<usize> = (0..dataset.band_names.len()).collect();
        fill_order.sort_by(|&a, &b| {
            thresholds[b]
                .partial_cmp(&thresholds[a])
                .unwrap_or(std::cmp::Ordering::Equal)
        });

        for band_index in fill_order {
            let points: Vec<(f64, f64)> = dataset
                .rows
                .iter()
                .enumerate()
                .map(|(i, row)| project(i, axis_count, row.band_levels[band_index] / max_radius))
                .collect();
            chart.draw_series(std::iter::once(Polygon::new(
                points,
                band_color(band_index).mix(options.band_style.opacity()),
            )))?;
        }
    }

    for index in 0..axis_count {
        let tip = project(index, axis_count, 1.0);
        chart.draw_series(std::iter::once(PathElement::new(
            vec![(0.0, 0.0), tip],
            GRID_COLOR.mix(0.6),
        )))?;
    }

    // Band outlines in declared order; these carry the legend entries.
    for (band_index, name) in dataset.band_names.iter().enumerate() {
        let color = band_color(band_index);
        let points: Vec<(f64, f64)> = dataset
            .rows
            .iter()
            .enumerate()
            .map(|(i, row)| project(i, axis_count, row.band_levels[band_index] / max_radius))
            .collect();
        chart
            .draw_series(std::iter::once(PathElement::new(
                points,
                Color::stroke_width(&color, options.band_style.line_width().round().max(1.0) as u32),
            )))?
            .label(name.clone())
            .legend(move |(x, y)| {
                PathElement::new(vec![(x, y), (x + 30, y)], Color::stroke_width(&color, 2))
            });
    }

    // The skill trace walks every row as prepared; the appended closure
    // row is what brings the line back to its first vertex.
    let skill_points: Vec<(f64, f64)> = dataset
        .rows
        .iter()
        .enumerate()
        .map(|(i, row)| project(i, axis_count, row.level / max_radius))
        .collect();
    chart
        .draw_series(std::iter::once(PathElement::new(
            skill_points,
            Color::stroke_width(&SKILL_COLOR, options.skill_style.line_width().round().max(1.0) as u32),
        )))?
        .label("Skill Level")
        .legend(|(x, y)| {
            PathElement::new(vec![(x, y), (x + 30, y)], Color::stroke_width(&SKILL_COLOR, 4))
        });

    let label_style = FontDesc::new(FontFamily::SansSerif, 16.0, FontStyle::Normal)
        .color(&BLACK)
        .pos(Pos::new(HPos::Center, VPos::Center));
    for (index, row) in dataset.rows.iter().take(axis_count).enumerate() {
        let position = project(index, axis_count, LABEL_RADIUS);
        chart.draw_series(std::iter::once(Text::new(
            row.skill.clone(),
            position,
            label_style.clone(),
        )))?;
    }

    root.draw(&Text::new(
        "Working Proficiency",
        (
            options.width as i32 - options.margin as i32,
            (options.margin / 4) as i32,
        ),
        FontDesc::new(FontFamily::SansSerif, 18.0, FontStyle::Bold)
            .color(&BLACK)
            .pos(Pos::new(HPos::Right, VPos::Top)),
    ))?;

    chart
        .configure_series_labels()
        .background_style(&WHITE.mix(0.8))
        .border_style(&BLACK.mix(0.3))
        .label_font(FontDesc::new(FontFamily::SansSerif, 16.0, FontStyle::Normal))
        .position(SeriesLabelPosition::UpperRight)
        .draw()?;

    Ok(())
}

/// Backend wrapper that degrades gracefully when no usable system font is
/// installed: labels are skipped instead of failing the whole render, and
/// text measurement falls back to a rough estimate. Chart geometry and the
/// PNG write never depend on font availability.
struct FontTolerantBackend<DB> {
    inner: DB,
}

impl<DB> FontTolerantBackend<DB> {
    fn new(inner: DB) -> Self {
        Self { inner }
    }
}

impl<DB: DrawingBackend> DrawingBackend for FontTolerantBackend<DB> {
    type ErrorType = DB::ErrorType;

    fn get_size(&self) -> (u32, u32) {
        self.inner.get_size()
    }

    fn ensure_prepared(&mut self) -> Result<(), DrawingErrorKind<Self::ErrorType>> {
        self.inner.ensure_prepared()
    }

    fn present(&mut self) -> Result<(), DrawingErrorKind<Self::ErrorType>> {
        self.inner.present()
    }

    fn draw_pixel(
        &mut self,
        point: BackendCoord,
        color: BackendColor,
    ) -> Result<(), DrawingErrorKind<Self::ErrorType>> {
        self.inner.draw_pixel(point, color)
    }

    fn draw_line<S: BackendStyle>(
        &mut self,
        from: BackendCoord,
        to: BackendCoord,
        style: &S,
    ) -> Result<(), DrawingErrorKind<Self::ErrorType>> {
        self.inner.draw_line(from, to, style)
    }

    fn draw_rect<S: BackendStyle>(
        &mut self,
        upper_left: BackendCoord,
        bottom_right: BackendCoord,
        style: &S,
        fill: bool,
    ) -> Result<(), DrawingErrorKind<Self::ErrorType>> {
        self.inner.draw_rect(upper_left, bottom_right, style, fill)
    }

    fn draw_path<S: BackendStyle, I: IntoIterator<Item = BackendCoord>>(
        &mut self,
        path: I,
        style: &S,
    ) -> Result<(), DrawingErrorKind<Self::ErrorType>> {
        self.inner.draw_path(path, style)
    }

    fn draw_circle<S: BackendStyle>(
        &mut self,
        center: BackendCoord,
        radius: u32,
        style: &S,
        fill: bool,
    ) -> Result<(), DrawingErrorKind<Self::ErrorType>> {
        self.inner.draw_circle(center, radius, style, fill)
    }

    fn fill_polygon<S: BackendStyle, I: IntoIterator<Item = BackendCoord>>(
        &mut self,
        vert: I,
        style: &S,
    ) -> Result<(), DrawingErrorKind<Self::ErrorType>> {
        self.inner.fill_polygon(vert, style)
    }

    fn blit_bitmap(
        &mut self,
        pos: BackendCoord,
        (iw, ih): (u32, u32),
        src: &[u8],
    ) -> Result<(), DrawingErrorKind<Self::ErrorType>> {
        self.inner.blit_bitmap(pos, (iw, ih), src)
    }

    fn draw_text<TStyle: BackendTextStyle>(
        &mut self,
        text: &str,
        style: &TStyle,
        pos: BackendCoord,
    ) -> Result<(), DrawingErrorKind<Self::ErrorType>> {
        match panic::catch_unwind(panic::AssertUnwindSafe(|| {
            self.inner.draw_text(text, style, pos)
        })) {
            Ok(Ok(())) => Ok(()),
            Ok(Err(DrawingErrorKind::FontError(_))) | Err(_) => Ok(()),
            Ok(Err(other)) => Err(other),
        }
    }

    fn estimate_text_size<TStyle: BackendTextStyle>(
        &self,
        text: &str,
        style: &TStyle,
    ) -> Result<(u32, u32), DrawingErrorKind<Self::ErrorType>> {
        match panic::catch_unwind(panic::AssertUnwindSafe(|| {
            self.inner.estimate_text_size(text, style)
        })) {
            Ok(Ok(size)) => Ok(size),
            _ => {
                let height = style.size().max(1.0) as u32;
                let width = (text.chars().count() as u32).max(1) * height / 2;
                Ok((width.max(1), height))
            }
        }
    }
}
