// SVG chart rendering with plotters
use crate::application::chart_renderer::{ChartRenderer, RenderError};
use crate::domain::chart::{ChartConfig, ChartKind, Paint};
use crate::domain::view_state::Canvas;
use plotters::coord::Shift;
use plotters::element::Pie;
use plotters::prelude::*;

const MIN_DIMENSION: u32 = 64;
const FONT: &str = "sans-serif";
const TEXT_COLOR: RGBColor = RGBColor(0x5A, 0x5C, 0x69);
const FALLBACK_COLOR: RGBColor = RGBColor(0x85, 0x87, 0x96);
const LEGEND_ROW_HEIGHT: i32 = 18;
const LEGEND_SWATCH: i32 = 12;

#[derive(Debug, Clone, Copy, Default)]
pub struct SvgChartRenderer;

impl SvgChartRenderer {
    pub fn new() -> Self {
        Self
    }
}

impl ChartRenderer for SvgChartRenderer {
    fn render(&self, canvas: &Canvas, config: &ChartConfig) -> Result<String, RenderError> {
        if canvas.width < MIN_DIMENSION || canvas.height < MIN_DIMENSION {
            return Err(RenderError::CanvasTooSmall {
                id: canvas.id.clone(),
                width: canvas.width,
                height: canvas.height,
            });
        }

        let mut svg = String::new();
        {
            let root = SVGBackend::with_string(&mut svg, (canvas.width, canvas.height))
                .into_drawing_area();
            root.fill(&WHITE).map_err(drawing_error)?;

            match config.kind {
                ChartKind::Pie | ChartKind::Doughnut => draw_radial(&root, config)?,
                ChartKind::Bar => draw_bar(&root, config)?,
                ChartKind::Line => draw_line(&root, config)?,
            }

            root.present().map_err(drawing_error)?;
        }

        Ok(svg)
    }
}

fn drawing_error(e: impl std::fmt::Display) -> RenderError {
    RenderError::Drawing(e.to_string())
}

/// Parse `#rgb`, `#rrggbb` or `#rrggbbaa`
fn parse_hex_color(hex: &str) -> RGBAColor {
    let hex = hex.trim_start_matches('#');
    if !hex.is_ascii() {
        return FALLBACK_COLOR.to_rgba();
    }
    let channel = |s: &str| u8::from_str_radix(s, 16).ok();

    let parsed = match hex.len() {
        3 => {
            let expand = |i: usize| channel(&hex[i..i + 1]).map(|v| v * 17);
            match (expand(0), expand(1), expand(2)) {
                (Some(r), Some(g), Some(b)) => Some((r, g, b, 1.0)),
                _ => None,
            }
        }
        6 | 8 => {
            let alpha = if hex.len() == 8 {
                channel(&hex[6..8]).map(|a| f64::from(a) / 255.0)
            } else {
                Some(1.0)
            };
            match (channel(&hex[0..2]), channel(&hex[2..4]), channel(&hex[4..6]), alpha) {
                (Some(r), Some(g), Some(b), Some(a)) => Some((r, g, b, a)),
                _ => None,
            }
        }
        _ => None,
    };

    match parsed {
        Some((r, g, b, a)) => RGBAColor(r, g, b, a),
        None => FALLBACK_COLOR.to_rgba(),
    }
}

fn opaque(color: RGBAColor) -> RGBColor {
    RGBColor(color.0, color.1, color.2)
}

fn series_color(config: &ChartConfig) -> RGBColor {
    config
        .data
        .datasets
        .first()
        .map(|d| opaque(parse_hex_color(&d.border_color)))
        .unwrap_or(FALLBACK_COLOR)
}

fn fill_color(config: &ChartConfig) -> RGBAColor {
    match config.data.datasets.first().map(|d| &d.background_color) {
        Some(Paint::Solid(color)) => parse_hex_color(color),
        Some(Paint::Palette(colors)) => colors
            .first()
            .map(|c| parse_hex_color(c))
            .unwrap_or_else(|| FALLBACK_COLOR.to_rgba()),
        None => FALLBACK_COLOR.to_rgba(),
    }
}

/// Value axis bounds; always includes zero.
fn value_range(values: &[f64]) -> (f64, f64) {
    let finite = values.iter().copied().filter(|v| v.is_finite());
    let (min, max) = finite.fold((0.0_f64, 0.0_f64), |(lo, hi), v| (lo.min(v), hi.max(v)));
    let top = if max > 0.0 { max * 1.1 } else { 1.0 };
    let bottom = if min < 0.0 { min * 1.1 } else { 0.0 };
    (bottom, top)
}

/// Legend entries laid out left to right, wrapping into rows.
fn legend_positions(labels: &[String], width: i32) -> (Vec<(i32, i32)>, i32) {
    let mut positions = Vec::with_capacity(labels.len());
    let (mut x, mut y) = (8, 4);
    for label in labels {
        let entry_width = LEGEND_SWATCH + 8 + label.chars().count() as i32 * 7 + 12;
        if x + entry_width > width && x > 8 {
            x = 8;
            y += LEGEND_ROW_HEIGHT;
        }
        positions.push((x, y));
        x += entry_width;
    }
    let height = if labels.is_empty() { 0 } else { y + LEGEND_ROW_HEIGHT + 4 };
    (positions, height)
}

fn draw_radial(root: &DrawingArea<SVGBackend<'_>, Shift>, config: &ChartConfig) -> Result<(), RenderError> {
    let (width, height) = root.dim_in_pixel();
    let (width, height) = (width as i32, height as i32);
    let labels = config.labels();
    let colors: Vec<RGBColor> = config
        .point_colors()
        .iter()
        .map(|c| opaque(parse_hex_color(c)))
        .collect();

    let (positions, legend_height) = if config.options.plugins.legend.is_visible() {
        legend_positions(labels, width)
    } else {
        (Vec::new(), 0)
    };
    let legend_height = legend_height.min(height / 2);
    let (plot, legend) = root.split_vertically(height - legend_height);

    let sizes: Vec<f64> = config
        .values()
        .iter()
        .map(|v| if v.is_finite() { v.max(0.0) } else { 0.0 })
        .collect();
    let total: f64 = sizes.iter().sum();

    if total > 0.0 {
        let (plot_w, plot_h) = plot.dim_in_pixel();
        let center = (plot_w as i32 / 2, plot_h as i32 / 2);
        let radius = f64::from(plot_w.min(plot_h)) * 0.42;
        let slice_labels = vec![String::new(); sizes.len()];

        let mut pie = Pie::new(&center, &radius, &sizes, &colors, &slice_labels);
        pie.start_angle(-90.0);
        pie.percentages((FONT, 12).into_font().color(&WHITE));
        plot.draw(&pie).map_err(drawing_error)?;

        if config.kind == ChartKind::Doughnut {
            plot.draw(&Circle::new(center, (radius * 0.5) as i32, WHITE.filled()))
                .map_err(drawing_error)?;
        }
    }

    for ((label, color), (x, y)) in labels.iter().zip(colors.iter()).zip(positions) {
        legend
            .draw(&Rectangle::new(
                [(x, y), (x + LEGEND_SWATCH, y + LEGEND_SWATCH)],
                color.filled(),
            ))
            .map_err(drawing_error)?;
        legend
            .draw(&Text::new(
                label.clone(),
                (x + LEGEND_SWATCH + 6, y),
                (FONT, 12).into_font().color(&TEXT_COLOR),
            ))
            .map_err(drawing_error)?;
    }

    Ok(())
}

fn draw_bar(root: &DrawingArea<SVGBackend<'_>, Shift>, config: &ChartConfig) -> Result<(), RenderError> {
    let labels = config.labels();
    let values = config.values();
    let count = values.len().max(1) as u32;
    let (bottom, top) = value_range(values);
    let color = fill_color(config);

    let mut chart = ChartBuilder::on(root)
        .margin(10)
        .x_label_area_size(30)
        .y_label_area_size(45)
        .build_cartesian_2d((0u32..count).into_segmented(), bottom..top)
        .map_err(drawing_error)?;

    let label_for = |value: &SegmentValue<u32>| match value {
        SegmentValue::CenterOf(i) => labels.get(*i as usize).cloned().unwrap_or_default(),
        _ => String::new(),
    };

    chart
        .configure_mesh()
        .disable_x_mesh()
        .x_labels(count as usize)
        .y_labels(5)
        .x_label_formatter(&label_for)
        .axis_style(TEXT_COLOR)
        .label_style((FONT, 11).into_font().color(&TEXT_COLOR))
        .draw()
        .map_err(drawing_error)?;

    chart
        .draw_series(
            Histogram::vertical(&chart)
                .style(color.filled())
                .margin(6)
                .data(
                    values
                        .iter()
                        .enumerate()
                        .filter(|(_, v)| v.is_finite())
                        .map(|(i, v)| (i as u32, *v)),
                ),
        )
        .map_err(drawing_error)?;

    Ok(())
}

fn draw_line(root: &DrawingArea<SVGBackend<'_>, Shift>, config: &ChartConfig) -> Result<(), RenderError> {
    let labels = config.labels();
    let values = config.values();
    let last = values.len().saturating_sub(1).max(1) as i32;
    let (bottom, top) = value_range(values);
    let line_color = series_color(config);
    let area_color = fill_color(config);
    let filled = config
        .data
        .datasets
        .first()
        .and_then(|d| d.fill)
        .unwrap_or(false);

    let mut chart = ChartBuilder::on(root)
        .margin(10)
        .x_label_area_size(30)
        .y_label_area_size(50)
        .build_cartesian_2d(0i32..last, bottom..top)
        .map_err(drawing_error)?;

    let label_for = |x: &i32| {
        usize::try_from(*x)
            .ok()
            .and_then(|i| labels.get(i))
            .cloned()
            .unwrap_or_default()
    };

    chart
        .configure_mesh()
        .disable_x_mesh()
        .x_labels(labels.len().max(2))
        .y_labels(5)
        .x_label_formatter(&label_for)
        .axis_style(TEXT_COLOR)
        .label_style((FONT, 11).into_font().color(&TEXT_COLOR))
        .draw()
        .map_err(drawing_error)?;

    let points: Vec<(i32, f64)> = values
        .iter()
        .enumerate()
        .filter(|(_, v)| v.is_finite())
        .map(|(i, v)| (i as i32, *v))
        .collect();
    if points.is_empty() {
        return Ok(());
    }

    if filled {
        chart
            .draw_series(AreaSeries::new(points.iter().copied(), 0.0, area_color))
            .map_err(drawing_error)?;
    }

    chart
        .draw_series(LineSeries::new(
            points.iter().copied(),
            ShapeStyle::from(&line_color).stroke_width(2),
        ))
        .map_err(drawing_error)?;

    chart
        .draw_series(
            points
                .iter()
                .map(|&(x, y)| Circle::new((x, y), 3, line_color.filled())),
        )
        .map_err(drawing_error)?;

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::chart::DASHBOARD_CHARTS;
    use crate::domain::dashboard::ChartSeries;

    fn config_for(canvas_id: &str, series: ChartSeries) -> ChartConfig {
        let spec = DASHBOARD_CHARTS
            .iter()
            .find(|s| s.canvas_id == canvas_id)
            .unwrap();
        ChartConfig::build(spec, &series)
    }

    fn render(canvas_id: &str, series: ChartSeries) -> String {
        SvgChartRenderer::new()
            .render(
                &Canvas::new(canvas_id, 480, 320),
                &config_for(canvas_id, series),
            )
            .unwrap()
    }

    #[test]
    fn test_parse_hex_color() {
        let c = parse_hex_color("#4E73DF");
        assert_eq!((c.0, c.1, c.2), (0x4E, 0x73, 0xDF));
        assert_eq!(c.3, 1.0);

        let c = parse_hex_color("#fff");
        assert_eq!((c.0, c.1, c.2), (255, 255, 255));

        let c = parse_hex_color("#1CC88A33");
        assert_eq!((c.0, c.1, c.2), (0x1C, 0xC8, 0x8A));
        assert!((c.3 - 0x33 as f64 / 255.0).abs() < 1e-9);

        let c = parse_hex_color("not-a-color");
        assert_eq!((c.0, c.1, c.2), (0x85, 0x87, 0x96));
    }

    #[test]
    fn test_value_range_includes_zero() {
        assert_eq!(value_range(&[]), (0.0, 1.0));
        assert_eq!(value_range(&[10.0, 20.0]), (0.0, 22.0));
        let (bottom, top) = value_range(&[-5.0, 5.0]);
        assert!(bottom < -5.0);
        assert!(top > 5.0);
    }

    #[test]
    fn test_legend_wraps_rows() {
        let labels: Vec<String> = (0..6).map(|i| format!("Specialty {}", i)).collect();
        let (positions, height) = legend_positions(&labels, 200);

        assert_eq!(positions.len(), 6);
        assert_eq!(positions[0], (8, 4));
        assert!(positions.iter().any(|&(_, y)| y > 4));
        assert!(height > LEGEND_ROW_HEIGHT);
    }

    #[test]
    fn test_pie_chart_svg_has_legend() {
        let svg = render(
            "patientGenderChart",
            ChartSeries::new(["Male", "Female"], vec![10.0, 8.0]),
        );

        assert!(svg.contains("<svg"));
        assert!(svg.contains("Male"));
        assert!(svg.contains("Female"));
    }

    #[test]
    fn test_doughnut_chart_with_zero_total_still_renders() {
        let svg = render(
            "appointmentStatusChart",
            ChartSeries::new(["Draft", "Done"], vec![0.0, 0.0]),
        );

        assert!(svg.contains("<svg"));
        assert!(svg.contains("Draft"));
    }

    #[test]
    fn test_bar_chart_svg_labels_categories() {
        let svg = render(
            "labTestStatusChart",
            ChartSeries::new(["Requested", "Done"], vec![4.0, 17.0]),
        );

        assert!(svg.contains("<svg"));
        assert!(svg.contains("Requested"));
        assert!(svg.contains("Done"));
    }

    #[test]
    fn test_line_chart_svg_renders_points() {
        let svg = render(
            "revenueTrendChart",
            ChartSeries::new(["Jan", "Feb", "Mar"], vec![4200.0, 5100.5, 5930.25]),
        );

        assert!(svg.contains("<svg"));
        assert!(svg.contains("<circle"));
    }

    #[test]
    fn test_empty_series_renders_empty_plot() {
        let svg = render("patientAgeChart", ChartSeries::default());
        assert!(svg.contains("<svg"));

        let svg = render("revenueTrendChart", ChartSeries::default());
        assert!(svg.contains("<svg"));
    }

    #[test]
    fn test_rendering_is_deterministic() {
        let series = ChartSeries::new(["A", "B", "C"], vec![1.0, 2.0, 3.0]);
        assert_eq!(
            render("doctorSpecialtyChart", series.clone()),
            render("doctorSpecialtyChart", series)
        );
    }

    #[test]
    fn test_tiny_canvas_is_rejected() {
        let config = config_for("patientAgeChart", ChartSeries::new(["a"], vec![1.0]));
        let err = SvgChartRenderer::new()
            .render(&Canvas::new("patientAgeChart", 32, 32), &config)
            .unwrap_err();

        assert_eq!(
            err,
            RenderError::CanvasTooSmall {
                id: "patientAgeChart".to_string(),
                width: 32,
                height: 32,
            }
        );
    }
}
