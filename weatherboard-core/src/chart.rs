//! Composite dashboard rendering.
//!
//! The figure is a 2×2 grid under a common title:
//! temperature bars, humidity/temperature scatter, wind bars and a
//! weather-condition pie.

use std::{
    fs,
    io::ErrorKind,
    ops::Range,
    path::{Path, PathBuf},
};

use anyhow::{Context, Result};
use plotters::{coord::Shift, prelude::*};
use tracing::{debug, warn};

use crate::table::WeatherTable;

pub const FIGURE_SIZE: (u32, u32) = (1500, 1000);
pub const FIGURE_TITLE: &str = "Weather Dashboard";

const FONT: &str = "sans-serif";

/// Scatter marker radius bounds in pixels; wind speed is mapped linearly between them.
const MARKER_RADIUS: (u32, u32) = (6, 20);

/// The four charts of the dashboard, in grid order (row-major).
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Panel {
    TemperatureBars,
    HumidityScatter,
    WindBars,
    WeatherPie,
}

impl Panel {
    pub const ALL: [Panel; 4] =
        [Panel::TemperatureBars, Panel::HumidityScatter, Panel::WindBars, Panel::WeatherPie];

    pub fn title(self) -> &'static str {
        match self {
            Panel::TemperatureBars => "Temperature in Cities",
            Panel::HumidityScatter => "Humidity vs Temperature",
            Panel::WindBars => "Wind Speed in Cities",
            Panel::WeatherPie => "Weather Condition",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RenderSummary {
    pub path: PathBuf,
    pub panels: usize,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RenderOutcome {
    /// The table had no rows; nothing was drawn or written.
    Skipped,
    Rendered(RenderSummary),
}

/// Draw the dashboard for `table` and save it as a PNG at `path`.
///
/// The parent directory of `path` must already exist. On failure no image
/// is left at `path`.
pub fn render_dashboard(table: &WeatherTable, path: &Path) -> Result<RenderOutcome> {
    render_with(table, path, |panel, area, table| draw_panel(panel, area, table))
}

fn render_with<F>(table: &WeatherTable, path: &Path, draw: F) -> Result<RenderOutcome>
where
    F: Fn(Panel, &DrawingArea<BitMapBackend<'_>, Shift>, &WeatherTable) -> Result<()>,
{
    if table.is_empty() {
        debug!("empty table, nothing to draw");
        return Ok(RenderOutcome::Skipped);
    }

    println!("Making graphs...");

    if let Err(e) = draw_figure(table, path, draw) {
        // the backend flushes whatever was drawn when it is dropped
        match fs::remove_file(path) {
            Ok(()) => debug!(path = %path.display(), "removed partial image"),
            Err(rm) if rm.kind() == ErrorKind::NotFound => {}
            Err(rm) => warn!(path = %path.display(), error = %rm, "could not remove partial image"),
        }
        return Err(e);
    }
    println!("Dashboard saved!");

    Ok(RenderOutcome::Rendered(RenderSummary {
        path: path.to_path_buf(),
        panels: Panel::ALL.len(),
    }))
}

fn draw_figure<F>(table: &WeatherTable, path: &Path, draw: F) -> Result<()>
where
    F: Fn(Panel, &DrawingArea<BitMapBackend<'_>, Shift>, &WeatherTable) -> Result<()>,
{
    let root = BitMapBackend::new(path, FIGURE_SIZE).into_drawing_area();
    root.fill(&WHITE)?;

    let body = root.titled(FIGURE_TITLE, (FONT, 40))?;
    let areas = body.split_evenly((2, 2));

    for (panel, area) in Panel::ALL.into_iter().zip(areas.iter()) {
        debug!(panel = panel.title(), "drawing panel");
        draw(panel, area, table).with_context(|| format!("Failed to draw '{}'", panel.title()))?;
    }

    root.present().with_context(|| format!("Failed to write {}", path.display()))?;
    Ok(())
}

fn draw_panel<DB>(panel: Panel, area: &DrawingArea<DB, Shift>, table: &WeatherTable) -> Result<()>
where
    DB: DrawingBackend,
    DB::ErrorType: 'static,
{
    let cities = table.cities();
    match panel {
        Panel::TemperatureBars => draw_bars(
            area,
            panel.title(),
            "Temperature (°C)",
            &cities,
            &table.temperatures(),
            COOLWARM,
        ),
        Panel::HumidityScatter => draw_scatter(area, panel.title(), table),
        Panel::WindBars => {
            draw_bars(area, panel.title(), "Wind (m/s)", &cities, &table.winds(), VIRIDIS)
        }
        Panel::WeatherPie => draw_pie(area, panel.title(), table),
    }
}

fn draw_bars<DB>(
    area: &DrawingArea<DB, Shift>,
    title: &str,
    y_desc: &str,
    cities: &[&str],
    values: &[f64],
    gradient: Gradient,
) -> Result<()>
where
    DB: DrawingBackend,
    DB::ErrorType: 'static,
{
    let mut chart = ChartBuilder::on(area)
        .caption(title, (FONT, 24))
        .margin(10)
        .x_label_area_size(40)
        .y_label_area_size(60)
        .build_cartesian_2d((0..cities.len()).into_segmented(), bar_axis(values))?;

    chart
        .configure_mesh()
        .disable_x_mesh()
        .x_labels(cities.len())
        .x_label_formatter(&|v: &SegmentValue<usize>| match v {
            SegmentValue::CenterOf(i) => cities.get(*i).map(|c| c.to_string()).unwrap_or_default(),
            _ => String::new(),
        })
        .x_desc("City")
        .y_desc(y_desc)
        .draw()?;

    let (lo, hi) = min_max(values);
    chart.draw_series(values.iter().enumerate().map(|(i, &v)| {
        let color = gradient.at(normalize(v, lo, hi));
        let mut bar = Rectangle::new(
            [(SegmentValue::Exact(i), 0.0), (SegmentValue::Exact(i + 1), v)],
            color.filled(),
        );
        bar.set_margin(0, 0, 8, 8);
        bar
    }))?;

    Ok(())
}

fn draw_scatter<DB>(area: &DrawingArea<DB, Shift>, title: &str, table: &WeatherTable) -> Result<()>
where
    DB: DrawingBackend,
    DB::ErrorType: 'static,
{
    let humidities: Vec<f64> = table.humidities().into_iter().map(f64::from).collect();
    let (wind_lo, wind_hi) = min_max(&table.winds());

    let mut chart = ChartBuilder::on(area)
        .caption(title, (FONT, 24))
        .margin(10)
        .x_label_area_size(40)
        .y_label_area_size(60)
        .build_cartesian_2d(padded_range(&table.temperatures()), padded_range(&humidities))?;

    chart.configure_mesh().x_desc("Temperature (°C)").y_desc("Humidity (%)").draw()?;

    for (i, row) in table.rows().iter().enumerate() {
        let color = Palette99::pick(i).to_rgba();
        let radius = marker_radius(row.wind, wind_lo, wind_hi);

        chart
            .draw_series(std::iter::once(Circle::new(
                (row.temperature, f64::from(row.humidity)),
                radius,
                color.filled(),
            )))?
            .label(format!("{} ({:.1} m/s)", row.city, row.wind))
            .legend(move |(x, y)| Circle::new((x, y), 5, color.filled()));
    }

    chart
        .configure_series_labels()
        .position(SeriesLabelPosition::UpperRight)
        .background_style(&WHITE.mix(0.8))
        .border_style(&BLACK)
        .draw()?;

    Ok(())
}

fn draw_pie<DB>(area: &DrawingArea<DB, Shift>, title: &str, table: &WeatherTable) -> Result<()>
where
    DB: DrawingBackend,
    DB::ErrorType: 'static,
{
    let area = area.titled(title, (FONT, 24))?;
    let counts = table.weather_counts();

    let (w, h) = area.dim_in_pixel();
    let center = (w as i32 / 2, h as i32 / 2);
    let radius = f64::from(w.min(h)) * 0.35;

    let sizes: Vec<f64> = counts.iter().map(|(_, n)| *n as f64).collect();
    let colors: Vec<RGBColor> = (0..counts.len()).map(pastel).collect();
    let labels = pie_labels(&counts);

    let mut pie = Pie::new(&center, &radius, &sizes, &colors, &labels);
    pie.start_angle(90.0);
    pie.label_style((FONT, 18).into_font().color(&BLACK));
    area.draw(&pie)?;

    Ok(())
}

/// Category labels with their share of the total, e.g. `Clear (66.7%)`.
pub fn pie_labels(counts: &[(String, usize)]) -> Vec<String> {
    let total: usize = counts.iter().map(|(_, n)| n).sum();
    counts
        .iter()
        .map(|(name, n)| {
            let pct = if total == 0 { 0.0 } else { *n as f64 * 100.0 / total as f64 };
            format!("{name} ({pct:.1}%)")
        })
        .collect()
}

/// Value axis for a bar chart: always includes zero, with 10% headroom.
pub fn bar_axis(values: &[f64]) -> Range<f64> {
    let (lo, hi) = min_max(values);
    let lo = lo.min(0.0);
    let hi = hi.max(0.0);
    if lo == hi {
        return 0.0..1.0;
    }
    let pad = (hi - lo) * 0.1;
    let lo = if lo < 0.0 { lo - pad } else { lo };
    let hi = if hi > 0.0 { hi + pad } else { hi };
    lo..hi
}

/// Data range widened by 10% on each side, or ±1 for a single value.
pub fn padded_range(values: &[f64]) -> Range<f64> {
    let (lo, hi) = min_max(values);
    if (hi - lo).abs() < 1e-9 {
        return (lo - 1.0)..(hi + 1.0);
    }
    let pad = (hi - lo) * 0.1;
    (lo - pad)..(hi + pad)
}

pub fn marker_radius(wind: f64, lo: f64, hi: f64) -> u32 {
    let (min_r, max_r) = MARKER_RADIUS;
    let t = normalize(wind, lo, hi);
    min_r + (t * f64::from(max_r - min_r)).round() as u32
}

/// Position of `v` within `lo..=hi` as 0.0..=1.0; 0.5 when the range is empty.
fn normalize(v: f64, lo: f64, hi: f64) -> f64 {
    if (hi - lo).abs() < 1e-9 { 0.5 } else { ((v - lo) / (hi - lo)).clamp(0.0, 1.0) }
}

fn min_max(values: &[f64]) -> (f64, f64) {
    if values.is_empty() {
        return (0.0, 0.0);
    }
    values
        .iter()
        .fold((f64::INFINITY, f64::NEG_INFINITY), |(lo, hi), &v| (lo.min(v), hi.max(v)))
}

/// Three-stop colour ramp.
#[derive(Debug, Clone, Copy)]
struct Gradient([RGBColor; 3]);

const COOLWARM: Gradient =
    Gradient([RGBColor(59, 76, 192), RGBColor(221, 221, 221), RGBColor(180, 4, 38)]);
const VIRIDIS: Gradient =
    Gradient([RGBColor(68, 1, 84), RGBColor(33, 145, 140), RGBColor(253, 231, 37)]);

impl Gradient {
    fn at(&self, t: f64) -> RGBColor {
        let t = t.clamp(0.0, 1.0);
        let (a, b, u) = if t < 0.5 {
            (self.0[0], self.0[1], t * 2.0)
        } else {
            (self.0[1], self.0[2], (t - 0.5) * 2.0)
        };
        let mix = |x: u8, y: u8| (f64::from(x) + (f64::from(y) - f64::from(x)) * u).round() as u8;
        RGBColor(mix(a.0, b.0), mix(a.1, b.1), mix(a.2, b.2))
    }
}

const PASTEL: [RGBColor; 10] = [
    RGBColor(161, 201, 244),
    RGBColor(255, 180, 130),
    RGBColor(141, 229, 161),
    RGBColor(255, 159, 155),
    RGBColor(208, 187, 255),
    RGBColor(222, 187, 155),
    RGBColor(250, 176, 228),
    RGBColor(207, 207, 207),
    RGBColor(255, 254, 163),
    RGBColor(185, 242, 240),
];

fn pastel(i: usize) -> RGBColor {
    PASTEL[i % PASTEL.len()]
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::WeatherRecord;

    fn record(city: &str, temperature: f64, humidity: u8, weather: &str, wind: f64) -> WeatherRecord {
        WeatherRecord { city: city.into(), temperature, humidity, weather: weather.into(), wind }
    }

    #[test]
    fn dashboard_has_four_distinct_panels() {
        assert_eq!(Panel::ALL.len(), 4);
        let titles: Vec<_> = Panel::ALL.iter().map(|p| p.title()).collect();
        assert_eq!(
            titles,
            [
                "Temperature in Cities",
                "Humidity vs Temperature",
                "Wind Speed in Cities",
                "Weather Condition"
            ]
        );
    }

    #[test]
    fn empty_table_is_skipped_without_writing() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("weather_plot.png");

        let outcome = render_dashboard(&WeatherTable::default(), &path).unwrap();

        assert_eq!(outcome, RenderOutcome::Skipped);
        assert!(!path.exists());
    }

    #[test]
    fn missing_output_directory_is_an_error() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("no_such_dir").join("weather_plot.png");
        let table = WeatherTable::from_records(vec![record("London", 12.0, 80, "Rain", 4.0)]);

        assert!(render_dashboard(&table, &path).is_err());
        assert!(!path.exists());
    }

    #[test]
    fn renders_one_png_with_four_panels() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("weather_plot.png");
        let table = WeatherTable::from_records(vec![
            record("London", 12.0, 80, "Rain", 4.0),
            record("Cairo", 31.5, 20, "Clear", 6.5),
            record("Oslo", -3.0, 70, "Snow", 2.0),
        ]);

        let outcome = render_dashboard(&table, &path).unwrap();

        assert_eq!(
            outcome,
            RenderOutcome::Rendered(RenderSummary { path: path.clone(), panels: 4 })
        );
        assert!(path.is_file());
        assert_eq!(std::fs::read_dir(dir.path()).unwrap().count(), 1);
    }

    #[test]
    fn single_row_still_renders_four_panels() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("weather_plot.png");
        let table = WeatherTable::from_records(vec![record("Lima", 19.0, 84, "Clouds", 3.1)]);

        let outcome = render_dashboard(&table, &path).unwrap();

        assert_eq!(
            outcome,
            RenderOutcome::Rendered(RenderSummary { path: path.clone(), panels: 4 })
        );
        assert_eq!(std::fs::read_dir(dir.path()).unwrap().count(), 1);
    }

    #[test]
    fn failed_panel_leaves_no_partial_image() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("weather_plot.png");
        let table = WeatherTable::from_records(vec![
            record("London", 12.0, 80, "Rain", 4.0),
            record("Cairo", 31.5, 20, "Clear", 6.5),
        ]);

        let result = render_with(&table, &path, |panel, area, table| {
            if panel == Panel::WeatherPie {
                anyhow::bail!("pie could not be drawn");
            }
            draw_panel(panel, area, table)
        });

        let err = result.unwrap_err();
        assert!(format!("{err:#}").contains("Weather Condition"));
        assert!(!path.exists());
        assert_eq!(std::fs::read_dir(dir.path()).unwrap().count(), 0);
    }

    #[test]
    fn pie_labels_carry_one_decimal_percentages() {
        let counts = vec![("Clear".to_string(), 2), ("Rain".to_string(), 1)];
        assert_eq!(pie_labels(&counts), ["Clear (66.7%)", "Rain (33.3%)"]);
    }

    #[test]
    fn bar_axis_includes_zero() {
        let r = bar_axis(&[10.0, 20.0]);
        assert_eq!(r.start, 0.0);
        assert!(r.end > 20.0);

        let r = bar_axis(&[-5.0, 15.0]);
        assert!(r.start < -5.0);
        assert!(r.end > 15.0);

        let r = bar_axis(&[-4.0, -2.0]);
        assert!(r.start < -4.0);
        assert_eq!(r.end, 0.0);

        assert_eq!(bar_axis(&[0.0]), 0.0..1.0);
    }

    #[test]
    fn padded_range_handles_single_value() {
        assert_eq!(padded_range(&[12.0]), 11.0..13.0);

        let r = padded_range(&[0.0, 10.0]);
        assert_eq!(r, -1.0..11.0);
    }

    #[test]
    fn marker_radius_scales_with_wind() {
        assert_eq!(marker_radius(0.0, 0.0, 10.0), 6);
        assert_eq!(marker_radius(10.0, 0.0, 10.0), 20);
        assert_eq!(marker_radius(5.0, 0.0, 10.0), 13);
        // all winds equal
        assert_eq!(marker_radius(3.0, 3.0, 3.0), 13);
    }

    #[test]
    fn gradient_hits_its_stops() {
        assert_eq!(COOLWARM.at(0.0), RGBColor(59, 76, 192));
        assert_eq!(COOLWARM.at(0.5), RGBColor(221, 221, 221));
        assert_eq!(COOLWARM.at(1.0), RGBColor(180, 4, 38));
        assert_eq!(VIRIDIS.at(2.0), RGBColor(253, 231, 37));
    }

    #[test]
    fn pastel_cycles() {
        assert_eq!(pastel(0), pastel(10));
        assert_ne!(pastel(0), pastel(1));
    }
}
