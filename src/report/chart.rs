use std::{
    path::{Path, PathBuf},
    sync::Arc,
};

use anyhow::{Context, Result};
use plotters::prelude::*;
use serde::Serialize;
use tracing::instrument;

use crate::{registry::HabitRegistry, store::entry::HabitRecord};

const CHART_SIZE: (u32, u32) = (900, 540);

/// Plottable history for one habit. `values` has one slot per record in date
/// order; a missing slot breaks the drawn line.
#[derive(Debug, Clone, Serialize)]
pub struct HabitSeries {
    pub key: Arc<str>,
    pub label: Arc<str>,
    pub target: f64,
    pub values: Vec<Option<f64>>,
}

/// Everything the chart surfaces need: the shared date axis plus one series
/// per habit.
#[derive(Debug, Clone, Serialize)]
pub struct ChartData {
    pub dates: Vec<String>,
    pub series: Vec<HabitSeries>,
}

pub fn build_series(registry: &HabitRegistry, records: &[HabitRecord]) -> ChartData {
    let dates = records.iter().map(|r| r.date.clone()).collect();
    let series = registry
        .habits()
        .iter()
        .enumerate()
        .map(|(index, def)| HabitSeries {
            key: def.key.clone(),
            label: def.label.clone(),
            target: def.target,
            values: records.iter().map(|r| r.value(index)).collect(),
        })
        .collect();
    ChartData { dates, series }
}

/// Splits a value sequence into runs of consecutive present values, indexed
/// by record position. Gaps end a run, so a drawn line never bridges a
/// missing day.
pub fn split_segments(values: &[Option<f64>]) -> Vec<Vec<(usize, f64)>> {
    let mut segments = Vec::new();
    let mut current: Vec<(usize, f64)> = Vec::new();
    for (index, value) in values.iter().enumerate() {
        match value {
            Some(v) => current.push((index, *v)),
            None => {
                if !current.is_empty() {
                    segments.push(std::mem::take(&mut current));
                }
            }
        }
    }
    if !current.is_empty() {
        segments.push(current);
    }
    segments
}

/// Derives the per-habit output file from the base path:
/// `progress.png` + `sleep` becomes `progress_sleep.png`.
pub fn chart_path(base: &Path, key: &str) -> PathBuf {
    let stem = base
        .file_stem()
        .and_then(|s| s.to_str())
        .unwrap_or("progress");
    let extension = base.extension().and_then(|s| s.to_str()).unwrap_or("png");
    base.with_file_name(format!("{stem}_{key}.{extension}"))
}

/// Renders one PNG per habit next to `base` and returns the written paths.
/// Callers are expected to hand in a non-empty history.
#[instrument(skip(registry, records))]
pub fn render_charts(
    registry: &HabitRegistry,
    records: &[HabitRecord],
    base: &Path,
) -> Result<Vec<PathBuf>> {
    let data = build_series(registry, records);
    let mut written = Vec::with_capacity(data.series.len());
    for series in &data.series {
        let path = chart_path(base, &series.key);
        render_habit_chart(&path, series, &data.dates)
            .with_context(|| format!("rendering chart {path:?}"))?;
        written.push(path);
    }
    Ok(written)
}

fn render_habit_chart(path: &Path, series: &HabitSeries, dates: &[String]) -> Result<()> {
    let root = BitMapBackend::new(path, CHART_SIZE).into_drawing_area();
    root.fill(&WHITE)?;

    let x_max = dates.len().saturating_sub(1).max(1) as f64;
    let (y_min, y_max) = value_bounds(&series.values, series.target);

    let mut chart = ChartBuilder::on(&root)
        .caption(format!("{} Over Time", series.label), ("sans-serif", 28))
        .margin(12)
        .x_label_area_size(46)
        .y_label_area_size(60)
        .build_cartesian_2d(0f64..x_max, y_min..y_max)?;

    chart
        .configure_mesh()
        .x_labels(dates.len().clamp(2, 10))
        .x_label_formatter(&|x| date_label(dates, *x))
        .x_desc("Date")
        .y_desc(series.label.as_ref())
        .draw()?;

    for segment in split_segments(&series.values) {
        let points: Vec<(f64, f64)> = segment.iter().map(|&(i, v)| (i as f64, v)).collect();
        chart.draw_series(LineSeries::new(
            points.iter().copied(),
            BLUE.stroke_width(2),
        ))?;
        chart.draw_series(
            points
                .iter()
                .map(|&(x, y)| Circle::new((x, y), 4, BLUE.filled())),
        )?;
    }

    chart
        .draw_series(DashedLineSeries::new(
            vec![(0.0, series.target), (x_max, series.target)],
            6,
            4,
            RED.stroke_width(2),
        ))?
        .label(format!("Target {}", series.target))
        .legend(|(x, y)| PathElement::new(vec![(x, y), (x + 18, y)], RED.stroke_width(2)));

    chart
        .configure_series_labels()
        .background_style(WHITE.mix(0.85))
        .border_style(BLACK)
        .draw()?;

    root.present()?;
    Ok(())
}

/// Y bounds covering every present value and the target line, padded so
/// points never sit on the frame. A flat range widens by one unit each way.
fn value_bounds(values: &[Option<f64>], target: f64) -> (f64, f64) {
    let mut min = target;
    let mut max = target;
    for value in values.iter().flatten() {
        min = min.min(*value);
        max = max.max(*value);
    }
    if (max - min).abs() < f64::EPSILON {
        min -= 1.0;
        max += 1.0;
    }
    let pad = (max - min) * 0.08;
    (min - pad, max + pad)
}

fn date_label(dates: &[String], x: f64) -> String {
    let nearest = x.round();
    if nearest < 0.0 || (x - nearest).abs() > 0.01 {
        return String::new();
    }
    dates.get(nearest as usize).cloned().unwrap_or_default()
}
