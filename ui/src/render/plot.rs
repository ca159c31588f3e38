//! Single- and multi-series line/bar plots over a named dataset.

use crate::core::dataset::{Cell, DataError, Dataset};
use crate::core::format::{clock_label, duration_ticks};
use crate::core::DashboardContext;

use super::chart::{AxisType, ChartKind, Figure, Layout, Trace};

#[derive(Debug, Clone, PartialEq, Default)]
pub struct SeriesOptions {
    /// Defaults to the first column.
    pub x_column: Option<String>,
    /// Defaults to the second column.
    pub y_column: Option<String>,
    pub percent: bool,
    pub is_duration_hours: bool,
    pub is_duration_minutes: bool,
    pub chart_kind: ChartKind,
    pub x_is_categorical_year: bool,
}

impl SeriesOptions {
    pub fn hours() -> Self {
        Self {
            is_duration_hours: true,
            ..Self::default()
        }
    }

    pub fn minutes() -> Self {
        Self {
            is_duration_minutes: true,
            ..Self::default()
        }
    }

    pub fn scatter() -> Self {
        Self {
            chart_kind: ChartKind::Scatter,
            ..Self::default()
        }
    }

    pub fn yearly() -> Self {
        Self {
            x_is_categorical_year: true,
            ..Self::default()
        }
    }

    fn is_duration(&self) -> bool {
        self.is_duration_hours || self.is_duration_minutes
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct SeriesPlot {
    pub title: String,
    pub dataset: String,
    pub options: SeriesOptions,
}

impl SeriesPlot {
    pub fn new(title: impl Into<String>, dataset: impl Into<String>, options: SeriesOptions) -> Self {
        Self {
            title: title.into(),
            dataset: dataset.into(),
            options,
        }
    }

    pub async fn render(&self, ctx: &DashboardContext) -> Result<Figure, DataError> {
        let dataset = ctx.cache().dataset(&self.dataset).await?;
        self.figure(&dataset)
    }

    pub fn figure(&self, dataset: &Dataset) -> Result<Figure, DataError> {
        let opt = &self.options;
        let x_column = resolve_column(&self.dataset, dataset, opt.x_column.as_deref(), 0)?;
        let y_column = resolve_column(&self.dataset, dataset, opt.y_column.as_deref(), 1)?;
        let x = column_values(&self.dataset, dataset, &x_column)?;
        let y = column_values(&self.dataset, dataset, &y_column)?;

        let y_unit = if opt.percent { "%" } else { y_column.as_str() };
        let mut layout = Layout::line_plot(&self.title, &x_column, y_unit, opt.percent, false);
        if opt.x_is_categorical_year {
            layout.xaxis.kind = Some(AxisType::Category);
            layout.xaxis.dtick = Some(1.0);
        }

        let mut trace = Trace {
            x,
            y,
            kind: Some(opt.chart_kind),
            mode: None,
            name: String::new(),
            hovertemplate: format!("%{{x}}<br>%{{y:,}} {y_unit}"),
            hovertext: None,
            stackgroup: None,
        };

        if opt.is_duration() {
            let max = trace
                .y
                .iter()
                .filter_map(Cell::as_number)
                .fold(0.0_f64, f64::max);
            let (tickvals, ticktext) = duration_ticks(max);
            layout.yaxis.tickvals = Some(tickvals);
            layout.yaxis.ticktext = Some(ticktext);

            trace.hovertext = Some(
                trace
                    .y
                    .iter()
                    .map(|cell| cell.as_number().map(clock_label).unwrap_or_default())
                    .collect(),
            );
            trace.hovertemplate = "%{x}<br>%{hovertext}".to_string();
        }

        Ok(Figure::new(vec![trace], layout))
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct MultiSeriesOptions {
    pub x_column: Option<String>,
    /// Defaults to every column after the x column.
    pub y_columns: Option<Vec<String>>,
    pub percent: bool,
    pub stacked: bool,
    pub bar_chart: bool,
    pub reverse_series_order: bool,
}

impl Default for MultiSeriesOptions {
    fn default() -> Self {
        Self {
            x_column: None,
            y_columns: None,
            percent: false,
            stacked: false,
            bar_chart: true,
            reverse_series_order: false,
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct MultiSeriesPlot {
    pub title: String,
    pub dataset: String,
    pub y_unit: String,
    pub options: MultiSeriesOptions,
}

impl MultiSeriesPlot {
    pub fn new(
        title: impl Into<String>,
        dataset: impl Into<String>,
        y_unit: impl Into<String>,
        options: MultiSeriesOptions,
    ) -> Self {
        Self {
            title: title.into(),
            dataset: dataset.into(),
            y_unit: y_unit.into(),
            options,
        }
    }

    pub async fn render(&self, ctx: &DashboardContext) -> Result<Figure, DataError> {
        let dataset = ctx.cache().dataset(&self.dataset).await?;
        self.figure(&dataset)
    }

    pub fn figure(&self, dataset: &Dataset) -> Result<Figure, DataError> {
        let opt = &self.options;
        let x_column = resolve_column(&self.dataset, dataset, opt.x_column.as_deref(), 0)?;
        let x = column_values(&self.dataset, dataset, &x_column)?;
        let y_columns = match &opt.y_columns {
            Some(columns) => columns.clone(),
            None => dataset
                .columns
                .iter()
                .filter(|column| **column != x_column)
                .cloned()
                .collect(),
        };

        let mut traces = Vec::with_capacity(y_columns.len());
        for column in &y_columns {
            let trace = Trace {
                x: x.clone(),
                y: column_values(&self.dataset, dataset, column)?,
                kind: opt.bar_chart.then_some(ChartKind::Bar),
                mode: Some("lines"),
                name: series_label(column),
                hovertemplate: format!("%{{x}}<br>%{{y:,}} {}", self.y_unit),
                hovertext: None,
                stackgroup: opt.stacked.then_some("one"),
            };
            if opt.reverse_series_order {
                traces.insert(0, trace);
            } else {
                traces.push(trace);
            }
        }

        let layout = Layout::line_plot(
            &self.title,
            &x_column,
            &self.y_unit,
            opt.percent,
            opt.bar_chart && opt.stacked,
        );
        Ok(Figure::new(traces, layout))
    }
}

/// Legend label for a column; long "x by y" names wrap before " by ".
pub fn series_label(column: &str) -> String {
    column.replace(" by ", " by<br>")
}

fn resolve_column(
    name: &str,
    dataset: &Dataset,
    requested: Option<&str>,
    position: usize,
) -> Result<String, DataError> {
    match requested {
        Some(column) => Ok(column.to_string()),
        None => dataset
            .columns
            .get(position)
            .cloned()
            .ok_or_else(|| DataError::MissingColumn {
                name: name.to_string(),
                column: format!("#{position}"),
            }),
    }
}

fn column_values(name: &str, dataset: &Dataset, column: &str) -> Result<Vec<Cell>, DataError> {
    dataset.column(column).ok_or_else(|| DataError::MissingColumn {
        name: name.to_string(),
        column: column.to_string(),
    })
}
