//! Static SVG drawings of charts and tables, rasterised for PNG export.
//!
//! These are deliberately plain: bars or polylines over index positions,
//! a y scale from zero, and the same tick labels the live chart uses.

use std::fmt::Write as _;

use super::chart::{ChartKind, Figure, PLOT_BACKGROUND, PLOT_FONT};
use super::table::{CellContent, TableModel};

pub const CHART_WIDTH: u32 = 1000;
pub const CHART_HEIGHT: u32 = 500;

const PALETTE: [&str; 10] = [
    "#1f77b4", "#ff7f0e", "#2ca02c", "#d62728", "#9467bd", "#8c564b", "#e377c2", "#7f7f7f",
    "#bcbd22", "#17becf",
];

const ROW_HEIGHT: u32 = 26;
const TABLE_PADDING: u32 = 12;
const CHAR_WIDTH: u32 = 8;

pub fn escape_xml(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    for ch in text.chars() {
        match ch {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&quot;"),
            '\'' => out.push_str("&apos;"),
            _ => out.push(ch),
        }
    }
    out
}

fn plain_label(text: &str) -> String {
    escape_xml(&text.replace("<br>", " "))
}

struct Frame {
    left: f64,
    top: f64,
    width: f64,
    height: f64,
}

impl Frame {
    fn chart() -> Self {
        let margin = 70.0;
        Self {
            left: margin,
            top: margin,
            width: f64::from(CHART_WIDTH) - 2.0 * margin,
            height: f64::from(CHART_HEIGHT) - 2.0 * margin,
        }
    }

    fn bottom(&self) -> f64 {
        self.top + self.height
    }
}

/// Upper bound of the y scale: explicit range, tick labels, or data.
fn y_extent(figure: &Figure) -> f64 {
    if let Some([_, high]) = figure.layout.yaxis.range {
        return high;
    }
    if let Some(last) = figure.layout.yaxis.tickvals.as_ref().and_then(|v| v.last()) {
        return *last;
    }

    let stacked = figure.layout.barmode.is_some()
        || figure.data.iter().any(|trace| trace.stackgroup.is_some());
    let points = figure.data.iter().map(|t| t.y.len()).max().unwrap_or(0);
    let max = if stacked {
        (0..points)
            .map(|idx| {
                figure
                    .data
                    .iter()
                    .filter_map(|t| t.y.get(idx).and_then(|c| c.as_number()))
                    .sum::<f64>()
            })
            .fold(0.0, f64::max)
    } else {
        figure
            .data
            .iter()
            .flat_map(|t| t.y.iter().filter_map(|c| c.as_number()))
            .fold(0.0, f64::max)
    };
    if max > 0.0 {
        max * 1.05
    } else {
        1.0
    }
}

fn y_ticks(figure: &Figure, extent: f64) -> Vec<(f64, String)> {
    let axis = &figure.layout.yaxis;
    if let (Some(values), Some(labels)) = (&axis.tickvals, &axis.ticktext) {
        return values.iter().copied().zip(labels.iter().cloned()).collect();
    }
    (0..=5)
        .map(|step| {
            let value = extent * f64::from(step) / 5.0;
            (value, crate::core::format::format_number(value.round()))
        })
        .collect()
}

pub fn figure_svg(figure: &Figure) -> String {
    let frame = Frame::chart();
    let extent = y_extent(figure);
    let scale_y = |value: f64| frame.bottom() - (value / extent).clamp(0.0, 1.0) * frame.height;

    let mut svg = format!(
        "<svg xmlns='http://www.w3.org/2000/svg' width='{CHART_WIDTH}' height='{CHART_HEIGHT}' viewBox='0 0 {CHART_WIDTH} {CHART_HEIGHT}' font-family='{PLOT_FONT}' font-size='15'>\
         <rect width='{CHART_WIDTH}' height='{CHART_HEIGHT}' fill='{PLOT_BACKGROUND}'/>"
    );
    let _ = write!(
        svg,
        "<text x='{}' y='35' text-anchor='middle' font-size='18'>{}</text>",
        CHART_WIDTH / 2,
        plain_label(&figure.layout.title.text)
    );

    for (value, label) in y_ticks(figure, extent) {
        let y = scale_y(value);
        let _ = write!(
            svg,
            "<line x1='{:.1}' y1='{y:.1}' x2='{:.1}' y2='{y:.1}' stroke='#ffffff'/>\
             <text x='{:.1}' y='{:.1}' text-anchor='end' font-size='12'>{}</text>",
            frame.left,
            frame.left + frame.width,
            frame.left - 6.0,
            y + 4.0,
            escape_xml(&label)
        );
    }

    let points = figure.data.iter().map(|t| t.x.len()).max().unwrap_or(0);
    if points > 0 {
        let slot = frame.width / points as f64;
        let bar_traces: Vec<usize> = figure
            .data
            .iter()
            .enumerate()
            .filter(|(_, t)| t.kind == Some(ChartKind::Bar))
            .map(|(idx, _)| idx)
            .collect();
        let stacked_bars = figure.layout.barmode == Some("stack");
        let mut stack_base = vec![0.0_f64; points];

        for (trace_idx, trace) in figure.data.iter().enumerate() {
            let color = PALETTE[trace_idx % PALETTE.len()];
            if trace.kind == Some(ChartKind::Bar) {
                let lane = bar_traces.iter().position(|i| *i == trace_idx).unwrap_or(0);
                let lanes = if stacked_bars { 1 } else { bar_traces.len().max(1) };
                let bar_width = slot * 0.8 / lanes as f64;
                for (idx, cell) in trace.y.iter().enumerate() {
                    let Some(value) = cell.as_number() else { continue };
                    let base = if stacked_bars { stack_base[idx] } else { 0.0 };
                    let top = scale_y(base + value);
                    let bottom = scale_y(base);
                    let offset = if stacked_bars { 0.0 } else { lane as f64 * bar_width };
                    let x = frame.left + slot * idx as f64 + slot * 0.1 + offset;
                    let _ = write!(
                        svg,
                        "<rect x='{x:.1}' y='{top:.1}' width='{bar_width:.1}' height='{:.1}' fill='{color}'/>",
                        (bottom - top).max(0.0)
                    );
                    if stacked_bars {
                        stack_base[idx] += value;
                    }
                }
            } else {
                let coords: Vec<String> = trace
                    .y
                    .iter()
                    .enumerate()
                    .filter_map(|(idx, cell)| {
                        let value = cell.as_number()?;
                        let x = frame.left + slot * (idx as f64 + 0.5);
                        Some(format!("{x:.1},{:.1}", scale_y(value)))
                    })
                    .collect();
                let _ = write!(
                    svg,
                    "<polyline points='{}' fill='none' stroke='{color}' stroke-width='2'/>",
                    coords.join(" ")
                );
            }
        }

        let label_every = (points / 12).max(1);
        if let Some(first) = figure.data.first() {
            for (idx, cell) in first.x.iter().enumerate().step_by(label_every) {
                let label = match cell {
                    crate::core::dataset::Cell::Number(n) => crate::core::format::format_number(*n)
                        .replace(',', ""),
                    other => other.as_text().unwrap_or_default().to_string(),
                };
                let _ = write!(
                    svg,
                    "<text x='{:.1}' y='{:.1}' text-anchor='middle' font-size='12'>{}</text>",
                    frame.left + slot * (idx as f64 + 0.5),
                    frame.bottom() + 18.0,
                    escape_xml(&label)
                );
            }
        }
    }

    let _ = write!(
        svg,
        "<text x='{}' y='{}' text-anchor='middle'>{}</text>\
         <text x='18' y='{}' text-anchor='middle' transform='rotate(-90 18 {})'>{}</text>",
        CHART_WIDTH / 2,
        CHART_HEIGHT - 12,
        plain_label(&figure.layout.xaxis.title.text),
        CHART_HEIGHT / 2,
        CHART_HEIGHT / 2,
        plain_label(&figure.layout.yaxis.title.text)
    );

    let named: Vec<_> = figure.data.iter().filter(|t| !t.name.is_empty()).collect();
    for (idx, trace) in named.iter().enumerate() {
        let y = 60 + idx as u32 * 20;
        let _ = write!(
            svg,
            "<rect x='{}' y='{}' width='12' height='12' fill='{}'/>\
             <text x='{}' y='{}' font-size='12'>{}</text>",
            CHART_WIDTH - 190,
            y - 10,
            PALETTE[idx % PALETTE.len()],
            CHART_WIDTH - 172,
            y,
            plain_label(&trace.name)
        );
    }

    svg.push_str("</svg>");
    svg
}

/// Size of the drawing [`table_svg`] produces for `model`.
pub fn table_size(model: &TableModel) -> (u32, u32) {
    let widths = column_widths(model);
    let width = widths.iter().sum::<u32>() + 2 * TABLE_PADDING;
    let height = ROW_HEIGHT * (model.rows.len() as u32 + 2) + 2 * TABLE_PADDING;
    (width.max(200), height)
}

fn column_widths(model: &TableModel) -> Vec<u32> {
    model
        .headers
        .iter()
        .enumerate()
        .map(|(idx, header)| {
            let longest = model
                .rows
                .iter()
                .filter_map(|row| row.get(idx))
                .map(|cell| match &cell.content {
                    CellContent::Text(text) => text.chars().count(),
                    CellContent::Image { .. } => 3,
                })
                .chain(std::iter::once(header.lines().map(|l| l.chars().count() + 1).sum::<usize>()))
                .max()
                .unwrap_or(0);
            longest as u32 * CHAR_WIDTH + 2 * TABLE_PADDING
        })
        .collect()
}

pub fn table_svg(model: &TableModel) -> String {
    let (width, height) = table_size(model);
    let widths = column_widths(model);

    let mut svg = format!(
        "<svg xmlns='http://www.w3.org/2000/svg' width='{width}' height='{height}' viewBox='0 0 {width} {height}' font-family='{PLOT_FONT}' font-size='14'>\
         <rect width='{width}' height='{height}' fill='{PLOT_BACKGROUND}'/>"
    );
    let _ = write!(
        svg,
        "<text x='{}' y='{}' font-weight='bold'>{}</text>",
        TABLE_PADDING,
        TABLE_PADDING + 16,
        escape_xml(&model.title)
    );

    let mut y = TABLE_PADDING + ROW_HEIGHT;
    let mut x = TABLE_PADDING;
    for (header, w) in model.headers.iter().zip(&widths) {
        let _ = write!(
            svg,
            "<text x='{}' y='{}' font-weight='bold'>{}</text>",
            x + TABLE_PADDING,
            y + 17,
            plain_label(&header.label)
        );
        x += w;
    }
    y += ROW_HEIGHT;

    for (row_idx, row) in model.rows.iter().enumerate() {
        if row_idx % 2 == 0 {
            let _ = write!(
                svg,
                "<rect x='{TABLE_PADDING}' y='{y}' width='{}' height='{ROW_HEIGHT}' fill='#ececec'/>",
                width - 2 * TABLE_PADDING
            );
        }
        let mut x = TABLE_PADDING;
        for (cell, w) in row.iter().zip(&widths) {
            match &cell.content {
                CellContent::Text(text) => {
                    let _ = write!(
                        svg,
                        "<text x='{}' y='{}'>{}</text>",
                        x + TABLE_PADDING,
                        y + 17,
                        escape_xml(text)
                    );
                }
                CellContent::Image { src } => {
                    let _ = write!(
                        svg,
                        "<image x='{}' y='{}' width='20' height='20' href='{}'/>",
                        x + TABLE_PADDING,
                        y + 3,
                        escape_xml(src)
                    );
                }
            }
            x += w;
        }
        y += ROW_HEIGHT;
    }

    svg.push_str("</svg>");
    svg
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::dataset::{Cell, Dataset};
    use crate::render::plot::{MultiSeriesOptions, MultiSeriesPlot, SeriesOptions, SeriesPlot};
    use crate::render::table::TableOptions;

    #[test]
    fn escapes_markup() {
        assert_eq!(escape_xml("Me, Myself & <I>"), "Me, Myself &amp; &lt;I&gt;");
    }

    #[test]
    fn chart_snapshot_has_title_and_one_bar_per_value() {
        let dataset = Dataset::new(
            vec!["year".into(), "plays".into()],
            vec![
                vec![Cell::Number(2016.0), Cell::Number(10.0)],
                vec![Cell::Number(2017.0), Cell::Number(20.0)],
            ],
        );
        let figure = SeriesPlot::new("plays & skips", "d", SeriesOptions::default())
            .figure(&dataset)
            .unwrap();
        let svg = figure_svg(&figure);
        assert!(svg.starts_with("<svg"));
        assert!(svg.ends_with("</svg>"));
        assert!(svg.contains("plays &amp; skips"));
        assert!(svg.contains(">2016<"));
        assert_eq!(svg.matches("fill='#1f77b4'").count(), 2);
    }

    #[test]
    fn line_series_become_polylines_with_legend() {
        let dataset = Dataset::new(
            vec!["year".into(), "a".into(), "b by c".into()],
            vec![vec![Cell::Number(2016.0), Cell::Number(1.0), Cell::Number(2.0)]],
        );
        let options = MultiSeriesOptions {
            bar_chart: false,
            ..MultiSeriesOptions::default()
        };
        let figure = MultiSeriesPlot::new("t", "d", "songs", options)
            .figure(&dataset)
            .unwrap();
        let svg = figure_svg(&figure);
        assert_eq!(svg.matches("<polyline").count(), 2);
        assert!(svg.contains(">b by c<"));
    }

    #[test]
    fn table_snapshot_lists_every_cell() {
        let dataset = Dataset::new(
            vec!["artist".into(), "play count".into()],
            vec![
                vec!["Gorillaz".into(), Cell::Number(1204.0)],
                vec!["Lana Del Rey".into(), Cell::Number(998.0)],
            ],
        );
        let model = TableModel::build("most played artists", &dataset, &TableOptions::ranked());
        let svg = table_svg(&model);
        for text in ["most played artists", "rank", "Gorillaz", "1,204", "Lana Del Rey", ">2<"] {
            assert!(svg.contains(text), "missing {text}");
        }
        let (_, height) = table_size(&model);
        assert_eq!(height, ROW_HEIGHT * 4 + 2 * TABLE_PADDING);
    }

    #[test]
    fn table_snapshot_flattens_header_line_breaks() {
        let dataset = Dataset::new(
            vec!["month".into(), "monthly play count<br>(up to 12 plays)".into()],
            vec![vec!["2020-1".into(), Cell::Number(3.0)]],
        );
        let model = TableModel::build("per month", &dataset, &TableOptions::default());
        let svg = table_svg(&model);
        assert!(svg.contains(">monthly play count (up to 12 plays)<"));
        assert!(!svg.contains("&lt;br&gt;"));
    }
}
