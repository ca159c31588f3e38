//! Serializable chart description handed to Plotly (`Plotly.newPlot`).
//!
//! Field names follow Plotly's JSON schema so a [`Figure`] can be passed to
//! the charting engine as-is.

use serde::Serialize;

use crate::core::dataset::Cell;

pub const PLOT_BACKGROUND: &str = "#dfdfdf";
pub const PLOT_FONT: &str = "Times";
pub const PLOT_FONT_SIZE: u32 = 15;
pub const PLOT_MARGIN: u32 = 55;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum ChartKind {
    #[default]
    Bar,
    Scatter,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Trace {
    pub x: Vec<Cell>,
    pub y: Vec<Cell>,
    #[serde(rename = "type", skip_serializing_if = "Option::is_none")]
    pub kind: Option<ChartKind>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub mode: Option<&'static str>,
    pub name: String,
    pub hovertemplate: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub hovertext: Option<Vec<String>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub stackgroup: Option<&'static str>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Title {
    pub text: String,
}

impl Title {
    pub fn new(text: impl Into<String>) -> Self {
        Self { text: text.into() }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum AxisType {
    Category,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Axis {
    pub title: Title,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub rangemode: Option<&'static str>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub range: Option<[f64; 2]>,
    #[serde(rename = "type", skip_serializing_if = "Option::is_none")]
    pub kind: Option<AxisType>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub dtick: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub tickvals: Option<Vec<f64>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub ticktext: Option<Vec<String>>,
}

impl Axis {
    pub fn titled(text: impl Into<String>) -> Self {
        Self {
            title: Title::new(text),
            rangemode: None,
            range: None,
            kind: None,
            dtick: None,
            tickvals: None,
            ticktext: None,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Font {
    pub family: &'static str,
    pub size: u32,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Margin {
    pub l: u32,
    pub r: u32,
    pub b: u32,
    pub t: u32,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Layout {
    pub font: Font,
    pub paper_bgcolor: &'static str,
    pub plot_bgcolor: &'static str,
    pub margin: Margin,
    pub title: Title,
    pub xaxis: Axis,
    pub yaxis: Axis,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub barmode: Option<&'static str>,
}

impl Layout {
    /// Shared look of every line/bar chart; the y axis starts at zero and
    /// `percent` pins it to `[0, 101]`.
    pub fn line_plot(title: &str, x_unit: &str, y_unit: &str, percent: bool, stacked_bars: bool) -> Self {
        let mut yaxis = Axis::titled(y_unit);
        yaxis.rangemode = Some("tozero");
        if percent {
            yaxis.range = Some([0.0, 101.0]);
        }

        Self {
            font: Font {
                family: PLOT_FONT,
                size: PLOT_FONT_SIZE,
            },
            paper_bgcolor: PLOT_BACKGROUND,
            plot_bgcolor: PLOT_BACKGROUND,
            margin: Margin {
                l: PLOT_MARGIN,
                r: PLOT_MARGIN,
                b: PLOT_MARGIN,
                t: PLOT_MARGIN,
            },
            title: Title::new(title),
            xaxis: Axis::titled(x_unit),
            yaxis,
            barmode: stacked_bars.then_some("stack"),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PlotConfig {
    #[serde(rename = "displayModeBar")]
    pub display_mode_bar: bool,
    pub responsive: bool,
}

impl Default for PlotConfig {
    fn default() -> Self {
        Self {
            display_mode_bar: false,
            responsive: true,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Figure {
    pub data: Vec<Trace>,
    pub layout: Layout,
    pub config: PlotConfig,
}

impl Figure {
    pub fn new(data: Vec<Trace>, layout: Layout) -> Self {
        Self {
            data,
            layout,
            config: PlotConfig::default(),
        }
    }

    /// Script drawing this figure into the element with id `container`.
    pub fn plot_script(&self, container: &str) -> Result<String, serde_json::Error> {
        let data = serde_json::to_string(&self.data)?;
        let layout = serde_json::to_string(&self.layout)?;
        let config = serde_json::to_string(&self.config)?;
        let target = serde_json::to_string(container)?;
        Ok(format!(
            "if (window.Plotly) {{ Plotly.newPlot(document.getElementById({target}), {data}, {layout}, {config}); }}"
        ))
    }
}
