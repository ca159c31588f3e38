//! Renderers: configured units that turn one cached dataset into one block
//! of output (text, table or chart) and optionally export it.
//!
//! What a renderer can export is fixed by its variant and can be asked for
//! through [`Renderer::exports`] without rendering anything.

pub mod chart;
pub mod plot;
pub mod snapshot;
pub mod sort;
pub mod table;
pub mod text;

use crate::core::{DashboardContext, DataError};
use crate::export::{png_from_svg, ExportError, ExportFile};

pub use chart::{ChartKind, Figure};
pub use plot::{MultiSeriesOptions, MultiSeriesPlot, SeriesOptions, SeriesPlot};
pub use sort::{SortState, TableSorter};
pub use table::{TableModel, TableOptions, TableRenderer};
pub use text::TextRenderer;

/// Export capabilities of a renderer.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct Exports {
    pub image: bool,
    pub data: bool,
}

impl Exports {
    pub fn any(self) -> bool {
        self.image || self.data
    }
}

impl std::ops::BitOr for Exports {
    type Output = Exports;

    fn bitor(self, rhs: Self) -> Self {
        Exports {
            image: self.image || rhs.image,
            data: self.data || rhs.data,
        }
    }
}

/// One rendered piece of a view.
#[derive(Debug, Clone, PartialEq)]
pub enum Block {
    Text { html: String },
    Table(TableModel),
    Chart(Figure),
}

#[derive(Debug, Clone, PartialEq)]
pub enum Renderer {
    Text(TextRenderer),
    Table(TableRenderer),
    Plot(SeriesPlot),
    MultiPlot(MultiSeriesPlot),
}

impl Renderer {
    pub fn text(template: impl Into<String>, dictionary: impl Into<String>) -> Self {
        Renderer::Text(TextRenderer::new(template, dictionary))
    }

    pub fn table(title: impl Into<String>, dataset: impl Into<String>, options: TableOptions) -> Self {
        Renderer::Table(TableRenderer::new(title, dataset, options))
    }

    pub fn plot(title: impl Into<String>, dataset: impl Into<String>, options: SeriesOptions) -> Self {
        Renderer::Plot(SeriesPlot::new(title, dataset, options))
    }

    pub fn multi_plot(
        title: impl Into<String>,
        dataset: impl Into<String>,
        y_unit: impl Into<String>,
        options: MultiSeriesOptions,
    ) -> Self {
        Renderer::MultiPlot(MultiSeriesPlot::new(title, dataset, y_unit, options))
    }

    /// Name of the cache entry this renderer reads.
    pub fn dataset_name(&self) -> Option<&str> {
        match self {
            Renderer::Text(text) => text.dictionary(),
            Renderer::Table(table) => Some(&table.dataset),
            Renderer::Plot(plot) => Some(&plot.dataset),
            Renderer::MultiPlot(plot) => Some(&plot.dataset),
        }
    }

    pub fn exports(&self) -> Exports {
        match self {
            Renderer::Text(text) => Exports {
                image: false,
                data: text.dictionary().is_some(),
            },
            Renderer::Table(_) | Renderer::Plot(_) | Renderer::MultiPlot(_) => Exports {
                image: true,
                data: true,
            },
        }
    }

    pub async fn render(&self, ctx: &DashboardContext) -> Result<Block, DataError> {
        match self {
            Renderer::Text(text) => Ok(Block::Text {
                html: text.render(ctx).await?,
            }),
            Renderer::Table(table) => Ok(Block::Table(table.render(ctx).await?)),
            Renderer::Plot(plot) => Ok(Block::Chart(plot.render(ctx).await?)),
            Renderer::MultiPlot(plot) => Ok(Block::Chart(plot.render(ctx).await?)),
        }
    }

    /// PNG snapshot, `<dataset_name>.png`. A table is drawn in the row order
    /// remembered for `container_id`, if any.
    pub async fn export_image(
        &self,
        ctx: &DashboardContext,
        container_id: &str,
    ) -> Result<ExportFile, ExportError> {
        let name = match (self.exports().image, self.dataset_name()) {
            (true, Some(name)) => name,
            _ => return Err(ExportError::Unsupported { what: "this text block" }),
        };
        let (svg, width, height) = self.snapshot_svg(ctx, container_id).await?;
        let bytes = png_from_svg(name, &svg, width, height).await?;
        Ok(ExportFile::png(name, bytes))
    }

    /// SVG drawing behind [`Renderer::export_image`], with its size.
    pub async fn snapshot_svg(
        &self,
        ctx: &DashboardContext,
        container_id: &str,
    ) -> Result<(String, u32, u32), ExportError> {
        match self.render(ctx).await? {
            Block::Table(model) => {
                let model = match ctx.row_order(container_id) {
                    Some(order) if order.len() == model.rows.len() => model.reordered(&order),
                    _ => model,
                };
                let (width, height) = snapshot::table_size(&model);
                Ok((snapshot::table_svg(&model), width, height))
            }
            Block::Chart(figure) => Ok((
                snapshot::figure_svg(&figure),
                snapshot::CHART_WIDTH,
                snapshot::CHART_HEIGHT,
            )),
            Block::Text { .. } => Err(ExportError::Unsupported { what: "this text block" }),
        }
    }

    /// The whole cached entry as pretty JSON, `<dataset_name>.json`.
    pub async fn export_data(&self, ctx: &DashboardContext) -> Result<ExportFile, ExportError> {
        let name = self
            .dataset_name()
            .ok_or(ExportError::Unsupported { what: "this text block" })?;
        let entry = ctx.cache().get(name).await?;
        ExportFile::json(name, &entry)
    }
}
