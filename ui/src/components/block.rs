use std::rc::Rc;

use dioxus::prelude::*;

use crate::core::{DashboardContext, DataError};
use crate::render::table::{CellContent, TableCell};
use crate::render::{Block, Figure, TableModel, TableSorter};
use crate::t;

/// One rendered block inside its `id-<n>` container.
#[component]
pub fn BlockView(container_id: String, content: Result<Block, DataError>) -> Element {
    match content {
        Ok(Block::Text { html }) => rsx! {
            div { id: "{container_id}", class: "block block--text", dangerous_inner_html: "{html}" }
        },
        Ok(Block::Table(model)) => rsx! {
            div { id: "{container_id}", class: "block block--table",
                SortableTable { container_id: container_id.clone(), model }
            }
        },
        Ok(Block::Chart(figure)) => rsx! {
            ChartFrame { container_id, figure }
        },
        Err(err) => rsx! {
            div { id: "{container_id}", class: "block block--error",
                p { class: "block__error", {t!("block-error", error = err.to_string())} }
            }
        },
    }
}

/// Table with click-to-sort headers. Rank and unsortable columns carry no
/// sort class and ignore clicks. The order on screen is left in the
/// dashboard context for image export.
#[component]
pub fn SortableTable(container_id: String, model: TableModel) -> Element {
    let ctx = use_context::<DashboardContext>();
    let shared = use_hook(|| Rc::new(model.clone()));
    let mut sorter = use_signal(|| TableSorter::new(&model));

    let headers: Vec<_> = shared
        .headers
        .iter()
        .enumerate()
        .map(|(column, header)| {
            let lines: Vec<String> = header.lines().map(str::to_string).collect();
            (column, lines, sorter.read().header_class(column))
        })
        .collect();
    let rows: Vec<(usize, Vec<TableCell>)> = sorter
        .read()
        .order()
        .iter()
        .filter_map(|idx| shared.rows.get(*idx).map(|row| (*idx, row.clone())))
        .collect();

    rsx! {
        h3 { "{shared.title}" }
        table { class: "data-table",
            thead {
                tr {
                    for (column, lines, class) in headers {
                        th {
                            key: "{column}",
                            class: class.unwrap_or_default(),
                            onclick: {
                                let (shared, ctx, container_id) = (shared.clone(), ctx.clone(), container_id.clone());
                                move |_| {
                                    if sorter.write().click(&shared, column).is_some() {
                                        ctx.remember_row_order(&container_id, sorter.read().order().to_vec());
                                    }
                                }
                            },
                            for (line_idx, line) in lines.into_iter().enumerate() {
                                if line_idx > 0 {
                                    br {}
                                }
                                "{line}"
                            }
                        }
                    }
                }
            }
            tbody {
                for (idx, row) in rows {
                    tr { key: "{idx}",
                        for (column, cell) in row.into_iter().enumerate() {
                            td { key: "{column}", {cell_node(cell)} }
                        }
                    }
                }
            }
        }
    }
}

fn cell_node(cell: TableCell) -> Element {
    match cell.content {
        CellContent::Text(text) => rsx! { "{text}" },
        CellContent::Image { src } => rsx! { img { src: "{src}" } },
    }
}

/// Empty container that Plotly draws `figure` into once mounted.
#[component]
pub fn ChartFrame(container_id: String, figure: Figure) -> Element {
    let script = use_hook(|| figure.plot_script(&container_id).map_err(|err| err.to_string()));

    use_effect(move || match &script {
        Ok(js) => {
            let _ = document::eval(js);
        }
        Err(err) => tracing::warn!(%err, "figure could not be serialized"),
    });

    rsx! {
        div { id: "{container_id}", class: "block block--chart" }
    }
}
