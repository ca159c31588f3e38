//! End-to-end: bundled assets -> cache -> views -> sorting and exports, and
//! an upload through a stub pipeline switching the texts to "you".

use std::collections::BTreeMap;
use std::path::PathBuf;
use std::rc::Rc;

use api::filter::YearMonth;
use api::model::{Cell, Dataset, ScalarDict, ScalarValue};
use api::pipeline::{CrunchOutcome, CrunchPipeline, CrunchRequest, PipelineError};
use futures::executor::block_on;
use futures::future::LocalBoxFuture;
use pretty_assertions::assert_eq;

use ui::core::platform::{AssetFetcher, FragmentHost, MemoryLocation};
use ui::core::progress::ProgressLog;
use ui::core::DashboardContext;
use ui::render::{Block, TableModel, TableSorter};
use ui::views::ViewRegistry;
use ui::workflow::process_archive;

fn bundled_context() -> DashboardContext {
    let assets = PathBuf::from(env!("CARGO_MANIFEST_DIR")).join("assets");
    DashboardContext::new(Rc::new(AssetFetcher::new(assets)))
}

fn table_of(registry: &ViewRegistry, view: &str, ctx: &DashboardContext) -> TableModel {
    let location = MemoryLocation::default();
    let output = block_on(registry.show_view(view, ctx, &location));
    match output.blocks[0].content.clone() {
        Ok(Block::Table(model)) => model,
        other => panic!("expected a table in {view}, got {other:?}"),
    }
}

#[test]
fn demo_artists_table_sorts_and_keeps_ranks() {
    let ctx = bundled_context();
    let registry = ViewRegistry::default_views();
    let model = table_of(&registry, "most played artists", &ctx);

    let labels: Vec<_> = model.headers.iter().map(|h| h.label.as_str()).collect();
    assert_eq!(labels, vec!["rank", "artist", "play count", "hours played"]);
    assert_eq!(model.cell_texts()[0], vec!["1", "Gorillaz", "1,843", "96h"]);

    let mut sorter = TableSorter::new(&model);
    assert_eq!(sorter.header_class(0), None);
    sorter.click(&model, 2);
    let ascending = sorter.sorted_model(&model).cell_texts();
    assert_eq!(ascending[0][1], "The xx");
    assert_eq!(ascending[0][0], "10");

    sorter.click(&model, 2);
    let descending = sorter.sorted_model(&model).cell_texts();
    assert_eq!(descending[0][1], "Gorillaz");
    assert_eq!(sorter.header_class(2), Some("sortingDesc"));
    assert_eq!(sorter.header_class(3), Some("sorting"));
}

#[test]
fn location_fragment_selects_the_view() {
    let ctx = bundled_context();
    let registry = ViewRegistry::default_views();
    let location = MemoryLocation::new(Some("#most_played_songs"));

    let name = registry.resolve_fragment(location.fragment().as_deref()).to_string();
    let output = block_on(registry.show_view(&name, &ctx, &location));
    assert_eq!(output.name, "most played songs");
    assert_eq!(location.fragment().as_deref(), Some("most_played_songs"));
}

#[test]
fn play_time_view_draws_every_chart() {
    let ctx = bundled_context();
    let registry = ViewRegistry::default_views();
    let location = MemoryLocation::default();

    let output = block_on(registry.show_view("play time per day", &ctx, &location));
    assert_eq!(output.blocks.len(), 5);
    for block in &output.blocks {
        assert!(matches!(block.content, Ok(Block::Chart(_))), "{}", block.container_id);
    }
}

#[test]
fn every_tab_renders_from_the_bundled_demo() {
    let ctx = bundled_context();
    let registry = ViewRegistry::default_views();
    let location = MemoryLocation::default();

    let tabs: Vec<String> = registry.tab_names().map(str::to_string).collect();
    assert_eq!(tabs.len(), 14);
    for tab in tabs {
        let output = block_on(registry.show_view(&tab, &ctx, &location));
        assert_eq!(output.name, tab);
        for block in &output.blocks {
            if let Err(err) = &block.content {
                panic!("{tab} / {}: {err}", block.container_id);
            }
        }
    }
}

#[test]
fn top_songs_table_is_unsorted_with_blank_gaps() {
    let ctx = bundled_context();
    let registry = ViewRegistry::default_views();
    let model = table_of(&registry, "songs of top artists", &ctx);
    let labels: Vec<_> = model.headers.iter().map(|h| h.label.as_str()).collect();
    assert_eq!(labels, vec!["artist", "top-1 song", "top-2 song", "top-3 song"]);
    assert!(model.headers.iter().all(|h| !h.sortable));
    // Portishead has only two songs
    assert_eq!(model.cell_texts()[5][3], "");
}

#[test]
fn data_export_writes_the_cached_dataset() {
    let ctx = bundled_context();
    let registry = ViewRegistry::default_views();
    let files = block_on(registry.export_data("most played songs", &ctx));
    assert_eq!(files.len(), 1);
    let file = files[0].as_ref().unwrap();
    assert_eq!(file.filename, "most_played_tracks_total.json");
    let back: Dataset = serde_json::from_slice(&file.bytes).unwrap();
    assert_eq!(back.data.len(), 10);
}

#[test]
fn image_export_of_a_chart_view_is_png() {
    let ctx = bundled_context();
    let registry = ViewRegistry::default_views();
    let files = block_on(registry.export_images("unique and new played songs", &ctx));
    let file = files[0].as_ref().unwrap();
    assert_eq!(file.filename, "yearly_track_play_count.png");
    assert_eq!(&file.bytes[..4], b"\x89PNG");
}

struct StubPipeline;

impl CrunchPipeline for StubPipeline {
    fn list_json_files<'a>(
        &'a self,
        _archive: &'a [u8],
    ) -> LocalBoxFuture<'a, Result<Vec<String>, PipelineError>> {
        Box::pin(async { Ok(vec!["MyData/Streaming_History_Audio_2021.json".to_string()]) })
    }

    fn crunch<'a>(
        &'a self,
        _request: CrunchRequest<'a>,
    ) -> LocalBoxFuture<'a, Result<CrunchOutcome, PipelineError>> {
        Box::pin(async {
            let mut df_dict = BTreeMap::new();
            df_dict.insert(
                "most_played_artists_total".to_string(),
                Dataset::new(
                    vec!["artist".into(), "play count".into()],
                    vec![vec!["Khruangbin".into(), Cell::Number(12.0)]],
                ),
            );
            let mut single_values = ScalarDict::new();
            single_values.insert("played_songs".into(), ScalarValue::Number(1234.0));
            Ok(CrunchOutcome::Ready {
                df_dict,
                single_values,
            })
        })
    }

    fn month_bounds<'a>(
        &'a self,
        _archive: &'a [u8],
    ) -> LocalBoxFuture<'a, Result<(YearMonth, YearMonth), PipelineError>> {
        Box::pin(async { Ok((YearMonth::new(2021, 1), YearMonth::new(2021, 3))) })
    }

    fn random_sample<'a>(
        &'a self,
        _archive: &'a [u8],
        _sample_count: usize,
    ) -> LocalBoxFuture<'a, Result<Dataset, PipelineError>> {
        Box::pin(async { Err(PipelineError::Unavailable) })
    }

    fn export_csv<'a>(
        &'a self,
        _archive: &'a [u8],
    ) -> LocalBoxFuture<'a, Result<String, PipelineError>> {
        Box::pin(async { Err(PipelineError::Unavailable) })
    }
}

#[test]
fn upload_switches_texts_and_tables_to_the_visitor() {
    let ctx = bundled_context();
    let registry = ViewRegistry::default_views();
    let location = MemoryLocation::default();

    let before = block_on(registry.show_view("basics", &ctx, &location));
    let Ok(Block::Text { html }) = &before.blocks[0].content else {
        panic!("basics should render text");
    };
    assert!(html.contains("<li>I listened to"));

    let mut report = |_: &ProgressLog| {};
    block_on(process_archive(&ctx, &StubPipeline, b"zip", &mut report)).unwrap();

    let after = block_on(registry.show_view("basics", &ctx, &location));
    let Ok(Block::Text { html }) = &after.blocks[0].content else {
        panic!("basics should render text");
    };
    assert!(html.contains("<li>You listened to <span class=\"highlight\">1,234</span>"));
    assert!(html.contains("<li>Your top three artists"));

    let model = table_of(&registry, "most played artists", &ctx);
    assert_eq!(model.cell_texts(), vec![vec!["1", "Khruangbin", "12"]]);
}
