//! View registry: view name -> ordered renderers, plus fragment routing.
//!
//! `show_view` renders every renderer of a view in order into containers
//! `id-0`, `id-1`, ... and only then reports which export controls apply.
//! A renderer that fails leaves an error placeholder in its container; the
//! rest of the view still renders.

use crate::core::platform::FragmentHost;
use crate::core::{DashboardContext, DataError};
use crate::export::{ExportError, ExportFile};
use crate::render::{Block, Exports, Renderer};

/// Shown when the location names no known view.
pub const HOME_VIEW: &str = "basics";

#[derive(Debug, Clone, PartialEq)]
pub struct ViewDefinition {
    pub name: String,
    pub renderers: Vec<Renderer>,
}

impl ViewDefinition {
    pub fn new(name: impl Into<String>, renderers: Vec<Renderer>) -> Self {
        Self {
            name: name.into(),
            renderers,
        }
    }

    /// Union of the renderers' export capabilities.
    pub fn exports(&self) -> Exports {
        self.renderers
            .iter()
            .fold(Exports::default(), |acc, r| acc | r.exports())
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct RenderedBlock {
    pub container_id: String,
    pub content: Result<Block, DataError>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct ViewOutput {
    pub name: String,
    pub slug: String,
    pub blocks: Vec<RenderedBlock>,
    pub exports: Exports,
}

/// Location-safe form of a view name: spaces become `_`, punctuation other
/// than `_` and `-` is dropped, everything is lower-cased.
pub fn slug(name: &str) -> String {
    name.chars()
        .filter_map(|ch| match ch {
            ' ' => Some('_'),
            '_' | '-' => Some(ch),
            c if c.is_ascii_punctuation() => None,
            c => Some(c),
        })
        .flat_map(char::to_lowercase)
        .collect()
}

pub fn container_id(index: usize) -> String {
    format!("id-{index}")
}

#[derive(Debug, Clone, PartialEq, Default)]
pub struct ViewRegistry {
    views: Vec<ViewDefinition>,
}

impl ViewRegistry {
    pub fn new(views: Vec<ViewDefinition>) -> Self {
        Self { views }
    }

    /// Names in configuration order (tab order).
    pub fn names(&self) -> impl Iterator<Item = &str> {
        self.views.iter().map(|v| v.name.as_str())
    }

    pub fn get(&self, name: &str) -> Option<&ViewDefinition> {
        self.views.iter().find(|v| v.name == name)
    }

    /// View addressed by a location fragment; home view when there is none
    /// or nothing matches.
    pub fn resolve_fragment(&self, fragment: Option<&str>) -> &str {
        let wanted = fragment
            .map(|f| slug(f.trim_start_matches('#')))
            .filter(|f| !f.is_empty());
        wanted
            .and_then(|wanted| self.views.iter().find(|v| slug(&v.name) == wanted))
            .map(|v| v.name.as_str())
            .unwrap_or(HOME_VIEW)
    }

    /// Render view `name` (unknown names fall back to the home view) and
    /// point the location at it.
    pub async fn show_view(
        &self,
        name: &str,
        ctx: &DashboardContext,
        location: &dyn FragmentHost,
    ) -> ViewOutput {
        let view = match self.get(name).or_else(|| self.get(HOME_VIEW)) {
            Some(view) => view,
            None => {
                tracing::warn!(view = name, "no such view and no home view");
                return ViewOutput {
                    name: name.to_string(),
                    slug: slug(name),
                    blocks: Vec::new(),
                    exports: Exports::default(),
                };
            }
        };

        ctx.forget_row_orders();
        let mut blocks = Vec::with_capacity(view.renderers.len());
        for (index, renderer) in view.renderers.iter().enumerate() {
            let content = renderer.render(ctx).await;
            if let Err(err) = &content {
                tracing::warn!(view = %view.name, container = index, %err, "block failed to render");
            }
            blocks.push(RenderedBlock {
                container_id: container_id(index),
                content,
            });
        }

        let view_slug = slug(&view.name);
        location.replace_fragment(&view_slug);
        tracing::info!(view = %view.name, "Show Data");

        ViewOutput {
            name: view.name.clone(),
            slug: view_slug,
            blocks,
            exports: view.exports(),
        }
    }

    /// Image exports of every capable renderer in `name`, in view order.
    pub async fn export_images(
        &self,
        name: &str,
        ctx: &DashboardContext,
    ) -> Vec<Result<ExportFile, ExportError>> {
        let mut files = Vec::new();
        if let Some(view) = self.get(name) {
            for (index, renderer) in view.renderers.iter().enumerate() {
                if renderer.exports().image {
                    files.push(renderer.export_image(ctx, &container_id(index)).await);
                }
            }
            tracing::info!(view = name, files = files.len(), "Downloaded Image");
        }
        files
    }

    /// Data exports of every capable renderer in `name`, in view order.
    pub async fn export_data(
        &self,
        name: &str,
        ctx: &DashboardContext,
    ) -> Vec<Result<ExportFile, ExportError>> {
        let mut files = Vec::new();
        if let Some(view) = self.get(name) {
            for renderer in view.renderers.iter().filter(|r| r.exports().data) {
                files.push(renderer.export_data(ctx).await);
            }
            tracing::info!(view = name, files = files.len(), "Downloaded Data");
        }
        files
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::cache::MemoryFetcher;
    use crate::core::platform::MemoryLocation;
    use crate::render::{SeriesOptions, TableOptions, TextRenderer};
    use futures::executor::block_on;
    use std::rc::Rc;

    fn registry() -> ViewRegistry {
        ViewRegistry::new(vec![
            ViewDefinition::new(HOME_VIEW, vec![Renderer::text("{played_songs} songs", "basics_dict")]),
            ViewDefinition::new(
                "most played songs",
                vec![Renderer::table("most played songs", "songs", TableOptions::ranked())],
            ),
            ViewDefinition::new(
                "song stats",
                vec![
                    Renderer::Text(TextRenderer::fixed("<p>per year</p>")),
                    Renderer::plot("per year", "missing", SeriesOptions::default()),
                    Renderer::plot("per year", "songs", SeriesOptions::default()),
                ],
            ),
        ])
    }

    #[test]
    fn slug_normalises_names() {
        assert_eq!(slug("Most Played Songs?"), "most_played_songs");
        assert_eq!(slug("avg. song length"), "avg_song_length");
        assert_eq!(slug("sample_data"), "sample_data");
    }

    #[test]
    fn fragments_resolve_back_to_views() {
        let registry = registry();
        assert_eq!(
            registry.resolve_fragment(Some(&slug("Most Played Songs?"))),
            "most played songs"
        );
        assert_eq!(registry.resolve_fragment(Some("#Song_Stats")), "song stats");
        assert_eq!(registry.resolve_fragment(Some("nope")), HOME_VIEW);
        assert_eq!(registry.resolve_fragment(Some("")), HOME_VIEW);
        assert_eq!(registry.resolve_fragment(None), HOME_VIEW);
    }

    #[test]
    fn failed_block_does_not_stop_the_view() {
        let fetcher = MemoryFetcher::new().with(
            "songs",
            r#"{"columns": ["song", "plays"], "data": [["Nikes", 3]]}"#,
        );
        let ctx = DashboardContext::new(Rc::new(fetcher));
        let location = MemoryLocation::default();

        let output = block_on(registry().show_view("song stats", &ctx, &location));
        let ids: Vec<_> = output.blocks.iter().map(|b| b.container_id.as_str()).collect();
        assert_eq!(ids, vec!["id-0", "id-1", "id-2"]);
        assert!(output.blocks[0].content.is_ok());
        assert!(matches!(
            output.blocks[1].content,
            Err(DataError::Fetch { .. })
        ));
        assert!(matches!(output.blocks[2].content, Ok(Block::Chart(_))));
        assert_eq!(output.exports, Exports { image: true, data: true });
        assert_eq!(location.fragment().as_deref(), Some("song_stats"));
    }

    #[test]
    fn unknown_view_shows_home() {
        let ctx = DashboardContext::new(Rc::new(MemoryFetcher::new()));
        let location = MemoryLocation::default();
        let output = block_on(registry().show_view("nope", &ctx, &location));
        assert_eq!(output.name, HOME_VIEW);
        assert_eq!(output.exports, Exports { image: false, data: true });
        assert_eq!(location.fragment().as_deref(), Some("basics"));
    }

    #[test]
    fn showing_a_view_forgets_old_table_orders() {
        let ctx = DashboardContext::new(Rc::new(MemoryFetcher::new()));
        ctx.remember_row_order("id-0", vec![1, 0]);
        let location = MemoryLocation::default();
        block_on(registry().show_view("most played songs", &ctx, &location));
        assert_eq!(ctx.row_order("id-0"), None);
    }

    #[test]
    fn exports_run_in_view_order_for_capable_renderers_only() {
        let fetcher = MemoryFetcher::new().with(
            "songs",
            r#"{"columns": ["song", "plays"], "data": [["Nikes", 3]]}"#,
        );
        let ctx = DashboardContext::new(Rc::new(fetcher));
        let files = block_on(registry().export_data("song stats", &ctx));
        assert_eq!(files.len(), 2);
        assert!(files[0].is_err());
        assert_eq!(files[1].as_ref().unwrap().filename, "songs.json");
    }
}
