use std::rc::Rc;

use dioxus::prelude::*;

use ui::core::platform::AssetFetcher;
use ui::core::DashboardContext;
use ui::Dashboard;

/// Charting engine the chart blocks hand their figures to.
const PLOTLY_JS: &str = "https://cdn.plot.ly/plotly-2.35.2.min.js";

const MAIN_CSS_INLINE: &str = include_str!(concat!(
    env!("CARGO_MANIFEST_DIR"),
    "/../ui/assets/theme/main.css"
));

fn main() {
    dioxus::logger::initialize_default();
    tracing::info!(version = env!("CARGO_PKG_VERSION"), "starting tunelog web");
    ui::workflow::register_pipeline(ui::bridge::script_pipeline);
    dioxus::launch(App);
}

#[component]
fn App() -> Element {
    ui::i18n::init();

    // Set by the navbar's language switcher; keys the page so every string
    // is looked up again.
    let lang_code = use_signal(ui::i18n::current_language);
    use_context_provider(|| lang_code);
    // Above the keyed subtree so uploaded data survives a language switch.
    use_context_provider(|| DashboardContext::new(Rc::new(AssetFetcher::default())));

    rsx! {
        document::Style { "{MAIN_CSS_INLINE}" }
        document::Script { src: PLOTLY_JS }

        div {
            key: "{lang_code()}",
            Dashboard {}
        }
    }
}
