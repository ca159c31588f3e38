//! Shared UI crate for Tunelog: data cache, renderers, view registry and the
//! Dioxus components the web and desktop shells mount.

pub mod bridge;
pub mod core;
pub mod export;
pub mod i18n;
pub mod render;
pub mod views;
pub mod workflow;

pub mod components {
    // Brand header, tabs slot and language switcher (components/app_navbar.rs)
    pub mod app_navbar;
    pub use app_navbar::AppNavbar;

    pub mod block;
    pub use block::{BlockView, ChartFrame, SortableTable};

    pub mod export_bar;
    pub use export_bar::ExportBar;

    pub mod upload;
    pub use upload::UploadPanel;
}

pub use views::Dashboard;
