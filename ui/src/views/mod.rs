//! Named views, their renderers and the dashboard page that shows them.

pub mod dashboard;
pub mod defaults;
pub mod registry;

pub use dashboard::Dashboard;
pub use registry::{ViewDefinition, ViewOutput, ViewRegistry, HOME_VIEW};
