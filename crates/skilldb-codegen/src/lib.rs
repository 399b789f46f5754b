pub mod config;
pub mod error;
pub mod logging;
pub mod pipeline;
pub mod render;
pub mod sink;

pub use config::{GeneratorConfig, OutputPaths, RenderOptions, load_config};
pub use error::CodegenError;
pub use pipeline::{RunSummary, generate, run};
pub use render::{GeneratedSources, render};
