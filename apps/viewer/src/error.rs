use abmviz_core::ConfigError;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum ViewerError {
    #[error(transparent)]
    Config(#[from] ConfigError),

    #[error("Window error: {0}")]
    Window(String),
}
