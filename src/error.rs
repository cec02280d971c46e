use thiserror::Error;
use wasm_bindgen::JsValue;

/// Precondition failures of the simulation. Gameplay itself never errors.
#[derive(Debug, Error, Clone, PartialEq)]
pub enum EngineError {
    #[error("surface {width}x{height} cannot hold a {cell_size}px cell")]
    InvalidGrid { width: f64, height: f64, cell_size: u32 },
    #[error("no valid grid has been reported for this surface")]
    NoGrid,
}

/// DOM wiring failures while mounting a surface.
#[derive(Debug, Error)]
pub enum SurfaceError {
    #[error("no window")]
    NoWindow,
    #[error("no document")]
    NoDocument,
    #[error("element #{0} not found")]
    MissingElement(String),
    #[error("element #{0} is not a canvas")]
    NotACanvas(String),
    #[error("canvas has no 2d context")]
    NoContext,
    #[error(transparent)]
    Engine(#[from] EngineError),
    #[error("invalid config: {0}")]
    Config(String),
    #[error("surface has been disposed")]
    Disposed,
}

impl From<SurfaceError> for JsValue {
    fn from(err: SurfaceError) -> Self {
        JsValue::from_str(&err.to_string())
    }
}

impl From<EngineError> for JsValue {
    fn from(err: EngineError) -> Self {
        JsValue::from_str(&err.to_string())
    }
}
