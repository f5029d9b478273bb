mod app;
mod breaks;
mod settings;

pub use app::TomatoFarmApp;
pub use breaks::{BreakKind, TOMATO_ROUND_SIZE};
pub use settings::TomatoFarmSettings;
