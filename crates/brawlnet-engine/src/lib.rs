pub use self::{core::*, engine::*};

pub mod core;
pub mod engine;

#[derive(Debug, derive_more::Display, derive_more::Error)]
pub enum LayoutError {
    #[display("arena must be at least 3x3 tiles, got {cols}x{rows}")]
    TooSmall { cols: usize, rows: usize },
    #[display("no free tile left to place a spawn point")]
    NoFreeTile,
}
