use crate::{CellLocation, CellType, ReusableCell};

/// Failures while binding pooled cells to visible locations.
#[derive(Clone, Copy, Debug, PartialEq, Eq, thiserror::Error)]
pub enum LayoutError {
    /// More cells of `cell_type` are visible than the pool provides.
    #[error("reusable cell pool exhausted for type {cell_type} ({available} available)")]
    PoolExhausted {
        cell_type: CellType,
        available: usize,
        location: CellLocation,
    },

    /// The preface and the main table claimed the same pooled cell.
    #[error(
        "reusable cell {cell:?} claimed by both the main table at {main:?} and the preface at {preface:?}"
    )]
    SharedReusableCell {
        cell: ReusableCell,
        main: CellLocation,
        preface: CellLocation,
    },
}
