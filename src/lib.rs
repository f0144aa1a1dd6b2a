//! A headless layout engine for tables with a frozen preface row.
//!
//! A [`PrefacedTableView`] overlays a copy of one row of a scrollable table on the table's top
//! edge once that row has scrolled out of view (think of a column-title row that stays readable
//! while browsing values). It keeps both views aligned horizontally, toggles the main table's
//! top margin, positions scroll indicators from a *virtual* offset, and binds pooled cells to
//! visible locations without letting the two views share a cell.
//!
//! Metrics flow through [`TableViewDataSource`]. The main data source usually memoizes row
//! heights and column widths ([`MemoizedDataSource`]); the preface reads them through an
//! [`IntermediaryDataSource`] that holds the main source's [`MemoizationLock`] so those reads
//! never write into the main cache.
//!
//! The crate is UI-agnostic. A UI layer is expected to provide:
//! - the compositor frame
//! - scroll offsets and selection changes of the main table
//! - table geometry (counts, sizes, separators, cell types)
#![cfg_attr(not(feature = "std"), no_std)]
#![forbid(unsafe_code)]

extern crate alloc;

#[cfg(test)]
extern crate std;

#[macro_use]
mod macros;

mod data_source;
mod error;
mod fenwick;
mod intermediary;
mod memo;
mod options;
mod prefaced_table_view;
mod row_preface;
mod scrollbar;
mod state;
mod table_view;
mod types;


pub use data_source::{MemoizedDataSource, TableGeometry, TableViewDataSource};
pub use error::LayoutError;
pub use intermediary::{IndexMapping, IntermediaryDataSource, ReusableCellStrategy};
pub use memo::{MemoizationGuard, MemoizationLock};
pub use options::PrefacedTableOptions;
pub use prefaced_table_view::{PrefacedTableView, PrefacedTableViewDelegate, Subview};
pub use row_preface::{RowPrefaceDataSource, RowPrefaceMapping};
pub use scrollbar::{Orientation, SCROLLBAR_THICKNESS, ScrollIndicator, ScrollbarDecorator};
pub use state::{PrefaceVisibility, PrefacedLayout, ViewState};
pub use table_view::{
    SelectableTableView, SelectableTableViewDelegate, SelectionChange, TableView,
};
pub use types::{
    CellLocation, CellOverlap, CellType, Coord, Margins, PlacedCell, Point, Rect, ReusableCell,
    Size,
};
