use crate::intermediary::ReusableCellStrategy;
use crate::{CellOverlap, Coord, Margins};

/// Configuration for [`crate::PrefacedTableView`].
#[derive(Clone, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct PrefacedTableOptions {
    /// Row of the main table mirrored by the preface.
    pub preface_row: usize,
    /// Margins applied through [`crate::PrefacedTableView::set_margins`] on construction.
    ///
    /// `None` keeps the main table's current margins.
    pub margins: Option<Margins>,
    /// Cell overlap applied to both views on construction (`None` keeps the main table's).
    pub cell_overlap: Option<CellOverlap>,
    /// How the preface obtains pooled cells from the main data source.
    pub cell_strategy: ReusableCellStrategy,
    /// Thickness of the scroll indicators.
    pub scrollbar_thickness: Coord,
}

impl PrefacedTableOptions {
    pub fn new(preface_row: usize) -> Self {
        Self {
            preface_row,
            margins: None,
            cell_overlap: None,
            cell_strategy: ReusableCellStrategy::default(),
            scrollbar_thickness: crate::scrollbar::SCROLLBAR_THICKNESS,
        }
    }

    pub fn with_margins(mut self, margins: Margins) -> Self {
        self.margins = Some(margins);
        self
    }

    pub fn with_cell_overlap(mut self, horizontal: Coord, vertical: Coord) -> Self {
        self.cell_overlap = Some(CellOverlap {
            horizontal,
            vertical,
        });
        self
    }

    pub fn with_cell_strategy(mut self, cell_strategy: ReusableCellStrategy) -> Self {
        self.cell_strategy = cell_strategy;
        self
    }

    pub fn with_scrollbar_thickness(mut self, thickness: Coord) -> Self {
        self.scrollbar_thickness = thickness;
        self
    }
}
