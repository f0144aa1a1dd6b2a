use crate::data_source::TableViewDataSource;
use crate::memo::MemoizationGuard;
use crate::{CellType, Coord, ReusableCell};

/// Maps indexes of a derived table onto the main table it mirrors.
pub trait IndexMapping {
    fn row_in_main(&self, row: usize) -> usize;
    fn column_in_main(&self, column: usize) -> usize;
}

/// How a derived table obtains pooled cells from the main data source.
///
/// Pooled cells are shared objects: the derived table and the main table must never display
/// the same pooled cell at the same time. [`crate::PrefacedTableView::collect_visible_cells`]
/// checks that invariant.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum ReusableCellStrategy {
    /// Forward indexes verbatim. Only safe when the derived table uses cell types the main
    /// table no longer displays (a title row scrolled out of view, for instance).
    #[default]
    Shared,
    /// Serve the derived table from the end of the main pool: derived index `i` maps to main
    /// index `count - 1 - i`.
    FromEnd,
}

/// Read-only proxy exposing the main data source's metrics for a derived table.
///
/// Every metric query holds the main data source's memoization lock, so reading through the
/// proxy never writes into the main cache. Cell requests are forwarded without locking.
pub struct IntermediaryDataSource<'a, D: ?Sized, M> {
    main: &'a D,
    mapping: M,
    cells: ReusableCellStrategy,
}

impl<'a, D: TableViewDataSource + ?Sized, M: IndexMapping> IntermediaryDataSource<'a, D, M> {
    pub fn new(main: &'a D, mapping: M) -> Self {
        Self {
            main,
            mapping,
            cells: ReusableCellStrategy::default(),
        }
    }

    pub fn with_cell_strategy(mut self, cells: ReusableCellStrategy) -> Self {
        self.cells = cells;
        self
    }

    pub fn main(&self) -> &'a D {
        self.main
    }

    pub fn mapping(&self) -> &M {
        &self.mapping
    }

    pub fn cell_strategy(&self) -> ReusableCellStrategy {
        self.cells
    }

    /// Runs `f` against the main data source with its memoization locked.
    pub fn locked<R>(&self, f: impl FnOnce(&'a D) -> R) -> R {
        let _guard = self.main.lock_memoization();
        f(self.main)
    }

    pub fn non_memoized_column_width(&self, column: usize) -> Coord {
        let column = self.mapping.column_in_main(column);
        self.locked(|main| main.column_width(column))
    }

    pub fn non_memoized_row_height(&self, row: usize) -> Coord {
        let row = self.mapping.row_in_main(row);
        self.locked(|main| main.row_height(row))
    }

    pub fn non_memoized_cumulated_width_before_column(&self, column: usize) -> Coord {
        let column = self.mapping.column_in_main(column);
        self.locked(|main| main.cumulated_width_before_column(column))
    }

    pub fn non_memoized_cumulated_height_before_row(&self, row: usize) -> Coord {
        let row = self.mapping.row_in_main(row);
        self.locked(|main| main.cumulated_height_before_row(row))
    }

    pub fn non_memoized_column_after_cumulated_width(&self, offset_x: Coord) -> usize {
        self.locked(|main| main.column_after_cumulated_width(offset_x))
    }

    pub fn non_memoized_row_after_cumulated_height(&self, offset_y: Coord) -> usize {
        self.locked(|main| main.row_after_cumulated_height(offset_y))
    }

    pub fn separator_before_column(&self, column: usize) -> Coord {
        self.main
            .separator_before_column(self.mapping.column_in_main(column))
    }

    pub fn type_at_location(&self, column: usize, row: usize) -> CellType {
        self.main.type_at_location(
            self.mapping.column_in_main(column),
            self.mapping.row_in_main(row),
        )
    }

    pub fn reusable_cell_count(&self, cell_type: CellType) -> usize {
        self.main.reusable_cell_count(cell_type)
    }

    pub fn reusable_cell(&self, index: usize, cell_type: CellType) -> Option<ReusableCell> {
        let index = match self.cells {
            ReusableCellStrategy::Shared => index,
            ReusableCellStrategy::FromEnd => self
                .main
                .reusable_cell_count(cell_type)
                .checked_sub(index + 1)?,
        };
        self.main.reusable_cell(index, cell_type)
    }

    pub fn lock_memoization(&self) -> MemoizationGuard<'a> {
        self.main.lock_memoization()
    }
}
