use crate::memo::{MemoizationGuard, MemoizationLock, MemoizedAxis};
use crate::{CellType, Coord, ReusableCell};

/// Metrics and cells a table view lays itself out from.
///
/// Heights and widths exclude separators; cumulated sizes include the separators of every row
/// (column) before the requested one, but not the separator of the requested one.
///
/// Implementations may cache metrics internally (behind `&self`). Reads performed while
/// [`Self::lock_memoization`] is held must not write to that cache.
pub trait TableViewDataSource {
    fn number_of_rows(&self) -> usize;
    fn number_of_columns(&self) -> usize;

    fn column_width(&self, column: usize) -> Coord;
    fn row_height(&self, row: usize) -> Coord;

    fn separator_before_column(&self, _column: usize) -> Coord {
        0
    }

    fn separator_before_row(&self, _row: usize) -> Coord {
        0
    }

    fn cumulated_width_before_column(&self, column: usize) -> Coord;
    fn cumulated_height_before_row(&self, row: usize) -> Coord;

    /// Column covering `offset_x` (content coordinates, margins excluded).
    fn column_after_cumulated_width(&self, offset_x: Coord) -> usize;
    /// Row covering `offset_y` (content coordinates, margins excluded).
    fn row_after_cumulated_height(&self, offset_y: Coord) -> usize;

    fn type_at_location(&self, _column: usize, _row: usize) -> CellType {
        0
    }

    /// Number of pooled cells available for `cell_type`.
    fn reusable_cell_count(&self, cell_type: CellType) -> usize;

    /// Returns the `index`-th pooled cell of `cell_type`, if the pool is large enough.
    fn reusable_cell(&self, index: usize, cell_type: CellType) -> Option<ReusableCell> {
        (index < self.reusable_cell_count(cell_type)).then_some(ReusableCell { cell_type, index })
    }

    /// Makes the metric cache read-only until the guard is dropped.
    fn lock_memoization(&self) -> MemoizationGuard<'_>;
}

/// Non-memoized geometry of a table, as provided by a screen.
///
/// Wrap it in a [`MemoizedDataSource`] to obtain a [`TableViewDataSource`].
pub trait TableGeometry {
    fn number_of_rows(&self) -> usize;
    fn number_of_columns(&self) -> usize;

    fn non_memoized_row_height(&self, row: usize) -> Coord;
    fn non_memoized_column_width(&self, column: usize) -> Coord;

    fn separator_before_row(&self, _row: usize) -> Coord {
        0
    }

    fn separator_before_column(&self, _column: usize) -> Coord {
        0
    }

    fn type_at_location(&self, _column: usize, _row: usize) -> CellType {
        0
    }

    fn reusable_cell_count(&self, cell_type: CellType) -> usize;
}

/// A [`TableViewDataSource`] memoizing the row heights and column widths of a
/// [`TableGeometry`].
#[derive(Debug)]
pub struct MemoizedDataSource<G> {
    geometry: G,
    rows: MemoizedAxis,
    columns: MemoizedAxis,
    lock: MemoizationLock,
}

impl<G: TableGeometry> MemoizedDataSource<G> {
    pub fn new(geometry: G) -> Self {
        pdebug!(
            rows = geometry.number_of_rows(),
            columns = geometry.number_of_columns(),
            "MemoizedDataSource::new"
        );
        Self {
            geometry,
            rows: MemoizedAxis::new(),
            columns: MemoizedAxis::new(),
            lock: MemoizationLock::new(),
        }
    }

    pub fn geometry(&self) -> &G {
        &self.geometry
    }

    /// Gives mutable access to the geometry and drops every memoized metric.
    pub fn geometry_mut(&mut self) -> &mut G {
        self.reset_memoization();
        &mut self.geometry
    }

    pub fn into_geometry(self) -> G {
        self.geometry
    }

    pub fn reset_memoization(&self) {
        ptrace!("reset_memoization");
        self.rows.reset(self.geometry.number_of_rows());
        self.columns.reset(self.geometry.number_of_columns());
    }

    /// Forgets the memoized height of `row`, e.g. after its content changed.
    pub fn update_memoization_for_row(&self, row: usize) {
        self.rows.invalidate(row);
    }

    pub fn update_memoization_for_column(&self, column: usize) {
        self.columns.invalidate(column);
    }

    pub fn is_row_memoized(&self, row: usize) -> bool {
        self.rows.is_memoized(row)
    }

    pub fn is_column_memoized(&self, column: usize) -> bool {
        self.columns.is_memoized(column)
    }

    pub fn memoized_row_count(&self) -> usize {
        self.rows.memoized_len()
    }

    pub fn memoized_column_count(&self) -> usize {
        self.columns.memoized_len()
    }

    pub fn is_memoization_locked(&self) -> bool {
        self.lock.is_locked()
    }

    fn row_slot(&self, row: usize) -> Coord {
        self.geometry
            .non_memoized_row_height(row)
            .saturating_add(self.geometry.separator_before_row(row))
    }

    fn column_slot(&self, column: usize) -> Coord {
        self.geometry
            .non_memoized_column_width(column)
            .saturating_add(self.geometry.separator_before_column(column))
    }
}

impl<G: TableGeometry> TableViewDataSource for MemoizedDataSource<G> {
    fn number_of_rows(&self) -> usize {
        self.geometry.number_of_rows()
    }

    fn number_of_columns(&self) -> usize {
        self.geometry.number_of_columns()
    }

    fn column_width(&self, column: usize) -> Coord {
        let columns = self.number_of_columns();
        if column >= columns {
            pwarn!(column, columns, "column_width: column out of range");
            return 0;
        }
        let slot = self.columns.slot(
            columns,
            column,
            self.lock.is_locked(),
            |c| self.column_slot(c),
        );
        slot.saturating_sub(self.geometry.separator_before_column(column))
    }

    fn row_height(&self, row: usize) -> Coord {
        let rows = self.number_of_rows();
        if row >= rows {
            pwarn!(row, rows, "row_height: row out of range");
            return 0;
        }
        let slot = self.rows.slot(
            rows,
            row,
            self.lock.is_locked(),
            |r| self.row_slot(r),
        );
        slot.saturating_sub(self.geometry.separator_before_row(row))
    }

    fn separator_before_column(&self, column: usize) -> Coord {
        self.geometry.separator_before_column(column)
    }

    fn separator_before_row(&self, row: usize) -> Coord {
        self.geometry.separator_before_row(row)
    }

    fn cumulated_width_before_column(&self, column: usize) -> Coord {
        self.columns.cumulated_before(
            self.number_of_columns(),
            column,
            self.lock.is_locked(),
            |c| self.column_slot(c),
        )
    }

    fn cumulated_height_before_row(&self, row: usize) -> Coord {
        self.rows.cumulated_before(
            self.number_of_rows(),
            row,
            self.lock.is_locked(),
            |r| self.row_slot(r),
        )
    }

    fn column_after_cumulated_width(&self, offset_x: Coord) -> usize {
        self.columns.index_after_cumulated(
            self.number_of_columns(),
            offset_x,
            self.lock.is_locked(),
            |c| self.column_slot(c),
        )
    }

    fn row_after_cumulated_height(&self, offset_y: Coord) -> usize {
        self.rows.index_after_cumulated(
            self.number_of_rows(),
            offset_y,
            self.lock.is_locked(),
            |r| self.row_slot(r),
        )
    }

    fn type_at_location(&self, column: usize, row: usize) -> CellType {
        self.geometry.type_at_location(column, row)
    }

    fn reusable_cell_count(&self, cell_type: CellType) -> usize {
        self.geometry.reusable_cell_count(cell_type)
    }

    fn lock_memoization(&self) -> MemoizationGuard<'_> {
        self.lock.acquire()
    }
}
