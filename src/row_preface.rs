use crate::data_source::TableViewDataSource;
use crate::intermediary::{IndexMapping, IntermediaryDataSource, ReusableCellStrategy};
use crate::memo::MemoizationGuard;
use crate::{CellType, Coord, ReusableCell};

/// Maps every row of the preface onto the mirrored main row; columns map one to one.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct RowPrefaceMapping {
    pub preface_row: usize,
}

impl IndexMapping for RowPrefaceMapping {
    fn row_in_main(&self, _row: usize) -> usize {
        self.preface_row
    }

    fn column_in_main(&self, column: usize) -> usize {
        column
    }
}

/// A one-row table mirroring row `preface_row` of the main data source.
///
/// Row metrics are answered from the mirrored row's height alone: the preface's cumulated
/// height is `0` before its single row and that row's height after it.
pub struct RowPrefaceDataSource<'a, D: ?Sized> {
    source: IntermediaryDataSource<'a, D, RowPrefaceMapping>,
}

impl<'a, D: TableViewDataSource + ?Sized> RowPrefaceDataSource<'a, D> {
    pub fn new(preface_row: usize, main: &'a D) -> Self {
        let rows = main.number_of_rows();
        if preface_row >= rows {
            pwarn!(preface_row, rows, "RowPrefaceDataSource: preface row out of range");
        }
        debug_assert!(
            preface_row < rows,
            "preface row out of range (preface_row={preface_row}, rows={rows})"
        );
        // Release builds mirror the last row instead.
        let preface_row = preface_row.min(rows.saturating_sub(1));
        Self {
            source: IntermediaryDataSource::new(main, RowPrefaceMapping { preface_row }),
        }
    }

    pub fn with_cell_strategy(mut self, cells: ReusableCellStrategy) -> Self {
        self.source = self.source.with_cell_strategy(cells);
        self
    }

    pub fn preface_row(&self) -> usize {
        self.source.mapping().preface_row
    }

    pub fn intermediary(&self) -> &IntermediaryDataSource<'a, D, RowPrefaceMapping> {
        &self.source
    }

    /// Offset at which the mirrored row's content starts in the main table.
    ///
    /// Once the main table has scrolled past this threshold, the preface is allowed to show.
    pub fn cumulated_height_before_preface_row(&self) -> Coord {
        let row = self.preface_row();
        self.source.locked(|main| {
            main.cumulated_height_before_row(row)
                .saturating_add(main.separator_before_row(row))
        })
    }

    fn mirrored_row_height(&self) -> Coord {
        self.source.non_memoized_row_height(0)
    }

    pub fn non_memoized_cumulated_height_before_row(&self, row: usize) -> Coord {
        debug_assert!(row == 0 || row == 1, "row preface has a single row (row={row})");
        if row == 0 {
            return 0;
        }
        self.mirrored_row_height()
    }

    pub fn non_memoized_row_after_cumulated_height(&self, offset_y: Coord) -> usize {
        if offset_y < self.mirrored_row_height() {
            0
        } else {
            1
        }
    }
}

impl<D: TableViewDataSource + ?Sized> TableViewDataSource for RowPrefaceDataSource<'_, D> {
    fn number_of_rows(&self) -> usize {
        1
    }

    fn number_of_columns(&self) -> usize {
        self.source.main().number_of_columns()
    }

    fn column_width(&self, column: usize) -> Coord {
        self.source.non_memoized_column_width(column)
    }

    fn row_height(&self, row: usize) -> Coord {
        debug_assert!(row == 0, "row preface has a single row (row={row})");
        self.mirrored_row_height()
    }

    fn separator_before_column(&self, column: usize) -> Coord {
        self.source.separator_before_column(column)
    }

    fn cumulated_width_before_column(&self, column: usize) -> Coord {
        self.source.non_memoized_cumulated_width_before_column(column)
    }

    fn cumulated_height_before_row(&self, row: usize) -> Coord {
        self.non_memoized_cumulated_height_before_row(row)
    }

    fn column_after_cumulated_width(&self, offset_x: Coord) -> usize {
        self.source.non_memoized_column_after_cumulated_width(offset_x)
    }

    fn row_after_cumulated_height(&self, offset_y: Coord) -> usize {
        self.non_memoized_row_after_cumulated_height(offset_y)
    }

    fn type_at_location(&self, column: usize, row: usize) -> CellType {
        self.source.type_at_location(column, row)
    }

    fn reusable_cell_count(&self, cell_type: CellType) -> usize {
        self.source.reusable_cell_count(cell_type)
    }

    fn reusable_cell(&self, index: usize, cell_type: CellType) -> Option<ReusableCell> {
        self.source.reusable_cell(index, cell_type)
    }

    fn lock_memoization(&self) -> MemoizationGuard<'_> {
        self.source.lock_memoization()
    }
}
