use alloc::collections::BTreeMap;
use alloc::vec::Vec;

use crate::data_source::TableViewDataSource;
use crate::{CellLocation, CellOverlap, Coord, LayoutError, Margins, PlacedCell, Point, Rect, Size};

/// What changed around a selection/scroll notification.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct SelectionChange {
    pub previous_selected_column: Option<usize>,
    pub previous_selected_row: Option<usize>,
    pub previous_offset: Point,
    pub within_temporary_selection: bool,
}

/// Observer notified after a table's selection and/or scroll offset changed.
///
/// It only gets shared access to the table: reacting by changing the selection is not possible
/// from inside the notification.
pub trait SelectableTableViewDelegate {
    fn table_view_did_change_selection_and_did_scroll(
        &mut self,
        table_view: &dyn SelectableTableView,
        change: &SelectionChange,
    );
}

/// The table state a compositor drives: frame, offset, margins, selection, scrollbars.
///
/// Metrics are never stored in the view; methods that need them take the data source.
pub trait SelectableTableView {
    fn frame(&self) -> Rect;
    fn set_frame(&mut self, frame: Rect, force: bool);

    fn content_offset(&self) -> Point;
    fn set_content_offset(&mut self, offset: Point);

    fn margins(&self) -> Margins;
    fn set_margins(&mut self, margins: Margins);

    fn set_top_margin(&mut self, top: Coord) {
        let mut margins = self.margins();
        margins.top = top;
        self.set_margins(margins);
    }

    fn set_left_margin(&mut self, left: Coord) {
        let mut margins = self.margins();
        margins.left = left;
        self.set_margins(margins);
    }

    fn cell_overlap(&self) -> CellOverlap;
    fn set_cell_overlap(&mut self, overlap: CellOverlap);

    fn selected_column(&self) -> Option<usize>;
    fn selected_row(&self) -> Option<usize>;
    fn select_cell(&mut self, column: usize, row: usize);
    fn deselect(&mut self);

    fn scrollbars_visible(&self) -> bool;
    fn hide_scrollbars(&mut self);

    /// Size needed to display every cell plus margins.
    fn minimal_size_for_optimal_display<S: TableViewDataSource + ?Sized>(&self, ds: &S) -> Size
    where
        Self: Sized,
    {
        let margins = self.margins();
        let width = ds.cumulated_width_before_column(ds.number_of_columns());
        let height = ds.cumulated_height_before_row(ds.number_of_rows());
        Size::new(
            width.saturating_add(margins.horizontal()),
            height.saturating_add(margins.vertical()),
        )
    }

    /// Frame of a cell in content coordinates (margins included, offset not applied).
    fn cell_frame<S: TableViewDataSource + ?Sized>(&self, ds: &S, column: usize, row: usize) -> Rect
    where
        Self: Sized,
    {
        let margins = self.margins();
        let overlap = self.cell_overlap();
        let x = margins
            .left
            .saturating_add(ds.cumulated_width_before_column(column))
            .saturating_add(ds.separator_before_column(column));
        let y = margins
            .top
            .saturating_add(ds.cumulated_height_before_row(row))
            .saturating_add(ds.separator_before_row(row));
        Rect::new(
            x,
            y,
            ds.column_width(column).saturating_add(overlap.horizontal),
            ds.row_height(row).saturating_add(overlap.vertical),
        )
    }

    /// Adjusts the content offset by the smallest amount that makes the cell fully visible.
    ///
    /// Scrolling up (left) to the first row (column) goes all the way to 0 so the margin shows.
    fn scroll_to_cell<S: TableViewDataSource + ?Sized>(&mut self, ds: &S, column: usize, row: usize)
    where
        Self: Sized,
    {
        let columns = ds.number_of_columns();
        let rows = ds.number_of_rows();
        if column >= columns || row >= rows {
            pwarn!(column, row, columns, rows, "scroll_to_cell: cell out of range");
            debug_assert!(
                column < columns && row < rows,
                "scroll_to_cell: cell out of range (column={column}, row={row})"
            );
            return;
        }

        let cell = self.cell_frame(ds, column, row);
        let frame = self.frame();
        let mut offset = self.content_offset();

        // The first row (column) reveals the leading margin too.
        let left = if column == 0 { 0 } else { cell.x };
        let top = if row == 0 { 0 } else { cell.y };
        if left < offset.x {
            offset.x = left;
        } else if cell.right() > offset.x.saturating_add(frame.width) {
            offset.x = cell.right().saturating_sub(frame.width);
        }
        if top < offset.y {
            offset.y = top;
        } else if cell.bottom() > offset.y.saturating_add(frame.height) {
            offset.y = cell.bottom().saturating_sub(frame.height);
        }

        let content = self.minimal_size_for_optimal_display(ds);
        let max_x = content.width.saturating_sub(frame.width).max(0);
        let max_y = content.height.saturating_sub(frame.height).max(0);
        offset.x = offset.x.clamp(0, max_x);
        offset.y = offset.y.clamp(0, max_y);

        ptrace!(column, row, x = offset.x, y = offset.y, "scroll_to_cell");
        self.set_content_offset(offset);
    }

    /// Binds pooled cells to every visible location, row-major.
    ///
    /// The k-th visible cell of a given type gets the k-th reusable cell of that type. `out` is
    /// cleared first. Frames are in view coordinates.
    fn visible_cells<S: TableViewDataSource + ?Sized>(
        &self,
        ds: &S,
        out: &mut Vec<PlacedCell>,
    ) -> Result<(), LayoutError>
    where
        Self: Sized,
    {
        out.clear();
        let frame = self.frame();
        let rows = ds.number_of_rows();
        let columns = ds.number_of_columns();
        if frame.is_empty() || rows == 0 || columns == 0 {
            return Ok(());
        }

        let margins = self.margins();
        let offset = self.content_offset();
        let viewport = Rect::new(0, 0, frame.width, frame.height);

        let top = offset.y.saturating_sub(margins.top);
        let left = offset.x.saturating_sub(margins.left);
        let first_row = ds.row_after_cumulated_height(top.max(0)).min(rows - 1);
        let last_row = ds
            .row_after_cumulated_height(top.saturating_add(frame.height - 1).max(0))
            .min(rows - 1);
        let first_column = ds.column_after_cumulated_width(left.max(0)).min(columns - 1);
        let last_column = ds
            .column_after_cumulated_width(left.saturating_add(frame.width - 1).max(0))
            .min(columns - 1);

        let mut claimed = BTreeMap::new();
        for row in first_row..=last_row {
            for column in first_column..=last_column {
                let content = self.cell_frame(ds, column, row);
                let placed = Rect::new(
                    content.x.saturating_sub(offset.x),
                    content.y.saturating_sub(offset.y),
                    content.width,
                    content.height,
                );
                if !placed.intersects(&viewport) {
                    continue;
                }

                let location = CellLocation::new(column, row);
                let cell_type = ds.type_at_location(column, row);
                let next = claimed.entry(cell_type).or_insert(0usize);
                let Some(cell) = ds.reusable_cell(*next, cell_type) else {
                    let available = ds.reusable_cell_count(cell_type);
                    pwarn!(cell_type, available, "visible_cells: reusable cell pool exhausted");
                    return Err(LayoutError::PoolExhausted {
                        cell_type,
                        available,
                        location,
                    });
                };
                *next += 1;
                out.push(PlacedCell {
                    location,
                    cell,
                    frame: placed,
                });
            }
        }
        Ok(())
    }
}

/// Headless state of a scrollable, selectable grid.
#[derive(Clone, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct TableView {
    frame: Rect,
    content_offset: Point,
    margins: Margins,
    cell_overlap: CellOverlap,
    selection: Option<CellLocation>,
    scrollbars_visible: bool,
}

impl Default for TableView {
    fn default() -> Self {
        Self {
            frame: Rect::ZERO,
            content_offset: Point::ZERO,
            margins: Margins::ZERO,
            cell_overlap: CellOverlap::default(),
            selection: None,
            scrollbars_visible: true,
        }
    }
}

impl TableView {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_margins(mut self, margins: Margins) -> Self {
        self.margins = margins;
        self
    }

    pub fn with_frame(mut self, frame: Rect) -> Self {
        self.frame = frame;
        self
    }

    pub fn with_selection(mut self, column: usize, row: usize) -> Self {
        self.selection = Some(CellLocation::new(column, row));
        self
    }

    pub fn selection(&self) -> Option<CellLocation> {
        self.selection
    }
}

impl SelectableTableView for TableView {
    fn frame(&self) -> Rect {
        self.frame
    }

    fn set_frame(&mut self, frame: Rect, _force: bool) {
        self.frame = frame;
    }

    fn content_offset(&self) -> Point {
        self.content_offset
    }

    fn set_content_offset(&mut self, offset: Point) {
        self.content_offset = offset;
    }

    fn margins(&self) -> Margins {
        self.margins
    }

    fn set_margins(&mut self, margins: Margins) {
        self.margins = margins;
    }

    fn cell_overlap(&self) -> CellOverlap {
        self.cell_overlap
    }

    fn set_cell_overlap(&mut self, overlap: CellOverlap) {
        self.cell_overlap = overlap;
    }

    fn selected_column(&self) -> Option<usize> {
        self.selection.map(|s| s.column)
    }

    fn selected_row(&self) -> Option<usize> {
        self.selection.map(|s| s.row)
    }

    fn select_cell(&mut self, column: usize, row: usize) {
        self.selection = Some(CellLocation::new(column, row));
    }

    fn deselect(&mut self) {
        self.selection = None;
    }

    fn scrollbars_visible(&self) -> bool {
        self.scrollbars_visible
    }

    fn hide_scrollbars(&mut self) {
        self.scrollbars_visible = false;
    }
}
