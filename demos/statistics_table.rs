// Example: a statistics table whose column-title row stays pinned while browsing values.
use prefaced_table::{
    CellType, Coord, Margins, MemoizedDataSource, Point, PrefacedTableOptions, PrefacedTableView,
    Rect, SelectableTableView, TableGeometry, TableView,
};

const TITLE: CellType = 0;
const VALUE: CellType = 1;

struct Statistics {
    rows: usize,
    columns: usize,
}

impl TableGeometry for Statistics {
    fn number_of_rows(&self) -> usize {
        self.rows
    }

    fn number_of_columns(&self) -> usize {
        self.columns
    }

    fn non_memoized_row_height(&self, row: usize) -> Coord {
        // Titles wrap on two lines.
        if row == 0 { 36 } else { 20 }
    }

    fn non_memoized_column_width(&self, column: usize) -> Coord {
        if column == 0 { 90 } else { 70 }
    }

    fn separator_before_row(&self, row: usize) -> Coord {
        if row == 1 { 2 } else { 0 }
    }

    fn type_at_location(&self, _column: usize, row: usize) -> CellType {
        if row == 0 { TITLE } else { VALUE }
    }

    fn reusable_cell_count(&self, cell_type: CellType) -> usize {
        if cell_type == TITLE { 8 } else { 64 }
    }
}

fn main() {
    let ds = MemoizedDataSource::new(Statistics {
        rows: 40,
        columns: 5,
    });
    let mut main = TableView::new();
    let options = PrefacedTableOptions::new(0).with_margins(Margins::new(8, 4, 8, 4));
    let mut view = PrefacedTableView::new(options, &mut main, &ds)
        .with_prefaced_delegate(|| 60);
    view.set_frame(Rect::new(0, 0, 320, 240), false);

    view.select_cell(1, 3);
    println!(
        "preface threshold={}",
        view.row_preface_data_source()
            .cumulated_height_before_preface_row()
    );
    println!("after select: {:?}", view.row_preface_visibility());

    for y in [20, 200, 420] {
        view.apply_scroll_offset(Point::new(40, y));
        let layout = view.layout();
        println!(
            "offset={y} visibility={:?} main_frame={:?} preface_frame={:?}",
            layout.visibility, layout.main.frame, layout.row_preface.frame
        );
        println!(
            "  virtual_offset={:?} vertical_thumb={:?}",
            view.virtual_offset(),
            layout.vertical_bar.thumb()
        );
    }

    let mut main_cells = Vec::new();
    let mut preface_cells = Vec::new();
    match view.collect_visible_cells(&mut main_cells, &mut preface_cells) {
        Ok(()) => println!(
            "cells: main={} preface={} first_title={:?}",
            main_cells.len(),
            preface_cells.len(),
            preface_cells.first()
        ),
        Err(err) => println!("cells: {err}"),
    }

    view.deselect();
    println!(
        "after deselect: {:?} offset={:?}",
        view.row_preface_visibility(),
        view.main_table_view().content_offset()
    );
}
