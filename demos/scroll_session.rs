// Example: observe the main table, share a uniform pool, and watch the preface toggle.
use std::cell::Cell;
use std::rc::Rc;

use prefaced_table::{
    Coord, LayoutError, MemoizedDataSource, Point, PrefacedTableOptions, PrefacedTableView, Rect,
    ReusableCellStrategy, SelectableTableView, SelectableTableViewDelegate, SelectionChange,
    TableGeometry, TableView,
};

struct Uniform;

impl TableGeometry for Uniform {
    fn number_of_rows(&self) -> usize {
        10
    }

    fn number_of_columns(&self) -> usize {
        3
    }

    fn non_memoized_row_height(&self, _row: usize) -> Coord {
        20
    }

    fn non_memoized_column_width(&self, _column: usize) -> Coord {
        60
    }

    fn reusable_cell_count(&self, _cell_type: u32) -> usize {
        24
    }
}

struct Notifications(Rc<Cell<usize>>);

impl SelectableTableViewDelegate for Notifications {
    fn table_view_did_change_selection_and_did_scroll(
        &mut self,
        table_view: &dyn SelectableTableView,
        change: &SelectionChange,
    ) {
        self.0.set(self.0.get() + 1);
        println!(
            "  notified: row {:?} -> {:?}, offset {:?} -> {:?}",
            change.previous_selected_row,
            table_view.selected_row(),
            change.previous_offset,
            table_view.content_offset()
        );
    }
}

fn run(strategy: ReusableCellStrategy) -> Result<(), LayoutError> {
    let ds = MemoizedDataSource::new(Uniform);
    let mut main = TableView::new();
    let count = Rc::new(Cell::new(0));
    let options = PrefacedTableOptions::new(3).with_cell_strategy(strategy);
    let mut view = PrefacedTableView::new(options, &mut main, &ds)
        .with_delegate(Notifications(Rc::clone(&count)));
    view.set_frame(Rect::new(0, 0, 320, 140), false);

    view.select_cell(0, 5);
    view.apply_scroll_offset(Point::new(0, 70));
    println!("  visibility={:?}", view.row_preface_visibility());

    let mut main_cells = Vec::new();
    let mut preface_cells = Vec::new();
    let result = view.collect_visible_cells(&mut main_cells, &mut preface_cells);

    view.deselect();
    println!(
        "  after deselect: {:?}, {} notifications",
        view.row_preface_visibility(),
        count.get()
    );
    result?;
    println!(
        "  main cells={} preface pool indexes={:?}",
        main_cells.len(),
        preface_cells.iter().map(|p| p.cell.index).collect::<Vec<_>>()
    );
    Ok(())
}

fn main() {
    for strategy in [ReusableCellStrategy::Shared, ReusableCellStrategy::FromEnd] {
        println!("strategy={strategy:?}");
        if let Err(err) = run(strategy) {
            println!("  layout error: {err}");
        }
    }
}
