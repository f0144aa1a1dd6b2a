use alloc::boxed::Box;
use alloc::collections::BTreeMap;
use alloc::vec::Vec;

use crate::data_source::TableViewDataSource;
use crate::row_preface::RowPrefaceDataSource;
use crate::scrollbar::ScrollbarDecorator;
use crate::state::{PrefaceVisibility, PrefacedLayout, ViewState};
use crate::table_view::{
    SelectableTableView, SelectableTableViewDelegate, SelectionChange, TableView,
};
use crate::{CellOverlap, Coord, LayoutError, Margins, PlacedCell, Point, PrefacedTableOptions, Rect};

/// Supplies the tallest preface the screen accepts; taller prefaces stay hidden.
pub trait PrefacedTableViewDelegate {
    fn max_row_preface_height(&self) -> Coord;
}

impl<F: Fn() -> Coord> PrefacedTableViewDelegate for F {
    fn max_row_preface_height(&self) -> Coord {
        self()
    }
}

/// Sub-views of a [`PrefacedTableView`], in drawing order.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Subview {
    MainTable,
    RowPreface,
    VerticalBar,
    HorizontalBar,
}

impl Subview {
    pub const COUNT: usize = 4;

    pub fn at_index(index: usize) -> Self {
        match index {
            0 => Self::MainTable,
            1 => Self::RowPreface,
            2 => Self::VerticalBar,
            _ => {
                debug_assert!(index == 3, "subview index out of range (index={index})");
                Self::HorizontalBar
            }
        }
    }
}

/// A scrollable table with a frozen copy of one of its rows pinned to the top edge.
///
/// The preface appears once the main table has scrolled past the mirrored row and disappears
/// when it scrolls back, when nothing is selected, or when the row is taller than the delegate
/// allows. Main and preface share the horizontal offset and left/right margins; the preface
/// never scrolls vertically.
///
/// The main table view and its data source are borrowed and must outlive the compositor. All
/// preface metric reads go through the main data source with its memoization locked.
pub struct PrefacedTableView<'a, D: ?Sized, T, P = TableView> {
    row_preface_data_source: RowPrefaceDataSource<'a, D>,
    row_preface_view: P,
    main_table_view: &'a mut T,
    main_data_source: &'a D,
    bar_decorator: ScrollbarDecorator,
    frame: Rect,
    main_table_view_top_margin: Coord,
    visibility: PrefaceVisibility,
    main_delegate: Option<Box<dyn SelectableTableViewDelegate + 'a>>,
    prefaced_delegate: Option<Box<dyn PrefacedTableViewDelegate + 'a>>,
}

impl<'a, D, T> PrefacedTableView<'a, D, T, TableView>
where
    D: TableViewDataSource + ?Sized,
    T: SelectableTableView,
{
    pub fn new(
        options: PrefacedTableOptions,
        main_table_view: &'a mut T,
        main_data_source: &'a D,
    ) -> Self {
        Self::with_preface_view(options, TableView::new(), main_table_view, main_data_source)
    }
}

impl<'a, D, T, P> PrefacedTableView<'a, D, T, P>
where
    D: TableViewDataSource + ?Sized,
    T: SelectableTableView,
    P: SelectableTableView,
{
    /// Builds a compositor around a caller-provided preface view state.
    pub fn with_preface_view(
        options: PrefacedTableOptions,
        mut row_preface_view: P,
        main_table_view: &'a mut T,
        main_data_source: &'a D,
    ) -> Self {
        pdebug!(
            preface_row = options.preface_row,
            rows = main_data_source.number_of_rows(),
            "PrefacedTableView::new"
        );
        row_preface_view.hide_scrollbars();
        let main_margins = main_table_view.margins();
        let mut view = Self {
            row_preface_data_source: RowPrefaceDataSource::new(
                options.preface_row,
                main_data_source,
            )
            .with_cell_strategy(options.cell_strategy),
            row_preface_view,
            main_table_view,
            main_data_source,
            bar_decorator: ScrollbarDecorator::new(options.scrollbar_thickness),
            frame: Rect::ZERO,
            main_table_view_top_margin: main_margins.top,
            visibility: PrefaceVisibility::Hidden,
            main_delegate: None,
            prefaced_delegate: None,
        };
        view.set_margins(options.margins.unwrap_or(main_margins));
        let overlap = options
            .cell_overlap
            .unwrap_or_else(|| view.main_table_view.cell_overlap());
        view.set_cell_overlap(overlap.horizontal, overlap.vertical);
        view
    }

    /// Observer of the main table, notified before the compositor reacts.
    pub fn with_delegate(mut self, delegate: impl SelectableTableViewDelegate + 'a) -> Self {
        self.main_delegate = Some(Box::new(delegate));
        self
    }

    pub fn with_prefaced_delegate(mut self, delegate: impl PrefacedTableViewDelegate + 'a) -> Self {
        self.prefaced_delegate = Some(Box::new(delegate));
        self
    }

    pub fn set_delegate(&mut self, delegate: Option<Box<dyn SelectableTableViewDelegate + 'a>>) {
        self.main_delegate = delegate;
    }

    pub fn set_prefaced_delegate(
        &mut self,
        delegate: Option<Box<dyn PrefacedTableViewDelegate + 'a>>,
    ) {
        self.prefaced_delegate = delegate;
    }

    pub fn main_table_view(&self) -> &T {
        &*self.main_table_view
    }

    /// Mutable access to the main table. Call [`Self::layout_subviews`] afterwards.
    pub fn main_table_view_mut(&mut self) -> &mut T {
        &mut *self.main_table_view
    }

    pub fn main_data_source(&self) -> &'a D {
        self.main_data_source
    }

    pub fn row_preface_view(&self) -> &P {
        &self.row_preface_view
    }

    pub fn row_preface_data_source(&self) -> &RowPrefaceDataSource<'a, D> {
        &self.row_preface_data_source
    }

    pub fn bar_decorator(&self) -> &ScrollbarDecorator {
        &self.bar_decorator
    }

    pub fn frame(&self) -> Rect {
        self.frame
    }

    /// The compositor's own coordinate space: origin at zero, size of the frame.
    pub fn bounds(&self) -> Rect {
        Rect::new(0, 0, self.frame.width, self.frame.height)
    }

    pub fn set_frame(&mut self, frame: Rect, force: bool) {
        if !force && self.frame == frame {
            return;
        }
        self.frame = frame;
        self.layout_subviews(force);
    }

    /// Top margin restored on the main table whenever the preface hides.
    pub fn main_table_view_top_margin(&self) -> Coord {
        self.main_table_view_top_margin
    }

    pub fn set_margins(&mut self, margins: Margins) {
        self.main_table_view.set_margins(margins);
        self.main_table_view_top_margin = margins.top;
        self.row_preface_view
            .set_margins(Margins::new(0, margins.right, 0, margins.left));
    }

    pub fn set_cell_overlap(&mut self, horizontal: Coord, vertical: Coord) {
        let overlap = CellOverlap {
            horizontal,
            vertical,
        };
        self.main_table_view.set_cell_overlap(overlap);
        self.row_preface_view.set_cell_overlap(overlap);
    }

    /// Scrolls both views back to the origin, preface first.
    ///
    /// Cells are shared between the two views, so the main table's reset has to come last to
    /// keep the frames it initializes.
    pub fn reset_content_offset(&mut self) {
        self.row_preface_view.set_content_offset(Point::ZERO);
        self.main_table_view.set_content_offset(Point::ZERO);
    }

    pub fn number_of_subviews(&self) -> usize {
        Subview::COUNT
    }

    pub fn subview_at_index(&self, index: usize) -> Subview {
        Subview::at_index(index)
    }

    /// Frame of a sub-view in the compositor's coordinates.
    pub fn subview_frame(&self, subview: Subview) -> Rect {
        match subview {
            Subview::MainTable => self.main_table_view.frame(),
            Subview::RowPreface => self.row_preface_view.frame(),
            Subview::VerticalBar => self.bar_decorator.vertical_bar().track,
            Subview::HorizontalBar => self.bar_decorator.horizontal_bar().track,
        }
    }

    /// Reacts to a selection and/or scroll change of the main table.
    ///
    /// `change` describes the state before the change; the main table already holds the new one.
    pub fn table_view_did_change_selection_and_did_scroll(&mut self, change: SelectionChange) {
        if let Some(delegate) = self.main_delegate.as_mut() {
            delegate.table_view_did_change_selection_and_did_scroll(&*self.main_table_view, &change);
        }
        if self.main_table_view.selected_row().is_none() {
            self.reset_content_offset();
        }
        if self.main_table_view.content_offset() != change.previous_offset {
            // The preface may need to appear or hide, along with the main frame.
            self.layout_subviews(false);
        } else {
            // Same offset, but the content (hence the scrollbars) may have been resized.
            self.layout_scrollbars(false);
        }
    }

    fn capture_change(&self, within_temporary_selection: bool) -> SelectionChange {
        SelectionChange {
            previous_selected_column: self.main_table_view.selected_column(),
            previous_selected_row: self.main_table_view.selected_row(),
            previous_offset: self.main_table_view.content_offset(),
            within_temporary_selection,
        }
    }

    /// Selects a cell of the main table, scrolls it into view and relayouts as needed.
    pub fn select_cell(&mut self, column: usize, row: usize) {
        let change = self.capture_change(false);
        self.main_table_view.select_cell(column, row);
        self.main_table_view
            .scroll_to_cell(self.main_data_source, column, row);
        self.table_view_did_change_selection_and_did_scroll(change);
    }

    pub fn deselect(&mut self) {
        let change = self.capture_change(false);
        self.main_table_view.deselect();
        self.table_view_did_change_selection_and_did_scroll(change);
    }

    /// Applies a scroll offset reported by the UI for the main table.
    pub fn apply_scroll_offset(&mut self, offset: Point) {
        ptrace!(x = offset.x, y = offset.y, "apply_scroll_offset");
        let change = self.capture_change(false);
        self.main_table_view.set_content_offset(offset);
        self.table_view_did_change_selection_and_did_scroll(change);
    }

    /// Natural height of the preface strip.
    pub fn row_preface_height(&self) -> Coord {
        self.row_preface_view
            .minimal_size_for_optimal_display(&self.row_preface_data_source)
            .height
    }

    /// Decides from the current state alone whether the preface shows.
    pub fn row_preface_visibility(&self) -> PrefaceVisibility {
        let height = self.row_preface_height();
        let too_large = self
            .prefaced_delegate
            .as_ref()
            .is_some_and(|d| height > d.max_row_preface_height());
        let threshold = self
            .row_preface_data_source
            .cumulated_height_before_preface_row();
        let main = &*self.main_table_view;
        let scrolled = main
            .content_offset()
            .y
            .saturating_sub(main.margins().top);

        if main.selected_row().is_none() || too_large || scrolled <= threshold {
            PrefaceVisibility::Hidden
        } else {
            PrefaceVisibility::Shown { height }
        }
    }

    pub fn layout_subviews(&mut self, force: bool) {
        self.layout_subviews_in_rect(self.bounds(), force);
        self.layout_scrollbars(force);
    }

    /// Visibility applied by the last layout pass.
    pub fn laid_out_visibility(&self) -> PrefaceVisibility {
        self.visibility
    }

    pub fn layout_subviews_in_rect(&mut self, rect: Rect, force: bool) {
        let mut visibility = self.row_preface_visibility();
        self.layout_main_table(rect, visibility, force);
        let settled = self.row_preface_visibility();
        if settled != visibility {
            // Keeping the selection in view moved the offset across the threshold.
            ptrace!(shown = settled.is_shown(), "layout_subviews_in_rect: visibility settled");
            visibility = settled;
            self.layout_main_table(rect, visibility, force);
        }
        self.visibility = visibility;
        ptrace!(
            shown = visibility.is_shown(),
            height = visibility.height(),
            "layout_subviews_in_rect"
        );

        match visibility {
            PrefaceVisibility::Hidden => {
                self.row_preface_view.set_frame(Rect::ZERO, force);
            }
            PrefaceVisibility::Shown { height } => {
                let main_margins = self.main_table_view.margins();
                self.row_preface_view.set_left_margin(main_margins.left);
                self.row_preface_view.set_content_offset(Point::new(
                    self.main_table_view.content_offset().x,
                    0,
                ));
                self.row_preface_view
                    .set_frame(Rect::new(rect.x, rect.y, rect.width, height), force);

                let preface_margins = self.row_preface_view.margins();
                if preface_margins.left != main_margins.left
                    || preface_margins.right != main_margins.right
                    || preface_margins.top != 0
                {
                    pwarn!("row preface margins out of sync with the main table");
                }
                debug_assert_eq!(preface_margins.left, main_margins.left);
                debug_assert_eq!(preface_margins.right, main_margins.right);
                debug_assert_eq!(preface_margins.top, 0);
            }
        }
    }

    /// Sets the main top margin and frame for `visibility`, then keeps the selection in view.
    fn layout_main_table(&mut self, rect: Rect, visibility: PrefaceVisibility, force: bool) {
        match visibility {
            PrefaceVisibility::Hidden => {
                self.main_table_view
                    .set_top_margin(self.main_table_view_top_margin);
                self.main_table_view.set_frame(rect, force);
            }
            PrefaceVisibility::Shown { height } => {
                // A separator below the preface would need a bottom margin on the preface here.
                self.main_table_view.set_top_margin(0);
                self.main_table_view.set_frame(
                    Rect::new(
                        rect.x,
                        rect.y.saturating_add(height),
                        rect.width,
                        rect.height.saturating_sub(height),
                    ),
                    force,
                );
            }
        }

        if let Some(row) = self.main_table_view.selected_row() {
            // The frame may have changed: keep the selection in view.
            let column = self.main_table_view.selected_column().unwrap_or(0);
            self.main_table_view
                .scroll_to_cell(self.main_data_source, column, row);
        }
    }

    /// Vertical margin hidden under the preface, to add back for virtual coordinates.
    fn margin_to_add_for_virtual_offset(&self) -> Point {
        Point::new(
            0,
            self.main_table_view_top_margin
                .saturating_sub(self.main_table_view.margins().top),
        )
    }

    /// Scroll offset the main table would have if no preface covered part of the viewport.
    pub fn virtual_offset(&self) -> Point {
        let child_origin = self
            .main_table_view
            .frame()
            .origin()
            .relative_to(self.bounds().origin());
        self.main_table_view
            .content_offset()
            .relative_to(child_origin)
            .translated_by(self.margin_to_add_for_virtual_offset())
    }

    pub fn layout_scrollbars(&mut self, force: bool) {
        // The compositor draws the indicators itself.
        self.main_table_view.hide_scrollbars();
        let margin = self.margin_to_add_for_virtual_offset();
        let mut content = self
            .main_table_view
            .minimal_size_for_optimal_display(self.main_data_source);
        content.height = content.height.saturating_add(margin.y);
        let virtual_offset = self.virtual_offset();
        let bounds = self.bounds();
        self.bar_decorator
            .layout_indicators(content, virtual_offset, bounds, force);
    }

    /// Binds pooled cells to the visible locations of both views.
    ///
    /// Fails if either pool runs out, or if the preface and the main table would display the
    /// same pooled cell.
    pub fn collect_visible_cells(
        &self,
        main_out: &mut Vec<PlacedCell>,
        preface_out: &mut Vec<PlacedCell>,
    ) -> Result<(), LayoutError> {
        self.main_table_view
            .visible_cells(self.main_data_source, main_out)?;
        self.row_preface_view
            .visible_cells(&self.row_preface_data_source, preface_out)?;

        let claimed: BTreeMap<_, _> = main_out.iter().map(|p| (p.cell, p.location)).collect();
        for placed in preface_out.iter() {
            if let Some(&main) = claimed.get(&placed.cell) {
                pwarn!(
                    cell_type = placed.cell.cell_type,
                    index = placed.cell.index,
                    "reusable cell claimed by both the preface and the main table"
                );
                return Err(LayoutError::SharedReusableCell {
                    cell: placed.cell,
                    main,
                    preface: placed.location,
                });
            }
        }
        Ok(())
    }

    fn view_state(view: &impl SelectableTableView) -> ViewState {
        ViewState {
            frame: view.frame(),
            content_offset: view.content_offset(),
            margins: view.margins(),
        }
    }

    /// Snapshot of the current layout.
    pub fn layout(&self) -> PrefacedLayout {
        PrefacedLayout {
            frame: self.frame,
            visibility: self.visibility,
            main: Self::view_state(&*self.main_table_view),
            row_preface: Self::view_state(&self.row_preface_view),
            vertical_bar: *self.bar_decorator.vertical_bar(),
            horizontal_bar: *self.bar_decorator.horizontal_bar(),
        }
    }
}
