use crate::scrollbar::ScrollIndicator;
use crate::{Coord, Margins, Point, Rect};

/// Whether the row preface overlays the top of the main table.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum PrefaceVisibility {
    Hidden,
    Shown { height: Coord },
}

impl PrefaceVisibility {
    pub fn is_shown(&self) -> bool {
        matches!(self, Self::Shown { .. })
    }

    /// Height taken by the preface strip (0 when hidden).
    pub fn height(&self) -> Coord {
        match self {
            Self::Hidden => 0,
            Self::Shown { height } => *height,
        }
    }
}

/// Geometry and scroll state of one sub-view.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct ViewState {
    pub frame: Rect,
    pub content_offset: Point,
    pub margins: Margins,
}

/// A snapshot of everything a layout pass decides.
///
/// Two passes over identical inputs produce equal snapshots. With `feature = "serde"`, this
/// type implements `Serialize`/`Deserialize`.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct PrefacedLayout {
    pub frame: Rect,
    pub visibility: PrefaceVisibility,
    pub main: ViewState,
    pub row_preface: ViewState,
    pub vertical_bar: ScrollIndicator,
    pub horizontal_bar: ScrollIndicator,
}
