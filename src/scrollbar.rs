use crate::{Coord, Point, Rect, Size};

/// Default thickness of a scroll indicator track.
pub const SCROLLBAR_THICKNESS: Coord = 4;

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum Orientation {
    Vertical,
    Horizontal,
}

/// One scroll indicator: a track along an edge and a thumb inside it.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct ScrollIndicator {
    pub orientation: Orientation,
    pub visible: bool,
    /// Track frame in the decorated view's coordinates.
    pub track: Rect,
    /// Thumb start along the track.
    pub thumb_offset: Coord,
    /// Thumb length along the track.
    pub thumb_length: Coord,
}

impl ScrollIndicator {
    fn hidden(orientation: Orientation) -> Self {
        Self {
            orientation,
            visible: false,
            track: Rect::ZERO,
            thumb_offset: 0,
            thumb_length: 0,
        }
    }

    /// Thumb frame in the decorated view's coordinates.
    pub fn thumb(&self) -> Rect {
        if !self.visible {
            return Rect::ZERO;
        }
        match self.orientation {
            Orientation::Vertical => Rect::new(
                self.track.x,
                self.track.y.saturating_add(self.thumb_offset),
                self.track.width,
                self.thumb_length,
            ),
            Orientation::Horizontal => Rect::new(
                self.track.x.saturating_add(self.thumb_offset),
                self.track.y,
                self.thumb_length,
                self.track.height,
            ),
        }
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
struct IndicatorInputs {
    content: Size,
    offset: Point,
    bounds: Rect,
}

/// Positions a vertical indicator on the right edge and a horizontal one on the bottom edge.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ScrollbarDecorator {
    thickness: Coord,
    vertical: ScrollIndicator,
    horizontal: ScrollIndicator,
    last: Option<IndicatorInputs>,
}

impl Default for ScrollbarDecorator {
    fn default() -> Self {
        Self::new(SCROLLBAR_THICKNESS)
    }
}

impl ScrollbarDecorator {
    pub fn new(thickness: Coord) -> Self {
        Self {
            thickness: thickness.max(1),
            vertical: ScrollIndicator::hidden(Orientation::Vertical),
            horizontal: ScrollIndicator::hidden(Orientation::Horizontal),
            last: None,
        }
    }

    pub fn thickness(&self) -> Coord {
        self.thickness
    }

    pub fn vertical_bar(&self) -> &ScrollIndicator {
        &self.vertical
    }

    pub fn horizontal_bar(&self) -> &ScrollIndicator {
        &self.horizontal
    }

    /// Lays out both indicators for `content` scrolled to `offset` inside `bounds`.
    ///
    /// Returns the `(vertical, horizontal)` track frames (`Rect::ZERO` when hidden). Unchanged
    /// inputs are skipped unless `force` is set.
    pub fn layout_indicators(
        &mut self,
        content: Size,
        offset: Point,
        bounds: Rect,
        force: bool,
    ) -> (Rect, Rect) {
        let inputs = IndicatorInputs {
            content,
            offset,
            bounds,
        };
        if !force && self.last == Some(inputs) {
            return (self.vertical.track, self.horizontal.track);
        }
        self.last = Some(inputs);

        let t = self.thickness;
        let show_vertical = content.height > bounds.height;
        let show_horizontal = content.width > bounds.width;
        // Leave the corner to the vertical bar when both show.
        let horizontal_length = if show_vertical {
            bounds.width.saturating_sub(t)
        } else {
            bounds.width
        };

        self.vertical = if show_vertical {
            let track = Rect::new(bounds.right().saturating_sub(t), bounds.y, t, bounds.height);
            let (thumb_offset, thumb_length) =
                thumb(content.height, bounds.height, offset.y, track.height);
            ScrollIndicator {
                orientation: Orientation::Vertical,
                visible: true,
                track,
                thumb_offset,
                thumb_length,
            }
        } else {
            ScrollIndicator::hidden(Orientation::Vertical)
        };

        self.horizontal = if show_horizontal {
            let track = Rect::new(
                bounds.x,
                bounds.bottom().saturating_sub(t),
                horizontal_length,
                t,
            );
            let (thumb_offset, thumb_length) =
                thumb(content.width, bounds.width, offset.x, track.width);
            ScrollIndicator {
                orientation: Orientation::Horizontal,
                visible: true,
                track,
                thumb_offset,
                thumb_length,
            }
        } else {
            ScrollIndicator::hidden(Orientation::Horizontal)
        };

        ptrace!(
            content_w = content.width,
            content_h = content.height,
            offset_x = offset.x,
            offset_y = offset.y,
            vertical = show_vertical,
            horizontal = show_horizontal,
            "layout_indicators"
        );
        (self.vertical.track, self.horizontal.track)
    }
}

/// Thumb `(offset, length)` along a track of `track` pixels.
///
/// Length is proportional to `viewport / content` (at least one pixel); position is
/// proportional to scroll progress over the remaining track.
fn thumb(content: Coord, viewport: Coord, offset: Coord, track: Coord) -> (Coord, Coord) {
    if track <= 0 || content <= 0 {
        return (0, track.max(0));
    }
    let content = content as i64;
    let viewport = (viewport as i64).clamp(0, content);
    let track64 = track as i64;

    let length = (viewport * track64 / content).clamp(1, track64);
    let max_offset = content - viewport;
    let position = if max_offset == 0 {
        0
    } else {
        let progress = (offset as i64).clamp(0, max_offset);
        progress * (track64 - length) / max_offset
    };
    (position as Coord, length as Coord)
}
