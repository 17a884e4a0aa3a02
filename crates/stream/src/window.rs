use tilestream_common::TileCoord;

/// Rectangular set of cells within `range_x`/`range_y` of a center cell.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Window {
    pub center: TileCoord,
    pub range_x: u32,
    pub range_y: u32,
}

impl Window {
    pub fn new(center: TileCoord, range_x: u32, range_y: u32) -> Self {
        Self {
            center,
            range_x,
            range_y,
        }
    }

    /// Every cell of the window in row-major order: bottom row first, `x`
    /// ascending within a row. Cells past the `i32` range are left out.
    pub fn cells(self) -> impl Iterator<Item = TileCoord> {
        let rx = i32::try_from(self.range_x).unwrap_or(i32::MAX);
        let ry = i32::try_from(self.range_y).unwrap_or(i32::MAX);
        let center = self.center;
        (-ry..=ry).flat_map(move |dy| {
            (-rx..=rx).filter_map(move |dx| center.checked_offset(dx, dy))
        })
    }

    pub fn cell_count(&self) -> usize {
        (self.range_x as usize * 2 + 1) * (self.range_y as usize * 2 + 1)
    }

    /// Inclusive on both axes.
    pub fn contains(&self, coord: TileCoord) -> bool {
        self.within(coord, 0)
    }

    /// Whether `coord` is inside the window grown by `margin` cells on every side.
    ///
    /// Loaded tiles are kept while this holds, so a viewpoint jittering on the
    /// window edge does not unload and reload the same tiles.
    pub fn within(&self, coord: TileCoord, margin: u32) -> bool {
        let (dx, dy) = self.center.axis_distance(coord);
        dx <= self.range_x.saturating_add(margin) && dy <= self.range_y.saturating_add(margin)
    }
}
