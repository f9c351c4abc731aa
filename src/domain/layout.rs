// Grid spans and dense packing for dashboard widgets
use super::widget::WidgetSize;
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Breakpoint {
    Desktop,
    Tablet,
    Mobile,
}

impl Breakpoint {
    pub fn columns(self) -> u16 {
        match self {
            Breakpoint::Desktop => 3,
            Breakpoint::Tablet => 2,
            Breakpoint::Mobile => 1,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SpanWidth {
    Columns(u16),
    FullRow,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct GridSpan {
    pub width: SpanWidth,
    pub rows: u16,
}

impl GridSpan {
    /// Concrete column count at a breakpoint, never wider than the grid.
    pub fn columns_at(&self, breakpoint: Breakpoint) -> u16 {
        let available = breakpoint.columns();
        match self.width {
            SpanWidth::Columns(n) => n.min(available),
            SpanWidth::FullRow => available,
        }
    }
}

pub fn span_for(size: WidgetSize) -> GridSpan {
    let (width, rows) = match size {
        WidgetSize::Small => (SpanWidth::Columns(1), 1),
        WidgetSize::Wide => (SpanWidth::Columns(2), 1),
        WidgetSize::Tall => (SpanWidth::Columns(1), 2),
        WidgetSize::Large => (SpanWidth::Columns(2), 2),
        WidgetSize::Full => (SpanWidth::FullRow, 1),
    };
    GridSpan { width, rows }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Placement {
    pub row: u16,
    pub column: u16,
    pub width: u16,
    pub height: u16,
}

/// Place widgets on the grid with dense auto-flow.
///
/// Each widget goes to the first top-left cell where it fits, scanning from the
/// start of the grid, so later small widgets backfill gaps left by larger ones.
pub fn pack(sizes: &[WidgetSize], breakpoint: Breakpoint) -> Vec<Placement> {
    let columns = breakpoint.columns() as usize;
    let mut occupied: Vec<Vec<bool>> = Vec::new();
    let mut placements = Vec::with_capacity(sizes.len());

    for size in sizes {
        let span = span_for(*size);
        let width = span.columns_at(breakpoint) as usize;
        let height = span.rows as usize;

        let mut row = 0;
        let column = loop {
            if let Some(column) = (0..=columns - width).find(|&c| fits(&occupied, row, c, width, height)) {
                break column;
            }
            row += 1;
        };

        while occupied.len() < row + height {
            occupied.push(vec![false; columns]);
        }
        for cells in &mut occupied[row..row + height] {
            for cell in &mut cells[column..column + width] {
                *cell = true;
            }
        }

        placements.push(Placement {
            row: row as u16,
            column: column as u16,
            width: width as u16,
            height: height as u16,
        });
    }

    placements
}

fn fits(occupied: &[Vec<bool>], row: usize, column: usize, width: usize, height: usize) -> bool {
    (row..row + height).all(|r| {
        occupied
            .get(r)
            .map(|cells| cells[column..column + width].iter().all(|taken| !taken))
            .unwrap_or(true)
    })
}
