//! Drag-to-reorder gesture handling.
//!
//! The page reports row geometry and pointer position; this module decides
//! where the drop separator goes and which permutation a drop produces.
//! A gesture is `Idle -> Dragging -> Idle`; only a drop yields a reorder.

use serde::{Deserialize, Serialize};

/// Vertical extent of one rendered list row, in page pixels.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct RowBox {
    pub top: f64,
    pub height: f64,
}

impl RowBox {
    pub fn midpoint(&self) -> f64 {
        self.top + self.height / 2.0
    }
}

/// Where the separator (and a dropped row) goes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(tag = "at", content = "row", rename_all = "snake_case")]
pub enum Insertion {
    /// Immediately before the row with this index
    Before(usize),
    /// After the last row
    End,
}

/// Errors from malformed drag events.
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum DragError {
    #[error("row {row} out of range for {len} rows")]
    RowOutOfRange { row: usize, len: usize },

    #[error("expected geometry for {expected} rows, got {found}")]
    GeometryMismatch { expected: usize, found: usize },
}

#[derive(Debug, Clone, Copy, PartialEq, Default)]
enum DragState {
    #[default]
    Idle,
    Dragging {
        row: usize,
        len: usize,
        separator: Option<Insertion>,
    },
}

/// Drag gesture state for one list.
#[derive(Debug, Clone, Default)]
pub struct DragReorder {
    state: DragState,
}

/// Find the insertion point for a pointer at `pointer_y`.
///
/// Scans rows top to bottom, skipping the dragged one, and picks the first
/// whose midpoint lies below the pointer.
pub fn insertion_point(pointer_y: f64, rows: &[RowBox], dragged: usize) -> Insertion {
    rows.iter()
        .enumerate()
        .filter(|(i, _)| *i != dragged)
        .find(|(_, row)| pointer_y < row.midpoint())
        .map(|(i, _)| Insertion::Before(i))
        .unwrap_or(Insertion::End)
}

/// The order produced by moving row `dragged` to `insertion` in a list of
/// `len` rows. Entry `k` is the original index of the row now at `k`.
pub fn permutation_for(len: usize, dragged: usize, insertion: Insertion) -> Vec<usize> {
    let mut order: Vec<usize> = (0..len).filter(|&i| i != dragged).collect();
    let at = match insertion {
        Insertion::Before(target) => order
            .iter()
            .position(|&i| i == target)
            .unwrap_or(order.len()),
        Insertion::End => order.len(),
    };
    order.insert(at, dragged);
    order
}

impl DragReorder {
    pub fn new() -> Self {
        Self::default()
    }

    /// Begin dragging `row` of a `len`-row list. Restarts any gesture
    /// already in progress.
    pub fn start(&mut self, row: usize, len: usize) -> Result<(), DragError> {
        if row >= len {
            return Err(DragError::RowOutOfRange { row, len });
        }
        self.state = DragState::Dragging {
            row,
            len,
            separator: None,
        };
        Ok(())
    }

    /// Pointer moved over the list. Returns the new separator position, or
    /// `None` when no drag is in progress.
    pub fn over(&mut self, pointer_y: f64, rows: &[RowBox]) -> Result<Option<Insertion>, DragError> {
        let DragState::Dragging {
            row,
            len,
            separator,
        } = &mut self.state
        else {
            return Ok(None);
        };
        check_geometry(*len, rows)?;

        let insertion = insertion_point(pointer_y, rows, *row);
        *separator = Some(insertion);
        Ok(Some(insertion))
    }

    /// Row released over the list. Returns the resulting order, or `None`
    /// when no drag was in progress. The gesture ends either way.
    pub fn drop(&mut self, pointer_y: f64, rows: &[RowBox]) -> Result<Option<Vec<usize>>, DragError> {
        let DragState::Dragging { row, len, .. } = self.state else {
            return Ok(None);
        };
        if let Err(e) = check_geometry(len, rows) {
            self.state = DragState::Idle;
            return Err(e);
        }

        let insertion = insertion_point(pointer_y, rows, row);
        self.state = DragState::Idle;
        Ok(Some(permutation_for(len, row, insertion)))
    }

    /// Gesture ended without a drop; the row stays where it was.
    pub fn cancel(&mut self) {
        self.state = DragState::Idle;
    }

    pub fn is_dragging(&self) -> bool {
        matches!(self.state, DragState::Dragging { .. })
    }

    /// Row currently being dragged (rendered dimmed).
    pub fn dragged_row(&self) -> Option<usize> {
        match self.state {
            DragState::Dragging { row, .. } => Some(row),
            DragState::Idle => None,
        }
    }

    /// Current separator position, if one is shown.
    pub fn separator(&self) -> Option<Insertion> {
        match self.state {
            DragState::Dragging { separator, .. } => separator,
            DragState::Idle => None,
        }
    }
}

fn check_geometry(len: usize, rows: &[RowBox]) -> Result<(), DragError> {
    if rows.len() != len {
        return Err(DragError::GeometryMismatch {
            expected: len,
            found: rows.len(),
        });
    }
    Ok(())
}
