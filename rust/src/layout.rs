//! Grid placement of events for drawing the network.
//!
//! Columns are rank buckets and rows are positions within a rank. Only the
//! `{index, event_rank}` columns of the events table are read.

use crate::models::{EventPosition, EventRow};

/// Place every event on a `width` x `height` canvas.
///
/// There is one column per rank plus a margin column; within a rank, events
/// are spread evenly top to bottom in index order.
pub fn layout_events(events: &[EventRow], width: u32, height: u32) -> Vec<EventPosition> {
    let Some(max_rank) = events.iter().map(|e| e.event_rank).max() else {
        return Vec::new();
    };
    let columns = max_rank.saturating_add(2);
    let column_width = width as usize / columns;

    let mut ordered: Vec<&EventRow> = events.iter().collect();
    ordered.sort_by_key(|e| (e.event_rank, e.index));

    let mut positions = Vec::with_capacity(events.len());
    for bucket in ordered.chunk_by(|a, b| a.event_rank == b.event_rank) {
        let row_height = height as usize / (bucket.len() + 1);
        for (row, event) in bucket.iter().enumerate() {
            positions.push(EventPosition {
                index: event.index,
                event_rank: event.event_rank,
                x: to_pixel(event.event_rank.saturating_add(1).saturating_mul(column_width)),
                y: to_pixel((row + 1).saturating_mul(row_height)),
            });
        }
    }
    positions
}

fn to_pixel(value: usize) -> u32 {
    u32::try_from(value).unwrap_or(u32::MAX)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn row(index: usize, event_rank: usize) -> EventRow {
        EventRow {
            index,
            event_rank,
            time_early: 0.0,
            time_late: 0.0,
            event_reserve: 0.0,
        }
    }

    #[test]
    fn test_grid_positions() {
        let events = vec![row(0, 0), row(1, 1), row(2, 1), row(3, 2)];
        let positions = layout_events(&events, 1200, 800);

        // 4 columns of 300; rank 1 has two rows of 266
        let coords: Vec<(usize, u32, u32)> =
            positions.iter().map(|p| (p.index, p.x, p.y)).collect();
        assert_eq!(
            coords,
            vec![(0, 300, 400), (1, 600, 266), (2, 600, 532), (3, 900, 400)]
        );
    }

    #[test]
    fn test_unordered_input() {
        let events = vec![row(2, 1), row(0, 0), row(1, 1)];
        let positions = layout_events(&events, 300, 300);
        let order: Vec<usize> = positions.iter().map(|p| p.index).collect();
        assert_eq!(order, vec![0, 1, 2]);
        assert_eq!(positions[1].y, 100);
        assert_eq!(positions[2].y, 200);
    }

    #[test]
    fn test_huge_rank_does_not_overflow() {
        let events = vec![row(0, 0), row(1, usize::MAX)];
        let positions = layout_events(&events, 1000, 1000);

        assert_eq!(positions.len(), 2);
        // Columns are narrower than a pixel
        assert!(positions.iter().all(|p| p.x == 0));
        assert!(positions.iter().all(|p| p.y == 500));
    }

    #[test]
    fn test_empty_table() {
        assert!(layout_events(&[], 800, 600).is_empty());
    }
}
