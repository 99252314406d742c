use crate::model::board::Board;
use crate::model::column::ColumnId;
use crate::model::filter::FilterMode;

/// Derive the board view for a filter.
///
/// `All` hands back the source board (sharing its columns). Other modes
/// build fresh columns holding only the admitted tasks in their original
/// order. Boards are immutable once built, so a returned view is never
/// affected by later changes to the source.
pub fn apply(board: &Board, mode: FilterMode) -> Board {
    if mode == FilterMode::All {
        return board.clone();
    }
    let keep = |col: ColumnId| {
        board
            .column(col)
            .iter()
            .filter(|t| mode.admits(t.completed))
            .cloned()
            .collect::<Vec<_>>()
    };
    Board::from_columns(
        keep(ColumnId::Todo),
        keep(ColumnId::InProgress),
        keep(ColumnId::Done),
    )
}

/// Per-column task counts, in display order
pub fn column_counts(board: &Board) -> [usize; 3] {
    ColumnId::ALL.map(|col| board.column(col).len())
}
