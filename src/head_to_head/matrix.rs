use super::resolver::{head_to_head, HeadToHead};
use crate::dataset::{MatchStore, Pool, Team};
use crate::standings::Category;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MatrixCell {
    /// A team against itself
    Diagonal,
    Result(HeadToHead),
}

#[derive(Debug, Clone)]
pub struct MatrixRow<'a> {
    pub team: &'a Team,
    pub cells: Vec<MatrixCell>,
    /// Wins and losses counted from this row's cells only
    pub wins: u32,
    pub losses: u32,
}

/// Round-robin grid for one pool
#[derive(Debug, Clone)]
pub struct PoolMatrix<'a> {
    pub pool: &'a Pool,
    /// Pool members that exist in the dataset, in pool order
    pub teams: Vec<&'a Team>,
    pub rows: Vec<MatrixRow<'a>>,
}

/// Build the head-to-head grid for a pool. Identifiers the dataset does not
/// know are left out.
pub fn pool_matrix<'a>(store: &'a MatchStore, pool: &'a Pool) -> PoolMatrix<'a> {
    let teams: Vec<&Team> = pool
        .teams
        .iter()
        .filter_map(|id| store.get_team(id))
        .collect();

    let rows = teams
        .iter()
        .enumerate()
        .map(|(i, &team)| {
            let mut wins = 0;
            let mut losses = 0;
            let cells = teams
                .iter()
                .enumerate()
                .map(|(j, opponent)| {
                    if i == j {
                        return MatrixCell::Diagonal;
                    }
                    let result = head_to_head(store, &team.id, &opponent.id);
                    match result {
                        HeadToHead::Win => wins += 1,
                        HeadToHead::Loss => losses += 1,
                        HeadToHead::NoResult => {}
                    }
                    MatrixCell::Result(result)
                })
                .collect();
            MatrixRow {
                team,
                cells,
                wins,
                losses,
            }
        })
        .collect();

    PoolMatrix { pool, teams, rows }
}

/// Grids for every pool whose identifier falls in the category
pub fn category_matrices(store: &MatchStore, category: Category) -> Vec<PoolMatrix<'_>> {
    store
        .pools()
        .iter()
        .filter(|p| category.matches(&p.id))
        .map(|p| pool_matrix(store, p))
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::dataset::store::fixtures::sample_store;

    #[test]
    fn test_pool_matrix_cells() {
        let store = sample_store();
        let matrices = category_matrices(&store, Category::Men);
        assert_eq!(matrices.len(), 1);

        let grid = &matrices[0];
        assert_eq!(grid.pool.id, "M-A");
        assert_eq!(grid.teams.len(), 3);

        // M1 beat M2 in draw 1, has not finished against M3
        let m1 = &grid.rows[0];
        assert_eq!(
            m1.cells,
            vec![
                MatrixCell::Diagonal,
                MatrixCell::Result(HeadToHead::Win),
                MatrixCell::Result(HeadToHead::NoResult),
            ]
        );
        assert_eq!((m1.wins, m1.losses), (1, 0));

        // M2 lost to M1 and beat M3
        let m2 = &grid.rows[1];
        assert_eq!((m2.wins, m2.losses), (1, 1));
    }

    #[test]
    fn test_unknown_pool_members_skipped() {
        let store = sample_store();
        let matrices = category_matrices(&store, Category::Women);
        let grid = &matrices[0];
        // W9 is listed in the pool but not a known team
        assert_eq!(grid.teams.len(), 2);
        assert_eq!(grid.rows[0].cells.len(), 2);
    }

    #[test]
    fn test_all_category_includes_every_pool() {
        let store = sample_store();
        assert_eq!(category_matrices(&store, Category::All).len(), 2);
    }
}
