use serde::{Deserialize, Serialize};

use crate::core::{Direction, Grid, Position, TokenKind};

/// Minimum number of equal tokens in a line that forms a run.
pub const MIN_RUN_LENGTH: usize = 3;

/// Shape classification of a [`Chain`], used only for scoring.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, derive_more::IsVariant)]
pub enum ChainShape {
    /// A single straight run of three.
    Straight3,
    /// A single straight run of four.
    Straight4,
    /// A single straight run of five or more.
    Straight5Plus,
    /// Horizontal and vertical runs sharing at least one cell (L, T or +).
    Junction,
}

impl ChainShape {
    fn straight(length: usize) -> Self {
        match length {
            ..=3 => ChainShape::Straight3,
            4 => ChainShape::Straight4,
            _ => ChainShape::Straight5Plus,
        }
    }
}

/// A maximal set of same-kind tokens formed by one or more overlapping runs.
///
/// Cells are kept sorted, so two chains covering the same cells compare equal
/// regardless of the order in which their runs were found.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Chain {
    kind: TokenKind,
    shape: ChainShape,
    longest_run: usize,
    cells: Vec<Position>,
}

impl Chain {
    #[must_use]
    pub fn kind(&self) -> TokenKind {
        self.kind
    }

    #[must_use]
    pub fn shape(&self) -> ChainShape {
        self.shape
    }

    /// Length of the longest straight run that contributed to this chain.
    #[must_use]
    pub fn longest_run(&self) -> usize {
        self.longest_run
    }

    /// Number of distinct cells in the chain.
    #[must_use]
    pub fn size(&self) -> usize {
        self.cells.len()
    }

    #[must_use]
    pub fn cells(&self) -> &[Position] {
        &self.cells
    }

    #[must_use]
    pub fn contains(&self, pos: Position) -> bool {
        self.cells.binary_search(&pos).is_ok()
    }
}

#[derive(Debug, Clone)]
struct Run {
    kind: TokenKind,
    direction: Direction,
    cells: Vec<Position>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum ScanOrder {
    RowsFirst,
    ColumnsFirst,
}

/// Finds every chain on the grid.
///
/// Rows are scanned left to right and columns top to bottom for runs of at
/// least [`MIN_RUN_LENGTH`] equal tokens; runs sharing a cell are merged into
/// one chain. The result is sorted by each chain's smallest cell and the
/// chains are pairwise disjoint.
///
/// ```
/// use frogcrush_engine::{ChainShape, Grid, find_chains};
///
/// let grid: Grid = "...../..M../..M../.MMM./.....".parse().unwrap();
/// let chains = find_chains(&grid);
/// assert_eq!(chains.len(), 1);
/// assert_eq!(chains[0].size(), 5);
/// assert_eq!(chains[0].shape(), ChainShape::Junction);
/// ```
#[must_use]
pub fn find_chains(grid: &Grid) -> Vec<Chain> {
    find_chains_in_order(grid, ScanOrder::RowsFirst)
}

pub(crate) fn find_chains_in_order(grid: &Grid, order: ScanOrder) -> Vec<Chain> {
    let mut runs = vec![];
    match order {
        ScanOrder::RowsFirst => {
            scan_rows(grid, &mut runs);
            scan_columns(grid, &mut runs);
        }
        ScanOrder::ColumnsFirst => {
            scan_columns(grid, &mut runs);
            scan_rows(grid, &mut runs);
        }
    }
    merge_runs(grid, &runs)
}

/// Returns whether the grid contains at least one run, without building chains.
#[must_use]
pub fn has_chain(grid: &Grid) -> bool {
    rows(grid)
        .chain(columns(grid))
        .any(|line| longest_line_run(grid, line) >= MIN_RUN_LENGTH)
}

fn rows(grid: &Grid) -> impl Iterator<Item = Box<dyn Iterator<Item = Position>>> + use<> {
    let width = grid.width();
    (0..grid.height()).map(move |row| {
        Box::new((0..width).map(move |column| Position::new(column, row)))
            as Box<dyn Iterator<Item = Position>>
    })
}

fn columns(grid: &Grid) -> impl Iterator<Item = Box<dyn Iterator<Item = Position>>> + use<> {
    let height = grid.height();
    (0..grid.width()).map(move |column| {
        Box::new((0..height).rev().map(move |row| Position::new(column, row)))
            as Box<dyn Iterator<Item = Position>>
    })
}

fn scan_rows(grid: &Grid, runs: &mut Vec<Run>) {
    for line in rows(grid) {
        scan_line(grid, line, Direction::Horizontal, runs);
    }
}

fn scan_columns(grid: &Grid, runs: &mut Vec<Run>) {
    for line in columns(grid) {
        scan_line(grid, line, Direction::Vertical, runs);
    }
}

fn longest_line_run<I>(grid: &Grid, line: I) -> usize
where
    I: Iterator<Item = Position>,
{
    let mut longest = 0;
    let mut current = 0;
    let mut current_kind = None;
    for pos in line {
        let kind = grid.token(pos);
        if kind.is_some() && kind == current_kind {
            current += 1;
        } else {
            current = usize::from(kind.is_some());
            current_kind = kind;
        }
        longest = longest.max(current);
    }
    longest
}

fn scan_line<I>(grid: &Grid, line: I, direction: Direction, runs: &mut Vec<Run>)
where
    I: Iterator<Item = Position>,
{
    let mut flush = |kind: Option<TokenKind>, cells: &mut Vec<Position>| {
        if let Some(kind) = kind
            && cells.len() >= MIN_RUN_LENGTH
        {
            runs.push(Run {
                kind,
                direction,
                cells: std::mem::take(cells),
            });
        }
        cells.clear();
    };

    let mut cells = vec![];
    let mut current_kind = None;
    for pos in line {
        let kind = grid.token(pos);
        if kind.is_some() && kind == current_kind {
            cells.push(pos);
            continue;
        }
        flush(current_kind, &mut cells);
        current_kind = kind;
        if kind.is_some() {
            cells.push(pos);
        }
    }
    flush(current_kind, &mut cells);
}

/// Disjoint-set forest over run indices.
struct DisjointSet {
    parent: Vec<usize>,
    rank: Vec<u8>,
}

impl DisjointSet {
    fn new(len: usize) -> Self {
        Self {
            parent: (0..len).collect(),
            rank: vec![0; len],
        }
    }

    fn find(&mut self, mut i: usize) -> usize {
        while self.parent[i] != i {
            self.parent[i] = self.parent[self.parent[i]];
            i = self.parent[i];
        }
        i
    }

    fn union(&mut self, a: usize, b: usize) {
        let (ra, rb) = (self.find(a), self.find(b));
        if ra == rb {
            return;
        }
        match self.rank[ra].cmp(&self.rank[rb]) {
            std::cmp::Ordering::Less => self.parent[ra] = rb,
            std::cmp::Ordering::Greater => self.parent[rb] = ra,
            std::cmp::Ordering::Equal => {
                self.parent[rb] = ra;
                self.rank[ra] += 1;
            }
        }
    }
}

fn merge_runs(grid: &Grid, runs: &[Run]) -> Vec<Chain> {
    let mut sets = DisjointSet::new(runs.len());
    let mut owner: Vec<Option<usize>> = vec![None; grid.width() * grid.height()];
    for (i, run) in runs.iter().enumerate() {
        for pos in &run.cells {
            let slot = &mut owner[pos.row() * grid.width() + pos.column()];
            match *slot {
                Some(other) => sets.union(other, i),
                None => *slot = Some(i),
            }
        }
    }

    let mut groups: Vec<Vec<usize>> = vec![vec![]; runs.len()];
    for i in 0..runs.len() {
        let root = sets.find(i);
        groups[root].push(i);
    }

    let mut chains: Vec<Chain> = groups
        .into_iter()
        .filter(|members| !members.is_empty())
        .map(|members| build_chain(runs, &members))
        .collect();
    chains.sort_by_key(|chain| chain.cells[0]);
    chains
}

fn build_chain(runs: &[Run], members: &[usize]) -> Chain {
    let mut cells: Vec<Position> = members
        .iter()
        .flat_map(|&i| runs[i].cells.iter().copied())
        .collect();
    cells.sort_unstable();
    cells.dedup();

    let longest_run = members
        .iter()
        .map(|&i| runs[i].cells.len())
        .max()
        .unwrap_or_default();
    let has_horizontal = members.iter().any(|&i| runs[i].direction.is_horizontal());
    let has_vertical = members.iter().any(|&i| runs[i].direction.is_vertical());
    let shape = if has_horizontal && has_vertical {
        ChainShape::Junction
    } else {
        ChainShape::straight(longest_run)
    };

    Chain {
        kind: runs[members[0]].kind,
        shape,
        longest_run,
        cells,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn grid(s: &str) -> Grid {
        s.parse().unwrap()
    }

    #[test]
    fn test_chain_free_grid_has_no_chains() {
        let g = grid("CUDCU/UDCUD/DCUDC/CUDCU");
        assert!(find_chains(&g).is_empty());
        assert!(!has_chain(&g));
    }

    #[test]
    fn test_straight_runs() {
        let g = grid("....../..OOO./......");
        let chains = find_chains(&g);
        assert_eq!(chains.len(), 1);
        let chain = &chains[0];
        assert_eq!(chain.kind(), TokenKind::Donut);
        assert_eq!(chain.shape(), ChainShape::Straight3);
        assert_eq!(
            chain.cells(),
            &[Position::new(2, 1), Position::new(3, 1), Position::new(4, 1)]
        );

        let g = grid("MMMM../S...../S...../S...../S.....");
        let chains = find_chains(&g);
        assert_eq!(chains.len(), 2);
        assert_eq!(chains[0].kind(), TokenKind::SugarCookie);
        assert_eq!(chains[0].shape(), ChainShape::Straight4);
        assert_eq!(chains[1].kind(), TokenKind::Macaroon);
        assert_eq!(chains[1].shape(), ChainShape::Straight4);

        let g = grid("CCCCCCC");
        let chains = find_chains(&g);
        assert_eq!(chains[0].shape(), ChainShape::Straight5Plus);
        assert_eq!(chains[0].longest_run(), 7);
    }

    #[test]
    fn test_run_of_two_is_not_a_chain() {
        let g = grid("CC.C/UDUD");
        assert!(find_chains(&g).is_empty());
        assert!(!has_chain(&g));
    }

    #[test]
    fn test_runs_break_at_illegal_and_empty_cells() {
        let g = grid("CC#CC/UU.UU");
        assert!(find_chains(&g).is_empty());
    }

    #[test]
    fn test_l_shape_merges_into_one_junction() {
        // Horizontal (1,1)-(3,1) and vertical (2,1)-(2,3) share (2,1).
        let g = grid("...../..M../..M../.MMM./.....");
        let chains = find_chains(&g);
        assert_eq!(chains.len(), 1);
        let chain = &chains[0];
        assert_eq!(chain.size(), 5);
        assert_eq!(chain.shape(), ChainShape::Junction);
        assert_eq!(chain.longest_run(), 3);
        assert!(chain.contains(Position::new(2, 1)));
        assert!(chain.contains(Position::new(2, 3)));
        assert!(!chain.contains(Position::new(2, 4)));
    }

    #[test]
    fn test_t_and_cross_shapes() {
        let g = grid("DDDDD/..D../..D..");
        let chains = find_chains(&g);
        assert_eq!(chains.len(), 1);
        assert_eq!(chains[0].size(), 7);
        assert_eq!(chains[0].shape(), ChainShape::Junction);
        assert_eq!(chains[0].longest_run(), 5);

        let g = grid(".U./UUU/.U.");
        let chains = find_chains(&g);
        assert_eq!(chains.len(), 1);
        assert_eq!(chains[0].size(), 5);
        assert_eq!(chains[0].shape(), ChainShape::Junction);
    }

    #[test]
    fn test_h_shape_merges_transitively() {
        // Two vertical runs joined by a horizontal run.
        let g = grid("S.S/SSS/S.S");
        let chains = find_chains(&g);
        assert_eq!(chains.len(), 1);
        assert_eq!(chains[0].size(), 7);
        assert_eq!(chains[0].shape(), ChainShape::Junction);
    }

    #[test]
    fn test_adjacent_parallel_runs_stay_separate() {
        let g = grid("CCC/UUU");
        let chains = find_chains(&g);
        assert_eq!(chains.len(), 2);
        assert_eq!(chains[0].kind(), TokenKind::Cupcake);
        assert_eq!(chains[1].kind(), TokenKind::Croissant);
        assert!(chains[0].cells().iter().all(|&p| !chains[1].contains(p)));
    }

    #[test]
    fn test_scan_order_does_not_change_partition() {
        let g = grid("CCCUO/DUCUO/DDCUO/MMMSS/OSDDD");
        let rows_first = find_chains_in_order(&g, ScanOrder::RowsFirst);
        let columns_first = find_chains_in_order(&g, ScanOrder::ColumnsFirst);
        assert_eq!(rows_first, columns_first);
        assert_eq!(find_chains(&g), rows_first);
        assert!(has_chain(&g));
    }

    #[test]
    fn test_chains_are_disjoint_and_cover_every_run_cell() {
        let g = grid("CCCUO/DUCUO/DDCUO/MMMSS/OSDDD");
        let chains = find_chains(&g);
        let mut seen = std::collections::HashSet::new();
        for chain in &chains {
            for &pos in chain.cells() {
                assert!(seen.insert(pos), "{pos} belongs to two chains");
                assert_eq!(g.token(pos), Some(chain.kind()));
            }
        }
        // CCC row + C column merge; O column; U column; MMM row; DDD row.
        assert_eq!(chains.len(), 5);
    }
}
