//! Dense row-major matrix used by the placement pass. Every row has the
//! same number of columns; cells are optional. The placement algorithm
//! leans on row/column insertion and removal during compaction and
//! diagonal enforcement.

#[derive(Debug, Clone)]
pub(crate) struct Grid<T> {
    cells: Vec<Vec<Option<T>>>,
    columns: usize,
}

impl<T> Grid<T> {
    pub fn new(rows: usize, columns: usize) -> Self {
        let mut cells = Vec::with_capacity(rows);
        for _ in 0..rows {
            cells.push(new_row(columns));
        }
        Self { cells, columns }
    }

    pub fn rows(&self) -> usize {
        self.cells.len()
    }

    pub fn columns(&self) -> usize {
        self.columns
    }

    pub fn get(&self, row: usize, column: usize) -> Option<&T> {
        self.cells.get(row).and_then(|r| r.get(column)).and_then(|c| c.as_ref())
    }

    pub fn set(&mut self, row: usize, column: usize, value: T) {
        if row >= self.rows() {
            self.grow_rows(row + 1);
        }
        if column >= self.columns {
            self.grow_columns(column + 1);
        }
        self.cells[row][column] = Some(value);
    }

    pub fn take(&mut self, row: usize, column: usize) -> Option<T> {
        self.cells
            .get_mut(row)
            .and_then(|r| r.get_mut(column))
            .and_then(|c| c.take())
    }

    pub fn insert_row(&mut self, at: usize) {
        self.cells.insert(at.min(self.rows()), new_row(self.columns));
    }

    pub fn remove_row(&mut self, at: usize) {
        if at < self.rows() {
            self.cells.remove(at);
        }
    }

    pub fn remove_column(&mut self, at: usize) {
        if at >= self.columns {
            return;
        }
        for row in &mut self.cells {
            row.remove(at);
        }
        self.columns -= 1;
    }

    pub fn row_is_empty(&self, row: usize) -> bool {
        self.cells[row].iter().all(|cell| cell.is_none())
    }

    pub fn column_is_empty(&self, column: usize) -> bool {
        self.cells.iter().all(|row| row[column].is_none())
    }

    /// Every occupied cell as `(row, column, &value)`, row-major.
    pub fn occupied(&self) -> impl Iterator<Item = (usize, usize, &T)> {
        self.cells.iter().enumerate().flat_map(|(r, row)| {
            row.iter()
                .enumerate()
                .filter_map(move |(c, cell)| cell.as_ref().map(|value| (r, c, value)))
        })
    }

    fn grow_rows(&mut self, rows: usize) {
        while self.rows() < rows {
            self.cells.push(new_row(self.columns));
        }
    }

    fn grow_columns(&mut self, columns: usize) {
        for row in &mut self.cells {
            row.resize_with(columns, || None);
        }
        self.columns = columns;
    }
}

fn new_row<T>(columns: usize) -> Vec<Option<T>> {
    let mut row = Vec::with_capacity(columns);
    row.resize_with(columns, || None);
    row
}
