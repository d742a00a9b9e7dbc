use super::mesh::Mesh;
use super::FixedFaceHandle;
use crate::{Point2, Rectangle};

/// A uniform grid over a rectangular region that stores one face per cell.
///
/// The stored face lies close to the cell's center and is used as the start of a location
/// walk. Cell faces are hints only, they may have been removed from the triangulation in the
/// meantime.
///
/// The grid is created by [DelaunayTriangulation::build_index](crate::DelaunayTriangulation::build_index)
/// and kept up to date by every insertion and removal. Inserting vertices outside of the indexed
/// region grows the region and recomputes all cells, the number of cells stays the same.
#[derive(Debug, Clone)]
pub struct GridIndex {
    region: Rectangle,
    x_cells: usize,
    y_cells: usize,
    cell_width: f64,
    cell_height: f64,
    // Column major
    cells: Vec<FixedFaceHandle>,
}

impl GridIndex {
    pub(crate) fn new(
        mesh: &Mesh,
        anchor: FixedFaceHandle,
        x_cells: usize,
        y_cells: usize,
        region: Rectangle,
    ) -> Self {
        let x_cells = x_cells.max(1);
        let y_cells = y_cells.max(1);
        let mut result = GridIndex {
            region,
            x_cells,
            y_cells,
            cell_width: 0.0,
            cell_height: 0.0,
            cells: vec![anchor; x_cells * y_cells],
        };
        result.rebuild(mesh, anchor);
        result
    }

    /// The indexed region.
    pub fn region(&self) -> Rectangle {
        self.region
    }

    /// The number of cells along the x axis.
    pub fn x_cells(&self) -> usize {
        self.x_cells
    }

    /// The number of cells along the y axis.
    pub fn y_cells(&self) -> usize {
        self.y_cells
    }

    /// The width and height of a single cell.
    pub fn cell_size(&self) -> (f64, f64) {
        (self.cell_width, self.cell_height)
    }

    /// Returns the cell containing `point`.
    ///
    /// Points outside of the region are mapped to the closest border cell.
    pub fn cell(&self, point: Point2<f64>) -> (usize, usize) {
        let lower = self.region.lower();
        (
            cell_coordinate(point.x, lower.x, self.cell_width, self.x_cells),
            cell_coordinate(point.y, lower.y, self.cell_height, self.y_cells),
        )
    }

    /// Returns the face stored for the cell containing `point`.
    pub fn find_cell_face(&self, point: Point2<f64>) -> FixedFaceHandle {
        let (column, row) = self.cell(point);
        self.cells[self.cell_index(column, row)]
    }

    fn cell_index(&self, column: usize, row: usize) -> usize {
        column * self.y_cells + row
    }

    fn cell_center(&self, column: usize, row: usize) -> Point2<f64> {
        let lower = self.region.lower();
        Point2::new(
            lower.x + (column as f64 + 0.5) * self.cell_width,
            lower.y + (row as f64 + 0.5) * self.cell_height,
        )
    }

    fn rebuild(&mut self, mesh: &Mesh, anchor: FixedFaceHandle) {
        self.cell_width = self.region.width() / self.x_cells as f64;
        self.cell_height = self.region.height() / self.y_cells as f64;
        let seed = mesh.walk(self.cell_center(0, 0), anchor);
        self.update_cells(mesh, (0, 0), (self.x_cells - 1, self.y_cells - 1), seed);
    }

    /// Recomputes all cells between `first` and `last` (inclusive).
    ///
    /// The first cell of each column is located from the previous column's first cell, every
    /// other cell from the cell below.
    fn update_cells(
        &mut self,
        mesh: &Mesh,
        first: (usize, usize),
        last: (usize, usize),
        seed: FixedFaceHandle,
    ) {
        let mut column_seed = seed;
        for column in first.0..=last.0 {
            column_seed = mesh.walk(self.cell_center(column, first.1), column_seed);
            let index = self.cell_index(column, first.1);
            self.cells[index] = column_seed;

            let mut row_seed = column_seed;
            for row in first.1 + 1..=last.1 {
                row_seed = mesh.walk(self.cell_center(column, row), row_seed);
                let index = self.cell_index(column, row);
                self.cells[index] = row_seed;
            }
        }
    }

    /// Repairs the index after the faces `changed` have been created or modified.
    pub(crate) fn update(
        &mut self,
        mesh: &Mesh,
        anchor: FixedFaceHandle,
        changed: &[FixedFaceHandle],
    ) {
        let updated_region = Rectangle::from_points(
            changed
                .iter()
                .filter_map(|handle| mesh.get(*handle))
                .flat_map(|face| face.corners()),
        );
        let updated_region = match updated_region {
            Some(region) => region,
            None => return,
        };

        if !self.region.contains_rectangle(&updated_region) {
            self.region.add_rectangle(&updated_region);
            tracing::debug!(
                width = self.region.width(),
                height = self.region.height(),
                "Grid index region grew, recomputing all cells"
            );
            self.rebuild(mesh, anchor);
            return;
        }

        let first = self.cell(updated_region.lower());
        let last = self.cell(updated_region.upper());
        let seed = self.valid_seed(mesh, anchor, first);
        self.update_cells(mesh, first, last, seed);
    }

    // A face next to `cell` that still exists, falls back to a walk from the anchor.
    fn valid_seed(
        &self,
        mesh: &Mesh,
        anchor: FixedFaceHandle,
        (column, row): (usize, usize),
    ) -> FixedFaceHandle {
        let left = column
            .checked_sub(1)
            .map(|left| self.cells[self.cell_index(left, row)]);
        let below = row
            .checked_sub(1)
            .map(|below| self.cells[self.cell_index(column, below)]);

        left.into_iter()
            .chain(below)
            .find(|handle| mesh.contains(*handle))
            .unwrap_or_else(|| mesh.walk(self.cell_center(column, row), anchor))
    }
}

fn cell_coordinate(value: f64, min: f64, size: f64, count: usize) -> usize {
    let index = ((value - min) / size).floor();
    if index.is_nan() || index < 0.0 {
        0
    } else {
        (index as usize).min(count - 1)
    }
}
