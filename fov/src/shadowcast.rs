/// Slack added to the radius when testing whether a cell is in range, keeps
/// cells right at the edge of the circle from flickering in and out.
pub const RADIUS_FUDGE: f32 = 1.0 / 3.0;

/// Quadrant sign pairs, each scanned in a vertical and a horizontal octant.
const QUADRANTS: [(i32, i32); 4] = [(1, 1), (1, -1), (-1, -1), (-1, 1)];

/// How many of a cell's three angle samples must be unobstructed for the
/// cell to be visible.
#[derive(Copy, Clone, Default, Eq, PartialEq, Debug)]
pub enum Restrictiveness {
    /// Any single sample will do.
    Permissive,
    /// Center sample and at least one of the edge samples.
    #[default]
    Default,
    /// All three samples.
    Strict,
}

/// Field-of-view tunables.
#[derive(Copy, Clone, Eq, PartialEq, Debug)]
pub struct Config {
    pub restrictiveness: Restrictiveness,
    /// Cells that fail the visibility test cast shadows like walls do.
    pub not_visible_blocks_vision: bool,
    /// Obstructions are open intervals, an angle sample that lands exactly
    /// on an obstruction edge still counts as visible.
    pub visible_on_equal: bool,
}

impl Default for Config {
    fn default() -> Self {
        Config {
            restrictiveness: Default::default(),
            not_visible_blocks_vision: true,
            visible_on_equal: true,
        }
    }
}

/// Compute visible cells with the default configuration.
///
/// See [`Config::visible_cells`].
pub fn calc_visible_cells_from<V>(
    origin: V,
    radius: i32,
    is_transparent: impl FnMut(V) -> bool,
) -> Vec<V>
where
    V: From<[i32; 2]> + Into<[i32; 2]> + Copy,
{
    Config::default().visible_cells(origin, radius, is_transparent)
}

impl Config {
    /// Return the cells visible from `origin` within `radius`.
    ///
    /// The origin cell is always included. `is_transparent` is called for
    /// every cell the scan reaches, so it should be cheap and must not have
    /// side effects that affect later calls. Cells are returned sorted by
    /// x, then y, without duplicates.
    pub fn visible_cells<V>(
        &self,
        origin: V,
        radius: i32,
        mut is_transparent: impl FnMut(V) -> bool,
    ) -> Vec<V>
    where
        V: From<[i32; 2]> + Into<[i32; 2]> + Copy,
    {
        let origin: [i32; 2] = origin.into();
        let mut is_transparent = |p: [i32; 2]| is_transparent(V::from(p));

        let mut cells = vec![origin];
        for dir in QUADRANTS {
            for orientation in [Orientation::Vertical, Orientation::Horizontal]
            {
                self.scan_octant(
                    &mut cells,
                    origin,
                    dir,
                    orientation,
                    radius,
                    &mut is_transparent,
                );
            }
        }

        // Octants share their diagonal and axis edges.
        cells.sort_unstable();
        cells.dedup();
        cells.into_iter().map(V::from).collect()
    }

    fn scan_octant(
        &self,
        cells: &mut Vec<[i32; 2]>,
        origin: [i32; 2],
        dir: (i32, i32),
        orientation: Orientation,
        radius: i32,
        is_transparent: &mut dyn FnMut([i32; 2]) -> bool,
    ) {
        let mut shadows = Shadows::default();
        let mut iteration = 1;

        while iteration <= radius && !shadows.is_total() {
            // Shadows cast on this row only apply from the next row on.
            let mut row_shadows = Vec::new();

            for step in 0..=iteration {
                let cell = orientation.cell_at(origin, dir, step, iteration);
                if !in_radius(origin, cell, radius) {
                    continue;
                }

                let angles = CellAngles::new(step, iteration);
                if self.is_visible(&angles, &shadows) {
                    cells.push(cell);
                    if !is_transparent(cell) {
                        row_shadows.push(angles.span());
                    }
                } else if self.not_visible_blocks_vision {
                    row_shadows.push(angles.span());
                }
            }

            for o in row_shadows {
                shadows.insert(o);
            }
            iteration += 1;
        }
    }

    fn is_visible(&self, cell: &CellAngles, shadows: &Shadows) -> bool {
        let open = self.visible_on_equal;
        let near = !shadows.occludes(cell.near, open);
        let center = !shadows.occludes(cell.center, open);
        let far = !shadows.occludes(cell.far, open);

        match self.restrictiveness {
            Restrictiveness::Permissive => near || center || far,
            Restrictiveness::Default => center && (near || far),
            Restrictiveness::Strict => near && center && far,
        }
    }
}

fn in_radius(origin: [i32; 2], cell: [i32; 2], radius: i32) -> bool {
    let (dx, dy) = ((cell[0] - origin[0]) as f32, (cell[1] - origin[1]) as f32);
    (dx * dx + dy * dy).sqrt() <= radius as f32 + RADIUS_FUDGE
}

#[derive(Copy, Clone, Eq, PartialEq, Debug)]
enum Orientation {
    /// Rows advance along the y axis.
    Vertical,
    /// Rows advance along the x axis.
    Horizontal,
}

impl Orientation {
    fn cell_at(
        self,
        [x, y]: [i32; 2],
        (dx, dy): (i32, i32),
        step: i32,
        iteration: i32,
    ) -> [i32; 2] {
        match self {
            Orientation::Vertical => [x + step * dx, y + iteration * dy],
            Orientation::Horizontal => [x + iteration * dx, y + step * dy],
        }
    }
}

/// Angular slice of a cell within its octant row, values in [0, 1].
#[derive(Copy, Clone, PartialEq, Debug)]
struct CellAngles {
    near: f32,
    center: f32,
    far: f32,
}

impl CellAngles {
    fn new(step: i32, iteration: i32) -> Self {
        // Divide instead of multiplying by the slice width so the row ends
        // land exactly on 0.0 and 1.0.
        let n = (iteration + 1) as f32;
        let step = step as f32;
        CellAngles {
            near: step / n,
            center: (step + 0.5) / n,
            far: (step + 1.0) / n,
        }
    }

    fn span(&self) -> Obstruction {
        Obstruction {
            near: self.near,
            far: self.far,
        }
    }
}

#[derive(Copy, Clone, PartialEq, Debug)]
struct Obstruction {
    near: f32,
    far: f32,
}

impl Obstruction {
    fn contains(&self, angle: f32, open: bool) -> bool {
        if open {
            self.near < angle && angle < self.far
        } else {
            self.near <= angle && angle <= self.far
        }
    }

    /// Overlapping or adjacent.
    fn touches(&self, other: &Obstruction) -> bool {
        self.near <= other.far && other.near <= self.far
    }
}

/// Disjoint, non-adjacent obstruction intervals.
#[derive(Clone, Default, Debug)]
struct Shadows(Vec<Obstruction>);

impl Shadows {
    fn insert(&mut self, mut o: Obstruction) {
        self.0.retain(|a| {
            if a.touches(&o) {
                o.near = o.near.min(a.near);
                o.far = o.far.max(a.far);
                false
            } else {
                true
            }
        });
        self.0.push(o);
    }

    fn is_total(&self) -> bool {
        matches!(self.0.as_slice(), [o] if o.near <= 0.0 && o.far >= 1.0)
    }

    fn occludes(&self, angle: f32, open: bool) -> bool {
        self.0.iter().any(|o| o.contains(angle, open))
    }
}
