//! Circular queue pipelining.
//!
//! The interior y range is cut into slabs of `ty` rows. Inside a slab the
//! sweep walks an extended z range, and at every z step each time level
//! advances one plane behind the level below it. Level `l` computes plane
//! `z = k - l + 1` from the three planes of level `l - 1` around it, so a
//! plane of every intermediate level is consumed three z steps after it
//! was produced and only three planes per level stay live.
//!
//! A level `r = steps - l` levels below the top must cover `r` extra rows on
//! each side of the slab. Those rows are recomputed by the neighboring slabs,
//! trading flops for a working set of a few planes.

use crate::domain::*;
use crate::error::*;
use crate::solver::{Evaluator, QueuePlanes};
use crate::stencil::*;
use std::ops::Range;

pub struct CircQueueSolver {
    planes: QueuePlanes,
}

/// Read only plane whose first stored row is `first_row`.
#[derive(Copy, Clone)]
struct PlaneRef<'a> {
    values: &'a [f64],
    first_row: isize,
}

impl<'a> PlaneRef<'a> {
    #[inline(always)]
    fn row(&self, j: usize, nx: usize) -> &'a [f64] {
        let r = (j as isize - self.first_row) as usize;
        &self.values[r * nx..(r + 1) * nx]
    }
}

#[inline(always)]
fn row_mut(
    values: &mut [f64],
    first_row: isize,
    j: usize,
    nx: usize,
) -> &mut [f64] {
    let r = (j as isize - first_row) as usize;
    &mut values[r * nx..(r + 1) * nx]
}

/// Update rows `rows` of one plane, interior columns only.
/// `src` holds planes `z - 1`, `z` and `z + 1` of the previous level.
fn update_rows(
    stencil: &HeatStencil,
    src: &[PlaneRef; 3],
    dst: &mut [f64],
    dst_first_row: isize,
    rows: Range<usize>,
    nx: usize,
) {
    for j in rows {
        let below = src[0].row(j, nx);
        let above = src[2].row(j, nx);
        let prev = src[1].row(j - 1, nx);
        let next = src[1].row(j + 1, nx);
        let centre = src[1].row(j, nx);
        let out = row_mut(dst, dst_first_row, j, nx);
        for i in 1..nx - 1 {
            let args = [
                below[i],
                above[i],
                prev[i],
                next[i],
                centre[i - 1],
                centre[i + 1],
                centre[i],
            ];
            out[i] = stencil.apply(&args);
        }
    }
}

/// Bring the ghost cells a queue plane holds up to date from the grid plane.
/// That is the edge columns of the computed rows, and the edge rows when the
/// plane reaches past the domain.
fn copy_ghosts(
    grid_plane: &[f64],
    dst: &mut [f64],
    dst_first_row: isize,
    rows: Range<usize>,
    nx: usize,
    ny: usize,
) {
    for j in rows {
        let src = &grid_plane[j * nx..(j + 1) * nx];
        let out = row_mut(dst, dst_first_row, j, nx);
        out[0] = src[0];
        out[nx - 1] = src[nx - 1];
    }
    let held = dst_first_row..dst_first_row + (dst.len() / nx) as isize;
    for j in [0, ny - 1] {
        if held.contains(&(j as isize)) {
            row_mut(dst, dst_first_row, j, nx)
                .copy_from_slice(&grid_plane[j * nx..(j + 1) * nx]);
        }
    }
}

impl CircQueueSolver {
    pub fn new(planes: QueuePlanes) -> Self {
        CircQueueSolver { planes }
    }

    /// Allocate fresh planes for one `(nx, ty, steps)` run.
    pub fn for_run(nx: usize, ty: usize, steps: usize) -> Self {
        Self::new(QueuePlanes::new(nx, ty, steps))
    }

    /// Rows `[lo, hi)` that level `level` computes for the slab starting at
    /// row `a`.
    fn level_rows(&self, a: usize, level: usize, ny: usize) -> Range<usize> {
        let reach = self.planes.steps() - level;
        let lo = a.saturating_sub(reach).max(1);
        let hi = (a + self.planes.ty() + reach).min(ny - 1);
        lo..hi
    }

    fn sweep_slab(
        &mut self,
        stencil: &HeatStencil,
        input: &Grid,
        output: &mut Grid,
        a: usize,
    ) {
        profiling::scope!("circ_queue_slab");
        let [nx, ny, nz] = input.dims();
        let steps = self.planes.steps();
        self.planes.reset_rotation();

        for k in 1..nz + steps - 2 {
            let rotation = self.planes.rotation();
            for level in 1..=steps {
                if k < level {
                    break;
                }
                let z = k + 1 - level;
                if z > nz - 2 {
                    continue;
                }
                let rows = self.level_rows(a, level, ny);
                let reach = (steps - level) as isize;

                let (done, rest) =
                    self.planes.levels_mut().split_at_mut(level - 1);
                let prev_level = if level >= 2 {
                    Some(&done[level - 2])
                } else {
                    None
                };
                let prev_first_row = a as isize - reach - 1;
                let src: [PlaneRef; 3] = std::array::from_fn(|role| {
                    let p = z + role - 1;
                    match prev_level {
                        Some(queue) if p != 0 && p != nz - 1 => PlaneRef {
                            values: &queue[rotation[role]],
                            first_row: prev_first_row,
                        },
                        _ => PlaneRef {
                            values: input.plane(p),
                            first_row: 0,
                        },
                    }
                });

                if level == steps {
                    let dst = output.plane_mut(z);
                    update_rows(stencil, &src, dst, 0, rows, nx);
                } else {
                    let dst = rest[0][rotation[2]].as_mut_slice();
                    let first_row = a as isize - reach;
                    let ghosts = rows.clone();
                    copy_ghosts(input.plane(z), dst, first_row, ghosts, nx, ny);
                    update_rows(stencil, &src, dst, first_row, rows, nx);
                }
            }
            self.planes.rotate();
        }
    }
}

impl Evaluator for CircQueueSolver {
    fn name(&self) -> &'static str {
        "circ_queue"
    }

    fn apply(&mut self, grids: &mut GridPair, steps: usize) -> Result<()> {
        profiling::scope!("circ_queue_apply");
        if steps == 0 {
            return Ok(());
        }
        let [nx, ny, _] = grids.dims();
        let ty = self.planes.ty();
        if ty == 0 || (ny - 2) % ty != 0 {
            return Err(StencilError::SlabDivisibility {
                interior: ny - 2,
                ty,
            });
        }
        if !self.planes.matches(nx, ty, steps) {
            return Err(StencilError::QueueMismatch {
                built: self.planes.shape(),
                wanted: [nx, ty, steps],
            });
        }

        let stencil = HeatStencil::from_grid(grids.input());
        let slabs = (ny - 2) / ty;
        tracing::debug!(
            dims = ?grids.dims(),
            ty,
            slabs,
            levels = self.planes.level_count(),
            queue_bytes = self.planes.byte_size(),
            steps,
            "circular queue sweep"
        );
        {
            let (input, output) = grids.input_output();
            for slab in 0..slabs {
                self.sweep_slab(&stencil, input, output, 1 + slab * ty);
            }
        }

        // The sweep always finishes in the output buffer.
        if steps % 2 == 0 {
            let (output, input) = grids.step_buffers(1);
            input.copy_interior_from(output)?;
        }
        Ok(())
    }
}
