//! Вода после роста: открытый океан и внутренние озёра.

use std::collections::VecDeque;

use log::{debug, warn};
use rand::Rng;

use crate::error::MapGenError;
use crate::generator::GenerationContext;
use crate::grid::CellState;
use crate::province::ProvinceId;
use crate::province::graph::Topology;

/// Заливает открытый океан от краёв карты.
///
/// Вся свободная вода, связанная с краем, помечается `DeepOcean`; оставшаяся
/// свободная вода после этого заведомо окружена сушей. Возвращает число клеток океана.
pub fn deepen_ocean(ctx: &mut GenerationContext) -> usize {
    let grid = &mut ctx.grid;
    let width = grid.width as i32;
    let height = grid.height as i32;

    // Очередь для BFS
    let mut queue = VecDeque::new();

    // Все клетки края, которые ещё не суша
    for y in 0..height {
        for x in 0..width {
            if grid.is_border(x, y) && grid.get(x, y) == CellState::Water {
                grid.set(x, y, CellState::DeepOcean);
                queue.push_back((x, y));
            }
        }
    }

    // BFS от краёв
    let mut ocean = 0;
    while let Some((x, y)) = queue.pop_front() {
        ocean += 1;
        for (nx, ny) in grid.neighbors(x, y) {
            if grid.get(nx, ny) == CellState::Water {
                grid.set(nx, ny, CellState::DeepOcean);
                queue.push_back((nx, ny));
            }
        }
    }

    debug!("Открытый океан: {ocean} клеток");
    ocean
}

/// Осушает озёра: каждая оставшаяся клетка воды отходит случайной соседней провинции.
///
/// Клетки в глубине большого озера, у которых пока нет соседей-суши, откладываются до
/// следующего прохода. Новые границы сразу вносятся в граф. Возвращает число осушенных клеток.
pub fn dry_lakes<R: Rng + ?Sized>(
    ctx: &mut GenerationContext,
    topology: &mut Topology,
    rng: &mut R,
) -> Result<usize, MapGenError> {
    let mut pending: Vec<(i32, i32)> = ctx
        .grid
        .cells()
        .filter(|&(_, _, state)| state == CellState::Water)
        .map(|(x, y, _)| (x, y))
        .collect();

    let mut dried = 0;
    while !pending.is_empty() {
        let before = pending.len();
        let mut deferred = Vec::new();
        for (x, y) in pending {
            let mut owners: Vec<ProvinceId> = Vec::with_capacity(6);
            for owner in ctx.grid.neighbor_provinces(x, y) {
                if !owners.contains(&owner) {
                    owners.push(owner);
                }
            }
            if owners.is_empty() {
                deferred.push((x, y));
                continue;
            }

            let owner = owners[rng.gen_range(0..owners.len())];
            ctx.grid.set(x, y, CellState::Land(owner));
            ctx.provinces.get_mut(owner)?.cell_count += 1;
            topology.record_borders(&ctx.grid, (x, y))?;
            dried += 1;
        }

        if deferred.len() == before {
            warn!("{} клеток воды не удалось отдать суше", deferred.len());
            break;
        }
        pending = deferred;
    }

    if dried > 0 {
        debug!("Осушено {dried} клеток озёр");
    }
    Ok(dried)
}
