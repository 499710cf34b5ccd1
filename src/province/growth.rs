//! Рост провинций от центров по клеткам.
//!
//! Все провинции растут синхронными раундами: за раунд каждая растущая провинция
//! вынимает одну случайную клетку фронтира и занимает её, если клетку ещё никто не
//! успел забрать. Проигравшая провинция просто пробует другую клетку в следующем раунде.

use log::{debug, trace};
use rand::Rng;

use crate::error::MapGenError;
use crate::generator::GenerationContext;
use crate::grid::{CellGrid, CellState};
use crate::province::{GrowthProvince, ProvinceId};
use crate::random::jitter;

/// Центр лежит не ближе `3 × radius` клеток к любому краю карты.
#[must_use]
pub fn is_interior(ctx: &GenerationContext, (x, y): (i32, i32)) -> bool {
    let margin = 3 * ctx.params.radius as i32;
    let (w, h) = (ctx.grid.width as i32, ctx.grid.height as i32);
    x >= margin && y >= margin && w - 1 - x >= margin && h - 1 - y >= margin
}

/// Назначает каждой провинции целевой размер.
///
/// Внутренние провинции получают надбавку: краевые теряют часть площади на
/// непроходимом кольце океана вдоль границы карты.
pub fn assign_targets<R: Rng + ?Sized>(ctx: &mut GenerationContext, rng: &mut R) {
    let base = ctx.cells_per_province as i32;
    let interior: Vec<bool> = ctx
        .provinces
        .iter()
        .map(|p| is_interior(ctx, p.center))
        .collect();

    for (province, interior) in ctx.provinces.iter_mut().zip(interior) {
        let mut target = base + jitter(rng, -4, 6);
        if interior {
            target += jitter(rng, 4, 10);
        }
        province.target = target.max(1) as usize;
    }
}

/// Число соседей клетки, уже принадлежащих провинции `id`.
#[must_use]
pub fn same_province_neighbors(grid: &CellGrid, (x, y): (i32, i32), id: ProvinceId) -> usize {
    grid.neighbor_provinces(x, y).filter(|&n| n == id).count()
}

/// Занимает клетку за провинцией и пополняет её фронтир.
///
/// В строгом режиме кандидат попадает во фронтир, только если уже граничит
/// минимум с двумя клетками провинции: так растущий "отросток" не вытягивается змейкой.
pub fn claim_cell(
    ctx: &mut GenerationContext,
    id: ProvinceId,
    (x, y): (i32, i32),
    strict: bool,
) -> Result<(), MapGenError> {
    let GenerationContext {
        grid, provinces, ..
    } = ctx;
    let province = provinces.get_mut(id)?;

    grid.set(x, y, CellState::Land(id));
    province.cell_count += 1;
    trace!("Провинция {id} заняла клетку ({x}, {y})");

    extend_frontier(grid, province, (x, y), strict);
    Ok(())
}

fn extend_frontier(grid: &CellGrid, province: &mut GrowthProvince, (x, y): (i32, i32), strict: bool) {
    for (nx, ny) in grid.neighbors(x, y) {
        if !grid.is_claimable(nx, ny)
            || !grid.get(nx, ny).is_unclaimed()
            || province.frontier.contains((nx, ny))
        {
            continue;
        }
        if strict && same_province_neighbors(grid, (nx, ny), province.id) < 2 {
            continue;
        }
        province.frontier.push((nx, ny));
    }
}

/// Выращивает все провинции до целевых размеров (или до исчерпания фронтира).
pub fn grow_provinces<R: Rng + ?Sized>(
    ctx: &mut GenerationContext,
    rng: &mut R,
) -> Result<(), MapGenError> {
    assign_targets(ctx, rng);

    let centers: Vec<(ProvinceId, (i32, i32))> =
        ctx.provinces.iter().map(|p| (p.id, p.center)).collect();
    for (id, center) in centers {
        claim_cell(ctx, id, center, false)?;
    }

    // Граница раундов общая для всех: самая большая цель среди провинций.
    let max_target = ctx.provinces.iter().map(|p| p.target).max().unwrap_or(0);
    let mut rounds = 0;
    for _ in 0..max_target {
        let mut active = false;
        for id in ctx.provinces.ids() {
            let province = ctx.provinces.get_mut(id)?;
            if !province.is_growing() {
                continue;
            }
            active = true;
            let Some(cell) = province.frontier.pop_random(rng) else {
                continue;
            };
            if ctx.grid.get(cell.0, cell.1).is_unclaimed() {
                claim_cell(ctx, id, cell, false)?;
            }
        }
        if !active {
            break;
        }
        rounds += 1;
    }

    let stalled = ctx
        .provinces
        .iter()
        .filter(|p| p.cell_count < p.target)
        .count();
    debug!(
        "Рост завершён за {rounds} раундов, {stalled} провинций упёрлись в исчерпанный фронтир"
    );
    Ok(())
}
