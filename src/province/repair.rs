//! Подключение островных провинций к материку.
//!
//! Провинция, недостижимая из столицы мира, достраивается несколькими клетками в
//! сторону центра карты в надежде коснуться соседа. Не вышло: остаётся островом.

use log::debug;
use rand::Rng;

use crate::error::MapGenError;
use crate::generator::GenerationContext;
use crate::province::ProvinceId;
use crate::province::graph::Topology;
use crate::province::growth::claim_cell;

/// Сколько успешных захватов делает одна островная провинция.
pub const ISLAND_REPAIR_CLAIMS: usize = 3;

/// Итог ремонта островов.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct IslandRepair {
    pub repaired: usize,
    pub remaining: usize,
}

fn distance_sq((ax, ay): (i32, i32), (bx, by): (i32, i32)) -> i64 {
    let dx = i64::from(ax - bx);
    let dy = i64::from(ay - by);
    dx * dx + dy * dy
}

/// Пытается связать с провинцией #1 каждую недостижимую из неё провинцию.
///
/// Принимаются только клетки фронтира, которые не дальше от центра карты, чем центр
/// самой провинции. Каждая занятая клетка сразу проверяется на новые границы.
pub fn connect_islands<R: Rng + ?Sized>(
    ctx: &mut GenerationContext,
    topology: &mut Topology,
    rng: &mut R,
) -> Result<IslandRepair, MapGenError> {
    let mut report = IslandRepair::default();
    let map_center = (ctx.grid.width as i32 / 2, ctx.grid.height as i32 / 2);

    for id in ctx.provinces.ids().skip(1) {
        if topology.distances.is_reachable(ProvinceId::WORLD_CENTER, id) {
            continue;
        }

        let limit = distance_sq(ctx.provinces.get(id)?.center, map_center);
        let mut claims = 0;
        while claims < ISLAND_REPAIR_CLAIMS {
            let Some(cell) = ctx.provinces.get_mut(id)?.frontier.pop_random(rng) else {
                debug!("Провинция {id}: фронтир исчерпан после {claims} захватов");
                break;
            };
            if !ctx.grid.is_claimable(cell.0, cell.1)
                || !ctx.grid.get(cell.0, cell.1).is_unclaimed()
                || distance_sq(cell, map_center) > limit
            {
                continue;
            }

            claim_cell(ctx, id, cell, true)?;
            topology.record_borders(&ctx.grid, cell)?;
            claims += 1;
        }

        if topology.distances.is_reachable(ProvinceId::WORLD_CENTER, id) {
            report.repaired += 1;
        } else {
            debug!("Провинция {id} остаётся островом");
            report.remaining += 1;
        }
    }

    Ok(report)
}
