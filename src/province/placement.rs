//! Расстановка центров провинций через грубую вспомогательную сетку.
//!
//! Центры сначала занимают клетки грубой сетки (шаг `2 × radius`), расползаясь от её
//! середины по соседним клеткам, и только потом проецируются на основную сетку со
//! случайным сдвигом. Так центры остаются примерно равномерно разнесёнными.

use log::{debug, warn};
use rand::Rng;

use crate::generator::GenerationContext;
use crate::hex;
use crate::province::Frontier;
use crate::random::jitter;

/// Сколько неудачных попыток подряд допускается, прежде чем расстановка остановится.
pub const MAX_PLACEMENT_FAILURES: u32 = 10;

/// Желаемое число провинций с разбросом ±5% и ограничением ёмкостью грубой сетки.
pub fn desired_province_count<R: Rng + ?Sized>(
    ctx: &GenerationContext,
    rng: &mut R,
) -> usize {
    let params = &ctx.params;
    let area = f64::from(params.width) * f64::from(params.height);
    let factor: f64 = rng.gen_range(0.95..1.05);
    let raw = area * f64::from(params.land_fraction) / ctx.cells_per_province as f64 * factor;

    let (cw, ch) = params.coarse_dimensions();
    let capacity = (cw * ch) as usize;
    (raw.floor() as usize).min(capacity).max(1)
}

/// Расставляет центры провинций и регистрирует их в арене.
///
/// Возвращает желаемое число провинций; фактическое может оказаться меньше,
/// это не ошибка.
pub fn place_centers<R: Rng + ?Sized>(ctx: &mut GenerationContext, rng: &mut R) -> usize {
    let desired = desired_province_count(ctx, rng);
    let (cw, ch) = ctx.params.coarse_dimensions();
    let (cw, ch) = (cw as i32, ch as i32);
    // Та же целочисленная середина, что и у основной сетки: средняя грубая клетка
    // проецируется ровно в центр #1.
    let coarse_mid = (cw / 2, ch / 2);
    let fine_mid = (ctx.grid.width as i32 / 2, ctx.grid.height as i32 / 2);
    let step = 2 * ctx.params.radius as i32;

    let mut claimed = vec![false; (cw * ch) as usize];
    let mut candidates = Frontier::default();

    // Столица мира: ровно середина грубой сетки, без сдвига.
    claim_coarse(&mut claimed, &mut candidates, (cw, ch), coarse_mid);
    let first = clamp_to_land(ctx, fine_mid);
    ctx.provinces.push(first);

    let mut failures = 0;
    while ctx.provinces.len() < desired && failures < MAX_PLACEMENT_FAILURES {
        let Some(coarse) = candidates.pop_random(rng) else {
            failures += 1;
            continue;
        };

        let fine = (
            step * (coarse.0 - coarse_mid.0) + fine_mid.0 + jitter(rng, -2, 2),
            step * (coarse.1 - coarse_mid.1) + fine_mid.1 + jitter(rng, -2, 2),
        );
        let fine = clamp_to_land(ctx, fine);
        if ctx.provinces.contains_center(fine) {
            failures += 1;
            continue;
        }

        failures = 0;
        claim_coarse(&mut claimed, &mut candidates, (cw, ch), coarse);
        ctx.provinces.push(fine);
    }

    let placed = ctx.provinces.len();
    if placed < desired {
        warn!("Размещено {placed} центров из {desired} желаемых");
    } else {
        debug!("Размещено {placed} центров провинций");
    }
    desired
}

/// Занимает клетку грубой сетки и добавляет её свободных соседей в кандидаты.
fn claim_coarse(
    claimed: &mut [bool],
    candidates: &mut Frontier,
    (cw, ch): (i32, i32),
    (x, y): (i32, i32),
) {
    claimed[(y * cw + x) as usize] = true;
    for (nx, ny) in hex::neighbors(x, y, cw, ch) {
        if !claimed[(ny * cw + nx) as usize] {
            candidates.push((nx, ny));
        }
    }
}

/// Прижимает точку внутрь карты, за пределы внешнего кольца океана.
fn clamp_to_land(ctx: &GenerationContext, (x, y): (i32, i32)) -> (i32, i32) {
    let max_x = (ctx.grid.width as i32 - 2).max(1);
    let max_y = (ctx.grid.height as i32 - 2).max(1);
    (x.clamp(1, max_x), y.clamp(1, max_y))
}
