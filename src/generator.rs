//! Полный конвейер генерации карты.
//!
//! Все рабочие буферы (сетка, фронтиры, матрица расстояний) живут в
//! [`GenerationContext`], который создаётся заново на каждый вызов и передаётся
//! по фазам явно:
//!
//! 1. расстановка центров на грубой сетке;
//! 2. рост провинций;
//! 3. граф соседства и матрица расстояний;
//! 4. подключение островов;
//! 5. заливка океана и осушение озёр;
//! 6. столицы, расширения, форпосты и обычные провинции вместе с именами.

use log::info;
use rand::{Rng, SeedableRng};
use serde::{Deserialize, Serialize};

use crate::capitals::assign_provinces;
use crate::config::MapGenerationParams;
use crate::error::MapGenError;
use crate::grid::CellGrid;
use crate::names::Namer;
use crate::province::graph::{Topology, UNREACHABLE};
use crate::province::growth::grow_provinces;
use crate::province::placement::place_centers;
use crate::province::repair::connect_islands;
use crate::province::water::{deepen_ocean, dry_lakes};
use crate::province::{MapCell, Province, ProvinceArena, ProvinceId};
use crate::templates::TemplatePool;

/// Рабочее состояние одного запуска генерации.
#[derive(Debug, Clone)]
pub struct GenerationContext {
    pub params: MapGenerationParams,
    pub cells_per_province: usize,
    pub grid: CellGrid,
    pub provinces: ProvinceArena,
}

impl GenerationContext {
    #[must_use]
    pub fn new(params: MapGenerationParams) -> Self {
        Self {
            cells_per_province: params.cells_per_province(),
            grid: CellGrid::new(params.width, params.height),
            provinces: ProvinceArena::default(),
            params,
        }
    }
}

/// Сводка по одному запуску генерации.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct GenerationReport {
    pub seed: u64,
    pub desired_provinces: usize,
    pub placed_provinces: usize,
    pub islands_repaired: usize,
    /// провинции, так и не связанные с провинцией #1
    pub unreachable_provinces: usize,
    pub ocean_cells: usize,
    pub dried_lake_cells: usize,
}

/// Готовая карта: провинции по возрастанию id и клетки суши.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GeneratedMap {
    pub width: u32,
    pub height: u32,
    pub provinces: Vec<Province>,
    pub cells: Vec<MapCell>,
    pub report: GenerationReport,
}

impl GeneratedMap {
    #[must_use]
    pub fn province(&self, id: ProvinceId) -> Option<&Province> {
        let index = id.index(self.provinces.len()).ok()?;
        self.provinces.get(index)
    }

    /// Расстояние между провинциями в переходах; `None`, если пути нет.
    #[must_use]
    pub fn distance(&self, a: ProvinceId, b: ProvinceId) -> Option<u32> {
        let index = b.index(self.provinces.len()).ok()?;
        self.province(a)?.distances.get(index).copied().flatten()
    }
}

/// Генерирует карту, используя `ChaCha8Rng` с сидом из параметров.
pub fn generate_map(
    params: &MapGenerationParams,
    templates: &TemplatePool,
    names: Vec<String>,
) -> Result<GeneratedMap, MapGenError> {
    let mut rng = rand_chacha::ChaCha8Rng::seed_from_u64(params.seed);
    generate_map_with_rng(params, templates, names, &mut rng)
}

/// Генерирует карту с внешним генератором случайных чисел.
///
/// Генератор потребляется строго последовательно, поэтому одинаковые входные данные и
/// одинаковое состояние генератора дают одинаковую карту.
pub fn generate_map_with_rng<R: Rng + ?Sized>(
    params: &MapGenerationParams,
    templates: &TemplatePool,
    names: Vec<String>,
    rng: &mut R,
) -> Result<GeneratedMap, MapGenError> {
    params.validate()?;
    templates.validate()?;

    let mut ctx = GenerationContext::new(params.clone());
    let mut report = GenerationReport {
        seed: params.seed,
        ..Default::default()
    };

    report.desired_provinces = place_centers(&mut ctx, rng);
    report.placed_provinces = ctx.provinces.len();

    grow_provinces(&mut ctx, rng)?;

    let mut topology = Topology::build(&ctx.grid, ctx.provinces.len())?;
    report.islands_repaired = connect_islands(&mut ctx, &mut topology, rng)?.repaired;
    report.ocean_cells = deepen_ocean(&mut ctx);
    report.dried_lake_cells = dry_lakes(&mut ctx, &mut topology, rng)?;
    report.unreachable_provinces = ctx
        .provinces
        .ids()
        .filter(|&id| !topology.distances.is_reachable(ProvinceId::WORLD_CENTER, id))
        .count();

    let mut namer = Namer::new(names);
    let assignments = assign_provinces(
        &ctx.provinces,
        &topology.distances,
        templates,
        &mut namer,
        rng,
    )?;

    let mut provinces = Vec::with_capacity(assignments.len());
    for (growth, assignment) in ctx.provinces.iter().zip(assignments) {
        let template = templates
            .instantiate(assignment.template)
            .ok_or(MapGenError::TemplatePoolTooSmall {
                len: templates.len(),
                required: assignment.template + 1,
            })?;
        let distances = topology
            .distances
            .row(growth.id)?
            .iter()
            .map(|&d| (d != UNREACHABLE).then_some(d))
            .collect();

        provinces.push(Province {
            id: growth.id,
            name: assignment.name,
            role: assignment.role,
            faction: assignment.faction,
            archetype: template.archetype,
            attributes: template.attributes,
            center: growth.center,
            cell_count: growth.cell_count,
            neighbors: topology.graph.neighbors(growth.id)?,
            distances,
        });
    }

    let cells: Vec<MapCell> = ctx
        .grid
        .cells()
        .filter_map(|(x, y, state)| state.province().map(|province| MapCell { x, y, province }))
        .collect();

    info!(
        "Карта {}×{}: {} провинций, {} клеток суши",
        params.width,
        params.height,
        provinces.len(),
        cells.len()
    );

    Ok(GeneratedMap {
        width: params.width,
        height: params.height,
        provinces,
        cells,
        report,
    })
}
