pub mod graph;
pub mod growth;
pub mod placement;
pub mod repair;
pub mod water;

use std::collections::{BTreeMap, HashSet};
use std::fmt;

use rand::Rng;
use serde::{Deserialize, Serialize};

use crate::capitals::Faction;
use crate::error::MapGenError;

/// Идентификатор провинции: плотные числа `1..=N`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ProvinceId(u32);

impl ProvinceId {
    /// Центральная провинция мира ("столица мира").
    pub const WORLD_CENTER: ProvinceId = ProvinceId(1);

    #[must_use]
    pub const fn new(raw: u32) -> Self {
        Self(raw)
    }

    #[must_use]
    pub const fn get(self) -> u32 {
        self.0
    }

    #[must_use]
    pub fn from_index(index: usize) -> Self {
        Self(index as u32 + 1)
    }

    /// Индекс в арене; id вне `1..=count` отклоняется.
    pub fn index(self, count: usize) -> Result<usize, MapGenError> {
        if self.0 == 0 || self.0 as usize > count {
            return Err(MapGenError::ProvinceOutOfRange { id: self.0, count });
        }
        Ok(self.0 as usize - 1)
    }
}

impl fmt::Display for ProvinceId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{}", self.0)
    }
}

/// Фронтир роста: клетки, граничащие с территорией провинции. Без повторов.
#[derive(Debug, Clone, Default)]
pub struct Frontier {
    cells: Vec<(i32, i32)>,
    members: HashSet<(i32, i32)>,
}

impl Frontier {
    /// Добавляет клетку; `false`, если она уже во фронтире.
    pub fn push(&mut self, cell: (i32, i32)) -> bool {
        if self.members.insert(cell) {
            self.cells.push(cell);
            true
        } else {
            false
        }
    }

    #[must_use]
    pub fn contains(&self, cell: (i32, i32)) -> bool {
        self.members.contains(&cell)
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.cells.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.cells.is_empty()
    }

    /// Извлекает случайную клетку; она покидает фронтир при любом исходе захвата.
    pub fn pop_random<R: Rng + ?Sized>(&mut self, rng: &mut R) -> Option<(i32, i32)> {
        if self.cells.is_empty() {
            return None;
        }
        let cell = self.cells.swap_remove(rng.gen_range(0..self.cells.len()));
        self.members.remove(&cell);
        Some(cell)
    }

    pub fn iter(&self) -> impl Iterator<Item = (i32, i32)> + '_ {
        self.cells.iter().copied()
    }
}

/// Провинция на этапе генерации.
#[derive(Debug, Clone)]
pub struct GrowthProvince {
    pub id: ProvinceId,
    pub center: (i32, i32),
    pub frontier: Frontier,
    pub cell_count: usize,
    pub target: usize,
}

impl GrowthProvince {
    /// Провинция ещё растёт: цель не достигнута и фронтир не пуст.
    #[must_use]
    pub fn is_growing(&self) -> bool {
        self.cell_count < self.target && !self.frontier.is_empty()
    }
}

/// Арена провинций, адресуемая только через [`ProvinceId`].
#[derive(Debug, Clone, Default)]
pub struct ProvinceArena {
    provinces: Vec<GrowthProvince>,
}

impl ProvinceArena {
    /// Регистрирует новую провинцию с центром `center`; id выдаются подряд с 1.
    pub fn push(&mut self, center: (i32, i32)) -> ProvinceId {
        let id = ProvinceId::from_index(self.provinces.len());
        self.provinces.push(GrowthProvince {
            id,
            center,
            frontier: Frontier::default(),
            cell_count: 0,
            target: 0,
        });
        id
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.provinces.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.provinces.is_empty()
    }

    pub fn get(&self, id: ProvinceId) -> Result<&GrowthProvince, MapGenError> {
        Ok(&self.provinces[id.index(self.provinces.len())?])
    }

    pub fn get_mut(&mut self, id: ProvinceId) -> Result<&mut GrowthProvince, MapGenError> {
        let idx = id.index(self.provinces.len())?;
        Ok(&mut self.provinces[idx])
    }

    pub fn ids(&self) -> impl Iterator<Item = ProvinceId> + use<> {
        (0..self.provinces.len()).map(ProvinceId::from_index)
    }

    pub fn iter(&self) -> impl Iterator<Item = &GrowthProvince> {
        self.provinces.iter()
    }

    pub fn iter_mut(&mut self) -> impl Iterator<Item = &mut GrowthProvince> {
        self.provinces.iter_mut()
    }

    #[must_use]
    pub fn contains_center(&self, cell: (i32, i32)) -> bool {
        self.provinces.iter().any(|p| p.center == cell)
    }
}

/// Роль провинции в стартовой раскладке.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum ProvinceRole {
    WorldCenter,
    Capital,
    Expansion,
    Outpost,
    Generic,
}

/// Итоговая провинция.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Province {
    pub id: ProvinceId,
    pub name: String,
    pub role: ProvinceRole,
    pub faction: Option<Faction>,
    pub archetype: String,
    /// копия атрибутов шаблона
    pub attributes: BTreeMap<String, i64>,
    pub center: (i32, i32),
    pub cell_count: usize,
    pub neighbors: Vec<ProvinceId>,
    /// расстояние (в переходах между провинциями) до каждой провинции, `None` = недостижима
    pub distances: Vec<Option<u32>>,
}

/// Клетка суши в итоговой карте.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct MapCell {
    pub x: i32,
    pub y: i32,
    pub province: ProvinceId,
}
