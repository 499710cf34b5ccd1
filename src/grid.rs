//! Клеточная сетка карты: кому принадлежит каждая гекс-клетка.

use crate::hex;
use crate::province::ProvinceId;

/// Состояние клетки во время генерации.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CellState {
    /// Ещё не занятая клетка (вода до окончания генерации)
    Water,
    /// Открытый океан, достижимый от краёв карты
    DeepOcean,
    Land(ProvinceId),
}

impl CellState {
    /// Клетка свободна для захвата (вода любого вида).
    #[must_use]
    pub fn is_unclaimed(self) -> bool {
        !matches!(self, CellState::Land(_))
    }

    #[must_use]
    pub fn province(self) -> Option<ProvinceId> {
        match self {
            CellState::Land(id) => Some(id),
            _ => None,
        }
    }
}

/// Двумерная гекс-сетка, хранится построчно.
#[derive(Debug, Clone)]
pub struct CellGrid {
    pub width: u32,
    pub height: u32,
    pub data: Vec<CellState>,
}

impl CellGrid {
    pub fn new(width: u32, height: u32) -> Self {
        Self {
            width,
            height,
            data: vec![CellState::Water; (width * height) as usize],
        }
    }

    #[must_use]
    pub fn in_bounds(&self, x: i32, y: i32) -> bool {
        x >= 0 && y >= 0 && x < self.width as i32 && y < self.height as i32
    }

    /// Клетку можно занять сушей: внешнее кольцо карты всегда остаётся океаном.
    #[must_use]
    pub fn is_claimable(&self, x: i32, y: i32) -> bool {
        x >= 1 && y >= 1 && x < self.width as i32 - 1 && y < self.height as i32 - 1
    }

    #[must_use]
    pub fn is_border(&self, x: i32, y: i32) -> bool {
        self.in_bounds(x, y)
            && (x == 0 || y == 0 || x == self.width as i32 - 1 || y == self.height as i32 - 1)
    }

    fn index(&self, x: i32, y: i32) -> usize {
        y as usize * self.width as usize + x as usize
    }

    /// Состояние клетки; за пределами карты возвращается `DeepOcean`.
    #[must_use]
    pub fn get(&self, x: i32, y: i32) -> CellState {
        if self.in_bounds(x, y) {
            self.data[self.index(x, y)]
        } else {
            CellState::DeepOcean
        }
    }

    /// Записывает состояние клетки; `false`, если клетка вне карты и запись отклонена.
    pub fn set(&mut self, x: i32, y: i32, state: CellState) -> bool {
        if !self.in_bounds(x, y) {
            return false;
        }
        let idx = self.index(x, y);
        self.data[idx] = state;
        true
    }

    pub fn neighbors(&self, x: i32, y: i32) -> impl Iterator<Item = (i32, i32)> + use<> {
        hex::neighbors(x, y, self.width as i32, self.height as i32)
    }

    /// Провинции соседних клеток (с повторами, в порядке обхода соседей).
    pub fn neighbor_provinces(&self, x: i32, y: i32) -> impl Iterator<Item = ProvinceId> + '_ {
        self.neighbors(x, y)
            .filter_map(move |(nx, ny)| self.get(nx, ny).province())
    }

    /// Все клетки сетки вместе с координатами.
    pub fn cells(&self) -> impl Iterator<Item = (i32, i32, CellState)> + '_ {
        let width = self.width as usize;
        self.data
            .iter()
            .enumerate()
            .map(move |(i, &state)| ((i % width) as i32, (i / width) as i32, state))
    }

    #[must_use]
    pub fn count(&self, state: CellState) -> usize {
        self.data.iter().filter(|&&s| s == state).count()
    }
}
