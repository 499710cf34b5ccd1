//! Граф смежности провинций и матрица кратчайших расстояний между ними.
//!
//! Построение идёт в две фазы: сначала по готовой сетке собираются все прямые
//! границы, затем один проход релаксации заполняет матрицу расстояний. Рёбра,
//! появившиеся позже (при ремонте топологии), вносятся инкрементально.

use std::collections::HashSet;

use log::{debug, error};
use petgraph::graph::{NodeIndex, UnGraph};
#[cfg(feature = "parallel")]
use rayon::prelude::*;

use crate::error::MapGenError;
use crate::grid::CellGrid;
use crate::province::ProvinceId;

/// Расстояние между провинциями, между которыми нет пути.
pub const UNREACHABLE: u32 = u32::MAX;

/// Неориентированный граф соседства провинций.
#[derive(Debug, Clone)]
pub struct ProvinceGraph {
    graph: UnGraph<ProvinceId, ()>,
    nodes: Vec<NodeIndex>,
    edges: HashSet<(ProvinceId, ProvinceId)>,
}

impl ProvinceGraph {
    /// Граф из `count` изолированных провинций `1..=count`.
    #[must_use]
    pub fn new(count: usize) -> Self {
        let mut graph = UnGraph::with_capacity(count, count * 3);
        let nodes = (0..count)
            .map(|i| graph.add_node(ProvinceId::from_index(i)))
            .collect();
        Self {
            graph,
            nodes,
            edges: HashSet::new(),
        }
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }

    #[must_use]
    pub fn edge_count(&self) -> usize {
        self.edges.len()
    }

    /// Отмечает провинции соседями. Возвращает `true`, если ребро новое.
    ///
    /// Соседство провинции с самой собой и id вне `1..=N` означают испорченную
    /// сетку и считаются фатальными.
    pub fn mark_adjacent(&mut self, a: ProvinceId, b: ProvinceId) -> Result<bool, MapGenError> {
        let count = self.len();
        let (ia, ib) = match (a.index(count), b.index(count)) {
            (Ok(ia), Ok(ib)) => (ia, ib),
            (Err(err), _) | (_, Err(err)) => {
                error!("Попытка связать провинции {a} и {b}: {err}");
                return Err(err);
            }
        };
        if a == b {
            error!("Провинция {a} не может граничить сама с собой");
            return Err(MapGenError::SelfAdjacent(a.get()));
        }

        let key = if a < b { (a, b) } else { (b, a) };
        if !self.edges.insert(key) {
            return Ok(false);
        }
        self.graph.add_edge(self.nodes[ia], self.nodes[ib], ());
        Ok(true)
    }

    #[must_use]
    pub fn are_adjacent(&self, a: ProvinceId, b: ProvinceId) -> bool {
        let key = if a < b { (a, b) } else { (b, a) };
        self.edges.contains(&key)
    }

    /// Соседи провинции по возрастанию id.
    pub fn neighbors(&self, id: ProvinceId) -> Result<Vec<ProvinceId>, MapGenError> {
        let node = self.nodes[id.index(self.len())?];
        let mut neighbors: Vec<ProvinceId> = self
            .graph
            .neighbors(node)
            .map(|n| self.graph[n])
            .collect();
        neighbors.sort_unstable();
        Ok(neighbors)
    }

    fn direct_edges(&self) -> impl Iterator<Item = (usize, usize)> + '_ {
        self.graph
            .edge_indices()
            .filter_map(|e| self.graph.edge_endpoints(e))
            .map(|(a, b)| (a.index(), b.index()))
    }
}

/// Симметричная матрица расстояний N×N в переходах через границы провинций.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DistanceMatrix {
    size: usize,
    data: Vec<u32>,
}

impl DistanceMatrix {
    /// Нули на диагонали, всё остальное недостижимо.
    #[must_use]
    pub fn new(size: usize) -> Self {
        let mut data = vec![UNREACHABLE; size * size];
        for i in 0..size {
            data[i * size + i] = 0;
        }
        Self { size, data }
    }

    /// Полный расчёт всех расстояний по графу соседства.
    #[must_use]
    pub fn from_graph(graph: &ProvinceGraph) -> Self {
        let mut matrix = Self::new(graph.len());
        let n = matrix.size;
        for (a, b) in graph.direct_edges() {
            matrix.data[a * n + b] = 1;
            matrix.data[b * n + a] = 1;
        }
        matrix.relax_all();
        matrix
    }

    #[must_use]
    pub fn size(&self) -> usize {
        self.size
    }

    /// Сырое расстояние; `UNREACHABLE`, если пути нет.
    pub fn get(&self, a: ProvinceId, b: ProvinceId) -> Result<u32, MapGenError> {
        let ia = a.index(self.size)?;
        let ib = b.index(self.size)?;
        Ok(self.data[ia * self.size + ib])
    }

    /// Расстояние, если путь существует и оба id корректны.
    #[must_use]
    pub fn distance(&self, a: ProvinceId, b: ProvinceId) -> Option<u32> {
        self.get(a, b).ok().filter(|&d| d != UNREACHABLE)
    }

    #[must_use]
    pub fn is_reachable(&self, a: ProvinceId, b: ProvinceId) -> bool {
        self.distance(a, b).is_some()
    }

    /// Строка матрицы: расстояния от `id` до всех провинций по порядку id.
    pub fn row(&self, id: ProvinceId) -> Result<&[u32], MapGenError> {
        let i = id.index(self.size)?;
        Ok(&self.data[i * self.size..(i + 1) * self.size])
    }

    /// Релаксация Флойда–Уоршелла по всем промежуточным провинциям.
    fn relax_all(&mut self) {
        let n = self.size;
        if n == 0 {
            return;
        }
        for k in 0..n {
            let via: Vec<u32> = self.data[k * n..(k + 1) * n].to_vec();
            let relax_row = |row: &mut [u32]| {
                let to_k = row[k];
                if to_k == UNREACHABLE {
                    return;
                }
                for (cell, &from_k) in row.iter_mut().zip(&via) {
                    if from_k != UNREACHABLE && to_k + from_k < *cell {
                        *cell = to_k + from_k;
                    }
                }
            };

            #[cfg(feature = "parallel")]
            self.data.par_chunks_mut(n).for_each(relax_row);
            #[cfg(not(feature = "parallel"))]
            self.data.chunks_mut(n).for_each(relax_row);
        }
    }

    /// Вносит новое ребро `a-b` без полного пересчёта.
    ///
    /// Любой укоротившийся путь `i → j` проходит через новое ребро, поэтому достаточно
    /// сравнить его с `i → a-b → j` и `i → b-a → j` по старым расстояниям.
    pub fn connect(&mut self, a: ProvinceId, b: ProvinceId) -> Result<(), MapGenError> {
        let n = self.size;
        let ia = a.index(n)?;
        let ib = b.index(n)?;
        if ia == ib {
            return Err(MapGenError::SelfAdjacent(a.get()));
        }
        if self.data[ia * n + ib] <= 1 {
            return Ok(());
        }

        let from_a = self.data[ia * n..(ia + 1) * n].to_vec();
        let from_b = self.data[ib * n..(ib + 1) * n].to_vec();
        for i in 0..n {
            for j in 0..n {
                let best = through_edge(from_a[i], from_b[j]).min(through_edge(from_b[i], from_a[j]));
                let cell = &mut self.data[i * n + j];
                if best < *cell {
                    *cell = best;
                }
            }
        }
        Ok(())
    }
}

/// Длина пути `x → a-b → y`, где `head = d(x, a)`, `tail = d(b, y)`.
fn through_edge(head: u32, tail: u32) -> u32 {
    if head == UNREACHABLE || tail == UNREACHABLE {
        UNREACHABLE
    } else {
        head + 1 + tail
    }
}

/// Граф соседства вместе с матрицей расстояний, поддерживаемые согласованно.
#[derive(Debug, Clone)]
pub struct Topology {
    pub graph: ProvinceGraph,
    pub distances: DistanceMatrix,
}

impl Topology {
    /// Сканирует сетку и строит граф и расстояния с нуля.
    pub fn build(grid: &CellGrid, count: usize) -> Result<Self, MapGenError> {
        let graph = build_province_graph(grid, count)?;
        let distances = DistanceMatrix::from_graph(&graph);
        debug!(
            "Граф провинций: {} вершин, {} рёбер",
            graph.len(),
            graph.edge_count()
        );
        Ok(Self { graph, distances })
    }

    /// Добавляет ребро в граф и, если оно новое, обновляет расстояния.
    pub fn connect(&mut self, a: ProvinceId, b: ProvinceId) -> Result<bool, MapGenError> {
        let added = self.graph.mark_adjacent(a, b)?;
        if added {
            self.distances.connect(a, b)?;
        }
        Ok(added)
    }

    /// Проверяет соседей только что изменённой клетки на новые границы.
    /// Возвращает число новых рёбер.
    pub fn record_borders(&mut self, grid: &CellGrid, (x, y): (i32, i32)) -> Result<usize, MapGenError> {
        let Some(owner) = grid.get(x, y).province() else {
            return Ok(0);
        };
        let mut added = 0;
        for other in grid.neighbor_provinces(x, y) {
            if other != owner && self.connect(owner, other)? {
                added += 1;
            }
        }
        Ok(added)
    }
}

/// Собирает все прямые границы между провинциями по готовой сетке.
pub fn build_province_graph(grid: &CellGrid, count: usize) -> Result<ProvinceGraph, MapGenError> {
    let mut graph = ProvinceGraph::new(count);
    for (x, y, state) in grid.cells() {
        let Some(owner) = state.province() else {
            continue;
        };
        for other in grid.neighbor_provinces(x, y) {
            if other != owner {
                graph.mark_adjacent(owner, other)?;
            }
        }
    }
    Ok(graph)
}
