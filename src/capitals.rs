//! Стартовая раскладка: столица мира, столицы фракций, провинции расширения,
//! пограничные форпосты и обычные провинции.
//!
//! Все решения принимаются по координатам центров и матрице расстояний между
//! провинциями. Координаты сравниваются с центром провинции #1.

use log::{debug, error, info};
use rand::Rng;
use serde::{Deserialize, Serialize};

use crate::error::MapGenError;
use crate::names::Namer;
use crate::province::graph::DistanceMatrix;
use crate::province::{ProvinceArena, ProvinceId, ProvinceRole};
use crate::random::pick_index_quirk;
use crate::templates::TemplatePool;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Faction {
    Orc,
    Elf,
    Dwarf,
}

impl Faction {
    pub const ALL: [Faction; 3] = [Faction::Orc, Faction::Elf, Faction::Dwarf];

    /// Лежит ли точка в секторе фракции относительно центра `(cx, cy)`.
    ///
    /// Орки на северо-востоке, гномы на юго-востоке, эльфы в западном клине.
    #[must_use]
    pub fn in_quadrant(self, (x, y): (i32, i32), (cx, cy): (i32, i32)) -> bool {
        match self {
            Faction::Orc => x > cx && y < cy,
            Faction::Dwarf => x > cx && y >= cy,
            Faction::Elf => x <= cx && (x - cx).abs() > (y - cy).abs(),
        }
    }

    #[must_use]
    pub fn capital_template(self) -> usize {
        match self {
            Faction::Orc => 1,
            Faction::Elf => 2,
            Faction::Dwarf => 3,
        }
    }

    #[must_use]
    pub fn expansion_template(self) -> usize {
        self.capital_template() + 3
    }

    /// Ключ для разрешения ничьих среди кандидатов в столицы: чем больше, тем лучше.
    fn preference(self, (x, y): (i32, i32)) -> i64 {
        let (x, y) = (i64::from(x), i64::from(y));
        match self {
            Faction::Orc => (x - y).abs(),
            Faction::Elf => -x,
            Faction::Dwarf => x + y,
        }
    }
}

/// Что получила провинция в раскладке.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Assignment {
    pub template: usize,
    pub role: ProvinceRole,
    pub faction: Option<Faction>,
    pub name: String,
}

/// Выбирает столицы трёх фракций.
///
/// Кандидаты фракции: провинции её сектора на расстоянии больше 1 от центра.
/// Целевое расстояние равно минимуму по фракциям из их максимальных расстояний, так что у
/// всех фракций есть кандидат на общем "кольце". Пустой пул у любой фракции означает
/// несовместимую конфигурацию и фатален.
pub fn choose_capitals(
    provinces: &ProvinceArena,
    distances: &DistanceMatrix,
) -> Result<Vec<(Faction, ProvinceId)>, MapGenError> {
    let center = provinces.get(ProvinceId::WORLD_CENTER)?.center;

    let mut pools = Vec::with_capacity(Faction::ALL.len());
    for faction in Faction::ALL {
        let pool: Vec<(ProvinceId, (i32, i32), u32)> = provinces
            .iter()
            .filter(|p| faction.in_quadrant(p.center, center))
            .filter_map(|p| {
                distances
                    .distance(ProvinceId::WORLD_CENTER, p.id)
                    .filter(|&d| d > 1)
                    .map(|d| (p.id, p.center, d))
            })
            .collect();
        if pool.is_empty() {
            error!("Нет кандидатов в столицы для фракции {faction:?}");
            return Err(MapGenError::EmptyCapitalPool(faction));
        }
        pools.push((faction, pool));
    }

    let target = pools
        .iter()
        .filter_map(|(_, pool)| pool.iter().map(|&(_, _, d)| d).max())
        .min()
        .unwrap_or_default();
    debug!("Целевое расстояние столиц от центра: {target}");

    let mut capitals = Vec::with_capacity(pools.len());
    for (faction, pool) in pools {
        let mut candidates: Vec<_> = pool.iter().filter(|&&(_, _, d)| d == target).collect();
        if candidates.is_empty() {
            candidates = pool.iter().filter(|&&(_, _, d)| d > target).collect();
        }

        // При равном ключе остаётся кандидат с меньшим id.
        let best = candidates.into_iter().fold(None, |best: Option<&(ProvinceId, (i32, i32), u32)>, c| {
            match best {
                Some(b) if faction.preference(b.1) >= faction.preference(c.1) => Some(b),
                _ => Some(c),
            }
        });
        let Some(&(id, _, _)) = best else {
            return Err(MapGenError::EmptyCapitalPool(faction));
        };
        capitals.push((faction, id));
    }
    Ok(capitals)
}

/// Провинция расширения фракции рядом с её столицей.
///
/// Сначала ищутся свободные провинции на расстоянии ровно 2 и от центра, и от столицы,
/// затем условие ослабляется до `>= 1` от центра и `>= 2` от столицы.
pub fn choose_expansion<R: Rng + ?Sized>(
    capital: ProvinceId,
    slots: &[Option<Assignment>],
    distances: &DistanceMatrix,
    rng: &mut R,
) -> Option<ProvinceId> {
    let free = || {
        slots
            .iter()
            .enumerate()
            .filter(|(_, slot)| slot.is_none())
            .map(|(i, _)| ProvinceId::from_index(i))
    };
    let from_center = |id| distances.distance(ProvinceId::WORLD_CENTER, id);
    let from_capital = |id| distances.distance(capital, id);

    let mut candidates: Vec<ProvinceId> = free()
        .filter(|&id| from_center(id) == Some(2) && from_capital(id) == Some(2))
        .collect();
    if candidates.is_empty() {
        candidates = free()
            .filter(|&id| {
                from_center(id).is_some_and(|d| d >= 1) && from_capital(id).is_some_and(|d| d >= 2)
            })
            .collect();
    }
    if candidates.is_empty() {
        return None;
    }
    Some(candidates[pick_index_quirk(rng, candidates.len())])
}

/// Полная раскладка провинций. Возвращает назначения по порядку id.
pub fn assign_provinces<R: Rng + ?Sized>(
    provinces: &ProvinceArena,
    distances: &DistanceMatrix,
    templates: &TemplatePool,
    namer: &mut Namer,
    rng: &mut R,
) -> Result<Vec<Assignment>, MapGenError> {
    templates.validate()?;
    for template in templates.templates.iter().take(TemplatePool::FIRST_GENERIC) {
        if let Some(name) = &template.name {
            namer.reserve(name);
        }
    }

    let mut slots: Vec<Option<Assignment>> = vec![None; provinces.len()];

    let center = ProvinceId::WORLD_CENTER;
    let name = reserved_name(templates, TemplatePool::WORLD_CENTER, namer, rng, center);
    put(
        &mut slots,
        center,
        Assignment {
            template: TemplatePool::WORLD_CENTER,
            role: ProvinceRole::WorldCenter,
            faction: None,
            name,
        },
    )?;

    let capitals = choose_capitals(provinces, distances)?;
    for &(faction, id) in &capitals {
        info!("Столица фракции {faction:?}: провинция {id}");
        let template = faction.capital_template();
        let name = reserved_name(templates, template, namer, rng, id);
        put(
            &mut slots,
            id,
            Assignment {
                template,
                role: ProvinceRole::Capital,
                faction: Some(faction),
                name,
            },
        )?;
    }

    for &(faction, capital) in &capitals {
        let Some(id) = choose_expansion(capital, &slots, distances, rng) else {
            debug!("Для фракции {faction:?} не нашлось провинции расширения");
            continue;
        };
        let template = faction.expansion_template();
        let name = reserved_name(templates, template, namer, rng, id);
        put(
            &mut slots,
            id,
            Assignment {
                template,
                role: ProvinceRole::Expansion,
                faction: Some(faction),
                name,
            },
        )?;
    }

    place_outposts(&mut slots, distances, namer, rng)?;
    fill_generic(&mut slots, templates, namer, rng);

    Ok(slots.into_iter().flatten().collect())
}

fn put(
    slots: &mut [Option<Assignment>],
    id: ProvinceId,
    assignment: Assignment,
) -> Result<(), MapGenError> {
    let index = id.index(slots.len())?;
    slots[index] = Some(assignment);
    Ok(())
}

/// Имя зарезервированного слота: фиксированное из шаблона или из пула.
fn reserved_name<R: Rng + ?Sized>(
    templates: &TemplatePool,
    template: usize,
    namer: &mut Namer,
    rng: &mut R,
    id: ProvinceId,
) -> String {
    match templates.get(template).and_then(|t| t.name.clone()) {
        Some(name) => name,
        None => namer.next_name(rng, id),
    }
}

/// Форпосты на соседях центра, разнесённые друг от друга минимум на 2 перехода.
fn place_outposts<R: Rng + ?Sized>(
    slots: &mut [Option<Assignment>],
    distances: &DistanceMatrix,
    namer: &mut Namer,
    rng: &mut R,
) -> Result<(), MapGenError> {
    let mut candidates: Vec<ProvinceId> = slots
        .iter()
        .enumerate()
        .filter(|(_, slot)| slot.is_none())
        .map(|(i, _)| ProvinceId::from_index(i))
        .filter(|&id| distances.distance(ProvinceId::WORLD_CENTER, id) == Some(1))
        .collect();

    let mut placed = 0;
    while !candidates.is_empty() {
        let chosen = candidates.remove(pick_index_quirk(rng, candidates.len()));
        let name = namer.next_name(rng, chosen);
        put(
            slots,
            chosen,
            Assignment {
                template: TemplatePool::OUTPOST,
                role: ProvinceRole::Outpost,
                faction: None,
                name,
            },
        )?;
        placed += 1;
        candidates.retain(|&other| distances.get(chosen, other).is_ok_and(|d| d >= 2));
    }
    debug!("Размещено {placed} пограничных форпостов");
    Ok(())
}

/// Всё, что осталось свободным, получает случайный обычный шаблон.
fn fill_generic<R: Rng + ?Sized>(
    slots: &mut [Option<Assignment>],
    templates: &TemplatePool,
    namer: &mut Namer,
    rng: &mut R,
) {
    for (i, slot) in slots.iter_mut().enumerate() {
        if slot.is_some() {
            continue;
        }
        let id = ProvinceId::from_index(i);
        *slot = Some(Assignment {
            template: rng.gen_range(TemplatePool::FIRST_GENERIC..templates.len()),
            role: ProvinceRole::Generic,
            faction: None,
            name: namer.next_name(rng, id),
        });
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::province::graph::ProvinceGraph;
    use rand::SeedableRng;
    use rand_chacha::ChaCha8Rng;

    fn id(raw: u32) -> ProvinceId {
        ProvinceId::new(raw)
    }

    /// Центр #1 в (10, 10), кольцо соседей и внешнее кольцо по сторонам света.
    fn star_map() -> (ProvinceArena, DistanceMatrix) {
        let centers = [
            (10, 10), // 1 центр
            (14, 7),  // 2 СВ, сосед
            (14, 13), // 3 ЮВ, сосед
            (6, 10),  // 4 З, сосед
            (18, 4),  // 5 СВ, дальний
            (20, 3),  // 6 СВ, дальний
            (18, 16), // 7 ЮВ, дальний
            (2, 9),   // 8 З, дальний
            (3, 12),  // 9 З, дальний
            (10, 4),  // 10 С, сосед
        ];
        let mut arena = ProvinceArena::default();
        for center in centers {
            arena.push(center);
        }
        let mut graph = ProvinceGraph::new(centers.len());
        for (a, b) in [
            (1, 2),
            (1, 3),
            (1, 4),
            (1, 10),
            (2, 5),
            (2, 6),
            (3, 7),
            (4, 8),
            (4, 9),
            (2, 10),
        ] {
            graph.mark_adjacent(id(a), id(b)).unwrap();
        }
        (arena, DistanceMatrix::from_graph(&graph))
    }

    #[test]
    fn quadrants_follow_center() {
        let c = (10, 10);
        assert!(Faction::Orc.in_quadrant((11, 9), c));
        assert!(!Faction::Orc.in_quadrant((11, 10), c));
        assert!(Faction::Dwarf.in_quadrant((11, 10), c));
        assert!(Faction::Elf.in_quadrant((5, 12), c));
        assert!(!Faction::Elf.in_quadrant((8, 5), c));
        assert!(!Faction::Elf.in_quadrant((10, 10), c));
    }

    #[test]
    fn capitals_use_tie_breaks() {
        let (arena, distances) = star_map();
        let capitals = choose_capitals(&arena, &distances).unwrap();
        // Орки: |x - y| у #6 (17) больше, чем у #5 (14). Эльфы: меньший x у #8.
        assert_eq!(
            capitals,
            vec![
                (Faction::Orc, id(6)),
                (Faction::Elf, id(8)),
                (Faction::Dwarf, id(7)),
            ]
        );
        let center = arena.get(ProvinceId::WORLD_CENTER).unwrap().center;
        for (faction, capital) in capitals {
            assert!(faction.in_quadrant(arena.get(capital).unwrap().center, center));
        }
    }

    #[test]
    fn empty_pool_is_fatal() {
        let mut arena = ProvinceArena::default();
        arena.push((10, 10));
        arena.push((14, 7));
        let mut graph = ProvinceGraph::new(2);
        graph.mark_adjacent(id(1), id(2)).unwrap();
        let distances = DistanceMatrix::from_graph(&graph);
        assert_eq!(
            choose_capitals(&arena, &distances),
            Err(MapGenError::EmptyCapitalPool(Faction::Orc))
        );
    }

    #[test]
    fn full_assignment_covers_every_province() {
        let (arena, distances) = star_map();
        let templates = TemplatePool::default();
        let mut namer = Namer::new(vec!["Avalon".into(), "Grukmar".into()]);
        let mut rng = ChaCha8Rng::seed_from_u64(12);

        let slots = assign_provinces(&arena, &distances, &templates, &mut namer, &mut rng).unwrap();
        assert_eq!(slots.len(), 10);
        assert_eq!(slots[0].role, ProvinceRole::WorldCenter);
        assert_eq!(slots[0].name, "Heart of the World");
        assert_eq!(slots[5].template, Faction::Orc.capital_template());

        let mut names: Vec<&str> = slots.iter().map(|s| s.name.as_str()).collect();
        names.sort_unstable();
        names.dedup();
        assert_eq!(names.len(), 10);

        // Соседи центра 2, 3, 4 и 10: 2 и 10 соседствуют, поэтому форпостов меньше четырёх.
        let outposts: Vec<usize> = slots
            .iter()
            .enumerate()
            .filter(|(_, s)| s.role == ProvinceRole::Outpost)
            .map(|(i, _)| i)
            .collect();
        assert!(!outposts.is_empty());
        for &a in &outposts {
            for &b in &outposts {
                if a != b {
                    let d = distances.get(ProvinceId::from_index(a), ProvinceId::from_index(b));
                    assert!(d.unwrap() >= 2);
                }
            }
        }
        for slot in &slots {
            if slot.role == ProvinceRole::Generic {
                assert!(slot.template >= TemplatePool::FIRST_GENERIC);
            }
        }
    }

    #[test]
    fn expansion_prefers_ring_two_from_center_and_capital() {
        let (_, distances) = star_map();
        let mut rng = ChaCha8Rng::seed_from_u64(3);
        let mut slots: Vec<Option<Assignment>> = vec![None; 10];
        for taken in [0, 5] {
            slots[taken] = Some(Assignment {
                template: 0,
                role: ProvinceRole::Capital,
                faction: None,
                name: String::new(),
            });
        }
        // Ослабленному условию для столицы #6 отвечают #3, #4, #7, #8 и #9,
        // но строгому (2 от центра и 2 от столицы) только #5.
        assert!(distances.distance(id(6), id(3)).is_some_and(|d| d >= 2));
        assert_eq!(distances.distance(ProvinceId::WORLD_CENTER, id(5)), Some(2));
        assert_eq!(distances.distance(id(6), id(5)), Some(2));
        for _ in 0..10 {
            assert_eq!(choose_expansion(id(6), &slots, &distances, &mut rng), Some(id(5)));
        }
    }

    #[test]
    fn full_assignment_places_orc_expansion_on_ring() {
        let (arena, distances) = star_map();
        let templates = TemplatePool::default();
        let mut namer = Namer::new(Vec::new());
        let mut rng = ChaCha8Rng::seed_from_u64(21);

        let slots = assign_provinces(&arena, &distances, &templates, &mut namer, &mut rng).unwrap();
        let orc = &slots[4];
        assert_eq!(orc.role, ProvinceRole::Expansion);
        assert_eq!(orc.faction, Some(Faction::Orc));
        assert_eq!(orc.template, Faction::Orc.expansion_template());
        assert_eq!(orc.template, 4);
        assert_eq!(orc.name, "Bloodfang Camp");

        // У эльфийской столицы #8 единственный кандидат на кольце: #9.
        assert_eq!(slots[8].role, ProvinceRole::Expansion);
        assert_eq!(slots[8].faction, Some(Faction::Elf));
        assert_eq!(slots[8].template, 5);
    }

    #[test]
    fn expansion_falls_back_then_gives_up() {
        let (_, distances) = star_map();
        let mut rng = ChaCha8Rng::seed_from_u64(0);
        // Все провинции кроме #5 заняты: строгое условие (2 и 2) не выполняется,
        // но ослабленное (>= 1 от центра и >= 2 от столицы #7) выполняется.
        let mut slots: Vec<Option<Assignment>> = (0..10)
            .map(|_| {
                Some(Assignment {
                    template: 8,
                    role: ProvinceRole::Generic,
                    faction: None,
                    name: String::new(),
                })
            })
            .collect();
        slots[4] = None;
        assert_eq!(choose_expansion(id(7), &slots, &distances, &mut rng), Some(id(5)));

        slots[4] = slots[0].clone();
        assert_eq!(choose_expansion(id(7), &slots, &distances, &mut rng), None);
    }
}
