//! Вспомогательные выборки поверх внедряемого генератора `rand::Rng`.
//!
//! Генератор передаётся явно во все фазы и потребляется строго последовательно,
//! поэтому одна и та же карта воспроизводится по сиду.

use rand::Rng;

/// Случайное целое из `[lo, hi]` включительно.
pub fn jitter<R: Rng + ?Sized>(rng: &mut R, lo: i32, hi: i32) -> i32 {
    rng.gen_range(lo..=hi)
}

/// Индекс из `[0, count - 1)`: последний кандидат никогда не выбирается,
/// а при единственном кандидате возвращается 0.
///
/// Такое поведение сохранено намеренно для выбора провинций расширения и форпостов;
/// случайное число не тянется, если выбирать не из чего.
pub fn pick_index_quirk<R: Rng + ?Sized>(rng: &mut R, count: usize) -> usize {
    if count <= 1 {
        0
    } else {
        rng.gen_range(0..count - 1)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::SeedableRng;

    #[test]
    fn quirk_never_selects_last_candidate() {
        let mut rng = rand_chacha::ChaCha8Rng::seed_from_u64(11);
        for _ in 0..500 {
            assert!(pick_index_quirk(&mut rng, 4) < 3);
        }
        assert_eq!(pick_index_quirk(&mut rng, 1), 0);
        assert_eq!(pick_index_quirk(&mut rng, 0), 0);
    }

    #[test]
    fn jitter_is_inclusive() {
        let mut rng = rand_chacha::ChaCha8Rng::seed_from_u64(3);
        let values: Vec<i32> = (0..500).map(|_| jitter(&mut rng, -2, 2)).collect();
        assert!(values.contains(&-2));
        assert!(values.contains(&2));
        assert!(values.iter().all(|v| (-2..=2).contains(v)));
    }
}
