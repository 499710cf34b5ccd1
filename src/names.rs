//! Имена провинций: конечный пул уникальных имён с синтетическим запасным вариантом.

use std::fs;
use std::path::Path;

use log::{debug, warn};
use rand::Rng;

use crate::province::ProvinceId;

const SYNTHETIC_PREFIX: &str = "Number #";

/// Раздаёт имена из пула; выданное имя удаляется навсегда.
#[derive(Debug, Clone, Default)]
pub struct Namer {
    pool: Vec<String>,
    exhausted: bool,
}

impl Namer {
    /// Пул без повторов. Имена вида `Number #N` отбрасываются: они зарезервированы
    /// за синтетическими именами.
    #[must_use]
    pub fn new(names: Vec<String>) -> Self {
        let mut pool: Vec<String> = Vec::with_capacity(names.len());
        for name in names {
            if !name.starts_with(SYNTHETIC_PREFIX) && !pool.contains(&name) {
                pool.push(name);
            }
        }
        Self {
            pool,
            exhausted: false,
        }
    }

    /// Убирает из пула имя, уже занятое шаблоном.
    pub fn reserve(&mut self, name: &str) {
        self.pool.retain(|candidate| candidate != name);
    }

    #[must_use]
    pub fn remaining(&self) -> usize {
        self.pool.len()
    }

    /// Случайное имя из пула или `Number #<id>`, если пул исчерпан.
    pub fn next_name<R: Rng + ?Sized>(&mut self, rng: &mut R, id: ProvinceId) -> String {
        if self.pool.is_empty() {
            if !self.exhausted {
                debug!("Пул имён исчерпан, дальше используются синтетические имена");
                self.exhausted = true;
            }
            return synthetic_name(id);
        }
        let index = rng.gen_range(0..self.pool.len());
        self.pool.swap_remove(index)
    }
}

#[must_use]
pub fn synthetic_name(id: ProvinceId) -> String {
    format!("{SYNTHETIC_PREFIX}{}", id.get())
}

/// Читает список имён: одно имя на строку, пустые строки и `#`-комментарии пропускаются.
///
/// Ошибка чтения не фатальна: пул будет пустым, и все провинции получат синтетические имена.
pub fn load_name_list(path: impl AsRef<Path>) -> Vec<String> {
    let path = path.as_ref();
    match fs::read_to_string(path) {
        Ok(contents) => parse_name_list(&contents),
        Err(err) => {
            warn!("Не удалось прочитать список имён {}: {err}", path.display());
            Vec::new()
        }
    }
}

#[must_use]
pub fn parse_name_list(contents: &str) -> Vec<String> {
    contents
        .lines()
        .map(str::trim)
        .filter(|line| !line.is_empty() && !line.starts_with('#'))
        .map(str::to_owned)
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::SeedableRng;
    use rand_chacha::ChaCha8Rng;
    use std::collections::HashSet;

    #[test]
    fn falls_back_to_synthetic_names() {
        let mut namer = Namer::new(vec!["Avalon".into(), "Brisk".into()]);
        let mut rng = ChaCha8Rng::seed_from_u64(0);

        let names: Vec<String> = (3..8)
            .map(|raw| namer.next_name(&mut rng, ProvinceId::new(raw)))
            .collect();

        let pooled: HashSet<&str> = names[..2].iter().map(String::as_str).collect();
        assert_eq!(pooled, HashSet::from(["Avalon", "Brisk"]));
        assert_eq!(names[2..], ["Number #5", "Number #6", "Number #7"]);
        assert_eq!(names.iter().collect::<HashSet<_>>().len(), 5);
    }

    #[test]
    fn reserved_and_duplicate_names_are_dropped() {
        let mut namer = Namer::new(vec![
            "Grukmar".into(),
            "Avalon".into(),
            "Avalon".into(),
            "Number #4".into(),
        ]);
        namer.reserve("Grukmar");
        assert_eq!(namer.remaining(), 1);
    }

    #[test]
    fn parses_name_file_lines() {
        let names = parse_name_list("# realms\nAvalon\n\n  Brisk  \n#skip\n");
        assert_eq!(names, vec!["Avalon".to_owned(), "Brisk".to_owned()]);
    }

    #[test]
    fn missing_name_file_degrades_to_empty_pool() {
        assert!(load_name_list("/nonexistent/names.txt").is_empty());
    }
}
