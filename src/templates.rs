//! Пул шаблонов (архетипов) провинций.
//!
//! Порядок шаблонов значим:
//! - `0`: столица мира
//! - `1..=3`: столицы орков, эльфов и гномов
//! - `4..=6`: провинции расширения тех же фракций
//! - `7`: пограничный форпост
//! - `8..`: обычные провинции, используются повторно
//!
//! Шаблон копируется в провинцию по значению и никогда не меняется на месте.

use std::collections::BTreeMap;
use std::fs;
use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::error::{ConfigError, MapGenError};

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct ProvinceTemplate {
    pub archetype: String,
    /// Фиксированное имя (имеет смысл только для зарезервированных слотов `0..=6`)
    #[serde(default)]
    pub name: Option<String>,
    #[serde(default)]
    pub attributes: BTreeMap<String, i64>,
}

impl ProvinceTemplate {
    fn new(archetype: &str, name: Option<&str>, attributes: &[(&str, i64)]) -> Self {
        Self {
            archetype: archetype.to_owned(),
            name: name.map(str::to_owned),
            attributes: attributes
                .iter()
                .map(|&(key, value)| (key.to_owned(), value))
                .collect(),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct TemplatePool {
    pub templates: Vec<ProvinceTemplate>,
}

impl TemplatePool {
    pub const WORLD_CENTER: usize = 0;
    pub const OUTPOST: usize = 7;
    pub const FIRST_GENERIC: usize = 8;

    #[must_use]
    pub fn new(templates: Vec<ProvinceTemplate>) -> Self {
        Self { templates }
    }

    /// Загружает пул из JSON (по расширению `.json`) или TOML.
    pub fn from_file(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let path = path.as_ref();
        let contents = fs::read_to_string(path)?;
        let pool: Self = if path.extension().is_some_and(|ext| ext == "json") {
            serde_json::from_str(&contents)?
        } else {
            toml::from_str(&contents)?
        };
        Ok(pool)
    }

    /// Нужны все зарезервированные слоты и хотя бы один обычный шаблон.
    pub fn validate(&self) -> Result<(), MapGenError> {
        let required = Self::FIRST_GENERIC + 1;
        if self.templates.len() < required {
            return Err(MapGenError::TemplatePoolTooSmall {
                len: self.templates.len(),
                required,
            });
        }
        Ok(())
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.templates.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.templates.is_empty()
    }

    #[must_use]
    pub fn get(&self, index: usize) -> Option<&ProvinceTemplate> {
        self.templates.get(index)
    }

    /// Копия шаблона для конкретной провинции.
    #[must_use]
    pub fn instantiate(&self, index: usize) -> Option<ProvinceTemplate> {
        self.templates.get(index).cloned()
    }
}

impl Default for TemplatePool {
    fn default() -> Self {
        let stats = |population: i64, income: i64, food: i64, defense: i64| {
            [
                ("population", population),
                ("income", income),
                ("food", food),
                ("defense", defense),
            ]
        };
        Self::new(vec![
            ProvinceTemplate::new("world_capital", Some("Heart of the World"), &stats(12, 10, 6, 8)),
            ProvinceTemplate::new("orc_capital", Some("Grukmar"), &stats(8, 5, 4, 6)),
            ProvinceTemplate::new("elf_capital", Some("Ilyndar"), &stats(7, 6, 5, 5)),
            ProvinceTemplate::new("dwarf_capital", Some("Khaz Barak"), &stats(7, 7, 3, 7)),
            ProvinceTemplate::new("orc_expansion", Some("Bloodfang Camp"), &stats(4, 2, 3, 3)),
            ProvinceTemplate::new("elf_expansion", Some("Silverleaf Glade"), &stats(3, 3, 4, 2)),
            ProvinceTemplate::new("dwarf_expansion", Some("Deepdelve Mine"), &stats(3, 4, 2, 4)),
            ProvinceTemplate::new("border_outpost", None, &stats(2, 1, 1, 5)),
            ProvinceTemplate::new("plains", None, &stats(3, 2, 4, 1)),
            ProvinceTemplate::new("forest", None, &stats(2, 2, 3, 2)),
            ProvinceTemplate::new("hills", None, &stats(2, 3, 2, 3)),
            ProvinceTemplate::new("marsh", None, &stats(1, 1, 2, 2)),
            ProvinceTemplate::new("mountains", None, &stats(1, 3, 1, 4)),
        ])
    }
}
