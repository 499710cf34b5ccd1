// src/config.rs
//! Конфигурация генерации карты
//!
//! Этот модуль определяет параметры, управляющие процедурной генерацией:
//! - Размеры гекс-сетки
//! - Радиус роста провинций (задаёт их средний размер)
//! - Целевую долю суши
//! - Пути к внешним ресурсам (список имён, пул шаблонов)
//!
//! Структура поддерживает сериализацию в TOML для настройки через конфигурационные файлы.

use std::fs;
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use crate::error::{ConfigError, MapGenError};

/// Основные параметры генерации карты
///
/// Полная конфигурация для генерации одной карты. Поддерживает загрузку из TOML-файлов.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct MapGenerationParams {
    /// Сид генератора случайных чисел (детерминированная генерация)
    #[serde(default)]
    pub seed: u64,

    /// Ширина карты в клетках (по умолчанию 48)
    #[serde(default = "default_width")]
    pub width: u32,

    /// Высота карты в клетках (по умолчанию 42)
    #[serde(default = "default_height")]
    pub height: u32,

    /// Радиус роста провинции. Шаг грубой сетки равен `2 × radius`.
    #[serde(default = "default_radius")]
    pub radius: u32,

    /// Целевая доля суши (0.0, 1.0]
    #[serde(default = "default_land_fraction")]
    pub land_fraction: f32,

    /// Явное число клеток на провинцию; по умолчанию выводится из `radius`
    #[serde(default)]
    pub cells_per_province: Option<usize>,

    /// Текстовый файл со списком имён провинций (одно имя на строку)
    #[serde(default)]
    pub names_file: Option<PathBuf>,

    /// Пул шаблонов провинций в формате TOML или JSON
    #[serde(default)]
    pub templates_file: Option<PathBuf>,
}

impl MapGenerationParams {
    /// Загружает параметры из TOML-файла
    ///
    /// # Пример
    /// ```toml
    /// # map.toml
    /// seed = 42
    /// width = 48
    /// height = 42
    /// radius = 3
    /// land_fraction = 0.6
    /// ```
    pub fn from_toml_file(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let contents = fs::read_to_string(path)?;
        let params: Self = toml::from_str(&contents)?;
        Ok(params)
    }

    /// Среднее число клеток в провинции.
    ///
    /// # Примеры
    /// ```
    /// use hexmapgen::MapGenerationParams;
    /// let params = MapGenerationParams { radius: 3, ..Default::default() };
    /// assert_eq!(params.cells_per_province(), 58);
    /// ```
    #[must_use]
    pub fn cells_per_province(&self) -> usize {
        self.cells_per_province.unwrap_or_else(|| {
            let r = self.radius as usize;
            6 * r * r + 4
        })
    }

    /// Размеры грубой сетки для расстановки центров.
    #[must_use]
    pub fn coarse_dimensions(&self) -> (u32, u32) {
        let step = 2 * self.radius.max(1);
        ((self.width / step).max(1), (self.height / step).max(1))
    }

    /// Проверяет, что по параметрам вообще можно построить карту.
    pub fn validate(&self) -> Result<(), MapGenError> {
        if self.radius == 0 || self.width < 3 || self.height < 3 {
            return Err(MapGenError::InvalidDimensions {
                width: self.width,
                height: self.height,
                radius: self.radius,
            });
        }
        if !(self.land_fraction > 0.0 && self.land_fraction <= 1.0) {
            return Err(MapGenError::InvalidLandFraction(self.land_fraction));
        }
        Ok(())
    }
}

fn default_width() -> u32 {
    48
}
fn default_height() -> u32 {
    42
}
fn default_radius() -> u32 {
    3
}
fn default_land_fraction() -> f32 {
    0.6
}

impl Default for MapGenerationParams {
    fn default() -> Self {
        Self {
            seed: 0,
            width: 48,
            height: 42,
            radius: 3,
            land_fraction: 0.6,
            cells_per_province: None,
            names_file: None,
            templates_file: None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn partial_toml_uses_defaults() {
        let params: MapGenerationParams = toml::from_str("seed = 9\nradius = 2").unwrap();
        assert_eq!(params.seed, 9);
        assert_eq!(params.width, 48);
        assert_eq!(params.radius, 2);
        assert_eq!(params.cells_per_province(), 28);
        assert!(params.names_file.is_none());
    }

    #[test]
    fn coarse_grid_follows_radius() {
        let params = MapGenerationParams::default();
        assert_eq!(params.coarse_dimensions(), (8, 7));
    }

    #[test]
    fn validate_rejects_bad_values() {
        let mut params = MapGenerationParams::default();
        assert!(params.validate().is_ok());
        params.land_fraction = 0.0;
        assert_eq!(params.validate(), Err(MapGenError::InvalidLandFraction(0.0)));
        params.land_fraction = 0.5;
        params.radius = 0;
        assert!(matches!(
            params.validate(),
            Err(MapGenError::InvalidDimensions { .. })
        ));
    }
}
