//! Ошибки генерации карты и загрузки конфигурации.
//!
//! Восстановимые ситуации (недобор центров, исчерпание пула имён, остров без выхода к
//! материку) ошибками не считаются и только логируются. Здесь перечислены дефекты,
//! после которых продолжать генерацию бессмысленно.

use thiserror::Error;

use crate::capitals::Faction;

#[derive(Error, Debug, Clone, PartialEq)]
pub enum MapGenError {
    #[error("province {0} cannot be adjacent to itself")]
    SelfAdjacent(u32),
    #[error("province id {id} is outside of 1..={count}")]
    ProvinceOutOfRange { id: u32, count: usize },
    #[error("no capital candidates for faction {0:?}")]
    EmptyCapitalPool(Faction),
    #[error("template pool has {len} entries, at least {required} are required")]
    TemplatePoolTooSmall { len: usize, required: usize },
    #[error("invalid map dimensions {width}x{height} for radius {radius}")]
    InvalidDimensions { width: u32, height: u32, radius: u32 },
    #[error("land fraction must be in (0, 1], got {0}")]
    InvalidLandFraction(f32),
}

#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
    #[error("TOML error: {0}")]
    Toml(#[from] toml::de::Error),
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}
