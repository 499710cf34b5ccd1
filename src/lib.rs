pub mod capitals;
pub mod config;
pub mod error;
pub mod generator;
pub mod grid;
pub mod hex;
pub mod names;
pub mod province;
pub mod random;
pub mod templates;

pub use capitals::Faction;
pub use config::MapGenerationParams;
pub use error::{ConfigError, MapGenError};
pub use generator::{GeneratedMap, GenerationReport, generate_map, generate_map_with_rng};
pub use province::{MapCell, Province, ProvinceId, ProvinceRole};
pub use templates::{ProvinceTemplate, TemplatePool};
