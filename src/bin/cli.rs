use clap::Parser;
use hexmapgen::names::load_name_list;
use hexmapgen::{MapGenerationParams, TemplatePool, generate_map};
use std::fs;
use std::path::PathBuf;

/// Генератор гексагональных карт провинций
#[derive(Parser, Debug)]
#[command(author, version, about, long_about = None)]
struct Cli {
    /// Путь к конфигурационному файлу в формате TOML (по умолчанию встроенные параметры)
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Переопределяет сид из конфигурации
    #[arg(short, long)]
    seed: Option<u64>,

    /// Список имён провинций (одно имя на строку)
    #[arg(short, long)]
    names: Option<PathBuf>,

    /// Пул шаблонов провинций (TOML или JSON)
    #[arg(short, long)]
    templates: Option<PathBuf>,

    /// Путь для сохранения карты в JSON (по умолчанию: ./map.json)
    #[arg(short, long, default_value = "map.json")]
    output: PathBuf,
}

fn main() -> Result<(), Box<dyn std::error::Error>> {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();
    let cli = Cli::parse();

    println!("🔍 Загрузка конфигурации...");
    let mut params = match &cli.config {
        Some(path) => MapGenerationParams::from_toml_file(path)?,
        None => MapGenerationParams::default(),
    };
    if let Some(seed) = cli.seed {
        params.seed = seed;
    }

    let templates = match cli.templates.as_ref().or(params.templates_file.as_ref()) {
        Some(path) => TemplatePool::from_file(path)?,
        None => TemplatePool::default(),
    };
    let names = cli
        .names
        .as_ref()
        .or(params.names_file.as_ref())
        .map(load_name_list)
        .unwrap_or_default();

    println!(
        "Генерация карты (размер: {}×{}, сид {})...",
        params.width, params.height, params.seed
    );
    let map = generate_map(&params, &templates, names)?;

    let report = &map.report;
    println!(
        "Провинций: {} из {} желаемых, островов подключено: {}, недостижимых: {}",
        report.placed_provinces,
        report.desired_provinces,
        report.islands_repaired,
        report.unreachable_provinces
    );

    println!("Сохранение в {:?}", cli.output);
    fs::write(&cli.output, serde_json::to_string_pretty(&map)?)?;

    println!("\nГотово! Карта сохранена.");
    Ok(())
}
