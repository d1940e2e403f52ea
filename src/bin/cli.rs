use clap::Parser;
use hexmapgen::png::{DEFAULT_CELL_SIZE, save_as_png};
use hexmapgen::{GeneratorSettings, NEUTRAL_ARMY, ObjectCatalog, World};
use std::path::PathBuf;

/// Генератор гексагональных карт: регионы, местности, замки и объекты
#[derive(Parser, Debug)]
#[command(author, version, about, long_about = None)]
struct Cli {
    /// Путь к конфигурационному файлу в формате TOML
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Ширина сетки в гексах (перекрывает значение из конфигурации)
    #[arg(short, long)]
    width: Option<usize>,

    /// Сид генерации (перекрывает значение из конфигурации)
    #[arg(short, long)]
    seed: Option<u64>,

    /// Каталог объектов в формате TOML (перекрывает значение из конфигурации)
    #[arg(long)]
    catalog: Option<PathBuf>,

    /// Загрузить мир из JSON-снимка вместо генерации
    #[arg(short, long, conflicts_with_all = ["width", "seed", "catalog"])]
    load: Option<PathBuf>,

    /// Путь для сохранения JSON-снимка
    #[arg(short, long)]
    output: Option<PathBuf>,

    /// Путь для сохранения PNG-предпросмотра
    #[arg(short, long)]
    png: Option<PathBuf>,
}

fn main() -> Result<(), Box<dyn std::error::Error>> {
    env_logger::init();
    let cli = Cli::parse();

    let world = if let Some(path) = &cli.load {
        println!("📂 Загрузка снимка {}...", path.display());
        World::load(path)?
    } else {
        println!("🔍 Загрузка конфигурации...");
        let mut settings = match &cli.config {
            Some(path) => GeneratorSettings::from_toml_file(path)?,
            None => GeneratorSettings::default(),
        };
        if let Some(width) = cli.width {
            settings.width = width;
        }
        if let Some(seed) = cli.seed {
            settings.seed = seed;
        }
        if cli.catalog.is_some() {
            settings.catalog.clone_from(&cli.catalog);
        }
        let catalog = settings
            .catalog
            .as_ref()
            .map(ObjectCatalog::load)
            .unwrap_or_default();

        println!(
            "🗺️  Генерация мира {}×{} (сид {}, типов объектов: {})...",
            settings.width,
            settings.width,
            settings.seed,
            catalog.types.len()
        );
        World::generate(&settings, &catalog)?
    };

    println!(
        "   регионов: {}, замков: {}, побережий: {}, объектов: {} (армий: {})",
        world.region_count(),
        world.castles().len(),
        world.coastlines().len(),
        world.objects().total(),
        world.objects().count(NEUTRAL_ARMY)
    );

    if let Some(path) = &cli.output {
        println!("💾 Сохранение снимка в {}", path.display());
        world.save(path)?;
    }
    if let Some(path) = &cli.png {
        println!("🖼️  Сохранение предпросмотра в {}", path.display());
        save_as_png(&world, path, DEFAULT_CELL_SIZE)?;
    }

    println!("\n✅ Готово!");
    Ok(())
}
