use airboard::{Board, BoardConfig, BoardError, GlyphMetrics, ScheduleFile};
use std::env;
use std::fs;
use std::process;
use tracing_subscriber::EnvFilter;

fn main() {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn")))
        .with_writer(std::io::stderr)
        .init();

    let args: Vec<String> = env::args().skip(1).collect();
    let (config_path, files) = match split_args(&args) {
        Some(parsed) => parsed,
        None => {
            print_usage();
            process::exit(1);
        }
    };

    let config = match config_path {
        Some(path) => match BoardConfig::load(path) {
            Ok(config) => config,
            Err(e) => {
                eprintln!("✗ config {} is invalid:", path);
                print_error(&e);
                process::exit(1);
            }
        },
        None => BoardConfig::default(),
    };

    let mut exit_code = 0;
    for file_path in files {
        match check_file(file_path, &config) {
            Ok(()) => {}
            Err(e) => {
                eprintln!("✗ {} has errors:", file_path);
                print_error(&e);
                exit_code = 1;
            }
        }
    }

    process::exit(exit_code);
}

fn print_usage() {
    eprintln!("Usage: board-check [--config <config.yaml>] <schedule.yaml>...");
    eprintln!();
    eprintln!("Examples:");
    eprintln!("  board-check day.yaml");
    eprintln!("  board-check --config board.yaml day.yaml night.yaml");
}

fn split_args(args: &[String]) -> Option<(Option<&str>, Vec<&str>)> {
    let mut config = None;
    let mut files = Vec::new();
    let mut i = 0;
    while i < args.len() {
        match args[i].as_str() {
            "--config" | "-c" => {
                i += 1;
                config = Some(args.get(i)?.as_str());
            }
            "--help" | "-h" => return None,
            file => files.push(file),
        }
        i += 1;
    }
    if files.is_empty() {
        return None;
    }
    Some((config, files))
}

fn check_file(path: &str, config: &BoardConfig) -> Result<(), BoardError> {
    let content = fs::read_to_string(path)?;
    let schedule = ScheduleFile::from_yaml(&content)?;

    let mut board = Board::new(config)?;
    board.import_schedule(&schedule);

    let fits = board.fit_all(&GlyphMetrics::default())?;

    println!("✓ {} ({} rows)", path, board.rows().len());
    let grid = board.grid();
    for (row_index, row) in board.rows().iter().enumerate() {
        println!("  {}", row.airport);
        for (condition_index, condition) in row.conditions.iter().enumerate() {
            let fit = fits
                .iter()
                .find(|f| f.row == row_index && f.condition == condition_index);
            let fit_note = match fit {
                Some(f) if f.outcome.result.fits => format!(
                    "{}px{}",
                    f.outcome.result.font_size_px,
                    if f.outcome.result.wrapped { " wrapped" } else { "" }
                ),
                Some(f) => format!("overflow at {}px", f.outcome.result.font_size_px),
                None => String::new(),
            };
            println!(
                "    {}-{} {:<7} {} {{{}}} {}  [{}]",
                grid.hour_label(condition.start_column),
                grid.hour_label(condition.end_column()),
                condition.color.to_string(),
                condition.main_text,
                condition.highlight_text,
                condition.after_text,
                fit_note
            );
        }
    }
    Ok(())
}

fn print_error(error: &BoardError) {
    match error {
        BoardError::YamlError(msg) => {
            eprintln!("  YAML error:");
            eprintln!("    {}", msg);
        }
        BoardError::Io(msg) => {
            eprintln!("  Failed to read file:");
            eprintln!("    {}", msg);
        }
        BoardError::InvalidFitConfig { field, reason } => {
            eprintln!("  Invalid fit setting '{}':", field);
            eprintln!("    {}", reason);
        }
        BoardError::InvalidGridConfig { field, reason } => {
            eprintln!("  Invalid grid setting '{}':", field);
            eprintln!("    {}", reason);
        }
        e => {
            eprintln!("  {}", e);
        }
    }
}
