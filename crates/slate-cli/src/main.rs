//! Slate CLI - Command-line interface for inspecting and editing boards

use std::path::PathBuf;

use anyhow::{anyhow, bail, Context, Result};
use slate_core::{
    add_column, add_row, apply_table_scale_resize, remove_column, remove_row, set_cell_text,
    ElementId, ScaleResizeOptions, Table, TableStore, UpdateOptions,
};
use slate_store::BoardStore;
use tracing::debug;
use tracing_subscriber::EnvFilter;

#[tokio::main]
async fn main() -> Result<()> {
    // Initialize logging
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env().add_directive("slate=info".parse()?))
        .init();

    // Parse command line arguments
    let args: Vec<String> = std::env::args().collect();

    if args.len() < 2 {
        print_help();
        return Ok(());
    }

    let command = &args[1];
    let rest = &args[2..];
    debug!("Running command {} with {} arguments", command, rest.len());

    match command.as_str() {
        "help" | "--help" | "-h" => print_help(),
        "new-board" => {
            if rest.len() < 2 {
                eprintln!("Usage: slate-cli new-board <path> <name>");
                return Ok(());
            }
            new_board(&rest[0], &rest[1]).await?;
        }
        "add-table" => {
            if rest.len() < 3 {
                eprintln!("Usage: slate-cli add-table <path> <rows> <cols> [x y]");
                return Ok(());
            }
            add_table(rest).await?;
        }
        "show" => {
            if rest.is_empty() {
                eprintln!("Usage: slate-cli show <path> [table]");
                return Ok(());
            }
            show(&rest[0], rest.get(1).map(String::as_str)).await?;
        }
        "validate" => {
            if rest.is_empty() {
                eprintln!("Usage: slate-cli validate <path> [--repair]");
                return Ok(());
            }
            validate(&rest[0], rest.iter().any(|arg| arg == "--repair")).await?;
        }
        "add-row" | "add-col" => {
            if rest.len() < 2 {
                eprintln!("Usage: slate-cli {} <path> <table> [index]", command);
                return Ok(());
            }
            let index = rest.get(2).map(|arg| parse_index(arg)).transpose()?;
            let is_row = command == "add-row";
            edit(&rest[0], &rest[1], |table, config| {
                if is_row {
                    add_row(table, index, config)
                } else {
                    add_column(table, index, config)
                }
            })
            .await?;
        }
        "remove-row" | "remove-col" => {
            if rest.len() < 3 {
                eprintln!("Usage: slate-cli {} <path> <table> <index>", command);
                return Ok(());
            }
            let index = parse_index(&rest[2])?;
            let is_row = command == "remove-row";
            edit(&rest[0], &rest[1], |table, _| {
                if is_row {
                    remove_row(table, index)
                } else {
                    remove_column(table, index)
                }
            })
            .await?;
        }
        "resize" => {
            if rest.len() < 4 {
                eprintln!(
                    "Usage: slate-cli resize <path> <table> <scaleX> <scaleY> [--keep-ratio]"
                );
                return Ok(());
            }
            let scale_x = parse_scale(&rest[2])?;
            let scale_y = parse_scale(&rest[3])?;
            let keep_ratio = rest.iter().any(|arg| arg == "--keep-ratio");
            edit(&rest[0], &rest[1], |table, config| {
                let options = ScaleResizeOptions::from_config(config).with_aspect_ratio(keep_ratio);
                apply_table_scale_resize(table, scale_x, scale_y, &options, config)
            })
            .await?;
        }
        "set-cell" => {
            if rest.len() < 5 {
                eprintln!("Usage: slate-cli set-cell <path> <table> <row> <col> <text>");
                return Ok(());
            }
            let row = parse_index(&rest[2])?;
            let col = parse_index(&rest[3])?;
            let text = rest[4..].join(" ");
            edit(&rest[0], &rest[1], |table, _| {
                set_cell_text(table, row, col, text.as_str())
            })
            .await?;
        }
        "delete-table" => {
            if rest.len() < 2 {
                eprintln!("Usage: slate-cli delete-table <path> <table>");
                return Ok(());
            }
            delete_table(&rest[0], &rest[1]).await?;
        }
        _ => {
            eprintln!("Unknown command: {}", command);
            print_help();
        }
    }

    Ok(())
}

fn print_help() {
    println!(
        r#"Slate CLI - Canvas table boards

USAGE:
    slate-cli <COMMAND> [OPTIONS]

COMMANDS:
    help            Show this help message
    new-board       Create a new board file
    add-table       Add a table to a board
    show            Show a board or one table
    validate        Check (and optionally repair) every table
    add-row         Insert a row (appends without an index)
    add-col         Insert a column (appends without an index)
    remove-row      Remove a row
    remove-col      Remove a column
    resize          Apply a scale factor to a table
    set-cell        Set the text of one cell
    delete-table    Remove a table from a board

Tables are addressed by ID or by a unique ID prefix. Use '-' as the path
to read it from the SLATE_BOARD environment variable.

EXAMPLES:
    slate-cli new-board ./plan.json "Sprint Plan"
    slate-cli add-table ./plan.json 3 4 100 100
    slate-cli resize ./plan.json 1f3c 0.5 1 --keep-ratio
    slate-cli validate ./plan.json --repair
"#
    );
}

async fn new_board(path: &str, name: &str) -> Result<()> {
    let board = BoardStore::create(board_path(path)?, name).await?;
    println!("Created board: {}", board.manifest().id);
    println!("Name: {}", board.manifest().name);
    Ok(())
}

async fn add_table(args: &[String]) -> Result<()> {
    let mut board = open(&args[0]).await?;
    let rows = parse_index(&args[1])?;
    let cols = parse_index(&args[2])?;
    let (x, y) = match (args.get(3), args.get(4)) {
        (Some(x), Some(y)) => (parse_coord(x)?, parse_coord(y)?),
        _ => (0.0, 0.0),
    };

    let table = Table::new(rows, cols, board.config()).with_position(x, y);
    let id = board.insert_table(table)?;
    board.flush().await?;

    println!("Added table: {}", id);
    print_table(board.get_table(id)?);
    Ok(())
}

async fn show(path: &str, table: Option<&str>) -> Result<()> {
    let board = open(path).await?;

    if let Some(reference) = table {
        let table = resolve(&board, reference)?;
        println!("{}", serde_json::to_string_pretty(board.get_table(table)?)?);
        return Ok(());
    }

    let manifest = board.manifest();
    println!("Board: {} ({})", manifest.name, manifest.id);
    println!("Modified: {}", manifest.modified_at);
    if board.tables().is_empty() {
        println!("No tables");
    } else {
        for table in board.tables() {
            print_table(table);
        }
    }
    Ok(())
}

async fn validate(path: &str, repair: bool) -> Result<()> {
    let mut board = open(path).await?;

    // Tables are repaired as they load, so report against the file as written
    let issues = board.load_issues().to_vec();
    for (id, table_issues) in &issues {
        println!("Table {}:", id);
        for issue in table_issues {
            println!("  - {}", issue);
        }
    }

    if issues.is_empty() {
        println!("All {} tables are consistent", board.tables().len());
    } else if repair {
        board.flush().await?;
        println!("Repaired {} tables", issues.len());
    } else {
        println!("{} tables need repair (run with --repair)", issues.len());
    }
    Ok(())
}

async fn edit<F>(path: &str, reference: &str, operation: F) -> Result<()>
where
    F: FnOnce(&Table, &slate_core::TableConfig) -> Table,
{
    let mut board = open(path).await?;
    let id = resolve(&board, reference)?;
    let current = board.get_table(id)?;
    let edited = operation(current, board.config());

    if edited == *current {
        println!("Table {} unchanged", id);
        return Ok(());
    }

    board.update_element(id, &edited, UpdateOptions::commit())?;
    board.flush().await?;
    print_table(&edited);
    Ok(())
}

async fn delete_table(path: &str, reference: &str) -> Result<()> {
    let mut board = open(path).await?;
    let id = resolve(&board, reference)?;
    board.delete_element(id, UpdateOptions::commit())?;
    board.flush().await?;
    println!("Deleted table: {}", id);
    Ok(())
}

fn print_table(table: &Table) {
    println!(
        "  {}  {}x{} at ({}, {})  {}x{}px",
        table.id, table.rows, table.cols, table.x, table.y, table.width, table.height
    );
    println!("    columns: {:?}", table.col_widths);
    println!("    rows:    {:?}", table.row_heights);
    for row in 0..table.rows {
        let texts: Vec<&str> = table.row_cells(row).map(|cell| cell.text.as_str()).collect();
        if texts.iter().any(|text| !text.is_empty()) {
            println!("    [{}] {}", row, texts.join(" | "));
        }
    }
}

async fn open(path: &str) -> Result<BoardStore> {
    let path = board_path(path)?;
    BoardStore::open(&path)
        .await
        .with_context(|| format!("failed to open board {}", path.display()))
}

fn board_path(path: &str) -> Result<PathBuf> {
    if path == "-" {
        let path = std::env::var("SLATE_BOARD").context("SLATE_BOARD is not set")?;
        return Ok(PathBuf::from(path));
    }
    Ok(PathBuf::from(path))
}

fn resolve(board: &BoardStore, reference: &str) -> Result<ElementId> {
    if let Ok(id) = ElementId::parse(reference) {
        return Ok(id);
    }
    board
        .find_by_prefix(reference)
        .map(|table| table.id)
        .ok_or_else(|| anyhow!("no unique table matches '{}'", reference))
}

fn parse_index(arg: &str) -> Result<usize> {
    arg.parse()
        .with_context(|| format!("expected a non-negative integer, got '{}'", arg))
}

fn parse_coord(arg: &str) -> Result<f64> {
    arg.parse()
        .with_context(|| format!("expected a number, got '{}'", arg))
}

fn parse_scale(arg: &str) -> Result<f64> {
    let scale = parse_coord(arg)?;
    if !scale.is_finite() || scale == 0.0 {
        bail!("scale must be a finite, non-zero number");
    }
    Ok(scale)
}
