//! Offline `content` and `layout` subcommands.
//!
//! These operate on the same files the server uses, without starting it.
//! Each returns the text to print.

use std::fmt::Write as _;

use anyhow::{Context, bail};
use codegear_content::{ContentStore, Durability, PartitionName};
use codegear_layout::{FileStorage, TableLayoutManager};
use tracing::info;

use crate::config::LayoutConfig;

// ── Content ────────────────────────────────────────────────────

fn parse_partition(partition: Option<&str>) -> anyhow::Result<Option<PartitionName>> {
    partition
        .map(|p| p.parse::<PartitionName>())
        .transpose()
        .context("expected one of notices, hero, company, social, technologies")
}

/// Pretty JSON of one partition, or the whole document.
pub fn content_show(store: &ContentStore, partition: Option<&str>) -> anyhow::Result<String> {
    let rendered = match parse_partition(partition)? {
        Some(name) => serde_json::to_string_pretty(&store.read_partition(name))?,
        None => serde_json::to_string_pretty(&store.read_document())?,
    };
    Ok(rendered)
}

pub fn content_reset(store: &ContentStore, partition: Option<&str>) -> anyhow::Result<String> {
    let name = parse_partition(partition)?;
    let outcome = store.reset(name)?;
    let what = name.map_or("all partitions".to_string(), |n| n.to_string());

    match outcome.durability {
        Durability::Persisted => Ok(format!("reset {what}")),
        Durability::CachedOnly => bail!("reset {what} could not be written to disk"),
        Durability::Volatile => Ok(format!("reset {what} (in memory only)")),
    }
}

// ── Layout ─────────────────────────────────────────────────────

/// Open the layout state file and register every configured table.
pub fn open_layout(config: &LayoutConfig) -> anyhow::Result<TableLayoutManager<FileStorage>> {
    let mut layout = TableLayoutManager::new(FileStorage::open(&config.state_file));
    for table in &config.tables {
        layout
            .register(table.clone())
            .with_context(|| format!("registering table {}", table.id))?;
    }
    info!(path = ?config.state_file, tables = config.tables.len(), "layout state opened");
    Ok(layout)
}

/// One row per column in display order.
pub fn layout_show(
    layout: &TableLayoutManager<FileStorage>,
    table: &str,
) -> anyhow::Result<String> {
    let state = layout.state(table)?;
    let mut out = String::new();
    writeln!(out, "{:<4}{:<14}{:<12}{:>8}{:>8}", "#", "COLUMN", "LABEL", "WIDTH", "MIN")?;
    for (i, column) in layout.ordered_columns(table)?.into_iter().enumerate() {
        let width = state.width(&column.id).unwrap_or(column.width);
        writeln!(
            out,
            "{:<4}{:<14}{:<12}{:>8}{:>8}",
            i + 1,
            column.id,
            column.label,
            width,
            column.min_width
        )?;
    }
    Ok(out)
}

fn require_column(
    layout: &TableLayoutManager<FileStorage>,
    table: &str,
    column: &str,
) -> anyhow::Result<()> {
    if layout.definition(table)?.column(column).is_none() {
        bail!("table {table} has no column {column}");
    }
    Ok(())
}

/// Move `column` into the slot currently held by `target`.
pub fn layout_reorder(
    layout: &mut TableLayoutManager<FileStorage>,
    table: &str,
    column: &str,
    target: &str,
) -> anyhow::Result<String> {
    require_column(layout, table, column)?;
    require_column(layout, table, target)?;

    if !layout.reorder(table, column, target)? {
        return Ok(format!("{column} is already in place"));
    }
    Ok(format!("order: {}", layout.state(table)?.order.join(", ")))
}

pub fn layout_resize(
    layout: &mut TableLayoutManager<FileStorage>,
    table: &str,
    column: &str,
    width: i64,
) -> anyhow::Result<String> {
    require_column(layout, table, column)?;
    match layout.resize(table, column, width)? {
        Some(stored) if i64::from(stored) != width => {
            Ok(format!("{column}: {stored}px (clamped to minimum)"))
        }
        Some(stored) => Ok(format!("{column}: {stored}px")),
        None => bail!("table {table} has no column {column}"),
    }
}

pub fn layout_reset(
    layout: &mut TableLayoutManager<FileStorage>,
    table: &str,
) -> anyhow::Result<String> {
    layout.reset(table)?;
    Ok(format!("{table}: layout restored to defaults"))
}

#[cfg(test)]
mod tests {
    use super::*;
    use codegear_layout::TableDefinition;

    fn layout_config(dir: &tempfile::TempDir) -> LayoutConfig {
        LayoutConfig {
            state_file: dir.path().join("table-layout.json"),
            tables: vec![TableDefinition::notices_page()],
        }
    }

    #[test]
    fn show_single_partition() {
        let store = ContentStore::open_in_memory();
        let out = content_show(&store, Some("company")).unwrap();
        let json: serde_json::Value = serde_json::from_str(&out).unwrap();
        assert!(json.get("copyrightYear").is_some());
        assert!(json.get("notices").is_none());
    }

    #[test]
    fn show_rejects_unknown_partition() {
        let store = ContentStore::open_in_memory();
        assert!(content_show(&store, Some("footer")).is_err());
    }

    #[test]
    fn reset_writes_file() {
        let dir = tempfile::tempdir().unwrap();
        let store = ContentStore::open(&dir.path().join("admin-data.json"));
        assert_eq!(content_reset(&store, Some("hero")).unwrap(), "reset hero");
        assert!(dir.path().join("admin-data.json").exists());

        let memory = ContentStore::open_in_memory();
        assert_eq!(
            content_reset(&memory, None).unwrap(),
            "reset all partitions (in memory only)"
        );
    }

    #[test]
    fn layout_changes_survive_reopen() {
        let dir = tempfile::tempdir().unwrap();
        let config = layout_config(&dir);

        let mut layout = open_layout(&config).unwrap();
        layout_reorder(&mut layout, "notices-page", "views", "id").unwrap();
        let msg = layout_resize(&mut layout, "notices-page", "title", 10).unwrap();
        assert_eq!(msg, "title: 200px (clamped to minimum)");
        drop(layout);

        let layout = open_layout(&config).unwrap();
        let state = layout.state("notices-page").unwrap();
        assert_eq!(state.order, vec!["views", "id", "category", "title", "date"]);
        assert_eq!(state.width("title"), Some(200));

        let table = layout_show(&layout, "notices-page").unwrap();
        let first_row = table.lines().nth(1).unwrap();
        assert!(first_row.contains("views"));
    }

    #[test]
    fn layout_reset_restores_defaults() {
        let dir = tempfile::tempdir().unwrap();
        let mut layout = open_layout(&layout_config(&dir)).unwrap();
        layout_resize(&mut layout, "notices-page", "date", 300).unwrap();
        layout_reset(&mut layout, "notices-page").unwrap();
        assert_eq!(layout.state("notices-page").unwrap().width("date"), Some(120));
    }

    #[test]
    fn layout_rejects_unknown_names() {
        let dir = tempfile::tempdir().unwrap();
        let mut layout = open_layout(&layout_config(&dir)).unwrap();
        assert!(layout_reorder(&mut layout, "notices-page", "author", "id").is_err());
        assert!(layout_resize(&mut layout, "staff", "name", 100).is_err());
        assert_eq!(
            layout_reorder(&mut layout, "notices-page", "id", "id").unwrap(),
            "id is already in place"
        );
    }
}
