//! `notebooks` and `notebook add|move|delete` commands.

use crate::args::ArgParser;
use crate::config::Config;
use crate::formatting::FormatContext;
use crate::note::load_notes;
use crate::operations::{create_notebook, delete_notebook, resolve_notebook};
use crate::store::{load_notebooks, save_notebooks};
use crate::tree::{flatten, move_category, with_counts};
use std::error::Error;

pub(crate) fn list_notebooks(config: &Config) -> Result<(), Box<dyn Error>> {
    let nodes = load_notebooks(&config.dir, &config.default_notebook)?;
    let notes = load_notes(&config.dir)?;
    let ordered = flatten(&nodes, None, true);
    let ctx = FormatContext::new(config.use_color);
    for entry in with_counts(&ordered, &notes) {
        println!("{}", ctx.format_notebook_row(&entry));
    }
    Ok(())
}

pub(crate) fn notebook_command(
    args: Vec<String>,
    config: &Config,
) -> Result<(), Box<dyn Error>> {
    let mut args = args.into_iter();
    let sub = args.next().unwrap_or_default();
    let rest: Vec<String> = args.collect();
    match sub.as_str() {
        "add" => add_notebook(rest, config),
        "move" | "mv" => move_notebook(rest, config),
        "delete" | "rm" => remove_notebook(rest, config),
        "" | "list" => list_notebooks(config),
        other => Err(format!(
            "Unknown notebook command: {other} (expected add|move|delete)"
        )
        .into()),
    }
}

fn add_notebook(args: Vec<String>, config: &Config) -> Result<(), Box<dyn Error>> {
    const USAGE: &str = "qnb notebook add <name> [--parent <notebook>]";
    let mut parser = ArgParser::new(args, "notebook add");
    let mut name: Option<String> = None;
    let mut parent_key: Option<String> = None;
    while let Some(arg) = parser.next() {
        match arg.as_str() {
            "-p" | "--parent" => parent_key = Some(parser.extract_value(&arg)?),
            other if other.starts_with('-') => return Err(parser.unknown_flag(other)),
            other if name.is_none() => name = Some(other.to_string()),
            _ => return Err(format!("Usage: {USAGE}").into()),
        }
    }
    let name = name.ok_or(format!("Usage: {USAGE}"))?;

    let nodes = load_notebooks(&config.dir, &config.default_notebook)?;
    let parent_id = match &parent_key {
        Some(key) => Some(resolve_notebook(&nodes, key)?.id.clone()),
        None => None,
    };
    let (next, id) = create_notebook(&nodes, &name, parent_id.as_deref())?;
    let saved = save_notebooks(&config.dir, &next)?;
    let path = saved
        .iter()
        .find(|n| n.id == id)
        .map(|n| n.path.clone())
        .unwrap_or(name);
    println!("Created notebook {id} ({path})");
    Ok(())
}

fn move_notebook(args: Vec<String>, config: &Config) -> Result<(), Box<dyn Error>> {
    const USAGE: &str = "qnb notebook move <notebook> (--parent <notebook> | --root)";
    let mut parser = ArgParser::new(args, "notebook move");
    let mut key: Option<String> = None;
    let mut target: Option<Option<String>> = None;
    while let Some(arg) = parser.next() {
        match arg.as_str() {
            "-p" | "--parent" => target = Some(Some(parser.extract_value(&arg)?)),
            "--root" => target = Some(None),
            other if other.starts_with('-') => return Err(parser.unknown_flag(other)),
            other if key.is_none() => key = Some(other.to_string()),
            _ => return Err(format!("Usage: {USAGE}").into()),
        }
    }
    let (Some(key), Some(target)) = (key, target) else {
        return Err(format!("Usage: {USAGE}").into());
    };

    let nodes = load_notebooks(&config.dir, &config.default_notebook)?;
    let id = resolve_notebook(&nodes, &key)?.id.clone();
    let parent_id = match &target {
        Some(t) => Some(resolve_notebook(&nodes, t)?.id.clone()),
        None => None,
    };
    let moved = move_category(&id, parent_id.as_deref(), &nodes)?;
    let saved = save_notebooks(&config.dir, &moved)?;
    if let Some(node) = saved.iter().find(|n| n.id == id) {
        println!("Moved notebook {} to {}", node.id, node.path);
    }
    Ok(())
}

fn remove_notebook(args: Vec<String>, config: &Config) -> Result<(), Box<dyn Error>> {
    let mut parser = ArgParser::new(args, "notebook delete");
    let key = parser.require("qnb notebook delete <notebook>")?;

    let nodes = load_notebooks(&config.dir, &config.default_notebook)?;
    let target = resolve_notebook(&nodes, &key)?;
    let path = target.path.clone();
    let id = target.id.clone();
    let outcome = delete_notebook(&config.dir, &nodes, &id)?;
    println!(
        "Deleted notebook {path} ({} notebook(s) removed, {} note(s) moved to trash)",
        outcome.removed.len(),
        outcome.trashed_notes.len()
    );
    Ok(())
}
