//! Markdown notes organised in nested notebooks, with revision snapshots.
//!
//! The [`tree`] and [`diff`] modules are the pure core; everything else is
//! the file-backed CLI around them.

pub mod args;
pub mod category;
pub mod config;
pub mod diff;
pub mod error;
pub mod formatting;
mod history;
pub mod note;
mod notebooks;
pub mod operations;
pub mod revision;
pub mod store;
pub mod tree;

use crate::args::{ArgParser, split_notebook};
use crate::config::Config;
use crate::formatting::{
    FormatContext, preview_line, terminal_columns, truncate_with_ellipsis,
};
use crate::note::{
    Note, NoteStatus, ensure_dir, generate_id, is_header_safe, load_notes,
    note_path, timestamp_string, write_note,
};
use crate::operations::{load_note, resolve_notebook, update_body};
use crate::revision::save_revision;
use crate::store::load_notebooks;
use crate::tree::{flatten, roots};
use std::collections::HashSet;
use std::env;
use std::error::Error;
use std::fs;
use std::path::Path;
use std::process::{Command, Stdio};

pub use crate::category::{Category, CategoryWithCounts};
pub use crate::error::TreeError;

pub fn entry() -> Result<(), Box<dyn Error>> {
    config::init_logging();
    let mut args: Vec<String> = env::args().skip(1).collect();
    if args.is_empty() {
        print_help();
        return Ok(());
    }

    let cmd = args.remove(0);
    let config = Config::from_env()?;
    ensure_dir(&config.dir)?;
    tracing::debug!(command = %cmd, dir = %config.dir.display(), "dispatching");

    match cmd.as_str() {
        "new" => new_note(args, &config)?,
        "list" | "ls" => list_notes(args, &config)?,
        "view" => view_note(args, &config)?,
        "update" => update_note(args, &config)?,
        "edit" => edit_note(args, &config)?,
        "status" => set_status(args, &config)?,
        "trash" => trash_note(args, &config)?,
        "history" => history::show_history(args, &config)?,
        "diff" => history::diff_revisions(args, &config)?,
        "notebooks" => notebooks::list_notebooks(&config)?,
        "notebook" | "nb" => notebooks::notebook_command(args, &config)?,
        "path" => println!("{}", config.dir.display()),
        "help" | "--help" | "-h" => print_help(),
        other => {
            eprintln!("Unknown command: {other}");
            print_help();
        }
    }

    Ok(())
}

fn print_help() {
    println!(
        "\
Quick Notebooks CLI
Usage:
  qnb notebooks                                List notebooks as a tree with (direct/total) note counts
  qnb notebook add <name> [--parent <nb>]      Create a notebook, optionally nested under another
  qnb notebook move <nb> (--parent <nb> | --root)
                                               Move a notebook and its subtree
  qnb notebook delete <nb>                     Delete a notebook and its subtree (notes go to trash)
  qnb new <title> [body...] [-n <nb>]          New note in a notebook (default: first root notebook)
  qnb list [-n <nb>] [--all]                   List notes, optionally within a notebook subtree
  qnb view <id>                                Show a note
  qnb update <id> <body...>                    Replace the body, keeping the old one as a revision
  qnb edit <id>                                Edit in $EDITOR, keeping the old body as a revision
  qnb status <id> <status>                     active|on-hold|completed|dropped|archived
  qnb trash <id>                               Move a note to the trash
  qnb history <id>                             List stored revisions of a note
  qnb diff <id> <old-rev> [<new-rev>|current]  Compare two revisions line by line
  qnb path                                     Show the notes directory
  qnb help                                     Show this message

<nb> is a notebook id, path (Work/Projects) or unique name.

Environment:
  QUICK_NOTEBOOKS_DIR                          Notes directory (default: ~/.quick_notebooks)
  QUICK_NOTEBOOKS_DEFAULT                      Name of the seeded root notebook (default: Inbox)
  QUICK_NOTEBOOKS_LOG                          Log filter, e.g. debug (default: warn)
  NO_COLOR                                     Disable colored output
"
    );
}

fn new_note(args: Vec<String>, config: &Config) -> Result<(), Box<dyn Error>> {
    let (notebook_key, rest) = split_notebook(args)?;
    let mut rest = rest.into_iter();
    let title = rest
        .next()
        .ok_or("Usage: qnb new <title> [body...] [-n <notebook>]")?;
    if !is_header_safe(&title) {
        return Err("Note title must fit on one line".into());
    }
    let body = rest.collect::<Vec<_>>().join(" ");

    let nodes = load_notebooks(&config.dir, &config.default_notebook)?;
    let notebook = match &notebook_key {
        Some(key) => resolve_notebook(&nodes, key)?.name.clone(),
        None => roots(&nodes)
            .first()
            .map(|n| n.name.clone())
            .unwrap_or_else(|| config.default_notebook.clone()),
    };

    let note = create_note(&config.dir, title, body, notebook)?;
    println!("Created note {} ({}) in {}", note.id, note.title, note.notebook);
    Ok(())
}

fn create_note(
    dir: &Path,
    title: String,
    body: String,
    notebook: String,
) -> Result<Note, Box<dyn Error>> {
    let id = generate_id(|candidate| note_path(dir, candidate).exists());
    let now = timestamp_string();
    let mut note = Note {
        id,
        title,
        created: now.clone(),
        updated: now,
        notebook,
        status: NoteStatus::Active,
        deleted_at: None,
        body,
        size_bytes: 0,
    };
    write_note(&note, dir)?;
    note.size_bytes = fs::metadata(note_path(dir, &note.id))?.len();
    tracing::info!(id = %note.id, notebook = %note.notebook, "created note");
    Ok(note)
}

fn list_notes(args: Vec<String>, config: &Config) -> Result<(), Box<dyn Error>> {
    let (notebook_key, rest) = split_notebook(args)?;
    let mut show_all = false;
    for arg in rest {
        match arg.as_str() {
            "--all" | "-a" => show_all = true,
            other => return Err(format!("Unknown flag for list: {other}").into()),
        }
    }

    let mut notes = load_notes(&config.dir)?;
    if !show_all {
        notes.retain(|n| n.deleted_at.is_none());
    }
    if let Some(key) = &notebook_key {
        let nodes = load_notebooks(&config.dir, &config.default_notebook)?;
        let start = resolve_notebook(&nodes, key)?;
        let mut names: HashSet<String> = flatten(&nodes, Some(start.id.as_str()), true)
            .into_iter()
            .map(|n| n.name)
            .collect();
        names.insert(start.name.clone());
        notes.retain(|n| names.contains(&n.notebook));
    }
    notes.sort_by(|a, b| note::cmp_dt(&b.updated, &a.updated));

    if notes.is_empty() {
        println!("No notes yet. Try `qnb new \"title\"`.");
        return Ok(());
    }

    let ctx = FormatContext::new(config.use_color);
    let width = terminal_columns().saturating_sub(50).max(20);
    for n in notes {
        let mut marker = n.status.to_string();
        if n.deleted_at.is_some() {
            marker.push_str(", trashed");
        }
        let preview = if n.content().trim().is_empty() {
            n.title.clone()
        } else {
            format!("{} {}", n.title, preview_line(n.content()))
        };
        println!(
            "{} {} [{}] {} ({})",
            ctx.format_id(&n.id),
            ctx.format_timestamp(&n.updated),
            n.notebook,
            truncate_with_ellipsis(&preview, width),
            marker
        );
    }
    Ok(())
}

fn view_note(args: Vec<String>, config: &Config) -> Result<(), Box<dyn Error>> {
    let mut parser = ArgParser::new(args, "view");
    let id = parser.require("qnb view <id>")?;
    let note = load_note(&config.dir, &id)?;
    let ctx = FormatContext::new(config.use_color);
    println!(
        "{}\nNotebook: {}\nStatus: {}\nCreated: {}\nUpdated: {}\n\n{}",
        ctx.format_header(&format!("# {} ({})", note.title, note.id)),
        note.notebook,
        note.status,
        note.created,
        note.updated,
        note.content()
    );
    Ok(())
}

fn update_note(args: Vec<String>, config: &Config) -> Result<(), Box<dyn Error>> {
    let mut parser = ArgParser::new(args, "update");
    let id = parser.require("qnb update <id> <body...>")?;
    let body = parser.collect_remaining().join(" ");
    match update_body(&config.dir, &id, &body)? {
        Some(rev) => println!("Updated {id} (previous body saved as revision {})", rev.id),
        None => println!("No changes to {id}"),
    }
    Ok(())
}

fn edit_note(args: Vec<String>, config: &Config) -> Result<(), Box<dyn Error>> {
    let mut parser = ArgParser::new(args, "edit");
    let id = parser.require("qnb edit <id>")?;
    let before = load_note(&config.dir, &id)?;

    let status = Command::new(&config.editor)
        .arg(note_path(&config.dir, &id))
        .stdin(Stdio::inherit())
        .stdout(Stdio::inherit())
        .stderr(Stdio::inherit())
        .status()?;
    if !status.success() {
        return Err("Editor exited with non-zero status".into());
    }

    let mut after = load_note(&config.dir, &id)?;
    if after.content() == before.content() {
        println!("No changes to {id}");
        return Ok(());
    }
    let rev = save_revision(&config.dir, &id, before.content())?;
    after.updated = timestamp_string();
    write_note(&after, &config.dir)?;
    println!("Updated {id} (previous body saved as revision {})", rev.id);
    Ok(())
}

fn set_status(args: Vec<String>, config: &Config) -> Result<(), Box<dyn Error>> {
    const USAGE: &str = "qnb status <id> <status>";
    let mut parser = ArgParser::new(args, "status");
    let id = parser.require(USAGE)?;
    let status: NoteStatus = parser.require(USAGE)?.parse()?;
    let mut note = load_note(&config.dir, &id)?;
    note.status = status;
    note.updated = timestamp_string();
    write_note(&note, &config.dir)?;
    println!("Set {id} to {status}");
    Ok(())
}

fn trash_note(args: Vec<String>, config: &Config) -> Result<(), Box<dyn Error>> {
    let mut parser = ArgParser::new(args, "trash");
    let id = parser.require("qnb trash <id>")?;
    let mut note = load_note(&config.dir, &id)?;
    if note.deleted_at.is_some() {
        println!("Note {id} is already in the trash");
        return Ok(());
    }
    note.deleted_at = Some(timestamp_string());
    write_note(&note, &config.dir)?;
    println!("Moved {id} to trash");
    Ok(())
}
