//! `history` and `diff` commands over stored revisions.

use crate::args::ArgParser;
use crate::config::Config;
use crate::diff::compare;
use crate::formatting::{
    FormatContext, preview_line, terminal_columns, truncate_with_ellipsis,
};
use crate::operations::load_note;
use crate::revision::{CURRENT, Revision, list_revisions, load_revision};
use std::error::Error;

pub(crate) fn show_history(
    args: Vec<String>,
    config: &Config,
) -> Result<(), Box<dyn Error>> {
    let mut parser = ArgParser::new(args, "history");
    let id = parser.require("qnb history <id>")?;
    let note = load_note(&config.dir, &id)?;
    let revisions = list_revisions(&config.dir, &id)?;
    let ctx = FormatContext::new(config.use_color);

    println!("{}", ctx.format_header(&format!("# {} ({})", note.title, note.id)));
    let width = terminal_columns().saturating_sub(40).max(20);
    let current = Revision::current(&note);
    for rev in revisions.iter().chain(std::iter::once(&current)) {
        println!(
            "{} {} {}",
            ctx.format_id(&format!("{:<9}", rev.id)),
            ctx.format_timestamp(&rev.created),
            truncate_with_ellipsis(&preview_line(&rev.content), width)
        );
    }
    Ok(())
}

fn resolve_revision(
    config: &Config,
    note_id: &str,
    rev_id: &str,
) -> Result<Revision, Box<dyn Error>> {
    if rev_id == CURRENT {
        let note = load_note(&config.dir, note_id)?;
        return Ok(Revision::current(&note));
    }
    Ok(load_revision(&config.dir, note_id, rev_id)?)
}

pub(crate) fn diff_revisions(
    args: Vec<String>,
    config: &Config,
) -> Result<(), Box<dyn Error>> {
    const USAGE: &str = "qnb diff <id> <old-rev> [<new-rev>|current]";
    let mut parser = ArgParser::new(args, "diff");
    let note_id = parser.require(USAGE)?;
    let old_id = parser.require(USAGE)?;
    let new_id = if parser.has_more() {
        parser.require(USAGE)?
    } else {
        CURRENT.to_string()
    };

    let old = resolve_revision(config, &note_id, &old_id)?;
    let new = resolve_revision(config, &note_id, &new_id)?;
    let comparison = compare(&old, &new);
    let ctx = FormatContext::new(config.use_color);

    println!(
        "{}",
        ctx.format_header(&format!(
            "Comparing {} -> {} (similarity {}%)",
            comparison.old_revision.id,
            comparison.new_revision.id,
            comparison.similarity
        ))
    );
    let diff = &comparison.diff;
    for line in diff.lines() {
        println!("{}", ctx.format_diff_line(line));
    }
    if diff.is_identical() {
        println!("No changes.");
    }
    println!("Unchanged lines: {}", diff.unchanged);
    Ok(())
}
