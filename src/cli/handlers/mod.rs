use std::time::Duration;

use tracing::info;

use crate::cli::commands::*;
use crate::cli::output::*;
use crate::editor::search_client::SearchClient;
use crate::editor::{self, NO_BACKEND, TagEditor};
use crate::io::config_io::ResolvedConfig;
use crate::io::persist::Persistence;
use crate::io::search_backend::SearchWorker;
use crate::model::collection::TagRef;
use crate::model::search::{RequestToken, SearchRequest};

/// Slack on top of the endpoint timeout before a CLI search gives up
const SEARCH_GRACE: Duration = Duration::from_secs(1);

// ---------------------------------------------------------------------------
// Dispatch
// ---------------------------------------------------------------------------

pub fn dispatch(
    command: Commands,
    resolved: &ResolvedConfig,
    json: bool,
    ephemeral: bool,
) -> Result<(), Box<dyn std::error::Error>> {
    match command {
        Commands::List => cmd_list(resolved, ephemeral, json),
        Commands::Add(args) => cmd_add(args, resolved, ephemeral),
        Commands::Remove(args) => cmd_remove(args, resolved, ephemeral),
        Commands::Mv(args) => cmd_mv(args, resolved, ephemeral),
        Commands::Clear(args) => cmd_clear(args, resolved, ephemeral),
        Commands::Export(args) => cmd_export(args, resolved, ephemeral),
        Commands::Search(args) => cmd_search(args, resolved, json),
    }
}

/// An editor over the configured store with no search endpoint attached
fn open_editor(resolved: &ResolvedConfig, ephemeral: bool) -> TagEditor {
    TagEditor::new(
        Persistence::new(editor::open_store(resolved, ephemeral)),
        SearchClient::default(),
        None,
        &resolved.config.export.separator,
    )
}

/// Surface a failed write as a command error
fn check_saved(editor: &TagEditor) -> Result<(), Box<dyn std::error::Error>> {
    match editor.save_error() {
        Some(err) => Err(format!("could not save tags: {}", err).into()),
        None => Ok(()),
    }
}

// ---------------------------------------------------------------------------
// Read commands
// ---------------------------------------------------------------------------

fn cmd_list(
    resolved: &ResolvedConfig,
    ephemeral: bool,
    json: bool,
) -> Result<(), Box<dyn std::error::Error>> {
    let editor = open_editor(resolved, ephemeral);
    if json {
        let tags = collection_to_json(editor.collection());
        println!("{}", serde_json::to_string_pretty(&tags)?);
    } else {
        for label in editor.collection().iter() {
            println!("{}", label);
        }
    }
    Ok(())
}

fn cmd_export(
    args: ExportArgs,
    resolved: &ResolvedConfig,
    ephemeral: bool,
) -> Result<(), Box<dyn std::error::Error>> {
    let editor = open_editor(resolved, ephemeral);
    match args.separator {
        Some(sep) => println!("{}", editor.collection().to_delimited_string(&sep)),
        None => println!("{}", editor.exported()),
    }
    Ok(())
}

fn cmd_search(
    args: SearchArgs,
    resolved: &ResolvedConfig,
    json: bool,
) -> Result<(), Box<dyn std::error::Error>> {
    let query = args.query.trim();
    if query.is_empty() {
        return Err("search query is empty".into());
    }
    let backend = editor::open_backend(resolved)?.ok_or(NO_BACKEND)?;
    let worker = SearchWorker::spawn(backend);
    let token = RequestToken::default().next();
    worker.submit(SearchRequest {
        token,
        query: query.to_string(),
    });

    let timeout = Duration::from_millis(resolved.config.search.timeout_ms) + SEARCH_GRACE;
    let response = worker
        .wait(timeout)
        .ok_or_else(|| format!("search timed out after {:?}", timeout))?;
    let tags = response.outcome.map_err(|e| format!("search failed: {}", e))?;
    info!(query, results = tags.len(), "cli search");

    if json {
        let rows: Vec<CandidateJson> = tags.iter().map(candidate_to_json).collect();
        println!("{}", serde_json::to_string_pretty(&rows)?);
    } else if tags.is_empty() {
        eprintln!("No results found");
    } else {
        for tag in &tags {
            println!("{}", format_candidate_line(tag));
        }
    }
    Ok(())
}

// ---------------------------------------------------------------------------
// Write commands
// ---------------------------------------------------------------------------

fn cmd_add(
    args: AddArgs,
    resolved: &ResolvedConfig,
    ephemeral: bool,
) -> Result<(), Box<dyn std::error::Error>> {
    let mut editor = open_editor(resolved, ephemeral);
    for tag in &args.tags {
        if tag.trim().is_empty() {
            eprintln!("skipped blank tag");
        } else if editor.add(tag) {
            println!("{}", tag.trim());
        } else {
            eprintln!("skipped {} (already picked)", tag.trim());
        }
    }
    check_saved(&editor)
}

fn cmd_remove(
    args: RemoveArgs,
    resolved: &ResolvedConfig,
    ephemeral: bool,
) -> Result<(), Box<dyn std::error::Error>> {
    let mut editor = open_editor(resolved, ephemeral);
    let label = args.tag.trim();
    if !editor.remove(label) {
        return Err(format!("tag not found: {}", label).into());
    }
    check_saved(&editor)
}

fn cmd_mv(
    args: MvArgs,
    resolved: &ResolvedConfig,
    ephemeral: bool,
) -> Result<(), Box<dyn std::error::Error>> {
    let mut editor = open_editor(resolved, ephemeral);
    let label = args.tag.trim();
    if !editor.collection().contains(label) {
        return Err(format!("tag not found: {}", label).into());
    }
    let target = if args.top {
        0
    } else {
        args.position.ok_or("a position or --top is required")?
    };
    editor.move_tag(TagRef::Label(label), target);
    check_saved(&editor)
}

fn cmd_clear(
    args: ClearArgs,
    resolved: &ResolvedConfig,
    ephemeral: bool,
) -> Result<(), Box<dyn std::error::Error>> {
    let mut editor = open_editor(resolved, ephemeral);
    let count = editor.collection().len();
    if count > 0 && !args.yes {
        return Err(format!("refusing to clear {} tags without --yes", count).into());
    }
    editor.clear_confirmed();
    check_saved(&editor)?;
    println!("cleared {} tags", count);
    Ok(())
}
