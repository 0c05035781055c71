//! Problem command implementations (add, edit, show, list, delete).

use crate::cli::{ListArgs, ProblemArgs};
use crate::config::open_storage;
use crate::error::{Error, Result};
use crate::model::{parse_tags, Difficulty, Problem};
use crate::storage::{ProblemFilter, ProblemSummary};
use crate::sync::ProblemDocument;
use crate::validate::{normalize_difficulty, validate_problem};
use serde::Serialize;
use std::path::Path;
use tracing::debug;

/// Output for add and edit.
#[derive(Serialize)]
struct WriteOutput<'a> {
    id: i64,
    title: &'a str,
    solutions: usize,
    implementations: usize,
}

/// Output for show: the exchange document plus its id.
#[derive(Serialize)]
struct ShowOutput {
    id: i64,
    #[serde(flatten)]
    document: ProblemDocument,
}

/// Output for list.
#[derive(Serialize)]
struct ListOutput {
    items: Vec<ProblemSummary>,
    count: usize,
}

/// Output for delete.
#[derive(Serialize)]
struct DeleteOutput {
    requested: Vec<i64>,
    deleted: usize,
}

/// Execute the add command.
///
/// # Errors
///
/// Returns an error if the document cannot be read, the title is blank, or
/// the store rejects the write.
pub fn add(args: &ProblemArgs, db_path: Option<&Path>, json: bool) -> Result<()> {
    let mut storage = open_storage(db_path)?;

    let mut problem: Problem = match &args.file {
        Some(path) => read_document(path)?.into(),
        None => Problem::default(),
    };
    apply_overrides(&mut problem, args)?;
    validate_problem(&problem)?;

    if crate::is_dry_run() {
        println!(
            "Would add problem: {} ({} solutions, {} implementations)",
            problem.title,
            problem.solutions.len(),
            problem.implementation_count()
        );
        return Ok(());
    }

    let id = storage.add_problem(&problem)?;
    print_written("Added", id, &problem, json)
}

/// Execute the edit command.
///
/// With `--file` the whole tree is taken from the document. With field flags
/// only, the stored tree is loaded, patched and written back in full.
///
/// # Errors
///
/// Returns [`Error::ProblemNotFound`] for an unknown id,
/// [`Error::InvalidArgument`] when nothing would change, or any read,
/// validation or store error.
pub fn edit(id: i64, args: &ProblemArgs, db_path: Option<&Path>, json: bool) -> Result<()> {
    let mut storage = open_storage(db_path)?;

    let mut problem: Problem = match &args.file {
        Some(path) => read_document(path)?.into(),
        None if args.has_field_overrides() => storage
            .get_problem(id)?
            .ok_or(Error::ProblemNotFound { id })?,
        None => {
            return Err(Error::InvalidArgument(
                "Nothing to change: pass --file or at least one field flag".to_string(),
            ));
        }
    };
    apply_overrides(&mut problem, args)?;
    validate_problem(&problem)?;

    if crate::is_dry_run() {
        if !storage.problem_exists(id)? {
            return Err(Error::ProblemNotFound { id });
        }
        println!(
            "Would replace problem #{id}: {} ({} solutions, {} implementations)",
            problem.title,
            problem.solutions.len(),
            problem.implementation_count()
        );
        return Ok(());
    }

    storage.replace_problem(id, &problem)?;
    print_written("Updated", id, &problem, json)
}

/// Execute the show command.
///
/// # Errors
///
/// Returns [`Error::ProblemNotFound`] for an unknown id.
pub fn show(id: i64, db_path: Option<&Path>, json: bool) -> Result<()> {
    let storage = open_storage(db_path)?;
    let problem = storage
        .get_problem(id)?
        .ok_or(Error::ProblemNotFound { id })?;

    if json {
        let output = ShowOutput {
            id,
            document: ProblemDocument::from(&problem),
        };
        println!("{}", serde_json::to_string(&output)?);
        return Ok(());
    }

    print!("{}", render_tree(id, &problem));
    Ok(())
}

/// Execute the list command.
///
/// # Errors
///
/// Returns an error for an unknown difficulty or a failed query.
pub fn list(args: &ListArgs, db_path: Option<&Path>, json: bool) -> Result<()> {
    let storage = open_storage(db_path)?;

    let filter = ProblemFilter {
        platform: args.platform.clone(),
        difficulty: args
            .difficulty
            .as_deref()
            .map(normalize_difficulty)
            .transpose()?,
        tag: args.tag.clone(),
        search: args.search.clone(),
        limit: args.limit,
    };
    debug!(?filter, "Listing problems");

    let items = storage.list_problems(&filter)?;

    if json {
        let output = ListOutput {
            count: items.len(),
            items,
        };
        println!("{}", serde_json::to_string(&output)?);
        return Ok(());
    }

    if items.is_empty() {
        println!("No problems found.");
        return Ok(());
    }

    for item in &items {
        let tags = if item.tags.is_empty() {
            String::new()
        } else {
            format!("  [{}]", item.tags.join(", "))
        };
        println!(
            "{:>5}  {:<6}  {:<12}  {}{}  ({} sol, {} impl)",
            format!("#{}", item.id),
            item.difficulty.label(),
            item.platform,
            item.title,
            tags,
            item.solution_count,
            item.implementation_count
        );
    }
    println!("\n{} problem(s)", items.len());

    Ok(())
}

/// Execute the delete command.
///
/// Unknown ids are ignored; the count reports what was actually removed.
///
/// # Errors
///
/// Returns an error if the store rejects the delete.
pub fn delete(ids: &[i64], db_path: Option<&Path>, json: bool) -> Result<()> {
    let mut storage = open_storage(db_path)?;
    let ids = unique_ids(ids);

    if crate::is_dry_run() {
        let mut found = Vec::new();
        for &id in &ids {
            if storage.problem_exists(id)? {
                found.push(id);
            }
        }
        println!("Would delete {} problem(s): {found:?}", found.len());
        return Ok(());
    }

    let deleted = storage.delete_problems(&ids)?;

    if crate::is_silent() {
        println!("{deleted}");
        return Ok(());
    }

    if json {
        let output = DeleteOutput {
            requested: ids,
            deleted,
        };
        println!("{}", serde_json::to_string(&output)?);
    } else {
        println!("Deleted {deleted} problem(s)");
        if deleted < ids.len() {
            println!("  {} id(s) did not exist", ids.len() - deleted);
        }
    }

    Ok(())
}

// ============================================================================
// Helpers
// ============================================================================

/// Drop repeated ids, keeping first occurrence.
fn unique_ids(ids: &[i64]) -> Vec<i64> {
    let mut out: Vec<i64> = Vec::with_capacity(ids.len());
    for &id in ids {
        if !out.contains(&id) {
            out.push(id);
        }
    }
    out
}

/// Read one JSON document from a file, or from stdin when the path is `-`.
fn read_document(path: &Path) -> Result<ProblemDocument> {
    let text = if path == Path::new("-") {
        std::io::read_to_string(std::io::stdin())?
    } else {
        std::fs::read_to_string(path)?
    };
    Ok(serde_json::from_str(&text)?)
}

/// Apply scalar flags on top of a problem.
fn apply_overrides(problem: &mut Problem, args: &ProblemArgs) -> Result<()> {
    if let Some(title) = &args.title {
        problem.title.clone_from(title);
    }
    if let Some(platform) = &args.platform {
        problem.platform.clone_from(platform);
    }
    if let Some(description) = &args.description {
        problem.description.clone_from(description);
    }
    if let Some(url) = &args.url {
        problem.url.clone_from(url);
    }
    if let Some(difficulty) = &args.difficulty {
        problem.difficulty = normalize_difficulty(difficulty)?;
    }
    if let Some(tags) = &args.tags {
        problem.tags = parse_tags(tags);
    }
    Ok(())
}

fn print_written(verb: &str, id: i64, problem: &Problem, json: bool) -> Result<()> {
    if crate::is_silent() {
        println!("{id}");
        return Ok(());
    }

    if json {
        let output = WriteOutput {
            id,
            title: &problem.title,
            solutions: problem.solutions.len(),
            implementations: problem.implementation_count(),
        };
        println!("{}", serde_json::to_string(&output)?);
    } else {
        println!("{verb} problem #{id}: {}", problem.title);
        println!(
            "  {} solution(s), {} implementation(s)",
            problem.solutions.len(),
            problem.implementation_count()
        );
    }
    Ok(())
}

/// Human-readable tree for `show`.
fn render_tree(id: i64, problem: &Problem) -> String {
    use std::fmt::Write;

    let mut out = String::new();
    let _ = write!(out, "#{id} {}", problem.title);
    if problem.difficulty != Difficulty::Unset {
        let _ = write!(out, "  [{}]", problem.difficulty);
    }
    if !problem.platform.is_empty() {
        let _ = write!(out, "  {}", problem.platform);
    }
    out.push('\n');

    if !problem.url.is_empty() {
        let _ = writeln!(out, "  url:  {}", problem.url);
    }
    if !problem.tags.is_empty() {
        let _ = writeln!(out, "  tags: {}", problem.tags_text());
    }
    if !problem.description.is_empty() {
        out.push('\n');
        for line in problem.description.lines() {
            let _ = writeln!(out, "  {line}");
        }
    }

    let _ = writeln!(out, "\nSolutions ({}):", problem.solutions.len());
    for solution in &problem.solutions {
        let language = if solution.language.is_empty() {
            "(no language)"
        } else {
            solution.language.as_str()
        };
        let _ = writeln!(
            out,
            "  {language} ({} implementation(s))",
            solution.implementations.len()
        );
        for imp in &solution.implementations {
            let _ = write!(out, "    - {}", imp.method_name);
            if !imp.url.is_empty() {
                let _ = write!(out, "  <{}>", imp.url);
            }
            out.push('\n');
            if !imp.explanation.is_empty() {
                let _ = writeln!(out, "      {}", imp.explanation);
            }
            for line in imp.code.lines() {
                let _ = writeln!(out, "      | {line}");
            }
            if !imp.notes.is_empty() {
                let _ = writeln!(out, "      notes: {}", imp.notes);
            }
        }
    }

    out
}
