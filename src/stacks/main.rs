use chrono::{DateTime, Datelike, Utc};
use clap::Parser;
use colored::*;
use directories::ProjectDirs;
use stacks::api::StacksApi;
use stacks::backup;
use stacks::catalog::{CatalogStats, Notice, Severity};
use stacks::config::StacksConfig;
use stacks::error::{Result, StacksError};
use stacks::model::{Book, BookDraft, BookPatch, BookStatus, Category};
use stacks::store::fs::FileStore;
use stacks::validate;
use std::path::PathBuf;
use unicode_width::UnicodeWidthStr;

mod args;
use args::{Cli, Commands};

fn main() {
    if let Err(e) = run() {
        eprintln!("Error: {}", e);
        std::process::exit(1);
    }
}

struct AppContext {
    api: StacksApi<FileStore>,
    config: StacksConfig,
    data_dir: PathBuf,
}

fn run() -> Result<()> {
    let cli = Cli::parse();
    let mut ctx = init_context()?;

    if ctx.config.flag_overdue {
        let flipped = ctx.api.flag_overdue(Utc::now())?;
        if !flipped.is_empty() {
            println!(
                "{}",
                format!("{} book(s) are now overdue.", flipped.len()).yellow()
            );
        }
    }

    match cli.command {
        Some(Commands::Add {
            title,
            author,
            isbn,
            category,
            year,
        }) => handle_add(&mut ctx, title, author, isbn, category, year),
        Some(Commands::List { search }) => handle_list(&ctx, search),
        Some(Commands::Search { term }) => handle_search(&ctx, &term),
        Some(Commands::Edit {
            selector,
            title,
            author,
            isbn,
            category,
            year,
        }) => handle_edit(&mut ctx, selector, title, author, isbn, category, year),
        Some(Commands::Issue { selector, member }) => handle_issue(&mut ctx, selector, member),
        Some(Commands::Return { selector }) => handle_return(&mut ctx, selector),
        Some(Commands::Delete { selector }) => handle_delete(&mut ctx, selector),
        Some(Commands::Stats) => handle_stats(&ctx),
        Some(Commands::Export { dest }) => handle_export(&ctx, dest),
        Some(Commands::Import { path }) => handle_import(&mut ctx, path),
        Some(Commands::Config { key, value }) => handle_config(&mut ctx, key, value),
        None => handle_list(&ctx, None),
    }
}

fn init_context() -> Result<AppContext> {
    let data_dir = match std::env::var_os("STACKS_HOME") {
        Some(dir) => PathBuf::from(dir),
        None => ProjectDirs::from("com", "stacks", "stacks")
            .ok_or_else(|| StacksError::Store("Could not determine data dir".to_string()))?
            .data_dir()
            .to_path_buf(),
    };

    let config = StacksConfig::load(&data_dir).unwrap_or_default();
    let api = StacksApi::load(FileStore::new(data_dir.clone()))?;

    Ok(AppContext {
        api,
        config,
        data_dir,
    })
}

fn parse_category(input: Option<String>) -> Result<Option<Category>> {
    match input {
        Some(s) => {
            let category = s.parse().map_err(|_| {
                StacksError::Api(format!(
                    "Unknown category '{}'. Valid categories: {}",
                    s,
                    Category::ALL.map(|c| c.label()).join(", ")
                ))
            })?;
            Ok(Some(category))
        }
        None => Ok(None),
    }
}

/// The form gate: print every field error, then refuse the submission.
fn check_draft(draft: &BookDraft) -> Result<()> {
    let errors = validate::validate(draft);
    if errors.is_empty() {
        return Ok(());
    }
    for (field, message) in errors.iter() {
        eprintln!("{}", format!("{}: {}", field, message).red());
    }
    Err(StacksError::Api("Book details are invalid".to_string()))
}

fn handle_add(
    ctx: &mut AppContext,
    title: String,
    author: String,
    isbn: String,
    category: Option<String>,
    year: Option<i32>,
) -> Result<()> {
    let draft = BookDraft {
        title,
        author,
        isbn,
        category: parse_category(category)?,
        published_year: year.unwrap_or_else(|| Utc::now().year()),
    };
    check_draft(&draft)?;

    let applied = ctx.api.add_book(draft)?;
    print_notice(&applied.notice);
    Ok(())
}

fn handle_list(ctx: &AppContext, search: Option<String>) -> Result<()> {
    println!("{}", format_stats(&ctx.api.stats()));
    println!();

    match search {
        Some(term) => print_books(ctx.api.books(), &ctx.api.search(&term)),
        None => print_books(ctx.api.books(), &ctx.api.search("")),
    }
    Ok(())
}

fn handle_search(ctx: &AppContext, term: &str) -> Result<()> {
    print_books(ctx.api.books(), &ctx.api.search(term));
    Ok(())
}

#[allow(clippy::too_many_arguments)]
fn handle_edit(
    ctx: &mut AppContext,
    selector: String,
    title: Option<String>,
    author: Option<String>,
    isbn: Option<String>,
    category: Option<String>,
    year: Option<i32>,
) -> Result<()> {
    let patch = BookPatch {
        title,
        author,
        isbn,
        category: parse_category(category)?,
        published_year: year,
    };
    if patch.is_empty() {
        return Err(StacksError::Api("Nothing to change".to_string()));
    }

    // Validate the book as it would look after the edit.
    let id = ctx.api.resolve(&selector)?;
    let book = ctx
        .api
        .books()
        .iter()
        .find(|book| book.id == id)
        .ok_or(StacksError::BookNotFound(id))?;
    let mut preview = book.clone();
    preview.apply(&patch);
    check_draft(&BookDraft {
        title: preview.title,
        author: preview.author,
        isbn: preview.isbn,
        category: Some(preview.category),
        published_year: preview.published_year,
    })?;

    let applied = ctx.api.update_book(&selector, &patch)?;
    print_notice(&applied.notice);
    Ok(())
}

fn handle_issue(ctx: &mut AppContext, selector: String, member: String) -> Result<()> {
    let member = validate::member_name(&member)
        .map_err(|message| StacksError::Api(message.to_string()))?;
    let applied = ctx.api.issue_book(&selector, member)?;

    print_notice(&applied.notice);
    if let Some(loan) = applied.book.loan() {
        println!(
            "{}",
            format!("Due {}.", loan.due_date.format("%Y-%m-%d")).dimmed()
        );
    }
    Ok(())
}

fn handle_return(ctx: &mut AppContext, selector: String) -> Result<()> {
    let applied = ctx.api.return_book(&selector)?;
    print_notice(&applied.notice);
    Ok(())
}

fn handle_delete(ctx: &mut AppContext, selector: String) -> Result<()> {
    let applied = ctx.api.delete_book(&selector)?;
    print_notice(&applied.notice);
    Ok(())
}

fn handle_stats(ctx: &AppContext) -> Result<()> {
    let stats = ctx.api.stats();
    println!("Total:     {}", stats.total);
    println!("Available: {}", stats.available.to_string().green());
    println!("Issued:    {}", stats.issued.to_string().yellow());
    println!("Overdue:   {}", stats.overdue.to_string().red());
    Ok(())
}

fn handle_export(ctx: &AppContext, dest: Option<PathBuf>) -> Result<()> {
    let books = ctx.api.books();
    if books.is_empty() {
        println!("{}", "No books to export.".dimmed());
        return Ok(());
    }

    let dest = match dest {
        Some(dir) => dir,
        None => std::env::current_dir().map_err(StacksError::Io)?,
    };
    let path = backup::export_catalog(books, &dest)?;
    println!("{}", format!("Exported to {}", path.display()).green());
    Ok(())
}

fn handle_import(ctx: &mut AppContext, path: PathBuf) -> Result<()> {
    let incoming = backup::import_catalog(&path)?;
    let appended = ctx.api.merge_books(incoming)?;
    if appended == 0 {
        println!("{}", "No new books to import.".dimmed());
    } else {
        print_notice(&Notice::new(
            "Catalog Imported",
            format!("{} book(s) restored from backup.", appended),
        ));
    }
    Ok(())
}

fn handle_config(ctx: &mut AppContext, key: Option<String>, value: Option<String>) -> Result<()> {
    match (key.as_deref(), value) {
        (None, _) | (Some("flag-overdue"), None) => {
            println!("flag-overdue = {}", ctx.config.flag_overdue);
        }
        (Some("flag-overdue"), Some(v)) => {
            ctx.config.flag_overdue = v.parse().map_err(|_| {
                StacksError::Api(format!("Expected true or false, got '{}'", v))
            })?;
            ctx.config.save(&ctx.data_dir)?;
            println!("{}", "Config updated".green());
        }
        (Some(other), _) => {
            println!("Unknown config key: {}", other);
        }
    }
    Ok(())
}

fn print_notice(notice: &Notice) {
    let title = match notice.severity {
        Severity::Default => notice.title.green().bold(),
        Severity::Destructive => notice.title.red().bold(),
    };
    println!("{} {}", title, notice.description);
}

fn format_stats(stats: &CatalogStats) -> String {
    format!(
        "{} books: {} available, {} issued, {} overdue",
        stats.total.to_string().bold(),
        stats.available.to_string().green(),
        stats.issued.to_string().yellow(),
        stats.overdue.to_string().red(),
    )
}

const LINE_WIDTH: usize = 100;
const TIME_WIDTH: usize = 14;
const STATUS_WIDTH: usize = 11;

fn print_books(all: &[Book], listed: &[&Book]) {
    if listed.is_empty() {
        println!("No books found.");
        return;
    }

    for book in listed {
        // Positions always refer to the full catalog so they stay valid
        // as selectors even in filtered listings.
        let position = all
            .iter()
            .position(|b| b.id == book.id)
            .map(|i| i + 1)
            .unwrap_or(0);
        print_book_line(position, book);
    }
}

fn print_book_line(position: usize, book: &Book) {
    let idx_str = format!("{:>3}. ", position);
    let label = format!("{} by {} [{}]", book.title, book.author, book.category);

    let fixed_width = idx_str.width() + STATUS_WIDTH + TIME_WIDTH;
    let available = LINE_WIDTH.saturating_sub(fixed_width);
    let label_display = truncate_to_width(&label, available);
    let padding = available.saturating_sub(label_display.width());

    let status = book.status();
    let status_str = format!("{:<width$}", status.label(), width = STATUS_WIDTH);
    let status_colored = match status {
        BookStatus::Available => status_str.green(),
        BookStatus::Issued => status_str.yellow(),
        BookStatus::Overdue => status_str.red(),
    };

    println!(
        "{}{}{}{}{}",
        idx_str,
        label_display,
        " ".repeat(padding),
        status_colored,
        format_time_ago(book.created_at).dimmed()
    );

    if let Some(loan) = book.loan() {
        println!(
            "{}",
            format!(
                "     issued to {}, due {}",
                loan.issued_to,
                loan.due_date.format("%Y-%m-%d")
            )
            .dimmed()
        );
    }
}

fn truncate_to_width(s: &str, max_width: usize) -> String {
    use unicode_width::UnicodeWidthChar;

    let mut result = String::new();
    let mut current_width = 0;

    for c in s.chars() {
        let char_width = c.width().unwrap_or(0);
        if current_width + char_width > max_width.saturating_sub(1) {
            result.push('…');
            return result;
        }
        result.push(c);
        current_width += char_width;
    }

    result
}

fn format_time_ago(timestamp: DateTime<Utc>) -> String {
    let duration = Utc::now().signed_duration_since(timestamp);
    let formatter = timeago::Formatter::new();
    let time_str = formatter.convert(duration.to_std().unwrap_or_default());
    format!("{:>width$}", time_str, width = TIME_WIDTH)
}
