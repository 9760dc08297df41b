use clap::{Parser, Subcommand};
use std::path::PathBuf;

#[derive(Parser, Debug)]
#[command(name = "stacks", version)]
#[command(about = "Local-first library catalog manager", long_about = None)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Option<Commands>,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Add a book to the catalog
    #[command(alias = "a")]
    Add {
        /// Book title
        #[arg(long, default_value = "")]
        title: String,

        /// Author name
        #[arg(long, default_value = "")]
        author: String,

        /// ISBN, stored as free text
        #[arg(long, default_value = "")]
        isbn: String,

        /// Category (e.g. Fiction, Science, Self-Help)
        #[arg(long)]
        category: Option<String>,

        /// Publication year (defaults to the current year)
        #[arg(long)]
        year: Option<i32>,
    },

    /// List the catalog with summary counts
    #[command(alias = "ls")]
    List {
        /// Only show books matching a search term
        #[arg(short, long)]
        search: Option<String>,
    },

    /// Search by title, author, or category
    #[command(alias = "s")]
    Search {
        /// Search term
        term: String,
    },

    /// Edit a book's details
    #[command(alias = "e")]
    Edit {
        /// Book to edit (list position, id, or id prefix)
        selector: String,

        #[arg(long)]
        title: Option<String>,

        #[arg(long)]
        author: Option<String>,

        #[arg(long)]
        isbn: Option<String>,

        #[arg(long)]
        category: Option<String>,

        #[arg(long)]
        year: Option<i32>,
    },

    /// Issue a book to a member
    #[command(alias = "i")]
    Issue {
        /// Book to issue (list position, id, or id prefix)
        selector: String,

        /// Member the book goes to
        member: String,
    },

    /// Return an issued book
    #[command(alias = "r")]
    Return {
        /// Book to return (list position, id, or id prefix)
        selector: String,
    },

    /// Delete a book from the catalog
    #[command(alias = "rm")]
    Delete {
        /// Book to delete (list position, id, or id prefix)
        selector: String,
    },

    /// Show the summary counters
    Stats,

    /// Back up the catalog to a tar.gz archive
    Export {
        /// Directory to write the archive into (defaults to the current dir)
        #[arg(long)]
        dest: Option<PathBuf>,
    },

    /// Restore books from a backup archive
    Import {
        /// Archive produced by `stacks export`
        path: PathBuf,
    },

    /// Show or change configuration
    Config {
        /// Config key (currently: flag-overdue)
        key: Option<String>,

        /// New value for the key
        value: Option<String>,
    },
}
