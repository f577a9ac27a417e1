use anyhow::{Context, Result};
use clap::{Parser, Subcommand, ValueEnum};
use docfind::{DocFinder, FinderOptions, MemoryStore, Reindex, SearchResult, SledStore, Store};
use serde::Serialize;
use std::fs;
use std::io::{BufRead, Write};
use std::path::{Path, PathBuf};
use walkdir::WalkDir;

#[derive(Parser, Debug)]
#[command(name = "docfind")]
#[command(about = "Index text documents and search them", long_about = None)]
pub struct Cli {
    /// Database directory
    #[arg(long, env = "DOCFIND_DB", default_value = "./docfind-db", global = true)]
    pub db: PathBuf,
    /// Keep the index in memory instead of opening the database
    #[arg(long, default_value_t = false, global = true)]
    pub memory: bool,
    /// What to do when a document name is added again
    #[arg(long, env = "DOCFIND_REINDEX", value_enum, default_value_t = ReindexMode::Accumulate, global = true)]
    pub reindex: ReindexMode,
    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Copy, Clone, Debug, PartialEq, Eq, ValueEnum)]
pub enum ReindexMode {
    /// Keep earlier postings; counts keep growing
    Accumulate,
    /// Drop the document's earlier postings first
    Replace,
}

impl From<ReindexMode> for Reindex {
    fn from(mode: ReindexMode) -> Self {
        match mode {
            ReindexMode::Accumulate => Reindex::Accumulate,
            ReindexMode::Replace => Reindex::Replace,
        }
    }
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Register the words in the given files as noise words
    Noise {
        #[arg(required = true)]
        files: Vec<PathBuf>,
    },
    /// Index files; directories are walked recursively
    Add {
        #[arg(required = true)]
        paths: Vec<PathBuf>,
    },
    /// Search indexed documents
    Find {
        /// Index of the first result to show
        #[arg(long, default_value_t = 0)]
        start: usize,
        /// Number of results to show
        #[arg(long, default_value_t = 5)]
        count: usize,
        /// Print the page as JSON
        #[arg(long, default_value_t = false)]
        json: bool,
        #[arg(required = true)]
        terms: Vec<String>,
    },
    /// Complete the last word of TEXT from the indexed vocabulary
    Complete { text: String },
    /// Print the content of a document
    Get { name: String },
    /// Print vocabulary and noise word counts
    Stats,
    /// Remove all documents, postings and noise words
    Clear,
    /// Read queries from stdin; a line starting with `?` is completed instead
    Shell {
        /// Noise word file to load first
        #[arg(long)]
        noise: Option<PathBuf>,
        /// Files or directories to index first
        paths: Vec<PathBuf>,
    },
}

#[derive(Serialize)]
pub struct SearchPage<'a> {
    pub query: String,
    pub total: usize,
    pub start: usize,
    pub next: Option<usize>,
    pub previous: Option<usize>,
    pub results: &'a [SearchResult],
}

impl<'a> SearchPage<'a> {
    pub fn new(query: String, results: &'a [SearchResult], start: usize, count: usize) -> Self {
        let total = results.len();
        let begin = start.min(total);
        let end = start.saturating_add(count).min(total);
        Self {
            query,
            total,
            start: begin,
            next: (end < total).then_some(end),
            previous: (begin > 0).then(|| begin.saturating_sub(count)),
            results: &results[begin..end],
        }
    }
}

pub fn open_store(cli: &Cli) -> Result<Box<dyn Store>> {
    if cli.memory {
        return Ok(Box::new(MemoryStore::new()));
    }
    let store = SledStore::open(&cli.db)
        .with_context(|| format!("opening database {}", cli.db.display()))?;
    Ok(Box::new(store))
}

pub fn run<R: BufRead, W: Write>(cli: Cli, input: R, out: &mut W) -> Result<()> {
    let store = open_store(&cli)?;
    let mut finder = DocFinder::with_options(store, FinderOptions { reindex: cli.reindex.into() });

    match cli.command {
        Commands::Noise { files } => {
            let mut registered = 0;
            for file in files {
                registered += add_noise_file(&mut finder, &file)?;
            }
            writeln!(out, "registered {registered} noise words")?;
        }
        Commands::Add { paths } => {
            for name in add_paths(&mut finder, &paths)? {
                writeln!(out, "added {name}")?;
            }
        }
        Commands::Find { start, count, json, terms } => {
            let query = terms.join(" ");
            let results = finder.search(&query)?;
            let page = SearchPage::new(query, &results, start, count);
            if json {
                serde_json::to_writer_pretty(&mut *out, &page)?;
                writeln!(out)?;
            } else {
                print_page(out, &page)?;
            }
        }
        Commands::Complete { text } => {
            for word in finder.complete(&text)? {
                writeln!(out, "{word}")?;
            }
        }
        Commands::Get { name } => {
            let content = finder.doc_content(&name)?;
            write!(out, "{content}")?;
            if !content.ends_with('\n') {
                writeln!(out)?;
            }
        }
        Commands::Stats => {
            let words = finder.store().list_vocabulary()?.len();
            let noise = finder.store().list_noise_words()?.len();
            writeln!(out, "words: {words}")?;
            writeln!(out, "noise words: {noise}")?;
        }
        Commands::Clear => {
            finder.clear()?;
            writeln!(out, "cleared")?;
        }
        Commands::Shell { noise, paths } => {
            if let Some(file) = noise {
                add_noise_file(&mut finder, &file)?;
            }
            add_paths(&mut finder, &paths)?;
            shell(&finder, input, out)?;
        }
    }

    finder.close()?;
    Ok(())
}

fn add_noise_file<S: Store>(finder: &mut DocFinder<S>, file: &Path) -> Result<usize> {
    let text = fs::read_to_string(file).with_context(|| format!("reading noise words from {}", file.display()))?;
    Ok(finder.add_noise_words(&text)?)
}

/// Indexes every file under `paths`. A document is named after its file, minus the extension.
fn add_paths<S: Store>(finder: &mut DocFinder<S>, paths: &[PathBuf]) -> Result<Vec<String>> {
    let mut added = Vec::new();
    for file in collect_files(paths) {
        let name = document_name(&file);
        let content = fs::read_to_string(&file).with_context(|| format!("reading {}", file.display()))?;
        finder
            .add_content(&name, &content)
            .with_context(|| format!("indexing {}", file.display()))?;
        added.push(name);
    }
    tracing::info!(documents = added.len(), "ingest complete");
    Ok(added)
}

pub fn collect_files(paths: &[PathBuf]) -> Vec<PathBuf> {
    let mut files = Vec::new();
    for path in paths {
        if path.is_dir() {
            for entry in WalkDir::new(path).sort_by_file_name() {
                match entry {
                    Ok(entry) if entry.file_type().is_file() => files.push(entry.into_path()),
                    Ok(_) => {}
                    Err(err) => tracing::warn!(error = %err, "skipping unreadable entry"),
                }
            }
        } else {
            files.push(path.clone());
        }
    }
    files
}

pub fn document_name(path: &Path) -> String {
    path.file_stem()
        .map(|stem| stem.to_string_lossy().trim().to_string())
        .unwrap_or_default()
}

fn print_page<W: Write>(out: &mut W, page: &SearchPage<'_>) -> Result<()> {
    if page.total == 0 {
        writeln!(out, "no document containing \"{}\" found", page.query)?;
        return Ok(());
    }
    for result in page.results {
        write!(out, "{result}")?;
    }
    if let Some(next) = page.next {
        writeln!(out, "more results: --start {next}")?;
    }
    Ok(())
}

fn shell<S: Store, R: BufRead, W: Write>(finder: &DocFinder<S>, input: R, out: &mut W) -> Result<()> {
    for line in input.lines() {
        let line = line?;
        let query = line.trim_start();
        if query.trim_end().is_empty() {
            continue;
        }
        if let Some(text) = query.strip_prefix('?') {
            writeln!(out, "{}", finder.complete(text)?.join(" "))?;
        } else {
            for result in finder.search(query)? {
                write!(out, "{result}")?;
            }
        }
    }
    Ok(())
}
