use anyhow::{Context, Result};
use clap::{Args, Parser, Subcommand};
use pdfnav::annotations::{notes, page_links, NotesOptions, PageLinkOptions};
use pdfnav::links::{
    broken_links, list_links, resolve_links, AliasDictionary, LinkRewriter, RewriteOptions,
    RewriteReport, TransformationMap,
};
use pdfnav::operations::{
    compare, cut_page, remove_pages, split_file_name, split_pages, swap_pages, PageRanges,
};
use pdfnav::store::{DocumentStore, PdfFile, SaveOptions};
use pdfnav::toc::{
    add_bookmark, delete_toc, export_toc, import_toc, outline_entries, parse_toc, ImportOptions,
    ParsedToc,
};
use pdfnav::Report;
use serde::Serialize;
use std::fs;
use std::path::{Path, PathBuf};
use tracing::{debug, info, warn};
use tracing_subscriber::EnvFilter;

#[derive(Parser)]
#[command(
    name = "pdfnav",
    about = "Edit the outline, named destinations and page order of PDF files",
    version,
    author
)]
struct Cli {
    /// More log output (-v info, -vv debug, -vvv trace)
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    verbose: u8,

    /// Print results as JSON
    #[arg(long, global = true)]
    json: bool,

    #[command(subcommand)]
    command: Commands,
}

/// Where a changed document goes
#[derive(Args)]
struct Output {
    /// Output file path
    #[arg(short, long)]
    output: PathBuf,

    /// Ask for a linearized file
    #[arg(long)]
    fast_web_view: bool,
}

#[derive(Subcommand)]
enum Commands {
    /// Build the outline from an indented table of contents file
    ImportToc {
        /// Input PDF file
        input: PathBuf,

        /// Table of contents file (`title page`, one space per level)
        toc: PathBuf,

        /// Replace the existing outline instead of appending to it
        #[arg(short, long)]
        replace: bool,

        #[command(flatten)]
        output: Output,
    },

    /// Print the outline as a table of contents
    ExportToc {
        /// Input PDF file
        input: PathBuf,

        /// Output text file (defaults to stdout)
        #[arg(short, long)]
        output: Option<PathBuf>,
    },

    /// Remove the outline
    DeleteToc {
        /// Input PDF file
        input: PathBuf,

        #[command(flatten)]
        output: Output,
    },

    /// Append one bookmark to the outline
    AddBookmark {
        /// Input PDF file
        input: PathBuf,

        /// Bookmark title
        #[arg(short, long)]
        title: String,

        /// Page the bookmark points at (1-based)
        #[arg(short, long)]
        page: usize,

        #[command(flatten)]
        output: Output,
    },

    /// List the named destinations and their pages
    Links {
        /// Input PDF file
        input: PathBuf,

        /// Show view type and position of each destination
        #[arg(short, long)]
        detailed: bool,
    },

    /// Resolve named destinations and list the broken ones
    Resolve {
        /// Input PDF file
        input: PathBuf,

        /// Only list broken destinations
        #[arg(short, long)]
        broken: bool,
    },

    /// Point named destinations at new pages
    Rewrite {
        /// Input PDF file
        input: PathBuf,

        /// Link file (`name page` or `name "title"` per line)
        links: PathBuf,

        /// Table of contents used to look up quoted titles
        #[arg(long)]
        toc: Option<PathBuf>,

        /// Alias file (`NAME page` per line)
        #[arg(long)]
        aliases: Option<PathBuf>,

        /// Change XYZ destinations to Fit
        #[arg(long)]
        fit: bool,

        /// Report table of contents titles instead of page numbers
        #[arg(long, requires = "toc")]
        titles: bool,

        /// Show view type and position of each destination
        #[arg(short, long)]
        detailed: bool,

        /// Output file path (report only when omitted)
        #[arg(short, long)]
        output: Option<PathBuf>,

        /// Ask for a linearized file
        #[arg(long)]
        fast_web_view: bool,
    },

    /// List link annotations
    PageLinks {
        /// Input PDF file
        input: PathBuf,

        /// Only this page (1-based)
        #[arg(short, long)]
        page: Option<usize>,

        /// Show the page each internal link leads to
        #[arg(short, long)]
        resolve: bool,
    },

    /// Print the text of free text annotations
    Notes {
        /// Input PDF file
        input: PathBuf,

        /// Only this page (1-based)
        #[arg(short, long)]
        page: Option<usize>,

        /// Head each page with its bookmark title
        #[arg(long)]
        headers: bool,

        /// Show annotation rectangles
        #[arg(short, long)]
        detailed: bool,
    },

    /// Compare number of notes and bookmarks of two PDF files
    Compare {
        /// Original PDF file
        original: PathBuf,

        /// Modified PDF file
        modified: PathBuf,
    },

    /// Exchange two pages
    Swap {
        /// Input PDF file
        input: PathBuf,

        /// First page (1-based)
        a: usize,

        /// Second page (1-based)
        b: usize,

        #[command(flatten)]
        output: Output,
    },

    /// Move a page to another position
    Cut {
        /// Input PDF file
        input: PathBuf,

        /// Page to move (1-based)
        source: usize,

        /// New position (1-based)
        target: usize,

        #[command(flatten)]
        output: Output,
    },

    /// Remove pages
    Remove {
        /// Input PDF file
        input: PathBuf,

        /// Pages to remove (e.g., "1,3-4,7")
        pages: String,

        #[command(flatten)]
        output: Output,
    },

    /// Split a PDF into single-page files
    Split {
        /// Input PDF file
        input: PathBuf,

        /// Output file prefix; files are named PREFIX-001.pdf, PREFIX-002.pdf, ...
        #[arg(short, long)]
        prefix: Option<String>,
    },
}

fn init_logging(verbose: u8) {
    let level = match verbose {
        0 => "warn",
        1 => "info",
        2 => "debug",
        _ => "trace",
    };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(level));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(false)
        .init();
}

fn open(path: &Path) -> Result<PdfFile> {
    debug!("Opening {}", path.display());
    Ok(PdfFile::open(path)?)
}

fn read_text(path: &Path) -> Result<String> {
    fs::read_to_string(path).with_context(|| format!("Failed to read {}", path.display()))
}

fn read_toc(path: &Path) -> Result<ParsedToc> {
    let toc = parse_toc(&read_text(path)?);
    if !toc.skipped.is_empty() {
        warn!(
            "Skipped {} malformed lines in {}",
            toc.skipped.len(),
            path.display()
        );
    }
    Ok(toc)
}

fn save(doc: &mut PdfFile, output: &Path, fast_web_view: bool) -> Result<()> {
    doc.save(output, &SaveOptions { fast_web_view })?;
    info!("Saved {}", output.display());
    Ok(())
}

fn print_json<T: Serialize>(value: &T) -> Result<()> {
    println!("{}", serde_json::to_string_pretty(value)?);
    Ok(())
}

fn print_report(report: &Report, json: bool) -> Result<()> {
    if json {
        print_json(report)
    } else {
        print!("{report}");
        Ok(())
    }
}

fn print_links(report: &RewriteReport, json: bool) -> Result<()> {
    if json {
        print_json(&report.outcomes)
    } else {
        print!("{}", report.lines);
        Ok(())
    }
}

fn main() -> Result<()> {
    let cli = Cli::parse();
    init_logging(cli.verbose);
    let json = cli.json;

    match cli.command {
        Commands::ImportToc {
            input,
            toc,
            replace,
            output,
        } => {
            let toc = read_toc(&toc)?;
            let mut doc = open(&input)?;
            let report = import_toc(&mut doc, &toc, &ImportOptions { replace })?;
            save(&mut doc, &output.output, output.fast_web_view)?;
            print_report(&report, json)?;
        }

        Commands::ExportToc { input, output } => {
            let doc = open(&input)?;
            if json {
                print_json(&outline_entries(&doc)?)?;
            } else {
                let text = export_toc(&doc)?;
                match output {
                    Some(path) => fs::write(&path, text)
                        .with_context(|| format!("Failed to write {}", path.display()))?,
                    None => print!("{text}"),
                }
            }
        }

        Commands::DeleteToc { input, output } => {
            let mut doc = open(&input)?;
            delete_toc(&mut doc)?;
            save(&mut doc, &output.output, output.fast_web_view)?;
        }

        Commands::AddBookmark {
            input,
            title,
            page,
            output,
        } => {
            let mut doc = open(&input)?;
            let report = add_bookmark(&mut doc, &title, page)?;
            save(&mut doc, &output.output, output.fast_web_view)?;
            print_report(&report, json)?;
        }

        Commands::Links { input, detailed } => {
            let mut doc = open(&input)?;
            let report = list_links(&mut doc, detailed)?;
            print_links(&report, json)?;
        }

        Commands::Resolve { input, broken } => {
            let doc = open(&input)?;
            if broken {
                let names = broken_links(&doc)?;
                if json {
                    print_json(&names)?;
                } else {
                    for name in names {
                        println!("{name}");
                    }
                }
            } else {
                let pages = resolve_links(&doc)?;
                if json {
                    print_json(&pages)?;
                } else {
                    for (name, page) in pages {
                        println!("{name} {page}");
                    }
                }
            }
        }

        Commands::Rewrite {
            input,
            links,
            toc,
            aliases,
            fit,
            titles,
            detailed,
            output,
            fast_web_view,
        } => {
            let toc = toc.as_deref().map(read_toc).transpose()?;
            let aliases = match aliases {
                Some(path) => Some(AliasDictionary::parse(&read_text(&path)?)),
                None => None,
            };
            let transformation =
                TransformationMap::parse(&read_text(&links)?, toc.as_ref(), aliases.as_ref())?;
            let options = RewriteOptions {
                coerce_to_fit: fit,
                write_back: output.is_some(),
                detailed,
                label_with_titles: titles,
            };
            let mut rewriter = LinkRewriter::new(&transformation, options);
            if let Some(toc) = &toc {
                rewriter = rewriter.with_toc(toc);
            }

            let mut doc = open(&input)?;
            let report = rewriter.run(&mut doc)?;
            if let Some(output) = output {
                save(&mut doc, &output, fast_web_view)?;
            }
            print_links(&report, json)?;
        }

        Commands::PageLinks {
            input,
            page,
            resolve,
        } => {
            let doc = open(&input)?;
            let links = page_links(&doc, &PageLinkOptions { page, resolve })?;
            if json {
                print_json(&links)?;
            } else {
                for link in links {
                    println!("{link}");
                }
            }
        }

        Commands::Notes {
            input,
            page,
            headers,
            detailed,
        } => {
            let doc = open(&input)?;
            let options = NotesOptions {
                page,
                headers,
                detailed,
            };
            let found = notes(&doc, &options)?;
            if json {
                print_json(&found)?;
            } else {
                for note in found {
                    println!("{note}");
                }
            }
        }

        Commands::Compare { original, modified } => {
            let original = open(&original)?;
            let modified = open(&modified)?;
            let result = compare(&original, &modified)?;
            if json {
                print_json(&result)?;
            } else {
                print!("{}", result.lines());
            }
            if !result.matches() {
                std::process::exit(1);
            }
        }

        Commands::Swap {
            input,
            a,
            b,
            output,
        } => {
            let mut doc = open(&input)?;
            let report = swap_pages(&mut doc, a, b)?;
            save(&mut doc, &output.output, output.fast_web_view)?;
            print_report(&report, json)?;
        }

        Commands::Cut {
            input,
            source,
            target,
            output,
        } => {
            let mut doc = open(&input)?;
            let report = cut_page(&mut doc, source, target)?;
            save(&mut doc, &output.output, output.fast_web_view)?;
            print_report(&report, json)?;
        }

        Commands::Remove {
            input,
            pages,
            output,
        } => {
            let ranges: PageRanges = pages.parse()?;
            let mut doc = open(&input)?;
            let report = remove_pages(&mut doc, &ranges)?;
            save(&mut doc, &output.output, output.fast_web_view)?;
            print_report(&report, json)?;
        }

        Commands::Split { input, prefix } => {
            let prefix = match prefix {
                Some(prefix) => prefix,
                None => input.with_extension("").to_string_lossy().into_owned(),
            };
            let doc = open(&input)?;
            let mut report = Report::new();
            for (index, mut part) in split_pages(&doc)?.into_iter().enumerate() {
                let path = PathBuf::from(split_file_name(&prefix, index + 1));
                save(&mut part, &path, false)?;
                report.push(format!("Wrote {}", path.display()));
            }
            print_report(&report, json)?;
        }
    }

    Ok(())
}
