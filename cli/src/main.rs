//! pdf2md CLI - PDF to Markdown conversion with hyperlinks

use std::path::{Path, PathBuf};
use std::time::Duration;

use clap::{Args, Parser, Subcommand, ValueEnum};
use colored::Colorize;
use indicatif::{ProgressBar, ProgressStyle};

use pdf2md::{
    write_markdown, ConvertOptions, ConvertResult, Converter, ExtractOptions, LopdfBackend,
    PageSelection, PageSeparator, RenderOptions,
};

#[derive(Parser)]
#[command(name = "pdf2md")]
#[command(version)]
#[command(about = "Convert PDF documents to Markdown, keeping hyperlinks", long_about = None)]
struct Cli {
    /// Input PDF file
    #[arg(value_name = "FILE")]
    input: Option<PathBuf>,

    /// Output directory (stdout if not specified)
    #[arg(value_name = "OUTPUT")]
    output: Option<PathBuf>,

    #[command(flatten)]
    convert: ConvertArgs,

    #[command(subcommand)]
    command: Option<Commands>,
}

#[derive(Subcommand)]
enum Commands {
    /// Convert PDF to Markdown
    #[command(alias = "md")]
    Convert {
        /// Input PDF file
        #[arg(value_name = "FILE")]
        input: PathBuf,

        /// Output directory (stdout if not specified)
        #[arg(short, long, value_name = "DIR")]
        output: Option<PathBuf>,

        /// Print conversion statistics to stderr
        #[arg(long)]
        stats: bool,

        #[command(flatten)]
        convert: ConvertArgs,
    },

    /// List the links found in a PDF as JSON
    Links {
        /// Input PDF file
        #[arg(value_name = "FILE")]
        input: PathBuf,

        /// Output compact JSON
        #[arg(long)]
        compact: bool,

        /// Include internal destinations (#page=N)
        #[arg(long)]
        destinations: bool,

        /// Page range (e.g., "1-10", "1,3,5")
        #[arg(long)]
        pages: Option<String>,
    },

    /// Show document information
    Info {
        /// Input PDF file
        #[arg(value_name = "FILE")]
        input: PathBuf,

        /// Output as JSON
        #[arg(long)]
        json: bool,
    },

    /// Show version information
    Version,
}

#[derive(Args, Clone, Default)]
struct ConvertArgs {
    /// Only reflow paragraphs; no header or list detection
    #[arg(long)]
    raw: bool,

    /// Leave link text as plain text
    #[arg(long)]
    no_links: bool,

    /// Include internal destinations (#page=N)
    #[arg(long)]
    destinations: bool,

    /// What to put between pages
    #[arg(long, value_enum, env = "PDF2MD_SEPARATOR")]
    separator: Option<Separator>,

    /// Page range (e.g., "1-10", "1,3,5")
    #[arg(long)]
    pages: Option<String>,

    /// Stop at the first page that cannot be read
    #[arg(long)]
    strict: bool,

    /// Convert pages one at a time
    #[arg(long)]
    sequential: bool,
}

#[derive(Copy, Clone, PartialEq, Eq, ValueEnum)]
enum Separator {
    /// A blank line
    Blank,
    /// A horizontal rule
    Rule,
}

impl From<Separator> for PageSeparator {
    fn from(separator: Separator) -> Self {
        match separator {
            Separator::Blank => PageSeparator::BlankLine,
            Separator::Rule => PageSeparator::Rule,
        }
    }
}

impl ConvertArgs {
    fn to_options(&self) -> Result<ConvertOptions, Box<dyn std::error::Error>> {
        let mut extract = ExtractOptions::new()
            .with_destinations(self.destinations)
            .with_pages(parse_pages(self.pages.as_deref())?);
        if self.strict {
            extract = extract.strict();
        }

        let mut render = RenderOptions::new()
            .with_formatting(!self.raw)
            .with_links(!self.no_links);
        if let Some(separator) = self.separator {
            render = render.with_separator(separator.into());
        }

        Ok(ConvertOptions::new()
            .with_extract_options(extract)
            .with_render_options(render)
            .with_parallel(!self.sequential))
    }
}

fn main() {
    env_logger::init();

    let cli = Cli::parse();

    let result = match cli.command {
        Some(Commands::Convert {
            input,
            output,
            stats,
            convert,
        }) => cmd_convert(&input, output.as_deref(), &convert, stats),
        Some(Commands::Links {
            input,
            compact,
            destinations,
            pages,
        }) => cmd_links(&input, compact, destinations, pages.as_deref()),
        Some(Commands::Info { input, json }) => cmd_info(&input, json),
        Some(Commands::Version) => {
            cmd_version();
            Ok(())
        }
        None => {
            // Default behavior: convert if input is provided
            if let Some(input) = cli.input {
                cmd_convert(&input, cli.output.as_deref(), &cli.convert, false)
            } else {
                println!("{}", "Usage: pdf2md <FILE> [OUTPUT]".yellow());
                println!("       pdf2md --help for more information");
                Ok(())
            }
        }
    };

    if let Err(e) = result {
        eprintln!("{}: {}", "Error".red().bold(), e);
        std::process::exit(1);
    }
}

fn parse_pages(pages: Option<&str>) -> Result<PageSelection, Box<dyn std::error::Error>> {
    match pages {
        Some(p) => Ok(PageSelection::parse(p)?),
        None => Ok(PageSelection::All),
    }
}

fn spinner(message: &'static str) -> ProgressBar {
    let pb = ProgressBar::new_spinner();
    pb.set_style(
        ProgressStyle::default_spinner()
            .template("{spinner:.green} {msg}")
            .unwrap(),
    );
    pb.enable_steady_tick(Duration::from_millis(100));
    pb.set_message(message);
    pb
}

/// Run `f`, clearing the spinner whether or not it succeeds.
fn with_progress<T>(pb: &ProgressBar, f: impl FnOnce() -> T) -> T {
    let value = f();
    pb.finish_and_clear();
    value
}

fn cmd_convert(
    input: &Path,
    output: Option<&Path>,
    args: &ConvertArgs,
    show_stats: bool,
) -> Result<(), Box<dyn std::error::Error>> {
    let converter = Converter::new(args.to_options()?);

    let result = match output {
        Some(dir) => {
            let pb = spinner("Converting PDF...");
            let (result, path) = with_progress(&pb, || {
                let result = converter.convert_file(input)?;
                let name = input.file_stem().unwrap_or_default().to_string_lossy();
                let path = write_markdown(&result.markdown, dir, &name)?;
                Ok::<_, pdf2md::Error>((result, path))
            })?;
            println!("{} {}", "Saved to".green(), path.display());
            result
        }
        None => {
            let result = converter.convert_file(input)?;
            println!("{}", result.markdown);
            result
        }
    };

    report_failed_pages(&result);
    if show_stats {
        print_stats(&result);
    }

    Ok(())
}

fn report_failed_pages(result: &ConvertResult) {
    let failed = result.failed_pages();
    if !failed.is_empty() {
        let list: Vec<String> = failed.iter().map(|n| n.to_string()).collect();
        eprintln!(
            "{}: {} page(s) could not be read: {}",
            "Warning".yellow().bold(),
            failed.len(),
            list.join(", ")
        );
    }
}

fn print_stats(result: &ConvertResult) {
    let stats = &result.stats;
    eprintln!();
    eprintln!("{}", "Conversion Statistics".cyan().bold());
    eprintln!("{}", "─".repeat(40).dimmed());
    eprintln!("{}: {}", "Pages".bold(), stats.page_count);
    eprintln!("{}: {}", "Failed pages".bold(), stats.failed_page_count);
    eprintln!("{}: {}", "Headers".bold(), stats.header_count);
    eprintln!("{}: {}", "List items".bold(), stats.list_item_count);
    eprintln!("{}: {}", "Words".bold(), stats.word_count);
    eprintln!(
        "{}: {} located, {} spliced, {} unmatched",
        "Links".bold(),
        stats.links_located,
        stats.links_spliced,
        stats.links_unmatched
    );
}

fn cmd_links(
    input: &Path,
    compact: bool,
    destinations: bool,
    pages: Option<&str>,
) -> Result<(), Box<dyn std::error::Error>> {
    let args = ConvertArgs {
        destinations,
        pages: pages.map(str::to_string),
        ..Default::default()
    };
    let result = Converter::new(args.to_options()?).convert_file(input)?;
    let links: Vec<_> = result.links().collect();

    let json = if compact {
        serde_json::to_string(&links)?
    } else {
        serde_json::to_string_pretty(&links)?
    };
    println!("{}", json);

    Ok(())
}

fn cmd_info(input: &Path, json: bool) -> Result<(), Box<dyn std::error::Error>> {
    let backend = LopdfBackend::load_file(input)?;
    let info = backend.info();

    if json {
        println!("{}", serde_json::to_string_pretty(&info)?);
        return Ok(());
    }

    println!("{}", "Document Information".cyan().bold());
    println!("{}", "─".repeat(40).dimmed());

    println!("{}: {}", "File".bold(), input.display());
    println!("{}: PDF {}", "Format".bold(), info.version);
    println!("{}: {}", "Pages".bold(), info.page_count);
    println!(
        "{}: {}",
        "Encrypted".bold(),
        if info.encrypted { "Yes" } else { "No" }
    );

    if let Some(ref title) = info.title {
        println!("{}: {}", "Title".bold(), title);
    }
    if let Some(ref author) = info.author {
        println!("{}: {}", "Author".bold(), author);
    }
    if let Some(ref creator) = info.creator {
        println!("{}: {}", "Creator".bold(), creator);
    }
    if let Some(ref producer) = info.producer {
        println!("{}: {}", "Producer".bold(), producer);
    }

    Ok(())
}

fn cmd_version() {
    println!("{} {}", "pdf2md".cyan().bold(), env!("CARGO_PKG_VERSION"));
    println!("PDF to Markdown conversion with hyperlinks");
    println!();
    println!("License: MIT");
}
