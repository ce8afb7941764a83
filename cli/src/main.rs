//! deckgen CLI - PowerPoint deck generation
//!
//! Runs the HTTP service, or builds decks offline from request JSON files.

use clap::{Args, Parser, Subcommand};
use colored::*;
use deckgen::layout::{DeckBuilder, DeckOptions};
use deckgen::render::{to_json, JsonFormat};
use deckgen::server::ServerConfig;
use deckgen::{ArtifactStore, DeckRequest, PackageWriter, Template};
use flexi_logger::{Logger, LoggerHandle};
use indicatif::{ProgressBar, ProgressStyle};
use std::fs;
use std::io::{self, Read, Write};
use std::net::IpAddr;
use std::path::{Path, PathBuf};

/// Generate PowerPoint decks from titled bullet content
#[derive(Parser)]
#[command(
    name = "deckgen",
    author = "iyulab",
    version,
    about = "Generate PowerPoint decks from titled bullet content",
    long_about = "deckgen - PowerPoint deck generation.\n\n\
                  Serves POST /create_slide over HTTP, or builds .pptx files \
                  offline from request JSON."
)]
struct Cli {
    /// Log debug detail to stderr (offline commands)
    #[arg(short, long, global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Run the HTTP service
    Serve(ServeArgs),

    /// Build a deck from a request JSON file
    Build {
        /// Request file (`-` for stdin)
        input: PathBuf,

        /// Output file path
        #[arg(short, long, conflicts_with = "out_dir")]
        output: Option<PathBuf>,

        /// Directory for a uniquely named deck (default: current directory)
        #[arg(long)]
        out_dir: Option<PathBuf>,

        /// Also print the deck summary as JSON
        #[arg(long)]
        summary: bool,

        #[command(flatten)]
        deck: DeckArgs,
    },

    /// Print the slide plan for a request without writing a deck
    Plan {
        /// Request file (`-` for stdin)
        input: PathBuf,

        /// Output compact JSON (no indentation)
        #[arg(long)]
        compact: bool,

        #[command(flatten)]
        deck: DeckArgs,
    },

    /// List template layouts and their placeholders
    Layouts {
        /// Template file (default: built-in template)
        #[arg(long)]
        template: Option<PathBuf>,
    },

    /// Show version information
    Version,
}

/// Options shared by every command that builds a deck.
#[derive(Args, Clone)]
struct DeckArgs {
    /// Template file (default: built-in template)
    #[arg(long, env = "DECKGEN_TEMPLATE")]
    template: Option<PathBuf>,

    /// Maximum bullets per content slide
    #[arg(long, env = "DECKGEN_MAX_PER_SLIDE", default_value_t = deckgen::layout::DEFAULT_MAX_PER_SLIDE)]
    max_per_slide: usize,

    /// Section name used for flat bullet lists
    #[arg(long, env = "DECKGEN_DEFAULT_SECTION", default_value = deckgen::layout::DEFAULT_SECTION)]
    default_section: String,
}

impl DeckArgs {
    fn options(&self) -> DeckOptions {
        DeckOptions::new()
            .with_max_per_slide(self.max_per_slide)
            .with_default_section(self.default_section.clone())
    }

    fn load_template(&self) -> deckgen::Result<Template> {
        load_template(self.template.as_deref())
    }
}

#[derive(Args)]
struct ServeArgs {
    /// Listen address
    #[arg(long, env = "DECKGEN_ADDRESS", default_value = "127.0.0.1")]
    address: IpAddr,

    /// Listen port
    #[arg(short, long, env = "DECKGEN_PORT", default_value_t = 8000)]
    port: u16,

    /// Directory decks are written to and served from
    #[arg(long, env = "DECKGEN_PUBLIC_DIR", default_value = "public")]
    public_dir: PathBuf,

    /// Origin for returned URLs (default: the request's Host header and
    /// X-Forwarded-Proto); set it when running behind a proxy
    #[arg(long, env = "DECKGEN_BASE_URL")]
    base_url: Option<String>,

    #[command(flatten)]
    deck: DeckArgs,
}

impl From<ServeArgs> for ServerConfig {
    fn from(args: ServeArgs) -> Self {
        let mut config = ServerConfig::new()
            .with_bind(args.address, args.port)
            .with_public_dir(args.public_dir)
            .with_max_per_slide(args.deck.max_per_slide)
            .with_default_section(args.deck.default_section);
        if let Some(url) = args.base_url {
            config = config.with_base_url(url);
        }
        if let Some(template) = args.deck.template {
            config = config.with_template(template);
        }
        config
    }
}

fn main() {
    let cli = Cli::parse();

    if let Err(e) = run(cli) {
        eprintln!("{}: {}", "Error".red().bold(), e);
        std::process::exit(1);
    }
}

fn run(cli: Cli) -> Result<(), Box<dyn std::error::Error>> {
    // Rocket installs its own logger for `serve`.
    let _logger = match &cli.command {
        Commands::Serve(_) => None,
        _ => Some(start_logger(cli.verbose)?),
    };

    match cli.command {
        Commands::Serve(args) => {
            deckgen::server::run(args.into())?;
        }

        Commands::Build {
            input,
            output,
            out_dir,
            summary,
            deck,
        } => {
            let pb = create_spinner("Loading template...");
            let template = deck.load_template()?;
            let request = read_request(&input)?;

            pb.set_message("Laying out slides...");
            let rendered = DeckBuilder::new(&template, deck.options())?.build(request)?;

            pb.set_message("Writing deck...");
            let writer = PackageWriter::new(&template);
            let path = match output {
                Some(path) => {
                    fs::write(&path, writer.to_bytes(&rendered)?)?;
                    path
                }
                None => {
                    let store = ArtifactStore::open(out_dir.unwrap_or_else(|| PathBuf::from(".")))?;
                    store.save(&writer, &rendered)?.path
                }
            };
            pb.finish_and_clear();

            if summary {
                println!("{}", to_json(&rendered, JsonFormat::Pretty)?);
            }
            println!(
                "{} Wrote {} slides to {}",
                "✓".green().bold(),
                rendered.slide_count(),
                path.display()
            );
        }

        Commands::Plan {
            input,
            compact,
            deck,
        } => {
            let template = deck.load_template()?;
            let request = read_request(&input)?;
            let rendered = DeckBuilder::new(&template, deck.options())?.build(request)?;

            let format = if compact {
                JsonFormat::Compact
            } else {
                JsonFormat::Pretty
            };
            write_stdout(&to_json(&rendered, format)?)?;
        }

        Commands::Layouts { template } => {
            let template = load_template(template.as_deref())?;

            println!("{}", "Template Layouts".cyan().bold());
            println!("{}", "─".repeat(40));
            for (i, layout) in template.layouts().iter().enumerate() {
                println!("{} {}", format!("[{}]", i).bold(), layout.name);
                for region in &layout.regions {
                    let idx = region.idx.map(|i| format!(" idx={}", i)).unwrap_or_default();
                    println!(
                        "    {:<24} {:?}{} {:?}",
                        region.name,
                        region.kind,
                        idx,
                        region.capabilities()
                    );
                }
            }
            if template.layouts().is_empty() {
                println!("{} Template has no layouts", "!".yellow().bold());
            }
        }

        Commands::Version => {
            print_version();
        }
    }

    Ok(())
}

fn start_logger(verbose: bool) -> Result<LoggerHandle, Box<dyn std::error::Error>> {
    let level = if verbose { "debug" } else { "warn" };
    let handle = Logger::try_with_env_or_str(level)?.log_to_stderr().start()?;
    Ok(handle)
}

fn load_template(path: Option<&Path>) -> deckgen::Result<Template> {
    match path {
        Some(path) => Template::open(path),
        None => Template::builtin(),
    }
}

fn read_request(input: &Path) -> Result<DeckRequest, Box<dyn std::error::Error>> {
    let text = if input.as_os_str() == "-" {
        let mut text = String::new();
        io::stdin().read_to_string(&mut text)?;
        text
    } else {
        fs::read_to_string(input)?
    };
    let request = serde_json::from_str(&text)
        .map_err(|e| format!("invalid request in {}: {}", input.display(), e))?;
    Ok(request)
}

fn print_version() {
    println!("{} {}", "deckgen".green().bold(), deckgen::version());
    println!("PowerPoint deck generation from titled bullet content");
    println!();
    println!("Output format: PPTX (PresentationML)");
}

fn create_spinner(message: &str) -> ProgressBar {
    let pb = ProgressBar::new_spinner();
    if let Ok(style) = ProgressStyle::default_spinner()
        .tick_strings(&["⠋", "⠙", "⠹", "⠸", "⠼", "⠴", "⠦", "⠧", "⠇", "⠏"])
        .template("{spinner:.blue} {msg}")
    {
        pb.set_style(style);
    }
    pb.set_message(message.to_string());
    pb.enable_steady_tick(std::time::Duration::from_millis(100));
    pb
}

fn write_stdout(content: &str) -> Result<(), Box<dyn std::error::Error>> {
    let stdout = io::stdout();
    let mut handle = stdout.lock();
    writeln!(handle, "{}", content)?;
    Ok(())
}
