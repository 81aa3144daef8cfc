use clap::{Args, Parser, Subcommand};
use formatter_arbiter::candidate::{Document, FormatKind, FormatterCandidate};
use formatter_arbiter::catalog::{KnownExtension, ProviderCatalog};
use formatter_arbiter::config::{ArbiterSettings, FileConfigurationStore, user_config_path};
use formatter_arbiter::error::{ArbiterError, ArbiterResult};
use formatter_arbiter::picker::{OnDemandChoice, candidate_label};
use formatter_arbiter::surface::{InstalledExtensions, LogTelemetrySink};
use formatter_arbiter::terminal::{TerminalStatus, TerminalSurface};
use formatter_arbiter::{ConflictResolver, FormatterArbiter, ResolutionMode, StaticCandidateSource};
use std::path::PathBuf;
use std::sync::Arc;
use url::Url;

/// Pick one formatter when several extensions can format the same document
#[derive(Parser)]
#[command(name = "formatter-arbiter")]
#[command(version)]
#[command(about = "Pick one formatter when several extensions can format the same document")]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Resolve the formatter for a format request, prompting when it is ambiguous
    Resolve {
        #[command(flatten)]
        request: RequestArgs,

        /// Behave like format-on-save: answer immediately and prompt in the background
        #[arg(long)]
        silent: bool,
    },
    /// Pick a formatter for a single run without changing the default
    Choose {
        #[command(flatten)]
        request: RequestArgs,
    },
    /// Print the JSON schema of the defaultFormatter setting
    Schema {
        /// Known formatter extension (repeatable)
        #[arg(long = "extension", value_name = "ID[=DESCRIPTION]")]
        extensions: Vec<String>,
    },
    /// Print the location of the user settings file
    ConfigPath,
}

#[derive(Args)]
struct RequestArgs {
    /// Language identifier of the document (e.g., rust, typescript)
    #[arg(long)]
    language: String,

    /// Human-readable language name used in messages
    #[arg(long)]
    language_name: Option<String>,

    /// Document path or URI
    #[arg(long)]
    resource: String,

    /// Formatter able to serve the request, in priority order (repeatable)
    #[arg(long = "candidate", value_name = "ID[=NAME]", required = true)]
    candidates: Vec<String>,

    /// Format a range instead of the whole document
    #[arg(long)]
    range: bool,

    /// Installed extension that is not a candidate for this request (repeatable)
    #[arg(long = "installed", value_name = "ID[=NAME]")]
    installed: Vec<String>,

    /// Workspace root owning a project settings file (default: current directory)
    #[arg(long = "root")]
    roots: Vec<PathBuf>,
}

type CliArbiter = FormatterArbiter<
    StaticCandidateSource,
    FileConfigurationStore,
    TerminalSurface<tokio::io::BufReader<tokio::io::Stdin>, tokio::io::Stderr>,
    TerminalStatus,
    InstalledExtensions,
    LogTelemetrySink,
>;

#[tokio::main]
async fn main() {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("warn"))
        .target(env_logger::Target::Stderr)
        .init();

    let cli = Cli::parse();

    if let Err(e) = run(cli.command).await {
        eprintln!("Error: {}", e);
        std::process::exit(1);
    }
}

async fn run(command: Commands) -> ArbiterResult<()> {
    match command {
        Commands::Resolve { request, silent } => {
            let mode = if silent {
                ResolutionMode::Silent
            } else {
                ResolutionMode::Interactive
            };
            let (arbiter, document, kind) = build_arbiter(request).await?;

            let chosen = match kind {
                FormatKind::Document => arbiter.document_formatter(&document, mode).await,
                FormatKind::Range => arbiter.range_formatter(&document, mode).await,
            };
            // Print the answer before the background prompt is waited on
            print_choice(chosen?.as_ref());

            let tasks = arbiter.resolver().background_tasks();
            tasks.close();
            tasks.wait().await;
            Ok(())
        }
        Commands::Choose { request } => {
            let (arbiter, document, kind) = build_arbiter(request).await?;
            match arbiter.format_with(&document, kind).await? {
                Some(OnDemandChoice::Format(candidate)) => print_choice(Some(&candidate)),
                Some(OnDemandChoice::Configured(Some(candidate))) => {
                    eprintln!("Default formatter set to {}", candidate_label(&candidate));
                }
                Some(OnDemandChoice::Configured(None) | OnDemandChoice::Cancelled) | None => {}
            }
            Ok(())
        }
        Commands::Schema { extensions } => {
            let catalog = ProviderCatalog::new();
            catalog.refresh(extensions.iter().map(|arg| {
                let (id, description) = split_pair(arg);
                KnownExtension::new(id, description.unwrap_or_default())
            }));
            let schema = serde_json::to_string_pretty(&catalog.default_formatter_schema())
                .map_err(|e| ArbiterError::internal(e.to_string()))?;
            println!("{}", schema);
            Ok(())
        }
        Commands::ConfigPath => match user_config_path() {
            Some(path) => {
                println!("{}", path.display());
                Ok(())
            }
            None => Err(ArbiterError::internal(
                "could not determine the user config directory",
            )),
        },
    }
}

async fn build_arbiter(request: RequestArgs) -> ArbiterResult<(CliArbiter, Document, FormatKind)> {
    let kind = if request.range {
        FormatKind::Range
    } else {
        FormatKind::Document
    };

    let uri = resource_uri(&request.resource)?;
    let mut document = Document::new(uri, request.language);
    if let Some(name) = request.language_name {
        document = document.with_language_name(name);
    }

    let roots = if request.roots.is_empty() {
        vec![std::env::current_dir()?]
    } else {
        request.roots
    };
    let config = FileConfigurationStore::with_user_config(roots);
    let status_timeout = match config.load_effective(Some(&document.uri)).await {
        Ok(settings) => settings.status_timeout(),
        Err(e) => {
            log::warn!(target: "formatter_arbiter::cli", "Using default settings: {}", e);
            ArbiterSettings::default().status_timeout()
        }
    };

    let candidates: Vec<FormatterCandidate> = request
        .candidates
        .iter()
        .map(|arg| parse_candidate(arg).with_kind(kind))
        .collect();

    // Every candidate's extension is installed, plus the extra ones given
    let mut installed = InstalledExtensions::default();
    for candidate in &candidates {
        if let Some(id) = &candidate.extension_id {
            installed = installed.with(id, candidate.display_name.as_deref());
        }
    }
    for arg in &request.installed {
        let (id, name) = split_pair(arg);
        installed = installed.with(id, name);
    }

    let resolver = ConflictResolver::new(
        Arc::new(config),
        Arc::new(TerminalSurface::stdio()),
        Arc::new(TerminalStatus),
        Arc::new(installed),
        Arc::new(LogTelemetrySink),
    )
    .with_status_timeout(status_timeout);
    let source = Arc::new(StaticCandidateSource::new(candidates));

    Ok((FormatterArbiter::new(source, resolver), document, kind))
}

/// `id=name` or `id`. An empty id means a provider without an owning extension.
fn parse_candidate(arg: &str) -> FormatterCandidate {
    let (id, name) = split_pair(arg);
    FormatterCandidate {
        extension_id: (!id.is_empty()).then(|| id.to_string()),
        display_name: name.map(str::to_string),
        kind: FormatKind::Document,
    }
}

fn split_pair(arg: &str) -> (&str, Option<&str>) {
    match arg.split_once('=') {
        Some((id, name)) => (id.trim(), Some(name.trim()).filter(|name| !name.is_empty())),
        None => (arg.trim(), None),
    }
}

fn resource_uri(resource: &str) -> ArbiterResult<Url> {
    // Single-letter schemes are Windows drive letters, not URIs
    if let Ok(url) = Url::parse(resource)
        && url.scheme().len() > 1
    {
        return Ok(url);
    }
    let path = std::path::absolute(resource)?;
    Url::from_file_path(&path)
        .map_err(|_| ArbiterError::internal(format!("invalid resource path: {}", path.display())))
}

fn print_choice(candidate: Option<&FormatterCandidate>) {
    match candidate {
        Some(candidate) => println!(
            "{}",
            candidate.extension_id.as_deref().unwrap_or(candidate_label(candidate))
        ),
        None => println!("none"),
    }
}
