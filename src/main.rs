//! docmark - open a document, replay annotation actions, export the result.

use anyhow::{Context, Result, bail};
use clap::{Parser, ValueEnum};
use docmark::Editor;
use docmark::export::ExportFormat;
use docmark::loader::SourceKind;
use docmark::script;
use docmark::settings::Settings;
use std::path::PathBuf;
use std::time::Duration;
use tracing::info;

/// Output format override
#[derive(Debug, Clone, Copy, ValueEnum)]
enum Format {
    Png,
    Jpeg,
    Pdf,
}

impl From<Format> for ExportFormat {
    fn from(format: Format) -> Self {
        match format {
            Format::Png => ExportFormat::Png,
            Format::Jpeg => ExportFormat::Jpeg,
            Format::Pdf => ExportFormat::Pdf,
        }
    }
}

/// Annotate a document from the command line.
#[derive(Parser, Debug)]
#[command(name = "docmark")]
#[command(author, version, about, long_about = None)]
struct Args {
    /// File to open (PNG, JPEG, PDF, DOC, DOCX, XLS, XLSX or MSG)
    input: PathBuf,

    /// Declared MIME type; guessed from the extension when omitted
    #[arg(long)]
    mime: Option<String>,

    /// Page to show before replaying the script
    #[arg(long)]
    page: Option<u16>,

    /// JSON file with editor actions to replay
    #[arg(long)]
    script: Option<PathBuf>,

    /// Where to write the export; a directory gets the default file name
    #[arg(short, long)]
    output: Option<PathBuf>,

    /// Export format; follows the source type when omitted
    #[arg(long, value_enum)]
    format: Option<Format>,

    /// Settings file; the user config file is used when omitted
    #[arg(long)]
    settings: Option<PathBuf>,
}

fn init_logging() {
    let filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("docmark=info"));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(true)
        .with_writer(std::io::stderr)
        .init();
}

fn main() -> Result<()> {
    init_logging();
    let args = Args::parse();

    let settings = match &args.settings {
        Some(path) => Settings::load_from(path)
            .with_context(|| format!("failed to read settings {}", path.display()))?,
        None => Settings::load(),
    };
    let mut editor = Editor::new(settings);

    let mime = match &args.mime {
        Some(mime) => mime.clone(),
        None => SourceKind::from_path(&args.input)?.mime().to_string(),
    };
    let bytes = std::fs::read(&args.input)
        .with_context(|| format!("failed to read {}", args.input.display()))?;
    let name = args
        .input
        .file_name()
        .map(|n| n.to_string_lossy().into_owned())
        .unwrap_or_default();
    editor
        .open_file(&name, &mime, bytes)
        .with_context(|| format!("failed to open {}", args.input.display()))?;

    if let Some(page) = args.page {
        editor.jump_to(page)?;
        editor.wait_for_renders(Duration::from_secs(30))?;
    }

    if let Some(path) = &args.script {
        let json = std::fs::read_to_string(path)
            .with_context(|| format!("failed to read script {}", path.display()))?;
        let actions = script::parse(&json).context("invalid script")?;
        editor.apply_all(&actions)?;
        info!(actions = actions.len(), "script replayed");
    }
    editor.render()?;

    let Some(output) = args.output else {
        let state = &editor.state;
        println!(
            "{}: page {}/{}",
            name,
            state.current_page(),
            state.total_pages()
        );
        return Ok(());
    };

    let artifact = match args.format {
        Some(format) => editor.export(format.into())?,
        None => editor.export_default()?,
    };
    if artifact.is_empty() {
        bail!("export produced no data");
    }
    let path = if output.is_dir() {
        artifact.save_to(&output)?
    } else {
        artifact.save_as(&output)?
    };
    println!("{}", path.display());
    Ok(())
}
