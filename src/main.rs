use clap::{Args, Parser, Subcommand};
use std::net::SocketAddr;
use std::path::{Path, PathBuf};

use leavedoc::record::DataRecord;
use leavedoc::render::DocumentKind;
use leavedoc::server::{self, AppState, ServerConfig, Target};
use leavedoc::store::FsTemplateStore;
use leavedoc::{Error, Result};

#[derive(Parser, Debug)]
#[command(name = "leavedoc")]
#[command(version, about = "Fill leave/permission request templates from form data")]
pub struct Cli {
    /// Increase log verbosity (-v info, -vv debug, -vvv trace)
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    pub verbose: u8,

    #[command(subcommand)]
    pub command: Command,
}

#[derive(Subcommand, Debug)]
pub enum Command {
    /// Run the document generation HTTP endpoints
    Serve(ServeArgs),
    /// Fill a template file from a JSON record
    Fill(FillArgs),
}

#[derive(Args, Debug)]
pub struct ServeArgs {
    /// Address to listen on
    #[arg(long, env = "LEAVEDOC_BIND", default_value = "127.0.0.1:8080")]
    pub bind: SocketAddr,

    /// Directory holding the templates
    #[arg(long, env = "LEAVEDOC_TEMPLATES", default_value = "templates")]
    pub templates: PathBuf,

    /// Word template identifier
    #[arg(long, env = "LEAVEDOC_WORD_TEMPLATE", default_value = "permiso.docx")]
    pub word_template: String,

    /// Excel template identifier
    #[arg(long, env = "LEAVEDOC_EXCEL_TEMPLATE", default_value = "permiso.xlsx")]
    pub excel_template: String,

    /// Download name of the generated Word document
    #[arg(
        long,
        env = "LEAVEDOC_WORD_FILENAME",
        default_value = "solicitud-rellenada.docx"
    )]
    pub word_filename: String,

    /// Download name of the generated Excel workbook
    #[arg(long, env = "LEAVEDOC_EXCEL_FILENAME", default_value = "permiso.xlsx")]
    pub excel_filename: String,
}

impl ServeArgs {
    fn server_config(&self) -> ServerConfig {
        ServerConfig {
            word: Target {
                template: self.word_template.clone(),
                filename: self.word_filename.clone(),
            },
            excel: Target {
                template: self.excel_template.clone(),
                filename: self.excel_filename.clone(),
            },
        }
    }
}

#[derive(Args, Debug)]
pub struct FillArgs {
    /// Template to fill (.docx, .xlsx or .xlsm)
    pub template: PathBuf,

    /// JSON file with the flat field record
    #[arg(short, long)]
    pub data: PathBuf,

    /// Output file (default: filled.<ext> next to the template)
    #[arg(short, long)]
    pub output: Option<PathBuf>,
}

#[tokio::main]
async fn main() {
    let cli = Cli::parse();

    let level = match cli.verbose {
        0 => "warn",
        1 => "info",
        2 => "debug",
        _ => "trace",
    };
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new(level)),
        )
        .with_target(false)
        .with_writer(std::io::stderr)
        .init();

    if let Err(e) = run(cli.command).await {
        eprintln!("error: {}", e);
        std::process::exit(e.exit_code());
    }
}

async fn run(command: Command) -> Result<()> {
    match command {
        Command::Serve(args) => {
            tracing::info!(templates = ?args.templates, "serving templates");
            let state = AppState::new(FsTemplateStore::new(&args.templates), args.server_config());
            server::serve(args.bind, state).await
        }
        Command::Fill(args) => fill(&args),
    }
}

fn fill(args: &FillArgs) -> Result<()> {
    let kind = DocumentKind::from_path(&args.template)?;

    if !args.template.exists() {
        return Err(Error::TemplateNotFound(
            args.template.display().to_string(),
        ));
    }

    tracing::info!(template = ?args.template, "reading");
    let template = std::fs::read(&args.template)?;
    let record: DataRecord = serde_json::from_slice(&std::fs::read(&args.data)?)?;
    tracing::info!(fields = record.len(), "loaded record");

    let output = args
        .output
        .clone()
        .unwrap_or_else(|| default_output(&args.template, kind));

    let bytes = kind.render(&template, &record)?;
    std::fs::write(&output, bytes)?;
    tracing::info!(output = ?output, "written");

    Ok(())
}

fn default_output(template: &Path, kind: DocumentKind) -> PathBuf {
    template.with_file_name(format!("filled.{}", kind.extension()))
}
