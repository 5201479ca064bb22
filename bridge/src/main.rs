//! Attendance Bridge CLI - mobile bundle tools for the QR attendance app
//!
//! # Commands
//!
//! ```bash
//! attendance-bridge copy-web                      # Copy pages, CSS/ and JS/ into mobile/www
//! attendance-bridge resolve /api/students         # Show the resolved server and API URLs
//! attendance-bridge scan                          # Read one code from a keyboard-wedge reader
//! attendance-bridge scan --content STUDENT_12     # Send a known code
//! attendance-bridge server set http://10.0.0.2:5000
//! ```
//!
//! Without `--page-url` the CLI behaves like a page opened from the
//! filesystem (`file://<cwd>/mobile/www/index.html`).

use attendance_bridge::{
    config::{DEFAULT_STORAGE_DIR, MOBILE_WWW_DIR, SERVER_URL_KEY},
    copy_web_assets, ApiBase, AssetPlan, ConsoleNotifier, FileStorage, HttpTransport,
    NativeEnvironment, ScanHandler, ScanOutcome, SelectedScanner,
};
use clap::{Parser, Subcommand};
use std::path::PathBuf;
use url::Url;

#[derive(Parser)]
#[command(name = "attendance-bridge")]
#[command(about = "Mobile bundle tools for the QR attendance app", long_about = None)]
struct Cli {
    /// Server URL override (highest priority, like the SERVER_URL page global)
    #[arg(long, global = true, env = "SERVER_URL")]
    server_url: Option<String>,

    /// Directory holding the local-storage file
    #[arg(long, global = true, env = "ATTENDANCE_STORAGE_DIR", default_value = DEFAULT_STORAGE_DIR)]
    storage_dir: PathBuf,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Copy the web pages and their assets into the mobile asset folder
    CopyWeb {
        /// Project root holding the pages
        #[arg(long, default_value = ".")]
        root: PathBuf,

        /// Destination folder (default: <root>/mobile/www)
        #[arg(long)]
        dest: Option<PathBuf>,
    },

    /// Show the resolved server base URL
    Resolve {
        /// Page URL standing in for window.location
        #[arg(long)]
        page_url: Option<Url>,

        /// API paths to expand
        paths: Vec<String>,
    },

    /// Scan one QR code and mark attendance
    Scan {
        /// Page URL standing in for window.location
        #[arg(long)]
        page_url: Option<Url>,

        /// Use this content instead of reading a scanner on stdin
        #[arg(short, long)]
        content: Option<String>,
    },

    /// Manage the stored server URL
    Server {
        #[command(subcommand)]
        action: ServerAction,
    },
}

#[derive(Subcommand)]
enum ServerAction {
    /// Print the stored server URL
    Show,

    /// Store a server URL
    Set {
        /// Backend base URL, e.g. http://192.168.1.20:5000
        url: Url,
    },

    /// Remove the stored server URL
    Clear,
}

/// Settings shared by every command.
struct Settings {
    server_url: Option<String>,
    storage: FileStorage,
}

#[tokio::main]
async fn main() {
    // Load .env file (if present)
    dotenvy::dotenv().ok();

    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    let cli = Cli::parse();
    let settings = Settings {
        server_url: cli.server_url,
        storage: FileStorage::with_dir(&cli.storage_dir),
    };

    let result = match cli.command {
        Commands::CopyWeb { root, dest } => cmd_copy_web(root, dest),
        Commands::Resolve { page_url, paths } => cmd_resolve(&settings, page_url, &paths),
        Commands::Scan { page_url, content } => cmd_scan(&settings, page_url, content).await,
        Commands::Server { action } => cmd_server(&settings, action),
    };

    if let Err(e) = result {
        eprintln!("❌ Error: {}", e);
        std::process::exit(1);
    }
}

fn cmd_copy_web(root: PathBuf, dest: Option<PathBuf>) -> Result<(), Box<dyn std::error::Error>> {
    let plan = match dest {
        Some(dest) => AssetPlan::new(&root, dest),
        None => AssetPlan::for_project(&root),
    };

    eprintln!("📦 Copying web assets: {} → {}", plan.source.display(), plan.dest.display());

    let report = copy_web_assets(&plan)?;

    eprintln!("   Files copied: {}", report.files_copied);
    if report.dirs_created > 0 {
        eprintln!("   Directories created: {}", report.dirs_created);
    }
    if !report.skipped.is_empty() {
        eprintln!("   Skipped (missing): {}", report.skipped.join(", "));
    }

    Ok(())
}

fn cmd_resolve(
    settings: &Settings,
    page_url: Option<Url>,
    paths: &[String],
) -> Result<(), Box<dyn std::error::Error>> {
    let env = native_environment(settings, page_url)?;
    let (api, source) = ApiBase::resolve_traced(&env);

    eprintln!("🔗 Server: {} ({})", display_base(&api), source);
    if let Some(page) = env.page_url() {
        eprintln!("   Page: {}", page);
    }

    for path in paths {
        println!("{}", api.api(path));
    }

    Ok(())
}

async fn cmd_scan(
    settings: &Settings,
    page_url: Option<Url>,
    content: Option<String>,
) -> Result<(), Box<dyn std::error::Error>> {
    let env = native_environment(settings, page_url)?;
    let (api, source) = ApiBase::resolve_traced(&env);
    eprintln!("🔗 Server: {} ({})", display_base(&api), source);

    let scanner = SelectedScanner::select(content);
    log::debug!("Using scanner: {}", scanner.kind());
    if scanner.is_interactive() {
        eprintln!("📷 Scan a QR code (empty line to cancel)...");
    }

    let transport = HttpTransport::new(env.page_url().cloned());
    let handler = ScanHandler::new(scanner, transport, ConsoleNotifier, api);

    match handler.run().await {
        ScanOutcome::Submitted { .. } => eprintln!("✅ Done"),
        ScanOutcome::Cancelled => eprintln!("↩️  Scan cancelled"),
        ScanOutcome::PermissionDenied | ScanOutcome::Failed { .. } => std::process::exit(1),
    }

    Ok(())
}

fn cmd_server(settings: &Settings, action: ServerAction) -> Result<(), Box<dyn std::error::Error>> {
    let storage = &settings.storage;

    match action {
        ServerAction::Show => match storage.get_item(SERVER_URL_KEY)? {
            Some(url) => println!("{}", url),
            None => {
                eprintln!("📋 No server URL stored.");
                eprintln!("   Use 'attendance-bridge server set <url>' to add one.");
            }
        },

        ServerAction::Set { url } => {
            let url = url.as_str().trim_end_matches('/').to_string();
            storage.set_item(SERVER_URL_KEY, &url)?;
            eprintln!("💾 Server URL stored: {}", url);
            eprintln!("   File: {}", storage.path().display());
        }

        ServerAction::Clear => {
            if storage.remove_item(SERVER_URL_KEY)? {
                eprintln!("🗑️  Stored server URL removed");
            } else {
                eprintln!("📋 No server URL stored.");
            }
        }
    }

    Ok(())
}

/// Environment for the resolver; defaults to a page opened from the filesystem.
fn native_environment(
    settings: &Settings,
    page_url: Option<Url>,
) -> Result<NativeEnvironment, Box<dyn std::error::Error>> {
    let page_url = match page_url {
        Some(url) => url,
        None => {
            let index = std::env::current_dir()?.join(MOBILE_WWW_DIR).join("index.html");
            Url::from_file_path(&index)
                .map_err(|_| format!("Cannot build a file URL for {}", index.display()))?
        }
    };

    Ok(NativeEnvironment::new(
        settings.server_url.clone(),
        Some(page_url),
        settings.storage.clone(),
    ))
}

fn display_base(api: &ApiBase) -> String {
    if api.is_relative() {
        "(current origin)".to_string()
    } else {
        api.to_string()
    }
}
