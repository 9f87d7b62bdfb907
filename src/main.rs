use anyhow::{Context, Result};
use clap::Parser;
use crossterm::{
    event::{DisableMouseCapture, EnableMouseCapture},
    execute,
    terminal::{disable_raw_mode, enable_raw_mode, EnterAlternateScreen, LeaveAlternateScreen},
};
use ratatui::{backend::CrosstermBackend, Terminal};
use std::io;
use std::sync::Arc;
use tracing::{error, info, warn};
use tracing_subscriber::{fmt, layer::SubscriberExt, util::SubscriberInitExt, EnvFilter, Layer};

use resume_tui::{
    config::Config,
    markup::preview_lines,
    models::{field_spec, FormSnapshot, TemplateVariant},
    pipeline::FormPreviewPipeline,
    editor_tui::App,
    storage::{MemoryStore, SlotStore, SqliteStore},
    suggest::TypeaheadSuggester,
    templates,
};

mod cli;

use cli::{Cli, Commands};

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();
    let command = cli.command.unwrap_or(Commands::Edit);

    // Set default log level to INFO if not specified
    if std::env::var("RUST_LOG").is_err() {
        std::env::set_var("RUST_LOG", "resume_tui=info");
    }

    let config = Config::from_env()?;
    config.validate()?;

    if matches!(command, Commands::Edit) {
        // Log to file while the editor owns the terminal
        let (dir, file) = split_log_path(&config);
        let file_appender = tracing_appender::rolling::never(dir, file);
        tracing_subscriber::registry()
            .with(
                fmt::layer()
                    .with_writer(file_appender)
                    .with_ansi(false)
                    .with_filter(EnvFilter::from_default_env()),
            )
            .init();
        return run_editor(config).await;
    }

    tracing_subscriber::registry()
        .with(
            fmt::layer()
                .with_writer(std::io::stderr)
                .with_filter(EnvFilter::from_default_env()),
        )
        .init();

    handle_cli_command(command, &config).await
}

fn split_log_path(config: &Config) -> (std::path::PathBuf, std::ffi::OsString) {
    let dir = config
        .log_file
        .parent()
        .filter(|p| !p.as_os_str().is_empty())
        .map(|p| p.to_path_buf())
        .unwrap_or_else(|| ".".into());
    let file = config
        .log_file
        .file_name()
        .map(|f| f.to_os_string())
        .unwrap_or_else(|| "resume_tui.log".into());
    (dir, file)
}

/// Open the autosave store, falling back to a session-only store so the
/// editor still starts when the database is unusable.
async fn open_store_for_editor(config: &Config) -> (Arc<dyn SlotStore>, bool) {
    match SqliteStore::open(&config.database_path).await {
        Ok(store) => {
            let store: Arc<dyn SlotStore> = Arc::new(store);
            (store, true)
        }
        Err(e) => {
            warn!(
                "Autosave disabled, could not open {}: {}",
                config.database_path.display(),
                e
            );
            let store: Arc<dyn SlotStore> = Arc::new(MemoryStore::new());
            (store, false)
        }
    }
}

async fn run_editor(config: Config) -> Result<()> {
    info!("Starting resume editor...");

    let (store, persistence_enabled) = open_store_for_editor(&config).await;
    let mut app = App::new(config, store, persistence_enabled);
    if !persistence_enabled {
        app.set_error("Autosave disabled: snapshot store unavailable".to_string());
    }

    // Setup terminal
    enable_raw_mode()?;
    let mut stdout = io::stdout();
    execute!(stdout, EnterAlternateScreen, EnableMouseCapture)?;
    let backend = CrosstermBackend::new(stdout);
    let mut terminal = Terminal::new(backend)?;

    let result = app.run(&mut terminal).await;

    // Restore terminal
    disable_raw_mode()?;
    execute!(
        terminal.backend_mut(),
        LeaveAlternateScreen,
        DisableMouseCapture
    )?;
    terminal.show_cursor()?;

    match result {
        Ok(_) => {
            info!("Resume editor exited successfully");
            Ok(())
        }
        Err(e) => {
            error!("Resume editor encountered an error: {}", e);
            eprintln!("Error: {}", e);
            std::process::exit(1);
        }
    }
}

/// Handle non-interactive commands - print output and exit
async fn handle_cli_command(command: Commands, config: &Config) -> Result<()> {
    match command {
        Commands::Edit => anyhow::bail!("the editor is started before CLI dispatch"),

        Commands::Preview { template, text } => {
            let pipeline = open_pipeline(config).await?;
            let snapshot = pipeline.restore().await?.unwrap_or_default();
            let variant = template
                .map(|tag| TemplateVariant::from_tag(&tag))
                .unwrap_or_else(|| config.default_template.clone());
            if let TemplateVariant::Unknown(ref tag) = variant {
                warn!("Unknown template '{}', preview is empty", tag);
            }

            let markup = templates::render(&variant, &snapshot);
            if text {
                for line in preview_lines(&markup)? {
                    println!("{}", line.text);
                }
            } else {
                print!("{}", markup);
            }
        }

        Commands::Show => {
            let store = open_store(config).await?;
            let pipeline = FormPreviewPipeline::new(store.clone());
            match pipeline.restore().await? {
                Some(snapshot) => {
                    if let Some(at) = store.updated_at(FormSnapshot::STORAGE_KEY).await? {
                        eprintln!("Last saved {}", at);
                    }
                    println!("{}", serde_json::to_string_pretty(&snapshot)?);
                }
                None => println!("No autosaved resume in {}", config.database_path.display()),
            }
        }

        Commands::Clear => {
            let pipeline = open_pipeline(config).await?;
            if pipeline.clear_saved().await? {
                info!("Cleared autosaved resume");
                println!("Autosaved resume deleted");
            } else {
                println!("Nothing to delete");
            }
        }

        Commands::Suggest { field, query, html } => {
            let Some(spec) = field_spec(&field) else {
                eprintln!("Error: unknown field '{}'", field);
                std::process::exit(1);
            };
            if spec.candidates.is_empty() {
                println!("Field '{}' has no suggestions", field);
                return Ok(());
            }

            let mut suggester = TypeaheadSuggester::new(spec.candidates.iter().copied());
            suggester.on_input(&query);
            if html {
                println!("{}", suggester.markup());
            } else {
                for entry in suggester.entries() {
                    println!("{}", entry.text);
                }
            }
        }

        Commands::Templates => {
            for variant in TemplateVariant::defined() {
                let marker = if variant == config.default_template { "*" } else { " " };
                println!("{} {:<10} {}", marker, variant.as_str(), variant.display_name());
            }
        }
    }

    Ok(())
}

async fn open_store(config: &Config) -> Result<Arc<SqliteStore>> {
    let store = SqliteStore::open(&config.database_path)
        .await
        .with_context(|| format!("Cannot open snapshot store {}", config.database_path.display()))?;
    Ok(Arc::new(store))
}

async fn open_pipeline(config: &Config) -> Result<FormPreviewPipeline> {
    Ok(FormPreviewPipeline::new(open_store(config).await?))
}
