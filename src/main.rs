use clap::{Parser, Subcommand};
use copy_contents::errors::AggregationError;
use copy_contents::logger::initialize_logger;
use copy_contents::selector::PromptSelector;
use copy_contents::sink::{ClipboardSink, ContentSink, StdoutSink, TracingNotifier};
use copy_contents::utils::{normalize_path, parent_path};
use copy_contents::{
    AggregationSettings, ContentsCopier, Entry, LocalVault, OutputFormat, SettingsStore,
};
use std::path::PathBuf;
use std::process::ExitCode;
use tracing::{debug, info};

const SETTINGS_FILE_NAME: &str = ".copy-contents.json";

#[derive(Parser)]
#[command(author, version, about, long_about = None)]
struct CliArgs {
    /// Directory treated as the vault; paths are relative to it.
    #[arg(short = 'd', long, env = "COPY_CONTENTS_VAULT", default_value = ".")]
    vault: PathBuf,
    /// Settings file, defaults to .copy-contents.json inside the vault.
    #[arg(long, env = "COPY_CONTENTS_SETTINGS")]
    settings: Option<PathBuf>,
    #[arg(short, long)]
    verbose: bool,
    #[command(subcommand)]
    cmd: SubCommands,
}

#[derive(Subcommand, Debug, Clone)]
enum SubCommands {
    /// Copy a file's or folder's contents to the clipboard.
    Copy(TargetArgs),
    /// Write a file's or folder's contents to a new file in the export folder.
    Export(TargetArgs),
    /// Show or change the stored settings.
    Config {
        #[command(subcommand)]
        action: ConfigAction,
    },
}

#[derive(Parser, Debug, Clone)]
struct TargetArgs {
    /// File or folder inside the vault.
    #[arg(default_value = ".")]
    path: String,
    /// Use the folder containing PATH instead of PATH itself.
    #[arg(long)]
    parent: bool,
    /// Output format for this run only.
    #[arg(short = 'f', long)]
    format: Option<OutputFormat>,
    /// Skip the file selection prompt.
    #[arg(short = 'y', long)]
    yes: bool,
    /// Print to stdout instead of the clipboard (copy only).
    #[arg(short = 'p', long)]
    print: bool,
}

impl TargetArgs {
    fn target(&self) -> String {
        let path = normalize_path(&self.path);
        if self.parent {
            parent_path(&path).to_owned()
        } else {
            path
        }
    }

    fn apply(&self, mut settings: AggregationSettings) -> AggregationSettings {
        if let Some(format) = self.format {
            settings.output_format = format;
        }
        if self.yes {
            settings.show_selection_modal = false;
        }
        settings
    }
}

#[derive(Subcommand, Debug, Clone)]
enum ConfigAction {
    Show,
    Set { key: String, value: String },
    Reset,
}

#[tokio::main]
async fn main() -> ExitCode {
    let cli_args = CliArgs::parse();
    initialize_logger(cli_args.verbose);

    match run(cli_args).await {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            debug!("Exiting with {}", e.code());
            if e.is_rejection() {
                ExitCode::from(1)
            } else {
                ExitCode::from(2)
            }
        }
    }
}

async fn run(cli_args: CliArgs) -> Result<(), AggregationError> {
    let store = SettingsStore::new(
        cli_args
            .settings
            .clone()
            .unwrap_or_else(|| cli_args.vault.join(SETTINGS_FILE_NAME)),
    );
    let settings = store.load().await.map_err(|e| {
        eprintln!("Error loading settings from {}: {}", store.path().display(), e);
        e
    })?;
    let vault = LocalVault::new(&cli_args.vault);

    match cli_args.cmd {
        SubCommands::Copy(args) => {
            let settings = args.apply(settings);
            let entry = lookup(&vault, &args.target())?;
            let notifier = TracingNotifier;
            let copier = ContentsCopier::new(&vault, &settings, &notifier);
            let sink: Box<dyn ContentSink> = if args.print {
                Box::new(StdoutSink::new())
            } else {
                Box::new(ClipboardSink::new())
            };
            let selector = PromptSelector::new();
            match entry {
                Entry::File(file) => copier.copy_file(&file, sink.as_ref()).await.map(|_| ()),
                Entry::Folder(folder) => copier
                    .copy_folder(&folder, Some(&selector), sink.as_ref())
                    .await
                    .map(|_| ()),
            }
        }
        SubCommands::Export(args) => {
            let settings = args.apply(settings);
            let entry = lookup(&vault, &args.target())?;
            let notifier = TracingNotifier;
            let copier = ContentsCopier::new(&vault, &settings, &notifier);
            let selector = PromptSelector::new();
            let outcome = match entry {
                Entry::File(file) => copier.export_file(&file).await?,
                Entry::Folder(folder) => copier.export_folder(&folder, Some(&selector)).await?,
            };
            println!("{}", outcome.path);
            Ok(())
        }
        SubCommands::Config { action } => configure(&store, settings, action).await,
    }
}

fn lookup(vault: &LocalVault, target: &str) -> Result<Entry, AggregationError> {
    vault.entry(target).map_err(|e| {
        eprintln!("Error: {} ({})", e, e.code());
        e
    })
}

async fn configure(
    store: &SettingsStore,
    mut settings: AggregationSettings,
    action: ConfigAction,
) -> Result<(), AggregationError> {
    match action {
        ConfigAction::Show => {}
        ConfigAction::Set { key, value } => {
            if let Err(e) = settings.set(&key, &value) {
                eprintln!("Error: {}", e);
                return Err(e);
            }
            store.save(&settings).await?;
            info!("Saved {} to {}", key, store.path().display());
        }
        ConfigAction::Reset => {
            settings = AggregationSettings::default();
            store.save(&settings).await?;
            info!("Restored default settings in {}", store.path().display());
        }
    }
    println!("{}", serde_json::to_string_pretty(&settings)?);
    Ok(())
}
