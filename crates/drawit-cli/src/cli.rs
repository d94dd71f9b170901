use anyhow::{Context, Result, anyhow};
use clap::{Args, Parser, Subcommand, ValueEnum};
use drawit_core::{
    Canvas, DEFAULT_STORAGE_KEY, Document, EditorConfig, FileStorage, HealReport, LayoutDirection,
    LayoutOptions, LayoutPreset, SavedState, Storage, SugiyamaEngine, presets,
};
use std::fs;
use std::io::{self, Read, Write};
use std::path::{Path, PathBuf};

#[derive(Parser, Debug)]
#[command(name = "drawit", version, about = "Lay out, repair and persist DrawIt diagrams")]
pub struct Cli {
    /// Editor config JSON file
    #[arg(short = 'c', long = "config", global = true)]
    pub config: Option<PathBuf>,

    #[command(subcommand)]
    pub command: CliCommand,
}

#[derive(Subcommand, Debug)]
pub enum CliCommand {
    /// Run auto-layout over a document
    Layout(LayoutArgs),
    /// Heal a document: drop dangling edges and broken parent links
    Repair(IoArgs),
    /// List the built-in presets
    Presets,
    /// Print a built-in preset as a document
    Preset {
        id: String,
        #[arg(short = 'o', long = "output")]
        output: Option<PathBuf>,
    },
    /// Store a document as the saved editor state
    Save(StateArgs),
    /// Print the saved editor state as a document
    Load {
        #[command(flatten)]
        state: StateArgs,
        #[arg(short = 'o', long = "output")]
        output: Option<PathBuf>,
    },
}

#[derive(Args, Debug)]
pub struct IoArgs {
    /// Input document (.json) or '-' for stdin
    pub input: PathBuf,

    /// Output file. Defaults to stdout.
    #[arg(short = 'o', long = "output")]
    pub output: Option<PathBuf>,
}

#[derive(Args, Debug)]
pub struct LayoutArgs {
    #[command(flatten)]
    pub io: IoArgs,

    /// Named option set; explicit flags override it
    #[arg(long, value_enum)]
    pub preset: Option<PresetArg>,

    #[arg(long, value_enum)]
    pub direction: Option<DirectionArg>,

    #[arg(long = "node-spacing")]
    pub node_spacing: Option<f64>,

    #[arg(long = "rank-spacing")]
    pub rank_spacing: Option<f64>,
}

#[derive(Args, Debug)]
pub struct StateArgs {
    /// Document to store (save only)
    pub input: Option<PathBuf>,

    /// Storage key
    #[arg(long, default_value = DEFAULT_STORAGE_KEY)]
    pub key: String,

    /// Storage directory. Defaults to the platform data directory.
    #[arg(long)]
    pub dir: Option<PathBuf>,
}

#[derive(ValueEnum, Debug, Clone, Copy, PartialEq, Eq)]
pub enum PresetArg {
    Vertical,
    Horizontal,
    Tree,
}

#[derive(ValueEnum, Debug, Clone, Copy, PartialEq, Eq)]
pub enum DirectionArg {
    Tb,
    Bt,
    Lr,
    Rl,
}

impl From<PresetArg> for LayoutPreset {
    fn from(arg: PresetArg) -> Self {
        match arg {
            PresetArg::Vertical => LayoutPreset::Vertical,
            PresetArg::Horizontal => LayoutPreset::Horizontal,
            PresetArg::Tree => LayoutPreset::Tree,
        }
    }
}

impl From<DirectionArg> for LayoutDirection {
    fn from(arg: DirectionArg) -> Self {
        match arg {
            DirectionArg::Tb => LayoutDirection::TopToBottom,
            DirectionArg::Bt => LayoutDirection::BottomToTop,
            DirectionArg::Lr => LayoutDirection::LeftToRight,
            DirectionArg::Rl => LayoutDirection::RightToLeft,
        }
    }
}

impl LayoutArgs {
    fn options(&self) -> LayoutOptions {
        let mut options = self
            .preset
            .map(|p| LayoutPreset::from(p).options())
            .unwrap_or_default();
        if let Some(direction) = self.direction {
            options.direction = direction.into();
        }
        if let Some(spacing) = self.node_spacing {
            options.node_spacing = spacing;
        }
        if let Some(spacing) = self.rank_spacing {
            options.rank_spacing = spacing;
        }
        options
    }
}

pub fn run() -> Result<()> {
    let cli = Cli::parse();
    let config = load_config(cli.config.as_deref())?;

    match cli.command {
        CliCommand::Layout(args) => {
            let document = read_document(&args.io.input)?;
            let laid_out = layout_document(document, &args.options(), config)?;
            write_document(&laid_out, args.io.output.as_deref())
        }
        CliCommand::Repair(args) => {
            let document = read_document(&args.input)?;
            let (repaired, report) = repair_document(document, config);
            if !report.is_clean() {
                eprintln!(
                    "cleared {} parent links, dropped {} edges",
                    report.cleared_parents, report.dropped_edges
                );
            }
            write_document(&repaired, args.output.as_deref())
        }
        CliCommand::Presets => {
            let stdout = io::stdout();
            list_presets(&mut stdout.lock())
        }
        CliCommand::Preset { id, output } => {
            let preset = presets::preset_by_id(&id)
                .ok_or_else(|| anyhow!("Unknown preset '{id}'; run `drawit presets`"))?;
            write_document(&preset.document(), output.as_deref())
        }
        CliCommand::Save(args) => {
            let input = args
                .input
                .as_deref()
                .ok_or_else(|| anyhow!("Input document required for save"))?;
            let document = read_document(input)?;
            let storage = open_storage(args.dir)?;
            save_state(&storage, &args.key, document, config)
        }
        CliCommand::Load { state, output } => {
            let storage = open_storage(state.dir)?;
            let document = load_state(&storage, &state.key, config)?;
            write_document(&document, output.as_deref())
        }
    }
}

fn load_config(path: Option<&Path>) -> Result<EditorConfig> {
    match path {
        Some(path) => EditorConfig::from_json_file(path)
            .with_context(|| format!("Failed to load config {}", path.display())),
        None => Ok(EditorConfig::default()),
    }
}

fn read_document(path: &Path) -> Result<Document> {
    let json = if path == Path::new("-") {
        let mut buf = String::new();
        io::stdin()
            .read_to_string(&mut buf)
            .context("Failed to read stdin")?;
        buf
    } else {
        fs::read_to_string(path).with_context(|| format!("Failed to read {}", path.display()))?
    };
    Document::from_json(&json).with_context(|| format!("Invalid document {}", path.display()))
}

fn write_document(document: &Document, output: Option<&Path>) -> Result<()> {
    let json = document.to_json().context("Failed to serialize document")?;
    match output {
        Some(path) => fs::write(path, json + "\n")
            .with_context(|| format!("Failed to write {}", path.display())),
        None => {
            let mut stdout = io::stdout().lock();
            writeln!(stdout, "{json}").context("Failed to write stdout")
        }
    }
}

fn layout_document(document: Document, options: &LayoutOptions, config: EditorConfig) -> Result<Document> {
    let mut canvas = Canvas::with_config(config);
    canvas.import_document(document);
    if !canvas.apply_layout(&SugiyamaEngine, options) {
        log::info!("Nothing to lay out");
    }
    Ok(canvas.export_document())
}

fn repair_document(document: Document, config: EditorConfig) -> (Document, HealReport) {
    let mut canvas = Canvas::with_config(config);
    let report = canvas.import_document(document);
    (canvas.export_document(), report)
}

fn list_presets(out: &mut impl Write) -> Result<()> {
    for preset in presets::presets() {
        writeln!(
            out,
            "{:<16} {:<12} {} ({})",
            preset.id,
            preset.category.display_name(),
            preset.name,
            preset.description
        )?;
    }
    Ok(())
}

fn open_storage(dir: Option<PathBuf>) -> Result<FileStorage> {
    let storage = match dir {
        Some(dir) => FileStorage::new(dir),
        None => FileStorage::default_location(),
    };
    storage.context("Failed to open storage")
}

/// Store `document`, keeping whatever templates are already saved under `key`.
fn save_state(storage: &dyn Storage, key: &str, document: Document, config: EditorConfig) -> Result<()> {
    let mut canvas = Canvas::with_config(config);
    if pollster::block_on(storage.exists(key))? {
        let previous = pollster::block_on(storage.load(key))
            .with_context(|| format!("Failed to load state '{key}'"))?;
        canvas.load(previous);
    }
    let report = canvas.import_document(document);
    if !report.is_clean() {
        log::warn!("Document was repaired before saving");
    }
    pollster::block_on(storage.save(key, &canvas.saved_state()))
        .with_context(|| format!("Failed to save state '{key}'"))
}

fn load_state(storage: &dyn Storage, key: &str, config: EditorConfig) -> Result<Document> {
    let state: SavedState = pollster::block_on(storage.load(key))
        .with_context(|| format!("Failed to load state '{key}'"))?;
    let mut canvas = Canvas::with_config(config);
    canvas.load(state);
    Ok(canvas.export_document())
}
