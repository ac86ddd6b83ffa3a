use std::collections::BTreeMap;
use std::path::PathBuf;
use std::time::Duration;

use anyhow::Context as _;
use clap::{Parser, Subcommand};
use promo_canvas::{
    ChannelAdapter, Configuration, EngineOptions, ImagePayload, KeyValueStore as _,
    LocalRasterizer, MemoryHost, MemoryStore, ProfileRegistry, PrototypeComposer, SliceBroker,
    compute_slice_strategy, fingerprint_tree,
};

#[derive(Parser, Debug)]
#[command(name = "promo-canvas", version)]
struct Cli {
    /// Log debug events to stderr.
    #[arg(long, short, global = true, default_value_t = false)]
    verbose: bool,

    #[command(subcommand)]
    cmd: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Compose a configuration (and optional channel variants) into a JSON scene tree.
    Build(BuildArgs),
    /// Print the tiling plan for an image size.
    Plan(PlanArgs),
}

#[derive(Parser, Debug)]
struct BuildArgs {
    /// Input configuration JSON.
    #[arg(long = "in")]
    in_path: PathBuf,

    /// Output JSON path; stdout when absent.
    #[arg(long)]
    out: Option<PathBuf>,

    /// Channel variants to derive (repeatable).
    #[arg(long = "channel")]
    channels: Vec<String>,

    /// Extra channel profiles JSON, merged over the built-ins.
    #[arg(long)]
    profiles: Option<PathBuf>,

    /// Channel asset JSON object keyed by `"<channel>/<asset>"`.
    #[arg(long)]
    assets: Option<PathBuf>,

    /// Print the tree fingerprint to stderr.
    #[arg(long, default_value_t = false)]
    fingerprint: bool,

    /// Slicing round-trip bound in milliseconds.
    #[arg(long, default_value_t = 15_000)]
    timeout_ms: u64,

    /// Host image size ceiling in pixels.
    #[arg(long, default_value_t = 4096)]
    max_image_size: u32,

    /// Tile edge as a fraction of the ceiling.
    #[arg(long, default_value_t = 0.9)]
    safety_margin: f64,
}

#[derive(Parser, Debug)]
struct PlanArgs {
    /// Image width.
    #[arg(long)]
    width: u32,

    /// Image height.
    #[arg(long)]
    height: u32,

    /// Host image size ceiling.
    #[arg(long, default_value_t = 4096)]
    max_tile: u32,
}

fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();
    tracing_subscriber::fmt()
        .with_writer(std::io::stderr)
        .with_max_level(if cli.verbose {
            tracing::Level::DEBUG
        } else {
            tracing::Level::WARN
        })
        .init();

    match cli.cmd {
        Command::Build(args) => cmd_build(args),
        Command::Plan(args) => cmd_plan(args),
    }
}

fn cmd_plan(args: PlanArgs) -> anyhow::Result<()> {
    let strategy = compute_slice_strategy(args.width, args.height, args.max_tile);
    let json = serde_json::to_string_pretty(&strategy).context("serialize slice strategy")?;
    println!("{json}");
    Ok(())
}

fn cmd_build(args: BuildArgs) -> anyhow::Result<()> {
    let config = Configuration::from_path(&args.in_path)?;

    let mut registry = ProfileRegistry::builtin();
    if let Some(path) = &args.profiles {
        registry.extend_from_path(path)?;
    }
    let store = load_assets(args.assets.as_ref())?;

    let options = EngineOptions::default()
        .with_slice_timeout(Duration::from_millis(args.timeout_ms))
        .with_safety_margin(args.safety_margin);
    let host = MemoryHost::new().with_max_image_size(args.max_image_size);
    let broker = SliceBroker::new();
    let rasterizer = LocalRasterizer::new(broker.clone());

    let rt = tokio::runtime::Builder::new_current_thread()
        .enable_time()
        .build()
        .context("start tokio runtime")?;

    let output = rt.block_on(async {
        let composer = PrototypeComposer::new(&host, &rasterizer, &broker, options.clone());
        let prototype = composer.build(&config).await?;

        let adapter = ChannelAdapter::new(&host, &rasterizer, &broker, options, &registry);
        let mut variants = Vec::with_capacity(args.channels.len());
        for channel in &args.channels {
            let variant = adapter.generate(channel, &prototype.root, &store).await?;
            variants.push(serde_json::json!({
                "channel": variant.channel,
                "root": variant.root,
                "diagnostics": variant.diagnostics,
            }));
        }

        if args.fingerprint {
            eprintln!("fingerprint {}", fingerprint_tree(&prototype.root));
        }
        anyhow::Ok(serde_json::json!({
            "prototype": prototype.root,
            "diagnostics": prototype.diagnostics,
            "variants": variants,
        }))
    })?;

    let json = serde_json::to_string_pretty(&output).context("serialize output")?;
    match &args.out {
        Some(path) => {
            if let Some(parent) = path.parent()
                && !parent.as_os_str().is_empty()
            {
                std::fs::create_dir_all(parent)
                    .with_context(|| format!("create output dir '{}'", parent.display()))?;
            }
            std::fs::write(path, json)
                .with_context(|| format!("write json '{}'", path.display()))?;
            eprintln!("wrote {}", path.display());
        }
        None => println!("{json}"),
    }
    Ok(())
}

fn load_assets(path: Option<&PathBuf>) -> anyhow::Result<MemoryStore<ImagePayload>> {
    let mut store = MemoryStore::new();
    let Some(path) = path else {
        return Ok(store);
    };
    let s = std::fs::read_to_string(path)
        .with_context(|| format!("read channel assets '{}'", path.display()))?;
    let entries: BTreeMap<String, ImagePayload> = serde_json::from_str(&s)
        .with_context(|| format!("parse channel assets '{}'", path.display()))?;
    for (key, payload) in entries {
        store.set(&key, payload)?;
    }
    Ok(store)
}
