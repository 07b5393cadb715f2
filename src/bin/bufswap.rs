use std::path::{Path, PathBuf};

use anyhow::Context as _;
use clap::{Parser, Subcommand, ValueEnum};

#[derive(Parser, Debug)]
#[command(name = "bufswap", version)]
struct Cli {
    /// Increase log verbosity (-v debug, -vv trace).
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    verbose: u8,

    #[command(subcommand)]
    cmd: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Run the player/monitor simulation and write the final scanout and monitor images.
    Run(RunArgs),
    /// Print the key bindings of the player and the monitor.
    Keys(KeysArgs),
}

#[derive(Parser, Debug)]
struct RunArgs {
    /// Simulation config JSON; flags below override its values.
    #[arg(long)]
    config: Option<PathBuf>,

    /// Swap discipline of the player.
    #[arg(long, value_enum)]
    manager: Option<ManagerChoice>,

    /// Ring size for `--manager n-buffer`.
    #[arg(long, default_value_t = 2)]
    buffers: usize,

    /// Number of ticks to simulate.
    #[arg(long, default_value_t = 600)]
    ticks: u64,

    /// Player chunk rate.
    #[arg(long)]
    rate: Option<u32>,

    /// Monitor chunk rate.
    #[arg(long)]
    monitor_rate: Option<u32>,

    /// Start both player and monitor in auto-replay mode.
    #[arg(long)]
    auto: bool,

    /// Key script: comma-separated `[tick:]keys` entries, e.g. `q,40:o`.
    #[arg(long, default_value = "")]
    keys: String,

    /// Directory holding `<name>_<i>.png` frames; synthetic frames are used when absent.
    #[arg(long)]
    frames_dir: Option<PathBuf>,

    /// Frame file prefix inside `--frames-dir`.
    #[arg(long, default_value = "rr")]
    frames_name: String,

    /// Number of frames in the sequence.
    #[arg(long)]
    frame_count: Option<u32>,

    /// Output directory for `scanout.png` and `monitor.png`.
    #[arg(long, default_value = "bufswap-out")]
    out_dir: PathBuf,

    /// Print run statistics as JSON instead of text.
    #[arg(long)]
    stats_json: bool,
}

#[derive(Parser, Debug)]
struct KeysArgs {
    /// Simulation config JSON supplying the rate steps.
    #[arg(long)]
    config: Option<PathBuf>,
}

#[derive(Clone, Copy, Debug, ValueEnum)]
enum ManagerChoice {
    Single,
    AlwaysAllocate,
    NBuffer,
}

fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();
    init_tracing(cli.verbose);
    match cli.cmd {
        Command::Run(args) => cmd_run(args),
        Command::Keys(args) => cmd_keys(args),
    }
}

fn init_tracing(verbose: u8) {
    let level = match verbose {
        0 => tracing::Level::INFO,
        1 => tracing::Level::DEBUG,
        _ => tracing::Level::TRACE,
    };
    tracing_subscriber::fmt()
        .with_max_level(level)
        .with_writer(std::io::stderr)
        .with_target(false)
        .init();
}

fn load_config(path: Option<&Path>) -> anyhow::Result<bufswap::SimConfig> {
    match path {
        Some(p) => bufswap::SimConfig::from_path(p)
            .with_context(|| format!("load config '{}'", p.display())),
        None => Ok(bufswap::SimConfig::default()),
    }
}

fn cmd_run(args: RunArgs) -> anyhow::Result<()> {
    let mut cfg = load_config(args.config.as_deref())?;
    if let Some(choice) = args.manager {
        cfg.manager = match choice {
            ManagerChoice::Single => bufswap::ManagerKind::Single,
            ManagerChoice::AlwaysAllocate => bufswap::ManagerKind::AlwaysAllocate,
            ManagerChoice::NBuffer => bufswap::ManagerKind::NBuffer {
                count: args.buffers,
            },
        };
    }
    if let Some(rate) = args.rate {
        cfg.player_rate = rate;
    }
    if let Some(rate) = args.monitor_rate {
        cfg.monitor_rate = rate;
    }
    if let Some(count) = args.frame_count {
        cfg.frame_count = count;
    }
    cfg.validate()?;

    let mut demo = match &args.frames_dir {
        Some(dir) => {
            let frames = bufswap::demo::ImageSequence::from_dir(
                dir,
                &args.frames_name,
                cfg.frame_count,
                cfg.surface_desc()?,
            )?;
            bufswap::demo::Demo::new(&cfg, frames)?
        }
        None => bufswap::demo::Demo::synthetic(&cfg)?,
    };

    let mut script = args.keys.clone();
    if args.auto {
        script = format!("qo,{script}");
    }
    let script = bufswap::demo::KeyScript::parse(&script)?;

    let mut clock = bufswap::FrameClock::new(bufswap::FixedStepSource::from_hz(cfg.tick_hz)?);
    let ran = demo.run(&mut clock, args.ticks, &script);
    tracing::debug!(ticks = ran, "simulation finished");

    std::fs::create_dir_all(&args.out_dir)
        .with_context(|| format!("create output dir '{}'", args.out_dir.display()))?;

    match demo.sink().snapshot() {
        Some(frame) => write_png(&args.out_dir.join("scanout.png"), &frame)?,
        None => eprintln!("no buffer reached scanout; skipping scanout.png"),
    }
    let screen = demo.monitor().screen().borrow().clone();
    write_png(&args.out_dir.join("monitor.png"), &screen)?;

    let stats = demo.stats();
    if args.stats_json {
        println!("{}", serde_json::to_string_pretty(&stats)?);
    } else {
        println!("ticks:              {}", stats.ticks);
        println!("manager:            {}", cfg.manager);
        println!("frames completed:   {}", stats.player.frames_completed);
        println!("player chunks:      {}", stats.player.chunks_drawn);
        println!("buffers allocated:  {}", stats.player_buffers.allocated_surfaces);
        println!("scanout promotions: {}", stats.scanout_promotions);
        println!("monitor scans:      {}", stats.monitor.ops_completed);
        println!("monitor skips:      {}", stats.monitor.ops_skipped);
    }
    Ok(())
}

fn write_png(path: &Path, surface: &bufswap::PixelSurface) -> anyhow::Result<()> {
    image::save_buffer_with_format(
        path,
        surface.data(),
        surface.width(),
        surface.height(),
        image::ColorType::Rgba8,
        image::ImageFormat::Png,
    )
    .with_context(|| format!("write png '{}'", path.display()))?;

    eprintln!("wrote {}", path.display());
    Ok(())
}

fn cmd_keys(args: KeysArgs) -> anyhow::Result<()> {
    let cfg = load_config(args.config.as_deref())?;
    let maps = [
        ("player", bufswap::demo::Keymap::player(cfg.player_rate_step)),
        ("monitor", bufswap::demo::Keymap::monitor(cfg.monitor_rate_step)),
    ];
    for (name, map) in maps {
        println!("{name}:");
        for (key, action) in map.bindings() {
            println!("  {key}  {action}");
        }
    }
    Ok(())
}
