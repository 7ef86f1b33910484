use std::path::{Path, PathBuf};

use anyhow::Context as _;
use clap::{Parser, Subcommand};

#[derive(Parser, Debug)]
#[command(name = "erasewarp", version)]
struct Cli {
    /// Log debug-level engine events to stderr.
    #[arg(long, global = true)]
    verbose: bool,

    #[command(subcommand)]
    cmd: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Erase along a stroke given in image pixels.
    Erase(EraseArgs),
    /// Move control points and bake the warp.
    Warp(WarpArgs),
    /// Replay a JSON pointer-event script through an edit session.
    Replay(ReplayArgs),
}

#[derive(Parser, Debug)]
struct EraseArgs {
    /// Input image.
    #[arg(long = "in")]
    in_path: PathBuf,

    /// Output PNG path.
    #[arg(long)]
    out: PathBuf,

    /// Brush radius in image pixels.
    #[arg(long, default_value_t = 17.0)]
    radius: f64,

    /// Soft edge width in image pixels.
    #[arg(long, default_value_t = 0.0)]
    feather: f64,

    /// Stroke samples as `x,y;x,y;...`.
    #[arg(long, value_delimiter = ';', value_parser = parse_point, required = true)]
    path: Vec<erasewarp::Point>,
}

#[derive(Parser, Debug)]
struct WarpArgs {
    /// Input image.
    #[arg(long = "in")]
    in_path: PathBuf,

    /// Output PNG path.
    #[arg(long)]
    out: PathBuf,

    /// Control point move as `ROW,COL,DX,DY` (image pixels). Repeatable.
    #[arg(long = "move", value_parser = parse_move, required = true)]
    moves: Vec<PointMove>,

    /// Output width (defaults to the input width).
    #[arg(long)]
    width: Option<u32>,

    /// Output height (defaults to the input height).
    #[arg(long)]
    height: Option<u32>,
}

#[derive(Parser, Debug)]
struct ReplayArgs {
    /// Input image.
    #[arg(long = "in")]
    in_path: PathBuf,

    /// Event script JSON.
    #[arg(long)]
    events: PathBuf,

    /// Output PNG path.
    #[arg(long)]
    out: PathBuf,

    /// Session config JSON (overrides the script's inline config).
    #[arg(long)]
    config: Option<PathBuf>,
}

#[derive(Clone, Copy, Debug, PartialEq)]
struct PointMove {
    row: usize,
    col: usize,
    delta: erasewarp::Vec2,
}

#[derive(Debug, serde::Deserialize)]
#[serde(deny_unknown_fields)]
struct Script {
    /// Display viewport `[width, height]`.
    viewport: [f64; 2],
    #[serde(default)]
    config: erasewarp::SessionConfig,
    events: Vec<ScriptEvent>,
}

#[derive(Debug, serde::Deserialize)]
#[serde(rename_all = "snake_case")]
enum ScriptEvent {
    Resize([f64; 2]),
    Mode(erasewarp::ToolMode),
    Press([f64; 2]),
    Move([f64; 2]),
    Release,
    Commit,
}

fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();
    init_tracing(cli.verbose);
    match cli.cmd {
        Command::Erase(args) => cmd_erase(args),
        Command::Warp(args) => cmd_warp(args),
        Command::Replay(args) => cmd_replay(args),
    }
}

fn init_tracing(verbose: bool) {
    let level = if verbose {
        tracing::Level::DEBUG
    } else {
        tracing::Level::INFO
    };
    tracing_subscriber::fmt()
        .with_writer(std::io::stderr)
        .with_max_level(level)
        .with_target(false)
        .init();
}

fn cmd_erase(args: EraseArgs) -> anyhow::Result<()> {
    let mut image = load_image(&args.in_path)?;

    let transform = erasewarp::DisplayTransform::IDENTITY;
    let mut stroke = erasewarp::StrokeInterpolator::new();
    let mut stamps = 0usize;
    for &p in &args.path {
        let centers = stroke.advance(p, &transform, args.radius, &image);
        erasewarp::apply_erase_path(&mut image, &centers, args.radius, args.feather)?;
        stamps += centers.len();
    }
    tracing::info!(stamps, "erase applied");

    save_png(&args.out, &image)
}

fn cmd_warp(args: WarpArgs) -> anyhow::Result<()> {
    let image = load_image(&args.in_path)?;
    let (w, h) = (image.width(), image.height());

    let mut grid = erasewarp::GridModel::new(erasewarp::DisplayTransform::IDENTITY.image_rect(w, h));
    for m in &args.moves {
        let p = grid
            .current()
            .get(m.row, m.col)
            .with_context(|| format!("control point ({},{}) out of range", m.row, m.col))?;
        grid.set_point(m.row, m.col, p + m.delta)?;
    }

    let out = erasewarp::commit_warp(
        &image,
        grid.current(),
        grid.baseline(),
        1.0,
        args.width.unwrap_or(w),
        args.height.unwrap_or(h),
    )?;
    tracing::info!(width = out.width(), height = out.height(), "warp committed");

    save_png(&args.out, &out)
}

fn cmd_replay(args: ReplayArgs) -> anyhow::Result<()> {
    let image = load_image(&args.in_path)?;
    let script = read_script(&args.events)?;
    let config = match &args.config {
        Some(path) => erasewarp::SessionConfig::from_path(path)?,
        None => script.config,
    };

    let [vw, vh] = script.viewport;
    let mut session = erasewarp::EditSession::new(image, erasewarp::Size::new(vw, vh), config)?;
    for (i, event) in script.events.iter().enumerate() {
        apply_event(&mut session, event).with_context(|| format!("event #{i} ({event:?})"))?;
    }
    if session.commit_warp()? {
        tracing::info!("pending warp committed at end of script");
    }

    save_png(&args.out, session.image())
}

fn apply_event(session: &mut erasewarp::EditSession, event: &ScriptEvent) -> anyhow::Result<()> {
    match *event {
        ScriptEvent::Resize([w, h]) => session.resize_viewport(erasewarp::Size::new(w, h))?,
        ScriptEvent::Mode(mode) => session.set_mode(mode),
        ScriptEvent::Press([x, y]) => {
            let outcome = session.pointer_pressed(erasewarp::Point::new(x, y))?;
            tracing::debug!(?outcome, "press");
        }
        ScriptEvent::Move([x, y]) => {
            let outcome = session.pointer_moved(erasewarp::Point::new(x, y))?;
            tracing::debug!(?outcome, "move");
        }
        ScriptEvent::Release => session.pointer_released(),
        ScriptEvent::Commit => {
            session.commit_warp()?;
        }
    }
    Ok(())
}

fn read_script(path: &Path) -> anyhow::Result<Script> {
    let json = std::fs::read_to_string(path)
        .with_context(|| format!("open event script '{}'", path.display()))?;
    serde_json::from_str(&json).with_context(|| "parse event script JSON")
}

fn load_image(path: &Path) -> anyhow::Result<erasewarp::PixelBuffer> {
    let rgba = image::open(path)
        .with_context(|| format!("decode image '{}'", path.display()))?
        .to_rgba8();
    let (w, h) = rgba.dimensions();
    Ok(erasewarp::PixelBuffer::from_rgba8(w, h, rgba.as_raw())?)
}

fn save_png(path: &Path, buf: &erasewarp::PixelBuffer) -> anyhow::Result<()> {
    if let Some(parent) = path.parent()
        && !parent.as_os_str().is_empty()
    {
        std::fs::create_dir_all(parent)
            .with_context(|| format!("create output dir '{}'", parent.display()))?;
    }

    image::save_buffer_with_format(
        path,
        &buf.to_rgba8(),
        buf.width(),
        buf.height(),
        image::ColorType::Rgba8,
        image::ImageFormat::Png,
    )
    .with_context(|| format!("write png '{}'", path.display()))?;

    eprintln!("wrote {}", path.display());
    Ok(())
}

fn parse_point(s: &str) -> Result<erasewarp::Point, String> {
    let nums = parse_numbers(s)?;
    match *nums.as_slice() {
        [x, y] => Ok(erasewarp::Point::new(x, y)),
        _ => Err(format!("expected `x,y`, got '{s}'")),
    }
}

fn parse_move(s: &str) -> Result<PointMove, String> {
    let nums = parse_numbers(s)?;
    let [row, col, dx, dy] = *nums.as_slice() else {
        return Err(format!("expected `ROW,COL,DX,DY`, got '{s}'"));
    };
    let index = |v: f64| -> Result<usize, String> {
        if v.fract() == 0.0 && (0.0..3.0).contains(&v) {
            Ok(v as usize)
        } else {
            Err(format!("grid index must be 0, 1 or 2, got {v}"))
        }
    };
    Ok(PointMove {
        row: index(row)?,
        col: index(col)?,
        delta: erasewarp::Vec2::new(dx, dy),
    })
}

fn parse_numbers(s: &str) -> Result<Vec<f64>, String> {
    s.split(',')
        .map(|part| {
            part.trim()
                .parse::<f64>()
                .map_err(|e| format!("bad number '{}': {e}", part.trim()))
        })
        .collect()
}
