use std::path::{Path, PathBuf};

use anyhow::Context as _;
use clap::{Parser, Subcommand};
use image::AnimationDecoder as _;
use image::RgbaImage;
use petgif::{
    AvatarLayer, AvatarModel, AvatarPos, BackgroundSet, Delay, EncoderKind, FrameIndex,
    FrameSynthesizer as _, GifMaker, GifMakerOpts, OverlayData, OverlaySynthesizer, RenderParams,
};
use tracing_subscriber::EnvFilter;

#[derive(Parser, Debug)]
#[command(name = "petgif", version)]
struct Cli {
    #[command(subcommand)]
    cmd: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Compose and encode an animated GIF.
    Render(RenderArgs),
    /// Composite a single frame as a PNG.
    Frame(FrameArgs),
}

#[derive(Parser, Debug)]
struct OverlayArgs {
    /// Sticker image; repeat for one sticker per output frame.
    #[arg(long = "sticker", required = true)]
    stickers: Vec<PathBuf>,

    /// Avatar image (animated GIFs keep all their frames). Repeatable.
    #[arg(long = "avatar")]
    avatars: Vec<PathBuf>,

    /// Placement `x,y,width,height` for the avatar at the same position. Defaults to the full
    /// sticker.
    #[arg(long = "avatar-pos", value_parser = parse_pos)]
    avatar_pos: Vec<AvatarPos>,

    /// Draw avatars below the sticker.
    #[arg(long, default_value_t = false)]
    avatar_under: bool,

    /// Render params JSON; flags below override its values.
    #[arg(long)]
    params: Option<PathBuf>,

    /// Disable smooth resampling.
    #[arg(long, default_value_t = false)]
    no_antialias: bool,

    /// Cap on the longer side of each frame.
    #[arg(long)]
    max_size: Option<u32>,
}

#[derive(Parser, Debug)]
struct RenderArgs {
    #[command(flatten)]
    overlay: OverlayArgs,

    /// Encoder backend (`BUFFERED_STREAM` / `ANIMATED_LIB`).
    #[arg(long)]
    encoder: Option<EncoderKind>,

    /// Delay between frames in milliseconds.
    #[arg(long)]
    delay_ms: Option<u32>,

    /// Play frames backwards.
    #[arg(long, default_value_t = false)]
    reverse: bool,

    /// Palette quality for ANIMATED_LIB (1 best, 30 fastest).
    #[arg(long)]
    quality: Option<u8>,

    /// Maker options JSON (`threads`, `wait_timeout_ms`).
    #[arg(long)]
    maker: Option<PathBuf>,

    /// Worker threads.
    #[arg(long)]
    threads: Option<usize>,

    /// Give up waiting for frames after this many milliseconds.
    #[arg(long)]
    timeout_ms: Option<u64>,

    /// Output GIF path.
    #[arg(long)]
    out: PathBuf,
}

#[derive(Parser, Debug)]
struct FrameArgs {
    #[command(flatten)]
    overlay: OverlayArgs,

    /// Frame index (0-based).
    #[arg(long)]
    frame: u32,

    /// Output PNG path.
    #[arg(long)]
    out: PathBuf,
}

fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("petgif=info")),
        )
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();
    match cli.cmd {
        Command::Render(args) => cmd_render(args),
        Command::Frame(args) => cmd_frame(args),
    }
}

fn cmd_render(args: RenderArgs) -> anyhow::Result<()> {
    let inputs = Inputs::load(&args.overlay)?;

    let mut params = inputs.params.clone();
    if let Some(encoder) = args.encoder {
        params.encoder = encoder;
    }
    if let Some(ms) = args.delay_ms {
        params.delay_ms = Delay(ms);
    }
    if let Some(q) = args.quality {
        params.quality = q;
    }
    params.reverse |= args.reverse;
    params.validate()?;

    let mut maker_opts = match &args.maker {
        Some(path) => GifMakerOpts::from_path(path)?,
        None => GifMakerOpts::default(),
    };
    if args.threads.is_some() {
        maker_opts.threads = args.threads;
    }
    if args.timeout_ms.is_some() {
        maker_opts.wait_timeout_ms = args.timeout_ms;
    }

    let maker = GifMaker::with_opts(OverlaySynthesizer::new(), &maker_opts)?;
    let gif = maker.render(&inputs.backgrounds()?, &inputs.overlays(), &params)?;
    gif.write_to(&args.out)?;

    eprintln!(
        "wrote {} ({} frames, {}x{})",
        args.out.display(),
        gif.frame_count(),
        gif.width(),
        gif.height()
    );
    Ok(())
}

fn cmd_frame(args: FrameArgs) -> anyhow::Result<()> {
    let inputs = Inputs::load(&args.overlay)?;
    let backgrounds = inputs.backgrounds()?;
    let overlays = inputs.overlays();

    let n = backgrounds.frame_count(&overlays)?;
    let idx = FrameIndex(args.frame);
    anyhow::ensure!(
        idx.as_usize() < n,
        "frame {idx} is out of range (render has {n} frames)"
    );

    let frame = OverlaySynthesizer::new().synthesize(
        backgrounds.background_for(idx)?,
        &overlays,
        &inputs.params.synth_options(),
        idx,
    )?;

    if let Some(parent) = args.out.parent() {
        std::fs::create_dir_all(parent)
            .with_context(|| format!("create output dir '{}'", parent.display()))?;
    }
    frame
        .save_with_format(&args.out, image::ImageFormat::Png)
        .with_context(|| format!("write png '{}'", args.out.display()))?;

    eprintln!("wrote {}", args.out.display());
    Ok(())
}

struct Inputs {
    stickers: Vec<RgbaImage>,
    avatars: Vec<AvatarModel>,
    params: RenderParams,
}

impl Inputs {
    fn load(args: &OverlayArgs) -> anyhow::Result<Self> {
        let stickers = args
            .stickers
            .iter()
            .map(|p| load_still(p))
            .collect::<anyhow::Result<Vec<_>>>()?;
        let (sw, sh) = stickers
            .first()
            .map(RgbaImage::dimensions)
            .context("at least one --sticker is required")?;

        let layer = if args.avatar_under {
            AvatarLayer::Bottom
        } else {
            AvatarLayer::Top
        };
        let mut avatars = Vec::with_capacity(args.avatars.len());
        for (i, path) in args.avatars.iter().enumerate() {
            let pos = args.avatar_pos.get(i).copied().unwrap_or(AvatarPos {
                x: 0,
                y: 0,
                width: sw,
                height: sh,
            });
            avatars.push(AvatarModel::new(load_frames(path)?, pos).with_layer(layer));
        }

        let mut params = match &args.params {
            Some(path) => RenderParams::from_path(path)?,
            None => RenderParams::default(),
        };
        if args.no_antialias {
            params.antialias = false;
        }
        if args.max_size.is_some() {
            params.max_size = args.max_size;
        }

        Ok(Self {
            stickers,
            avatars,
            params,
        })
    }

    fn backgrounds(&self) -> petgif::GifResult<BackgroundSet<'_>> {
        match self.stickers.as_slice() {
            [single] => Ok(BackgroundSet::single(single)),
            many => BackgroundSet::from_frames(many),
        }
    }

    fn overlays(&self) -> OverlayData<'_> {
        OverlayData::new(&self.avatars, &[])
    }
}

fn load_still(path: &Path) -> anyhow::Result<RgbaImage> {
    Ok(image::open(path)
        .with_context(|| format!("open image '{}'", path.display()))?
        .to_rgba8())
}

fn load_frames(path: &Path) -> anyhow::Result<Vec<RgbaImage>> {
    let is_gif = path
        .extension()
        .and_then(|e| e.to_str())
        .is_some_and(|e| e.eq_ignore_ascii_case("gif"));
    if !is_gif {
        return Ok(vec![load_still(path)?]);
    }

    let file = std::fs::File::open(path)
        .with_context(|| format!("open avatar '{}'", path.display()))?;
    let decoder = image::codecs::gif::GifDecoder::new(std::io::BufReader::new(file))
        .with_context(|| format!("decode gif '{}'", path.display()))?;
    let frames = decoder
        .into_frames()
        .collect_frames()
        .with_context(|| format!("decode gif frames '{}'", path.display()))?;
    Ok(frames.into_iter().map(image::Frame::into_buffer).collect())
}

fn parse_pos(s: &str) -> Result<AvatarPos, String> {
    let parts: Vec<&str> = s.split(',').map(str::trim).collect();
    let [x, y, w, h] = parts.as_slice() else {
        return Err(format!("expected x,y,width,height, got '{s}'"));
    };
    let int = |v: &str| v.parse::<i64>().map_err(|e| format!("'{v}': {e}"));
    let dim = |v: &str| v.parse::<u32>().map_err(|e| format!("'{v}': {e}"));
    Ok(AvatarPos {
        x: int(*x)?,
        y: int(*y)?,
        width: dim(*w)?,
        height: dim(*h)?,
    })
}
