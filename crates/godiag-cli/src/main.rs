use chrono::NaiveDate;
use godiag::render::{
    BaseUrlResolver, HeadlessError, ImageFormat, LinkResolver, PassthroughResolver, RenderError,
    Renderer, SgfOptions, build_image_map, image_map_id, to_sgf,
};
use godiag::store::DirStore;
use godiag::{ErrorKind, StyleConfig, fingerprint};
use serde::Serialize;
use std::io::{Read, Write};
use std::path::PathBuf;
use tracing_subscriber::EnvFilter;

#[derive(Debug)]
enum CliError {
    Usage(&'static str),
    Io(std::io::Error),
    Diagram(HeadlessError),
    Json(serde_json::Error),
    LinkBase(String),
    Date(String),
}

impl std::fmt::Display for CliError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            CliError::Usage(msg) => write!(f, "{msg}"),
            CliError::Io(err) => write!(f, "I/O error: {err}"),
            CliError::Diagram(err) => write!(f, "{err}"),
            CliError::Json(err) => write!(f, "JSON error: {err}"),
            CliError::LinkBase(err) => write!(f, "invalid --link-base: {err}"),
            CliError::Date(raw) => write!(f, "invalid --date {raw:?}, expected YYYY-MM-DD"),
        }
    }
}

impl From<std::io::Error> for CliError {
    fn from(value: std::io::Error) -> Self {
        Self::Io(value)
    }
}

impl From<HeadlessError> for CliError {
    fn from(value: HeadlessError) -> Self {
        Self::Diagram(value)
    }
}

impl From<godiag::Error> for CliError {
    fn from(value: godiag::Error) -> Self {
        Self::Diagram(value.into())
    }
}

impl From<RenderError> for CliError {
    fn from(value: RenderError) -> Self {
        Self::Diagram(value.into())
    }
}

impl From<serde_json::Error> for CliError {
    fn from(value: serde_json::Error) -> Self {
        Self::Json(value)
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
enum Command {
    #[default]
    Parse,
    Keys,
    Render,
    Sgf,
    Map,
    Process,
}

#[derive(Debug, Default)]
struct Args {
    command: Command,
    input: Option<String>,
    pretty: bool,
    format: Option<ImageFormat>,
    style: Option<PathBuf>,
    link_base: Option<String>,
    date: Option<NaiveDate>,
    store: Option<PathBuf>,
    out: Option<String>,
}

#[derive(Serialize)]
struct KeysOut<'a> {
    image: &'a str,
    sgf: &'a str,
    width: i32,
    height: i32,
}

fn usage() -> &'static str {
    "godiag-cli\n\
\n\
USAGE:\n\
  godiag-cli [parse] [--pretty] [<path>|-]\n\
  godiag-cli keys [--style <path>] [--pretty] [<path>|-]\n\
  godiag-cli render [--format png|jpg] [--style <path>] [--out <path>|-] [<path>|-]\n\
  godiag-cli sgf [--date <YYYY-MM-DD>] [--style <path>] [--out <path>] [<path>|-]\n\
  godiag-cli map [--link-base <url>] [--style <path>] [<path>|-]\n\
  godiag-cli process --store <dir> [--format png|jpg] [--link-base <url>] [--date <YYYY-MM-DD>] [--style <path>] [--pretty] [<path>|-]\n\
\n\
NOTES:\n\
  - If <path> is omitted or '-', input is read from stdin.\n\
  - Input may be the bare notation or still wrapped in <go>...</go>.\n\
  - --style accepts a JSON or YAML (.yaml/.yml) style file.\n\
  - render writes next to the input file by default (or ./out.png for stdin); --out - writes to stdout.\n\
  - Set GODIAG_LOG (e.g. GODIAG_LOG=debug) to control log output on stderr.\n\
"
}

fn parse_format(s: &str) -> Option<ImageFormat> {
    match s.trim().to_ascii_lowercase().as_str() {
        "png" => Some(ImageFormat::Png),
        "jpg" | "jpeg" => Some(ImageFormat::Jpeg),
        _ => None,
    }
}

fn parse_args(argv: &[String]) -> Result<Args, CliError> {
    let mut args = Args::default();

    let mut it = argv.iter().skip(1);
    while let Some(a) = it.next() {
        match a.as_str() {
            "--help" | "-h" => return Err(CliError::Usage(usage())),
            "parse" => args.command = Command::Parse,
            "keys" => args.command = Command::Keys,
            "render" => args.command = Command::Render,
            "sgf" => args.command = Command::Sgf,
            "map" => args.command = Command::Map,
            "process" => args.command = Command::Process,
            "--pretty" => args.pretty = true,
            "--format" => {
                let Some(fmt) = it.next() else {
                    return Err(CliError::Usage(usage()));
                };
                args.format = Some(parse_format(fmt).ok_or(CliError::Usage(usage()))?);
            }
            "--style" => {
                let Some(path) = it.next() else {
                    return Err(CliError::Usage(usage()));
                };
                args.style = Some(PathBuf::from(path));
            }
            "--link-base" => {
                let Some(base) = it.next() else {
                    return Err(CliError::Usage(usage()));
                };
                args.link_base = Some(base.clone());
            }
            "--date" => {
                let Some(raw) = it.next() else {
                    return Err(CliError::Usage(usage()));
                };
                let date = NaiveDate::parse_from_str(raw, "%Y-%m-%d")
                    .map_err(|_| CliError::Date(raw.clone()))?;
                args.date = Some(date);
            }
            "--store" => {
                let Some(dir) = it.next() else {
                    return Err(CliError::Usage(usage()));
                };
                args.store = Some(PathBuf::from(dir));
            }
            "--out" => {
                let Some(out) = it.next() else {
                    return Err(CliError::Usage(usage()));
                };
                args.out = Some(out.clone());
            }
            "--" => {
                if let Some(rest) = it.next() {
                    if args.input.is_some() {
                        return Err(CliError::Usage(usage()));
                    }
                    args.input = Some(rest.clone());
                }
                if it.next().is_some() {
                    return Err(CliError::Usage(usage()));
                }
            }
            other if other.starts_with('-') && other != "-" => {
                return Err(CliError::Usage(usage()));
            }
            path => {
                if args.input.is_some() {
                    return Err(CliError::Usage(usage()));
                }
                args.input = Some(path.to_string());
            }
        }
    }

    if args.command == Command::Process && args.store.is_none() {
        return Err(CliError::Usage(usage()));
    }

    Ok(args)
}

fn read_input(input: Option<&str>) -> Result<String, CliError> {
    match input {
        None | Some("-") => {
            let mut buf = String::new();
            std::io::stdin().read_to_string(&mut buf)?;
            Ok(buf)
        }
        Some(path) => Ok(std::fs::read_to_string(path)?),
    }
}

fn write_json(value: &impl Serialize, pretty: bool) -> Result<(), CliError> {
    let mut stdout = std::io::stdout().lock();
    if pretty {
        serde_json::to_writer_pretty(&mut stdout, value)?;
    } else {
        serde_json::to_writer(&mut stdout, value)?;
    }
    writeln!(stdout)?;
    Ok(())
}

fn write_text(text: &str, out: Option<&str>) -> Result<(), CliError> {
    match out {
        None | Some("-") => {
            print!("{text}");
            Ok(())
        }
        Some(path) => {
            std::fs::write(path, text)?;
            Ok(())
        }
    }
}

fn default_raster_out_path(input: Option<&str>, ext: &str) -> PathBuf {
    match input {
        Some(path) if path != "-" => PathBuf::from(path).with_extension(ext),
        _ => PathBuf::from(format!("out.{ext}")),
    }
}

fn load_style(path: Option<&PathBuf>) -> Result<StyleConfig, CliError> {
    match path {
        Some(path) => Ok(StyleConfig::from_path(path)?),
        None => Ok(StyleConfig::default()),
    }
}

fn build_resolver(link_base: Option<&str>) -> Result<Box<dyn LinkResolver>, CliError> {
    match link_base {
        Some(base) => {
            let resolver =
                BaseUrlResolver::new(base).map_err(|err| CliError::LinkBase(err.to_string()))?;
            Ok(Box::new(resolver))
        }
        None => Ok(Box::new(PassthroughResolver)),
    }
}

fn run(args: Args) -> Result<(), CliError> {
    let text = read_input(args.input.as_deref())?;
    let style = load_style(args.style.as_ref())?;
    let format = args.format.unwrap_or(ImageFormat::Png);
    let renderer = Renderer::new(style)?
        .with_format(format)
        .with_sgf_options(SgfOptions { date: args.date });

    match args.command {
        Command::Parse => {
            let board = renderer.parse(&text)?;
            write_json(&board, args.pretty)?;
        }
        Command::Keys => {
            let board = renderer.parse(&text)?;
            let keys = fingerprint(&board, renderer.style());
            let size = godiag::Geometry::for_board(&board, renderer.style())
                .canvas_size(board.width(), board.height());
            write_json(
                &KeysOut {
                    image: &keys.image,
                    sgf: &keys.sgf,
                    width: size.width,
                    height: size.height,
                },
                args.pretty,
            )?;
        }
        Command::Render => {
            let board = renderer.parse(&text)?;
            let bytes = renderer.raster().render_format(&board, format)?;
            let out = args.out.clone().unwrap_or_else(|| {
                default_raster_out_path(args.input.as_deref(), format.extension())
                    .to_string_lossy()
                    .to_string()
            });
            if out == "-" {
                std::io::stdout().lock().write_all(&bytes)?;
            } else {
                std::fs::write(&out, bytes)?;
                tracing::info!(path = %out, "wrote image");
            }
        }
        Command::Sgf => {
            let board = renderer.parse(&text)?;
            let sgf = to_sgf(&board, renderer.style(), renderer.sgf_options());
            write_text(&sgf, args.out.as_deref())?;
        }
        Command::Map => {
            let board = renderer.parse(&text)?;
            let resolver = build_resolver(args.link_base.as_deref())?;
            let keys = fingerprint(&board, renderer.style());
            let map = build_image_map(&board, renderer.style(), resolver.as_ref());
            let html = map.to_html(&image_map_id(&keys.image, 0));
            if !html.is_empty() {
                write_text(&format!("{html}\n"), args.out.as_deref())?;
            }
        }
        Command::Process => {
            let Some(dir) = args.store.as_ref() else {
                return Err(CliError::Usage(usage()));
            };
            let store = DirStore::new(dir);
            let resolver = build_resolver(args.link_base.as_deref())?;
            let output = renderer.process(&text, &store, resolver.as_ref())?;
            write_json(&output, args.pretty)?;
        }
    }
    Ok(())
}

fn init_logging() {
    let filter = EnvFilter::try_from_env("GODIAG_LOG").unwrap_or_else(|_| EnvFilter::new("warn"));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();
}

fn main() {
    init_logging();

    let args = match parse_args(&std::env::args().collect::<Vec<_>>()) {
        Ok(v) => v,
        Err(CliError::Usage(msg)) => {
            eprintln!("{msg}");
            std::process::exit(2);
        }
        Err(err) => {
            eprintln!("{err}");
            std::process::exit(2);
        }
    };

    match run(args) {
        Ok(()) => {}
        Err(CliError::Diagram(err)) if err.kind() == ErrorKind::Parse => {
            eprintln!("{err}");
            std::process::exit(3);
        }
        Err(err) => {
            eprintln!("{err}");
            std::process::exit(1);
        }
    }
}
