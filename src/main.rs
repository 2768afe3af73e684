// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at http://mozilla.org/MPL/2.0/.

use std::io::{self, Read};
use std::path::PathBuf;
use std::process;

use pico_args::Arguments;
use svgscene::bridge::url::Url;
use svgscene::tree::RectExt;
use svgscene::{BridgeContext, Document, GraphicsNode, Options, Scene, SceneParsing};

const HELP: &str = "\
svgscene builds a scene graph from an SVG file and resolves its filters.

USAGE:
  svgscene [OPTIONS] <in-svg> [out-png]  # from file
  svgscene [OPTIONS] - [out-png]         # from stdin

OPTIONS:
  -h, --help                        Prints help information
  -V, --version                     Prints version information

  --dpi DPI                         Sets the resolution
                                    [default: 96] [possible values: 10..4000 (inclusive)]
  --dump                            Prints scene nodes and their filter chains
  --quiet                           Disables warnings

ARGS:
  <in-svg>                          Input file
  [out-png]                         Output file. The scene is rendered only when set
";

#[derive(Debug)]
struct Args {
    dpi: u32,
    dump: bool,
    quiet: bool,
    input: String,
    output: Option<PathBuf>,
}

fn collect_args() -> Result<Args, pico_args::Error> {
    let mut input = Arguments::from_env();

    if input.contains(["-h", "--help"]) {
        print!("{}", HELP);
        process::exit(0);
    }

    if input.contains(["-V", "--version"]) {
        println!("{}", env!("CARGO_PKG_VERSION"));
        process::exit(0);
    }

    Ok(Args {
        dpi: input.opt_value_from_fn("--dpi", parse_dpi)?.unwrap_or(96),
        dump: input.contains("--dump"),
        quiet: input.contains("--quiet"),
        input: input.free_from_str()?,
        output: input.opt_free_from_str()?,
    })
}

fn parse_dpi(s: &str) -> Result<u32, String> {
    let n: u32 = s.parse().map_err(|_| "invalid number")?;

    if (10..=4000).contains(&n) {
        Ok(n)
    } else {
        Err("DPI out of bounds".to_string())
    }
}

fn main() {
    let args = match collect_args() {
        Ok(v) => v,
        Err(e) => {
            eprintln!("Error: {}.", e);
            process::exit(1);
        }
    };

    if !args.quiet {
        if let Ok(()) = log::set_logger(&LOGGER) {
            log::set_max_level(log::LevelFilter::Warn);
        }
    }

    if let Err(e) = process(args) {
        eprintln!("Error: {}.", e);
        process::exit(1);
    }
}

fn process(args: Args) -> Result<(), String> {
    let (data, base_url) = if args.input == "-" {
        (load_stdin()?, None)
    } else {
        let data = std::fs::read(&args.input).map_err(|e| e.to_string())?;
        let url = std::fs::canonicalize(&args.input)
            .ok()
            .and_then(|path| Url::from_file_path(path).ok());
        (data, url)
    };

    let opt = Options {
        base_url,
        dpi: args.dpi as f32,
        ..Options::default()
    };

    let doc = Document::from_data(&data, &opt).map_err(|e| e.to_string())?;
    let ctx = BridgeContext::new(&doc, &opt);
    let scene = Scene::from_document(&ctx).map_err(|e| e.to_string())?;

    if args.dump {
        dump(&scene);
    }

    if let Some(ref path) = args.output {
        let size = scene.size.to_int_size();
        let mut pixmap = tiny_skia::Pixmap::new(size.width(), size.height())
            .ok_or_else(|| "failed to allocate a canvas".to_string())?;
        scene.render(&mut pixmap.as_mut(), tiny_skia::Transform::default());
        pixmap
            .save_png(path)
            .map_err(|_| "failed to write the output file".to_string())?;
    }

    Ok(())
}

fn dump(scene: &Scene) {
    println!("scene {}x{}", scene.size.width(), scene.size.height());

    for node in &scene.nodes {
        let state = node.state();
        let bounds = node
            .bounds()
            .and_then(|r| r.transform_bbox(state.transform))
            .map(|r| format!("{} {} {} {}", r.x(), r.y(), r.width(), r.height()))
            .unwrap_or_else(|| "none".to_string());

        let id = if state.id.is_empty() { "-" } else { &state.id };
        println!("node '{}' bounds: {}", id, bounds);

        if let Some(ref chain) = state.filter {
            for op in chain.operators() {
                let r = op.rect();
                println!(
                    "  {} {} {} {} {}",
                    op.name(),
                    r.x(),
                    r.y(),
                    r.width(),
                    r.height()
                );
            }
        }
    }
}

fn load_stdin() -> Result<Vec<u8>, String> {
    let mut buf = Vec::new();
    let stdin = io::stdin();
    let mut handle = stdin.lock();

    handle
        .read_to_end(&mut buf)
        .map_err(|_| "failed to read from stdin".to_string())?;

    Ok(buf)
}

/// A simple stderr logger.
static LOGGER: SimpleLogger = SimpleLogger;
struct SimpleLogger;
impl log::Log for SimpleLogger {
    fn enabled(&self, metadata: &log::Metadata) -> bool {
        metadata.level() <= log::LevelFilter::Warn
    }

    fn log(&self, record: &log::Record) {
        if self.enabled(record.metadata()) {
            let target = if !record.target().is_empty() {
                record.target()
            } else {
                record.module_path().unwrap_or_default()
            };

            let line = record.line().unwrap_or(0);
            let args = record.args();

            match record.level() {
                log::Level::Error => eprintln!("Error (in {}:{}): {}", target, line, args),
                log::Level::Warn => eprintln!("Warning (in {}:{}): {}", target, line, args),
                log::Level::Info => eprintln!("Info (in {}:{}): {}", target, line, args),
                log::Level::Debug => eprintln!("Debug (in {}:{}): {}", target, line, args),
                log::Level::Trace => eprintln!("Trace (in {}:{}): {}", target, line, args),
            }
        }
    }

    fn flush(&self) {}
}
