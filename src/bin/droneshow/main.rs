//! droneshow CLI - Export drone-show keyframe data and inspect artifacts.

use std::env;
use std::path::{Path, PathBuf};

use anyhow::{bail, Context};
use droneshow::codec::{self, DataFormat};
use droneshow::config::ExportSettings;
use droneshow::prelude::*;
use tracing_subscriber::EnvFilter;

fn main() {
    let args: Vec<String> = env::args().collect();

    // Parse global flags
    let mut level = "info";
    let mut filtered_args: Vec<&str> = Vec::new();
    for arg in &args[1..] {
        match arg.as_str() {
            "-v" | "--verbose" => level = "debug",
            "-vv" | "--trace" => level = "trace",
            "-q" | "--quiet" => level = "error",
            _ => filtered_args.push(arg),
        }
    }
    init_logging(level);

    if filtered_args.is_empty() {
        print_help();
        return;
    }

    let result = match filtered_args[0] {
        "export" | "e" => cmd_export(&filtered_args[1..]),
        "info" | "i" => match filtered_args.get(1) {
            Some(file) => cmd_info(file),
            None => usage("missing file argument", "droneshow-cli info <artifact.json|bin>"),
        },
        "convert" | "c" => match (filtered_args.get(1), filtered_args.get(2)) {
            (Some(input), Some(output)) => cmd_convert(input, output),
            _ => usage("missing arguments", "droneshow-cli convert <input> <output>"),
        },
        "help" | "h" | "-h" | "--help" => {
            print_help();
            Ok(())
        }
        other => {
            eprintln!("Unknown command: {}", other);
            eprintln!();
            print_help();
            std::process::exit(1);
        }
    };

    if let Err(e) = result {
        eprintln!("Error: {:#}", e);
        std::process::exit(1);
    }
}

/// Log to stderr at `level` unless RUST_LOG says otherwise.
fn init_logging(level: &str) {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(level));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .with_writer(std::io::stderr)
        .init();
}

fn usage(problem: &str, usage: &str) -> anyhow::Result<()> {
    eprintln!("Error: {}", problem);
    eprintln!("Usage: {}", usage);
    std::process::exit(1);
}

fn print_help() {
    println!("droneshow-cli - Drone-show keyframe exporter");
    println!();
    println!("USAGE:");
    println!("    droneshow-cli [OPTIONS] <COMMAND> [ARGS]");
    println!();
    println!("COMMANDS:");
    println!("    e, export  <scene.json> [FLAGS]  Sample a collection and write an artifact");
    println!("    i, info    <artifact>            Show fps, track and keyframe counts");
    println!("    c, convert <input> <output>      Re-encode between .json and .bin");
    println!("    h, help                          Show this help");
    println!();
    println!("EXPORT FLAGS:");
    println!("    --config <settings.json>   Load export settings (flags below override)");
    println!("    --collection <name>        Collection to export");
    println!("    --mode <object|vertices>   Track object origins or mesh vertices");
    println!("    --format <json|binary>     Output format");
    println!("    --ratio <0..1>             Decimation ratio (vertices mode)");
    println!("    --keep                     Keep the decimated collection");
    println!("    --out <dir>                Output directory");
    println!("    --name <name>              Output base filename");
    println!("    --frames <start..end>      Override the scene frame range");
    println!("    --fps <n>                  Override the scene frame rate");
    println!();
    println!("OPTIONS:");
    println!("    -v, --verbose    Debug output");
    println!("    -vv, --trace     Trace output");
    println!("    -q, --quiet      Errors only");
    println!();
    println!("RUST_LOG overrides the level flags.");
}

fn cmd_export(args: &[&str]) -> anyhow::Result<()> {
    let Some(scene_path) = args.first() else {
        return usage("missing scene argument", "droneshow-cli export <scene.json> [FLAGS]");
    };

    let mut settings = ExportSettings::default();
    let mut frames: Option<FrameRange> = None;
    let mut fps: Option<u32> = None;

    // --config first so the other flags override it
    if let Some(i) = args.iter().position(|&a| a == "--config") {
        let path = flag_value(args, i, "--config")?;
        settings = ExportSettings::load_from(path)
            .with_context(|| format!("loading settings from {}", path))?;
    }

    let mut i = 1;
    while i < args.len() {
        match args[i] {
            "--config" => {
                i += 1;
            }
            "--collection" => {
                settings.target_collection = Some(flag_value(args, i, "--collection")?.to_string());
                i += 1;
            }
            "--mode" => {
                let v = flag_value(args, i, "--mode")?;
                settings.export_mode = ExportMode::parse(v)
                    .with_context(|| format!("unknown mode '{}' (object|vertices)", v))?;
                i += 1;
            }
            "--format" => {
                let v = flag_value(args, i, "--format")?;
                settings.data_format = DataFormat::parse(v)
                    .with_context(|| format!("unknown format '{}' (json|binary)", v))?;
                i += 1;
            }
            "--ratio" => {
                let v = flag_value(args, i, "--ratio")?;
                settings.decimation_ratio = v.parse().with_context(|| format!("bad ratio '{}'", v))?;
                i += 1;
            }
            "--keep" => settings.keep_decimated_collection = true,
            "--out" => {
                settings.save_filepath = PathBuf::from(flag_value(args, i, "--out")?);
                i += 1;
            }
            "--name" => {
                settings.save_filename = flag_value(args, i, "--name")?.to_string();
                i += 1;
            }
            "--frames" => {
                frames = Some(parse_frames(flag_value(args, i, "--frames")?)?);
                i += 1;
            }
            "--fps" => {
                let v = flag_value(args, i, "--fps")?;
                fps = Some(v.parse().with_context(|| format!("bad fps '{}'", v))?);
                i += 1;
            }
            other => bail!("unknown export flag '{}'", other),
        }
        i += 1;
    }

    let mut scene = MemoryScene::load(scene_path)
        .with_context(|| format!("loading scene {}", scene_path))?;
    if let Some(range) = frames {
        scene.set_frame_range(range);
    }
    if let Some(fps) = fps {
        scene.set_fps(fps);
    }

    let report = export(&mut scene, &settings).context("export failed")?;

    println!("Wrote:      {}", report.path.display());
    println!("Format:     {:?}", report.format);
    println!("Size:       {} bytes", report.bytes);
    println!("Frames:     {}..{}", report.range.start, report.range.end);
    println!("Tracks:     {}", report.tracks);
    println!("Keyframes:  {} ({} deduplicated)", report.keyframes, report.dropped_keyframes());
    if let Some(kept) = &report.kept_collection {
        println!("Kept:       {}", kept);
    }
    Ok(())
}

fn flag_value<'a>(args: &[&'a str], i: usize, flag: &str) -> anyhow::Result<&'a str> {
    match args.get(i + 1) {
        Some(v) => Ok(v),
        None => bail!("{} needs a value", flag),
    }
}

fn parse_frames(s: &str) -> anyhow::Result<FrameRange> {
    let (start, end) = s
        .split_once("..")
        .with_context(|| format!("frame range '{}' is not START..END", s))?;
    let start = start.trim().parse().with_context(|| format!("bad start frame '{}'", start))?;
    let end = end.trim().parse().with_context(|| format!("bad end frame '{}'", end))?;
    Ok(FrameRange::new(start, end))
}

fn cmd_info(file: &str) -> anyhow::Result<()> {
    let collection = load_from_file(file).with_context(|| format!("reading {}", file))?;

    println!("File:       {}", file);
    println!("FPS:        {}", collection.fps());
    println!("Tracks:     {}", collection.count());
    println!("Keyframes:  {}", collection.total_keyframes());
    if let Some((first, last)) = collection.frame_span() {
        println!("Frames:     {}..{}", first, last);
    }
    let single = collection.tracks().iter().filter(|t| t.count() == 1).count();
    if single > 0 {
        println!("Static:     {} tracks with a single keyframe", single);
    }
    tracing::debug!("binary size would be {} bytes", codec::encoded_len(&collection));
    Ok(())
}

fn cmd_convert(input: &str, output: &str) -> anyhow::Result<()> {
    let collection = load_from_file(input).with_context(|| format!("reading {}", input))?;
    let out = Path::new(output);
    let format = DataFormat::from_path(out)?;
    let dir = out.parent().unwrap_or_else(|| Path::new("."));
    let name = out
        .file_name()
        .and_then(|n| n.to_str())
        .with_context(|| format!("bad output path {}", output))?;
    let path = save_to_file(&collection, dir, name, format)
        .with_context(|| format!("writing {}", output))?;
    println!("Converted {} -> {} ({} tracks)", input, path.display(), collection.count());
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_frames() {
        assert_eq!(parse_frames("1..48").unwrap(), FrameRange::new(1, 48));
        assert_eq!(parse_frames(" 5 .. 5 ").unwrap(), FrameRange::new(5, 5));
        assert!(parse_frames("1-48").is_err());
        assert!(parse_frames("a..b").is_err());
    }
}
