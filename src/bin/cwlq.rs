use cwlq::{inspect, load_document, save, Environment};
use serde_json::Value as JsonValue;
use std::env;
use std::path::PathBuf;
use std::process;

const USAGE: &str = "usage: cwlq [--outdir DIR] [--tmpdir DIR] [--json] <doc> <pos>

Inspect a CWL document at a query position.

options:
  --outdir DIR   output directory used by ls queries (default: current directory)
  --tmpdir DIR   temporary directory exposed to runtime placeholders
  --json         print the result as pretty JSON instead of plain text
  --help         show this message";

fn main() {
    if let Err(err) = run() {
        eprintln!("cwlq error: {err}");
        process::exit(1);
    }
}

struct CliArgs {
    outdir: Option<PathBuf>,
    tmpdir: Option<PathBuf>,
    json: bool,
    doc: PathBuf,
    pos: String,
}

fn run() -> Result<(), Box<dyn std::error::Error>> {
    let args = parse_args(env::args().skip(1))?;

    let document = load_document(&args.doc)?;

    let outdir = match args.outdir {
        Some(dir) => absolutize(dir)?,
        None => env::current_dir()?,
    };
    let mut environment = Environment::new().with_outdir(outdir);
    if let Some(tmpdir) = args.tmpdir {
        environment = environment.with_tmpdir(absolutize(tmpdir)?);
    }

    let result = inspect(&document, &args.pos, &environment)?;
    let plain = save(&result);
    if args.json {
        println!("{}", serde_json::to_string_pretty(&plain)?);
    } else {
        println!("{}", render_plain(&plain));
    }
    Ok(())
}

fn parse_args(mut args: impl Iterator<Item = String>) -> Result<CliArgs, String> {
    let mut outdir = None;
    let mut tmpdir = None;
    let mut json = false;
    let mut positional = Vec::new();

    while let Some(arg) = args.next() {
        match arg.as_str() {
            "--outdir" => {
                let value = args.next().ok_or("--outdir needs a directory argument")?;
                outdir = Some(PathBuf::from(value));
            }
            "--tmpdir" => {
                let value = args.next().ok_or("--tmpdir needs a directory argument")?;
                tmpdir = Some(PathBuf::from(value));
            }
            "--json" => json = true,
            "--help" => {
                println!("{USAGE}");
                process::exit(0);
            }
            flag if flag.starts_with("--") => {
                return Err(format!("unknown option {flag}\n{USAGE}"));
            }
            _ => positional.push(arg),
        }
    }

    let mut positional = positional.into_iter();
    let (Some(doc), Some(pos), None) = (positional.next(), positional.next(), positional.next())
    else {
        return Err(format!("expected <doc> and <pos> operands\n{USAGE}"));
    };

    Ok(CliArgs {
        outdir,
        tmpdir,
        json,
        doc: PathBuf::from(doc),
        pos,
    })
}

fn absolutize(path: PathBuf) -> std::io::Result<PathBuf> {
    if path.is_absolute() {
        Ok(path)
    } else {
        Ok(env::current_dir()?.join(path))
    }
}

fn render_plain(value: &JsonValue) -> String {
    match value {
        JsonValue::Null => String::new(),
        JsonValue::String(text) => text.clone(),
        JsonValue::Array(items) => items
            .iter()
            .map(render_plain)
            .collect::<Vec<_>>()
            .join("\n"),
        other => other.to_string(),
    }
}
