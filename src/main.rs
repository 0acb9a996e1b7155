use std::io::{self, Read, Write};
use std::path::{Path, PathBuf};
use std::process::ExitCode;

use clap::Parser;
use ignore::WalkBuilder;
use miette::{miette, IntoDiagnostic, Result};

use restyle::config::{load_settings, Settings};
use restyle::editor::{InMemoryDocument, Selection};
use restyle::engine::{FormatEngine, ProcessEngine};
use restyle::options::ResolveContext;
use restyle::reformat::{run_reformat, ReformatRequest};
use restyle::report::{ErrorReporter, StderrSurface};
use restyle::syntax::{is_supported, syntax_for_path};

#[derive(Parser)]
#[command(name = "restyle", version, about = "Reformat source files through an external astyle-like beautifier")]
struct Cli {
    /// Files or directories to reformat
    #[arg(default_value = ".")]
    paths: Vec<PathBuf>,

    /// Reformat only these selections (byte ranges `a:b`, repeatable);
    /// requires exactly one file
    #[arg(short = 'r', long = "range", value_name = "A:B")]
    ranges: Vec<String>,

    /// Check if files are formatted without modifying them
    #[arg(short, long)]
    check: bool,

    /// Show diff without modifying files
    #[arg(short, long)]
    diff: bool,

    /// Read from stdin, write to stdout
    #[arg(long)]
    stdin: bool,

    /// Write formatted output to stdout instead of modifying files
    #[arg(long)]
    stdout: bool,

    /// Syntax name (c, c++, cs, java, ...); detected from the extension
    /// when omitted
    #[arg(short, long)]
    syntax: Option<String>,

    /// Run as a pre-save hook: do nothing unless autoformat_on_save is set
    /// and the syntax is supported
    #[arg(long)]
    on_save: bool,

    /// Path to settings file
    #[arg(long)]
    config: Option<PathBuf>,
}

fn main() -> ExitCode {
    match run() {
        Ok(needs_formatting) => {
            if needs_formatting {
                ExitCode::from(1)
            } else {
                ExitCode::SUCCESS
            }
        }
        Err(e) => {
            eprintln!("{:?}", e);
            ExitCode::from(2)
        }
    }
}

fn run() -> Result<bool> {
    let cli = Cli::parse();

    // Global defaults layered under the discovered/explicit settings file.
    let loaded = load_settings(cli.config.as_deref()).map_err(|e| miette!(e))?;
    let settings = Settings::default().layered(&loaded);
    let engine = ProcessEngine::new(&settings.engine());

    if cli.stdin {
        return format_stdin(&cli, &settings, &engine);
    }

    if !cli.ranges.is_empty() {
        let [path] = cli.paths.as_slice() else {
            return Err(miette!("--range requires exactly one file"));
        };
        return process_file(path, &cli, &settings, &engine);
    }

    let mut any_changes = false;
    for path in &cli.paths {
        if path.is_file() {
            if process_file(path, &cli, &settings, &engine)? {
                any_changes = true;
            }
        } else if path.is_dir() {
            if process_directory(path, &cli, &settings, &engine)? {
                any_changes = true;
            }
        }
    }

    Ok(any_changes)
}

fn detect_syntax(path: &Path, cli: &Cli) -> Option<String> {
    cli.syntax
        .clone()
        .or_else(|| syntax_for_path(path).map(str::to_string))
}

fn parse_ranges(ranges: &[String]) -> Result<Vec<Selection>> {
    ranges
        .iter()
        .map(|spec| {
            let (a, b) = spec
                .split_once(':')
                .ok_or_else(|| miette!("invalid range '{}', expected A:B", spec))?;
            let a: usize = a.parse().into_diagnostic()?;
            let b: usize = b.parse().into_diagnostic()?;
            Ok(Selection::new(a, b))
        })
        .collect()
}

fn format_stdin(cli: &Cli, settings: &Settings, engine: &dyn FormatEngine) -> Result<bool> {
    let mut source = String::new();
    io::stdin().read_to_string(&mut source).into_diagnostic()?;

    let syntax = cli
        .syntax
        .clone()
        .ok_or_else(|| miette!("--stdin requires --syntax"))?;

    let mut doc = InMemoryDocument::with_selections(source, parse_ranges(&cli.ranges)?);
    if !reformat_document(&mut doc, &syntax, !cli.ranges.is_empty(), settings, engine, None) {
        return Err(miette!("formatting failed"));
    }

    io::stdout()
        .write_all(doc.text().as_bytes())
        .into_diagnostic()?;
    Ok(false)
}

fn process_file(
    path: &Path,
    cli: &Cli,
    settings: &Settings,
    engine: &dyn FormatEngine,
) -> Result<bool> {
    let Some(syntax) = detect_syntax(path, cli) else {
        return Err(miette!("cannot detect syntax for {:?}; pass --syntax", path));
    };

    if cli.on_save {
        // Save hook: silently skip unless both gates are open.
        if !settings.autoformat_on_save() || !is_supported(&syntax, &settings.syntax_mode_mapping)
        {
            return Ok(false);
        }
    }

    let source = std::fs::read_to_string(path).into_diagnostic()?;
    let selections = parse_ranges(&cli.ranges)?;
    let selection_only = !selections.is_empty();
    let mut doc = InMemoryDocument::with_selections(source.clone(), selections);

    if !reformat_document(&mut doc, &syntax, selection_only, settings, engine, Some(path)) {
        return Err(miette!("formatting {:?} failed", path));
    }

    let changed = doc.text() != source;

    if cli.check {
        if changed {
            println!("Would reformat: {}", path.display());
        }
        return Ok(changed);
    }

    if cli.diff {
        if changed {
            print_diff(&path.display().to_string(), &source, doc.text());
        }
        return Ok(changed);
    }

    if cli.stdout {
        io::stdout()
            .write_all(doc.text().as_bytes())
            .into_diagnostic()?;
        return Ok(changed);
    }

    if changed {
        std::fs::write(path, doc.text()).into_diagnostic()?;
        println!("Formatted: {}", path.display());
    }

    Ok(changed)
}

fn process_directory(
    path: &Path,
    cli: &Cli,
    settings: &Settings,
    engine: &dyn FormatEngine,
) -> Result<bool> {
    let mut any_changes = false;

    let walker = WalkBuilder::new(path).standard_filters(true).build();
    for entry in walker {
        let entry = entry.into_diagnostic()?;
        let file_path = entry.path();
        if !file_path.is_file() {
            continue;
        }
        // Only files with a supported syntax take part in directory walks.
        let Some(syntax) = syntax_for_path(file_path) else {
            continue;
        };
        if !is_supported(syntax, &settings.syntax_mode_mapping) {
            continue;
        }
        if process_file(file_path, cli, settings, engine)? {
            any_changes = true;
        }
    }

    Ok(any_changes)
}

fn reformat_document(
    doc: &mut InMemoryDocument,
    syntax: &str,
    selection_only: bool,
    settings: &Settings,
    engine: &dyn FormatEngine,
    path: Option<&Path>,
) -> bool {
    let context = match path {
        Some(p) => ResolveContext::for_file(p),
        None => ResolveContext::default(),
    };
    let mut surface = StderrSurface::default();
    let mut reporter = ErrorReporter::new("style_error_message", &mut surface);
    let request = ReformatRequest {
        syntax,
        selection_only,
        settings,
        context,
    };
    run_reformat(doc, engine, &mut reporter, &request)
}

fn print_diff(filename: &str, original: &str, formatted: &str) {
    use similar::{ChangeTag, TextDiff};

    println!("--- {}", filename);
    println!("+++ {}", filename);

    let diff = TextDiff::from_lines(original, formatted);

    for (idx, group) in diff.grouped_ops(3).iter().enumerate() {
        if idx > 0 {
            println!("...");
        }

        for op in group {
            for change in diff.iter_changes(op) {
                let sign = match change.tag() {
                    ChangeTag::Delete => "-",
                    ChangeTag::Insert => "+",
                    ChangeTag::Equal => " ",
                };
                print!("{}{}", sign, change);
            }
        }
    }
}
