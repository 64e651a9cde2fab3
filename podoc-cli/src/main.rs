// Command-line interface for podoc
//
// This binary converts documents between the formats known to podoc-babel. Every conversion goes
// through the AST: the source is read into it and the target is written from it.
//
// Converting:
//
// The conversion needs a to and from pair. The from can be auto-detected from the file extension, while being overwrittable by an explicit --from flag.
// Usage:
//  podoc <input> --to <format> [--from <format>] [--output <file>]  - Convert between formats (default)
//  podoc convert <input> --to <format> [--from <format>] [--output <file>]  - Same as above (explicit)
//  podoc inspect <input> [--from <format>]   - Print the AST as a tree
//  podoc --list-formats                      - List available formats
//
// Resources:
//
// Notebook outputs such as images have no place in text formats. Converting away from a notebook
// writes them as files into the configured resources directory, next to the output file (next to
// the input when printing to stdout), and the image links in the text point into that directory.
// Converting to a notebook reads them back from the resources directory next to the input file.
//
// Extra Parameters:
//
// Format-specific parameters can be passed using --extra-<parameter-name> <value>.
// The CLI layer strips the "extra-" prefix and passes the parameters to the tree dump.
// Example:
//  podoc inspect notebook.ipynb --extra-ast-full

use clap::{Arg, ArgAction, Command, ValueHint};
use podoc_babel::formats::notebook::resources::is_output_filename;
use podoc_babel::formats::notebook::{prefix_output_urls, strip_output_urls, NotebookFormat};
use podoc_babel::formats::treeviz::to_treeviz_str_with_params;
use podoc_babel::{FormatRegistry, Resources};
use podoc_config::{Loader, PodocConfig};
use std::collections::HashMap;
use std::fs;
use std::path::{Path, PathBuf};
use tracing::debug;

/// Parse extra-* arguments from command line args
/// Returns (cleaned_args_without_extras, extra_params_map)
///
/// Supports both:
/// - `--extra-<key> <value>` (explicit value)
/// - `--extra-<key>` (boolean flag, defaults to "true")
fn parse_extra_args(args: &[String]) -> (Vec<String>, HashMap<String, String>) {
    let mut cleaned_args = Vec::new();
    let mut extra_params = HashMap::new();
    let mut i = 0;

    while i < args.len() {
        let arg = &args[i];

        if let Some(key) = arg.strip_prefix("--extra-") {
            let has_value = args
                .get(i + 1)
                .map(|next| !next.starts_with('-'))
                .unwrap_or(false);

            if has_value {
                extra_params.insert(key.to_string(), args[i + 1].clone());
                i += 2;
            } else {
                extra_params.insert(key.to_string(), "true".to_string());
                i += 1;
            }
            continue;
        }

        cleaned_args.push(arg.clone());
        i += 1;
    }

    (cleaned_args, extra_params)
}

fn build_cli() -> Command {
    Command::new("podoc")
        .version(env!("CARGO_PKG_VERSION"))
        .about("Convert documents between Markdown, Jupyter notebooks and a pandoc-compatible JSON AST")
        .long_about(
            "podoc converts documents between formats through a single AST.\n\n\
            Commands:\n  \
            - convert: Transform between document formats (default)\n  \
            - inspect: Print the AST of a document as a tree\n\n\
            Examples:\n  \
            podoc notebook.ipynb --to markdown             # Convert to markdown (stdout)\n  \
            podoc notebook.ipynb --to markdown -o nb.md    # Also writes image outputs next to nb.md\n  \
            podoc nb.md --to notebook -o nb.ipynb          # Back to a notebook\n  \
            podoc inspect notebook.ipynb --extra-ast-full  # Tree including cell indices",
        )
        .arg_required_else_help(true)
        .subcommand_required(false)
        .arg(
            Arg::new("list-formats")
                .long("list-formats")
                .help("List available formats")
                .action(ArgAction::SetTrue)
                .global(true),
        )
        .arg(
            Arg::new("config")
                .long("config")
                .value_name("PATH")
                .help("Path to a podoc.toml configuration file")
                .value_hint(ValueHint::FilePath)
                .global(true),
        )
        .arg(
            Arg::new("verbose")
                .long("verbose")
                .short('v')
                .help("Log debug information to stderr")
                .action(ArgAction::SetTrue)
                .global(true),
        )
        .subcommand(
            Command::new("inspect")
                .about("Print the AST of a document as a tree")
                .long_about(
                    "Parse a document and print its AST as a tree, one node per line.\n\n\
                    Extra Parameters:\n  \
                    --extra-ast-full      Also show internal metadata, such as the\n                          \
                    notebook cell each block came from\n\n\
                    Examples:\n  \
                    podoc inspect notebook.ipynb\n  \
                    podoc inspect notes.txt --from markdown",
                )
                .arg(
                    Arg::new("input")
                        .help("Input file path")
                        .required(true)
                        .index(1)
                        .value_hint(ValueHint::FilePath),
                )
                .arg(
                    Arg::new("from")
                        .long("from")
                        .help("Source format (auto-detected from file extension if not specified)")
                        .value_hint(ValueHint::Other),
                ),
        )
        .subcommand(
            Command::new("convert")
                .about("Convert between document formats (default command)")
                .long_about(
                    "Convert documents between different formats.\n\n\
                    Supported formats:\n  \
                    - markdown: Markdown (.md)\n  \
                    - notebook: Jupyter notebook (.ipynb)\n  \
                    - json:     pandoc-compatible JSON AST (.json)\n  \
                    - treeviz:  Tree dump of the AST (output only)\n\n\
                    The source format is auto-detected from the file extension.\n\
                    Output goes to stdout by default, or use -o to specify a file.\n\n\
                    Examples:\n  \
                    podoc convert nb.ipynb --to markdown          # Convert to markdown (stdout)\n  \
                    podoc convert nb.md --to notebook -o nb.ipynb # Markdown to notebook file\n  \
                    podoc nb.ipynb --to json                      # 'convert' is optional",
                )
                .arg(
                    Arg::new("input")
                        .help("Input file path")
                        .required(true)
                        .index(1)
                        .value_hint(ValueHint::FilePath),
                )
                .arg(
                    Arg::new("from")
                        .long("from")
                        .help("Source format (auto-detected from file extension if not specified)")
                        .long_help(
                            "Source format to convert from.\n\n\
                            If not specified, the format is auto-detected from the file extension.\n\
                            Use this option to override auto-detection.",
                        )
                        .value_hint(ValueHint::Other),
                )
                .arg(
                    Arg::new("to")
                        .long("to")
                        .help("Target format (required)")
                        .long_help(
                            "Target format to convert to.\n\n\
                            Available formats: json, markdown, notebook, treeviz\n\
                            Use the format name, not the file extension.",
                        )
                        .required(true)
                        .value_hint(ValueHint::Other),
                )
                .arg(
                    Arg::new("output")
                        .long("output")
                        .short('o')
                        .help("Output file path (defaults to stdout)")
                        .value_hint(ValueHint::FilePath),
                ),
        )
}

fn main() {
    let args: Vec<String> = std::env::args().collect();
    let (cleaned_args, extra_params) = parse_extra_args(&args);

    // If no subcommand is provided, inject "convert"
    let cli = build_cli();
    let matches = match cli.clone().try_get_matches_from(&cleaned_args) {
        Ok(m) => m,
        Err(e) => {
            if cleaned_args.len() > 1
                && !cleaned_args[1].starts_with('-')
                && cleaned_args[1] != "inspect"
                && cleaned_args[1] != "convert"
                && cleaned_args[1] != "help"
            {
                let mut new_args = vec![cleaned_args[0].clone(), "convert".to_string()];
                new_args.extend_from_slice(&cleaned_args[1..]);

                match cli.try_get_matches_from(&new_args) {
                    Ok(m) => m,
                    Err(e2) => e2.exit(),
                }
            } else {
                e.exit();
            }
        }
    };

    init_tracing(matches.get_flag("verbose"));

    let config = load_cli_config(matches.get_one::<String>("config").map(|s| s.as_str()));
    let registry = build_registry(&config);

    if matches.get_flag("list-formats") {
        handle_list_formats_command(&registry);
        return;
    }

    match matches.subcommand() {
        Some(("inspect", sub_matches)) => {
            let input = sub_matches
                .get_one::<String>("input")
                .expect("input is required");
            let from = resolve_from(&registry, input, sub_matches.get_one::<String>("from"));
            handle_inspect_command(&registry, input, &from, &extra_params);
        }
        Some(("convert", sub_matches)) => {
            let input = sub_matches
                .get_one::<String>("input")
                .expect("input is required");
            let to = sub_matches.get_one::<String>("to").expect("to is required");
            let from = resolve_from(&registry, input, sub_matches.get_one::<String>("from"));
            let output = sub_matches.get_one::<String>("output").map(|s| s.as_str());
            handle_convert_command(&registry, &config, input, &from, to, output);
        }
        _ => {
            eprintln!("Unknown subcommand. Use --help for usage information.");
            std::process::exit(1);
        }
    }
}

fn init_tracing(verbose: bool) {
    let level = if verbose {
        tracing::Level::DEBUG
    } else {
        tracing::Level::WARN
    };
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::from_default_env().add_directive(level.into()),
        )
        .with_writer(std::io::stderr)
        .init();
}

/// Default formats, with the notebook format following the configured kernel
fn build_registry(config: &PodocConfig) -> FormatRegistry {
    let mut registry = FormatRegistry::default();
    registry.register(NotebookFormat::new((&config.notebook).into()));
    registry
}

/// Explicit --from wins, otherwise detect from the file extension
fn resolve_from(registry: &FormatRegistry, input: &str, from_arg: Option<&String>) -> String {
    if let Some(f) = from_arg {
        return f.to_string();
    }
    match registry.detect_format_from_filename(input) {
        Some(detected) => detected,
        None => {
            eprintln!("Error: Could not detect format from filename '{input}'");
            eprintln!("Please specify --from explicitly");
            std::process::exit(1);
        }
    }
}

fn read_source(path: &str) -> String {
    fs::read_to_string(path).unwrap_or_else(|e| {
        eprintln!("Error reading file '{path}': {e}");
        std::process::exit(1);
    })
}

/// Handle the inspect command
fn handle_inspect_command(
    registry: &FormatRegistry,
    input: &str,
    from: &str,
    extra_params: &HashMap<String, String>,
) {
    let source = read_source(input);
    let doc = registry.parse(&source, from).unwrap_or_else(|e| {
        eprintln!("Parse error: {e}");
        std::process::exit(1);
    });
    print!("{}", to_treeviz_str_with_params(&doc, extra_params));
}

/// Handle the convert command
fn handle_convert_command(
    registry: &FormatRegistry,
    config: &PodocConfig,
    input: &str,
    from: &str,
    to: &str,
    output: Option<&str>,
) {
    // Validate formats exist
    for name in [from, to] {
        if let Err(e) = registry.get(name) {
            eprintln!("Error: {e}");
            std::process::exit(1);
        }
    }

    let source = read_source(input);
    let input_dir = parent_dir(Path::new(input));
    let resources_dir = &config.convert.resources_dir;
    let link_dir = resources_dir.to_string_lossy().replace('\\', "/");

    let (mut doc, mut resources) = registry
        .parse_with_resources(&source, from)
        .unwrap_or_else(|e| {
            eprintln!("Conversion error: {e}");
            std::process::exit(1);
        });

    // Text targets link images from the resources directory, notebooks embed them
    if to == "notebook" {
        for (name, bytes) in load_resources(&input_dir.join(resources_dir)) {
            resources.entry(name).or_insert(bytes);
        }
        strip_output_urls(&mut doc, &link_dir);
    } else {
        prefix_output_urls(&mut doc, &link_dir, &resources);
    }
    debug!(
        from,
        to,
        blocks = doc.blocks.len(),
        resources = resources.len(),
        "converting"
    );

    let text = registry
        .serialize_with_resources(&doc, to, &resources)
        .unwrap_or_else(|e| {
            eprintln!("Conversion error: {e}");
            std::process::exit(1);
        });

    match output {
        Some(path) => {
            fs::write(path, text).unwrap_or_else(|e| {
                eprintln!("Error writing file '{path}': {e}");
                std::process::exit(1);
            });
        }
        None => print!("{text}"),
    }

    // Notebooks embed their resources, every other target needs them on disk
    if to != "notebook" && !resources.is_empty() {
        let base = output
            .map(|path| parent_dir(Path::new(path)))
            .unwrap_or(input_dir);
        write_resources(&base.join(resources_dir), &resources);
    }
}

fn parent_dir(path: &Path) -> PathBuf {
    path.parent()
        .filter(|p| !p.as_os_str().is_empty())
        .map(Path::to_path_buf)
        .unwrap_or_else(|| PathBuf::from("."))
}

/// Collect the notebook output files found in `dir`. A missing directory holds none.
fn load_resources(dir: &Path) -> Resources {
    let mut resources = Resources::new();
    let Ok(entries) = fs::read_dir(dir) else {
        return resources;
    };

    for entry in entries.flatten() {
        let name = entry.file_name().to_string_lossy().into_owned();
        if !is_output_filename(&name) {
            continue;
        }
        let bytes = fs::read(entry.path()).unwrap_or_else(|e| {
            eprintln!("Error reading resource '{}': {e}", entry.path().display());
            std::process::exit(1);
        });
        resources.insert(name, bytes);
    }
    debug!(dir = %dir.display(), count = resources.len(), "loaded resources");
    resources
}

fn write_resources(dir: &Path, resources: &Resources) {
    let write = || -> std::io::Result<()> {
        fs::create_dir_all(dir)?;
        for (name, bytes) in resources {
            fs::write(dir.join(name), bytes)?;
        }
        Ok(())
    };
    write().unwrap_or_else(|e| {
        eprintln!("Error writing resources to '{}': {e}", dir.display());
        std::process::exit(1);
    });
    debug!(dir = %dir.display(), count = resources.len(), "wrote resources");
}

/// Handle the list-formats command
fn handle_list_formats_command(registry: &FormatRegistry) {
    println!("Available formats:\n");
    for name in registry.list_formats() {
        let Ok(format) = registry.get(&name) else {
            continue;
        };
        let mut modes = Vec::new();
        if format.supports_parsing() {
            modes.push("read");
        }
        if format.supports_serialization() {
            modes.push("write");
        }
        let extensions = format
            .file_extensions()
            .iter()
            .map(|ext| format!(".{ext}"))
            .collect::<Vec<_>>()
            .join(", ");
        println!(
            "  {name:<10} {} [{}] {extensions}",
            format.description(),
            modes.join("/")
        );
    }
}

fn load_cli_config(explicit_path: Option<&str>) -> PodocConfig {
    let loader = Loader::new().with_optional_file("podoc.toml");
    let loader = if let Some(path) = explicit_path {
        loader.with_file(path)
    } else {
        loader
    };

    loader.build().unwrap_or_else(|err| {
        eprintln!("Failed to load configuration: {err}");
        std::process::exit(1);
    })
}
