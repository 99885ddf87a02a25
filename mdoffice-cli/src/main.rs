// Command-line interface for mdoffice
//
// Converts markdown, CommonMark and HTML into office documents, builds slide decks from
// JSON slide lists and writes e-mail drafts. The conversions themselves live in the
// mdoffice-babel crate; this binary reads inputs, applies configuration and decides
// where the bytes go.
//
// Usage:
//  mdoffice docx <input> [--from <format>] [-o <file>]   - Word document
//  mdoffice xlsx <input> [--from <format>] [-o <file>]   - Excel workbook
//  mdoffice pptx <slides.json> [--aspect 4:3|16:9] [-o <file>]
//  mdoffice eml <body.html> --subject <text> [--to <addr>]... [-o <file>]
//  mdoffice inspect <path> [<transform>]                 - Look at the block model
//  mdoffice --list-transforms                            - List inspect transforms
//
// Without -o, artifacts go to the configured output directory and the command prints
// the stored file's URL.
//
// Extra Parameters:
//
// Configuration can be overridden per run with --extra-<parameter-name> <value>.
// Example:
//  mdoffice docx notes.md --extra-template corporate.docx
//  mdoffice inspect notes.md --extra-spans

use mdoffice_cli::cli::build_cli;
use mdoffice_cli::tools::{EmailRequest, Tools};
use mdoffice_cli::transforms;

use clap::ArgMatches;
use mdoffice_babel::publish::ArtifactKind;
use mdoffice_babel::{FormatError, FormatRegistry};
use mdoffice_config::{Loader, MdOfficeConfig};
use std::collections::HashMap;
use std::fs;
use std::path::PathBuf;
use tracing_subscriber::EnvFilter;

/// Parse extra-* arguments from command line args
/// Returns (cleaned_args_without_extras, extra_params_map)
///
/// Supports both:
/// - `--extra-<key> <value>` (explicit value)
/// - `--extra-<key>` (boolean flag, defaults to "true")
/// - `--extras-<key>` (alias for `--extra-<key>`)
fn parse_extra_args(args: &[String]) -> (Vec<String>, HashMap<String, String>) {
    let mut cleaned_args = Vec::new();
    let mut extra_params = HashMap::new();
    let mut i = 0;

    while i < args.len() {
        let arg = &args[i];

        let key_opt = if let Some(key) = arg.strip_prefix("--extra-") {
            Some(key)
        } else {
            arg.strip_prefix("--extras-")
        };

        if let Some(key) = key_opt {
            let has_value = i + 1 < args.len() && !args[i + 1].starts_with('-');

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

fn main() {
    init_tracing();

    let args: Vec<String> = std::env::args().collect();
    let (cleaned_args, mut extra_params) = parse_extra_args(&args);

    let matches = build_cli()
        .try_get_matches_from(&cleaned_args)
        .unwrap_or_else(|e| e.exit());

    if matches.get_flag("list-transforms") {
        handle_list_transforms_command();
        return;
    }

    let mut config = load_cli_config(matches.get_one::<String>("config").map(|s| s.as_str()));
    apply_config_overrides(&mut config, &mut extra_params);
    let tools = Tools::from_config(config);

    match matches.subcommand() {
        Some(("docx", sub_matches)) => {
            handle_document_command(&tools, sub_matches, ArtifactKind::Docx);
        }
        Some(("xlsx", sub_matches)) => {
            handle_document_command(&tools, sub_matches, ArtifactKind::Xlsx);
        }
        Some(("pptx", sub_matches)) => handle_pptx_command(&tools, sub_matches),
        Some(("eml", sub_matches)) => handle_eml_command(&tools, sub_matches),
        Some(("inspect", sub_matches)) => {
            let path = required(sub_matches, "path");
            let transform = sub_matches
                .get_one::<String>("transform")
                .cloned()
                .unwrap_or_else(|| tools.config().inspect.transform.clone());
            let from = source_format(sub_matches, path);
            handle_inspect_command(&tools, path, &from, &transform, &extra_params);
        }
        _ => {
            eprintln!("Unknown subcommand. Use --help for usage information.");
            std::process::exit(1);
        }
    }
}

fn init_tracing() {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn"));
    let _ = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .try_init();
}

fn required<'a>(matches: &'a ArgMatches, name: &str) -> &'a str {
    matches
        .get_one::<String>(name)
        .map(|s| s.as_str())
        .unwrap_or_else(|| {
            eprintln!("Error: missing required argument '{name}'");
            std::process::exit(2);
        })
}

fn read_source(path: &str) -> String {
    fs::read_to_string(path).unwrap_or_else(|e| {
        eprintln!("Error reading file '{path}': {e}");
        std::process::exit(1);
    })
}

/// `--from` if given, otherwise the format registered for the file's extension.
fn source_format(matches: &ArgMatches, input: &str) -> String {
    if let Some(from) = matches.get_one::<String>("from") {
        return from.clone();
    }
    match FormatRegistry::default().detect_reader(input) {
        Some(detected) => detected.to_string(),
        None => {
            eprintln!("Error: Could not detect format from filename '{input}'");
            eprintln!("Please specify --from explicitly");
            std::process::exit(1);
        }
    }
}

/// Handle docx and xlsx: both read a source document into the block model first.
fn handle_document_command(tools: &Tools, matches: &ArgMatches, kind: ArtifactKind) {
    let input = required(matches, "input");
    let from = source_format(matches, input);
    let source = read_source(input);

    let doc = FormatRegistry::default()
        .parse(&source, &from)
        .unwrap_or_else(|e| {
            eprintln!("Parse error: {e}");
            std::process::exit(1);
        });

    let rendered = match kind {
        ArtifactKind::Xlsx => tools.render_excel(&doc),
        _ => tools.render_word(&doc),
    };
    deliver(tools, matches, kind, rendered);
}

fn handle_pptx_command(tools: &Tools, matches: &ArgMatches) {
    let source = read_source(required(matches, "input"));
    let aspect = matches.get_one::<String>("aspect").map(|s| s.as_str());
    let rendered = tools.render_powerpoint_presentation(&source, aspect);
    deliver(tools, matches, ArtifactKind::Pptx, rendered);
}

fn handle_eml_command(tools: &Tools, matches: &ArgMatches) {
    let content = read_source(required(matches, "input"));
    let many = |name: &str| -> Vec<String> {
        matches
            .get_many::<String>(name)
            .map(|values| values.cloned().collect())
            .unwrap_or_default()
    };
    let request = EmailRequest {
        subject: required(matches, "subject").to_string(),
        content,
        to: many("to"),
        cc: many("cc"),
        bcc: many("bcc"),
        priority: matches.get_one::<String>("priority").cloned(),
        language: matches.get_one::<String>("language").cloned(),
    };
    let rendered = tools.render_email_draft(&request);
    deliver(tools, matches, ArtifactKind::Eml, rendered);
}

/// Write to `-o` or the store, print where the artifact went.
fn deliver(
    tools: &Tools,
    matches: &ArgMatches,
    kind: ArtifactKind,
    rendered: Result<Vec<u8>, FormatError>,
) {
    let bytes = rendered.unwrap_or_else(|e| {
        eprintln!("Error creating {}: {e}", kind.extension());
        std::process::exit(1);
    });

    match matches.get_one::<String>("output") {
        Some(path) => {
            fs::write(path, &bytes).unwrap_or_else(|e| {
                eprintln!("Error writing file '{path}': {e}");
                std::process::exit(1);
            });
            println!("{path}");
        }
        None => match tools.store(&bytes, kind) {
            Ok(reference) => println!("{reference}"),
            Err(e) => {
                eprintln!("Error storing {}: {e}", kind.extension());
                std::process::exit(1);
            }
        },
    }
}

fn handle_inspect_command(
    tools: &Tools,
    path: &str,
    from: &str,
    transform: &str,
    extra_params: &HashMap<String, String>,
) {
    let source = read_source(path);
    let params = build_inspect_params(tools.config(), extra_params);

    let output = transforms::execute_transform(&source, from, transform, &params)
        .unwrap_or_else(|e| {
            eprintln!("Execution error: {e}");
            std::process::exit(1);
        });

    print!("{output}");
}

fn handle_list_transforms_command() {
    println!("Available transforms:\n");
    for transform in transforms::AVAILABLE_TRANSFORMS {
        println!("  {transform}");
    }
}

fn load_cli_config(explicit_path: Option<&str>) -> MdOfficeConfig {
    let loader = Loader::new().with_optional_file("mdoffice.toml");
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

fn apply_config_overrides(config: &mut MdOfficeConfig, extra_params: &mut HashMap<String, String>) {
    if let Some(path) = take_override(extra_params, &["template", "docx-template"]) {
        config.convert.docx.template = Some(PathBuf::from(path));
    }
    if let Some(title) = take_override(extra_params, &["sheet-title", "sheet"]) {
        config.convert.xlsx.sheet_title = title;
    }
    if let Some(aspect) = take_override(extra_params, &["aspect"]) {
        config.convert.pptx.aspect = aspect;
    }
    if let Some(language) = take_override(extra_params, &["language", "lang"]) {
        config.convert.eml.language = language;
    }
    if let Some(raw) = take_override(extra_params, &["priority"]) {
        config.convert.eml.priority = raw.parse().unwrap_or_else(|e| {
            eprintln!("Invalid value for --extra-priority: {e}");
            std::process::exit(1);
        });
    }
    if let Some(dir) = take_override(extra_params, &["output-dir", "out-dir"]) {
        config.storage.output_dir = PathBuf::from(dir);
    }
    if let Some(raw) = extra_params.remove("spans") {
        config.inspect.spans = parse_bool_arg("spans", &raw);
    }
}

fn build_inspect_params(
    config: &MdOfficeConfig,
    overrides: &HashMap<String, String>,
) -> HashMap<String, String> {
    let mut params = HashMap::new();
    params.insert("spans".to_string(), config.inspect.spans.to_string());
    for (key, value) in overrides {
        params.insert(key.clone(), value.clone());
    }
    params
}

fn take_override(map: &mut HashMap<String, String>, keys: &[&str]) -> Option<String> {
    for key in keys {
        if let Some(value) = map.remove(*key) {
            return Some(value);
        }
    }
    None
}

fn parse_bool_arg(flag: &str, raw: &str) -> bool {
    match raw.to_lowercase().as_str() {
        "true" | "1" | "yes" | "y" => true,
        "false" | "0" | "no" | "n" => false,
        other => {
            eprintln!("Invalid boolean value '{other}' for --extra-{flag}");
            std::process::exit(1);
        }
    }
}
