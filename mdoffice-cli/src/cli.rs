// Command definition for the mdoffice binary.
//
// This file only depends on clap: build.rs pulls it in with `include!` to generate shell
// completions, so the completions always match the parser main.rs runs.

use clap::{Arg, ArgAction, Command, ValueHint};

/// Transforms accepted by `mdoffice inspect`.
pub const AVAILABLE_TRANSFORMS: &[&str] =
    &["blocks-treeviz", "blocks-json", "xlsx-cells", "slides-json"];

fn input_arg(help: &'static str) -> Arg {
    Arg::new("input")
        .help(help)
        .required(true)
        .index(1)
        .value_hint(ValueHint::FilePath)
}

fn from_arg() -> Arg {
    Arg::new("from")
        .long("from")
        .help("Source format: markdown, commonmark or html (auto-detected from the extension)")
        .value_hint(ValueHint::Other)
}

fn output_arg() -> Arg {
    Arg::new("output")
        .long("output")
        .short('o')
        .help("Write to this file instead of the configured output directory")
        .value_hint(ValueHint::FilePath)
}

/// The full `mdoffice` command, also used by build.rs to generate shell completions.
pub fn build_cli() -> Command {
    Command::new("mdoffice")
        .version(env!("CARGO_PKG_VERSION"))
        .about("Turn markdown and HTML into Word, Excel, PowerPoint and e-mail drafts")
        .long_about(
            "mdoffice converts lightly formatted text into office documents.\n\n\
            Commands:\n  \
            - docx:    markdown/HTML to a Word document\n  \
            - xlsx:    markdown headings and tables to an Excel sheet, with formulas\n  \
            - pptx:    a JSON slide list to a PowerPoint deck\n  \
            - eml:     an HTML body to an unsent e-mail draft\n  \
            - inspect: view the block model a conversion works from\n\n\
            Extra Parameters:\n  \
            Use --extra-<name> [value] to override configuration for one run\n  \
            (template, sheet-title, aspect, language, priority, output-dir, spans).\n\n\
            Examples:\n  \
            mdoffice docx contract.md -o contract.docx\n  \
            mdoffice xlsx budget.md                 # stored, prints file URL\n  \
            mdoffice pptx slides.json --aspect 4:3 -o deck.pptx\n  \
            mdoffice eml body.html --subject Hello --to a@example.com",
        )
        .arg_required_else_help(true)
        .subcommand_required(false)
        .arg(
            Arg::new("list-transforms")
                .long("list-transforms")
                .help("List available inspect transforms")
                .action(ArgAction::SetTrue)
                .global(true),
        )
        .arg(
            Arg::new("config")
                .long("config")
                .value_name("PATH")
                .help("Path to an mdoffice.toml configuration file")
                .value_hint(ValueHint::FilePath)
                .global(true),
        )
        .subcommand(
            Command::new("docx")
                .about("Convert markdown or HTML to a Word document")
                .arg(input_arg("Markdown or HTML file"))
                .arg(from_arg())
                .arg(output_arg()),
        )
        .subcommand(
            Command::new("xlsx")
                .about("Convert markdown tables to an Excel workbook")
                .long_about(
                    "Writes headings and tables to a single sheet.\n\n\
                    Table cells may hold formulas with position-independent references:\n  \
                    B[0]          column B, first data row of this table\n  \
                    T1.B[2]       column B, third data row of table 1\n  \
                    T1.SUM(B[0]:B[3])\n\n\
                    References are rewritten to absolute addresses such as B12.",
                )
                .arg(input_arg("Markdown or HTML file"))
                .arg(from_arg())
                .arg(output_arg()),
        )
        .subcommand(
            Command::new("pptx")
                .about("Build a PowerPoint deck from a JSON slide list")
                .long_about(
                    "The input is a JSON array of slides:\n  \
                    {\"slide_type\": \"title\", \"slide_title\": \"..\", \"author\": \"..\"}\n  \
                    {\"slide_type\": \"section\", \"slide_title\": \"..\"}\n  \
                    {\"slide_type\": \"content\", \"slide_title\": \"..\",\n   \
                    \"slide_text\": [{\"text\": \"..\", \"indentation_level\": 1}]}\n\n\
                    Slides with another slide_type are skipped with a warning.",
                )
                .arg(input_arg("JSON slide list"))
                .arg(
                    Arg::new("aspect")
                        .long("aspect")
                        .help("Slide aspect ratio: 4:3 or 16:9 (defaults to configuration)")
                        .value_hint(ValueHint::Other),
                )
                .arg(output_arg()),
        )
        .subcommand(
            Command::new("eml")
                .about("Write an unsent e-mail draft around an HTML body")
                .arg(input_arg("File with the HTML body content"))
                .arg(
                    Arg::new("subject")
                        .long("subject")
                        .short('s')
                        .required(true)
                        .help("Subject line"),
                )
                .arg(
                    Arg::new("to")
                        .long("to")
                        .action(ArgAction::Append)
                        .help("Recipient (repeatable)"),
                )
                .arg(
                    Arg::new("cc")
                        .long("cc")
                        .action(ArgAction::Append)
                        .help("Carbon copy recipient (repeatable)"),
                )
                .arg(
                    Arg::new("bcc")
                        .long("bcc")
                        .action(ArgAction::Append)
                        .help("Blind carbon copy recipient (repeatable)"),
                )
                .arg(
                    Arg::new("priority")
                        .long("priority")
                        .help("low, normal or high")
                        .value_parser(["low", "normal", "high"]),
                )
                .arg(
                    Arg::new("language")
                        .long("language")
                        .help("Proofing language, e.g. en-US"),
                )
                .arg(output_arg()),
        )
        .subcommand(
            Command::new("inspect")
                .about("Inspect the block model of a source file")
                .arg(
                    Arg::new("path")
                        .help("Path to the source file")
                        .required(true)
                        .index(1)
                        .value_hint(ValueHint::FilePath),
                )
                .arg(
                    Arg::new("transform")
                        .help("Transform to apply. Defaults to the configured one")
                        .required(false)
                        .value_parser(clap::builder::PossibleValuesParser::new(
                            AVAILABLE_TRANSFORMS,
                        ))
                        .index(2)
                        .value_hint(ValueHint::Other),
                )
                .arg(from_arg()),
        )
}

#[cfg(test)]
mod tests {
    use super::*;

    fn arg_ids(cmd: &Command) -> Vec<&str> {
        cmd.get_arguments().map(|arg| arg.get_id().as_str()).collect()
    }

    #[test]
    fn document_commands_take_a_source_format() {
        let cmd = build_cli();
        for name in ["docx", "xlsx", "inspect"] {
            let sub = cmd.find_subcommand(name).unwrap();
            assert!(arg_ids(sub).contains(&"from"), "{name} lacks --from");
        }
    }

    #[test]
    fn eml_command_lists_every_header_flag() {
        let cmd = build_cli();
        let ids = arg_ids(cmd.find_subcommand("eml").unwrap());
        for flag in ["subject", "to", "cc", "bcc", "priority", "language", "output"] {
            assert!(ids.contains(&flag), "eml lacks --{flag}");
        }
    }
}
