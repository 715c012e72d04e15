use clap::{Parser, Subcommand, ValueEnum};
use std::path::PathBuf;

#[derive(Parser)]
#[command(name = "figbuild")]
#[command(
    version,
    about = "Figma Builder - Generate React/Tailwind components from Figma frames",
    long_about = "Figma Builder\n\nModes:\n- catalogue: list the selectable frames/components of a Figma file, with previews.\n- generate: generate a component per selected node and package them as a zip and/or files.\n- export: generate one node and write it as a single file.\n- models: list the completion models available for generation.\n\nUse --help on any subcommand for details."
)]
#[command(propagate_version = true)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,

    #[arg(long, global = true, help = "Enable verbose output")]
    pub verbose: bool,

    #[arg(
        long,
        global = true,
        value_name = "PATH",
        help = "Optional config file (TOML) for endpoints/model/timeouts/project defaults; CLI flags override config"
    )]
    pub config: Option<PathBuf>,

    #[arg(
        long,
        global = true,
        value_enum,
        default_value = "json",
        help = "Output format"
    )]
    pub format: OutputFormat,
}

#[derive(Subcommand)]
pub enum Commands {
    /// List the selectable frames/components of a Figma file
    Catalogue {
        #[arg(long, help = "Figma file/design URL (node-id pre-selects that node)")]
        url: String,
    },

    /// Generate components for the selected nodes and package them
    Generate {
        #[arg(long, help = "Figma file/design URL (node-id pre-selects that node)")]
        url: String,

        #[arg(
            long,
            value_delimiter = ',',
            help = "Node ids to add to the selection after loading (comma-separated, 12:34 or 12-34); ids already selected via the URL or --all stay selected"
        )]
        select: Option<Vec<String>>,

        #[arg(long, help = "Select every catalogued node")]
        all: bool,

        #[arg(long, help = "Project name (archive folder and persistence directory)")]
        project: Option<String>,

        #[arg(long, value_name = "PATH", help = "Write a zip of all generated files here")]
        archive: Option<PathBuf>,

        #[arg(
            long,
            value_name = "DIR",
            help = "Save each file under DIR/<project>/ (config output_dir is used when neither --archive nor --out-dir is given)"
        )]
        out_dir: Option<PathBuf>,

        #[arg(long, help = "Completion model id (e.g. openai/gpt-4o)")]
        model: Option<String>,
    },

    /// Generate a single node and write it as one file
    Export {
        #[arg(long, help = "Figma file/design URL")]
        url: String,

        #[arg(long, help = "Node id to generate (defaults to the URL's node-id)")]
        select: Option<String>,

        #[arg(long, short, value_name = "PATH", help = "Output file (defaults to <Component>.tsx)")]
        output: Option<PathBuf>,

        #[arg(long, help = "Completion model id (e.g. openai/gpt-4o)")]
        model: Option<String>,
    },

    /// List completion models
    Models,
}

#[derive(Clone, Copy, ValueEnum, Default)]
pub enum OutputFormat {
    #[default]
    Json,
    Pretty,
}

pub fn parse() -> Cli {
    Cli::parse()
}
