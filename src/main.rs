use std::io::Read;
use std::process::ExitCode;

use anyhow::{Context, Result, bail};
use clap::{Args, Parser, Subcommand, ValueEnum};
use motion_toolkit::args::CommonArgs;
use motion_toolkit::config::MotionConfig;
use motion_toolkit::modes::{self, Resource};
use motion_toolkit::tools::{self, ToolCall};
use motion_toolkit::{MotionToolkit, api, logging};
use serde_json::Value;
use strum::IntoEnumIterator;

#[derive(Debug, Parser)]
#[command(name = "motion-toolkit", version, about = "Motion calendar tools for LLM agents")]
struct Cli {
    #[command(flatten)]
    common: CommonArgs,
    #[command(subcommand)]
    command: Commands,
}

#[derive(Debug, Subcommand)]
enum Commands {
    /// List every registered mode by resource family
    Modes,
    /// Print the tool definitions
    Tools(ToolsArgs),
    /// Run one tool against Motion
    #[command(alias = "call")]
    Run(RunArgs),
}

#[derive(Debug, Clone, Copy, ValueEnum)]
enum SchemaFormat {
    Names,
    Openai,
    Anthropic,
    Google,
}

#[derive(Debug, Args)]
struct ToolsArgs {
    /// Output format
    #[arg(long, value_enum, default_value_t = SchemaFormat::Names)]
    format: SchemaFormat,
}

#[derive(Debug, Args)]
struct RunArgs {
    /// Tool name (`task_list`) or mode (`task.list`)
    #[arg(value_name = "TOOL")]
    tool: String,
    /// JSON arguments; `-` reads them from stdin
    #[arg(short, long, value_name = "JSON", default_value = "{}")]
    input: String,
}

fn main() -> Result<ExitCode> {
    let cli = Cli::parse();

    let mut config = MotionConfig::load(cli.common.config_path())?;
    cli.common.apply_overrides(&mut config);
    let _log_guard = logging::init(&config.logging, cli.common.verbose)?;

    match cli.command {
        Commands::Modes => {
            for resource in Resource::iter() {
                println!("{}", resource.display_name());
                for mode in modes::modes_for(resource) {
                    let status = if api::is_wired(mode) { "" } else { "  (not implemented)" };
                    println!("  {mode}{status}");
                }
            }
        }
        Commands::Tools(args) => print_tools(args.format)?,
        Commands::Run(args) => return run_tool(&config, args),
    }

    Ok(ExitCode::SUCCESS)
}

fn print_tools(format: SchemaFormat) -> Result<()> {
    let defs = tools::all_tool_defs();
    let schemas = match format {
        SchemaFormat::Names => {
            for def in &defs {
                println!("{:<28} {}", def.name, def.mode);
            }
            return Ok(());
        }
        SchemaFormat::Openai => tools::tools_openai(&defs),
        SchemaFormat::Anthropic => tools::tools_anthropic(&defs),
        SchemaFormat::Google => tools::tools_google(&defs),
    };
    println!("{}", serde_json::to_string_pretty(&schemas)?);
    Ok(())
}

fn run_tool(config: &MotionConfig, args: RunArgs) -> Result<ExitCode> {
    let raw = if args.input == "-" {
        let mut buf = String::new();
        std::io::stdin()
            .read_to_string(&mut buf)
            .context("failed to read arguments from stdin")?;
        buf
    } else {
        args.input
    };
    let arguments: Value = serde_json::from_str(&raw).context("--input is not valid JSON")?;

    if modes::find_mode(&args.tool).is_none() {
        bail!(
            "unknown tool '{}'; run `motion-toolkit tools` to list them",
            args.tool
        );
    }

    let toolkit = MotionToolkit::from_config(config).context("cannot connect to Motion")?;
    let result = toolkit.execute(&ToolCall {
        id: String::new(),
        name: args.tool,
        arguments,
    });
    println!("{}", result.result);

    Ok(if result.is_error {
        ExitCode::FAILURE
    } else {
        ExitCode::SUCCESS
    })
}
