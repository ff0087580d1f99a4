//! Flowgate CLI - command-line interface for the boundary guard

use std::io::Read;
use std::path::PathBuf;

use anyhow::Context;
use clap::Parser;
use flowgate_core::{Gate, Request, Signal, Source};

#[derive(Parser)]
#[command(name = "flowgate")]
#[command(about = "Flowgate - boundary guard for untrusted text and tool-call input")]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(clap::Subcommand)]
enum Commands {
    /// Scan free text for embedded dangerous tool calls
    Scan {
        /// Input file, or '-' for stdin
        #[arg(default_value = "-")]
        input: String,
        /// Origin label recorded with the request
        #[arg(short, long, default_value = "document")]
        origin: String,
        /// Workspace root for the boundary exemption
        #[arg(short, long)]
        workspace: Option<String>,
        /// Write the audit log to this file after scanning
        #[arg(long)]
        audit: Option<PathBuf>,
    },
    /// Validate a structured JSON request
    Check {
        /// Input file, or '-' for stdin
        #[arg(default_value = "-")]
        input: String,
        /// Origin label recorded with the request
        #[arg(short, long, default_value = "cli")]
        origin: String,
        /// Invoked tool name
        #[arg(short, long)]
        tool: Option<String>,
        /// Workspace root for the boundary exemption
        #[arg(short, long)]
        workspace: Option<String>,
        /// Write the audit log to this file after checking
        #[arg(long)]
        audit: Option<PathBuf>,
    },
}

fn read_input(input: &str) -> anyhow::Result<String> {
    if input == "-" {
        let mut buf = String::new();
        std::io::stdin()
            .read_to_string(&mut buf)
            .context("failed to read stdin")?;
        Ok(buf)
    } else {
        std::fs::read_to_string(input).with_context(|| format!("failed to read {input}"))
    }
}

fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt::init();

    let cli = Cli::parse();
    let gate = Gate::default();

    let (signal, audit_path) = match cli.command {
        Commands::Scan {
            input,
            origin,
            workspace,
            audit,
        } => {
            let text = read_input(&input)?;
            let signal = gate.validate_text(&text, &origin, workspace.as_deref());
            (signal, audit)
        }
        Commands::Check {
            input,
            origin,
            tool,
            workspace,
            audit,
        } => {
            let raw = read_input(&input)?;
            let content: serde_json::Value =
                serde_json::from_str(&raw).context("input is not valid JSON")?;

            let mut source = Source::new(origin);
            if let Some(tool) = tool {
                source = source.with_tool(tool);
            }
            if let Some(workspace) = workspace {
                source = source.with_workspace(workspace);
            }

            let signal = gate.validate(&Request::new(source, content));
            (signal, audit)
        }
    };

    if let Some(path) = audit_path {
        gate.audit()
            .export_to_file(&path)
            .with_context(|| format!("failed to write audit log to {}", path.display()))?;
    }

    println!("{}", serde_json::to_string_pretty(&signal)?);

    if matches!(signal, Signal::Blocked { .. }) {
        std::process::exit(1);
    }
    Ok(())
}
