use clap::{Parser, Subcommand};
use glassbox::prelude::*;
use std::path::PathBuf;

/// Inspect, replay and deploy Glassbox workflows
#[derive(Parser, Debug)]
#[command(version, about, long_about = None)]
struct Cli {
    /// JSON settings file with the service endpoints. Environment variables override it.
    #[arg(short, long, global = true)]
    settings: Option<PathBuf>,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// List the palette blocks by category
    Catalog,
    /// Replay a scenario script and print the resulting canvas
    Replay {
        /// Path to the scenario JSON file
        script: PathBuf,
    },
    /// Print the deployment descriptor for an agent block
    Descriptor {
        #[arg(long)]
        block_id: String,
        /// Agent form values as a JSON object of strings
        #[arg(long)]
        form: Option<String>,
    },
    /// Create the repository the workflow deploys to
    CreateRepo { name: String },
    /// Configure CI/CD for a repository
    Publish { repo: String },
    /// Create a droplet for a repository and register its deploy key
    Provision { repo: String },
}

#[tokio::main]
async fn main() {
    env_logger::init();
    let cli = Cli::parse();

    match cli.command {
        Command::Catalog => print_catalog(),
        Command::Replay { script } => run_replay(&script),
        Command::Descriptor { block_id, form } => print_descriptor(&block_id, form.as_deref()),
        Command::CreateRepo { name } => {
            let dispatcher = load_dispatcher(cli.settings.as_deref());
            let mut workspace = Workspace::new();
            let repo = workspace
                .create_repository(&dispatcher, &name)
                .await
                .unwrap_or_else(|e| exit_with_error(&e.to_string()));
            println!("Repository created: {}", repo);
        }
        Command::Publish { repo } => {
            let dispatcher = load_dispatcher(cli.settings.as_deref());
            let mut workspace = Workspace::new();
            workspace.set_repo_name(repo);
            let reply = workspace
                .publish(&dispatcher)
                .await
                .unwrap_or_else(|e| exit_with_error(&e.to_string()));
            println!("CI/CD configured: {}", reply);
        }
        Command::Provision { repo } => {
            let dispatcher = load_dispatcher(cli.settings.as_deref());
            let mut workspace = Workspace::new();
            workspace.set_repo_name(repo);
            let droplet = workspace
                .provision(&dispatcher)
                .await
                .unwrap_or_else(|e| exit_with_error(&e.to_string()));
            println!(
                "Droplet {} ready at {}",
                droplet.id.as_deref().unwrap_or("(unknown id)"),
                droplet.ip.as_deref().unwrap_or("(unknown address)")
            );
        }
    }
}

fn load_dispatcher(settings_path: Option<&std::path::Path>) -> HttpDispatcher {
    let settings = Settings::load(settings_path)
        .unwrap_or_else(|e| exit_with_error(&format!("Failed to load settings: {}", e)));
    HttpDispatcher::new(settings)
}

fn print_catalog() {
    let registry = Registry::builtin();
    for category in [
        BlockCategory::Start,
        BlockCategory::Agent,
        BlockCategory::Output,
        BlockCategory::Tool,
    ] {
        println!("{}:", category);
        for template in registry.by_category(category) {
            println!("  {:<18} {} - {}", template.id, template.title, template.description);
        }
    }
}

fn run_replay(script: &std::path::Path) {
    let scenario = Scenario::from_file(script).unwrap_or_else(|e| exit_with_error(&e.to_string()));
    let mut workspace = Workspace::new();
    let report = scenario
        .replay(&mut workspace)
        .unwrap_or_else(|e| exit_with_error(&e.to_string()));

    for declined in &report.declined {
        eprintln!("Step {} declined: {}", declined.step, declined.reason);
    }
    let json = serde_json::to_string_pretty(&report)
        .unwrap_or_else(|e| exit_with_error(&format!("Failed to serialize report: {}", e)));
    println!("{}", json);
}

fn print_descriptor(block_id: &str, form: Option<&str>) {
    let values: FormValues = match form {
        Some(json) => serde_json::from_str(json)
            .unwrap_or_else(|e| exit_with_error(&format!("Failed to parse form JSON: {}", e))),
        None => FormValues::new(),
    };
    let block_id = BlockId::from(block_id);
    let descriptor = DeploymentDescriptor::for_agent(&values, &block_id);
    eprintln!(
        "Deploys to {}",
        glassbox::configure::deploy_path(&values, Some(&block_id))
    );
    println!("{}", descriptor.to_json_pretty());
}

fn exit_with_error(message: &str) -> ! {
    eprintln!("\nError: {}", message);
    std::process::exit(1);
}
