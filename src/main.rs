use std::path::{Path, PathBuf};
use std::process::ExitCode;
use std::time::Duration;

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use tracing::{info, warn};
use tracing_subscriber::EnvFilter;

use datagent_config::{BlockType, Destination, Message, NodePatch, Position};
use datagent_dispatch::{DEFAULT_EXECUTOR_URL, Dispatcher, DispatcherConfig, HttpDispatcher};
use datagent_graph::{ExecutionPlan, Project, compile};

/// Datagent - compile canvas pipelines and run them on an executor
#[derive(Parser)]
#[command(name = "datagent")]
#[command(version, about, long_about = None)]
struct Cli {
  #[command(subcommand)]
  command: Option<Commands>,
}

#[derive(Subcommand)]
enum Commands {
  /// Create a starter input -> process -> output project
  New {
    /// Project name
    name: String,

    /// Project description
    #[arg(long, default_value = "")]
    description: String,

    /// Write the project here instead of stdout
    #[arg(long)]
    output: Option<PathBuf>,
  },

  /// Compile a project file into the executor's block list
  Compile {
    /// Path to the exported project (JSON)
    project_file: PathBuf,

    /// Print the execution order instead of the block list
    #[arg(long)]
    order: bool,
  },

  /// Check a block list the way the executor will
  Check {
    /// Path to a block list (JSON array or {"blocks": [...]})
    blocks_file: PathBuf,
  },

  /// Compile a project and submit it to the executor
  Run {
    /// Path to the exported project (JSON)
    project_file: PathBuf,

    /// Executor endpoint
    #[arg(long, env = "DATAGENT_EXECUTOR_URL", default_value = DEFAULT_EXECUTOR_URL)]
    executor_url: String,

    /// Request timeout in seconds
    #[arg(long, env = "DATAGENT_TIMEOUT_SECS", default_value_t = 120)]
    timeout_secs: u64,
  },
}

fn main() -> Result<ExitCode> {
  // A missing .env file is fine.
  let _ = dotenvy::dotenv();

  tracing_subscriber::fmt()
    .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
    .with_writer(std::io::stderr)
    .init();

  let cli = Cli::parse();

  match cli.command {
    Some(Commands::New {
      name,
      description,
      output,
    }) => new_project(name, description, output)?,
    Some(Commands::Compile {
      project_file,
      order,
    }) => compile_project(&project_file, order)?,
    Some(Commands::Check { blocks_file }) => return check_blocks(&blocks_file),
    Some(Commands::Run {
      project_file,
      executor_url,
      timeout_secs,
    }) => {
      let config =
        DispatcherConfig::new(executor_url).with_timeout(Duration::from_secs(timeout_secs));
      return run_project(project_file, config);
    }
    None => {
      println!("datagent - use --help to see available commands");
    }
  }

  Ok(ExitCode::SUCCESS)
}

fn new_project(name: String, description: String, output: Option<PathBuf>) -> Result<()> {
  let project = starter_project(name, description)?;
  let json = project.to_json().context("failed to serialize project")?;

  match output {
    Some(path) => {
      std::fs::write(&path, json)
        .with_context(|| format!("failed to write project file: {}", path.display()))?;
      info!(path = %path.display(), project_id = %project.id, "project written");
    }
    None => println!("{json}"),
  }

  Ok(())
}

/// A three-stage pipeline ready to be filled in.
fn starter_project(name: String, description: String) -> Result<Project> {
  let mut project = Project::new(name, description);
  let graph = &mut project.graph;

  let input = graph.add_node(BlockType::Input, Position::new(0.0, 0.0)).id;
  let process = graph.add_node(BlockType::Process, Position::new(300.0, 0.0)).id;
  let output = graph.add_node(BlockType::Output, Position::new(600.0, 0.0)).id;

  graph.update_node_data(
    input,
    &NodePatch {
      source: Some("data.csv".to_string()),
      ..Default::default()
    },
  );
  graph.push_message(process, Message::user("Clean the data by removing missing values"));
  graph.update_node_data(
    output,
    &NodePatch {
      destination: Some(Destination::Script {
        init_script: "df.to_csv('output.csv', index=False)".to_string(),
      }),
      ..Default::default()
    },
  );

  graph
    .add_edge(input, process, None, None)
    .context("failed to connect input to process")?;
  graph
    .add_edge(process, output, None, None)
    .context("failed to connect process to output")?;

  Ok(project)
}

fn load_project(path: &Path) -> Result<Project> {
  let content = std::fs::read_to_string(path)
    .with_context(|| format!("failed to read project file: {}", path.display()))?;
  let project = Project::from_json(&content)
    .with_context(|| format!("failed to load project file: {}", path.display()))?;

  info!(
    project = %project.name,
    nodes = project.graph.nodes().len(),
    edges = project.graph.edges().len(),
    "loaded project"
  );
  Ok(project)
}

fn compile_project(path: &Path, order: bool) -> Result<()> {
  let project = load_project(path)?;
  let compilation = compile(&project.graph);

  if order {
    let ids: Vec<String> = compilation.order.iter().map(ToString::to_string).collect();
    println!("{}", serde_json::to_string_pretty(&ids)?);
  } else {
    println!("{}", serde_json::to_string_pretty(&compilation.blocks)?);
  }

  Ok(())
}

fn check_blocks(path: &Path) -> Result<ExitCode> {
  let content = std::fs::read_to_string(path)
    .with_context(|| format!("failed to read blocks file: {}", path.display()))?;

  let plan = match ExecutionPlan::from_json(&content) {
    Ok(plan) => plan,
    Err(e) => {
      eprintln!("invalid block list: {e}");
      return Ok(ExitCode::FAILURE);
    }
  };

  println!("execution order: {:?}", plan.order());
  for destination in plan.destinations() {
    println!(
      "destination {} ({}): {:?}",
      destination.destination_id, destination.email_dest, destination.execution_order
    );
  }
  let skipped = plan.skipped_blocks();
  if !skipped.is_empty() {
    println!("blocks with empty prompts (skipped): {skipped:?}");
  }

  Ok(ExitCode::SUCCESS)
}

fn run_project(path: PathBuf, config: DispatcherConfig) -> Result<ExitCode> {
  let rt = tokio::runtime::Runtime::new()?;
  rt.block_on(async { run_project_async(&path, config).await })
}

async fn run_project_async(path: &Path, config: DispatcherConfig) -> Result<ExitCode> {
  let project = load_project(path)?;
  let compilation = compile(&project.graph);

  if let Err(e) = ExecutionPlan::new(compilation.blocks.clone()) {
    warn!(error = %e, "compiled pipeline will likely be rejected by the executor");
  }

  let dispatcher = HttpDispatcher::new(config).context("failed to create dispatcher")?;
  let response = dispatcher.dispatch(&compilation.blocks).await;

  println!("{}", serde_json::to_string_pretty(&response)?);

  Ok(if response.success {
    ExitCode::SUCCESS
  } else {
    ExitCode::FAILURE
  })
}
