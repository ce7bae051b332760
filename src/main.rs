use clap::{Parser, ValueEnum};
use serde::Serialize;
use tonic::transport::Channel;
use tracing_subscriber::EnvFilter;

use abacus::config::AgentArgs;
use abacus::node::Node;
use abacus::proto::agent_client::AgentClient;
use abacus::proto::ExpressionRequest;
use abacus::shutdown::install_shutdown_handler;

#[derive(Parser, Debug)]
#[command(name = "abacus")]
#[command(version)]
#[command(about = "Evaluates arithmetic expressions on a pool of simulated workers")]
#[command(propagate_version = true)]
struct Args {
    #[command(subcommand)]
    command: Commands,
}

#[derive(clap::Subcommand, Debug)]
enum Commands {
    /// Start an evaluation agent
    Server(ServerArgs),

    /// Send one expression to a running agent
    Eval {
        #[command(flatten)]
        client: ClientArgs,

        /// The expression to evaluate (e.g., "2+3*4")
        expression: String,

        /// Request ID echoed back by the agent (generated when omitted)
        #[arg(long, default_value = "")]
        id: String,
    },
}

// =============================================================================
// Server Arguments
// =============================================================================

#[derive(Parser, Debug)]
struct ServerArgs {
    #[command(flatten)]
    agent: AgentArgs,
}

// =============================================================================
// Client Arguments
// =============================================================================

#[derive(Parser, Debug)]
struct ClientArgs {
    /// Agent address
    #[arg(long, short = 'a', default_value = "http://127.0.0.1:50051")]
    addr: String,

    /// Output format
    #[arg(long, short = 'o', default_value = "table")]
    output: OutputFormat,
}

#[derive(Debug, Clone, ValueEnum)]
enum OutputFormat {
    Table,
    Json,
}

#[derive(Serialize)]
struct EvalOutput {
    id: String,
    expression: String,
    result: String,
}

// =============================================================================
// Server Implementation
// =============================================================================

async fn run_server(args: ServerArgs) -> Result<(), Box<dyn std::error::Error>> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .init();

    let config = args.agent.into_config();

    tracing::info!(
        listen_addr = %config.listen_addr,
        computing_power = config.computing_power,
        queue_capacity = config.queue_capacity,
        operation_times = ?config.operation_times,
        submit_timeout_ms = ?config.submit_timeout_ms,
        request_timeout_ms = ?config.request_timeout_ms,
        subtree_policy = ?config.subtree_policy,
        "Starting abacus agent"
    );

    let shutdown = install_shutdown_handler().map_err(|e| {
        tracing::error!(error = %e, "Failed to install signal handlers");
        e
    })?;
    let node = Node::new(config);
    node.run(shutdown).await?;

    tracing::info!("Agent stopped");
    Ok(())
}

// =============================================================================
// Client Command Handlers
// =============================================================================

async fn handle_eval(
    client: &mut AgentClient<Channel>,
    expression: String,
    id: String,
    output_format: &OutputFormat,
) -> Result<(), Box<dyn std::error::Error>> {
    let response = client
        .send_expression(ExpressionRequest {
            id,
            expression: expression.clone(),
        })
        .await;

    match response {
        Ok(response) => {
            let resp = response.into_inner();
            match output_format {
                OutputFormat::Json => {
                    let output = EvalOutput {
                        id: resp.id,
                        expression,
                        result: resp.result,
                    };
                    println!("{}", serde_json::to_string_pretty(&output)?);
                }
                OutputFormat::Table => {
                    println!("Request ID: {}", resp.id);
                    println!("Expression: {}", expression);
                    println!("Result:     {}", resp.result);
                }
            }
        }
        Err(status) => {
            eprintln!("Error: {} ({:?})", status.message(), status.code());
            std::process::exit(1);
        }
    }
    Ok(())
}

// =============================================================================
// Main Entry Point
// =============================================================================

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let args = Args::parse();

    match args.command {
        Commands::Server(server_args) => {
            run_server(server_args).await?;
        }
        Commands::Eval {
            client,
            expression,
            id,
        } => {
            let channel = Channel::from_shared(client.addr.clone())?.connect().await?;
            let mut grpc_client = AgentClient::new(channel);
            handle_eval(&mut grpc_client, expression, id, &client.output).await?;
        }
    }

    Ok(())
}
