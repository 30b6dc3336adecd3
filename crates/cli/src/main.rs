//! Claimq CLI - Command-line client for the claimq daemon

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use colored::Colorize;
use serde::{Deserialize, Serialize};
use serde_json::json;
use tabled::{Table, Tabled};

const DEFAULT_RPC_URL: &str = "http://127.0.0.1:9531";

#[derive(Parser)]
#[command(name = "claimq")]
#[command(about = "Product claim queue CLI", long_about = None)]
#[command(version)]
struct Cli {
    #[command(subcommand)]
    command: Commands,

    /// RPC server URL
    #[arg(long, env = "CLAIMQ_RPC_URL", default_value = DEFAULT_RPC_URL)]
    rpc_url: String,
}

#[derive(Subcommand)]
enum Commands {
    /// Create a product and queue it for a user
    Create {
        /// Acting user id
        #[arg(short, long)]
        user: u64,

        /// Product name
        #[arg(short, long)]
        name: String,

        /// Product price (> 0)
        #[arg(short, long)]
        price: f64,

        /// Optional description
        #[arg(short, long)]
        description: Option<String>,

        /// Anti-forgery token
        #[arg(long, env = "CLAIMQ_NONCE", default_value = "")]
        nonce: String,
    },

    /// Resolve the product for a container/consumer pair, claiming one if needed
    Resolve {
        /// Container (page/post) id; omit to simulate a render without one
        #[arg(short, long)]
        container: Option<String>,

        /// Consumer (widget instance) id
        #[arg(short = 'w', long)]
        consumer: String,

        /// User whose queue is drained
        #[arg(short, long)]
        user: u64,
    },

    /// Show the stored assignment for a container/consumer pair
    Lookup {
        #[arg(short, long)]
        container: String,

        #[arg(short = 'w', long)]
        consumer: String,
    },

    /// List a user's pending product ids
    Pending {
        user: u64,
    },

    /// Drop a user's pending queue
    Clear {
        user: u64,
    },

    /// Purge expired queues now
    Purge,

    /// Show system status
    Status,
}

#[derive(Serialize)]
struct JsonRpcRequest {
    jsonrpc: String,
    method: String,
    params: serde_json::Value,
    id: u64,
}

#[derive(Deserialize)]
struct JsonRpcResponse {
    #[allow(dead_code)]
    jsonrpc: String,
    #[allow(dead_code)]
    id: u64,
    result: Option<serde_json::Value>,
    error: Option<JsonRpcError>,
}

#[derive(Deserialize)]
struct JsonRpcError {
    code: i32,
    message: String,
}

#[derive(Deserialize)]
struct CreateResult {
    message: String,
    product_id: u64,
    product_name: String,
    product_price: String,
    product_url: String,
    edit_url: String,
}

#[derive(Tabled)]
struct ProductRow {
    id: u64,
    name: String,
    price: String,
    url: String,
    edit: String,
}

#[derive(Deserialize)]
struct ResolveResult {
    status: String,
    product_id: Option<u64>,
}

#[derive(Deserialize)]
struct LookupResult {
    storage_key: String,
    product_id: Option<u64>,
    assigned_at: Option<i64>,
}

#[derive(Tabled)]
struct AssignmentRow {
    key: String,
    product: String,
    assigned_at: String,
}

fn or_dash<T: ToString>(value: Option<T>) -> String {
    value.map_or_else(|| "-".to_string(), |v| v.to_string())
}

async fn call_rpc(url: &str, method: &str, params: serde_json::Value) -> Result<serde_json::Value> {
    let request = JsonRpcRequest {
        jsonrpc: "2.0".to_string(),
        method: method.to_string(),
        params,
        id: 1,
    };

    let client = reqwest::Client::new();
    let response: JsonRpcResponse = client
        .post(url)
        .json(&request)
        .send()
        .await
        .context("Failed to connect to daemon")?
        .json()
        .await
        .context("Failed to parse response")?;

    if let Some(error) = response.error {
        anyhow::bail!("RPC error ({}): {}", error.code, error.message);
    }

    response
        .result
        .ok_or_else(|| anyhow::anyhow!("No result in response"))
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    match cli.command {
        Commands::Create {
            user,
            name,
            price,
            description,
            nonce,
        } => {
            let params = json!({
                "nonce": nonce,
                "user_id": user,
                "name": name,
                "price": price,
                "description": description,
            });

            let result = call_rpc(&cli.rpc_url, "product.create.v1", params).await?;
            let created: CreateResult = serde_json::from_value(result)?;

            println!("{}", format!("✓ {}", created.message).green().bold());
            println!();

            let row = ProductRow {
                id: created.product_id,
                name: created.product_name,
                price: created.product_price,
                url: created.product_url,
                edit: created.edit_url,
            };
            println!("{}", Table::new(vec![row]));
        }

        Commands::Resolve {
            container,
            consumer,
            user,
        } => {
            let params = json!({
                "container_id": container,
                "consumer_id": consumer,
                "user_id": user,
            });

            let result = call_rpc(&cli.rpc_url, "claim.resolve.v1", params).await?;
            let resolved: ResolveResult = serde_json::from_value(result)?;

            match (resolved.status.as_str(), resolved.product_id) {
                ("claimed", Some(id)) => {
                    println!("{}", format!("✓ Claimed product {}", id).green().bold())
                }
                ("existing", Some(id)) => println!("{} product {}", "Existing:".cyan().bold(), id),
                ("no_container", _) => println!(
                    "{}",
                    "No container identity, nothing was claimed".yellow()
                ),
                _ => println!("{}", "Nothing pending for this user".yellow()),
            }
        }

        Commands::Lookup {
            container,
            consumer,
        } => {
            let params = json!({
                "container_id": container,
                "consumer_id": consumer,
            });

            let result = call_rpc(&cli.rpc_url, "claim.lookup.v1", params).await?;
            let lookup: LookupResult = serde_json::from_value(result)?;

            if lookup.product_id.is_none() {
                println!("{}", format!("No assignment at {}", lookup.storage_key).yellow());
            } else {
                let row = AssignmentRow {
                    key: lookup.storage_key,
                    product: or_dash(lookup.product_id),
                    assigned_at: or_dash(lookup.assigned_at),
                };
                println!("{}", Table::new(vec![row]));
            }
        }

        Commands::Pending { user } => {
            let result = call_rpc(&cli.rpc_url, "queue.pending.v1", json!({ "user_id": user }))
                .await?;

            let ids: Vec<u64> = serde_json::from_value(result["product_ids"].clone())?;
            if ids.is_empty() {
                println!("{}", format!("No pending products for user {}", user).yellow());
            } else {
                println!(
                    "{}",
                    format!("Pending for user {} (head first):", user).cyan().bold()
                );
                for id in ids {
                    println!("  {} {}", "•".bold(), id);
                }
            }
        }

        Commands::Clear { user } => {
            let result =
                call_rpc(&cli.rpc_url, "queue.clear.v1", json!({ "user_id": user })).await?;

            if result["cleared"].as_bool().unwrap_or(false) {
                println!("{}", format!("✓ Queue for user {} cleared", user).green().bold());
            } else {
                println!("{}", format!("User {} had no queue", user).yellow());
            }
        }

        Commands::Purge => {
            println!("{}", "Purging expired queues...".cyan().bold());

            match call_rpc(&cli.rpc_url, "admin.purge.v1", json!({})).await {
                Ok(result) => {
                    println!("  {} {} expired entries removed", "✓".green(), result["purged"]);
                }
                Err(e) => {
                    println!("  {} Purge failed: {}", "✗".red(), e);
                }
            }
        }

        Commands::Status => {
            println!("{}", "System Status".cyan().bold());
            println!();

            match call_rpc(&cli.rpc_url, "admin.stats.v1", json!({})).await {
                Ok(stats) => {
                    println!("  {} {}", "RPC URL:".bold(), cli.rpc_url);
                    println!("  {} {}", "Status:".bold(), "ONLINE".green());
                    println!();
                    println!("  {} {}", "Version:".bold(), stats["version"]);
                    println!("  {} {}", "Assignments:".bold(), stats["assignments"]);
                    println!("  {} {} seconds", "Uptime:".bold(), stats["uptime_seconds"]);
                }
                Err(e) => {
                    println!("  {} {}", "Status:".bold(), "ERROR".red());
                    println!("  {} {}", "Error:".bold(), e);
                }
            }
        }
    }

    Ok(())
}
