// ABOUTME: clap-based command-line tool for agent/client provisioning
// ABOUTME: Calls the running server's unauthenticated admin HTTP surface
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2026 Agent OAuth Server Contributors

//! Admin CLI, grounded on the teacher's `pierre-cli` binary pattern: a
//! `clap`-derive `Cli`/`Commands` split. Unlike the in-process store, the
//! server's state lives in a separate running process, so this tool is an
//! `HTTP` client against `/api/admin/*` (spec.md §9 notes that surface is
//! unauthenticated in the core; this CLI assumes the caller is already
//! authorized out-of-band, e.g. network-level access control).

use clap::{Parser, Subcommand};
use serde_json::Value;

#[derive(Debug, Parser)]
#[command(name = "agent-oauth-admin", about = "Provision agents and clients for the agent OAuth authorization server")]
struct Cli {
    /// Base URL of the running server, e.g. `http://localhost:8080`.
    #[arg(long, env = "AGENT_OAUTH_SERVER_URL", default_value = "http://localhost:8080")]
    server_url: String,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Debug, Subcommand)]
enum Commands {
    /// Create a new agent, printing its one-time secret.
    CreateAgent {
        #[arg(long)]
        email: String,
        #[arg(long)]
        name: String,
        #[arg(long)]
        agent_id: Option<String>,
    },
    /// Create a new client, printing its one-time secret.
    CreateClient {
        #[arg(long)]
        name: String,
        #[arg(long, value_delimiter = ',')]
        redirect_uris: Vec<String>,
        #[arg(long)]
        client_id: Option<String>,
    },
    /// List all agents (never prints secrets).
    ListAgents,
    /// List all clients (never prints secrets).
    ListClients,
    /// Delete an agent by id.
    DeleteAgent {
        #[arg(long)]
        agent_id: String,
    },
    /// Delete a client by id.
    DeleteClient {
        #[arg(long)]
        client_id: String,
    },
}

fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();
    let client = reqwest::blocking::Client::new();

    match cli.command {
        Commands::CreateAgent { email, name, agent_id } => {
            let body = serde_json::json!({
                "user_email": email,
                "user_name": name,
                "agent_id": agent_id,
            });
            let response: Value = client
                .post(format!("{}/api/admin/agents", cli.server_url))
                .json(&body)
                .send()?
                .error_for_status()?
                .json()?;
            println!("agent_id:     {}", response["agent_id"]);
            println!("agent_secret: {}", response["agent_secret"]);
            println!("{}", response["warning"].as_str().unwrap_or_default());
        }
        Commands::CreateClient {
            name,
            redirect_uris,
            client_id,
        } => {
            let body = serde_json::json!({
                "client_name": name,
                "redirect_uris": redirect_uris,
                "client_id": client_id,
            });
            let response: Value = client
                .post(format!("{}/api/admin/clients", cli.server_url))
                .json(&body)
                .send()?
                .error_for_status()?
                .json()?;
            println!("client_id:     {}", response["client_id"]);
            println!("client_secret: {}", response["client_secret"]);
            println!("{}", response["warning"].as_str().unwrap_or_default());
        }
        Commands::ListAgents => {
            let agents: Vec<Value> = client
                .get(format!("{}/api/admin/agents", cli.server_url))
                .send()?
                .error_for_status()?
                .json()?;
            for agent in agents {
                println!(
                    "{}\t{}\t{}",
                    agent["agent_id"], agent["user_email"], agent["user_name"]
                );
            }
        }
        Commands::ListClients => {
            let clients: Vec<Value> = client
                .get(format!("{}/api/admin/clients", cli.server_url))
                .send()?
                .error_for_status()?
                .json()?;
            for client_record in clients {
                println!("{}\t{}", client_record["client_id"], client_record["name"]);
            }
        }
        Commands::DeleteAgent { agent_id } => {
            client
                .delete(format!("{}/api/admin/agents/{agent_id}", cli.server_url))
                .send()?
                .error_for_status()?;
            println!("deleted agent {agent_id}");
        }
        Commands::DeleteClient { client_id } => {
            client
                .delete(format!("{}/api/admin/clients/{client_id}", cli.server_url))
                .send()?
                .error_for_status()?;
            println!("deleted client {client_id}");
        }
    }

    Ok(())
}
