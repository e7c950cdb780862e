//! Command-line front end for the crew spawner.
//!
//! With task words, processes that task once. Without, reads tasks from
//! stdin until `quit`, `exit` or `q`.
//!
//! ```bash
//! cargo run --bin crew_spawner -- Write a short blog post about Rust
//! cargo run --bin crew_spawner -- --provider anthropic
//! ```

use std::io::{self, BufRead, Write};
use std::sync::Arc;

use anyhow::Context;
use clap::Parser;
use meta_crew_spawner::config::{load_dotenv, report_dotenv};
use meta_crew_spawner::llm::{CredentialSource, EnvCredentials, Provider, ProviderRegistry};
use meta_crew_spawner::meta_agents::CrewSpawner;

/// Turn a task description into a crew of agents and run it.
#[derive(Parser, Debug)]
#[command(name = "crew_spawner")]
#[command(version)]
struct Cli {
    /// Provider to use (openai, anthropic, groq, mistral); defaults to the
    /// first one with an API key.
    #[arg(long)]
    provider: Option<String>,

    /// Model name; defaults to the provider's default model.
    #[arg(long)]
    model: Option<String>,

    /// Task description. Starts interactive mode when omitted.
    task: Vec<String>,
}

fn warn_missing_keys() {
    let missing: Vec<&str> = Provider::ALL
        .iter()
        .map(|p| p.env_var())
        .filter(|var| EnvCredentials.get(var).is_none())
        .collect();

    if !missing.is_empty() {
        println!("Warning: Missing API keys for: {}", missing.join(", "));
        println!("Some LLM providers may not be available.");
    }
}

/// Warning for a `--model` that has no provider to apply to.
fn ignored_model_warning(model: Option<&str>, active: Option<Provider>) -> Option<String> {
    match (model, active) {
        (Some(model), None) => Some(format!(
            "Warning: --model {} ignored: no LLM provider is configured.",
            model
        )),
        _ => None,
    }
}

fn run_once(spawner: &mut CrewSpawner, task: &str) {
    match spawner.process_task(task) {
        Ok(result) => {
            println!("\nResult:\n{}", result);
            for agent in spawner.last_agents_info() {
                log::info!("Agent: {} ({})", agent.role, agent.goal);
            }
        }
        Err(e) => println!("Error: {}", e),
    }
}

fn interactive(spawner: &mut CrewSpawner) -> anyhow::Result<()> {
    println!("Meta-Crew Spawner - Interactive Mode");
    println!("Enter your task description (or 'quit' to exit):");

    let stdin = io::stdin();
    let mut lines = stdin.lock().lines();
    loop {
        print!("\n> ");
        io::stdout().flush()?;

        let Some(line) = lines.next() else {
            break;
        };
        let task = line.context("failed to read stdin")?;
        let task = task.trim();

        if matches!(task.to_lowercase().as_str(), "quit" | "exit" | "q") {
            break;
        }
        if task.is_empty() {
            continue;
        }

        println!("\nProcessing: {}", task);
        run_once(spawner, task);
    }
    Ok(())
}

fn main() -> anyhow::Result<()> {
    let dotenv = load_dotenv();
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("warn")).init();
    report_dotenv(&dotenv);

    let cli = Cli::parse();

    ctrlc::set_handler(|| {
        println!("\nGoodbye!");
        std::process::exit(0);
    })
    .context("failed to install Ctrl-C handler")?;

    warn_missing_keys();

    let registry = Arc::new(ProviderRegistry::from_env());
    let mut spawner = match cli.provider.as_deref() {
        Some(provider) => {
            let mut spawner = CrewSpawner::unconfigured(registry);
            spawner.configure(provider, cli.model.as_deref())?;
            spawner
        }
        None => {
            let mut spawner = CrewSpawner::new(registry);
            let active = spawner.active_config().map(|c| c.provider);
            if let Some(warning) = ignored_model_warning(cli.model.as_deref(), active) {
                println!("{}", warning);
            } else if let (Some(model), Some(provider)) = (cli.model.as_deref(), active) {
                spawner.configure(provider.as_str(), Some(model))?;
            }
            spawner
        }
    };

    if cli.task.is_empty() {
        interactive(&mut spawner)
    } else {
        let task = cli.task.join(" ");
        println!("Processing task: {}", task);
        run_once(&mut spawner, &task);
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_model_without_provider_warns() {
        assert_eq!(
            ignored_model_warning(Some("gpt-4o-mini"), None).as_deref(),
            Some("Warning: --model gpt-4o-mini ignored: no LLM provider is configured.")
        );
        assert!(ignored_model_warning(Some("gpt-4o-mini"), Some(Provider::OpenAI)).is_none());
        assert!(ignored_model_warning(None, None).is_none());
    }

    #[test]
    fn test_cli_parses_flags_and_task_words() {
        let cli = Cli::parse_from(["crew_spawner", "--model", "m", "write", "a", "poem"]);
        assert_eq!(cli.model.as_deref(), Some("m"));
        assert!(cli.provider.is_none());
        assert_eq!(cli.task.join(" "), "write a poem");
    }
}
