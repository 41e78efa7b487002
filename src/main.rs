use anyhow::{Context, Result};
use std::path::PathBuf;
use sitelens::backend::ProjectTask;
use sitelens::config::Config;
use sitelens::context::AppContext;

const USAGE: &str = "Usage:
  sitelens sync <project_id>                Sync annotation tasks of every photo in a project
  sitelens sync-photo <photo_id> <project_id>   Sync annotation tasks of one photo
  sitelens complete <task_id> [true|false]  Set task completion (default: true)
  sitelens init-config [path]               Write a default configuration file";

fn print_tasks(tasks: &[ProjectTask]) {
    for task in tasks {
        println!(
            "{}  [{}] {} ({}){}",
            task.id,
            task.status,
            task.title,
            task.priority,
            task.annotation_task_id
                .as_deref()
                .map(|id| format!(" ← annotation {id}"))
                .unwrap_or_default()
        );
    }
    println!("{} task(s)", tasks.len());
}

#[tokio::main]
async fn main() -> Result<()> {
    let args: Vec<String> = std::env::args().skip(1).collect();
    let command: Vec<&str> = args.iter().map(String::as_str).collect();

    if let ["init-config", rest @ ..] = command.as_slice() {
        let path = match rest.first() {
            Some(path) => PathBuf::from(*path),
            None => Config::get_default_config_path()?,
        };
        Config::generate_default_config(&path)?;
        println!("Wrote {}", path.display());
        return Ok(());
    }

    let config = Config::load().context("Failed to load configuration")?;
    let context = AppContext::initialize(config).await?;
    let sync_service = &context.sync_service;

    match command.as_slice() {
        ["sync", project_id] => {
            let tasks = sync_service.sync_photo_tasks_for_project(project_id).await?;
            print_tasks(&tasks);
        }
        ["sync-photo", photo_id, project_id] => {
            let tasks = sync_service.sync_all_photo_tasks(photo_id, project_id).await?;
            print_tasks(&tasks);
        }
        ["complete", task_id] => {
            let task = sync_service.update_task_completion(task_id, true).await?;
            print_tasks(&[task]);
        }
        ["complete", task_id, completed] => {
            let completed: bool = completed
                .parse()
                .with_context(|| format!("Expected true or false, got '{completed}'"))?;
            let task = sync_service.update_task_completion(task_id, completed).await?;
            print_tasks(&[task]);
        }
        _ => {
            eprintln!("{USAGE}");
            std::process::exit(2);
        }
    }

    Ok(())
}
