use anyhow::Result;
use chrono::NaiveDateTime;
use serde_json::{json, Value};

use opsdeck_app_core::DashState;
use opsdeck_core::{Command, Group, ParamType, Status};
use opsdeck_net::wire::{self, LogsResponse};

fn status_label(status: Status) -> &'static str {
    match status {
        Status::None => "",
        Status::Applied => "applied",
        Status::Running => "running",
        Status::Todo => "todo",
        Status::Failed => "failed",
        Status::Unknown => "unknown",
    }
}

fn param_type_label(kind: ParamType) -> &'static str {
    match kind {
        ParamType::Bool => "bool",
        ParamType::String => "string",
        ParamType::Text => "text",
        ParamType::Filepath => "filepath",
        ParamType::Username => "username",
        ParamType::StringArray => "[string]",
        ParamType::Unknown => "?",
    }
}

fn render_log(entry: &Value) -> String {
    let Some(record) = entry.as_object() else {
        return entry.to_string();
    };
    let ts = record.get("ts").and_then(Value::as_str).unwrap_or("");
    let when = NaiveDateTime::parse_from_str(ts, "%Y-%m-%dT%H:%M:%S")
        .map(|t| t.format("%Y-%m-%d %H:%M:%S").to_string())
        .unwrap_or_else(|_| ts.to_string());
    let msg = record.get("msg").and_then(Value::as_str).unwrap_or("");
    match record.get("st").and_then(Value::as_str) {
        Some(st) if !st.is_empty() => format!("{when}  [{st}] {msg}"),
        _ => format!("{when}  {msg}"),
    }
}

fn print_group(group: &Group) {
    println!(
        "{} [{}] ({})",
        group.name,
        status_label(group.status),
        group.id
    );
    for instruction in &group.instructions {
        if instruction.info.is_empty() {
            println!(
                "   {} [{}]",
                instruction.command,
                status_label(instruction.status)
            );
        } else {
            println!(
                "   {} [{}] - {}",
                instruction.command,
                status_label(instruction.status),
                instruction.info
            );
        }
    }
}

pub async fn cmd_groups(url: &str) -> Result<()> {
    let session = crate::connect(url)?;
    let data = session.handle.request(wire::GROUPS, None).await?;
    let groups: Vec<Group> = serde_json::from_value(data)?;

    if groups.is_empty() {
        println!(":: No groups configured");
    }
    for group in &groups {
        print_group(group);
    }

    session.handle.close();
    Ok(())
}

pub async fn cmd_commands(url: &str) -> Result<()> {
    let session = crate::connect(url)?;
    let data = session.handle.request(wire::COMMANDS, None).await?;
    let commands: Vec<Command> = serde_json::from_value(data)?;

    for command in &commands {
        println!("{} - {}", command.name, command.description);
        for param in &command.parameters {
            println!("   {}: {}", param.id, param_type_label(param.kind));
        }
    }

    session.handle.close();
    Ok(())
}

/// Print the most recent log page, or with `all` keep paging backwards
/// until the server reports the start of the log.
pub async fn cmd_logs(url: &str, all: bool) -> Result<()> {
    let session = crate::connect(url)?;

    // Newest-first, like the mirrored state.
    let mut logs: Vec<Value> = Vec::new();
    let mut reached_the_end = false;
    loop {
        let data = if logs.is_empty() {
            session.handle.request(wire::LOGS, None).await?
        } else {
            session
                .handle
                .request(wire::LOGS, Some(json!({ "offset": logs.len() })))
                .await?
        };
        let page: LogsResponse = serde_json::from_value(data)?;
        let got = page.logs.len();
        logs.extend(page.logs.into_iter().rev());
        reached_the_end = page.reached_the_end;
        if !all || reached_the_end || got == 0 {
            break;
        }
    }

    for entry in logs.iter().rev() {
        println!("{}", render_log(entry));
    }
    if reached_the_end {
        println!(":: Start of log reached");
    }

    session.handle.close();
    Ok(())
}

pub async fn cmd_users(url: &str) -> Result<()> {
    let session = crate::connect(url)?;
    let data = session.handle.request(wire::USERS, None).await?;
    let users: Vec<Value> = serde_json::from_value(data)?;

    for user in &users {
        println!("{user}");
    }

    session.handle.close();
    Ok(())
}

pub async fn cmd_variables(url: &str) -> Result<()> {
    let session = crate::connect(url)?;
    let data = session.handle.request(wire::GLOBAL_VARIABLES, None).await?;
    let variables: Vec<Value> = serde_json::from_value(data)?;

    for variable in &variables {
        println!("{variable}");
    }

    session.handle.close();
    Ok(())
}

pub async fn cmd_apply_group(url: &str, id: String) -> Result<()> {
    let session = crate::connect(url)?;
    session
        .handle
        .emit(wire::APPLY_GROUP, Value::String(id.clone()))
        .await?;
    println!(":: Requested execution of group {id}");
    session.handle.close();
    Ok(())
}

pub async fn cmd_apply_instruction(url: &str, id: String) -> Result<()> {
    let session = crate::connect(url)?;
    session
        .handle
        .emit(wire::APPLY_INSTRUCTION, Value::String(id.clone()))
        .await?;
    println!(":: Requested execution of instruction {id}");
    session.handle.close();
    Ok(())
}

/// Stay connected and stream state changes until interrupted.
pub async fn cmd_watch(url: &str) -> Result<()> {
    let mut session = crate::connect(url)?;
    let store = session.kernel.store.clone();
    let handle = session.handle.clone();

    let printer = tokio::spawn(async move {
        let mut rx = store.subscribe();
        let mut last = store.state();
        while rx.changed().await.is_ok() {
            let state = store.state();
            report_changes(&last, &state);
            last = state;
        }
    });

    tokio::spawn(async move {
        let _ = tokio::signal::ctrl_c().await;
        handle.close();
    });

    println!(":: Watching {url} (ctrl-c to stop)");
    session.kernel.run().await;
    printer.abort();
    Ok(())
}

fn report_changes(prev: &DashState, next: &DashState) {
    if next.epoch != prev.epoch {
        println!(":: Connected, resyncing");
    }
    if next.reconnecting && !prev.reconnecting {
        println!(":: Connection lost, reconnecting...");
    }

    if next.groups != prev.groups {
        for group in &next.groups {
            print_group(group);
        }
    }

    let new_entries = next.logs.len().saturating_sub(prev.logs.len());
    if new_entries > 0 && next.logs[new_entries..] == prev.logs[..] {
        for entry in next.logs[..new_entries].iter().rev() {
            println!("{}", render_log(entry));
        }
    } else if next.logs != prev.logs {
        println!(":: Log resynced ({} entries)", next.logs.len());
    }
}
