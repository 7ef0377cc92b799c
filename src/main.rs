mod config;
mod gcloud;

use anyhow::{Context as _, Result};
use clap::{Parser, ValueEnum};
use config::{Config, OutputFormat};
use dm_dashboard::{generate_config, Context, DeploymentConfig};
use serde_json::Value;
use std::path::PathBuf;
use tracing::Level;
use tracing_subscriber::fmt::writer::MakeWriterExt;

/// Generate Deployment Manager resources for a Cloud Monitoring dashboard
#[derive(Parser, Debug)]
#[command(name = "dm-dashboard", version, about, long_about = None)]
struct Args {
    /// Deployment context document (YAML or JSON with `properties` and `env`)
    #[arg(short, long)]
    context: Option<PathBuf>,

    /// Dashboard JSON file (sets `properties.config_file`)
    #[arg(short = 'f', long)]
    config_file: Option<PathBuf>,

    /// GCP project hosting the dashboard (sets `properties.project`)
    #[arg(short, long)]
    project: Option<String>,

    /// Value reported in the `project_id` output (sets `properties.projectId`)
    #[arg(long)]
    project_id: Option<String>,

    /// Deployment name used to name the resources (sets `env.name`)
    #[arg(short = 'n', long)]
    env_name: Option<String>,

    /// Extra template property, KEY=VALUE; VALUE is parsed as JSON when possible
    #[arg(long = "property", value_name = "KEY=VALUE", value_parser = parse_property)]
    properties: Vec<(String, Value)>,

    /// Output format
    #[arg(long, value_enum)]
    format: Option<OutputFormat>,

    /// Write the result to a file instead of stdout
    #[arg(short, long)]
    output: Option<PathBuf>,

    /// Remember the effective project and format for later runs
    #[arg(long)]
    save_defaults: bool,

    /// Log level for debugging
    #[arg(long, value_enum, default_value = "off")]
    log_level: LogLevel,
}

#[derive(Debug, Clone, Copy, ValueEnum)]
enum LogLevel {
    Off,
    Error,
    Warn,
    Info,
    Debug,
    Trace,
}

impl LogLevel {
    fn to_tracing_level(self) -> Option<Level> {
        match self {
            LogLevel::Off => None,
            LogLevel::Error => Some(Level::ERROR),
            LogLevel::Warn => Some(Level::WARN),
            LogLevel::Info => Some(Level::INFO),
            LogLevel::Debug => Some(Level::DEBUG),
            LogLevel::Trace => Some(Level::TRACE),
        }
    }
}

fn parse_property(raw: &str) -> Result<(String, Value), String> {
    let (key, value) = raw
        .split_once('=')
        .ok_or_else(|| format!("expected KEY=VALUE, got `{}`", raw))?;
    if key.is_empty() {
        return Err(format!("empty property name in `{}`", raw));
    }
    let value = serde_json::from_str(value).unwrap_or_else(|_| Value::String(value.to_string()));
    Ok((key.to_string(), value))
}

fn setup_logging(level: LogLevel) -> Option<tracing_appender::non_blocking::WorkerGuard> {
    let tracing_level = level.to_tracing_level()?;

    let log_path = get_log_path();

    if let Some(parent) = log_path.parent() {
        let _ = std::fs::create_dir_all(parent);
    }

    let file = match std::fs::OpenOptions::new()
        .create(true)
        .append(true)
        .open(&log_path)
    {
        Ok(file) => file,
        Err(e) => {
            eprintln!("Cannot open log file {:?}: {}", log_path, e);
            return None;
        }
    };

    let (non_blocking, guard) = tracing_appender::non_blocking(file);

    tracing_subscriber::fmt()
        .with_max_level(tracing_level)
        .with_writer(non_blocking.with_max_level(tracing_level))
        .with_ansi(false)
        .with_target(true)
        .with_thread_ids(false)
        .with_file(true)
        .with_line_number(true)
        .init();

    tracing::info!("dm-dashboard started with log level: {:?}", level);
    tracing::info!("Log file: {:?}", log_path);

    Some(guard)
}

fn get_log_path() -> PathBuf {
    if let Some(config_dir) = dirs::config_dir() {
        return config_dir.join("dm-dashboard").join("dm-dashboard.log");
    }
    if let Some(home) = dirs::home_dir() {
        return home.join(".dm-dashboard").join("dm-dashboard.log");
    }
    PathBuf::from("dm-dashboard.log")
}

/// Context document first, then flags on top, then configured defaults for gaps
fn build_context(args: &Args, config: &Config) -> Result<Context> {
    let mut context = match &args.context {
        Some(path) => Context::load(path)?,
        None => Context::new(),
    };

    if let Some(file) = &args.config_file {
        context.set_property("config_file", file.to_string_lossy().to_string());
    }
    if let Some(project) = &args.project {
        context.set_property("project", project.as_str());
    }
    if let Some(project_id) = &args.project_id {
        context.set_property("projectId", project_id.as_str());
    }
    if let Some(name) = &args.env_name {
        context.set_env("name", name.as_str());
    }
    for (key, value) in &args.properties {
        context.set_property(key, value.clone());
    }

    if context.property("project").is_none() && context.env_value("project").is_none() {
        if let Some(project) = config.effective_project() {
            tracing::info!("Using default project: {}", project);
            context.set_env("project", project);
        }
    }

    Ok(context)
}

/// Rebuild a JSON tree as YAML. Numbers go through their text form since
/// arbitrary-precision JSON numbers do not serialize natively into YAML.
fn to_yaml_value(value: &Value) -> serde_yaml::Value {
    match value {
        Value::Null => serde_yaml::Value::Null,
        Value::Bool(b) => serde_yaml::Value::Bool(*b),
        Value::String(s) => serde_yaml::Value::String(s.clone()),
        Value::Number(n) => {
            if let Some(u) = n.as_u64() {
                serde_yaml::Value::Number(u.into())
            } else if let Some(i) = n.as_i64() {
                serde_yaml::Value::Number(i.into())
            } else {
                let text = n.to_string();
                if !text.contains(['.', 'e', 'E']) {
                    tracing::warn!("Integer {} exceeds 64 bits; YAML output rounds it", text);
                }
                serde_yaml::Value::Number(n.as_f64().unwrap_or(f64::NAN).into())
            }
        }
        Value::Array(items) => {
            serde_yaml::Value::Sequence(items.iter().map(to_yaml_value).collect())
        }
        Value::Object(map) => serde_yaml::Value::Mapping(
            map.iter()
                .map(|(k, v)| (serde_yaml::Value::String(k.clone()), to_yaml_value(v)))
                .collect(),
        ),
    }
}

fn render(config: &DeploymentConfig, format: OutputFormat) -> Result<String> {
    Ok(match format {
        OutputFormat::Yaml => {
            serde_yaml::to_string(&to_yaml_value(&serde_json::to_value(config)?))?
        }
        OutputFormat::Json => {
            let mut json = serde_json::to_string_pretty(config)?;
            json.push('\n');
            json
        }
    })
}

fn main() -> Result<()> {
    let args = Args::parse();

    let _log_guard = setup_logging(args.log_level);

    let mut config = Config::load();
    let context = build_context(&args, &config)?;
    let format = args.format.unwrap_or_else(|| config.effective_format());

    let deployment = generate_config(&context).context("Failed to generate dashboard resources")?;
    let rendered = render(&deployment, format)?;

    match &args.output {
        Some(path) => {
            std::fs::write(path, &rendered)
                .with_context(|| format!("Failed to write {}", path.display()))?;
            tracing::info!("Wrote {} resources to {:?}", deployment.resources.len(), path);
        }
        None => print!("{}", rendered),
    }

    if args.save_defaults {
        config.project = context.project_id().ok();
        config.format = Some(format);
        config.save().context("Failed to save defaults")?;
    }

    Ok(())
}
