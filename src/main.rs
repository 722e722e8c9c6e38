mod cli;

use anyhow::{bail, Context, Result};
use chrono::Local;
use clap::Parser;
use cli::{BalanceArgs, Cli, Commands, ComputeArgs, ObservationArgs};
use dialoguer::Confirm;
use et0ops::config::{Config, SiteConfig};
use et0ops::formulas::{BuiltinLibrary, FormulaLibrary};
use et0ops::logic::aggregator::{resolve_selection, select, summarize};
use et0ops::logic::dispatcher::distinct_method_ids;
use et0ops::logic::{FormulaDispatcher, MethodRegistry, WaterBalanceCalculator};
use et0ops::models::{CurrentDepthMode, MethodCategory, ObservationSet};
use et0ops::render;
use std::sync::Arc;
use tracing_subscriber::EnvFilter;

#[tokio::main]
async fn main() -> Result<()> {
    // Load .env file if present
    let _ = dotenvy::dotenv();

    let cli = Cli::parse();

    let default_level = match cli.verbose {
        0 => "warn",
        1 => "debug",
        _ => "trace",
    };
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level)),
        )
        .with_writer(std::io::stderr)
        .init();

    if let Commands::Init = cli.command {
        Config::setup_interactive().context("Interactive setup failed")?;
        return Ok(());
    }

    let config = Config::load(cli.config.clone()).context("Failed to load configuration")?;

    match cli.command {
        Commands::Methods { category } => run_methods(category.as_deref()),
        Commands::Compute(args) => run_compute(args, &config).await,
        Commands::Balance(args) => run_balance(args, &config),
        Commands::Check => run_check(&config),
        Commands::Init => Ok(()),
    }
}

fn connect(config: &Config) -> Result<FormulaDispatcher> {
    let library: Arc<dyn FormulaLibrary> = Arc::new(BuiltinLibrary::new());
    let dispatcher =
        FormulaDispatcher::connect(library, MethodRegistry::new(), config.dispatch.settings())?;
    Ok(dispatcher)
}

fn observations_from(args: &ObservationArgs, site: &SiteConfig) -> ObservationSet {
    ObservationSet {
        t_min: args.t_min,
        t_max: args.t_max,
        rh_min: args.rh_min,
        rh_max: args.rh_max,
        rs: args.rs,
        uz: args.uz,
        z: args.z.or(site.elevation_m),
        lat: args.lat.or(site.latitude_deg),
        date: args.date,
    }
}

fn run_methods(category: Option<&str>) -> Result<()> {
    let only = match category {
        Some(name) => match MethodCategory::from_str(name) {
            Some(c) => Some(c),
            None => bail!(
                "Unknown category '{}'. Expected one of: {}",
                name,
                MethodCategory::ALL.map(|c| c.as_str()).join(", ")
            ),
        },
        None => None,
    };

    render::print_methods(&MethodRegistry::new(), only);
    Ok(())
}

async fn run_compute(args: ComputeArgs, config: &Config) -> Result<()> {
    let dispatcher = connect(config)?;

    let method_ids = if args.all {
        distinct_method_ids(&dispatcher.registry().ids())
    } else if !args.methods.is_empty() {
        distinct_method_ids(&args.methods)
    } else {
        distinct_method_ids(&config.dispatch.default_methods)
    };

    if method_ids.is_empty() {
        bail!("No methods selected. Use --methods, --all, or set dispatch.default_methods");
    }

    if dispatcher.requires_confirmation(method_ids.len()) && !args.yes {
        let proceed = Confirm::new()
            .with_prompt(format!(
                "Evaluate {} methods? This may take a while",
                method_ids.len()
            ))
            .default(true)
            .interact()
            .context("Confirmation prompt failed (use --yes to skip it)")?;
        if !proceed {
            println!("Cancelled.");
            return Ok(());
        }
    }

    let observations = observations_from(&args.observations, &config.site);
    let report = dispatcher.evaluate(&method_ids, &observations).await?;
    let summary = summarize(&report);

    let selected = resolve_selection(&report, args.select.as_deref());
    if let (Some(wanted), Some(got)) = (args.select.as_deref(), selected.as_deref()) {
        if wanted != got {
            tracing::warn!("'{}' has no value, using '{}' instead", wanted, got);
        }
    }

    let balance = match args.moisture {
        Some(moisture) => {
            let Some(id) = selected.as_deref() else {
                bail!("No method produced a value, cannot run the water balance");
            };
            let et0 = select(&report, id)?;
            let inputs = config.balance.inputs(moisture, args.precipitation);
            let calculator = WaterBalanceCalculator::new(config.balance.current_depth_mode);
            Some(calculator.compute(et0, &inputs)?)
        }
        None => None,
    };

    if args.json {
        let now = Local::now();
        let output = serde_json::json!({
            "summary": summary,
            "selected": selected,
            "records": report.export_records(now),
            "balance": balance.as_ref().map(|b| b.export_record(now)),
        });
        println!("{}", serde_json::to_string_pretty(&output)?);
        return Ok(());
    }

    render::print_report(&report, &summary, selected.as_deref());
    if let Some(balance) = &balance {
        render::print_balance(balance);
    }
    Ok(())
}

fn run_balance(args: BalanceArgs, config: &Config) -> Result<()> {
    let mode = match args.mode.as_deref() {
        Some(name) => CurrentDepthMode::from_str(name).with_context(|| {
            format!(
                "Unknown mode '{}'. Expected remaining_after_etc or deficit_surplus",
                name
            )
        })?,
        None => config.balance.current_depth_mode,
    };

    let inputs = config.balance.inputs(args.moisture, args.precipitation);
    let report = WaterBalanceCalculator::new(mode).compute(args.et0, &inputs)?;

    if args.json {
        let record = report.export_record(Local::now());
        println!("{}", serde_json::to_string_pretty(&record)?);
    } else {
        render::print_balance(&report);
    }
    Ok(())
}

fn run_check(config: &Config) -> Result<()> {
    println!("Configuration loaded.");
    println!("  Site: {}", config.site.name);
    println!(
        "  Dispatch: timeout {} ms, confirm above {} methods",
        config.dispatch.timeout_ms, config.dispatch.confirm_threshold
    );
    println!("  Balance mode: {}", config.balance.current_depth_mode);

    let dispatcher = connect(config).context("Formula library check failed")?;
    println!(
        "Formula library OK ({} methods catalogued)",
        dispatcher.registry().len()
    );

    let registry = dispatcher.registry();
    for id in &config.dispatch.default_methods {
        if let Err(e) = registry.describe(id) {
            println!("  warning: {}", e);
        }
    }
    Ok(())
}
