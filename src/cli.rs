use std::io::Write as _;
use std::path::PathBuf;
use std::sync::Arc;

use crate::catalog::export::export_markdown;
use crate::catalog::filter::{FilterCriteria, RegionFilter};
use crate::catalog::group::GroupMode;
use crate::catalog::loader::fetch_dataset;
use crate::catalog::pipeline::RenderOutput;
use crate::catalog::validate::validate_dataset_file;
use crate::catalog::Catalog;
use crate::config::AppConfig;
use crate::offline::{
    AssetManifest, DiskCacheStorage, HttpNetwork, InstallPolicy, OfflineCacheController,
};
use crate::server;

const USAGE: &str =
    "usage: alphalist <serve|query|regions|locations|export|validate|mirror|fetch>";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Command {
    Serve,
    Query,
    Regions,
    Locations,
    Export,
    Validate,
    Mirror,
    Fetch,
}

pub fn parse_command(args: &[String]) -> Option<Command> {
    match args.get(1).map(String::as_str) {
        Some("serve") => Some(Command::Serve),
        Some("query") => Some(Command::Query),
        Some("regions") => Some(Command::Regions),
        Some("locations") => Some(Command::Locations),
        Some("export") => Some(Command::Export),
        Some("validate") => Some(Command::Validate),
        Some("mirror") => Some(Command::Mirror),
        Some("fetch") => Some(Command::Fetch),
        _ => None,
    }
}

pub fn run_with_args(args: &[String]) -> i32 {
    let config = AppConfig::from_env();
    match parse_command(args) {
        Some(Command::Serve) => handle_serve(config),
        Some(Command::Query) => handle_query(args, &config),
        Some(Command::Regions) => handle_regions(args, &config),
        Some(Command::Locations) => handle_locations(args, &config),
        Some(Command::Export) => handle_export(args, &config),
        Some(Command::Validate) => handle_validate(args, &config),
        Some(Command::Mirror) => handle_mirror(args, &config),
        Some(Command::Fetch) => handle_fetch(args, &config),
        None => {
            eprintln!("{USAGE}");
            2
        }
    }
}

/// Value following `--name`, if any.
fn flag_value<'a>(args: &'a [String], name: &str) -> Option<&'a str> {
    args.iter()
        .position(|arg| arg == name)
        .and_then(|index| args.get(index + 1))
        .map(String::as_str)
}

fn has_flag(args: &[String], name: &str) -> bool {
    args.iter().any(|arg| arg == name)
}

/// Arguments after the command that are neither flags nor flag values.
fn positionals(args: &[String]) -> Vec<&str> {
    const VALUE_FLAGS: &[&str] =
        &["--search", "--region", "--location", "--data", "--url", "--origin"];
    let mut out = Vec::new();
    let mut skip_next = false;
    for arg in args.iter().skip(2) {
        if skip_next {
            skip_next = false;
            continue;
        }
        if VALUE_FLAGS.contains(&arg.as_str()) {
            skip_next = true;
            continue;
        }
        if arg.starts_with("--") {
            continue;
        }
        out.push(arg.as_str());
    }
    out
}

/// `--url` fetches the dataset over HTTP (cache-busted); otherwise `--data` or the configured
/// path is read from disk.
fn load_catalog(args: &[String], config: &AppConfig) -> Option<Arc<Catalog>> {
    if let Some(url) = flag_value(args, "--url") {
        return match block_on(fetch_dataset(url)) {
            Ok(Ok(dataset)) => Some(Arc::new(Catalog::from_dataset(dataset))),
            Ok(Err(err)) => {
                eprintln!("catalog error: {err}");
                None
            }
            Err(err) => {
                eprintln!("runtime error: {err}");
                None
            }
        };
    }

    let path = flag_value(args, "--data")
        .map(PathBuf::from)
        .unwrap_or_else(|| config.data_path.clone());
    match Catalog::load(&path) {
        Ok(catalog) => Some(catalog),
        Err(err) => {
            eprintln!("catalog error: {err}");
            None
        }
    }
}

fn print_json<T: serde::Serialize>(value: &T) -> i32 {
    match serde_json::to_string_pretty(value) {
        Ok(payload) => {
            println!("{payload}");
            0
        }
        Err(err) => {
            eprintln!("failed to serialize output: {err}");
            1
        }
    }
}

fn handle_serve(config: AppConfig) -> i32 {
    match server::run_server(config) {
        Ok(()) => 0,
        Err(err) => {
            eprintln!("server error: {err}");
            1
        }
    }
}

fn handle_query(args: &[String], config: &AppConfig) -> i32 {
    let Some(catalog) = load_catalog(args, config) else {
        return 1;
    };
    let criteria = FilterCriteria::new(
        flag_value(args, "--search").unwrap_or(""),
        flag_value(args, "--region").unwrap_or(""),
        flag_value(args, "--location").unwrap_or(""),
    );
    let mode = if has_flag(args, "--by-name") {
        GroupMode::ByName
    } else {
        GroupMode::ByLocation
    };

    let output = catalog.render(&criteria, mode);
    if has_flag(args, "--table") {
        print_table(&output);
        0
    } else {
        print_json(&output)
    }
}

fn print_table(output: &RenderOutput) {
    match output {
        RenderOutput::Empty { message } => println!("{message}"),
        RenderOutput::Groups { groups, .. } => {
            println!("group\ttitle\tlocation\tmoves");
            for group in groups {
                for record in &group.records {
                    println!(
                        "{}\t{}\t{}\t{}",
                        group.key,
                        record.title,
                        record.location.to_text(),
                        record.moveset_items.join(", ")
                    );
                }
            }
        }
    }
}

fn handle_regions(args: &[String], config: &AppConfig) -> i32 {
    let Some(catalog) = load_catalog(args, config) else {
        return 1;
    };
    for region in catalog.regions() {
        println!("{region}");
    }
    0
}

fn handle_locations(args: &[String], config: &AppConfig) -> i32 {
    let Some(catalog) = load_catalog(args, config) else {
        return 1;
    };
    let region = RegionFilter::parse(flag_value(args, "--region").unwrap_or(""));
    for option in catalog.location_options(&region) {
        println!("{}", option.label);
    }
    0
}

fn handle_export(args: &[String], config: &AppConfig) -> i32 {
    let positional = positionals(args);
    let [region, location, name, ..] = positional.as_slice() else {
        eprintln!("usage: alphalist export <region> <location> <name> [--data <path> | --url <dataset-url>]");
        return 2;
    };
    let Some(catalog) = load_catalog(args, config) else {
        return 1;
    };
    match catalog.find(region, location, name) {
        Some(record) => {
            println!("{}", export_markdown(&record.data, chrono::Utc::now()));
            0
        }
        None => {
            eprintln!("no entry named '{name}' at {region} - {location}");
            1
        }
    }
}

fn handle_validate(args: &[String], config: &AppConfig) -> i32 {
    let path = positionals(args)
        .first()
        .map(|path| path.to_string())
        .unwrap_or_else(|| config.data_path.display().to_string());

    match validate_dataset_file(&path) {
        Ok(report) => {
            for diagnostic in &report.diagnostics {
                eprintln!("- {diagnostic}");
            }
            if report.has_errors() {
                eprintln!("validation failed: {} issue(s)", report.diagnostics.len());
                1
            } else {
                println!(
                    "validation passed: {path} ({} entries, {} note(s))",
                    report.entries_checked,
                    report.diagnostics.len()
                );
                0
            }
        }
        Err(err) => {
            eprintln!("validation failed: {err}");
            1
        }
    }
}

fn offline_controller(
    config: &AppConfig,
    origin: &str,
) -> OfflineCacheController<DiskCacheStorage, HttpNetwork> {
    OfflineCacheController::new(
        &config.cache_version,
        AssetManifest::standard(&config.base_path),
        DiskCacheStorage::new(&config.cache_dir),
        HttpNetwork::new(origin),
    )
}

fn block_on<F: std::future::Future>(future: F) -> Result<F::Output, std::io::Error> {
    Ok(tokio::runtime::Runtime::new()?.block_on(future))
}

fn handle_mirror(args: &[String], config: &AppConfig) -> i32 {
    let Some(origin) = positionals(args).first().copied() else {
        eprintln!("usage: alphalist mirror <origin-url> [--best-effort]");
        return 2;
    };
    let policy = if has_flag(args, "--best-effort") {
        InstallPolicy::BestEffort
    } else {
        InstallPolicy::Atomic
    };
    let controller = offline_controller(config, origin).with_policy(policy);

    let result = block_on(async {
        let installed = controller.install().await?;
        let activated = controller.activate()?;
        Ok::<_, crate::offline::OfflineError>((installed, activated))
    });
    match result {
        Ok(Ok((installed, activated))) => print_json(&serde_json::json!({
            "install": installed,
            "activate": activated,
        })),
        Ok(Err(err)) => {
            eprintln!("mirror failed: {err}");
            1
        }
        Err(err) => {
            eprintln!("runtime error: {err}");
            1
        }
    }
}

fn handle_fetch(args: &[String], config: &AppConfig) -> i32 {
    let Some(url) = positionals(args).first().copied() else {
        eprintln!("usage: alphalist fetch <url-or-path> [--origin <url>]");
        return 2;
    };
    let origin = flag_value(args, "--origin").unwrap_or("http://127.0.0.1:3000");
    let controller = offline_controller(config, origin);

    match block_on(controller.fetch(url)) {
        Ok(Ok(response)) => {
            let mut stdout = std::io::stdout();
            if let Err(err) = stdout.write_all(&response.body).and_then(|()| stdout.flush()) {
                eprintln!("failed to write response: {err}");
                return 1;
            }
            0
        }
        Ok(Err(err)) => {
            eprintln!("fetch failed: {err}");
            1
        }
        Err(err) => {
            eprintln!("runtime error: {err}");
            1
        }
    }
}
