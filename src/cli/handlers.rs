use std::env;
use std::fs;
use std::io::{self, BufRead};
use std::path::{Path, PathBuf};

use chrono::{Datelike, Utc};
use tracing_subscriber::EnvFilter;

use crate::app::App;
use crate::config::Config;
use crate::entity::CartType;
use crate::error::{CodeCartError, Result};
use crate::gate::{self, AccessGate, PasscodeVerifier, Session};
use crate::repository::Inventory;
use crate::status::{self, worst_status, ExpirationStatus};
use crate::storage::FileStorage;
use crate::view::{self, FormMode, ItemForm, Palette};

use super::{AddArgs, EditArgs};

const CODECART_DIR: &str = ".codecart";

/// Environment variable holding the log filter.
pub const LOG_ENV: &str = "CODECART_LOG";

type CliApp = App<FileStorage, FileStorage>;

/// Send `tracing` output to stderr, filtered by `CODECART_LOG` (default `warn`).
pub fn init_logging() {
    let filter = EnvFilter::try_from_env(LOG_ENV).unwrap_or_else(|_| EnvFilter::new("warn"));
    let _ = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(io::stderr)
        .with_target(false)
        .try_init();
}

/// Find the tracker directory by walking up from the current directory.
fn find_data_dir() -> Result<PathBuf> {
    let cwd = env::current_dir()?;

    let mut current = cwd.as_path();
    loop {
        let candidate = current.join(CODECART_DIR);
        if candidate.is_dir() {
            return Ok(candidate);
        }
        match current.parent() {
            Some(parent) => current = parent,
            None => return Err(CodeCartError::NotInitialized),
        }
    }
}

fn open_app(data_dir: &Path, session: &Session) -> Result<(CliApp, Config)> {
    let config = Config::load(data_dir);
    let inventory = Inventory::load(FileStorage::open(data_dir)?, status::today(), Utc::now())?;
    let store = gate::session_storage(data_dir, &session.id)?;
    let app = App::new(inventory, AccessGate::open(store, session.stamp.clone()), &config);
    Ok((app, config))
}

/// Open the tracker and refuse to go further while it is locked.
fn open_unlocked() -> Result<CliApp> {
    let data_dir = find_data_dir()?;
    let (app, _) = open_app(&data_dir, &Session::current())?;
    app.require_unlocked()?;
    Ok(app)
}

pub fn handle_init(passcode: Option<String>) -> Result<()> {
    let root = env::current_dir()?;
    let data_dir = root.join(CODECART_DIR);

    if data_dir.exists() {
        return Err(CodeCartError::AlreadyInitialized);
    }
    fs::create_dir_all(&data_dir)?;

    let config = Config {
        passcode: passcode.unwrap_or_default(),
        ..Config::default()
    };
    config.save(&data_dir)?;

    println!("Initialized codecart tracker in {}", root.display());
    if config.passcode.is_empty() {
        println!(
            "  No passcode set. Add one to {}/config.yaml or set CODECART_PASSCODE.",
            CODECART_DIR
        );
    }

    Ok(())
}

pub fn handle_unlock(passcode: Option<String>) -> Result<()> {
    let data_dir = find_data_dir()?;
    let session = Session::current();
    let (mut app, config) = open_app(&data_dir, &session)?;

    if app.gate().is_unlocked() {
        println!("Already unlocked.");
        return Ok(());
    }

    let secret = match passcode {
        Some(p) => p,
        None => {
            eprint!("Passcode: ");
            let mut line = String::new();
            io::stdin().lock().read_line(&mut line)?;
            line.trim_end_matches(['\r', '\n']).to_string()
        }
    };

    let verifier = PasscodeVerifier::new(config.passcode);
    if !app.unlock(&secret, &verifier)? {
        return Err(CodeCartError::IncorrectPasscode);
    }

    match gate::prune_stale_sessions(&data_dir, &session.id) {
        Ok(0) => {}
        Ok(n) => tracing::debug!(removed = n, "pruned stale sessions"),
        Err(e) => tracing::warn!(error = %e, "could not prune stale sessions"),
    }

    println!("Unlocked.");
    Ok(())
}

pub fn handle_lock() -> Result<()> {
    let data_dir = find_data_dir()?;
    let (mut app, _) = open_app(&data_dir, &Session::current())?;
    app.lock()?;
    println!("Locked.");
    Ok(())
}

pub fn handle_list(status_filter: Option<String>, json: bool) -> Result<()> {
    let app = open_unlocked()?;
    let today = status::today();
    let thresholds = *app.thresholds();

    let filter: Option<ExpirationStatus> = status_filter
        .map(|s| s.parse().map_err(CodeCartError::Validation))
        .transpose()?;

    let items: Vec<_> = app
        .items()
        .iter()
        .filter(|item| filter.map_or(true, |f| worst_status(item, today, &thresholds) == f))
        .cloned()
        .collect();

    if json {
        println!("{}", serde_json::to_string_pretty(&items)?);
        return Ok(());
    }

    println!("{}", view::header());
    print!(
        "{}",
        view::render_list(&items, today, &thresholds, Palette::detect())
    );
    println!("{}", view::render_summary(&items, today, &thresholds));
    println!("{}", view::footer(today.year()));

    Ok(())
}

pub fn handle_get(id: String, json: bool) -> Result<()> {
    let app = open_unlocked()?;
    let item = app.inventory().find(&id)?;

    if json {
        println!("{}", serde_json::to_string_pretty(item)?);
    } else {
        let today = status::today();
        let palette = Palette::detect();
        let thresholds = app.thresholds();
        let d = &item.data;
        println!("{} ({})", d.identifier, item.id);
        println!("Type: {}", d.cart_type);
        println!("Location: {}", d.location);
        println!("Checked by: {}", d.employee_initials);
        println!(
            "Drugs expire: {}",
            view::badge(d.drug_expiration_date, today, thresholds, palette)
        );
        println!(
            "Supplies expire: {}",
            view::badge(d.supply_expiration_date, today, thresholds, palette)
        );
        println!("Entered: {}", item.created_at.format("%Y-%m-%d %H:%M"));
    }

    Ok(())
}

fn parse_cart_type(s: &str) -> Result<CartType> {
    s.parse().map_err(CodeCartError::Validation)
}

pub fn handle_add(args: AddArgs) -> Result<()> {
    let mut app = open_unlocked()?;

    app.open_modal(FormMode::Add, None);
    let mut form = app.modal().form();
    form.identifier = args.identifier;
    form.cart_type = parse_cart_type(&args.cart_type)?;
    form.location = args.location;
    form.employee_initials = args.initials;
    form.drug_expiration_date = args.drug_exp.unwrap_or_default();
    form.supply_expiration_date = args.supply_exp.unwrap_or_default();

    let data = form.validate()?;
    let item = app
        .save_item(data)?
        .ok_or_else(|| CodeCartError::ItemNotFound("new item".to_string()))?;

    if args.json {
        println!("{}", serde_json::to_string_pretty(&item)?);
    } else {
        println!(
            "Added {} ({}) - {} @ {}",
            item.data.cart_type,
            item.short_id(),
            item.data.identifier,
            item.data.location
        );
    }

    Ok(())
}

pub fn handle_edit(args: EditArgs) -> Result<()> {
    let mut app = open_unlocked()?;
    let item = app.inventory().find(&args.id)?.clone();

    app.open_modal(FormMode::Edit, Some(item));
    let mut form: ItemForm = app.modal().form();
    if let Some(identifier) = args.identifier {
        form.identifier = identifier;
    }
    if let Some(cart_type) = args.cart_type {
        form.cart_type = parse_cart_type(&cart_type)?;
    }
    if let Some(location) = args.location {
        form.location = location;
    }
    if let Some(initials) = args.initials {
        form.employee_initials = initials;
    }
    if args.clear_drug_exp {
        form.drug_expiration_date.clear();
    } else if let Some(date) = args.drug_exp {
        form.drug_expiration_date = date;
    }
    if args.clear_supply_exp {
        form.supply_expiration_date.clear();
    } else if let Some(date) = args.supply_exp {
        form.supply_expiration_date = date;
    }

    let data = form.validate()?;
    let updated = app
        .save_item(data)?
        .ok_or_else(|| CodeCartError::ItemNotFound(args.id.clone()))?;

    if args.json {
        println!("{}", serde_json::to_string_pretty(&updated)?);
    } else {
        println!(
            "Updated {} ({}) - {} @ {}",
            updated.data.cart_type,
            updated.short_id(),
            updated.data.identifier,
            updated.data.location
        );
    }

    Ok(())
}

pub fn handle_delete(id: String, force: bool) -> Result<()> {
    let mut app = open_unlocked()?;
    let target = app.resolve(&id)?;
    let token = app.request_delete(&target)?;

    if !force {
        if let Some(item) = app.inventory().get(&target) {
            eprintln!(
                "Delete {} ({}) - {}? This cannot be undone. [y/N] ",
                item.data.cart_type,
                item.short_id(),
                item.data.identifier
            );
        }

        if atty::is(atty::Stream::Stdin) {
            let mut input = String::new();
            io::stdin().read_line(&mut input)?;
            if !input.trim().eq_ignore_ascii_case("y") {
                println!("Cancelled.");
                return Ok(());
            }
        } else {
            return Err(CodeCartError::Validation(
                "Use --force to delete in non-interactive mode".to_string(),
            ));
        }
    }

    match app.confirm_delete(token)? {
        Some(removed) => {
            println!(
                "Deleted {} ({}) - {}",
                removed.data.cart_type,
                removed.short_id(),
                removed.data.identifier
            );
            Ok(())
        }
        None => Err(CodeCartError::ItemNotFound(id)),
    }
}

pub fn handle_status(date: String) -> Result<()> {
    let parsed = status::parse_date(&date).ok_or_else(|| {
        CodeCartError::Validation(format!("'{}' is not a date (expected YYYY-MM-DD)", date))
    })?;

    let config = find_data_dir()
        .map(|dir| Config::load(&dir))
        .unwrap_or_default();
    let today = status::today();

    println!(
        "{}",
        view::badge(Some(parsed), today, &config.thresholds, Palette::detect())
    );
    Ok(())
}
