//! rfqdesk - command-line client for the RFQ marketplace.
//!
//! Subcommands:
//!   login               Sign in and persist the session
//!   logout              Sign out locally and notify the server
//!   me                  Show the signed-in user
//!   list [query]        List RFQs, optionally filtered by a search term
//!   detail <id>         Show one RFQ with whatever contact info is granted
//!   unlock <id>         Spend one unlock and show the revealed contact
//!   plans               List subscription plans
//!   profile [k=v ...]   Show the profile, or update the named fields

use std::io::{self, Write};

use anyhow::{bail, Context, Result};
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

use rfqdesk_core::api::{ApiClient, ApiError};
use rfqdesk_core::config::Config;
use rfqdesk_core::models::{ContactLevel, ProfileUpdate, RfqDetail};
use rfqdesk_core::state::{CatalogState, DetailState, SessionState};

/// Initialize the tracing subscriber for logging
fn init_tracing() {
    // Use RUST_LOG env var to control log level (e.g., RUST_LOG=debug)
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn"));

    tracing_subscriber::registry()
        .with(fmt::layer().with_writer(io::stderr))
        .with(filter)
        .init();
}

#[tokio::main]
async fn main() -> Result<()> {
    // Load .env file if present (silently ignore if not found)
    let _ = dotenvy::dotenv();
    init_tracing();

    let args: Vec<String> = std::env::args().collect();
    let command = args.get(1).map(String::as_str).unwrap_or("help");

    let client = ApiClient::new().context("Failed to build API client")?;

    match command {
        "login" => cmd_login(client).await,
        "logout" => cmd_logout(client).await,
        "me" => cmd_me(client).await,
        "list" => cmd_list(client, args.get(2).cloned()).await,
        "detail" => cmd_detail(client, required_arg(&args, 2, "detail <id>")?).await,
        "unlock" => cmd_unlock(client, required_arg(&args, 2, "unlock <id>")?).await,
        "plans" => cmd_plans(client).await,
        "profile" => cmd_profile(client, &args[2..]).await,
        "help" | "--help" | "-h" => {
            print_usage();
            Ok(())
        }
        other => {
            print_usage();
            bail!("Unknown command: {}", other);
        }
    }
}

fn required_arg<'a>(args: &'a [String], index: usize, usage: &str) -> Result<&'a str> {
    args.get(index)
        .map(String::as_str)
        .ok_or_else(|| anyhow::anyhow!("Usage: rfqdesk {}", usage))
}

fn print_usage() {
    eprintln!("Usage: rfqdesk <command>");
    eprintln!();
    eprintln!("Commands:");
    eprintln!("  login               Sign in and persist the session");
    eprintln!("  logout              Sign out locally and notify the server");
    eprintln!("  me                  Show the signed-in user");
    eprintln!("  list [query]        List RFQs, optionally filtered by a search term");
    eprintln!("  detail <id>         Show one RFQ with whatever contact info is granted");
    eprintln!("  unlock <id>         Spend one unlock and show the revealed contact");
    eprintln!("  plans               List subscription plans");
    eprintln!("  profile [k=v ...]   Show the profile, or update the named fields");
    eprintln!();
    eprintln!("Credentials can come from RFQDESK_EMAIL / RFQDESK_PASSWORD or a .env file.");
}

async fn cmd_login(client: ApiClient) -> Result<()> {
    let mut config = Config::load();

    let email = match std::env::var("RFQDESK_EMAIL") {
        Ok(email) if !email.is_empty() => email,
        _ => prompt_email(config.last_email.as_deref())?,
    };
    let password = match std::env::var("RFQDESK_PASSWORD") {
        Ok(password) if !password.is_empty() => password,
        _ => rpassword::prompt_password("Password: ").context("Failed to read password")?,
    };

    let mut session = SessionState::new(client);
    session.login(&email, &password).await?;

    if let Some(user) = session.user() {
        println!("Signed in as {}", user.display_name());
    }

    config.last_email = Some(email);
    if let Err(e) = config.save() {
        tracing::warn!(error = %e, "could not save config");
    }
    Ok(())
}

fn prompt_email(last: Option<&str>) -> Result<String> {
    match last {
        Some(last) => print!("Email [{}]: ", last),
        None => print!("Email: "),
    }
    io::stdout().flush()?;

    let mut input = String::new();
    io::stdin().read_line(&mut input)?;
    let input = input.trim();
    if !input.is_empty() {
        return Ok(input.to_string());
    }
    match last {
        Some(last) => Ok(last.to_string()),
        None => bail!("An email address is required"),
    }
}

async fn cmd_logout(client: ApiClient) -> Result<()> {
    let mut session = SessionState::new(client);
    session.logout().await;
    println!("Signed out");
    Ok(())
}

async fn cmd_me(client: ApiClient) -> Result<()> {
    let mut session = SessionState::new(client);
    session.check_auth().await;
    let Some(user) = session.user() else {
        bail!("Not signed in. Run `rfqdesk login` first.");
    };

    println!("{} <{}>", user.display_name(), user.email);
    if let Some(country) = user.country.as_deref() {
        println!("Country: {}", country);
    }
    if let Some(sub) = &user.subscription {
        println!("Plan: {} ({})", sub.plan_name, sub.status);
    } else if let Some(trial) = &user.trial_info {
        if trial.is_in_trial {
            match trial.trial_days_remaining {
                Some(days) => println!("Trial: {} days remaining", days),
                None => println!("Trial active"),
            }
        }
    }
    Ok(())
}

async fn cmd_list(client: ApiClient, query: Option<String>) -> Result<()> {
    let config = Config::load();

    let mut catalog = CatalogState::new(client);
    if let Some(limit) = config.page_size {
        catalog.set_limit(limit);
    }
    if let Some(query) = query {
        catalog.set_query(query);
    }
    catalog.refresh().await?;

    if catalog.rfqs().is_empty() {
        println!("No RFQs matched.");
        return Ok(());
    }

    let prefer_vietnamese = config.prefer_vietnamese.unwrap_or(false);
    for rfq in catalog.rfqs() {
        println!(
            "{}  {}  [{} | {} | {}]",
            rfq.id,
            rfq.title(prefer_vietnamese),
            rfq.buyer_country,
            rfq.quantity_display(),
            rfq.incoterms
        );
    }
    if catalog.has_next_page() {
        println!("(more available; showing page {})", catalog.page());
    }
    Ok(())
}

async fn cmd_detail(client: ApiClient, id: &str) -> Result<()> {
    let config = Config::load();

    let mut detail = DetailState::new(client);
    detail.fetch(id).await?;
    let Some(pair) = detail.current() else {
        bail!("RFQ {} not found", id);
    };

    print_detail(pair, config.prefer_vietnamese.unwrap_or(false));
    Ok(())
}

fn print_detail(detail: &RfqDetail, prefer_vietnamese: bool) {
    let rfq = &detail.rfq;
    println!("{}", rfq.title(prefer_vietnamese));
    println!("  Id:        {}", rfq.id);
    if let Some(category) = rfq.category_name() {
        println!("  Category:  {}", category);
    }
    println!("  Buyer:     {}", rfq.buyer_country);
    println!("  Quantity:  {}", rfq.quantity_display());
    println!("  Incoterms: {}", rfq.incoterms);
    if let Some(price) = rfq.target_price {
        println!("  Target:    {}", price);
    }
    println!("  Access:    {}", detail.access.contact_level);
    if let Some(email) = rfq.buyer_email.as_deref() {
        println!("  Email:     {}", email);
    }
    if let Some(phone) = rfq.buyer_phone.as_deref() {
        println!("  Phone:     {}", phone);
    }
    if detail.access.contact_level == ContactLevel::None {
        println!("  (contact locked; run `rfqdesk unlock {}`)", rfq.id);
    }
    if let Some(quota) = &detail.access.quota_info {
        println!("  Unlocks:   {} of {} left", quota.remaining, quota.limit);
    }
}

async fn cmd_unlock(client: ApiClient, id: &str) -> Result<()> {
    let mut detail = DetailState::new(client);
    detail.fetch(id).await?;

    match detail.unlock(id).await {
        Ok(result) => {
            println!("Contact unlocked:");
            if let Some(name) = result.contact.name.as_deref() {
                println!("  Name:     {}", name);
            }
            if let Some(company) = result.contact.company.as_deref() {
                println!("  Company:  {}", company);
            }
            if let Some(email) = result.contact.email.as_deref() {
                println!("  Email:    {}", email);
            }
            if let Some(phone) = result.contact.phone.as_deref() {
                println!("  Phone:    {}", phone);
            }
            if let Some(whatsapp) = result.contact.whatsapp.as_deref() {
                println!("  WhatsApp: {}", whatsapp);
            }
            println!("{} of {} unlocks left", result.quota.remaining, result.quota.limit);
            Ok(())
        }
        Err(ApiError::QuotaExhausted) => {
            bail!("No unlocks left for this period. See `rfqdesk plans` for options.")
        }
        Err(ApiError::Unauthenticated) => {
            bail!("Not signed in. Run `rfqdesk login` first.")
        }
        Err(e) => Err(e.into()),
    }
}

async fn cmd_plans(client: ApiClient) -> Result<()> {
    let plans = client.plans().await?;
    if plans.is_empty() {
        println!("No plans available.");
        return Ok(());
    }

    for plan in &plans {
        let currency = plan.currency.as_deref().unwrap_or("USD");
        println!(
            "{}  {} ({} {}/{})",
            plan.id, plan.name, plan.price, currency, plan.interval
        );
        if let Some(limit) = plan.daily_limit {
            println!("  {} unlocks per day", limit);
        }
        for feature in &plan.features {
            println!("  - {}", feature);
        }
    }
    Ok(())
}

async fn cmd_profile(client: ApiClient, args: &[String]) -> Result<()> {
    let mut session = SessionState::new(client);

    if args.is_empty() {
        session.check_auth().await;
        let Some(user) = session.user() else {
            bail!("Not signed in. Run `rfqdesk login` first.");
        };
        println!("Name:     {}", user.display_name());
        println!("Email:    {}", user.email);
        if let Some(company) = user.company.as_deref() {
            println!("Company:  {}", company);
        }
        if let Some(phone) = user.phone.as_deref() {
            println!("Phone:    {}", phone);
        }
        if let Some(whatsapp) = user.whatsapp.as_deref() {
            println!("WhatsApp: {}", whatsapp);
        }
        if let Some(country) = user.country.as_deref() {
            println!("Country:  {}", country);
        }
        return Ok(());
    }

    let update = parse_profile_args(args)?;
    session.update_profile(&update).await?;
    println!("Profile updated");
    Ok(())
}

/// Parse `key=value` pairs into a partial update; unnamed fields are left
/// untouched server-side.
fn parse_profile_args(args: &[String]) -> Result<ProfileUpdate> {
    let mut update = ProfileUpdate::default();
    for arg in args {
        let Some((key, value)) = arg.split_once('=') else {
            bail!("Expected key=value, got: {}", arg);
        };
        let value = Some(value.to_string());
        match key {
            "name" => update.name = value,
            "company" => update.company = value,
            "phone" => update.phone = value,
            "whatsapp" => update.whatsapp = value,
            "country" => update.country = value,
            other => bail!("Unknown profile field: {}", other),
        }
    }
    if update.is_empty() {
        bail!("No fields to update");
    }
    Ok(update)
}
