//! # StitchFlow Shell
//!
//! Terminal entry point for the shop: hydrates the session from the
//! data directory and exposes the read-side views plus login as
//! subcommands.
//!
//! ## Usage
//! ```bash
//! # Headline numbers + low stock
//! stitchflow summary
//!
//! # Monthly cash flow, expense categories, staff performance
//! stitchflow report
//!
//! # Sign in (username lookup only - see design notes)
//! stitchflow login admin
//!
//! # Printable job card for an order (by id or order number)
//! stitchflow jobcard ORD-0042
//!
//! # Styling advice for a recorded fitting (falls back gracefully
//! # without an API key)
//! stitchflow advise <measurement-id>
//! ```
//!
//! ## Startup Sequence
//! 1. Initialize tracing (RUST_LOG override, INFO default)
//! 2. Resolve the data directory (STITCHFLOW_DATA_DIR, else the
//!    platform app-data location)
//! 3. Open the slice store & hydrate the session
//! 4. Dispatch the subcommand

use std::path::PathBuf;

use tracing::info;
use tracing_subscriber::EnvFilter;

use stitchflow_advice::{advise_or_fallback, AdviceConfig, AdviceRequest, Advisor};
use stitchflow_core::analytics::{
    dashboard_summary, expenses_by_category, financial_summary, low_stock_items,
    monthly_cash_flow, payment_totals, staff_performance,
};
use stitchflow_core::jobcard::JobCard;
use stitchflow_store::{Session, SliceStore};

fn main() {
    init_tracing();

    let args: Vec<String> = std::env::args().skip(1).collect();
    if args.is_empty() {
        print_usage();
        std::process::exit(2);
    }

    let store = match SliceStore::open(data_dir()) {
        Ok(store) => store,
        Err(err) => fail(&format!("cannot open data directory: {err}")),
    };
    let mut session = match Session::hydrate(store) {
        Ok(session) => session,
        Err(err) => fail(&format!("cannot hydrate session: {err}")),
    };

    match args[0].as_str() {
        "summary" => cmd_summary(&session),
        "report" => cmd_report(&session),
        "login" => match args.get(1) {
            Some(username) => cmd_login(&mut session, username),
            None => fail("usage: stitchflow login <username>"),
        },
        "jobcard" => match args.get(1) {
            Some(reference) => cmd_jobcard(&session, reference),
            None => fail("usage: stitchflow jobcard <order-id | order-number>"),
        },
        "advise" => match args.get(1) {
            Some(id) => cmd_advise(&session, id),
            None => fail("usage: stitchflow advise <measurement-id>"),
        },
        other => {
            eprintln!("unknown command: {other}");
            print_usage();
            std::process::exit(2);
        }
    }
}

/// Initialize tracing (logging).
///
/// Default level is INFO; override with RUST_LOG.
fn init_tracing() {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .with_target(false)
        .init();
}

/// Resolves the data directory.
///
/// `STITCHFLOW_DATA_DIR` wins; otherwise the platform app-data location
/// (~/.local/share/stitchflow on Linux), falling back to a local
/// directory when the platform dirs cannot be determined.
fn data_dir() -> PathBuf {
    if let Ok(dir) = std::env::var("STITCHFLOW_DATA_DIR") {
        return PathBuf::from(dir);
    }

    directories::ProjectDirs::from("com", "stitchflow", "stitchflow")
        .map(|dirs| dirs.data_dir().to_path_buf())
        .unwrap_or_else(|| PathBuf::from("./stitchflow-data"))
}

fn print_usage() {
    eprintln!("StitchFlow - tailoring shop management");
    eprintln!();
    eprintln!("USAGE:");
    eprintln!("    stitchflow summary");
    eprintln!("    stitchflow report");
    eprintln!("    stitchflow login <username>");
    eprintln!("    stitchflow jobcard <order-id | order-number>");
    eprintln!("    stitchflow advise <measurement-id>");
}

fn fail(message: &str) -> ! {
    eprintln!("error: {message}");
    std::process::exit(1);
}

// =============================================================================
// Commands
// =============================================================================

/// Dashboard headline numbers plus the payment and low-stock pictures.
fn cmd_summary(session: &Session) {
    let settings = session.settings();
    let dash = dashboard_summary(session.orders(), session.customers(), session.inventory());
    let fin = financial_summary(session.orders(), session.expenses());
    let pay = payment_totals(session.orders());

    println!("== {} ==", settings.shop_name);
    println!();
    println!("Gross revenue   {}", settings.format_currency(dash.gross_revenue));
    println!("Active orders   {}", dash.active_orders);
    println!("Customers       {}", dash.customer_count);
    println!("Low stock       {}", dash.low_stock_count);
    println!();
    println!("Collected       {}", settings.format_currency(pay.collected));
    println!("Outstanding     {}", settings.format_currency(pay.outstanding));
    println!("Expenses        {}", settings.format_currency(fin.total_expenses));
    println!("Net profit      {}", settings.format_currency(fin.net_profit));
    println!("Tax liability   {}", settings.format_currency(fin.tax_liability));

    let low = low_stock_items(session.inventory());
    if !low.is_empty() {
        println!();
        println!("Low stock items:");
        for item in low {
            println!(
                "  {} - {} {} (threshold {})",
                item.name, item.stock, item.unit, item.low_stock_threshold
            );
        }
    }
}

/// Monthly cash flow, expense categorization, and staff performance.
fn cmd_report(session: &Session) {
    let settings = session.settings();

    println!("== Monthly cash flow ==");
    for bucket in monthly_cash_flow(session.orders(), session.expenses()) {
        if bucket.income.is_zero() && bucket.expense.is_zero() {
            continue;
        }
        println!(
            "  {}  income {:>12}  expense {:>12}",
            bucket.label,
            settings.format_currency(bucket.income),
            settings.format_currency(bucket.expense)
        );
    }

    println!();
    println!("== Expenses by category ==");
    for entry in expenses_by_category(session.expenses()) {
        println!(
            "  {:<16} {}",
            entry.category,
            settings.format_currency(entry.total)
        );
    }

    println!();
    println!("== Staff performance ==");
    for member in session.staff() {
        let perf = staff_performance(session.orders(), &member.id);
        println!(
            "  {:<20} active {:>3}  completed {:>3}  rate {:>3}%",
            member.name, perf.active, perf.completed, perf.completion_rate
        );
    }
}

/// Username-lookup sign-in.
fn cmd_login(session: &mut Session, username: &str) {
    match session.login(username) {
        Ok(user) => {
            info!(role = %user.role, "Signed in");
            println!("Welcome, {} ({})", user.name, user.role);
        }
        Err(err) => fail(&err.to_string()),
    }
}

/// Renders the printable job card for one order.
fn cmd_jobcard(session: &Session, reference: &str) {
    let order = session
        .orders()
        .iter()
        .find(|o| o.id == reference || o.order_number == reference);

    match order {
        Some(order) => {
            let card = JobCard::compile(
                order,
                session.measurements(),
                session.services(),
                session.settings(),
            );
            print!("{}", card.render());
        }
        None => fail(&format!("no order matches '{reference}'")),
    }
}

/// Styling advice for a recorded fitting. Never fails - without a key
/// or network, the static fallback prints.
fn cmd_advise(session: &Session, measurement_id: &str) {
    let Some(measurement) = session.measurements().iter().find(|m| m.id == measurement_id)
    else {
        fail(&format!("no measurement matches '{measurement_id}'"));
    };

    let request = AdviceRequest {
        garment: measurement.garment.to_string(),
        details: measurement
            .details
            .iter()
            .map(|(k, v)| (k.clone(), v.clone()))
            .collect(),
        instruction: None,
    };

    let advisor = match Advisor::new(AdviceConfig::from_env()) {
        Ok(advisor) => advisor,
        Err(err) => fail(&err.to_string()),
    };

    let runtime = match tokio::runtime::Runtime::new() {
        Ok(runtime) => runtime,
        Err(err) => fail(&format!("cannot start runtime: {err}")),
    };
    let advice = runtime.block_on(advise_or_fallback(&advisor, &request));

    println!("AI Tip: {advice}");
}
