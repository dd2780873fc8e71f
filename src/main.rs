//! Payoff Engine CLI
//!
//! Command-line interface over a household snapshot: payoff projections,
//! what-if runs, target-date solving, quarterly taxes, and ledger updates

use std::path::PathBuf;

use anyhow::{bail, Context, Result};
use chrono::{Local, NaiveDate};
use clap::{Parser, Subcommand};
use serde::Serialize;

use payoff_engine::ledger::{load_snapshot, save_snapshot, DebtUpdate};
use payoff_engine::projection::{PayoffResult, RequiredPayment};
use payoff_engine::summary::{
    duration_text, payoff_date, DebtSummary, HeaderStatus, Outlook, SettingsPreview,
};
use payoff_engine::{
    IncomeRequest, IncomeType, QuarterLabel, ScenarioRunner, Snapshot, Strategy, TaxCalculator,
};

#[derive(Parser)]
#[command(
    name = "payoff",
    version,
    about = "Debt payoff projections and quarterly tax tracking for a household ledger"
)]
struct Cli {
    /// Snapshot JSON file (defaults to the built-in sample debts)
    #[arg(short, long, global = true)]
    snapshot: Option<PathBuf>,

    /// Override the snapshot's payoff strategy (snowball or avalanche)
    #[arg(long, global = true)]
    strategy: Option<Strategy>,

    /// Treat this date as today (YYYY-MM-DD)
    #[arg(long, global = true)]
    today: Option<NaiveDate>,

    /// Print results as JSON
    #[arg(long, global = true)]
    json: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Baseline payoff timeline and debt-free date
    Project {
        /// Months of the timeline to print
        #[arg(long, default_value_t = 24)]
        rows: usize,
    },

    /// Compare an extra monthly payment against the baseline
    WhatIf {
        /// Extra amount per month
        #[arg(short, long)]
        extra: f64,
        /// Send the extra to this debt id instead of the strategy's choice
        #[arg(short, long)]
        target: Option<u32>,
    },

    /// Monthly payment needed to be debt-free by a date
    Solve {
        /// Target date (YYYY-MM-DD)
        #[arg(long)]
        by: NaiveDate,
    },

    /// Evaluate several extra payment levels
    Batch {
        /// Comma-separated extra amounts
        #[arg(long, value_delimiter = ',', required = true)]
        extras: Vec<f64>,
    },

    /// Snowball and avalanche side by side
    Strategies {
        #[arg(short, long, default_value_t = 0.0)]
        extra: f64,
    },

    /// Quarterly estimated tax status for a year
    Taxes {
        /// Tax year (defaults to the current year)
        #[arg(short, long)]
        year: Option<i32>,
    },

    /// Debt totals, health grades, and outlook
    Summary,

    /// Record an income event
    Income {
        amount: f64,
        /// salary, commission, override, bonus, distribution, other-w2, other-1099, other
        #[arg(short = 'k', long = "type", default_value = "salary")]
        kind: IncomeType,
        #[arg(short, long)]
        date: Option<NaiveDate>,
        /// Move the tax share to flexible (1099 income only)
        #[arg(long)]
        defer_tax: bool,
        /// Keep the debt share out of automatic debt payment, with a reason
        #[arg(long = "override")]
        override_reason: Option<String>,
        #[arg(short, long, default_value = "")]
        notes: String,
        /// Write the updated snapshot back to --snapshot
        #[arg(long)]
        save: bool,
    },

    /// Record a manual payment against one debt
    PayDebt {
        /// Debt id
        id: u32,
        amount: f64,
        #[arg(short, long)]
        date: Option<NaiveDate>,
        #[arg(short, long, default_value = "")]
        notes: String,
        #[arg(long)]
        save: bool,
    },

    /// Record an estimated tax payment for a quarter
    PayTax {
        /// Quarter label, e.g. "Q2 2025"
        quarter: QuarterLabel,
        amount: f64,
        #[arg(short, long)]
        date: Option<NaiveDate>,
        #[arg(short, long, default_value = "")]
        notes: String,
        #[arg(long)]
        save: bool,
    },

    /// Add a debt account
    AddDebt {
        name: String,
        balance: f64,
        /// Annual rate in percent, e.g. 29.24
        rate: f64,
        min_payment: f64,
        #[arg(long)]
        save: bool,
    },

    /// Change a debt's name, balance, rate, or minimum
    EditDebt {
        /// Debt id
        id: u32,
        #[arg(long)]
        name: Option<String>,
        #[arg(long)]
        balance: Option<f64>,
        /// Annual rate in percent
        #[arg(long)]
        rate: Option<f64>,
        #[arg(long)]
        min_payment: Option<f64>,
        #[arg(long)]
        save: bool,
    },

    /// Remove a debt account
    RemoveDebt {
        /// Debt id
        id: u32,
        #[arg(long)]
        save: bool,
    },

    /// Delete an income entry (its debt share stays applied)
    DeleteIncome {
        /// Income entry id
        id: u64,
        #[arg(long)]
        save: bool,
    },

    /// Delete a manual debt or tax payment record
    DeletePayment {
        /// Payment id
        id: u64,
        #[arg(long)]
        save: bool,
    },

    /// Clear income history and restore debts to their original balances
    ResetIncome {
        #[arg(long)]
        save: bool,
    },
}

fn main() -> Result<()> {
    env_logger::init();

    let cli = Cli::parse();
    let today = cli.today.unwrap_or_else(|| Local::now().date_naive());

    let mut snapshot = match &cli.snapshot {
        Some(path) => load_snapshot(path)
            .with_context(|| format!("Failed to load snapshot {}", path.display()))?,
        None => Snapshot::sample(),
    };
    if let Some(strategy) = cli.strategy {
        snapshot.settings.strategy = strategy;
    }

    let runner = ScenarioRunner::from_snapshot(&snapshot);

    match cli.command {
        Commands::Project { rows } => {
            let timeline = runner.timeline(0.0, None);
            if cli.json {
                return print_json(&timeline);
            }
            print_projection(&runner, &timeline, today, rows);
        }

        Commands::WhatIf { extra, target } => {
            let what_if = runner.compare(extra, target);
            if cli.json {
                return print_json(&what_if);
            }
            println!("Adding ${:.2}/month{}", extra, target.map(|t| format!(" to debt {}", t)).unwrap_or_default());
            println!("  Baseline:      {}", describe(&what_if.baseline));
            println!("  With extra:    {}", describe(&what_if.scenario));
            println!("  Months saved:  {}", what_if.months_saved);
            println!("  Interest saved: ${:.2}", what_if.interest_saved);
        }

        Commands::Solve { by } => {
            let goal = runner.solve_by_date(today, by);
            if cli.json {
                return print_json(&goal);
            }
            match goal.required {
                RequiredPayment::Achievable { total_payment } => {
                    println!("To be debt-free by {}:", by);
                    println!("  Total payment:  ${:.2}/month", total_payment);
                    if let Some(extra) = goal.extra_needed {
                        println!("  Above minimums: ${:.2}/month", extra);
                    }
                    if let Some(projection) = &goal.projection {
                        println!("  Total interest: ${:.2}", projection.total_interest);
                    }
                }
                RequiredPayment::NotAchievable => {
                    println!("Cannot be debt-free by {}: the date is too soon for current balances and rates.", by);
                }
            }
        }

        Commands::Batch { extras } => {
            let results = runner.run_batch(&extras);
            if cli.json {
                return print_json(&results);
            }
            println!("{:>10} {:>8} {:>14} {:>8} {:>14}", "Extra", "Months", "Interest", "Saved", "Int. Saved");
            println!("{}", "-".repeat(58));
            for what_if in &results {
                println!(
                    "{:>10.2} {:>8} {:>14.2} {:>8} {:>14.2}",
                    what_if.extra_payment,
                    months_cell(&what_if.scenario),
                    what_if.scenario.total_interest,
                    what_if.months_saved,
                    what_if.interest_saved
                );
            }
        }

        Commands::Strategies { extra } => {
            let runs = runner.compare_strategies(extra);
            if cli.json {
                return print_json(&runs);
            }
            for run in &runs {
                println!("{:<32} {}", run.strategy.label(), describe(&run.result));
            }
        }

        Commands::Taxes { year } => {
            let year = year.unwrap_or_else(|| QuarterLabel::containing(today).year);
            print_taxes(&snapshot, year, today, cli.json)?;
        }

        Commands::Summary => {
            let summary = DebtSummary::from_debts(&snapshot.debts);
            let header = HeaderStatus::classify(&summary, &runner.baseline(), &snapshot.settings.thresholds);
            let outlook = Outlook::build(&snapshot, today);
            let preview = SettingsPreview::build(&snapshot);
            if cli.json {
                return print_json(&serde_json::json!({
                    "debts": summary,
                    "status": header,
                    "outlook": outlook,
                    "preview": preview,
                }));
            }
            print_summary(&summary, &header, &outlook);
            print_preview(&preview);
        }

        Commands::Income { amount, kind, date, defer_tax, override_reason, notes, save } => {
            let request = IncomeRequest {
                defer_tax,
                override_reason,
                notes,
                ..IncomeRequest::new(date.unwrap_or(today), amount, kind)
            };
            let entry = snapshot.record_income(request)?.clone();
            if cli.json {
                print_json(&entry)?;
            } else {
                println!("Recorded {} of ${:.2} on {}", entry.income_type.label(), entry.amount, entry.date);
                println!(
                    "  Tithe ${:.2}  Tax ${:.2}  Debt ${:.2}  Flexible ${:.2}",
                    entry.tithe, entry.tax, entry.debt, entry.flexible
                );
                if entry.override_debt_reduction {
                    println!("  Debt share held back: {}", entry.override_reason);
                }
            }
            persist(&cli.snapshot, &snapshot, save)?;
        }

        Commands::PayDebt { id, amount, date, notes, save } => {
            let remaining = snapshot.record_debt_payment(id, date.unwrap_or(today), amount, &notes)?;
            if cli.json {
                print_json(&serde_json::json!({ "debt_id": id, "remaining": remaining }))?;
            } else if remaining > 0.0 {
                println!("Paid ${:.2} on debt {}; ${:.2} remaining", amount, id, remaining);
            } else {
                println!("Paid ${:.2} on debt {}; paid off!", amount, id);
            }
            persist(&cli.snapshot, &snapshot, save)?;
        }

        Commands::PayTax { quarter, amount, date, notes, save } => {
            snapshot.record_tax_payment(quarter, date.unwrap_or(today), amount, &notes)?;
            let balance = TaxCalculator::from_snapshot(&snapshot).quarter_balance(&quarter);
            if cli.json {
                print_json(&serde_json::json!({ "quarter": quarter, "balance": balance }))?;
            } else {
                println!("Recorded ${:.2} for {}; ${:.2} still owed", amount, quarter, balance);
            }
            persist(&cli.snapshot, &snapshot, save)?;
        }

        Commands::AddDebt { name, balance, rate, min_payment, save } => {
            let id = snapshot.add_debt(&name, balance, rate / 100.0, min_payment)?;
            println!("Added debt {} '{}' with balance ${:.2}", id, name.trim(), balance);
            persist(&cli.snapshot, &snapshot, save)?;
        }

        Commands::EditDebt { id, name, balance, rate, min_payment, save } => {
            let update = DebtUpdate {
                name,
                balance,
                annual_rate: rate.map(|r| r / 100.0),
                min_payment,
            };
            let debt = snapshot.update_debt(id, update)?;
            println!(
                "Debt {} '{}': ${:.2} at {:.2}%, ${:.2} minimum",
                debt.id, debt.name, debt.balance, debt.annual_rate * 100.0, debt.min_payment
            );
            persist(&cli.snapshot, &snapshot, save)?;
        }

        Commands::RemoveDebt { id, save } => {
            let debt = snapshot.remove_debt(id)?;
            println!("Removed debt {} '{}' (${:.2} outstanding)", debt.id, debt.name, debt.balance);
            persist(&cli.snapshot, &snapshot, save)?;
        }

        Commands::DeleteIncome { id, save } => {
            let entry = snapshot.delete_income(id)?;
            println!("Deleted {} of ${:.2} from {}", entry.income_type.label(), entry.amount, entry.date);
            persist(&cli.snapshot, &snapshot, save)?;
        }

        Commands::DeletePayment { id, save } => {
            let payment = snapshot.delete_payment(id)?;
            println!("Deleted payment of ${:.2} to {} from {}", payment.amount, payment.account, payment.date);
            persist(&cli.snapshot, &snapshot, save)?;
        }

        Commands::ResetIncome { save } => {
            let cleared = snapshot.clear_income_history();
            println!("Cleared {} income entries; debts restored to original balances", cleared);
            persist(&cli.snapshot, &snapshot, save)?;
        }
    }

    Ok(())
}

fn print_json<T: Serialize>(value: &T) -> Result<()> {
    println!("{}", serde_json::to_string_pretty(value)?);
    Ok(())
}

fn persist(path: &Option<PathBuf>, snapshot: &Snapshot, save: bool) -> Result<()> {
    if !save {
        return Ok(());
    }
    let Some(path) = path else {
        bail!("--save needs a --snapshot file to write to");
    };
    save_snapshot(path, snapshot).with_context(|| format!("Failed to save snapshot {}", path.display()))
}

fn months_cell(result: &PayoffResult) -> String {
    match result.payoff_months() {
        Some(months) => months.to_string(),
        None => "never".to_string(),
    }
}

fn describe(result: &PayoffResult) -> String {
    match result.payoff_months() {
        Some(months) => format!("{} ({} months), ${:.2} interest", duration_text(months), months, result.total_interest),
        None => format!("not paid off within {} months", result.months),
    }
}

fn print_projection(runner: &ScenarioRunner, timeline: &PayoffResult, today: NaiveDate, rows: usize) {
    println!("Strategy: {}", runner.settings().strategy.label());
    println!("Monthly debt payment: ${:.2}", runner.base_payment());
    println!();

    println!("{:>5} {:>12} {:>12} {:>12} {:>8} {:>14} {:>5}", "Month", "Interest", "Minimums", "Extra", "Target", "Balance", "Open");
    println!("{}", "-".repeat(76));
    for row in timeline.rows.iter().take(rows) {
        println!(
            "{:>5} {:>12.2} {:>12.2} {:>12.2} {:>8} {:>14.2} {:>5}",
            row.month,
            row.interest,
            row.minimums_paid,
            row.extra_paid,
            row.extra_target.map(|id| id.to_string()).unwrap_or_else(|| "-".into()),
            row.closing_balance,
            row.open_debts,
        );
    }
    if timeline.rows.len() > rows {
        println!("... ({} more months)", timeline.rows.len() - rows);
    }

    println!();
    match payoff_date(today, timeline) {
        Some(date) => println!("Debt-free by {} ({})", date.format("%b %Y"), describe(timeline)),
        None => println!("Debt-free: Never ({})", describe(timeline)),
    }
}

fn print_taxes(snapshot: &Snapshot, year: i32, today: NaiveDate, json: bool) -> Result<()> {
    let calculator = TaxCalculator::from_snapshot(snapshot);
    let statuses = calculator.year_statuses(year, today);
    let overdue = calculator.overdue(year, today);
    let breakdown = calculator.breakdown();

    if json {
        return print_json(&serde_json::json!({
            "quarters": statuses,
            "overdue": overdue,
            "breakdown": breakdown,
        }));
    }

    if snapshot.settings.tax_reserve_paused {
        println!("Tax reserve is paused; computed balances show as zero.");
    }
    println!("{:<8} {:>10} {:>12} {:>12} {:>8}  {}", "Quarter", "Due", "Balance", "Paid", "Goal %", "Status");
    println!("{}", "-".repeat(66));
    for status in &statuses {
        println!(
            "{:<8} {:>10} {:>12.2} {:>12.2} {:>7.1}%  {:?}",
            status.quarter.to_string(),
            status.due_date.format("%b %d").to_string(),
            status.balance,
            status.paid_to_date,
            status.percent_to_goal,
            status.state()
        );
    }

    if !overdue.quarters.is_empty() {
        println!();
        println!("Overdue: ${:.2}", overdue.total_unpaid);
        for quarter in &overdue.quarters {
            println!("  {} ${:.2} ({} days late)", quarter.quarter, quarter.balance, quarter.days_overdue);
        }
    }

    if !breakdown.is_empty() {
        println!();
        println!("1099 income:");
        for item in &breakdown {
            println!("  {:<20} ${:>12.2} (${:.2} reserved, {} entries)", item.income_type.label(), item.total, item.tax_reserved, item.count);
        }
    }
    Ok(())
}

fn print_summary(summary: &DebtSummary, header: &HeaderStatus, outlook: &Outlook) {
    println!("Debts: {}", summary.count);
    println!("  Total balance:   ${:.2} [{:?}]", summary.total_balance, header.total_debt);
    println!("  Paid off:        ${:.2} ({:.1}%)", summary.paid_off, summary.progress_percent);
    println!("  Weighted rate:   {:.2}%", summary.weighted_rate * 100.0);
    println!("  Minimums:        ${:.2}/month", summary.total_min_payments);
    println!(
        "  Interest:        ${:.2}/month, ${:.2}/week, ${:.2}/day [{:?}]",
        summary.monthly_interest, summary.weekly_interest, summary.daily_interest, header.monthly_interest
    );
    println!();

    match outlook.debt_free_by {
        Some(date) => println!("Debt-free in {} ({}) [{:?}]", outlook.duration, date.format("%B %Y"), header.payoff),
        None => println!("Debt-free: Never at the current pace [{:?}]", header.payoff),
    }
    println!("Average income: ${:.2}/month", outlook.average_monthly_income);
    println!("Interest over the next 3 months: ${:.2}", outlook.interest_next_three_months);
    if outlook.net_payoff_rate > 0.0 {
        println!("Net payoff rate: ${:.2}/month", outlook.net_payoff_rate);
    } else {
        println!("Payments do not cover interest; increase them to make progress on principal.");
    }
    if outlook.excluded_entries > 0 {
        println!(
            "Excluded: {} income entries, ${:.2} of debt allocation kept out of automatic payment",
            outlook.excluded_entries, outlook.excluded_debt_allocation
        );
    }
    if let Some(opportunity) = &outlook.opportunity {
        let by = opportunity
            .debt_free_by
            .map(|d| d.format("%B %Y").to_string())
            .unwrap_or_else(|| "-".into());
        println!(
            "Opportunity: adding ${:.2}/month gets you debt-free by {} ({} months sooner)",
            opportunity.extra_payment, by, opportunity.months_saved
        );
    }
}

fn print_preview(preview: &SettingsPreview) {
    println!();
    print!(
        "With {:.0}% of income going to debt (about ${:.2}/month), ",
        preview.debt_percent, preview.monthly_debt_payment
    );
    if preview.makes_progress() {
        println!("you would be debt-free in {}.", preview.duration);
        println!("Net payoff rate would be ${:.2}/month.", preview.net_payoff_rate);
    } else {
        println!("payments would not outrun interest.");
        println!(
            "They cover ${:.2} of the ${:.2}/month interest; raise the debt percentage to make progress on principal.",
            preview.monthly_debt_payment, preview.monthly_interest
        );
    }
    if preview.tax_reserve_paused {
        println!(
            "Tax reserve is paused: the {:.1}% normally reserved goes to flexible spending. Set aside quarterly taxes separately.",
            preview.tax_percent
        );
    }
}
