use std::{fs, io::Write, path::PathBuf};

use chrono::Utc;
use engine::{
    Currency, Engine, LegacyStore, MoneyCents, MonthPeriod, PlainTextRenderer, TransactionFilter,
    TransactionInput, TransactionKind, TransactionUpdate, UserSettings, export_report,
    parse_local_date, write_transactions_csv,
};

use crate::{
    cli::{Command, LegacyCommand, SettingsCommand},
    error::{AppError, Result},
    settings::AppConfig,
};

/// `YYYY-MM`, or the current month in the engine's time zone.
fn resolve_month(engine: &Engine, month: Option<&str>) -> Result<MonthPeriod> {
    match month {
        Some(raw) => Ok(raw.parse()?),
        None => Ok(MonthPeriod::containing(Utc::now(), engine.time_zone())),
    }
}

fn parse_money(raw: &str) -> Result<MoneyCents> {
    Ok(raw.parse()?)
}

pub async fn run(
    engine: &Engine,
    config: &AppConfig,
    legacy: &mut LegacyStore,
    command: Command,
) -> Result<()> {
    match command {
        Command::Add {
            title,
            amount,
            category,
            kind,
            date,
            note,
        } => {
            let mut input = TransactionInput::new(title, amount, category, kind.into());
            input.date = date;
            input.note = note;
            let tx = engine.add_transaction(input).await?;
            let currency = engine.settings().await?.currency;
            println!(
                "#{} {} {} ({}) {}",
                tx.id,
                tx.kind,
                tx.amount.format(&currency),
                tx.category,
                tx.title
            );
            if tx.kind == TransactionKind::Expense {
                let period = MonthPeriod::containing(tx.occurred_at, engine.time_zone());
                engine.check_budget_alert(period).await?;
            }
        }
        Command::List { kind, month } => {
            let mut filter = TransactionFilter::all();
            filter.kind = kind.map(Into::into);
            if let Some(month) = month {
                let (from, to) = month
                    .parse::<MonthPeriod>()?
                    .bounds(engine.time_zone())?;
                filter = filter.between(from, to);
            }
            let currency = engine.settings().await?.currency;
            for tx in engine.list_transactions(&filter).await? {
                let local = tx.occurred_at.with_timezone(&engine.time_zone());
                println!(
                    "#{:<5} {} {:<7} {:>14}  {:<16} {}{}",
                    tx.id,
                    local.format("%Y-%m-%d"),
                    tx.kind,
                    tx.amount.format(&currency),
                    tx.category,
                    tx.title,
                    tx.note.map(|n| format!(" ({n})")).unwrap_or_default()
                );
            }
        }
        Command::Update {
            id,
            title,
            amount,
            category,
            kind,
            date,
            note,
            clear_note,
        } => {
            let update = TransactionUpdate {
                title,
                amount: amount.as_deref().map(parse_money).transpose()?,
                category,
                kind: kind.map(Into::into),
                occurred_at: date
                    .as_deref()
                    .map(|d| parse_local_date(d, engine.time_zone()))
                    .transpose()?,
                note: if clear_note { Some(None) } else { note.map(Some) },
            };
            if update.is_empty() {
                return Err(AppError::Usage("nothing to update".to_string()));
            }
            let tx = engine.update_transaction(id, update).await?;
            println!("updated #{} {}", tx.id, tx.title);
        }
        Command::Delete { id } => {
            engine.delete_transaction(id).await?;
            println!("deleted #{id}");
        }
        Command::DeleteAll { yes } => {
            if !yes {
                return Err(AppError::Usage(
                    "delete-all removes every transaction; pass --yes to confirm".to_string(),
                ));
            }
            let removed = engine.delete_all_transactions().await?;
            println!("deleted {removed} transactions");
        }
        Command::Summary { month } => {
            let period = resolve_month(engine, month.as_deref())?;
            let currency = engine.settings().await?.currency;
            let overview = engine.spending_overview(period).await?;
            let money = |m: MoneyCents| m.format(&currency);
            println!("Summary for {}", period.label());
            println!("Monthly salary:    {}", money(overview.monthly_salary));
            println!("Additional income: {}", money(overview.additional_income));
            println!("Total to spend:    {}", money(overview.total_to_spend));
            println!("Spent:             {}", money(overview.current_spending));
            println!("Remaining:         {}", money(overview.remaining));
        }
        Command::Budget { month } => {
            let period = resolve_month(engine, month.as_deref())?;
            let settings = engine.settings().await?;
            let status = engine.check_budget_alert(period).await?;
            let money = |m: MoneyCents| m.format(&settings.currency);
            println!("Budget for {}", period.label());
            if status.has_budget() {
                println!("Monthly budget: {}", money(status.monthly_budget));
                println!("Spent:          {}", money(status.total_expense));
                println!("Remaining:      {}", money(status.remaining));
                println!(
                    "Usage:          {} [{} / {}]",
                    status.usage_label(),
                    status.tier,
                    status.tier.color_name()
                );
            } else {
                println!("No budget set (0%). Spent: {}", money(status.total_expense));
            }
        }
        Command::Breakdown { kind, month } => {
            let period = resolve_month(engine, month.as_deref())?;
            let kind: TransactionKind = kind.into();
            let settings = engine.settings().await?;
            let currency = settings.currency;
            let totals = engine.period_totals(period).await?;
            let total = match kind {
                TransactionKind::Income => totals.income,
                TransactionKind::Expense => totals.expense,
            };
            println!(
                "{} by category, {}: {}",
                kind,
                period.label(),
                total.format(&currency)
            );
            if kind == TransactionKind::Income {
                println!("Monthly Salary: {}", settings.monthly_salary.format(&currency));
            }
            for aggregate in engine.category_breakdown_for(period, kind).await? {
                println!(
                    "{:<20} {:>14} {:>3}%",
                    aggregate.category,
                    aggregate.total.format(&currency),
                    aggregate.percentage
                );
            }
        }
        Command::Report { month, export, dir } => {
            let period = resolve_month(engine, month.as_deref())?;
            let report = engine.monthly_report(period).await?;
            print!("{}", report.render_text()?);
            if export {
                let dir = dir.unwrap_or_else(|| config.export_dir());
                let today = Utc::now().with_timezone(&engine.time_zone()).date_naive();
                let path = export_report(&report, today, &PlainTextRenderer, &dir)?;
                println!("Report saved to {}", path.display());
            }
        }
        Command::ExportCsv { output } => {
            let transactions = engine.list_transactions(&TransactionFilter::all()).await?;
            match output {
                Some(path) => {
                    write_transactions_csv(&transactions, fs::File::create(&path)?)?;
                    println!("{} transactions written to {}", transactions.len(), path.display());
                }
                None => write_transactions_csv(&transactions, std::io::stdout().lock())?,
            }
        }
        Command::Settings(SettingsCommand::Show) => {
            print_settings(&engine.settings().await?);
        }
        Command::Settings(SettingsCommand::Set {
            salary,
            budget,
            currency,
            alerts,
        }) => {
            let mut settings = engine.settings().await?;
            if let Some(salary) = salary {
                settings.monthly_salary = parse_money(&salary)?;
            }
            if let Some(budget) = budget {
                settings.monthly_budget = parse_money(&budget)?;
            }
            if let Some(currency) = currency {
                settings.currency = Currency::try_from(currency.as_str())?;
            }
            if let Some(alerts) = alerts {
                settings.budget_alerts_enabled = alerts;
            }
            print_settings(&engine.save_settings(settings).await?);
        }
        Command::Legacy(LegacyCommand::Export { output }) => {
            let json = legacy.export_transactions();
            write_output(output, &json)?;
        }
        Command::Legacy(LegacyCommand::Import { file }) => {
            let json = fs::read_to_string(&file)?;
            legacy.import_transactions(&json)?;
            println!(
                "{} legacy transactions imported into {}",
                legacy.transactions().len(),
                legacy.path().display()
            );
        }
    }
    Ok(())
}

fn print_settings(settings: &UserSettings) {
    let money = |m: MoneyCents| m.format(&settings.currency);
    println!("Monthly salary: {}", money(settings.monthly_salary));
    println!("Monthly budget: {}", money(settings.monthly_budget));
    println!("Currency:       {}", settings.currency);
    println!(
        "Budget alerts:  {}",
        if settings.budget_alerts_enabled {
            "on"
        } else {
            "off"
        }
    );
    println!("Last updated:   {}", settings.last_updated.to_rfc3339());
}

fn write_output(output: Option<PathBuf>, content: &str) -> Result<()> {
    match output {
        Some(path) => fs::write(path, content)?,
        None => {
            let mut stdout = std::io::stdout().lock();
            writeln!(stdout, "{content}")?;
        }
    }
    Ok(())
}
