//! Terminal and JSON rendering for CLI results.

use crate::Format;
use anyhow::Result;
use meatbar_core::{Consumption, ConsumptionId, LoadReport, MonthlyPeak, Person, Streak};
use serde::Serialize;

fn print_json<T: Serialize + ?Sized>(value: &T) -> Result<()> {
    println!("{}", serde_json::to_string_pretty(value)?);
    Ok(())
}

pub fn print_added(id: ConsumptionId, format: Format) -> Result<()> {
    match format {
        Format::Json => print_json(&id),
        Format::Text => {
            println!("Successfully recorded consumption. ID: {}", id.id);
            Ok(())
        }
    }
}

pub fn print_people(people: &[Person], format: Format) -> Result<()> {
    if format == Format::Json {
        return print_json(people);
    }
    if people.is_empty() {
        println!("No people recorded yet.");
    }
    for person in people {
        println!("{}", person.name);
    }
    Ok(())
}

pub fn print_consumptions(events: &[Consumption], format: Format) -> Result<()> {
    if format == Format::Json {
        return print_json(events);
    }
    if events.is_empty() {
        println!("No consumptions recorded yet.");
        return Ok(());
    }

    println!("{:>6}  {:<16} {:<10} EATEN AT", "ID", "PERSON", "TYPE");
    for event in events {
        println!(
            "{:>6}  {:<16} {:<10} {}",
            event.id, event.person_name, event.bar_type, event.eaten_at
        );
    }
    Ok(())
}

pub fn print_streaks(streaks: &[Streak], format: Format) -> Result<()> {
    if format == Format::Json {
        return print_json(streaks);
    }
    if streaks.is_empty() {
        println!("No streaks found.");
        return Ok(());
    }

    for streak in streaks {
        println!(
            "{} to {}  {} days  [{}]",
            streak.start_date, streak.end_date, streak.length, streak.daily_counts
        );
    }
    Ok(())
}

pub fn print_monthly_peaks(peaks: &[MonthlyPeak], format: Format) -> Result<()> {
    if format == Format::Json {
        return print_json(peaks);
    }
    if peaks.is_empty() {
        println!("No consumptions recorded yet.");
        return Ok(());
    }

    for peak in peaks {
        println!(
            "{}  busiest day {} with {} bar(s)",
            peak.month, peak.day_of_month, peak.daily_count
        );
    }
    Ok(())
}

pub fn print_load_report(report: &LoadReport, format: Format) -> Result<()> {
    if format == Format::Json {
        return print_json(report);
    }

    println!("CSV file processed. Found {} rows.", report.rows_read);
    println!(
        "Data insertion complete: {} new people, {} new meat bars, {} rows skipped.",
        report.people_inserted, report.events_inserted, report.rows_skipped
    );
    Ok(())
}
