use anyhow::{Result, anyhow};
use std::str::FromStr;
use zelo::features::calculators::catalog::{self, MIN_QUERY_LEN};
use zelo::features::calculators::{CalculatorKind, Descriptor};

/// Prints the catalogue, or the entries matching `query`.
pub fn list(query: Option<&str>) {
    let entries: Vec<Descriptor> = match query {
        Some(q) => catalog::search(q),
        None => catalog::all().collect(),
    };

    if entries.is_empty() {
        match query {
            Some(q) if q.trim().chars().count() < MIN_QUERY_LEN => {
                println!("Search text needs at least {MIN_QUERY_LEN} characters.");
            },
            Some(q) => println!("No calculators match '{q}'."),
            None => println!("No calculators available."),
        }
        return;
    }

    println!("{:<24} {:<12} {:<30}", "Kind", "Category", "Name");
    println!("{:-<66}", "");
    for entry in entries {
        let (kind, category) = (entry.kind.to_string(), entry.category.to_string());
        println!("{kind:<24} {category:<12} {:<30}", entry.name);
    }
}

/// Prints the description and inputs of one calculator.
///
/// # Errors
/// Returns an error if `kind` is not in the catalogue.
pub fn describe(kind: &str) -> Result<()> {
    let kind = CalculatorKind::from_str(kind.trim())
        .map_err(|_| anyhow!("Unknown calculator: {kind} (see `zelocalc list`)"))?;
    let descriptor = kind.descriptor();

    println!("{} ({})", descriptor.name, descriptor.category);
    println!("{}\n", descriptor.description);
    println!("{:<24} {:<28} {:<8} {:<10}", "Field", "Label", "Unit", "Default");
    println!("{:-<72}", "");
    for field in descriptor.fields {
        let default = field.default.map_or_else(|| "required".to_owned(), |v| v.to_string());
        println!("{:<24} {:<28} {:<8} {:<10}", field.name, field.label, field.unit, default);
    }
    Ok(())
}
