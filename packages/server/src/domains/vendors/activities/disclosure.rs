//! Disclosure ranges for non-public vendors.
//!
//! Point figures for private companies and subsidiaries cannot be verified,
//! so revenue and headcount are widened to a ±30% range before anyone sees
//! them. Anything we cannot parse is left exactly as the model wrote it.

use lazy_static::lazy_static;
use regex::Regex;

use crate::domains::vendors::models::FinancialFacts;

const LOWER_FACTOR: f64 = 0.7;
const UPPER_FACTOR: f64 = 1.3;

lazy_static! {
    // "$2.6 billion", "$450M", "$1.5 bn", "$300mm"
    static ref DOLLAR_FIGURE: Regex = Regex::new(
        r"(?i)\$\s*(\d[\d,.]*)\s*(?:(million|billion|bn|mn|mm|m|b)\b)?"
    ).unwrap();

    // "450 million" without a currency sign: require the unit
    static ref BARE_FIGURE: Regex = Regex::new(
        r"(?i)\b(\d[\d,.]*)\s*(million|billion|bn|mn|mm|m|b)\b"
    ).unwrap();

    // "1,200 employees"
    static ref HEADCOUNT: Regex = Regex::new(
        r"(?i)(\d[\d,]*)\s*employees?"
    ).unwrap();
}

/// Widen revenue/employee point estimates for private and subsidiary vendors.
/// A no-op for any other company type.
pub fn apply_disclosure_ranges(mut facts: FinancialFacts) -> FinancialFacts {
    if !facts.is_private_or_subsidiary() {
        return facts;
    }

    facts.estimated_annual_revenue = facts
        .estimated_annual_revenue
        .map(|r| revenue_range(&r).unwrap_or(r));
    facts.employees = facts.employees.map(|e| headcount_range(&e).unwrap_or(e));
    facts
}

fn bounds(value: f64) -> (f64, f64) {
    ((value * LOWER_FACTOR).round(), (value * UPPER_FACTOR).round())
}

/// `$100 million` → `$70–130 million`, `$2.0 billion` → `$1.4–2.6 billion`.
fn revenue_range(revenue: &str) -> Option<String> {
    let caps = DOLLAR_FIGURE
        .captures(revenue)
        .or_else(|| BARE_FIGURE.captures(revenue))?;

    let value: f64 = caps[1]
        .trim_end_matches(['.', ','])
        .replace(',', "")
        .parse()
        .ok()?;
    let billions = caps.get(2).is_some_and(|u| {
        let unit = u.as_str().to_ascii_lowercase();
        matches!(unit.as_str(), "billion" | "bn" | "b")
    });

    let millions = if billions { value * 1000.0 } else { value };
    let (lower, upper) = bounds(millions);

    Some(if billions {
        format!("${:.1}–{:.1} billion", billions_to_tenths(lower), billions_to_tenths(upper))
    } else {
        format!("${}–{} million", lower as u64, upper as u64)
    })
}

/// Millions to billions, rounded half away from zero at one decimal
/// (1,950 prints as 2.0).
fn billions_to_tenths(millions: f64) -> f64 {
    (millions / 100.0).round() / 10.0
}

/// `1,200 employees` → `~840–1,560 employees`.
fn headcount_range(employees: &str) -> Option<String> {
    let caps = HEADCOUNT.captures(employees)?;
    let value: u64 = caps[1]
        .trim_end_matches(',')
        .replace(',', "")
        .parse()
        .ok()?;
    let (lower, upper) = bounds(value as f64);
    Some(format!(
        "~{}–{} employees",
        with_thousands(lower as u64),
        with_thousands(upper as u64)
    ))
}

fn with_thousands(n: u64) -> String {
    let digits = n.to_string();
    let mut out = String::with_capacity(digits.len() + digits.len() / 3);
    for (i, c) in digits.chars().enumerate() {
        if i > 0 && (digits.len() - i) % 3 == 0 {
            out.push(',');
        }
        out.push(c);
    }
    out
}
