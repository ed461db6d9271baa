// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! Static emission factors and the CO2 estimator.
//!
//! Factors are kilograms of CO2 per unit of the category's quantity:
//! kilometers for transport, kilowatt-hours for electricity, meals for
//! diet and kilograms of waste for waste.

use crate::models::Category;
use serde_json::Value;

/// kg CO2 per km, by vehicle.
const TRANSPORT_FACTORS: &[(&str, f64)] = &[
    ("car", 0.192),
    ("bus", 0.089),
    ("train", 0.041),
    ("flight", 0.255),
];

/// kg CO2 per kWh.
const ELECTRICITY_FACTOR: f64 = 0.475;

/// kg CO2 per meal, by diet.
const DIET_FACTORS: &[(&str, f64)] = &[
    ("beef", 27.0),
    ("chicken", 6.9),
    ("vegetarian", 2.5),
    ("vegan", 1.5),
];

/// kg CO2 per kg of waste.
const WASTE_FACTOR: f64 = 0.5;

fn lookup(table: &[(&str, f64)], subtype: Option<&str>) -> Option<f64> {
    let subtype = subtype?;
    table
        .iter()
        .find(|(name, _)| *name == subtype)
        .map(|(_, factor)| *factor)
}

/// Resolve the emission factor for a category and subtype.
///
/// Electricity and waste ignore the subtype. Returns `None` when the
/// category is unknown or a required subtype is missing or unknown.
pub fn emission_factor(category: Category, subtype: Option<&str>) -> Option<f64> {
    match category {
        Category::Transport => lookup(TRANSPORT_FACTORS, subtype),
        Category::Electricity => Some(ELECTRICITY_FACTOR),
        Category::Diet => lookup(DIET_FACTORS, subtype),
        Category::Waste => Some(WASTE_FACTOR),
    }
}

/// Estimate kilograms of CO2 for an activity.
///
/// Never fails: an unknown category or unresolvable subtype yields 0.
pub fn estimate(category: &str, subtype: Option<&str>, quantity: f64) -> f64 {
    let factor = category
        .parse::<Category>()
        .ok()
        .and_then(|c| emission_factor(c, subtype))
        .unwrap_or(0.0);
    factor * quantity
}

/// Coerce a loosely typed JSON quantity to a number.
///
/// Numbers pass through, numeric strings are parsed, and everything else
/// (absent, null, non-numeric, non-finite) becomes 0.
pub fn coerce_quantity(value: Option<&Value>) -> f64 {
    let parsed = match value {
        Some(Value::Number(n)) => n.as_f64(),
        Some(Value::String(s)) => {
            let s = s.trim();
            if s.is_empty() {
                Some(0.0)
            } else {
                s.parse::<f64>().ok()
            }
        }
        _ => None,
    };
    parsed.filter(|q| q.is_finite()).unwrap_or(0.0)
}
