//! Recipe Cost Status Tool
//!
//! Provides runtime status information about the service.

use serde::Serialize;
use std::path::PathBuf;
use std::time::Instant;
use sysinfo::{Pid, ProcessesToUpdate, System};

use crate::build_info::BuildInfo;

/// Costing instructions for AI assistants
pub const COSTING_INSTRUCTIONS: &str = r#"
# Recipe Costing Instructions

This guide explains how to price dishes with the recipe cost tools.

## Overview

A dish is priced from:
1. **Dish header** - the dish name and how many people it serves
2. **Ingredient rows** - name, quantity, the unit the quantity is in, and a price
3. **Price basis** - the unit the price is quoted per (defaults to the row's own unit)

Every priced dish goes into the session's recipe book. The book can be exported
as an xlsx workbook with one sheet per dish and an optional Summary sheet.

---

## Pricing a Dish

**Tool:** `price_recipe`

```json
{
  "dish_name": "Masala Chai",
  "servings": 4,
  "ingredients": [
    {"name": "Milk", "quantity": 500, "unit": "ml", "unit_price": 60, "price_basis_unit": "L"},
    {"name": "Sugar", "quantity": 40, "unit": "g", "use_saved": true},
    {"name": "Tea leaves", "quantity": 10, "unit": "g", "unit_price": 0.8}
  ]
}
```

- `unit_price` is the price of ONE `price_basis_unit`
- Quantities are converted into the price basis before multiplying
- `use_saved: true` takes the price and basis from the saved ingredient list

### Validation

Nothing is added to the book if any row is invalid. All problems are reported
at once, each naming its 1-based row:
- dish name must not be empty
- servings must be a whole number of at least 1
- quantity and unit_price must be finite and not negative
- unit must not be empty

---

## Units

**Tool:** `list_units` shows every unit, its spellings and what it converts to.
**Tool:** `convert_unit` converts a single quantity.

Supported: g, kg, oz, lb, ml, L, tsp, tbsp, cup.

Only declared pairs convert. There is no conversion between weight and volume,
and cup only converts to ml. A unit always converts to itself, including units
outside the table such as "each" or "clove".

### Unresolved Lines

When a row's unit cannot be converted into its price basis, or the amount is
too large to compute, the line is marked `unresolved`, left out of the total,
and the dish is flagged incomplete.
Fix the row (usually by choosing a basis in the same family) and price again.

---

## Saved Ingredients

Prices you reuse can be saved once:
- `add_saved_ingredient` - name, unit sold by, price per that unit
- `list_saved_ingredients` / `get_saved_ingredient`
- `update_saved_ingredient` / `delete_saved_ingredient`

Names are unique ignoring case. The default list holds Flour (kg), Sugar (kg),
Milk (litre) and Butter (gram).

---

## Recipe Book and Export

- `list_book` - dishes in the session, in the order they were priced
- `get_book_recipe` - one dish by its zero-based position
- `export_recipe` - one dish (the latest by default) to an xlsx file
- `export_book` - every dish plus a Summary sheet (`include_summary: false` to skip it)
- `end_session` - discard the session's book

Sheet names are cut to 31 characters and characters Excel rejects are replaced.
Dishes with the same name get " (2)", " (3)" and so on.

Costs are kept at full precision and only rounded to 2 decimals for display.
"#;

/// Runtime status of the service
#[derive(Debug, Clone, Serialize)]
pub struct RecipeCostStatus {
    /// Build information
    pub build_number: u64,
    pub build_timestamp: &'static str,
    pub version: &'static str,

    /// Storage information
    pub database_path: String,
    pub database_size_bytes: Option<u64>,
    pub export_dir: String,

    /// Session information
    pub open_sessions: usize,
    pub conversion_factors: usize,

    /// Process information
    pub uptime_seconds: u64,
    pub process_id: u32,
    pub memory_usage_bytes: u64,
}

/// Status tracker for collecting runtime information
pub struct StatusTracker {
    start_time: Instant,
    database_path: PathBuf,
    export_dir: PathBuf,
}

impl StatusTracker {
    pub fn new(database_path: PathBuf, export_dir: PathBuf) -> Self {
        Self {
            start_time: Instant::now(),
            database_path,
            export_dir,
        }
    }

    /// Get the current status
    pub fn get_status(&self, open_sessions: usize, conversion_factors: usize) -> RecipeCostStatus {
        let build_info = BuildInfo::current();

        let database_size_bytes = std::fs::metadata(&self.database_path)
            .ok()
            .map(|m| m.len());

        let pid = std::process::id();
        let mut sys = System::new();
        sys.refresh_processes(ProcessesToUpdate::Some(&[Pid::from_u32(pid)]));

        let memory_usage_bytes = sys
            .process(Pid::from_u32(pid))
            .map(|p| p.memory())
            .unwrap_or(0);

        RecipeCostStatus {
            build_number: build_info.build_number,
            build_timestamp: build_info.build_timestamp,
            version: build_info.version,
            database_path: self.database_path.display().to_string(),
            database_size_bytes,
            export_dir: self.export_dir.display().to_string(),
            open_sessions,
            conversion_factors,
            uptime_seconds: self.start_time.elapsed().as_secs(),
            process_id: pid,
            memory_usage_bytes,
        }
    }
}
