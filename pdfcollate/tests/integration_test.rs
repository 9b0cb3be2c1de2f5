#[path = "integration/common/mod.rs"]
mod common;

#[path = "integration/scenarios.rs"]
mod scenarios;

#[path = "integration/import.rs"]
mod import;

#[path = "integration/export.rs"]
mod export;

#[path = "integration/error_cases.rs"]
mod error_cases;
