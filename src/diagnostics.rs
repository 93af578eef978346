//! Provider connectivity self-test.
//!
//! Three fixed single-row queries exercise authentication, the `Media`
//! field and filter syntax. Every check runs even if an earlier one fails.

use std::collections::BTreeMap;

use serde::Serialize;
use tracing::{info, warn};

use crate::client::ListingProvider;
use crate::search::{ProviderQuery, PROPERTY_ENDPOINT};

pub const ALL_PASSED_MESSAGE: &str = "All API tests passed successfully!";
pub const SOME_FAILED_MESSAGE: &str = "Some API tests failed. Check individual test results.";

/// Result of one check.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct TestOutcome {
    pub name: String,
    pub passed: bool,
    pub message: String,
}

/// Aggregate result of the self-test.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct DiagnosticReport {
    pub success: bool,
    pub message: String,
    pub tests: BTreeMap<String, TestOutcome>,
}

struct Check {
    id: &'static str,
    name: &'static str,
    select: &'static [&'static str],
    filter: Option<&'static str>,
    pass_message: &'static str,
    fail_message: &'static str,
}

const CHECKS: [Check; 3] = [
    Check {
        id: "basic_connection",
        name: "Basic API Connection",
        select: &["ListingKey", "ListPrice"],
        filter: None,
        pass_message: "Connection successful",
        fail_message: "Connection failed",
    },
    Check {
        id: "media_handling",
        name: "Media Field Handling",
        select: &["ListingKey", "Media", "PhotosCount"],
        filter: Some("PhotosCount gt 0"),
        pass_message: "Media fields working",
        fail_message: "Media field error",
    },
    Check {
        id: "filter_syntax",
        name: "OData Filter Syntax",
        select: &["ListingKey", "City", "StandardStatus"],
        filter: Some("StandardStatus eq 'Active' and City eq 'Boston'"),
        pass_message: "Filters working",
        fail_message: "Filter syntax error",
    },
];

impl Check {
    fn query(&self) -> ProviderQuery {
        let query = ProviderQuery::select(self.select).with_top(1);
        match self.filter {
            Some(filter) => query.with_filter(filter),
            None => query,
        }
    }
}

/// Runs every check against `provider` and summarizes the outcome.
pub async fn run_connection_test(provider: &dyn ListingProvider) -> DiagnosticReport {
    let mut tests = BTreeMap::new();

    for check in &CHECKS {
        let passed = match provider.fetch(PROPERTY_ENDPOINT, &check.query()).await {
            Ok(_) => true,
            Err(e) => {
                warn!(check = check.id, error = %e, "Connectivity check failed");
                false
            }
        };

        let message = if passed {
            check.pass_message
        } else {
            check.fail_message
        };
        tests.insert(
            check.id.to_string(),
            TestOutcome {
                name: check.name.to_string(),
                passed,
                message: message.to_string(),
            },
        );
    }

    let success = tests.values().all(|t| t.passed);
    info!(success, "Connectivity self-test finished");

    let message = if success {
        ALL_PASSED_MESSAGE
    } else {
        SOME_FAILED_MESSAGE
    };

    DiagnosticReport {
        success,
        message: message.to_string(),
        tests,
    }
}
