use chrono::Utc;
use rand::Rng;
use serde_json::json;

use super::endpoint::EndpointSpec;
use super::{EndpointCatalog, MethodSplit};
use crate::args::{DEFAULT_ENDPOINT_TIMEOUT, HttpMethod};
use crate::error::CatalogError;

/// Diagnose calls go through a model backend and need a longer timeout.
const DIAGNOSE_TIMEOUT: std::time::Duration = std::time::Duration::from_secs(30);

/// Default workload against the pet clinic microservices gateway.
///
/// # Errors
///
/// Never fails for the built-in table; the `Result` carries catalog
/// validation through the same path as config-defined catalogs.
pub fn builtin_catalog(split: MethodSplit) -> Result<EndpointCatalog, CatalogError> {
    EndpointCatalog::new(split, builtin_endpoints()?)
}

pub(crate) fn builtin_endpoints() -> Result<Vec<EndpointSpec>, CatalogError> {
    let get = |path: &str, weight: u64| {
        EndpointSpec::new(HttpMethod::Get, path, weight, DEFAULT_ENDPOINT_TIMEOUT)
    };
    let post = |path: &str, weight: u64| {
        EndpointSpec::new(HttpMethod::Post, path, weight, DEFAULT_ENDPOINT_TIMEOUT)
    };

    Ok(vec![
        get("/api/gateway/owners/1", 15)?,
        get("/api/payments/owners/1/pets/1", 10)?,
        get("/api/vet/vets", 5)?,
        get("/api/insurance/insurances", 5)?,
        get("/api/billing/billings", 5)?,
        EndpointSpec::new(
            HttpMethod::Get,
            "/api/customer/diagnose/owners/1/pets/1",
            1,
            DIAGNOSE_TIMEOUT,
        )?,
        // Owner -1 does not exist; keeps the 4xx path warm.
        get("/api/gateway/owners/-1", 1)?,
        post("/api/payments/owners/1/pets/1", 5)?.with_body(|_seq: u64| {
            json!({
                "amount": rand::thread_rng().gen_range(50..550),
                "notes": format!("load-test-payment-{}", Utc::now().timestamp_millis()),
            })
        }),
        post("/api/visit/owners/7/pets/9/visits", 8)?.with_body(|_seq: u64| {
            let now = Utc::now();
            json!({
                "date": now.format("%Y-%m-%d").to_string(),
                "description": format!("load-test-visit-{}", now.timestamp_millis()),
            })
        }),
        post("/api/customer/owners", 5)?.with_body(|_seq: u64| {
            json!({
                "firstName": "load-test",
                "lastName": "user",
                "address": "Test Address",
                "city": "Test City",
                "telephone": "1234567890",
            })
        }),
        post("/api/customer/owners/7/pets", 5)?.with_body(|_seq: u64| {
            let type_id = if rand::thread_rng().gen_bool(0.5) { "1" } else { "2" };
            json!({
                "id": 0,
                "name": format!("Pet{}", Utc::now().timestamp_millis()),
                "birthDate": "2023-11-20T08:00:00.000Z",
                "typeId": type_id,
            })
        }),
        EndpointSpec::new(
            HttpMethod::Delete,
            "/api/payments/clean-db",
            1,
            DEFAULT_ENDPOINT_TIMEOUT,
        )?,
    ])
}
