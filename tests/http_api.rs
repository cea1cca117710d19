mod common;

use std::sync::Arc;

use axum::{Router, http::StatusCode};
use serde_json::json;
use tokio::time::{Duration, sleep};

use skn_backend::routes::build_router;

fn plant_payload(name: &str, current_stock: i64, min_stock_threshold: i64) -> serde_json::Value {
    json!({
        "name": name,
        "category": "indoor",
        "variants": ["small", "large"],
        "current_stock": current_stock,
        "min_stock_threshold": min_stock_threshold,
        "cost_price": 40.0,
        "selling_price": 60.0,
        "investment": 2000.0,
        "location": "greenhouse-2",
    })
}

async fn create_plant(
    app: &Router,
    token: &str,
    name: &str,
    current_stock: i64,
    min_stock_threshold: i64,
) -> String {
    let (status, body) = common::request(
        app,
        "POST",
        "/api/plants",
        Some(token),
        Some(plant_payload(name, current_stock, min_stock_threshold)),
    )
    .await;
    assert_eq!(status, StatusCode::OK, "plant create failed: {body}");
    body["id"].as_str().unwrap().to_string()
}

#[tokio::test]
async fn plant_creation_is_gated_and_low_stock_uses_inclusive_threshold() {
    let ctx = match common::setup_state().await {
        Some(c) => c,
        None => return,
    };
    let app = build_router(Arc::new(ctx.state.clone()));
    let admin_token = common::bootstrap_admin(&app).await;
    common::register_user(&app, &admin_token, "meera", "meera-pw", "manager").await;
    common::register_user(&app, &admin_token, "sita", "sita-pw", "cashier").await;
    let manager_token = common::login(&app, "meera", "meera-pw").await;
    let cashier_token = common::login(&app, "sita", "sita-pw").await;

    // Managers may create plants; cashiers may not.
    let at_threshold = create_plant(&app, &manager_token, "Rose", 10, 10).await;
    let above_threshold = create_plant(&app, &admin_token, "Hibiscus", 11, 10).await;
    let (status, _) = common::request(
        &app,
        "POST",
        "/api/plants",
        Some(&cashier_token),
        Some(plant_payload("Jasmine", 5, 10)),
    )
    .await;
    assert_eq!(status, StatusCode::FORBIDDEN);

    // stock == threshold is low stock; threshold + 1 is not.
    let (status, low) =
        common::request(&app, "GET", "/api/plants/low-stock", Some(&cashier_token), None).await;
    assert_eq!(status, StatusCode::OK);
    let low_ids: Vec<&str> = low
        .as_array()
        .unwrap()
        .iter()
        .map(|p| p["id"].as_str().unwrap())
        .collect();
    assert!(low_ids.contains(&at_threshold.as_str()));
    assert!(!low_ids.contains(&above_threshold.as_str()));

    // Reads are open to any authenticated role; 404 for unknown ids.
    let (status, plant) = common::request(
        &app,
        "GET",
        &format!("/api/plants/{at_threshold}"),
        Some(&cashier_token),
        None,
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(plant["name"], "Rose");
    assert_eq!(plant["min_stock_threshold"], 10);

    let (status, _) = common::request(
        &app,
        "GET",
        "/api/plants/no-such-plant",
        Some(&cashier_token),
        None,
    )
    .await;
    assert_eq!(status, StatusCode::NOT_FOUND);

    common::teardown(Some(ctx)).await;
}

#[tokio::test]
async fn customer_search_is_case_insensitive_across_fields() {
    let ctx = match common::setup_state().await {
        Some(c) => c,
        None => return,
    };
    let app = build_router(Arc::new(ctx.state.clone()));
    let admin_token = common::bootstrap_admin(&app).await;

    for (name, phone, email) in [
        ("Ramesh Kumar", "9876543210", Some("ramesh@example.com")),
        ("Anita Desai", "9123456789", None),
        ("Suresh Patel", "9876500000", Some("suresh@example.com")),
    ] {
        let (status, _) = common::request(
            &app,
            "POST",
            "/api/customers",
            Some(&admin_token),
            Some(json!({ "name": name, "phone": phone, "email": email })),
        )
        .await;
        assert_eq!(status, StatusCode::OK);
    }

    let cases = [
        ("/api/customers/search?q=RAMESH", vec!["Ramesh Kumar"]),
        ("/api/customers/search?q=912", vec!["Anita Desai"]),
        ("/api/customers/search?q=example.com", vec!["Ramesh Kumar", "Suresh Patel"]),
        ("/api/customers/search?q=98765", vec!["Ramesh Kumar", "Suresh Patel"]),
    ];
    for (path, expected) in cases {
        let (status, found) = common::request(&app, "GET", path, Some(&admin_token), None).await;
        assert_eq!(status, StatusCode::OK);
        let mut names: Vec<String> = found
            .as_array()
            .unwrap()
            .iter()
            .map(|c| c["name"].as_str().unwrap().to_string())
            .collect();
        names.sort();
        assert_eq!(names, expected, "search {path}");
    }

    let (status, none) = common::request(
        &app,
        "GET",
        "/api/customers/search?q=zzz",
        Some(&admin_token),
        None,
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert!(none.as_array().unwrap().is_empty());

    common::teardown(Some(ctx)).await;
}

#[tokio::test]
async fn bill_listing_is_newest_first_and_paginated() {
    let ctx = match common::setup_state().await {
        Some(c) => c,
        None => return,
    };
    let app = build_router(Arc::new(ctx.state.clone()));
    let admin_token = common::bootstrap_admin(&app).await;

    let (_, customer) = common::request(
        &app,
        "POST",
        "/api/customers",
        Some(&admin_token),
        Some(json!({ "name": "Ramesh Kumar", "phone": "9876543210" })),
    )
    .await;
    let customer_id = customer["id"].as_str().unwrap();

    for _ in 0..3 {
        let (status, _) = common::request(
            &app,
            "POST",
            "/api/bills",
            Some(&admin_token),
            Some(json!({
                "customer_id": customer_id,
                "items": [],
                "payment_method": "online",
            })),
        )
        .await;
        assert_eq!(status, StatusCode::OK);
        // Distinct created_at timestamps so the newest-first order is exact.
        sleep(Duration::from_millis(10)).await;
    }

    let (status, bills) = common::request(&app, "GET", "/api/bills", Some(&admin_token), None).await;
    assert_eq!(status, StatusCode::OK);
    let numbers: Vec<&str> = bills
        .as_array()
        .unwrap()
        .iter()
        .map(|b| b["bill_number"].as_str().unwrap())
        .collect();
    assert_eq!(numbers, vec!["SKN-000003", "SKN-000002", "SKN-000001"]);

    let (status, page) = common::request(
        &app,
        "GET",
        "/api/bills?skip=1&limit=1",
        Some(&admin_token),
        None,
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    let page = page.as_array().unwrap();
    assert_eq!(page.len(), 1);
    assert_eq!(page[0]["bill_number"], "SKN-000002");

    common::teardown(Some(ctx)).await;
}

#[tokio::test]
async fn dashboard_rolls_up_sales_stock_and_recent_bills() {
    let ctx = match common::setup_state().await {
        Some(c) => c,
        None => return,
    };
    let app = build_router(Arc::new(ctx.state.clone()));
    let admin_token = common::bootstrap_admin(&app).await;
    common::register_user(&app, &admin_token, "sita", "sita-pw", "cashier").await;
    let cashier_token = common::login(&app, "sita", "sita-pw").await;

    create_plant(&app, &admin_token, "Rose", 5, 10).await;
    create_plant(&app, &admin_token, "Hibiscus", 50, 10).await;

    let (_, customer) = common::request(
        &app,
        "POST",
        "/api/customers",
        Some(&admin_token),
        Some(json!({ "name": "Ramesh Kumar", "phone": "9876543210" })),
    )
    .await;
    let customer_id = customer["id"].as_str().unwrap();

    let bill = |total: f64| {
        json!({
            "customer_id": customer_id,
            "items": [{
                "plant_id": "p",
                "plant_name": "Rose",
                "variant": null,
                "quantity": 1,
                "unit_price": total,
                "total_price": total,
            }],
            "payment_method": "cash",
        })
    };

    // Two approved bills (admin creator) and one pending (cashier creator);
    // only the approved ones count as sales.
    for (token, amount) in [(&admin_token, 100.0), (&admin_token, 250.0), (&cashier_token, 999.0)] {
        let (status, _) =
            common::request(&app, "POST", "/api/bills", Some(token), Some(bill(amount))).await;
        assert_eq!(status, StatusCode::OK);
        sleep(Duration::from_millis(10)).await;
    }

    let (status, dash) = common::request(
        &app,
        "GET",
        "/api/analytics/dashboard",
        Some(&cashier_token),
        None,
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(dash["total_sales"], 350.0);
    assert_eq!(dash["total_plants"], 2);
    assert_eq!(dash["low_stock_alerts"], 1);

    let recent = dash["recent_bills"].as_array().unwrap();
    assert_eq!(recent.len(), 3);
    assert_eq!(recent[0]["bill_number"], "SKN-000003");
    assert_eq!(recent[0]["status"], "pending");

    common::teardown(Some(ctx)).await;
}
