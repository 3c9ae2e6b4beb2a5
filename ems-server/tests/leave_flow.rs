//! Leave lifecycle: applications, balances, approvals and type
//! management. Dates sit in the current calendar year because balances
//! are computed against it.

mod common;

use chrono::{Datelike, Local};
use common::TestServer;
use http::StatusCode;
use serde_json::json;

/// A date in the current year, away from the year boundaries.
fn day(month: u32, day: u32) -> String {
    format!("{}-{:02}-{:02}", Local::now().year(), month, day)
}

fn casual(start: &str, end: &str) -> serde_json::Value {
    json!({
        "leaveType": "Casual Leave",
        "startDate": start,
        "endDate": end,
        "reason": "Personal work",
    })
}

#[tokio::test]
async fn default_leave_types_are_seeded() {
    let server = TestServer::start().await;
    let session = server
        .signup_verified("EMPLOYEE", "EMP001", "worker@example.com")
        .await;

    let response = server.get("/api/leave/types", &session.token).await;
    assert_eq!(response.status, StatusCode::OK);

    let types: Vec<(String, u64)> = response
        .data()
        .as_array()
        .unwrap()
        .iter()
        .map(|t| {
            (
                t["name"].as_str().unwrap().to_string(),
                t["maxDaysPerYear"].as_u64().unwrap(),
            )
        })
        .collect();
    assert_eq!(
        types,
        vec![
            ("Annual Leave".to_string(), 15),
            ("Casual Leave".to_string(), 8),
            ("Emergency Leave".to_string(), 3),
        ]
    );
}

#[tokio::test]
async fn apply_validates_input() {
    let server = TestServer::start().await;
    let session = server
        .signup_verified("EMPLOYEE", "EMP001", "worker@example.com")
        .await;

    let response = server
        .post(
            "/api/leave/apply",
            &session.token,
            json!({"leaveType": "Casual Leave"}),
        )
        .await;
    assert_eq!(response.status, StatusCode::BAD_REQUEST);
    assert_eq!(response.message(), "All fields are required");

    let response = server
        .post(
            "/api/leave/apply",
            &session.token,
            json!({
                "leaveType": "Sabbatical",
                "startDate": day(3, 2),
                "endDate": day(3, 4),
                "reason": "Rest",
            }),
        )
        .await;
    assert_eq!(response.status, StatusCode::NOT_FOUND);
    assert_eq!(response.message(), "Leave type not found");

    let response = server
        .post(
            "/api/leave/apply",
            &session.token,
            json!({
                "leaveType": "Casual Leave",
                "startDate": "02/03/2026",
                "endDate": day(3, 4),
                "reason": "Rest",
            }),
        )
        .await;
    assert_eq!(response.status, StatusCode::BAD_REQUEST);
    assert_eq!(response.message(), "Invalid date format. Use YYYY-MM-DD");

    let response = server
        .post(
            "/api/leave/apply",
            &session.token,
            casual(&day(3, 4), &day(3, 2)),
        )
        .await;
    assert_eq!(response.status, StatusCode::BAD_REQUEST);
    assert_eq!(response.message(), "End date must be after start date");
}

#[tokio::test]
async fn balance_tracks_approvals_only() {
    let server = TestServer::start().await;
    let admin = server
        .signup_verified("ADMIN", "ADM001", "admin@example.com")
        .await;
    let worker = server
        .signup_verified("EMPLOYEE", "EMP001", "worker@example.com")
        .await;

    // Three days of casual leave, pending
    let response = server
        .post(
            "/api/leave/apply",
            &worker.token,
            casual(&day(3, 2), &day(3, 4)),
        )
        .await;
    assert_eq!(response.status, StatusCode::CREATED);
    assert_eq!(response.message(), "Leave request submitted successfully");
    let data = response.data();
    assert_eq!(data["status"], "PENDING");
    assert_eq!(data["totalDays"], 3);
    assert_eq!(data["leaveType"]["name"], "Casual Leave");
    let request_id = data["_id"].as_str().unwrap().to_string();

    // Pending requests do not consume balance
    let response = server.get("/api/leave/my-balance", &worker.token).await;
    let casual_row = response
        .data()
        .as_array()
        .unwrap()
        .iter()
        .find(|row| row["leaveType"] == "Casual Leave")
        .cloned()
        .unwrap();
    assert_eq!(casual_row["totalAllowed"], 8);
    assert_eq!(casual_row["used"], 0);
    assert_eq!(casual_row["remaining"], 8);

    // Approval moves the days to used
    let response = server
        .put(
            &format!("/api/leave/{}/status", request_id),
            &admin.token,
            json!({"status": "APPROVED"}),
        )
        .await;
    assert_eq!(response.status, StatusCode::OK);
    assert_eq!(response.message(), "Leave request approved successfully");
    assert_eq!(response.data()["status"], "APPROVED");
    assert_eq!(response.data()["approvedBy"]["email"], "admin@example.com");
    assert!(response.data()["approvedAt"].is_i64());

    let response = server.get("/api/leave/my-balance", &worker.token).await;
    let casual_row = response
        .data()
        .as_array()
        .unwrap()
        .iter()
        .find(|row| row["leaveType"] == "Casual Leave")
        .cloned()
        .unwrap();
    assert_eq!(casual_row["used"], 3);
    assert_eq!(casual_row["remaining"], 5);

    // Six more days exceed the remaining five
    let response = server
        .post(
            "/api/leave/apply",
            &worker.token,
            casual(&day(4, 6), &day(4, 11)),
        )
        .await;
    assert_eq!(response.status, StatusCode::BAD_REQUEST);
    assert_eq!(
        response.message(),
        "Insufficient leave balance. Available: 5 days"
    );

    // Exactly five days fit
    let response = server
        .post(
            "/api/leave/apply",
            &worker.token,
            casual(&day(4, 6), &day(4, 10)),
        )
        .await;
    assert_eq!(response.status, StatusCode::CREATED);
}

#[tokio::test]
async fn overlapping_requests_are_rejected() {
    let server = TestServer::start().await;
    let admin = server
        .signup_verified("ADMIN", "ADM001", "admin@example.com")
        .await;
    let worker = server
        .signup_verified("EMPLOYEE", "EMP001", "worker@example.com")
        .await;

    let response = server
        .post(
            "/api/leave/apply",
            &worker.token,
            casual(&day(3, 10), &day(3, 12)),
        )
        .await;
    assert_eq!(response.status, StatusCode::CREATED);
    let request_id = response.data()["_id"].as_str().unwrap().to_string();

    let response = server
        .post(
            "/api/leave/apply",
            &worker.token,
            casual(&day(3, 12), &day(3, 14)),
        )
        .await;
    assert_eq!(response.status, StatusCode::BAD_REQUEST);
    assert_eq!(
        response.message(),
        "You already have a leave request for these dates"
    );

    // A rejected request frees its window
    let response = server
        .put(
            &format!("/api/leave/{}/status", request_id),
            &admin.token,
            json!({"status": "REJECTED", "comments": "Short staffed"}),
        )
        .await;
    assert_eq!(response.status, StatusCode::OK);
    assert_eq!(response.message(), "Leave request rejected successfully");
    assert_eq!(response.data()["comments"], "Short staffed");

    let response = server
        .post(
            "/api/leave/apply",
            &worker.token,
            casual(&day(3, 12), &day(3, 14)),
        )
        .await;
    assert_eq!(response.status, StatusCode::CREATED);
}

#[tokio::test]
async fn only_pending_requests_can_be_cancelled() {
    let server = TestServer::start().await;
    let admin = server
        .signup_verified("ADMIN", "ADM001", "admin@example.com")
        .await;
    let worker = server
        .signup_verified("EMPLOYEE", "EMP001", "worker@example.com")
        .await;
    let other = server
        .signup_verified("EMPLOYEE", "EMP002", "other@example.com")
        .await;

    let response = server
        .post(
            "/api/leave/apply",
            &worker.token,
            casual(&day(3, 2), &day(3, 3)),
        )
        .await;
    let request_id = response.data()["_id"].as_str().unwrap().to_string();

    // Someone else's request is out of reach
    let response = server
        .delete(&format!("/api/leave/{}", request_id), &other.token)
        .await;
    assert_eq!(response.status, StatusCode::FORBIDDEN);
    assert_eq!(
        response.message(),
        "Not authorized to cancel this leave request"
    );

    let response = server
        .delete(&format!("/api/leave/{}", request_id), &worker.token)
        .await;
    assert_eq!(response.status, StatusCode::OK);
    assert_eq!(response.message(), "Leave request cancelled successfully");

    let response = server
        .delete(&format!("/api/leave/{}", request_id), &worker.token)
        .await;
    assert_eq!(response.status, StatusCode::NOT_FOUND);
    assert_eq!(response.message(), "Leave request not found");

    // Approved requests stay on the books
    let response = server
        .post(
            "/api/leave/apply",
            &worker.token,
            casual(&day(4, 6), &day(4, 7)),
        )
        .await;
    let request_id = response.data()["_id"].as_str().unwrap().to_string();
    server
        .put(
            &format!("/api/leave/{}/status", request_id),
            &admin.token,
            json!({"status": "APPROVED"}),
        )
        .await;

    let response = server
        .delete(&format!("/api/leave/{}", request_id), &worker.token)
        .await;
    assert_eq!(response.status, StatusCode::BAD_REQUEST);
    assert_eq!(
        response.message(),
        "Only pending leave requests can be cancelled"
    );
}

#[tokio::test]
async fn decisions_are_one_way() {
    let server = TestServer::start().await;
    let admin = server
        .signup_verified("ADMIN", "ADM001", "admin@example.com")
        .await;
    let worker = server
        .signup_verified("EMPLOYEE", "EMP001", "worker@example.com")
        .await;

    let response = server
        .post(
            "/api/leave/apply",
            &worker.token,
            casual(&day(3, 2), &day(3, 3)),
        )
        .await;
    let request_id = response.data()["_id"].as_str().unwrap().to_string();
    let status_path = format!("/api/leave/{}/status", request_id);

    let response = server
        .put(&status_path, &admin.token, json!({"status": "MAYBE"}))
        .await;
    assert_eq!(response.status, StatusCode::BAD_REQUEST);
    assert_eq!(
        response.message(),
        "Invalid status. Must be APPROVED or REJECTED"
    );

    let response = server
        .put(&status_path, &admin.token, json!({"status": "APPROVED"}))
        .await;
    assert_eq!(response.status, StatusCode::OK);

    // A processed request cannot be decided again
    let response = server
        .put(&status_path, &admin.token, json!({"status": "REJECTED"}))
        .await;
    assert_eq!(response.status, StatusCode::BAD_REQUEST);
    assert_eq!(
        response.message(),
        "This leave request has already been processed"
    );
}

#[tokio::test]
async fn my_leaves_supports_status_and_year_filters() {
    let server = TestServer::start().await;
    let admin = server
        .signup_verified("ADMIN", "ADM001", "admin@example.com")
        .await;
    let worker = server
        .signup_verified("EMPLOYEE", "EMP001", "worker@example.com")
        .await;

    let response = server
        .post(
            "/api/leave/apply",
            &worker.token,
            casual(&day(3, 2), &day(3, 3)),
        )
        .await;
    let first_id = response.data()["_id"].as_str().unwrap().to_string();
    server
        .post(
            "/api/leave/apply",
            &worker.token,
            json!({
                "leaveType": "Annual Leave",
                "startDate": day(5, 4),
                "endDate": day(5, 5),
                "reason": "Vacation",
            }),
        )
        .await;
    server
        .put(
            &format!("/api/leave/{}/status", first_id),
            &admin.token,
            json!({"status": "APPROVED"}),
        )
        .await;

    let response = server.get("/api/leave/my-leaves", &worker.token).await;
    assert_eq!(response.status, StatusCode::OK);
    assert_eq!(response.data().as_array().unwrap().len(), 2);

    // Status filter is case-insensitive
    let response = server
        .get("/api/leave/my-leaves?status=pending", &worker.token)
        .await;
    let data = response.data().as_array().unwrap().clone();
    assert_eq!(data.len(), 1);
    assert_eq!(data[0]["leaveType"]["name"], "Annual Leave");

    let response = server
        .get("/api/leave/my-leaves?year=1999", &worker.token)
        .await;
    assert_eq!(response.data().as_array().unwrap().len(), 0);
}

#[tokio::test]
async fn admins_list_and_page_all_requests() {
    let server = TestServer::start().await;
    let admin = server
        .signup_verified("ADMIN", "ADM001", "admin@example.com")
        .await;
    let worker = server
        .signup_verified("EMPLOYEE", "EMP001", "worker@example.com")
        .await;

    for (start, end) in [(day(3, 2), day(3, 3)), (day(4, 6), day(4, 7)), (day(5, 4), day(5, 5))] {
        let response = server
            .post("/api/leave/apply", &worker.token, casual(&start, &end))
            .await;
        assert_eq!(response.status, StatusCode::CREATED);
    }

    let response = server.get("/api/leave/all?limit=2", &admin.token).await;
    assert_eq!(response.status, StatusCode::OK);
    let data = response.data();
    assert_eq!(data["leaveRequests"].as_array().unwrap().len(), 2);
    assert_eq!(data["pagination"]["totalRecords"], 3);
    assert_eq!(data["pagination"]["hasMore"], true);

    let path = format!("/api/leave/all?employeeId={}&status=PENDING", worker.employee_id);
    let response = server.get(&path, &admin.token).await;
    assert_eq!(response.data()["leaveRequests"].as_array().unwrap().len(), 3);

    let response = server.get("/api/leave/all?employeeId=junk", &admin.token).await;
    assert_eq!(response.status, StatusCode::BAD_REQUEST);
    assert_eq!(response.message(), "Invalid employee id");

    // Employees cannot see the company-wide list
    let response = server.get("/api/leave/all", &worker.token).await;
    assert_eq!(response.status, StatusCode::FORBIDDEN);
}

#[tokio::test]
async fn statistics_summarize_the_year() {
    let server = TestServer::start().await;
    let admin = server
        .signup_verified("ADMIN", "ADM001", "admin@example.com")
        .await;
    let worker = server
        .signup_verified("EMPLOYEE", "EMP001", "worker@example.com")
        .await;

    let response = server
        .post(
            "/api/leave/apply",
            &worker.token,
            casual(&day(3, 2), &day(3, 4)),
        )
        .await;
    let first_id = response.data()["_id"].as_str().unwrap().to_string();
    server
        .post(
            "/api/leave/apply",
            &worker.token,
            json!({
                "leaveType": "Annual Leave",
                "startDate": day(5, 4),
                "endDate": day(5, 5),
                "reason": "Vacation",
            }),
        )
        .await;
    server
        .put(
            &format!("/api/leave/{}/status", first_id),
            &admin.token,
            json!({"status": "APPROVED"}),
        )
        .await;

    let response = server.get("/api/leave/statistics", &admin.token).await;
    assert_eq!(response.status, StatusCode::OK);
    let data = response.data();
    assert_eq!(data["totalRequests"], 2);
    assert_eq!(data["pendingRequests"], 1);
    assert_eq!(data["approvedRequests"], 1);
    assert_eq!(data["rejectedRequests"], 0);

    let by_type = data["leavesByType"].as_array().unwrap();
    assert_eq!(by_type.len(), 2);
    assert_eq!(by_type[0]["leaveType"], "Annual Leave");
    assert_eq!(by_type[0]["count"], 1);
    assert_eq!(by_type[0]["totalDays"], 2);
    assert_eq!(by_type[1]["leaveType"], "Casual Leave");
    assert_eq!(by_type[1]["totalDays"], 3);

    // Years without requests are empty
    let response = server.get("/api/leave/statistics?year=1999", &admin.token).await;
    assert_eq!(response.data()["totalRequests"], 0);
    assert!(response.data()["leavesByType"].as_array().unwrap().is_empty());
}

#[tokio::test]
async fn admins_manage_leave_types() {
    let server = TestServer::start().await;
    let admin = server
        .signup_verified("ADMIN", "ADM001", "admin@example.com")
        .await;
    let worker = server
        .signup_verified("EMPLOYEE", "EMP001", "worker@example.com")
        .await;

    let response = server
        .post(
            "/api/leave/types",
            &admin.token,
            json!({"name": "Paternity Leave", "maxDaysPerYear": 10}),
        )
        .await;
    assert_eq!(response.status, StatusCode::CREATED);
    assert_eq!(response.message(), "Leave type created successfully");
    assert_eq!(response.data()["name"], "Paternity Leave");
    assert_eq!(response.data()["maxDaysPerYear"], 10);

    let response = server
        .post(
            "/api/leave/types",
            &admin.token,
            json!({"name": "Paternity Leave", "maxDaysPerYear": 12}),
        )
        .await;
    assert_eq!(response.status, StatusCode::CONFLICT);
    assert_eq!(
        response.message(),
        "Leave type 'Paternity Leave' already exists"
    );

    let response = server
        .post("/api/leave/types", &admin.token, json!({"name": "Unpaid"}))
        .await;
    assert_eq!(response.status, StatusCode::BAD_REQUEST);
    assert_eq!(response.message(), "Name and maxDaysPerYear are required");

    let response = server
        .post(
            "/api/leave/types",
            &worker.token,
            json!({"name": "Gardening Leave", "maxDaysPerYear": 1}),
        )
        .await;
    assert_eq!(response.status, StatusCode::FORBIDDEN);

    // The new type shows up for everyone, and in balances
    let response = server.get("/api/leave/types", &worker.token).await;
    assert_eq!(response.data().as_array().unwrap().len(), 4);

    let response = server.get("/api/leave/my-balance", &worker.token).await;
    let names: Vec<String> = response
        .data()
        .as_array()
        .unwrap()
        .iter()
        .map(|row| row["leaveType"].as_str().unwrap().to_string())
        .collect();
    assert!(names.contains(&"Paternity Leave".to_string()));
}
