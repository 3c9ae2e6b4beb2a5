//! Attendance lifecycle: daily check-in and check-out, admin
//! corrections, summaries and CSV exports.

mod common;

use common::TestServer;
use http::StatusCode;
use serde_json::json;

const HOUR: i64 = 3_600_000;

#[tokio::test]
async fn check_in_and_out_close_the_day() {
    let server = TestServer::start().await;
    let session = server
        .signup_verified("EMPLOYEE", "EMP001", "worker@example.com")
        .await;

    // Nothing on record before the first check-in
    let response = server.get("/api/attendance/today", &session.token).await;
    assert_eq!(response.status, StatusCode::OK);
    assert!(response.data().is_null());

    let response = server
        .post(
            "/api/attendance/check-in",
            &session.token,
            json!({"notes": "on site"}),
        )
        .await;
    assert_eq!(response.status, StatusCode::OK);
    assert_eq!(response.message(), "Checked in successfully");
    let data = response.data();
    assert_eq!(data["status"], "Present");
    assert!(data["checkIn"].is_i64());
    assert!(data["checkOut"].is_null());
    assert_eq!(data["workingHours"], 0.0);
    assert_eq!(data["notes"], "on site");
    assert_eq!(data["employee"]["employeeCode"], "EMP001");

    // Second check-in the same day is refused
    let response = server
        .request("POST", "/api/attendance/check-in", Some(&session.token), None)
        .await;
    assert_eq!(response.status, StatusCode::BAD_REQUEST);
    assert_eq!(response.message(), "Already checked in today");

    // An immediate check-out yields zero hours, which is a half day
    let response = server
        .request("POST", "/api/attendance/check-out", Some(&session.token), None)
        .await;
    assert_eq!(response.status, StatusCode::OK);
    assert_eq!(response.message(), "Checked out successfully");
    let data = response.data();
    assert!(data["checkOut"].is_i64());
    assert!(data["workingHours"].as_f64().unwrap() < 0.01);
    assert_eq!(data["status"], "Half-day");

    let response = server
        .request("POST", "/api/attendance/check-out", Some(&session.token), None)
        .await;
    assert_eq!(response.status, StatusCode::BAD_REQUEST);
    assert_eq!(response.message(), "Already checked out today");

    // The day now shows up in today and in the history
    let response = server.get("/api/attendance/today", &session.token).await;
    assert_eq!(response.data()["status"], "Half-day");

    let response = server
        .get("/api/attendance/my-attendance", &session.token)
        .await;
    assert_eq!(response.status, StatusCode::OK);
    let data = response.data();
    assert_eq!(data["attendance"].as_array().unwrap().len(), 1);
    assert_eq!(data["pagination"]["totalRecords"], 1);
    assert_eq!(data["pagination"]["currentPage"], 1);
    assert_eq!(data["pagination"]["hasMore"], false);
}

#[tokio::test]
async fn check_out_requires_a_check_in() {
    let server = TestServer::start().await;
    let session = server
        .signup_verified("EMPLOYEE", "EMP001", "worker@example.com")
        .await;

    let response = server
        .request("POST", "/api/attendance/check-out", Some(&session.token), None)
        .await;
    assert_eq!(response.status, StatusCode::BAD_REQUEST);
    assert_eq!(response.message(), "No check-in record found for today");
}

#[tokio::test]
async fn admin_marks_and_corrects_records() {
    let server = TestServer::start().await;
    let admin = server
        .signup_verified("ADMIN", "ADM001", "admin@example.com")
        .await;
    let worker = server
        .signup_verified("EMPLOYEE", "EMP001", "worker@example.com")
        .await;

    let response = server
        .post(
            "/api/attendance/mark",
            &admin.token,
            json!({
                "employeeId": worker.employee_id,
                "date": "2025-03-10",
                "status": "Absent",
            }),
        )
        .await;
    assert_eq!(response.status, StatusCode::CREATED);
    assert_eq!(response.message(), "Attendance marked successfully");
    let record_id = response.data()["_id"].as_str().unwrap().to_string();
    assert_eq!(response.data()["status"], "Absent");

    // One record per employee per day
    let response = server
        .post(
            "/api/attendance/mark",
            &admin.token,
            json!({
                "employeeId": worker.employee_id,
                "date": "2025-03-10",
                "status": "Present",
            }),
        )
        .await;
    assert_eq!(response.status, StatusCode::BAD_REQUEST);
    assert_eq!(
        response.message(),
        "Attendance record already exists for this date"
    );

    // Correcting with real times recomputes hours and rederives status
    let start = 1_741_590_000_000;
    let response = server
        .put(
            &format!("/api/attendance/{}", record_id),
            &admin.token,
            json!({"checkIn": start, "checkOut": start + 8 * HOUR + HOUR / 2}),
        )
        .await;
    assert_eq!(response.status, StatusCode::OK);
    assert_eq!(response.message(), "Attendance updated successfully");
    assert_eq!(response.data()["workingHours"], 8.5);
    assert_eq!(response.data()["status"], "Present");

    // An explicit status is taken as-is
    let response = server
        .put(
            &format!("/api/attendance/{}", record_id),
            &admin.token,
            json!({"status": "Leave"}),
        )
        .await;
    assert_eq!(response.data()["status"], "Leave");
    assert_eq!(response.data()["workingHours"], 8.5);

    let response = server
        .delete(&format!("/api/attendance/{}", record_id), &admin.token)
        .await;
    assert_eq!(response.status, StatusCode::OK);
    assert_eq!(response.message(), "Attendance deleted successfully");

    let response = server
        .delete(&format!("/api/attendance/{}", record_id), &admin.token)
        .await;
    assert_eq!(response.status, StatusCode::NOT_FOUND);
    assert_eq!(response.message(), "Attendance record not found");
}

#[tokio::test]
async fn mark_validates_its_input() {
    let server = TestServer::start().await;
    let admin = server
        .signup_verified("ADMIN", "ADM001", "admin@example.com")
        .await;

    let response = server
        .post("/api/attendance/mark", &admin.token, json!({"date": "2025-03-10"}))
        .await;
    assert_eq!(response.status, StatusCode::BAD_REQUEST);
    assert_eq!(response.message(), "Employee ID, date, and status are required");

    let response = server
        .post(
            "/api/attendance/mark",
            &admin.token,
            json!({
                "employeeId": admin.employee_id,
                "date": "10/03/2025",
                "status": "Present",
            }),
        )
        .await;
    assert_eq!(response.status, StatusCode::BAD_REQUEST);
    assert_eq!(response.message(), "Invalid date format. Use YYYY-MM-DD");

    let response = server
        .post(
            "/api/attendance/mark",
            &admin.token,
            json!({
                "employeeId": "employee:doesnotexist",
                "date": "2025-03-10",
                "status": "Present",
            }),
        )
        .await;
    assert_eq!(response.status, StatusCode::NOT_FOUND);
    assert_eq!(response.message(), "Employee not found");
}

#[tokio::test]
async fn summary_counts_records_by_status() {
    let server = TestServer::start().await;
    let admin = server
        .signup_verified("ADMIN", "ADM001", "admin@example.com")
        .await;
    let worker = server
        .signup_verified("EMPLOYEE", "EMP001", "worker@example.com")
        .await;

    for (date, status) in [
        ("2025-03-10", "Present"),
        ("2025-03-11", "Absent"),
        ("2025-03-12", "Half-day"),
        ("2025-03-13", "Leave"),
    ] {
        let response = server
            .post(
                "/api/attendance/mark",
                &admin.token,
                json!({"employeeId": worker.employee_id, "date": date, "status": status}),
            )
            .await;
        assert_eq!(response.status, StatusCode::CREATED, "mark {}", date);
    }

    let response = server.get("/api/attendance/summary", &admin.token).await;
    assert_eq!(response.status, StatusCode::OK);
    let data = response.data();
    assert_eq!(data["total"], 4);
    assert_eq!(data["Present"], 1);
    assert_eq!(data["Absent"], 1);
    assert_eq!(data["Half-day"], 1);
    assert_eq!(data["Leave"], 1);

    // Date range narrows the counts
    let response = server
        .get(
            "/api/attendance/summary?startDate=2025-03-11&endDate=2025-03-12",
            &admin.token,
        )
        .await;
    let data = response.data();
    assert_eq!(data["total"], 2);
    assert_eq!(data["Present"], 0);
    assert_eq!(data["Absent"], 1);
    assert_eq!(data["Half-day"], 1);
}

#[tokio::test]
async fn all_attendance_filters_and_paginates() {
    let server = TestServer::start().await;
    let admin = server
        .signup_verified("ADMIN", "ADM001", "admin@example.com")
        .await;
    let worker = server
        .signup_verified("EMPLOYEE", "EMP001", "worker@example.com")
        .await;

    for day in 10..15 {
        let response = server
            .post(
                "/api/attendance/mark",
                &admin.token,
                json!({
                    "employeeId": worker.employee_id,
                    "date": format!("2025-03-{}", day),
                    "status": "Present",
                }),
            )
            .await;
        assert_eq!(response.status, StatusCode::CREATED);
    }

    let response = server
        .get("/api/attendance/all?page=1&limit=2", &admin.token)
        .await;
    assert_eq!(response.status, StatusCode::OK);
    let data = response.data();
    assert_eq!(data["attendance"].as_array().unwrap().len(), 2);
    assert_eq!(data["pagination"]["totalRecords"], 5);
    assert_eq!(data["pagination"]["totalPages"], 3);
    assert_eq!(data["pagination"]["hasMore"], true);

    // Filter by employee and date range
    let path = format!(
        "/api/attendance/all?employeeId={}&startDate=2025-03-12&endDate=2025-03-13",
        worker.employee_id
    );
    let response = server.get(&path, &admin.token).await;
    let data = response.data();
    assert_eq!(data["attendance"].as_array().unwrap().len(), 2);

    let response = server
        .get("/api/attendance/all?employeeId=garbage", &admin.token)
        .await;
    assert_eq!(response.status, StatusCode::BAD_REQUEST);
    assert_eq!(response.message(), "Invalid employee id");
}

#[tokio::test]
async fn exports_come_back_as_csv() {
    let server = TestServer::start().await;
    let admin = server
        .signup_verified("ADMIN", "ADM001", "admin@example.com")
        .await;
    let worker = server
        .signup_verified("EMPLOYEE", "EMP001", "worker@example.com")
        .await;
    server
        .post(
            "/api/attendance/mark",
            &admin.token,
            json!({"employeeId": worker.employee_id, "date": "2025-03-10", "status": "Present"}),
        )
        .await;

    let response = server
        .get("/api/attendance/export/excel", &admin.token)
        .await;
    assert_eq!(response.status, StatusCode::OK);
    assert_eq!(
        response.headers.get(http::header::CONTENT_TYPE).unwrap(),
        "text/csv"
    );
    let csv = response.body.as_str().unwrap();
    assert!(csv.starts_with("Employee Code,Employee Name,Department,Date"));
    assert!(csv.contains("EMP001"));
    assert!(csv.contains("2025-03-10"));

    let response = server
        .get("/api/attendance/export/employees", &admin.token)
        .await;
    assert_eq!(response.status, StatusCode::OK);
    let csv = response.body.as_str().unwrap();
    assert!(csv.starts_with("Employee Code,First Name,Last Name,Email"));
    assert!(csv.contains("worker@example.com"));
}

#[tokio::test]
async fn management_routes_reject_employees() {
    let server = TestServer::start().await;
    let session = server
        .signup_verified("EMPLOYEE", "EMP001", "worker@example.com")
        .await;

    for path in [
        "/api/attendance/all",
        "/api/attendance/summary",
        "/api/attendance/export/excel",
    ] {
        let response = server.get(path, &session.token).await;
        assert_eq!(response.status, StatusCode::FORBIDDEN, "{}", path);
    }

    let response = server
        .post(
            "/api/attendance/mark",
            &session.token,
            json!({"employeeId": session.employee_id, "date": "2025-03-10", "status": "Present"}),
        )
        .await;
    assert_eq!(response.status, StatusCode::FORBIDDEN);
}

#[tokio::test]
async fn hr_role_can_use_management_routes() {
    let server = TestServer::start().await;
    let hr = server
        .signup_verified("HR", "HRX001", "hr@example.com")
        .await;

    let response = server.get("/api/attendance/summary", &hr.token).await;
    assert_eq!(response.status, StatusCode::OK);
    assert_eq!(response.data()["total"], 0);
}
