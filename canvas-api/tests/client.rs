use std::sync::{Arc, Mutex};

use canvas_api::assignment::{Assignment, AssignmentId, Bucket};
use canvas_api::client::Client;
use canvas_api::course::CourseId;
use canvas_api::error::{ApiError, ErrorKind};
use canvas_api::services::lms_service::{LmsRequest, LmsResponse, LmsService};
use chrono::{DateTime, Utc};
use futures::future;
use reqwest::StatusCode;
use serde_json::{Value, json};
use tower::service_fn;

fn fake_lms<H>(handler: H) -> impl LmsService
where
    H: Fn(&LmsRequest) -> Result<LmsResponse, ApiError> + Clone,
{
    service_fn(move |request: LmsRequest| future::ready(handler(&request)))
}

fn profile() -> Value {
    json!({ "id": 42, "name": "Ada Student", "avatar_url": null })
}

fn now() -> DateTime<Utc> {
    "2024-03-01T12:00:00Z".parse().unwrap()
}

fn assignments(course_id: u64, ids: impl IntoIterator<Item = u64>, label: &str) -> Value {
    ids.into_iter()
        .map(|id| {
            json!({
                "id": id,
                "name": format!("{label} {id}"),
                "course_id": course_id,
                "due_at": null,
                "submission_types": ["online_upload"],
            })
        })
        .collect()
}

fn server_error(request: &LmsRequest) -> ApiError {
    ApiError::Status {
        path: request.path().to_owned(),
        status: StatusCode::INTERNAL_SERVER_ERROR,
    }
}

#[tokio::test]
async fn login_fetches_profile() {
    let service = fake_lms(|request| match request.path() {
        "/users/self/profile" => Ok(LmsResponse::last(profile())),
        _ => Err(server_error(request)),
    });

    let session = Client::new(service).login().await.unwrap();
    assert_eq!(session.user().name(), "Ada Student");
    assert_eq!(session.user().id(), 42);

    let logged_out = session.logout();
    assert!(logged_out.login().await.is_ok());
}

#[tokio::test]
async fn rejected_token_is_auth_error() {
    let service = fake_lms(|_| Err(ApiError::Auth));
    let err = Client::new(service).login().await.err().unwrap();
    assert_eq!(err.kind(), ErrorKind::Auth);
}

#[tokio::test]
async fn active_courses_are_filtered_and_queried_correctly() {
    let seen = Arc::new(Mutex::new(Vec::new()));
    let service = fake_lms({
        let seen = Arc::clone(&seen);
        move |request| {
            seen.lock().unwrap().push(request.clone());
            match request.path() {
                "/users/self/profile" => Ok(LmsResponse::last(profile())),
                "/courses" => Ok(LmsResponse::last(json!([
                    { "id": 1, "name": "Recently ended", "course_code": "A",
                      "term": { "end_at": "2024-02-20T00:00:00Z" } },
                    { "id": 2, "name": "Long over", "course_code": "B",
                      "term": { "end_at": "2024-02-01T00:00:00Z" } },
                    { "id": 3, "name": "", "course_code": "C" },
                    { "id": 4, "name": "Unpublished", "course_code": "D",
                      "workflow_state": "unpublished" },
                    { "id": 5, "name": "No term", "course_code": "E" },
                ]))),
                _ => Err(server_error(request)),
            }
        }
    });

    let session = Client::new(service).login().await.unwrap();
    let courses = session.get_active_courses_at(now()).await.unwrap();
    let ids: Vec<_> = courses.iter().map(|course| course.id().as_u64()).collect();
    assert_eq!(ids, [1, 5]);

    let seen = seen.lock().unwrap();
    let courses_request = seen.iter().find(|r| r.path() == "/courses").unwrap();
    assert_eq!(courses_request.query_value("enrollment_state"), Some("active"));
    assert_eq!(courses_request.query_value("include[]"), Some("term"));
    assert_eq!(courses_request.query_value("state[]"), Some("available"));
    assert_eq!(courses_request.query_value("per_page"), Some("100"));
}

#[tokio::test]
async fn course_list_failure_propagates() {
    let service = fake_lms(|request| match request.path() {
        "/users/self/profile" => Ok(LmsResponse::last(profile())),
        _ => Err(server_error(request)),
    });

    let session = Client::new(service).login().await.unwrap();
    let err = session.get_active_courses_at(now()).await.unwrap_err();
    assert_eq!(err.kind(), ErrorKind::Network);
}

#[tokio::test]
async fn incomplete_assignments_follow_pages_and_dedup() {
    // Unsubmitted: ids 1..=150 over two pages. Upcoming: ids 141..=160, overlapping ten.
    let service = fake_lms(|request| {
        let bucket = request.query_value("bucket");
        let page = request.query_value("page");
        match (request.path(), bucket, page) {
            ("/users/self/profile", _, _) => Ok(LmsResponse::last(profile())),
            ("/courses/7/assignments", Some("unsubmitted"), None) => Ok(LmsResponse::new(
                assignments(7, 1..=100, "unsubmitted"),
                Some(
                    LmsRequest::new("/courses/7/assignments")
                        .with_query("bucket", "unsubmitted")
                        .with_query("page", 2),
                ),
            )),
            ("/courses/7/assignments", Some("unsubmitted"), Some("2")) => Ok(
                LmsResponse::last(assignments(7, 101..=150, "unsubmitted")),
            ),
            ("/courses/7/assignments", Some("upcoming"), None) => {
                assert_eq!(request.query_value("include[]"), Some("submission"));
                assert_eq!(request.query_value("per_page"), Some("100"));
                Ok(LmsResponse::last(assignments(7, 141..=160, "upcoming")))
            }
            _ => Err(server_error(request)),
        }
    });

    let session = Client::new(service).login().await.unwrap();
    let incomplete = session
        .get_incomplete_assignments(CourseId::new(7))
        .await
        .unwrap();

    assert_eq!(incomplete.len(), 160);
    let ids: Vec<_> = incomplete.iter().map(|a| a.id().as_u64()).collect();
    assert_eq!(ids, (1..=160).collect::<Vec<_>>());
    assert_eq!(incomplete[145].name(), "unsubmitted 146");
    assert_eq!(incomplete[155].name(), "upcoming 156");
}

#[tokio::test]
async fn null_page_is_empty() {
    let service = fake_lms(|request| match request.path() {
        "/users/self/profile" => Ok(LmsResponse::last(profile())),
        _ => Ok(LmsResponse::last(Value::Null)),
    });

    let session = Client::new(service).login().await.unwrap();
    let overdue = session
        .get_bucket(CourseId::new(3), Bucket::Overdue)
        .await
        .unwrap();
    assert!(overdue.is_empty());
}

#[tokio::test]
async fn pagination_is_capped() {
    let calls = Arc::new(Mutex::new(0usize));
    let service = fake_lms({
        let calls = Arc::clone(&calls);
        move |request| match request.path() {
            "/users/self/profile" => Ok(LmsResponse::last(profile())),
            path => {
                *calls.lock().unwrap() += 1;
                let again = LmsRequest::new(path).with_query("bucket", "upcoming");
                Ok(LmsResponse::new(json!([]), Some(again)))
            }
        }
    });

    let session = Client::new(service).login().await.unwrap();
    let upcoming = session
        .get_bucket(CourseId::new(3), Bucket::Upcoming)
        .await
        .unwrap();
    assert!(upcoming.is_empty());
    assert_eq!(*calls.lock().unwrap(), 100);
}

#[tokio::test]
async fn malformed_page_is_decode_error() {
    let service = fake_lms(|request| match request.path() {
        "/users/self/profile" => Ok(LmsResponse::last(profile())),
        _ => Ok(LmsResponse::last(json!({ "errors": "nope" }))),
    });

    let session = Client::new(service).login().await.unwrap();
    let err = session
        .get_incomplete_assignments(CourseId::new(3))
        .await
        .unwrap_err();
    assert!(matches!(err, ApiError::Decode { .. }));
    assert_eq!(err.kind(), ErrorKind::Network);
}

#[tokio::test]
async fn single_assignment() {
    let service = fake_lms(|request| match request.path() {
        "/users/self/profile" => Ok(LmsResponse::last(profile())),
        "/courses/7/assignments/55" => Ok(LmsResponse::last(json!({
            "id": 55,
            "name": "Lab 5",
            "course_id": 7,
            "due_at": "2024-03-02T00:00:00Z",
            "quiz_id": 9,
        }))),
        _ => Err(server_error(request)),
    });

    let session = Client::new(service).login().await.unwrap();
    let assignment: Assignment = session
        .get_assignment(CourseId::new(7), AssignmentId::new(55))
        .await
        .unwrap();
    assert_eq!(assignment.name(), "Lab 5");
    assert_eq!(assignment.quiz_id(), Some(9));
}
