use chrono::{DateTime, Utc};
use futures::try_join;
use serde::de::DeserializeOwned;
use serde_json::Value;
use tower::ServiceExt;
use tracing::{debug, info, warn};

use crate::assignment::{Assignment, AssignmentId, Bucket, merge_buckets};
use crate::course::{Course, CourseId};
use crate::creds::{Creds, ProxyConfig};
use crate::error::ApiError;
use crate::services::lms_service::{self, LmsRequest, LmsService};
use crate::user::User;
use crate::util::*;

/// An authenticated client. Built once at startup and handed to whatever needs the LMS.
pub type Session<Service> = Client<Service, Auth>;

#[derive(Debug, Clone)]
pub struct Client<Service, State: ClientState = Auth> {
    service: Service,
    state: State,
}

/// Builds a client that talks HTTP to the LMS proxy.
pub fn client(creds: Creds, config: ProxyConfig) -> Result<Client<impl LmsService, Init>, ApiError> {
    let service = lms_service::service(creds, config)?;
    Ok(Client::new(service))
}

impl<Service: LmsService, State: ClientState> Client<Service, State> {
    #[tracing::instrument(level = "debug", skip(self, request), fields(%request))]
    pub async fn get_json<T: DeserializeOwned>(&self, request: LmsRequest) -> Result<T, ApiError> {
        let path = request.path().to_owned();
        let response = self.service.clone().oneshot(request).await?;
        let (body, _) = response.into_parts();
        decode(&path, body)
    }

    /// Collects every page of a list endpoint by following next-page links.
    #[tracing::instrument(level = "debug", skip(self, request), fields(%request))]
    pub async fn get_paginated<T: DeserializeOwned>(
        &self,
        request: LmsRequest,
    ) -> Result<Vec<T>, ApiError> {
        let mut items = Vec::new();
        let mut next = Some(request);
        let mut pages = 0;

        while let Some(request) = next.take() {
            if pages == MAX_PAGES {
                warn!(pages, %request, "stopped following pagination");
                break;
            }
            pages += 1;

            let path = request.path().to_owned();
            let response = self.service.clone().oneshot(request).await?;
            let (body, next_page) = response.into_parts();
            if !body.is_null() {
                items.extend(decode::<Vec<T>>(&path, body)?);
            }
            next = next_page;
        }

        debug!(pages, count = items.len(), "collected pages");
        Ok(items)
    }
}

impl<Service: LmsService> Client<Service, Init> {
    pub fn new(service: Service) -> Self {
        Self {
            service,
            state: Init,
        }
    }

    /// Checks the credential by fetching the user's own profile.
    #[tracing::instrument(skip(self), err)]
    pub async fn login(self) -> Result<Session<Service>, ApiError> {
        let user: User = self.get_json(LmsRequest::new(PROFILE_PATH)).await?;
        info!(user = user.name(), "authenticated");

        Ok(Client {
            service: self.service,
            state: Auth { user },
        })
    }
}

impl<Service: LmsService> Client<Service, Auth> {
    pub fn user(&self) -> &User {
        &self.state.user
    }

    pub fn logout(self) -> Client<Service, Init> {
        info!(user = self.user().name(), "logged out");
        Client::new(self.service)
    }

    pub async fn get_active_courses(&self) -> Result<Vec<Course>, ApiError> {
        self.get_active_courses_at(Utc::now()).await
    }

    /// Courses the user is enrolled in that are still worth showing as of `now`. See
    /// [`Course::is_active`].
    #[tracing::instrument(skip(self), err)]
    pub async fn get_active_courses_at(&self, now: DateTime<Utc>) -> Result<Vec<Course>, ApiError> {
        let request = LmsRequest::new(COURSES_PATH)
            .with_query("enrollment_state", "active")
            .with_query_all("include[]", ["term"])
            .with_query_all("state[]", ["available"])
            .with_query("per_page", PER_PAGE);

        let courses: Vec<Course> = self.get_paginated(request).await?;
        let total = courses.len();
        let active: Vec<_> = courses
            .into_iter()
            .filter(|course| course.is_active(now))
            .collect();

        info!(total, active = active.len(), "fetched courses");
        Ok(active)
    }

    /// The unsubmitted and upcoming buckets of a course, merged by [`merge_buckets`].
    #[tracing::instrument(skip(self), err)]
    pub async fn get_incomplete_assignments(
        &self,
        course_id: CourseId,
    ) -> Result<Vec<Assignment>, ApiError> {
        let (unsubmitted, upcoming) = try_join!(
            self.get_bucket(course_id, Bucket::Unsubmitted),
            self.get_bucket(course_id, Bucket::Upcoming),
        )?;
        debug!(
            unsubmitted = unsubmitted.len(),
            upcoming = upcoming.len(),
            "fetched buckets"
        );

        Ok(merge_buckets(unsubmitted, upcoming))
    }

    pub async fn get_bucket(
        &self,
        course_id: CourseId,
        bucket: Bucket,
    ) -> Result<Vec<Assignment>, ApiError> {
        let request = LmsRequest::new(course_path(course_id, ASSIGNMENTS_COURSE_PATH))
            .with_query("bucket", bucket)
            .with_query_all("include[]", ["submission"])
            .with_query("per_page", PER_PAGE);

        self.get_paginated(request).await
    }

    pub async fn get_assignment(
        &self,
        course_id: CourseId,
        assignment_id: AssignmentId,
    ) -> Result<Assignment, ApiError> {
        let request = LmsRequest::new(assignment_path(course_id, assignment_id))
            .with_query_all("include[]", ["submission"]);
        self.get_json(request).await
    }
}

fn decode<T: DeserializeOwned>(path: &str, body: Value) -> Result<T, ApiError> {
    serde_json::from_value(body).map_err(|source| ApiError::Decode {
        path: path.to_owned(),
        source,
    })
}

#[derive(Debug, Clone)]
pub struct Init;

#[derive(Debug, Clone)]
pub struct Auth {
    user: User,
}

pub trait ClientState {}
impl ClientState for Init {}
impl ClientState for Auth {}
