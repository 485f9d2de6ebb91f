use std::time::Duration;

use ironlog_domain as domain;
use log::debug;
use reqwest::header::{HeaderMap, HeaderValue};
use serde::de::DeserializeOwned;

use crate::schema;

pub const BASE_URL: &str = "https://api.hevyapp.com/v1";

const TIMEOUT: Duration = Duration::from_secs(30);
const USER_AGENT: &str = concat!("ironlog/", env!("CARGO_PKG_VERSION"));

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Method {
    Get,
    Post,
}

#[derive(Debug, Clone, PartialEq)]
pub struct Request {
    pub method: Method,
    pub path: String,
    pub query: Vec<(&'static str, String)>,
    pub body: Option<serde_json::Value>,
}

impl Request {
    #[must_use]
    pub fn get(path: &str) -> Self {
        Self {
            method: Method::Get,
            path: path.to_string(),
            query: vec![],
            body: None,
        }
    }

    #[must_use]
    pub fn post(path: &str, body: serde_json::Value) -> Self {
        Self {
            method: Method::Post,
            path: path.to_string(),
            query: vec![],
            body: Some(body),
        }
    }

    #[must_use]
    pub fn query(mut self, key: &'static str, value: impl ToString) -> Self {
        self.query.push((key, value.to_string()));
        self
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Response {
    pub status: u16,
    pub body: String,
}

pub trait SendRequest {
    fn send_request(&self, request: Request) -> Result<Response, domain::StorageError>;
}

pub struct ReqwestSendRequest {
    client: reqwest::blocking::Client,
    base_url: String,
}

impl ReqwestSendRequest {
    pub fn new(base_url: &str, api_key: &str) -> Result<Self, domain::StorageError> {
        let mut api_key = HeaderValue::from_str(api_key)
            .map_err(|err| domain::StorageError::Other(Box::new(err)))?;
        api_key.set_sensitive(true);
        let mut headers = HeaderMap::new();
        headers.insert("api-key", api_key);

        let client = reqwest::blocking::Client::builder()
            .timeout(TIMEOUT)
            .user_agent(USER_AGENT)
            .default_headers(headers)
            .build()
            .map_err(|err| domain::StorageError::Other(Box::new(err)))?;

        Ok(Self {
            client,
            base_url: base_url.trim_end_matches('/').to_string(),
        })
    }
}

impl SendRequest for ReqwestSendRequest {
    fn send_request(&self, request: Request) -> Result<Response, domain::StorageError> {
        let url = format!("{}{}", self.base_url, request.path);
        debug!("{:?} {url} {:?}", request.method, request.query);

        let mut builder = match request.method {
            Method::Get => self.client.get(&url),
            Method::Post => self.client.post(&url),
        }
        .query(&request.query);
        if let Some(body) = &request.body {
            builder = builder.json(body);
        }

        let response = builder.send().map_err(|err| {
            if err.is_connect() || err.is_timeout() {
                domain::StorageError::NoConnection
            } else {
                domain::StorageError::Other(Box::new(err))
            }
        })?;
        let status = response.status().as_u16();
        let body = response
            .text()
            .map_err(|err| domain::StorageError::Other(Box::new(err)))?;

        Ok(Response { status, body })
    }
}

pub struct REST<S: SendRequest> {
    pub sender: S,
}

impl REST<ReqwestSendRequest> {
    pub fn new(base_url: &str, api_key: &str) -> Result<Self, domain::StorageError> {
        Ok(Self {
            sender: ReqwestSendRequest::new(base_url, api_key)?,
        })
    }
}

impl<S: SendRequest> REST<S> {
    fn fetch<T: DeserializeOwned>(&self, request: Request) -> Result<T, domain::ReadError> {
        let response = self.sender.send_request(request)?;
        match response.status {
            200..=299 => serde_json::from_str(&response.body).map_err(|err| {
                domain::ReadError::Other(format!("deserialization failed: {err}").into())
            }),
            401 => Err(domain::StorageError::Unauthorized.into()),
            403 => Err(domain::StorageError::Forbidden.into()),
            404 => Err(domain::ReadError::NotFound),
            429 => Err(domain::StorageError::RateLimited.into()),
            status => Err(domain::ReadError::Other(
                format!("API returned status {status}: {}", response.body.trim()).into(),
            )),
        }
    }

    fn fetch_page<T: DeserializeOwned>(
        &self,
        path: &str,
        page: u32,
        page_size: u32,
    ) -> Result<T, domain::ReadError> {
        self.fetch(
            Request::get(path)
                .query("page", page)
                .query("pageSize", page_size),
        )
    }
}

impl<S: SendRequest> domain::WorkoutRepository for REST<S> {
    fn read_workouts(
        &self,
        page: u32,
        page_size: u32,
    ) -> Result<domain::Page<domain::Workout>, domain::ReadError> {
        let r: schema::WorkoutsPage = self.fetch_page("/workouts", page, page_size)?;
        Ok(schema::page(
            r.page,
            r.page_count,
            r.workouts,
            domain::Workout::try_from,
        )?)
    }

    fn read_workout(&self, id: domain::WorkoutID) -> Result<domain::Workout, domain::ReadError> {
        let r: schema::Workout = self.fetch(Request::get(&format!("/workouts/{id}")))?;
        Ok(domain::Workout::try_from(r)?)
    }

    fn create_workout(
        &self,
        workout: domain::NewWorkout,
    ) -> Result<domain::Workout, domain::CreateError> {
        let body = serde_json::to_value(schema::NewWorkoutRequest::from(workout))
            .map_err(|err| domain::CreateError::Other(Box::new(err)))?;
        let r: schema::WorkoutResponse = self.fetch(Request::post("/workouts", body))?;
        Ok(domain::Workout::try_from(r.workout).map_err(domain::ReadError::from)?)
    }
}

impl<S: SendRequest> domain::RoutineRepository for REST<S> {
    fn read_routines(
        &self,
        page: u32,
        page_size: u32,
    ) -> Result<domain::Page<domain::Routine>, domain::ReadError> {
        let r: schema::RoutinesPage = self.fetch_page("/routines", page, page_size)?;
        Ok(schema::page(
            r.page,
            r.page_count,
            r.routines,
            domain::Routine::try_from,
        )?)
    }

    fn read_routine(&self, id: domain::RoutineID) -> Result<domain::Routine, domain::ReadError> {
        let r: schema::RoutineResponse = self.fetch(Request::get(&format!("/routines/{id}")))?;
        Ok(domain::Routine::try_from(r.routine)?)
    }

    fn read_routine_folders(
        &self,
        page: u32,
        page_size: u32,
    ) -> Result<domain::Page<domain::RoutineFolder>, domain::ReadError> {
        let r: schema::RoutineFoldersPage =
            self.fetch_page("/routine_folders", page, page_size)?;
        Ok(schema::page(r.page, r.page_count, r.routine_folders, |f| {
            Ok(domain::RoutineFolder::from(f))
        })?)
    }
}

impl<S: SendRequest> domain::ExerciseTemplateRepository for REST<S> {
    fn read_exercise_templates(
        &self,
        page: u32,
        page_size: u32,
    ) -> Result<domain::Page<domain::ExerciseTemplate>, domain::ReadError> {
        let r: schema::ExerciseTemplatesPage =
            self.fetch_page("/exercise_templates", page, page_size)?;
        Ok(schema::page(
            r.page,
            r.page_count,
            r.exercise_templates,
            |t| Ok(domain::ExerciseTemplate::from(t)),
        )?)
    }
}
