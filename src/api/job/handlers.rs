use actix_web::{
    delete, get, post,
    web::{scope, Data, Form, Path, Query, ServiceConfig},
    HttpResponse,
};
use std::collections::HashMap;

use crate::api::error::{codes, ApiError};
use crate::api::guard::Caller;
use crate::api::parse_id;
use crate::api::responses::{CreatedResponse, ResultResponse, ResultsResponse, SuccessResponse};

use super::dto::{CreateJobForm, ListJobsQuery};
use super::JobService;

#[get("")]
async fn list_jobs(
    service: Data<JobService>,
    query: Query<ListJobsQuery>,
) -> Result<HttpResponse, ApiError> {
    let results = service.list(query.into_inner().status).await?;
    Ok(HttpResponse::Ok().json(ResultsResponse::new(results)))
}

#[post("/create")]
async fn create_job(
    service: Data<JobService>,
    caller: Caller,
    form: Form<CreateJobForm>,
) -> Result<HttpResponse, ApiError> {
    caller.require_write()?;
    let form = form.into_inner();
    let paused = form.paused();
    let id = service.create(form.job_type, form.data, paused).await?;
    Ok(HttpResponse::Ok().json(CreatedResponse::new(id)))
}

#[get("/{id}")]
async fn get_job(service: Data<JobService>, path: Path<String>) -> Result<HttpResponse, ApiError> {
    let raw = path.into_inner();
    let id = parse_id(&raw, || {
        ApiError::not_found(codes::JOB_NOT_FOUND, format!("job {} not found", raw))
    })?;
    let result = service.get(id).await?;
    Ok(HttpResponse::Ok().json(ResultResponse::new(result)))
}

#[post("/{id}")]
async fn update_job(
    service: Data<JobService>,
    caller: Caller,
    path: Path<String>,
    form: Form<HashMap<String, String>>,
) -> Result<HttpResponse, ApiError> {
    caller.require_write()?;
    let raw = path.into_inner();
    let id = parse_id(&raw, || {
        ApiError::validation(codes::JOB_UPDATE_DB, format!("invalid job id: {}", raw))
    })?;
    service.update(id, form.into_inner()).await?;
    Ok(HttpResponse::Ok().json(SuccessResponse::new()))
}

#[delete("/{id}")]
async fn delete_job(
    service: Data<JobService>,
    caller: Caller,
    path: Path<String>,
) -> Result<HttpResponse, ApiError> {
    caller.require_write()?;
    let raw = path.into_inner();
    let id = parse_id(&raw, || {
        ApiError::validation(codes::JOB_DELETE_DB, format!("invalid job id: {}", raw))
    })?;
    service.delete(id).await?;
    Ok(HttpResponse::Ok().json(SuccessResponse::new()))
}

pub fn job_config(config: &mut ServiceConfig) {
    config.service(
        scope("/jobs")
            .service(list_jobs)
            .service(create_job)
            .service(get_job)
            .service(update_job)
            .service(delete_job),
    );
}
