use actix_web::{
    delete, get, post,
    web::{scope, Data, Form, Path, ServiceConfig},
    HttpResponse,
};
use std::collections::HashMap;

use crate::api::error::{codes, ApiError};
use crate::api::guard::Caller;
use crate::api::parse_id;
use crate::api::responses::{CreatedResponse, ResultResponse, ResultsResponse, SuccessResponse};

use super::dto::CreateJobTypeForm;
use super::JobTypeService;

#[get("")]
async fn list_types(service: Data<JobTypeService>) -> Result<HttpResponse, ApiError> {
    let results = service.list().await?;
    Ok(HttpResponse::Ok().json(ResultsResponse::new(results)))
}

#[post("/create")]
async fn create_type(
    service: Data<JobTypeService>,
    caller: Caller,
    form: Form<CreateJobTypeForm>,
) -> Result<HttpResponse, ApiError> {
    caller.require_write()?;
    let form = form.into_inner();
    let id = service.create(form.name, form.fields).await?;
    Ok(HttpResponse::Ok().json(CreatedResponse::new(id)))
}

#[get("/{id}")]
async fn get_type(
    service: Data<JobTypeService>,
    path: Path<String>,
) -> Result<HttpResponse, ApiError> {
    let raw = path.into_inner();
    let id = parse_id(&raw, || {
        ApiError::not_found(codes::TYPE_NOT_FOUND, format!("job type {} not found", raw))
    })?;
    let result = service.get(id).await?;
    Ok(HttpResponse::Ok().json(ResultResponse::new(result)))
}

#[post("/{id}")]
async fn update_type(
    service: Data<JobTypeService>,
    caller: Caller,
    path: Path<String>,
    form: Form<HashMap<String, String>>,
) -> Result<HttpResponse, ApiError> {
    caller.require_write()?;
    let raw = path.into_inner();
    let id = parse_id(&raw, || {
        ApiError::validation(codes::TYPE_UPDATE_DB, format!("invalid job type id: {}", raw))
    })?;
    service.update(id, form.into_inner()).await?;
    Ok(HttpResponse::Ok().json(SuccessResponse::new()))
}

#[delete("/{id}")]
async fn delete_type(
    service: Data<JobTypeService>,
    caller: Caller,
    path: Path<String>,
) -> Result<HttpResponse, ApiError> {
    caller.require_write()?;
    let raw = path.into_inner();
    let id = parse_id(&raw, || {
        ApiError::validation(codes::TYPE_DELETE_BAD_ID, format!("invalid job type id: {}", raw))
    })?;
    service.delete(id).await?;
    Ok(HttpResponse::Ok().json(SuccessResponse::new()))
}

pub fn job_type_config(config: &mut ServiceConfig) {
    config.service(
        scope("/job-types")
            .service(list_types)
            .service(create_type)
            .service(get_type)
            .service(update_type)
            .service(delete_type),
    );
}
