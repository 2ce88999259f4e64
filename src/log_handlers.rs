use actix_web::{delete, get, post, put, web, HttpResponse};

use crate::auth::token::Claims;
use crate::db::{LogStore, NewLog};
use crate::error::ApiError;
use crate::models::{
    CreateLogRequest, LogListData, LogQuery, LogStats, Pagination, UpdateLogRequest,
};
use crate::response::ApiResponse;

#[get("/logs")]
pub async fn list_logs(
    claims: Claims,
    query: web::Query<LogQuery>,
    logs: web::Data<LogStore>,
) -> Result<HttpResponse, ApiError> {
    let limit = query.limit.unwrap_or(100);
    let offset = query.offset.unwrap_or(0);

    let page = match (query.start_date, query.end_date) {
        (Some(start), Some(end)) => {
            let start = start.and_hms_opt(0, 0, 0).unwrap();
            let end = end.and_hms_opt(23, 59, 59).unwrap();
            logs.list_in_range(claims.user_id, start, end).await
        }
        _ => logs.list_for_user(claims.user_id, limit, offset).await,
    };

    let total = logs.count_for_user(claims.user_id).await;
    let total_minutes = logs.total_minutes(claims.user_id).await;

    Ok(HttpResponse::Ok().json(ApiResponse::data(LogListData {
        logs: page,
        pagination: Pagination {
            total,
            limit,
            offset,
        },
        stats: LogStats {
            total_logs: total,
            total_driving_minutes: total_minutes,
            total_driving_hours: (total_minutes as f64 / 60.0 * 100.0).round() / 100.0,
        },
    })))
}

#[post("/logs")]
pub async fn create_log(
    claims: Claims,
    body: web::Json<CreateLogRequest>,
    logs: web::Data<LogStore>,
) -> Result<HttpResponse, ApiError> {
    let body = body.into_inner();

    if body.start_time >= body.end_time {
        return Err(ApiError::BadRequest(
            "End time must be after start time".into(),
        ));
    }

    let log = logs
        .create(NewLog {
            user_id: claims.user_id,
            start_time: body.start_time,
            end_time: body.end_time,
            description: body.description.unwrap_or_default(),
            is_nighttime: body.is_nighttime.unwrap_or(false),
        })
        .await;

    Ok(HttpResponse::Created().json(ApiResponse::with_message(log, "Log created successfully")))
}

#[get("/logs/{id}")]
pub async fn get_log(
    claims: Claims,
    path: web::Path<i64>,
    logs: web::Data<LogStore>,
) -> Result<HttpResponse, ApiError> {
    let log = logs
        .get(path.into_inner())
        .await
        .ok_or_else(|| ApiError::NotFound("Log not found".into()))?;

    if log.user_id != claims.user_id {
        return Err(ApiError::Forbidden);
    }

    Ok(HttpResponse::Ok().json(ApiResponse::data(log)))
}

#[put("/logs/{id}")]
pub async fn update_log(
    claims: Claims,
    path: web::Path<i64>,
    body: web::Json<UpdateLogRequest>,
    logs: web::Data<LogStore>,
) -> Result<HttpResponse, ApiError> {
    let log_id = path.into_inner();
    let existing = logs
        .get(log_id)
        .await
        .ok_or_else(|| ApiError::NotFound("Log not found".into()))?;

    if existing.user_id != claims.user_id {
        return Err(ApiError::Forbidden);
    }
    let body = body.into_inner();

    // Omitted fields keep their stored values.
    let start_time = body.start_time.unwrap_or(existing.start_time);
    let end_time = body.end_time.unwrap_or(existing.end_time);
    if start_time >= end_time {
        return Err(ApiError::BadRequest(
            "End time must be after start time".into(),
        ));
    }

    let updated = logs
        .update(
            log_id,
            start_time,
            end_time,
            body.description.unwrap_or(existing.description),
            body.is_nighttime.unwrap_or(existing.is_nighttime),
        )
        .await
        .ok_or_else(|| ApiError::NotFound("Log not found".into()))?;

    Ok(HttpResponse::Ok().json(ApiResponse::with_message(updated, "Log updated successfully")))
}

#[delete("/logs/{id}")]
pub async fn delete_log(
    claims: Claims,
    path: web::Path<i64>,
    logs: web::Data<LogStore>,
) -> Result<HttpResponse, ApiError> {
    let log_id = path.into_inner();
    let existing = logs
        .get(log_id)
        .await
        .ok_or_else(|| ApiError::NotFound("Log not found".into()))?;

    if existing.user_id != claims.user_id {
        return Err(ApiError::Forbidden);
    }

    logs.delete(log_id).await;

    Ok(HttpResponse::Ok().json(ApiResponse::message("Log deleted successfully")))
}
