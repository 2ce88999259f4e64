use actix_web::{delete, get, post, put, web, HttpRequest, HttpResponse};

use crate::auth::bearer_token;
use crate::auth::password::PasswordHasher;
use crate::auth::token::{Claims, TokenService};
use crate::db::{NewUser, UserStore};
use crate::error::ApiError;
use crate::models::{
    AuthData, ChangePasswordRequest, LoginRequest, RegisterRequest, UpdateUserRequest, VerifyData,
};
use crate::response::ApiResponse;

#[post("/register")]
pub async fn register(
    body: web::Json<RegisterRequest>,
    users: web::Data<UserStore>,
    hasher: web::Data<PasswordHasher>,
    tokens: web::Data<TokenService>,
) -> Result<HttpResponse, ApiError> {
    let body = body.into_inner();

    if body.username.is_empty() || body.email.is_empty() || body.password.is_empty()
        || body.name.is_empty()
    {
        return Err(ApiError::BadRequest("Missing required fields".into()));
    }
    if !is_valid_email(&body.email) {
        return Err(ApiError::BadRequest("Invalid email format".into()));
    }
    if body.password.chars().count() < 8 {
        return Err(ApiError::BadRequest(
            "Password must be at least 8 characters".into(),
        ));
    }
    // Uniqueness is enforced inside the store's lock, so two
    // concurrent registrations of the same name cannot both land.
    let password_hash = hasher.hash(&body.password)?;
    let user = users
        .create(NewUser {
            username: body.username,
            email: body.email,
            password_hash,
            name: body.name,
            birthdate: body.birthdate,
        })
        .await?;

    let token = tokens.issue(user.user_id, &user.username);
    log::info!("registered user {} ({})", user.username, user.user_id);

    Ok(HttpResponse::Created().json(ApiResponse::with_message(
        AuthData {
            token,
            user: user.to_public(),
        },
        "User registered successfully",
    )))
}

#[post("/login")]
pub async fn login(
    body: web::Json<LoginRequest>,
    users: web::Data<UserStore>,
    hasher: web::Data<PasswordHasher>,
    tokens: web::Data<TokenService>,
) -> Result<HttpResponse, ApiError> {
    if body.username.is_empty() || body.password.is_empty() {
        return Err(ApiError::BadRequest(
            "Username and password are required".into(),
        ));
    }

    // Unknown user and wrong password are indistinguishable to the
    // caller.
    let user = users
        .find_by_username(&body.username)
        .await
        .ok_or_else(|| ApiError::Unauthorized("Invalid credentials".into()))?;

    if !hasher.verify(&body.password, &user.password_hash) {
        return Err(ApiError::Unauthorized("Invalid credentials".into()));
    }

    let token = tokens.issue(user.user_id, &user.username);

    Ok(HttpResponse::Ok().json(ApiResponse::with_message(
        AuthData {
            token,
            user: user.to_public(),
        },
        "Login successful",
    )))
}

#[post("/verify")]
pub async fn verify(
    req: HttpRequest,
    tokens: web::Data<TokenService>,
) -> Result<HttpResponse, ApiError> {
    let token =
        bearer_token(&req).ok_or_else(|| ApiError::Unauthorized("No token provided".into()))?;

    let claims = tokens
        .validate(token)
        .ok_or_else(|| ApiError::Unauthorized("Invalid or expired token".into()))?;

    Ok(HttpResponse::Ok().json(ApiResponse::data(VerifyData {
        valid: true,
        user_id: claims.user_id,
        username: claims.username,
    })))
}

#[get("/users/{id}")]
pub async fn get_user(
    claims: Claims,
    path: web::Path<i64>,
    users: web::Data<UserStore>,
) -> Result<HttpResponse, ApiError> {
    let user_id = path.into_inner();
    if claims.user_id != user_id {
        return Err(ApiError::Forbidden);
    }

    let user = users
        .find_by_id(user_id)
        .await
        .ok_or_else(|| ApiError::NotFound("User not found".into()))?;

    Ok(HttpResponse::Ok().json(ApiResponse::data(user.to_public())))
}

#[put("/users/{id}")]
pub async fn update_user(
    claims: Claims,
    path: web::Path<i64>,
    body: web::Json<UpdateUserRequest>,
    users: web::Data<UserStore>,
) -> Result<HttpResponse, ApiError> {
    let user_id = path.into_inner();
    if claims.user_id != user_id {
        return Err(ApiError::Forbidden);
    }
    let body = body.into_inner();

    if let Some(email) = &body.email {
        if !is_valid_email(email) {
            return Err(ApiError::BadRequest("Invalid email format".into()));
        }
    }

    let user = users
        .update_profile(user_id, body.name, body.email, body.birthdate)
        .await?;

    Ok(HttpResponse::Ok().json(ApiResponse::with_message(
        user.to_public(),
        "User updated successfully",
    )))
}

#[delete("/users/{id}")]
pub async fn delete_user(
    claims: Claims,
    path: web::Path<i64>,
    users: web::Data<UserStore>,
) -> Result<HttpResponse, ApiError> {
    let user_id = path.into_inner();
    if claims.user_id != user_id {
        return Err(ApiError::Forbidden);
    }

    if !users.delete(user_id).await {
        return Err(ApiError::NotFound("User not found".into()));
    }

    Ok(HttpResponse::Ok().json(ApiResponse::message("User deleted successfully")))
}

#[put("/users/{id}/password")]
pub async fn change_password(
    claims: Claims,
    path: web::Path<i64>,
    body: web::Json<ChangePasswordRequest>,
    users: web::Data<UserStore>,
    hasher: web::Data<PasswordHasher>,
) -> Result<HttpResponse, ApiError> {
    let user_id = path.into_inner();
    if claims.user_id != user_id {
        return Err(ApiError::Forbidden);
    }

    if body.new_password.chars().count() < 8 {
        return Err(ApiError::BadRequest(
            "New password must be at least 8 characters long".into(),
        ));
    }

    let user = users
        .find_by_id(user_id)
        .await
        .ok_or_else(|| ApiError::NotFound("User not found".into()))?;

    if !hasher.verify(&body.current_password, &user.password_hash) {
        return Err(ApiError::BadRequest(
            "Current password is incorrect".into(),
        ));
    }

    let password_hash = hasher.hash(&body.new_password)?;
    users.update_password(user_id, password_hash).await;

    Ok(HttpResponse::Ok().json(ApiResponse::message("Password updated successfully")))
}

fn is_valid_email(email: &str) -> bool {
    match email.split_once('@') {
        Some((local, domain)) => {
            !local.is_empty()
                && domain.contains('.')
                && !domain.starts_with('.')
                && !domain.ends_with('.')
                && !email.contains(char::is_whitespace)
        }
        None => false,
    }
}
