use std::{collections::HashMap, sync::Arc};

use axum::{
    body::Bytes,
    extract::{Multipart, Path, Query, State},
    http::{header, StatusCode},
    response::IntoResponse,
    routing::{get, post},
    Json, Router,
};
use serde::{Deserialize, Serialize};
use tokio::{net::TcpListener, sync::RwLock};
use uuid::Uuid;

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Profile {
    pub id: Uuid,
    pub name: String,
    pub bio: Option<String>,
}

#[derive(Deserialize)]
pub struct CreateProfile {
    pub name: String,
    #[serde(default)]
    pub bio: Option<String>,
}

#[derive(Deserialize)]
pub struct UpdateProfile {
    pub name: Option<String>,
    pub bio: Option<String>,
}

/// What the server recovered from a multipart upload.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct UploadReceipt {
    pub image: String,
    pub parameter_name: String,
    pub file_name: Option<String>,
    pub content_type: Option<String>,
    pub content: Vec<u8>,
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct RawUpload {
    pub content_type: Option<String>,
    pub content: Vec<u8>,
}

#[derive(Clone, Debug)]
struct Picture {
    content_type: String,
    content: Vec<u8>,
}

#[derive(Default)]
pub struct Store {
    profiles: RwLock<HashMap<Uuid, Profile>>,
    pictures: RwLock<HashMap<String, Picture>>,
}

pub type Db = Arc<Store>;

pub fn app() -> Router {
    let db: Db = Arc::new(Store::default());
    Router::new()
        .route("/api/profiles", get(list_profiles).post(create_profile))
        .route(
            "/api/profiles/{id}",
            get(get_profile)
                .put(replace_profile)
                .patch(update_profile)
                .delete(delete_profile),
        )
        .route(
            "/api/profile-picture/{image}",
            get(download_picture).post(upload_picture),
        )
        .route("/api/raw-upload", post(raw_upload))
        .route("/api/search", get(search))
        .route("/api/empty", get(empty))
        .route("/api/status/{code}", get(status))
        .with_state(db)
}

pub async fn run(listener: TcpListener) -> Result<(), std::io::Error> {
    axum::serve(listener, app()).await
}

async fn list_profiles(State(db): State<Db>) -> Json<Vec<Profile>> {
    let profiles = db.profiles.read().await;
    Json(profiles.values().cloned().collect())
}

async fn create_profile(
    State(db): State<Db>,
    Json(input): Json<CreateProfile>,
) -> (StatusCode, Json<Profile>) {
    let profile = Profile {
        id: Uuid::new_v4(),
        name: input.name,
        bio: input.bio,
    };
    db.profiles.write().await.insert(profile.id, profile.clone());
    (StatusCode::CREATED, Json(profile))
}

async fn get_profile(
    State(db): State<Db>,
    Path(id): Path<Uuid>,
) -> Result<Json<Profile>, StatusCode> {
    let profiles = db.profiles.read().await;
    profiles.get(&id).cloned().map(Json).ok_or(StatusCode::NOT_FOUND)
}

async fn replace_profile(
    State(db): State<Db>,
    Path(id): Path<Uuid>,
    Json(input): Json<CreateProfile>,
) -> Result<Json<Profile>, StatusCode> {
    let mut profiles = db.profiles.write().await;
    let profile = profiles.get_mut(&id).ok_or(StatusCode::NOT_FOUND)?;
    profile.name = input.name;
    profile.bio = input.bio;
    Ok(Json(profile.clone()))
}

async fn update_profile(
    State(db): State<Db>,
    Path(id): Path<Uuid>,
    Json(input): Json<UpdateProfile>,
) -> Result<Json<Profile>, StatusCode> {
    let mut profiles = db.profiles.write().await;
    let profile = profiles.get_mut(&id).ok_or(StatusCode::NOT_FOUND)?;
    if let Some(name) = input.name {
        profile.name = name;
    }
    if let Some(bio) = input.bio {
        profile.bio = Some(bio);
    }
    Ok(Json(profile.clone()))
}

async fn delete_profile(
    State(db): State<Db>,
    Path(id): Path<Uuid>,
) -> Result<StatusCode, StatusCode> {
    let mut profiles = db.profiles.write().await;
    profiles.remove(&id).map(|_| StatusCode::NO_CONTENT).ok_or(StatusCode::NOT_FOUND)
}

/// Accepts exactly one multipart field and echoes what was parsed.
async fn upload_picture(
    State(db): State<Db>,
    Path(image): Path<String>,
    mut multipart: Multipart,
) -> Result<(StatusCode, Json<UploadReceipt>), (StatusCode, String)> {
    let bad_request = |msg: String| (StatusCode::BAD_REQUEST, msg);

    let field = multipart
        .next_field()
        .await
        .map_err(|e| bad_request(e.to_string()))?
        .ok_or_else(|| bad_request("no multipart field".to_string()))?;
    let parameter_name = field.name().unwrap_or_default().to_string();
    let file_name = field.file_name().map(str::to_string);
    let content_type = field.content_type().map(str::to_string);
    let content = field.bytes().await.map_err(|e| bad_request(e.to_string()))?.to_vec();

    if multipart
        .next_field()
        .await
        .map_err(|e| bad_request(e.to_string()))?
        .is_some()
    {
        return Err(bad_request("expected a single multipart field".to_string()));
    }

    tracing::debug!(%image, bytes = content.len(), "stored profile picture");
    db.pictures.write().await.insert(
        image.clone(),
        Picture {
            content_type: content_type
                .clone()
                .unwrap_or_else(|| "application/octet-stream".to_string()),
            content: content.clone(),
        },
    );

    let receipt = UploadReceipt {
        image,
        parameter_name,
        file_name,
        content_type,
        content,
    };
    Ok((StatusCode::CREATED, Json(receipt)))
}

async fn download_picture(
    State(db): State<Db>,
    Path(image): Path<String>,
) -> Result<impl IntoResponse, StatusCode> {
    let pictures = db.pictures.read().await;
    let picture = pictures.get(&image).cloned().ok_or(StatusCode::NOT_FOUND)?;
    Ok(([(header::CONTENT_TYPE, picture.content_type)], picture.content))
}

async fn raw_upload(headers: axum::http::HeaderMap, body: Bytes) -> Json<RawUpload> {
    let content_type = headers
        .get(header::CONTENT_TYPE)
        .and_then(|v| v.to_str().ok())
        .map(str::to_string);
    Json(RawUpload {
        content_type,
        content: body.to_vec(),
    })
}

async fn search(Query(params): Query<HashMap<String, String>>) -> Json<HashMap<String, String>> {
    Json(params)
}

async fn empty() -> StatusCode {
    StatusCode::OK
}

async fn status(Path(code): Path<u16>) -> Result<(StatusCode, String), StatusCode> {
    let status = StatusCode::from_u16(code).map_err(|_| StatusCode::BAD_REQUEST)?;
    Ok((status, format!("status {code}")))
}
