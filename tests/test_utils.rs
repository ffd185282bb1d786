#![allow(dead_code)]

use actix_web::{middleware::NormalizePath, web, App, HttpRequest, HttpResponse, HttpServer};
use anonstreak::{
    constants::{ADMIN_COOKIE_NAME, ADMIN_COOKIE_VALUE},
    db::postgres::Access,
    entities::{
        image::{ImageRecord, NewImageRecord},
        visitor::VisitRecord,
    },
    errors::AppError,
    media::{
        cloudinary::{sign_params, CloudinaryClient},
        uploader::{UploadClient, UploadPhase, UploadProgress},
    },
    middlewares::session::SessionMiddleware,
    repositories::{image::ImageRepository, visitor::VisitorRepository},
    routes::configure_routes,
    settings::{AppConfig, AppEnvironment},
    AppState,
};
use async_trait::async_trait;
use chrono::Utc;
use futures_util::StreamExt;
use parking_lot::Mutex;
use reqwest::{redirect::Policy, Client, Response};
use serde::Deserialize;
use std::{
    collections::{BTreeMap, HashSet},
    net::TcpListener,
    sync::{atomic::{AtomicBool, AtomicI64, AtomicUsize, Ordering}, Arc},
    time::Duration,
};
use uuid::Uuid;

pub const ADMIN_PASSWORD: &str = "correct horse battery staple";
pub const CLOUD_NAME: &str = "demo";
pub const API_KEY: &str = "123456789";
pub const API_SECRET: &str = "test-api-secret";

pub fn test_config(address: &str) -> AppConfig {
    AppConfig {
        env: AppEnvironment::Testing,
        name: "AnonStreak Test".into(),
        port: 0,
        host: "127.0.0.1".into(),
        worker_count: 1,
        database_url: "postgres://anon@localhost/anonstreak_test".into(),
        privileged_database_url: "postgres://service@localhost/anonstreak_test".into(),
        run_migrations: false,
        cors_allowed_origins: "*".into(),
        cloudinary_cloud_name: CLOUD_NAME.into(),
        cloudinary_api_key: API_KEY.into(),
        cloudinary_api_secret: API_SECRET.into(),
        cloudinary_upload_folder: "anonstreak".into(),
        cloudinary_api_base: format!("{}/media", address),
        admin_password: ADMIN_PASSWORD.into(),
    }
}

/// Image store that follows the row-level rules of the real schema:
/// the public role may read everything and insert private rows, nothing else.
#[derive(Default)]
pub struct InMemoryImageRepo {
    images: Mutex<Vec<ImageRecord>>,
    pub down: AtomicBool,
}

impl InMemoryImageRepo {
    pub fn seed(&self, public_id: &str, is_public: bool) -> ImageRecord {
        let record = ImageRecord {
            id: Uuid::new_v4(),
            cloudinary_public_id: public_id.to_string(),
            image_url: format!("https://res.cloudinary.com/{}/image/upload/{}.png", CLOUD_NAME, public_id),
            is_public,
            created_at: Utc::now(),
        };
        self.images.lock().insert(0, record.clone());
        record
    }

    pub fn get(&self, id: &Uuid) -> Option<ImageRecord> {
        self.images.lock().iter().find(|i| &i.id == id).cloned()
    }

    pub fn len(&self) -> usize {
        self.images.lock().len()
    }

    fn available(&self) -> Result<(), AppError> {
        if self.down.load(Ordering::SeqCst) {
            return Err(AppError::Persistence("connection refused".into()));
        }
        Ok(())
    }
}

#[async_trait]
impl ImageRepository for InMemoryImageRepo {
    async fn check_connection(&self, _access: Access) -> Result<(), AppError> {
        self.available()
    }

    async fn insert_image(&self, _access: Access, image: &NewImageRecord) -> Result<ImageRecord, AppError> {
        self.available()?;
        let record = ImageRecord {
            id: Uuid::new_v4(),
            cloudinary_public_id: image.cloudinary_public_id.clone(),
            image_url: image.image_url.clone(),
            is_public: false,
            created_at: Utc::now(),
        };
        self.images.lock().insert(0, record.clone());
        Ok(record)
    }

    async fn list_images(&self, _access: Access) -> Result<Vec<ImageRecord>, AppError> {
        self.available()?;
        let mut images = self.images.lock().clone();
        images.sort_by(|a, b| b.created_at.cmp(&a.created_at));
        Ok(images)
    }

    async fn list_public_images(&self, access: Access) -> Result<Vec<ImageRecord>, AppError> {
        Ok(self.list_images(access)
            .await?
            .into_iter()
            .filter(|i| i.is_public)
            .collect())
    }

    async fn set_visibility(&self, access: Access, id: &Uuid, is_public: bool) -> Result<ImageRecord, AppError> {
        self.available()?;
        let mut images = self.images.lock();
        match images.iter_mut().find(|i| &i.id == id) {
            Some(image) if access == Access::Privileged => {
                image.is_public = is_public;
                Ok(image.clone())
            }
            _ => Err(AppError::NotFound("Image not found".into())),
        }
    }

    async fn delete_image(&self, access: Access, id: &Uuid) -> Result<(), AppError> {
        self.available()?;
        let mut images = self.images.lock();
        let before = images.len();
        if access == Access::Privileged {
            images.retain(|i| &i.id != id);
        }
        if images.len() == before {
            return Err(AppError::NotFound("Image not found".into()));
        }
        Ok(())
    }
}

/// Visit log only the elevated role may touch.
#[derive(Default)]
pub struct InMemoryVisitorRepo {
    visits: AtomicI64,
    pub down: AtomicBool,
}

impl InMemoryVisitorRepo {
    pub fn count(&self) -> i64 {
        self.visits.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl VisitorRepository for InMemoryVisitorRepo {
    async fn record_visit(&self, access: Access) -> Result<VisitRecord, AppError> {
        if self.down.load(Ordering::SeqCst) {
            return Err(AppError::Persistence("connection refused".into()));
        }
        if access != Access::Privileged {
            return Err(AppError::Persistence("permission denied for table visitors".into()));
        }
        self.visits.fetch_add(1, Ordering::SeqCst);
        Ok(VisitRecord { id: Uuid::new_v4(), created_at: Utc::now() })
    }

    async fn count_visits(&self, access: Access) -> Result<i64, AppError> {
        if self.down.load(Ordering::SeqCst) {
            return Err(AppError::Persistence("connection refused".into()));
        }
        if access != Access::Privileged {
            return Err(AppError::Persistence("permission denied for table visitors".into()));
        }
        Ok(self.count())
    }
}

/// Stand-in for the media host's upload and destroy endpoints.
#[derive(Default)]
pub struct FakeCloud {
    assets: Mutex<HashSet<String>>,
    uploads: AtomicUsize,
    pub fail_uploads: AtomicBool,
    watched: Mutex<Option<Arc<UploadProgress>>>,
    observed: Mutex<Vec<(UploadPhase, u8)>>,
}

impl FakeCloud {
    pub fn add_asset(&self, public_id: &str) {
        self.assets.lock().insert(public_id.to_string());
    }

    pub fn has_asset(&self, public_id: &str) -> bool {
        self.assets.lock().contains(public_id)
    }

    pub fn upload_count(&self) -> usize {
        self.uploads.load(Ordering::SeqCst)
    }

    /// Samples `progress` each time a chunk of an upload body arrives.
    pub fn watch(&self, progress: Arc<UploadProgress>) {
        *self.watched.lock() = Some(progress);
    }

    pub fn observed(&self) -> Vec<(UploadPhase, u8)> {
        self.observed.lock().clone()
    }

    fn sample(&self) {
        if let Some(progress) = self.watched.lock().as_ref() {
            self.observed.lock().push((progress.phase(), progress.percent()));
        }
    }
}

#[derive(Deserialize)]
struct DestroyForm {
    public_id: String,
    timestamp: String,
    api_key: String,
    signature: String,
}

fn contains(haystack: &[u8], needle: &str) -> bool {
    haystack.windows(needle.len()).any(|w| w == needle.as_bytes())
}

async fn fake_upload(
    cloud: web::Data<FakeCloud>,
    cloud_name: web::Path<String>,
    req: HttpRequest,
    mut payload: web::Payload,
) -> HttpResponse {
    let mut body = Vec::new();
    while let Some(chunk) = payload.next().await {
        match chunk {
            Ok(chunk) => body.extend_from_slice(&chunk),
            Err(_) => return HttpResponse::BadRequest().finish(),
        }
        cloud.sample();
    }

    if cloud.fail_uploads.load(Ordering::SeqCst) {
        return HttpResponse::InternalServerError().finish();
    }

    let is_multipart = req
        .headers()
        .get("content-type")
        .and_then(|v| v.to_str().ok())
        .is_some_and(|v| v.starts_with("multipart/form-data"));
    let has_fields = ["file", "timestamp", "folder", "signature", "api_key"]
        .iter()
        .all(|name| contains(&body, &format!("name=\"{}\"", name)));

    if cloud_name.as_str() != CLOUD_NAME || !is_multipart || !has_fields {
        return HttpResponse::BadRequest().json(serde_json::json!({"error": {"message": "bad upload"}}));
    }

    let n = cloud.uploads.fetch_add(1, Ordering::SeqCst) + 1;
    let public_id = format!("anonstreak/upload{}", n);
    cloud.add_asset(&public_id);

    HttpResponse::Ok().json(serde_json::json!({
        "public_id": public_id,
        "secure_url": format!("https://res.cloudinary.com/{}/image/upload/{}.png", CLOUD_NAME, public_id),
    }))
}

async fn fake_destroy(cloud: web::Data<FakeCloud>, form: web::Form<DestroyForm>) -> HttpResponse {
    let params = BTreeMap::from([
        ("public_id", form.public_id.clone()),
        ("timestamp", form.timestamp.clone()),
    ]);
    if form.api_key != API_KEY || form.signature != sign_params(&params, API_SECRET) {
        return HttpResponse::Unauthorized().json(serde_json::json!({"error": {"message": "Invalid Signature"}}));
    }

    let result = if cloud.assets.lock().remove(&form.public_id) { "ok" } else { "not found" };
    HttpResponse::Ok().json(serde_json::json!({ "result": result }))
}

fn fake_cloud_routes(cfg: &mut web::ServiceConfig) {
    cfg.service(
        web::scope("/media/{cloud_name}/image")
            .route("/upload", web::post().to(fake_upload))
            .route("/destroy", web::post().to(fake_destroy))
    );
}

pub struct TestApp {
    pub address: String,
    pub client: Client,
    pub config: AppConfig,
    pub images: Arc<InMemoryImageRepo>,
    pub visitors: Arc<InMemoryVisitorRepo>,
    pub cloud: Arc<FakeCloud>,
}

impl TestApp {
    pub async fn spawn() -> Self {
        let listener = TcpListener::bind("127.0.0.1:0").unwrap();
        let port = listener.local_addr().unwrap().port();
        let address = format!("http://127.0.0.1:{}", port);

        let config = test_config(&address);
        let images = Arc::new(InMemoryImageRepo::default());
        let visitors = Arc::new(InMemoryVisitorRepo::default());
        let cloud = Arc::new(FakeCloud::default());

        let media_host = CloudinaryClient::new(&config).expect("Failed to build media host client");
        let state = web::Data::new(AppState::from_parts(
            &config,
            images.clone(),
            visitors.clone(),
            Arc::new(media_host),
        ));
        let cloud_data = web::Data::from(cloud.clone());

        let server = HttpServer::new(move || {
            App::new()
                .app_data(state.clone())
                .app_data(cloud_data.clone())
                .wrap(SessionMiddleware)
                .wrap(NormalizePath::trim())
                .configure(configure_routes)
                .configure(fake_cloud_routes)
        })
        .listen(listener)
        .expect("Failed to bind server")
        .workers(1)
        .run();

        tokio::spawn(server);

        let client = Client::builder()
            .redirect(Policy::none())
            .build()
            .unwrap();
        while client.get(format!("{}/api/v1/images/public", address)).send().await.is_err() {
            tokio::time::sleep(Duration::from_millis(10)).await;
        }

        Self { address, client, config, images, visitors, cloud }
    }

    pub fn url(&self, path: &str) -> String {
        format!("{}{}", self.address, path)
    }

    pub fn admin_cookie() -> String {
        format!("{}={}", ADMIN_COOKIE_NAME, ADMIN_COOKIE_VALUE)
    }

    pub fn uploader(&self) -> UploadClient {
        UploadClient::new(&self.address, &format!("{}/media", self.address)).unwrap()
    }

    /// A record plus its asset at the media host, as a finished upload leaves them.
    pub fn seed_image(&self, public_id: &str, is_public: bool) -> ImageRecord {
        self.cloud.add_asset(public_id);
        self.images.seed(public_id, is_public)
    }

    pub async fn get(&self, path: &str) -> Response {
        self.client.get(self.url(path)).send().await.unwrap()
    }

    pub async fn admin_get(&self, path: &str) -> Response {
        self.client
            .get(self.url(path))
            .header("Cookie", Self::admin_cookie())
            .send()
            .await
            .unwrap()
    }

    pub async fn login(&self, password: &str) -> Response {
        self.client
            .post(self.url("/admin/login"))
            .json(&serde_json::json!({ "password": password }))
            .send()
            .await
            .unwrap()
    }

    pub async fn record_upload(&self, body: &serde_json::Value) -> Response {
        self.client
            .post(self.url("/api/v1/images"))
            .json(body)
            .send()
            .await
            .unwrap()
    }

    pub async fn set_visibility(&self, id: &str, is_public: bool) -> Response {
        self.client
            .patch(self.url(&format!("/admin/images/{}", id)))
            .header("Cookie", Self::admin_cookie())
            .json(&serde_json::json!({ "is_public": is_public }))
            .send()
            .await
            .unwrap()
    }

    pub async fn remove(&self, id: &str, public_id: &str) -> Response {
        self.client
            .delete(self.url(&format!("/admin/images/{}", id)))
            .header("Cookie", Self::admin_cookie())
            .query(&[("public_id", public_id)])
            .send()
            .await
            .unwrap()
    }
}
