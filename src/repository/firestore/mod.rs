use async_trait::async_trait;
use reqwest::{RequestBuilder, Response, StatusCode};
use serde::{Deserialize, Serialize, de::DeserializeOwned};
use serde_json::{Map, Value, json};
use uuid::Uuid;

use super::{Repository, filter_content, filter_projects, filter_testimonials};
use crate::{
    config::FirestoreConfig,
    error::{RepoError, RepoResult},
    models::{
        ContactInfo, ContactInfoInput, ContactInfoPatch, ContentFilter, ContentSection,
        ContentSectionInput, ContentSectionPatch, HomeStats, HomeStatsInput, HomeStatsPatch,
        Project, ProjectFilter, ProjectInput, ProjectPatch, Service, ServiceInput, ServicePatch,
        Testimonial, TestimonialFilter, TestimonialInput, TestimonialPatch,
    },
};

mod credentials;
mod value;

pub use credentials::{ServiceAccountKey, TokenSource};

const FIRESTORE_API: &str = "https://firestore.googleapis.com/v1";
const PAGE_SIZE: u32 = 300;

/// Record field name → document field name, for the keys that differ.
const FIELD_RENAMES: [(&str, &str); 3] = [
    ("image_url_fallback", "imageUrl"),
    ("created_at", "createdAt"),
    ("updated_at", "updatedAt"),
];

/// Collection
///
/// One document collection per entity.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Collection {
    Projects,
    Testimonials,
    Services,
    HomeStats,
    Content,
    ContactInfo,
}

impl Collection {
    pub fn name(self) -> &'static str {
        match self {
            Collection::Projects => "projects",
            Collection::Testimonials => "testimonials",
            Collection::Services => "services",
            Collection::HomeStats => "homeStats",
            Collection::Content => "content",
            Collection::ContactInfo => "contactInfo",
        }
    }

    /// Server-assigned timestamp fields written when a document is created.
    fn stamped_on_create(self) -> &'static [&'static str] {
        match self {
            Collection::Projects | Collection::Testimonials | Collection::Services => {
                &["createdAt", "updatedAt"]
            }
            Collection::Content | Collection::ContactInfo => &["updatedAt"],
            Collection::HomeStats => &[],
        }
    }

    /// Server-assigned timestamp fields refreshed on every update.
    fn stamped_on_update(self) -> &'static [&'static str] {
        match self {
            Collection::HomeStats => &[],
            _ => &["updatedAt"],
        }
    }
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct Document {
    name: String,
    #[serde(default)]
    fields: Map<String, Value>,
    create_time: Option<String>,
    update_time: Option<String>,
}

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
struct ListDocumentsResponse {
    #[serde(default)]
    documents: Vec<Document>,
    next_page_token: Option<String>,
}

#[derive(Deserialize)]
struct ErrorEnvelope {
    error: ErrorBody,
}

#[derive(Deserialize)]
struct ErrorBody {
    message: String,
}

enum Auth {
    /// The emulator accepts the fixed `owner` token and bypasses security rules.
    Emulator,
    ServiceAccount(TokenSource),
}

/// FirestoreRepository
///
/// Document-store implementation of `Repository` over the Firestore REST API.
/// Filtering and ordering happen in process after listing a collection, and
/// unlike the relational store several content records may share a section.
pub struct FirestoreRepository {
    http: reqwest::Client,
    base_url: String,
    project_id: String,
    auth: Auth,
}

impl FirestoreRepository {
    /// from_config
    ///
    /// Emulator mode when `emulator_host` is set, otherwise authenticates with
    /// the service-account key. `project_id` overrides the key's project.
    pub async fn from_config(config: &FirestoreConfig) -> RepoResult<Self> {
        let http = reqwest::Client::new();

        if let Some(host) = config.emulator_host.as_deref() {
            let project_id = config
                .project_id
                .clone()
                .ok_or(RepoError::NotConfigured("FIRESTORE_PROJECT_ID"))?;
            return Ok(Self {
                http,
                base_url: format!("http://{}/v1", host.trim_end_matches('/')),
                project_id,
                auth: Auth::Emulator,
            });
        }

        let path = config
            .credentials_path
            .as_deref()
            .ok_or(RepoError::NotConfigured("FIREBASE_SERVICE_ACCOUNT_PATH"))?;
        let key = ServiceAccountKey::from_file(path).await?;
        let tokens = TokenSource::new(key);
        let project_id = config
            .project_id
            .clone()
            .unwrap_or_else(|| tokens.project_id().to_string());

        Ok(Self {
            http,
            base_url: FIRESTORE_API.to_string(),
            project_id,
            auth: Auth::ServiceAccount(tokens),
        })
    }

    pub fn project_id(&self) -> &str {
        &self.project_id
    }

    fn database_path(&self) -> String {
        format!("projects/{}/databases/(default)/documents", self.project_id)
    }

    fn document_name(&self, collection: Collection, id: &str) -> String {
        format!("{}/{}/{}", self.database_path(), collection.name(), id)
    }

    fn collection_url(&self, collection: Collection) -> String {
        format!("{}/{}/{}", self.base_url, self.database_path(), collection.name())
    }

    async fn send(&self, request: RequestBuilder) -> RepoResult<Response> {
        let token = match &self.auth {
            Auth::Emulator => "owner".to_string(),
            Auth::ServiceAccount(tokens) => tokens.access_token(&self.http).await?,
        };
        Ok(request.bearer_auth(token).send().await?)
    }

    async fn ensure_success(response: Response) -> RepoResult<Response> {
        if response.status().is_success() {
            return Ok(response);
        }
        let status = response.status().as_u16();
        let message = response
            .json::<ErrorEnvelope>()
            .await
            .map(|envelope| envelope.error.message)
            .unwrap_or_else(|_| "unreadable error body".to_string());
        Err(RepoError::Firestore { status, message })
    }

    async fn commit(&self, write: Value) -> RepoResult<()> {
        let url = format!("{}/{}:commit", self.base_url, self.database_path());
        let request = self.http.post(url).json(&json!({ "writes": [write] }));
        Self::ensure_success(self.send(request).await?).await?;
        Ok(())
    }

    // --- Generic document operations ---

    async fn list_documents<T: DeserializeOwned>(
        &self,
        collection: Collection,
    ) -> RepoResult<Vec<T>> {
        let mut records = Vec::new();
        let mut page_token: Option<String> = None;

        loop {
            let mut request = self
                .http
                .get(self.collection_url(collection))
                .query(&[("pageSize", PAGE_SIZE.to_string())]);
            if let Some(token) = &page_token {
                request = request.query(&[("pageToken", token)]);
            }

            let response = Self::ensure_success(self.send(request).await?).await?;
            let page: ListDocumentsResponse = response.json().await?;
            for document in page.documents {
                records.push(into_record(document)?);
            }

            match page.next_page_token.filter(|token| !token.is_empty()) {
                Some(token) => page_token = Some(token),
                None => break,
            }
        }

        Ok(records)
    }

    async fn fetch_document(
        &self,
        collection: Collection,
        id: &str,
    ) -> RepoResult<Option<Document>> {
        if !is_document_id(id) {
            return Ok(None);
        }
        let url = format!("{}/{}", self.collection_url(collection), id);
        let response = self.send(self.http.get(url)).await?;
        if response.status() == StatusCode::NOT_FOUND {
            return Ok(None);
        }
        let response = Self::ensure_success(response).await?;
        Ok(Some(response.json().await?))
    }

    async fn get_document<T: DeserializeOwned>(
        &self,
        collection: Collection,
        id: &str,
    ) -> RepoResult<Option<T>> {
        self.fetch_document(collection, id)
            .await?
            .map(into_record)
            .transpose()
    }

    async fn read_back<T: DeserializeOwned>(
        &self,
        collection: Collection,
        id: &str,
    ) -> RepoResult<T> {
        self.get_document(collection, id)
            .await?
            .ok_or_else(|| RepoError::MalformedDocument {
                name: self.document_name(collection, id),
                reason: "document missing right after a successful write".to_string(),
            })
    }

    async fn create_document<T: DeserializeOwned, P: Serialize>(
        &self,
        collection: Collection,
        payload: &P,
    ) -> RepoResult<T> {
        let id = Uuid::new_v4().simple().to_string();
        let name = self.document_name(collection, &id);
        let fields = to_fields(&name, payload)?;

        let mut write = json!({
            "update": { "name": name, "fields": fields },
            "currentDocument": { "exists": false },
        });
        if let Some(transforms) = server_timestamps(collection.stamped_on_create()) {
            write["updateTransforms"] = transforms;
        }
        self.commit(write).await?;
        tracing::debug!(collection = collection.name(), %id, "document created");

        self.read_back(collection, &id).await
    }

    async fn update_document<T: DeserializeOwned, P: Serialize>(
        &self,
        collection: Collection,
        id: &str,
        patch: &P,
    ) -> RepoResult<Option<T>> {
        if self.fetch_document(collection, id).await?.is_none() {
            return Ok(None);
        }
        let name = self.document_name(collection, id);
        let fields = to_fields(&name, patch)?;
        let field_paths: Vec<String> = fields.keys().cloned().collect();
        let transforms = server_timestamps(collection.stamped_on_update());

        let write = if field_paths.is_empty() {
            match transforms {
                // Nothing to write; only refresh the server timestamps.
                Some(transforms) => json!({
                    "transform": { "document": name, "fieldTransforms": transforms },
                    "currentDocument": { "exists": true },
                }),
                None => return self.get_document(collection, id).await,
            }
        } else {
            let mut write = json!({
                "update": { "name": name, "fields": fields },
                "updateMask": { "fieldPaths": field_paths },
                "currentDocument": { "exists": true },
            });
            if let Some(transforms) = transforms {
                write["updateTransforms"] = transforms;
            }
            write
        };
        self.commit(write).await?;

        self.read_back(collection, id).await.map(Some)
    }

    async fn delete_document(&self, collection: Collection, id: &str) -> RepoResult<bool> {
        if self.fetch_document(collection, id).await?.is_none() {
            return Ok(false);
        }
        let url = format!("{}/{}", self.collection_url(collection), id);
        Self::ensure_success(self.send(self.http.delete(url)).await?).await?;
        tracing::debug!(collection = collection.name(), %id, "document deleted");
        Ok(true)
    }
}

/// Firestore document ids cannot contain `/` and cannot be `.` or `..`.
fn is_document_id(id: &str) -> bool {
    !id.is_empty() && id.len() <= 1500 && !id.contains('/') && id != "." && id != ".."
}

fn server_timestamps(fields: &[&str]) -> Option<Value> {
    if fields.is_empty() {
        return None;
    }
    let transforms = fields
        .iter()
        .map(|field| json!({ "fieldPath": field, "setToServerValue": "REQUEST_TIME" }))
        .collect();
    Some(Value::Array(transforms))
}

/// Serializes a payload to a Firestore field map using document key names.
fn to_fields<P: Serialize>(name: &str, payload: &P) -> RepoResult<Map<String, Value>> {
    let malformed = |reason: String| RepoError::MalformedDocument {
        name: name.to_string(),
        reason,
    };
    let Value::Object(mut fields) =
        serde_json::to_value(payload).map_err(|e| malformed(e.to_string()))?
    else {
        return Err(malformed("payload is not a JSON object".to_string()));
    };

    for (record_key, document_key) in FIELD_RENAMES {
        if let Some(v) = fields.remove(record_key) {
            fields.insert(document_key.to_string(), v);
        }
    }
    Ok(value::encode_fields(fields))
}

/// Decodes a document into a record. Missing `createdAt`/`updatedAt` fall
/// back to the document's own create and update times.
fn into_record<T: DeserializeOwned>(document: Document) -> RepoResult<T> {
    let Document {
        name,
        fields,
        create_time,
        update_time,
    } = document;
    let malformed = |reason: String| RepoError::MalformedDocument {
        name: name.clone(),
        reason,
    };

    let mut fields = value::decode_fields(fields).map_err(malformed)?;
    for (record_key, document_key) in FIELD_RENAMES {
        if let Some(v) = fields.remove(document_key) {
            fields.insert(record_key.to_string(), v);
        }
    }
    for (key, fallback) in [("created_at", create_time), ("updated_at", update_time)] {
        if let Some(time) = fallback {
            fields.entry(key).or_insert(Value::String(time));
        }
    }

    let id = name.rsplit('/').next().unwrap_or_default().to_string();
    fields.insert("id".to_string(), Value::String(id));

    serde_json::from_value(Value::Object(fields)).map_err(|e| malformed(e.to_string()))
}

#[async_trait]
impl Repository for FirestoreRepository {
    // --- Projects ---

    async fn list_projects(&self, filter: ProjectFilter) -> RepoResult<Vec<Project>> {
        let projects = self.list_documents(Collection::Projects).await?;
        Ok(filter_projects(projects, filter))
    }

    async fn get_project(&self, id: &str) -> RepoResult<Option<Project>> {
        self.get_document(Collection::Projects, id).await
    }

    async fn create_project(&self, input: ProjectInput) -> RepoResult<Project> {
        self.create_document(Collection::Projects, &input).await
    }

    async fn update_project(&self, id: &str, patch: ProjectPatch) -> RepoResult<Option<Project>> {
        self.update_document(Collection::Projects, id, &patch).await
    }

    async fn delete_project(&self, id: &str) -> RepoResult<bool> {
        self.delete_document(Collection::Projects, id).await
    }

    // --- Testimonials ---

    async fn list_testimonials(&self, filter: TestimonialFilter) -> RepoResult<Vec<Testimonial>> {
        let testimonials = self.list_documents(Collection::Testimonials).await?;
        Ok(filter_testimonials(testimonials, filter))
    }

    async fn get_testimonial(&self, id: &str) -> RepoResult<Option<Testimonial>> {
        self.get_document(Collection::Testimonials, id).await
    }

    async fn create_testimonial(&self, input: TestimonialInput) -> RepoResult<Testimonial> {
        self.create_document(Collection::Testimonials, &input).await
    }

    async fn update_testimonial(
        &self,
        id: &str,
        patch: TestimonialPatch,
    ) -> RepoResult<Option<Testimonial>> {
        self.update_document(Collection::Testimonials, id, &patch)
            .await
    }

    async fn delete_testimonial(&self, id: &str) -> RepoResult<bool> {
        self.delete_document(Collection::Testimonials, id).await
    }

    // --- Services ---

    async fn list_services(&self) -> RepoResult<Vec<Service>> {
        let mut services: Vec<Service> = self.list_documents(Collection::Services).await?;
        services.sort_by_key(|s| s.order);
        Ok(services)
    }

    async fn get_service(&self, id: &str) -> RepoResult<Option<Service>> {
        self.get_document(Collection::Services, id).await
    }

    async fn create_service(&self, input: ServiceInput) -> RepoResult<Service> {
        self.create_document(Collection::Services, &input).await
    }

    async fn update_service(&self, id: &str, patch: ServicePatch) -> RepoResult<Option<Service>> {
        self.update_document(Collection::Services, id, &patch).await
    }

    async fn delete_service(&self, id: &str) -> RepoResult<bool> {
        self.delete_document(Collection::Services, id).await
    }

    // --- Home Stats ---

    async fn list_home_stats(&self) -> RepoResult<Vec<HomeStats>> {
        let mut stats: Vec<HomeStats> = self.list_documents(Collection::HomeStats).await?;
        stats.sort_by_key(|s| s.order);
        Ok(stats)
    }

    async fn get_home_stat(&self, id: &str) -> RepoResult<Option<HomeStats>> {
        self.get_document(Collection::HomeStats, id).await
    }

    async fn create_home_stat(&self, input: HomeStatsInput) -> RepoResult<HomeStats> {
        self.create_document(Collection::HomeStats, &input).await
    }

    async fn update_home_stat(
        &self,
        id: &str,
        patch: HomeStatsPatch,
    ) -> RepoResult<Option<HomeStats>> {
        self.update_document(Collection::HomeStats, id, &patch).await
    }

    async fn delete_home_stat(&self, id: &str) -> RepoResult<bool> {
        self.delete_document(Collection::HomeStats, id).await
    }

    // --- Content Sections ---

    async fn list_content_sections(
        &self,
        filter: ContentFilter,
    ) -> RepoResult<Vec<ContentSection>> {
        let sections = self.list_documents(Collection::Content).await?;
        Ok(filter_content(sections, filter))
    }

    async fn get_content_section(&self, id: &str) -> RepoResult<Option<ContentSection>> {
        self.get_document(Collection::Content, id).await
    }

    async fn create_content_section(
        &self,
        input: ContentSectionInput,
    ) -> RepoResult<ContentSection> {
        self.create_document(Collection::Content, &input).await
    }

    async fn update_content_section(
        &self,
        id: &str,
        patch: ContentSectionPatch,
    ) -> RepoResult<Option<ContentSection>> {
        self.update_document(Collection::Content, id, &patch).await
    }

    async fn delete_content_section(&self, id: &str) -> RepoResult<bool> {
        self.delete_document(Collection::Content, id).await
    }

    // --- Contact Info ---

    async fn list_contact_info(&self) -> RepoResult<Vec<ContactInfo>> {
        self.list_documents(Collection::ContactInfo).await
    }

    async fn get_contact_info(&self, id: &str) -> RepoResult<Option<ContactInfo>> {
        self.get_document(Collection::ContactInfo, id).await
    }

    async fn create_contact_info(&self, input: ContactInfoInput) -> RepoResult<ContactInfo> {
        self.create_document(Collection::ContactInfo, &input).await
    }

    async fn update_contact_info(
        &self,
        id: &str,
        patch: ContactInfoPatch,
    ) -> RepoResult<Option<ContactInfo>> {
        self.update_document(Collection::ContactInfo, id, &patch)
            .await
    }

    async fn delete_contact_info(&self, id: &str) -> RepoResult<bool> {
        self.delete_document(Collection::ContactInfo, id).await
    }
}
