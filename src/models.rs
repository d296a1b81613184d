use std::{collections::BTreeMap, fmt, str::FromStr};

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use ts_rs::TS;
use utoipa::ToSchema;

use crate::{storage::StorageService, validation::ValidationErrors};

// --- Shared Types ---

/// Section
///
/// The fixed set of page sections a `ContentSection` can describe.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, TS, ToSchema)]
#[serde(rename_all = "lowercase")]
#[ts(export)]
pub enum Section {
    Hero,
    Mission,
    About,
    Contact,
}

impl Section {
    pub const ALL: [Section; 4] = [
        Section::Hero,
        Section::Mission,
        Section::About,
        Section::Contact,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            Section::Hero => "hero",
            Section::Mission => "mission",
            Section::About => "about",
            Section::Contact => "contact",
        }
    }
}

impl fmt::Display for Section {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("\"{0}\" is not a valid section")]
pub struct UnknownSection(pub String);

impl FromStr for Section {
    type Err = UnknownSection;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Section::ALL
            .into_iter()
            .find(|section| section.as_str() == s)
            .ok_or_else(|| UnknownSection(s.to_string()))
    }
}

fn default_rating() -> i32 {
    5
}

// --- List Filters ---

/// Query options accepted by project listing.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ProjectFilter {
    pub featured_only: bool,
    /// Applied after filtering and ordering.
    pub limit: Option<usize>,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct TestimonialFilter {
    pub featured_only: bool,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ContentFilter {
    pub section: Option<Section>,
}

// --- Stored Records ---
//
// Records are what a content store returns. `id` is always the opaque string
// form of the backend's identifier. Records whose wire shape differs from
// their stored shape (image resolution) are presented through a response DTO.

/// Project
///
/// A portfolio piece. `image` holds an uploaded asset key, `image_url_fallback`
/// an external URL used when no asset was uploaded.
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct Project {
    pub id: String,
    pub title: String,
    pub description: String,
    #[serde(default)]
    pub image: Option<String>,
    #[serde(default)]
    pub image_url_fallback: Option<String>,
    #[serde(default)]
    pub tags: Vec<String>,
    #[serde(default)]
    pub link: Option<String>,
    #[serde(default)]
    pub featured: bool,
    #[serde(default)]
    pub order: i32,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct Testimonial {
    pub id: String,
    pub name: String,
    pub role: String,
    pub company: String,
    pub content: String,
    #[serde(default)]
    pub image: Option<String>,
    #[serde(default)]
    pub image_url_fallback: Option<String>,
    #[serde(default = "default_rating")]
    pub rating: i32,
    #[serde(default)]
    pub featured: bool,
    #[serde(default)]
    pub order: i32,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// Service
///
/// Offered service card. `icon` is a front-end icon identifier (e.g. "code").
/// Served as-is; its stored and wire shapes are identical.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, TS, ToSchema)]
#[ts(export)]
pub struct Service {
    pub id: String,
    pub title: String,
    pub description: String,
    pub icon: String,
    #[serde(default)]
    pub order: i32,
    #[ts(type = "string")]
    pub created_at: DateTime<Utc>,
    #[ts(type = "string")]
    pub updated_at: DateTime<Utc>,
}

/// HomeStats
///
/// A headline figure on the landing page, e.g. `{"label": "Happy Clients", "value": "30+"}`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, TS, ToSchema)]
#[ts(export)]
pub struct HomeStats {
    pub id: String,
    pub label: String,
    pub value: String,
    #[serde(default)]
    pub order: i32,
}

#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct ContentSection {
    pub id: String,
    pub section: Section,
    pub title: String,
    #[serde(default)]
    pub subtitle: Option<String>,
    pub content: String,
    #[serde(default)]
    pub image: Option<String>,
    #[serde(default)]
    pub image_url_fallback: Option<String>,
    pub updated_at: DateTime<Utc>,
}

/// ContactInfo
///
/// Site contact details. Conceptually a singleton, but nothing prevents
/// several records from existing; clients take the first one listed.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, TS, ToSchema)]
#[ts(export)]
pub struct ContactInfo {
    pub id: String,
    pub email: String,
    pub phone: String,
    pub address: String,
    /// Platform name to profile URL. Exposed as `socialLinks`.
    #[serde(rename = "socialLinks", default)]
    pub social_links: BTreeMap<String, String>,
    #[ts(type = "string")]
    pub updated_at: DateTime<Utc>,
}

// --- Response DTOs ---

/// ProjectResponse
///
/// Wire form of a project. `imageUrl` is computed; every other field keeps its
/// stored snake_case name.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, TS, ToSchema)]
#[ts(export)]
pub struct ProjectResponse {
    pub id: String,
    pub title: String,
    pub description: String,
    #[serde(rename = "imageUrl")]
    pub image_url: String,
    pub image_url_fallback: Option<String>,
    pub tags: Vec<String>,
    pub link: Option<String>,
    pub featured: bool,
    pub order: i32,
    #[ts(type = "string")]
    pub created_at: DateTime<Utc>,
    #[ts(type = "string")]
    pub updated_at: DateTime<Utc>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, TS, ToSchema)]
#[ts(export)]
pub struct TestimonialResponse {
    pub id: String,
    pub name: String,
    pub role: String,
    pub company: String,
    pub content: String,
    #[serde(rename = "imageUrl")]
    pub image_url: String,
    pub image_url_fallback: Option<String>,
    pub rating: i32,
    pub featured: bool,
    pub order: i32,
    #[ts(type = "string")]
    pub created_at: DateTime<Utc>,
    #[ts(type = "string")]
    pub updated_at: DateTime<Utc>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, TS, ToSchema)]
#[ts(export)]
pub struct ContentSectionResponse {
    pub id: String,
    pub section: Section,
    pub title: String,
    pub subtitle: Option<String>,
    pub content: String,
    #[serde(rename = "imageUrl")]
    pub image_url: String,
    pub image_url_fallback: Option<String>,
    #[ts(type = "string")]
    pub updated_at: DateTime<Utc>,
}

/// resolve_image_url
///
/// Uploaded asset first, then the fallback URL, then the empty string.
/// Empty strings count as absent on both inputs.
pub fn resolve_image_url(
    storage: &dyn StorageService,
    image: Option<&str>,
    fallback: Option<&str>,
) -> String {
    if let Some(key) = image.filter(|key| !key.is_empty()) {
        return storage.public_url(key);
    }
    fallback.unwrap_or_default().to_string()
}

impl Project {
    pub fn present(self, storage: &dyn StorageService) -> ProjectResponse {
        let image_url = resolve_image_url(
            storage,
            self.image.as_deref(),
            self.image_url_fallback.as_deref(),
        );
        ProjectResponse {
            id: self.id,
            title: self.title,
            description: self.description,
            image_url,
            image_url_fallback: self.image_url_fallback,
            tags: self.tags,
            link: self.link,
            featured: self.featured,
            order: self.order,
            created_at: self.created_at,
            updated_at: self.updated_at,
        }
    }
}

impl Testimonial {
    pub fn present(self, storage: &dyn StorageService) -> TestimonialResponse {
        let image_url = resolve_image_url(
            storage,
            self.image.as_deref(),
            self.image_url_fallback.as_deref(),
        );
        TestimonialResponse {
            id: self.id,
            name: self.name,
            role: self.role,
            company: self.company,
            content: self.content,
            image_url,
            image_url_fallback: self.image_url_fallback,
            rating: self.rating,
            featured: self.featured,
            order: self.order,
            created_at: self.created_at,
            updated_at: self.updated_at,
        }
    }
}

impl ContentSection {
    pub fn present(self, storage: &dyn StorageService) -> ContentSectionResponse {
        let image_url = resolve_image_url(
            storage,
            self.image.as_deref(),
            self.image_url_fallback.as_deref(),
        );
        ContentSectionResponse {
            id: self.id,
            section: self.section,
            title: self.title,
            subtitle: self.subtitle,
            content: self.content,
            image_url,
            image_url_fallback: self.image_url_fallback,
            updated_at: self.updated_at,
        }
    }
}

// --- Request Payloads (create / full update) ---
//
// `image` carries an object key obtained from the presigned upload flow.
// Unknown keys (such as a read-only `imageUrl` echoed back by a client) are ignored.

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, TS, ToSchema)]
#[ts(export)]
pub struct ProjectInput {
    pub title: String,
    pub description: String,
    #[serde(default)]
    pub image: Option<String>,
    #[serde(default)]
    pub image_url_fallback: Option<String>,
    #[serde(default)]
    pub tags: Vec<String>,
    #[serde(default)]
    pub link: Option<String>,
    #[serde(default)]
    pub featured: bool,
    #[serde(default)]
    pub order: i32,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, TS, ToSchema)]
#[ts(export)]
pub struct TestimonialInput {
    pub name: String,
    pub role: String,
    pub company: String,
    pub content: String,
    #[serde(default)]
    pub image: Option<String>,
    #[serde(default)]
    pub image_url_fallback: Option<String>,
    #[serde(default = "default_rating")]
    pub rating: i32,
    #[serde(default)]
    pub featured: bool,
    #[serde(default)]
    pub order: i32,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, TS, ToSchema)]
#[ts(export)]
pub struct ServiceInput {
    pub title: String,
    pub description: String,
    pub icon: String,
    #[serde(default)]
    pub order: i32,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, TS, ToSchema)]
#[ts(export)]
pub struct HomeStatsInput {
    pub label: String,
    pub value: String,
    #[serde(default)]
    pub order: i32,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, TS, ToSchema)]
#[ts(export)]
pub struct ContentSectionInput {
    pub section: Section,
    pub title: String,
    #[serde(default)]
    pub subtitle: Option<String>,
    pub content: String,
    #[serde(default)]
    pub image: Option<String>,
    #[serde(default)]
    pub image_url_fallback: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, TS, ToSchema)]
#[ts(export)]
pub struct ContactInfoInput {
    pub email: String,
    pub phone: String,
    pub address: String,
    #[serde(rename = "socialLinks")]
    pub social_links: BTreeMap<String, String>,
}

// --- Partial Update Payloads ---
//
// `None` leaves a field untouched. Serialization skips `None` so the set of
// serialized keys is exactly the set of fields to write.

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize, TS, ToSchema)]
#[ts(export)]
pub struct ProjectPatch {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub title: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub image: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub image_url_fallback: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub tags: Option<Vec<String>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub link: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub featured: Option<bool>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub order: Option<i32>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize, TS, ToSchema)]
#[ts(export)]
pub struct TestimonialPatch {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub role: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub company: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub content: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub image: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub image_url_fallback: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub rating: Option<i32>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub featured: Option<bool>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub order: Option<i32>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize, TS, ToSchema)]
#[ts(export)]
pub struct ServicePatch {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub title: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub icon: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub order: Option<i32>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize, TS, ToSchema)]
#[ts(export)]
pub struct HomeStatsPatch {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub label: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub value: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub order: Option<i32>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize, TS, ToSchema)]
#[ts(export)]
pub struct ContentSectionPatch {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub section: Option<Section>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub title: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub subtitle: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub content: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub image: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub image_url_fallback: Option<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize, TS, ToSchema)]
#[ts(export)]
pub struct ContactInfoPatch {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub email: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub phone: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub address: Option<String>,
    #[serde(
        rename = "socialLinks",
        default,
        skip_serializing_if = "Option::is_none"
    )]
    pub social_links: Option<BTreeMap<String, String>>,
}

// --- Full update → patch ---
//
// A PUT validates the complete payload, then writes it as a patch: optional
// fields the client omitted keep their stored value.

impl From<ProjectInput> for ProjectPatch {
    fn from(input: ProjectInput) -> Self {
        Self {
            title: Some(input.title),
            description: Some(input.description),
            image: input.image,
            image_url_fallback: input.image_url_fallback,
            tags: Some(input.tags),
            link: input.link,
            featured: Some(input.featured),
            order: Some(input.order),
        }
    }
}

impl From<TestimonialInput> for TestimonialPatch {
    fn from(input: TestimonialInput) -> Self {
        Self {
            name: Some(input.name),
            role: Some(input.role),
            company: Some(input.company),
            content: Some(input.content),
            image: input.image,
            image_url_fallback: input.image_url_fallback,
            rating: Some(input.rating),
            featured: Some(input.featured),
            order: Some(input.order),
        }
    }
}

impl From<ServiceInput> for ServicePatch {
    fn from(input: ServiceInput) -> Self {
        Self {
            title: Some(input.title),
            description: Some(input.description),
            icon: Some(input.icon),
            order: Some(input.order),
        }
    }
}

impl From<HomeStatsInput> for HomeStatsPatch {
    fn from(input: HomeStatsInput) -> Self {
        Self {
            label: Some(input.label),
            value: Some(input.value),
            order: Some(input.order),
        }
    }
}

impl From<ContentSectionInput> for ContentSectionPatch {
    fn from(input: ContentSectionInput) -> Self {
        Self {
            section: Some(input.section),
            title: Some(input.title),
            subtitle: input.subtitle,
            content: Some(input.content),
            image: input.image,
            image_url_fallback: input.image_url_fallback,
        }
    }
}

impl From<ContactInfoInput> for ContactInfoPatch {
    fn from(input: ContactInfoInput) -> Self {
        Self {
            email: Some(input.email),
            phone: Some(input.phone),
            address: Some(input.address),
            social_links: Some(input.social_links),
        }
    }
}

// --- Validation ---

impl ProjectInput {
    pub fn validate(&self) -> ValidationErrors {
        let mut errors = ValidationErrors::new();
        errors.text("title", &self.title, Some(200));
        errors.text("description", &self.description, None);
        errors.url("image_url_fallback", self.image_url_fallback.as_deref());
        errors.url("link", self.link.as_deref());
        errors
    }
}

impl ProjectPatch {
    pub fn validate(&self) -> ValidationErrors {
        let mut errors = ValidationErrors::new();
        errors.text_opt("title", self.title.as_deref(), Some(200));
        errors.text_opt("description", self.description.as_deref(), None);
        errors.url("image_url_fallback", self.image_url_fallback.as_deref());
        errors.url("link", self.link.as_deref());
        errors
    }

    pub fn apply(self, record: &mut Project) {
        if let Some(title) = self.title {
            record.title = title;
        }
        if let Some(description) = self.description {
            record.description = description;
        }
        if self.image.is_some() {
            record.image = self.image;
        }
        if self.image_url_fallback.is_some() {
            record.image_url_fallback = self.image_url_fallback;
        }
        if let Some(tags) = self.tags {
            record.tags = tags;
        }
        if self.link.is_some() {
            record.link = self.link;
        }
        if let Some(featured) = self.featured {
            record.featured = featured;
        }
        if let Some(order) = self.order {
            record.order = order;
        }
    }
}

impl TestimonialInput {
    pub fn validate(&self) -> ValidationErrors {
        let mut errors = ValidationErrors::new();
        errors.text("name", &self.name, Some(100));
        errors.text("role", &self.role, Some(100));
        errors.text("company", &self.company, Some(100));
        errors.text("content", &self.content, None);
        errors.url("image_url_fallback", self.image_url_fallback.as_deref());
        errors
    }
}

impl TestimonialPatch {
    pub fn validate(&self) -> ValidationErrors {
        let mut errors = ValidationErrors::new();
        errors.text_opt("name", self.name.as_deref(), Some(100));
        errors.text_opt("role", self.role.as_deref(), Some(100));
        errors.text_opt("company", self.company.as_deref(), Some(100));
        errors.text_opt("content", self.content.as_deref(), None);
        errors.url("image_url_fallback", self.image_url_fallback.as_deref());
        errors
    }

    pub fn apply(self, record: &mut Testimonial) {
        if let Some(name) = self.name {
            record.name = name;
        }
        if let Some(role) = self.role {
            record.role = role;
        }
        if let Some(company) = self.company {
            record.company = company;
        }
        if let Some(content) = self.content {
            record.content = content;
        }
        if self.image.is_some() {
            record.image = self.image;
        }
        if self.image_url_fallback.is_some() {
            record.image_url_fallback = self.image_url_fallback;
        }
        if let Some(rating) = self.rating {
            record.rating = rating;
        }
        if let Some(featured) = self.featured {
            record.featured = featured;
        }
        if let Some(order) = self.order {
            record.order = order;
        }
    }
}

impl ServiceInput {
    pub fn validate(&self) -> ValidationErrors {
        let mut errors = ValidationErrors::new();
        errors.text("title", &self.title, Some(100));
        errors.text("description", &self.description, None);
        errors.text("icon", &self.icon, Some(50));
        errors
    }
}

impl ServicePatch {
    pub fn validate(&self) -> ValidationErrors {
        let mut errors = ValidationErrors::new();
        errors.text_opt("title", self.title.as_deref(), Some(100));
        errors.text_opt("description", self.description.as_deref(), None);
        errors.text_opt("icon", self.icon.as_deref(), Some(50));
        errors
    }

    pub fn apply(self, record: &mut Service) {
        if let Some(title) = self.title {
            record.title = title;
        }
        if let Some(description) = self.description {
            record.description = description;
        }
        if let Some(icon) = self.icon {
            record.icon = icon;
        }
        if let Some(order) = self.order {
            record.order = order;
        }
    }
}

impl HomeStatsInput {
    pub fn validate(&self) -> ValidationErrors {
        let mut errors = ValidationErrors::new();
        errors.text("label", &self.label, Some(100));
        errors.text("value", &self.value, Some(50));
        errors
    }
}

impl HomeStatsPatch {
    pub fn validate(&self) -> ValidationErrors {
        let mut errors = ValidationErrors::new();
        errors.text_opt("label", self.label.as_deref(), Some(100));
        errors.text_opt("value", self.value.as_deref(), Some(50));
        errors
    }

    pub fn apply(self, record: &mut HomeStats) {
        if let Some(label) = self.label {
            record.label = label;
        }
        if let Some(value) = self.value {
            record.value = value;
        }
        if let Some(order) = self.order {
            record.order = order;
        }
    }
}

impl ContentSectionInput {
    pub fn validate(&self) -> ValidationErrors {
        let mut errors = ValidationErrors::new();
        errors.text("title", &self.title, Some(200));
        if let Some(subtitle) = self.subtitle.as_deref() {
            errors.max_len("subtitle", subtitle, 200);
        }
        errors.text("content", &self.content, None);
        errors.url("image_url_fallback", self.image_url_fallback.as_deref());
        errors
    }
}

impl ContentSectionPatch {
    pub fn validate(&self) -> ValidationErrors {
        let mut errors = ValidationErrors::new();
        errors.text_opt("title", self.title.as_deref(), Some(200));
        if let Some(subtitle) = self.subtitle.as_deref() {
            errors.max_len("subtitle", subtitle, 200);
        }
        errors.text_opt("content", self.content.as_deref(), None);
        errors.url("image_url_fallback", self.image_url_fallback.as_deref());
        errors
    }

    pub fn apply(self, record: &mut ContentSection) {
        if let Some(section) = self.section {
            record.section = section;
        }
        if let Some(title) = self.title {
            record.title = title;
        }
        if self.subtitle.is_some() {
            record.subtitle = self.subtitle;
        }
        if let Some(content) = self.content {
            record.content = content;
        }
        if self.image.is_some() {
            record.image = self.image;
        }
        if self.image_url_fallback.is_some() {
            record.image_url_fallback = self.image_url_fallback;
        }
    }
}

impl ContactInfoInput {
    pub fn validate(&self) -> ValidationErrors {
        let mut errors = ValidationErrors::new();
        errors.email("email", &self.email);
        errors.text("phone", &self.phone, Some(50));
        errors.text("address", &self.address, None);
        errors
    }
}

impl ContactInfoPatch {
    pub fn validate(&self) -> ValidationErrors {
        let mut errors = ValidationErrors::new();
        if let Some(email) = self.email.as_deref() {
            errors.email("email", email);
        }
        errors.text_opt("phone", self.phone.as_deref(), Some(50));
        errors.text_opt("address", self.address.as_deref(), None);
        errors
    }

    pub fn apply(self, record: &mut ContactInfo) {
        if let Some(email) = self.email {
            record.email = email;
        }
        if let Some(phone) = self.phone {
            record.phone = phone;
        }
        if let Some(address) = self.address {
            record.address = address;
        }
        if let Some(social_links) = self.social_links {
            record.social_links = social_links;
        }
    }
}

// --- Media Upload Schemas ---

/// MediaFolder
///
/// Object-key prefix for an uploaded image, one per entity that carries images.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, TS, ToSchema)]
#[serde(rename_all = "lowercase")]
#[ts(export)]
pub enum MediaFolder {
    Projects,
    Testimonials,
    Content,
}

impl MediaFolder {
    pub fn prefix(&self) -> &'static str {
        match self {
            MediaFolder::Projects => "projects",
            MediaFolder::Testimonials => "testimonials",
            MediaFolder::Content => "content",
        }
    }
}

/// PresignedUrlRequest
///
/// Input payload for requesting a short-lived upload URL (POST /api/uploads/presigned).
#[derive(Debug, Clone, Deserialize, Serialize, ToSchema, TS, Default)]
#[ts(export)]
pub struct PresignedUrlRequest {
    /// The original filename, used to derive the file extension.
    #[schema(example = "cover.png")]
    pub filename: String,
    /// The MIME type the upload will be constrained to.
    #[schema(example = "image/png")]
    pub file_type: String,
    #[serde(default)]
    pub folder: Option<MediaFolder>,
}

/// PresignedUrlResponse
///
/// `resource_key` is the value to store in an entity's `image` field once the
/// client has PUT the file to `upload_url`.
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema, TS, Default)]
#[ts(export)]
pub struct PresignedUrlResponse {
    pub upload_url: String,
    pub resource_key: String,
}
