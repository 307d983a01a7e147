//! Vendor create/edit drafts for tours and blog posts.
//!
//! A draft is the locally held, editable copy of a record. Multi-locale
//! fields are kept per [`Locale`]; images are either still on disk
//! ([`ImageSlot::Local`]) or already uploaded ([`ImageSlot::Remote`]).
//! Submission is two-phase: local images are uploaded first and swapped for
//! their remote URLs, then the whole draft is sent to create or update.

use std::collections::BTreeMap;
use std::path::{Path, PathBuf};

use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use url::Url;

use tourbook_api::types::{
    Blog, BlogPayload, Locale, LocalizedText, MediaFile, Tour, TourPayload, Waypoint,
};
use tourbook_api::Client;

use crate::error::TourbookError;
use crate::render::DEFAULT_CURRENCY;

/// Text with one value per locale. Serialized as a map keyed by locale code.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(
    try_from = "BTreeMap<String, String>",
    into = "BTreeMap<String, String>"
)]
pub struct LocalizedField(BTreeMap<Locale, String>);

impl LocalizedField {
    pub fn new() -> Self {
        Self::default()
    }

    /// Value for `locale`; empty when never set.
    pub fn get(&self, locale: Locale) -> &str {
        self.0.get(&locale).map(String::as_str).unwrap_or_default()
    }

    pub fn set(&mut self, locale: Locale, value: &str) {
        self.0.insert(locale, value.to_string());
    }

    pub fn with(mut self, locale: Locale, value: &str) -> Self {
        self.set(locale, value);
        self
    }

    /// True when no locale has a non-blank value.
    pub fn is_blank(&self) -> bool {
        self.0.values().all(|v| v.trim().is_empty())
    }

    /// Locales that still have no text.
    pub fn missing(&self) -> Vec<Locale> {
        Locale::ALL
            .iter()
            .copied()
            .filter(|l| self.get(*l).trim().is_empty())
            .collect()
    }

    /// Non-blank values, trimmed, as the API expects them.
    pub fn to_payload(&self) -> BTreeMap<Locale, String> {
        self.0
            .iter()
            .filter(|(_, v)| !v.trim().is_empty())
            .map(|(l, v)| (*l, v.trim().to_string()))
            .collect()
    }
}

impl From<&LocalizedText> for LocalizedField {
    fn from(text: &LocalizedText) -> Self {
        LocalizedField(text.to_locale_map())
    }
}

impl TryFrom<BTreeMap<String, String>> for LocalizedField {
    type Error = String;

    fn try_from(map: BTreeMap<String, String>) -> Result<Self, Self::Error> {
        map.into_iter()
            .map(|(code, value)| {
                code.parse::<Locale>()
                    .map(|l| (l, value))
                    .map_err(|_| format!("unknown locale '{}'", code))
            })
            .collect::<Result<BTreeMap<_, _>, _>>()
            .map(LocalizedField)
    }
}

impl From<LocalizedField> for BTreeMap<String, String> {
    fn from(field: LocalizedField) -> Self {
        field
            .0
            .into_iter()
            .map(|(l, v)| (l.code().to_string(), v))
            .collect()
    }
}

/// An image attached to a draft.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "lowercase")]
pub enum ImageSlot {
    /// Picked from disk, not uploaded yet. `preview` is a `file://` URL.
    Local { path: PathBuf, preview: String },
    /// Already stored on the server.
    Remote { url: String },
}

impl ImageSlot {
    /// Selects a local file. The preview URL is computed right away.
    pub fn local(path: impl AsRef<Path>) -> Result<Self, TourbookError> {
        let path = std::fs::canonicalize(path.as_ref())?;
        if !path.is_file() {
            return Err(TourbookError::InvalidInput(format!(
                "{} is not a file",
                path.display()
            )));
        }
        let preview = Url::from_file_path(&path)
            .map_err(|_| {
                TourbookError::InvalidInput(format!("cannot preview {}", path.display()))
            })?
            .to_string();
        Ok(ImageSlot::Local { path, preview })
    }

    pub fn remote(url: &str) -> Self {
        ImageSlot::Remote {
            url: url.to_string(),
        }
    }

    pub fn is_local(&self) -> bool {
        matches!(self, ImageSlot::Local { .. })
    }

    /// What to show for this slot: the local preview or the remote URL.
    pub fn display_url(&self) -> &str {
        match self {
            ImageSlot::Local { preview, .. } => preview,
            ImageSlot::Remote { url } => url,
        }
    }
}

/// Turns uploaded slots into media files; the first one becomes the card image.
fn media_files(images: &[ImageSlot]) -> Result<Vec<MediaFile>, TourbookError> {
    images
        .iter()
        .enumerate()
        .map(|(i, slot)| match slot {
            ImageSlot::Remote { url } if i == 0 => Ok(MediaFile::main(url)),
            ImageSlot::Remote { url } => Ok(MediaFile::new(url)),
            ImageSlot::Local { path, .. } => Err(TourbookError::InvalidInput(format!(
                "image {} has not been uploaded",
                path.display()
            ))),
        })
        .collect()
}

fn remote_slots(files: &[MediaFile]) -> Vec<ImageSlot> {
    let files: Vec<&MediaFile> = files.iter().filter(|f| !f.url.trim().is_empty()).collect();
    let main = files.iter().position(|f| f.is_main()).unwrap_or(0);
    // The card image goes first so it stays the main one on resubmit.
    files
        .get(main)
        .into_iter()
        .chain(files.iter().enumerate().filter(|(i, _)| *i != main).map(|(_, f)| f))
        .map(|f| ImageSlot::remote(&f.url))
        .collect()
}

fn non_blank(value: &Option<String>) -> Option<String> {
    value
        .as_deref()
        .map(str::trim)
        .filter(|v| !v.is_empty())
        .map(str::to_string)
}

fn require_title(title: &LocalizedField) -> Result<(), TourbookError> {
    if title.is_blank() {
        return Err(TourbookError::InvalidInput(
            "title is required in at least one language".to_string(),
        ));
    }
    Ok(())
}

/// Editable copy of a tour.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct TourDraft {
    pub title: LocalizedField,
    pub description: LocalizedField,
    pub price: Option<String>,
    pub sale_price: Option<String>,
    pub currency: String,
    pub duration: Option<String>,
    pub location_id: Option<i64>,
    pub tour_type: Option<String>,
    pub route: Vec<Waypoint>,
    pub inclusions: Vec<String>,
    pub exclusions: Vec<String>,
    pub images: Vec<ImageSlot>,
}

impl Default for TourDraft {
    fn default() -> Self {
        Self {
            title: LocalizedField::new(),
            description: LocalizedField::new(),
            price: None,
            sale_price: None,
            currency: DEFAULT_CURRENCY.to_string(),
            duration: None,
            location_id: None,
            tour_type: None,
            route: Vec::new(),
            inclusions: Vec::new(),
            exclusions: Vec::new(),
            images: Vec::new(),
        }
    }
}

fn extra_field<T: DeserializeOwned>(
    extra: &serde_json::Map<String, serde_json::Value>,
    key: &str,
) -> Option<T> {
    extra
        .get(key)
        .filter(|v| !v.is_null())
        .and_then(|v| serde_json::from_value(v.clone()).ok())
}

/// The location arrives as a bare id, a numeric string or an object with an `id`.
fn extra_location(extra: &serde_json::Map<String, serde_json::Value>) -> Option<i64> {
    let value = extra.get("location_id").or_else(|| extra.get("location"))?;
    match value {
        serde_json::Value::Number(n) => n.as_i64(),
        serde_json::Value::String(s) => s.trim().parse().ok(),
        serde_json::Value::Object(obj) => obj.get("id").and_then(|id| id.as_i64()),
        _ => None,
    }
}

impl TourDraft {
    /// Seeds an edit draft from a fetched tour.
    pub fn from_tour(tour: &Tour) -> Self {
        let extra = &tour.extra;
        Self {
            title: LocalizedField::from(&tour.title),
            description: tour
                .description
                .as_ref()
                .map(LocalizedField::from)
                .unwrap_or_default(),
            price: tour.price.clone(),
            sale_price: tour.sale_price.clone(),
            currency: non_blank(&tour.currency).unwrap_or_else(|| DEFAULT_CURRENCY.to_string()),
            duration: extra_field::<serde_json::Value>(extra, "duration").map(|v| match v {
                serde_json::Value::String(s) => s,
                other => other.to_string(),
            }),
            location_id: extra_location(extra),
            tour_type: extra_field(extra, "type"),
            route: extra_field(extra, "route").unwrap_or_default(),
            inclusions: extra_field(extra, "inclusions").unwrap_or_default(),
            exclusions: extra_field(extra, "exclusions").unwrap_or_default(),
            images: remote_slots(&tour.files),
        }
    }

    pub fn add_waypoint(&mut self, title: &str, description: Option<&str>) {
        self.route.push(Waypoint {
            title: title.trim().to_string(),
            description: description
                .map(str::trim)
                .filter(|d| !d.is_empty())
                .map(str::to_string),
        });
    }

    pub fn remove_waypoint(&mut self, index: usize) -> Option<Waypoint> {
        (index < self.route.len()).then(|| self.route.remove(index))
    }

    pub fn add_inclusion(&mut self, item: &str) {
        push_item(&mut self.inclusions, item);
    }

    pub fn remove_inclusion(&mut self, index: usize) -> Option<String> {
        (index < self.inclusions.len()).then(|| self.inclusions.remove(index))
    }

    pub fn add_exclusion(&mut self, item: &str) {
        push_item(&mut self.exclusions, item);
    }

    pub fn remove_exclusion(&mut self, index: usize) -> Option<String> {
        (index < self.exclusions.len()).then(|| self.exclusions.remove(index))
    }

    pub fn add_image(&mut self, slot: ImageSlot) {
        self.images.push(slot);
    }

    pub fn remove_image(&mut self, index: usize) -> Option<ImageSlot> {
        (index < self.images.len()).then(|| self.images.remove(index))
    }

    pub fn validate(&self) -> Result<(), TourbookError> {
        require_title(&self.title)
    }

    /// Builds the create/update body. Fails while a local image is pending.
    pub fn to_payload(&self) -> Result<TourPayload, TourbookError> {
        self.validate()?;
        Ok(TourPayload {
            title: self.title.to_payload(),
            description: self.description.to_payload(),
            price: non_blank(&self.price),
            sale_price: non_blank(&self.sale_price),
            currency: match self.currency.trim() {
                "" => DEFAULT_CURRENCY.to_string(),
                currency => currency.to_string(),
            },
            duration: non_blank(&self.duration),
            location_id: self.location_id.filter(|id| *id > 0),
            tour_type: non_blank(&self.tour_type),
            route: self
                .route
                .iter()
                .filter(|w| !w.title.trim().is_empty())
                .cloned()
                .collect(),
            inclusions: self.inclusions.clone(),
            exclusions: self.exclusions.clone(),
            files: media_files(&self.images)?,
        })
    }

    pub fn load(path: &Path) -> Result<Self, TourbookError> {
        read_document(path)
    }

    pub fn save(&self, path: &Path) -> Result<(), TourbookError> {
        write_document(path, self)
    }
}

fn push_item(list: &mut Vec<String>, item: &str) {
    let item = item.trim();
    if !item.is_empty() {
        list.push(item.to_string());
    }
}

/// Editable copy of a blog post.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct BlogDraft {
    pub title: LocalizedField,
    pub description: LocalizedField,
    pub content: LocalizedField,
    pub images: Vec<ImageSlot>,
}

impl BlogDraft {
    pub fn from_blog(blog: &Blog) -> Self {
        let mut images = remote_slots(&blog.files);
        if images.is_empty() {
            if let Some(url) = blog.image.as_deref().filter(|u| !u.trim().is_empty()) {
                images.push(ImageSlot::remote(url));
            }
        }
        Self {
            title: LocalizedField::from(&blog.title),
            description: blog
                .description
                .as_ref()
                .map(LocalizedField::from)
                .unwrap_or_default(),
            content: blog
                .content
                .as_ref()
                .map(LocalizedField::from)
                .unwrap_or_default(),
            images,
        }
    }

    pub fn validate(&self) -> Result<(), TourbookError> {
        require_title(&self.title)
    }

    pub fn to_payload(&self) -> Result<BlogPayload, TourbookError> {
        self.validate()?;
        Ok(BlogPayload {
            title: self.title.to_payload(),
            description: self.description.to_payload(),
            content: self.content.to_payload(),
            files: media_files(&self.images)?,
        })
    }

    pub fn load(path: &Path) -> Result<Self, TourbookError> {
        read_document(path)
    }

    pub fn save(&self, path: &Path) -> Result<(), TourbookError> {
        write_document(path, self)
    }
}

fn is_toml(path: &Path) -> bool {
    path.extension()
        .and_then(|e| e.to_str())
        .is_some_and(|e| e.eq_ignore_ascii_case("toml"))
}

/// Reads a TOML file (by extension) or JSON otherwise.
fn read_document<T: DeserializeOwned>(path: &Path) -> Result<T, TourbookError> {
    let text = std::fs::read_to_string(path)?;
    if is_toml(path) {
        toml::from_str(&text)
            .map_err(|e| TourbookError::Config(format!("{}: {}", path.display(), e)))
    } else {
        Ok(serde_json::from_str(&text)?)
    }
}

fn write_document<T: Serialize>(path: &Path, value: &T) -> Result<(), TourbookError> {
    let text = if is_toml(path) {
        toml::to_string_pretty(value)
            .map_err(|e| TourbookError::Config(format!("{}: {}", path.display(), e)))?
    } else {
        serde_json::to_string_pretty(value)?
    };
    std::fs::write(path, text)?;
    Ok(())
}

/// Tabs of the tour editor, in order.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum WizardTab {
    Content,
    Details,
    Files,
}

impl WizardTab {
    pub const ALL: [WizardTab; 3] = [WizardTab::Content, WizardTab::Details, WizardTab::Files];

    pub fn label(&self) -> &'static str {
        match self {
            WizardTab::Content => "Content",
            WizardTab::Details => "Details",
            WizardTab::Files => "Files",
        }
    }
}

/// Linear tab navigation. Moves by index only and clamps at both ends.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct TourWizard {
    index: usize,
}

impl TourWizard {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn tab(&self) -> WizardTab {
        WizardTab::ALL[self.index]
    }

    pub fn next(&mut self) -> WizardTab {
        self.index = (self.index + 1).min(WizardTab::ALL.len() - 1);
        self.tab()
    }

    pub fn back(&mut self) -> WizardTab {
        self.index = self.index.saturating_sub(1);
        self.tab()
    }

    pub fn go_to(&mut self, tab: WizardTab) {
        self.index = WizardTab::ALL.iter().position(|t| *t == tab).unwrap_or(0);
    }

    pub fn is_first(&self) -> bool {
        self.index == 0
    }

    pub fn is_last(&self) -> bool {
        self.index == WizardTab::ALL.len() - 1
    }
}

/// Whether a submission creates a new record or updates an existing one.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum SubmitMode {
    Create,
    Update(i64),
}

/// Uploads every local image and replaces its slot with the remote URL.
///
/// Slots are replaced as uploads finish, so after a failure the already
/// uploaded images are not sent again on the next attempt.
pub async fn upload_images(client: &Client, images: &mut [ImageSlot]) -> Result<usize, TourbookError> {
    let mut uploaded = 0;
    for slot in images.iter_mut() {
        let ImageSlot::Local { path, .. } = slot else {
            continue;
        };
        let bytes = tokio::fs::read(path.as_path()).await?;
        let file_name = path
            .file_name()
            .and_then(|n| n.to_str())
            .unwrap_or("image")
            .to_string();
        tracing::debug!("uploading {} ({} bytes)", file_name, bytes.len());
        let response = client.upload_image(&file_name, bytes).await?;
        *slot = ImageSlot::Remote { url: response.url };
        uploaded += 1;
    }
    Ok(uploaded)
}

/// Uploads pending images, then creates or updates the tour.
pub async fn submit_tour(
    client: &Client,
    draft: &mut TourDraft,
    mode: SubmitMode,
) -> Result<Tour, TourbookError> {
    draft.validate()?;
    upload_images(client, &mut draft.images).await?;
    let payload = draft.to_payload()?;
    let response = match mode {
        SubmitMode::Create => client.create_tour(&payload).await?,
        SubmitMode::Update(id) => client.update_tour(id, &payload).await?,
    };
    tracing::info!("saved tour {}", response.data.id);
    Ok(response.data)
}

/// Uploads pending images, then creates or updates the blog post.
pub async fn submit_blog(
    client: &Client,
    draft: &mut BlogDraft,
    mode: SubmitMode,
) -> Result<Blog, TourbookError> {
    draft.validate()?;
    upload_images(client, &mut draft.images).await?;
    let payload = draft.to_payload()?;
    let response = match mode {
        SubmitMode::Create => client.create_blog(&payload).await?,
        SubmitMode::Update(id) => client.update_blog(id, &payload).await?,
    };
    tracing::info!("saved blog post {}", response.data.id);
    Ok(response.data)
}
