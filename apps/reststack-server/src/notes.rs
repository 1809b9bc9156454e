//! The demo note store and its resources.
//!
//! A deliberately small API exercising the framework end to end:
//!
//! - `/notes` — collection resource: GET lists notes as JSON, POST creates
//!   one from a JSON body.
//! - `/notes/{id}` — item resource: negotiated GET (JSON or plain text),
//!   PUT replaces, DELETE removes. Each note carries an entity tag and a
//!   modification date, so conditional requests work against it.

use std::collections::BTreeMap;
use std::sync::Arc;
use std::sync::atomic::{AtomicU64, Ordering};

use async_trait::async_trait;
use chrono::{DateTime, SubsecRound, Utc};
use http::Method;
use parking_lot::RwLock;
use reststack_core::{Resource, RestRequest, RestResponse, SharedCatalog, VariantCatalog};
use reststack_model::{
    MediaType, Representation, RepresentationInfo, RestError, Status, Tag, Variant,
};

/// Variant list shared across per-call `NoteResource` instances.
static NOTE_VARIANTS: SharedCatalog = SharedCatalog::new();

/// One stored note.
#[derive(Debug, Clone, serde::Serialize, serde::Deserialize)]
pub struct Note {
    /// Note identifier.
    pub id: u64,
    /// Note text.
    pub text: String,
    /// Monotonic revision, the basis of the entity tag.
    #[serde(default)]
    pub revision: u64,
    /// Last modification time.
    #[serde(default = "Utc::now")]
    pub modified: DateTime<Utc>,
}

impl Note {
    fn tag(&self) -> Tag {
        Tag::strong(format!("{}-{}", self.id, self.revision))
    }

    fn info(&self) -> RepresentationInfo {
        RepresentationInfo::new(Some(self.tag()), Some(self.modified))
    }
}

/// The shared, thread-safe note store.
///
/// Shared across per-call resource instances; the resources themselves stay
/// single-threaded.
#[derive(Debug, Default)]
pub struct NoteStore {
    notes: RwLock<BTreeMap<u64, Note>>,
    next_id: AtomicU64,
}

impl NoteStore {
    /// Create a store seeded with a couple of notes.
    #[must_use]
    pub fn with_samples() -> Arc<Self> {
        let store = Arc::new(Self::default());
        store.insert("Remember the milk".to_owned());
        store.insert("Feed the cat".to_owned());
        store
    }

    fn insert(&self, text: String) -> Note {
        let id = self.next_id.fetch_add(1, Ordering::Relaxed) + 1;
        let note = Note {
            id,
            text,
            revision: 1,
            modified: Utc::now().trunc_subsecs(0),
        };
        self.notes.write().insert(id, note.clone());
        note
    }

    fn get(&self, id: u64) -> Option<Note> {
        self.notes.read().get(&id).cloned()
    }

    fn list(&self) -> Vec<Note> {
        self.notes.read().values().cloned().collect()
    }

    fn replace(&self, id: u64, text: String) -> Option<Note> {
        let mut notes = self.notes.write();
        let note = notes.get_mut(&id)?;
        note.text = text;
        note.revision += 1;
        note.modified = Utc::now().trunc_subsecs(0);
        Some(note.clone())
    }

    fn remove(&self, id: u64) -> bool {
        self.notes.write().remove(&id).is_some()
    }
}

fn json_representation<T: serde::Serialize>(value: &T) -> Result<Representation, RestError> {
    let data = serde_json::to_vec(value)
        .map_err(|e| RestError::internal("failed to serialize note").with_source(e))?;
    Ok(Representation::new(
        Variant::new(MediaType::APPLICATION_JSON),
        data,
    ))
}

/// The `/notes` collection resource.
pub struct NotesResource {
    store: Arc<NoteStore>,
}

impl NotesResource {
    /// Create the collection resource over the shared store.
    #[must_use]
    pub fn new(store: Arc<NoteStore>) -> Self {
        Self { store }
    }
}

#[async_trait]
impl Resource for NotesResource {
    fn allowed_methods(&self) -> Vec<Method> {
        vec![Method::GET, Method::HEAD, Method::OPTIONS, Method::POST]
    }

    fn variants(&self, _method: &Method) -> Vec<Variant> {
        vec![Variant::new(MediaType::APPLICATION_JSON)]
    }

    async fn get(
        &mut self,
        _request: &RestRequest,
        _variant: Option<&Variant>,
    ) -> Result<RestResponse, RestError> {
        let notes = self.store.list();
        Ok(RestResponse::ok(json_representation(&notes)?))
    }

    async fn post(&mut self, request: &RestRequest) -> Result<RestResponse, RestError> {
        #[derive(serde::Deserialize)]
        struct NewNote {
            text: String,
        }

        let new_note: NewNote = serde_json::from_slice(request.entity())
            .map_err(|e| RestError::bad_request(format!("invalid note body: {e}")))?;

        let note = self.store.insert(new_note.text);
        tracing::info!(id = note.id, "note created");
        Ok(RestResponse::status(Status::Created).with_entity(json_representation(&note)?))
    }
}

/// The `/notes/{id}` item resource.
///
/// One instance is created per call with the id captured by the route
/// template already resolved.
pub struct NoteResource {
    store: Arc<NoteStore>,
    note: Option<Note>,
}

impl NoteResource {
    /// Create the item resource, resolving the `{id}` capture.
    #[must_use]
    pub fn new(store: Arc<NoteStore>, request: &RestRequest) -> Self {
        let note = request
            .attribute("id")
            .and_then(|raw| raw.parse::<u64>().ok())
            .and_then(|id| store.get(id));
        Self { store, note }
    }

    fn note_id(request: &RestRequest) -> Result<u64, RestError> {
        request
            .attribute("id")
            .and_then(|raw| raw.parse::<u64>().ok())
            .ok_or_else(|| RestError::bad_request("invalid note id"))
    }
}

#[async_trait]
impl Resource for NoteResource {
    fn exists(&self) -> bool {
        self.note.is_some()
    }

    fn allowed_methods(&self) -> Vec<Method> {
        vec![
            Method::GET,
            Method::HEAD,
            Method::OPTIONS,
            Method::PUT,
            Method::DELETE,
        ]
    }

    fn variants(&self, _method: &Method) -> Vec<Variant> {
        NOTE_VARIANTS
            .get_or_init(|| {
                let mut catalog = VariantCatalog::new();
                catalog.declare(MediaType::APPLICATION_JSON).done();
                catalog.declare(MediaType::TEXT_PLAIN).done();
                catalog
            })
            .variants()
            .to_vec()
    }

    fn representation_info(&self) -> Option<RepresentationInfo> {
        self.note.as_ref().map(Note::info)
    }

    async fn get(
        &mut self,
        _request: &RestRequest,
        variant: Option<&Variant>,
    ) -> Result<RestResponse, RestError> {
        let note = self.note.as_ref().ok_or_else(RestError::not_found)?;

        let representation = match variant.map(Variant::media_type) {
            Some(media_type) if *media_type == MediaType::TEXT_PLAIN => {
                Representation::plain_text(note.text.clone())
            }
            _ => json_representation(note)?,
        };

        Ok(RestResponse::ok(
            representation
                .with_tag(note.tag())
                .with_modification_date(note.modified),
        ))
    }

    async fn put(&mut self, request: &RestRequest) -> Result<RestResponse, RestError> {
        #[derive(serde::Deserialize)]
        struct NoteUpdate {
            text: String,
        }

        let id = Self::note_id(request)?;
        let update: NoteUpdate = serde_json::from_slice(request.entity())
            .map_err(|e| RestError::bad_request(format!("invalid note body: {e}")))?;

        let note = self
            .store
            .replace(id, update.text)
            .ok_or_else(RestError::not_found)?;
        tracing::info!(id, revision = note.revision, "note replaced");
        Ok(RestResponse::ok(json_representation(&note)?))
    }

    async fn delete(&mut self, request: &RestRequest) -> Result<RestResponse, RestError> {
        let id = Self::note_id(request)?;
        if self.store.remove(id) {
            tracing::info!(id, "note deleted");
            Ok(RestResponse::status(Status::NoContent))
        } else {
            Err(RestError::not_found())
        }
    }
}
