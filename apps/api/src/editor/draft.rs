use thiserror::Error;
use uuid::Uuid;

use serde_json::Value;

use crate::client::{ClientError, Decoded, QueryCache, ResumeClient};
use crate::editor::preview::render_preview;
use crate::models::resume::{
    EducationEntry, ExperienceEntry, NewResume, PersonalInfo, Resume, ResumePatch, SectionEntry,
};

#[derive(Debug, Error, PartialEq, Eq)]
pub enum EditError {
    #[error("index {index} is out of bounds for a list of {len}")]
    OutOfBounds { index: usize, len: usize },

    #[error("an entry with id '{id}' is already in the list")]
    DuplicateId { id: String },
}

/// Keys the skill input reacts to. Only `Enter` commits.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Key {
    Enter,
    Other,
}

/// Mutable view over one list section of the draft.
///
/// Positions shift as entries are inserted and removed; entry ids never do.
pub struct EntryList<'a, T> {
    entries: &'a mut Vec<T>,
}

impl<'a, T: SectionEntry> EntryList<'a, T> {
    /// Appends a blank entry with a fresh id and returns that id.
    pub fn append(&mut self) -> String {
        let id = Uuid::new_v4().to_string();
        self.entries.push(T::with_id(id.clone()));
        id
    }

    pub fn insert(&mut self, index: usize, entry: T) -> Result<(), EditError> {
        if index > self.entries.len() {
            return Err(EditError::OutOfBounds {
                index,
                len: self.entries.len(),
            });
        }
        if self.position(entry.entry_id()).is_some() {
            return Err(EditError::DuplicateId {
                id: entry.entry_id().to_string(),
            });
        }
        self.entries.insert(index, entry);
        Ok(())
    }

    pub fn remove(&mut self, index: usize) -> Result<T, EditError> {
        if index >= self.entries.len() {
            return Err(EditError::OutOfBounds {
                index,
                len: self.entries.len(),
            });
        }
        Ok(self.entries.remove(index))
    }

    pub fn get_mut(&mut self, index: usize) -> Option<&mut T> {
        self.entries.get_mut(index)
    }

    pub fn position(&self, id: &str) -> Option<usize> {
        self.entries.iter().position(|e| e.entry_id() == id)
    }

    pub fn ids(&self) -> Vec<String> {
        self.entries.iter().map(|e| e.entry_id().to_string()).collect()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

/// Holds the authoritative draft of one resume while it is being edited.
pub struct ResumeEditor {
    resume_id: i32,
    draft: NewResume,
    saved: NewResume,
    pending_skill: String,
}

impl ResumeEditor {
    pub fn load(resume: &Resume) -> Self {
        let draft = NewResume::from(resume);
        Self {
            resume_id: resume.id,
            saved: draft.clone(),
            draft,
            pending_skill: String::new(),
        }
    }

    /// Opens a response that did not decode as a `Resume`. Whatever editable
    /// fields it carries are kept; missing ones start blank.
    pub fn load_drifted(resume_id: i32, raw: Value) -> Result<Self, serde_json::Error> {
        let draft: NewResume = serde_json::from_value(raw)?;
        Ok(Self {
            resume_id,
            saved: draft.clone(),
            draft,
            pending_skill: String::new(),
        })
    }

    /// Fetches a resume through the client and opens it for editing.
    /// `None` when there is nothing the caller can edit under that id. A body
    /// too far off to edit is `ClientError::Decode`.
    pub async fn open(
        client: &ResumeClient,
        cache: &mut QueryCache,
        id: i32,
    ) -> Result<Option<Self>, ClientError> {
        let editor = match client.get(cache, id).await? {
            None => None,
            Some(Decoded::Valid(resume)) => Some(Self::load(&resume)),
            Some(Decoded::Drifted(raw)) => Some(Self::load_drifted(id, raw)?),
        };
        Ok(editor)
    }

    pub fn resume_id(&self) -> i32 {
        self.resume_id
    }

    pub fn draft(&self) -> &NewResume {
        &self.draft
    }

    pub fn preview(&self) -> String {
        render_preview(&self.draft)
    }

    /// Title used for the printed/exported document.
    pub fn document_title(&self) -> &str {
        if self.draft.title.trim().is_empty() {
            "Resume"
        } else {
            &self.draft.title
        }
    }

    pub fn is_dirty(&self) -> bool {
        self.draft != self.saved
    }

    pub fn set_title(&mut self, title: impl Into<String>) {
        self.draft.title = title.into();
    }

    pub fn set_published(&mut self, published: bool) {
        self.draft.is_published = published;
    }

    pub fn personal_info_mut(&mut self) -> &mut PersonalInfo {
        &mut self.draft.personal_info
    }

    pub fn experience(&mut self) -> EntryList<'_, ExperienceEntry> {
        EntryList {
            entries: &mut self.draft.experience,
        }
    }

    pub fn education(&mut self) -> EntryList<'_, EducationEntry> {
        EntryList {
            entries: &mut self.draft.education,
        }
    }

    pub fn type_skill(&mut self, text: &str) {
        self.pending_skill = text.to_string();
    }

    pub fn pending_skill(&self) -> &str {
        &self.pending_skill
    }

    /// Commits the pending skill on `Enter`. Surrounding whitespace is trimmed
    /// and blank input is ignored. Returns whether a skill was added.
    pub fn press_key(&mut self, key: Key) -> bool {
        if key != Key::Enter {
            return false;
        }
        let skill = self.pending_skill.trim();
        if skill.is_empty() {
            return false;
        }
        self.draft.skills.push(skill.to_string());
        self.pending_skill.clear();
        true
    }

    pub fn remove_skill(&mut self, index: usize) -> Result<String, EditError> {
        let len = self.draft.skills.len();
        if index >= len {
            return Err(EditError::OutOfBounds { index, len });
        }
        Ok(self.draft.skills.remove(index))
    }

    /// Submits the whole draft as an update. The draft is kept either way; a
    /// failed save only means nothing was persisted.
    pub async fn save(
        &mut self,
        client: &ResumeClient,
        cache: &mut QueryCache,
    ) -> Result<Decoded<Resume>, ClientError> {
        let patch = ResumePatch::from(self.draft.clone());
        let saved = client.update(cache, self.resume_id, &patch).await?;
        self.saved = self.draft.clone();
        Ok(saved)
    }
}
