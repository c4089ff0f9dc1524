use chrono::{DateTime, Utc};
use serde::{Deserialize, Deserializer, Serialize};
use sqlx::types::Json;
use sqlx::FromRow;

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct PersonalInfo {
    pub full_name: String,
    pub email: String,
    pub phone: String,
    pub location: String,
    pub summary: String,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ExperienceEntry {
    pub id: String,
    #[serde(default)]
    pub company: String,
    #[serde(default)]
    pub position: String,
    #[serde(default)]
    pub start_date: String,
    #[serde(default)]
    pub end_date: String,
    #[serde(default)]
    pub description: String,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct EducationEntry {
    pub id: String,
    #[serde(default)]
    pub institution: String,
    #[serde(default)]
    pub degree: String,
    #[serde(default)]
    pub start_date: String,
    #[serde(default)]
    pub end_date: String,
    #[serde(default)]
    pub description: String,
}

/// Entries of a resume list section carry a client-generated id that stays
/// stable while the entry moves around in the list.
pub trait SectionEntry {
    fn entry_id(&self) -> &str;
    fn with_id(id: String) -> Self;
}

impl SectionEntry for ExperienceEntry {
    fn entry_id(&self) -> &str {
        &self.id
    }

    fn with_id(id: String) -> Self {
        Self {
            id,
            ..Self::default()
        }
    }
}

impl SectionEntry for EducationEntry {
    fn entry_id(&self) -> &str {
        &self.id
    }

    fn with_id(id: String) -> Self {
        Self {
            id,
            ..Self::default()
        }
    }
}

/// A persisted resume as returned by the API.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Resume {
    pub id: i32,
    pub user_id: String,
    pub title: String,
    pub personal_info: PersonalInfo,
    pub experience: Vec<ExperienceEntry>,
    pub education: Vec<EducationEntry>,
    pub skills: Vec<String>,
    pub is_published: bool,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// Row shape of the `resumes` table. List sections live in JSONB columns.
#[derive(Debug, Clone, FromRow)]
pub struct ResumeRow {
    pub id: i32,
    pub user_id: String,
    pub title: String,
    pub personal_info: Json<PersonalInfo>,
    pub experience: Json<Vec<ExperienceEntry>>,
    pub education: Json<Vec<EducationEntry>>,
    pub skills: Json<Vec<String>>,
    pub is_published: Option<bool>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl From<ResumeRow> for Resume {
    fn from(row: ResumeRow) -> Self {
        Resume {
            id: row.id,
            user_id: row.user_id,
            title: row.title,
            personal_info: row.personal_info.0,
            experience: row.experience.0,
            education: row.education.0,
            skills: row.skills.0,
            is_published: row.is_published.unwrap_or(false),
            created_at: row.created_at,
            updated_at: row.updated_at,
        }
    }
}

/// Client-editable fields of a resume. This is the create payload and the
/// editor's draft.
///
/// Deserializing is lenient: missing sections take their defaults and a null
/// `isPublished` reads as unpublished. The server validates raw JSON on its
/// own and never goes through this impl.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct NewResume {
    pub title: String,
    pub personal_info: PersonalInfo,
    pub experience: Vec<ExperienceEntry>,
    pub education: Vec<EducationEntry>,
    pub skills: Vec<String>,
    #[serde(deserialize_with = "null_as_false")]
    pub is_published: bool,
}

fn null_as_false<'de, D>(deserializer: D) -> Result<bool, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(Option::<bool>::deserialize(deserializer)?.unwrap_or(false))
}

impl Default for NewResume {
    fn default() -> Self {
        NewResume {
            title: "Untitled Resume".to_string(),
            personal_info: PersonalInfo::default(),
            experience: Vec::new(),
            education: Vec::new(),
            skills: Vec::new(),
            is_published: false,
        }
    }
}

impl From<&Resume> for NewResume {
    fn from(resume: &Resume) -> Self {
        NewResume {
            title: resume.title.clone(),
            personal_info: resume.personal_info.clone(),
            experience: resume.experience.clone(),
            education: resume.education.clone(),
            skills: resume.skills.clone(),
            is_published: resume.is_published,
        }
    }
}

/// Partial update payload. Absent fields keep their stored values; present
/// fields replace them wholesale (lists are not merged).
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ResumePatch {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub title: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub personal_info: Option<PersonalInfo>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub experience: Option<Vec<ExperienceEntry>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub education: Option<Vec<EducationEntry>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub skills: Option<Vec<String>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub is_published: Option<bool>,
}

impl ResumePatch {
    pub fn is_empty(&self) -> bool {
        *self == ResumePatch::default()
    }

    /// Applies every present field to `resume`. Timestamps are left to the caller.
    pub fn apply_to(self, resume: &mut Resume) {
        if let Some(title) = self.title {
            resume.title = title;
        }
        if let Some(personal_info) = self.personal_info {
            resume.personal_info = personal_info;
        }
        if let Some(experience) = self.experience {
            resume.experience = experience;
        }
        if let Some(education) = self.education {
            resume.education = education;
        }
        if let Some(skills) = self.skills {
            resume.skills = skills;
        }
        if let Some(is_published) = self.is_published {
            resume.is_published = is_published;
        }
    }
}

impl From<NewResume> for ResumePatch {
    fn from(draft: NewResume) -> Self {
        ResumePatch {
            title: Some(draft.title),
            personal_info: Some(draft.personal_info),
            experience: Some(draft.experience),
            education: Some(draft.education),
            skills: Some(draft.skills),
            is_published: Some(draft.is_published),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample_resume() -> Resume {
        let now = Utc::now();
        Resume {
            id: 1,
            user_id: "user-1".to_string(),
            title: "Backend".to_string(),
            personal_info: PersonalInfo::default(),
            experience: vec![],
            education: vec![],
            skills: vec!["a".to_string(), "b".to_string()],
            is_published: false,
            created_at: now,
            updated_at: now,
        }
    }

    #[test]
    fn test_patch_replaces_skills_and_keeps_title() {
        let mut resume = sample_resume();
        let patch = ResumePatch {
            skills: Some(vec!["c".to_string()]),
            ..ResumePatch::default()
        };
        patch.apply_to(&mut resume);
        assert_eq!(resume.skills, vec!["c".to_string()]);
        assert_eq!(resume.title, "Backend");
    }

    #[test]
    fn test_empty_patch_is_empty() {
        assert!(ResumePatch::default().is_empty());
        assert!(!ResumePatch::from(NewResume::default()).is_empty());
    }

    #[test]
    fn test_resume_serializes_camel_case() {
        let json = serde_json::to_value(sample_resume()).unwrap();
        assert!(json.get("userId").is_some());
        assert!(json.get("personalInfo").unwrap().get("fullName").is_some());
        assert_eq!(json["isPublished"], false);
    }

    #[test]
    fn test_draft_decodes_leniently_from_drifted_resume() {
        let raw = serde_json::json!({
            "id": 3,
            "userId": "user-1",
            "title": "Legacy",
            "skills": ["Go"],
            "isPublished": null,
            "createdAt": null
        });
        assert!(serde_json::from_value::<Resume>(raw.clone()).is_err());

        let draft: NewResume = serde_json::from_value(raw).unwrap();
        assert_eq!(draft.title, "Legacy");
        assert_eq!(draft.skills, vec!["Go".to_string()]);
        assert!(!draft.is_published);
        assert!(draft.experience.is_empty());
        assert_eq!(draft.personal_info, PersonalInfo::default());
    }

    #[test]
    fn test_draft_keeps_wrongly_typed_fields_as_errors() {
        let raw = serde_json::json!({ "title": 42 });
        assert!(serde_json::from_value::<NewResume>(raw).is_err());
    }

    #[test]
    fn test_patch_skips_absent_fields_when_serialized() {
        let patch = ResumePatch {
            title: Some("New".to_string()),
            ..ResumePatch::default()
        };
        let json = serde_json::to_value(patch).unwrap();
        assert_eq!(json, serde_json::json!({ "title": "New" }));
    }
}
