//! Input validation for resume payloads.
//!
//! Both validators walk the raw JSON body so that the first failing field can
//! be reported by its dotted path (`experience.1.id`, `personalInfo.email`).
//! A payload either converts completely into a typed value or is rejected.

use std::collections::HashSet;

use serde::Serialize;
use serde_json::{Map, Value};
use thiserror::Error;

use crate::models::resume::{
    EducationEntry, ExperienceEntry, NewResume, PersonalInfo, ResumePatch, SectionEntry,
};

const RESUME_FIELDS: &[&str] = &[
    "title",
    "personalInfo",
    "experience",
    "education",
    "skills",
    "isPublished",
];

const PERSONAL_INFO_FIELDS: &[&str] = &["fullName", "email", "phone", "location", "summary"];

const EXPERIENCE_FIELDS: &[&str] = &[
    "id",
    "company",
    "position",
    "startDate",
    "endDate",
    "description",
];

const EDUCATION_FIELDS: &[&str] = &[
    "id",
    "institution",
    "degree",
    "startDate",
    "endDate",
    "description",
];

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Error)]
#[error("{field}: {message}")]
pub struct ValidationError {
    pub field: String,
    pub message: String,
}

impl ValidationError {
    fn new(field: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            field: field.into(),
            message: message.into(),
        }
    }
}

type Validated<T> = Result<T, ValidationError>;

/// Validates a create payload. Every field except `isPublished` is required.
pub fn validate_new_resume(body: &Value) -> Validated<NewResume> {
    let obj = expect_object(body, "")?;

    let title = parse_title(required(obj, "title")?)?;
    let personal_info = parse_personal_info(required(obj, "personalInfo")?)?;
    let experience = parse_entries(
        required(obj, "experience")?,
        "experience",
        EXPERIENCE_FIELDS,
        parse_experience_entry,
    )?;
    let education = parse_entries(
        required(obj, "education")?,
        "education",
        EDUCATION_FIELDS,
        parse_education_entry,
    )?;
    let skills = parse_skills(required(obj, "skills")?)?;
    let is_published = optional(obj, "isPublished")
        .map(|v| parse_bool(v, "isPublished"))
        .transpose()?
        .unwrap_or(false);

    reject_unknown_keys(obj, RESUME_FIELDS, "")?;

    Ok(NewResume {
        title,
        personal_info,
        experience,
        education,
        skills,
        is_published,
    })
}

/// Validates an update payload. Every field is optional; present fields obey
/// the same rules as on create.
pub fn validate_resume_patch(body: &Value) -> Validated<ResumePatch> {
    let obj = expect_object(body, "")?;

    let patch = ResumePatch {
        title: present(obj, "title").map(parse_title).transpose()?,
        personal_info: present(obj, "personalInfo")
            .map(parse_personal_info)
            .transpose()?,
        experience: present(obj, "experience")
            .map(|v| parse_entries(v, "experience", EXPERIENCE_FIELDS, parse_experience_entry))
            .transpose()?,
        education: present(obj, "education")
            .map(|v| parse_entries(v, "education", EDUCATION_FIELDS, parse_education_entry))
            .transpose()?,
        skills: present(obj, "skills").map(parse_skills).transpose()?,
        is_published: optional(obj, "isPublished")
            .map(|v| parse_bool(v, "isPublished"))
            .transpose()?,
    };

    reject_unknown_keys(obj, RESUME_FIELDS, "")?;

    Ok(patch)
}

fn required<'a>(obj: &'a Map<String, Value>, key: &str) -> Validated<&'a Value> {
    obj.get(key)
        .ok_or_else(|| ValidationError::new(key, "Required"))
}

fn present<'a>(obj: &'a Map<String, Value>, key: &str) -> Option<&'a Value> {
    obj.get(key)
}

/// Like `present`, but a JSON null counts as absent.
fn optional<'a>(obj: &'a Map<String, Value>, key: &str) -> Option<&'a Value> {
    obj.get(key).filter(|v| !v.is_null())
}

fn reject_unknown_keys(obj: &Map<String, Value>, allowed: &[&str], prefix: &str) -> Validated<()> {
    match obj.keys().find(|k| !allowed.contains(&k.as_str())) {
        Some(key) => Err(ValidationError::new(
            join_path(prefix, key),
            format!("Unrecognized key '{key}'"),
        )),
        None => Ok(()),
    }
}

fn parse_title(value: &Value) -> Validated<String> {
    let title = expect_str(value, "title")?;
    if title.trim().is_empty() {
        return Err(ValidationError::new("title", "Title is required"));
    }
    Ok(title.to_string())
}

fn parse_personal_info(value: &Value) -> Validated<PersonalInfo> {
    let obj = expect_object(value, "personalInfo")?;
    let field = |key: &str| string_field(obj, "personalInfo", key);

    let info = PersonalInfo {
        full_name: field("fullName")?,
        email: field("email")?,
        phone: field("phone")?,
        location: field("location")?,
        summary: field("summary")?,
    };
    reject_unknown_keys(obj, PERSONAL_INFO_FIELDS, "personalInfo")?;
    Ok(info)
}

fn parse_entries<T, F>(value: &Value, section: &str, allowed: &[&str], parse: F) -> Validated<Vec<T>>
where
    T: SectionEntry,
    F: Fn(&Map<String, Value>, &str) -> Validated<T>,
{
    let items = expect_array(value, section)?;
    let mut seen = HashSet::new();
    let mut entries = Vec::with_capacity(items.len());

    for (index, item) in items.iter().enumerate() {
        let path = format!("{section}.{index}");
        let obj = expect_object(item, &path)?;
        let entry = parse(obj, &path)?;
        reject_unknown_keys(obj, allowed, &path)?;

        if !seen.insert(entry.entry_id().to_string()) {
            return Err(ValidationError::new(
                format!("{path}.id"),
                format!("Duplicate entry id '{}'", entry.entry_id()),
            ));
        }
        entries.push(entry);
    }

    Ok(entries)
}

fn parse_experience_entry(obj: &Map<String, Value>, path: &str) -> Validated<ExperienceEntry> {
    Ok(ExperienceEntry {
        id: entry_id(obj, path)?,
        company: string_field(obj, path, "company")?,
        position: string_field(obj, path, "position")?,
        start_date: string_field(obj, path, "startDate")?,
        end_date: string_field(obj, path, "endDate")?,
        description: string_field(obj, path, "description")?,
    })
}

fn parse_education_entry(obj: &Map<String, Value>, path: &str) -> Validated<EducationEntry> {
    Ok(EducationEntry {
        id: entry_id(obj, path)?,
        institution: string_field(obj, path, "institution")?,
        degree: string_field(obj, path, "degree")?,
        start_date: string_field(obj, path, "startDate")?,
        end_date: string_field(obj, path, "endDate")?,
        description: string_field(obj, path, "description")?,
    })
}

fn entry_id(obj: &Map<String, Value>, path: &str) -> Validated<String> {
    let field = join_path(path, "id");
    let value = obj
        .get("id")
        .ok_or_else(|| ValidationError::new(&field, "Required"))?;
    let id = expect_str(value, &field)?;
    if id.trim().is_empty() {
        return Err(ValidationError::new(field, "Entry id cannot be empty"));
    }
    Ok(id.to_string())
}

fn parse_skills(value: &Value) -> Validated<Vec<String>> {
    expect_array(value, "skills")?
        .iter()
        .enumerate()
        .map(|(index, item)| expect_str(item, &format!("skills.{index}")).map(str::to_string))
        .collect()
}

fn parse_bool(value: &Value, path: &str) -> Validated<bool> {
    value
        .as_bool()
        .ok_or_else(|| type_mismatch(path, "boolean", value))
}

/// Optional string member; absent means empty.
fn string_field(obj: &Map<String, Value>, prefix: &str, key: &str) -> Validated<String> {
    match obj.get(key) {
        None => Ok(String::new()),
        Some(value) => expect_str(value, &join_path(prefix, key)).map(str::to_string),
    }
}

fn expect_object<'a>(value: &'a Value, path: &str) -> Validated<&'a Map<String, Value>> {
    value
        .as_object()
        .ok_or_else(|| type_mismatch(path, "object", value))
}

fn expect_array<'a>(value: &'a Value, path: &str) -> Validated<&'a Vec<Value>> {
    value
        .as_array()
        .ok_or_else(|| type_mismatch(path, "array", value))
}

fn expect_str<'a>(value: &'a Value, path: &str) -> Validated<&'a str> {
    value
        .as_str()
        .ok_or_else(|| type_mismatch(path, "string", value))
}

fn type_mismatch(path: &str, expected: &str, actual: &Value) -> ValidationError {
    ValidationError::new(
        path,
        format!("Expected {expected}, received {}", json_type_name(actual)),
    )
}

fn json_type_name(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "boolean",
        Value::Number(_) => "number",
        Value::String(_) => "string",
        Value::Array(_) => "array",
        Value::Object(_) => "object",
    }
}

fn join_path(prefix: &str, key: &str) -> String {
    if prefix.is_empty() {
        key.to_string()
    } else {
        format!("{prefix}.{key}")
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn valid_body() -> Value {
        json!({
            "title": "Platform Engineer",
            "personalInfo": {
                "fullName": "Jane Doe",
                "email": "jane@example.com",
                "phone": "",
                "location": "Berlin",
                "summary": ""
            },
            "experience": [{
                "id": "x1",
                "company": "Acme",
                "position": "Eng",
                "startDate": "2020-01",
                "endDate": "2021-01",
                "description": "did things"
            }],
            "education": [],
            "skills": ["Rust", "SQL"]
        })
    }

    #[test]
    fn test_valid_create_payload() {
        let resume = validate_new_resume(&valid_body()).unwrap();
        assert_eq!(resume.title, "Platform Engineer");
        assert_eq!(resume.experience[0].id, "x1");
        assert_eq!(resume.skills, vec!["Rust", "SQL"]);
        assert!(!resume.is_published);
    }

    #[test]
    fn test_empty_title_reports_title_field() {
        let mut body = valid_body();
        body["title"] = json!("");
        let err = validate_new_resume(&body).unwrap_err();
        assert_eq!(err.field, "title");
    }

    #[test]
    fn test_whitespace_title_rejected() {
        let mut body = valid_body();
        body["title"] = json!("   ");
        assert_eq!(validate_new_resume(&body).unwrap_err().field, "title");
    }

    #[test]
    fn test_missing_required_field() {
        let mut body = valid_body();
        body.as_object_mut().unwrap().remove("skills");
        let err = validate_new_resume(&body).unwrap_err();
        assert_eq!(err.field, "skills");
        assert_eq!(err.message, "Required");
    }

    #[test]
    fn test_first_failing_field_wins() {
        let mut body = valid_body();
        body["title"] = json!(42);
        body["skills"] = json!("not a list");
        let err = validate_new_resume(&body).unwrap_err();
        assert_eq!(err.field, "title");
        assert_eq!(err.message, "Expected string, received number");
    }

    #[test]
    fn test_personal_info_fields_default_to_empty() {
        let mut body = valid_body();
        body["personalInfo"] = json!({ "fullName": "Jane" });
        let resume = validate_new_resume(&body).unwrap();
        assert_eq!(resume.personal_info.full_name, "Jane");
        assert_eq!(resume.personal_info.email, "");
    }

    #[test]
    fn test_nested_type_error_path() {
        let mut body = valid_body();
        body["personalInfo"]["email"] = json!(false);
        let err = validate_new_resume(&body).unwrap_err();
        assert_eq!(err.field, "personalInfo.email");
    }

    #[test]
    fn test_entry_missing_id() {
        let mut body = valid_body();
        body["education"] = json!([{ "institution": "MIT" }]);
        let err = validate_new_resume(&body).unwrap_err();
        assert_eq!(err.field, "education.0.id");
    }

    #[test]
    fn test_duplicate_entry_ids_rejected() {
        let mut body = valid_body();
        body["experience"] = json!([{ "id": "a" }, { "id": "b" }, { "id": "a" }]);
        let err = validate_new_resume(&body).unwrap_err();
        assert_eq!(err.field, "experience.2.id");
        assert!(err.message.contains("Duplicate"));
    }

    #[test]
    fn test_same_id_allowed_across_sections() {
        let mut body = valid_body();
        body["experience"] = json!([{ "id": "shared" }]);
        body["education"] = json!([{ "id": "shared" }]);
        assert!(validate_new_resume(&body).is_ok());
    }

    #[test]
    fn test_non_string_skill() {
        let mut body = valid_body();
        body["skills"] = json!(["Rust", 7]);
        assert_eq!(validate_new_resume(&body).unwrap_err().field, "skills.1");
    }

    #[test]
    fn test_duplicate_skills_allowed() {
        let mut body = valid_body();
        body["skills"] = json!(["Rust", "Rust"]);
        assert_eq!(validate_new_resume(&body).unwrap().skills.len(), 2);
    }

    #[test]
    fn test_unknown_top_level_key_rejected() {
        let mut body = valid_body();
        body["userId"] = json!("someone-else");
        let err = validate_new_resume(&body).unwrap_err();
        assert_eq!(err.field, "userId");
        assert_eq!(err.message, "Unrecognized key 'userId'");
    }

    #[test]
    fn test_unknown_nested_key_rejected() {
        let mut body = valid_body();
        body["experience"][0]["salary"] = json!("lots");
        assert_eq!(
            validate_new_resume(&body).unwrap_err().field,
            "experience.0.salary"
        );
    }

    #[test]
    fn test_non_object_body() {
        let err = validate_new_resume(&json!([])).unwrap_err();
        assert_eq!(err.field, "");
        assert_eq!(err.message, "Expected object, received array");
    }

    #[test]
    fn test_null_is_published_defaults_false() {
        let mut body = valid_body();
        body["isPublished"] = Value::Null;
        assert!(!validate_new_resume(&body).unwrap().is_published);
    }

    #[test]
    fn test_patch_empty_object_is_valid() {
        assert!(validate_resume_patch(&json!({})).unwrap().is_empty());
    }

    #[test]
    fn test_patch_only_present_fields() {
        let patch = validate_resume_patch(&json!({ "skills": ["c"] })).unwrap();
        assert_eq!(patch.skills, Some(vec!["c".to_string()]));
        assert!(patch.title.is_none());
        assert!(patch.experience.is_none());
    }

    #[test]
    fn test_patch_validates_present_title() {
        let err = validate_resume_patch(&json!({ "title": "" })).unwrap_err();
        assert_eq!(err.field, "title");
    }

    #[test]
    fn test_patch_null_title_rejected() {
        let err = validate_resume_patch(&json!({ "title": null })).unwrap_err();
        assert_eq!(err.message, "Expected string, received null");
    }

    #[test]
    fn test_patch_rejects_unknown_key() {
        let err = validate_resume_patch(&json!({ "createdAt": "2020-01-01" })).unwrap_err();
        assert_eq!(err.field, "createdAt");
    }
}
