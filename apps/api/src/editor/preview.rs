//! Read-only rendering of a resume draft.
//!
//! The preview holds no state: it is recomputed from the draft every time.

use chrono::NaiveDate;

use crate::models::resume::NewResume;

const RULE: &str = "────────────────────────────────────────";

/// Formats `YYYY-MM-DD` or `YYYY-MM` as `Mon YYYY`; anything else is shown as typed.
pub fn format_date(raw: &str) -> String {
    let raw = raw.trim();
    if raw.is_empty() {
        return String::new();
    }
    NaiveDate::parse_from_str(raw, "%Y-%m-%d")
        .or_else(|_| NaiveDate::parse_from_str(&format!("{raw}-01"), "%Y-%m-%d"))
        .map(|d| d.format("%b %Y").to_string())
        .unwrap_or_else(|_| raw.to_string())
}

fn date_range(start: &str, end: &str) -> String {
    let end = if end.trim().is_empty() {
        "Present".to_string()
    } else {
        format_date(end)
    };
    format!("{} – {}", format_date(start), end)
}

fn or_placeholder<'a>(value: &'a str, placeholder: &'a str) -> &'a str {
    if value.trim().is_empty() {
        placeholder
    } else {
        value
    }
}

fn section_heading(out: &mut String, title: &str) {
    out.push('\n');
    out.push_str(&title.to_uppercase());
    out.push('\n');
    out.push_str(RULE);
    out.push('\n');
}

/// Renders the draft as plain text in display order. Empty sections are omitted.
pub fn render_preview(draft: &NewResume) -> String {
    let info = &draft.personal_info;
    let mut out = String::new();

    out.push_str(&or_placeholder(&info.full_name, "Your Name").to_uppercase());
    out.push('\n');

    let contact: Vec<&str> = [&info.email, &info.phone, &info.location]
        .into_iter()
        .map(|s| s.trim())
        .filter(|s| !s.is_empty())
        .collect();
    if !contact.is_empty() {
        out.push_str(&contact.join(" • "));
        out.push('\n');
    }

    if !info.summary.trim().is_empty() {
        section_heading(&mut out, "Professional Summary");
        out.push_str(info.summary.trim());
        out.push('\n');
    }

    if !draft.experience.is_empty() {
        section_heading(&mut out, "Experience");
        for exp in &draft.experience {
            out.push_str(&format!(
                "{} | {}\n",
                or_placeholder(&exp.position, "Position"),
                date_range(&exp.start_date, &exp.end_date)
            ));
            out.push_str(or_placeholder(&exp.company, "Company Name"));
            out.push('\n');
            if !exp.description.trim().is_empty() {
                out.push_str(&exp.description);
                out.push('\n');
            }
            out.push('\n');
        }
    }

    if !draft.education.is_empty() {
        section_heading(&mut out, "Education");
        for edu in &draft.education {
            out.push_str(&format!(
                "{} | {}\n",
                or_placeholder(&edu.institution, "University"),
                date_range(&edu.start_date, &edu.end_date)
            ));
            if !edu.degree.trim().is_empty() {
                out.push_str(&edu.degree);
                out.push('\n');
            }
            if !edu.description.trim().is_empty() {
                out.push_str(&edu.description);
                out.push('\n');
            }
            out.push('\n');
        }
    }

    if !draft.skills.is_empty() {
        section_heading(&mut out, "Skills");
        out.push_str(&draft.skills.join(" · "));
        out.push('\n');
    }

    out
}
