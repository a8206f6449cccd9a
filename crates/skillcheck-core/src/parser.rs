//! Assessment loading and validation.
//!
//! Assessments come either as TOML files authored by hand or as JSON
//! snapshots from the assessment store. Validation here covers the
//! authoring-time invariants the scoring engine tolerates but should not
//! have to see.

use std::collections::HashSet;
use std::path::Path;

use anyhow::{Context, Result};
use serde::Deserialize;

use crate::model::{AnswerOption, Assessment, Question, QuestionType};

/// Intermediate TOML structure for parsing assessment files.
#[derive(Debug, Deserialize)]
struct TomlAssessmentFile {
    assessment: TomlAssessmentHeader,
    #[serde(default)]
    questions: Vec<TomlQuestion>,
}

#[derive(Debug, Deserialize)]
struct TomlAssessmentHeader {
    id: String,
    title: String,
    #[serde(default)]
    description: String,
    #[serde(default = "default_passing_score")]
    passing_score: f64,
    #[serde(default)]
    duration_minutes: Option<u32>,
}

fn default_passing_score() -> f64 {
    70.0
}

#[derive(Debug, Deserialize)]
struct TomlQuestion {
    id: String,
    question: String,
    #[serde(rename = "type")]
    question_type: String,
    #[serde(default = "default_points")]
    points: u32,
    #[serde(default)]
    explanation: Option<String>,
    #[serde(default)]
    options: Vec<TomlOption>,
}

fn default_points() -> u32 {
    1
}

#[derive(Debug, Deserialize)]
struct TomlOption {
    #[serde(default)]
    id: Option<String>,
    text: String,
    #[serde(default)]
    correct: bool,
}

/// Parse a single TOML file into an `Assessment`.
pub fn parse_assessment(path: &Path) -> Result<Assessment> {
    let content = std::fs::read_to_string(path)
        .with_context(|| format!("failed to read assessment file: {}", path.display()))?;

    parse_assessment_str(&content, path)
}

/// Parse a TOML string into an `Assessment` (useful for testing).
pub fn parse_assessment_str(content: &str, source_path: &Path) -> Result<Assessment> {
    let parsed: TomlAssessmentFile = toml::from_str(content)
        .with_context(|| format!("failed to parse TOML: {}", source_path.display()))?;

    let questions = parsed
        .questions
        .into_iter()
        .enumerate()
        .map(|(q_idx, q)| {
            let options = q
                .options
                .into_iter()
                .enumerate()
                .map(|(o_idx, o)| AnswerOption {
                    id: o.id.unwrap_or_else(|| format!("{}-{}", q.id, o_idx + 1)),
                    text: o.text,
                    is_correct: o.correct,
                    order: o_idx as u32,
                })
                .collect();

            Question {
                id: q.id,
                question: q.question,
                question_type: QuestionType::from(q.question_type),
                points: q.points,
                options,
                explanation: q.explanation,
                order: q_idx as u32,
            }
        })
        .collect();

    Ok(Assessment {
        id: parsed.assessment.id,
        title: parsed.assessment.title,
        description: parsed.assessment.description,
        passing_score: parsed.assessment.passing_score,
        duration_minutes: parsed.assessment.duration_minutes,
        questions,
    })
}

/// Parse a JSON snapshot from the assessment store.
///
/// A snapshot without a `questions` collection is an integration error and
/// is rejected here rather than scored as an empty test.
pub fn assessment_from_json(content: &str) -> Result<Assessment> {
    let value: serde_json::Value =
        serde_json::from_str(content).context("failed to parse assessment JSON")?;
    anyhow::ensure!(
        value.get("questions").is_some_and(|q| q.is_array()),
        "assessment snapshot has no questions collection"
    );
    serde_json::from_value(value).context("malformed assessment snapshot")
}

/// Load an assessment from a `.toml` or `.json` file, picked by extension.
pub fn load_assessment(path: &Path) -> Result<Assessment> {
    if path.extension().is_some_and(|ext| ext == "json") {
        let content = std::fs::read_to_string(path)
            .with_context(|| format!("failed to read assessment file: {}", path.display()))?;
        assessment_from_json(&content)
            .with_context(|| format!("invalid assessment: {}", path.display()))
    } else {
        parse_assessment(path)
    }
}

/// Recursively load all `.toml` and `.json` assessment files from a directory.
pub fn load_assessment_directory(dir: &Path) -> Result<Vec<Assessment>> {
    let mut assessments = Vec::new();

    if !dir.is_dir() {
        anyhow::bail!("not a directory: {}", dir.display());
    }

    for entry in std::fs::read_dir(dir)
        .with_context(|| format!("failed to read directory: {}", dir.display()))?
    {
        let entry = entry?;
        let path = entry.path();

        if path.is_dir() {
            assessments.extend(load_assessment_directory(&path)?);
        } else if path
            .extension()
            .is_some_and(|ext| ext == "toml" || ext == "json")
        {
            match load_assessment(&path) {
                Ok(assessment) => assessments.push(assessment),
                Err(e) => {
                    tracing::warn!("skipping {}: {:#}", path.display(), e);
                }
            }
        }
    }

    Ok(assessments)
}

/// A warning from assessment validation.
#[derive(Debug, Clone)]
pub struct ValidationWarning {
    /// The question ID (if applicable).
    pub question_id: Option<String>,
    /// Warning message.
    pub message: String,
}

impl ValidationWarning {
    fn assessment(message: impl Into<String>) -> Self {
        Self {
            question_id: None,
            message: message.into(),
        }
    }

    fn question(question: &Question, message: impl Into<String>) -> Self {
        Self {
            question_id: Some(question.id.clone()),
            message: message.into(),
        }
    }
}

/// Validate an assessment for authoring mistakes.
pub fn validate_assessment(assessment: &Assessment) -> Vec<ValidationWarning> {
    let mut warnings = Vec::new();

    if assessment.questions.is_empty() {
        warnings.push(ValidationWarning::assessment("assessment has no questions"));
    } else if assessment.total_points() == 0 {
        warnings.push(ValidationWarning::assessment(
            "total points is zero; every submission will score 0",
        ));
    }

    if !(0.0..=100.0).contains(&assessment.passing_score) {
        warnings.push(ValidationWarning::assessment(format!(
            "passing score {} is outside 0-100",
            assessment.passing_score
        )));
    }

    let mut seen_ids = HashSet::new();
    for q in &assessment.questions {
        if !seen_ids.insert(&q.id) {
            warnings.push(ValidationWarning::question(
                q,
                format!("duplicate question ID: {}", q.id),
            ));
        }

        if q.question.trim().is_empty() {
            warnings.push(ValidationWarning::question(q, "prompt is empty"));
        }

        if q.points == 0 {
            warnings.push(ValidationWarning::question(q, "question is worth 0 points"));
        }

        if !q.question_type.is_recognized() {
            warnings.push(ValidationWarning::question(
                q,
                format!(
                    "unrecognized question type '{}' will never be scored correct",
                    q.question_type
                ),
            ));
        }

        let correct = q.options.iter().filter(|o| o.is_correct).count();
        match correct {
            0 => warnings.push(ValidationWarning::question(q, "no option is marked correct")),
            1 => {}
            n => warnings.push(ValidationWarning::question(
                q,
                format!("{n} options are marked correct; only the first counts"),
            )),
        }

        if q.question_type == QuestionType::TrueFalse && q.options.len() != 2 {
            warnings.push(ValidationWarning::question(
                q,
                format!(
                    "true/false question has {} options, expected 2",
                    q.options.len()
                ),
            ));
        }

        let mut option_ids = HashSet::new();
        for opt in &q.options {
            if !option_ids.insert(&opt.id) {
                warnings.push(ValidationWarning::question(
                    q,
                    format!("duplicate option ID: {}", opt.id),
                ));
            }
        }
    }

    warnings
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::path::PathBuf;

    const VALID_TOML: &str = r#"
[assessment]
id = "rust-basics"
title = "Rust Basics"
description = "Ownership and borrowing"
passing_score = 60
duration_minutes = 20

[[questions]]
id = "ownership"
question = "Which keyword transfers ownership into a closure?"
type = "multiple_choice"
points = 5

[[questions.options]]
id = "move"
text = "move"
correct = true

[[questions.options]]
id = "ref"
text = "ref"

[[questions]]
id = "borrow"
question = "A value can have many shared borrows at once."
type = "true_false"
points = 2

[[questions.options]]
text = "True"
correct = true

[[questions.options]]
text = "False"
"#;

    #[test]
    fn parse_valid_toml() {
        let a = parse_assessment_str(VALID_TOML, &PathBuf::from("test.toml")).unwrap();
        assert_eq!(a.id, "rust-basics");
        assert_eq!(a.passing_score, 60.0);
        assert_eq!(a.duration_minutes, Some(20));
        assert_eq!(a.questions.len(), 2);
        assert_eq!(a.questions[0].question_type, QuestionType::MultipleChoice);
        assert_eq!(a.questions[0].options[0].id, "move");
        assert!(a.questions[0].options[0].is_correct);
        assert_eq!(a.questions[1].options[0].id, "borrow-1");
        assert_eq!(a.questions[1].options[1].order, 1);
        assert_eq!(a.questions[1].order, 1);
        assert!(validate_assessment(&a).is_empty());
    }

    #[test]
    fn parse_missing_optional_fields() {
        let toml = r#"
[assessment]
id = "minimal"
title = "Minimal"

[[questions]]
id = "q1"
question = "Anything?"
type = "true_false"
"#;
        let a = parse_assessment_str(toml, &PathBuf::from("test.toml")).unwrap();
        assert_eq!(a.passing_score, 70.0);
        assert_eq!(a.questions[0].points, 1);
        assert!(a.questions[0].options.is_empty());
    }

    #[test]
    fn parse_malformed_toml() {
        let bad = "this is not [valid toml }{";
        assert!(parse_assessment_str(bad, &PathBuf::from("bad.toml")).is_err());
    }

    #[test]
    fn json_snapshot() {
        let json = r#"{
            "id": "a1",
            "passingScore": 80,
            "questions": [
                {"id": "q1", "type": "multiple_choice", "points": 3,
                 "options": [{"id": "o1", "text": "A", "isCorrect": true}]}
            ]
        }"#;
        let a = assessment_from_json(json).unwrap();
        assert_eq!(a.passing_score, 80.0);
        assert!(a.questions[0].options[0].is_correct);
    }

    #[test]
    fn json_snapshot_without_questions_is_rejected() {
        let err = assessment_from_json(r#"{"id": "a1", "passingScore": 70}"#).unwrap_err();
        assert!(err.to_string().contains("no questions collection"));
        assert!(assessment_from_json(r#"{"id": "a1", "questions": null}"#).is_err());
    }

    #[test]
    fn validate_flags_authoring_problems() {
        let toml = r#"
[assessment]
id = "broken"
title = "Broken"
passing_score = 120

[[questions]]
id = "same"
question = ""
type = "essay"
points = 0

[[questions]]
id = "same"
question = "Pick"
type = "multiple_choice"

[[questions.options]]
id = "x"
text = "X"
correct = true

[[questions.options]]
id = "x"
text = "Y"
correct = true

[[questions]]
id = "tf"
question = "Only one option"
type = "true_false"

[[questions.options]]
text = "True"
correct = true
"#;
        let a = parse_assessment_str(toml, &PathBuf::from("test.toml")).unwrap();
        let warnings = validate_assessment(&a);
        let has = |needle: &str| warnings.iter().any(|w| w.message.contains(needle));
        assert!(has("outside 0-100"));
        assert!(has("duplicate question ID"));
        assert!(has("prompt is empty"));
        assert!(has("worth 0 points"));
        assert!(has("unrecognized question type 'essay'"));
        assert!(has("no option is marked correct"));
        assert!(has("2 options are marked correct"));
        assert!(has("duplicate option ID: x"));
        assert!(has("true/false question has 1 options"));
    }

    #[test]
    fn validate_empty_and_zero_point_banks() {
        let toml = r#"
[assessment]
id = "empty"
title = "Empty"
"#;
        let a = parse_assessment_str(toml, &PathBuf::from("test.toml")).unwrap();
        assert!(validate_assessment(&a)
            .iter()
            .any(|w| w.message.contains("no questions")));
    }

    #[test]
    fn load_directory() {
        let dir = tempfile::tempdir().unwrap();
        std::fs::write(dir.path().join("basics.toml"), VALID_TOML).unwrap();
        std::fs::create_dir(dir.path().join("nested")).unwrap();
        std::fs::write(dir.path().join("nested").join("bad.toml"), "nope = [").unwrap();
        std::fs::write(
            dir.path().join("nested").join("snapshot.json"),
            r#"{"id": "from-store", "questions": []}"#,
        )
        .unwrap();
        std::fs::write(
            dir.path().join("nested").join("no-questions.json"),
            r#"{"id": "broken"}"#,
        )
        .unwrap();

        let mut ids: Vec<String> = load_assessment_directory(dir.path())
            .unwrap()
            .into_iter()
            .map(|a| a.id)
            .collect();
        ids.sort();
        assert_eq!(ids, ["from-store", "rust-basics"]);
    }

    #[test]
    fn load_by_extension() {
        let dir = tempfile::tempdir().unwrap();
        let toml_path = dir.path().join("a.toml");
        std::fs::write(&toml_path, VALID_TOML).unwrap();
        let json_path = dir.path().join("a.json");
        std::fs::write(
            &json_path,
            r#"{"id": "j", "questions": [{"id": "q", "type": "true_false"}]}"#,
        )
        .unwrap();

        assert_eq!(load_assessment(&toml_path).unwrap().id, "rust-basics");
        assert_eq!(load_assessment(&json_path).unwrap().id, "j");
    }
}
