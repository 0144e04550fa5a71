//! Generic credential schema engine
//!
//! A declarative question list drives a typed interactive flow: each
//! question kind owns its prompt shape, validation, and post-processing,
//! and the collected answers build a strongly-typed credential bundle.
//!
//! Declining the opt-in question is a legitimate outcome, not an error:
//! the caller is expected to fall back to an automated provisioning
//! path when `ask_for_user_provided` returns `None`.

use std::collections::BTreeMap;
use std::marker::PhantomData;
use std::path::{Path, PathBuf};
use std::sync::Once;

use base64::engine::general_purpose::STANDARD;
use base64::Engine as _;

use crate::error::AirliftResult;
use crate::prompt::Prompter;

/// Raw answer bag: field name to resolved value, filled in schema order.
pub type Answers = BTreeMap<String, String>;

/// Builds a credential bundle from a completed answer bag.
///
/// Schemas that want the raw mapping use the identity impl on
/// [`Answers`] itself.
pub trait FromAnswers: Sized {
    fn from_answers(answers: Answers) -> AirliftResult<Self>;
}

impl FromAnswers for Answers {
    fn from_answers(answers: Answers) -> AirliftResult<Self> {
        Ok(answers)
    }
}

/// Remove one answer by field name.
///
/// A missing field means the engine and a schema's bundle constructor
/// disagree about the question list, which is a programming error.
pub fn take_answer(answers: &mut Answers, field: &str) -> AirliftResult<String> {
    answers.remove(field).ok_or_else(|| {
        crate::error::AirliftError::Internal(format!("credential answer '{field}' missing"))
    })
}

/// How one question is asked and post-processed.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum QuestionKind {
    /// Free text; may be pre-filled from initial values.
    Text,
    /// Masked input, never pre-filled.
    Password,
    /// Path to an existing regular file. The stored answer is the file
    /// contents (base64-encoded when `base64` is set), not the path.
    File { base64: bool },
}

/// One scalar input slot in a credential bundle.
#[derive(Debug, Clone)]
pub struct Question {
    /// Unique field name within the schema.
    pub field: &'static str,
    /// Prompt text shown to the user.
    pub prompt: String,
    pub kind: QuestionKind,
}

impl Question {
    pub fn text(field: &'static str, prompt: impl Into<String>) -> Self {
        Self {
            field,
            prompt: prompt.into(),
            kind: QuestionKind::Text,
        }
    }

    pub fn password(field: &'static str, prompt: impl Into<String>) -> Self {
        Self {
            field,
            prompt: prompt.into(),
            kind: QuestionKind::Password,
        }
    }

    pub fn file(field: &'static str, prompt: impl Into<String>, base64: bool) -> Self {
        Self {
            field,
            prompt: prompt.into(),
            kind: QuestionKind::File { base64 },
        }
    }
}

/// Declarative description of one credential bundle.
///
/// Stateless and reusable across invocations; question order is the
/// order the user is asked in.
pub struct CredentialSchema<T> {
    pub name: &'static str,
    /// Override wording for the opt-in question.
    pub provide_method_prompt: Option<String>,
    pub questions: Vec<Question>,
    marker: PhantomData<fn() -> T>,
}

impl<T: FromAnswers> CredentialSchema<T> {
    pub fn new(name: &'static str, questions: Vec<Question>) -> Self {
        Self {
            name,
            provide_method_prompt: None,
            questions,
            marker: PhantomData,
        }
    }

    pub fn with_provide_method_prompt(mut self, prompt: impl Into<String>) -> Self {
        self.provide_method_prompt = Some(prompt.into());
        self
    }
}

static MANUAL_CREDENTIALS_WARNING: Once = Once::new();

const MANUAL_CREDENTIALS_WARNING_TEXT: &str = "Airlift does not validate manually provided credentials. \
For iOS, make sure the Team ID and App ID match your app and that the provisioning profile is the right one; \
mismatches only surface once the build runs.";

/// Ask whether the user supplies this credential themselves, then drive
/// the schema's question sequence.
///
/// Returns `Ok(None)` when the user declines. The not-validated warning
/// is emitted at most once per process, no matter how often this path
/// runs.
pub fn ask_for_user_provided<T: FromAnswers>(
    prompter: &mut dyn Prompter,
    schema: &CredentialSchema<T>,
    initial: &Answers,
) -> AirliftResult<Option<T>> {
    let question = schema
        .provide_method_prompt
        .clone()
        .unwrap_or_else(|| format!("Will you provide your own {}?", schema.name));

    if !prompter.confirm(&question, true)? {
        return Ok(None);
    }

    MANUAL_CREDENTIALS_WARNING.call_once(|| {
        prompter.warn(MANUAL_CREDENTIALS_WARNING_TEXT);
    });

    collect_from_user(prompter, schema, initial).map(Some)
}

/// Drive the full question sequence and build the bundle.
///
/// `initial[field]` seeds the shown default, which only applies to
/// [`QuestionKind::Text`] questions: passwords are never echoed and
/// file questions store contents rather than paths.
pub fn collect_from_user<T: FromAnswers>(
    prompter: &mut dyn Prompter,
    schema: &CredentialSchema<T>,
    initial: &Answers,
) -> AirliftResult<T> {
    let mut answers = Answers::new();
    for question in &schema.questions {
        let seed = initial.get(question.field).map(String::as_str);
        let value = resolve_answer(prompter, question, seed)?;
        answers.insert(question.field.to_string(), value);
    }
    T::from_answers(answers)
}

/// Resolve one answer, re-prompting until the input validates.
fn resolve_answer(
    prompter: &mut dyn Prompter,
    question: &Question,
    initial: Option<&str>,
) -> AirliftResult<String> {
    match question.kind {
        QuestionKind::Text => loop {
            let raw = prompter.text(&question.prompt, initial)?;
            if raw.is_empty() {
                prompter.report_invalid("This field can't be empty.");
                continue;
            }
            return Ok(raw);
        },
        QuestionKind::Password => loop {
            let raw = prompter.password(&question.prompt)?;
            if raw.is_empty() {
                prompter.report_invalid("This field can't be empty.");
                continue;
            }
            return Ok(raw);
        },
        QuestionKind::File { base64 } => loop {
            let raw = prompter.text(&question.prompt, None)?;
            let path = resolve_path(raw.trim());
            match validate_file(&path) {
                // Read failures after a successful existence check are
                // fatal, not re-prompted.
                Ok(()) => return read_file_answer(&path, base64),
                Err(message) => {
                    prompter.report_invalid(&message);
                    continue;
                }
            }
        },
    }
}

/// Expand a leading `~` and absolutize relative to the current working
/// directory. Already-absolute paths are returned unchanged.
pub fn resolve_path(input: &str) -> PathBuf {
    let expanded = expand_home(input);
    if expanded.is_absolute() {
        return expanded;
    }
    match std::env::current_dir() {
        Ok(cwd) => cwd.join(expanded),
        Err(_) => expanded,
    }
}

fn expand_home(input: &str) -> PathBuf {
    if input == "~" {
        if let Some(home) = dirs::home_dir() {
            return home;
        }
    }
    if let Some(rest) = input.strip_prefix("~/") {
        if let Some(home) = dirs::home_dir() {
            return home.join(rest);
        }
    }
    PathBuf::from(input)
}

fn validate_file(path: &Path) -> Result<(), String> {
    match std::fs::metadata(path) {
        Ok(meta) if meta.is_file() => Ok(()),
        Ok(_) => Err(format!("{} is not a file", path.display())),
        Err(err) if err.kind() == std::io::ErrorKind::NotFound => {
            Err(format!("{} does not exist", path.display()))
        }
        Err(err) => Err(format!("{}: {err}", path.display())),
    }
}

fn read_file_answer(path: &Path, as_base64: bool) -> AirliftResult<String> {
    if as_base64 {
        let bytes = std::fs::read(path)?;
        Ok(STANDARD.encode(bytes))
    } else {
        Ok(std::fs::read_to_string(path)?)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::prompt::{Answer, ScriptedPrompter};
    use std::io::Write;

    fn sample_schema() -> CredentialSchema<Answers> {
        CredentialSchema::new(
            "token",
            vec![
                Question::text("account", "Account name"),
                Question::password("secret", "Account secret"),
            ],
        )
    }

    #[test]
    fn decline_returns_none_without_further_questions() {
        let mut prompter = ScriptedPrompter::new(vec![Answer::Confirm(false)]);
        let result =
            ask_for_user_provided(&mut prompter, &sample_schema(), &Answers::new()).unwrap();
        assert!(result.is_none());
        // Only the opt-in question was asked.
        assert_eq!(prompter.prompts, vec!["Will you provide your own token?"]);
        assert!(prompter.warnings.is_empty());
    }

    #[test]
    fn provide_method_prompt_overrides_wording() {
        let schema = sample_schema().with_provide_method_prompt("Bring your own token?");
        let mut prompter = ScriptedPrompter::new(vec![Answer::Confirm(false)]);
        ask_for_user_provided(&mut prompter, &schema, &Answers::new()).unwrap();
        assert_eq!(prompter.prompts, vec!["Bring your own token?"]);
    }

    #[test]
    fn bundle_contains_exactly_the_schema_fields() {
        let mut prompter = ScriptedPrompter::new(vec![
            Answer::Text("alice".to_string()),
            Answer::Password("hunter2".to_string()),
        ]);
        let bundle =
            collect_from_user(&mut prompter, &sample_schema(), &Answers::new()).unwrap();
        let fields: Vec<&str> = bundle.keys().map(String::as_str).collect();
        assert_eq!(fields, vec!["account", "secret"]);
        assert_eq!(bundle["account"], "alice");
        assert_eq!(bundle["secret"], "hunter2");
    }

    #[test]
    fn scripted_runs_are_idempotent() {
        let run = || {
            let mut prompter = ScriptedPrompter::new(vec![
                Answer::Text("alice".to_string()),
                Answer::Password("hunter2".to_string()),
            ]);
            collect_from_user(&mut prompter, &sample_schema(), &Answers::new()).unwrap()
        };
        assert_eq!(run(), run());
    }

    #[test]
    fn initial_values_prefill_text_questions_only() {
        let schema: CredentialSchema<Answers> = CredentialSchema::new(
            "token",
            vec![
                Question::text("account", "Account name"),
                Question::file("blob", "Path to the blob", false),
            ],
        );
        let mut initial = Answers::new();
        initial.insert("account".to_string(), "alice".to_string());
        initial.insert("blob".to_string(), "/tmp/ignored".to_string());

        let dir = tempfile::tempdir().unwrap();
        let blob = dir.path().join("blob.txt");
        std::fs::write(&blob, "contents").unwrap();

        let mut prompter = ScriptedPrompter::new(vec![
            Answer::Text("alice".to_string()),
            Answer::Text(blob.to_string_lossy().into_owned()),
        ]);
        collect_from_user(&mut prompter, &schema, &initial).unwrap();

        assert_eq!(
            prompter.initials,
            vec![Some("alice".to_string()), None],
            "file questions must never pre-fill"
        );
    }

    #[test]
    fn empty_text_reprompts_until_valid() {
        let schema: CredentialSchema<Answers> =
            CredentialSchema::new("token", vec![Question::text("account", "Account name")]);
        let mut prompter = ScriptedPrompter::new(vec![
            Answer::Text(String::new()),
            Answer::Text(String::new()),
            Answer::Text("alice".to_string()),
        ]);
        let bundle = collect_from_user(&mut prompter, &schema, &Answers::new()).unwrap();
        assert_eq!(bundle["account"], "alice");
        assert_eq!(prompter.prompts.len(), 3);
        assert_eq!(prompter.invalid.len(), 2);
    }

    #[test]
    fn file_answer_stores_base64_contents() {
        let dir = tempfile::tempdir().unwrap();
        let blob = dir.path().join("keystore.jks");
        let bytes: &[u8] = &[0x00, 0x9f, 0x92, 0x96, 0xff];
        std::fs::File::create(&blob)
            .unwrap()
            .write_all(bytes)
            .unwrap();

        let schema: CredentialSchema<Answers> = CredentialSchema::new(
            "keystore",
            vec![Question::file("keystore", "Path to the keystore file", true)],
        );
        let mut prompter = ScriptedPrompter::new(vec![Answer::Text(
            blob.to_string_lossy().into_owned(),
        )]);
        let bundle = collect_from_user(&mut prompter, &schema, &Answers::new()).unwrap();
        assert_eq!(bundle["keystore"], STANDARD.encode(bytes));
    }

    #[test]
    fn file_answer_stores_text_contents_without_base64() {
        let dir = tempfile::tempdir().unwrap();
        let blob = dir.path().join("notes.txt");
        std::fs::write(&blob, "plain text").unwrap();

        let schema: CredentialSchema<Answers> = CredentialSchema::new(
            "notes",
            vec![Question::file("notes", "Path to the notes file", false)],
        );
        let mut prompter = ScriptedPrompter::new(vec![Answer::Text(
            blob.to_string_lossy().into_owned(),
        )]);
        let bundle = collect_from_user(&mut prompter, &schema, &Answers::new()).unwrap();
        assert_eq!(bundle["notes"], "plain text");
    }

    #[test]
    fn file_validation_distinguishes_missing_from_directory() {
        let dir = tempfile::tempdir().unwrap();
        let missing = dir.path().join("nope.jks");
        let real = dir.path().join("real.jks");
        std::fs::write(&real, b"x").unwrap();

        let schema: CredentialSchema<Answers> = CredentialSchema::new(
            "keystore",
            vec![Question::file("keystore", "Path to the keystore file", true)],
        );
        let mut prompter = ScriptedPrompter::new(vec![
            Answer::Text(missing.to_string_lossy().into_owned()),
            Answer::Text(dir.path().to_string_lossy().into_owned()),
            Answer::Text(real.to_string_lossy().into_owned()),
        ]);
        collect_from_user(&mut prompter, &schema, &Answers::new()).unwrap();

        assert_eq!(prompter.invalid.len(), 2);
        assert!(prompter.invalid[0].contains("does not exist"));
        assert!(prompter.invalid[1].contains("is not a file"));
    }

    #[test]
    fn manual_credentials_warning_fires_once_per_process() {
        // The only test that takes the accept path; keeping it singular
        // means parallel test execution cannot race the Once latch.
        let run = || {
            let mut prompter = ScriptedPrompter::new(vec![
                Answer::Confirm(true),
                Answer::Text("alice".to_string()),
                Answer::Password("hunter2".to_string()),
            ]);
            let bundle =
                ask_for_user_provided(&mut prompter, &sample_schema(), &Answers::new())
                    .unwrap()
                    .expect("accepted");
            (bundle, prompter.warnings.len())
        };

        let (first, first_warnings) = run();
        let (second, second_warnings) = run();
        assert_eq!(first, second);
        assert_eq!(first_warnings + second_warnings, 1);
    }

    #[test]
    fn resolve_path_expands_home() {
        let home = dirs::home_dir().unwrap();
        assert_eq!(resolve_path("~/foo.txt"), home.join("foo.txt"));
    }

    #[test]
    fn resolve_path_absolutizes_relative_input() {
        let cwd = std::env::current_dir().unwrap();
        assert_eq!(
            resolve_path("relative/foo.txt"),
            cwd.join("relative/foo.txt")
        );
    }

    #[test]
    fn resolve_path_keeps_absolute_input() {
        assert_eq!(
            resolve_path("/abs/foo.txt"),
            PathBuf::from("/abs/foo.txt")
        );
    }
}
