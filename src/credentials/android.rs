//! Android keystore credentials

use serde::Deserialize;

use crate::credentials::schema::{
    take_answer, Answers, CredentialSchema, FromAnswers, Question,
};
use crate::error::AirliftResult;

/// Keystore bundle, collected interactively or read from a local
/// credentials file.
///
/// `keystore` holds the base64-encoded contents of the keystore file,
/// not its path.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Keystore {
    pub keystore: String,
    pub keystore_password: String,
    pub key_alias: String,
    pub key_password: String,
}

impl FromAnswers for Keystore {
    fn from_answers(mut answers: Answers) -> AirliftResult<Self> {
        Ok(Self {
            keystore: take_answer(&mut answers, "keystore")?,
            keystore_password: take_answer(&mut answers, "keystorePassword")?,
            key_alias: take_answer(&mut answers, "keyAlias")?,
            key_password: take_answer(&mut answers, "keyPassword")?,
        })
    }
}

/// Interactive schema for a user-supplied keystore.
pub fn keystore_schema() -> CredentialSchema<Keystore> {
    CredentialSchema::new(
        "keystore",
        vec![
            Question::file("keystore", "Path to the keystore file", true),
            Question::password("keystorePassword", "Keystore password"),
            Question::text("keyAlias", "Key alias"),
            Question::password("keyPassword", "Key password"),
        ],
    )
    .with_provide_method_prompt("Will you provide your own keystore?")
}
