//! iOS distribution credentials

use serde::Deserialize;

use crate::credentials::schema::{
    take_answer, Answers, CredentialSchema, FromAnswers, Question,
};
use crate::error::AirliftResult;

/// Distribution certificate (.p12) with its passphrase.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DistributionCertificate {
    /// Base64-encoded .p12 contents.
    pub data_base64: String,
    pub password: String,
}

/// Credentials a generic iOS build signs with.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct IosCredentials {
    /// Base64-encoded .mobileprovision contents.
    pub provisioning_profile_base64: String,
    pub distribution_certificate: DistributionCertificate,
}

impl FromAnswers for IosCredentials {
    fn from_answers(mut answers: Answers) -> AirliftResult<Self> {
        Ok(Self {
            provisioning_profile_base64: take_answer(&mut answers, "provisioningProfile")?,
            distribution_certificate: DistributionCertificate {
                data_base64: take_answer(&mut answers, "certificate")?,
                password: take_answer(&mut answers, "certificatePassword")?,
            },
        })
    }
}

/// Interactive schema for user-supplied iOS signing credentials.
pub fn ios_credentials_schema() -> CredentialSchema<IosCredentials> {
    CredentialSchema::new(
        "credentials",
        vec![
            Question::file(
                "provisioningProfile",
                "Path to the provisioning profile (.mobileprovision)",
                true,
            ),
            Question::file(
                "certificate",
                "Path to the distribution certificate (.p12)",
                true,
            ),
            Question::password("certificatePassword", "Distribution certificate password"),
        ],
    )
    .with_provide_method_prompt("Will you provide your own credentials?")
}
