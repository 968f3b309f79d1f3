use serde::{Deserialize, Serialize};

/// Raw registration-form input, before validation.
#[derive(Debug, Clone, Default)]
pub struct SubmissionForm {
    pub name: String,
    pub email: String,
    pub age: String,
    pub gender: String,
    pub interests: Vec<String>,
}

/// A stored registration-form record, one per line in the submissions file.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Submission {
    #[serde(rename = "nombre")]
    pub name: String,

    pub email: String,

    /// Empty when the field was left blank.
    #[serde(rename = "edad", default)]
    pub age: String,

    #[serde(rename = "genero")]
    pub gender: String,

    #[serde(rename = "intereses")]
    pub interests: Vec<String>,

    #[serde(rename = "fecha_registro")]
    pub registered_at: String,
}
