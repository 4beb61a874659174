#[derive(Debug)]
pub enum DecodeError {
    MalformedJson(String),
    MalformedDocument(String),
}

impl std::fmt::Display for DecodeError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            DecodeError::MalformedJson(err) => write!(f, "Malformed JSON: {}", err),
            DecodeError::MalformedDocument(err) => write!(f, "Malformed document: {}", err),
        }
    }
}

impl std::error::Error for DecodeError {}

impl From<serde_json::Error> for DecodeError {
    fn from(err: serde_json::Error) -> Self {
        DecodeError::MalformedJson(err.to_string())
    }
}

impl From<bson::de::Error> for DecodeError {
    fn from(err: bson::de::Error) -> Self {
        DecodeError::MalformedDocument(err.to_string())
    }
}

#[derive(Debug)]
pub enum EncodeError {
    Json(String),
    Document(String),
}

impl std::fmt::Display for EncodeError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            EncodeError::Json(err) => write!(f, "JSON encode error: {}", err),
            EncodeError::Document(err) => write!(f, "Document encode error: {}", err),
        }
    }
}

impl std::error::Error for EncodeError {}

impl From<serde_json::Error> for EncodeError {
    fn from(err: serde_json::Error) -> Self {
        EncodeError::Json(err.to_string())
    }
}

impl From<bson::ser::Error> for EncodeError {
    fn from(err: bson::ser::Error) -> Self {
        EncodeError::Document(err.to_string())
    }
}
