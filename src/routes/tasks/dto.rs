use serde::{Deserialize, Serialize};

#[derive(Deserialize)]
pub struct CreateTask {
    pub text: Option<String>,
}

#[derive(Debug, Serialize, Deserialize, PartialEq, Eq)]
pub struct Deleted {
    pub ok: bool,
}
