use shared::error::{AppError, AppResult};

pub struct CreateRoom {
    pub name: String,
}

impl CreateRoom {
    pub fn new(name: &str) -> AppResult<Self> {
        let name = name.trim();
        if name.is_empty() {
            return Err(AppError::MissingField("name"));
        }
        Ok(Self {
            name: name.to_owned(),
        })
    }
}
