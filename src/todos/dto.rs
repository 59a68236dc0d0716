use serde::Deserialize;

#[derive(Debug, Deserialize)]
pub struct CreateTaskRequest {
    pub task: String,
}

/// Full replacement of the mutable fields.
#[derive(Debug, Deserialize)]
pub struct UpdateTaskRequest {
    pub task: String,
    pub completed: bool,
}
