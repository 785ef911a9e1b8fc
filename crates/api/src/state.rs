use std::sync::Arc;
use verse_chat::ChatEngine;

#[derive(Clone)]
pub struct ApiState {
    pub engine: Arc<ChatEngine>,
}

impl ApiState {
    pub fn new(engine: Arc<ChatEngine>) -> Self {
        Self { engine }
    }
}
