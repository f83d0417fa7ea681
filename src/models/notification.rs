/// One single-select option: what the user sees and what comes back.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Choice {
    pub label: String,
    pub payload: String,
}

impl Choice {
    pub fn new(label: impl Into<String>, payload: impl Into<String>) -> Self {
        Self {
            label: label.into(),
            payload: payload.into(),
        }
    }
}

/// Outbound message for the transport binding.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Notification {
    pub chat_id: i64,
    pub body: String,
    pub choices: Vec<Choice>,
}

impl Notification {
    pub fn text(chat_id: i64, body: impl Into<String>) -> Self {
        Self {
            chat_id,
            body: body.into(),
            choices: Vec::new(),
        }
    }

    pub fn with_choices(chat_id: i64, body: impl Into<String>, choices: Vec<Choice>) -> Self {
        Self {
            chat_id,
            body: body.into(),
            choices,
        }
    }

    pub fn has_choices(&self) -> bool {
        !self.choices.is_empty()
    }
}
