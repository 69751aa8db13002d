/// Result of a language-level operation
///
/// Rejections are not errors: the value is then the unchanged input and the
/// messages say why.
#[derive(Debug, Clone, PartialEq)]
pub struct Outcome<T> {
    pub value: T,
    pub messages: Vec<String>,
}

impl<T> Outcome<T> {
    pub fn new(value: T, messages: Vec<String>) -> Self {
        Self { value, messages }
    }

    /// A value with a single message
    pub fn with_message(value: T, message: impl Into<String>) -> Self {
        Self {
            value,
            messages: vec![message.into()],
        }
    }

    pub fn map<U>(self, f: impl FnOnce(T) -> U) -> Outcome<U> {
        Outcome {
            value: f(self.value),
            messages: self.messages,
        }
    }

    pub fn into_parts(self) -> (T, Vec<String>) {
        (self.value, self.messages)
    }
}
