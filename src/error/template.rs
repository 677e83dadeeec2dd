use thiserror::Error;

#[derive(Debug, Error)]
pub enum TemplateError {
    #[error("Template '{key}': unterminated placeholder at byte {offset}.")]
    Unterminated { key: String, offset: usize },
    #[error("Template '{key}': invalid placeholder '{placeholder}' at byte {offset}.")]
    InvalidPlaceholder {
        key: String,
        placeholder: String,
        offset: usize,
    },
    #[error("Template '{key}': variable '{path}' is not set.")]
    MissingVariable { key: String, path: String },
}
