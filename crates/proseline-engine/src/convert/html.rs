use super::{ConvertError, Converter};

/// HTML is already in the shape the tokenizer wants.
#[derive(Debug, Clone, Copy, Default)]
pub struct HtmlConverter;

impl Converter for HtmlConverter {
    fn convert(&self, content: &str) -> Result<Vec<u8>, ConvertError> {
        Ok(content.as_bytes().to_vec())
    }
}
