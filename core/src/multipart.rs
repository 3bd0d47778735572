//! `multipart/form-data` bodies built on `ureq`'s multipart `Form`.
//!
//! Parts are collected in the order they are added and encoded in one go by
//! `encode`. A part whose name cannot be placed in a header is rejected with
//! `MultipartError`; the form stays usable and later parts are still added.

use std::io::Read;

use ureq::unversioned::multipart::{Form, Part};

use crate::error::MultipartError;

const OCTET_STREAM: &str = "application/octet-stream";

#[derive(Debug, Clone)]
struct PendingPart {
    name: String,
    file_name: Option<String>,
    content: Vec<u8>,
}

/// A multipart body under construction.
#[derive(Debug, Clone, Default)]
pub struct MultipartForm {
    parts: Vec<PendingPart>,
}

/// An encoded body and the `Content-Type` carrying its boundary.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct EncodedForm {
    pub content_type: String,
    pub body: Vec<u8>,
}

impl MultipartForm {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn len(&self) -> usize {
        self.parts.len()
    }

    pub fn is_empty(&self) -> bool {
        self.parts.is_empty()
    }

    pub fn add_field(&mut self, name: &str, value: &[u8]) -> Result<(), MultipartError> {
        self.parts.push(PendingPart {
            name: escape_name(name)?,
            file_name: None,
            content: value.to_vec(),
        });
        Ok(())
    }

    pub fn add_file(
        &mut self,
        field: &str,
        file_name: &str,
        content: &[u8],
    ) -> Result<(), MultipartError> {
        self.parts.push(PendingPart {
            name: escape_name(field)?,
            file_name: Some(escape_name(file_name)?),
            content: content.to_vec(),
        });
        Ok(())
    }

    /// Encode every part under a fresh random boundary.
    pub fn encode(&self) -> Result<EncodedForm, MultipartError> {
        let mut form = Form::new();
        for part in &self.parts {
            let mut piece = Part::bytes(&part.content);
            if let Some(file_name) = &part.file_name {
                piece = piece
                    .file_name(file_name)
                    .mime_str(OCTET_STREAM)
                    .map_err(|e| MultipartError::Encode(e.to_string()))?;
            }
            form = form.part(&part.name, piece);
        }

        let content_type = format!("multipart/form-data; boundary={}", form.boundary());
        let mut body = Vec::new();
        form.read_to_end(&mut body)
            .map_err(|e| MultipartError::Encode(e.to_string()))?;
        Ok(EncodedForm { content_type, body })
    }
}

// Names go into a quoted header parameter as-is.
fn escape_name(name: &str) -> Result<String, MultipartError> {
    if name.contains(|c: char| c == '\r' || c == '\n') {
        return Err(MultipartError::InvalidName(name.to_string()));
    }
    Ok(name.replace('\\', "\\\\").replace('"', "\\\""))
}
