//! Request/response plumbing between the console and the backend
//!
//! Requests are plain data so the same client code runs against the browser
//! `fetch` API or an in-memory backend in tests.

use crate::error::ApiError;
use async_trait::async_trait;
use gloo_net::http::{Request, RequestBuilder};
use serde::de::DeserializeOwned;
use wasm_bindgen::JsCast;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Method {
    Get,
    Post,
    Put,
    Delete,
}

impl Method {
    pub fn as_str(&self) -> &'static str {
        match self {
            Method::Get => "GET",
            Method::Post => "POST",
            Method::Put => "PUT",
            Method::Delete => "DELETE",
        }
    }
}

/// File picked in the browser, already read into memory
#[derive(Debug, Clone, PartialEq)]
pub struct UploadFile {
    pub name: String,
    pub content_type: String,
    pub bytes: Vec<u8>,
}

/// One part of a `multipart/form-data` body
#[derive(Debug, Clone, PartialEq)]
pub enum Part {
    Text { name: String, value: String },
    File { name: String, file: UploadFile },
}

#[derive(Debug, Clone, PartialEq)]
pub enum RequestBody {
    Empty,
    Json(String),
    Multipart(Vec<Part>),
}

impl RequestBody {
    /// Text value of a named multipart field.
    pub fn text_part(&self, field: &str) -> Option<&str> {
        match self {
            RequestBody::Multipart(parts) => parts.iter().find_map(|part| match part {
                Part::Text { name, value } if name == field => Some(value.as_str()),
                _ => None,
            }),
            _ => None,
        }
    }

    pub fn file_parts(&self) -> Vec<&UploadFile> {
        match self {
            RequestBody::Multipart(parts) => parts
                .iter()
                .filter_map(|part| match part {
                    Part::File { file, .. } => Some(file),
                    _ => None,
                })
                .collect(),
            _ => Vec::new(),
        }
    }
}

/// Request against a backend path such as `/master/agents`, query included
#[derive(Debug, Clone, PartialEq)]
pub struct ApiRequest {
    pub method: Method,
    pub path: String,
    pub body: RequestBody,
}

impl ApiRequest {
    pub fn new(method: Method, path: impl Into<String>) -> Self {
        Self {
            method,
            path: path.into(),
            body: RequestBody::Empty,
        }
    }

    pub fn with_body(mut self, body: RequestBody) -> Self {
        self.body = body;
        self
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct ApiResponse {
    pub status: u16,
    pub body: String,
}

impl ApiResponse {
    pub fn is_success(&self) -> bool {
        (200..300).contains(&self.status)
    }

    /// Turns non-2xx responses into [`ApiError::Status`].
    pub fn error_for_status(self) -> Result<Self, ApiError> {
        if self.is_success() {
            Ok(self)
        } else {
            Err(ApiError::Status {
                status: self.status,
                body: self.body,
            })
        }
    }

    pub fn json<T: DeserializeOwned>(&self) -> Result<T, ApiError> {
        serde_json::from_str(&self.body).map_err(|e| ApiError::Decode(e.to_string()))
    }
}

/// Sends requests to the agent backend
#[async_trait(?Send)]
pub trait Transport {
    async fn send(&self, request: ApiRequest) -> Result<ApiResponse, ApiError>;
}

/// `fetch`-backed transport used in the browser
pub struct BrowserTransport {
    base: String,
}

impl BrowserTransport {
    pub fn new(base: impl Into<String>) -> Self {
        Self { base: base.into() }
    }
}

#[async_trait(?Send)]
impl Transport for BrowserTransport {
    async fn send(&self, request: ApiRequest) -> Result<ApiResponse, ApiError> {
        let url = format!("{}{}", self.base, request.path);
        let builder = match request.method {
            Method::Get => Request::get(&url),
            Method::Post => Request::post(&url),
            Method::Put => Request::put(&url),
            Method::Delete => Request::delete(&url),
        };

        let response = match request.body {
            RequestBody::Empty => builder.send().await,
            RequestBody::Json(json) => {
                with_body(builder.header("Content-Type", "application/json"), json.into())?
                    .send()
                    .await
            }
            RequestBody::Multipart(parts) => with_body(builder, form_data(&parts)?.into())?.send().await,
        }
        .map_err(|e| ApiError::Network(e.to_string()))?;

        let status = response.status();
        let body = response
            .text()
            .await
            .map_err(|e| ApiError::Decode(e.to_string()))?;
        Ok(ApiResponse { status, body })
    }
}

fn with_body(builder: RequestBuilder, body: wasm_bindgen::JsValue) -> Result<Request, ApiError> {
    builder
        .body(body)
        .map_err(|e| ApiError::Encode(e.to_string()))
}

fn form_data(parts: &[Part]) -> Result<web_sys::FormData, ApiError> {
    let form = web_sys::FormData::new().map_err(js_encode_error)?;
    for part in parts {
        match part {
            Part::Text { name, value } => form.append_with_str(name, value).map_err(js_encode_error)?,
            Part::File { name, file } => {
                let bytes = js_sys::Uint8Array::from(file.bytes.as_slice());
                let options = web_sys::BlobPropertyBag::new();
                options.set_type(&file.content_type);
                let blob = web_sys::Blob::new_with_u8_array_sequence_and_options(
                    &js_sys::Array::of1(&bytes),
                    &options,
                )
                .map_err(js_encode_error)?;
                form.append_with_blob_and_filename(name, &blob, &file.name)
                    .map_err(js_encode_error)?;
            }
        }
    }
    Ok(form)
}

fn js_encode_error(value: wasm_bindgen::JsValue) -> ApiError {
    ApiError::Encode(format!("{:?}", value))
}

/// Reads every file selected in an `<input type="file">` element.
pub async fn read_selected_files(input: &web_sys::HtmlInputElement) -> Result<Vec<UploadFile>, ApiError> {
    let mut files = Vec::new();
    let Some(list) = input.files() else {
        return Ok(files);
    };

    for index in 0..list.length() {
        let Some(file) = list.get(index) else { continue };
        let buffer = wasm_bindgen_futures::JsFuture::from(file.array_buffer())
            .await
            .map_err(|e| ApiError::Encode(format!("Failed to read {}: {:?}", file.name(), e)))?;
        let buffer: js_sys::ArrayBuffer = buffer.unchecked_into();
        files.push(UploadFile {
            name: file.name(),
            content_type: file.type_(),
            bytes: js_sys::Uint8Array::new(&buffer).to_vec(),
        });
    }
    Ok(files)
}
