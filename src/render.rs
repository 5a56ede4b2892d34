// Copyright (c) 2025 Kodama Project. All rights reserved.
// Released under the GPL-3.0 license as described in the file LICENSE.
// Authors: Kokic (@kokic)

use std::time::Duration;

use base64::{engine::general_purpose::STANDARD, Engine};
use reqwest::header::CONTENT_TYPE;
use serde::{Deserialize, Serialize};
use thiserror::Error;
use url::Url;

use crate::{config::renderer::RendererConfig, span::MathSpan};

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RasterImage {
    pub bytes: Vec<u8>,
    pub mime: String,
}

impl RasterImage {
    pub fn png(bytes: Vec<u8>) -> Self {
        Self {
            bytes,
            mime: "image/png".to_string(),
        }
    }

    pub fn to_data_url(&self) -> String {
        format!("data:{};base64,{}", self.mime, STANDARD.encode(&self.bytes))
    }
}

#[derive(Debug, Error)]
pub enum RenderError {
    #[error("timeout to renderer")]
    Timeout,

    #[error("network error to renderer")]
    Transport(#[source] reqwest::Error),

    #[error("HTTP {status}: {}", .message.as_deref().unwrap_or("no details"))]
    Status { status: u16, message: Option<String> },
}

impl From<reqwest::Error> for RenderError {
    fn from(err: reqwest::Error) -> Self {
        match err.is_timeout() {
            true => RenderError::Timeout,
            false => RenderError::Transport(err),
        }
    }
}

/// Turns TeX into a raster image. One call is one round trip.
#[allow(async_fn_in_trait)]
pub trait Renderer {
    async fn render(&self, span: &MathSpan) -> Result<RasterImage, RenderError>;
}

#[derive(Serialize)]
struct RenderRequest<'a> {
    tex: &'a str,
    display: bool,
    dpi: u32,
}

/// Error body sent by the reference renderer, e.g. `{"error": "empty tex"}`.
#[derive(Deserialize)]
struct ErrorBody {
    error: String,
}

/// Renderer service reached over HTTP.
pub struct HttpRenderer {
    client: reqwest::Client,
    endpoint: Url,
    dpi: u32,
}

impl HttpRenderer {
    pub fn new(config: &RendererConfig) -> eyre::Result<Self> {
        let client = reqwest::Client::builder()
            .timeout(Duration::from_secs(config.timeout_secs))
            .build()
            .map_err(|e| eyre::eyre!("failed to build HTTP client: {}", e))?;
        Ok(Self {
            client,
            endpoint: config.endpoint.clone(),
            dpi: config.dpi,
        })
    }

    pub fn endpoint(&self) -> &Url {
        &self.endpoint
    }

    /// `GET /health` on the renderer's origin.
    pub async fn health(&self) -> Result<(), RenderError> {
        let url = self
            .endpoint
            .join("/health")
            .unwrap_or_else(|_| self.endpoint.clone());
        let response = self.client.get(url).send().await?;
        let status = response.status();
        match status.is_success() {
            true => Ok(()),
            false => Err(RenderError::Status {
                status: status.as_u16(),
                message: None,
            }),
        }
    }
}

impl Renderer for HttpRenderer {
    async fn render(&self, span: &MathSpan) -> Result<RasterImage, RenderError> {
        let request = RenderRequest {
            tex: &span.tex,
            display: span.mode.is_display(),
            dpi: self.dpi,
        };
        tracing::debug!(tex = %span.tex, mode = %span.mode, "render request");

        let response = self
            .client
            .post(self.endpoint.clone())
            .json(&request)
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            let body = response.bytes().await.unwrap_or_default();
            let message = serde_json::from_slice::<ErrorBody>(&body)
                .ok()
                .map(|b| b.error);
            return Err(RenderError::Status {
                status: status.as_u16(),
                message,
            });
        }

        let mime = response
            .headers()
            .get(CONTENT_TYPE)
            .and_then(|v| v.to_str().ok())
            .filter(|m| m.starts_with("image/"))
            .unwrap_or("image/png")
            .to_string();
        let bytes = response.bytes().await?;
        Ok(RasterImage {
            bytes: bytes.to_vec(),
            mime,
        })
    }
}
