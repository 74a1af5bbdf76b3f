use wasm_bindgen::{JsCast, JsValue};
use wasm_bindgen_futures::JsFuture;
use web_sys::{FormData, Headers, Request, RequestInit, Response};

use super::{js_error_message, recording_blob, window};
use crate::api::{ApiError, ApiRequest, FormPart, Method, RequestBody, Transport};
use crate::config::AppConfig;

fn network(e: JsValue) -> ApiError {
    ApiError::Network(js_error_message(&e))
}

/// `window.fetch` against the configured API base URL.
pub struct FetchTransport {
    config: AppConfig,
}

impl FetchTransport {
    pub fn new(config: AppConfig) -> Self {
        Self { config }
    }

    fn build(&self, request: ApiRequest) -> Result<Request, ApiError> {
        let init = RequestInit::new();
        init.set_method(match request.method {
            Method::Get => "GET",
            Method::Post => "POST",
        });

        match request.body {
            RequestBody::Empty => {}
            RequestBody::Json(body) => {
                let headers = Headers::new().map_err(network)?;
                headers
                    .set("Content-Type", "application/json")
                    .map_err(network)?;
                init.set_headers(&headers);
                let body =
                    serde_json::to_string(&body).map_err(|e| ApiError::Encode(e.to_string()))?;
                init.set_body(&JsValue::from_str(&body));
            }
            // the browser sets the multipart boundary itself
            RequestBody::Multipart(parts) => {
                let form = FormData::new().map_err(network)?;
                for part in parts {
                    match part {
                        FormPart::Text { name, value } => {
                            form.append_with_str(&name, &value).map_err(network)?
                        }
                        FormPart::File {
                            name,
                            file_name,
                            recording,
                        } => {
                            let blob = recording_blob(&recording).map_err(network)?;
                            form.append_with_blob_and_filename(&name, &blob, &file_name)
                                .map_err(network)?
                        }
                    }
                }
                init.set_body(&form);
            }
        }

        Request::new_with_str_and_init(&self.config.api_url(&request.path), &init).map_err(network)
    }
}

impl Transport for FetchTransport {
    async fn send(&self, request: ApiRequest) -> Result<serde_json::Value, ApiError> {
        let window = window().map_err(network)?;
        let request = self.build(request)?;

        let response: Response = JsFuture::from(window.fetch_with_request(&request))
            .await
            .map_err(network)?
            .dyn_into()
            .map_err(network)?;
        if !response.ok() {
            log::warn!("{} answered {}", request.url(), response.status());
            return Err(ApiError::Status(response.status()));
        }

        let text = JsFuture::from(response.text().map_err(network)?)
            .await
            .map_err(network)?
            .as_string()
            .ok_or_else(|| ApiError::Decode("response body is not text".to_string()))?;
        serde_json::from_str(&text).map_err(|e| ApiError::Decode(e.to_string()))
    }
}
