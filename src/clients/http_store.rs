/// 题库 HTTP 客户端
///
/// 通过 JSON REST 接口访问远程题库
use crate::clients::question_store::QuestionStore;
use crate::config::Config;
use crate::error::{ApiError, AppError, AppResult, ConfigError};
use crate::models::{QuestionPayload, QuestionRecord};
use reqwest::{Client, Method, RequestBuilder, Response, Url};
use serde::de::DeserializeOwned;
use tracing::debug;

/// 令牌请求头
const TOKEN_HEADER: &str = "X-Api-Token";

pub struct HttpQuestionStore {
    client: Client,
    base_url: Url,
    token: String,
}

impl HttpQuestionStore {
    /// 创建新的题库客户端
    pub fn new(config: &Config) -> AppResult<Self> {
        let base_url = Url::parse(&config.api_base_url).map_err(|e| {
            ConfigError::InvalidBaseUrl {
                value: config.api_base_url.clone(),
                reason: e.to_string(),
            }
        })?;
        if base_url.cannot_be_a_base() {
            return Err(ConfigError::InvalidBaseUrl {
                value: config.api_base_url.clone(),
                reason: "不能作为基础地址".to_string(),
            }
            .into());
        }

        let client = Client::builder()
            .build()
            .map_err(|e| AppError::api_request_failed("client", e))?;

        Ok(Self {
            client,
            base_url,
            token: config.api_token.clone(),
        })
    }

    /// 在基础地址后追加路径段，每段单独编码
    fn url(&self, segments: &[&str]) -> Url {
        let mut url = self.base_url.clone();
        // new() 已排除 cannot-be-a-base 的地址
        if let Ok(mut path) = url.path_segments_mut() {
            path.pop_if_empty().extend(segments);
        }
        url
    }

    /// 单个题目的地址，id 必须保持为一个路径段
    fn question_url(&self, id: &str) -> AppResult<Url> {
        if matches!(id, "" | "." | "..") {
            return Err(ApiError::InvalidId { id: id.to_string() }.into());
        }
        Ok(self.url(&["questions", id]))
    }

    /// 构建请求，令牌非空时附带令牌头
    fn request(&self, method: Method, url: Url) -> RequestBuilder {
        let builder = self.client.request(method, url);
        if self.token.is_empty() {
            builder
        } else {
            builder.header(TOKEN_HEADER, &self.token)
        }
    }

    /// 发送请求并检查状态码
    async fn send(&self, builder: RequestBuilder, endpoint: &str) -> AppResult<Response> {
        let response = builder
            .send()
            .await
            .map_err(|e| AppError::api_request_failed(endpoint, e))?;

        let status = response.status();
        if !status.is_success() {
            let message = response.text().await.ok().filter(|m| !m.is_empty());
            return Err(ApiError::BadResponse {
                endpoint: endpoint.to_string(),
                status: status.as_u16(),
                message,
            }
            .into());
        }

        Ok(response)
    }

    async fn send_json<T: DeserializeOwned>(
        &self,
        builder: RequestBuilder,
        endpoint: &str,
    ) -> AppResult<T> {
        let response = self.send(builder, endpoint).await?;
        let value = response
            .json::<T>()
            .await
            .map_err(|e| ApiError::JsonParseFailed {
                endpoint: endpoint.to_string(),
                source: Box::new(e),
            })?;
        Ok(value)
    }
}

impl QuestionStore for HttpQuestionStore {
    async fn list_all(&self) -> AppResult<Vec<QuestionRecord>> {
        let endpoint = "GET /questions";
        debug!("{}", endpoint);
        let url = self.url(&["questions"]);
        self.send_json(self.request(Method::GET, url), endpoint)
            .await
    }

    async fn create(&self, payload: &QuestionPayload) -> AppResult<QuestionRecord> {
        let endpoint = "POST /questions";
        debug!("{} Payload: {:?}", endpoint, payload);
        let url = self.url(&["questions"]);
        self.send_json(self.request(Method::POST, url).json(payload), endpoint)
            .await
    }

    async fn update(&self, id: &str, payload: &QuestionPayload) -> AppResult<QuestionRecord> {
        let endpoint = format!("PUT /questions/{}", id);
        debug!("{} Payload: {:?}", endpoint, payload);
        let url = self.question_url(id)?;
        self.send_json(self.request(Method::PUT, url).json(payload), &endpoint)
            .await
    }

    async fn delete(&self, id: &str) -> AppResult<()> {
        let endpoint = format!("DELETE /questions/{}", id);
        debug!("{}", endpoint);
        let url = self.question_url(id)?;
        self.send(self.request(Method::DELETE, url), &endpoint)
            .await?;
        Ok(())
    }
}
