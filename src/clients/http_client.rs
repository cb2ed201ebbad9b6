/// 学习资料 HTTP 客户端
///
/// 封装所有与后端学习资料 / 试卷 API 相关的调用逻辑
use async_trait::async_trait;
use reqwest::{Client, Url};
use serde::de::DeserializeOwned;
use serde_json::json;
use std::time::Duration;
use tracing::{debug, warn};

use crate::clients::StudyApi;
use crate::config::Config;
use crate::error::{ApiError, ApiResult};
use crate::models::{ExamView, MaterialStructure, Question};
use crate::utils::logging::truncate_text;

/// 学习资料 HTTP 客户端
#[derive(Clone, Debug)]
pub struct HttpStudyApi {
    client: Client,
    base_url: Url,
}

impl HttpStudyApi {
    /// 创建新的客户端
    pub fn new(config: &Config) -> ApiResult<Self> {
        let base_url = Url::parse(&config.api_base_url)
            .map_err(|e| ApiError::InvalidUrl(format!("{} ({})", config.api_base_url, e)))?;
        if base_url.cannot_be_a_base() {
            return Err(ApiError::InvalidUrl(config.api_base_url.clone()));
        }

        let mut builder = Client::builder();
        if config.connect_timeout_secs > 0 {
            builder = builder.connect_timeout(Duration::from_secs(config.connect_timeout_secs));
        }
        let client = builder
            .build()
            .map_err(|e| ApiError::request_failed("client", e))?;

        Ok(Self { client, base_url })
    }

    /// 在基础地址后追加路径段（逐段编码）
    fn endpoint(&self, segments: &[&str]) -> ApiResult<Url> {
        let mut url = self.base_url.clone();
        url.path_segments_mut()
            .map_err(|_| ApiError::InvalidUrl(self.base_url.to_string()))?
            .pop_if_empty()
            .extend(segments);
        Ok(url)
    }

    /// 发送请求并解析 JSON 响应
    async fn send_json<T: DeserializeOwned>(
        &self,
        endpoint: &str,
        request: reqwest::RequestBuilder,
    ) -> ApiResult<T> {
        let response = request
            .header("Accept", "application/json, text/plain, */*")
            .send()
            .await
            .map_err(|e| ApiError::request_failed(endpoint, e))?;

        let status = response.status();
        let body = response
            .text()
            .await
            .map_err(|e| ApiError::request_failed(endpoint, e))?;

        if !status.is_success() {
            warn!("⚠️ {} 返回 {}", endpoint, status);
            return Err(ApiError::BadStatus {
                endpoint: endpoint.to_string(),
                status: status.as_u16(),
                body: truncate_text(&body, 200),
            });
        }

        debug!("{} 响应: {}", endpoint, truncate_text(&body, 200));

        serde_json::from_str(&body).map_err(|e| ApiError::json_parse_failed(endpoint, e))
    }
}

#[async_trait]
impl StudyApi for HttpStudyApi {
    async fn load_structure(&self, material_uuid: &str) -> ApiResult<MaterialStructure> {
        let url = self.endpoint(&["api", "learning-material", material_uuid, "structure"])?;
        let endpoint = url.path().to_string();
        debug!("加载资料结构: {}", endpoint);

        let structure: MaterialStructure = self.send_json(&endpoint, self.client.get(url)).await?;
        Ok(structure.with_uuid(material_uuid))
    }

    async fn load_question(
        &self,
        material_uuid: &str,
        section_uuid: &str,
        question_index: usize,
        answer_hint: Option<String>,
    ) -> ApiResult<Question> {
        let index = question_index.to_string();
        let url = self.endpoint(&[
            "api",
            "learning-material",
            material_uuid,
            "section",
            section_uuid,
            "question",
            &index,
        ])?;
        let endpoint = url.path().to_string();
        debug!("加载题目: {} (携带答案: {})", endpoint, answer_hint.is_some());

        let mut request = self.client.get(url);
        if let Some(answer) = answer_hint {
            request = request.query(&[("answer", answer)]);
        }
        self.send_json(&endpoint, request).await
    }

    async fn view_exam(&self, exam_uuid: &str) -> ApiResult<ExamView> {
        let url = self.endpoint(&["v1", "exam", "view"])?;
        let endpoint = url.path().to_string();
        debug!("获取试卷视图: {}", exam_uuid);

        let request = self.client.post(url).json(&json!({ "uuid": exam_uuid }));
        self.send_json(&endpoint, request).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn api(base: &str) -> HttpStudyApi {
        let config = Config {
            api_base_url: base.to_string(),
            ..Config::default()
        };
        HttpStudyApi::new(&config).unwrap()
    }

    #[test]
    fn endpoint_keeps_base_path_and_encodes_segments() {
        let url = api("http://host:1/prefix/")
            .endpoint(&["api", "learning-material", "a b/c", "structure"])
            .unwrap();
        assert_eq!(url.as_str(), "http://host:1/prefix/api/learning-material/a%20b%2Fc/structure");
    }

    #[test]
    fn rejects_non_base_url() {
        let config = Config {
            api_base_url: "mailto:someone@example.com".to_string(),
            ..Config::default()
        };
        assert!(matches!(HttpStudyApi::new(&config), Err(ApiError::InvalidUrl(_))));
    }
}
