use serde::Deserialize;
use std::path::Path;

use crate::error::ConfigError;

/// 程序配置
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Config {
    /// 后端 API 基础地址
    pub api_base_url: String,
    /// 连接超时（秒），0 表示不限制
    pub connect_timeout_secs: u64,
    /// 是否显示详细日志
    pub verbose_logging: bool,
    /// 切分结果、答题卡等输出目录
    pub output_dir: String,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            api_base_url: "http://127.0.0.1:8080".to_string(),
            connect_timeout_secs: 10,
            verbose_logging: false,
            output_dir: "output".to_string(),
        }
    }
}

/// 配置文件内容，所有字段可选
#[derive(Debug, Default, Deserialize)]
struct FileConfig {
    api_base_url: Option<String>,
    connect_timeout_secs: Option<u64>,
    verbose_logging: Option<bool>,
    output_dir: Option<String>,
}

impl Config {
    /// 从环境变量加载，未设置的项使用默认值
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::default().with_env(|name| std::env::var(name).ok())
    }

    /// 从 TOML 文件加载，再用环境变量覆盖
    pub fn from_toml_file(path: &Path) -> Result<Self, ConfigError> {
        let content = std::fs::read_to_string(path).map_err(|source| ConfigError::ReadFailed {
            path: path.display().to_string(),
            source,
        })?;
        Self::from_toml_str(&content, &path.display().to_string())?.with_env(|name| std::env::var(name).ok())
    }

    fn from_toml_str(content: &str, path: &str) -> Result<Self, ConfigError> {
        let file: FileConfig = toml::from_str(content).map_err(|source| ConfigError::TomlParseFailed {
            path: path.to_string(),
            source,
        })?;
        let default = Self::default();
        Ok(Self {
            api_base_url: file.api_base_url.unwrap_or(default.api_base_url),
            connect_timeout_secs: file.connect_timeout_secs.unwrap_or(default.connect_timeout_secs),
            verbose_logging: file.verbose_logging.unwrap_or(default.verbose_logging),
            output_dir: file.output_dir.unwrap_or(default.output_dir),
        })
    }

    fn with_env(self, lookup: impl Fn(&str) -> Option<String>) -> Result<Self, ConfigError> {
        Ok(Self {
            api_base_url: lookup("EXAM_API_BASE_URL").unwrap_or(self.api_base_url),
            connect_timeout_secs: parse_var(&lookup, "EXAM_CONNECT_TIMEOUT_SECS", "u64")?
                .unwrap_or(self.connect_timeout_secs),
            verbose_logging: parse_var(&lookup, "VERBOSE_LOGGING", "bool")?.unwrap_or(self.verbose_logging),
            output_dir: lookup("EXAM_OUTPUT_DIR").unwrap_or(self.output_dir),
        })
    }
}

fn parse_var<T: std::str::FromStr>(
    lookup: &impl Fn(&str) -> Option<String>,
    var_name: &str,
    expected_type: &str,
) -> Result<Option<T>, ConfigError> {
    match lookup(var_name) {
        None => Ok(None),
        Some(value) => value
            .trim()
            .parse()
            .map(Some)
            .map_err(|_| ConfigError::EnvVarParseFailed {
                var_name: var_name.to_string(),
                value,
                expected_type: expected_type.to_string(),
            }),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn env(pairs: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let map: HashMap<String, String> = pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        move |name| map.get(name).cloned()
    }

    #[test]
    fn env_overrides_defaults() {
        let config = Config::default()
            .with_env(env(&[
                ("EXAM_API_BASE_URL", "https://exam.example.com"),
                ("VERBOSE_LOGGING", "true"),
            ]))
            .unwrap();
        assert_eq!(config.api_base_url, "https://exam.example.com");
        assert!(config.verbose_logging);
        assert_eq!(config.connect_timeout_secs, 10);
    }

    #[test]
    fn invalid_env_value_is_reported() {
        let err = Config::default()
            .with_env(env(&[("EXAM_CONNECT_TIMEOUT_SECS", "soon")]))
            .unwrap_err();
        assert!(matches!(err, ConfigError::EnvVarParseFailed { ref var_name, .. } if var_name == "EXAM_CONNECT_TIMEOUT_SECS"));
    }

    #[test]
    fn toml_fills_only_given_fields() {
        let config = Config::from_toml_str("api_base_url = \"http://10.0.0.2\"\nconnect_timeout_secs = 0\n", "test.toml").unwrap();
        assert_eq!(config.api_base_url, "http://10.0.0.2");
        assert_eq!(config.connect_timeout_secs, 0);
        assert_eq!(config.output_dir, "output");
    }

    #[test]
    fn broken_toml_is_rejected() {
        assert!(matches!(
            Config::from_toml_str("api_base_url = ", "bad.toml"),
            Err(ConfigError::TomlParseFailed { .. })
        ));
    }
}
